fn main() -> anyhow::Result<()> {
    fsrs_preview::run()
}
