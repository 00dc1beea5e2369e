//! Property and scenario tests for the scheduler through the public API.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fastrand::Rng;
use pretty_assertions::assert_eq;

use fsrs_core::{
    CardState, CardStatus, Fsrs, Rating, SchedulerParams, SpacedRepetitionAlgorithm,
    DEFAULT_WEIGHTS,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap()
}

fn scheduler(enable_fuzz: bool, maximum_interval: u32) -> Fsrs {
    Fsrs::new(SchedulerParams::new(&DEFAULT_WEIGHTS, 0.9, maximum_interval, enable_fuzz).unwrap())
}

/// Cards covering every status and a spread of memory states.
fn sample_cards(fsrs: &Fsrs) -> Vec<CardState> {
    let mut cards = vec![fsrs.init_card(now())];
    for status in [
        CardStatus::Learning,
        CardStatus::Review,
        CardStatus::Relearning,
    ] {
        for (stability, difficulty, overdue) in [
            (0.1, 1.0, 0),
            (1.0, 10.0, 1),
            (5.0, 5.0, 30),
            (250.0, 2.5, 400),
            (20_000.0, 9.9, 3),
        ] {
            cards.push(CardState {
                difficulty,
                stability,
                retrievability: 0.5,
                status,
                due: Some(now() - Duration::days(overdue)),
                lapses: 2,
                reps: 8,
                elapsed_days: 0,
                scheduled_days: 7,
                seed: 0,
            });
        }
    }
    cards
}

#[test]
fn schedule_is_deterministic_without_fuzz() {
    let fsrs = scheduler(false, 36500);
    for card in sample_cards(&fsrs) {
        for rating in Rating::ALL {
            let a = fsrs.schedule(&card, rating, now(), &mut Rng::with_seed(1));
            let b = fsrs.schedule(&card, rating, now(), &mut Rng::with_seed(2));
            assert_eq!(a, b);
        }
    }
}

#[test]
fn outputs_stay_in_domain() {
    for fsrs in [scheduler(false, 36500), scheduler(true, 36500), scheduler(true, 30)] {
        let max = fsrs.params().maximum_interval();
        let mut rng = Rng::with_seed(77);
        for card in sample_cards(&fsrs) {
            for rating in Rating::ALL {
                let next = fsrs.schedule(&card, rating, now(), &mut rng);
                assert!((1.0..=10.0).contains(&next.difficulty), "{next:?}");
                assert!(next.stability >= 0.1, "{next:?}");
                assert!((0.0..=1.0).contains(&next.retrievability), "{next:?}");
                assert!(
                    (1..=max).contains(&next.scheduled_days),
                    "{} outside [1, {max}]",
                    next.scheduled_days
                );
                assert!(next.validate().is_ok());
            }
        }
    }
}

#[test]
fn repeated_reviews_stay_in_domain() {
    let fsrs = scheduler(true, 36500);
    let mut rng = Rng::with_seed(3);
    let mut card = fsrs.init_card(now());
    let mut clock = now();
    for step in 0..200u32 {
        let rating = Rating::ALL[(step % 4) as usize];
        card = fsrs.schedule(&card, rating, clock, &mut rng);
        assert!(card.validate().is_ok(), "step {step}: {card:?}");
        clock = card.due.unwrap();
    }
    assert_eq!(card.reps, 200);
    assert_eq!(card.lapses, 50);
}

#[test]
fn next_states_match_independent_schedules() {
    let fsrs = scheduler(false, 36500);
    for card in sample_cards(&fsrs) {
        let next = fsrs.next_states(&card, now(), &mut Rng::with_seed(9));
        assert_eq!(next.iter().count(), 4);
        for (rating, state) in next.iter() {
            let single = fsrs.schedule(&card, rating, now(), &mut Rng::with_seed(9));
            assert_eq!(state, &single);
        }
    }
}

#[test]
fn brand_new_card_rated_good() {
    let fsrs = Fsrs::default();
    let card = fsrs.init_card(now());
    assert_eq!(card.status, CardStatus::New);
    assert_eq!(card.reps, 0);
    assert_eq!(card.due, Some(now()));

    let next = fsrs.schedule(&card, Rating::Good, now(), &mut Rng::with_seed(0));
    assert_eq!(next.status, CardStatus::Learning);
    assert_eq!(next.reps, 1);
    assert_eq!(next.lapses, 0);
    assert_eq!(next.stability, fsrs.short_term_stability(card.stability, Rating::Good));
    assert_eq!(next.scheduled_days, 2);
    assert_eq!(next.due, Some(now() + Duration::days(2)));
}

#[test]
fn review_card_lapses_ten_days_after_due() {
    let fsrs = scheduler(false, 36500);
    let card = CardState {
        difficulty: 5.0,
        stability: 10.0,
        retrievability: 0.9,
        status: CardStatus::Review,
        due: Some(now() - Duration::days(10)),
        lapses: 3,
        reps: 12,
        elapsed_days: 4,
        scheduled_days: 10,
        seed: 0,
    };
    let next = fsrs.schedule(&card, Rating::Again, now(), &mut Rng::with_seed(0));
    assert_eq!(next.lapses, 4);
    assert_eq!(next.status, CardStatus::Relearning);
    assert_eq!(next.scheduled_days, 1);
    assert_eq!(next.elapsed_days, 10);
    assert_eq!(next.due, Some(now() + Duration::days(1)));
    assert!((next.stability - 1.3919869730).abs() < 1e-9, "{}", next.stability);
    assert!((next.difficulty - 8.347534).abs() < 1e-9, "{}", next.difficulty);
}

#[test]
fn unit_stability_gives_one_day_interval() {
    let fsrs = Fsrs::default();
    assert_eq!(fsrs.next_interval(1.0), 1);
}

#[test]
fn learning_sequence_graduates_to_review() {
    let fsrs = scheduler(false, 36500);
    let mut rng = Rng::with_seed(0);
    let card = fsrs.init_card(now());
    let learning = fsrs.schedule(&card, Rating::Good, now(), &mut rng);
    let review = fsrs.schedule(&learning, Rating::Good, learning.due.unwrap(), &mut rng);
    let late = review.due.unwrap() + Duration::days(2);
    let again = fsrs.schedule(&review, Rating::Good, late, &mut rng);

    assert_eq!(learning.status, CardStatus::Learning);
    assert_eq!(review.status, CardStatus::Review);
    assert_eq!(again.status, CardStatus::Review);
    assert!(again.scheduled_days > review.scheduled_days);
    assert!(again.retrievability > 0.0);
}

#[test]
fn algorithm_usable_as_trait_object() {
    let algorithm: Box<dyn SpacedRepetitionAlgorithm> = Box::new(Fsrs::default());
    assert_eq!(algorithm.name(), "fsrs");
    let card = algorithm.init_card(now());
    let next = algorithm.next_states(&card, now(), &mut Rng::with_seed(4));
    assert_eq!(next.again.status, CardStatus::Learning);
    assert!(next.easy.stability > next.hard.stability);
}

#[test]
fn card_state_json_round_trip() {
    let fsrs = Fsrs::default();
    let card = fsrs.schedule(
        &fsrs.init_card(now()),
        Rating::Easy,
        now(),
        &mut Rng::with_seed(5),
    );
    let json = serde_json::to_string(&card).unwrap();
    assert!(json.contains("\"status\":\"learning\""));
    let back: CardState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.status, card.status);
    assert_eq!(back.due, card.due);
    assert_eq!(back.scheduled_days, card.scheduled_days);
    assert!((back.stability - card.stability).abs() < 1e-9);
    assert!((back.difficulty - card.difficulty).abs() < 1e-9);
}
