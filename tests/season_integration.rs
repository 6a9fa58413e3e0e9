//! Season flow integration tests

use std::collections::HashSet;

use derby_sim::core::{HorseId, RaceConfig, RaceError, RoundId};
use derby_sim::race::{RacePhase, SimClock};
use derby_sim::store::GameStore;

fn new_season(seed: u64) -> GameStore {
    let mut store = GameStore::with_seed(RaceConfig::default(), seed);
    store.generate_horses().unwrap();
    store.generate_race_schedule().unwrap();
    store
}

/// Run one round to finalization on the simulated clock
fn run_round(store: &mut GameStore, clock: &mut SimClock, round: RoundId) -> Vec<HorseId> {
    store.start_race(round, clock.now()).unwrap();
    assert!(store.handle_countdown_complete(clock.now()));

    for _ in 0..2_000 {
        let now = clock.advance();
        if let Some(order) = store.tick(now).finalized_order() {
            return order.to_vec();
        }
    }
    panic!("round {} never finalized", round);
}

#[test]
fn test_full_season() {
    let mut store = new_season(42);
    let mut clock = SimClock::new(0, 100);

    assert_eq!(store.horses().len(), 20);
    assert_eq!(store.rounds().len(), 6);
    assert!(!store.has_started_races());

    let ids: Vec<RoundId> = store.rounds().iter().map(|r| r.id).collect();
    for id in ids {
        assert_eq!(store.next_round_id(), Some(id));
        let order = run_round(&mut store, &mut clock, id);

        let round = store.rounds().iter().find(|r| r.id == id).unwrap();
        let expected: HashSet<&HorseId> = round.participants.iter().collect();
        let actual: HashSet<&HorseId> = order.iter().collect();
        assert_eq!(order.len(), 10);
        assert_eq!(actual, expected);

        assert_eq!(store.round_result(id), Some(order.as_slice()));
        assert_eq!(store.last_finished_round_id(), Some(id));
        assert!(!store.is_race_active());
        assert_eq!(store.phase(), RacePhase::Idle);
        store.clear_last_finished_round();
    }

    assert!(store.all_rounds_completed());
    assert!(store.next_round_id().is_none());
    assert_eq!(store.results().len(), 6);

    let results = store.calculate_grand_final_results().unwrap().to_vec();
    assert!(!results.is_empty());
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.final_position, i + 1);
    }
    for pair in results.windows(2) {
        assert!(pair[0].total_points >= pair[1].total_points);
    }

    // 6 rounds × (10 + 9 + ... + 1) points are handed out
    let total: u32 = results.iter().map(|r| r.total_points).sum();
    assert_eq!(total, 6 * 55);
    assert_eq!(store.grand_final_results(), results.as_slice());
}

#[test]
fn test_conditions_stay_in_bounds_over_season() {
    let mut store = new_season(7);
    let mut clock = SimClock::new(0, 100);

    let ids: Vec<RoundId> = store.rounds().iter().map(|r| r.id).collect();
    for id in ids {
        run_round(&mut store, &mut clock, id);
        for horse in store.horses() {
            assert!((30.0..=100.0).contains(&horse.current_condition));
        }
    }
}

#[test]
fn test_first_round_only() {
    let mut store = new_season(3);
    let mut clock = SimClock::new(0, 100);

    run_round(&mut store, &mut clock, RoundId(1));

    assert!(store.rounds()[0].result.is_some());
    assert!(store.rounds()[1..].iter().all(|r| r.result.is_none()));
    assert!(store.has_started_races());
    assert!(!store.all_rounds_completed());
    assert_eq!(store.next_round_id(), Some(RoundId(2)));
    assert_eq!(store.round_points().len(), 1);
}

#[test]
fn test_grand_final_requires_complete_season() {
    let mut store = new_season(5);
    let mut clock = SimClock::new(0, 100);

    match store.calculate_grand_final_results() {
        Err(RaceError::IncompleteSeason(missing)) => assert_eq!(missing.len(), 6),
        other => panic!("expected IncompleteSeason, got {:?}", other),
    }

    run_round(&mut store, &mut clock, RoundId(1));
    match store.calculate_grand_final_results() {
        Err(RaceError::IncompleteSeason(missing)) => {
            assert_eq!(missing, (2..=6).map(RoundId).collect::<Vec<_>>());
        }
        other => panic!("expected IncompleteSeason, got {:?}", other),
    }
    assert!(store.grand_final_results().is_empty());
}

#[test]
fn test_rounds_can_run_out_of_order() {
    let mut store = new_season(11);
    let mut clock = SimClock::new(0, 100);

    run_round(&mut store, &mut clock, RoundId(4));
    assert_eq!(store.next_round_id(), Some(RoundId(1)));
    assert_eq!(store.results()[0].round_id, RoundId(4));
}

#[test]
fn test_same_seed_same_season() {
    let mut a = new_season(99);
    let mut b = new_season(99);
    let mut clock_a = SimClock::new(0, 100);
    let mut clock_b = SimClock::new(0, 100);

    assert_eq!(a.horses(), b.horses());
    assert_eq!(a.rounds(), b.rounds());
    assert_eq!(
        run_round(&mut a, &mut clock_a, RoundId(1)),
        run_round(&mut b, &mut clock_b, RoundId(1))
    );
}

#[test]
fn test_schedule_regeneration_blocked_during_race() {
    let mut store = new_season(13);
    store.start_race(RoundId(1), 0).unwrap();

    assert!(matches!(
        store.generate_race_schedule(),
        Err(RaceError::RaceAlreadyActive(RoundId(1)))
    ));
    assert_eq!(store.current_round(), Some(RoundId(1)));
}

#[test]
fn test_regenerate_schedule_clears_results() {
    let mut store = new_season(17);
    let mut clock = SimClock::new(0, 100);
    run_round(&mut store, &mut clock, RoundId(1));

    store.generate_race_schedule().unwrap();
    assert!(store.results().is_empty());
    assert!(!store.has_started_races());
    assert!(store.last_finished_round_id().is_none());
    assert!(store.current_round().is_none());
}

#[test]
fn test_schedule_needs_enough_horses() {
    let mut store = GameStore::with_seed(RaceConfig::default(), 1);
    store.generate_horse_count(4).unwrap();

    assert!(matches!(
        store.generate_race_schedule(),
        Err(RaceError::InsufficientHorses { needed: 10, available: 4 })
    ));
}

#[test]
fn test_reset_mid_race() {
    let mut store = new_season(23);
    let mut clock = SimClock::new(0, 100);
    store.start_race(RoundId(1), 0).unwrap();
    store.handle_countdown_complete(0);
    for _ in 0..10 {
        store.tick(clock.advance());
    }

    store.reset_game();
    store.reset_game();

    assert!(!store.is_generated());
    assert!(!store.is_race_active());
    assert!(store.current_race_horses().is_empty());
    assert_eq!(store.track_label(), "Track pending");
    assert!(store.tick(clock.advance()).is_empty());
}
