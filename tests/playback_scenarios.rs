// Playback state machine scenarios and invariants

use hiit_timer::sequence::READY_DURATION_SECS;
use hiit_timer::{Cue, Exercise, HiitConfig, PlaybackMachine, Routine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn short_routine() -> Routine {
    Routine {
        id: "short".to_string(),
        name: "Short".to_string(),
        warmup: vec![
            Exercise::with_id("w1", "Jog", 4),
            Exercise::with_id("w2", "Skip", 3),
        ],
        hiit: HiitConfig {
            rounds: 2,
            exercises_per_round: vec!["A".to_string(), "B".to_string()],
            work_duration: 5,
            rest_between_exercises: 2,
            rest_between_rounds: 6,
        },
        stretch: vec![Exercise::with_id("s1", "Reach", 4)],
    }
}

fn assert_invariants(machine: &PlaybackMachine) {
    assert!(machine.position() < machine.len());
    assert!(machine.state().time_left <= machine.current_step().duration);
}

#[test]
fn test_warnings_on_last_three_seconds_then_transition() {
    let mut machine = PlaybackMachine::from_routine(&short_routine());
    // "Jog" lasts 4s, so the countdown passes through 3, 2 and 1
    machine.seek_to(1);
    machine.toggle();

    let cues: Vec<Option<Cue>> = (0..4).map(|_| machine.tick()).collect();
    assert_eq!(
        cues,
        vec![
            Some(Cue::Warning),
            Some(Cue::Warning),
            Some(Cue::Warning),
            Some(Cue::Transition),
        ]
    );
    assert_eq!(machine.position(), 2);
    assert_eq!(machine.state().time_left, 3);
    assert!(machine.is_active());
}

#[test]
fn test_countdown_from_three_warns_on_remaining_values() {
    let mut machine = PlaybackMachine::from_routine(&short_routine());
    // "Skip" starts at 3: the countdown reaches 2 and 1 before expiring
    machine.seek_to(2);
    machine.toggle();
    assert_eq!(machine.state().time_left, 3);

    let cues: Vec<Option<Cue>> = (0..3).map(|_| machine.tick()).collect();
    assert_eq!(
        cues,
        vec![Some(Cue::Warning), Some(Cue::Warning), Some(Cue::Transition)]
    );
    assert_eq!(machine.position(), 3);
    assert_eq!(machine.state().time_left, 5);
}

#[test]
fn test_prev_at_start_and_next_at_end() {
    let mut machine = PlaybackMachine::from_routine(&short_routine());
    let before = *machine.state();
    machine.prev();
    assert_eq!(machine.position(), 0);
    assert_eq!(*machine.state(), before);

    let last = machine.len() - 1;
    machine.seek_to(last);
    let at_end = *machine.state();
    machine.next();
    assert_eq!(machine.position(), last);
    assert_eq!(*machine.state(), at_end);
}

#[test]
fn test_full_run_emits_one_completion() {
    let mut machine = PlaybackMachine::from_routine(&short_routine());
    let total = machine.total_duration();
    machine.toggle();

    let mut completed = 0;
    let mut transitions = 0;
    for _ in 0..total + 10 {
        match machine.tick() {
            Some(Cue::Completed) => completed += 1,
            Some(Cue::Transition) => transitions += 1,
            _ => {}
        }
    }

    assert_eq!(completed, 1);
    assert_eq!(transitions, machine.len() - 1);
    assert_eq!(machine.state().total_time_elapsed, total);
    assert!(machine.is_finished());
}

#[test]
fn test_reset_restores_initial_state() {
    let mut machine = PlaybackMachine::from_routine(&short_routine());
    let initial = *machine.state();

    machine.toggle();
    for _ in 0..12 {
        machine.tick();
    }
    machine.reset();

    assert_eq!(*machine.state(), initial);
    assert_eq!(machine.position(), 0);
    assert_eq!(machine.state().time_left, READY_DURATION_SECS);
}

#[test]
fn test_invariants_hold_under_random_operations() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut machine = PlaybackMachine::from_routine(&short_routine());

    for _ in 0..5000 {
        match rng.gen_range(0..6) {
            0 | 1 => {
                machine.tick();
            }
            2 => {
                machine.toggle();
            }
            3 => machine.seek_to(rng.gen_range(0..machine.len() + 5)),
            4 => {
                if rng.gen_bool(0.5) {
                    machine.next();
                } else {
                    machine.prev();
                }
            }
            _ => {
                if rng.gen_bool(0.05) {
                    machine.reset();
                }
            }
        }
        assert_invariants(&machine);
    }
}

#[test]
fn test_elapsed_tracks_seek_position() {
    let mut machine = PlaybackMachine::from_routine(&short_routine());
    for index in 0..machine.len() {
        machine.seek_to(index);
        assert_eq!(
            machine.state().total_time_elapsed,
            machine.current_step().cumulative_time_before
        );
    }
}
