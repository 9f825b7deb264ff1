// Sequence compiler - Flattens a routine into an ordered list of timed steps
//
// Order: ready step, warm-up list, HIIT rounds with interleaved rests,
// stretch list. Each step records the running total before it and the
// display name of the step that follows it.

use super::step::{Activity, Phase, Step};
use crate::routine::Routine;

/// Duration of the synthetic "get ready" step that opens every sequence
pub const READY_DURATION_SECS: u32 = 5;

/// Display labels used by the compiler
pub mod labels {
    pub const READY: &str = "GET READY";
    pub const UNNAMED: &str = "UNNAMED";
    pub const HIIT_EXERCISE: &str = "HIIT EXERCISE";
    pub const REST: &str = "REST";
    pub const ROUND_BREAK: &str = "ROUND BREAK";
    pub const COMPLETED: &str = "COMPLETED";
}

/// Accumulates steps and the running total
struct SequenceBuilder {
    steps: Vec<Step>,
    total: u32,
}

impl SequenceBuilder {
    fn new() -> Self {
        Self {
            steps: Vec::new(),
            total: 0,
        }
    }

    fn push(
        &mut self,
        phase: Phase,
        name: &str,
        duration: u32,
        activity: Activity,
        round: Option<u32>,
    ) {
        self.steps.push(Step {
            phase,
            name: name.to_string(),
            duration,
            activity,
            round,
            next_name: String::new(),
            cumulative_time_before: self.total,
        });
        self.total = self.total.saturating_add(duration);
    }

    /// Link every step to the name of its successor
    fn finish(mut self) -> Vec<Step> {
        let count = self.steps.len();
        for i in 0..count {
            let next = match self.steps.get(i + 1) {
                Some(next) => next.name.clone(),
                None => labels::COMPLETED.to_string(),
            };
            self.steps[i].next_name = next;
        }
        self.steps
    }
}

fn display_name<'a>(name: &'a str, fallback: &'a str) -> &'a str {
    if name.is_empty() { fallback } else { name }
}

/// Compile a routine into its playback sequence
///
/// Accepts any structurally valid routine: empty lists and `rounds == 0`
/// simply produce fewer steps. Every rest slot gets a step, even at 0
/// seconds. Running totals saturate at `u32::MAX`. The routine itself is
/// never modified.
pub fn compile(routine: &Routine) -> Vec<Step> {
    let mut builder = SequenceBuilder::new();

    builder.push(
        Phase::Warmup,
        labels::READY,
        READY_DURATION_SECS,
        Activity::Ready,
        None,
    );

    for exercise in &routine.warmup {
        builder.push(
            Phase::Warmup,
            display_name(&exercise.name, labels::UNNAMED),
            exercise.duration,
            Activity::Work,
            None,
        );
    }

    let hiit = &routine.hiit;
    let exercise_count = hiit.exercises_per_round.len();
    for round in 1..=hiit.rounds {
        for (index, name) in hiit.exercises_per_round.iter().enumerate() {
            builder.push(
                Phase::Hiit,
                display_name(name, labels::HIIT_EXERCISE),
                hiit.work_duration,
                Activity::Work,
                Some(round),
            );

            let last_in_round = index + 1 == exercise_count;
            let last_round = round == hiit.rounds;

            if !last_in_round {
                builder.push(
                    Phase::Hiit,
                    labels::REST,
                    hiit.rest_between_exercises,
                    Activity::Rest,
                    Some(round),
                );
            } else if !last_round {
                builder.push(
                    Phase::Hiit,
                    labels::ROUND_BREAK,
                    hiit.rest_between_rounds,
                    Activity::Rest,
                    Some(round),
                );
            }
        }
    }

    for exercise in &routine.stretch {
        builder.push(
            Phase::Stretch,
            display_name(&exercise.name, labels::UNNAMED),
            exercise.duration,
            Activity::Work,
            None,
        );
    }

    builder.finish()
}

/// Total duration of the compiled sequence, computed from the routine
pub fn total_duration(routine: &Routine) -> u32 {
    checked_total_duration(routine).unwrap_or(u32::MAX)
}

/// Total duration, `None` when the sequence would not fit in a `u32`
pub fn checked_total_duration(routine: &Routine) -> Option<u32> {
    READY_DURATION_SECS.checked_add(routine.checked_content_duration()?)
}
