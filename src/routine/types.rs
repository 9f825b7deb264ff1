// Types for routine definition and exchange

use serde::{Deserialize, Serialize};

/// A single timed exercise of the warm-up or stretch list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise identifier (unique within its routine)
    #[serde(default)]
    pub id: String,
    /// Display name (may be empty)
    #[serde(default)]
    pub name: String,
    /// Duration in seconds
    pub duration: u32,
}

impl Exercise {
    pub fn new(name: impl Into<String>, duration: u32) -> Self {
        Self {
            id: super::generate_id(),
            name: name.into(),
            duration,
        }
    }

    /// Create an exercise with an explicit id (fixtures, default routine)
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, duration: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
        }
    }
}

/// HIIT block configuration
///
/// Every round runs through `exercises_per_round` in order. Rest durations are
/// inserted between exercises and between rounds, never after the last
/// exercise of the last round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiitConfig {
    /// Number of rounds
    pub rounds: u32,
    /// Exercise names, in order, performed every round
    pub exercises_per_round: Vec<String>,
    /// Work interval in seconds
    pub work_duration: u32,
    /// Rest between two exercises of the same round, in seconds
    pub rest_between_exercises: u32,
    /// Rest between two rounds, in seconds
    pub rest_between_rounds: u32,
}

impl HiitConfig {
    /// Total duration of the block in seconds, saturating at `u32::MAX`
    pub fn total_duration(&self) -> u32 {
        self.checked_total_duration().unwrap_or(u32::MAX)
    }

    /// Total duration of the block, `None` when it does not fit in a `u32`
    ///
    /// Every rest slot is counted, including zero-length ones.
    pub fn checked_total_duration(&self) -> Option<u32> {
        let exercises = u32::try_from(self.exercises_per_round.len()).ok()?;
        if self.rounds == 0 || exercises == 0 {
            return Some(0);
        }

        let work = self
            .rounds
            .checked_mul(exercises)?
            .checked_mul(self.work_duration)?;
        let exercise_rests = self
            .rounds
            .checked_mul(exercises - 1)?
            .checked_mul(self.rest_between_exercises)?;
        let round_rests = (self.rounds - 1).checked_mul(self.rest_between_rounds)?;

        work.checked_add(exercise_rests)?.checked_add(round_rests)
    }

    /// Whether the block produces at least one step
    pub fn is_empty(&self) -> bool {
        self.rounds == 0 || self.exercises_per_round.is_empty()
    }
}

impl Default for HiitConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            exercises_per_round: vec![
                "Burpees".to_string(),
                "Squats".to_string(),
                "Push-ups".to_string(),
                "Mountain climbers".to_string(),
            ],
            work_duration: 40,
            rest_between_exercises: 20,
            rest_between_rounds: 60,
        }
    }
}

/// User-authored workout routine
///
/// This is the only entity that is persisted and exchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Routine {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub warmup: Vec<Exercise>,
    pub hiit: HiitConfig,
    pub stretch: Vec<Exercise>,
}

impl Routine {
    /// Sum of warm-up exercise durations
    pub fn warmup_duration(&self) -> u32 {
        sum_durations(&self.warmup).unwrap_or(u32::MAX)
    }

    /// Sum of stretch exercise durations
    pub fn stretch_duration(&self) -> u32 {
        sum_durations(&self.stretch).unwrap_or(u32::MAX)
    }

    /// Duration of the authored content (without the synthetic ready step)
    pub fn content_duration(&self) -> u32 {
        self.checked_content_duration().unwrap_or(u32::MAX)
    }

    /// Content duration, `None` when it does not fit in a `u32`
    pub fn checked_content_duration(&self) -> Option<u32> {
        sum_durations(&self.warmup)?
            .checked_add(self.hiit.checked_total_duration()?)?
            .checked_add(sum_durations(&self.stretch)?)
    }
}

fn sum_durations(exercises: &[Exercise]) -> Option<u32> {
    exercises
        .iter()
        .try_fold(0u32, |total, e| total.checked_add(e.duration))
}

impl Default for Routine {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "STARTER PROTOCOL".to_string(),
            warmup: vec![
                Exercise::with_id("w1", "Jumping jacks", 30),
                Exercise::with_id("w2", "Arm circles", 20),
                Exercise::with_id("w3", "High knees", 30),
            ],
            hiit: HiitConfig::default(),
            stretch: vec![
                Exercise::with_id("s1", "Quad stretch", 30),
                Exercise::with_id("s2", "Hamstring stretch", 30),
                Exercise::with_id("s3", "Shoulder stretch", 20),
            ],
        }
    }
}
