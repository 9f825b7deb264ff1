// Routine generator - Builds a complete routine from a few targets
//
// Randomness is injected by the caller; a seeded StdRng gives a
// reproducible routine.

pub mod pool;

use crate::routine::{Exercise, HiitConfig, Routine};
use pool::Category;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Exercises in the generated warm-up and stretch lists
const LIST_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyTarget {
    Upper,
    Lower,
    #[default]
    Full,
}

impl BodyTarget {
    pub const ALL: [BodyTarget; 3] = [BodyTarget::Upper, BodyTarget::Lower, BodyTarget::Full];

    pub fn label(&self) -> &'static str {
        match self {
            BodyTarget::Upper => "UPPER",
            BodyTarget::Lower => "LOWER",
            BodyTarget::Full => "FULL",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            BodyTarget::Upper => pool::UPPER_KEYWORDS,
            BodyTarget::Lower => pool::LOWER_KEYWORDS,
            BodyTarget::Full => &[],
        }
    }

    fn hiit_category(&self) -> Category {
        match self {
            BodyTarget::Upper => pool::UPPER_BODY,
            BodyTarget::Lower => pool::LOWER_BODY,
            BodyTarget::Full => pool::HIIT,
        }
    }
}

impl fmt::Display for BodyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub target: BodyTarget,
    pub warmup_minutes: u32,
    pub hiit_minutes: u32,
    pub stretch_minutes: u32,
    pub rounds: u32,
    pub work_secs: u32,
    pub rest_exercise_secs: u32,
    pub rest_round_secs: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            target: BodyTarget::Full,
            warmup_minutes: 5,
            hiit_minutes: 15,
            stretch_minutes: 5,
            rounds: 3,
            work_secs: 40,
            rest_exercise_secs: 20,
            rest_round_secs: 60,
        }
    }
}

impl GeneratorOptions {
    pub fn total_minutes(&self) -> u32 {
        self.warmup_minutes + self.hiit_minutes + self.stretch_minutes
    }

    /// How many exercises fit one round of the HIIT block (at least one)
    pub fn exercises_per_round(&self) -> usize {
        let rounds = self.rounds.max(1) as f64;
        let hiit_secs = (self.hiit_minutes * 60) as f64;
        let round_breaks = (rounds - 1.0) * self.rest_round_secs as f64;
        let per_round = (hiit_secs - round_breaks) / rounds;

        let slot = (self.work_secs + self.rest_exercise_secs) as f64;
        if slot <= 0.0 {
            return 1;
        }
        let count = ((per_round + self.rest_exercise_secs as f64) / slot).round();
        if count.is_finite() && count > 1.0 {
            count as usize
        } else {
            1
        }
    }
}

/// Pick up to `limit` distinct names from `category`, preferring those that
/// match `keywords` and topping up from the rest of the category.
fn pick<R: Rng + ?Sized>(
    rng: &mut R,
    category: &Category,
    keywords: &[&str],
    limit: usize,
) -> Vec<&'static str> {
    let mut pool = pool::filter_by_keywords(category, keywords);
    if pool.len() < limit {
        let missing: Vec<_> = category
            .exercises
            .iter()
            .copied()
            .filter(|name| !pool.contains(name))
            .collect();
        pool.extend(missing);
    }

    pool.shuffle(rng);
    pool.truncate(limit);
    pool
}

fn timed_list<R: Rng + ?Sized>(
    rng: &mut R,
    category: &Category,
    keywords: &[&str],
    minutes: u32,
) -> Vec<Exercise> {
    let duration = minutes * 60 / LIST_LENGTH as u32;
    pick(rng, category, keywords, LIST_LENGTH)
        .into_iter()
        .map(|name| Exercise::new(name, duration))
        .collect()
}

/// Generate a routine matching `options`
pub fn generate<R: Rng + ?Sized>(options: &GeneratorOptions, rng: &mut R) -> Routine {
    let keywords = options.target.keywords();

    let warmup = timed_list(rng, &pool::WARMUP, keywords, options.warmup_minutes);

    let hiit_names = pick(
        rng,
        &options.target.hiit_category(),
        keywords,
        options.exercises_per_round(),
    );

    let stretch = timed_list(rng, &pool::COOLDOWN, keywords, options.stretch_minutes);

    let routine = Routine {
        id: format!("gen-{}", chrono::Utc::now().timestamp_millis()),
        name: format!(
            "{} PROTOCOL {} MIN",
            options.target,
            options.total_minutes()
        ),
        warmup,
        hiit: HiitConfig {
            rounds: options.rounds,
            exercises_per_round: hiit_names.into_iter().map(String::from).collect(),
            work_duration: options.work_secs,
            rest_between_exercises: options.rest_exercise_secs,
            rest_between_rounds: options.rest_round_secs,
        },
        stretch,
    };

    log::info!(
        "Generated '{}' ({} HIIT exercises per round)",
        routine.name,
        routine.hiit.exercises_per_round.len()
    );
    routine
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_options_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let routine = generate(&GeneratorOptions::default(), &mut rng);

        assert_eq!(routine.name, "FULL PROTOCOL 25 MIN");
        assert!(routine.id.starts_with("gen-"));
        assert_eq!(routine.warmup.len(), 6);
        assert_eq!(routine.stretch.len(), 6);
        assert!(routine.warmup.iter().all(|e| e.duration == 50));
        assert!(routine.stretch.iter().all(|e| e.duration == 50));

        // (900 - 120) / 3 = 260 per round; (260 + 20) / 60 = 4.67 -> 5
        assert_eq!(routine.hiit.exercises_per_round.len(), 5);
        assert_eq!(routine.hiit.rounds, 3);
        assert_eq!(routine.hiit.work_duration, 40);
    }

    #[test]
    fn test_same_seed_same_exercises() {
        let options = GeneratorOptions {
            target: BodyTarget::Lower,
            ..GeneratorOptions::default()
        };
        let a = generate(&options, &mut StdRng::seed_from_u64(42));
        let b = generate(&options, &mut StdRng::seed_from_u64(42));

        assert_eq!(a.hiit.exercises_per_round, b.hiit.exercises_per_round);
        let names = |r: &Routine| r.warmup.iter().map(|e| e.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_names_are_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        let routine = generate(&GeneratorOptions::default(), &mut rng);
        let mut names = routine.hiit.exercises_per_round.clone();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), routine.hiit.exercises_per_round.len());
    }

    #[test]
    fn test_upper_target_prefers_matching_exercises() {
        let options = GeneratorOptions {
            target: BodyTarget::Upper,
            ..GeneratorOptions::default()
        };
        let routine = generate(&options, &mut StdRng::seed_from_u64(11));
        let matching = pool::filter_by_keywords(&pool::WARMUP, pool::UPPER_KEYWORDS);

        // At least six upper-body warm-ups exist, so no top-up is needed
        assert!(matching.len() >= 6);
        assert!(
            routine
                .warmup
                .iter()
                .all(|e| matching.contains(&e.name.as_str()))
        );
        assert_eq!(routine.name, "UPPER PROTOCOL 25 MIN");
    }

    #[test]
    fn test_exercise_count_has_floor_of_one() {
        let options = GeneratorOptions {
            hiit_minutes: 1,
            rounds: 4,
            rest_round_secs: 60,
            ..GeneratorOptions::default()
        };
        assert_eq!(options.exercises_per_round(), 1);
    }
}
