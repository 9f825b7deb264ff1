// Routine edits - In-place mutations issued by the settings form
//
// Every edit returns whether something changed so the controller knows
// when the compiled sequence has to be rebuilt.

use super::types::{Exercise, Routine};

/// The two editable exercise lists of a routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseList {
    Warmup,
    Stretch,
}

impl Routine {
    pub fn exercises(&self, list: PhaseList) -> &[Exercise] {
        match list {
            PhaseList::Warmup => &self.warmup,
            PhaseList::Stretch => &self.stretch,
        }
    }

    fn exercises_mut(&mut self, list: PhaseList) -> &mut Vec<Exercise> {
        match list {
            PhaseList::Warmup => &mut self.warmup,
            PhaseList::Stretch => &mut self.stretch,
        }
    }

    /// Append an unnamed exercise and return its id
    pub fn add_exercise(&mut self, list: PhaseList, duration: u32) -> String {
        let exercise = Exercise::new("", duration);
        let id = exercise.id.clone();
        self.exercises_mut(list).push(exercise);
        id
    }

    pub fn remove_exercise(&mut self, list: PhaseList, id: &str) -> bool {
        let exercises = self.exercises_mut(list);
        let before = exercises.len();
        exercises.retain(|e| e.id != id);
        exercises.len() != before
    }

    pub fn rename_exercise(&mut self, list: PhaseList, id: &str, name: &str) -> bool {
        match self.exercises_mut(list).iter_mut().find(|e| e.id == id) {
            Some(exercise) if exercise.name != name => {
                exercise.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_exercise_duration(&mut self, list: PhaseList, id: &str, duration: u32) -> bool {
        match self.exercises_mut(list).iter_mut().find(|e| e.id == id) {
            Some(exercise) if exercise.duration != duration => {
                exercise.duration = duration;
                true
            }
            _ => false,
        }
    }

    pub fn add_hiit_exercise(&mut self, name: impl Into<String>) {
        self.hiit.exercises_per_round.push(name.into());
    }

    pub fn remove_hiit_exercise(&mut self, index: usize) -> bool {
        if index < self.hiit.exercises_per_round.len() {
            self.hiit.exercises_per_round.remove(index);
            true
        } else {
            false
        }
    }

    pub fn rename_hiit_exercise(&mut self, index: usize, name: &str) -> bool {
        match self.hiit.exercises_per_round.get_mut(index) {
            Some(current) if current != name => {
                *current = name.to_string();
                true
            }
            _ => false,
        }
    }
}
