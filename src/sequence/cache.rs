// Sequence cache - Memoizes the last compiled sequence by routine content hash
//
// Only the parts that shape the sequence are hashed: renaming a routine or
// changing its id is a hit. A hit returns exactly what `compile` would.

use super::compiler::compile;
use super::step::Step;
use crate::routine::Routine;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Default)]
pub struct SequenceCache {
    key: Option<u64>,
    steps: Vec<Step>,
    hits: u64,
    misses: u64,
}

impl SequenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn content_hash(routine: &Routine) -> u64 {
        let mut hasher = DefaultHasher::new();
        routine.warmup.hash(&mut hasher);
        routine.hiit.hash(&mut hasher);
        routine.stretch.hash(&mut hasher);
        hasher.finish()
    }

    /// Recompile when the content changed; `None` means the cached
    /// sequence is still current
    pub fn compile_if_changed(&mut self, routine: &Routine) -> Option<&[Step]> {
        let key = Self::content_hash(routine);
        if self.key == Some(key) {
            self.hits += 1;
            return None;
        }
        self.steps = compile(routine);
        self.key = Some(key);
        self.misses += 1;
        Some(&self.steps)
    }

    /// Return the sequence for `routine`, compiling only when the content changed
    pub fn get_or_compile(&mut self, routine: &Routine) -> &[Step] {
        let key = Self::content_hash(routine);
        if self.key == Some(key) {
            self.hits += 1;
        } else {
            self.steps = compile(routine);
            self.key = Some(key);
            self.misses += 1;
        }
        &self.steps
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
