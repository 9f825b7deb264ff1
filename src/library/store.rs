// Routine library - Keyed collection of saved routines persisted as JSON
//
// Every mutation is written through to disk before the in-memory list is
// replaced, so a failed write leaves the library exactly as it was.

use super::transfer::{TransferError, parse_routine};
use crate::routine::{Routine, format_duration, generate_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No saved routine with id '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

/// On-disk document
#[derive(Debug, Serialize, Deserialize)]
struct LibraryDocument {
    updated: DateTime<Utc>,
    routines: Vec<Routine>,
}

/// Bare arrays are what older exports of the library look like
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredLibrary {
    Document(LibraryDocument),
    Bare(Vec<Routine>),
}

#[derive(Debug, Default)]
pub struct RoutineLibrary {
    /// None keeps the library in memory only
    path: Option<PathBuf>,
    routines: Vec<Routine>,
}

impl RoutineLibrary {
    /// `<data dir>/hiit_timer/routines.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("hiit_timer").join("routines.json"))
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the library at `path`; a missing file is an empty library
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LibraryError> {
        let path = path.as_ref().to_path_buf();

        let routines = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<StoredLibrary>(&contents)? {
                StoredLibrary::Document(doc) => doc.routines,
                StoredLibrary::Bare(routines) => routines,
            }
        } else {
            Vec::new()
        };

        log::info!(
            "Routine library {} ({} saved)",
            path.display(),
            routines.len()
        );

        Ok(Self {
            path: Some(path),
            routines,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn list(&self) -> &[Routine] {
        &self.routines
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    /// Save `routine`: replace the entry with the same id, or store it as a
    /// new entry under a fresh id. Returns the routine as stored.
    pub fn upsert(&mut self, routine: &Routine) -> Result<Routine, LibraryError> {
        let mut next = self.routines.clone();

        let stored = match next.iter_mut().find(|r| r.id == routine.id) {
            Some(existing) => {
                *existing = routine.clone();
                routine.clone()
            }
            None => {
                let mut fresh = routine.clone();
                fresh.id = generate_id();
                next.push(fresh.clone());
                fresh
            }
        };

        self.commit(next)?;
        log::info!("Saved routine '{}' ({})", stored.name, stored.id);
        Ok(stored)
    }

    /// Remove the routine with `id`; returns whether one was removed
    pub fn delete(&mut self, id: &str) -> Result<bool, LibraryError> {
        let next: Vec<Routine> = self
            .routines
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();

        if next.len() == self.routines.len() {
            return Ok(false);
        }

        self.commit(next)?;
        log::info!("Deleted routine {}", id);
        Ok(true)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), LibraryError> {
        let mut next = self.routines.clone();
        let routine = next
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        routine.name = name.to_string();
        self.commit(next)
    }

    /// Validate an exchanged document and append it under a fresh id
    pub fn import_json(&mut self, json: &str) -> Result<Routine, LibraryError> {
        let mut routine = parse_routine(json)?;
        routine.id = generate_id();

        let mut next = self.routines.clone();
        next.push(routine.clone());
        self.commit(next)?;

        log::info!("Imported routine '{}' ({})", routine.name, routine.id);
        Ok(routine)
    }

    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Routine, LibraryError> {
        let contents = std::fs::read_to_string(path).map_err(TransferError::Io)?;
        self.import_json(&contents)
    }

    fn commit(&mut self, next: Vec<Routine>) -> Result<(), LibraryError> {
        if let Some(path) = &self.path {
            Self::persist(path, &next)?;
        }
        self.routines = next;
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the library file
    fn persist(path: &Path, routines: &[Routine]) -> Result<(), LibraryError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let doc = LibraryDocument {
            updated: Utc::now(),
            routines: routines.to_vec(),
        };
        let json = serde_json::to_string_pretty(&doc)?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

/// One-line description for library listings
pub fn summary(routine: &Routine) -> String {
    format!(
        "DUR: {} · ROUNDS: {}",
        format_duration(routine.content_duration()),
        routine.hiit.rounds
    )
}
