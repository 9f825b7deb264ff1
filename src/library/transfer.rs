// Routine import/export as standalone JSON files
//
// Import goes through a structural gate first: the document must be an
// object with truthy `warmup`, `hiit` and `stretch` fields. Only then is
// it decoded into a Routine, which is refused when its total duration
// does not fit in a u32.

use crate::routine::Routine;
use crate::sequence::checked_total_duration;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// File stem used when the routine has no name
pub const DEFAULT_EXPORT_NAME: &str = "MY HIIT ROUTINE";

const REQUIRED_FIELDS: [&str; 3] = ["warmup", "hiit", "stretch"];

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("File is not valid JSON: {0}")]
    Parse(serde_json::Error),

    #[error("Unrecognized routine format: {0}")]
    Format(String),

    #[error("Serialization error: {0}")]
    Serialize(serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JavaScript truthiness, which the exchange format was defined with
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Validate and decode a routine document
pub fn parse_routine(json: &str) -> Result<Routine, TransferError> {
    let value: Value = serde_json::from_str(json).map_err(TransferError::Parse)?;

    let object = value
        .as_object()
        .ok_or_else(|| TransferError::Format("expected a JSON object".to_string()))?;

    for field in REQUIRED_FIELDS {
        if !object.get(field).is_some_and(is_truthy) {
            return Err(TransferError::Format(format!(
                "missing or empty '{}' field",
                field
            )));
        }
    }

    let routine: Routine =
        serde_json::from_value(value).map_err(|e| TransferError::Format(e.to_string()))?;

    if checked_total_duration(&routine).is_none() {
        return Err(TransferError::Format(
            "total duration exceeds the supported range".to_string(),
        ));
    }
    Ok(routine)
}

pub fn read_routine<P: AsRef<Path>>(path: P) -> Result<Routine, TransferError> {
    let contents = std::fs::read_to_string(path)?;
    parse_routine(&contents)
}

/// Pretty-printed JSON with exactly the routine fields
pub fn to_json(routine: &Routine) -> Result<String, TransferError> {
    serde_json::to_string_pretty(routine).map_err(TransferError::Serialize)
}

/// "Full Body Blast" -> "Full_Body_Blast.json"
pub fn export_file_name(routine: &Routine) -> String {
    let name = routine.name.trim();
    let name = if name.is_empty() {
        DEFAULT_EXPORT_NAME
    } else {
        name
    };

    let mut stem = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') && !c.is_control() {
            stem.push(c);
        }
    }

    if stem.is_empty() || stem.chars().all(|c| c == '.' || c == '_') {
        stem = DEFAULT_EXPORT_NAME.replace(' ', "_");
    }

    format!("{}.json", stem)
}

pub fn write_routine<P: AsRef<Path>>(routine: &Routine, path: P) -> Result<(), TransferError> {
    std::fs::write(path, to_json(routine)?)?;
    Ok(())
}

/// Export into `dir` under the routine's file name, returning the path written
pub fn export_to_dir<P: AsRef<Path>>(routine: &Routine, dir: P) -> Result<PathBuf, TransferError> {
    let path = dir.as_ref().join(export_file_name(routine));
    write_routine(routine, &path)?;
    log::info!("Exported routine '{}' to {}", routine.name, path.display());
    Ok(path)
}
