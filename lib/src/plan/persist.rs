//! Plan persistence: compact binary (bincode) and JSON documents.

use super::TransformPlan;
use crate::config::TreatmentConfig;
use crate::error::{Result, TreatmentError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Types persisted as bincode byte buffers.
///
/// Implementors hold only plain data (numbers, strings, maps), never
/// borrowed state.
pub trait BinaryFormat: Serialize + DeserializeOwned {
    /// Serialize into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl BinaryFormat for TransformPlan {}
impl BinaryFormat for TreatmentConfig {}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl TransformPlan {
    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the plan; `.json` paths get JSON, anything else bincode.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = if is_json_path(path) {
            self.to_json()?.into_bytes()
        } else {
            self.to_bytes()?
        };
        std::fs::write(path, bytes)?;
        tracing::info!(path = %path.display(), "saved transform plan");
        Ok(())
    }

    /// Read a plan written by [`save_to_file`](Self::save_to_file).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let plan = if is_json_path(path) {
            let text = String::from_utf8(bytes)
                .map_err(|e| TreatmentError::Serialization(e.to_string()))?;
            Self::from_json(&text)?
        } else {
            Self::from_bytes(&bytes)?
        };
        tracing::debug!(
            path = %path.display(),
            columns = plan.selected().len(),
            "loaded transform plan"
        );
        Ok(plan)
    }
}
