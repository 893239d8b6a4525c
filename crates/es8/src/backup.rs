//! Backup-document handling.
//!
//! A bulk backup is a JSON object whose `patch` key holds the ordered patch
//! array (up to 800 records). Other top-level entries are carried through
//! untouched so a round-trip edits only what the engine changed.

use es8_core::patch::Patch;
use serde_json::{Map, Value};

use crate::error::EditorError;

/// Key of the patch array within the backup document.
pub const PATCH_KEY: &str = "patch";

/// A parsed backup document: the patch records plus the rest of the
/// document verbatim.
#[derive(Debug, Clone)]
pub struct Backup {
    pub patches: Vec<Patch>,
    doc: Map<String, Value>,
}

impl Backup {
    pub fn from_value(value: &Value) -> Result<Self, EditorError> {
        let doc = value.as_object().ok_or(EditorError::MalformedBackup)?;
        let entries = doc
            .get(PATCH_KEY)
            .and_then(Value::as_array)
            .ok_or(EditorError::MalformedBackup)?;
        let patches = entries
            .iter()
            .map(Patch::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Backup { patches, doc: doc.clone() })
    }

    /// Serialize with the current patches substituted into the document.
    pub fn to_value(&self) -> Value {
        let mut doc = self.doc.clone();
        doc.insert(
            PATCH_KEY.to_string(),
            Value::Array(self.patches.iter().map(Patch::to_value).collect()),
        );
        Value::Object(doc)
    }
}

/// Load a stored global default. A defaults document may be a full patch or
/// a mask saved from an earlier session; a mask-shaped one is applied onto
/// the factory default so the result is always complete.
pub fn resolve_global_defaults(value: &Value) -> Result<Patch, EditorError> {
    let loaded = Patch::from_value(value)?;
    if loaded.is_mask() {
        Ok(Patch::factory().update(&loaded.to_mask()))
    } else {
        Ok(loaded)
    }
}
