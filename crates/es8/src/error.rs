//! Errors surfaced by the layering engine and workflows.

use es8_core::{AssignError, FieldError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// The targeted assign slot already deviates from factory in the
    /// current global default. Recoverable: re-invoke with force, or pick
    /// another slot.
    #[error("assign {0} already has a default set; pass force to overwrite it")]
    OverridesDefault(usize),
    /// A non-factory apply was requested before any default was ever
    /// established.
    #[error("no default patch has been set; set one or apply the factory default")]
    NoDefaultSet,
    #[error("patch number out of range 1-8: {0}")]
    PatchOutOfRange(usize),
    #[error("bank out of range 0-99: {0}")]
    BankOutOfRange(usize),
    #[error("patch {bank}:{patch} is outside the loaded backup ({len} patches)")]
    NotInBackup { bank: usize, patch: usize, len: usize },
    #[error("param {0} does not address a per-assign field")]
    InvalidAssignParam(String),
    #[error("backup document must be an object with a \"patch\" array")]
    MalformedBackup,
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Assign(#[from] AssignError),
}
