//! es8 — default-layering engine for BOSS ES-8 bulk backups.
//!
//! Sits on top of [`es8_core`]'s mask/update algebra: load a backup into a
//! [`PatchList`], mutate the global default (promote a patch, set an assign
//! slot), and the engine re-applies the default across all patches while
//! preserving each patch's own deviations.

pub mod assign_update;
pub mod backup;
pub mod error;
pub mod patch_list;

pub use assign_update::build_assign_mask;
pub use backup::{resolve_global_defaults, Backup};
pub use error::EditorError;
pub use patch_list::{DefaultState, PatchList, BANKS, PATCHES_PER_BANK};
