//! Core merge primitives for BOSS ES-8 patch documents.
//!
//! A patch is a fixed-schema record of scalar and fixed-length-list integer
//! fields (see [`fields::FIELDS`]). This crate provides the schema registry,
//! the [`patch::Patch`]/[`patch::Mask`] diff-and-upsert algebra that the
//! bulk editor's default layering is built on, the derived per-slot
//! [`assign::Assign`] view, and the fixed enum tables of the wire format.

pub mod assign;
pub mod fields;
pub mod mappings;
pub mod patch;

pub use assign::{Assign, AssignError, SourceParams, TargetParams};
pub use fields::{FieldKind, FieldSpec, FieldValue, ASSIGN_SLOTS, CTL_FUNC_SLOTS, FIELDS, PATCH_NAME_LEN};
pub use mappings::{EnumTable, MappingError};
pub use patch::{decode_patch_name, encode_patch_name, FieldError, Mask, Patch};
