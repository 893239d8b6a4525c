//! The patch collection and its default-layering engine.
//!
//! A [`PatchList`] owns every patch of a loaded backup plus a stack of
//! default *states*: a complete base patch followed by zero or more masks
//! for edits not yet folded back into the patches. Collapsing the stack
//! left-to-right through `update` yields the effective global default.
//!
//! Re-layering is the heart of the editor: when the default changes, each
//! patch's personal deviations are first isolated by diffing it against the
//! *previous* default, then re-applied on top of the new one. A field a
//! patch customized is never lost to a default change, and a field it never
//! touched always tracks the default.

use es8_core::assign::Assign;
use es8_core::fields::ASSIGN_SLOTS;
use es8_core::patch::{Mask, Patch};
use log::{info, warn};

use crate::error::EditorError;

/// Patches per bank on the unit.
pub const PATCHES_PER_BANK: usize = 8;
/// Banks on the unit.
pub const BANKS: usize = 100;

/// One entry of the default-state stack.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultState {
    /// A full patch promoted to the default (replaces everything below it).
    Complete(Patch),
    /// A sparse edit layered on whatever precedes it.
    Mask(Mask),
}

/// An ordered patch collection with a layered global default.
#[derive(Debug, Clone)]
pub struct PatchList {
    patches: Vec<Patch>,
    /// The default in force before any pending edits. Always complete.
    base_state: Patch,
    /// Edits not yet folded back into the patches, oldest first.
    pending: Vec<DefaultState>,
}

impl PatchList {
    /// Build a collection over `patches` with `initial_default` as the
    /// starting base: the factory patch, or a previously saved global
    /// default (resolved onto factory first if it was stored as a mask).
    pub fn new(patches: Vec<Patch>, initial_default: Patch) -> Self {
        PatchList { patches, base_state: initial_default, pending: Vec::new() }
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// The default state before the pending edits.
    pub fn initial_default_state(&self) -> &Patch {
        &self.base_state
    }

    /// Collapse the state stack into the effective global default.
    pub fn latest_default_state(&self) -> Patch {
        self.pending.iter().fold(self.base_state.clone(), |state, entry| match entry {
            DefaultState::Complete(patch) => state.update(&patch.to_mask()),
            DefaultState::Mask(mask) => state.update(mask),
        })
    }

    /// Map bank/patch coordinates to a flat index. Patches are numbered
    /// 1-8 within each bank; banks are 0-indexed.
    pub fn index_of(&self, bank: usize, patch: usize) -> Result<usize, EditorError> {
        if !(1..=PATCHES_PER_BANK).contains(&patch) {
            return Err(EditorError::PatchOutOfRange(patch));
        }
        if bank >= BANKS {
            return Err(EditorError::BankOutOfRange(bank));
        }
        let index = bank * PATCHES_PER_BANK + (patch - 1);
        if index >= self.patches.len() {
            return Err(EditorError::NotInBackup { bank, patch, len: self.patches.len() });
        }
        Ok(index)
    }

    pub fn get_patch(&self, bank: usize, patch: usize) -> Result<&Patch, EditorError> {
        Ok(&self.patches[self.index_of(bank, patch)?])
    }

    /// All twelve decoded assign views of the addressed patch.
    pub fn get_patch_assigns(&self, bank: usize, patch: usize) -> Result<Vec<Assign>, EditorError> {
        let p = self.get_patch(bank, patch)?;
        (1..=ASSIGN_SLOTS)
            .map(|number| p.get_assign(number).map_err(EditorError::from))
            .collect()
    }

    /// Promote the addressed patch to the global default. No-op if it
    /// already is the default; otherwise the full patch is pushed onto the
    /// state stack and the new collapsed default is returned.
    pub fn set_as_default(&mut self, bank: usize, patch: usize) -> Result<Option<Patch>, EditorError> {
        let candidate = self.get_patch(bank, patch)?.clone();
        if candidate == self.latest_default_state() {
            info!("patch {bank}:{patch} is already the default");
            return Ok(None);
        }
        info!("patch {bank}:{patch} pushed as the new default state");
        self.pending.push(DefaultState::Complete(candidate));
        Ok(Some(self.latest_default_state()))
    }

    /// True once a default other than factory has ever been established.
    fn has_custom_default(&self) -> bool {
        !self.pending.is_empty() || self.base_state != Patch::factory()
    }

    /// Fold the current default across every patch.
    ///
    /// With `factory` set, the factory patch is first pushed as the new
    /// default. Without it, a default must already exist. With `overwrite`
    /// set, every patch is replaced outright by the collapsed default.
    /// That path is destructive; callers should confirm before taking it.
    pub fn apply_default(&mut self, factory: bool, overwrite: bool) -> Result<(), EditorError> {
        if factory {
            self.pending.push(DefaultState::Complete(Patch::factory()));
        } else if !self.has_custom_default() {
            return Err(EditorError::NoDefaultSet);
        }

        if overwrite {
            warn!("overwriting all {} patches with the default state", self.patches.len());
            let latest = self.latest_default_state();
            self.patches = vec![latest.clone(); self.patches.len()];
            self.base_state = latest;
            self.pending.clear();
            return Ok(());
        }

        self.relayer();
        Ok(())
    }

    /// Re-apply the collapsed default across all patches, preserving each
    /// patch's deviations from the previous default.
    pub(crate) fn relayer(&mut self) {
        // Each patch's personal customization, relative to the default that
        // was in force before the pending edits.
        let masks: Vec<Mask> =
            self.patches.iter().map(|patch| self.base_state.diff(patch)).collect();

        // Collapse the stack, grounded on factory so every field is
        // populated even if the loaded base was sparse.
        let new_base = Patch::factory().update(&self.latest_default_state().to_mask());

        self.patches = masks.iter().map(|mask| new_base.update(mask)).collect();
        info!("re-applied default across {} patches", self.patches.len());

        self.base_state = new_base;
        self.pending.clear();
    }

    pub(crate) fn push_mask(&mut self, mask: Mask) {
        self.pending.push(DefaultState::Mask(mask));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use es8_core::FieldValue;
    use serde_json::json;

    fn collection(n: usize) -> PatchList {
        PatchList::new(vec![Patch::factory(); n], Patch::factory())
    }

    #[test]
    fn index_mapping() {
        let list = collection(800);
        assert_eq!(list.index_of(0, 1).unwrap(), 0);
        assert_eq!(list.index_of(32, 4).unwrap(), 260);
        assert_eq!(list.index_of(99, 8).unwrap(), 799);
    }

    #[test]
    fn index_mapping_rejects_bad_coordinates() {
        let list = collection(16);
        assert!(matches!(list.index_of(0, 0), Err(EditorError::PatchOutOfRange(0))));
        assert!(matches!(list.index_of(0, 9), Err(EditorError::PatchOutOfRange(9))));
        assert!(matches!(list.index_of(100, 1), Err(EditorError::BankOutOfRange(100))));
        assert!(matches!(list.index_of(2, 1), Err(EditorError::NotInBackup { .. })));
    }

    #[test]
    fn patch_assigns_enumerate_all_slots() {
        let list = collection(8);
        let assigns = list.get_patch_assigns(0, 1).unwrap();
        assert_eq!(assigns.len(), ASSIGN_SLOTS);
        assert_eq!(assigns[0].assign_number, 1);
        assert_eq!(assigns[11].assign_number, 12);
    }

    #[test]
    fn set_as_default_noop_when_equal() {
        let mut list = collection(8);
        assert!(list.set_as_default(0, 3).unwrap().is_none());
        assert!(list.pending.is_empty());
    }

    #[test]
    fn set_as_default_pushes_full_patch() {
        let mut list = collection(8);
        let custom = Patch::from_value(&json!({"ID_PATCH_MASTER_BPM": 140})).unwrap();
        list.patches[2] = custom.clone();

        let new_default = list.set_as_default(0, 3).unwrap().expect("state should change");
        assert_eq!(new_default, custom);
        assert_eq!(list.latest_default_state(), custom);
    }

    #[test]
    fn apply_default_requires_an_established_default() {
        let mut list = collection(8);
        assert!(matches!(list.apply_default(false, false), Err(EditorError::NoDefaultSet)));
        list.apply_default(true, false).unwrap();
    }

    #[test]
    fn overwrite_replaces_every_patch() {
        let mut list = collection(8);
        let custom = Patch::from_value(&json!({"ID_PATCH_MASTER_BPM": 77})).unwrap();
        list.patches[5] = custom.clone();
        list.set_as_default(0, 6).unwrap();

        list.apply_default(false, true).unwrap();
        assert!(list.patches.iter().all(|p| *p == custom));
        assert!(list.pending.is_empty());
        assert_eq!(*list.initial_default_state(), custom);
    }

    #[test]
    fn relayer_preserves_per_patch_deviations() {
        let mut list = collection(8);
        // Patch 0:2 carries its own name and loop switches.
        list.patches[1] = Patch::from_value(&json!({
            "ID_PATCH_NAME": [76, 69, 65, 68, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32, 32],
            "ID_PATCH_LOOP_SW_LOOP": [0, 1, 0, 0, 0, 0, 0, 0, 0]
        }))
        .unwrap();

        // New default changes the BPM for everyone.
        list.patches[7] = Patch::from_value(&json!({"ID_PATCH_MASTER_BPM": 98})).unwrap();
        list.set_as_default(0, 8).unwrap();
        list.apply_default(false, false).unwrap();

        let p = &list.patches()[1];
        assert_eq!(p.patch_name(), "LEAD");
        assert_eq!(p.field("ID_PATCH_MASTER_BPM"), Some(&FieldValue::Scalar(Some(98))));
        let Some(FieldValue::List(loops)) = p.field("ID_PATCH_LOOP_SW_LOOP") else {
            panic!("expected loop switches");
        };
        assert_eq!(loops[1], Some(1));
        // Untouched patches now equal the new default exactly.
        assert_eq!(list.patches()[0], list.latest_default_state());
    }
}
