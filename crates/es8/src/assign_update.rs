//! The assign-mutation workflow.
//!
//! An assign update is a one-slot edit across the parallel 12-wide assign
//! fields, expressed as a mask so it layers onto the global default without
//! disturbing anything else. Setting an assign also enables its switch, and
//! sourcing it from one of the unit's own footswitches turns that
//! footswitch's ordinary control function off so the two cannot fight.

use es8_core::fields::{
    self, FieldKind, FieldValue, ASSIGN_SLOTS, CTL_FUNC_SLOTS, ID_PATCH_ASSIGN_MODE,
    ID_PATCH_ASSIGN_SOURCE, ID_PATCH_ASSIGN_SW, ID_PATCH_ASSIGN_TARGET, ID_PATCH_CTL_FUNC,
};
use es8_core::mappings::{self, EnumTable};
use es8_core::patch::{Mask, Patch};
use es8_core::AssignError;
use indexmap::IndexMap;
use log::info;

use crate::error::EditorError;
use crate::patch_list::PatchList;

/// A list with a single set element.
fn sparse_slot(len: usize, index: usize, value: i64) -> FieldValue {
    let mut items = vec![None; len];
    items[index] = Some(value);
    FieldValue::List(items)
}

/// Build the mask for one assign change: source/target/mode at the slot,
/// the slot switch enabled, caller params at the same slot, and, for a
/// footswitch source, that footswitch's control function turned off.
pub fn build_assign_mask(
    assign_number: usize,
    source: &str,
    mode: &str,
    target: &str,
    params: &IndexMap<String, i64>,
) -> Result<Mask, EditorError> {
    if !(1..=ASSIGN_SLOTS).contains(&assign_number) {
        return Err(AssignError::NumberOutOfRange(assign_number).into());
    }
    let index = assign_number - 1;

    let source_value = EnumTable::Source.encode(source).map_err(AssignError::from)?;
    let target_value = EnumTable::Target.encode(target).map_err(AssignError::from)?;
    let mode_value = EnumTable::Mode.encode(mode).map_err(AssignError::from)?;

    let mut mask = Mask::new();
    mask.set(ID_PATCH_ASSIGN_SOURCE, sparse_slot(ASSIGN_SLOTS, index, source_value))?;
    mask.set(ID_PATCH_ASSIGN_TARGET, sparse_slot(ASSIGN_SLOTS, index, target_value))?;
    mask.set(ID_PATCH_ASSIGN_MODE, sparse_slot(ASSIGN_SLOTS, index, mode_value))?;
    mask.set(ID_PATCH_ASSIGN_SW, sparse_slot(ASSIGN_SLOTS, index, 1))?;

    for (name, value) in params {
        let spec = fields::spec_of(name)
            .filter(|spec| spec.kind == FieldKind::List(ASSIGN_SLOTS))
            .ok_or_else(|| EditorError::InvalidAssignParam(name.clone()))?;
        mask.set(spec.name, sparse_slot(ASSIGN_SLOTS, index, *value))?;
    }

    if let Some(footswitch) = mappings::footswitch_index(source) {
        let off = EnumTable::CtlFunc.encode("OFF").map_err(AssignError::from)?;
        mask.set(ID_PATCH_CTL_FUNC, sparse_slot(CTL_FUNC_SLOTS, footswitch, off))?;
    }

    Ok(mask)
}

impl PatchList {
    /// Set a global assign default and fold it across every patch.
    ///
    /// If the targeted slot already deviates from factory in the current
    /// default, the change is refused unless `force` is set: an
    /// intentionally configured default should not vanish under an
    /// accidental second edit. Returns the refreshed patches and the new
    /// collapsed default.
    pub fn update_assign(
        &mut self,
        assign_number: usize,
        source: &str,
        mode: &str,
        target: &str,
        params: &IndexMap<String, i64>,
        force: bool,
    ) -> Result<(Vec<Patch>, Patch), EditorError> {
        let mask = build_assign_mask(assign_number, source, mode, target, params)?;

        let current = self.latest_default_state().get_assign(assign_number)?;
        let factory = Patch::factory().get_assign(assign_number)?;
        if current != factory && !force {
            return Err(EditorError::OverridesDefault(assign_number));
        }

        info!("assign {assign_number}: {source} -> {target} ({mode})");
        self.push_mask(mask);
        self.relayer();
        Ok((self.patches().to_vec(), self.latest_default_state()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_touches_only_the_addressed_slot() {
        let mask = build_assign_mask(4, "EXP1", "MOM", "LOOP: L1", &IndexMap::new()).unwrap();
        assert_eq!(mask.len(), 4);
        let Some(FieldValue::List(sources)) = mask.get(ID_PATCH_ASSIGN_SOURCE) else {
            panic!("expected source list");
        };
        assert_eq!(sources[3], Some(17));
        assert!(sources.iter().enumerate().all(|(i, v)| i == 3 || v.is_none()));
        let Some(FieldValue::List(switches)) = mask.get(ID_PATCH_ASSIGN_SW) else {
            panic!("expected switch list");
        };
        assert_eq!(switches[3], Some(1));
    }

    #[test]
    fn footswitch_source_disables_its_ctl_func() {
        let mask = build_assign_mask(1, "Num3", "TGL", "LOOP: L2", &IndexMap::new()).unwrap();
        let Some(FieldValue::List(funcs)) = mask.get(ID_PATCH_CTL_FUNC) else {
            panic!("expected ctl func entry");
        };
        // Num3 is the seventh footswitch; OFF encodes to 0.
        assert_eq!(funcs[6], Some(0));
        assert_eq!(funcs.iter().filter(|v| v.is_some()).count(), 1);
    }

    #[test]
    fn non_footswitch_source_leaves_ctl_func_alone() {
        let mask = build_assign_mask(1, "EXP2", "MOM", "LOOP: L3", &IndexMap::new()).unwrap();
        assert!(mask.get(ID_PATCH_CTL_FUNC).is_none());
    }

    #[test]
    fn params_land_in_their_fields_at_the_slot() {
        let mut params = IndexMap::new();
        params.insert(fields::ID_PATCH_ASSIGN_TARGET_MIN.to_string(), 10);
        params.insert(fields::ID_PATCH_ASSIGN_TARGET_MAX.to_string(), 90);
        let mask = build_assign_mask(2, "CTL1", "MOM", "LOOP: L1", &params).unwrap();
        let Some(FieldValue::List(max)) = mask.get(fields::ID_PATCH_ASSIGN_TARGET_MAX) else {
            panic!("expected max list");
        };
        assert_eq!(max[1], Some(90));
    }

    #[test]
    fn params_must_address_assign_wide_fields() {
        let mut params = IndexMap::new();
        params.insert("ID_PATCH_MASTER_BPM".to_string(), 120);
        let err = build_assign_mask(1, "CTL1", "MOM", "LOOP: L1", &params).unwrap_err();
        assert!(matches!(err, EditorError::InvalidAssignParam(_)));

        let mut params = IndexMap::new();
        params.insert("ID_PATCH_NOPE".to_string(), 1);
        let err = build_assign_mask(1, "CTL1", "MOM", "LOOP: L1", &params).unwrap_err();
        assert!(matches!(err, EditorError::InvalidAssignParam(_)));
    }

    #[test]
    fn unknown_enum_names_fail() {
        assert!(build_assign_mask(1, "NOPE", "MOM", "LOOP: L1", &IndexMap::new()).is_err());
        assert!(build_assign_mask(1, "CTL1", "NOPE", "LOOP: L1", &IndexMap::new()).is_err());
        assert!(build_assign_mask(1, "CTL1", "MOM", "NOPE", &IndexMap::new()).is_err());
        assert!(build_assign_mask(0, "CTL1", "MOM", "LOOP: L1", &IndexMap::new()).is_err());
    }
}
