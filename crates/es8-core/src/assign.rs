//! Derived read view of one assign slot.
//!
//! An assign is not stored as a record of its own: slot `n` lives at index
//! `n-1` across twelve parallel list fields of a patch. The view decodes
//! the enum-valued fields through the fixed tables and picks up the extra
//! fields that only apply to the decoded source or target. It is computed
//! on demand and never persisted; its main job is the equality check that
//! guards against clobbering an intentionally-set global default.

use thiserror::Error;

use crate::fields::{self, FieldValue, ASSIGN_SLOTS};
use crate::mappings::{EnumTable, MappingError};
use crate::patch::Patch;

#[derive(Debug, Error, PartialEq)]
pub enum AssignError {
    #[error("assign number out of range 1-12: {0}")]
    NumberOutOfRange(usize),
    #[error("{field}[{index}] is unset")]
    UnsetSlot { field: &'static str, index: usize },
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Extra fields carried by specific assign sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceParams {
    None,
    /// Internal virtual pedal.
    IntPedal { trigger: i64, time: i64, curve: i64 },
    /// Internal wave pedal.
    WavePedal { rate: i64, form: i64 },
    /// External MIDI CC source.
    MidiCc { cc_no: i64 },
}

/// Extra fields carried by specific assign targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetParams {
    None,
    Midi { cc_ch: i64, cc_no: i64 },
}

/// Decoded view of one assign slot, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub assign_number: usize,
    pub source: &'static str,
    pub target: &'static str,
    pub mode: &'static str,
    pub is_enabled: i64,
    pub min: i64,
    pub max: i64,
    pub act_range_lo: i64,
    pub act_range_hi: i64,
    pub source_params: SourceParams,
    pub target_params: TargetParams,
}

fn slot_value(patch: &Patch, name: &'static str, index: usize) -> Result<i64, AssignError> {
    let value = match patch.field(name) {
        Some(FieldValue::List(items)) => items.get(index).copied().flatten(),
        _ => None,
    };
    value.ok_or(AssignError::UnsetSlot { field: name, index })
}

pub fn get_assign(patch: &Patch, number: usize) -> Result<Assign, AssignError> {
    if !(1..=ASSIGN_SLOTS).contains(&number) {
        return Err(AssignError::NumberOutOfRange(number));
    }
    let index = number - 1;

    let source =
        EnumTable::Source.decode(slot_value(patch, fields::ID_PATCH_ASSIGN_SOURCE, index)?)?;
    let target =
        EnumTable::Target.decode(slot_value(patch, fields::ID_PATCH_ASSIGN_TARGET, index)?)?;
    let mode = EnumTable::Mode.decode(slot_value(patch, fields::ID_PATCH_ASSIGN_MODE, index)?)?;

    let source_params = match source {
        "INT" => SourceParams::IntPedal {
            trigger: slot_value(patch, fields::ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER, index)?,
            time: slot_value(patch, fields::ID_PATCH_ASSIGN_INT_PEDAL_TIME, index)?,
            curve: slot_value(patch, fields::ID_PATCH_ASSIGN_INT_PEDAL_CURVE, index)?,
        },
        "WAV" => SourceParams::WavePedal {
            rate: slot_value(patch, fields::ID_PATCH_ASSIGN_WAVE_PEDAL_RATE, index)?,
            form: slot_value(patch, fields::ID_PATCH_ASSIGN_WAVE_PEDAL_FORM, index)?,
        },
        "CC" => SourceParams::MidiCc {
            cc_no: slot_value(patch, fields::ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER_CC, index)?,
        },
        _ => SourceParams::None,
    };

    let target_params = match target {
        "MIDI" => TargetParams::Midi {
            cc_ch: slot_value(patch, fields::ID_PATCH_ASSIGN_TARGET_CC_CH, index)?,
            cc_no: slot_value(patch, fields::ID_PATCH_ASSIGN_TARGET_CC_NO, index)?,
        },
        _ => TargetParams::None,
    };

    Ok(Assign {
        assign_number: number,
        source,
        target,
        mode,
        is_enabled: slot_value(patch, fields::ID_PATCH_ASSIGN_SW, index)?,
        min: slot_value(patch, fields::ID_PATCH_ASSIGN_TARGET_MIN, index)?,
        max: slot_value(patch, fields::ID_PATCH_ASSIGN_TARGET_MAX, index)?,
        act_range_lo: slot_value(patch, fields::ID_PATCH_ASSIGN_ACT_RANGE_LO, index)?,
        act_range_hi: slot_value(patch, fields::ID_PATCH_ASSIGN_ACT_RANGE_HI, index)?,
        source_params,
        target_params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Mask;
    use serde_json::json;

    #[test]
    fn factory_assign_decodes() {
        let a = Patch::factory().get_assign(1).unwrap();
        assert_eq!(a.assign_number, 1);
        assert_eq!(a.source, "CTL1");
        assert_eq!(a.target, "LOOP: L1");
        assert_eq!(a.mode, "MOM");
        assert_eq!(a.is_enabled, 0);
        assert_eq!(a.act_range_hi, 127);
        assert_eq!(a.source_params, SourceParams::None);
        assert_eq!(a.target_params, TargetParams::None);
    }

    #[test]
    fn number_out_of_range() {
        let p = Patch::factory();
        assert_eq!(p.get_assign(0), Err(AssignError::NumberOutOfRange(0)));
        assert_eq!(p.get_assign(13), Err(AssignError::NumberOutOfRange(13)));
    }

    fn with_slot(name: &str, index: usize, value: i64) -> Mask {
        let mut items = vec![None; ASSIGN_SLOTS];
        items[index] = Some(value);
        let mut mask = Mask::new();
        mask.set(name, FieldValue::List(items)).unwrap();
        mask
    }

    #[test]
    fn int_source_carries_pedal_params() {
        let source = EnumTable::Source.encode("INT").unwrap();
        let p = Patch::factory().update(&with_slot(fields::ID_PATCH_ASSIGN_SOURCE, 2, source));
        let a = p.get_assign(3).unwrap();
        assert_eq!(a.source, "INT");
        assert_eq!(a.source_params, SourceParams::IntPedal { trigger: 0, time: 30, curve: 0 });
    }

    #[test]
    fn wave_source_carries_rate_and_form() {
        let source = EnumTable::Source.encode("WAV").unwrap();
        let p = Patch::factory().update(&with_slot(fields::ID_PATCH_ASSIGN_SOURCE, 0, source));
        let a = p.get_assign(1).unwrap();
        assert_eq!(a.source_params, SourceParams::WavePedal { rate: 7, form: 2 });
    }

    #[test]
    fn cc_source_carries_cc_number() {
        let source = EnumTable::Source.encode("CC").unwrap();
        let p = Patch::factory().update(&with_slot(fields::ID_PATCH_ASSIGN_SOURCE, 5, source));
        let a = p.get_assign(6).unwrap();
        assert_eq!(a.source_params, SourceParams::MidiCc { cc_no: 80 });
    }

    #[test]
    fn midi_target_carries_channel_and_cc() {
        let target = EnumTable::Target.encode("MIDI").unwrap();
        let p = Patch::factory().update(&with_slot(fields::ID_PATCH_ASSIGN_TARGET, 0, target));
        let a = p.get_assign(1).unwrap();
        assert_eq!(a.target, "MIDI");
        assert_eq!(a.target_params, TargetParams::Midi { cc_ch: 0, cc_no: 0 });
    }

    #[test]
    fn unset_slot_fails_to_decode() {
        let p = Patch::from_value(&json!({
            "ID_PATCH_ASSIGN_SOURCE": [null, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        }))
        .unwrap();
        assert_eq!(
            p.get_assign(1),
            Err(AssignError::UnsetSlot { field: fields::ID_PATCH_ASSIGN_SOURCE, index: 0 })
        );
    }

    #[test]
    fn out_of_table_value_fails_to_decode() {
        let p = Patch::factory().update(&with_slot(fields::ID_PATCH_ASSIGN_SOURCE, 0, 22));
        assert!(matches!(p.get_assign(1), Err(AssignError::Mapping(_))));
    }
}
