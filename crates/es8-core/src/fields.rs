//! Static registry of the ES-8 patch schema.
//!
//! Every patch record carries the same fixed set of named fields. The
//! registry describes each field once (wire name, shape, factory default)
//! and construction, validation, diffing, and serialization all consume it
//! uniformly instead of branching per field.

/// Shape of one field's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    /// Fixed-length list of integers; the length is part of the schema.
    List(usize),
}

/// Factory-default content for a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldDefault {
    Value(i64),
    /// List filled with a single repeated value.
    Fill(i64),
    /// Explicit list literal.
    Table(&'static [i64]),
}

/// One entry of the schema registry.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

/// Typed content of one field. `None` is the unset sentinel (`null` on the
/// wire); a complete patch contains no `None` anywhere, a mask-shaped value
/// may hold it for any element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(Option<i64>),
    List(Vec<Option<i64>>),
}

impl FieldSpec {
    /// Factory-default value for this field, fully set.
    pub fn default_value(&self) -> FieldValue {
        match (self.kind, self.default) {
            (FieldKind::Scalar, FieldDefault::Value(v)) => FieldValue::Scalar(Some(v)),
            (FieldKind::List(len), FieldDefault::Fill(v)) => {
                FieldValue::List(vec![Some(v); len])
            }
            (FieldKind::List(_), FieldDefault::Table(values)) => {
                FieldValue::List(values.iter().map(|v| Some(*v)).collect())
            }
            // A registry entry never pairs a scalar kind with a list default
            // or vice versa; fall back to an unset scalar if one ever does.
            _ => FieldValue::Scalar(None),
        }
    }
}

/// Look up a field by wire name.
pub fn spec_of(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

// ── Wire names referenced programmatically ────────────────────────────────

pub const ID_PATCH_NAME: &str = "ID_PATCH_NAME";
pub const ID_PATCH_CTL_FUNC: &str = "ID_PATCH_CTL_FUNC";
pub const ID_PATCH_ASSIGN_SW: &str = "ID_PATCH_ASSIGN_SW";
pub const ID_PATCH_ASSIGN_SOURCE: &str = "ID_PATCH_ASSIGN_SOURCE";
pub const ID_PATCH_ASSIGN_MODE: &str = "ID_PATCH_ASSIGN_MODE";
pub const ID_PATCH_ASSIGN_TARGET: &str = "ID_PATCH_ASSIGN_TARGET";
pub const ID_PATCH_ASSIGN_TARGET_CC_CH: &str = "ID_PATCH_ASSIGN_TARGET_CC_CH";
pub const ID_PATCH_ASSIGN_TARGET_CC_NO: &str = "ID_PATCH_ASSIGN_TARGET_CC_NO";
pub const ID_PATCH_ASSIGN_TARGET_MIN: &str = "ID_PATCH_ASSIGN_TARGET_MIN";
pub const ID_PATCH_ASSIGN_TARGET_MAX: &str = "ID_PATCH_ASSIGN_TARGET_MAX";
pub const ID_PATCH_ASSIGN_ACT_RANGE_LO: &str = "ID_PATCH_ASSIGN_ACT_RANGE_LO";
pub const ID_PATCH_ASSIGN_ACT_RANGE_HI: &str = "ID_PATCH_ASSIGN_ACT_RANGE_HI";
pub const ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER: &str = "ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER";
pub const ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER_CC: &str = "ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER_CC";
pub const ID_PATCH_ASSIGN_INT_PEDAL_TIME: &str = "ID_PATCH_ASSIGN_INT_PEDAL_TIME";
pub const ID_PATCH_ASSIGN_INT_PEDAL_CURVE: &str = "ID_PATCH_ASSIGN_INT_PEDAL_CURVE";
pub const ID_PATCH_ASSIGN_WAVE_PEDAL_RATE: &str = "ID_PATCH_ASSIGN_WAVE_PEDAL_RATE";
pub const ID_PATCH_ASSIGN_WAVE_PEDAL_FORM: &str = "ID_PATCH_ASSIGN_WAVE_PEDAL_FORM";

/// Number of assign slots per patch.
pub const ASSIGN_SLOTS: usize = 12;
/// Number of control-function entries per patch.
pub const CTL_FUNC_SLOTS: usize = 16;
/// Width of the patch name field.
pub const PATCH_NAME_LEN: usize = 16;

// ── Registry ──────────────────────────────────────────────────────────────

use FieldDefault::{Fill, Table, Value};
use FieldKind::{List, Scalar};

/// "BOSS ES-8", space-padded to the full name width.
const DEFAULT_PATCH_NAME: &[i64] = &[
    66, 79, 83, 83, 32, 69, 83, 45, 56, 32, 32, 32, 32, 32, 32, 32,
];

/// The full ES-8 patch schema, in wire order.
pub static FIELDS: &[FieldSpec] = &[
    // Loop routing. The volume loop plus the 8 switchable loops.
    FieldSpec { name: "ID_PATCH_LOOP_SW_LOOP", kind: List(9), default: Fill(0) },
    FieldSpec {
        name: "ID_PATCH_LOOP_POSITION",
        kind: List(22),
        default: Table(&[8, 7, 6, 5, 4, 3, 2, 1, 0, 9, 10, 11, 12, 10, 11, 12, 13, 14, 15, 13, 14, 15]),
    },
    // Mixer and I/O. 0: auto, 1: manual; gains 0: -6db, 1: 0db.
    FieldSpec { name: "ID_PATCH_MIXER_MODE", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_MIXER_GAIN1", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_MIXER_GAIN2", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_CARRY_OVER_LOOP", kind: List(9), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_INPUT_SELECT", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_INPUT_BUFFER", kind: Scalar, default: Value(1) },
    FieldSpec { name: "ID_PATCH_OUTPUT_SELECT", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_OUTPUT_BUFFER", kind: Scalar, default: Value(1) },
    // 0: 0db, 1: +2db, 2: +4db, 3: +6db
    FieldSpec { name: "ID_PATCH_OUTPUT_GAIN", kind: Scalar, default: Value(0) },
    // Control jacks, on by default.
    FieldSpec { name: "ID_PATCH_CTL1", kind: Scalar, default: Value(1) },
    FieldSpec { name: "ID_PATCH_CTL2", kind: Scalar, default: Value(1) },
    FieldSpec { name: "ID_PATCH_CTL3", kind: Scalar, default: Value(1) },
    FieldSpec { name: "ID_PATCH_CTL4", kind: Scalar, default: Value(1) },
    FieldSpec { name: "ID_PATCH_CTL5", kind: Scalar, default: Value(1) },
    FieldSpec { name: "ID_PATCH_CTL6", kind: Scalar, default: Value(1) },
    // 0-127: preset expression value, 128: exp1, 129: exp2
    FieldSpec { name: "ID_PATCH_EXP1", kind: Scalar, default: Value(128) },
    FieldSpec { name: "ID_PATCH_EXP2", kind: Scalar, default: Value(129) },
    // 20-500
    FieldSpec { name: "ID_PATCH_MASTER_BPM", kind: Scalar, default: Value(60) },
    FieldSpec { name: ID_PATCH_NAME, kind: List(16), default: Table(DEFAULT_PATCH_NAME) },
    // Panel LEDs.
    FieldSpec { name: "ID_PATCH_LED_NUM1", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_NUM2", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_NUM3", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_NUM4", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_NUM5", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_NUM6", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_NUM7", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_NUM8", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_BANK_D", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_LED_BANK_U", kind: Scalar, default: Value(0) },
    // Per-preset patch MIDI settings, 8 presets each.
    FieldSpec { name: "ID_PATCH_MIDI_TX_CH", kind: List(8), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_MIDI_PC_BANK_LSB", kind: List(8), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_MIDI_PC_BANK_MSB", kind: List(8), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_MIDI_PC", kind: List(8), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_MIDI_CTL1_CC", kind: List(8), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_MIDI_CTL1_CC_VAL", kind: List(8), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_MIDI_CTL2_CC", kind: List(8), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_MIDI_CTL2_CC_VAL", kind: List(8), default: Fill(0) },
    // Footswitch control functions, indexed by the control-function table.
    FieldSpec {
        name: ID_PATCH_CTL_FUNC,
        kind: List(16),
        default: Table(&[1, 2, 3, 4, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18]),
    },
    FieldSpec { name: "ID_PATCH_CTL_MIN", kind: List(16), default: Fill(0) },
    FieldSpec { name: "ID_PATCH_CTL_MAX", kind: List(16), default: Fill(1) },
    // 0: momentary, 1: toggle
    FieldSpec { name: "ID_PATCH_CTL_MOD", kind: List(16), default: Fill(0) },
    // Expression pedals.
    FieldSpec { name: "ID_PATCH_EXP_FUNC", kind: List(2), default: Table(&[1, 2]) },
    FieldSpec { name: "ID_PATCH_EXP_MIN", kind: List(2), default: Fill(20) },
    FieldSpec { name: "ID_PATCH_EXP_MAX", kind: List(2), default: Fill(127) },
    // Assign slots, 12 parallel lists.
    FieldSpec { name: ID_PATCH_ASSIGN_SW, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_SOURCE, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_MODE, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_TARGET, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_TARGET_CC_CH, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_TARGET_CC_NO, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_TARGET_MIN, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_TARGET_MAX, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_ACT_RANGE_LO, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_ACT_RANGE_HI, kind: List(12), default: Fill(127) },
    FieldSpec { name: ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_INT_PEDAL_TRIGGER_CC, kind: List(12), default: Fill(80) },
    FieldSpec { name: ID_PATCH_ASSIGN_INT_PEDAL_TIME, kind: List(12), default: Fill(30) },
    FieldSpec { name: ID_PATCH_ASSIGN_INT_PEDAL_CURVE, kind: List(12), default: Fill(0) },
    FieldSpec { name: ID_PATCH_ASSIGN_WAVE_PEDAL_RATE, kind: List(12), default: Fill(7) },
    FieldSpec { name: ID_PATCH_ASSIGN_WAVE_PEDAL_FORM, kind: List(12), default: Fill(2) },
    // 0: system, 1: off
    FieldSpec { name: "ID_PATCH_MIDI_CLOCK_OUT", kind: Scalar, default: Value(0) },
    FieldSpec { name: "ID_PATCH_MIDI_TRANSMIT", kind: List(8), default: Fill(0) },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique() {
        for (i, spec) in FIELDS.iter().enumerate() {
            assert!(
                FIELDS[i + 1..].iter().all(|other| other.name != spec.name),
                "duplicate field name: {}",
                spec.name
            );
        }
    }

    #[test]
    fn table_defaults_match_declared_lengths() {
        for spec in FIELDS {
            if let (FieldKind::List(len), FieldDefault::Table(values)) = (spec.kind, spec.default) {
                assert_eq!(values.len(), len, "{}", spec.name);
            }
        }
    }

    #[test]
    fn lookup_by_name() {
        let spec = spec_of(ID_PATCH_ASSIGN_SOURCE).unwrap();
        assert_eq!(spec.kind, FieldKind::List(ASSIGN_SLOTS));
        assert!(spec_of("ID_PATCH_BOGUS").is_none());
    }

    #[test]
    fn default_values_are_fully_set() {
        for spec in FIELDS {
            match spec.default_value() {
                FieldValue::Scalar(v) => assert!(v.is_some(), "{}", spec.name),
                FieldValue::List(items) => {
                    assert!(items.iter().all(Option::is_some), "{}", spec.name)
                }
            }
        }
    }
}
