//! The patch record and its merge algebra.
//!
//! Two primitives drive everything the editor does:
//!
//! * [`Patch::mask`] diffs a set of field entries against this patch as the
//!   base, producing a sparse [`Mask`]: scalar fields appear only when they
//!   differ, list fields keep the new value where an element differs and the
//!   unset sentinel where it does not. A field that fully matches the base
//!   is omitted, so an all-sentinel list is never emitted.
//! * [`Patch::update`] applies a mask back onto this patch as an upsert,
//!   returning a new patch. Set entries win, unset entries fall through to
//!   the base, and untouched fields carry over.
//!
//! The pair round-trips: `p.update(&p.diff(&q)) == q` for complete `q`, and
//! re-applying the same mask is idempotent. Masks themselves compose: a
//! mask may be the "new" operand of another diff, or the input to `update`.
//!
//! Validation happens at the JSON boundary (`from_value`); the algebra
//! itself only ever sees registry-shaped values and is infallible.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::assign::{self, Assign, AssignError};
use crate::fields::{self, FieldKind, FieldSpec, FieldValue, FIELDS, PATCH_NAME_LEN};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("expected a JSON object of patch fields")]
    NotAnObject,
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("{name}: expected an integer")]
    ExpectedScalar { name: &'static str },
    #[error("{name}: expected a list of {expected} integers")]
    ExpectedList { name: &'static str, expected: usize },
    #[error("{name}[{index}]: expected an integer or null")]
    NotAnInteger { name: &'static str, index: usize },
}

// ── Field-level parsing ───────────────────────────────────────────────────

fn parse_element(name: &'static str, index: usize, value: &Value) -> Result<Option<i64>, FieldError> {
    match value {
        Value::Null => Ok(None),
        _ => value
            .as_i64()
            .map(Some)
            .ok_or(FieldError::NotAnInteger { name, index }),
    }
}

fn parse_field(spec: &'static FieldSpec, value: &Value) -> Result<FieldValue, FieldError> {
    match spec.kind {
        FieldKind::Scalar => match value {
            Value::Null => Ok(FieldValue::Scalar(None)),
            _ => value
                .as_i64()
                .map(|v| FieldValue::Scalar(Some(v)))
                .ok_or(FieldError::ExpectedScalar { name: spec.name }),
        },
        FieldKind::List(len) => {
            let items = value
                .as_array()
                .filter(|items| items.len() == len)
                .ok_or(FieldError::ExpectedList { name: spec.name, expected: len })?;
            let mut out = Vec::with_capacity(len);
            for (index, item) in items.iter().enumerate() {
                out.push(parse_element(spec.name, index, item)?);
            }
            Ok(FieldValue::List(out))
        }
    }
}

fn render_field(value: &FieldValue) -> Value {
    match value {
        FieldValue::Scalar(v) => render_element(*v),
        FieldValue::List(items) => Value::Array(items.iter().map(|v| render_element(*v)).collect()),
    }
}

fn render_element(value: Option<i64>) -> Value {
    match value {
        Some(v) => Value::from(v),
        None => Value::Null,
    }
}

impl FieldValue {
    /// Diff against `base`: unchanged elements become unset, changed
    /// elements keep the new value. Scalars pass through as the new value.
    fn masked_against(&self, base: &FieldValue) -> FieldValue {
        match (base, self) {
            (FieldValue::List(old), FieldValue::List(new)) => FieldValue::List(
                old.iter()
                    .zip(new)
                    .map(|(o, n)| if o == n { None } else { *n })
                    .collect(),
            ),
            _ => self.clone(),
        }
    }

    /// Upsert over `base`: set entries win, unset entries keep the base.
    fn picked_over(&self, base: &FieldValue) -> FieldValue {
        match (base, self) {
            (FieldValue::List(old), FieldValue::List(new)) => {
                FieldValue::List(old.iter().zip(new).map(|(o, n)| n.or(*o)).collect())
            }
            (FieldValue::Scalar(old), FieldValue::Scalar(new)) => FieldValue::Scalar(new.or(*old)),
            _ => self.clone(),
        }
    }
}

// ── Mask ──────────────────────────────────────────────────────────────────

/// A sparse diff of a patch against some base: only touched fields appear,
/// and unchanged list elements hold the unset sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    entries: IndexMap<&'static str, FieldValue>,
}

impl Mask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// Insert an entry, validating its shape against the registry.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        let spec = fields::spec_of(name).ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        let matches = match (spec.kind, &value) {
            (FieldKind::Scalar, FieldValue::Scalar(_)) => true,
            (FieldKind::List(len), FieldValue::List(items)) => items.len() == len,
            _ => false,
        };
        if !matches {
            return Err(match spec.kind {
                FieldKind::Scalar => FieldError::ExpectedScalar { name: spec.name },
                FieldKind::List(len) => FieldError::ExpectedList { name: spec.name, expected: len },
            });
        }
        self.entries.insert(spec.name, value);
        Ok(())
    }

    /// Parse a mask-shaped JSON object. Only the provided fields appear in
    /// the result; unknown names and malformed values fail fast.
    pub fn from_value(value: &Value) -> Result<Self, FieldError> {
        let map = value.as_object().ok_or(FieldError::NotAnObject)?;
        let mut mask = Mask::new();
        for (name, field) in map {
            let spec =
                fields::spec_of(name).ok_or_else(|| FieldError::UnknownField(name.clone()))?;
            mask.entries.insert(spec.name, parse_field(spec, field)?);
        }
        Ok(mask)
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.entries {
            map.insert((*name).to_string(), render_field(value));
        }
        Value::Object(map)
    }
}

// ── Patch ─────────────────────────────────────────────────────────────────

/// One full device patch: every registry field present, in registry order.
///
/// A patch is normally *complete* (no unset values anywhere). A patch built
/// from a mask-shaped document, such as a stored global default, may carry
/// unset list elements; [`Patch::is_mask`] detects that case so the caller
/// can resolve it onto the factory default before using it as a base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    values: IndexMap<&'static str, FieldValue>,
}

impl Patch {
    /// The factory default, the root of all derivations.
    pub fn factory() -> Self {
        let values = FIELDS
            .iter()
            .map(|spec| (spec.name, spec.default_value()))
            .collect();
        Patch { values }
    }

    /// Build a patch from a backup-file map. Missing fields fill from the
    /// factory default; unknown names, wrong kinds, wrong lengths, and
    /// non-integer elements fail fast.
    pub fn from_value(value: &Value) -> Result<Self, FieldError> {
        let map = value.as_object().ok_or(FieldError::NotAnObject)?;
        for name in map.keys() {
            if fields::spec_of(name).is_none() {
                return Err(FieldError::UnknownField(name.clone()));
            }
        }
        let mut values = IndexMap::with_capacity(FIELDS.len());
        for spec in FIELDS {
            let value = match map.get(spec.name) {
                Some(field) => parse_field(spec, field)?,
                None => spec.default_value(),
            };
            values.insert(spec.name, value);
        }
        Ok(Patch { values })
    }

    /// Registry-ordered JSON map; unset values render as `null`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.values {
            map.insert((*name).to_string(), render_field(value));
        }
        Value::Object(map)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Dense view of this patch as a mask: every field, every value set as
    /// stored. `base.update(&p.to_mask())` replaces all of `base` with `p`.
    pub fn to_mask(&self) -> Mask {
        Mask { entries: self.values.clone() }
    }

    /// True iff any list field contains at least one unset element.
    pub fn is_mask(&self) -> bool {
        self.values.values().any(|value| match value {
            FieldValue::List(items) => items.iter().any(Option::is_none),
            FieldValue::Scalar(_) => false,
        })
    }

    /// Diff `other`'s entries against this patch as the base.
    ///
    /// Fields whose value fully matches the base are omitted. For list
    /// fields, matching elements become unset and differing elements keep
    /// the new value. `other` may itself be sparse: masking a mask against
    /// a base narrows it further.
    pub fn mask(&self, other: &Mask) -> Mask {
        let mut entries = IndexMap::new();
        for (name, new) in other.iter() {
            let Some(current) = self.values.get(name) else {
                continue;
            };
            if current == new {
                continue;
            }
            entries.insert(name, new.masked_against(current));
        }
        Mask { entries }
    }

    /// Diff a full patch against this one. Convenience form of [`mask`]
    /// over the other patch's dense view.
    ///
    /// [`mask`]: Patch::mask
    pub fn diff(&self, other: &Patch) -> Mask {
        self.mask(&other.to_mask())
    }

    /// Apply a mask as an upsert, returning a new patch. Set entries win,
    /// unset entries keep this patch's value, untouched fields carry over.
    pub fn update(&self, mask: &Mask) -> Patch {
        let mut values = self.values.clone();
        for (name, new) in mask.iter() {
            if let Some(current) = values.get_mut(name) {
                *current = new.picked_over(current);
            }
        }
        Patch { values }
    }

    /// Decoded read view of assign slot `number` (1-indexed).
    pub fn get_assign(&self, number: usize) -> Result<Assign, AssignError> {
        assign::get_assign(self, number)
    }

    /// The patch name, decoded from its character-code field.
    pub fn patch_name(&self) -> String {
        match self.field(fields::ID_PATCH_NAME) {
            Some(FieldValue::List(items)) => decode_patch_name(items),
            _ => String::new(),
        }
    }
}

// ── Name codec ────────────────────────────────────────────────────────────

/// Encode a patch name as a fixed-width character-code list: right-padded
/// with spaces, truncated to the field width.
pub fn encode_patch_name(name: &str) -> Vec<i64> {
    let mut out: Vec<i64> = name
        .chars()
        .take(PATCH_NAME_LEN)
        .map(|c| c as u32 as i64)
        .collect();
    out.resize(PATCH_NAME_LEN, ' ' as i64);
    out
}

/// Decode a character-code list back into a name, stripping the trailing
/// space padding. Unset elements are skipped.
pub fn decode_patch_name(codes: &[Option<i64>]) -> String {
    let mut out = String::with_capacity(codes.len());
    for code in codes.iter().flatten() {
        if let Some(c) = u32::try_from(*code).ok().and_then(char::from_u32) {
            out.push(c);
        }
    }
    out.trim_end_matches(' ').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn factory_is_complete() {
        assert!(!Patch::factory().is_mask());
    }

    #[test]
    fn mask_of_self_is_empty() {
        let p = Patch::factory();
        assert!(p.diff(&p).is_empty());
    }

    #[test]
    fn update_with_empty_mask_is_identity() {
        let p = Patch::factory();
        assert_eq!(p.update(&Mask::new()), p);
    }

    #[test]
    fn scalar_diff_and_upsert() {
        let base = Patch::factory();
        let changed = base.update(&Mask::from_value(&json!({"ID_PATCH_MASTER_BPM": 120})).unwrap());
        let mask = base.diff(&changed);
        assert_eq!(mask.len(), 1);
        assert_eq!(mask.get("ID_PATCH_MASTER_BPM"), Some(&FieldValue::Scalar(Some(120))));
        assert_eq!(base.update(&mask), changed);
    }

    #[test]
    fn list_diff_keeps_only_changed_elements() {
        let base = Patch::factory();
        let mut mask = Mask::new();
        let mut items = vec![None; 9];
        items[2] = Some(1);
        mask.set("ID_PATCH_LOOP_SW_LOOP", FieldValue::List(items)).unwrap();
        let changed = base.update(&mask);

        let derived = base.diff(&changed);
        assert_eq!(derived.len(), 1);
        let Some(FieldValue::List(items)) = derived.get("ID_PATCH_LOOP_SW_LOOP") else {
            panic!("expected a list entry");
        };
        assert_eq!(items[2], Some(1));
        assert!(items.iter().enumerate().all(|(i, v)| i == 2 || v.is_none()));
    }

    #[test]
    fn from_value_rejects_unknown_field() {
        let err = Patch::from_value(&json!({"ID_PATCH_BOGUS": 1})).unwrap_err();
        assert_eq!(err, FieldError::UnknownField("ID_PATCH_BOGUS".into()));
    }

    #[test]
    fn from_value_rejects_wrong_length() {
        let err = Patch::from_value(&json!({"ID_PATCH_LOOP_SW_LOOP": [0, 0]})).unwrap_err();
        assert_eq!(
            err,
            FieldError::ExpectedList { name: "ID_PATCH_LOOP_SW_LOOP", expected: 9 }
        );
    }

    #[test]
    fn from_value_rejects_non_integer_element() {
        let err =
            Patch::from_value(&json!({"ID_PATCH_MIDI_TX_CH": [0, "x", 0, 0, 0, 0, 0, 0]}))
                .unwrap_err();
        assert_eq!(err, FieldError::NotAnInteger { name: "ID_PATCH_MIDI_TX_CH", index: 1 });
    }

    #[test]
    fn from_value_fills_missing_fields_from_factory() {
        let p = Patch::from_value(&json!({"ID_PATCH_MASTER_BPM": 90})).unwrap();
        assert_eq!(p.field("ID_PATCH_MASTER_BPM"), Some(&FieldValue::Scalar(Some(90))));
        assert_eq!(p.field("ID_PATCH_EXP1"), Some(&FieldValue::Scalar(Some(128))));
    }

    #[test]
    fn mask_shaped_input_detected() {
        let p = Patch::from_value(&json!({
            "ID_PATCH_LOOP_SW_LOOP": [null, null, 1, null, null, null, null, null, null]
        }))
        .unwrap();
        assert!(p.is_mask());
    }

    #[test]
    fn name_codec_roundtrip() {
        assert_eq!(decode_patch_name(
            &encode_patch_name("BOSS ES-8").into_iter().map(Some).collect::<Vec<_>>()
        ), "BOSS ES-8");
    }

    #[test]
    fn name_codec_truncates() {
        assert_eq!(encode_patch_name("THIS NAME IS TOO LONG").len(), PATCH_NAME_LEN);
    }

    #[test]
    fn factory_patch_name() {
        assert_eq!(Patch::factory().patch_name(), "BOSS ES-8");
    }

    #[test]
    fn json_roundtrip_preserves_fields() {
        let p = Patch::factory();
        let back = Patch::from_value(&p.to_value()).unwrap();
        assert_eq!(back, p);
    }
}
