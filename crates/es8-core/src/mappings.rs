//! Fixed lookup tables for the enum-valued patch fields.
//!
//! Encoding is index-based and the tables must stay in exactly this order
//! for wire compatibility with the device backup format.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MappingError {
    #[error("unknown {table} name: {name}")]
    UnknownName { table: &'static str, name: String },
    #[error("{table} index out of range: {index}")]
    UnknownIndex { table: &'static str, index: i64 },
}

pub const CTL_FUNC_ORDER: &[&str] = &[
    "OFF", "MemM", "Mute", "BnkD", "BnkU", "MemU", "MemD", "Num1",
    "Num2", "Num3", "Num4", "Num5", "Num6", "Num7", "Num8", "Ctl1",
    "Ctl2", "Ctl3", "Ctl4", "Ctl5", "Ctl6", "BPM",
];

pub const EXP_FUNC_ORDER: &[&str] = &["OFF", "EXP1", "EXP2", "BPM"];

pub const ASSIGN_SOURCE_ORDER: &[&str] = &[
    "CTL1", "CTL2", "CTL3", "CTL4", "MemM", "Mute", "BnkD", "BnkU",
    "Num1", "Num2", "Num3", "Num4", "Num5", "Num6", "Num7", "Num8",
    "CNum", "EXP1", "EXP2", "INT", "WAV", "CC",
];

/// The 12 footswitches of the unit itself, in control-function order.
pub const ES8_FOOTSWITCHES: &[&str] = &[
    "MemM", "Mute", "BnkD", "BnkU", "Num1", "Num2",
    "Num3", "Num4", "Num5", "Num6", "Num7", "Num8",
];

pub const ASSIGN_MODE_ORDER: &[&str] = &["MOM", "TGL"];

pub const ASSIGN_TARGET_ORDER: &[&str] = &[
    "LOOP: L1", "LOOP: L2", "LOOP: L3", "LOOP: L4", "LOOP: L5", "LOOP: L6",
    "LOOP: L7", "LOOP: L8", "LOOP: LV", "E.CTL: CTL1", "E.CTL: CTL2",
    "E.CTL: CTL3", "E.CTL: CTL4", "E.CTL: CTL5", "E.CTL: CTL6", "E.CTL: EXP1",
    "E.CTL: EXP2", "InOut: IN", "InOut: OUT", "MODE: MemM", "MODE: Mute",
    "MODE: Bypass", "MIDI", "BPM: MstBPM", "BPM: Tap", "LED: BnkD", "LED: BnkU",
    "LED: Num1", "LED: Num2", "LED: Num3", "LED: Num4", "LED: Num5",
    "LED: Num6", "LED: Num7", "LED: Num8", "Pat.M: PMIDI1", "Pat.M: PMIDI2",
    "Pat.M: PMIDI3", "Pat.M: PMIDI4", "Pat.M: PMIDI5", "Pat.M: PMIDI6",
    "Pat.M: PMIDI7", "Pat.M: PMIDI8",
];

pub const INT_PEDAL_CURVE_ORDER: &[&str] = &["LNR", "SLW", "FST"];

/// Note-division prefix of the wave-pedal rate table; indices past it are
/// the literal rates "0" through "99".
pub const WAVE_PEDAL_RATE_DIVISIONS: &[&str] = &[
    "1/1", "1/2D", "1/1T", "1/2", "1/4D", "1/2T", "1/4",
    "1/8D", "1/4T", "1/8", "1/16D", "1/8T", "1/16",
];

pub const WAVE_PEDAL_FORM_ORDER: &[&str] = &["SAW", "TRI", "SIN"];

/// Index of a footswitch name within the control-function slots.
pub fn footswitch_index(name: &str) -> Option<usize> {
    ES8_FOOTSWITCHES.iter().position(|entry| *entry == name)
}

// ── Index-based encode/decode over the fixed tables ───────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTable {
    Source,
    Target,
    Mode,
    CtlFunc,
    ExpFunc,
    IntPedalCurve,
    WavePedalForm,
}

impl EnumTable {
    pub fn entries(self) -> &'static [&'static str] {
        match self {
            EnumTable::Source => ASSIGN_SOURCE_ORDER,
            EnumTable::Target => ASSIGN_TARGET_ORDER,
            EnumTable::Mode => ASSIGN_MODE_ORDER,
            EnumTable::CtlFunc => CTL_FUNC_ORDER,
            EnumTable::ExpFunc => EXP_FUNC_ORDER,
            EnumTable::IntPedalCurve => INT_PEDAL_CURVE_ORDER,
            EnumTable::WavePedalForm => WAVE_PEDAL_FORM_ORDER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnumTable::Source => "source",
            EnumTable::Target => "target",
            EnumTable::Mode => "mode",
            EnumTable::CtlFunc => "control function",
            EnumTable::ExpFunc => "expression function",
            EnumTable::IntPedalCurve => "pedal curve",
            EnumTable::WavePedalForm => "wave form",
        }
    }

    pub fn encode(self, name: &str) -> Result<i64, MappingError> {
        self.entries()
            .iter()
            .position(|entry| *entry == name)
            .map(|index| index as i64)
            .ok_or_else(|| MappingError::UnknownName { table: self.label(), name: name.to_string() })
    }

    pub fn decode(self, index: i64) -> Result<&'static str, MappingError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.entries().get(i).copied())
            .ok_or(MappingError::UnknownIndex { table: self.label(), index })
    }
}

/// Wire index of a wave-pedal rate: a note division, or a literal "0"-"99".
pub fn wave_pedal_rate_index(name: &str) -> Option<i64> {
    if let Some(index) = WAVE_PEDAL_RATE_DIVISIONS.iter().position(|d| *d == name) {
        return Some(index as i64);
    }
    let rate: u32 = name.parse().ok()?;
    (rate < 100).then(|| WAVE_PEDAL_RATE_DIVISIONS.len() as i64 + i64::from(rate))
}

/// Display label for a wave-pedal rate index.
pub fn wave_pedal_rate_label(index: i64) -> Option<String> {
    let i = usize::try_from(index).ok()?;
    if let Some(division) = WAVE_PEDAL_RATE_DIVISIONS.get(i) {
        return Some((*division).to_string());
    }
    let rate = i - WAVE_PEDAL_RATE_DIVISIONS.len();
    (rate < 100).then(|| rate.to_string())
}
