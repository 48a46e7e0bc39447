// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Switch-action token codec.
//!
//! A MIDI action token is one of
//! ```text
//!   CC n = m        control change
//!   CC n [=] m/d    control change, proportional value
//!   KS n [= m]      key switch (velocity defaults to 127)
//!   PC n            program change
//!   [A-G][#|b] oct  pitch literal, parsed as a key switch
//! ```
//! Tokens are case-insensitive and whitespace-tolerant. A blank token is
//! no action at all and is dropped from lists. Pitch literals always format
//! back as `KS`, so formatting a parsed literal does not reproduce the
//! original spelling.

use crate::error::{Error, Result};
use crate::project::MiddleC;
use crate::xmap::{SwitchAction, KIND_CONTROL_CHANGE, KIND_KEY_SWITCH, KIND_PROGRAM_CHANGE};

/// A single parsed MIDI switch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiAction {
    /// Control change: controller number and value
    ControlChange { controller: u8, value: u8 },
    /// Key switch: note number and velocity
    KeySwitch { note: u8, velocity: u8 },
    /// Program change
    ProgramChange { program: u8 },
}

impl MidiAction {
    /// Convert to the interchange document's wire shape.
    pub fn to_wire(self) -> SwitchAction {
        match self {
            MidiAction::ControlChange { controller, value } => SwitchAction {
                kind: KIND_CONTROL_CHANGE.to_string(),
                param1: controller.to_string(),
                param2: value.to_string(),
            },
            MidiAction::KeySwitch { note, velocity } => SwitchAction {
                kind: KIND_KEY_SWITCH.to_string(),
                param1: note.to_string(),
                param2: velocity.to_string(),
            },
            MidiAction::ProgramChange { program } => SwitchAction {
                kind: KIND_PROGRAM_CHANGE.to_string(),
                param1: program.to_string(),
                param2: "0".to_string(),
            },
        }
    }
}

/// Parse a single action token. A blank token yields `None`.
pub fn parse_action(token: &str, middle_c: MiddleC) -> Result<Option<MidiAction>> {
    let t = token.trim();
    if t.is_empty() {
        return Ok(None);
    }
    if let Some(rest) = strip_ci(t, "CC") {
        return parse_control_change(rest, token).map(Some);
    }
    if let Some(rest) = strip_ci(t, "KS") {
        return parse_key_switch(rest, token).map(Some);
    }
    if let Some(rest) = strip_ci(t, "PC") {
        return parse_program_change(rest, token).map(Some);
    }
    if let Some(action) = parse_pitch_literal(t, middle_c)? {
        return Ok(Some(action));
    }
    Err(Error::syntax(format!("illegal midi setting: \"{token}\"")))
}

/// Format a single action token. The inverse of `parse_action` for
/// everything except pitch literals.
pub fn format_action(action: MidiAction) -> String {
    match action {
        MidiAction::ControlChange { controller, value } => format!("CC{controller}={value}"),
        MidiAction::KeySwitch { note, velocity: 127 } => format!("KS{note}"),
        MidiAction::KeySwitch { note, velocity } => format!("KS{note}={velocity}"),
        MidiAction::ProgramChange { program } => format!("PC{program}"),
    }
}

/// Parse a `, `-separated action list, dropping blank tokens.
/// Any bad token aborts the whole parse.
pub fn parse_action_list(s: &str, middle_c: MiddleC) -> Result<Vec<MidiAction>> {
    let mut actions = Vec::new();
    for part in s.split(',') {
        if let Some(action) = parse_action(part, middle_c)? {
            actions.push(action);
        }
    }
    Ok(actions)
}

/// Format an action list as `, `-joined tokens.
pub fn format_action_list(actions: &[MidiAction]) -> String {
    let tokens: Vec<String> = actions.iter().map(|a| format_action(*a)).collect();
    tokens.join(", ")
}

/// Parse an action list directly into wire actions (export direction).
pub fn parse_switch_actions(s: &str, middle_c: MiddleC) -> Result<Vec<SwitchAction>> {
    Ok(parse_action_list(s, middle_c)?
        .into_iter()
        .map(MidiAction::to_wire)
        .collect())
}

/// Format wire actions back into the micro-language (import direction).
///
/// Key switches at full velocity omit the `=velocity` suffix; action kinds
/// the language cannot express are skipped.
pub fn format_switch_actions(actions: &[SwitchAction]) -> String {
    let mut tokens = Vec::new();
    for action in actions {
        match action.kind.as_str() {
            KIND_KEY_SWITCH => {
                if action.param2.is_empty() || action.param2 == "127" {
                    tokens.push(format!("KS{}", action.param1));
                } else {
                    tokens.push(format!("KS{}={}", action.param1, action.param2));
                }
            }
            KIND_CONTROL_CHANGE => {
                tokens.push(format!("CC{}={}", action.param1, action.param2));
            }
            KIND_PROGRAM_CHANGE => {
                tokens.push(format!("PC{}", action.param1));
            }
            _ => {}
        }
    }
    tokens.join(", ")
}

/// Parse a transpose spec: an optionally signed semitone count.
pub fn parse_transpose(s: &str) -> Result<i32> {
    let t = s.trim();
    if t.is_empty() {
        return Err(Error::syntax("illegal transpose"));
    }
    t.parse::<i32>()
        .map_err(|_| Error::syntax(format!("illegal transpose: \"{s}\"")))
}

fn parse_control_change(rest: &str, token: &str) -> Result<MidiAction> {
    let rest = rest.trim_start();
    let (controller, rest) = take_number(rest)
        .ok_or_else(|| Error::syntax(format!("illegal midi setting: \"{token}\"")))?;
    let controller = midi_value(controller, token)?;
    let mut rest = rest.trim_start();
    let had_eq = rest.starts_with('=');
    if had_eq {
        rest = rest[1..].trim_start();
    }
    let (value, rest) = take_number(rest)
        .ok_or_else(|| Error::syntax(format!("illegal midi setting: \"{token}\"")))?;
    let rest = rest.trim_start();
    if let Some(after_slash) = rest.strip_prefix('/') {
        let (denominator, after) = take_number(after_slash.trim_start())
            .ok_or_else(|| Error::syntax(format!("illegal midi setting: \"{token}\"")))?;
        if !after.trim().is_empty() {
            return Err(Error::syntax(format!("illegal midi setting: \"{token}\"")));
        }
        let value = proportion(value, denominator)?;
        return Ok(MidiAction::ControlChange { controller, value });
    }
    if !had_eq || !rest.is_empty() {
        return Err(Error::syntax(format!("illegal midi setting: \"{token}\"")));
    }
    Ok(MidiAction::ControlChange {
        controller,
        value: midi_value(value, token)?,
    })
}

fn parse_key_switch(rest: &str, token: &str) -> Result<MidiAction> {
    let rest = rest.trim_start();
    let (note, rest) = take_number(rest)
        .ok_or_else(|| Error::syntax(format!("illegal midi setting: \"{token}\"")))?;
    let note = midi_value(note, token)?;
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Ok(MidiAction::KeySwitch { note, velocity: 127 });
    }
    let rest = rest
        .strip_prefix('=')
        .ok_or_else(|| Error::syntax(format!("illegal midi setting: \"{token}\"")))?
        .trim_start();
    let (velocity, rest) = take_number(rest)
        .ok_or_else(|| Error::syntax(format!("illegal midi setting: \"{token}\"")))?;
    if !rest.trim().is_empty() {
        return Err(Error::syntax(format!("illegal midi setting: \"{token}\"")));
    }
    Ok(MidiAction::KeySwitch {
        note,
        velocity: midi_value(velocity, token)?,
    })
}

fn parse_program_change(rest: &str, token: &str) -> Result<MidiAction> {
    let rest = rest.trim_start();
    let (program, rest) = take_number(rest)
        .ok_or_else(|| Error::syntax(format!("illegal midi setting: \"{token}\"")))?;
    if !rest.trim().is_empty() {
        return Err(Error::syntax(format!("illegal midi setting: \"{token}\"")));
    }
    Ok(MidiAction::ProgramChange {
        program: midi_value(program, token)?,
    })
}

/// Pitch literal: note letter, optional accidental, octave number.
/// Returns `None` when the token is not shaped like a pitch literal at all.
fn parse_pitch_literal(t: &str, middle_c: MiddleC) -> Result<Option<MidiAction>> {
    let mut chars = t.chars();
    let pitch_class: i32 = match chars.next().map(|c| c.to_ascii_lowercase()) {
        Some('c') => 0,
        Some('d') => 2,
        Some('e') => 4,
        Some('f') => 5,
        Some('g') => 7,
        Some('a') => 9,
        Some('b') => 11,
        _ => return Ok(None),
    };
    let rest = chars.as_str();
    let (accidental, rest) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };
    let octave: i32 = match rest.trim().parse() {
        Ok(o) => o,
        Err(_) => return Ok(None),
    };
    let note = 60 + (octave - middle_c.octave()) * 12 + pitch_class + accidental;
    if !(0..=127).contains(&note) {
        return Err(Error::syntax(format!("note out of midi range: \"{t}\"")));
    }
    Ok(Some(MidiAction::KeySwitch {
        note: note as u8,
        velocity: 127,
    }))
}

/// Proportional value: round(((m - 0.5) / d) * 128) for a proper fraction.
fn proportion(numerator: u32, denominator: u32) -> Result<u8> {
    if numerator < 1 {
        return Err(Error::syntax(format!(
            "midi numerator must be >= 1: {numerator}/{denominator}"
        )));
    }
    if numerator > denominator {
        return Err(Error::syntax(format!(
            "fraction is not proper: {numerator}/{denominator}"
        )));
    }
    let value = ((f64::from(numerator) - 0.5) / f64::from(denominator) * 128.0).round();
    Ok(value as u8)
}

fn midi_value(n: u32, token: &str) -> Result<u8> {
    if n > 127 {
        return Err(Error::syntax(format!("midi value out of range: \"{token}\"")));
    }
    Ok(n as u8)
}

fn strip_ci<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    match s.get(..tag.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(tag) => Some(&s[tag.len()..]),
        _ => None,
    }
}

fn take_number(s: &str) -> Option<(u32, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    s[..end].parse().ok().map(|n| (n, &s[end..]))
}
