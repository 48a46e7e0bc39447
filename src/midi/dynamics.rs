// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Volume spec codec.
//!
//! A volume spec selects how dynamics reach the instrument:
//! ```text
//!   velocity [lo:hi]    note velocity, optional window
//!   CC n [lo:hi]        continuous controller, optional window
//!   (empty)             note velocity over the full range
//! ```
//! The window defaults to 0:127 and is omitted when formatting if it still
//! covers the full range.

use crate::error::{Error, Result};
use crate::xmap::{VolumeType, FULL_VELOCITY_RANGE, VOLUME_CC, VOLUME_NOTE_VELOCITY};

/// What carries the dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicsKind {
    /// Note velocity
    Velocity,
    /// Continuous controller with the given number
    Controller(u8),
}

/// A parsed volume spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicsSpec {
    pub kind: DynamicsKind,
    /// Low end of the dynamic window
    pub low: u8,
    /// High end of the dynamic window
    pub high: u8,
}

impl DynamicsSpec {
    /// The default spec: velocity over the full range.
    pub fn full_velocity() -> Self {
        Self {
            kind: DynamicsKind::Velocity,
            low: 0,
            high: 127,
        }
    }

    /// Convert to the document's volume type and "lo,hi" range string.
    pub fn to_wire(self) -> (VolumeType, String) {
        let volume = match self.kind {
            DynamicsKind::Velocity => VolumeType::velocity(),
            DynamicsKind::Controller(n) => VolumeType {
                kind: VOLUME_CC.to_string(),
                param1: n.to_string(),
            },
        };
        (volume, format!("{},{}", self.low, self.high))
    }
}

/// Parse a volume spec. Empty input is the full-range velocity default.
pub fn parse_dynamics(s: &str) -> Result<DynamicsSpec> {
    let t = s.trim();
    if t.is_empty() {
        return Ok(DynamicsSpec::full_velocity());
    }
    if let Some(rest) = strip_ci(t, "velocity") {
        let (low, high) = parse_window(rest, s)?;
        return Ok(DynamicsSpec {
            kind: DynamicsKind::Velocity,
            low,
            high,
        });
    }
    if let Some(rest) = strip_ci(t, "cc") {
        let rest = rest.trim_start();
        let (number, rest) = take_number(rest)
            .ok_or_else(|| Error::syntax(format!("bad velocity pattern: \"{s}\"")))?;
        if number > 127 {
            return Err(Error::syntax(format!("bad velocity pattern: \"{s}\"")));
        }
        let (low, high) = parse_window(rest, s)?;
        return Ok(DynamicsSpec {
            kind: DynamicsKind::Controller(number as u8),
            low,
            high,
        });
    }
    Err(Error::syntax(format!("bad velocity pattern: \"{s}\"")))
}

/// Format a wire volume type and "lo,hi" range back into the spec language
/// (import direction). The range suffix is omitted when it covers 0:127.
pub fn format_dynamics(volume: &VolumeType, range: &str) -> String {
    let suffix = range_suffix(range);
    match volume.kind.as_str() {
        VOLUME_CC => format!("CC{}{}", volume.param1, suffix),
        VOLUME_NOTE_VELOCITY => format!("velocity{suffix}"),
        _ => "velocity".to_string(),
    }
}

fn range_suffix(range: &str) -> String {
    if range.is_empty() || range == FULL_VELOCITY_RANGE {
        return String::new();
    }
    match range.split_once(',') {
        Some((lo, hi)) => format!(" {lo}:{hi}"),
        None => String::new(),
    }
}

/// Parse an optional " lo:hi" window; absent means 0:127.
fn parse_window(rest: &str, spec: &str) -> Result<(u8, u8)> {
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Ok((0, 127));
    }
    let (low, rest) =
        take_number(rest).ok_or_else(|| Error::syntax(format!("bad velocity pattern: \"{spec}\"")))?;
    let rest = rest
        .trim_start()
        .strip_prefix(':')
        .ok_or_else(|| Error::syntax(format!("bad velocity pattern: \"{spec}\"")))?
        .trim_start();
    let (high, rest) =
        take_number(rest).ok_or_else(|| Error::syntax(format!("bad velocity pattern: \"{spec}\"")))?;
    if !rest.trim().is_empty() || low > 127 || high > 127 {
        return Err(Error::syntax(format!("bad velocity pattern: \"{spec}\"")));
    }
    Ok((low as u8, high as u8))
}

fn strip_ci<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    match s.get(..tag.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(tag) => Some(&s[tag.len()..]),
        _ => None,
    }
}

fn take_number(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    s[..end].parse().ok().map(|n| (n, &s[end..]))
}
