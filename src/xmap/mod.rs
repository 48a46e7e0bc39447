// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Interchange document types for the notation host's expression maps.
//!
//! These structures mirror the host's document shape one level above its
//! native XML encoding; an external codec owns the XML itself (documents
//! arrive here already deserialized). Several fields are stringly typed
//! because that is how the wire format carries them.

use serde::{Deserialize, Serialize};

/// Switch action kind for key switches.
pub const KIND_KEY_SWITCH: &str = "kKeySwitch";
/// Switch action kind for control changes.
pub const KIND_CONTROL_CHANGE: &str = "kControlChange";
/// Switch action kind for program changes.
pub const KIND_PROGRAM_CHANGE: &str = "kProgramChange";

/// Volume driven by note velocity.
pub const VOLUME_NOTE_VELOCITY: &str = "kNoteVelocity";
/// Volume driven by a continuous controller.
pub const VOLUME_CC: &str = "kCC";

/// Combination flag bit: length factor enabled.
pub const FLAG_LENGTH_FACTOR: u32 = 1;

/// The full velocity range in wire spelling.
pub const FULL_VELOCITY_RANGE: &str = "0,127";

/// A single MIDI switch action as the document carries it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SwitchAction {
    /// One of the `KIND_*` constants
    pub kind: String,
    /// First parameter (controller/note/program number)
    #[serde(default)]
    pub param1: String,
    /// Second parameter (value/velocity); empty when unused
    #[serde(default)]
    pub param2: String,
}

/// How the host maps dynamics onto MIDI for a combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumeType {
    /// `VOLUME_NOTE_VELOCITY` or `VOLUME_CC`
    pub kind: String,
    /// Controller number for `VOLUME_CC`; "0" otherwise
    #[serde(default)]
    pub param1: String,
}

impl VolumeType {
    /// The host's default: dynamics via note velocity.
    pub fn velocity() -> Self {
        Self {
            kind: VOLUME_NOTE_VELOCITY.to_string(),
            param1: "0".to_string(),
        }
    }
}

impl Default for VolumeType {
    fn default() -> Self {
        Self::velocity()
    }
}

/// One combination record: a technique set, an optional condition, and the
/// MIDI realization for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Combination {
    /// `+`-joined vendor technique ids (e.g. "pt.legato+pt.nonVibrato")
    pub technique_ids: String,
    /// Rendered condition; empty for the default branch
    #[serde(default)]
    pub condition: String,
    /// Bit flags; bit 0 enables the length factor
    #[serde(default)]
    pub flags: u32,
    /// "lo,hi" velocity window
    #[serde(default = "default_range")]
    pub velocity_range: String,
    /// "lo,hi" pitch window
    #[serde(default = "default_range")]
    pub pitch_range: String,
    /// Transpose in semitones
    #[serde(default)]
    pub transpose: i32,
    /// Host scheduling offset; always 0 here
    #[serde(default)]
    pub ticks_before: i32,
    /// Velocity scaling; the host default is "1.0"
    #[serde(default = "default_velocity_factor")]
    pub velocity_factor: String,
    /// Note length multiplier as a decimal string; meaningful only when
    /// the length-factor flag is set
    #[serde(default)]
    pub length_factor: String,
    /// Dynamics mapping
    #[serde(default)]
    pub volume_type: VolumeType,
    /// Attack mapping; the host default mirrors velocity
    #[serde(default)]
    pub attack_type: VolumeType,
    /// Actions sent when the combination activates
    #[serde(default)]
    pub switch_on: Vec<SwitchAction>,
    /// Actions sent when it deactivates
    #[serde(default)]
    pub switch_off: Vec<SwitchAction>,
    /// Whether the host should consider this record at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Host-side grouping id; always 0 here
    #[serde(default)]
    pub base_switch_id: i32,
}

fn default_range() -> String {
    FULL_VELOCITY_RANGE.to_string()
}

fn default_velocity_factor() -> String {
    "1.0".to_string()
}

fn default_enabled() -> bool {
    true
}

impl Combination {
    /// A record with host defaults for the given technique set.
    pub fn new(technique_ids: impl Into<String>) -> Self {
        Self {
            technique_ids: technique_ids.into(),
            condition: String::new(),
            flags: 0,
            velocity_range: default_range(),
            pitch_range: default_range(),
            transpose: 0,
            ticks_before: 0,
            velocity_factor: default_velocity_factor(),
            length_factor: String::new(),
            volume_type: VolumeType::velocity(),
            attack_type: VolumeType::velocity(),
            switch_on: Vec::new(),
            switch_off: Vec::new(),
            enabled: true,
            base_switch_id: 0,
        }
    }
}

/// A technique add-on: layered on top of the active combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TechniqueAddOn {
    /// Host-side switch id; always 0 here
    #[serde(default)]
    pub switch_id: i32,
    /// Vendor technique id this add-on responds to
    pub technique_ids: String,
    /// Whether the host should consider this record
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Actions sent when the add-on engages
    #[serde(default)]
    pub switch_on: Vec<SwitchAction>,
    /// Actions sent when it disengages
    #[serde(default)]
    pub switch_off: Vec<SwitchAction>,
}

/// One mutual-exclusion group derived from an axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MutualExclusionGroup {
    /// Group id ("ptmg.user.<axis-id>")
    pub group_id: String,
    /// Axis display name
    pub name: String,
    /// ", "-joined vendor technique ids
    pub technique_ids: String,
}

/// Actions sent once when the map is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InitSwitch {
    /// Whether init actions run at all
    #[serde(default)]
    pub enabled: bool,
    /// The actions themselves
    #[serde(default)]
    pub actions: Vec<SwitchAction>,
}

/// A complete expression map document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExpressionMap {
    /// Map name shown by the host
    pub name: String,
    /// Stable entity id (the project id)
    #[serde(default)]
    pub entity_id: String,
    /// Parent map for inheritance; unused
    #[serde(default)]
    pub parent_entity_id: String,
    /// Inheritance bit mask; always "0" here
    #[serde(default)]
    pub inheritance_mask: String,
    /// Author field; unused
    #[serde(default)]
    pub creator: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Version counter as the wire carries it
    #[serde(default)]
    pub version: String,
    /// Names of the sample-player plugins this map targets
    #[serde(default)]
    pub plugin_names: String,
    /// Host-side automatic mutual exclusion; disabled, groups are explicit
    #[serde(default)]
    pub auto_mutual_exclusion: bool,
    /// Host quirk toggle; left off
    #[serde(default)]
    pub allow_multiple_notes_at_same_pitch: bool,
    /// Load-time actions
    #[serde(default)]
    pub init_switch: InitSwitch,
    /// Combination records in emission order
    #[serde(default)]
    pub combinations: Vec<Combination>,
    /// Technique add-on records
    #[serde(default)]
    pub add_ons: Vec<TechniqueAddOn>,
    /// Mutual exclusion groups derived from axes
    #[serde(default)]
    pub mutex_groups: Vec<MutualExclusionGroup>,
}
