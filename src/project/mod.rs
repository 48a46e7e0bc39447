// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Project model for articulation-switching maps.
//!
//! This module provides the UI-facing data structures: axes of mutually
//! exclusive techniques, sounds (single or composite), and the assignment
//! table keying technique combinations to sounds. The surrounding
//! application authors and persists these; the conversion engine reads them
//! on export and synthesizes fresh ones on import.

pub mod id;

pub use id::{xor_ids, IdGenerator};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Display name of the reserved per-axis neutral technique.
pub const NEUTRAL_NAME: &str = "Natural";

/// Middle C octave convention used by pitch literals ("C4" means MIDI 60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MiddleC {
    C3,
    #[default]
    C4,
    C5,
}

impl MiddleC {
    /// Parse a convention name; anything unrecognized falls back to C4.
    pub fn from_name(name: &str) -> Self {
        match name {
            "C3" | "c3" => MiddleC::C3,
            "C5" | "c5" => MiddleC::C5,
            _ => MiddleC::C4,
        }
    }

    /// The octave number that contains MIDI note 60 under this convention.
    pub fn octave(self) -> i32 {
        match self {
            MiddleC::C3 => 3,
            MiddleC::C4 => 4,
            MiddleC::C5 => 5,
        }
    }
}

/// A named articulation switch (e.g. staccato, legato). Identity is the id;
/// the name is what the catalog maps to a vendor technique id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Technique {
    /// Random 10-character token
    pub id: String,
    /// Display name (e.g. "Staccato")
    pub name: String,
}

/// An ordered set of mutually exclusive techniques.
///
/// Index 0 is always the neutral placeholder; at most one non-neutral
/// technique per axis is active in any combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Axis {
    /// Random 10-character token
    pub id: String,
    /// Display name (e.g. "Length")
    pub name: String,
    /// Global ordering key for deterministic enumeration
    #[serde(default)]
    pub sort_order: f64,
    /// Techniques, neutral placeholder first
    pub techniques: Vec<Technique>,
}

impl Axis {
    /// Create an axis holding only its neutral placeholder.
    pub fn with_neutral(name: impl Into<String>, sort_order: f64, gen: &mut IdGenerator) -> Self {
        Self {
            id: gen.next_id(),
            name: name.into(),
            sort_order,
            techniques: vec![Technique {
                id: gen.next_id(),
                name: NEUTRAL_NAME.to_string(),
            }],
        }
    }
}

/// A sound with a fixed MIDI recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sound {
    /// Random 10-character token
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Switch-on action list in the MIDI micro-language (e.g. "KS24, CC1=64")
    #[serde(default)]
    pub midi: String,
    /// Switch-off action list
    #[serde(default)]
    pub stop: String,
    /// Volume spec (e.g. "velocity 10:120", "CC11")
    #[serde(default)]
    pub dynamics: String,
}

/// One conditioned branch of a composite sound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    /// Note-length condition text; empty means the default branch
    #[serde(default)]
    pub condition: String,
    /// Id of the sound this branch plays
    pub sound: String,
    /// Length factor in percent; None leaves note lengths untouched
    #[serde(default)]
    pub length: Option<f64>,
    /// Transpose in semitones; None means no transposition
    #[serde(default)]
    pub transpose: Option<f64>,
}

/// A sound defined by conditioned branches; the first matching condition
/// wins at performance time, with an unconditional branch as fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeSound {
    /// Random 10-character token
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Branches in evaluation order
    pub branches: Vec<Branch>,
}

/// A technique add-on: a modifier layered on top of whatever combination is
/// active, with its own start and stop actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOn {
    /// Random 10-character token
    pub id: String,
    /// Position among add-ons in the exported document
    #[serde(default)]
    pub order: i32,
    /// Display name (resolved through the technique catalog)
    pub name: String,
    /// Switch-on action list
    #[serde(default)]
    pub midi: String,
    /// Switch-off action list
    #[serde(default)]
    pub stop: String,
}

/// Maps a combination address to a sound. An empty sound id means the
/// combination is unassigned and is skipped on export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Assignment {
    /// Id of a `Sound` or `CompositeSound`
    #[serde(default)]
    pub sound: String,
}

/// Header metadata carried into the exported document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectMeta {
    /// Map name shown by the host
    pub name: String,
    /// Monotonic version counter
    #[serde(default = "default_version")]
    pub version: u32,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Names of the sample-player plugins this map targets
    #[serde(default)]
    pub plugins: String,
}

fn default_version() -> u32 {
    1
}

/// A complete project: axes, sounds, add-ons, and assignments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Project {
    /// Random project id; becomes the document's entity id
    #[serde(default)]
    pub id: String,
    /// Middle C convention for pitch literals
    #[serde(default)]
    pub middle_c: MiddleC,
    /// Axes keyed by id
    #[serde(default)]
    pub axes: HashMap<String, Axis>,
    /// Single sounds keyed by id
    #[serde(default)]
    pub sounds: HashMap<String, Sound>,
    /// Composite sounds keyed by id
    #[serde(default)]
    pub composites: HashMap<String, CompositeSound>,
    /// Add-on techniques keyed by id
    #[serde(default)]
    pub add_ons: HashMap<String, AddOn>,
    /// Combination address -> sound assignment
    #[serde(default)]
    pub assignments: HashMap<String, Assignment>,
}

impl Project {
    /// Load a project from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read project file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a project from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse project YAML")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize project to YAML")
    }

    /// Save the project to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write project file: {:?}", path.as_ref()))
    }

    /// Axes in ascending sort-key order. Enumeration and export always use
    /// this order, never map iteration order.
    pub fn sorted_axes(&self) -> Vec<&Axis> {
        let mut axes: Vec<&Axis> = self.axes.values().collect();
        axes.sort_by(|a, b| {
            a.sort_order
                .partial_cmp(&b.sort_order)
                .unwrap_or(Ordering::Equal)
        });
        axes
    }

    /// Add-ons in their declared order.
    pub fn sorted_add_ons(&self) -> Vec<&AddOn> {
        let mut add_ons: Vec<&AddOn> = self.add_ons.values().collect();
        add_ons.sort_by_key(|a| a.order);
        add_ons
    }

    /// Look up an assignment's sound id; None if unassigned.
    pub fn assigned_sound(&self, address: &str) -> Option<&str> {
        match self.assignments.get(address) {
            Some(a) if !a.sound.is_empty() => Some(&a.sound),
            _ => None,
        }
    }
}
