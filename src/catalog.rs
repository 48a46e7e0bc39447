// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Technique name/id lookup.
//!
//! The notation host identifies playing techniques by vendor ids
//! ("pt.staccato"); the project model uses display names ("Staccato").
//! The lookup between them is a read-only capability injected into the
//! importer and exporter rather than a process-wide table.

/// Read-only bidirectional technique lookup.
pub trait TechniqueCatalog {
    /// Vendor id for a display name.
    fn id_for_name(&self, name: &str) -> Option<&str>;
    /// Display name for a vendor id.
    fn name_for_id(&self, id: &str) -> Option<&str>;
}

/// The id of the reserved neutral technique.
pub const NEUTRAL_ID: &str = "pt.natural";

const PAIRS: &[(&str, &str)] = &[
    ("Natural", "pt.natural"),
    ("Legato", "pt.legato"),
    ("Staccato", "pt.staccato"),
    ("Staccatissimo", "pt.staccatissimo"),
    ("Tenuto", "pt.tenuto"),
    ("Portato", "pt.portato"),
    ("Marcato", "pt.marcato"),
    ("Accent", "pt.accent"),
    ("Vibrato", "pt.vibrato"),
    ("Non vibrato", "pt.nonVibrato"),
    ("Molto vibrato", "pt.moltoVibrato"),
    ("Pizzicato", "pt.pizz"),
    ("Snap pizzicato", "pt.snapPizz"),
    ("Arco", "pt.arco"),
    ("Tremolo", "pt.tremolo"),
    ("Plucked", "pt.plucked"),
    ("Muted", "pt.muted"),
    ("Harmonic", "pt.harmonic"),
    ("Sul ponticello", "pt.sulPont"),
    ("Sul tasto", "pt.sulTasto"),
    ("Col legno", "pt.colLegno"),
    ("Flutter-tongue", "pt.flutterTongue"),
];

/// Built-in catalog covering the common articulations.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl TechniqueCatalog for BuiltinCatalog {
    fn id_for_name(&self, name: &str) -> Option<&str> {
        PAIRS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, id)| *id)
    }

    fn name_for_id(&self, id: &str) -> Option<&str> {
        PAIRS.iter().find(|(_, i)| *i == id).map(|(n, _)| *n)
    }
}

/// A display name for a vendor id the catalog does not know: the id tail
/// with camelCase split into words ("pt.fooBar" -> "Foo Bar").
pub fn fallback_name(id: &str) -> String {
    let tail = id.strip_prefix("pt.").unwrap_or(id);
    let mut name = String::with_capacity(tail.len() + 4);
    for (k, c) in tail.chars().enumerate() {
        if k == 0 {
            name.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            name.push(' ');
            name.extend(c.to_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

/// Display name via the catalog, falling back to a prettified id tail.
pub fn display_name(catalog: &dyn TechniqueCatalog, id: &str) -> String {
    catalog
        .name_for_id(id)
        .map(str::to_string)
        .unwrap_or_else(|| fallback_name(id))
}
