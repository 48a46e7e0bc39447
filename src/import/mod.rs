// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Importer: interchange document -> project.
//!
//! The first stage flattens the document into a table keyed by canonical
//! technique string, then by rendered condition (the PtMap). The second
//! stage rebuilds a full project from that table: inferred axes, fresh
//! sounds, and XOR-keyed assignments.

pub mod axes;

pub use axes::{find_axes, find_extra_techniques, ConflictGraph, Partition};

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use crate::catalog::{display_name, TechniqueCatalog, NEUTRAL_ID};
use crate::combo::canonical_key;
use crate::error::{Error, Result};
use crate::midi::{format_dynamics, format_switch_actions};
use crate::project::{
    AddOn, Assignment, Branch, CompositeSound, IdGenerator, Project, Sound,
};
use crate::xmap::{ExpressionMap, FLAG_LENGTH_FACTOR};

/// The MIDI realization of one branch, in project-facing text form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayData {
    /// Switch-on action list
    pub on: String,
    /// Switch-off action list
    pub off: String,
    /// Volume spec
    pub dynamics: String,
    /// Length factor percent as text; empty when disabled
    pub length: String,
    /// Transpose in semitones
    pub transpose: i32,
}

/// Branches of one combination, keyed by rendered condition
/// (empty = default branch).
pub type BranchTable = BTreeMap<String, PlayData>;

/// The flattened document: canonical technique string -> branches.
pub type ComboTable = BTreeMap<String, BranchTable>;

/// Render a document condition for project display: vendor duration
/// spellings become their display names.
pub fn display_condition(condition: &str) -> String {
    // Longer spellings first so "kShort" never clips "kVeryShort".
    const RENAMES: &[(&str, &str)] = &[
        ("kVeryShort", "veryShort"),
        ("kVeryLong", "veryLong"),
        ("kShort", "short"),
        ("kMedium", "medium"),
        ("kLong", "long"),
    ];
    let mut out = condition.to_string();
    for (vendor, display) in RENAMES {
        out = out.replace(vendor, display);
    }
    out
}

/// Length factor percent as text: empty when the enable flag is clear,
/// otherwise round(factor * 100), defaulting to 100 on unparsable input.
pub fn length_percent(factor: &str, flags: u32) -> String {
    if flags & FLAG_LENGTH_FACTOR == 0 {
        return String::new();
    }
    match factor.parse::<f64>() {
        Ok(f) => format!("{}", (f * 100.0).round() as i64),
        Err(_) => "100".to_string(),
    }
}

/// Flatten a document into the combination table.
///
/// A repeated (technique set, condition) pair silently overwrites the
/// earlier entry; last wins.
pub fn build_combo_table(map: &ExpressionMap) -> ComboTable {
    let mut table = ComboTable::new();
    for combo in &map.combinations {
        let tids = canonical_key(&combo.technique_ids);
        let condition = display_condition(&combo.condition);
        let play = PlayData {
            on: format_switch_actions(&combo.switch_on),
            off: format_switch_actions(&combo.switch_off),
            dynamics: format_dynamics(&combo.volume_type, &combo.velocity_range),
            length: length_percent(&combo.length_factor, combo.flags),
            transpose: combo.transpose,
        };
        let branches = table.entry(tids.clone()).or_default();
        if branches.insert(condition.clone(), play).is_some() {
            warn!(combo = %tids, condition = %condition, "duplicate branch overwritten");
        }
    }
    table
}

/// Canonical combination strings in document order, first appearance only.
pub fn observed_combos(map: &ExpressionMap) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut observed = Vec::new();
    for combo in &map.combinations {
        let key = canonical_key(&combo.technique_ids);
        if seen.insert(key.clone()) {
            observed.push(key);
        }
    }
    observed
}

/// Rebuild a full project from a document.
///
/// Axes come from the conflict-graph partition; every technique, axis, and
/// sound gets a fresh id from the generator.
pub fn import_project(
    map: &ExpressionMap,
    catalog: &dyn TechniqueCatalog,
    gen: &mut IdGenerator,
) -> Result<Project> {
    let table = build_combo_table(map);
    let observed = observed_combos(map);
    let partition = find_axes(&observed, catalog, gen);

    let mut project = Project {
        id: gen.next_id(),
        ..Project::default()
    };

    for key in &observed {
        let branches = &table[key];
        let address = combo_address(&partition, key)?;
        let name = combo_display_name(catalog, key);

        let sound_id = if let Some(play) = unconditional_only(branches) {
            let sound = new_sound(gen, name.clone(), play);
            let id = sound.id.clone();
            project.sounds.insert(id.clone(), sound);
            id
        } else {
            let composite = build_composite(gen, &name, branches, &mut project)?;
            let id = composite.id.clone();
            project.composites.insert(id.clone(), composite);
            id
        };
        project.assignments.insert(address, Assignment { sound: sound_id });
    }

    for axis in partition.axes {
        project.axes.insert(axis.id.clone(), axis);
    }

    for (k, add_on) in map.add_ons.iter().enumerate() {
        let imported = AddOn {
            id: gen.next_id(),
            order: k as i32,
            name: display_name(catalog, &add_on.technique_ids),
            midi: format_switch_actions(&add_on.switch_on),
            stop: format_switch_actions(&add_on.switch_off),
        };
        project.add_ons.insert(imported.id.clone(), imported);
    }

    info!(
        combinations = observed.len(),
        axes = project.axes.len(),
        "imported expression map"
    );
    Ok(project)
}

/// A combination with exactly one branch, unconditional and carrying no
/// length factor or transpose, imports as a single sound.
fn unconditional_only(branches: &BranchTable) -> Option<&PlayData> {
    if branches.len() != 1 {
        return None;
    }
    let play = branches.get("")?;
    if play.length.is_empty() && play.transpose == 0 {
        Some(play)
    } else {
        None
    }
}

fn new_sound(gen: &mut IdGenerator, name: String, play: &PlayData) -> Sound {
    Sound {
        id: gen.next_id(),
        name,
        midi: play.on.clone(),
        stop: play.off.clone(),
        dynamics: play.dynamics.clone(),
    }
}

/// Build a composite sound: conditioned branches in table order, the
/// default branch (if any) last so it acts as the fallback.
fn build_composite(
    gen: &mut IdGenerator,
    name: &str,
    branches: &BranchTable,
    project: &mut Project,
) -> Result<CompositeSound> {
    let mut composite = CompositeSound {
        id: gen.next_id(),
        name: name.to_string(),
        branches: Vec::new(),
    };
    let conditioned = branches.iter().filter(|(c, _)| !c.is_empty());
    let fallback = branches.iter().filter(|(c, _)| c.is_empty());
    for (k, (condition, play)) in conditioned.chain(fallback).enumerate() {
        let sound = new_sound(gen, format!("{} {}", name, k + 1), play);
        let branch = Branch {
            condition: condition.clone(),
            sound: sound.id.clone(),
            length: if play.length.is_empty() {
                None
            } else {
                Some(play.length.parse::<f64>().map_err(|_| {
                    Error::semantic(format!(
                        "bad length factor \"{}\" for {}",
                        play.length, name
                    ))
                })?)
            },
            transpose: if play.transpose == 0 {
                None
            } else {
                Some(f64::from(play.transpose))
            },
        };
        project.sounds.insert(sound.id.clone(), sound);
        composite.branches.push(branch);
    }
    Ok(composite)
}

/// XOR address of a canonical combination under the inferred axes:
/// each axis contributes its selected technique, neutral where the
/// combination selects nothing on that axis.
fn combo_address(partition: &Partition, key: &str) -> Result<String> {
    let active: HashSet<&str> = if key == NEUTRAL_ID {
        HashSet::new()
    } else {
        key.split('+').collect()
    };
    let mut selected: Vec<&str> = Vec::with_capacity(partition.axes.len());
    for axis in &partition.axes {
        selected.push(axis.techniques[0].id.as_str());
    }
    for id in &active {
        let (axis, technique) = *partition.placement.get(*id).ok_or_else(|| {
            Error::semantic(format!("technique {id} was never partitioned"))
        })?;
        selected[axis] = partition.axes[axis].techniques[technique].id.as_str();
    }
    crate::project::xor_ids(selected)
}

fn combo_display_name(catalog: &dyn TechniqueCatalog, key: &str) -> String {
    if key == NEUTRAL_ID {
        return "Natural".to_string();
    }
    let names: Vec<String> = key.split('+').map(|id| display_name(catalog, id)).collect();
    names.join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuiltinCatalog;
    use crate::xmap::{
        Combination, SwitchAction, VolumeType, KIND_CONTROL_CHANGE, KIND_KEY_SWITCH,
        KIND_PROGRAM_CHANGE, VOLUME_CC,
    };

    fn ks(note: &str, velocity: &str) -> SwitchAction {
        SwitchAction {
            kind: KIND_KEY_SWITCH.into(),
            param1: note.into(),
            param2: velocity.into(),
        }
    }

    fn pc(program: &str) -> SwitchAction {
        SwitchAction {
            kind: KIND_PROGRAM_CHANGE.into(),
            param1: program.into(),
            param2: "0".into(),
        }
    }

    fn cc(controller: &str, value: &str) -> SwitchAction {
        SwitchAction {
            kind: KIND_CONTROL_CHANGE.into(),
            param1: controller.into(),
            param2: value.into(),
        }
    }

    /// The reference document from the import tests: a conditioned legato
    /// pair, a three-technique chord, and a conditioned natural triple.
    fn reference_map() -> ExpressionMap {
        let mut map = ExpressionMap {
            name: "Ref".into(),
            ..ExpressionMap::default()
        };

        let mut legato_short = Combination::new("pt.legato");
        legato_short.condition = "NoteLength <= kMedium".into();
        legato_short.switch_on = vec![ks("25", "127"), pc("6"), cc("1", "64")];
        legato_short.velocity_range = "1,127".into();
        map.combinations.push(legato_short);

        let mut legato_long = Combination::new("pt.legato");
        legato_long.condition = "NoteLength > kMedium".into();
        legato_long.switch_on = vec![ks("26", "127"), pc("6"), cc("1", "64")];
        legato_long.volume_type = VolumeType {
            kind: VOLUME_CC.into(),
            param1: "2".into(),
        };
        legato_long.velocity_range = "1,120".into();
        legato_long.flags = FLAG_LENGTH_FACTOR;
        legato_long.length_factor = "0.95".into();
        legato_long.transpose = -1;
        map.combinations.push(legato_long);

        let mut chord = Combination::new("pt.nonVibrato+pt.marcato+pt.plucked");
        chord.switch_on = vec![ks("24", "127"), pc("13"), cc("7", "23")];
        chord.velocity_range = "1,127".into();
        map.combinations.push(chord);

        let mut natural_short = Combination::new("pt.natural");
        natural_short.condition = "NoteLength < kMedium".into();
        natural_short.switch_on = vec![ks("12", "120"), ks("24", "127"), pc("15"), cc("4", "64")];
        natural_short.velocity_range = "10,120".into();
        map.combinations.push(natural_short);

        map
    }

    #[test]
    fn test_display_condition_renames_constants() {
        assert_eq!(
            display_condition("NoteLength >= kMedium AND NoteLength < kVeryLong"),
            "NoteLength >= medium AND NoteLength < veryLong"
        );
        assert_eq!(display_condition(""), "");
    }

    #[test]
    fn test_length_percent() {
        assert_eq!(length_percent("", 0), "");
        assert_eq!(length_percent("0.85", 0), "");
        assert_eq!(length_percent("1.0", FLAG_LENGTH_FACTOR), "100");
        assert_eq!(length_percent("0.85", FLAG_LENGTH_FACTOR), "85");
        assert_eq!(length_percent("0.0", FLAG_LENGTH_FACTOR), "0");
        assert_eq!(length_percent("1.05", FLAG_LENGTH_FACTOR), "105");
        // Unparsable input defaults to 100
        assert_eq!(length_percent("fast", FLAG_LENGTH_FACTOR), "100");
    }

    #[test]
    fn test_build_combo_table() {
        let table = build_combo_table(&reference_map());
        assert_eq!(table.len(), 3);

        let legato = &table["pt.legato"];
        assert_eq!(legato.len(), 2);
        let short = &legato["NoteLength <= medium"];
        assert_eq!(short.on, "KS25, PC6, CC1=64");
        assert_eq!(short.dynamics, "velocity 1:127");
        assert_eq!(short.length, "");
        assert_eq!(short.transpose, 0);
        let long = &legato["NoteLength > medium"];
        assert_eq!(long.on, "KS26, PC6, CC1=64");
        assert_eq!(long.dynamics, "CC2 1:120");
        assert_eq!(long.length, "95");
        assert_eq!(long.transpose, -1);

        // The chord record canonicalizes its technique ids
        let chord = &table["pt.marcato+pt.nonVibrato+pt.plucked"];
        assert_eq!(chord[""].on, "KS24, PC13, CC7=23");

        let natural = &table["pt.natural"];
        assert_eq!(
            natural["NoteLength < medium"].on,
            "KS12=120, KS24, PC15, CC4=64"
        );
        assert_eq!(natural["NoteLength < medium"].dynamics, "velocity 10:120");
    }

    #[test]
    fn test_duplicate_branch_last_wins() {
        let mut map = ExpressionMap::default();
        let mut first = Combination::new("pt.legato");
        first.switch_on = vec![ks("20", "127")];
        map.combinations.push(first);
        let mut second = Combination::new("pt.legato");
        second.switch_on = vec![ks("30", "127")];
        map.combinations.push(second);

        let table = build_combo_table(&map);
        assert_eq!(table["pt.legato"][""].on, "KS30");
    }

    #[test]
    fn test_observed_combos_preserve_document_order() {
        let mut map = ExpressionMap::default();
        for tids in ["pt.zeta", "pt.alpha", "pt.zeta", "pt.beta+pt.alpha"] {
            map.combinations.push(Combination::new(tids));
        }
        assert_eq!(
            observed_combos(&map),
            vec!["pt.zeta", "pt.alpha", "pt.alpha+pt.beta"]
        );
    }

    #[test]
    fn test_import_project_builds_sounds_and_assignments() {
        let map = reference_map();
        let mut gen = IdGenerator::from_seed(31);
        let project = import_project(&map, &BuiltinCatalog, &mut gen).unwrap();

        // pt.legato has two conditioned branches -> composite with 2 branches
        let legato = project
            .composites
            .values()
            .find(|c| c.name == "Legato")
            .expect("composite for legato");
        assert_eq!(legato.branches.len(), 2);
        let conditions: Vec<&str> =
            legato.branches.iter().map(|b| b.condition.as_str()).collect();
        assert!(conditions.contains(&"NoteLength <= medium"));
        assert!(conditions.contains(&"NoteLength > medium"));
        let long = legato
            .branches
            .iter()
            .find(|b| b.condition == "NoteLength > medium")
            .unwrap();
        assert_eq!(long.length, Some(95.0));
        assert_eq!(long.transpose, Some(-1.0));

        // The unconditional chord imports as a single sound
        let chord = project
            .sounds
            .values()
            .find(|s| s.name == "Marcato + Non vibrato + Plucked")
            .expect("single sound for the chord");
        assert_eq!(chord.midi, "KS24, PC13, CC7=23");

        // Every observed combination got an assignment
        assert_eq!(project.assignments.len(), 3);
        for assignment in project.assignments.values() {
            let id = &assignment.sound;
            assert!(
                project.sounds.contains_key(id) || project.composites.contains_key(id),
                "assignment points at a real sound"
            );
        }

        // Five skeleton axes plus one opened for pt.plucked, which has
        // no skeleton home
        assert_eq!(project.axes.len(), 6);
    }

    #[test]
    fn test_import_is_deterministic() {
        let map = reference_map();
        let a = import_project(&map, &BuiltinCatalog, &mut IdGenerator::from_seed(8)).unwrap();
        let b = import_project(&map, &BuiltinCatalog, &mut IdGenerator::from_seed(8)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_import_add_ons() {
        let mut map = ExpressionMap::default();
        map.combinations.push(Combination::new("pt.legato"));
        map.add_ons.push(crate::xmap::TechniqueAddOn {
            technique_ids: "pt.tremolo".into(),
            switch_on: vec![cc("20", "127")],
            switch_off: vec![cc("20", "0")],
            ..crate::xmap::TechniqueAddOn::default()
        });

        let mut gen = IdGenerator::from_seed(32);
        let project = import_project(&map, &BuiltinCatalog, &mut gen).unwrap();
        assert_eq!(project.add_ons.len(), 1);
        let add_on = project.add_ons.values().next().unwrap();
        assert_eq!(add_on.name, "Tremolo");
        assert_eq!(add_on.midi, "CC20=127");
        assert_eq!(add_on.stop, "CC20=0");
    }
}
