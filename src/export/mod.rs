// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Exporter: project -> interchange document.
//!
//! Walks the sorted axes through every combination index, looks up the
//! assignment for each XOR address, and emits one record per single sound
//! or per composite branch. Unassigned combinations are skipped, so the
//! document is sparse. Mutual-exclusion groups are derived from the axes
//! afterwards.

use tracing::{debug, info};

use crate::catalog::TechniqueCatalog;
use crate::combo::{combination_count, combo_address, combo_string, selections};
use crate::condition::parse_branch;
use crate::error::{Error, Result};
use crate::midi::{parse_dynamics, parse_switch_actions};
use crate::project::{Axis, CompositeSound, MiddleC, Project, ProjectMeta, Sound};
use crate::xmap::{
    Combination, ExpressionMap, InitSwitch, MutualExclusionGroup, TechniqueAddOn,
    FLAG_LENGTH_FACTOR,
};

/// Build the complete expression map for a project.
pub fn build_expression_map(
    meta: &ProjectMeta,
    project: &Project,
    catalog: &dyn TechniqueCatalog,
) -> Result<ExpressionMap> {
    let axes = project.sorted_axes();
    let combinations = build_combinations(project, &axes, catalog)?;
    let add_ons = add_on_records(project, catalog)?;
    let mutex_groups = mutual_exclusion_groups(&axes, catalog)?;

    info!(
        combinations = combinations.len(),
        groups = mutex_groups.len(),
        "built expression map"
    );
    Ok(ExpressionMap {
        name: meta.name.clone(),
        entity_id: project.id.clone(),
        parent_entity_id: String::new(),
        inheritance_mask: "0".to_string(),
        creator: String::new(),
        description: meta.description.clone(),
        version: meta.version.to_string(),
        plugin_names: meta.plugins.clone(),
        auto_mutual_exclusion: false,
        allow_multiple_notes_at_same_pitch: false,
        init_switch: InitSwitch::default(),
        combinations,
        add_ons,
        mutex_groups,
    })
}

fn build_combinations(
    project: &Project,
    axes: &[&Axis],
    catalog: &dyn TechniqueCatalog,
) -> Result<Vec<Combination>> {
    let count = combination_count(axes)?;
    let mut records = Vec::new();
    for index in 0..count {
        let technique_ids = combo_string(axes, index, catalog)?;
        let address = combo_address(axes, index)?;
        let Some(sound_id) = project.assigned_sound(&address) else {
            debug!(combo = %technique_ids, "unassigned, skipping");
            continue;
        };
        if let Some(sound) = project.sounds.get(sound_id) {
            records.push(combination_for_sound(
                &technique_ids,
                sound,
                project.middle_c,
            )?);
        } else if let Some(composite) = project.composites.get(sound_id) {
            records.extend(combinations_for_composite(
                &technique_ids,
                composite,
                project,
            )?);
        } else {
            return Err(Error::semantic(format!(
                "no sound {sound_id} for {technique_ids} (address {address})"
            )));
        }
    }
    Ok(records)
}

/// One unconditional record realizing a single sound.
fn combination_for_sound(
    technique_ids: &str,
    sound: &Sound,
    middle_c: MiddleC,
) -> Result<Combination> {
    let spec = parse_dynamics(&sound.dynamics)
        .map_err(|e| e.context(format!("dynamics of sound \"{}\"", sound.name)))?;
    let (volume_type, velocity_range) = spec.to_wire();
    let switch_on = parse_switch_actions(&sound.midi, middle_c)
        .map_err(|e| e.context(format!("switch-on actions of sound \"{}\"", sound.name)))?;
    let switch_off = parse_switch_actions(&sound.stop, middle_c)
        .map_err(|e| e.context(format!("switch-off actions of sound \"{}\"", sound.name)))?;

    let mut combo = Combination::new(technique_ids);
    combo.volume_type = volume_type;
    combo.velocity_range = velocity_range;
    combo.switch_on = switch_on;
    combo.switch_off = switch_off;
    Ok(combo)
}

/// One record per branch of a composite sound, each carrying its parsed
/// condition, in branch order.
fn combinations_for_composite(
    technique_ids: &str,
    composite: &CompositeSound,
    project: &Project,
) -> Result<Vec<Combination>> {
    let mut records = Vec::with_capacity(composite.branches.len());
    for branch in &composite.branches {
        let sound = project.sounds.get(&branch.sound).ok_or_else(|| {
            Error::semantic(format!(
                "no sound {} for a branch of \"{}\"",
                branch.sound, composite.name
            ))
        })?;
        let mut combo = combination_for_sound(technique_ids, sound, project.middle_c)?;
        let condition = parse_branch(&branch.condition)
            .map_err(|e| e.context(format!("condition in \"{}\"", composite.name)))?;
        combo.condition = condition.to_string();
        if let Some(length) = branch.length {
            combo.flags |= FLAG_LENGTH_FACTOR;
            combo.length_factor = format!("{:.6}", length / 100.0);
        }
        if let Some(transpose) = branch.transpose {
            combo.transpose = transpose as i32;
        }
        records.push(combo);
    }
    Ok(records)
}

/// One group per axis holding more than one technique, listing its
/// non-neutral vendor ids.
fn mutual_exclusion_groups(
    axes: &[&Axis],
    catalog: &dyn TechniqueCatalog,
) -> Result<Vec<MutualExclusionGroup>> {
    let mut groups = Vec::new();
    for axis in axes {
        if axis.techniques.len() <= 1 {
            continue;
        }
        let mut ids = Vec::with_capacity(axis.techniques.len() - 1);
        for technique in &axis.techniques[1..] {
            let id = catalog.id_for_name(&technique.name).ok_or_else(|| {
                Error::semantic(format!(
                    "technique \"{}\" on axis \"{}\" is not in the catalog",
                    technique.name, axis.name
                ))
            })?;
            ids.push(id);
        }
        groups.push(MutualExclusionGroup {
            group_id: format!("ptmg.user.{}", axis.id),
            name: axis.name.clone(),
            technique_ids: ids.join(", "),
        });
    }
    Ok(groups)
}

/// Add-on records in declared order.
fn add_on_records(
    project: &Project,
    catalog: &dyn TechniqueCatalog,
) -> Result<Vec<TechniqueAddOn>> {
    let mut records = Vec::new();
    for add_on in project.sorted_add_ons() {
        let technique_ids = catalog.id_for_name(&add_on.name).ok_or_else(|| {
            Error::semantic(format!(
                "add-on technique \"{}\" is not in the catalog",
                add_on.name
            ))
        })?;
        let switch_on = parse_switch_actions(&add_on.midi, project.middle_c)
            .map_err(|e| e.context(format!("switch-on actions of add-on \"{}\"", add_on.name)))?;
        let switch_off = parse_switch_actions(&add_on.stop, project.middle_c)
            .map_err(|e| e.context(format!("switch-off actions of add-on \"{}\"", add_on.name)))?;
        records.push(TechniqueAddOn {
            switch_id: 0,
            technique_ids: technique_ids.to_string(),
            enabled: true,
            switch_on,
            switch_off,
        });
    }
    Ok(records)
}

/// One row of the dense UI-facing assignment table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    /// Selected technique id per axis, neutrals included
    pub techniques: Vec<String>,
    /// XOR address of the selection
    pub address: String,
    /// Assigned sound id; empty when unassigned
    pub sound: String,
}

/// Enumerate every combination index into a dense assignment table.
pub fn assignment_table(project: &Project) -> Result<Vec<AssignmentRow>> {
    let axes = project.sorted_axes();
    let count = combination_count(&axes)?;
    let mut rows = Vec::with_capacity(count);
    for index in 0..count {
        let techniques: Vec<String> = axes
            .iter()
            .zip(selections(&axes, index))
            .map(|(axis, s)| axis.techniques[s].id.clone())
            .collect();
        let address = combo_address(&axes, index)?;
        let sound = project
            .assigned_sound(&address)
            .unwrap_or_default()
            .to_string();
        rows.push(AssignmentRow {
            techniques,
            address,
            sound,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuiltinCatalog;
    use crate::project::{
        AddOn, Assignment, Branch, IdGenerator, Technique,
    };
    use crate::xmap::VOLUME_CC;

    fn add_axis(project: &mut Project, name: &str, sort: f64, techniques: &[&str], gen: &mut IdGenerator) {
        let mut axis = Axis::with_neutral(name, sort, gen);
        for t in techniques {
            axis.techniques.push(Technique {
                id: gen.next_id(),
                name: t.to_string(),
            });
        }
        project.axes.insert(axis.id.clone(), axis);
    }

    fn add_sound(project: &mut Project, name: &str, midi: &str, dynamics: &str, gen: &mut IdGenerator) -> String {
        let sound = Sound {
            id: gen.next_id(),
            name: name.into(),
            midi: midi.into(),
            stop: String::new(),
            dynamics: dynamics.into(),
        };
        let id = sound.id.clone();
        project.sounds.insert(id.clone(), sound);
        id
    }

    fn address_of(project: &Project, index: usize) -> String {
        combo_address(&project.sorted_axes(), index).unwrap()
    }

    /// Length axis (Natural, Staccato) and Legato axis (Natural, Legato).
    fn fixture(gen: &mut IdGenerator) -> Project {
        let mut project = Project {
            id: gen.next_id(),
            ..Project::default()
        };
        add_axis(&mut project, "Length", 1.0, &["Staccato"], gen);
        add_axis(&mut project, "Legato", 2.0, &["Legato"], gen);
        project
    }

    #[test]
    fn test_single_sound_yields_one_unconditional_record() {
        let mut gen = IdGenerator::from_seed(41);
        let mut project = fixture(&mut gen);
        let sound = add_sound(&mut project, "Short", "KS24, CC1=64", "velocity 1:127", &mut gen);
        // Index 2 selects staccato alone
        let address = address_of(&project, 2);
        project.assignments.insert(address, Assignment { sound });

        let map = build_expression_map(&ProjectMeta::default(), &project, &BuiltinCatalog).unwrap();
        assert_eq!(map.combinations.len(), 1);
        let record = &map.combinations[0];
        assert_eq!(record.technique_ids, "pt.staccato");
        assert_eq!(record.condition, "");
        assert_eq!(record.velocity_range, "1,127");
        assert_eq!(record.switch_on.len(), 2);
        assert_eq!(record.switch_on[0].param1, "24");
        assert_eq!(record.flags, 0);
    }

    #[test]
    fn test_composite_yields_one_record_per_branch() {
        let mut gen = IdGenerator::from_seed(42);
        let mut project = fixture(&mut gen);
        let short = add_sound(&mut project, "Legato short", "KS25", "", &mut gen);
        let long = add_sound(&mut project, "Legato long", "KS26", "CC2 1:120", &mut gen);
        let composite = CompositeSound {
            id: gen.next_id(),
            name: "Legato".into(),
            branches: vec![
                Branch {
                    condition: "NoteLength <= medium".into(),
                    sound: short,
                    length: None,
                    transpose: None,
                },
                Branch {
                    condition: "NoteLength > medium".into(),
                    sound: long,
                    length: Some(95.0),
                    transpose: Some(-1.0),
                },
            ],
        };
        let composite_id = composite.id.clone();
        project.composites.insert(composite_id.clone(), composite);
        // Index 1 selects legato alone
        let address = address_of(&project, 1);
        project.assignments.insert(address, Assignment { sound: composite_id });

        let map = build_expression_map(&ProjectMeta::default(), &project, &BuiltinCatalog).unwrap();
        assert_eq!(map.combinations.len(), 2);

        let first = &map.combinations[0];
        assert_eq!(first.technique_ids, "pt.legato");
        assert_eq!(first.condition, "NoteLength <= kMedium");
        assert_eq!(first.flags, 0);
        assert_eq!(first.transpose, 0);

        let second = &map.combinations[1];
        assert_eq!(second.condition, "NoteLength > kMedium");
        assert_eq!(second.flags, FLAG_LENGTH_FACTOR);
        assert_eq!(second.length_factor, "0.950000");
        assert_eq!(second.transpose, -1);
        assert_eq!(second.volume_type.kind, VOLUME_CC);
        assert_eq!(second.velocity_range, "1,120");
    }

    #[test]
    fn test_unassigned_combinations_are_skipped() {
        let mut gen = IdGenerator::from_seed(43);
        let project = fixture(&mut gen);
        let map = build_expression_map(&ProjectMeta::default(), &project, &BuiltinCatalog).unwrap();
        assert!(map.combinations.is_empty());
        // Mutex groups still derive from the axes
        assert_eq!(map.mutex_groups.len(), 2);
    }

    #[test]
    fn test_mutual_exclusion_groups() {
        let mut gen = IdGenerator::from_seed(44);
        let mut project = fixture(&mut gen);
        add_axis(&mut project, "Single", 3.0, &[], &mut gen);

        let map = build_expression_map(&ProjectMeta::default(), &project, &BuiltinCatalog).unwrap();
        // The neutral-only axis derives no group
        assert_eq!(map.mutex_groups.len(), 2);
        let length = &map.mutex_groups[0];
        assert_eq!(length.name, "Length");
        assert_eq!(length.technique_ids, "pt.staccato");
        assert!(length.group_id.starts_with("ptmg.user."));
    }

    #[test]
    fn test_missing_sound_is_semantic_error() {
        let mut gen = IdGenerator::from_seed(45);
        let mut project = fixture(&mut gen);
        let address = address_of(&project, 2);
        project
            .assignments
            .insert(address, Assignment { sound: "AAAAAAAAAA".into() });

        let err =
            build_expression_map(&ProjectMeta::default(), &project, &BuiltinCatalog).unwrap_err();
        assert!(matches!(err, Error::Semantic(_)), "{err}");
        assert!(err.to_string().contains("pt.staccato"), "{err}");
    }

    #[test]
    fn test_bad_action_text_aborts_export() {
        let mut gen = IdGenerator::from_seed(46);
        let mut project = fixture(&mut gen);
        let sound = add_sound(&mut project, "Broken", "KS24, nonsense", "", &mut gen);
        let address = address_of(&project, 2);
        project.assignments.insert(address, Assignment { sound });

        let err =
            build_expression_map(&ProjectMeta::default(), &project, &BuiltinCatalog).unwrap_err();
        assert!(matches!(err, Error::Syntax(_)), "{err}");
        assert!(err.to_string().contains("Broken"), "{err}");
    }

    #[test]
    fn test_add_ons_exported_in_order() {
        let mut gen = IdGenerator::from_seed(47);
        let mut project = fixture(&mut gen);
        for (order, name, midi) in [(1, "Tremolo", "CC20=127"), (0, "Muted", "CC21=127")] {
            let add_on = AddOn {
                id: gen.next_id(),
                order,
                name: name.into(),
                midi: midi.into(),
                stop: String::new(),
            };
            project.add_ons.insert(add_on.id.clone(), add_on);
        }

        let map = build_expression_map(&ProjectMeta::default(), &project, &BuiltinCatalog).unwrap();
        assert_eq!(map.add_ons.len(), 2);
        assert_eq!(map.add_ons[0].technique_ids, "pt.muted");
        assert_eq!(map.add_ons[1].technique_ids, "pt.tremolo");
        assert_eq!(map.add_ons[1].switch_on[0].param1, "20");
    }

    #[test]
    fn test_header_fields() {
        let mut gen = IdGenerator::from_seed(48);
        let project = fixture(&mut gen);
        let meta = ProjectMeta {
            name: "Strings".into(),
            version: 7,
            description: "Solo strings".into(),
            plugins: "Sampler One".into(),
        };
        let map = build_expression_map(&meta, &project, &BuiltinCatalog).unwrap();
        assert_eq!(map.name, "Strings");
        assert_eq!(map.entity_id, project.id);
        assert_eq!(map.version, "7");
        assert_eq!(map.description, "Solo strings");
        assert_eq!(map.plugin_names, "Sampler One");
        assert_eq!(map.inheritance_mask, "0");
        assert!(!map.auto_mutual_exclusion);
    }

    #[test]
    fn test_assignment_table_is_dense() {
        let mut gen = IdGenerator::from_seed(49);
        let mut project = fixture(&mut gen);
        let sound = add_sound(&mut project, "Short", "KS24", "", &mut gen);
        let address = address_of(&project, 2);
        project.assignments.insert(address.clone(), Assignment { sound: sound.clone() });

        let rows = assignment_table(&project).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().filter(|r| !r.sound.is_empty()).count(), 1);
        let assigned = rows.iter().find(|r| !r.sound.is_empty()).unwrap();
        assert_eq!(assigned.address, address);
        assert_eq!(assigned.sound, sound);
        // Every row selects one technique per axis
        for row in &rows {
            assert_eq!(row.techniques.len(), 2);
        }
    }
}
