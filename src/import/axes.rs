// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Axis inference from observed combinations.
//!
//! Two techniques conflict when some observed combination contains both;
//! conflicting techniques can never share an axis. Partitioning starts from
//! a fixed skeleton of default axes whose well-known techniques have a fixed
//! home, then places the remaining techniques greedily: first-fit into the
//! extra axes in creation order, opening a new axis when none accepts.
//! Greedy first-fit is a heuristic graph coloring; minimizing the axis
//! count is NP-hard and not attempted.
//!
//! Determinism: techniques are processed in first-discovery order and axes
//! in creation order. Feeding the same combination sequence (and the same
//! seeded id generator) twice produces identical axes.

use std::collections::{HashMap, HashSet};

use crate::catalog::{display_name, TechniqueCatalog, NEUTRAL_ID};
use crate::project::{Axis, IdGenerator, Technique};

/// Skeleton axes and the vendor techniques that have a fixed home there.
const SKELETON: &[(&str, &[&str])] = &[
    ("Length", &["pt.staccato", "pt.staccatissimo", "pt.tenuto", "pt.portato"]),
    ("Legato", &["pt.legato"]),
    ("Vibrato", &["pt.vibrato", "pt.nonVibrato", "pt.moltoVibrato"]),
    ("Attack", &["pt.marcato", "pt.accent"]),
    ("Technique", &[]),
];

/// Which techniques co-occur in some observed combination.
#[derive(Debug)]
pub struct ConflictGraph {
    pairs: HashSet<(String, String)>,
}

impl ConflictGraph {
    /// Build the graph from canonical combination strings.
    pub fn build(combos: &[String]) -> Self {
        let mut pairs = HashSet::new();
        for combo in combos {
            let ids: Vec<&str> = combo
                .split('+')
                .filter(|id| !id.is_empty() && *id != NEUTRAL_ID)
                .collect();
            for (k, a) in ids.iter().enumerate() {
                for b in &ids[k + 1..] {
                    pairs.insert(ordered(a, b));
                }
            }
        }
        Self { pairs }
    }

    /// True when the two techniques appear together somewhere.
    pub fn occurs_with(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&ordered(a, b))
    }
}

fn ordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Observed technique ids in first-discovery order (neutral excluded).
pub fn discovered_techniques(combos: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut discovered = Vec::new();
    for combo in combos {
        for id in combo.split('+') {
            if id.is_empty() || id == NEUTRAL_ID {
                continue;
            }
            if seen.insert(id.to_string()) {
                discovered.push(id.to_string());
            }
        }
    }
    discovered
}

/// Observed techniques with no skeleton home, in discovery order.
pub fn find_extra_techniques(combos: &[String]) -> Vec<String> {
    discovered_techniques(combos)
        .into_iter()
        .filter(|id| skeleton_home(id).is_none())
        .collect()
}

fn skeleton_home(id: &str) -> Option<usize> {
    SKELETON
        .iter()
        .position(|(_, members)| members.contains(&id))
}

/// The inferred axes plus where each vendor technique landed.
#[derive(Debug)]
pub struct Partition {
    /// Axes in ascending sort-key order: skeleton first, extras after
    pub axes: Vec<Axis>,
    /// Vendor id -> (axis index, technique index within the axis)
    pub placement: HashMap<String, (usize, usize)>,
}

/// Partition the observed combinations' techniques into axes.
///
/// Always succeeds: in the worst case every extra technique gets a
/// singleton axis.
pub fn find_axes(
    combos: &[String],
    catalog: &dyn TechniqueCatalog,
    gen: &mut IdGenerator,
) -> Partition {
    let conflicts = ConflictGraph::build(combos);
    let discovered = discovered_techniques(combos);

    let mut axes: Vec<Axis> = SKELETON
        .iter()
        .enumerate()
        .map(|(k, (name, _))| Axis::with_neutral(*name, (k + 1) as f64, gen))
        .collect();
    let skeleton_len = axes.len();
    // Vendor ids per axis, for conflict checks against extra axes.
    let mut members: Vec<Vec<String>> = vec![Vec::new(); skeleton_len];
    let mut placement = HashMap::new();

    let mut extras = Vec::new();
    for id in discovered {
        match skeleton_home(&id) {
            Some(axis) => place(&mut axes, &mut members, &mut placement, axis, &id, catalog, gen),
            None => extras.push(id),
        }
    }

    for id in extras {
        let accepting = (skeleton_len..axes.len()).find(|&axis| {
            members[axis].iter().all(|m| !conflicts.occurs_with(m, &id))
        });
        let axis = match accepting {
            Some(axis) => axis,
            None => {
                let sort_order = (axes.len() + 1) as f64;
                axes.push(Axis::with_neutral(gen.next_id(), sort_order, gen));
                members.push(Vec::new());
                axes.len() - 1
            }
        };
        place(&mut axes, &mut members, &mut placement, axis, &id, catalog, gen);
    }

    Partition { axes, placement }
}

fn place(
    axes: &mut [Axis],
    members: &mut [Vec<String>],
    placement: &mut HashMap<String, (usize, usize)>,
    axis: usize,
    vendor_id: &str,
    catalog: &dyn TechniqueCatalog,
    gen: &mut IdGenerator,
) {
    axes[axis].techniques.push(Technique {
        id: gen.next_id(),
        name: display_name(catalog, vendor_id),
    });
    members[axis].push(vendor_id.to_string());
    placement.insert(
        vendor_id.to_string(),
        (axis, axes[axis].techniques.len() - 1),
    );
}
