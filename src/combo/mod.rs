// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Combination addressing and axis enumeration.
//!
//! A combination is the set of non-neutral techniques active across the
//! axes. It has two keys: a canonical string (sorted vendor ids joined by
//! `+`) and an XOR address folded over the selected techniques' random ids.
//! Enumeration walks every combination index with a mixed-radix
//! decomposition over the sorted axes.

use crate::catalog::{TechniqueCatalog, NEUTRAL_ID};
use crate::error::{Error, Result};
use crate::project::{id, Axis};

/// Canonical string for the empty (all-neutral) combination.
pub const NEUTRAL_KEY: &str = NEUTRAL_ID;

/// Canonicalize a `+`-joined technique id string: sort the ids
/// lexicographically and rejoin. Idempotent and order-independent.
/// An empty set canonicalizes to the neutral key.
pub fn canonical_key(ids: &str) -> String {
    if ids.trim().is_empty() {
        return NEUTRAL_KEY.to_string();
    }
    let mut parts: Vec<&str> = ids.split('+').collect();
    parts.sort_unstable();
    parts.join("+")
}

/// Number of combination indices over the given axes.
/// Overflow is an error, never a silent wrap.
pub fn combination_count(axes: &[&Axis]) -> Result<usize> {
    let mut count: usize = 1;
    for axis in axes {
        if axis.techniques.is_empty() {
            return Err(Error::semantic(format!(
                "axis \"{}\" has no techniques",
                axis.name
            )));
        }
        count = count.checked_mul(axis.techniques.len()).ok_or_else(|| {
            Error::semantic("combination space overflows".to_string())
        })?;
    }
    Ok(count)
}

/// Per-axis selection for a combination index, aligned with `axes`.
/// Index 0 selects every axis's neutral technique.
///
/// Mixed-radix decomposition, low-priority axes last: the final axis is
/// the fastest-varying digit.
pub fn selections(axes: &[&Axis], index: usize) -> Vec<usize> {
    let mut selected = vec![0; axes.len()];
    let mut k = index;
    for a in (0..axes.len()).rev() {
        let n = axes[a].techniques.len().max(1);
        selected[a] = k % n;
        k /= n;
    }
    selected
}

/// Canonical combination string for an index: the sorted vendor ids of all
/// non-neutral selections, or the neutral key when everything is neutral.
pub fn combo_string(
    axes: &[&Axis],
    index: usize,
    catalog: &dyn TechniqueCatalog,
) -> Result<String> {
    let mut ids = Vec::new();
    for (axis, selected) in axes.iter().zip(selections(axes, index)) {
        if selected == 0 {
            continue;
        }
        let technique = &axis.techniques[selected];
        let id = catalog.id_for_name(&technique.name).ok_or_else(|| {
            Error::semantic(format!(
                "technique \"{}\" is not in the catalog",
                technique.name
            ))
        })?;
        ids.push(id);
    }
    if ids.is_empty() {
        return Ok(NEUTRAL_KEY.to_string());
    }
    ids.sort_unstable();
    Ok(ids.join("+"))
}

/// XOR address for an index, folded over every axis's selected technique
/// id, neutrals included, so even the all-neutral index gets a distinct
/// address.
pub fn combo_address(axes: &[&Axis], index: usize) -> Result<String> {
    let selected = selections(axes, index);
    id::xor_ids(
        axes.iter()
            .zip(selected)
            .map(|(axis, s)| axis.techniques[s].id.as_str()),
    )
}
