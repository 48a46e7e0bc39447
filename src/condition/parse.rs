// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recursive-descent parsers for conditions.
//!
//! Three entry points: `parse_condition` for clause lists,
//! `parse_range` for the `lo < NoteLength < hi` shorthand, and
//! `parse_branch` which accepts either. Any unmatched token fails the
//! whole parse with no partial result.

use crate::error::{Error, Result};

use super::input::Input;
use super::{Clause, Condition, Conjunction};

/// Parse a branch condition: a clause list or a range shorthand.
/// Empty input is the always-true default branch.
pub fn parse_branch(text: &str) -> Result<Condition> {
    parse_condition(text).or_else(|_| parse_range(text))
}

/// Parse a conjunction of clauses. All connectors must agree; mixing
/// AND with OR is an error.
pub fn parse_condition(text: &str) -> Result<Condition> {
    let mut rest = Input::new(text);
    let mut connector: Option<Conjunction> = None;
    let mut clauses = Vec::new();
    while !rest.is_empty() {
        let (after_clause, clause) = parse_clause(rest)?;
        rest = after_clause;
        clauses.push(clause);
        if !rest.is_empty() {
            let (after_conj, conj) = rest.conjunction()?;
            if let Some(existing) = connector {
                if existing != conj {
                    return Err(Error::syntax("inconsistent AND/OR combination".to_string()));
                }
            }
            connector = Some(conj);
            rest = after_conj;
        }
    }
    Ok(Condition {
        connector: connector.unwrap_or(Conjunction::And),
        clauses,
    })
}

/// One clause, variable-first or constant-first. A constant-first clause
/// has its operator mirrored so storage is always variable-first.
fn parse_clause(input: Input) -> Result<(Input, Clause)> {
    if let Ok((rest, variable)) = input.variable() {
        let (rest, comparison) = rest.comparison()?;
        let (rest, constant) = rest.constant()?;
        return Ok((
            rest,
            Clause {
                variable,
                comparison,
                constant,
            },
        ));
    }
    let (rest, constant) = input.constant()?;
    let (rest, comparison) = rest.comparison()?;
    let (rest, variable) = rest.variable()?;
    Ok((
        rest,
        Clause {
            variable,
            comparison: comparison.mirrored(),
            constant,
        },
    ))
}

/// Range shorthand: `lo < NoteLength < hi` (either `<` may be `<=`),
/// lowered to two AND-joined clauses.
pub fn parse_range(text: &str) -> Result<Condition> {
    let input = Input::new(text);
    let (rest, lo) = input.constant()?;
    let (rest, low_op) = rest.range_operator()?;
    let (rest, variable) = rest.variable()?;
    let (rest, high_op) = rest.range_operator()?;
    let (rest, hi) = rest.constant()?;
    if !rest.is_empty() {
        return Err(Error::syntax(format!(
            "unexpected input after range: \"{}\"",
            text.trim()
        )));
    }
    Ok(Condition {
        connector: Conjunction::And,
        clauses: vec![
            Clause {
                variable,
                comparison: low_op.mirrored(),
                constant: lo,
            },
            Clause {
                variable,
                comparison: high_op,
                constant: hi,
            },
        ],
    })
}
