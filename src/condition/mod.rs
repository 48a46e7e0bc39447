// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note-length condition language.
//!
//! Conditions select which branch of a composite sound plays. A condition
//! is a single conjunction (all AND or all OR, never mixed) of clauses
//! comparing the note length against one of five ordered duration classes.
//! A range shorthand like `short < NoteLength < long` lowers to two
//! AND-joined clauses.

mod input;
mod parse;

pub use parse::{parse_branch, parse_condition, parse_range};

use std::fmt;

/// Comparison operators, rendered with their symbolic spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

impl Comparison {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }

    /// The operator with its operands swapped: `c < v` becomes `v > c`.
    pub fn mirrored(self) -> Self {
        match self {
            Comparison::Lt => Comparison::Gt,
            Comparison::Le => Comparison::Ge,
            Comparison::Gt => Comparison::Lt,
            Comparison::Ge => Comparison::Le,
            Comparison::Eq | Comparison::Ne => self,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five duration classes, totally ordered from shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoteLengthClass {
    VeryShort,
    Short,
    Medium,
    Long,
    VeryLong,
}

impl NoteLengthClass {
    /// Vendor spelling used inside interchange documents.
    pub fn vendor_name(self) -> &'static str {
        match self {
            NoteLengthClass::VeryShort => "kVeryShort",
            NoteLengthClass::Short => "kShort",
            NoteLengthClass::Medium => "kMedium",
            NoteLengthClass::Long => "kLong",
            NoteLengthClass::VeryLong => "kVeryLong",
        }
    }

    /// Display spelling used in project-facing text.
    pub fn display_name(self) -> &'static str {
        match self {
            NoteLengthClass::VeryShort => "veryShort",
            NoteLengthClass::Short => "short",
            NoteLengthClass::Medium => "medium",
            NoteLengthClass::Long => "long",
            NoteLengthClass::VeryLong => "veryLong",
        }
    }
}

/// Condition variables. Note length is the only one today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    NoteLength,
}

impl Variable {
    pub fn as_str(self) -> &'static str {
        match self {
            Variable::NoteLength => "NoteLength",
        }
    }
}

/// How clauses combine. A single-clause condition renders no connector,
/// so its default (And) is unobservable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

/// One comparison, always stored variable-first. Constant-first input is
/// mirrored before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub variable: Variable,
    pub comparison: Comparison,
    pub constant: NoteLengthClass,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.variable.as_str(),
            self.comparison,
            self.constant.vendor_name()
        )
    }
}

/// A parsed condition: clauses joined by one connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub connector: Conjunction,
    pub clauses: Vec<Clause>,
}

impl Condition {
    /// The empty condition (always true; the default branch).
    pub fn empty() -> Self {
        Self {
            connector: Conjunction::And,
            clauses: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
        f.write_str(&rendered.join(&format!(" {} ", self.connector.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_display() {
        let clause = Clause {
            variable: Variable::NoteLength,
            comparison: Comparison::Le,
            constant: NoteLengthClass::VeryLong,
        };
        assert_eq!(clause.to_string(), "NoteLength <= kVeryLong");
    }

    #[test]
    fn test_condition_display_joins_with_connector() {
        let condition = Condition {
            connector: Conjunction::Or,
            clauses: vec![
                Clause {
                    variable: Variable::NoteLength,
                    comparison: Comparison::Lt,
                    constant: NoteLengthClass::Short,
                },
                Clause {
                    variable: Variable::NoteLength,
                    comparison: Comparison::Ge,
                    constant: NoteLengthClass::Long,
                },
            ],
        };
        assert_eq!(
            condition.to_string(),
            "NoteLength < kShort OR NoteLength >= kLong"
        );
    }

    #[test]
    fn test_empty_condition_renders_nothing() {
        assert_eq!(Condition::empty().to_string(), "");
    }

    #[test]
    fn test_duration_classes_are_ordered() {
        assert!(NoteLengthClass::VeryShort < NoteLengthClass::Short);
        assert!(NoteLengthClass::Medium < NoteLengthClass::VeryLong);
    }

    #[test]
    fn test_mirrored_operators() {
        assert_eq!(Comparison::Lt.mirrored(), Comparison::Gt);
        assert_eq!(Comparison::Le.mirrored(), Comparison::Ge);
        assert_eq!(Comparison::Eq.mirrored(), Comparison::Eq);
        assert_eq!(Comparison::Ne.mirrored(), Comparison::Ne);
    }
}
