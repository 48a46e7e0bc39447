// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Token-level input handling for the condition parser.
//!
//! `Input` is a cheap cursor over the condition text. Each matcher skips
//! leading whitespace, then either consumes its token and returns the
//! advanced cursor or fails without consuming anything.

use crate::error::{Error, Result};

use super::{Comparison, Conjunction, NoteLengthClass, Variable};

#[derive(Debug, Clone, Copy)]
pub(super) struct Input<'a> {
    text: &'a str,
}

impl<'a> Input<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn is_empty(self) -> bool {
        self.text.trim_start().is_empty()
    }

    fn skip_ws(self) -> Self {
        Self {
            text: self.text.trim_start(),
        }
    }

    fn advance(self, n: usize) -> Self {
        Self {
            text: &self.text[n..],
        }
    }

    /// Case-insensitive literal match.
    fn tag(self, word: &str) -> Option<Self> {
        let s = self.skip_ws();
        match s.text.get(..word.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(word) => Some(s.advance(word.len())),
            _ => None,
        }
    }

    /// Like `tag`, but the match must end at a word boundary.
    fn word(self, word: &str) -> Option<Self> {
        let rest = self.tag(word)?;
        match rest.text.chars().next() {
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
            _ => Some(rest),
        }
    }

    /// The note-length variable: "NoteLength", "note length", or "nl".
    pub fn variable(self) -> Result<(Self, Variable)> {
        if let Some(rest) = self.tag("note") {
            if let Some(rest) = rest.tag("length") {
                return Ok((rest, Variable::NoteLength));
            }
        }
        if let Some(rest) = self.tag("nl") {
            return Ok((rest, Variable::NoteLength));
        }
        Err(Error::syntax(format!(
            "variable name expected: \"{}\"",
            self.text.trim()
        )))
    }

    /// A duration class, by full name ("very short" may contain spaces)
    /// or abbreviation (vs, s, m, l, vl).
    pub fn constant(self) -> Result<(Self, NoteLengthClass)> {
        if let Some(rest) = self.tag("very") {
            if let Some(rest) = rest.tag("short") {
                return Ok((rest, NoteLengthClass::VeryShort));
            }
            if let Some(rest) = rest.tag("long") {
                return Ok((rest, NoteLengthClass::VeryLong));
            }
        }
        let full = [
            ("short", NoteLengthClass::Short),
            ("medium", NoteLengthClass::Medium),
            ("long", NoteLengthClass::Long),
        ];
        for (name, class) in full {
            if let Some(rest) = self.tag(name) {
                return Ok((rest, class));
            }
        }
        let abbreviations = [
            ("vs", NoteLengthClass::VeryShort),
            ("vl", NoteLengthClass::VeryLong),
            ("s", NoteLengthClass::Short),
            ("m", NoteLengthClass::Medium),
            ("l", NoteLengthClass::Long),
        ];
        for (name, class) in abbreviations {
            if let Some(rest) = self.word(name) {
                return Ok((rest, class));
            }
        }
        Err(Error::syntax(format!(
            "length constant expected: \"{}\"",
            self.text.trim()
        )))
    }

    /// A comparison operator, longest match first.
    pub fn comparison(self) -> Result<(Self, Comparison)> {
        let operators = [
            ("<=", Comparison::Le),
            (">=", Comparison::Ge),
            ("==", Comparison::Eq),
            ("!=", Comparison::Ne),
            ("<", Comparison::Lt),
            (">", Comparison::Gt),
        ];
        for (spelling, op) in operators {
            if let Some(rest) = self.tag(spelling) {
                return Ok((rest, op));
            }
        }
        Err(Error::syntax(format!(
            "comparison operator expected: \"{}\"",
            self.text.trim()
        )))
    }

    /// A range operator: only `<` and `<=` appear in range sugar.
    pub fn range_operator(self) -> Result<(Self, Comparison)> {
        if let Some(rest) = self.tag("<=") {
            return Ok((rest, Comparison::Le));
        }
        if let Some(rest) = self.tag("<") {
            return Ok((rest, Comparison::Lt));
        }
        Err(Error::syntax(format!(
            "range operator expected: \"{}\"",
            self.text.trim()
        )))
    }

    /// A conjunction: and/or words (at a word boundary) or &&, &, ||, |.
    pub fn conjunction(self) -> Result<(Self, Conjunction)> {
        if let Some(rest) = self.word("and") {
            return Ok((rest, Conjunction::And));
        }
        if let Some(rest) = self.word("or") {
            return Ok((rest, Conjunction::Or));
        }
        if let Some(rest) = self.tag("&&").or_else(|| self.tag("&")) {
            return Ok((rest, Conjunction::And));
        }
        if let Some(rest) = self.tag("||").or_else(|| self.tag("|")) {
            return Ok((rest, Conjunction::Or));
        }
        Err(Error::syntax("AND or OR expected".to_string()))
    }
}
