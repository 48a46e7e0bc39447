// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI micro-language codecs.
//!
//! This module provides the parsers and formatters for the two small text
//! languages sounds are authored in: switch-action tokens (`action`) and
//! volume specs (`dynamics`).

pub mod action;
pub mod dynamics;

pub use action::{
    format_action, format_action_list, format_switch_actions, parse_action, parse_action_list,
    parse_switch_actions, parse_transpose, MidiAction,
};
pub use dynamics::{format_dynamics, parse_dynamics, DynamicsKind, DynamicsSpec};
