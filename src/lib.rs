// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! ARTIC - articulation map conversion engine.
//!
//! Converts both ways between a project model (axes of mutually exclusive
//! playing techniques with sounds assigned per combination) and the flat
//! expression-map documents a notation host consumes. The engine is a pure
//! in-memory transform: documents arrive already deserialized and leave for
//! an external codec to serialize, and a conversion either fully succeeds
//! or fails with the first error.

pub mod catalog;
pub mod combo;
pub mod condition;
pub mod error;
pub mod export;
pub mod import;
pub mod midi;
pub mod project;
pub mod xmap;

pub use catalog::{BuiltinCatalog, TechniqueCatalog};
pub use error::{Error, Result};
pub use export::{assignment_table, build_expression_map};
pub use import::{build_combo_table, import_project};
pub use project::{IdGenerator, Project};
