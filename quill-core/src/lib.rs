//! Core utilities and types for the quill scaffolding CLI.
//!
//! This crate provides name-casing helpers and the generated-file
//! abstraction shared by the blueprint and schematic crates.

mod file;
mod utils;

// File operations
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult};
// String utilities
pub use utils::{to_camel_case, to_kebab_case, to_pascal_case};
