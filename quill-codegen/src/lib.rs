//! Blueprint rendering for the quill scaffolding CLI.
//!
//! Turns a resolved artifact name into file contents. Nothing in this crate
//! touches the filesystem except through [`quill_core::GeneratedFile::write`].
//!
//! ```
//! use quill_codegen::{DirectiveNames, files::DirectiveTs};
//! use quill_core::GeneratedFile;
//!
//! let names = DirectiveNames::new("my-dir", "app");
//! let content = DirectiveTs::new(names).render();
//! assert!(content.contains("selector: '[appMyDir]'"));
//! ```

mod import;
mod naming;

pub mod builder;
pub mod files;

pub use import::Import;
pub use naming::{DIRECTIVE_SUFFIX, DirectiveNames};
