// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
pub mod module;
pub mod path;

pub use config::{
    CONFIG_FILE, Defaults, DirectiveDefaults, Project, ProjectConfig, ProjectSection,
};
pub use error::{Error, Result};
pub use module::{Discovery, ModuleTarget, RegisterOutcome};
pub use path::{ResolvedLocation, SourceRoot, resolve};
