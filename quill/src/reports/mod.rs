//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod generate;
mod output;

pub use generate::{FileChange, GenerateReport, ModuleChange, ModuleStatus};
pub use output::{Report, TerminalOutput};
