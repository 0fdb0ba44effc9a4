//! Generate command report data structures.

use quill_schematic::RegisterOutcome;
use serde::Serialize;

use super::output::{Output, Report};

/// Report data from running a schematic.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    /// Schematic that ran (e.g., "directive").
    pub schematic: &'static str,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Artifact files, in generation order.
    pub files: Vec<FileChange>,
    /// Module registration, when a module was found.
    pub module: Option<ModuleChange>,
    /// Problems that did not stop generation.
    pub warnings: Vec<String>,
}

/// A generated file.
#[derive(Debug, Serialize)]
pub struct FileChange {
    /// Project-relative path.
    pub path: String,
    /// False when the file already existed and was left alone.
    pub created: bool,
}

/// A module the artifact was registered with.
#[derive(Debug, Serialize)]
pub struct ModuleChange {
    /// Project-relative path.
    pub path: String,
    pub symbol: String,
    /// Specifier used in the import statement.
    pub import_path: String,
    pub outcome: ModuleStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleStatus {
    Registered,
    AlreadyRegistered,
}

impl From<RegisterOutcome> for ModuleStatus {
    fn from(outcome: RegisterOutcome) -> Self {
        match outcome {
            RegisterOutcome::Registered => Self::Registered,
            RegisterOutcome::AlreadyRegistered => Self::AlreadyRegistered,
        }
    }
}

impl GenerateReport {
    pub fn new(schematic: &'static str, dry_run: bool) -> Self {
        Self {
            schematic,
            dry_run,
            files: Vec::new(),
            module: None,
            warnings: Vec::new(),
        }
    }

    fn created(&self) -> impl Iterator<Item = &FileChange> {
        self.files.iter().filter(|f| f.created)
    }

    fn skipped(&self) -> impl Iterator<Item = &FileChange> {
        self.files.iter().filter(|f| !f.created)
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }

        if self.created().next().is_some() {
            out.section(if self.dry_run { "Would create" } else { "Created" });
            for file in self.created() {
                out.added_item(&file.path);
            }
        }

        if self.skipped().next().is_some() {
            out.section("Skipped (already exists)");
            for file in self.skipped() {
                out.list_item(&file.path);
            }
        }

        if let Some(module) = &self.module {
            match module.outcome {
                ModuleStatus::Registered => {
                    out.section(if self.dry_run { "Would update" } else { "Updated" });
                    out.updated_item(&format!(
                        "{} (declares {} from '{}')",
                        module.path, module.symbol, module.import_path
                    ));
                }
                ModuleStatus::AlreadyRegistered => {
                    out.preformatted(&format!(
                        "{} already declares {}",
                        module.path, module.symbol
                    ));
                }
            }
        }

        if self.dry_run {
            out.preformatted("Dry run: nothing was written.");
        }
    }
}
