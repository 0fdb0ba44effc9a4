use std::path::PathBuf;

use clap::{Args, Subcommand};
use eyre::{Context, Result};
use quill_schematic::{ModuleTarget, Project, path::normalize};

use super::{ExitOnDiagnostic, OutputFormat, UnwrapOrExit};
use crate::{
    ops::{self, generate::DirectiveOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(subcommand)]
    schematic: Schematic,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        match &self.schematic {
            Schematic::Directive(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Schematic {
    /// Generate an attribute directive
    #[command(visible_alias = "d")]
    Directive(DirectiveCommand),
}

#[derive(Args)]
pub struct DirectiveCommand {
    /// Directive name, optionally with a path (e.g. `shared/highlight`)
    pub name: String,

    /// Generate into the resolved directory instead of a new subdirectory
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub flat: Option<bool>,

    /// Generate the companion `.spec.ts` file
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub spec: Option<bool>,

    /// Do not generate the companion `.spec.ts` file
    #[arg(long, conflicts_with = "spec")]
    pub no_spec: bool,

    /// Module to declare the directive in (defaults to the nearest one)
    #[arg(short, long)]
    pub module: Option<String>,

    /// Do not register the directive in any module
    #[arg(long)]
    pub skip_import: bool,

    /// Show what would be generated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "cwd", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl DirectiveCommand {
    pub fn run(&self) -> Result<()> {
        let cwd = self.working_dir()?;
        let project = Project::discover(&cwd).unwrap_or_exit();
        tracing::debug!(
            project = %project.dir().display(),
            cwd = %cwd.display(),
            "discovered project"
        );
        let defaults = project.config().defaults.directive;

        let spec = if self.no_spec {
            false
        } else {
            self.spec.unwrap_or(defaults.spec)
        };

        let report = ops::generate_directive(
            &project,
            DirectiveOptions {
                name: &self.name,
                cwd: &cwd,
                flat: self.flat.unwrap_or(defaults.flat),
                spec,
                module: ModuleTarget::from(self.module.clone()),
                skip_import: self.skip_import,
                dry_run: self.dry_run,
            },
        )
        .or_exit_on_diagnostic()?;

        match self.format {
            OutputFormat::Text => report.render(&mut TerminalOutput::new()),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .wrap_err("Failed to serialize report")?;
                println!("{}", json);
            }
        }
        Ok(())
    }

    fn working_dir(&self) -> Result<PathBuf> {
        let current = std::env::current_dir().wrap_err("Failed to read the current directory")?;
        Ok(match &self.cwd {
            Some(dir) => normalize(&current.join(dir)),
            None => current,
        })
    }
}
