mod completions;
mod generate;

use clap::{Parser, Subcommand, ValueEnum};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;

/// Extension trait for exiting on schematic errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

fn exit_with_diagnostic(e: quill_schematic::Error) -> ! {
    eprintln!("{:?}", miette::Report::new(e));
    std::process::exit(1);
}

impl<T> UnwrapOrExit<T> for quill_schematic::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with_diagnostic(*e),
        }
    }
}

/// Schematic errors surfaced through an operation's `eyre` result
pub(crate) trait ExitOnDiagnostic<T> {
    fn or_exit_on_diagnostic(self) -> Result<T>;
}

impl<T> ExitOnDiagnostic<T> for Result<T> {
    fn or_exit_on_diagnostic(self) -> Result<T> {
        self.map_err(|report| match report.downcast::<quill_schematic::Error>() {
            Ok(e) => exit_with_diagnostic(e),
            Err(report) => report,
        })
    }
}

/// How reports are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Generate source artifacts inside an existing application tree")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an artifact from a schematic
    #[command(visible_alias = "g")]
    Generate(GenerateCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
