//! Generate operation - render a schematic and register it with a module.

use std::path::Path;

use eyre::{Context, Result};
use quill_codegen::{
    DirectiveNames,
    files::{DirectiveSpecTs, DirectiveTs},
};
use quill_core::{File, GeneratedFile, WriteResult};
use quill_schematic::{
    Discovery, ModuleTarget, Project,
    module::{self, Registration},
    path,
};

use crate::reports::{FileChange, GenerateReport, ModuleChange};

/// Options for generating a directive.
pub struct DirectiveOptions<'a> {
    /// Artifact name as typed, possibly with a path.
    pub name: &'a str,
    /// Directory the name is relative to.
    pub cwd: &'a Path,
    /// Whether to skip the artifact's own subdirectory.
    pub flat: bool,
    /// Whether to render the companion spec file.
    pub spec: bool,
    /// Module to register the directive with.
    pub module: ModuleTarget,
    /// Whether to skip module registration entirely.
    pub skip_import: bool,
    /// Whether to preview without writing.
    pub dry_run: bool,
}

fn diagnostic(e: Box<quill_schematic::Error>) -> eyre::Report {
    eyre::Report::new(*e)
}

/// Execute the directive schematic.
///
/// The module edit is computed before any file is written, so a missing or
/// malformed module leaves the tree untouched.
pub fn generate_directive(project: &Project, opts: DirectiveOptions) -> Result<GenerateReport> {
    let root = project.source_root();
    let location = path::resolve(opts.name, opts.cwd, &root, opts.flat).map_err(diagnostic)?;
    let names = DirectiveNames::new(&location.base_name, &project.config().project.prefix);

    let mut files: Vec<Box<dyn GeneratedFile>> = vec![Box::new(DirectiveTs::new(names.clone()))];
    if opts.spec {
        files.push(Box::new(DirectiveSpecTs::new(names.clone())));
    }

    let mut report = GenerateReport::new("directive", opts.dry_run);
    let artifact = location.directory.join(names.file_name());

    let registration = if opts.skip_import {
        tracing::debug!("registration disabled by --skip-import");
        None
    } else {
        let found = module::find_module(&opts.module, opts.cwd, &root, &location.directory)
            .map_err(diagnostic)?;
        match found {
            Discovery::Found(module_path) => Some(
                module::prepare(&module_path, &names.class_name, &artifact).map_err(diagnostic)?,
            ),
            Discovery::Ambiguous(candidates) => {
                let listed: Vec<String> = candidates
                    .iter()
                    .map(|c| display_path(project.dir(), c))
                    .collect();
                report.warnings.push(format!(
                    "More than one module matches ({}); skipping registration. Use --module to pick one.",
                    listed.join(", ")
                ));
                None
            }
            Discovery::NotFound => {
                tracing::debug!(directory = %location.directory.display(), "no module to register with");
                None
            }
        }
    };

    for file in &files {
        let path = file.path(&location.directory);
        let result = if opts.dry_run {
            File::new(&path, file.render())
                .with_rules(file.rules())
                .planned()
        } else {
            file.write(&location.directory)
                .wrap_err_with(|| format!("Failed to generate '{}'", path.display()))?
        };
        report.files.push(FileChange {
            path: display_path(project.dir(), &path),
            created: result == WriteResult::Written,
        });
    }

    tracing::debug!(files = report.files.len(), dry_run = opts.dry_run, "rendered directive");
    if let Some(registration) = registration {
        report.module = Some(register(project, registration, &names, opts.dry_run)?);
    }

    Ok(report)
}

fn register(
    project: &Project,
    registration: Registration,
    names: &DirectiveNames,
    dry_run: bool,
) -> Result<ModuleChange> {
    let path = display_path(project.dir(), registration.module_path());
    let import_path = registration.import_path().to_string();
    let outcome = if dry_run {
        registration.outcome()
    } else {
        registration.commit().map_err(diagnostic)?
    };

    Ok(ModuleChange {
        path,
        symbol: names.class_name.clone(),
        import_path,
        outcome: outcome.into(),
    })
}

/// Project-relative path with `/` separators, for reports.
fn display_path(project_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(project_dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
