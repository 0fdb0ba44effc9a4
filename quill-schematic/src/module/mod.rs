//! Module discovery and registration.
//!
//! A module is a `*.module.ts` file holding a `declarations` list. After an
//! artifact is generated its class is imported into, and declared by, either
//! an explicitly named module or the nearest enclosing one.

mod edit;
mod file;
mod scan;

use std::path::{Path, PathBuf};

pub use edit::{DECLARATIONS, ModuleEdit, add_declaration};
pub use file::ModuleFile;

use crate::{
    Error, Result,
    path::{SourceRoot, normalize, relative_import_path},
};

/// Conventional suffix of module files.
pub const MODULE_SUFFIX: &str = ".module.ts";

/// Routing modules share the suffix but never hold declarations.
const ROUTING_SUFFIX: &str = "-routing.module.ts";

/// Which module an artifact should be registered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleTarget {
    /// A module named on the command line
    Named(String),
    /// The nearest enclosing module, if any
    Nearest,
}

impl From<Option<String>> for ModuleTarget {
    fn from(name: Option<String>) -> Self {
        name.map_or(Self::Nearest, Self::Named)
    }
}

/// Outcome of looking for the nearest module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Found(PathBuf),
    /// Several candidates in the nearest directory that has any
    Ambiguous(Vec<PathBuf>),
    NotFound,
}

/// Resolve `target` to a module file.
///
/// An explicit target that cannot be found is an error; discovery that finds
/// nothing, or too much, is reported as such.
pub fn find_module(
    target: &ModuleTarget,
    cwd: &Path,
    root: &SourceRoot,
    artifact_dir: &Path,
) -> Result<Discovery> {
    match target {
        ModuleTarget::Named(name) => resolve_named(name, cwd, root).map(Discovery::Found),
        ModuleTarget::Nearest => {
            let discovery = discover(artifact_dir, root);
            match &discovery {
                Discovery::Ambiguous(candidates) => {
                    tracing::warn!(?candidates, "multiple modules found, skipping registration");
                }
                Discovery::NotFound => {
                    tracing::debug!("no enclosing module, skipping registration");
                }
                Discovery::Found(_) => {}
            }
            Ok(discovery)
        }
    }
}

/// Resolve an explicitly named module relative to the working directory.
///
/// Tries `<name>` when it already carries the suffix, then
/// `<name>.module.ts`, then `<name>/<basename>.module.ts`.
pub fn resolve_named(name: &str, cwd: &Path, root: &SourceRoot) -> Result<PathBuf> {
    let base = root.working_dir(cwd);
    let rel = name.replace('\\', "/");
    let rel = rel.trim_end_matches('/');

    let candidates: Vec<PathBuf> = if rel.ends_with(MODULE_SUFFIX) {
        vec![base.join(rel)]
    } else {
        let stem = rel.rsplit('/').next().unwrap_or(rel);
        vec![
            base.join(format!("{}{}", rel, MODULE_SUFFIX)),
            base.join(rel).join(format!("{}{}", stem, MODULE_SUFFIX)),
        ]
    };

    candidates
        .into_iter()
        .map(|c| normalize(&c))
        .find(|c| c.starts_with(root.project_dir()) && c.is_file())
        .ok_or_else(|| {
            Box::new(Error::ModuleNotFound {
                name: name.to_string(),
                base: base.display().to_string(),
            })
        })
}

/// Walk from `start` up to the root looking for the nearest module.
pub fn discover(start: &Path, root: &SourceRoot) -> Discovery {
    let top = root.path();
    for dir in normalize(start).ancestors() {
        if !dir.starts_with(&top) {
            break;
        }
        let mut candidates = modules_in(dir);
        match candidates.len() {
            0 => continue,
            1 => return Discovery::Found(candidates.remove(0)),
            _ => {
                let preferred = dir
                    .file_name()
                    .map(|n| format!("{}{}", n.to_string_lossy(), MODULE_SUFFIX));
                if let Some(pos) = candidates
                    .iter()
                    .position(|c| c.file_name().map(|n| n.to_string_lossy().into_owned()) == preferred)
                {
                    return Discovery::Found(candidates.remove(pos));
                }
                return Discovery::Ambiguous(candidates);
            }
        }
    }
    Discovery::NotFound
}

fn modules_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut modules: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name().and_then(|n| n.to_str()).is_some_and(|n| {
                    n.ends_with(MODULE_SUFFIX) && !n.ends_with(ROUTING_SUFFIX)
                })
        })
        .collect();
    modules.sort();
    modules
}

/// Whether a registration changed the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    AlreadyRegistered,
}

/// A computed but not yet written module edit.
#[derive(Debug, Clone)]
pub struct Registration {
    file: ModuleFile,
    import_path: String,
    outcome: RegisterOutcome,
}

impl Registration {
    pub fn module_path(&self) -> &Path {
        self.file.path()
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn outcome(&self) -> RegisterOutcome {
        self.outcome
    }

    /// Write the edit back, if there is one.
    pub fn commit(self) -> Result<RegisterOutcome> {
        if self.outcome == RegisterOutcome::Registered {
            self.file.save()?;
            tracing::info!(module = %self.file.path().display(), "updated module");
        }
        Ok(self.outcome)
    }
}

/// Compute the edit registering `symbol`, defined in `artifact_file`, with a module.
pub fn prepare(module_path: &Path, symbol: &str, artifact_file: &Path) -> Result<Registration> {
    let mut file = ModuleFile::open(module_path)?;
    let module_dir = module_path.parent().unwrap_or(Path::new("."));
    let import_path = relative_import_path(module_dir, artifact_file);

    let edit = add_declaration(file.content(), &file.display_name(), symbol, &import_path)?;
    let outcome = if edit.is_changed() {
        file.set_content(edit.content);
        RegisterOutcome::Registered
    } else {
        RegisterOutcome::AlreadyRegistered
    };

    tracing::debug!(
        module = %module_path.display(),
        symbol,
        import_path = %import_path,
        ?outcome,
        "prepared registration"
    );
    Ok(Registration {
        file,
        import_path,
        outcome,
    })
}

/// Register `symbol` with the module at `module_path` and write it back.
pub fn register(module_path: &Path, symbol: &str, artifact_file: &Path) -> Result<RegisterOutcome> {
    prepare(module_path, symbol, artifact_file)?.commit()
}
