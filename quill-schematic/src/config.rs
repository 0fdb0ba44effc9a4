//! Project configuration (`quill.toml`).

use std::path::{Component, Path, PathBuf};

use miette::{NamedSource, SourceSpan};
use serde::Deserialize;

use crate::{Error, Result, path::SourceRoot};

/// File name that marks the root of a project.
pub const CONFIG_FILE: &str = "quill.toml";

/// Root of `quill.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub project: ProjectSection,

    #[serde(default)]
    pub defaults: Defaults,
}

/// `[project]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub name: String,

    /// Conventional root that every artifact is generated under
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Prefix prepended to generated selectors
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

/// `[defaults]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default)]
    pub directive: DirectiveDefaults,
}

/// `[defaults.directive]` section
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectiveDefaults {
    #[serde(default = "default_true")]
    pub flat: bool,

    #[serde(default = "default_true")]
    pub spec: bool,
}

impl Default for DirectiveDefaults {
    fn default() -> Self {
        Self {
            flat: true,
            spec: true,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("src/app")
}

fn default_prefix() -> String {
    "app".to_string()
}

fn default_true() -> bool {
    true
}

impl ProjectConfig {
    /// Parse and validate configuration source.
    pub fn parse(src: &str, filename: &str) -> Result<Self> {
        let config: ProjectConfig = toml::from_str(src).map_err(|source| {
            Box::new(Error::ConfigParse {
                src: NamedSource::new(filename, src.to_string()),
                span: source.span().map(SourceSpan::from),
                source,
            })
        })?;
        config.validate(src, filename)?;
        Ok(config)
    }

    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        let invalid = |message: &str| {
            Box::new(Error::InvalidConfig {
                src: NamedSource::new(filename, src.to_string()),
                span: find_key_span(src, "root"),
                message: message.to_string(),
            })
        };

        for component in self.project.root.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid("project root must not contain '..'"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("project root must be relative to quill.toml"));
                }
            }
        }
        Ok(())
    }
}

/// Span of the line assigning `key`, for diagnostics
fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    let mut offset = 0;
    for line in src.split_inclusive('\n') {
        let trimmed = line.trim_start();
        let assigns = trimmed
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if assigns {
            let start = offset + (line.len() - trimmed.len());
            return Some(SourceSpan::from((start, trimmed.trim_end().len())));
        }
        offset += line.len();
    }
    None
}

/// A project on disk: the directory holding `quill.toml` and its parsed contents.
#[derive(Debug, Clone)]
pub struct Project {
    dir: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Open the project whose `quill.toml` lives in `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let config = ProjectConfig::parse(&content, &path.display().to_string())?;
        tracing::debug!(dir = %dir.display(), project = %config.project.name, "opened project");
        Ok(Self { dir, config })
    }

    /// Find the nearest enclosing project, starting at `start` and walking up.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        let start = start.as_ref();
        for dir in start.ancestors() {
            if dir.join(CONFIG_FILE).is_file() {
                return Self::open(dir);
            }
        }
        Err(Box::new(Error::ProjectNotFound {
            start: start.to_path_buf(),
        }))
    }

    /// Directory containing `quill.toml`
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The conventional root every artifact is generated under.
    pub fn source_root(&self) -> SourceRoot {
        SourceRoot::new(&self.dir, &self.config.project.root)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_defaults() {
        let config = ProjectConfig::parse("[project]\nname = \"foo\"\n", CONFIG_FILE).unwrap();

        assert_eq!(config.project.name, "foo");
        assert_eq!(config.project.root, PathBuf::from("src/app"));
        assert_eq!(config.project.prefix, "app");
        assert!(config.defaults.directive.flat);
        assert!(config.defaults.directive.spec);
    }

    #[test]
    fn test_parse_overrides() {
        let src = r#"
[project]
name = "foo"
root = "lib/web"
prefix = "acme"

[defaults.directive]
flat = false
spec = false
"#;
        let config = ProjectConfig::parse(src, CONFIG_FILE).unwrap();

        assert_eq!(config.project.root, PathBuf::from("lib/web"));
        assert_eq!(config.project.prefix, "acme");
        assert!(!config.defaults.directive.flat);
        assert!(!config.defaults.directive.spec);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ProjectConfig::parse("[project]\nname = \"foo\"\nroots = \"x\"\n", CONFIG_FILE)
            .unwrap_err();
        assert!(matches!(*err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_root_with_parent_dir_rejected() {
        let err = ProjectConfig::parse("[project]\nname = \"foo\"\nroot = \"../app\"\n", CONFIG_FILE)
            .unwrap_err();

        match *err {
            Error::InvalidConfig { span, message, .. } => {
                assert_eq!(message, "project root must not contain '..'");
                assert!(span.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_discover_walks_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[project]\nname = \"foo\"\n").unwrap();
        let nested = temp.path().join("src").join("app").join("1");
        fs::create_dir_all(&nested).unwrap();

        let project = Project::discover(&nested).unwrap();

        assert_eq!(project.dir(), temp.path());
        assert_eq!(project.source_root().path(), temp.path().join("src").join("app"));
    }

    #[test]
    fn test_discover_without_config() {
        let temp = TempDir::new().unwrap();
        let err = Project::discover(temp.path()).unwrap_err();
        assert!(matches!(*err, Error::ProjectNotFound { .. }));
    }
}
