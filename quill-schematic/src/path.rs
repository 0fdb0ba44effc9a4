//! Artifact path resolution.
//!
//! A user-supplied artifact name such as `child-dir/../my-dir` is resolved
//! against the caller's working directory into a directory inside the
//! project's conventional root. Resolution works on lists of path segments
//! relative to the project directory, so the boundary check is a structural
//! prefix test rather than a string comparison.

use std::path::{Component, Path, PathBuf};

use quill_core::{to_camel_case, to_kebab_case};

use crate::{Error, Result};

/// The conventional root (e.g. `src/app`) of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRoot {
    project_dir: PathBuf,
    relative: PathBuf,
}

impl SourceRoot {
    pub fn new(project_dir: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: normalize(&project_dir.into()),
            relative: normalize(&relative.into()),
        }
    }

    /// Directory holding the project configuration
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The root as written in configuration, used in messages
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Absolute path of the root
    pub fn path(&self) -> PathBuf {
        self.project_dir.join(&self.relative)
    }

    /// The directory generation is relative to.
    ///
    /// A working directory at or below the root is used as-is; anything else
    /// (the project directory itself, a sibling such as `src/assets`) falls
    /// back to the root.
    pub fn working_dir(&self, cwd: &Path) -> PathBuf {
        let cwd = normalize(cwd);
        if cwd.starts_with(self.path()) {
            cwd
        } else {
            self.path()
        }
    }

    fn segments(&self) -> Vec<String> {
        segments(&self.relative)
    }

    fn working_segments(&self, cwd: &Path) -> Vec<String> {
        let dir = self.working_dir(cwd);
        match dir.strip_prefix(&self.project_dir) {
            Ok(rest) => segments(rest),
            Err(_) => self.segments(),
        }
    }
}

/// A user-provided artifact name decomposed into path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName {
    /// Leading separator: resolve from the root instead of the working directory
    pub rooted: bool,
    /// Directory segments before the base name, unnormalized
    pub dirs: Vec<String>,
    /// The terminal segment as typed
    pub base: String,
}

impl ArtifactName {
    /// Split a name on `/` or `\`.
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            Box::new(Error::InvalidName {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };

        let rooted = name.starts_with(['/', '\\']);
        let mut dirs: Vec<String> = name
            .split(['/', '\\'])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let base = dirs.pop().ok_or_else(|| invalid("must not be empty"))?;
        if base == "." || base == ".." {
            return Err(invalid("must end with a name, not a relative segment"));
        }

        let kebab = to_kebab_case(&base);
        let well_formed = kebab.starts_with(|c: char| c.is_ascii_alphabetic())
            && kebab.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !well_formed {
            return Err(invalid(
                "must start with a letter and contain only letters, digits and dashes",
            ));
        }

        Ok(Self { rooted, dirs, base })
    }
}

/// Where an artifact goes and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// Directory the artifact files are written to
    pub directory: PathBuf,
    /// Kebab-case base name (e.g., "my-dir")
    pub base_name: String,
    /// camelCase form of the base name (e.g., "myDir")
    pub selector_name: String,
}

/// Resolve `name` from `cwd` into a location inside `root`.
///
/// With `flat` the artifact is placed directly in the resolved directory;
/// otherwise it gets a subdirectory named after its base name.
pub fn resolve(name: &str, cwd: &Path, root: &SourceRoot, flat: bool) -> Result<ResolvedLocation> {
    let artifact = ArtifactName::parse(name)?;
    let root_segments = root.segments();

    let mut stack = if artifact.rooted {
        root_segments.clone()
    } else {
        root.working_segments(cwd)
    };

    let mut escaped = false;
    for segment in &artifact.dirs {
        match segment.as_str() {
            "." => {}
            ".." => {
                if stack.pop().is_none() {
                    escaped = true;
                    break;
                }
            }
            other => stack.push(other.to_string()),
        }
    }

    if escaped || !stack.starts_with(&root_segments) {
        tracing::debug!(artifact = %name, ?stack, "artifact escapes the root");
        return Err(Box::new(Error::InvalidPath {
            name: name.to_string(),
            root: root.relative().display().to_string(),
        }));
    }

    let base_name = to_kebab_case(&artifact.base);
    let mut directory = stack
        .iter()
        .fold(root.project_dir().to_path_buf(), |dir, s| dir.join(s));
    if !flat {
        directory.push(&base_name);
    }

    tracing::debug!(artifact = %name, directory = %directory.display(), flat, "resolved artifact");
    Ok(ResolvedLocation {
        directory,
        selector_name: to_camel_case(&base_name),
        base_name,
    })
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn segments(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Module specifier from `from_dir` to `file`, without extension.
///
/// Always starts with `./` or `../` and uses `/` separators.
pub fn relative_import_path(from_dir: &Path, file: &Path) -> String {
    let from = segments(&normalize(from_dir));
    let mut to = segments(&normalize(file));

    if let Some(last) = to.last_mut() {
        if let Some(stem) = last.strip_suffix(".ts") {
            *last = stem.to_string();
        }
    }

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let ups = from.len() - common;

    let mut parts: Vec<String> = Vec::with_capacity(ups + to.len() - common);
    if ups == 0 {
        parts.push(".".to_string());
    }
    parts.extend(std::iter::repeat_n("..".to_string(), ups));
    parts.extend(to.into_iter().skip(common));
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> SourceRoot {
        SourceRoot::new("/work/foo", "src/app")
    }

    fn app(rest: &str) -> PathBuf {
        let base = PathBuf::from("/work/foo/src/app");
        if rest.is_empty() { base } else { base.join(rest) }
    }

    #[test]
    fn test_single_segment_resolves_under_cwd() {
        let loc = resolve("flat", &app(""), &root(), true).unwrap();

        assert_eq!(loc.directory, app(""));
        assert_eq!(loc.base_name, "flat");
        assert_eq!(loc.selector_name, "flat");
    }

    #[test]
    fn test_not_flat_adds_subdirectory() {
        let loc = resolve("my-dir", &app(""), &root(), false).unwrap();

        assert_eq!(loc.directory, app("my-dir"));
        assert_eq!(loc.selector_name, "myDir");
    }

    #[test]
    fn test_nested_name() {
        let loc = resolve("test/my-dir", &app(""), &root(), false).unwrap();
        assert_eq!(loc.directory, app("test/my-dir"));
    }

    #[test]
    fn test_parent_segment_within_root() {
        let loc = resolve("test/../my-dir", &app(""), &root(), false).unwrap();
        assert_eq!(loc.directory, app("my-dir"));
    }

    #[test]
    fn test_backslash_separator() {
        let loc = resolve("test\\..\\my-dir", &app(""), &root(), false).unwrap();
        assert_eq!(loc.directory, app("my-dir"));
    }

    #[test]
    fn test_from_child_dir() {
        let cwd = app("1");

        let plain = resolve("my-dir", &cwd, &root(), false).unwrap();
        assert_eq!(plain.directory, app("1/my-dir"));

        let nested = resolve("child-dir/my-dir", &cwd, &root(), false).unwrap();
        assert_eq!(nested.directory, app("1/child-dir/my-dir"));

        let back = resolve("child-dir/../my-dir", &cwd, &root(), false).unwrap();
        assert_eq!(back.directory, app("1/my-dir"));

        let up = resolve("../my-dir", &cwd, &root(), false).unwrap();
        assert_eq!(up.directory, app("my-dir"));
    }

    #[test]
    fn test_leading_separator_is_root_relative() {
        let loc = resolve("/my-dir", &app("1/2/3"), &root(), false).unwrap();
        assert_eq!(loc.directory, app("my-dir"));
    }

    #[test]
    fn test_above_root_fails_with_exact_message() {
        let err = resolve("../my-dir", &app(""), &root(), true).unwrap_err();

        assert!(err.is_invalid_path());
        assert_eq!(
            err.to_string(),
            format!(
                "Invalid path: \"../my-dir\" cannot be above the \"{}\" directory",
                Path::new("src").join("app").display()
            )
        );
    }

    #[test]
    fn test_escape_and_reenter_is_allowed() {
        // src/app/../app/x normalizes back inside the root
        let loc = resolve("../app/x", &app(""), &root(), true).unwrap();
        assert_eq!(loc.directory, app(""));
        assert_eq!(loc.base_name, "x");
    }

    #[test]
    fn test_escape_above_project_dir_fails() {
        let err = resolve("../../../../x", &app(""), &root(), true).unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_rooted_parent_fails() {
        let err = resolve("/../x", &app("1"), &root(), true).unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let cwd = app("1");
        let a = resolve("a/../b", &cwd, &root(), false).unwrap();
        let b = resolve("b", &cwd, &root(), false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cwd_outside_root_clamps_to_root() {
        let loc = resolve("flat", Path::new("/work/foo"), &root(), true).unwrap();
        assert_eq!(loc.directory, app(""));

        let sibling = resolve("flat", Path::new("/work/foo/src/assets"), &root(), true).unwrap();
        assert_eq!(sibling.directory, app(""));
    }

    #[test]
    fn test_camel_name_is_dasherized() {
        let loc = resolve("myDir", &app(""), &root(), false).unwrap();
        assert_eq!(loc.base_name, "my-dir");
        assert_eq!(loc.selector_name, "myDir");
        assert_eq!(loc.directory, app("my-dir"));
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "/", "foo/..", "foo/.", "1abc", "my.dir"] {
            let err = resolve(name, &app(""), &root(), true).unwrap_err();
            assert!(
                matches!(*err, Error::InvalidName { .. }),
                "expected InvalidName for {name:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_relative_import_path() {
        assert_eq!(
            relative_import_path(&app(""), &app("baz.directive.ts")),
            "./baz.directive"
        );
        assert_eq!(
            relative_import_path(&app(""), &app("my-dir/my-dir.directive.ts")),
            "./my-dir/my-dir.directive"
        );
        assert_eq!(
            relative_import_path(&app("foo"), &app("baz.directive.ts")),
            "../baz.directive"
        );
        assert_eq!(
            relative_import_path(&app("foo/bar"), &app("baz.directive.ts")),
            "../../baz.directive"
        );
        assert_eq!(
            relative_import_path(&app("foo"), &app("qux/baz.directive.ts")),
            "../qux/baz.directive"
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }
}
