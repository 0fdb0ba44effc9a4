//! Names derived from a directive's base name.

use quill_core::{to_camel_case, to_pascal_case};

/// Suffix shared by directive implementation and spec files.
pub const DIRECTIVE_SUFFIX: &str = "directive";

/// Every identifier a directive blueprint needs, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveNames {
    /// Kebab-case base name (e.g., "my-dir")
    pub base: String,
    /// Exported class name (e.g., "MyDirDirective")
    pub class_name: String,
    /// Attribute selector without brackets (e.g., "appMyDir")
    pub selector: String,
}

impl DirectiveNames {
    /// Derive names from a kebab-case base name and a selector prefix.
    pub fn new(base: impl Into<String>, prefix: &str) -> Self {
        let base = base.into();
        let selector = if prefix.is_empty() {
            to_camel_case(&base)
        } else {
            to_camel_case(&format!("{}-{}", prefix, base))
        };
        Self {
            class_name: format!("{}Directive", to_pascal_case(&base)),
            selector,
            base,
        }
    }

    /// File stem without the `.ts` extension (e.g., "my-dir.directive").
    pub fn file_stem(&self) -> String {
        format!("{}.{}", self.base, DIRECTIVE_SUFFIX)
    }

    /// Implementation file name (e.g., "my-dir.directive.ts").
    pub fn file_name(&self) -> String {
        format!("{}.ts", self.file_stem())
    }

    /// Companion spec file name (e.g., "my-dir.directive.spec.ts").
    pub fn spec_file_name(&self) -> String {
        format!("{}.spec.ts", self.file_stem())
    }
}
