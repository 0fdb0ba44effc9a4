use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for schematic operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Invalid path: \"{name}\" cannot be above the \"{root}\" directory")]
    #[diagnostic(
        code(quill::invalid_path),
        help("artifacts are always generated inside '{root}'; use a leading '/' to start from it")
    )]
    InvalidPath { name: String, root: String },

    #[error("Invalid name: \"{name}\" {reason}")]
    #[diagnostic(code(quill::invalid_name))]
    InvalidName { name: String, reason: String },

    #[error("Specified module does not exist")]
    #[diagnostic(
        code(quill::module_not_found),
        help("no module matching '{name}' was found relative to '{base}'")
    )]
    ModuleNotFound { name: String, base: String },

    #[error("{message}")]
    #[diagnostic(
        code(quill::malformed_module),
        help("the module was left untouched; fix its syntax or register the symbol by hand")
    )]
    MalformedModule {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("`{symbol}` is already imported from '{specifier}'")]
    #[diagnostic(
        code(quill::conflicting_import),
        help("the module was left untouched; remove the stale import or register the symbol by hand")
    )]
    ConflictingImport {
        #[source_code]
        src: NamedSource<String>,
        #[label("existing import")]
        span: SourceSpan,
        symbol: String,
        specifier: String,
    },

    #[error("failed to access '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse quill.toml")]
    #[diagnostic(code(quill::config_parse))]
    ConfigParse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid quill.toml: {message}")]
    #[diagnostic(code(quill::invalid_config))]
    InvalidConfig {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("could not find quill.toml in '{start}' or any parent directory")]
    #[diagnostic(
        code(quill::project_not_found),
        help("run quill from inside a generated application tree")
    )]
    ProjectNotFound { start: PathBuf },
}

impl Error {
    /// Create an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }

    /// Create a malformed module error pointing into the module source
    pub fn malformed_module(
        message: impl Into<String>,
        src: &str,
        filename: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::MalformedModule {
            src: NamedSource::new(filename, src.to_string()),
            span,
            message: message.into(),
        })
    }

    /// Create an error for a symbol already bound by another module's import
    pub fn conflicting_import(
        symbol: &str,
        specifier: &str,
        src: &str,
        filename: &str,
        span: SourceSpan,
    ) -> Box<Self> {
        Box::new(Error::ConflictingImport {
            src: NamedSource::new(filename, src.to_string()),
            span,
            symbol: symbol.to_string(),
            specifier: specifier.to_string(),
        })
    }

    /// Whether this error is the boundary violation raised by path resolution
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, Error::InvalidPath { .. })
    }
}
