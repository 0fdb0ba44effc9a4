//! TypeScript import statement builder.

/// Builder for `import { ... } from '...';` statements.
///
/// Renders with single quotes, the style used by generated application trees.
#[derive(Debug, Clone)]
pub struct Import {
    from: String,
    named: Vec<String>,
}

impl Import {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            named: Vec::new(),
        }
    }

    /// Import a named export.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.named.push(name.into());
        self
    }

    /// Render the statement without a line terminator.
    pub fn statement(&self) -> String {
        if self.named.is_empty() {
            format!("import '{}';", self.from)
        } else {
            format!(
                "import {{ {} }} from '{}';",
                self.named.join(", "),
                self.from
            )
        }
    }
}
