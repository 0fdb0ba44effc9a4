/// One level of indentation in rendered templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(&'static str);

impl Indent {
    /// Two spaces, as Angular projects are formatted.
    pub const TYPESCRIPT: Self = Self("  ");

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::TYPESCRIPT
    }
}
