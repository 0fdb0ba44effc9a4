//! Text building primitives for blueprint templates.

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
