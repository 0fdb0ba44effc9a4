//! Blueprint files for the directive schematic.

mod directive_spec_ts;
mod directive_ts;

pub use directive_spec_ts::DirectiveSpecTs;
pub use directive_ts::DirectiveTs;
