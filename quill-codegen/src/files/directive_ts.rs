//! Directive implementation file.

use std::path::{Path, PathBuf};

use quill_core::{FileRules, GeneratedFile};

use crate::{Import, builder::CodeBuilder, naming::DirectiveNames};

/// The `<name>.directive.ts` file.
pub struct DirectiveTs {
    names: DirectiveNames,
}

impl DirectiveTs {
    pub fn new(names: DirectiveNames) -> Self {
        Self { names }
    }
}

impl GeneratedFile for DirectiveTs {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.names.file_name())
    }

    fn rules(&self) -> FileRules {
        FileRules::create_once()
    }

    fn render(&self) -> String {
        let import = Import::new("@angular/core").named("Directive");
        let selector = format!("selector: '[{}]'", self.names.selector);

        CodeBuilder::typescript()
            .line(&import.statement())
            .blank()
            .block_with_close("@Directive({", "})", |b| b.line(&selector))
            .line(&format!("export class {} {{", self.names.class_name))
            .blank()
            .indent()
            .line("constructor() { }")
            .dedent()
            .blank()
            .line("}")
            .build()
    }
}
