//! Directive companion spec file.

use std::path::{Path, PathBuf};

use quill_core::{FileRules, GeneratedFile};

use crate::{Import, builder::CodeBuilder, naming::DirectiveNames};

/// The `<name>.directive.spec.ts` file.
pub struct DirectiveSpecTs {
    names: DirectiveNames,
}

impl DirectiveSpecTs {
    pub fn new(names: DirectiveNames) -> Self {
        Self { names }
    }
}

impl GeneratedFile for DirectiveSpecTs {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(self.names.spec_file_name())
    }

    fn rules(&self) -> FileRules {
        FileRules::create_once()
    }

    fn render(&self) -> String {
        let class = &self.names.class_name;
        let import = Import::new(format!("./{}", self.names.file_stem())).named(class);

        CodeBuilder::typescript()
            .line(&import.statement())
            .blank()
            .block_with_close(&format!("describe('{}', () => {{", class), "});", |b| {
                b.block_with_close("it('should create an instance', () => {", "});", |b| {
                    b.line(&format!("const directive = new {}();", class))
                        .line("expect(directive).toBeTruthy();")
                })
            })
            .build()
    }
}
