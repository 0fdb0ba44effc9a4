//! Declaration-list surgery on module source text.
//!
//! Edits are computed as insertions into the original text, so every byte
//! outside the two insertion points is preserved, line endings included.

use miette::SourceSpan;
use quill_codegen::Import;

use super::scan::{self, ImportBlock, ImportStmt, ListShape, ScanError};
use crate::{Error, Result};

/// Property holding the registered symbols.
pub const DECLARATIONS: &str = "declarations";

/// Result of [`add_declaration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEdit {
    pub content: String,
    pub import_added: bool,
    pub declaration_added: bool,
}

impl ModuleEdit {
    pub fn is_changed(&self) -> bool {
        self.import_added || self.declaration_added
    }
}

/// Import `symbol` from `import_path` and append it to the declaration list.
///
/// Either half is skipped when already present. `filename` labels diagnostics.
pub fn add_declaration(
    src: &str,
    filename: &str,
    symbol: &str,
    import_path: &str,
) -> Result<ModuleEdit> {
    let malformed = |e: ScanError| {
        Error::malformed_module(
            e.message,
            src,
            filename,
            Some(SourceSpan::from((e.offset, e.len))),
        )
    };

    let newline = line_ending(src);
    let imports = scan::scan_imports(src).map_err(malformed)?;
    let list = scan::find_list_property(src, DECLARATIONS)
        .map_err(malformed)?
        .ok_or_else(|| {
            Error::malformed_module(
                format!("no `{}` list found", DECLARATIONS),
                src,
                filename,
                None,
            )
        })?;

    let import_added = match find_binding(src, &imports, symbol, import_path) {
        Binding::Missing => true,
        Binding::Present => false,
        Binding::Conflict(existing) => {
            return Err(Error::conflicting_import(
                symbol,
                &existing.specifier,
                src,
                filename,
                SourceSpan::from(existing.span.clone()),
            ));
        }
    };

    let mut insertions: Vec<(usize, String)> = Vec::with_capacity(3);

    let declaration_added = !is_declared(src, &list, symbol);
    if declaration_added {
        insertions.extend(declaration_insertions(src, &list, symbol, newline).map_err(malformed)?);
    }

    if import_added {
        let statement = Import::new(import_path).named(symbol).statement();
        insertions.push(import_insertion(src, &imports, &statement, newline));
    }

    // Apply back to front so earlier offsets stay valid
    insertions.sort_by(|a, b| b.0.cmp(&a.0));
    let mut content = src.to_string();
    for (at, text) in insertions {
        content.insert_str(at, &text);
    }

    Ok(ModuleEdit {
        content,
        import_added,
        declaration_added,
    })
}

/// The line ending the file already uses; `\n` when it has none.
fn line_ending(src: &str) -> &'static str {
    match src.find('\n') {
        Some(i) if i > 0 && src.as_bytes()[i - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    haystack.match_indices(word).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

fn is_declared(src: &str, list: &ListShape, symbol: &str) -> bool {
    list.entries.iter().any(|r| &src[r.clone()] == symbol)
}

enum Binding<'a> {
    Missing,
    Present,
    /// The symbol is bound by an import of another module
    Conflict(&'a ImportStmt),
}

fn find_binding<'a>(
    src: &str,
    imports: &'a ImportBlock,
    symbol: &str,
    import_path: &str,
) -> Binding<'a> {
    let mut bound = imports
        .imports
        .iter()
        .filter(|i| contains_word(&src[i.bindings.clone()], symbol))
        .peekable();

    let Some(first) = bound.peek().copied() else {
        return Binding::Missing;
    };
    if bound.any(|i| i.specifier == import_path) {
        Binding::Present
    } else {
        Binding::Conflict(first)
    }
}

/// Leading whitespace of the line containing `offset`.
fn indent_of_line(src: &str, offset: usize) -> &str {
    let line_start = src[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &src[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

/// Whether only whitespace precedes `offset` on its line.
fn starts_line(src: &str, offset: usize) -> bool {
    let line_start = src[..offset].rfind('\n').map_or(0, |i| i + 1);
    src[line_start..offset].trim().is_empty()
}

fn declaration_insertions(
    src: &str,
    list: &ListShape,
    symbol: &str,
    newline: &str,
) -> std::result::Result<Vec<(usize, String)>, ScanError> {
    let multiline = list.is_multiline(src);

    let Some(last) = list.entries.last() else {
        if !multiline {
            // `[]` becomes `[Symbol]`
            return Ok(vec![(list.open + 1, symbol.to_string())]);
        }
        let at = scan::line_trivia_end(src, list.open + 1)?;
        let indent = format!("{}  ", indent_of_line(src, list.open));
        return Ok(vec![(at, format!("{}{}{}", newline, indent, symbol))]);
    };

    let separator = if multiline {
        let indent = if starts_line(src, last.start) {
            indent_of_line(src, last.start).to_string()
        } else {
            format!("{}  ", indent_of_line(src, list.open))
        };
        format!("{}{}", newline, indent)
    } else {
        " ".to_string()
    };

    let after = list.trailing_comma.map_or(last.end, |comma| comma + 1);
    // A comment trailing the last entry stays on that entry's line
    let at = if multiline {
        scan::line_trivia_end(src, after)?
    } else {
        after
    };

    Ok(match list.trailing_comma {
        Some(_) => vec![(at, format!("{}{},", separator, symbol))],
        None if at == last.end => vec![(at, format!(",{}{}", separator, symbol))],
        None => vec![
            (at, format!("{}{}", separator, symbol)),
            (last.end, ",".to_string()),
        ],
    })
}

fn import_insertion(
    src: &str,
    imports: &ImportBlock,
    statement: &str,
    newline: &str,
) -> (usize, String) {
    let anchor = imports
        .imports
        .iter()
        .rev()
        .find(|i| i.is_relative())
        .or_else(|| imports.imports.last());

    match anchor {
        Some(import) => {
            let at = import.line_end;
            if src[..at].ends_with('\n') {
                (at, format!("{}{}", statement, newline))
            } else if at == src.len() {
                // Statement ends the file without a line terminator
                (at, format!("{}{}", newline, statement))
            } else {
                // More code follows on the statement's line
                (at, format!("{}{}{}", newline, statement, newline))
            }
        }
        None => {
            let line_start = src[..imports.first_statement]
                .rfind('\n')
                .map_or(0, |i| i + 1);
            (line_start, format!("{}{}{}", statement, newline, newline))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_MODULE: &str = "import { BrowserModule } from '@angular/platform-browser';
import { NgModule } from '@angular/core';

import { AppComponent } from './app.component';

@NgModule({
  declarations: [
    AppComponent
  ],
  imports: [
    BrowserModule
  ],
  providers: [],
  bootstrap: [AppComponent]
})
export class AppModule { }
";

    const FEATURE_MODULE: &str = "import { NgModule } from '@angular/core';
import { CommonModule } from '@angular/common';

@NgModule({
  imports: [
    CommonModule
  ],
  declarations: []
})
export class FooModule { }
";

    fn edit(src: &str, symbol: &str, path: &str) -> ModuleEdit {
        add_declaration(src, "app.module.ts", symbol, path).unwrap()
    }

    #[test]
    fn test_register_in_app_module() {
        let result = edit(APP_MODULE, "BazDirective", "./baz.directive");

        assert!(result.import_added);
        assert!(result.declaration_added);
        assert_eq!(
            result.content,
            "import { BrowserModule } from '@angular/platform-browser';
import { NgModule } from '@angular/core';

import { AppComponent } from './app.component';
import { BazDirective } from './baz.directive';

@NgModule({
  declarations: [
    AppComponent,
    BazDirective
  ],
  imports: [
    BrowserModule
  ],
  providers: [],
  bootstrap: [AppComponent]
})
export class AppModule { }
"
        );
    }

    #[test]
    fn test_register_in_empty_list_after_last_import() {
        let result = edit(FEATURE_MODULE, "BazDirective", "../baz.directive");

        assert_eq!(
            result.content,
            "import { NgModule } from '@angular/core';
import { CommonModule } from '@angular/common';
import { BazDirective } from '../baz.directive';

@NgModule({
  imports: [
    CommonModule
  ],
  declarations: [BazDirective]
})
export class FooModule { }
"
        );
    }

    #[test]
    fn test_single_line_list_uses_comma_space() {
        let src = "import { A } from './a';\n@NgModule({ declarations: [AppComponent] })\nexport class M {}\n";
        let result = edit(src, "BazDirective", "./baz.directive");

        assert!(result.content.contains("declarations: [AppComponent, BazDirective]"));
    }

    #[test]
    fn test_trailing_comma_is_preserved() {
        let src = "@NgModule({\n  declarations: [\n    A,\n    B,\n  ],\n})\nexport class M {}\n";
        let result = edit(src, "C", "./c");

        assert!(
            result
                .content
                .contains("declarations: [\n    A,\n    B,\n    C,\n  ],")
        );
    }

    #[test]
    fn test_entry_on_bracket_line_indents_one_level() {
        let src = "@NgModule({\n  declarations: [A\n  ]\n})\nexport class M {}\n";
        let result = edit(src, "C", "./c");

        assert!(result.content.contains("declarations: [A,\n    C\n  ]"));
    }

    #[test]
    fn test_crlf_is_preserved() {
        let src = APP_MODULE.replace('\n', "\r\n");
        let result = edit(&src, "BazDirective", "./baz.directive");

        assert_eq!(result.content, edit(APP_MODULE, "BazDirective", "./baz.directive").content.replace('\n', "\r\n"));
        assert!(!result.content.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let first = edit(APP_MODULE, "BazDirective", "./baz.directive");
        let second = edit(&first.content, "BazDirective", "./baz.directive");

        assert!(!second.is_changed());
        assert_eq!(second.content, first.content);
    }

    #[test]
    fn test_only_missing_half_is_added() {
        let src = "import { BazDirective } from './baz.directive';\n@NgModule({ declarations: [] })\nexport class M {}\n";
        let result = edit(src, "BazDirective", "./baz.directive");

        assert!(!result.import_added);
        assert!(result.declaration_added);
        assert_eq!(result.content.matches("import { BazDirective }").count(), 1);
        assert!(result.content.contains("declarations: [BazDirective]"));
    }

    #[test]
    fn test_similar_symbol_is_not_a_match() {
        let src = "import { BazDirectiveX } from './baz.directive';\n@NgModule({ declarations: [BazDirectiveX] })\nexport class M {}\n";
        let result = edit(src, "BazDirective", "./baz.directive");

        assert!(result.import_added);
        assert!(result.declaration_added);
    }

    #[test]
    fn test_no_imports_inserts_before_first_statement() {
        let src = "// Module\n@NgModule({ declarations: [] })\nexport class M {}\n";
        let result = edit(src, "C", "./c");

        assert_eq!(
            result.content,
            "// Module\nimport { C } from './c';\n\n@NgModule({ declarations: [C] })\nexport class M {}\n"
        );
    }

    #[test]
    fn test_missing_declarations_is_malformed() {
        let src = "import { NgModule } from '@angular/core';\n@NgModule({})\nexport class M {}\n";
        let err = add_declaration(src, "m.module.ts", "C", "./c").unwrap_err();

        match *err {
            Error::MalformedModule { message, span, .. } => {
                assert_eq!(message, "no `declarations` list found");
                assert!(span.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_list_is_malformed() {
        let src = "@NgModule({ declarations: [A, (B] })\n";
        let err = add_declaration(src, "m.module.ts", "C", "./c").unwrap_err();

        assert!(matches!(*err, Error::MalformedModule { span: Some(_), .. }));
    }

    #[test]
    fn test_import_after_trailing_block_comment() {
        let src = "import { A } from './a'; /* note\n  continues */\n@NgModule({ declarations: [A] })\nexport class M {}\n";
        let result = edit(src, "B", "./b");

        assert_eq!(
            result.content,
            "import { A } from './a'; /* note\n  continues */\nimport { B } from './b';\n@NgModule({ declarations: [A, B] })\nexport class M {}\n"
        );
    }

    #[test]
    fn test_import_before_code_on_same_line() {
        let src = "import { A } from './a'; const x = 1;\n@NgModule({ declarations: [A] })\n";
        let result = edit(src, "B", "./b");

        assert!(
            result
                .content
                .starts_with("import { A } from './a'; \nimport { B } from './b';\nconst x = 1;\n")
        );
    }

    #[test]
    fn test_symbol_imported_from_elsewhere_is_a_conflict() {
        let src = "import { B } from './old/b';\n@NgModule({ declarations: [A, B] })\nexport class M {}\n";
        let err = add_declaration(src, "m.module.ts", "B", "./b").unwrap_err();

        match *err {
            Error::ConflictingImport {
                symbol, specifier, ..
            } => {
                assert_eq!(symbol, "B");
                assert_eq!(specifier, "./old/b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_same_specifier_among_several_bindings_is_present() {
        let src = "import { B } from './old/b';\nimport { A, B } from './b';\n@NgModule({ declarations: [A] })\n";
        let result = edit(src, "B", "./b");

        assert!(!result.import_added);
        assert!(result.content.contains("declarations: [A, B]"));
    }

    #[test]
    fn test_empty_multiline_list_keeps_layout() {
        let src = "@NgModule({\n  declarations: [\n  ]\n})\nexport class M {}\n";
        let result = edit(src, "B", "./b");

        assert!(result.content.contains("declarations: [\n    B\n  ]"));
    }

    #[test]
    fn test_empty_multiline_list_after_comment() {
        let src = "@NgModule({\n  declarations: [ // none yet\n  ]\n})\n";
        let result = edit(src, "B", "./b");

        assert!(result.content.contains("declarations: [ // none yet\n    B\n  ]"));
    }

    #[test]
    fn test_trailing_line_comment_stays_on_its_entry() {
        let src = "@NgModule({\n  declarations: [\n    A // root\n  ]\n})\n";
        let result = edit(src, "B", "./b");

        assert!(result.content.contains("declarations: [\n    A, // root\n    B\n  ]"));
    }

    #[test]
    fn test_trailing_comment_after_trailing_comma() {
        let src = "@NgModule({\r\n  declarations: [\r\n    A, // root\r\n  ]\r\n})\r\n";
        let result = edit(src, "B", "./b");

        assert!(
            result
                .content
                .contains("declarations: [\r\n    A, // root\r\n    B,\r\n  ]")
        );
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("import { A, B } from './x'", "B"));
        assert!(!contains_word("import { AB } from './x'", "B"));
        assert!(!contains_word("import { B$ } from './x'", "B"));
    }
}
