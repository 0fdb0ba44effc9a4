//! Minimal TypeScript scanning for module surgery.
//!
//! The scanner knows strings, template literals and comments, which is
//! enough to find import statements and the bracket structure of a
//! declaration list. Regular-expression literals are not recognized.

use std::ops::Range;

/// A problem found while scanning, as a byte range into the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScanError {
    pub offset: usize,
    pub len: usize,
    pub message: String,
}

impl ScanError {
    fn new(offset: usize, len: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            len,
            message: message.into(),
        }
    }
}

type ScanResult<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Ident(Range<usize>),
    Str(Range<usize>),
    Punct(u8, usize),
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::at(src, 0)
    }

    pub fn at(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    /// Skip whitespace and comments.
    pub fn skip_trivia(&mut self) -> ScanResult<()> {
        loop {
            if self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
                self.pos += 1;
            } else if !self.skip_comment()? {
                return Ok(());
            }
        }
    }

    /// Skip spaces, tabs and comments; a line break outside a comment stops it.
    pub fn skip_line_trivia(&mut self) -> ScanResult<()> {
        loop {
            self.skip_inline_space();
            if !self.skip_comment()? {
                return Ok(());
            }
        }
    }

    /// Skip one comment at the cursor. A line comment stops before its line
    /// ending (`\r\n` included).
    fn skip_comment(&mut self) -> ScanResult<bool> {
        match (self.peek(), self.peek_at(1)) {
            (Some(b'/'), Some(b'/')) => {
                let rest = &self.src[self.pos..];
                self.pos += match rest.find('\n') {
                    Some(i) if rest[..i].ends_with('\r') => i - 1,
                    Some(i) => i,
                    None => rest.len(),
                };
                Ok(true)
            }
            (Some(b'/'), Some(b'*')) => {
                let start = self.pos;
                match self.src[start + 2..].find("*/") {
                    Some(i) => {
                        self.pos = start + 2 + i + 2;
                        Ok(true)
                    }
                    None => Err(ScanError::new(start, 2, "unterminated comment")),
                }
            }
            _ => Ok(false),
        }
    }

    /// Skip spaces and tabs only, staying on the current line.
    pub fn skip_inline_space(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.pos += 1;
        }
    }

    /// Read the next token after trivia, or `None` at end of input.
    pub fn next_token(&mut self) -> ScanResult<Option<Token>> {
        self.skip_trivia()?;
        let Some(b) = self.peek() else {
            return Ok(None);
        };
        let start = self.pos;

        let token = match b {
            b'\'' | b'"' | b'`' => {
                self.skip_string(b)?;
                Token::Str(start..self.pos)
            }
            b if is_ident_start(b) => {
                while self.peek().is_some_and(is_ident_continue) {
                    self.pos += 1;
                }
                Token::Ident(start..self.pos)
            }
            b if b.is_ascii() => {
                self.pos += 1;
                Token::Punct(b, start)
            }
            _ => {
                // Non-ASCII: step over the whole character
                let width = self.src[start..].chars().next().map_or(1, char::len_utf8);
                self.pos += width;
                Token::Punct(0, start)
            }
        };
        Ok(Some(token))
    }

    fn skip_string(&mut self, quote: u8) -> ScanResult<()> {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => self.pos += 2,
                b'\n' if quote != b'`' => break,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(ScanError::new(start, 1, "unterminated string literal"))
    }

    pub fn text(&self, range: Range<usize>) -> &'a str {
        &self.src[range]
    }
}

/// A top-level `import` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportStmt {
    /// Statement text, from `import` to the specifier or `;`
    pub span: Range<usize>,
    /// Text between `import` and the specifier, where names are bound
    pub bindings: Range<usize>,
    /// Module specifier without quotes
    pub specifier: String,
    /// Offset just past the line ending that closes the statement's line
    pub line_end: usize,
}

impl ImportStmt {
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with("./") || self.specifier.starts_with("../")
    }
}

/// The leading run of import statements in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportBlock {
    pub imports: Vec<ImportStmt>,
    /// Offset of the first token that is not part of an import
    pub first_statement: usize,
}

/// Collect the import statements at the top of `src`.
pub(crate) fn scan_imports(src: &str) -> ScanResult<ImportBlock> {
    let mut imports = Vec::new();
    let mut scanner = Scanner::new(src);

    loop {
        scanner.skip_trivia()?;
        let start = scanner.pos();
        let mut lookahead = Scanner::at(src, start);

        let is_import = match lookahead.next_token()? {
            Some(Token::Ident(r)) if lookahead.text(r.clone()) == "import" => {
                // `import(` and `import.meta` are expressions, not declarations
                !matches!(lookahead.next_token()?, Some(Token::Punct(b'(' | b'.', _)) | None)
            }
            _ => false,
        };
        if !is_import {
            return Ok(ImportBlock {
                imports,
                first_statement: start,
            });
        }

        let stmt = scan_import_statement(&mut scanner)?;
        imports.push(stmt);
    }
}

fn scan_import_statement(scanner: &mut Scanner<'_>) -> ScanResult<ImportStmt> {
    let start = scanner.pos();
    let (specifier, bindings) = loop {
        match scanner.next_token()? {
            Some(Token::Str(r)) => {
                let bindings = start..r.start;
                let text = scanner.text(r);
                break (text[1..text.len() - 1].to_string(), bindings);
            }
            Some(Token::Punct(b';', at)) => {
                return Err(ScanError::new(start, at + 1 - start, "import without a module specifier"));
            }
            Some(_) => {}
            None => {
                return Err(ScanError::new(start, "import".len(), "unterminated import statement"));
            }
        }
    };

    scanner.skip_inline_space();
    if scanner.peek() == Some(b';') {
        scanner.pos += 1;
    }
    let end = scanner.pos();

    // Trailing comments belong to the statement's line, even when a block
    // comment runs on past it
    let mut tail = Scanner::at(scanner.src, end);
    tail.skip_line_trivia()?;
    let line_end = match (tail.peek(), tail.peek_at(1)) {
        (Some(b'\n'), _) => tail.pos + 1,
        (Some(b'\r'), Some(b'\n')) => tail.pos + 2,
        _ => tail.pos,
    };

    Ok(ImportStmt {
        span: start..end,
        bindings,
        specifier,
        line_end,
    })
}

/// Offset after the spaces and comments that follow `from` on its line.
pub(crate) fn line_trivia_end(src: &str, from: usize) -> ScanResult<usize> {
    let mut scanner = Scanner::at(src, from);
    scanner.skip_line_trivia()?;
    Ok(scanner.pos())
}

/// Bracket layout of an array literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListShape {
    pub open: usize,
    pub close: usize,
    /// Entry ranges, trimmed of surrounding trivia
    pub entries: Vec<Range<usize>>,
    /// Offset of a comma after the last entry
    pub trailing_comma: Option<usize>,
}

impl ListShape {
    pub fn is_multiline(&self, src: &str) -> bool {
        src[self.open..self.close].contains('\n')
    }
}

/// Find the array literal bound to the property `name` (as in `name: [...]`).
pub(crate) fn find_list_property(src: &str, name: &str) -> ScanResult<Option<ListShape>> {
    let mut scanner = Scanner::new(src);

    while let Some(token) = scanner.next_token()? {
        let Token::Ident(range) = token else {
            continue;
        };
        if scanner.text(range.clone()) != name {
            continue;
        }

        let mut lookahead = Scanner::at(src, scanner.pos());
        if !matches!(lookahead.next_token()?, Some(Token::Punct(b':', _))) {
            continue;
        }
        return match lookahead.next_token()? {
            Some(Token::Punct(b'[', open)) => parse_list(src, open).map(Some),
            _ => Err(ScanError::new(
                range.start,
                range.len(),
                format!("`{}` is not an array literal", name),
            )),
        };
    }
    Ok(None)
}

/// Parse the array literal whose `[` is at `open`.
pub(crate) fn parse_list(src: &str, open: usize) -> ScanResult<ListShape> {
    let mut scanner = Scanner::at(src, open + 1);
    let mut nesting: Vec<(u8, usize)> = Vec::new();
    let mut entries = Vec::new();
    let mut current: Option<Range<usize>> = None;
    let mut last_comma = None;

    loop {
        let Some(token) = scanner.next_token()? else {
            return Err(ScanError::new(open, 1, "unterminated declaration list"));
        };

        if nesting.is_empty() {
            match token {
                Token::Punct(b',', at) => {
                    let entry = current
                        .take()
                        .ok_or_else(|| ScanError::new(at, 1, "empty entry in declaration list"))?;
                    entries.push(entry);
                    last_comma = Some(at);
                    continue;
                }
                Token::Punct(b']', close) => {
                    let trailing_comma = match current.take() {
                        Some(entry) => {
                            entries.push(entry);
                            None
                        }
                        None => last_comma,
                    };
                    return Ok(ListShape {
                        open,
                        close,
                        entries,
                        trailing_comma,
                    });
                }
                _ => {}
            }
        }

        let start = match &token {
            Token::Ident(r) | Token::Str(r) => r.start,
            Token::Punct(_, at) => *at,
        };
        match token {
            Token::Punct(b @ (b'[' | b'(' | b'{'), at) => nesting.push((b, at)),
            Token::Punct(b @ (b']' | b')' | b'}'), at) => {
                let expected = match b {
                    b']' => b'[',
                    b')' => b'(',
                    _ => b'{',
                };
                match nesting.pop() {
                    Some((opener, _)) if opener == expected => {}
                    _ => {
                        return Err(ScanError::new(at, 1, "unbalanced bracket in declaration list"));
                    }
                }
            }
            _ => {}
        }

        let end = scanner.pos();
        current = Some(match current {
            Some(r) => r.start..end,
            None => start..end,
        });
    }
}
