// SPDX-License-Identifier: MIT OR Apache-2.0

//! make.conf-style configuration source adapter.
//!
//! Portage keeps its layered settings in shell-like files (`make.globals`,
//! profile `make.defaults`, `make.conf`). This module parses that format into
//! declarations and exposes a file as a [`SettingsSource`].

use crate::domain::{ConfigError, Declaration, Result, VariableName};
use crate::ports::{SettingsParser, SettingsSource};
use std::fs;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

/// Maximum allowed size for a make.conf-style file (10MB)
const MAX_MAKE_CONF_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Character iterator that tracks the current physical line.
struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars().peekable(),
            line: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t') | Some('\r')) {
            self.bump();
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        word
    }
}

/// Parser for make.conf-style files.
///
/// Each assignment has the form `NAME=value` or `NAME+=value`, optionally
/// prefixed by `export`. Values may be bare, `'single quoted'` or
/// `"double quoted"`; double-quoted values may span several lines, and a
/// backslash at the end of a line joins it with the next. `#` starts a comment.
/// References such as `${PORTDIR}` are kept verbatim.
///
/// # Examples
///
/// ```rust
/// use portcfg::adapters::MakeConfParser;
/// use portcfg::ports::SettingsParser;
///
/// let parser = MakeConfParser::new();
/// let decls = parser
///     .parse("# comment\nUSE=\"X -gtk\"\nDISTDIR=${PORTDIR}/distfiles\n")
///     .unwrap();
/// assert_eq!(decls[0].value, "X -gtk");
/// assert_eq!(decls[1].value, "${PORTDIR}/distfiles");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MakeConfParser;

impl MakeConfParser {
    /// Creates a new make.conf parser.
    pub fn new() -> Self {
        MakeConfParser
    }

    fn parse_statement(scanner: &mut Scanner<'_>) -> Result<Declaration> {
        let start_line = scanner.line;

        let mut word = scanner.read_word();
        if word == "export" && matches!(scanner.peek(), Some(' ') | Some('\t')) {
            scanner.skip_blanks();
            word = scanner.read_word();
        }

        let name = VariableName::from(word);
        if !name.is_shell_identifier() {
            return Err(ConfigError::parse(start_line, "expected a variable name"));
        }

        let append = match scanner.bump() {
            Some('=') => false,
            Some('+') if scanner.peek() == Some('=') => {
                scanner.bump();
                true
            }
            _ => {
                return Err(ConfigError::parse(
                    start_line,
                    format!("expected '=' after '{}'", name),
                ))
            }
        };

        let value = Self::parse_value(scanner, start_line)?;
        Ok(Declaration {
            name,
            value,
            append,
        })
    }

    fn parse_value(scanner: &mut Scanner<'_>, start_line: usize) -> Result<String> {
        let mut value = String::new();

        while let Some(c) = scanner.peek() {
            match c {
                '\n' => {
                    scanner.bump();
                    return Ok(value);
                }
                '\r' => {
                    scanner.bump();
                }
                ' ' | '\t' => {
                    scanner.skip_blanks();
                    match scanner.peek() {
                        None => {}
                        Some('\n') => {
                            scanner.bump();
                        }
                        Some('#') => scanner.skip_line(),
                        Some(_) => {
                            return Err(ConfigError::parse(
                                scanner.line,
                                "unexpected text after value",
                            ))
                        }
                    }
                    return Ok(value);
                }
                '"' => {
                    scanner.bump();
                    Self::read_double_quoted(scanner, start_line, &mut value)?;
                }
                '\'' => {
                    scanner.bump();
                    Self::read_single_quoted(scanner, start_line, &mut value)?;
                }
                '\\' => {
                    scanner.bump();
                    match scanner.bump() {
                        Some('\n') | None => {}
                        Some(escaped) => value.push(escaped),
                    }
                }
                _ => {
                    value.push(c);
                    scanner.bump();
                }
            }
        }

        Ok(value)
    }

    fn read_double_quoted(
        scanner: &mut Scanner<'_>,
        start_line: usize,
        value: &mut String,
    ) -> Result<()> {
        loop {
            match scanner.bump() {
                Some('"') => return Ok(()),
                Some('\\') => match scanner.bump() {
                    Some('\n') => {}
                    Some(c @ ('"' | '\\')) => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => break,
                },
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(ConfigError::parse(start_line, "unterminated double quote"))
    }

    fn read_single_quoted(
        scanner: &mut Scanner<'_>,
        start_line: usize,
        value: &mut String,
    ) -> Result<()> {
        while let Some(c) = scanner.bump() {
            if c == '\'' {
                return Ok(());
            }
            value.push(c);
        }
        Err(ConfigError::parse(start_line, "unterminated single quote"))
    }
}

impl SettingsParser for MakeConfParser {
    fn parse(&self, content: &str) -> Result<Vec<Declaration>> {
        let mut scanner = Scanner::new(content);
        let mut declarations = Vec::new();

        loop {
            match scanner.peek() {
                None => break,
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    scanner.bump();
                }
                Some('\\') => {
                    // a lone continuation between statements
                    scanner.bump();
                    scanner.bump();
                }
                Some('#') => scanner.skip_line(),
                Some(_) => declarations.push(Self::parse_statement(&mut scanner)?),
            }
        }

        Ok(declarations)
    }

    fn format_name(&self) -> &str {
        "make.conf"
    }
}

/// Settings source backed by a make.conf-style file.
///
/// # Examples
///
/// ```rust,no_run
/// use portcfg::adapters::MakeConfFileAdapter;
/// use portcfg::ports::{SettingsSource, PRIORITY_USER};
///
/// let adapter = MakeConfFileAdapter::from_file("/etc/portage/make.conf", PRIORITY_USER).unwrap();
/// assert_eq!(adapter.name(), "make.conf");
/// ```
#[derive(Debug, Clone)]
pub struct MakeConfFileAdapter {
    /// Name used in logs and errors
    source_name: String,
    /// Backing file, if the adapter was created from one
    file_path: Option<PathBuf>,
    /// Priority of this layer
    priority: u8,
    /// Parsed declarations, in file order
    declarations: Vec<Declaration>,
    /// make.conf parser
    parser: MakeConfParser,
}

impl MakeConfFileAdapter {
    /// Reads and parses a file. The source is named after the file.
    pub fn from_file<P: AsRef<Path>>(path: P, priority: u8) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let source_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("make.conf")
            .to_string();

        let canonical_path = file_path.canonicalize().map_err(|e| ConfigError::SourceError {
            source_name: source_name.clone(),
            message: format!("Invalid or inaccessible path: {}", file_path.display()),
            source: Some(Box::new(e)),
        })?;

        let parser = MakeConfParser::new();
        let declarations = Self::read(&canonical_path, &source_name, &parser)?;

        Ok(Self {
            source_name,
            file_path: Some(canonical_path),
            priority,
            declarations,
            parser,
        })
    }

    /// Parses in-memory content. Reloading such a source is a no-op.
    pub fn from_content(name: impl Into<String>, content: &str, priority: u8) -> Result<Self> {
        let source_name = name.into();
        let parser = MakeConfParser::new();
        let declarations = parser
            .parse(content)
            .map_err(|e| e.in_source(&source_name))?;

        Ok(Self {
            source_name,
            file_path: None,
            priority,
            declarations,
            parser,
        })
    }

    /// Returns the path of the backing file, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn read(path: &Path, source_name: &str, parser: &MakeConfParser) -> Result<Vec<Declaration>> {
        let metadata = fs::metadata(path).map_err(|e| ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: "Failed to read file metadata".to_string(),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_MAKE_CONF_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: source_name.to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_MAKE_CONF_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: "Failed to read configuration file".to_string(),
            source: Some(Box::new(e)),
        })?;

        let declarations = parser
            .parse(&content)
            .map_err(|e| e.in_source(source_name))?;

        tracing::debug!(
            "Parsed {} declarations from {} ({})",
            declarations.len(),
            path.display(),
            parser.format_name()
        );

        Ok(declarations)
    }
}

impl SettingsSource for MakeConfFileAdapter {
    fn name(&self) -> &str {
        &self.source_name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn declarations(&self) -> Result<Vec<Declaration>> {
        Ok(self.declarations.clone())
    }

    fn reload(&mut self) -> Result<()> {
        if let Some(path) = &self.file_path {
            self.declarations = Self::read(path, &self.source_name, &self.parser)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(content: &str) -> Vec<Declaration> {
        MakeConfParser::new().parse(content).unwrap()
    }

    #[test]
    fn test_bare_value() {
        let decls = parse("ARCH=amd64\n");
        assert_eq!(decls, vec![Declaration::assign("ARCH", "amd64")]);
    }

    #[test]
    fn test_double_quoted_value() {
        let decls = parse("USE=\"X -gtk  alsa\"");
        assert_eq!(decls[0].value, "X -gtk  alsa");
    }

    #[test]
    fn test_single_quoted_value() {
        let decls = parse("CFLAGS='-O2 -pipe'\n");
        assert_eq!(decls[0].value, "-O2 -pipe");
    }

    #[test]
    fn test_references_kept_raw() {
        let decls = parse("DISTDIR=\"${PORTDIR}/distfiles\"\nPKGDIR=$PORTDIR/packages\n");
        assert_eq!(decls[0].value, "${PORTDIR}/distfiles");
        assert_eq!(decls[1].value, "$PORTDIR/packages");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let content = "# header\n\n   # indented comment\nA=1 # trailing\n\nB=2\n";
        let decls = parse(content);
        assert_eq!(
            decls,
            vec![Declaration::assign("A", "1"), Declaration::assign("B", "2")]
        );
    }

    #[test]
    fn test_hash_inside_value_is_kept() {
        let decls = parse("A=\"x # y\"\nB=x#y\n");
        assert_eq!(decls[0].value, "x # y");
        assert_eq!(decls[1].value, "x#y");
    }

    #[test]
    fn test_multiline_double_quotes() {
        let decls = parse("USE=\"a b\n    c\"\nARCH=x86\n");
        assert_eq!(decls[0].value, "a b\n    c");
        assert_eq!(decls[1], Declaration::assign("ARCH", "x86"));
    }

    #[test]
    fn test_backslash_continuation() {
        let decls = parse("FEATURES=\"sandbox \\\nccache\"\n");
        assert_eq!(decls[0].value, "sandbox ccache");
    }

    #[test]
    fn test_escapes_in_double_quotes() {
        let decls = parse(r#"A="say \"hi\" \\ \n""#);
        assert_eq!(decls[0].value, r#"say "hi" \ \n"#);
    }

    #[test]
    fn test_export_prefix() {
        let decls = parse("export PORTDIR=/var/db/repos/gentoo\n");
        assert_eq!(decls[0].name.as_str(), "PORTDIR");
    }

    #[test]
    fn test_variable_named_export() {
        let decls = parse("export=yes\n");
        assert_eq!(decls[0].name.as_str(), "export");
    }

    #[test]
    fn test_append_assignment() {
        let decls = parse("CFLAGS+=\" -pipe\"\n");
        assert_eq!(decls, vec![Declaration::append("CFLAGS", " -pipe")]);
    }

    #[test]
    fn test_empty_value() {
        let decls = parse("EMPTY=\nALSO=\"\"\n");
        assert_eq!(decls[0].value, "");
        assert_eq!(decls[1].value, "");
    }

    #[test]
    fn test_crlf_line_endings() {
        let decls = parse("A=\"1\"\r\nB=\"2\"\r\n");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].value, "2");
    }

    #[test]
    fn test_declaration_order_preserved() {
        let decls = parse("USE=a\nUSE=\"-a b\"\n");
        assert_eq!(decls[0].value, "a");
        assert_eq!(decls[1].value, "-a b");
    }

    #[test]
    fn test_missing_equals_is_error() {
        let err = MakeConfParser::new().parse("A=1\nNOT AN ASSIGNMENT\n").unwrap_err();
        match err {
            ConfigError::ParseError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_name_is_error() {
        let err = MakeConfParser::new().parse("1ABC=x\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_unterminated_quote_reports_start_line() {
        let err = MakeConfParser::new().parse("A=1\nB=\"open\nstill open\n").unwrap_err();
        match err {
            ConfigError::ParseError { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("unterminated"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_garbage_is_error() {
        let err = MakeConfParser::new().parse("A=1 B=2\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_format_name() {
        assert_eq!(MakeConfParser::new().format_name(), "make.conf");
    }

    #[test]
    fn test_adapter_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "PORTDIR=\"/usr/portage\"\nUSE=\"a b\"").unwrap();

        let adapter = MakeConfFileAdapter::from_file(temp_file.path(), 2).unwrap();
        assert_eq!(adapter.priority(), 2);
        assert!(adapter.file_path().is_some());

        let decls = adapter.declarations().unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0], Declaration::assign("PORTDIR", "/usr/portage"));
    }

    #[test]
    fn test_adapter_reload() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();
        fs::write(&path, "ARCH=x86\n").unwrap();

        let mut adapter = MakeConfFileAdapter::from_file(&path, 2).unwrap();
        assert_eq!(adapter.declarations().unwrap()[0].value, "x86");

        fs::write(&path, "ARCH=amd64\n").unwrap();
        adapter.reload().unwrap();
        assert_eq!(adapter.declarations().unwrap()[0].value, "amd64");
    }

    #[test]
    fn test_adapter_nonexistent_file() {
        let result = MakeConfFileAdapter::from_file("/nonexistent/etc/portage/make.conf", 2);
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }

    #[test]
    fn test_adapter_parse_error_names_source() {
        let err = MakeConfFileAdapter::from_content("make.defaults", "oops\n", 1).unwrap_err();
        assert!(err.to_string().contains("make.defaults"));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_adapter_from_content() {
        let mut adapter = MakeConfFileAdapter::from_content("inline", "A=1\n", 0).unwrap();
        assert_eq!(adapter.name(), "inline");
        assert!(adapter.file_path().is_none());
        adapter.reload().unwrap();
        assert_eq!(adapter.declarations().unwrap().len(), 1);
    }
}
