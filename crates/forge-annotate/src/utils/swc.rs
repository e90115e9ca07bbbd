//! SWC/deno_ast TypeScript parsing utilities
//!
//! Thin layer over `deno_ast` that parses a TypeScript file and keeps the
//! source text next to the AST, so the lowering pass can copy untouched
//! statements out of the original text.

use crate::diagnostics::{AnnotateError, AnnotateResult};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ModuleSpecifier, ParseParams, ParsedSource, SourcePos, SourceRange};
use deno_ast::SourceTextInfo;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about the source file
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// The file path
    pub path: PathBuf,
    /// The source text
    pub text: Arc<str>,
    /// Source text info for location lookups
    pub text_info: SourceTextInfo,
}

impl SourceInfo {
    /// Create source info from a file path and content
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let text_info = SourceTextInfo::new(text.clone());
        Self {
            path: path.into(),
            text,
            text_info,
        }
    }

    /// Get the source text as a string slice
    pub fn source_text(&self) -> &str {
        &self.text
    }

    /// Position of the first byte of the file
    pub fn start_pos(&self) -> BytePos {
        self.text_info.range().start.as_byte_pos()
    }

    /// Position just past the last byte of the file
    pub fn end_pos(&self) -> BytePos {
        self.text_info.range().end.as_byte_pos()
    }

    /// Convert a byte position to a 1-indexed line and 0-indexed column
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        let line_and_col = self.text_info.line_and_column_index(source_pos);
        (line_and_col.line_index + 1, line_and_col.column_index)
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        self.text_between(span.lo, span.hi)
    }

    /// Extract source text between two positions; empty when `hi <= lo`
    pub fn text_between(&self, lo: BytePos, hi: BytePos) -> &str {
        if hi <= lo {
            return "";
        }
        let range = SourceRange::new(
            SourcePos::unsafely_from_byte_pos(lo),
            SourcePos::unsafely_from_byte_pos(hi),
        );
        self.text_info.range_text(&range)
    }
}

/// A parsed TypeScript module with source information
#[derive(Debug)]
pub struct ParsedModule {
    /// The parsed source from deno_ast
    pub source: ParsedSource,
    /// Source information for location lookups
    pub source_info: SourceInfo,
}

impl ParsedModule {
    /// Get the module AST
    ///
    /// Always present for sources parsed with [`parse_typescript_source`].
    pub fn module(&self) -> Option<&swc_ast::Module> {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => Some(m),
            deno_ast::ProgramRef::Script(_) => None,
        }
    }

    /// Get the source text
    pub fn source_text(&self) -> &str {
        self.source_info.source_text()
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.source_info.path
    }

    /// Extract source text for a span
    pub fn text_for_span(&self, span: Span) -> &str {
        self.source_info.text_for_span(span)
    }

    /// Extract source text between two positions
    pub fn text_between(&self, lo: BytePos, hi: BytePos) -> &str {
        self.source_info.text_between(lo, hi)
    }

    /// Line and column of a position
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        self.source_info.line_col(pos)
    }
}

/// Parse a TypeScript file from disk
pub fn parse_typescript_file(path: impl AsRef<Path>) -> AnnotateResult<ParsedModule> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        AnnotateError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;

    parse_typescript_source(path, text, MediaType::TypeScript)
}

/// Parse TypeScript source code from a string
///
/// The media type comes from the path extension; `fallback` is used when the
/// extension is not recognised (`<stdin>`, extension-less names).
pub fn parse_typescript_source(
    path: impl AsRef<Path>,
    source: impl Into<Arc<str>>,
    fallback: MediaType,
) -> AnnotateResult<ParsedModule> {
    let path = path.as_ref();
    let source: Arc<str> = source.into();

    let media_type = match MediaType::from_path(path) {
        MediaType::Unknown => fallback,
        known => known,
    };

    let parsed = deno_ast::parse_module(ParseParams {
        specifier: file_specifier(path)?,
        text: source.clone(),
        media_type,
        capture_tokens: true,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| AnnotateError::parse(format!("{}: {}", path.display(), e)))?;

    let source_info = SourceInfo::new(path, source);

    Ok(ParsedModule {
        source: parsed,
        source_info,
    })
}

/// Build a `file://` specifier for a path
///
/// Relative paths are keyed by their file name, which is all deno_ast uses
/// them for.
pub fn file_specifier(path: &Path) -> AnnotateResult<ModuleSpecifier> {
    if path.is_absolute() {
        if let Ok(specifier) = ModuleSpecifier::from_file_path(path) {
            return Ok(specifier);
        }
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AnnotateError::InvalidPath(path.display().to_string()))?;

    ModuleSpecifier::parse(&format!("file:///{}", name))
        .map_err(|_| AnnotateError::InvalidPath(path.display().to_string()))
}

/// Helper to convert Wtf8Atom to String
pub fn wtf8_to_string(s: &swc_ast::Str) -> String {
    String::from_utf8_lossy(s.value.as_bytes()).into_owned()
}

/// Get the name from a non-computed property key expression
pub fn expr_to_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => Some(wtf8_to_string(s)),
        swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(n.value.to_string()),
        swc_ast::Expr::Member(m) => {
            let obj = expr_to_name(&m.obj)?;
            let prop = match &m.prop {
                swc_ast::MemberProp::Ident(i) => i.sym.to_string(),
                _ => return None,
            };
            Some(format!("{}.{}", obj, prop))
        }
        _ => None,
    }
}

/// Format a qualified type name (`Namespace.Type`)
pub fn format_qualified_name(name: &swc_ast::TsQualifiedName) -> String {
    let left = match &name.left {
        swc_ast::TsEntityName::Ident(i) => i.sym.to_string(),
        swc_ast::TsEntityName::TsQualifiedName(q) => format_qualified_name(q),
    };
    format!("{}.{}", left, name.right.sym)
}

/// Check whether a string is a JavaScript identifier name (`ID_Start` then
/// `ID_Continue` characters, plus `$` and `_`)
///
/// Reserved words pass: they are valid after a `.` in member access.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if swc_ast::Ident::is_valid_start(c) => {}
        _ => return false,
    }
    chars.all(swc_ast::Ident::is_valid_continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deno_ast::swc::common::Spanned;

    #[test]
    fn test_parse_typescript_source() {
        let source = "export function readTextFile(path: string): Promise<string> { return ''; }";
        let parsed = parse_typescript_source("/tmp/test.ts", source, MediaType::TypeScript).unwrap();
        assert!(!parsed.module().unwrap().body.is_empty());
        assert_eq!(parsed.path(), Path::new("/tmp/test.ts"));
    }

    #[test]
    fn test_relative_path_parses() {
        let parsed = parse_typescript_source("src/api.ts", "let x = 1;", MediaType::TypeScript);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_unknown_extension_uses_fallback() {
        let parsed = parse_typescript_source("<stdin>", "let x: number = 1;", MediaType::TypeScript);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_typescript_source("/tmp/bad.ts", "interface {", MediaType::TypeScript)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::TypeScriptParse(_)));
        assert!(err.to_string().contains("bad.ts"));
    }

    #[test]
    fn test_text_for_span() {
        let source = "let a = 1;\ninterface Foo { bar(): void; }\n";
        let parsed = parse_typescript_source("/tmp/test.ts", source, MediaType::TypeScript).unwrap();
        let module = parsed.module().unwrap();

        assert_eq!(parsed.text_for_span(module.body[0].span()), "let a = 1;");
        assert_eq!(
            parsed.text_for_span(module.body[1].span()),
            "interface Foo { bar(): void; }"
        );
        assert_eq!(parsed.line_col(module.body[1].span().lo), (2, 0));
    }

    #[test]
    fn test_text_between_whole_file() {
        let source = "// header\nlet a = 1;\n";
        let info = SourceInfo::new("/tmp/test.ts", source);
        assert_eq!(info.text_between(info.start_pos(), info.end_pos()), source);
        assert_eq!(info.text_between(info.end_pos(), info.start_pos()), "");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("__lookupGetter__"));
        assert!(is_identifier("$el"));
        assert!(!is_identifier("foo-bar"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier(""));
        assert!(is_identifier("ä"));
        assert!(is_identifier("größe"));
        assert!(is_identifier("delete"));
        assert!(!is_identifier("a b"));
    }
}
