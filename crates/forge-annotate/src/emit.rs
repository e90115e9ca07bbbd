//! Type stripping
//!
//! The printed tree still carries TypeScript syntax inside verbatim text
//! (class member types, `implements` clauses, type aliases). This module runs
//! it through deno_ast's transpiler so the result is plain JavaScript with
//! the JSDoc blocks intact.

use crate::config::AnnotateConfig;
use crate::diagnostics::{AnnotateError, AnnotateResult};
use crate::utils::swc::file_specifier;
use deno_ast::{
    EmitOptions, MediaType, ParseParams, SourceMapOption, TranspileModuleOptions,
    TranspileOptions,
};
use std::path::Path;

/// Strip TypeScript syntax from printed output
///
/// `file_name` labels errors; its extension picks TS or TSX parsing, with
/// `config.media_type` as the fallback.
pub fn strip_types(text: &str, file_name: &str, config: &AnnotateConfig) -> AnnotateResult<String> {
    let media_type = match MediaType::from_path(Path::new(file_name)) {
        MediaType::Tsx => MediaType::Tsx,
        MediaType::TypeScript => MediaType::TypeScript,
        _ => config.media_type.media_type(),
    };

    let parsed = deno_ast::parse_module(ParseParams {
        specifier: file_specifier(Path::new(file_name))?,
        text: text.into(),
        media_type,
        capture_tokens: false,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| AnnotateError::transpile(file_name, e.to_string()))?;

    let transpiled = parsed
        .transpile(
            &TranspileOptions::default(),
            &TranspileModuleOptions {
                module_kind: Some(config.module_kind.to_deno()),
            },
            &EmitOptions {
                source_map: SourceMapOption::None,
                ..Default::default()
            },
        )
        .map_err(|e| AnnotateError::transpile(file_name, e.to_string()))?;

    tracing::trace!(file = file_name, module_kind = %config.module_kind, "stripped types");
    Ok(transpiled.into_source().text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_class_member_types() {
        let text = "/**\n * @constructor\n */\nclass Widget implements Api {\n  size: number = 1;\n  draw(x: string): void {}\n}\n";
        let js = strip_types(text, "widget.ts", &AnnotateConfig::new()).unwrap();

        assert!(js.contains("@constructor"));
        assert!(js.contains("class Widget"));
        assert!(!js.contains("implements"));
        assert!(!js.contains(": number"));
        assert!(!js.contains(": string"));
    }

    #[test]
    fn test_type_aliases_are_removed() {
        let text = "type Getter = () => any;\n/**\n * @record\n */\nfunction Foo() {}\n";
        let js = strip_types(text, "foo.ts", &AnnotateConfig::new()).unwrap();

        assert!(!js.contains("type Getter"));
        assert!(js.contains("@record"));
        assert!(js.contains("function Foo()"));
    }

    #[test]
    fn test_no_inline_source_map() {
        let js = strip_types("let x: number = 1;\n", "x.ts", &AnnotateConfig::new()).unwrap();
        assert!(!js.contains("sourceMappingURL"));
    }

    #[test]
    fn test_invalid_text_is_a_transpile_error() {
        let err = strip_types("function (", "bad.ts", &AnnotateConfig::new()).unwrap_err();
        assert!(matches!(err, AnnotateError::Transpile { .. }));
        assert!(err.to_string().contains("bad.ts"));
    }
}
