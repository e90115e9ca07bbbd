//! Error types and diagnostics
//!
//! Errors abort a run (unreadable file, malformed TypeScript, failed
//! transpile). Diagnostics are non-fatal notes collected while lowering a
//! file, such as declarations the annotator had to leave out.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for forge-annotate operations
pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// Main error type for forge-annotate
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TypeScript parse error
    #[error("TypeScript parse error: {0}")]
    TypeScriptParse(String),

    /// Type stripping failed
    #[error("Transpile error in {file}: {message}")]
    Transpile { file: String, message: String },

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl AnnotateError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        AnnotateError::TypeScriptParse(message.into())
    }

    /// Create a transpile error
    pub fn transpile(file: impl Into<String>, message: impl Into<String>) -> Self {
        AnnotateError::Transpile {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        AnnotateError::Config(message.into())
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        AnnotateError::Other(message.into())
    }
}

impl From<toml::de::Error> for AnnotateError {
    fn from(err: toml::de::Error) -> Self {
        AnnotateError::Config(err.to_string())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Output is likely wrong
    Warning,
    /// Informational
    Info,
}

impl DiagnosticSeverity {
    /// Get display string
    pub fn display(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Message
    pub message: String,
    /// Source file
    pub file: Option<PathBuf>,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (0-indexed)
    pub col: Option<usize>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
            line: None,
            col: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    /// Create an info diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    /// Set the source file
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the location
    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.line = Some(line);
        self.col = Some(col);
        self
    }

    /// Format as `file:line:col: severity: message`
    pub fn format(&self) -> String {
        let mut result = String::new();

        if let Some(ref file) = self.file {
            result.push_str(&file.display().to_string());
            if let Some(line) = self.line {
                result.push(':');
                result.push_str(&line.to_string());
                if let Some(col) = self.col {
                    result.push(':');
                    result.push_str(&col.to_string());
                }
            }
            result.push_str(": ");
        }

        result.push_str(self.severity.display());
        result.push_str(": ");
        result.push_str(&self.message);
        result
    }
}

/// Collector for diagnostics raised while lowering a file
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get warning count
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Take the collected diagnostics
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_error() {
        let err = AnnotateError::transpile("test.ts", "unexpected token");
        assert!(err.to_string().contains("test.ts"));
        assert!(err.to_string().contains("unexpected token"));

        let err = AnnotateError::config("unknown module kind");
        assert_eq!(err.to_string(), "Configuration error: unknown module kind");
    }

    #[test]
    fn test_diagnostic_format() {
        let diag = Diagnostic::warning("computed method key skipped")
            .in_file("api.ts")
            .at(4, 2);
        assert_eq!(
            diag.format(),
            "api.ts:4:2: warning: computed method key skipped"
        );
        assert_eq!(Diagnostic::info("hello").format(), "info: hello");
    }

    #[test]
    fn test_diagnostics_collector() {
        let mut collector = DiagnosticsCollector::new();
        collector.add(Diagnostic::warning("w"));
        collector.add(Diagnostic::info("i"));
        assert_eq!(collector.warning_count(), 1);
        assert_eq!(collector.into_vec().len(), 2);
    }
}
