//! Annotator configuration
//!
//! Read from `forge-annotate.toml`:
//!
//! ```toml
//! module_kind = "esm"   # or "cjs"
//! strip_types = true
//! media_type = "typescript"   # or "tsx"
//! ```
//!
//! Every key is optional.

use crate::diagnostics::{AnnotateError, AnnotateResult};
use deno_ast::MediaType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "forge-annotate.toml";

/// Module system the emitted JavaScript is treated as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// ES modules
    #[default]
    Esm,
    /// CommonJS
    Cjs,
}

impl ModuleKind {
    /// Name as written in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Esm => "esm",
            ModuleKind::Cjs => "cjs",
        }
    }

    /// The matching deno_ast module kind
    pub fn to_deno(self) -> deno_ast::ModuleKind {
        match self {
            ModuleKind::Esm => deno_ast::ModuleKind::Esm,
            ModuleKind::Cjs => deno_ast::ModuleKind::Cjs,
        }
    }
}

impl FromStr for ModuleKind {
    type Err = AnnotateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "esm" => Ok(ModuleKind::Esm),
            "cjs" => Ok(ModuleKind::Cjs),
            other => Err(AnnotateError::config(format!(
                "unknown module kind `{}` (expected esm or cjs)",
                other
            ))),
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntax assumed for inputs whose extension does not tell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// `.ts`
    #[default]
    Typescript,
    /// `.tsx`
    Tsx,
}

impl SourceKind {
    /// The matching deno_ast media type
    pub fn media_type(self) -> MediaType {
        match self {
            SourceKind::Typescript => MediaType::TypeScript,
            SourceKind::Tsx => MediaType::Tsx,
        }
    }
}

/// Annotator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct AnnotateConfig {
    /// Module system of the output
    pub module_kind: ModuleKind,

    /// Strip remaining TypeScript syntax from the output
    pub strip_types: bool,

    /// Syntax for inputs without a recognised extension
    pub media_type: SourceKind,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            module_kind: ModuleKind::Esm,
            strip_types: true,
            media_type: SourceKind::Typescript,
        }
    }
}

impl AnnotateConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the module kind
    pub fn with_module_kind(mut self, module_kind: ModuleKind) -> Self {
        self.module_kind = module_kind;
        self
    }

    /// Enable or disable type stripping
    pub fn with_strip_types(mut self, strip_types: bool) -> Self {
        self.strip_types = strip_types;
        self
    }

    /// Set the fallback source syntax
    pub fn with_media_type(mut self, media_type: SourceKind) -> Self {
        self.media_type = media_type;
        self
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> AnnotateResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> AnnotateResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnnotateError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| AnnotateError::config(format!("{}: {}", path.display(), e)))
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> AnnotateResult<String> {
        toml::to_string(self).map_err(|e| AnnotateError::config(e.to_string()))
    }
}
