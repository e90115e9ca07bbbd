//! Annotation pipeline
//!
//! Drives one file through every stage:
//!
//! ```text
//! source text -> parse + lower -> transformers -> print -> strip types -> output
//! ```

use crate::config::AnnotateConfig;
use crate::diagnostics::{AnnotateError, AnnotateResult, Diagnostic};
use crate::emit::strip_types;
use crate::node::SourceFile;
use crate::parser::parse_source_file;
use crate::printer::print_source_file;
use crate::transform::{TransformContext, Transformer, Transformers};
use crate::visitor::RewriteStats;
use std::path::Path;
use tracing::{debug, info};

/// File name used for [`DEMO_SOURCE`]
pub const DEMO_FILE_NAME: &str = "demo.ts";

/// Demonstration input: two function-type aliases and an interface whose
/// methods use them
pub const DEMO_SOURCE: &str = r#"
type Setter = (this: any, v: any) => void
type Getter = (this: any) => any

interface PrototypeObject {

  [key: string]: any,

  __lookupGetter__ (k: string): Getter;

  __lookupSetter__ (k: string): Setter;

  __defineGetter__ (k: string, getter: Getter): void;

  __defineSetter__ (k: string, setter: Setter): void;
}
"#;

/// Result of annotating one file
#[derive(Debug)]
pub struct AnnotateOutput {
    /// Output text (JavaScript unless type stripping is disabled)
    pub text: String,
    /// The rewritten tree
    pub tree: SourceFile,
    /// Rewrite counters
    pub stats: RewriteStats,
    /// Lowering diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs files through parse, transform, print and emit
#[derive(Debug)]
pub struct AnnotatePipeline {
    config: AnnotateConfig,
    transformers: Transformers,
}

impl Default for AnnotatePipeline {
    fn default() -> Self {
        Self::new(AnnotateConfig::default())
    }
}

impl AnnotatePipeline {
    /// Create a pipeline running the JSDoc transformer
    pub fn new(config: AnnotateConfig) -> Self {
        Self {
            config,
            transformers: Transformers::new(),
        }
    }

    /// Register a transformer to run after the JSDoc transformer
    pub fn transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers = self.transformers.with_before(transformer);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &AnnotateConfig {
        &self.config
    }

    /// Annotate source text; `path` names the file and selects TS or TSX
    pub fn run_source(&self, path: impl AsRef<Path>, text: &str) -> AnnotateResult<AnnotateOutput> {
        let path = path.as_ref();
        let file_name = path.display().to_string();

        let lowered = parse_source_file(path, text, self.config.media_type.media_type())?;

        let mut ctx = TransformContext::new(file_name.clone());
        let tree = self.transformers.run(&mut ctx, lowered.file);

        let printed = print_source_file(&tree);
        debug!(file = %file_name, bytes = printed.len(), "printed annotated source");

        let text = if self.config.strip_types {
            strip_types(&printed, &file_name, &self.config)?
        } else {
            printed
        };

        info!(
            file = %file_name,
            interfaces = ctx.stats.interfaces,
            classes = ctx.stats.classes,
            methods = ctx.stats.methods,
            "annotated"
        );

        Ok(AnnotateOutput {
            text,
            tree,
            stats: ctx.stats,
            diagnostics: lowered.diagnostics,
        })
    }

    /// Read and annotate a file
    pub fn run_file(&self, path: impl AsRef<Path>) -> AnnotateResult<AnnotateOutput> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnnotateError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;
        self.run_source(path, &text)
    }

    /// Annotate [`DEMO_SOURCE`]
    pub fn run_demo(&self) -> AnnotateResult<AnnotateOutput> {
        self.run_source(DEMO_FILE_NAME, DEMO_SOURCE)
    }
}

/// Annotate TypeScript text with the default configuration
///
/// ```
/// let js = forge_annotate::annotate_str("interface Foo { bar(x: number): string; }").unwrap();
/// assert!(js.contains("@record"));
/// assert!(js.contains("@param {number} x"));
/// ```
pub fn annotate_str(text: &str) -> AnnotateResult<String> {
    Ok(AnnotatePipeline::default().run_source("input.ts", text)?.text)
}
