//! Transformer registration
//!
//! A [`Transformer`] runs once per parsed file, before printing. The
//! pipeline always runs [`JsDocTransformer`] first and then any transformers
//! registered through [`Transformers`].

use crate::node::SourceFile;
use crate::visitor::{RewriteStats, Rewriter};
use std::fmt;

/// Per-run state shared by the transformers of one file
#[derive(Debug, Clone, Default)]
pub struct TransformContext {
    /// File being transformed
    pub file_name: String,
    /// Counters accumulated by the transformers
    pub stats: RewriteStats,
}

impl TransformContext {
    /// Create a context for a file
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            stats: RewriteStats::default(),
        }
    }
}

/// A tree-to-tree pass run before printing
pub trait Transformer {
    /// Name used in log output
    fn name(&self) -> &str;

    /// Transform a whole file
    fn transform(&self, ctx: &mut TransformContext, file: SourceFile) -> SourceFile;
}

/// Rewrites interfaces and classes into JSDoc-annotated declarations
#[derive(Debug, Clone, Copy, Default)]
pub struct JsDocTransformer;

impl Transformer for JsDocTransformer {
    fn name(&self) -> &str {
        "jsdoc"
    }

    fn transform(&self, ctx: &mut TransformContext, file: SourceFile) -> SourceFile {
        let mut rewriter = Rewriter::new();
        let file = rewriter.rewrite_source_file(file);
        ctx.stats.merge(rewriter.stats());
        file
    }
}

/// Transformers run before printing, in registration order
#[derive(Default)]
pub struct Transformers {
    /// Before-print transformers
    pub before: Vec<Box<dyn Transformer>>,
}

impl Transformers {
    /// The default set: just [`JsDocTransformer`]
    pub fn new() -> Self {
        Self {
            before: vec![Box::new(JsDocTransformer)],
        }
    }

    /// Register a transformer after the existing ones
    pub fn with_before(mut self, transformer: impl Transformer + 'static) -> Self {
        self.before.push(Box::new(transformer));
        self
    }

    /// Run every transformer in order
    pub fn run(&self, ctx: &mut TransformContext, mut file: SourceFile) -> SourceFile {
        for transformer in &self.before {
            tracing::trace!(transformer = transformer.name(), file = %ctx.file_name, "running transformer");
            file = transformer.transform(ctx, file);
        }
        file
    }
}

impl fmt::Debug for Transformers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.before.iter().map(|t| t.name()).collect();
        f.debug_struct("Transformers").field("before", &names).finish()
    }
}
