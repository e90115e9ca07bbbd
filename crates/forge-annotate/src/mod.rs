//! forge-annotate: Closure-style JSDoc annotation of TypeScript declarations
//!
//! This crate rewrites a TypeScript file so its interfaces and classes carry
//! type information as JSDoc block comments:
//! - Interfaces become a `@record` constructor stand-in plus one documented
//!   `Owner.prototype.method = function (..) {}` stand-in per method
//! - Classes are kept and documented with `@constructor`, `@template`,
//!   `@abstract`, `@extends` and `@implements`
//! - Everything else passes through unchanged
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ .ts / .tsx text │
//! │ (SWC parse)     │
//! └────────┬────────┘
//!          ▼
//!   ┌──────────────┐    ┌────────────────────────┐
//!   │  SourceFile  │───▶│ Transformers           │
//!   │  (Node tree) │    │ classify → js_doc →    │
//!   └──────────────┘    │ synth (visitor)        │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                           ┌──────────────┐
//!                           │   printer    │
//!                           └──────┬───────┘
//!                                  ▼
//!                           ┌──────────────┐
//!                           │ emit (strip  │
//!                           │ TS syntax)   │
//!                           └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use forge_annotate::{AnnotateConfig, AnnotatePipeline};
//!
//! let output = AnnotatePipeline::new(AnnotateConfig::default())
//!     .run_source("api.ts", "interface Api { get(k: string): number; }")
//!     .unwrap();
//!
//! assert!(output.text.contains("@record"));
//! assert!(output.text.contains("@return {number}"));
//! assert_eq!(output.stats.methods, 1);
//! ```

// Tree
pub mod node;
pub mod types;

// Annotation engine
pub mod classify;
pub mod js_doc;
pub mod synth;
pub mod transform;
pub mod type_tag;
pub mod visitor;

// Parsing, printing and emit
pub mod diagnostics;
pub mod emit;
pub mod parser;
pub mod printer;
pub mod utils;

// Driver
pub mod config;
pub mod pipeline;

// Re-exports for convenience
pub use classify::{classify, Rule};
pub use config::{AnnotateConfig, ModuleKind, SourceKind, CONFIG_FILE_NAME};
pub use diagnostics::{AnnotateError, AnnotateResult, Diagnostic, DiagnosticSeverity};
pub use js_doc::{generate_js_doc, generate_js_doc_lines, DocTarget, JsDocBlock};
pub use node::{
    ClassDecl, ExportDecl, FunctionDecl, InterfaceDecl, MethodSignature, NamespaceDecl, Node,
    Parameter, SourceFile,
};
pub use parser::{parse_source_file, Lowered};
pub use pipeline::{annotate_str, AnnotateOutput, AnnotatePipeline, DEMO_FILE_NAME, DEMO_SOURCE};
pub use printer::{print_node, print_source_file};
pub use transform::{JsDocTransformer, TransformContext, Transformer, Transformers};
pub use type_tag::type_tag;
pub use types::{Keyword, TypeName, TypeNode, TypeParam};
pub use visitor::{rewrite, RewriteStats, Rewriter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
