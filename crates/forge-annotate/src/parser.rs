//! TypeScript front end
//!
//! Lowers SWC's module AST into the annotator's [`SourceFile`] tree:
//!
//! - interfaces, classes, functions and block namespaces become structured
//!   nodes
//! - statements whose bodies declare interfaces or classes (function bodies,
//!   blocks, `declare module "m"` and `declare global` bodies) become
//!   [`Node::Scope`], with those bodies lowered recursively
//! - every other statement is copied out of the source as [`Node::Verbatim`]
//! - comments and blank space between statements are kept as verbatim text
//!
//! Lowering never fails once parsing succeeded. Declarations that cannot be
//! represented (computed method keys, decorated exports) are reported as
//! diagnostics and left out or passed through verbatim.

use crate::diagnostics::{AnnotateResult, Diagnostic, DiagnosticsCollector};
use crate::node::{
    ClassDecl, ConstructSignature, ExportDecl, FunctionDecl, HeritageClause, HeritageType,
    InterfaceDecl, MethodSignature, NamespaceDecl, Node, ParamName, Parameter, Scope, ScopePart,
    SourceFile,
};
use crate::types::{Keyword, TypeName, TypeNode, TypeParam};
use crate::utils::swc::{
    expr_to_name, format_qualified_name, is_identifier, parse_typescript_source, ParsedModule,
};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{BytePos, Span, Spanned};
use deno_ast::swc::ecma_visit::{Visit, VisitWith};
use deno_ast::MediaType;
use std::path::Path;
use tracing::{debug, warn};

/// A lowered file together with the diagnostics raised while lowering it
#[derive(Debug)]
pub struct Lowered {
    /// The lowered tree
    pub file: SourceFile,
    /// Non-fatal lowering notes
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse TypeScript source and lower it into a tree
pub fn parse_source_file(
    path: impl AsRef<Path>,
    source: &str,
    fallback: MediaType,
) -> AnnotateResult<Lowered> {
    let parsed = parse_typescript_source(path, source, fallback)?;
    Ok(lower_module_with_diagnostics(&parsed))
}

/// Lower a parsed module into a tree, dropping diagnostics
pub fn lower_module(parsed: &ParsedModule) -> SourceFile {
    lower_module_with_diagnostics(parsed).file
}

/// Lower a parsed module into a tree
pub fn lower_module_with_diagnostics(parsed: &ParsedModule) -> Lowered {
    let mut lowering = Lowering::new(parsed);
    let statements = match parsed.module() {
        Some(module) => lowering.lower_items(
            &module.body,
            parsed.source_info.start_pos(),
            parsed.source_info.end_pos(),
        ),
        None => vec![Node::verbatim(parsed.source_text())],
    };

    let file = SourceFile::new(parsed.path().display().to_string(), statements);
    debug!(
        file = %file.file_name,
        statements = file.statements.len(),
        diagnostics = lowering.diagnostics.diagnostics().len(),
        "lowered module"
    );

    Lowered {
        file,
        diagnostics: lowering.diagnostics.into_vec(),
    }
}

struct Lowering<'a> {
    parsed: &'a ParsedModule,
    diagnostics: DiagnosticsCollector,
}

impl<'a> Lowering<'a> {
    fn new(parsed: &'a ParsedModule) -> Self {
        Self {
            parsed,
            diagnostics: DiagnosticsCollector::new(),
        }
    }

    fn text(&self, span: Span) -> &'a str {
        self.parsed.text_for_span(span)
    }

    fn warn_at(&mut self, pos: BytePos, message: String) {
        let (line, col) = self.parsed.line_col(pos);
        warn!(file = %self.parsed.path().display(), line, col, "{}", message);
        self.diagnostics.add(
            Diagnostic::warning(message)
                .in_file(self.parsed.path())
                .at(line, col),
        );
    }

    /// Lower a statement list spanning `start..end`, keeping the text between
    /// statements (comments) as verbatim nodes
    fn lower_items(
        &mut self,
        items: &[swc_ast::ModuleItem],
        start: BytePos,
        end: BytePos,
    ) -> Vec<Node> {
        self.lower_list(items, start, end, Self::lower_item)
    }

    fn lower_list<T: Spanned>(
        &mut self,
        items: &[T],
        start: BytePos,
        end: BytePos,
        mut lower: impl FnMut(&mut Self, &T) -> Node,
    ) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(items.len());
        let mut cursor = start;

        for item in items {
            let span = item.span();
            self.push_gap(&mut nodes, cursor, span.lo);
            nodes.push(lower(self, item));
            cursor = span.hi;
        }
        self.push_gap(&mut nodes, cursor, end);

        nodes
    }

    /// Lower `span` as a [`Scope`] when it holds statement lists declaring
    /// interfaces or classes; `None` when it holds none
    fn lower_scope<N>(&mut self, node: &N, span: Span) -> Option<Node>
    where
        N: VisitWith<BodyFinder>,
    {
        let bodies = nested_bodies(node);
        if bodies.is_empty() {
            return None;
        }

        let mut parts = Vec::with_capacity(bodies.len() * 2 + 1);
        let mut cursor = span.lo;
        for body in &bodies {
            let body_span = body.span();
            let open = BytePos(body_span.lo.0 + 1);
            let close = BytePos(body_span.hi.0.saturating_sub(1));

            parts.push(ScopePart::text(self.parsed.text_between(cursor, open)));
            let statements = match body {
                NestedBody::Block(block) => {
                    self.lower_list(&block.stmts, open, close, Self::lower_stmt)
                }
                NestedBody::Module(block) => self.lower_items(&block.body, open, close),
            };
            parts.push(ScopePart::body(statements));
            cursor = close;
        }
        parts.push(ScopePart::text(self.parsed.text_between(cursor, span.hi)));

        Some(Node::Scope(Scope { parts }))
    }

    /// [`Self::lower_scope`], falling back to the verbatim text
    fn scope_or_verbatim<N>(&mut self, node: &N, span: Span) -> Node
    where
        N: VisitWith<BodyFinder>,
    {
        self.lower_scope(node, span)
            .unwrap_or_else(|| Node::verbatim(self.text(span)))
    }

    fn push_gap(&self, nodes: &mut Vec<Node>, lo: BytePos, hi: BytePos) {
        let gap = self.parsed.text_between(lo, hi).trim();
        if !gap.is_empty() {
            nodes.push(Node::verbatim(gap));
        }
    }

    fn lower_item(&mut self, item: &swc_ast::ModuleItem) -> Node {
        match item {
            swc_ast::ModuleItem::ModuleDecl(decl) => self.lower_module_decl(decl),
            swc_ast::ModuleItem::Stmt(stmt) => self.lower_stmt(stmt),
        }
    }

    fn lower_stmt(&mut self, stmt: &swc_ast::Stmt) -> Node {
        let span = stmt.span();
        if let swc_ast::Stmt::Decl(decl) = stmt {
            let source = self.text(span);
            if let Some(node) = self.lower_decl(decl, source) {
                return node;
            }
        }
        self.scope_or_verbatim(stmt, span)
    }

    /// Lower a declaration whose own text (without `export`) is `source`
    fn lower_decl(&mut self, decl: &swc_ast::Decl, source: &str) -> Option<Node> {
        match decl {
            swc_ast::Decl::TsInterface(iface) => {
                Some(Node::InterfaceDecl(self.lower_interface(iface)))
            }
            swc_ast::Decl::Class(class_decl) => Some(Node::ClassDecl(self.lower_class(
                Some(class_decl.ident.sym.to_string()),
                &class_decl.class,
                source,
            ))),
            swc_ast::Decl::Fn(fn_decl) => {
                if let Some(scope) = self.lower_scope(decl, decl.span()) {
                    return Some(scope);
                }
                Some(Node::FunctionDecl(FunctionDecl {
                    name: fn_decl.ident.sym.to_string(),
                    params: self.lower_params(&fn_decl.function.params),
                    return_type: fn_decl
                        .function
                        .return_type
                        .as_ref()
                        .map(|t| self.lower_type(&t.type_ann)),
                    source: Some(source.to_string()),
                }))
            }
            swc_ast::Decl::TsModule(module) => self.lower_namespace(module).map(Node::Namespace),
            swc_ast::Decl::Var(_)
            | swc_ast::Decl::TsTypeAlias(_)
            | swc_ast::Decl::TsEnum(_)
            | swc_ast::Decl::Using(_) => None,
        }
    }

    fn lower_module_decl(&mut self, decl: &swc_ast::ModuleDecl) -> Node {
        let source = self.text(decl.span());
        match decl {
            swc_ast::ModuleDecl::ExportDecl(export) => {
                let Some(inner) = self.strip_export(source, false, export.span.lo) else {
                    return Node::verbatim(source);
                };
                match self.lower_decl(&export.decl, inner) {
                    Some(node) => Node::Export(ExportDecl::new(node)),
                    None => self.scope_or_verbatim(decl, decl.span()),
                }
            }
            swc_ast::ModuleDecl::ExportDefaultDecl(export) => {
                let Some(inner) = self.strip_export(source, true, export.span.lo) else {
                    return Node::verbatim(source);
                };
                let node = match &export.decl {
                    swc_ast::DefaultDecl::Class(class_expr) => Node::ClassDecl(self.lower_class(
                        class_expr.ident.as_ref().map(|i| i.sym.to_string()),
                        &class_expr.class,
                        inner,
                    )),
                    swc_ast::DefaultDecl::TsInterfaceDecl(iface) => {
                        Node::InterfaceDecl(self.lower_interface(iface))
                    }
                    swc_ast::DefaultDecl::Fn(_) => {
                        return self.scope_or_verbatim(decl, decl.span());
                    }
                };
                Node::Export(ExportDecl {
                    is_default: true,
                    decl: Box::new(node),
                })
            }
            _ => self.scope_or_verbatim(decl, decl.span()),
        }
    }

    /// Strip the leading `export` (and `default`) keyword from an export's
    /// text
    ///
    /// Returns `None` when the text does not start with the keyword, which
    /// happens for decorators written before `export`.
    fn strip_export<'s>(&mut self, source: &'s str, is_default: bool, pos: BytePos) -> Option<&'s str> {
        let rest = source.strip_prefix("export").map(str::trim_start);
        let rest = match (rest, is_default) {
            (Some(rest), true) => rest.strip_prefix("default").map(str::trim_start),
            (rest, false) => rest,
            (None, true) => None,
        };
        if rest.is_none() {
            self.warn_at(
                pos,
                "export is preceded by decorators; kept without annotation".to_string(),
            );
        }
        rest
    }

    fn lower_interface(&mut self, iface: &swc_ast::TsInterfaceDecl) -> InterfaceDecl {
        let name = iface.id.sym.to_string();
        let mut members = Vec::with_capacity(iface.body.body.len());

        for member in &iface.body.body {
            match member {
                swc_ast::TsTypeElement::TsMethodSignature(method) => {
                    if let Some(method) = self.lower_method_signature(&name, method) {
                        members.push(Node::MethodSignature(method));
                    }
                }
                swc_ast::TsTypeElement::TsConstructSignatureDecl(ctor) => {
                    members.push(Node::ConstructSignature(ConstructSignature {
                        params: self.lower_fn_params(&ctor.params),
                        return_type: ctor
                            .type_ann
                            .as_ref()
                            .map(|t| self.lower_type(&t.type_ann)),
                    }));
                }
                other => members.push(Node::verbatim(self.text(other.span()))),
            }
        }

        InterfaceDecl {
            name,
            type_params: self.lower_type_params(iface.type_params.as_deref()),
            members,
        }
    }

    fn lower_method_signature(
        &mut self,
        owner: &str,
        method: &swc_ast::TsMethodSignature,
    ) -> Option<MethodSignature> {
        let name = if method.computed {
            None
        } else {
            expr_to_name(&method.key).filter(|name| is_identifier(name))
        };

        let Some(name) = name else {
            let key = self.text(method.key.span()).to_string();
            self.warn_at(
                method.span.lo,
                format!("method `{}` of interface `{}` has no plain name; skipped", key, owner),
            );
            return None;
        };

        Some(MethodSignature {
            name,
            params: self.lower_fn_params(&method.params),
            return_type: method
                .type_ann
                .as_ref()
                .map(|t| self.lower_type(&t.type_ann)),
            optional: method.optional,
        })
    }

    fn lower_class(
        &mut self,
        name: Option<String>,
        class: &swc_ast::Class,
        source: &str,
    ) -> ClassDecl {
        let mut heritage = Vec::new();

        if let Some(super_class) = &class.super_class {
            let mut base = HeritageType {
                expression: simple_ident(super_class),
                type_args: vec![],
            };
            if let Some(args) = &class.super_type_params {
                base.type_args = args.params.iter().map(|t| self.lower_type(t)).collect();
            }
            heritage.push(HeritageClause::extends(vec![base]));
        }

        if !class.implements.is_empty() {
            let types = class
                .implements
                .iter()
                .map(|imp| HeritageType {
                    expression: simple_ident(&imp.expr),
                    type_args: imp
                        .type_args
                        .as_ref()
                        .map(|args| args.params.iter().map(|t| self.lower_type(t)).collect())
                        .unwrap_or_default(),
                })
                .collect();
            heritage.push(HeritageClause::implements(types));
        }

        ClassDecl {
            name,
            type_params: self.lower_type_params(class.type_params.as_deref()),
            is_abstract: class.is_abstract,
            heritage,
            source: Some(source.to_string()),
        }
    }

    fn lower_namespace(&mut self, module: &swc_ast::TsModuleDecl) -> Option<NamespaceDecl> {
        if module.global {
            return None;
        }
        let swc_ast::TsModuleName::Ident(id) = &module.id else {
            return None;
        };

        let mut name = id.sym.to_string();
        let mut body = module.body.as_ref()?;

        // `namespace a.b.c { }` nests one TsNamespaceDecl per segment
        let block = loop {
            match body {
                swc_ast::TsNamespaceBody::TsModuleBlock(block) => break block,
                swc_ast::TsNamespaceBody::TsNamespaceDecl(inner) => {
                    name.push('.');
                    name.push_str(&inner.id.sym);
                    body = &*inner.body;
                }
            }
        };

        let start = BytePos(block.span.lo.0 + 1);
        let end = BytePos(block.span.hi.0.saturating_sub(1));
        Some(NamespaceDecl {
            name,
            declare: module.declare,
            body: self.lower_items(&block.body, start, end),
        })
    }

    fn lower_type_params(&mut self, params: Option<&swc_ast::TsTypeParamDecl>) -> Vec<TypeParam> {
        params
            .map(|p| {
                p.params
                    .iter()
                    .map(|param| TypeParam {
                        name: param.name.sym.to_string(),
                        constraint: param.constraint.as_ref().map(|c| self.lower_type(c)),
                        default: param.default.as_ref().map(|d| self.lower_type(d)),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lower_params(&mut self, params: &[swc_ast::Param]) -> Vec<Parameter> {
        params.iter().map(|p| self.lower_pat(&p.pat)).collect()
    }

    fn lower_fn_params(&mut self, params: &[swc_ast::TsFnParam]) -> Vec<Parameter> {
        params.iter().map(|p| self.lower_fn_param(p)).collect()
    }

    fn lower_pat(&mut self, pat: &swc_ast::Pat) -> Parameter {
        match pat {
            swc_ast::Pat::Ident(i) => Parameter {
                name: ParamName::Ident(i.sym.to_string()),
                type_ann: i.type_ann.as_ref().map(|t| self.lower_type(&t.type_ann)),
                optional: i.optional,
                rest: false,
            },
            swc_ast::Pat::Rest(r) => {
                let mut param = self.lower_pat(&r.arg);
                if param.type_ann.is_none() {
                    param.type_ann = r.type_ann.as_ref().map(|t| self.lower_type(&t.type_ann));
                }
                param.rest = true;
                param
            }
            swc_ast::Pat::Assign(a) => {
                let mut param = self.lower_pat(&a.left);
                param.optional = true;
                param
            }
            swc_ast::Pat::Array(arr) => self.pattern_param(
                arr.span,
                arr.type_ann.as_deref().map(|t| &*t.type_ann),
                arr.optional,
            ),
            swc_ast::Pat::Object(obj) => self.pattern_param(
                obj.span,
                obj.type_ann.as_deref().map(|t| &*t.type_ann),
                obj.optional,
            ),
            swc_ast::Pat::Expr(_) | swc_ast::Pat::Invalid(_) => {
                self.pattern_param(pat.span(), None, false)
            }
        }
    }

    fn lower_fn_param(&mut self, param: &swc_ast::TsFnParam) -> Parameter {
        match param {
            swc_ast::TsFnParam::Ident(i) => Parameter {
                name: ParamName::Ident(i.sym.to_string()),
                type_ann: i.type_ann.as_ref().map(|t| self.lower_type(&t.type_ann)),
                optional: i.optional,
                rest: false,
            },
            swc_ast::TsFnParam::Array(arr) => self.pattern_param(
                arr.span,
                arr.type_ann.as_deref().map(|t| &*t.type_ann),
                arr.optional,
            ),
            swc_ast::TsFnParam::Object(obj) => self.pattern_param(
                obj.span,
                obj.type_ann.as_deref().map(|t| &*t.type_ann),
                obj.optional,
            ),
            swc_ast::TsFnParam::Rest(r) => {
                let mut param = self.lower_pat(&r.arg);
                if param.type_ann.is_none() {
                    param.type_ann = r.type_ann.as_ref().map(|t| self.lower_type(&t.type_ann));
                }
                param.rest = true;
                param
            }
        }
    }

    fn pattern_param(
        &mut self,
        span: Span,
        type_ann: Option<&swc_ast::TsType>,
        optional: bool,
    ) -> Parameter {
        Parameter {
            name: ParamName::Pattern(self.text(span).to_string()),
            type_ann: type_ann.map(|t| self.lower_type(t)),
            optional,
            rest: false,
        }
    }

    fn lower_type(&mut self, ty: &swc_ast::TsType) -> TypeNode {
        match ty {
            swc_ast::TsType::TsKeywordType(kw) => match lower_keyword(kw.kind) {
                Some(keyword) => TypeNode::keyword(keyword),
                None => TypeNode::other(self.text(kw.span)),
            },
            swc_ast::TsType::TsTypeRef(ref_type) => {
                let name = match &ref_type.type_name {
                    swc_ast::TsEntityName::Ident(i) => TypeName::Ident(i.sym.to_string()),
                    swc_ast::TsEntityName::TsQualifiedName(q) => {
                        TypeName::Qualified(format_qualified_name(q))
                    }
                };
                let type_args = ref_type
                    .type_params
                    .as_ref()
                    .map(|params| params.params.iter().map(|p| self.lower_type(p)).collect())
                    .unwrap_or_default();
                TypeNode::TypeRef { name, type_args }
            }
            swc_ast::TsType::TsUnionOrIntersectionType(union_inter) => match union_inter {
                swc_ast::TsUnionOrIntersectionType::TsUnionType(u) => {
                    TypeNode::union(u.types.iter().map(|t| self.lower_type(t)).collect())
                }
                swc_ast::TsUnionOrIntersectionType::TsIntersectionType(i) => {
                    TypeNode::intersection(i.types.iter().map(|t| self.lower_type(t)).collect())
                }
            },
            swc_ast::TsType::TsFnOrConstructorType(swc_ast::TsFnOrConstructorType::TsFnType(_)) => {
                TypeNode::Function
            }
            swc_ast::TsType::TsParenthesizedType(paren) => self.lower_type(&paren.type_ann),
            other => TypeNode::other(self.text(other.span())),
        }
    }
}

/// A braced statement list found inside a statement
enum NestedBody {
    Block(swc_ast::BlockStmt),
    Module(swc_ast::TsModuleBlock),
}

impl NestedBody {
    fn span(&self) -> Span {
        match self {
            NestedBody::Block(block) => block.span,
            NestedBody::Module(block) => block.span,
        }
    }
}

/// Collects the outermost statement lists that declare interfaces or
/// classes somewhere inside them
#[derive(Default)]
struct BodyFinder {
    bodies: Vec<NestedBody>,
}

impl Visit for BodyFinder {
    fn visit_block_stmt(&mut self, block: &swc_ast::BlockStmt) {
        if declares_types(block) {
            self.bodies.push(NestedBody::Block(block.clone()));
        }
    }

    fn visit_ts_module_block(&mut self, block: &swc_ast::TsModuleBlock) {
        if declares_types(block) {
            self.bodies.push(NestedBody::Module(block.clone()));
        }
    }
}

#[derive(Default)]
struct TypeDeclFinder {
    found: bool,
}

impl Visit for TypeDeclFinder {
    fn visit_class_decl(&mut self, _: &swc_ast::ClassDecl) {
        self.found = true;
    }

    fn visit_ts_interface_decl(&mut self, _: &swc_ast::TsInterfaceDecl) {
        self.found = true;
    }
}

fn declares_types<N: VisitWith<TypeDeclFinder>>(node: &N) -> bool {
    let mut finder = TypeDeclFinder::default();
    node.visit_with(&mut finder);
    finder.found
}

fn nested_bodies<N: VisitWith<BodyFinder>>(node: &N) -> Vec<NestedBody> {
    let mut finder = BodyFinder::default();
    node.visit_with(&mut finder);
    finder.bodies.sort_by_key(|body| body.span().lo);
    finder.bodies
}

/// Heritage expressions only name a base when they are a bare identifier
fn simple_ident(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        _ => None,
    }
}

fn lower_keyword(kind: swc_ast::TsKeywordTypeKind) -> Option<Keyword> {
    use swc_ast::TsKeywordTypeKind as Kind;

    Some(match kind {
        Kind::TsUndefinedKeyword => Keyword::Undefined,
        Kind::TsNullKeyword => Keyword::Null,
        Kind::TsBooleanKeyword => Keyword::Boolean,
        Kind::TsNumberKeyword => Keyword::Number,
        Kind::TsStringKeyword => Keyword::String,
        Kind::TsVoidKeyword => Keyword::Void,
        Kind::TsAnyKeyword => Keyword::Any,
        Kind::TsUnknownKeyword => Keyword::Unknown,
        Kind::TsNeverKeyword => Keyword::Never,
        Kind::TsObjectKeyword => Keyword::Object,
        Kind::TsSymbolKeyword => Keyword::Symbol,
        Kind::TsBigIntKeyword => Keyword::BigInt,
        Kind::TsIntrinsicKeyword => return None,
    })
}
