//! JSDoc synthesis
//!
//! This module builds the Closure-style annotation lines attached to
//! synthesized declarations. Lines are produced per category and always
//! emitted in the same order:
//!
//! 1. header tags supplied by the caller (`@record`, `@constructor`)
//! 2. `@template` for generic classes and interfaces
//! 3. `@abstract` for abstract classes
//! 4. `@implements` / `@extends` for class heritage clauses
//! 5. `@param` for signature and function parameters
//! 6. `@return` for method and construct signatures
//!
//! A category with nothing to say contributes no line; blank lines are never
//! emitted.

use crate::node::{
    ClassDecl, ConstructSignature, FunctionDecl, HeritageToken, HeritageType, InterfaceDecl,
    MethodSignature, Node, Parameter,
};
use crate::type_tag::{joined_type_tag, type_tag};
use crate::types::{TypeNode, TypeParam};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header tag for interface stand-ins
pub const RECORD_TAG: &str = "@record";

/// Header tag for classes
pub const CONSTRUCTOR_TAG: &str = "@constructor";

/// Tag for abstract classes
pub const ABSTRACT_TAG: &str = "@abstract";

/// An ordered block of JSDoc annotation lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsDocBlock {
    /// Annotation lines, without comment decoration
    pub lines: Vec<String>,
}

impl JsDocBlock {
    /// Create a block from lines
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Check whether the block has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the annotation lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render as a block comment, each line prefixed with `indent`
    ///
    /// ```
    /// use forge_annotate::js_doc::JsDocBlock;
    ///
    /// let block = JsDocBlock::new(vec!["@record".to_string()]);
    /// assert_eq!(block.render(""), "/**\n * @record\n */");
    /// ```
    pub fn render(&self, indent: &str) -> String {
        let mut out = format!("{indent}/**\n");
        for line in &self.lines {
            out.push_str(indent);
            out.push_str(" * ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(indent);
        out.push_str(" */");
        out
    }
}

impl fmt::Display for JsDocBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

/// A borrowed view of the node a block is generated for
///
/// Lets the synthesizer document interface members without wrapping them
/// back into a [`Node`].
#[derive(Debug, Clone, Copy)]
pub enum DocTarget<'a> {
    /// Interface declaration
    Interface(&'a InterfaceDecl),
    /// Class declaration
    Class(&'a ClassDecl),
    /// Interface method member
    Method(&'a MethodSignature),
    /// Interface construct member
    Construct(&'a ConstructSignature),
    /// Function declaration
    Function(&'a FunctionDecl),
    /// Any other node; contributes header tags only
    Other,
}

impl<'a> From<&'a Node> for DocTarget<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::InterfaceDecl(iface) => DocTarget::Interface(iface),
            Node::ClassDecl(class) => DocTarget::Class(class),
            Node::MethodSignature(method) => DocTarget::Method(method),
            Node::ConstructSignature(ctor) => DocTarget::Construct(ctor),
            Node::FunctionDecl(func) => DocTarget::Function(func),
            Node::SourceFile(_)
            | Node::Namespace(_)
            | Node::Export(_)
            | Node::VariableDecl(_)
            | Node::Annotated(_)
            | Node::Scope(_)
            | Node::Verbatim(_) => DocTarget::Other,
        }
    }
}

/// Generate the ordered annotation lines for a node
pub fn generate_js_doc_lines<'a>(
    target: impl Into<DocTarget<'a>>,
    headers: &[&str],
) -> Vec<String> {
    let target = target.into();

    let mut lines: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    lines.extend(template_tag(target));
    lines.extend(abstract_tag(target));
    lines.extend(heritage_tags(target));
    lines.extend(param_tags(target));
    lines.extend(return_tag(target));

    lines.retain(|line| !line.is_empty());
    lines
}

/// Generate a documentation block for a node
pub fn generate_js_doc<'a>(target: impl Into<DocTarget<'a>>, headers: &[&str]) -> JsDocBlock {
    JsDocBlock::new(generate_js_doc_lines(target, headers))
}

/// `@template T, U` for generic classes and interfaces
pub fn template_tag(target: DocTarget<'_>) -> Option<String> {
    let params: &[TypeParam] = match target {
        DocTarget::Interface(iface) => &iface.type_params,
        DocTarget::Class(class) => &class.type_params,
        _ => return None,
    };

    if params.is_empty() {
        return None;
    }

    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    Some(format!("@template {}", names.join(", ")))
}

/// `@abstract` for classes carrying the abstract modifier
pub fn abstract_tag(target: DocTarget<'_>) -> Option<String> {
    match target {
        DocTarget::Class(class) if class.is_abstract => Some(ABSTRACT_TAG.to_string()),
        _ => None,
    }
}

/// `@extends {Base}` / `@implements {I<T>}` lines for class heritage
///
/// One line per listed type, clause order then type order.
pub fn heritage_tags(target: DocTarget<'_>) -> Vec<String> {
    let DocTarget::Class(class) = target else {
        return vec![];
    };

    let mut lines = Vec::new();
    for clause in &class.heritage {
        let tag = match clause.token {
            HeritageToken::Implements => "@implements",
            HeritageToken::Extends => "@extends",
        };
        for ty in &clause.types {
            lines.push(format!("{} {{{}}}", tag, heritage_type_text(ty)));
        }
    }
    lines
}

/// Render a heritage entry as `Name<Arg>` or `Name`
///
/// Only a single type argument is rendered; with zero or several arguments
/// the bare name is used.
fn heritage_type_text(ty: &HeritageType) -> String {
    let name = ty.expression.as_deref().unwrap_or_default();
    match ty.type_args.as_slice() {
        [arg] => format!("{}<{}>", name, type_tag(arg)),
        _ => name.to_string(),
    }
}

/// `@param` lines for signature and function parameters
pub fn param_tags(target: DocTarget<'_>) -> Vec<String> {
    let params: &[Parameter] = match target {
        DocTarget::Method(method) => &method.params,
        DocTarget::Construct(ctor) => &ctor.params,
        DocTarget::Function(func) => &func.params,
        _ => return vec![],
    };

    params.iter().filter_map(param_line).collect()
}

fn param_line(param: &Parameter) -> Option<String> {
    let name = param.ident()?;
    Some(match &param.type_ann {
        Some(ty) => format!("@param {{{}}} {}", type_tag(ty), name),
        None => format!("@param {}", name),
    })
}

/// `@return` line for method and construct signatures
///
/// Unions join member tags with `|`, intersections with `&`. A `void` or
/// missing return type produces no line.
pub fn return_tag(target: DocTarget<'_>) -> Option<String> {
    let return_type = match target {
        DocTarget::Method(method) => method.return_type.as_ref(),
        DocTarget::Construct(ctor) => ctor.return_type.as_ref(),
        _ => None,
    }?;

    let tag = match return_type {
        TypeNode::Keyword { .. } if return_type.is_void() => return None,
        TypeNode::Union { types } => joined_type_tag(types, "|"),
        TypeNode::Intersection { types } => joined_type_tag(types, "&"),
        other => type_tag(other),
    };
    Some(format!("@return {{{}}}", tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{HeritageClause, HeritageType};
    use pretty_assertions::assert_eq;

    fn method_returning(ty: TypeNode) -> MethodSignature {
        MethodSignature::new("m").returning(ty)
    }

    #[test]
    fn test_render_block() {
        let block = JsDocBlock::new(vec!["@param {string} k".into(), "@return {Getter}".into()]);
        assert_eq!(
            block.render("  "),
            "  /**\n   * @param {string} k\n   * @return {Getter}\n   */"
        );
    }

    #[test]
    fn test_param_fidelity() {
        let method = MethodSignature::new("f")
            .with_param(Parameter::new("x", TypeNode::string()))
            .with_param(Parameter::untyped("y"));

        assert_eq!(
            generate_js_doc_lines(DocTarget::Method(&method), &[]),
            vec!["@param {string} x", "@param y"]
        );
    }

    #[test]
    fn test_param_with_unencoded_type_renders_empty_tag() {
        let method =
            MethodSignature::new("f").with_param(Parameter::new("xs", TypeNode::other("string[]")));
        assert_eq!(param_tags(DocTarget::Method(&method)), vec!["@param {} xs"]);
    }

    #[test]
    fn test_destructured_param_is_skipped() {
        let method = MethodSignature::new("f")
            .with_param(Parameter {
                name: crate::node::ParamName::Pattern("{ a }".into()),
                type_ann: Some(TypeNode::simple_ref("Opts")),
                optional: false,
                rest: false,
            })
            .with_param(Parameter::new("b", TypeNode::number()));
        assert_eq!(param_tags(DocTarget::Method(&method)), vec!["@param {number} b"]);
    }

    #[test]
    fn test_union_return() {
        let method = method_returning(TypeNode::union(vec![
            TypeNode::simple_ref("A"),
            TypeNode::simple_ref("B"),
            TypeNode::simple_ref("C"),
        ]));
        assert_eq!(
            return_tag(DocTarget::Method(&method)),
            Some("@return {A|B|C}".to_string())
        );
    }

    #[test]
    fn test_intersection_return() {
        let method = method_returning(TypeNode::intersection(vec![
            TypeNode::simple_ref("A"),
            TypeNode::simple_ref("B"),
        ]));
        assert_eq!(
            return_tag(DocTarget::Method(&method)),
            Some("@return {A&B}".to_string())
        );
    }

    #[test]
    fn test_plain_and_void_return() {
        let plain = method_returning(TypeNode::simple_ref("A"));
        assert_eq!(
            return_tag(DocTarget::Method(&plain)),
            Some("@return {A}".to_string())
        );

        let void = method_returning(TypeNode::void());
        assert_eq!(return_tag(DocTarget::Method(&void)), None);

        let missing = MethodSignature::new("m");
        assert_eq!(return_tag(DocTarget::Method(&missing)), None);
    }

    #[test]
    fn test_construct_signature_return() {
        let ctor = ConstructSignature {
            params: vec![Parameter::new("n", TypeNode::number())],
            return_type: Some(TypeNode::simple_ref("Point")),
        };
        assert_eq!(
            generate_js_doc_lines(DocTarget::Construct(&ctor), &[]),
            vec!["@param {number} n", "@return {Point}"]
        );
    }

    #[test]
    fn test_function_has_params_but_no_return() {
        let func = FunctionDecl {
            name: "f".into(),
            params: vec![Parameter::new("a", TypeNode::boolean())],
            return_type: Some(TypeNode::string()),
            source: None,
        };
        assert_eq!(
            generate_js_doc_lines(DocTarget::Function(&func), &[]),
            vec!["@param {boolean} a"]
        );
    }

    #[test]
    fn test_generics() {
        let class = ClassDecl::new("Box")
            .with_type_param(TypeParam::new("T"))
            .with_type_param(TypeParam::new("U"));
        assert_eq!(
            template_tag(DocTarget::Class(&class)),
            Some("@template T, U".to_string())
        );

        let iface = InterfaceDecl::new("Pair").with_type_param(TypeParam::new("K"));
        assert_eq!(
            generate_js_doc_lines(DocTarget::Interface(&iface), &[RECORD_TAG]),
            vec!["@record", "@template K"]
        );

        // Constraints stay out of the tag
        let bounded = InterfaceDecl::new("Keyed")
            .with_type_param(TypeParam::new("K").with_constraint(TypeNode::string()));
        assert_eq!(
            template_tag(DocTarget::Interface(&bounded)),
            Some("@template K".to_string())
        );
    }

    #[test]
    fn test_heritage_single_type_argument() {
        let class = ClassDecl::new("C").with_heritage(HeritageClause::implements(vec![
            HeritageType::named("I").with_type_arg(TypeNode::simple_ref("Foo")),
        ]));
        assert_eq!(heritage_tags(DocTarget::Class(&class)), vec!["@implements {I<Foo>}"]);
    }

    #[test]
    fn test_heritage_without_type_arguments() {
        let class = ClassDecl::new("D")
            .with_heritage(HeritageClause::extends(vec![HeritageType::named("Base")]));
        assert_eq!(heritage_tags(DocTarget::Class(&class)), vec!["@extends {Base}"]);
    }

    #[test]
    fn test_heritage_multiple_type_arguments_render_bare_name() {
        let class = ClassDecl::new("E").with_heritage(HeritageClause::implements(vec![
            HeritageType::named("Map")
                .with_type_arg(TypeNode::string())
                .with_type_arg(TypeNode::number()),
        ]));
        assert_eq!(heritage_tags(DocTarget::Class(&class)), vec!["@implements {Map}"]);
    }

    #[test]
    fn test_heritage_one_line_per_type() {
        let class = ClassDecl::new("F")
            .with_heritage(HeritageClause::extends(vec![HeritageType::named("Base")]))
            .with_heritage(HeritageClause::implements(vec![
                HeritageType::named("A"),
                HeritageType::named("B"),
            ]));
        assert_eq!(
            heritage_tags(DocTarget::Class(&class)),
            vec!["@extends {Base}", "@implements {A}", "@implements {B}"]
        );
    }

    #[test]
    fn test_full_category_order() {
        let class = ClassDecl::new("Repo")
            .with_type_param(TypeParam::new("T"))
            .as_abstract()
            .with_heritage(HeritageClause::extends(vec![HeritageType::named("Base")]))
            .with_heritage(HeritageClause::implements(vec![
                HeritageType::named("Store").with_type_arg(TypeNode::simple_ref("T")),
            ]));

        assert_eq!(
            generate_js_doc_lines(DocTarget::Class(&class), &[CONSTRUCTOR_TAG]),
            vec![
                "@constructor",
                "@template T",
                "@abstract",
                "@extends {Base}",
                "@implements {Store<T>}",
            ]
        );
    }

    #[test]
    fn test_interface_never_gets_heritage_or_abstract() {
        let iface = InterfaceDecl::new("Plain");
        assert_eq!(
            generate_js_doc_lines(DocTarget::Interface(&iface), &[RECORD_TAG]),
            vec!["@record"]
        );
    }

    #[test]
    fn test_empty_headers_are_dropped() {
        let method = MethodSignature::new("m");
        assert!(generate_js_doc_lines(DocTarget::Method(&method), &[""]).is_empty());
    }

    #[test]
    fn test_other_nodes_only_get_headers() {
        let node = Node::verbatim("let x = 1;");
        assert_eq!(generate_js_doc_lines(&node, &["@const"]), vec!["@const"]);
    }
}
