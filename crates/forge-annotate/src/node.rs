//! Syntax tree nodes
//!
//! This module provides `Node`, the closed set of syntax-tree shapes the
//! annotator works on. The TypeScript front end (see [`crate::parser`])
//! lowers SWC's AST into these nodes; the rewriter consumes and produces
//! them; the printer serializes them back to text.
//!
//! Source constructs the annotator never inspects are carried as
//! [`Node::Verbatim`] with their original text, so a round trip through the
//! tree preserves everything around interfaces and classes.

use crate::js_doc::JsDocBlock;
use crate::types::{TypeNode, TypeParam};
use serde::{Deserialize, Serialize};

/// A node of the syntax tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Node {
    /// Root of a parsed file
    SourceFile(SourceFile),
    /// `namespace N { ... }` / `module N { ... }`
    Namespace(NamespaceDecl),
    /// `export <decl>` / `export default <decl>`
    Export(ExportDecl),
    /// `interface I { ... }`
    InterfaceDecl(InterfaceDecl),
    /// `class C { ... }`
    ClassDecl(ClassDecl),
    /// Interface method member `m(a: A): R`
    MethodSignature(MethodSignature),
    /// Interface construct member `new (a: A): R`
    ConstructSignature(ConstructSignature),
    /// `function f(a) { ... }`
    FunctionDecl(FunctionDecl),
    /// `name = function (a) {}` stand-in binding
    VariableDecl(VariableDecl),
    /// A node paired with the documentation block printed above it
    Annotated(Annotated),
    /// Source text with nested statement lists (function bodies, blocks,
    /// ambient module bodies) lowered into child nodes
    Scope(Scope),
    /// Source text passed through untouched
    Verbatim(Verbatim),
}

impl Node {
    /// Short kind name, used in log fields
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::SourceFile(_) => "sourceFile",
            Node::Namespace(_) => "namespace",
            Node::Export(_) => "export",
            Node::InterfaceDecl(_) => "interfaceDecl",
            Node::ClassDecl(_) => "classDecl",
            Node::MethodSignature(_) => "methodSignature",
            Node::ConstructSignature(_) => "constructSignature",
            Node::FunctionDecl(_) => "functionDecl",
            Node::VariableDecl(_) => "variableDecl",
            Node::Annotated(_) => "annotated",
            Node::Scope(_) => "scope",
            Node::Verbatim(_) => "verbatim",
        }
    }

    /// Declared name, for nodes that have one
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Namespace(ns) => Some(&ns.name),
            Node::Export(export) => export.decl.name(),
            Node::InterfaceDecl(iface) => Some(&iface.name),
            Node::ClassDecl(class) => class.name.as_deref(),
            Node::MethodSignature(method) => Some(&method.name),
            Node::FunctionDecl(func) => Some(&func.name),
            Node::VariableDecl(var) => Some(&var.name),
            Node::Annotated(annotated) => annotated.node.name(),
            Node::SourceFile(_)
            | Node::ConstructSignature(_)
            | Node::Scope(_)
            | Node::Verbatim(_) => None,
        }
    }

    /// Create a verbatim node
    pub fn verbatim(text: impl Into<String>) -> Self {
        Node::Verbatim(Verbatim { text: text.into() })
    }

    /// Pair a node with a documentation block
    pub fn annotated(doc: JsDocBlock, node: Node) -> Self {
        Node::Annotated(Annotated {
            doc,
            node: Box::new(node),
        })
    }
}

/// Root of a parsed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    /// File name the tree was parsed from
    #[serde(default)]
    pub file_name: String,

    /// Top-level statements in source order
    #[serde(default)]
    pub statements: Vec<Node>,
}

impl SourceFile {
    /// Create a source file from statements
    pub fn new(file_name: impl Into<String>, statements: Vec<Node>) -> Self {
        Self {
            file_name: file_name.into(),
            statements,
        }
    }
}

/// `namespace N { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceDecl {
    /// Namespace name (dotted for `namespace a.b`)
    pub name: String,

    /// Whether the namespace is ambient (`declare namespace`)
    #[serde(default)]
    pub declare: bool,

    /// Statements of the namespace body
    #[serde(default)]
    pub body: Vec<Node>,
}

/// `export <decl>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDecl {
    /// Whether this is `export default`
    #[serde(default)]
    pub is_default: bool,

    /// The exported declaration
    pub decl: Box<Node>,
}

impl ExportDecl {
    /// Wrap a declaration in a named export
    pub fn new(decl: Node) -> Self {
        Self {
            is_default: false,
            decl: Box::new(decl),
        }
    }
}

/// `interface I<T> { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDecl {
    /// Interface name
    pub name: String,

    /// Generic parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,

    /// Members in source order
    #[serde(default)]
    pub members: Vec<Node>,
}

impl InterfaceDecl {
    /// Create an interface with no members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_params: vec![],
            members: vec![],
        }
    }

    /// Add a type parameter
    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    /// Add a member
    pub fn with_member(mut self, member: Node) -> Self {
        self.members.push(member);
        self
    }

    /// Direct method-signature members, in source order
    pub fn method_signatures(&self) -> impl Iterator<Item = &MethodSignature> {
        self.members.iter().filter_map(|m| match m {
            Node::MethodSignature(method) => Some(method),
            _ => None,
        })
    }
}

/// Keyword introducing a heritage clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeritageToken {
    /// `extends`
    Extends,
    /// `implements`
    Implements,
}

impl HeritageToken {
    /// The keyword as written in source
    pub fn as_str(&self) -> &'static str {
        match self {
            HeritageToken::Extends => "extends",
            HeritageToken::Implements => "implements",
        }
    }
}

/// A type listed in a heritage clause (`Base<T>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageType {
    /// Base name when the expression is a simple identifier
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expression: Option<String>,

    /// Type arguments in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_args: Vec<TypeNode>,
}

impl HeritageType {
    /// Create a heritage entry for an identifier
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            expression: Some(name.into()),
            type_args: vec![],
        }
    }

    /// Add a type argument
    pub fn with_type_arg(mut self, arg: TypeNode) -> Self {
        self.type_args.push(arg);
        self
    }
}

/// `extends A` / `implements A, B`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageClause {
    /// Clause keyword
    pub token: HeritageToken,

    /// Listed types
    pub types: Vec<HeritageType>,
}

impl HeritageClause {
    /// Create an `extends` clause
    pub fn extends(types: Vec<HeritageType>) -> Self {
        Self {
            token: HeritageToken::Extends,
            types,
        }
    }

    /// Create an `implements` clause
    pub fn implements(types: Vec<HeritageType>) -> Self {
        Self {
            token: HeritageToken::Implements,
            types,
        }
    }
}

/// `class C<T> extends B implements I { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDecl {
    /// Class name (absent for `export default class {}`)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,

    /// Generic parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,

    /// Whether the class carries the `abstract` modifier
    #[serde(default)]
    pub is_abstract: bool,

    /// Heritage clauses, `extends` before `implements`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heritage: Vec<HeritageClause>,

    /// Original declaration text, members and bodies included
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
}

impl ClassDecl {
    /// Create a class with no heritage and no source text
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            type_params: vec![],
            is_abstract: false,
            heritage: vec![],
            source: None,
        }
    }

    /// Add a type parameter
    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    /// Mark as abstract
    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a heritage clause
    pub fn with_heritage(mut self, clause: HeritageClause) -> Self {
        self.heritage.push(clause);
        self
    }

    /// Set the original source text
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Base class name from the `extends` clause, if any
    pub fn super_class(&self) -> Option<&str> {
        self.heritage
            .iter()
            .find(|c| c.token == HeritageToken::Extends)
            .and_then(|c| c.types.first())
            .and_then(|t| t.expression.as_deref())
    }
}

/// Name of a formal parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum ParamName {
    /// A simple identifier
    Ident(String),
    /// A destructuring pattern, kept as source text
    Pattern(String),
}

/// A formal parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Parameter name or pattern
    pub name: ParamName,

    /// Written type annotation
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_ann: Option<TypeNode>,

    /// Whether the parameter is optional (`x?` or has a default)
    #[serde(default)]
    pub optional: bool,

    /// Whether this is a rest parameter (`...xs`)
    #[serde(default)]
    pub rest: bool,
}

impl Parameter {
    /// Create an identifier parameter with a type annotation
    pub fn new(name: impl Into<String>, type_ann: TypeNode) -> Self {
        Self {
            name: ParamName::Ident(name.into()),
            type_ann: Some(type_ann),
            optional: false,
            rest: false,
        }
    }

    /// Create an identifier parameter without a type annotation
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: ParamName::Ident(name.into()),
            type_ann: None,
            optional: false,
            rest: false,
        }
    }

    /// Mark as optional
    pub fn as_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark as rest parameter
    pub fn as_rest(mut self) -> Self {
        self.rest = true;
        self
    }

    /// Identifier name, if the parameter is not a destructuring pattern
    pub fn ident(&self) -> Option<&str> {
        match &self.name {
            ParamName::Ident(name) => Some(name),
            ParamName::Pattern(_) => None,
        }
    }
}

/// Interface method member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    /// Method name
    pub name: String,

    /// Formal parameters
    #[serde(default)]
    pub params: Vec<Parameter>,

    /// Declared return type
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub return_type: Option<TypeNode>,

    /// Whether the method is optional (`m?()`)
    #[serde(default)]
    pub optional: bool,
}

impl MethodSignature {
    /// Create a method with no parameters and no return type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![],
            return_type: None,
            optional: false,
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// Set the return type
    pub fn returning(mut self, ty: TypeNode) -> Self {
        self.return_type = Some(ty);
        self
    }
}

/// Interface construct member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructSignature {
    /// Formal parameters
    #[serde(default)]
    pub params: Vec<Parameter>,

    /// Declared instance type
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub return_type: Option<TypeNode>,
}

/// `function f(a, b) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDecl {
    /// Function name
    pub name: String,

    /// Formal parameters
    #[serde(default)]
    pub params: Vec<Parameter>,

    /// Declared return type
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub return_type: Option<TypeNode>,

    /// Original declaration text; synthesized functions have none and
    /// print with an empty body
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
}

impl FunctionDecl {
    /// Create a body-less function with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![],
            return_type: None,
            source: None,
        }
    }
}

/// An anonymous function expression with an empty body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionExpr {
    /// Formal parameters
    #[serde(default)]
    pub params: Vec<Parameter>,
}

/// A binding of a (possibly dotted) name to a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDecl {
    /// Bound name, e.g. `Owner.prototype.method`
    pub name: String,

    /// Bound value
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub initializer: Option<FunctionExpr>,
}

/// A node with its documentation block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotated {
    /// Documentation printed above the node
    pub doc: JsDocBlock,

    /// The documented node
    pub node: Box<Node>,
}

/// A statement whose text is kept except for the statement lists inside it
///
/// `if (ok) { class A {} }` lowers to the parts `if (ok) {`, a body holding
/// the class, and `}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    /// Text and bodies in source order
    pub parts: Vec<ScopePart>,
}

impl Scope {
    /// Nested statement lists, in source order
    pub fn bodies(&self) -> impl Iterator<Item = &Vec<Node>> {
        self.parts.iter().filter_map(|part| match part {
            ScopePart::Body { statements } => Some(statements),
            ScopePart::Text { .. } => None,
        })
    }
}

/// One piece of a [`Scope`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "camelCase")]
pub enum ScopePart {
    /// Source text between bodies, braces included
    Text { text: String },
    /// Statements between a pair of braces
    Body { statements: Vec<Node> },
}

impl ScopePart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        ScopePart::Text { text: text.into() }
    }

    /// Create a body part
    pub fn body(statements: Vec<Node>) -> Self {
        ScopePart::Body { statements }
    }
}

/// Untouched source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verbatim {
    /// Original text
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_signatures_are_direct_members_only() {
        let iface = InterfaceDecl::new("Foo")
            .with_member(Node::MethodSignature(MethodSignature::new("a")))
            .with_member(Node::verbatim("size: number;"))
            .with_member(Node::ConstructSignature(ConstructSignature::default()))
            .with_member(Node::MethodSignature(MethodSignature::new("b")));

        let names: Vec<_> = iface.method_signatures().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_node_name() {
        let class = Node::ClassDecl(ClassDecl::new("Widget"));
        assert_eq!(class.name(), Some("Widget"));

        let exported = Node::Export(ExportDecl::new(class));
        assert_eq!(exported.name(), Some("Widget"));

        assert_eq!(Node::verbatim("let x = 1;").name(), None);
    }

    #[test]
    fn test_super_class() {
        let class = ClassDecl::new("Child")
            .with_heritage(HeritageClause::implements(vec![HeritageType::named("I")]))
            .with_heritage(HeritageClause::extends(vec![HeritageType::named("Base")]));
        assert_eq!(class.super_class(), Some("Base"));
        assert_eq!(ClassDecl::new("Lone").super_class(), None);
    }

    #[test]
    fn test_parameter_ident() {
        assert_eq!(Parameter::untyped("x").ident(), Some("x"));
        let pattern = Parameter {
            name: ParamName::Pattern("{ a, b }".into()),
            type_ann: None,
            optional: false,
            rest: false,
        };
        assert_eq!(pattern.ident(), None);
    }

    #[test]
    fn test_node_serialization_tag() {
        let node = Node::FunctionDecl(FunctionDecl::new("Foo"));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "functionDecl");
        assert_eq!(json["name"], "Foo");
    }
}
