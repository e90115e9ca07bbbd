//! Tree rewriting
//!
//! Pre-order, depth-first rewrite of a syntax tree. At every node the
//! classifier picks a rule:
//!
//! - `Interface` / `Class`: the node is replaced by the synthesizer's output
//!   and its children are not visited
//! - `PassThrough`: the node is kept and each of its child lists is
//!   rewritten with the same rule
//!
//! Statement lists are rewritten with `flat_map`, which is how one
//! interface expands into several sibling statements.

use crate::classify::{classify, Rule};
use crate::node::{Annotated, ExportDecl, NamespaceDecl, Node, Scope, ScopePart, SourceFile};
use crate::synth::{synthesize_class, synthesize_interface};
use tracing::{debug, trace};

/// Counters collected while rewriting one tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Interfaces replaced by stand-ins
    pub interfaces: usize,
    /// Classes annotated in place
    pub classes: usize,
    /// Method stand-ins emitted for interfaces
    pub methods: usize,
}

impl RewriteStats {
    /// Add another set of counters to this one
    pub fn merge(&mut self, other: RewriteStats) {
        self.interfaces += other.interfaces;
        self.classes += other.classes;
        self.methods += other.methods;
    }

    /// Check whether nothing was rewritten
    pub fn is_empty(&self) -> bool {
        self.interfaces == 0 && self.classes == 0
    }
}

/// Rewrites interfaces and classes into annotated declarations
#[derive(Debug, Default)]
pub struct Rewriter {
    stats: RewriteStats,
}

impl Rewriter {
    /// Create a rewriter with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters collected so far
    pub fn stats(&self) -> RewriteStats {
        self.stats
    }

    /// Rewrite a whole file
    pub fn rewrite_source_file(&mut self, file: SourceFile) -> SourceFile {
        let SourceFile {
            file_name,
            statements,
        } = file;
        trace!(file = %file_name, statements = statements.len(), "rewriting source file");
        SourceFile {
            file_name,
            statements: self.rewrite_list(statements),
        }
    }

    /// Rewrite a statement list, splicing multi-node replacements in place
    pub fn rewrite_list(&mut self, nodes: Vec<Node>) -> Vec<Node> {
        nodes
            .into_iter()
            .flat_map(|node| self.visit(node))
            .collect()
    }

    /// Rewrite one node into its replacement sequence
    ///
    /// Pass-through nodes always yield exactly one node except for exports of
    /// interfaces, where the method stand-ins follow the exported record as
    /// siblings.
    pub fn visit(&mut self, node: Node) -> Vec<Node> {
        match classify(&node) {
            Rule::Interface => match node {
                Node::InterfaceDecl(iface) => {
                    let nodes = synthesize_interface(&iface);
                    self.stats.interfaces += 1;
                    self.stats.methods += nodes.len() - 1;
                    debug!(
                        interface = %iface.name,
                        methods = nodes.len() - 1,
                        "replaced interface with stand-ins"
                    );
                    nodes
                }
                other => vec![other],
            },
            Rule::Class => match node {
                Node::ClassDecl(class) => {
                    self.stats.classes += 1;
                    debug!(
                        class = class.name.as_deref().unwrap_or("<anonymous>"),
                        "annotated class"
                    );
                    vec![synthesize_class(class)]
                }
                other => vec![other],
            },
            Rule::PassThrough => self.descend(node),
        }
    }

    fn descend(&mut self, node: Node) -> Vec<Node> {
        match node {
            Node::SourceFile(file) => vec![Node::SourceFile(self.rewrite_source_file(file))],
            Node::Namespace(ns) => {
                let NamespaceDecl {
                    name,
                    declare,
                    body,
                } = ns;
                let body = self.rewrite_list(body);
                vec![Node::Namespace(NamespaceDecl {
                    name,
                    declare,
                    body,
                })]
            }
            Node::Export(export) => self.descend_export(export),
            Node::Scope(scope) => {
                let parts = scope
                    .parts
                    .into_iter()
                    .map(|part| match part {
                        ScopePart::Body { statements } => {
                            ScopePart::body(self.rewrite_list(statements))
                        }
                        text @ ScopePart::Text { .. } => text,
                    })
                    .collect();
                vec![Node::Scope(Scope { parts })]
            }
            Node::Annotated(Annotated { doc, node }) => {
                let mut inner = self.visit(*node);
                let first = if inner.is_empty() {
                    return vec![];
                } else {
                    inner.remove(0)
                };
                let mut out = vec![Node::Annotated(Annotated {
                    doc,
                    node: Box::new(first),
                })];
                out.extend(inner);
                out
            }
            // Leaves: no child lists to rewrite
            leaf @ (Node::InterfaceDecl(_)
            | Node::ClassDecl(_)
            | Node::MethodSignature(_)
            | Node::ConstructSignature(_)
            | Node::FunctionDecl(_)
            | Node::VariableDecl(_)
            | Node::Verbatim(_)) => vec![leaf],
        }
    }

    fn descend_export(&mut self, export: ExportDecl) -> Vec<Node> {
        let ExportDecl { is_default, decl } = export;
        let mut rewritten = self.visit(*decl).into_iter();
        let Some(first) = rewritten.next() else {
            return vec![];
        };

        let mut out = vec![Node::Export(ExportDecl {
            is_default,
            decl: Box::new(first),
        })];
        out.extend(rewritten);
        out
    }
}

/// Rewrite a source file with a fresh [`Rewriter`]
pub fn rewrite(file: SourceFile) -> SourceFile {
    Rewriter::new().rewrite_source_file(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ClassDecl, FunctionDecl, InterfaceDecl, MethodSignature, Parameter};
    use crate::test::{mock_interface, mock_method, mock_source_file};
    use crate::types::TypeNode;
    use pretty_assertions::assert_eq;

    fn names(nodes: &[Node]) -> Vec<Option<&str>> {
        nodes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn test_interface_replaced_in_place() {
        let file = mock_source_file(vec![
            Node::verbatim("type Getter = () => any;"),
            Node::InterfaceDecl(mock_interface(
                "Foo",
                vec![mock_method("a"), mock_method("b")],
            )),
            Node::verbatim("const x = 1;"),
        ]);

        let out = rewrite(file);
        assert_eq!(
            names(&out.statements),
            vec![
                None,
                Some("Foo"),
                Some("Foo.prototype.a"),
                Some("Foo.prototype.b"),
                None,
            ]
        );
    }

    #[test]
    fn test_class_annotated_in_place() {
        let file = mock_source_file(vec![Node::ClassDecl(ClassDecl::new("Widget"))]);
        let out = rewrite(file);

        assert_eq!(out.statements.len(), 1);
        match &out.statements[0] {
            Node::Annotated(annotated) => {
                assert_eq!(annotated.doc.lines, vec!["@constructor"]);
                assert!(matches!(*annotated.node, Node::ClassDecl(_)));
            }
            other => panic!("unexpected node {}", other.kind_name()),
        }
    }

    #[test]
    fn test_unmatched_nodes_are_untouched() {
        let func = Node::FunctionDecl(FunctionDecl {
            name: "helper".into(),
            params: vec![Parameter::new("x", TypeNode::string())],
            return_type: None,
            source: Some("function helper(x: string) {}".into()),
        });
        let file = mock_source_file(vec![func.clone(), Node::verbatim("helper('a');")]);

        let out = rewrite(file.clone());
        assert_eq!(out, file);
    }

    #[test]
    fn test_namespace_body_is_rewritten() {
        let ns = Node::Namespace(NamespaceDecl {
            name: "shapes".into(),
            declare: false,
            body: vec![
                Node::InterfaceDecl(mock_interface("Shape", vec![mock_method("area")])),
                Node::ClassDecl(ClassDecl::new("Circle")),
            ],
        });

        let out = rewrite(mock_source_file(vec![ns]));
        match &out.statements[0] {
            Node::Namespace(ns) => {
                assert_eq!(
                    names(&ns.body),
                    vec![Some("Shape"), Some("Shape.prototype.area"), Some("Circle")]
                );
            }
            other => panic!("unexpected node {}", other.kind_name()),
        }
    }

    #[test]
    fn test_exported_interface_lifts_methods_to_siblings() {
        let export = Node::Export(ExportDecl::new(Node::InterfaceDecl(mock_interface(
            "Api",
            vec![mock_method("get"), mock_method("put")],
        ))));

        let out = rewrite(mock_source_file(vec![export]));
        assert_eq!(out.statements.len(), 3);
        assert!(matches!(out.statements[0], Node::Export(_)));
        assert_eq!(out.statements[0].name(), Some("Api"));
        assert_eq!(out.statements[1].name(), Some("Api.prototype.get"));
        assert_eq!(out.statements[2].name(), Some("Api.prototype.put"));
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let file = mock_source_file(vec![
            Node::InterfaceDecl(mock_interface(
                "Foo",
                vec![MethodSignature::new("bar").returning(TypeNode::number())],
            )),
            Node::ClassDecl(ClassDecl::new("Baz")),
        ]);

        let once = rewrite(file);
        let twice = rewrite(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_declarations_inside_interfaces_are_not_visited() {
        // A replaced node's children are discarded, never rewritten
        let iface = InterfaceDecl::new("Outer")
            .with_member(Node::InterfaceDecl(mock_interface("Inner", vec![])));
        let out = rewrite(mock_source_file(vec![Node::InterfaceDecl(iface)]));
        assert_eq!(names(&out.statements), vec![Some("Outer")]);
    }

    #[test]
    fn test_scope_bodies_are_rewritten() {
        let scope = Node::Scope(Scope {
            parts: vec![
                ScopePart::text("function outer() {"),
                ScopePart::body(vec![
                    Node::ClassDecl(ClassDecl::new("Local")),
                    Node::InterfaceDecl(mock_interface("Shape", vec![mock_method("area")])),
                ]),
                ScopePart::text("}"),
            ],
        });

        let out = rewrite(mock_source_file(vec![scope]));
        assert_eq!(out.statements.len(), 1);
        let Node::Scope(scope) = &out.statements[0] else {
            panic!("expected scope, got {:?}", out.statements[0]);
        };
        let bodies: Vec<_> = scope.bodies().collect();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            names(bodies[0]),
            vec![Some("Local"), Some("Shape"), Some("Shape.prototype.area")]
        );
        assert!(matches!(bodies[0][0], Node::Annotated(_)));
        assert_eq!(scope.parts[0], ScopePart::text("function outer() {"));
    }

    #[test]
    fn test_stats() {
        let file = mock_source_file(vec![
            Node::InterfaceDecl(mock_interface(
                "A",
                vec![mock_method("x"), mock_method("y")],
            )),
            Node::InterfaceDecl(mock_interface("B", vec![])),
            Node::ClassDecl(ClassDecl::new("C")),
        ]);

        let mut rewriter = Rewriter::new();
        rewriter.rewrite_source_file(file);
        assert_eq!(
            rewriter.stats(),
            RewriteStats {
                interfaces: 2,
                classes: 1,
                methods: 2,
            }
        );
    }
}
