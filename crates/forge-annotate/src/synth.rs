//! Declaration synthesis
//!
//! Builds the replacement nodes for the two rewrite rules:
//!
//! - an interface becomes a `@record` function stand-in followed by one
//!   `Owner.prototype.method = function (...) {}` stand-in per method
//!   signature, since interfaces have no runtime representation
//! - a class is kept as is and paired with a `@constructor` block
//!
//! Synthesis never touches member bodies or initializers of the input.

use crate::js_doc::{generate_js_doc, DocTarget, CONSTRUCTOR_TAG, RECORD_TAG};
use crate::node::{ClassDecl, FunctionDecl, FunctionExpr, InterfaceDecl, MethodSignature, Node, VariableDecl};

/// Qualified name of a method stand-in: `Owner.prototype.method`
pub fn qualified_method_name(owner: &str, method: &str) -> String {
    format!("{}.prototype.{}", owner, method)
}

/// Replace an interface with its stand-ins
///
/// The result always has `1 + m` nodes where `m` is the number of direct
/// method-signature members, in member order.
pub fn synthesize_interface(iface: &InterfaceDecl) -> Vec<Node> {
    let record = FunctionDecl::new(iface.name.clone());
    let record_doc = generate_js_doc(DocTarget::Interface(iface), &[RECORD_TAG]);

    let mut nodes = vec![Node::annotated(record_doc, Node::FunctionDecl(record))];
    nodes.extend(
        iface
            .method_signatures()
            .map(|method| synthesize_method(&iface.name, method)),
    );
    nodes
}

/// Build the stand-in for one interface method
pub fn synthesize_method(owner: &str, method: &MethodSignature) -> Node {
    let stand_in = VariableDecl {
        name: qualified_method_name(owner, &method.name),
        initializer: Some(FunctionExpr {
            params: method.params.clone(),
        }),
    };
    let doc = generate_js_doc(DocTarget::Method(method), &[]);
    Node::annotated(doc, Node::VariableDecl(stand_in))
}

/// Keep a class and pair it with its `@constructor` block
pub fn synthesize_class(class: ClassDecl) -> Node {
    let doc = generate_js_doc(DocTarget::Class(&class), &[CONSTRUCTOR_TAG]);
    Node::annotated(doc, Node::ClassDecl(class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Rule};
    use crate::node::{ConstructSignature, HeritageClause, HeritageType, Parameter};
    use crate::test::{mock_interface, mock_method};
    use crate::types::{TypeNode, TypeParam};
    use pretty_assertions::assert_eq;

    fn doc_lines(node: &Node) -> Vec<String> {
        match node {
            Node::Annotated(annotated) => annotated.doc.lines.clone(),
            other => panic!("expected annotated node, got {}", other.kind_name()),
        }
    }

    #[test]
    fn test_qualified_method_name() {
        assert_eq!(
            qualified_method_name("PrototypeObject", "__lookupGetter__"),
            "PrototypeObject.prototype.__lookupGetter__"
        );
    }

    #[test]
    fn test_interface_count_invariant() {
        for m in 0..4 {
            let methods = (0..m).map(|i| mock_method(&format!("m{i}"))).collect();
            let iface = mock_interface("Foo", methods);
            assert_eq!(synthesize_interface(&iface).len(), m + 1);
        }
    }

    #[test]
    fn test_non_method_members_are_ignored() {
        let iface = InterfaceDecl::new("Shape")
            .with_member(Node::verbatim("[key: string]: any"))
            .with_member(Node::ConstructSignature(ConstructSignature::default()))
            .with_member(Node::MethodSignature(mock_method("area")));

        let nodes = synthesize_interface(&iface);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].name(), Some("Shape.prototype.area"));
    }

    #[test]
    fn test_interface_stand_in() {
        let iface = InterfaceDecl::new("Pair").with_type_param(TypeParam::new("T"));
        let nodes = synthesize_interface(&iface);

        assert_eq!(doc_lines(&nodes[0]), vec!["@record", "@template T"]);
        match &nodes[0] {
            Node::Annotated(annotated) => match annotated.node.as_ref() {
                Node::FunctionDecl(func) => {
                    assert_eq!(func.name, "Pair");
                    assert!(func.params.is_empty());
                    assert!(func.source.is_none());
                }
                other => panic!("unexpected stand-in {}", other.kind_name()),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_method_stand_ins_keep_source_order() {
        let iface = mock_interface(
            "PrototypeObject",
            vec![
                MethodSignature::new("__lookupGetter__")
                    .with_param(Parameter::new("k", TypeNode::string()))
                    .returning(TypeNode::simple_ref("Getter")),
                MethodSignature::new("__defineGetter__")
                    .with_param(Parameter::new("k", TypeNode::string()))
                    .with_param(Parameter::new("getter", TypeNode::simple_ref("Getter")))
                    .returning(TypeNode::void()),
            ],
        );

        let nodes = synthesize_interface(&iface);
        assert_eq!(nodes.len(), 3);
        assert_eq!(doc_lines(&nodes[0]), vec!["@record"]);

        assert_eq!(
            nodes[1].name(),
            Some("PrototypeObject.prototype.__lookupGetter__")
        );
        assert_eq!(
            doc_lines(&nodes[1]),
            vec!["@param {string} k", "@return {Getter}"]
        );

        assert_eq!(
            nodes[2].name(),
            Some("PrototypeObject.prototype.__defineGetter__")
        );
        assert_eq!(
            doc_lines(&nodes[2]),
            vec!["@param {string} k", "@param {Getter} getter"]
        );
    }

    #[test]
    fn test_method_stand_in_carries_parameters() {
        let method = mock_method("run").with_param(Parameter::untyped("ctx"));
        match synthesize_method("Task", &method) {
            Node::Annotated(annotated) => match *annotated.node {
                Node::VariableDecl(var) => {
                    let init = var.initializer.expect("function initializer");
                    assert_eq!(init.params.len(), 1);
                    assert_eq!(init.params[0].ident(), Some("ctx"));
                }
                other => panic!("unexpected stand-in {}", other.kind_name()),
            },
            other => panic!("unexpected node {}", other.kind_name()),
        }
    }

    #[test]
    fn test_class_is_kept_and_annotated() {
        let class = ClassDecl::new("Widget")
            .with_heritage(HeritageClause::extends(vec![HeritageType::named("Base")]))
            .with_source("class Widget extends Base {\n  draw(): void {}\n}");

        let node = synthesize_class(class.clone());
        assert_eq!(doc_lines(&node), vec!["@constructor", "@extends {Base}"]);
        match node {
            Node::Annotated(annotated) => assert_eq!(*annotated.node, Node::ClassDecl(class)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_stand_ins_are_not_reclassified() {
        let iface = mock_interface("Foo", vec![mock_method("bar")]);
        for node in synthesize_interface(&iface) {
            assert_eq!(classify(&node), Rule::PassThrough);
        }
    }
}
