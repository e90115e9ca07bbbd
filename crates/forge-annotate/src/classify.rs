//! Declaration classification
//!
//! Decides, for any node, which synthesis rule the rewriter applies.

use crate::node::Node;
use serde::{Deserialize, Serialize};

/// Synthesis rule selected for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    /// Replace with a `@record` stand-in plus one stand-in per method
    Interface,
    /// Keep the class and attach a `@constructor` block
    Class,
    /// Keep the node and rewrite its children
    PassThrough,
}

/// Classify a node
pub fn classify(node: &Node) -> Rule {
    match node {
        Node::InterfaceDecl(_) => Rule::Interface,
        Node::ClassDecl(_) => Rule::Class,
        Node::SourceFile(_)
        | Node::Namespace(_)
        | Node::Export(_)
        | Node::MethodSignature(_)
        | Node::ConstructSignature(_)
        | Node::FunctionDecl(_)
        | Node::VariableDecl(_)
        | Node::Annotated(_)
        | Node::Scope(_)
        | Node::Verbatim(_) => Rule::PassThrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js_doc::JsDocBlock;
    use crate::node::{ClassDecl, ExportDecl, FunctionDecl, InterfaceDecl, VariableDecl};

    #[test]
    fn test_classify_declarations() {
        assert_eq!(
            classify(&Node::InterfaceDecl(InterfaceDecl::new("I"))),
            Rule::Interface
        );
        assert_eq!(classify(&Node::ClassDecl(ClassDecl::new("C"))), Rule::Class);
    }

    #[test]
    fn test_export_descends() {
        let export = Node::Export(ExportDecl::new(Node::ClassDecl(ClassDecl::new("C"))));
        assert_eq!(classify(&export), Rule::PassThrough);
    }

    #[test]
    fn test_stand_ins_pass_through() {
        let record = Node::FunctionDecl(FunctionDecl::new("I"));
        let method = Node::VariableDecl(VariableDecl {
            name: "I.prototype.m".into(),
            initializer: None,
        });
        assert_eq!(classify(&record), Rule::PassThrough);
        assert_eq!(classify(&method), Rule::PassThrough);

        let annotated_class = Node::annotated(
            JsDocBlock::new(vec!["@constructor".into()]),
            Node::ClassDecl(ClassDecl::new("C")),
        );
        assert_eq!(classify(&annotated_class), Rule::PassThrough);
    }
}
