//! Tree printer
//!
//! Serializes a [`SourceFile`] back to text. Nodes lowered from source print
//! their original text; synthesized stand-ins print as minimal JavaScript:
//!
//! ```text
//! /**
//!  * @record
//!  */
//! function PrototypeObject() {}
//! /**
//!  * @param {string} k
//!  * @return {Getter}
//!  */
//! PrototypeObject.prototype.__lookupGetter__ = function (k) {};
//! ```
//!
//! The output still contains whatever TypeScript syntax the verbatim text
//! carried; [`crate::emit`] removes it.

use crate::node::{
    ClassDecl, ExportDecl, FunctionDecl, InterfaceDecl, NamespaceDecl, Node, ParamName,
    Parameter, Scope, ScopePart, SourceFile, VariableDecl,
};
use crate::types::TypeNode;

const INDENT: &str = "  ";

/// Print a whole file; the result ends with a newline
pub fn print_source_file(file: &SourceFile) -> String {
    let mut out = print_statements(&file.statements, "");
    out.push('\n');
    out
}

/// Print a single node at the top level
pub fn print_node(node: &Node) -> String {
    let mut printer = Printer::new();
    printer.node(node, "");
    printer.out
}

fn print_statements(nodes: &[Node], indent: &str) -> String {
    let mut printer = Printer::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.node(node, indent);
    }
    printer.out
}

struct Printer {
    out: String,
}

impl Printer {
    fn new() -> Self {
        Self { out: String::new() }
    }

    fn node(&mut self, node: &Node, indent: &str) {
        match node {
            Node::SourceFile(file) => self.out.push_str(&print_statements(&file.statements, indent)),
            Node::Namespace(ns) => {
                self.out.push_str(indent);
                self.namespace(ns, indent);
            }
            Node::Export(export) => self.export(export, indent),
            Node::Annotated(annotated) => {
                self.out.push_str(&annotated.doc.render(indent));
                self.out.push('\n');
                self.node(&annotated.node, indent);
            }
            other => {
                self.out.push_str(indent);
                self.declaration(other, indent);
            }
        }
    }

    /// `export` goes between the doc block and the declaration
    fn export(&mut self, export: &ExportDecl, indent: &str) {
        let decl = match export.decl.as_ref() {
            Node::Annotated(annotated) => {
                self.out.push_str(&annotated.doc.render(indent));
                self.out.push('\n');
                annotated.node.as_ref()
            }
            other => other,
        };

        self.out.push_str(indent);
        self.out.push_str("export ");
        if export.is_default {
            self.out.push_str("default ");
        }
        match decl {
            Node::Namespace(ns) => self.namespace(ns, indent),
            other => self.declaration(other, indent),
        }
    }

    fn namespace(&mut self, ns: &NamespaceDecl, indent: &str) {
        if ns.declare {
            self.out.push_str("declare ");
        }
        self.out.push_str("namespace ");
        self.out.push_str(&ns.name);
        self.out.push_str(" {\n");

        let inner = format!("{indent}{INDENT}");
        let body = print_statements(&ns.body, &inner);
        if !body.is_empty() {
            self.out.push_str(&body);
            self.out.push('\n');
        }
        self.out.push_str(indent);
        self.out.push('}');
    }

    /// Print a declaration without its leading indent
    fn declaration(&mut self, node: &Node, indent: &str) {
        match node {
            Node::ClassDecl(class) => self.class(class),
            Node::FunctionDecl(func) => self.function(func),
            Node::VariableDecl(var) => self.variable(var),
            Node::InterfaceDecl(iface) => self.interface(iface, indent),
            Node::MethodSignature(method) => {
                self.out.push_str(&method.name);
                self.out.push_str(&signature_params(&method.params));
                self.out.push_str(&return_annotation(method.return_type.as_ref()));
                self.out.push(';');
            }
            Node::ConstructSignature(ctor) => {
                self.out.push_str("new ");
                self.out.push_str(&signature_params(&ctor.params));
                self.out.push_str(&return_annotation(ctor.return_type.as_ref()));
                self.out.push(';');
            }
            Node::Scope(scope) => self.scope(scope, indent),
            Node::Verbatim(verbatim) => self.out.push_str(&verbatim.text),
            Node::SourceFile(_) | Node::Namespace(_) | Node::Export(_) | Node::Annotated(_) => {
                // Only reachable for nested exports, which the front end never builds
                self.node(node, "");
            }
        }
    }

    fn class(&mut self, class: &ClassDecl) {
        if let Some(source) = &class.source {
            self.out.push_str(source);
            return;
        }

        self.out.push_str("class");
        if let Some(name) = &class.name {
            self.out.push(' ');
            self.out.push_str(name);
        }
        if let Some(base) = class.super_class() {
            self.out.push_str(" extends ");
            self.out.push_str(base);
        }
        self.out.push_str(" {}");
    }

    fn function(&mut self, func: &FunctionDecl) {
        match &func.source {
            Some(source) => self.out.push_str(source),
            None => {
                self.out.push_str("function ");
                self.out.push_str(&func.name);
                self.out.push_str(&stand_in_params(&func.params));
                self.out.push_str(" {}");
            }
        }
    }

    fn variable(&mut self, var: &VariableDecl) {
        self.out.push_str(&var.name);
        if let Some(init) = &var.initializer {
            self.out.push_str(" = function ");
            self.out.push_str(&stand_in_params(&init.params));
            self.out.push_str(" {}");
        }
        self.out.push(';');
    }

    /// Text parts print as written; bodies print one indent deeper
    fn scope(&mut self, scope: &Scope, indent: &str) {
        let inner = format!("{indent}{INDENT}");
        for part in &scope.parts {
            match part {
                ScopePart::Text { text } => self.out.push_str(text),
                ScopePart::Body { statements } => {
                    let body = print_statements(statements, &inner);
                    if !body.is_empty() {
                        self.out.push('\n');
                        self.out.push_str(&body);
                        self.out.push('\n');
                        self.out.push_str(indent);
                    }
                }
            }
        }
    }

    /// Interfaces only reach the printer when no rewrite ran
    fn interface(&mut self, iface: &InterfaceDecl, indent: &str) {
        self.out.push_str("interface ");
        self.out.push_str(&iface.name);
        if !iface.type_params.is_empty() {
            let names: Vec<&str> = iface.type_params.iter().map(|p| p.name.as_str()).collect();
            self.out.push('<');
            self.out.push_str(&names.join(", "));
            self.out.push('>');
        }
        self.out.push_str(" {\n");
        let inner = format!("{indent}{INDENT}");
        for member in &iface.members {
            self.out.push_str(&inner);
            self.declaration(member, &inner);
            self.out.push('\n');
        }
        self.out.push_str(indent);
        self.out.push('}');
    }
}

/// `(a, b, ...rest)`: names only, the stand-in body is empty
fn stand_in_params(params: &[Parameter]) -> String {
    let names: Vec<String> = params
        .iter()
        .map(|p| {
            let name = match &p.name {
                ParamName::Ident(name) => name.as_str(),
                ParamName::Pattern(text) => text.as_str(),
            };
            if p.rest {
                format!("...{}", name)
            } else {
                name.to_string()
            }
        })
        .collect();
    format!("({})", names.join(", "))
}

/// `(a: string, b?: number)`: TypeScript signature form
fn signature_params(params: &[Parameter]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|p| {
            let mut text = String::new();
            if p.rest {
                text.push_str("...");
            }
            match &p.name {
                ParamName::Ident(name) => text.push_str(name),
                ParamName::Pattern(pattern) => text.push_str(pattern),
            }
            if p.optional {
                text.push('?');
            }
            if let Some(ty) = &p.type_ann {
                text.push_str(": ");
                text.push_str(&type_text(ty));
            }
            text
        })
        .collect();
    format!("({})", rendered.join(", "))
}

fn return_annotation(ty: Option<&TypeNode>) -> String {
    ty.map(|t| format!(": {}", type_text(t))).unwrap_or_default()
}

/// Render a type back to TypeScript syntax
pub fn type_text(ty: &TypeNode) -> String {
    match ty {
        TypeNode::Keyword { keyword } => keyword.as_str().to_string(),
        TypeNode::TypeRef { name, type_args } => {
            if type_args.is_empty() {
                name.text().to_string()
            } else {
                let args: Vec<String> = type_args.iter().map(type_text).collect();
                format!("{}<{}>", name.text(), args.join(", "))
            }
        }
        TypeNode::Union { types } => types.iter().map(type_text).collect::<Vec<_>>().join(" | "),
        TypeNode::Intersection { types } => {
            types.iter().map(type_text).collect::<Vec<_>>().join(" & ")
        }
        TypeNode::Function => "Function".to_string(),
        TypeNode::Other { text } => text.clone(),
    }
}
