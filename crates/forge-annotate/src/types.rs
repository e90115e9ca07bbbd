//! Type expression nodes
//!
//! This module provides `TypeNode`, the closed set of TypeScript type
//! expression shapes the annotator distinguishes. Only a handful of shapes
//! carry meaning for JSDoc encoding (keywords, named references, function
//! types, unions and intersections); every other shape is folded into
//! [`TypeNode::Other`] with its source text kept for diagnostics.

use serde::{Deserialize, Serialize};

/// TypeScript keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Keyword {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `boolean`
    Boolean,
    /// `number`
    Number,
    /// `string`
    String,
    /// `function`
    Function,
    /// `void`
    Void,
    /// `any`
    Any,
    /// `unknown`
    Unknown,
    /// `never`
    Never,
    /// `object`
    Object,
    /// `symbol`
    Symbol,
    /// `bigint`
    BigInt,
}

impl Keyword {
    /// The keyword as written in TypeScript source
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::Boolean => "boolean",
            Keyword::Number => "number",
            Keyword::String => "string",
            Keyword::Function => "function",
            Keyword::Void => "void",
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Never => "never",
            Keyword::Object => "object",
            Keyword::Symbol => "symbol",
            Keyword::BigInt => "bigint",
        }
    }
}

/// Name of a referenced type
///
/// `Foo` is an identifier, `ns.Foo` is qualified. Only identifiers encode to
/// a type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum TypeName {
    /// A simple identifier
    Ident(String),
    /// A dotted name such as `ns.Foo`
    Qualified(String),
}

impl TypeName {
    /// Get the identifier text if this is a simple identifier
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            TypeName::Ident(name) => Some(name),
            TypeName::Qualified(_) => None,
        }
    }

    /// Get the full name text
    pub fn text(&self) -> &str {
        match self {
            TypeName::Ident(name) | TypeName::Qualified(name) => name,
        }
    }
}

/// A TypeScript type expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeNode {
    /// Keyword type (`string`, `void`, ...)
    Keyword {
        /// Which keyword
        keyword: Keyword,
    },

    /// Named type reference, optionally instantiated (`Foo`, `Map<K, V>`)
    TypeRef {
        /// Referenced name
        name: TypeName,
        /// Type arguments in source order
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_args: Vec<TypeNode>,
    },

    /// Union type (`A | B`)
    Union {
        /// Member types in source order
        types: Vec<TypeNode>,
    },

    /// Intersection type (`A & B`)
    Intersection {
        /// Member types in source order
        types: Vec<TypeNode>,
    },

    /// Function type (`(a: A) => B`); constructor types (`new () => T`) are `Other`
    Function,

    /// Any shape without a JSDoc encoding (arrays, tuples, literals, ...)
    Other {
        /// Source text of the type, when known
        #[serde(default, skip_serializing_if = "String::is_empty")]
        text: String,
    },
}

impl TypeNode {
    /// Create a keyword type
    pub fn keyword(keyword: Keyword) -> Self {
        TypeNode::Keyword { keyword }
    }

    /// Create a `string` type
    pub fn string() -> Self {
        Self::keyword(Keyword::String)
    }

    /// Create a `number` type
    pub fn number() -> Self {
        Self::keyword(Keyword::Number)
    }

    /// Create a `boolean` type
    pub fn boolean() -> Self {
        Self::keyword(Keyword::Boolean)
    }

    /// Create a `void` type
    pub fn void() -> Self {
        Self::keyword(Keyword::Void)
    }

    /// Create a reference to a named type without type arguments
    pub fn simple_ref(name: impl Into<String>) -> Self {
        TypeNode::TypeRef {
            name: TypeName::Ident(name.into()),
            type_args: vec![],
        }
    }

    /// Create a reference to a named type with type arguments
    pub fn type_ref(name: impl Into<String>, type_args: Vec<TypeNode>) -> Self {
        TypeNode::TypeRef {
            name: TypeName::Ident(name.into()),
            type_args,
        }
    }

    /// Create a union type
    pub fn union(types: Vec<TypeNode>) -> Self {
        TypeNode::Union { types }
    }

    /// Create an intersection type
    pub fn intersection(types: Vec<TypeNode>) -> Self {
        TypeNode::Intersection { types }
    }

    /// Create an opaque type from its source text
    pub fn other(text: impl Into<String>) -> Self {
        TypeNode::Other { text: text.into() }
    }

    /// Check whether this is the `void` keyword
    pub fn is_void(&self) -> bool {
        matches!(
            self,
            TypeNode::Keyword {
                keyword: Keyword::Void
            }
        )
    }
}

/// A generic type parameter declaration (`T`, `T extends Foo = Bar`)
///
/// Only the name participates in JSDoc output (`@template T`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParam {
    /// Parameter name
    pub name: String,

    /// Constraint (extends clause)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub constraint: Option<TypeNode>,

    /// Default type
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<TypeNode>,
}

impl TypeParam {
    /// Create a type parameter with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
            default: None,
        }
    }

    /// Set the constraint
    pub fn with_constraint(mut self, constraint: TypeNode) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_ident() {
        assert_eq!(TypeName::Ident("Foo".into()).as_ident(), Some("Foo"));
        assert_eq!(TypeName::Qualified("ns.Foo".into()).as_ident(), None);
        assert_eq!(TypeName::Qualified("ns.Foo".into()).text(), "ns.Foo");
    }

    #[test]
    fn test_is_void() {
        assert!(TypeNode::void().is_void());
        assert!(!TypeNode::string().is_void());
        assert!(!TypeNode::simple_ref("void").is_void());
    }

    #[test]
    fn test_type_node_serialization() {
        let ty = TypeNode::union(vec![TypeNode::string(), TypeNode::simple_ref("Foo")]);
        let json = serde_json::to_string(&ty).unwrap();
        assert!(json.contains("\"kind\":\"union\""));
        assert!(json.contains("\"keyword\":\"string\""));

        let back: TypeNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}
