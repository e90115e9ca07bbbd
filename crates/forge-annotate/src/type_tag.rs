//! Type tag encoding
//!
//! Converts a type expression into the short tag used inside JSDoc braces
//! (`{string}`, `{Getter}`, `{function}`). The mapping is intentionally
//! narrow: shapes without an encoding produce the empty tag instead of an
//! error, and the surrounding annotation still renders (`@param {} x`).

use crate::types::{Keyword, TypeNode};

/// Encode a type expression as a JSDoc type tag
///
/// - named references to a simple identifier encode as the identifier,
///   type arguments are dropped (`Promise<string>` -> `Promise`)
/// - `undefined`, `null`, `boolean`, `number` and `string` encode as
///   themselves
/// - the `function` keyword and function types encode as `function`
/// - everything else encodes as `""`
pub fn type_tag(ty: &TypeNode) -> String {
    match ty {
        TypeNode::TypeRef { name, .. } => match name.as_ident() {
            Some(ident) => ident.to_string(),
            None => String::new(),
        },
        TypeNode::Keyword { keyword } => keyword_tag(*keyword).to_string(),
        TypeNode::Function => "function".to_string(),
        TypeNode::Union { .. } | TypeNode::Intersection { .. } | TypeNode::Other { .. } => {
            String::new()
        }
    }
}

fn keyword_tag(keyword: Keyword) -> &'static str {
    match keyword {
        Keyword::Undefined
        | Keyword::Null
        | Keyword::Boolean
        | Keyword::Number
        | Keyword::String
        | Keyword::Function => keyword.as_str(),
        Keyword::Void
        | Keyword::Any
        | Keyword::Unknown
        | Keyword::Never
        | Keyword::Object
        | Keyword::Symbol
        | Keyword::BigInt => "",
    }
}

/// Encode each member of a union or intersection and join the tags
///
/// Members keep their source order.
pub fn joined_type_tag(types: &[TypeNode], separator: &str) -> String {
    types.iter().map(type_tag).collect::<Vec<_>>().join(separator)
}
