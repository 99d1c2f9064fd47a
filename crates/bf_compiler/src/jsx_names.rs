//! Small JSX name-extraction helpers shared by the transformer and analyzer.

use oxc_ast::ast::{JSXAttributeName, JSXElementName, JSXMemberExpression, JSXMemberExpressionObject};

pub fn jsx_element_name(name: &JSXElementName<'_>) -> String {
    match name {
        JSXElementName::Identifier(ident) => ident.name.to_string(),
        JSXElementName::IdentifierReference(ident) => ident.name.to_string(),
        JSXElementName::NamespacedName(ns) => {
            format!("{}:{}", ns.namespace.name, ns.name.name)
        }
        JSXElementName::MemberExpression(expr) => jsx_member_expression_name(expr),
        JSXElementName::ThisExpression(_) => "this".to_string(),
    }
}

fn jsx_member_expression_name(expr: &JSXMemberExpression<'_>) -> String {
    let object_name = match &expr.object {
        JSXMemberExpressionObject::IdentifierReference(ident) => ident.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(inner) => jsx_member_expression_name(inner),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{object_name}.{}", expr.property.name)
}

pub fn jsx_attribute_name(name: &JSXAttributeName<'_>) -> String {
    match name {
        JSXAttributeName::Identifier(ident) => ident.name.to_string(),
        JSXAttributeName::NamespacedName(ns) => {
            format!("{}:{}", ns.namespace.name, ns.name.name)
        }
    }
}

/// A JSX tag name that refers to a component rather than an HTML element:
/// starts uppercase, or is a dotted/namespaced reference.
pub fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) || name.contains('.')
}

/// Whether `name` appears in `text` as a whole identifier, not as a
/// substring of a longer one — a plain `str::contains` would wrongly match
/// e.g. `n` inside `name` or `LABEL` inside `LABELS`. Used wherever the
/// compiler classifies a binding as "referenced" by scanning an expression's
/// textual form rather than its parsed AST.
pub fn references_identifier(text: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let is_ident_char = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    let mut rest = text;
    while let Some(pos) = rest.find(name) {
        let before = rest[..pos].chars().next_back();
        let after = rest[pos + name.len()..].chars().next();
        let boundary_before = before.is_none_or(|c| !is_ident_char(c));
        let boundary_after = after.is_none_or(|c| !is_ident_char(c));
        if boundary_before && boundary_after {
            return true;
        }
        rest = &rest[pos + name.len()..];
    }
    false
}
