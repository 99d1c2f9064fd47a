//! JSX → IR transformer.
//!
//! Walks the single JSX expression a component returns and converts it into
//! an [`IrNode`] tree. Attribute/expression/condition text is taken directly
//! from the original source via span slicing rather than re-serialized, so
//! each dynamic piece keeps its exact textual form.

use oxc_ast::ast::{
    Argument, BindingPatternKind, Expression, JSXAttributeItem, JSXAttributeValue, JSXChild,
    JSXElement, JSXExpressionContainer, JSXFragment, LogicalOperator,
};
use oxc_ast_visit::Visit;
use oxc_span::GetSpan;

use crate::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::ir::{
    AttrValue, ChildComponentNode, Conditional, ElementNode, IdAllocator, Interpolation, IrNode,
    ListNode, TemplatePart,
};
use crate::jsx_names::{is_component_name, jsx_attribute_name, jsx_element_name};

/// The reactive names a component's expressions may depend on — enough
/// context for attribute/text classification without depending on the full
/// `Component` type.
pub struct ReactiveScope<'a> {
    pub props: &'a [String],
    pub signals: &'a [String],
    pub memos: &'a [String],
    pub local_variables: &'a [String],
}

impl ReactiveScope<'_> {
    fn contains(&self, name: &str) -> bool {
        self.props.iter().any(|p| p == name)
            || self.signals.iter().any(|s| s == name)
            || self.memos.iter().any(|m| m == name)
            || self.local_variables.iter().any(|v| v == name)
    }
}

/// Collects identifier references within an expression so the transformer
/// can decide whether it depends on reactive state.
#[derive(Default)]
struct IdentifierCollector {
    names: rustc_hash::FxHashSet<String>,
}

impl<'a> Visit<'a> for IdentifierCollector {
    fn visit_identifier_reference(&mut self, ident: &oxc_ast::ast::IdentifierReference<'a>) {
        self.names.insert(ident.name.as_str().to_string());
    }
}

fn expr_is_dynamic(expr: &Expression, scope: &ReactiveScope) -> bool {
    let mut collector = IdentifierCollector::default();
    collector.visit_expression(expr);
    collector.names.iter().any(|n| scope.contains(n))
}

/// Top-level entry: transform a component's JSX/fragment return expression.
///
/// Returns `None` (with an `Unsupported` diagnostic pushed) when `expr`
/// isn't a JSX element or fragment — i.e. the return cannot be statically
/// analyzed.
pub fn transform_root(
    expr: &Expression,
    source_text: &str,
    file_path: &str,
    component_name: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> Option<IrNode> {
    match expr {
        Expression::JSXElement(el) => Some(transform_jsx_element(el, source_text, scope, ids, diagnostics)),
        Expression::JSXFragment(frag) => Some(transform_jsx_fragment(frag, source_text, scope, ids, diagnostics)),
        _ => {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::Unsupported,
                "non-jsx-return",
                file_path,
                format!(
                    "component `{component_name}` does not return a JSX element or fragment that can be statically analyzed"
                ),
            ));
            None
        }
    }
}

fn transform_jsx_fragment(
    frag: &JSXFragment,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> IrNode {
    IrNode::Fragment(transform_children(&frag.children, source_text, scope, ids, diagnostics))
}

fn transform_children(
    children: &[JSXChild],
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> Vec<IrNode> {
    children
        .iter()
        .filter_map(|child| transform_jsx_child(child, source_text, scope, ids, diagnostics))
        .collect()
}

fn transform_jsx_child(
    child: &JSXChild,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> Option<IrNode> {
    match child {
        JSXChild::Element(el) => Some(transform_jsx_element(el, source_text, scope, ids, diagnostics)),
        JSXChild::Fragment(frag) => Some(transform_jsx_fragment(frag, source_text, scope, ids, diagnostics)),
        JSXChild::Text(text) => {
            let trimmed = text.value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(IrNode::Text(trimmed.to_string()))
            }
        }
        JSXChild::ExpressionContainer(container) => {
            transform_expression_container(container, source_text, scope, ids, diagnostics)
        }
        JSXChild::Spread(_) => None,
    }
}

fn transform_expression_container(
    container: &JSXExpressionContainer,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> Option<IrNode> {
    let expr = container.expression.as_expression()?;

    if let Some(conditional) = try_transform_conditional(expr, source_text, scope, ids, diagnostics) {
        return Some(conditional);
    }
    if let Some(list) = try_transform_list(expr, source_text, scope, ids, diagnostics) {
        return Some(list);
    }
    if let Some(child) = try_transform_child_component_expr(expr, source_text, scope, ids, diagnostics) {
        return Some(child);
    }
    if let Some(parts) = flatten_concat(expr, source_text) {
        return Some(IrNode::TemplateLiteral(parts));
    }
    if let Expression::TemplateLiteral(tmpl) = expr {
        return Some(IrNode::TemplateLiteral(template_literal_parts(tmpl, source_text)));
    }

    Some(IrNode::Interpolation(Interpolation {
        expr_text: expr.span().source_text(source_text).to_string(),
        fallback_concat: None,
    }))
}

/// A child expression that is itself just a JSX element/fragment wrapped in
/// braces, e.g. `{<Child/>}` — treated the same as an inline child.
fn try_transform_child_component_expr(
    expr: &Expression,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> Option<IrNode> {
    match expr {
        Expression::JSXElement(el) => Some(transform_jsx_element(el, source_text, scope, ids, diagnostics)),
        Expression::JSXFragment(frag) => Some(transform_jsx_fragment(frag, source_text, scope, ids, diagnostics)),
        _ => None,
    }
}

fn try_transform_conditional(
    expr: &Expression,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> Option<IrNode> {
    match expr {
        Expression::ConditionalExpression(cond) => {
            let id = ids.next_id();
            let when_true = transform_branch(&cond.consequent, source_text, scope, ids, diagnostics);
            let when_false = transform_branch(&cond.alternate, source_text, scope, ids, diagnostics);
            Some(IrNode::Conditional(Conditional {
                id,
                condition_text: cond.test.span().source_text(source_text).to_string(),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
            }))
        }
        Expression::LogicalExpression(logical) if logical.operator == LogicalOperator::And => {
            let id = ids.next_id();
            let when_true = transform_branch(&logical.right, source_text, scope, ids, diagnostics);
            Some(IrNode::Conditional(Conditional {
                id,
                condition_text: logical.left.span().source_text(source_text).to_string(),
                when_true: Box::new(when_true),
                // The missing branch of `cond && A` renders as an empty fragment.
                when_false: Box::new(IrNode::empty_fragment()),
            }))
        }
        _ => None,
    }
}

fn transform_branch(
    expr: &Expression,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> IrNode {
    match expr {
        Expression::JSXElement(el) => transform_jsx_element(el, source_text, scope, ids, diagnostics),
        Expression::JSXFragment(frag) => transform_jsx_fragment(frag, source_text, scope, ids, diagnostics),
        Expression::ParenthesizedExpression(inner) => {
            transform_branch(&inner.expression, source_text, scope, ids, diagnostics)
        }
        // A branch that is just `null`/another non-JSX expression renders nothing.
        _ => IrNode::empty_fragment(),
    }
}

/// Detects `arrayExpr.map((item[, index]) => JSX)`.
fn try_transform_list(
    expr: &Expression,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> Option<IrNode> {
    let Expression::CallExpression(call) = expr else {
        return None;
    };
    let Expression::StaticMemberExpression(member) = &call.callee else {
        return None;
    };
    if member.property.name.as_str() != "map" {
        return None;
    }
    let Some(Argument::ArrowFunctionExpression(arrow)) = call.arguments.first() else {
        return None;
    };

    let mut params = arrow.params.items.iter();
    let item_param = params
        .next()
        .and_then(|p| binding_name(&p.pattern.kind))
        .unwrap_or_else(|| "item".to_string());
    let index_param = params.next().and_then(|p| binding_name(&p.pattern.kind));

    let body_expr = arrow.get_expression()?;
    let (key_expr, item_scope_locals);
    let item_template = match body_expr {
        Expression::JSXElement(el) => {
            let mut locals = scope.local_variables.to_vec();
            locals.push(item_param.clone());
            item_scope_locals = locals;
            let item_scope = ReactiveScope {
                props: scope.props,
                signals: scope.signals,
                memos: scope.memos,
                local_variables: &item_scope_locals,
            };
            key_expr = extract_key_attribute(el, source_text);
            transform_jsx_element(el, source_text, &item_scope, ids, diagnostics)
        }
        _ => {
            diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Analysis,
                "list-item-not-element",
                "",
                "list item template is not a single JSX element; key expression cannot be captured",
            ));
            key_expr = None;
            transform_branch(body_expr, source_text, scope, ids, diagnostics)
        }
    };

    Some(IrNode::List(ListNode {
        id: ids.next_id(),
        array_expr: member.object.span().source_text(source_text).to_string(),
        item_param,
        index_param,
        key_expr,
        item_template: Box::new(item_template),
    }))
}

fn extract_key_attribute(el: &JSXElement, source_text: &str) -> Option<String> {
    el.opening_element.attributes.iter().find_map(|attr| {
        let JSXAttributeItem::Attribute(attr) = attr else {
            return None;
        };
        if jsx_attribute_name(&attr.name) != "key" {
            return None;
        }
        attribute_value_text(attr.value.as_ref(), source_text)
    })
}

fn attribute_value_text(value: Option<&JSXAttributeValue>, source_text: &str) -> Option<String> {
    match value {
        Some(JSXAttributeValue::StringLiteral(lit)) => Some(format!("\"{}\"", lit.value)),
        Some(JSXAttributeValue::ExpressionContainer(container)) => container
            .expression
            .as_expression()
            .map(|e| e.span().source_text(source_text).to_string()),
        _ => None,
    }
}

fn binding_name(kind: &BindingPatternKind) -> Option<String> {
    match kind {
        BindingPatternKind::BindingIdentifier(id) => Some(id.name.as_str().to_string()),
        _ => None,
    }
}

fn transform_jsx_element(
    el: &JSXElement,
    source_text: &str,
    scope: &ReactiveScope,
    ids: &mut IdAllocator,
    diagnostics: &mut Diagnostics,
) -> IrNode {
    let name = jsx_element_name(&el.opening_element.name);

    if is_component_name(&name) {
        return IrNode::ChildComponent(ChildComponentNode {
            name,
            props_expr: build_props_object_text(el, source_text),
        });
    }

    let id = ids.next_id();
    let mut key_expr = None;
    let mut ref_callback = None;
    let mut attributes = Vec::new();

    for attr_item in &el.opening_element.attributes {
        match attr_item {
            JSXAttributeItem::Attribute(attr) => {
                let attr_name = jsx_attribute_name(&attr.name);
                match attr_name.as_str() {
                    "key" => key_expr = attribute_value_text(attr.value.as_ref(), source_text),
                    "ref" => ref_callback = attribute_value_text(attr.value.as_ref(), source_text),
                    _ => attributes.push(crate::ir::Attribute {
                        name: attr_name.clone(),
                        value: classify_attribute_value(&attr_name, attr.value.as_ref(), source_text, scope),
                    }),
                }
            }
            JSXAttributeItem::SpreadAttribute(spread) => attributes.push(crate::ir::Attribute {
                name: "...".to_string(),
                value: AttrValue::Dynamic(spread.argument.span().source_text(source_text).to_string()),
            }),
        }
    }

    let children = transform_children(&el.children, source_text, scope, ids, diagnostics);

    IrNode::Element(ElementNode {
        id,
        tag: name,
        attributes,
        children,
        key_expr,
        ref_callback,
    })
}

fn classify_attribute_value(
    attr_name: &str,
    value: Option<&JSXAttributeValue>,
    source_text: &str,
    scope: &ReactiveScope,
) -> AttrValue {
    if let Some(event_name) = attr_name.strip_prefix("on").filter(|rest| {
        rest.chars().next().is_some_and(char::is_uppercase)
    }) {
        let handler_text = attribute_value_text(value, source_text).unwrap_or_default();
        return AttrValue::EventHandler {
            event_name: event_name.to_ascii_lowercase(),
            handler_text,
        };
    }

    match value {
        None => AttrValue::StaticLiteral(String::new()),
        Some(JSXAttributeValue::StringLiteral(lit)) => AttrValue::StaticLiteral(lit.value.to_string()),
        Some(JSXAttributeValue::ExpressionContainer(container)) => {
            let Some(expr) = container.expression.as_expression() else {
                return AttrValue::StaticLiteral(String::new());
            };
            match expr {
                Expression::StringLiteral(lit) => AttrValue::StaticLiteral(lit.value.to_string()),
                Expression::TemplateLiteral(tmpl) => {
                    AttrValue::TemplateLiteral(template_literal_parts(tmpl, source_text))
                }
                _ if expr_is_dynamic(expr, scope) => {
                    AttrValue::Dynamic(expr.span().source_text(source_text).to_string())
                }
                _ => AttrValue::StaticLiteral(expr.span().source_text(source_text).to_string()),
            }
        }
        _ => AttrValue::StaticLiteral(String::new()),
    }
}

fn template_literal_parts(tmpl: &oxc_ast::ast::TemplateLiteral, source_text: &str) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut expr_iter = tmpl.expressions.iter();
    for quasi in &tmpl.quasis {
        let raw = quasi.value.raw.as_str();
        if !raw.is_empty() {
            parts.push(TemplatePart::Literal(raw.to_string()));
        }
        if !quasi.tail {
            if let Some(expr) = expr_iter.next() {
                parts.push(TemplatePart::Expr(expr.span().source_text(source_text).to_string()));
            }
        }
    }
    parts
}

/// Flattens a `"literal" + expr + "literal"` binary-concatenation chain into
/// template parts. Returns `None` when `expr` isn't such a chain.
fn flatten_concat(expr: &Expression, source_text: &str) -> Option<Vec<TemplatePart>> {
    let Expression::BinaryExpression(bin) = expr else {
        return None;
    };
    if bin.operator != oxc_ast::ast::BinaryOperator::Addition {
        return None;
    }

    let mut parts = Vec::new();
    flatten_concat_into(&bin.left, source_text, &mut parts)?;
    flatten_concat_into(&bin.right, source_text, &mut parts)?;
    // Merge adjacent literal parts produced by recursion.
    let mut merged: Vec<TemplatePart> = Vec::with_capacity(parts.len());
    for part in parts {
        if let (Some(TemplatePart::Literal(prev)), TemplatePart::Literal(next)) =
            (merged.last_mut(), &part)
        {
            prev.push_str(next);
        } else {
            merged.push(part);
        }
    }
    Some(merged)
}

fn flatten_concat_into(expr: &Expression, source_text: &str, out: &mut Vec<TemplatePart>) -> Option<()> {
    match expr {
        Expression::StringLiteral(lit) => {
            out.push(TemplatePart::Literal(lit.value.to_string()));
            Some(())
        }
        Expression::BinaryExpression(bin) if bin.operator == oxc_ast::ast::BinaryOperator::Addition => {
            flatten_concat_into(&bin.left, source_text, out)?;
            flatten_concat_into(&bin.right, source_text, out)
        }
        Expression::ParenthesizedExpression(inner) => flatten_concat_into(&inner.expression, source_text, out),
        _ => {
            out.push(TemplatePart::Expr(expr.span().source_text(source_text).to_string()));
            Some(())
        }
    }
}

/// Builds the literal props-object text for a child-component invocation
/// from its JSX attributes. Event-handler attributes are stripped from the
/// server-side props object, since the child hydrates its own listeners, but
/// the analyzer still counts them when it walks parent client code for
/// references.
fn build_props_object_text(el: &JSXElement, source_text: &str) -> String {
    let mut entries = Vec::new();
    for attr_item in &el.opening_element.attributes {
        match attr_item {
            JSXAttributeItem::Attribute(attr) => {
                let name = jsx_attribute_name(&attr.name);
                if name.starts_with("on") && name.chars().nth(2).is_some_and(char::is_uppercase) {
                    continue;
                }
                let value_text = attribute_value_text(attr.value.as_ref(), source_text)
                    .unwrap_or_else(|| "true".to_string());
                entries.push(format!("{name}: {value_text}"));
            }
            JSXAttributeItem::SpreadAttribute(spread) => {
                entries.push(format!("...{}", spread.argument.span().source_text(source_text)));
            }
        }
    }
    format!("{{ {} }}", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    #[test]
    fn conditional_with_fragment_branch_gets_an_id() {
        let allocator = Allocator::default();
        let src = "(open ? (<><h1>A</h1><p>B</p></>) : <span>C</span>);";
        let ret = Parser::new(&allocator, src, SourceType::tsx()).parse();
        assert!(ret.errors.is_empty(), "{:?}", ret.errors);
        let oxc_ast::ast::Statement::ExpressionStatement(stmt) = &ret.program.body[0] else {
            panic!("expected expression statement")
        };
        let expr = &stmt.expression;
        let scope = ReactiveScope {
            props: &[],
            signals: &["open".to_string()],
            memos: &[],
            local_variables: &[],
        };
        let mut ids = IdAllocator::new();
        let mut diagnostics = Diagnostics::new();
        let node = transform_branch(expr, src, &scope, &mut ids, &mut diagnostics);
        match node {
            IrNode::Conditional(cond) => {
                assert!(cond.when_true.is_fragment());
                assert!(cond.when_false.is_single_element());
            }
            other => panic!("expected conditional, got {other:?}"),
        }
    }
}
