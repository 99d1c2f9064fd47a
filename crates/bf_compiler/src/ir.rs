//! Tagged intermediate representation of a component's JSX tree.
//!
//! IR nodes are constructed once during transformation (`transform.rs`) and
//! are immutable thereafter — both emitters (`server/`, `client.rs`) only
//! read them.

/// Compiler-assigned id for an element requiring client addressability.
/// Unique within its component; allocated by `IdAllocator` in traversal
/// order so that recompiling unchanged source yields the same ids.
pub type ElementId = u32;

#[derive(Debug, Default)]
pub struct IdAllocator {
    next: ElementId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> ElementId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// One part of a template literal: literal text or an embedded expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    Literal(String),
    Expr(String),
}

/// Classification of an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// A plain string literal.
    StaticLiteral(String),
    /// `on<EventName>={...}` — event name (lowercased, without `on`) and the
    /// handler's textual form.
    EventHandler {
        event_name: String,
        handler_text: String,
    },
    /// `ref={...}` — the callback's textual form.
    Ref(String),
    /// An expression that depends on a signal getter, memo getter, prop, or
    /// reactively-used local variable.
    Dynamic(String),
    /// A template-literal-valued attribute, e.g. `class={\`a ${b()}\`}`.
    TemplateLiteral(Vec<TemplatePart>),
}

impl AttrValue {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, AttrValue::Dynamic(_) | AttrValue::TemplateLiteral(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

/// An interpolated expression inside text content: `{expr}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    /// The expression's textual form, as written in source.
    pub expr_text: String,
    /// Set when this interpolation is one part of a larger string
    /// concatenation that has a non-reactive fallback rendering.
    pub fallback_concat: Option<String>,
}

/// `cond ? A : B` or `cond && A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub id: ElementId,
    pub condition_text: String,
    pub when_true: Box<IrNode>,
    pub when_false: Box<IrNode>,
}

/// `array.map((item[, index]) => JSX)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    pub id: ElementId,
    pub array_expr: String,
    pub item_param: String,
    pub index_param: Option<String>,
    /// The `key={...}` expression captured from the item root, if any.
    pub key_expr: Option<String>,
    pub item_template: Box<IrNode>,
}

/// A JSX tag referencing another component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildComponentNode {
    pub name: String,
    /// The literal props-object expression, textual form.
    pub props_expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub id: ElementId,
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<IrNode>,
    pub key_expr: Option<String>,
    pub ref_callback: Option<String>,
}

impl ElementNode {
    pub fn has_event_handlers(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| matches!(a.value, AttrValue::EventHandler { .. }))
    }

    pub fn dynamic_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.value.is_dynamic())
    }

    /// True when the element's sole child is an interpolation, or its
    /// children reduce to a single dynamic template literal.
    pub fn has_dynamic_text_child(&self) -> bool {
        match self.children.as_slice() {
            [IrNode::Interpolation(_)] => true,
            [IrNode::TemplateLiteral(parts)] => parts.iter().any(|p| matches!(p, TemplatePart::Expr(_))),
            _ => false,
        }
    }
}

/// A tagged IR node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrNode {
    Element(ElementNode),
    Text(String),
    Interpolation(Interpolation),
    Conditional(Conditional),
    List(ListNode),
    ChildComponent(ChildComponentNode),
    /// An ordered sequence of children with no wrapper element.
    Fragment(Vec<IrNode>),
    TemplateLiteral(Vec<TemplatePart>),
}

impl IrNode {
    /// True for nodes that render as exactly one DOM element (used to decide
    /// whether a conditional branch needs the comment-pair fallback).
    pub fn is_single_element(&self) -> bool {
        matches!(self, IrNode::Element(_))
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self, IrNode::Fragment(_))
    }

    /// Render an empty fragment, used for the missing branch of `cond && A`.
    pub fn empty_fragment() -> Self {
        IrNode::Fragment(Vec::new())
    }
}
