//! Client-needs analyzer & element-path planner.
//!
//! Walks a component's IR once and produces the addressability side-table
//! both emitters consult while they independently walk the same IR to
//! produce their own output: a DOM navigation path (or `Null`, meaning "use
//! the `data-bf` sentinel") per element, the five needs collections, and the
//! delegation ids assigned to event handlers inside list-item templates.
//!
//! Elements nested inside a list's item template or a conditional's
//! branches are never individually path-addressed — their row/branch count
//! is runtime-dependent — the `Null` path is a deliberate fallback, not a
//! missing case.
//! Their content is instead regenerated wholesale as template text each time
//! the list reconciler or conditional effect runs; only interactive elements
//! inside a *list* item need a stable identity, which the event-delegation
//! table (`data-event-id`) gives them without any DOM lookup.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::component::Component;
use crate::ir::{AttrValue, ElementId, ElementNode, IrNode, ListNode};

/// An element's DOM navigation path from the component scope, or the
/// fallback sentinel when no deterministic path exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementPath {
    /// `firstElementChild`/`nextElementSibling` steps joined with `.`; the
    /// empty string names the scope element itself.
    Known(String),
    /// No deterministic path — locate with `data-bf="<id>"` instead.
    Null,
}

impl ElementPath {
    pub fn as_known(&self) -> Option<&str> {
        match self {
            ElementPath::Known(p) => Some(p),
            ElementPath::Null => None,
        }
    }
}

/// The five needs collections the client emitter consults, plus path/delegation
/// side-tables. Lookups only — the emitters still walk `Component::ir`
/// themselves to produce nested markup/code.
#[derive(Debug, Default)]
pub struct Needs {
    pub paths: FxHashMap<ElementId, ElementPath>,
    /// Union of every element needing client addressability: interactive ∪
    /// dynamic-text ∪ dynamic-attr ∪ ref ∪ list roots ∪ conditional roots.
    pub addressable: FxHashSet<ElementId>,
    pub interactive: FxHashSet<ElementId>,
    pub dynamic_text: FxHashSet<ElementId>,
    pub dynamic_attrs: FxHashSet<ElementId>,
    pub refs: FxHashSet<ElementId>,
    /// List ids in document order.
    pub lists: Vec<ElementId>,
    /// Conditional ids in document order.
    pub conditionals: Vec<ElementId>,
    /// The element whose children a list reconciles. `None` means the
    /// list sits directly at the component root with no wrapping element,
    /// so the component scope itself is the reconciliation root.
    pub list_container: FxHashMap<ElementId, Option<ElementId>>,
    pub conditional_container: FxHashMap<ElementId, Option<ElementId>>,
    /// `(element id inside a list item template, event name) -> delegation id`.
    /// The same string is emitted server-side as `data-event-id`.
    pub delegated_events: FxHashMap<(ElementId, String), String>,
    /// Attribute names on `dynamic_attrs` elements that actually depend on a
    /// prop/signal/memo, as opposed to a local variable or module constant.
    /// A dynamic-shaped attribute that references neither still renders
    /// correctly server-side via its `${expr}`
    /// interpolation; it just never needs a client-side `createEffect`,
    /// since nothing it depends on can change after the initial render.
    pub reactive_attrs: FxHashMap<ElementId, FxHashSet<String>>,
}

impl Needs {
    pub fn path(&self, id: ElementId) -> ElementPath {
        self.paths.get(&id).cloned().unwrap_or(ElementPath::Null)
    }
}

#[derive(Default)]
struct WalkState {
    prev_element_path: Option<String>,
    broken: bool,
}

/// Analyze one component's IR. Returns empty `Needs` for a component with no
/// IR (failed transform — the driver already recorded a diagnostic).
pub fn analyze(component: &Component) -> Needs {
    let mut needs = Needs::default();
    let Some(ir) = &component.ir else {
        return needs;
    };

    match ir {
        IrNode::Element(el) => {
            needs.paths.insert(el.id, ElementPath::Known(String::new()));
            register_own_needs(el, component, &mut needs);
            register_containers(&el.children, Some(el.id), &mut needs);
            let mut state = WalkState::default();
            walk_children(&el.children, Some(""), component, &mut state, &mut needs);
        }
        other => {
            let top_level: Vec<&IrNode> = match other {
                IrNode::Fragment(children) => children.iter().collect(),
                single => vec![single],
            };
            register_containers_refs(&top_level, None, &mut needs);
            let mut state = WalkState::default();
            walk_children_refs(top_level.iter().copied(), Some(""), component, &mut state, &mut needs);
        }
    }

    needs
}

fn join_path(base: &str, step: &str) -> String {
    if base.is_empty() { step.to_string() } else { format!("{base}.{step}") }
}

fn next_path(parent_path: Option<&str>, state: &WalkState) -> Option<String> {
    if state.broken {
        return None;
    }
    match &state.prev_element_path {
        Some(prev) => Some(join_path(prev, "nextElementSibling")),
        None => parent_path.map(|p| join_path(p, "firstElementChild")),
    }
}

fn walk_children(
    children: &[IrNode],
    parent_path: Option<&str>,
    component: &Component,
    state: &mut WalkState,
    needs: &mut Needs,
) {
    walk_children_refs(children.iter(), parent_path, component, state, needs);
}

fn walk_children_refs<'a>(
    children: impl Iterator<Item = &'a IrNode>,
    parent_path: Option<&str>,
    component: &Component,
    state: &mut WalkState,
    needs: &mut Needs,
) {
    for child in children {
        match child {
            IrNode::Element(el) => {
                let path = next_path(parent_path, state);
                needs
                    .paths
                    .insert(el.id, path.clone().map(ElementPath::Known).unwrap_or(ElementPath::Null));
                register_own_needs(el, component, needs);
                register_containers(&el.children, Some(el.id), needs);
                let mut child_state = WalkState::default();
                walk_children(&el.children, path.as_deref(), component, &mut child_state, needs);
                state.prev_element_path = path;
            }
            IrNode::Fragment(inner) => {
                walk_children(inner, parent_path, component, state, needs);
            }
            IrNode::ChildComponent(_) => {
                state.broken = true;
            }
            IrNode::List(list) => {
                let path = next_path(parent_path, state);
                needs.lists.push(list.id);
                needs
                    .paths
                    .insert(list.id, path.clone().map(ElementPath::Known).unwrap_or(ElementPath::Null));
                collect_item_interactive(&list.item_template, needs);
                state.broken = true;
            }
            IrNode::Conditional(cond) => {
                let path = next_path(parent_path, state);
                needs.conditionals.push(cond.id);
                needs
                    .paths
                    .insert(cond.id, path.clone().map(ElementPath::Known).unwrap_or(ElementPath::Null));
                state.broken = true;
            }
            IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) => {}
        }
    }
}

fn register_own_needs(el: &ElementNode, component: &Component, needs: &mut Needs) {
    if el.has_event_handlers() {
        needs.interactive.insert(el.id);
        needs.addressable.insert(el.id);
    }
    for attr in el.dynamic_attributes() {
        if !attr_value_references_reactive(&attr.value, component) {
            continue;
        }
        needs.dynamic_attrs.insert(el.id);
        needs.reactive_attrs.entry(el.id).or_default().insert(attr.name.clone());
        needs.addressable.insert(el.id);
    }
    if el.has_dynamic_text_child() && text_child_references_reactive(el, component) {
        needs.dynamic_text.insert(el.id);
        needs.addressable.insert(el.id);
    }
    if el.ref_callback.is_some() {
        needs.refs.insert(el.id);
        needs.addressable.insert(el.id);
    }
}

/// Whether a dynamic-shaped attribute value actually depends on a
/// prop/signal/memo rather than only on a local variable or module
/// constant — see [`Needs::reactive_attrs`].
fn attr_value_references_reactive(value: &crate::ir::AttrValue, component: &Component) -> bool {
    match value {
        crate::ir::AttrValue::Dynamic(expr) => component.expr_references_reactive_binding(expr),
        crate::ir::AttrValue::TemplateLiteral(parts) => parts.iter().any(|part| match part {
            crate::ir::TemplatePart::Expr(expr) => component.expr_references_reactive_binding(expr),
            crate::ir::TemplatePart::Literal(_) => false,
        }),
        crate::ir::AttrValue::StaticLiteral(_)
        | crate::ir::AttrValue::EventHandler { .. }
        | crate::ir::AttrValue::Ref(_) => false,
    }
}

/// Whether an element's sole dynamic-text-shaped child actually depends on a
/// prop/signal/memo — mirrors `attr_value_references_reactive` for text
/// content.
fn text_child_references_reactive(el: &ElementNode, component: &Component) -> bool {
    match el.children.as_slice() {
        [IrNode::Interpolation(interp)] => component.expr_references_reactive_binding(&interp.expr_text),
        [IrNode::TemplateLiteral(parts)] => parts.iter().any(|part| match part {
            crate::ir::TemplatePart::Expr(expr) => component.expr_references_reactive_binding(expr),
            crate::ir::TemplatePart::Literal(_) => false,
        }),
        _ => false,
    }
}

/// Find `List`/`Conditional` nodes directly among `children` (looking
/// through, but not past, nested fragments) and record their containing
/// element so the client emitter knows which local binding is the
/// reconciliation/effect root.
fn register_containers(children: &[IrNode], container: Option<ElementId>, needs: &mut Needs) {
    let refs: Vec<&IrNode> = children.iter().collect();
    register_containers_refs(&refs, container, needs);
}

fn register_containers_refs(children: &[&IrNode], container: Option<ElementId>, needs: &mut Needs) {
    for child in children {
        match child {
            IrNode::List(list) => {
                needs.list_container.insert(list.id, container);
                if let Some(id) = container {
                    needs.addressable.insert(id);
                }
            }
            IrNode::Conditional(cond) => {
                needs.conditional_container.insert(cond.id, container);
                if let Some(id) = container {
                    needs.addressable.insert(id);
                }
            }
            IrNode::Fragment(inner) => register_containers(inner, container, needs),
            _ => {}
        }
    }
}

/// Recursively scan a list's item template for interactive elements and
/// assign each a delegation id. List-item elements
/// are never individually path-addressed: the template is regenerated
/// wholesale on every reconcile, so a `querySelector`-style lookup would be
/// stale the moment the reconciler reorders rows.
fn collect_item_interactive(node: &IrNode, needs: &mut Needs) {
    match node {
        IrNode::Element(el) => {
            if el.has_event_handlers() {
                needs.interactive.insert(el.id);
                for attr in &el.attributes {
                    if let AttrValue::EventHandler { event_name, .. } = &attr.value {
                        needs
                            .delegated_events
                            .insert((el.id, event_name.clone()), format!("e{}", el.id));
                    }
                }
            }
            for child in &el.children {
                collect_item_interactive(child, needs);
            }
        }
        IrNode::Fragment(children) => {
            for child in children {
                collect_item_interactive(child, needs);
            }
        }
        IrNode::Conditional(cond) => {
            collect_item_interactive(&cond.when_true, needs);
            collect_item_interactive(&cond.when_false, needs);
        }
        IrNode::List(ListNode { item_template, .. }) => {
            collect_item_interactive(item_template, needs);
        }
        IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) | IrNode::ChildComponent(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::extractor::extract_file;

    fn analyze_source(source: &str) -> Needs {
        let mut diagnostics = Diagnostics::new();
        let file = extract_file("C.tsx", source, &mut diagnostics).expect("parses");
        analyze(&file.components[0])
    }

    #[test]
    fn path_chaining_reuses_prior_hop() {
        let needs = analyze_source(
            r"
            function C() {
                const [n, setN] = createSignal(0);
                return (<div><p>{n()}</p><span>{n()}</span></div>);
            }
            ",
        );
        // `<div>` is the scope root (path "").
        // `<p>` is firstElementChild; `<span>` chains off `<p>`'s path.
        let p_path = needs.paths.values().find_map(|p| match p {
            ElementPath::Known(s) if s == "firstElementChild" => Some(s.clone()),
            _ => None,
        });
        assert!(p_path.is_some());
        let span_path = needs.paths.values().any(|p| {
            matches!(p, ElementPath::Known(s) if s == "firstElementChild.nextElementSibling")
        });
        assert!(span_path, "expected chained path, got {:?}", needs.paths);
    }

    #[test]
    fn element_after_child_component_is_null_path() {
        let needs = analyze_source(
            r"
            function C() {
                return (<div><Child/><p>after</p></div>);
            }
            ",
        );
        assert!(needs.paths.values().any(|p| matches!(p, ElementPath::Null)));
    }

    #[test]
    fn list_item_handler_gets_delegation_id() {
        let needs = analyze_source(
            r"
            function C() {
                return (<ul>{todos().map(t => <li key={t.id}><button onClick={() => remove(t.id)}>x</button></li>)}</ul>);
            }
            ",
        );
        assert_eq!(needs.delegated_events.len(), 1);
        assert_eq!(needs.lists.len(), 1);
    }
}
