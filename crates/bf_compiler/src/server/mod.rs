//! Server emitter and its adapter interface.
//!
//! The core walks a component's IR exactly once and produces the inner HTML
//! text with every obligation already applied — `data-bf` sentinels, the
//! scope marker, the props script, list/conditional markers, event-handler
//! elision. The [`ServerAdapter`] only decides textual
//! packaging around that text: the function signature, which runtime
//! imports to add, how to wrap request context. Splitting it this way means
//! a host that wants `$$createComponent`-style wrapping (or any other
//! framework's server-component shape) only has to implement one trait.

pub mod default_adapter;
pub(crate) mod escape;

use rustc_hash::FxHashMap;

use crate::analyzer::{ElementPath, Needs};
use crate::component::Component;
use crate::ir::{AttrValue, IrNode, TemplatePart};
use escape::{escape_html_attribute, escape_template_literal};

/// Everything the core guarantees is available to an adapter for one component.
pub struct ServerComponentInput<'a> {
    pub name: &'a str,
    pub props: &'a [crate::component::Prop],
    pub is_default_export: bool,
    pub source_path: &'a str,
    pub original_imports: &'a [String],
    /// Module constants referenced anywhere in this component (server or
    /// client); re-emitted verbatim ahead of the function body.
    pub module_constants: Vec<&'a crate::component::ModuleConstant>,
    /// Reactive declarations. The server render actually executes these
    /// expressions to produce initial HTML, so the adapter declares each
    /// signal getter as a plain function closing
    /// over its initial-value expression, and each memo getter as a plain
    /// function over its computation expression — no reactivity, just the
    /// value the real runtime would have produced on first render.
    pub signals: &'a [crate::component::Signal],
    pub memos: &'a [crate::component::Memo],
    /// Server-only locals ("local variables") and client-shared locals
    /// ("local functions") — both are in scope while the component actually
    /// renders, so both must be declared server-side too.
    pub local_variables: &'a [crate::component::LocalVariable],
    pub local_functions: &'a [crate::component::LocalFunction],
    /// The component's rendered body: a JS template-literal body (without
    /// the surrounding backticks) — `return` it wrapped in backticks.
    pub rendered_body: String,
    /// True when this component needs a `data-bf-props` sibling script
    /// (it's root-eligible: has props or instantiates a child).
    pub is_root_eligible: bool,
}

/// The `{ name, other = default }` destructuring pattern for a component's
/// props parameter, built from the same `Prop` list the JSX's interpolated
/// expressions reference by bare identifier: props come from a destructured
/// first parameter, so server-rendered text referencing `name` needs `name`
/// actually bound in scope, not left as `props.name`.
pub fn props_destructure_pattern(props: &[crate::component::Prop]) -> Option<String> {
    if props.is_empty() {
        return None;
    }
    let entries: Vec<String> = props
        .iter()
        .map(|p| match &p.default_expr {
            Some(default) => format!("{} = {default}", p.name),
            None => p.name.clone(),
        })
        .collect();
    Some(format!("{{ {} }}", entries.join(", ")))
}

/// A combined-file variant of the same obligations.
pub struct ServerFileInput<'a> {
    pub source_path: &'a str,
    pub components: &'a [String],
    pub module_constants: &'a [crate::component::ModuleConstant],
    pub original_imports: &'a [String],
}

/// Pluggable server-emission strategy. Implementations decide textual
/// packaging only — every invariant is already satisfied by the text the
/// core hands them.
pub trait ServerAdapter: Send + Sync {
    fn generate_server_component(&self, input: &ServerComponentInput<'_>) -> String;

    /// Optional: a combined file wrapping every component in one source
    /// file. The default implementation concatenates nothing — callers that
    /// don't need a combined file can ignore it (the combiner falls back to
    /// per-component emission when this returns `None`).
    fn generate_server_file(&self, _input: &ServerFileInput<'_>) -> Option<String> {
        None
    }
}

/// True if any `ChildComponent` invocation appears anywhere in `ir`.
pub fn has_child_components(ir: &IrNode) -> bool {
    match ir {
        IrNode::ChildComponent(_) => true,
        IrNode::Element(el) => el.children.iter().any(has_child_components),
        IrNode::Fragment(children) => children.iter().any(has_child_components),
        IrNode::Conditional(cond) => has_child_components(&cond.when_true) || has_child_components(&cond.when_false),
        IrNode::List(list) => has_child_components(&list.item_template),
        IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) => false,
    }
}

/// Whether `component` needs any client output at all: the needs-collection
/// invariant union, plus "instantiates a child component" — a parent with
/// no dynamic content of its own still needs a scope anchor to host child
/// `init` calls.
pub fn needs_client_output(component: &Component, needs: &Needs) -> bool {
    !needs.addressable.is_empty()
        || !needs.lists.is_empty()
        || !needs.conditionals.is_empty()
        || component.ir.as_ref().is_some_and(has_child_components)
}

/// Render a component's JSX IR into a JS template-literal body.
/// `module_constants` resolves module-scope identifiers referenced by
/// server-rendered attribute/class expressions — the core doesn't evaluate
/// them, it only decides *whether* to carry the identifier as written.
pub fn render_component_body(component: &Component, needs: &Needs, is_root_eligible: bool) -> String {
    let Some(ir) = &component.ir else {
        return String::new();
    };

    let scope_needed = needs_client_output(component, needs);
    let mut out = String::new();
    match ir {
        IrNode::Element(_) => {
            let scope_name = scope_needed.then_some(component.name.as_str());
            render_node(ir, needs, scope_name, &mut out);
        }
        IrNode::Fragment(children) => {
            // A fragment root has no wrapping element to carry
            // `data-bf-scope`; synthesize a neutral wrapper so the
            // invariant ("exactly one element per top-level component
            // instance carries data-bf-scope") still holds.
            let needs_scope = scope_needed;
            if needs_scope {
                out.push_str(&format!(
                    "<div style=\"display:contents\" data-bf-scope=\"{}\">",
                    component.name
                ));
            }
            for child in children {
                render_node(child, needs, None, &mut out);
            }
            if needs_scope {
                out.push_str("</div>");
            }
        }
        other => render_node(other, needs, Some(&component.name), &mut out),
    }

    if is_root_eligible {
        out.push_str(&format!(
            "<script type=\"application/json\" data-bf-props=\"{}\">${{JSON.stringify(props ?? {{}})}}</script>",
            component.name
        ));
    }

    out
}

/// Render a standalone node's HTML (a list's item template, a conditional
/// branch) with no enclosing scope marker. The client emitter uses the same
/// function to regenerate identical markup for list reconciliation and
/// conditional switching — server and client must agree on the exact text
/// or hydration diverges from the initial render.
pub fn render_fragment_html(node: &IrNode, needs: &Needs, out: &mut String) {
    render_node(node, needs, None, out);
}

/// Render one IR node and append to `out`. `scope_name` is `Some(name)` only
/// for the element that must carry `data-bf-scope="<name>"` — the
/// component's own root.
fn render_node(node: &IrNode, needs: &Needs, scope_name: Option<&str>, out: &mut String) {
    match node {
        IrNode::Text(text) => out.push_str(&escape_html_attribute(text)),
        IrNode::Interpolation(interp) => {
            out.push_str(&format!("${{{}}}", interp.expr_text));
        }
        IrNode::TemplateLiteral(parts) => render_template_parts(parts, out),
        IrNode::Fragment(children) => {
            for child in children {
                render_node(child, needs, None, out);
            }
        }
        IrNode::ChildComponent(child) => {
            out.push_str(&format!("${{{}({})}}", child.name, child.props_expr));
        }
        IrNode::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);

            // Event handlers are client-only; elided here. `ref`/`key` never
            // reach `attributes` at all — the transformer pulls them into
            // `ref_callback`/`key_expr`.
            for attr in &el.attributes {
                if matches!(attr.value, AttrValue::EventHandler { .. }) {
                    continue;
                }
                render_attribute(&attr.name, &attr.value, out);
            }

            if let Some(name) = scope_name {
                out.push_str(&format!(" data-bf-scope=\"{name}\""));
            }
            if needs.addressable.contains(&el.id) && needs.path(el.id) == ElementPath::Null {
                out.push_str(&format!(" data-bf=\"{}\"", el.id));
            }
            if let Some(key) = &el.key_expr {
                out.push_str(&format!(" data-key=\"${{{key}}}\""));
            }
            render_list_delegation_attrs(el, needs, out);

            out.push('>');
            if !is_void_element(&el.tag) {
                for child in &el.children {
                    render_node(child, needs, None, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
        IrNode::Conditional(cond) => render_conditional(cond, needs, out),
        IrNode::List(list) => render_list(list, needs, out),
    }
}

fn render_attribute(name: &str, value: &AttrValue, out: &mut String) {
    match value {
        AttrValue::StaticLiteral(v) => {
            if v.is_empty() {
                out.push_str(&format!(" {name}"));
            } else {
                out.push_str(&format!(" {name}=\"{}\"", escape_html_attribute(v)));
            }
        }
        AttrValue::Dynamic(expr) => {
            out.push_str(&format!(" {name}=\"${{{expr}}}\""));
        }
        AttrValue::TemplateLiteral(parts) => {
            out.push_str(&format!(" {name}=\""));
            render_template_parts(parts, out);
            out.push('"');
        }
        AttrValue::EventHandler { .. } | AttrValue::Ref(_) => {}
    }
}

fn render_template_parts(parts: &[TemplatePart], out: &mut String) {
    for part in parts {
        match part {
            TemplatePart::Literal(text) => out.push_str(&escape_html_attribute(text)),
            TemplatePart::Expr(expr) => out.push_str(&format!("${{{expr}}}")),
        }
    }
}

/// Item-root elements inside a list's template get `data-event-id`/
/// `data-index` for delegated listeners instead of inline handlers. We
/// don't know whether `el` sits inside a *list* item at this point in the
/// render walk (that context lives in
/// `Needs`, keyed by element id) — delegated ids are only ever populated
/// for elements the analyzer found inside a list template, so a lookup by
/// id alone is unambiguous.
fn render_list_delegation_attrs(el: &crate::ir::ElementNode, needs: &Needs, out: &mut String) {
    let mut eid = None;
    for ((elem_id, _event), delegation_id) in &needs.delegated_events {
        if *elem_id == el.id {
            eid = Some(delegation_id.clone());
            break;
        }
    }
    if let Some(eid) = eid {
        out.push_str(&format!(" data-event-id=\"{eid}\""));
        out.push_str(" data-index=\"${__i}\"");
    }
}

fn render_conditional(cond: &crate::ir::Conditional, needs: &Needs, out: &mut String) {
    let fragment_branch = cond.when_true.is_fragment() || cond.when_false.is_fragment();
    let null_path = needs.path(cond.id) == ElementPath::Null;

    if fragment_branch || !null_path_has_single_element(cond) {
        out.push_str(&format!("<!--bf-cond-start:{}-->", cond.id));
        out.push_str(&format!("${{{} ? `", cond.condition_text));
        let mut true_text = String::new();
        render_node(&cond.when_true, needs, None, &mut true_text);
        out.push_str(&escape_template_literal(&true_text));
        out.push_str("` : `");
        let mut false_text = String::new();
        render_node(&cond.when_false, needs, None, &mut false_text);
        out.push_str(&escape_template_literal(&false_text));
        out.push_str("`}");
        out.push_str(&format!("<!--bf-cond-end:{}-->", cond.id));
    } else {
        // Both branches are single elements: render whichever is active
        // and mark it as the conditional's switch target.
        out.push_str(&format!("${{{} ? `", cond.condition_text));
        let mut true_text = String::new();
        render_single_element_branch(&cond.when_true, cond.id, needs, &mut true_text);
        out.push_str(&escape_template_literal(&true_text));
        out.push_str("` : `");
        let mut false_text = String::new();
        render_single_element_branch(&cond.when_false, cond.id, needs, &mut false_text);
        out.push_str(&escape_template_literal(&false_text));
        out.push_str("`}");
    }
}

fn null_path_has_single_element(cond: &crate::ir::Conditional) -> bool {
    cond.when_true.is_single_element() && cond.when_false.is_single_element()
}

/// Render a single-element conditional branch, tagging its one element with
/// `data-bf-cond="<id>"` as the switch target.
fn render_single_element_branch(node: &IrNode, cond_id: crate::ir::ElementId, needs: &Needs, out: &mut String) {
    if let IrNode::Element(el) = node {
        out.push('<');
        out.push_str(&el.tag);
        for attr in &el.attributes {
            if matches!(attr.value, AttrValue::EventHandler { .. }) {
                continue;
            }
            render_attribute(&attr.name, &attr.value, out);
        }
        out.push_str(&format!(" data-bf-cond=\"{cond_id}\""));
        out.push('>');
        if !is_void_element(&el.tag) {
            for child in &el.children {
                render_node(child, needs, None, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    } else {
        render_node(node, needs, None, out);
    }
}

fn render_list(list: &crate::ir::ListNode, needs: &Needs, out: &mut String) {
    let index_binding = list.index_param.clone().unwrap_or_else(|| "__i".to_string());
    out.push_str(&format!(
        "${{{}.map(({}, {}) => `",
        list.array_expr, list.item_param, index_binding
    ));
    let mut item_text = String::new();
    render_node(&list.item_template, needs, None, &mut item_text);
    // `data-index` inside delegated attrs references `${__i}` regardless of
    // the loop's actual index-parameter name; normalize it here.
    let item_text = item_text.replace("${__i}", &format!("${{{index_binding}}}"));
    out.push_str(&escape_template_literal(&item_text));
    out.push_str("`).join('')}");
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Build the module-constant list actually referenced by this component's
/// rendered body (server side renders every constant the JSX touches,
/// regardless of whether client code also needs it — see `client.rs` for
/// the client-side subset).
pub fn referenced_module_constants<'a>(
    component: &Component,
    all_constants: &'a [crate::component::ModuleConstant],
) -> Vec<&'a crate::component::ModuleConstant> {
    let Some(jsx_source) = &component.jsx_source else {
        return Vec::new();
    };
    all_constants.iter().filter(|c| jsx_source.contains(&c.name)).collect()
}

/// Render every component in a file, keyed by name, ready for an adapter's
/// combined-file packaging or for the file-level combiner.
pub fn render_all<'a>(
    components: &'a [Component],
    module_constants: &'a [crate::component::ModuleConstant],
) -> FxHashMap<String, String> {
    let mut out = FxHashMap::default();
    for component in components {
        let needs = crate::analyzer::analyze(component);
        let is_root_eligible = component.is_root_eligible(
            component.ir.as_ref().is_some_and(has_child_components),
        );
        let body = render_component_body(component, &needs, is_root_eligible);
        let _ = module_constants;
        out.insert(component.name.clone(), body);
    }
    out
}
