//! Client emitter.
//!
//! Produces the hydration script for one component instance. The server
//! emitter and this module walk the same `Component::ir` independently —
//! neither reads the other's output — and agree only through the DOM
//! contract (`data-bf-*`) and the shared [`Needs`] side-table
//! `analyzer.rs` computed from that same IR.

use crate::analyzer::{ElementPath, Needs};
use crate::component::Component;
use crate::ir::{AttrValue, ElementId, ElementNode, IrNode};

/// Event names that don't bubble and must be attached with the capture
/// phase to support delegation.
const CAPTURE_ONLY_EVENTS: &[&str] = &["focus", "blur", "mouseenter", "mouseleave", "scroll"];

/// Render the full hydration script for one component (import line
/// included). A root-eligible component is exported as a named `init<Name>`
/// function a parent calls explicitly, followed by an auto-hydration
/// bootstrap for when nothing else would ever call it; otherwise the
/// script runs itself as soon as it loads.
pub fn render_client_script(
    component: &Component,
    needs: &Needs,
    is_root_eligible: bool,
    runtime_specifier: &str,
) -> String {
    render_client_script_with_constants(component, needs, is_root_eligible, runtime_specifier, &[])
}

/// Same as [`render_client_script`], but also gated-includes the file's
/// module constants that the rendered body actually references: a
/// module-scope identifier is only declared here if some client-emitted
/// expression references the name.
pub fn render_client_script_with_constants(
    component: &Component,
    needs: &Needs,
    is_root_eligible: bool,
    runtime_specifier: &str,
    module_constants: &[crate::component::ModuleConstant],
) -> String {
    let mut out = String::new();
    out.push_str(&import_line(component, needs, runtime_specifier));
    out.push('\n');

    let body = render_init_body(component, needs, module_constants);

    if is_root_eligible {
        out.push_str(&format!(
            "export function init{}(props, instanceIndex, parentScope) {{\n",
            component.name
        ));
        out.push_str("  const __scope = (parentScope ?? document).querySelectorAll(");
        out.push_str(&format!("'[data-bf-scope=\"{}\"]'", component.name));
        out.push_str(")[instanceIndex ?? 0];\n");
        out.push_str("  if (!__scope) return;\n");
        out.push_str(&indent(&body, "  "));
        out.push_str("}\n");
        out.push_str(&render_auto_hydration_bootstrap(component));
    } else {
        out.push_str("(() => {\n");
        out.push_str(&format!(
            "  const __scope = document.querySelector('[data-bf-scope=\"{}\"]');\n",
            component.name
        ));
        out.push_str("  if (!__scope) return;\n");
        out.push_str(&indent(&body, "  "));
        out.push_str("})();\n");
    }

    out
}

/// Self-running bootstrap for a root-eligible component: finds every
/// top-level instance the server rendered, skips instances nested inside
/// another component's scope (those are hydrated by their parent's own
/// `init<Name>` call instead), reads the matching `data-bf-props` script,
/// and hydrates.
fn render_auto_hydration_bootstrap(component: &Component) -> String {
    let name = &component.name;
    format!(
        "(() => {{\n  const __els = document.querySelectorAll('[data-bf-scope=\"{name}\"]');\n  const __propScripts = document.querySelectorAll('script[data-bf-props=\"{name}\"]');\n  for (let __i = 0; __i < __els.length; __i++) {{\n    const __el = __els[__i];\n    if (__el.parentElement?.closest('[data-bf-scope]')) continue;\n    const __propsEl = __propScripts[__i];\n    const __props = __propsEl ? JSON.parse(__propsEl.textContent) : {{}};\n    init{name}(__props, __i, null);\n  }}\n}})();\n"
    )
}

fn indent(body: &str, prefix: &str) -> String {
    body.lines().map(|l| if l.is_empty() { "\n".to_string() } else { format!("{prefix}{l}\n") }).collect()
}

fn import_line(component: &Component, needs: &Needs, runtime_specifier: &str) -> String {
    let mut names = Vec::new();
    if !component.signals.is_empty() {
        names.push("createSignal");
    }
    if !component.memos.is_empty() {
        names.push("createMemo");
    }
    if !needs.dynamic_text.is_empty() || !needs.dynamic_attrs.is_empty() || !needs.conditionals.is_empty() {
        names.push("createEffect");
    }
    if !needs.lists.is_empty() {
        names.push("reconcileList");
    }
    if names.is_empty() {
        return String::new();
    }
    format!("import {{ {} }} from \"{runtime_specifier}\";\n", names.join(", "))
}

/// Build the body placed inside the `init`/IIFE wrapper: declarations,
/// element bindings, reactive updaters, list/conditional reconcilers, event
/// wiring, and child-component `init` calls, in that order.
fn render_init_body(
    component: &Component,
    needs: &Needs,
    module_constants: &[crate::component::ModuleConstant],
) -> String {
    let mut out = String::new();

    for signal in &component.signals {
        out.push_str(&format!(
            "const [{}, {}] = createSignal({});\n",
            signal.getter, signal.setter, signal.initial_expr
        ));
    }
    for memo in &component.memos {
        out.push_str(&format!("const {} = createMemo(() => ({}));\n", memo.getter, memo.computation_expr));
    }
    for func in &component.local_functions {
        out.push_str(&func.full_text);
        out.push('\n');
    }
    // `local_variables` are server-only: evaluated once at render, never
    // re-declared client-side.

    // Shorter paths are declared first so a longer path can chain off an
    // already-bound prefix (e.g. `el0.nextElementSibling`) instead of
    // re-deriving the whole chain from `__scope` every time.
    let mut element_ids: Vec<ElementId> = needs.addressable.iter().copied().collect();
    element_ids.sort_by_key(|id| (path_segment_count(&needs.path(*id)), *id));
    let mut bound_paths: rustc_hash::FxHashMap<String, ElementId> = rustc_hash::FxHashMap::default();
    for id in &element_ids {
        let path = needs.path(*id);
        out.push_str(&format!("const el{id} = {};\n", bind_element(&path, *id, &bound_paths)));
        if let ElementPath::Known(p) = path {
            bound_paths.insert(p, *id);
        }
    }

    // Declared inside the init function's own scope (rather than at module
    // top level) so that two components in the same file each needing
    // conditionals don't collide with a duplicate `function` declaration at
    // module scope — ES modules are strict mode, where that's a SyntaxError.
    if !needs.conditionals.is_empty() {
        out.push_str(CONDITIONAL_SWITCH_HELPER);
    }

    if let Some(ir) = &component.ir {
        render_refs(ir, needs, &mut out);
        render_reactive_updates(ir, needs, &mut out);
        render_direct_event_handlers(ir, needs, &mut out);
        render_lists(ir, needs, &mut out);
        render_conditionals(ir, needs, &mut out);
        render_child_inits(ir, &mut out);
    }

    // Module constants are only declared here when the body built above
    // actually names one — prepended so they're in scope before any
    // reference, following the usual hoisted-declaration placement.
    let referenced: Vec<&crate::component::ModuleConstant> = module_constants
        .iter()
        .filter(|c| crate::jsx_names::references_identifier(&out, &c.name))
        .collect();
    if referenced.is_empty() {
        return out;
    }
    let mut with_constants = String::new();
    for constant in referenced {
        with_constants.push_str(&constant.full_text);
        with_constants.push('\n');
    }
    with_constants.push_str(&out);
    with_constants
}

fn path_segment_count(path: &ElementPath) -> usize {
    match path {
        ElementPath::Known(p) if p.is_empty() => 0,
        ElementPath::Known(p) => p.split('.').count(),
        ElementPath::Null => usize::MAX,
    }
}

/// Bind one addressable element, chaining off the nearest already-declared
/// ancestor path rather than always deriving the full chain from `__scope`.
fn bind_element(path: &ElementPath, id: ElementId, bound: &rustc_hash::FxHashMap<String, ElementId>) -> String {
    match path {
        ElementPath::Known(p) if p.is_empty() => "__scope".to_string(),
        ElementPath::Known(p) => {
            let segments: Vec<&str> = p.split('.').collect();
            for split in (1..segments.len()).rev() {
                let prefix = segments[..split].join(".");
                if let Some(base_id) = bound.get(&prefix) {
                    let suffix = segments[split..].join(".");
                    return format!("el{base_id}.{suffix}");
                }
            }
            format!("__scope.{p}")
        }
        ElementPath::Null => format!("__scope.querySelector('[data-bf=\"{id}\"]')"),
    }
}

fn walk_elements<'a>(node: &'a IrNode, f: &mut impl FnMut(&'a ElementNode)) {
    match node {
        IrNode::Element(el) => {
            f(el);
            for child in &el.children {
                walk_elements(child, f);
            }
        }
        IrNode::Fragment(children) => {
            for child in children {
                walk_elements(child, f);
            }
        }
        IrNode::Conditional(_) | IrNode::List(_) | IrNode::ChildComponent(_) => {}
        IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) => {}
    }
}

fn render_refs(ir: &IrNode, needs: &Needs, out: &mut String) {
    walk_elements(ir, &mut |el| {
        if let Some(callback) = &el.ref_callback {
            if needs.refs.contains(&el.id) {
                out.push_str(&format!("({callback})(el{});\n", el.id));
            }
        }
    });
}

fn render_reactive_updates(ir: &IrNode, needs: &Needs, out: &mut String) {
    walk_elements(ir, &mut |el| {
        if needs.dynamic_text.contains(&el.id) {
            if let [IrNode::Interpolation(interp)] = el.children.as_slice() {
                out.push_str(&format!(
                    "createEffect(() => {{ el{}.textContent = String({}); }});\n",
                    el.id, interp.expr_text
                ));
            } else if let [IrNode::TemplateLiteral(parts)] = el.children.as_slice() {
                let joined = template_parts_to_js(parts);
                out.push_str(&format!("createEffect(() => {{ el{}.textContent = {joined}; }});\n", el.id));
            }
        }
        if let Some(reactive_names) = needs.reactive_attrs.get(&el.id) {
            for attr in el.dynamic_attributes() {
                if reactive_names.contains(&attr.name) {
                    render_attribute_effect(el.id, &attr.name, &attr.value, out);
                }
            }
        }
    });
}

fn template_parts_to_js(parts: &[crate::ir::TemplatePart]) -> String {
    let pieces: Vec<String> = parts
        .iter()
        .map(|p| match p {
            crate::ir::TemplatePart::Literal(text) => format!("`{}`", text.replace('`', "\\`")),
            crate::ir::TemplatePart::Expr(expr) => format!("String({expr})"),
        })
        .collect();
    pieces.join(" + ")
}

fn render_attribute_effect(el_id: ElementId, name: &str, value: &AttrValue, out: &mut String) {
    let expr = match value {
        AttrValue::Dynamic(expr) => expr.clone(),
        AttrValue::TemplateLiteral(parts) => template_parts_to_js(parts),
        _ => return,
    };
    match name {
        "className" | "class" => {
            out.push_str(&format!("createEffect(() => {{ el{el_id}.className = {expr}; }});\n"));
        }
        "value" => {
            out.push_str(&format!("createEffect(() => {{ el{el_id}.value = {expr}; }});\n"));
        }
        "checked" | "disabled" | "selected" | "readOnly" | "hidden" => {
            out.push_str(&format!("createEffect(() => {{ el{el_id}.{name} = Boolean({expr}); }});\n"));
        }
        "style" => {
            out.push_str(&format!("createEffect(() => {{ el{el_id}.style.cssText = {expr}; }});\n"));
        }
        _ => {
            out.push_str(&format!(
                "createEffect(() => {{ el{el_id}.setAttribute(\"{name}\", {expr}); }});\n"
            ));
        }
    }
}

/// Rewrite `cond && action()`-shaped arrow handlers into block form so the
/// action only runs when `cond` is truthy, instead of evaluating to (and
/// discarding) the `&&` expression's value.
fn rewrite_event_handler(handler_text: &str) -> String {
    let Some(arrow_pos) = handler_text.find("=>") else {
        return handler_text.to_string();
    };
    let (params, body) = handler_text.split_at(arrow_pos);
    let body = body[2..].trim();
    if body.starts_with('{') {
        return handler_text.to_string();
    }
    if let Some(and_pos) = body.find(" && ") {
        let cond = body[..and_pos].trim();
        let action = body[and_pos + 4..].trim().trim_end_matches(';');
        return format!("{params}=> {{ if ({cond}) {{ {action}; }} }}");
    }
    handler_text.to_string()
}

fn render_direct_event_handlers(ir: &IrNode, needs: &Needs, out: &mut String) {
    walk_elements(ir, &mut |el| {
        if !needs.interactive.contains(&el.id) {
            return;
        }
        for attr in &el.attributes {
            if let AttrValue::EventHandler { event_name, handler_text } = &attr.value {
                let rewritten = rewrite_event_handler(handler_text);
                out.push_str(&format!("el{}.addEventListener(\"{event_name}\", {rewritten});\n", el.id));
            }
        }
    });
}

/// Collect `(delegation id, event name, handler text)` for every
/// interactive element inside a list's item template, mirroring
/// `analyzer::collect_item_interactive`'s id assignment exactly (`e<id>`).
fn collect_item_handlers(node: &IrNode, out: &mut Vec<(String, String, String)>) {
    match node {
        IrNode::Element(el) => {
            for attr in &el.attributes {
                if let AttrValue::EventHandler { event_name, handler_text } = &attr.value {
                    out.push((format!("e{}", el.id), event_name.clone(), handler_text.clone()));
                }
            }
            for child in &el.children {
                collect_item_handlers(child, out);
            }
        }
        IrNode::Fragment(children) => {
            for child in children {
                collect_item_handlers(child, out);
            }
        }
        IrNode::Conditional(cond) => {
            collect_item_handlers(&cond.when_true, out);
            collect_item_handlers(&cond.when_false, out);
        }
        IrNode::List(list) => collect_item_handlers(&list.item_template, out),
        IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) | IrNode::ChildComponent(_) => {}
    }
}

fn render_lists(ir: &IrNode, needs: &Needs, out: &mut String) {
    walk_lists(ir, &mut |list_id, list| {
        let container = needs
            .list_container
            .get(&list_id)
            .and_then(|c| *c)
            .map(|id| format!("el{id}"))
            .unwrap_or_else(|| "__scope".to_string());

        let index_param = list.index_param.clone().unwrap_or_else(|| "__i".to_string());

        let mut item_html = String::new();
        crate::server::render_fragment_html(&list.item_template, needs, &mut item_html);
        let item_html = item_html.replace('`', "\\`");

        out.push_str("createEffect(() => {\n");
        if let Some(key_fn) = &list.key_expr {
            out.push_str(&format!(
                "  reconcileList({container}, {}, ({}, {index_param}) => `{}`, ({}) => ({key_fn}));\n",
                list.array_expr, list.item_param, item_html, list.item_param
            ));
        } else {
            out.push_str(&format!(
                "  {container}.innerHTML = {}.map(({}, {index_param}) => `{}`).join(\"\");\n",
                list.array_expr, list.item_param, item_html
            ));
        }
        out.push_str("});\n");

        let mut handlers = Vec::new();
        collect_item_handlers(&list.item_template, &mut handlers);
        let mut events: Vec<&str> = handlers.iter().map(|(_, e, _)| e.as_str()).collect();
        events.sort_unstable();
        events.dedup();
        for event in events {
            let capture = CAPTURE_ONLY_EVENTS.contains(&event);
            out.push_str(&format!(
                "{container}.addEventListener(\"{event}\", (e) => {{\n"
            ));
            out.push_str("  const target = e.target.closest('[data-event-id]');\n");
            out.push_str("  if (!target) return;\n");
            out.push_str("  const __id = target.dataset.eventId;\n");
            out.push_str(&format!(
                "  const {} = {}[Number(target.dataset.index)];\n",
                list.item_param, list.array_expr
            ));
            for (delegation_id, ev, handler_text) in &handlers {
                if ev != event {
                    continue;
                }
                let rewritten = rewrite_event_handler(handler_text);
                out.push_str(&format!(
                    "  if (__id === \"{delegation_id}\") {{ ({rewritten})({}); }}\n",
                    list.item_param
                ));
            }
            out.push_str(&format!("}}, {capture});\n"));
        }
    });
}

fn walk_lists<'a>(node: &'a IrNode, f: &mut impl FnMut(ElementId, &'a crate::ir::ListNode)) {
    match node {
        IrNode::Element(el) => {
            for child in &el.children {
                walk_lists(child, f);
            }
        }
        IrNode::Fragment(children) => {
            for child in children {
                walk_lists(child, f);
            }
        }
        IrNode::List(list) => f(list.id, list),
        IrNode::Conditional(cond) => {
            walk_lists(&cond.when_true, f);
            walk_lists(&cond.when_false, f);
        }
        IrNode::ChildComponent(_) | IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) => {}
    }
}

/// Inline helper the client script defines once and every conditional's
/// effect calls by id. A single dispatcher handles both marker shapes — and
/// migrates between them — instead of emitting two separate codegen
/// branches per conditional: it looks for the comment-pair markers first
/// (the server's preferred form when any branch is a fragment), falls back
/// to the single-element `data-bf-cond` form, and rewrites the DOM into
/// whichever shape the new HTML needs.
const CONDITIONAL_SWITCH_HELPER: &str = "function __bfFindCondComment(scope, text) {
  const walker = document.createTreeWalker(scope, NodeFilter.SHOW_COMMENT);
  for (let node = walker.nextNode(); node; node = walker.nextNode()) {
    if (node.data === text) return node;
  }
  return null;
}
function __bfSwitchCond(scope, id, cond, trueHtml, falseHtml) {
  const html = cond ? trueHtml : falseHtml;
  const start = __bfFindCondComment(scope, `bf-cond-start:${id}`);
  if (start) {
    const end = __bfFindCondComment(scope, `bf-cond-end:${id}`);
    for (let node = start.nextSibling; node && node !== end; ) {
      const next = node.nextSibling;
      node.remove();
      node = next;
    }
    const tpl = document.createElement(\"template\");
    tpl.innerHTML = html;
    end.parentNode.insertBefore(tpl.content, end);
    return;
  }
  const el = scope.querySelector(`[data-bf-cond=\"${id}\"]`);
  if (!el) return;
  const tpl = document.createElement(\"template\");
  tpl.innerHTML = html;
  const next = tpl.content.firstElementChild;
  if (next) {
    next.setAttribute(\"data-bf-cond\", String(id));
    el.replaceWith(next);
  } else {
    const startMarker = document.createComment(`bf-cond-start:${id}`);
    const endMarker = document.createComment(`bf-cond-end:${id}`);
    el.replaceWith(startMarker, endMarker);
    endMarker.parentNode.insertBefore(tpl.content, endMarker);
  }
}
";

fn render_conditionals(ir: &IrNode, needs: &Needs, out: &mut String) {
    walk_conditionals(ir, &mut |cond| {
        let mut true_html = String::new();
        let mut false_html = String::new();
        crate::server::render_fragment_html(&cond.when_true, needs, &mut true_html);
        crate::server::render_fragment_html(&cond.when_false, needs, &mut false_html);

        out.push_str("createEffect(() => {\n");
        out.push_str(&format!(
            "  __bfSwitchCond(__scope, \"{}\", {}, `{}`, `{}`);\n",
            cond.id,
            cond.condition_text,
            true_html.replace('`', "\\`"),
            false_html.replace('`', "\\`")
        ));
        out.push_str("});\n");
    });
}

fn walk_conditionals<'a>(node: &'a IrNode, f: &mut impl FnMut(&'a crate::ir::Conditional)) {
    match node {
        IrNode::Element(el) => {
            for child in &el.children {
                walk_conditionals(child, f);
            }
        }
        IrNode::Fragment(children) => {
            for child in children {
                walk_conditionals(child, f);
            }
        }
        IrNode::Conditional(cond) => f(cond),
        IrNode::List(list) => walk_conditionals(&list.item_template, f),
        IrNode::ChildComponent(_) | IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) => {}
    }
}

/// Per-(parent, child name) instance counters so sibling instances of the
/// same child component type resolve distinct `data-bf-scope` elements.
/// Each call passes the parent's own `__scope` so the lookup is confined to
/// that instance's subtree instead of the whole document.
fn render_child_inits(ir: &IrNode, out: &mut String) {
    let mut counters: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
    walk_child_components(ir, &mut |child| {
        let idx = counters.entry(child.name.clone()).or_insert(0);
        out.push_str(&format!(
            "init{}({}, {}, __scope);\n",
            child.name, child.props_expr, *idx
        ));
        *idx += 1;
    });
}

fn walk_child_components<'a>(node: &'a IrNode, f: &mut impl FnMut(&'a crate::ir::ChildComponentNode)) {
    match node {
        IrNode::Element(el) => {
            for child in &el.children {
                walk_child_components(child, f);
            }
        }
        IrNode::Fragment(children) => {
            for child in children {
                walk_child_components(child, f);
            }
        }
        IrNode::ChildComponent(child) => f(child),
        IrNode::Conditional(cond) => {
            walk_child_components(&cond.when_true, f);
            walk_child_components(&cond.when_false, f);
        }
        IrNode::List(list) => walk_child_components(&list.item_template, f),
        IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::extractor::extract_file;

    fn extract(source: &str) -> Component {
        let mut diagnostics = Diagnostics::new();
        let file = extract_file("C.tsx", source, &mut diagnostics).expect("parses");
        file.components.into_iter().next().expect("one component")
    }

    #[test]
    fn counter_gets_a_signal_declaration_and_text_effect() {
        let component = extract(
            r"
            function Counter() {
                const [n, setN] = createSignal(0);
                return (<button onClick={() => setN(n() + 1)}>{n()}</button>);
            }
            ",
        );
        let needs = crate::analyzer::analyze(&component);
        let script = render_client_script(&component, &needs, false, "barefoot/runtime");
        assert!(script.contains("createSignal(0)"));
        assert!(script.contains("addEventListener(\"click\""));
        assert!(script.contains("textContent"));
    }

    #[test]
    fn and_guard_handler_is_rewritten_to_if() {
        let rewritten = rewrite_event_handler("() => active && toggle()");
        assert_eq!(rewritten, "() => { if (active) { toggle(); } }");
    }

    #[test]
    fn block_bodied_handler_is_left_untouched() {
        let rewritten = rewrite_event_handler("() => { doThing(); }");
        assert_eq!(rewritten, "() => { doThing(); }");
    }

    #[test]
    fn fragment_conditional_emits_switch_helper_and_markers() {
        let component = extract(
            r"
            function Panel() {
                const [open, setOpen] = createSignal(true);
                return (<div>{open() ? <><h1>A</h1><p>B</p></> : <span>C</span>}</div>);
            }
            ",
        );
        let needs = crate::analyzer::analyze(&component);
        let script = render_client_script(&component, &needs, false, "barefoot/runtime");
        assert!(script.contains("function __bfSwitchCond"));
        assert!(script.contains("bf-cond-start:"));
        assert!(script.contains("__bfSwitchCond(__scope,"));
    }

    #[test]
    fn root_eligible_component_emits_auto_hydration_bootstrap() {
        let component = extract(
            r"
            function Greeter({ name }) {
                return (<p>{name}</p>);
            }
            ",
        );
        let needs = crate::analyzer::analyze(&component);
        let script = render_client_script(&component, &needs, true, "barefoot/runtime");
        assert!(script.contains("export function initGreeter(props, instanceIndex, parentScope)"));
        assert!(script.contains("(parentScope ?? document).querySelectorAll"));
        assert!(script.contains("document.querySelectorAll('[data-bf-scope=\"Greeter\"]')"));
        assert!(script.contains("__el.parentElement?.closest('[data-bf-scope]')"));
        assert!(script.contains("script[data-bf-props=\"Greeter\"]"));
        assert!(script.contains("JSON.parse(__propsEl.textContent)"));
        assert!(script.contains("initGreeter(__props, __i, null);"));
    }

    #[test]
    fn unkeyed_list_replaces_inner_html_instead_of_reconciling() {
        let component = extract(
            r"
            function Items() {
                const [items, setItems] = createSignal([1, 2, 3]);
                return (<ul>{items().map((item) => <li>{item}</li>)}</ul>);
            }
            ",
        );
        let needs = crate::analyzer::analyze(&component);
        let script = render_client_script(&component, &needs, false, "barefoot/runtime");
        assert!(script.contains(".innerHTML = "));
        assert!(!script.contains("reconcileList("));
    }

    #[test]
    fn keyed_list_still_uses_the_reconciler() {
        let component = extract(
            r#"
            function Items() {
                const [items, setItems] = createSignal([1, 2, 3]);
                return (<ul>{items().map((item) => <li key={item}>{item}</li>)}</ul>);
            }
            "#,
        );
        let needs = crate::analyzer::analyze(&component);
        let script = render_client_script(&component, &needs, false, "barefoot/runtime");
        assert!(script.contains("reconcileList("));
        assert!(!script.contains(".innerHTML = "));
    }

    #[test]
    fn child_init_is_passed_the_parent_scope() {
        let component = extract(
            r#"
            function Parent() {
                return (<div><Child name="a" /></div>);
            }
            "#,
        );
        let needs = crate::analyzer::analyze(&component);
        let script = render_client_script(&component, &needs, false, "barefoot/runtime");
        assert!(script.contains("initChild({ name: \"a\" }, 0, __scope);"));
        assert!(!script.contains(", 0, null)"));
    }
}
