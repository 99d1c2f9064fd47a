//! Golden-output tests for six compile scenarios (S1 counter, S2 keyed
//! list, S3 fragment conditional, S4 parent/child composition, S5
//! module-constant gating, S6 path chaining).
//!
//! These assert on invariants and output fragments rather than full-file
//! snapshots, since only a fragment of the emitted text is ever promised,
//! not a byte-for-byte file.

use bf_compiler::diagnostic::Diagnostics;
use bf_compiler::{Component, ExtractedFile};

fn extract_one(source: &str) -> Component {
    let mut diagnostics = Diagnostics::new();
    let file: ExtractedFile =
        bf_compiler::extractor::extract_file("C.tsx", source, &mut diagnostics).expect("parses");
    file.components.into_iter().next().expect("one component")
}

fn extract_all(source: &str) -> Vec<Component> {
    let mut diagnostics = Diagnostics::new();
    let file: ExtractedFile =
        bf_compiler::extractor::extract_file("C.tsx", source, &mut diagnostics).expect("parses");
    file.components
}

fn extract_file(source: &str) -> ExtractedFile {
    let mut diagnostics = Diagnostics::new();
    bf_compiler::extractor::extract_file("C.tsx", source, &mut diagnostics).expect("parses")
}

fn render_server(component: &Component) -> String {
    let needs = bf_compiler::analyzer::analyze(component);
    let has_children = component.ir.as_ref().is_some_and(bf_compiler::server::has_child_components);
    let is_root_eligible = component.is_root_eligible(has_children);
    bf_compiler::server::render_component_body(component, &needs, is_root_eligible)
}

fn render_client(component: &Component) -> String {
    let needs = bf_compiler::analyzer::analyze(component);
    let has_children = component.ir.as_ref().is_some_and(bf_compiler::server::has_child_components);
    let is_root_eligible = component.is_root_eligible(has_children);
    bf_compiler::client::render_client_script(component, &needs, is_root_eligible, "barefoot/runtime")
}

/// S1. Counter — signal-backed text and a direct event handler.
#[test]
fn s1_counter() {
    let component = extract_one(
        r#"
        function C() {
            const [n, setN] = createSignal(0);
            return (<><p class="c">{n()}</p><button onClick={() => setN(k => k + 1)}>+</button></>);
        }
        "#,
    );

    let server = render_server(&component);
    assert!(server.contains("class=\"c\""));
    assert!(server.contains("${n()}"));
    assert!(server.contains("data-bf-scope=\"C\""));

    let client = render_client(&component);
    assert!(client.contains("createSignal(0)"));
    assert!(client.contains("createEffect(() =>"));
    assert!(client.contains("textContent = String(n())"));
    assert!(client.contains("addEventListener(\"click\", () => setN(k => k + 1))"));
}

/// S2. Keyed list — `data-key` server-side, `reconcileList` plus a
/// delegated click listener client-side.
#[test]
fn s2_keyed_list() {
    let component = extract_one(
        r#"
        function C() {
            return (<ul>{todos().map(t => <li key={t.id}><span>{t.text}</span><button onClick={() => remove(t.id)}>x</button></li>)}</ul>);
        }
        "#,
    );

    let server = render_server(&component);
    assert!(server.contains("data-key=\"${t.id}\""));
    assert!(server.contains("data-event-id="));
    assert!(server.contains("data-index="));

    let client = render_client(&component);
    assert!(client.contains("reconcileList("));
    assert!(client.contains("todos()"));
    assert!(client.contains("(t) => (t.id)"));
    assert!(client.contains("addEventListener(\"click\", (e) =>"));
    assert!(client.contains("closest('[data-event-id]')"));
    // The `createEffect(() => { reconcileList(...); })` wrapper is balanced:
    // one brace closing the arrow body, one paren closing the call.
    assert!(client.contains("));\n});"));
    assert!(!client.contains("}});"));
}

/// S3. Fragment conditional — comment-pair markers server-side, the
/// tree-walker switch helper client-side.
#[test]
fn s3_fragment_conditional() {
    let component = extract_one(
        r#"
        function C() {
            const [open, setOpen] = createSignal(true);
            return (<div>{open() ? <><h1>A</h1><p>B</p></> : <span>C</span>}</div>);
        }
        "#,
    );

    let server = render_server(&component);
    assert!(server.contains("<!--bf-cond-start:"));
    assert!(server.contains("<!--bf-cond-end:"));
    // Both markers share the same id.
    let start_id = server
        .split("<!--bf-cond-start:")
        .nth(1)
        .and_then(|s| s.split("-->").next())
        .expect("start marker id");
    assert!(server.contains(&format!("<!--bf-cond-end:{start_id}-->")));

    let client = render_client(&component);
    assert!(client.contains("function __bfSwitchCond"));
    assert!(client.contains(&format!("__bfSwitchCond(__scope, \"{start_id}\", open(),")));
}

/// S4. Parent/child composition — a static child produces no `init` call
/// and no client script of its own.
#[test]
fn s4_parent_child_composition() {
    let components = extract_all(
        r#"
        function Child({ name }: Props) {
            return <span>{name}</span>;
        }
        function Parent() {
            return (<div><Child name="a"/></div>);
        }
        "#,
    );
    let child = components.iter().find(|c| c.name == "Child").unwrap();
    let parent = components.iter().find(|c| c.name == "Parent").unwrap();

    // Child has a prop but no signals/memos/events of its own — it's
    // root-eligible (has props) but the parent doesn't need to call an
    // init for it because it's inlined statically into the parent markup.
    let parent_server = render_server(parent);
    assert!(parent_server.contains("<span>"));

    let parent_client = render_client(parent);
    assert!(!parent_client.contains("initChild"));

    let child_needs = bf_compiler::analyzer::analyze(child);
    assert!(!bf_compiler::server::needs_client_output(child, &child_needs));
}

/// S5. Module-constant gating — a constant referenced only by a
/// server-rendered expression is dropped from the client body; one
/// referenced from an event handler survives.
#[test]
fn s5_module_constant_gating() {
    let server_only_src = r#"
        const STYLES = { base: "card" };
        function C() {
            return <div class={STYLES.base}>x</div>;
        }
    "#;
    let server_only = extract_file(server_only_src);
    let component = &server_only.components[0];
    let needs = bf_compiler::analyzer::analyze(component);
    let client = bf_compiler::client::render_client_script_with_constants(
        component,
        &needs,
        false,
        "barefoot/runtime",
        &server_only.module_constants,
    );
    assert!(!client.contains("STYLES"));

    let client_referenced_src = r#"
        const LABEL = "close";
        function C() {
            return <button onClick={() => console.log(LABEL)}>x</button>;
        }
    "#;
    let client_referenced = extract_file(client_referenced_src);
    // `LABEL` isn't a local binding inside the component body (it's a
    // module constant), so it's never classified as a local function or
    // local variable — but it's referenced by a client-emitted event
    // handler, so the client script must declare it itself.
    let component = &client_referenced.components[0];
    let needs = bf_compiler::analyzer::analyze(component);
    let client = bf_compiler::client::render_client_script_with_constants(
        component,
        &needs,
        false,
        "barefoot/runtime",
        &client_referenced.module_constants,
    );
    assert!(client.contains("const LABEL = \"close\""));
}

/// Local variables are server-only — they must never appear in the client
/// script, even when a signal/prop/dynamic expression makes the component
/// root-eligible for hydration.
#[test]
fn local_variable_never_reaches_client_output() {
    let component = extract_one(
        r#"
        function C({ total }: Props) {
            const [n, setN] = createSignal(0);
            const label = `Total: ${total}`;
            return (<button onClick={() => setN(n() + 1)}>{label}</button>);
        }
        "#,
    );
    let client = render_client(&component);
    assert!(!client.contains("const label"));
}

/// S6. Path chaining — a second dynamic element at
/// `firstElementChild.nextElementSibling` is declared as a suffix off the
/// first element's binding, not as an independent traversal from scope.
#[test]
fn s6_path_chaining() {
    let component = extract_one(
        r"
        function C() {
            const [n, setN] = createSignal(0);
            return (<div><p>{n()}</p><span>{n()}</span></div>);
        }
        ",
    );
    let client = render_client(&component);
    assert!(client.contains("__scope.firstElementChild"));
    assert!(client.contains(".nextElementSibling"));
    // The chained declaration builds off the first element's own local
    // binding rather than re-deriving the full path from `__scope`.
    assert!(!client.contains("__scope.firstElementChild.nextElementSibling"));
}
