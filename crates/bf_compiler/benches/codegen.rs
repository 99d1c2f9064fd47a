//! Benchmarks for the path planner (`analyzer::analyze`) and the client
//! emitter (`client::render_client_script`) against a handful of synthetic
//! component shapes, chosen to cover the hot paths each one walks: a flat
//! tree of addressable elements, a keyed list, and nested conditionals.

use bf_compiler::diagnostic::Diagnostics;
use bf_compiler::extractor::extract_file;
use bf_compiler::{Component, ExtractedFile};

fn extract_one(source: &str) -> Component {
    let mut diagnostics = Diagnostics::new();
    let file: ExtractedFile = extract_file("Bench.tsx", source, &mut diagnostics).expect("parses");
    file.components.into_iter().next().expect("one component")
}

fn counter() -> Component {
    extract_one(
        r"
        function Counter() {
            const [n, setN] = createSignal(0);
            return (<div><p>{n()}</p><button onClick={() => setN(k => k + 1)}>+</button></div>);
        }
        ",
    )
}

fn wide_tree() -> Component {
    extract_one(
        r#"
        function Wide() {
            const [n, setN] = createSignal(0);
            return (
                <div>
                    <p>{n()}</p><p>{n()}</p><p>{n()}</p><p>{n()}</p>
                    <span>{n()}</span><span>{n()}</span><span>{n()}</span><span>{n()}</span>
                    <button onClick={() => setN(k => k + 1)}>+</button>
                </div>
            );
        }
        "#,
    )
}

fn keyed_list() -> Component {
    extract_one(
        r"
        function List() {
            return (<ul>{items().map(t => <li key={t.id}><span>{t.text}</span><button onClick={() => remove(t.id)}>x</button></li>)}</ul>);
        }
        ",
    )
}

fn nested_conditionals() -> Component {
    extract_one(
        r"
        function Panel() {
            const [open, setOpen] = createSignal(true);
            const [busy, setBusy] = createSignal(false);
            return (
                <div>
                    {open() ? (busy() ? <span>busy</span> : <p>open</p>) : <em>closed</em>}
                </div>
            );
        }
        ",
    )
}

#[divan::bench]
fn analyze_counter(bencher: divan::Bencher<'_, '_>) {
    let component = counter();
    bencher.bench_local(|| bf_compiler::analyzer::analyze(&component));
}

#[divan::bench]
fn analyze_wide_tree(bencher: divan::Bencher<'_, '_>) {
    let component = wide_tree();
    bencher.bench_local(|| bf_compiler::analyzer::analyze(&component));
}

#[divan::bench]
fn analyze_keyed_list(bencher: divan::Bencher<'_, '_>) {
    let component = keyed_list();
    bencher.bench_local(|| bf_compiler::analyzer::analyze(&component));
}

#[divan::bench]
fn analyze_nested_conditionals(bencher: divan::Bencher<'_, '_>) {
    let component = nested_conditionals();
    bencher.bench_local(|| bf_compiler::analyzer::analyze(&component));
}

#[divan::bench]
fn render_client_wide_tree(bencher: divan::Bencher<'_, '_>) {
    let component = wide_tree();
    let needs = bf_compiler::analyzer::analyze(&component);
    bencher.bench_local(|| bf_compiler::client::render_client_script(&component, &needs, false, "barefoot/runtime"));
}

#[divan::bench]
fn render_client_keyed_list(bencher: divan::Bencher<'_, '_>) {
    let component = keyed_list();
    let needs = bf_compiler::analyzer::analyze(&component);
    bencher.bench_local(|| bf_compiler::client::render_client_script(&component, &needs, false, "barefoot/runtime"));
}

#[divan::bench]
fn render_client_nested_conditionals(bencher: divan::Bencher<'_, '_>) {
    let component = nested_conditionals();
    let needs = bf_compiler::analyzer::analyze(&component);
    bencher.bench_local(|| bf_compiler::client::render_client_script(&component, &needs, false, "barefoot/runtime"));
}

fn main() {
    divan::main();
}
