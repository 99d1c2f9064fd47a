//! File-level combiner.
//!
//! One source file can declare several components (a principal export plus
//! local helpers). This groups their individually-rendered server/client
//! text back into per-file outputs, merges import declarations, and assigns
//! content-hashed file names.

use rustc_hash::FxHashMap;

use crate::component::{Component, ExtractedFile};
use crate::hash::content_hash;
use crate::options::CompileOptions;
use crate::server::{ServerComponentInput, ServerFileInput, needs_client_output};

/// One file's full emission: per-component server text, the combined
/// server file (if the adapter supports one), the client script (if any
/// component in the file needs client output), and the hashed file names.
pub struct FileOutput {
    pub source_path: String,
    pub server_components: FxHashMap<String, String>,
    pub combined_server_file: Option<String>,
    pub client_script: Option<String>,
    pub server_file_name: String,
    pub client_file_name: Option<String>,
}

/// Deduplicate import declarations that appear verbatim in more than one
/// component of the same file (every component in a file was extracted
/// from the same top-level import list, so duplicates are the common case,
/// not an edge case).
fn merged_imports(file: &ExtractedFile) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::new();
    for import in &file.imports {
        if seen.insert(import.clone()) {
            out.push(import.clone());
        }
    }
    out
}

/// When `options.inline_child_scripts` is set, a parent's import of a child
/// component is replaced with a marker the combiner resolves by splicing in
/// the child's own rendered text, instead of leaving a real module import
/// for the bundler to follow.
fn child_inline_marker(child_name: &str) -> String {
    format!("/* @bf-child:{child_name} */")
}

/// Combine one extracted file's components into their file-level outputs.
pub fn combine_file(file: &ExtractedFile, source_path: &str, options: &CompileOptions) -> FileOutput {
    let adapter = options.adapter_or_default();
    let imports = merged_imports(file);

    let mut server_components = FxHashMap::default();
    let mut client_parts = Vec::new();
    let mut needs_client_file = false;

    for component in &file.components {
        let needs = crate::analyzer::analyze(component);
        let has_children = component.ir.as_ref().is_some_and(crate::server::has_child_components);
        let is_root_eligible = component.is_root_eligible(has_children);
        let rendered_body = crate::server::render_component_body(component, &needs, is_root_eligible);

        let referenced_constants = crate::server::referenced_module_constants(component, &file.module_constants);
        let original_imports = if options.inline_child_scripts {
            inline_marked_imports(&imports, component)
        } else {
            imports.clone()
        };

        let input = ServerComponentInput {
            name: &component.name,
            props: &component.props,
            is_default_export: component.is_default_export,
            source_path,
            original_imports: &original_imports,
            module_constants: referenced_constants,
            signals: &component.signals,
            memos: &component.memos,
            local_variables: &component.local_variables,
            local_functions: &component.local_functions,
            rendered_body,
            is_root_eligible,
        };
        let server_text = adapter.generate_server_component(&input);
        server_components.insert(component.name.clone(), server_text);

        if needs_client_output(component, &needs) {
            needs_client_file = true;
            let script = crate::client::render_client_script_with_constants(
                component,
                &needs,
                is_root_eligible,
                &options.client_runtime_specifier,
                &file.module_constants,
            );
            client_parts.push(script);
        }
    }

    let component_names: Vec<String> = file.components.iter().map(|c| c.name.clone()).collect();
    let file_input = ServerFileInput {
        source_path,
        components: &component_names,
        module_constants: &file.module_constants,
        original_imports: &imports,
    };
    let combined_server_file = adapter.generate_server_file(&file_input);

    let server_hash_input: String = server_components
        .values()
        .cloned()
        .chain(combined_server_file.clone())
        .collect::<Vec<_>>()
        .join("\n");
    let server_file_name = format!("{}-{}.js", file_stem(source_path), content_hash(&server_hash_input));

    let client_script = if needs_client_file { Some(client_parts.join("\n")) } else { None };
    let client_file_name = client_script
        .as_ref()
        .map(|text| format!("{}-{}.client.js", file_stem(source_path), content_hash(text)));

    FileOutput {
        source_path: source_path.to_string(),
        server_components,
        combined_server_file,
        client_script,
        server_file_name,
        client_file_name,
    }
}

/// Replace a child component's own import line with an inline marker the
/// final bundling step splices real text into, when inlining is enabled.
fn inline_marked_imports(imports: &[String], component: &Component) -> Vec<String> {
    let child_names: std::collections::HashSet<&str> = component
        .ir
        .as_ref()
        .map(|ir| collect_child_component_names(ir))
        .unwrap_or_default();

    imports
        .iter()
        .map(|import| {
            for name in &child_names {
                if import.contains(name) {
                    return child_inline_marker(name);
                }
            }
            import.clone()
        })
        .collect()
}

fn collect_child_component_names(ir: &crate::ir::IrNode) -> std::collections::HashSet<&str> {
    use crate::ir::IrNode;
    let mut out = std::collections::HashSet::new();
    fn walk<'a>(node: &'a IrNode, out: &mut std::collections::HashSet<&'a str>) {
        match node {
            IrNode::ChildComponent(child) => {
                out.insert(child.name.as_str());
            }
            IrNode::Element(el) => {
                for child in &el.children {
                    walk(child, out);
                }
            }
            IrNode::Fragment(children) => {
                for child in children {
                    walk(child, out);
                }
            }
            IrNode::Conditional(cond) => {
                walk(&cond.when_true, out);
                walk(&cond.when_false, out);
            }
            IrNode::List(list) => walk(&list.item_template, out),
            IrNode::Text(_) | IrNode::Interpolation(_) | IrNode::TemplateLiteral(_) => {}
        }
    }
    walk(ir, &mut out);
    out
}

fn file_stem(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "component".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Diagnostics;
    use crate::extractor::extract_file;

    #[test]
    fn counter_file_produces_a_server_and_client_output() {
        let mut diagnostics = Diagnostics::new();
        let file = extract_file(
            "/src/Counter.tsx",
            r"
            function Counter() {
                const [n, setN] = createSignal(0);
                return (<button onClick={() => setN(n() + 1)}>{n()}</button>);
            }
            ",
            &mut diagnostics,
        )
        .expect("parses");
        let options = CompileOptions::new("/src/Counter.tsx");
        let output = combine_file(&file, "/src/Counter.tsx", &options);
        assert!(output.server_components.contains_key("Counter"));
        assert!(output.client_script.is_some());
        assert!(output.server_file_name.ends_with(".js"));
    }

    #[test]
    fn child_only_component_with_no_dynamic_content_gets_no_client_script() {
        let mut diagnostics = Diagnostics::new();
        let file = extract_file(
            "/src/Static.tsx",
            r"
            function Static() {
                return (<p>hello</p>);
            }
            ",
            &mut diagnostics,
        )
        .expect("parses");
        let options = CompileOptions::new("/src/Static.tsx");
        let output = combine_file(&file, "/src/Static.tsx", &options);
        assert!(output.client_script.is_none());
    }
}
