//! The bundled default [`ServerAdapter`]: each component becomes a plain
//! exported function taking a `props` object and returning its rendered
//! markup as a string. No runtime imports, no request context threading —
//! a host wanting those wraps this adapter or supplies its own.

use super::{ServerAdapter, ServerComponentInput, ServerFileInput, props_destructure_pattern};

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultServerAdapter;

impl ServerAdapter for DefaultServerAdapter {
    fn generate_server_component(&self, input: &ServerComponentInput<'_>) -> String {
        let mut out = String::new();

        for import in input.original_imports {
            out.push_str(import);
            out.push('\n');
        }
        if !input.original_imports.is_empty() {
            out.push('\n');
        }

        for constant in &input.module_constants {
            out.push_str(&constant.full_text);
            out.push('\n');
        }
        if !input.module_constants.is_empty() {
            out.push('\n');
        }

        out.push_str(&format!("export function {}(props) {{\n", input.name));
        if let Some(pattern) = props_destructure_pattern(input.props) {
            out.push_str(&format!("  const {pattern} = props;\n"));
        }
        // Signals/memos render server-side as plain functions over their
        // initial-value/computation expressions — the same text the JSX
        // calls (`n()`, `doubled()`), evaluated for real once, with no
        // reactivity.
        for signal in input.signals {
            out.push_str(&format!("  const {} = () => ({});\n", signal.getter, signal.initial_expr));
        }
        for memo in input.memos {
            out.push_str(&format!("  const {} = () => ({});\n", memo.getter, memo.computation_expr));
        }
        for func in input.local_functions {
            out.push_str("  ");
            out.push_str(&func.full_text.replace('\n', "\n  "));
            out.push('\n');
        }
        for var in input.local_variables {
            out.push_str("  ");
            out.push_str(&var.full_text.replace('\n', "\n  "));
            out.push('\n');
        }
        out.push_str(&format!("  return `{}`;\n", input.rendered_body));
        out.push_str("}\n");

        if input.is_default_export {
            out.push_str(&format!("export default {};\n", input.name));
        }

        out
    }

    fn generate_server_file(&self, input: &ServerFileInput<'_>) -> Option<String> {
        let mut out = String::new();
        for import in input.original_imports {
            out.push_str(import);
            out.push('\n');
        }
        if !input.original_imports.is_empty() {
            out.push('\n');
        }
        for constant in input.module_constants {
            out.push_str(&constant.full_text);
            out.push('\n');
        }
        if !input.module_constants.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("// components: {}\n", input.components.join(", ")));
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_rendered_body_in_an_exported_function() {
        let adapter = DefaultServerAdapter;
        let input = ServerComponentInput {
            name: "Counter",
            props: &[],
            is_default_export: true,
            source_path: "/src/Counter.tsx",
            original_imports: &[],
            module_constants: Vec::new(),
            signals: &[],
            memos: &[],
            local_variables: &[],
            local_functions: &[],
            rendered_body: "<div data-bf-scope=\"Counter\">0</div>".to_string(),
            is_root_eligible: false,
        };
        let code = adapter.generate_server_component(&input);
        assert!(code.contains("export function Counter(props) {"));
        assert!(code.contains("data-bf-scope=\\\"Counter\\\"") || code.contains("data-bf-scope=\"Counter\""));
        assert!(code.contains("export default Counter;"));
    }

    #[test]
    fn destructures_props_and_declares_signal_initial_value() {
        let adapter = DefaultServerAdapter;
        let props = vec![crate::component::Prop {
            name: "label".to_string(),
            type_text: None,
            default_expr: Some("\"x\"".to_string()),
        }];
        let signals = vec![crate::component::Signal {
            getter: "n".to_string(),
            setter: "setN".to_string(),
            initial_expr: "0".to_string(),
        }];
        let input = ServerComponentInput {
            name: "Counter",
            props: &props,
            is_default_export: false,
            source_path: "/src/Counter.tsx",
            original_imports: &[],
            module_constants: Vec::new(),
            signals: &signals,
            memos: &[],
            local_variables: &[],
            local_functions: &[],
            rendered_body: "${label}: ${n()}".to_string(),
            is_root_eligible: false,
        };
        let code = adapter.generate_server_component(&input);
        assert!(code.contains("const { label = \"x\" } = props;"));
        assert!(code.contains("const n = () => (0);"));
    }
}
