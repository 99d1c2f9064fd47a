//! The `Component` data model.

use crate::ir::IrNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prop {
    pub name: String,
    pub type_text: Option<String>,
    pub default_expr: Option<String>,
}

/// `const [getter, setter] = createSignal(initial)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub getter: String,
    pub setter: String,
    pub initial_expr: String,
}

/// `const getter = createMemo(() => computation)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    pub getter: String,
    pub computation_expr: String,
}

/// A file-scope `const` declaration, preserved as full text for re-emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConstant {
    pub name: String,
    pub full_text: String,
}

/// A function/arrow binding inside a component body, emitted to the client
/// iff referenced from client-emitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFunction {
    pub name: String,
    pub full_text: String,
}

/// Any other `const` binding inside a component body — server-only, never
/// emitted to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub name: String,
    pub full_text: String,
}

/// A named function returning a single JSX expression. Identified by (file
/// path, component name) at the driver level (`resolver.rs`); this struct
/// holds everything extracted from one file for one component.
#[derive(Debug, Clone)]
pub struct Component {
    pub name: String,
    pub props: Vec<Prop>,
    pub signals: Vec<Signal>,
    pub memos: Vec<Memo>,
    pub local_functions: Vec<LocalFunction>,
    pub local_variables: Vec<LocalVariable>,
    pub is_default_export: bool,
    pub is_exported: bool,
    /// The JSX/fragment expression text this component returns — handed to
    /// `transform.rs` to build the IR tree. `None` when the return
    /// expression could not be statically identified.
    pub jsx_source: Option<String>,
    /// Filled in once `transform.rs` has run.
    pub ir: Option<IrNode>,
}

impl Component {
    /// Look up a binding name across props, signals (getter or setter),
    /// memos, and locals. Used throughout the analyzer to classify whether
    /// an expression is "reactive".
    pub fn is_reactive_name(&self, name: &str) -> bool {
        self.props.iter().any(|p| p.name == name)
            || self
                .signals
                .iter()
                .any(|s| s.getter == name || s.setter == name)
            || self.memos.iter().any(|m| m.getter == name)
    }

    pub fn is_local_function(&self, name: &str) -> bool {
        self.local_functions.iter().any(|f| f.name == name)
    }

    /// Whether `expr_text` textually references a prop, signal getter/setter,
    /// or memo getter — the only bindings that actually change after initial
    /// render. A server-rendered expression can also mention a local variable
    /// (server-only, fixed at render time) or a module constant without that
    /// making the expression worth re-running client-side: only a dependency
    /// on one of these three kinds justifies wrapping the element in
    /// `createEffect` — any element whose expression textually references a
    /// reactive getter or setter needs to re-run when it changes.
    pub fn expr_references_reactive_binding(&self, expr_text: &str) -> bool {
        self.props.iter().any(|p| crate::jsx_names::references_identifier(expr_text, &p.name))
            || self.signals.iter().any(|s| {
                crate::jsx_names::references_identifier(expr_text, &s.getter)
                    || crate::jsx_names::references_identifier(expr_text, &s.setter)
            })
            || self.memos.iter().any(|m| crate::jsx_names::references_identifier(expr_text, &m.getter))
    }

    pub fn is_local_variable(&self, name: &str) -> bool {
        self.local_variables.iter().any(|v| v.name == name)
    }

    /// Auto-hydration eligibility: a component is hydrated only if it has
    /// props or child-component instantiations. `has_child_components` is
    /// computed by the caller by checking the IR for `ChildComponent` nodes.
    pub fn is_root_eligible(&self, has_child_components: bool) -> bool {
        !self.props.is_empty() || has_child_components
    }
}

/// Everything extracted from one source file, in source order. A file may
/// declare multiple components; the driver picks the "principal" one (the
/// default export, or the sole exported component) in `resolver.rs`.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFile {
    /// Preserved textual import statements for re-emission.
    pub imports: Vec<String>,
    pub module_constants: Vec<ModuleConstant>,
    pub components: Vec<Component>,
}
