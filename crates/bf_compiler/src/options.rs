//! Compile-time options.

use std::sync::Arc;

use crate::server::ServerAdapter;
use crate::server::default_adapter::DefaultServerAdapter;

/// Options for one `compile` invocation.
pub struct CompileOptions {
    /// The absolute path of the file to compile. Its principal component
    /// is the entry point of the whole compile; every import reachable from
    /// it is compiled transitively.
    pub entry_path: String,

    /// Module specifier the client bootstrap and emitted `init...` calls
    /// import the reactive runtime (`createSignal`, `createMemo`,
    /// `createEffect`, `reconcileList`) from. Defaults to `"barefoot/runtime"`.
    pub client_runtime_specifier: String,

    /// When `true`, a parent component's emitted server/client code inlines
    /// a referenced child's own emission inline at the import-marker site
    /// instead of leaving a `import` for the combiner to resolve separately.
    pub inline_child_scripts: bool,

    /// The server-emission strategy. Defaults to [`DefaultServerAdapter`]
    /// when not supplied.
    pub adapter: Option<Arc<dyn ServerAdapter>>,
}

impl CompileOptions {
    pub fn new(entry_path: impl Into<String>) -> Self {
        Self {
            entry_path: entry_path.into(),
            client_runtime_specifier: "barefoot/runtime".to_string(),
            inline_child_scripts: false,
            adapter: None,
        }
    }

    #[must_use]
    pub fn with_client_runtime_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.client_runtime_specifier = specifier.into();
        self
    }

    #[must_use]
    pub fn with_inline_child_scripts(mut self, inline: bool) -> Self {
        self.inline_child_scripts = inline;
        self
    }

    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn ServerAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// The adapter to actually emit with: the configured one, or the bundled
    /// default.
    pub fn adapter_or_default(&self) -> Arc<dyn ServerAdapter> {
        self.adapter
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultServerAdapter))
    }
}

impl std::fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileOptions")
            .field("entry_path", &self.entry_path)
            .field("client_runtime_specifier", &self.client_runtime_specifier)
            .field("inline_child_scripts", &self.inline_child_scripts)
            .field("adapter", &self.adapter.as_ref().map(|_| "Some(<adapter>)"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_runtime_specifier() {
        let opts = CompileOptions::new("/src/Page.tsx");
        assert_eq!(opts.client_runtime_specifier, "barefoot/runtime");
        assert!(!opts.inline_child_scripts);
    }

    #[test]
    fn falls_back_to_default_adapter() {
        let opts = CompileOptions::new("/src/Page.tsx");
        let _adapter = opts.adapter_or_default();
    }
}
