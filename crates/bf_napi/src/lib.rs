//! Node.js binding for the split-rendering JSX compiler.

mod error;

#[cfg(all(
    feature = "allocator",
    not(any(
        target_arch = "arm",
        target_os = "freebsd",
        target_os = "windows",
        target_family = "wasm"
    ))
))]
#[global_allocator]
static ALLOC: mimalloc_safe::MiMalloc = mimalloc_safe::MiMalloc;

use async_trait::async_trait;
use bf_compiler::{CompileOptions, FileReader, compile as compile_entry};
use napi::{Task, bindgen_prelude::AsyncTask};
use napi_derive::napi;
use rustc_hash::FxHashMap;

use crate::error::DiagnosticMessage;

/// Options for one compile call.
#[napi(object)]
pub struct CompileConfig {
    /// Absolute path of the entry file within `files`.
    pub entry_path: String,
    /// Every source file reachable from `entry_path`, keyed by absolute
    /// path. The host resolves and reads these ahead of time (the NAPI
    /// boundary has no convenient async filesystem callback), so every
    /// import the compiler might follow must already be present here.
    pub files: std::collections::HashMap<String, String>,
    /// Defaults to `"barefoot/runtime"`.
    pub client_runtime_specifier: Option<String>,
    pub inline_child_scripts: Option<bool>,
}

/// One rendered server component within a file.
#[napi(object)]
pub struct ServerComponent {
    pub name: String,
    pub code: String,
}

/// Everything produced for one source file.
#[napi(object)]
pub struct FileResult {
    pub source_path: String,
    pub server_components: Vec<ServerComponent>,
    pub combined_server_file: Option<String>,
    pub client_script: Option<String>,
    pub server_file_name: String,
    pub client_file_name: Option<String>,
}

/// The full result of a compile call.
#[napi(object)]
pub struct CompileResult {
    pub ok: bool,
    pub files: Vec<FileResult>,
    pub diagnostics: Vec<DiagnosticMessage>,
    /// Whole-graph summary: how many files compiled, which ones were
    /// reached but excluded, and diagnostic counts by severity.
    pub file_count: u32,
    pub excluded_files: Vec<String>,
    pub error_count: u32,
    pub warning_count: u32,
}

struct MapFileReader(FxHashMap<String, String>);

#[async_trait]
impl FileReader for MapFileReader {
    async fn read_file(&self, path: &str) -> Option<String> {
        self.0.get(path).cloned()
    }
}

fn build_options(config: &CompileConfig) -> CompileOptions {
    let mut options = CompileOptions::new(config.entry_path.clone());
    if let Some(specifier) = &config.client_runtime_specifier {
        options = options.with_client_runtime_specifier(specifier.clone());
    }
    if let Some(inline) = config.inline_child_scripts {
        options = options.with_inline_child_scripts(inline);
    }
    options
}

fn build_reader(config: &CompileConfig) -> MapFileReader {
    let mut map = FxHashMap::default();
    for (path, source) in &config.files {
        map.insert(path.clone(), source.clone());
    }
    MapFileReader(map)
}

async fn compile_config(config: CompileConfig) -> CompileResult {
    let reader = build_reader(&config);
    let options = build_options(&config);
    let outcome = compile_entry(&reader, &options).await;
    let ok = outcome.ok();
    let manifest = outcome.manifest();
    let diagnostics = DiagnosticMessage::from_list(outcome.diagnostics.as_slice());

    let files = outcome
        .files
        .into_values()
        .map(|file| FileResult {
            source_path: file.source_path,
            server_components: file
                .server_components
                .into_iter()
                .map(|(name, code)| ServerComponent { name, code })
                .collect(),
            combined_server_file: file.combined_server_file,
            client_script: file.client_script,
            server_file_name: file.server_file_name,
            client_file_name: file.client_file_name,
        })
        .collect();

    CompileResult {
        ok,
        files,
        diagnostics,
        file_count: manifest.file_count as u32,
        excluded_files: manifest.excluded_files,
        error_count: manifest.error_count as u32,
        warning_count: manifest.warning_count as u32,
    }
}

/// Compile synchronously, blocking the calling thread. Suitable for
/// build-time usage (bundler plugins, CLI invocations) where blocking is
/// acceptable and an extra thread hop would only add latency.
#[napi]
pub fn compile_sync(config: CompileConfig) -> CompileResult {
    futures::executor::block_on(compile_config(config))
}

struct CompileTask {
    config: Option<CompileConfig>,
}

impl Task for CompileTask {
    type Output = CompileResult;
    type JsValue = CompileResult;

    fn compute(&mut self) -> napi::Result<Self::Output> {
        let config = self.config.take().expect("CompileTask::compute called twice");
        Ok(futures::executor::block_on(compile_config(config)))
    }

    fn resolve(&mut self, _env: napi::Env, output: Self::Output) -> napi::Result<Self::JsValue> {
        Ok(output)
    }
}

/// Compile off the JS event loop thread, for callers that can't afford to
/// block (a dev-server middleware handling concurrent requests).
#[napi]
pub fn compile(config: CompileConfig) -> AsyncTask<CompileTask> {
    AsyncTask::new(CompileTask { config: Some(config) })
}
