//! Compile driver: resolves an entry file's import graph, extracts and
//! transforms every reachable component exactly once, and aggregates
//! per-file outputs into a single `CompileOutcome`.
//!
//! File reading is the compiler's one suspension point; every other step
//! below — extraction, transform, analysis, emission — runs to completion
//! synchronously once its source text is in hand.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::combiner::{FileOutput, combine_file};
use crate::component::ExtractedFile;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSeverity, Diagnostics};
use crate::extractor::extract_file;
use crate::options::CompileOptions;
use crate::resolver::{FileReader, resolve_import};

/// The complete result of one `compile` invocation.
pub struct CompileOutcome {
    /// Every file actually visited, keyed by its resolved absolute path.
    pub files: FxHashMap<String, FileOutput>,
    pub diagnostics: Diagnostics,
    /// Files that were reached (imported or the entry itself) but never
    /// produced an output because extraction or reading failed.
    excluded_files: Vec<String>,
}

impl CompileOutcome {
    /// A successful compile has no fatal diagnostic; warnings alone don't
    /// fail it.
    pub fn ok(&self) -> bool {
        !self.diagnostics.has_fatal()
    }

    /// A whole-graph summary: how many files actually produced output, which
    /// ones didn't, and how the collected diagnostics break down by
    /// severity. Useful for a build-time caller reporting on a multi-file
    /// compile without re-deriving these counts from `files`/`diagnostics`
    /// itself.
    pub fn manifest(&self) -> Manifest {
        let mut error_count = 0;
        let mut warning_count = 0;
        for diagnostic in self.diagnostics.as_slice() {
            match diagnostic.severity {
                DiagnosticSeverity::Error => error_count += 1,
                DiagnosticSeverity::Warning => warning_count += 1,
                DiagnosticSeverity::Information | DiagnosticSeverity::Hint => {}
            }
        }
        Manifest {
            file_count: self.files.len(),
            excluded_files: self.excluded_files.clone(),
            error_count,
            warning_count,
        }
    }
}

/// Whole-graph compile summary, aggregated the way a build tool would want
/// to log or cache it.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub file_count: usize,
    pub excluded_files: Vec<String>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Per-invocation state threaded through the recursive descent: already
/// extracted/transformed files, and the set of paths currently being
/// resolved (cycle detection).
struct DriverState<'a, R: FileReader + ?Sized> {
    reader: &'a R,
    extracted: FxHashMap<String, ExtractedFile>,
    in_progress: FxHashSet<String>,
    diagnostics: Diagnostics,
    excluded_files: Vec<String>,
}

/// Compile starting from `options.entry_path`, following every import
/// reachable from its principal component.
pub async fn compile<R: FileReader + ?Sized>(reader: &R, options: &CompileOptions) -> CompileOutcome {
    let mut state = DriverState {
        reader,
        extracted: FxHashMap::default(),
        in_progress: FxHashSet::default(),
        diagnostics: Diagnostics::new(),
        excluded_files: Vec::new(),
    };

    let Some(entry_source) = reader.read_file(&options.entry_path).await else {
        state.diagnostics.push(Diagnostic::error(
            DiagnosticKind::Resolution,
            "entry-not-found",
            &options.entry_path,
            format!("cannot read entry file `{}`", options.entry_path),
        ));
        return CompileOutcome {
            files: FxHashMap::default(),
            diagnostics: state.diagnostics,
            excluded_files: vec![options.entry_path.clone()],
        };
    };

    visit_file(&mut state, options.entry_path.clone(), entry_source).await;

    let mut files = FxHashMap::default();
    for (path, extracted) in &state.extracted {
        let output = combine_file(extracted, path, options);
        files.insert(path.clone(), output);
    }

    CompileOutcome { files, diagnostics: state.diagnostics, excluded_files: state.excluded_files }
}

/// Extract one file (if not already done), transitively visiting every
/// import it declares. A file already `in_progress` is a cycle: the caller
/// gets a non-fatal diagnostic and the partial graph already discovered,
/// rather than recursing forever.
fn visit_file<'a, R: FileReader + ?Sized>(
    state: &'a mut DriverState<'_, R>,
    path: String,
    source_text: String,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + 'a>> {
    Box::pin(async move {
        if state.extracted.contains_key(&path) {
            return;
        }
        if !state.in_progress.insert(path.clone()) {
            state.diagnostics.push(Diagnostic::warning(
                DiagnosticKind::Cycle,
                "import-cycle",
                &path,
                format!("`{path}` is part of an import cycle; its re-import resolves to an empty component"),
            ));
            return;
        }

        let Some(extracted) = extract_file(&path, &source_text, &mut state.diagnostics) else {
            state.in_progress.remove(&path);
            state.excluded_files.push(path);
            return;
        };

        let import_specifiers: Vec<String> =
            extracted.imports.iter().filter_map(|line| relative_specifier(line)).collect();

        state.extracted.insert(path.clone(), extracted);

        for specifier in import_specifiers {
            match resolve_import(state.reader, &path, &specifier).await {
                Ok(resolved) => {
                    visit_file(state, resolved.path, resolved.source_text).await;
                }
                Err(diag) => state.diagnostics.push(diag),
            }
        }

        state.in_progress.remove(&path);
    })
}

/// Pull the specifier out of a preserved `import ... from "specifier"` line,
/// for the relative (`./`, `../`) forms the resolver handles. Bare
/// specifiers (package imports) are left to the host's own module system —
/// the compiler never follows into `node_modules`.
fn relative_specifier(import_line: &str) -> Option<String> {
    let quote_char = import_line.rfind('"').map(|_| '"').or_else(|| import_line.rfind('\'').map(|_| '\''))?;
    let last = import_line.rfind(quote_char)?;
    let before = &import_line[..last];
    let first = before.rfind(quote_char)?;
    let specifier = &import_line[first + 1..last];
    if specifier.starts_with('.') { Some(specifier.to_string()) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct MapReader(FxHashMap<&'static str, &'static str>);

    #[async_trait]
    impl FileReader for MapReader {
        async fn read_file(&self, path: &str) -> Option<String> {
            self.0.get(path).map(|s| (*s).to_string())
        }
    }

    #[test]
    fn relative_import_specifier_is_extracted() {
        assert_eq!(
            relative_specifier("import { Card } from \"./Card\";"),
            Some("./Card".to_string())
        );
        assert_eq!(relative_specifier("import { useState } from \"react\";"), None);
    }

    #[test]
    fn single_file_compile_produces_one_file_output() {
        let mut map = FxHashMap::default();
        map.insert(
            "/src/Counter.tsx",
            "export function Counter() {\n  const [n, setN] = createSignal(0);\n  return (<button onClick={() => setN(n() + 1)}>{n()}</button>);\n}\n",
        );
        let reader = MapReader(map);
        let options = CompileOptions::new("/src/Counter.tsx");
        let outcome = futures::executor::block_on(compile(&reader, &options));
        assert!(outcome.ok());
        assert!(outcome.files.contains_key("/src/Counter.tsx"));
    }

    #[test]
    fn missing_entry_file_is_a_fatal_diagnostic() {
        let reader = MapReader(FxHashMap::default());
        let options = CompileOptions::new("/src/Missing.tsx");
        let outcome = futures::executor::block_on(compile(&reader, &options));
        assert!(!outcome.ok());
        let manifest = outcome.manifest();
        assert_eq!(manifest.file_count, 0);
        assert_eq!(manifest.excluded_files, vec!["/src/Missing.tsx".to_string()]);
        assert_eq!(manifest.error_count, 1);
    }

    #[test]
    fn manifest_counts_diagnostics_by_severity() {
        let mut map = FxHashMap::default();
        map.insert(
            "/src/Counter.tsx",
            "export function Counter() {\n  const [n, setN] = createSignal(0);\n  return (<button onClick={() => setN(n() + 1)}>{n()}</button>);\n}\n",
        );
        let reader = MapReader(map);
        let options = CompileOptions::new("/src/Counter.tsx");
        let outcome = futures::executor::block_on(compile(&reader, &options));
        let manifest = outcome.manifest();
        assert_eq!(manifest.file_count, 1);
        assert!(manifest.excluded_files.is_empty());
        assert_eq!(manifest.error_count, 0);
    }

    #[test]
    fn import_cycle_does_not_recurse_forever() {
        let mut map = FxHashMap::default();
        map.insert(
            "/src/A.tsx",
            "import { B } from \"./B\";\nexport function A() { return (<B/>); }\n",
        );
        map.insert(
            "/src/B.tsx",
            "import { A } from \"./A\";\nexport function B() { return (<A/>); }\n",
        );
        let reader = MapReader(map);
        let options = CompileOptions::new("/src/A.tsx");
        let outcome = futures::executor::block_on(compile(&reader, &options));
        assert!(outcome.files.contains_key("/src/A.tsx"));
        assert!(outcome.files.contains_key("/src/B.tsx"));
    }
}
