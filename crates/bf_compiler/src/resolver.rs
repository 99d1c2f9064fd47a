//! Source reader & import resolver.
//!
//! Resolving a specifier is the only place the compiler suspends: everything
//! else in the pipeline (extraction, IR construction, emission) is plain
//! synchronous computation over already-read text.

use async_trait::async_trait;

use crate::component::Component;
use crate::diagnostic::{Diagnostic, DiagnosticKind};

/// The file-reading callback the driver suspends on. Implementations wrap
/// whatever I/O the host provides (an in-memory map for tests, a real
/// filesystem, a virtual module graph from a bundler).
#[async_trait]
pub trait FileReader: Send + Sync {
    /// Read a file's contents by absolute path. `None` means "not found" —
    /// the resolver turns that into a `Resolution` diagnostic; a missing
    /// file is never a panic or a hard `Err` at this layer.
    async fn read_file(&self, path: &str) -> Option<String>;
}

/// A resolved import: the absolute path actually read, and its text.
pub struct ResolvedImport {
    pub path: String,
    pub source_text: String,
}

/// `resolve(basePath, importSpecifier) → absolutePath`, then attempt
/// `.tsx` before `<dir>/index.tsx`.
pub async fn resolve_import<R: FileReader + ?Sized>(
    reader: &R,
    base_path: &str,
    specifier: &str,
) -> Result<ResolvedImport, Diagnostic> {
    let base_dir = std::path::Path::new(base_path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let joined = join_and_normalize(&base_dir, specifier);

    let direct = format!("{joined}.tsx");
    if let Some(source_text) = reader.read_file(&direct).await {
        return Ok(ResolvedImport { path: direct, source_text });
    }

    let index = format!("{joined}/index.tsx");
    if let Some(source_text) = reader.read_file(&index).await {
        return Ok(ResolvedImport { path: index, source_text });
    }

    Err(Diagnostic::error(
        DiagnosticKind::Resolution,
        "module-not-found",
        base_path,
        format!("cannot resolve `{specifier}` from `{base_path}`"),
    )
    .with_hint(format!("tried `{direct}` and `{index}`")))
}

/// Join `base_dir` and `specifier`, collapsing `.`/`..` segments without
/// touching the filesystem.
fn join_and_normalize(base_dir: &str, specifier: &str) -> String {
    let absolute = specifier.starts_with('/');
    let mut out: Vec<&str> = Vec::new();
    let segments = if specifier.starts_with('/') {
        specifier.split('/')
    } else {
        base_dir.split('/').chain(specifier.split('/'))
    };
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                if out.last().is_some_and(|s| *s != "..") {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    let joined = out.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Key a component: `"<path>"` for the file's principal component,
/// `"<path>#<Name>"` for every other exported or local component in the
/// same file.
pub fn component_key(file_path: &str, name: &str, is_principal: bool) -> String {
    if is_principal {
        file_path.to_string()
    } else {
        format!("{file_path}#{name}")
    }
}

/// Choose a file's principal component.
///
/// For a file whose last path segment is `index`: prefer the exported
/// component whose name matches the capitalized containing directory;
/// otherwise the first exported component; otherwise there is no principal
/// component (the file declares nothing matching its directory name and
/// nothing else exported). For any other file: the default export, else the
/// first exported component, else `None`.
pub fn select_principal<'a>(file_path: &str, components: &'a [Component]) -> Option<&'a Component> {
    if file_stem(file_path).eq_ignore_ascii_case("index") {
        let capitalized_dir = capitalize(&containing_dir_name(file_path));
        return components
            .iter()
            .find(|c| c.is_exported && c.name == capitalized_dir)
            .or_else(|| components.iter().find(|c| c.is_exported));
    }

    components
        .iter()
        .find(|c| c.is_default_export)
        .or_else(|| components.iter().find(|c| c.is_exported))
}

fn file_stem(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn containing_dir_name(path: &str) -> String {
    std::path::Path::new(path)
        .parent()
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ExtractedFile;

    struct MapReader(rustc_hash::FxHashMap<&'static str, &'static str>);

    #[async_trait]
    impl FileReader for MapReader {
        async fn read_file(&self, path: &str) -> Option<String> {
            self.0.get(path).map(|s| (*s).to_string())
        }
    }

    #[test]
    fn resolves_direct_tsx_before_index() {
        let mut map = rustc_hash::FxHashMap::default();
        map.insert("/src/Card.tsx", "export function Card() { return <div/>; }");
        let reader = MapReader(map);
        let resolved =
            futures::executor::block_on(resolve_import(&reader, "/src/Page.tsx", "./Card")).unwrap();
        assert_eq!(resolved.path, "/src/Card.tsx");
    }

    #[test]
    fn falls_back_to_index() {
        let mut map = rustc_hash::FxHashMap::default();
        map.insert("/src/Card/index.tsx", "export function Card() { return <div/>; }");
        let reader = MapReader(map);
        let resolved =
            futures::executor::block_on(resolve_import(&reader, "/src/Page.tsx", "./Card")).unwrap();
        assert_eq!(resolved.path, "/src/Card/index.tsx");
    }

    #[test]
    fn unresolved_import_is_a_diagnostic() {
        let reader = MapReader(rustc_hash::FxHashMap::default());
        let err =
            futures::executor::block_on(resolve_import(&reader, "/src/Page.tsx", "./Missing"))
                .unwrap_err();
        assert_eq!(err.code, "module-not-found");
    }

    fn component(name: &str, is_exported: bool, is_default_export: bool) -> Component {
        let extracted = ExtractedFile::default();
        let _ = extracted;
        Component {
            name: name.to_string(),
            props: Vec::new(),
            signals: Vec::new(),
            memos: Vec::new(),
            local_functions: Vec::new(),
            local_variables: Vec::new(),
            is_default_export,
            is_exported,
            jsx_source: None,
            ir: None,
        }
    }

    #[test]
    fn index_file_prefers_directory_name_match() {
        let components = vec![component("Helper", true, false), component("Card", true, false)];
        let principal = select_principal("/src/Card/index.tsx", &components).unwrap();
        assert_eq!(principal.name, "Card");
    }

    #[test]
    fn non_index_file_prefers_default_export() {
        let components = vec![component("Named", true, false), component("Main", true, true)];
        let principal = select_principal("/src/Page.tsx", &components).unwrap();
        assert_eq!(principal.name, "Main");
    }
}
