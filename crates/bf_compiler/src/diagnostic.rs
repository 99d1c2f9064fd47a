//! Unified diagnostic types for the compiler.
//!
//! These types are the source of truth for every diagnostic the pipeline can
//! produce — resolution failures, parse errors, unsupported constructs,
//! analysis failures, and import-cycle notices. Both parse errors (from oxc)
//! and pipeline-level diagnostics are mapped into this one shape before
//! reaching a caller.

use std::fmt;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

/// The taxonomy of diagnostic kinds the pipeline can raise, each carrying a
/// stable machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unresolved import or missing referenced component.
    Resolution,
    /// Malformed source (oxc parse failure).
    Parse,
    /// JSX construct the IR cannot represent.
    Unsupported,
    /// Event handler / key expression shape the analyzer cannot parse.
    Analysis,
    /// Import cycle detected by the resolver. Informational — never fatal.
    Cycle,
}

impl DiagnosticKind {
    /// The stable machine-readable code for this kind.
    pub const fn code(self, specific: &'static str) -> &'static str {
        // `specific` distinguishes sibling diagnostics of the same kind
        // (e.g. "module-not-found" vs "missing-component" are both
        // `Resolution`). Kept as a plain passthrough so call sites name
        // their own code while this type still groups them by kind.
        specific
    }

    const fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Resolution => "resolution",
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::Unsupported => "unsupported",
            DiagnosticKind::Analysis => "analysis",
            DiagnosticKind::Cycle => "cycle",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A labeled source span within a diagnostic.
#[derive(Debug, Clone)]
pub struct DiagnosticLabel {
    /// Optional label text (e.g. "component not found here").
    pub text: Option<String>,
    /// Byte offset of the span start.
    pub start: u32,
    /// Byte offset of the span end (exclusive).
    pub end: u32,
    /// 1-based line number.
    pub line: u32,
    /// 0-based column number.
    pub column: u32,
}

impl DiagnosticLabel {
    /// Create a label from byte offsets, computing line/column from source text.
    pub fn new(text: Option<String>, start: u32, end: u32, source_text: &str) -> Self {
        let (line, column) = byte_offset_to_line_column(source_text, start as usize);
        Self {
            text,
            start,
            end,
            line,
            column,
        }
    }

    /// A label with no meaningful source span — used for whole-file/whole-graph
    /// diagnostics (e.g. `ModuleNotFound`, where the requester's import
    /// specifier rather than a position in the requester is the interesting
    /// location, see `resolver.rs`).
    pub fn whole_file() -> Self {
        Self {
            text: None,
            start: 0,
            end: 0,
            line: 1,
            column: 0,
        }
    }
}

/// A single diagnostic message produced by the compiler.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub kind: DiagnosticKind,
    /// Stable machine-readable code, e.g. `"module-not-found"`.
    pub code: &'static str,
    /// The file the diagnostic applies to.
    pub file: String,
    /// Human-readable message text.
    pub message: String,
    /// Optional hint/suggestion for fixing the issue.
    pub hint: String,
    /// Labeled source spans.
    pub labels: Vec<DiagnosticLabel>,
}

impl Diagnostic {
    pub fn error(
        kind: DiagnosticKind,
        code: &'static str,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            kind,
            code,
            file: file.into(),
            message: message.into(),
            hint: String::new(),
            labels: vec![DiagnosticLabel::whole_file()],
        }
    }

    pub fn warning(
        kind: DiagnosticKind,
        code: &'static str,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            kind,
            code,
            file: file.into(),
            message: message.into(),
            hint: String::new(),
            labels: vec![DiagnosticLabel::whole_file()],
        }
    }

    /// Informational diagnostic — used for import cycles, which are reported
    /// but never fail compilation.
    pub fn info(
        kind: DiagnosticKind,
        code: &'static str,
        file: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: DiagnosticSeverity::Information,
            kind,
            code,
            file: file.into(),
            message: message.into(),
            hint: String::new(),
            labels: vec![DiagnosticLabel::whole_file()],
        }
    }

    pub fn with_label(mut self, label: DiagnosticLabel) -> Self {
        if self.labels.len() == 1 && self.labels[0].text.is_none() && self.labels[0].end == 0 {
            self.labels.clear();
        }
        self.labels.push(label);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Create a `Parse` diagnostic from an oxc `OxcDiagnostic`.
    pub fn from_oxc(file: &str, source_text: &str, diag: &oxc_diagnostics::OxcDiagnostic) -> Self {
        let severity = match diag.severity {
            oxc_diagnostics::Severity::Error => DiagnosticSeverity::Error,
            oxc_diagnostics::Severity::Warning => DiagnosticSeverity::Warning,
            oxc_diagnostics::Severity::Advice => DiagnosticSeverity::Hint,
        };

        let hint = diag
            .help
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        let labels = diag
            .labels
            .as_ref()
            .map(|labels| {
                labels
                    .iter()
                    .map(|label| {
                        DiagnosticLabel::new(
                            label.label().map(ToString::to_string),
                            label.offset() as u32,
                            (label.offset() + label.len()) as u32,
                            source_text,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            severity,
            kind: DiagnosticKind::Parse,
            code: "parse-error",
            file: file.to_string(),
            message: diag.message.to_string(),
            hint,
            labels,
        }
    }

    /// Batch-convert a list of oxc diagnostics for one file.
    pub fn from_oxc_list(
        file: &str,
        source_text: &str,
        diagnostics: &[oxc_diagnostics::OxcDiagnostic],
    ) -> Vec<Self> {
        diagnostics
            .iter()
            .map(|d| Self::from_oxc(file, source_text, d))
            .collect()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

/// Convert a UTF-8 byte offset to a 1-based line and 0-based column.
fn byte_offset_to_line_column(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 0u32;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// A per-invocation sink that every pipeline stage pushes into.
///
/// Diagnostics are collected rather than raised eagerly, so the driver keeps
/// compiling past a single file's failure. The overall compile's exit status
/// is non-zero iff any fatal diagnostic was collected.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity == DiagnosticSeverity::Error {
            tracing::warn!(
                file = %diagnostic.file,
                code = diagnostic.code,
                "{}",
                diagnostic.message
            );
        } else {
            tracing::debug!(
                file = %diagnostic.file,
                code = diagnostic.code,
                "{}",
                diagnostic.message
            );
        }
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, more: impl IntoIterator<Item = Diagnostic>) {
        for d in more {
            self.push(d);
        }
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Diagnostic::is_fatal)
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
