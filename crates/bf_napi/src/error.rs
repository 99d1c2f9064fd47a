//! NAPI-object wrappers around [`bf_compiler::diagnostic::Diagnostic`].

use bf_compiler::diagnostic::{Diagnostic, DiagnosticSeverity};
use napi_derive::napi;

/// A labeled source span within a diagnostic.
#[napi(object, use_nullable = true)]
#[derive(Clone)]
pub struct DiagnosticLabel {
    pub text: Option<String>,
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
}

/// A diagnostic message produced by the compiler.
#[napi(object)]
#[derive(Clone)]
pub struct DiagnosticMessage {
    /// `"error" | "warning" | "information" | "hint"`.
    pub severity: String,
    pub code: String,
    pub file: String,
    pub message: String,
    pub hint: String,
    pub labels: Vec<DiagnosticLabel>,
}

impl From<&Diagnostic> for DiagnosticMessage {
    fn from(d: &Diagnostic) -> Self {
        Self {
            severity: severity_name(d.severity).to_string(),
            code: d.code.to_string(),
            file: d.file.clone(),
            message: d.message.clone(),
            hint: d.hint.clone(),
            labels: d
                .labels
                .iter()
                .map(|l| DiagnosticLabel {
                    text: l.text.clone(),
                    start: l.start,
                    end: l.end,
                    line: l.line,
                    column: l.column,
                })
                .collect(),
        }
    }
}

fn severity_name(severity: DiagnosticSeverity) -> &'static str {
    match severity {
        DiagnosticSeverity::Error => "error",
        DiagnosticSeverity::Warning => "warning",
        DiagnosticSeverity::Information => "information",
        DiagnosticSeverity::Hint => "hint",
    }
}

impl DiagnosticMessage {
    pub fn from_list(diagnostics: &[Diagnostic]) -> Vec<Self> {
        diagnostics.iter().map(Self::from).collect()
    }
}
