use colored::Colorize;
use core::fmt;
use shared_context::interner::Interner;
use shared_context::source_map::SourceMap;
use shared_context::{Identifier, Span};

/// Every diagnostic the lowering pass can produce, with the span of the
/// offending statement.
#[derive(Debug, Clone, Copy)]
pub enum DiagnosticKind {
    ReturnUnderFork(Span),
    ReturnOutsideFtask(Span),
    ReturnMissingValue(Span),
    ReturnValueInTask(Span),
    BreakOutsideLoop(Span),
    ContinueOutsideLoop(Span),
    DisableTargetMissing { target: Identifier, span: Span },
    DisableBlockWithFork(Span),
    DisableFork(Span),
}

/// Hard errors make the compile fail; unsupported constructs are warnings
/// so a design using them still elaborates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Unsupported,
}

/// A reported problem, formatted eagerly against the source map so the
/// message stays printable after the pass state is gone.
#[derive(Debug)]
pub struct LinkDiagnostic {
    severity: Severity,
    message: String,
}

impl LinkDiagnostic {
    pub fn new(kind: DiagnosticKind, source_map: &SourceMap, interner: &Interner) -> Self {
        let (severity, span, text) = match kind {
            DiagnosticKind::ReturnUnderFork(span) => (
                Severity::Error,
                span,
                "Return isn't legal under fork (IEEE 1800-2023 9.2.3)".to_string(),
            ),
            DiagnosticKind::ReturnOutsideFtask(span) => (
                Severity::Error,
                span,
                "Return isn't underneath a task or function".to_string(),
            ),
            DiagnosticKind::ReturnMissingValue(span) => (
                Severity::Error,
                span,
                "Return underneath a function should have return value".to_string(),
            ),
            DiagnosticKind::ReturnValueInTask(span) => (
                Severity::Error,
                span,
                "Return underneath a task shouldn't have return value".to_string(),
            ),
            DiagnosticKind::BreakOutsideLoop(span) => (
                Severity::Error,
                span,
                "break isn't underneath a loop".to_string(),
            ),
            DiagnosticKind::ContinueOutsideLoop(span) => (
                Severity::Error,
                span,
                "continue isn't underneath a loop".to_string(),
            ),
            DiagnosticKind::DisableTargetMissing { target, span } => (
                Severity::Unsupported,
                span,
                format!(
                    "disable isn't underneath a begin with name: {}",
                    interner.lookup(target.get_symbol())
                ),
            ),
            DiagnosticKind::DisableBlockWithFork(span) => (
                Severity::Unsupported,
                span,
                "Unsupported: disabling block that contains a fork".to_string(),
            ),
            DiagnosticKind::DisableFork(span) => (
                Severity::Unsupported,
                span,
                "Unsupported: disabling fork by name".to_string(),
            ),
        };

        let message = format!(
            "{}\n{}",
            text,
            source_map.format_message(String::new(), span)
        );
        Self { severity, message }
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn get_message_ref(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for LinkDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error".red().bold(),
            Severity::Unsupported => "warning".yellow().bold(),
        };
        write!(f, "{}: {}", tag, self.message)
    }
}

impl std::error::Error for LinkDiagnostic {}
