//! Diagnostic accumulation with panic-mode deduplication.
//!
//! Every component that can fail to make sense of the user's source text
//! (the lexer, the parser) reports through a shared [`DiagnosticContext`]
//! rather than returning an error directly. The context tracks a
//! **panic mode** flag: once an error is reported, further reports are
//! suppressed until the parser synchronises, bounding cascades to roughly
//! one diagnostic per recovery boundary.
//!
//! ## Example
//!
//! ```
//! use loom_base::{DiagnosticContext, Severity, Span};
//!
//! let mut ctx = DiagnosticContext::new();
//! ctx.report(Severity::Error, Span::new(4, 5), "expected identifier".to_string());
//! ctx.report(Severity::Error, Span::new(9, 10), "expected ';'".to_string()); // suppressed
//! assert_eq!(ctx.error_count(), 1);
//!
//! ctx.synchronize();
//! ctx.report(Severity::Error, Span::new(20, 21), "unexpected token".to_string());
//! assert_eq!(ctx.error_count(), 2);
//! ```

use crate::span::Span;
use std::fmt;

/// How serious a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        f.write_str(s)
    }
}

/// A single user-visible diagnostic: a severity, a source location, and a
/// message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, span: Span, message: impl Into<String>) -> Self {
        Diagnostic { severity, span, message: message.into() }
    }

    /// Renders `<line>:<column>: <severity>: <message>` for a caller that
    /// has already resolved line/column from the diagnostic's span; the
    /// path prefix is the driver's responsibility since a `Diagnostic`
    /// does not itself know which file it came from.
    pub fn render(&self, line: usize, column: usize) -> String {
        format!("{}:{}: {}: {}", line, column, self.severity, self.message)
    }
}

/// Accumulates [`Diagnostic`]s during lexing/parsing and gates duplicate
/// error reports while in panic mode.
///
/// Warnings and notes are never suppressed by panic mode — only `Error`
/// reports participate in the panic-mode cascade-prevention scheme.
#[derive(Default)]
pub struct DiagnosticContext {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    panic_mode: bool,
}

impl DiagnosticContext {
    pub fn new() -> Self {
        DiagnosticContext::default()
    }

    /// Reports a diagnostic. `Error`-severity reports are suppressed
    /// while in panic mode; call [`synchronize`](Self::synchronize) to
    /// clear panic mode once parsing has found a plausible recovery
    /// point.
    pub fn report(&mut self, severity: Severity, span: Span, message: String) {
        if severity == Severity::Error {
            if self.panic_mode {
                return;
            }
            self.panic_mode = true;
            self.error_count += 1;
        }
        log::trace!("diagnostic: {:?} {:?} {}", severity, span, message);
        self.diagnostics.push(Diagnostic::new(severity, span, message));
    }

    /// Clears panic mode, re-enabling error reporting. Called by the
    /// parser after it has discarded tokens up to a statement or
    /// declaration boundary.
    pub fn synchronize(&mut self) {
        self.panic_mode = false;
    }

    /// Whether an `Error` report was suppressed because we are mid-cascade.
    pub fn in_panic_mode(&self) -> bool {
        self.panic_mode
    }

    /// Total number of `Error`-severity diagnostics reported (suppressed
    /// duplicates do not count).
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Every diagnostic reported so far, in discovery order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `true` if at least one error was reported.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_are_suppressed_during_panic_mode() {
        let mut ctx = DiagnosticContext::new();
        ctx.report(Severity::Error, Span::new(0, 1), "first".into());
        ctx.report(Severity::Error, Span::new(2, 3), "second".into());
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn synchronize_clears_panic_mode() {
        let mut ctx = DiagnosticContext::new();
        ctx.report(Severity::Error, Span::new(0, 1), "first".into());
        ctx.synchronize();
        ctx.report(Severity::Error, Span::new(2, 3), "second".into());
        assert_eq!(ctx.error_count(), 2);
        assert!(!ctx.in_panic_mode());
    }

    #[test]
    fn warnings_never_trigger_panic_mode() {
        let mut ctx = DiagnosticContext::new();
        ctx.report(Severity::Warning, Span::new(0, 1), "careful".into());
        ctx.report(Severity::Error, Span::new(2, 3), "oops".into());
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.diagnostics().len(), 2);
    }

    #[test]
    fn has_errors_reflects_error_count() {
        let mut ctx = DiagnosticContext::new();
        assert!(!ctx.has_errors());
        ctx.report(Severity::Error, Span::new(0, 1), "oops".into());
        assert!(ctx.has_errors());
    }

    #[test]
    fn render_includes_severity_and_message() {
        let diag = Diagnostic::new(Severity::Error, Span::new(0, 1), "bad token");
        let rendered = diag.render(3, 7);
        assert_eq!(rendered, "3:7: error: bad token");
    }
}
