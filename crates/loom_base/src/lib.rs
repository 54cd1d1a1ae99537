//! Structural foundation shared across the Loom front end: spans, source
//! file management, string interning, arena allocation, and diagnostic
//! collection.
//!
//! Nothing in this crate knows about Loom's grammar — it is pure
//! infrastructure, consumed by `loom-lexer`, `loom-ast`, and
//! `loom-parser`.

mod arena;
mod diagnostic;
mod error;
mod intern;
mod source;
mod span;

pub use arena::Arena;
pub use diagnostic::{Diagnostic, DiagnosticContext, Severity};
pub use error::LoomError;
pub use intern::{Interner, Symbol, SymbolEq};
pub use source::{FileId, SourceFile, SourceManager, MAX_FILE_SIZE};
pub use span::Span;
