//! Thin orchestration layer over the Loom front-end crates.
//!
//! [`Pipeline`] owns the state meant to outlive any single parse — loaded
//! source files, the shared string interner, and the accumulated
//! diagnostics — and parses against a caller-supplied [`loom_ast::AstContext`],
//! matching the rest of this workspace's convention that the caller owns
//! the arena a parse borrows from.

pub mod cli;

use std::path::Path;

use loom_ast::{AstContext, Module};
use loom_base::{DiagnosticContext, Interner, LoomError, SourceManager};

/// Owns the cross-file state a driver needs: loaded sources, the
/// interner, and the diagnostic log.
pub struct Pipeline {
    pub sources: SourceManager,
    pub interner: Interner,
    pub diagnostics: DiagnosticContext,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            sources: SourceManager::new(),
            interner: Interner::new(),
            diagnostics: DiagnosticContext::new(),
        }
    }

    /// Loads `path` and parses it into `ctx`'s arena. Diagnostics
    /// accumulate on `self.diagnostics`; a caller checks `has_errors()`
    /// after the call rather than matching on a `Result`.
    pub fn parse_file<'ast>(
        &mut self,
        path: impl AsRef<Path>,
        ctx: &'ast AstContext<'ast>,
    ) -> Result<Module<'ast>, LoomError> {
        let id = self.sources.load_file(path)?;
        let text = self.sources.file(id).text().to_string();
        Ok(loom_parser::parse_module(&text, &mut self.interner, ctx, &mut self.diagnostics))
    }

    /// Parses `source` directly, without touching the source manager.
    /// Useful for tests and REPL-style input that has no file on disk.
    pub fn parse_source<'ast>(&mut self, source: &str, ctx: &'ast AstContext<'ast>) -> Module<'ast> {
        loom_parser::parse_module(source, &mut self.interner, ctx, &mut self.diagnostics)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_ast::AstArena;

    #[test]
    fn parse_source_reports_no_errors_for_well_formed_input() {
        let mut pipeline = Pipeline::new();
        let arena = AstArena::new();
        let ctx = AstContext::new(&arena);
        let module = pipeline.parse_source("fn main() { }", &ctx);
        assert_eq!(module.declarations.len(), 1);
        assert!(!pipeline.diagnostics.has_errors());
    }

    #[test]
    fn parse_file_loads_from_disk() {
        let mut pipeline = Pipeline::new();
        let arena = AstArena::new();
        let ctx = AstContext::new(&arena);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("main.lm");
        std::fs::write(&path, "fn main() { }").expect("write");
        let module = pipeline.parse_file(&path, &ctx).expect("parse_file should succeed");
        assert_eq!(module.declarations.len(), 1);
    }
}
