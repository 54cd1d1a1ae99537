//! Pratt/recursive-descent parser that turns a token stream into a
//! [`loom_ast::Module`].
//!
//! Grammar logic is split across sibling modules by concern — `expr` for
//! the Pratt expression loop, `type_expr` for the parallel type grammar,
//! `pattern` for `let`/`match` patterns, `stmt` for block contents, and
//! `decl` for top-level declarations — all threading through the shared
//! [`Parser`] cursor.

mod decl;
mod error;
mod expr;
mod parser;
mod pattern;
mod precedence;
mod stmt;
mod stream;
mod type_expr;

pub use error::{ParseError, ParseResult};
pub use parser::Parser;
pub use precedence::Precedence;
pub use stream::TokenStream;

use loom_ast::{AstArena, AstContext, Module};
use loom_base::{DiagnosticContext, Interner};
use loom_lexer::Lexer;

/// Parses a complete source string into a [`Module`], reporting syntax
/// errors onto `diagnostics` rather than failing outright — a module with
/// malformed declarations still comes back with whatever parsed cleanly
/// around them.
pub fn parse_module<'ast>(
    source: &str,
    interner: &mut Interner,
    ctx: &'ast AstContext<'ast>,
    diagnostics: &mut DiagnosticContext,
) -> Module<'ast> {
    let stream = TokenStream::new(Lexer::new(source));
    let mut parser = Parser::new(stream, interner, ctx, diagnostics);
    parser.parse_module()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_small_module_end_to_end() {
        let arena = AstArena::new();
        let ctx = AstContext::new(&arena);
        let mut interner = Interner::new();
        let mut diagnostics = DiagnosticContext::new();
        let source = r#"
            struct Point {
                x: f64,
                y: f64,
            }

            fn distance(a: Point, b: Point) f64 {
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                (dx * dx + dy * dy)
            }
        "#;
        let module = parse_module(source, &mut interner, &ctx, &mut diagnostics);
        assert!(!diagnostics.has_errors());
        assert_eq!(module.declarations.len(), 2);
    }

    #[test]
    fn recovers_from_a_malformed_declaration_and_keeps_parsing() {
        let arena = AstArena::new();
        let ctx = AstContext::new(&arena);
        let mut interner = Interner::new();
        let mut diagnostics = DiagnosticContext::new();
        let source = r#"
            fn broken( {
            fn ok() { }
        "#;
        let module = parse_module(source, &mut interner, &ctx, &mut diagnostics);
        assert!(diagnostics.has_errors());
        assert!(module.declarations.iter().any(|d| matches!(d.kind, loom_ast::DeclKind::Function(_))));
    }
}
