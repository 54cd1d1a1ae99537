//! Pattern parsing for `let` bindings, `match` arms, and destructuring.

use loom_ast::{ExprKind, PatternKind, StructPatternField};
use loom_lexer::TokenKind;

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;

pub(crate) fn parse_pattern<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Pattern<'ast>> {
    let start = p.mark();
    match p.peek().kind {
        TokenKind::Underscore => {
            p.advance();
            Ok(p.ctx.alloc_pattern(p.span_from(start), PatternKind::Wildcard))
        }
        TokenKind::Mut => {
            p.advance();
            let name = p.expect(TokenKind::Identifier, "expected a binding name after 'mut'")?;
            Ok(p
                .ctx
                .alloc_pattern(p.span_from(start), PatternKind::Binding { mutable: true, name: name.lexeme }))
        }
        TokenKind::Dot => {
            // `.Name(…)` — unqualified enum-variant shorthand.
            p.advance();
            let name = p.expect(TokenKind::Identifier, "expected a variant name after '.'")?;
            let elements = parse_optional_tuple_elements(p)?;
            Ok(p.ctx.alloc_pattern(
                p.span_from(start),
                PatternKind::EnumVariant { qualifier: None, name: name.lexeme, elements },
            ))
        }
        TokenKind::LParen => parse_tuple_pattern(p),
        TokenKind::Integer
        | TokenKind::Float
        | TokenKind::Char
        | TokenKind::String
        | TokenKind::BoolLiteral
        | TokenKind::Minus => parse_literal_or_range_pattern(p),
        TokenKind::Identifier => parse_identifier_led_pattern(p),
        _ => {
            let span = p.peek().span;
            p.error(span, "expected pattern".to_string());
            Err(ParseError)
        }
    }
}

fn parse_literal_or_range_pattern<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
) -> ParseResult<&'ast loom_ast::Pattern<'ast>> {
    let start = p.mark();
    let first = parse_pattern_literal_expr(p)?;
    if let Some(inclusive) = match p.peek().kind {
        TokenKind::DotDot => Some(false),
        TokenKind::DotDotEq => Some(true),
        _ => None,
    } {
        p.advance();
        let end = parse_pattern_literal_expr(p)?;
        return Ok(p.ctx.alloc_pattern(
            p.span_from(start),
            PatternKind::LiteralRange { start: first, end, inclusive },
        ));
    }
    Ok(p.ctx.alloc_pattern(p.span_from(start), PatternKind::Literal(first)))
}

/// Parses one literal, optionally negated, as used inside a pattern —
/// deliberately narrower than the general expression grammar.
fn parse_pattern_literal_expr<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    let negate = p.match_token(TokenKind::Minus);
    let tok = p.peek();
    let kind = match tok.kind {
        TokenKind::Integer => ExprKind::IntLiteral(tok.lexeme),
        TokenKind::Float => ExprKind::FloatLiteral(tok.lexeme),
        TokenKind::Char => ExprKind::CharLiteral(tok.lexeme),
        TokenKind::String => ExprKind::StringLiteral(tok.lexeme),
        TokenKind::BoolLiteral => ExprKind::BoolLiteral(p.interner.resolve(tok.lexeme) == "true"),
        _ => {
            p.error(tok.span, "expected a literal".to_string());
            return Err(ParseError);
        }
    };
    p.advance();
    let literal = p.ctx.alloc_expr(p.span_from(start), kind);
    if negate {
        Ok(p
            .ctx
            .alloc_expr(p.span_from(start), ExprKind::Unary { op: loom_ast::UnaryOp::Neg, operand: literal }))
    } else {
        Ok(literal)
    }
}

fn parse_tuple_pattern<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Pattern<'ast>> {
    let start = p.mark();
    let elements = parse_tuple_elements(p)?;
    Ok(p.ctx.alloc_pattern(p.span_from(start), PatternKind::Tuple(elements)))
}

fn parse_tuple_elements<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast [loom_ast::Pattern<'ast>]> {
    p.expect(TokenKind::LParen, "expected '('")?;
    let mut items = Vec::new();
    if !p.check(TokenKind::RParen) {
        loop {
            items.push(*parse_pattern(p)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if p.check(TokenKind::RParen) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen, "expected ')'")?;
    Ok(p.ctx.alloc_slice(items))
}

fn parse_optional_tuple_elements<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
) -> ParseResult<Option<&'ast [loom_ast::Pattern<'ast>]>> {
    if p.check(TokenKind::LParen) {
        Ok(Some(parse_tuple_elements(p)?))
    } else {
        Ok(None)
    }
}

/// Handles every pattern form that starts with a plain identifier: a bare
/// binding, a qualified enum variant (`Type.Name(…)`), or a struct
/// destructure (`Type { … }`). Any `.< … >` generic arguments between the
/// qualifier and the rest of the pattern are parsed and discarded —
/// patterns don't carry generic-argument nodes, only the qualifier name.
fn parse_identifier_led_pattern<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
) -> ParseResult<&'ast loom_ast::Pattern<'ast>> {
    let start = p.mark();
    let name = p.advance();
    if p.check(TokenKind::DotLt) {
        p.advance();
        skip_turbofish_args(p)?;
    }
    if p.check(TokenKind::Dot) {
        p.advance();
        let variant = p.expect(TokenKind::Identifier, "expected a variant name after '.'")?;
        let elements = parse_optional_tuple_elements(p)?;
        return Ok(p.ctx.alloc_pattern(
            p.span_from(start),
            PatternKind::EnumVariant { qualifier: Some(name.lexeme), name: variant.lexeme, elements },
        ));
    }
    if p.check(TokenKind::LBrace) {
        return parse_struct_destructure(p, start, name.lexeme);
    }
    Ok(p
        .ctx
        .alloc_pattern(p.span_from(start), PatternKind::Binding { mutable: false, name: name.lexeme }))
}

fn skip_turbofish_args<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<()> {
    if !p.check(TokenKind::Gt) {
        loop {
            crate::type_expr::parse_type(p)?;
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if p.check(TokenKind::Gt) {
                break;
            }
        }
    }
    p.expect(TokenKind::Gt, "expected '>'")?;
    Ok(())
}

fn parse_struct_destructure<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
    start: usize,
    path: loom_base::Symbol,
) -> ParseResult<&'ast loom_ast::Pattern<'ast>> {
    p.advance(); // '{'
    let mut fields = Vec::new();
    let mut has_rest = false;
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        if p.match_token(TokenKind::DotDot) {
            has_rest = true;
            break;
        }
        let mutable = p.match_token(TokenKind::Mut);
        let field_name = p.expect(TokenKind::Identifier, "expected a field name")?;
        let pattern = if p.match_token(TokenKind::Colon) { Some(parse_pattern(p)?) } else { None };
        fields.push(StructPatternField { name: field_name.lexeme, pattern, mutable });
        if !p.match_token(TokenKind::Comma) {
            break;
        }
    }
    p.expect(TokenKind::RBrace, "expected '}'")?;
    Ok(p.ctx.alloc_pattern(
        p.span_from(start),
        PatternKind::StructDestructure { path, fields: p.ctx.alloc_slice(fields), has_rest },
    ))
}

#[cfg(test)]
mod tests {
    use loom_ast::{AstArena, AstContext};
    use loom_base::{DiagnosticContext, Interner};
    use loom_lexer::Lexer;

    use super::*;
    use crate::stream::TokenStream;

    fn parse(src: &str) -> (PatternKind<'static>, usize) {
        let arena = Box::leak(Box::new(AstArena::new()));
        let ctx = Box::leak(Box::new(AstContext::new(arena)));
        let interner = Box::leak(Box::new(Interner::new()));
        let diagnostics = Box::leak(Box::new(DiagnosticContext::new()));
        let mut parser = Parser::new(TokenStream::new(Lexer::new(src)), interner, ctx, diagnostics);
        let pattern = parse_pattern(&mut parser).expect("pattern should parse");
        (pattern.kind, diagnostics.error_count())
    }

    #[test]
    fn wildcard_pattern() {
        let (kind, errs) = parse("_");
        assert_eq!(errs, 0);
        assert!(matches!(kind, PatternKind::Wildcard));
    }

    #[test]
    fn plain_binding() {
        let (kind, _) = parse("x");
        assert!(matches!(kind, PatternKind::Binding { mutable: false, .. }));
    }

    #[test]
    fn mutable_binding() {
        let (kind, _) = parse("mut x");
        assert!(matches!(kind, PatternKind::Binding { mutable: true, .. }));
    }

    #[test]
    fn negative_integer_literal() {
        let (kind, _) = parse("-1");
        match kind {
            PatternKind::Literal(expr) => {
                assert!(matches!(expr.kind, ExprKind::Unary { op: loom_ast::UnaryOp::Neg, .. }));
            }
            other => panic!("expected Literal, got {other:?}"),
        }
    }

    #[test]
    fn literal_range() {
        let (kind, _) = parse("1..10");
        assert!(matches!(kind, PatternKind::LiteralRange { inclusive: false, .. }));
    }

    #[test]
    fn inclusive_literal_range() {
        let (kind, _) = parse("1..=10");
        assert!(matches!(kind, PatternKind::LiteralRange { inclusive: true, .. }));
    }

    #[test]
    fn tuple_pattern() {
        let (kind, _) = parse("(a, b, c)");
        match kind {
            PatternKind::Tuple(items) => assert_eq!(items.len(), 3),
            other => panic!("expected Tuple, got {other:?}"),
        }
    }

    #[test]
    fn unqualified_enum_variant() {
        let (kind, _) = parse(".Some(x)");
        match kind {
            PatternKind::EnumVariant { qualifier, elements, .. } => {
                assert!(qualifier.is_none());
                assert_eq!(elements.unwrap().len(), 1);
            }
            other => panic!("expected EnumVariant, got {other:?}"),
        }
    }

    #[test]
    fn qualified_enum_variant() {
        let (kind, _) = parse("Option.Some(x)");
        match kind {
            PatternKind::EnumVariant { qualifier, .. } => assert!(qualifier.is_some()),
            other => panic!("expected EnumVariant, got {other:?}"),
        }
    }

    #[test]
    fn struct_destructure_with_rest() {
        let (kind, _) = parse("Point { x, y: py, .. }");
        match kind {
            PatternKind::StructDestructure { fields, has_rest, .. } => {
                assert_eq!(fields.len(), 2);
                assert!(has_rest);
            }
            other => panic!("expected StructDestructure, got {other:?}"),
        }
    }

    #[test]
    fn struct_destructure_shorthand_field_has_no_subpattern() {
        let (kind, _) = parse("Point { x }");
        match kind {
            PatternKind::StructDestructure { fields, .. } => {
                assert_eq!(fields.len(), 1);
                assert!(fields[0].pattern.is_none());
            }
            other => panic!("expected StructDestructure, got {other:?}"),
        }
    }
}
