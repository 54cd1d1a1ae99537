//! Type-expression parsing: `parseType`, a dedicated recursive entry
//! point parallel to [`crate::expr::parse_expression`].
//!
//! Types are expressions in this grammar (see `loom_ast::ExprKind`'s
//! `Type*` variants), but they are parsed through their own function
//! rather than through the general Pratt loop: `<` directly introduces
//! generic arguments here (`List<i32>`), whereas in value position the
//! same syntax would collide with the `Lt` comparison operator and needs
//! the `.< … >` turbofish spelling instead.

use loom_ast::ExprKind;
use loom_lexer::TokenKind;

use crate::error::ParseResult;
use crate::parser::Parser;
use crate::precedence::Precedence;

/// Token kinds that can open a type expression; shared with the
/// expression parser's array/return-type disambiguation heuristics.
pub(crate) fn looks_like_type_start<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> bool {
    matches!(
        p.peek().kind,
        TokenKind::Identifier
            | TokenKind::SelfType
            | TokenKind::Amp
            | TokenKind::Star
            | TokenKind::LBracket
            | TokenKind::Question
            | TokenKind::Bang
            | TokenKind::Fn
            | TokenKind::LParen
    )
}

pub(crate) fn parse_type<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    let mut ty = parse_type_prefix(p)?;
    loop {
        match p.peek().kind {
            TokenKind::Dot => {
                p.advance();
                let member = p.expect(TokenKind::Identifier, "expected member name after '.'")?;
                ty = p.ctx.alloc_expr(
                    p.span_from(start),
                    ExprKind::MemberAccess { target: ty, member: member.lexeme },
                );
            }
            TokenKind::Lt => {
                p.advance();
                let args = parse_generic_arg_list(p)?;
                ty = p.ctx.alloc_expr(
                    p.span_from(start),
                    ExprKind::GenericInstantiation { target: ty, args },
                );
            }
            TokenKind::DotDot | TokenKind::DotDotEq => {
                let inclusive = p.peek().kind == TokenKind::DotDotEq;
                p.advance();
                let end = parse_type(p)?;
                ty = p.ctx.alloc_expr(
                    p.span_from(start),
                    ExprKind::Range { start: Some(ty), end: Some(end), inclusive },
                );
            }
            _ => break,
        }
    }
    Ok(ty)
}

/// Whether the current token can close a generic argument list: a plain
/// `>`, or a wider operator (`>>`, `>=`) that the lexer's maximal munch
/// folded a closing `>` into (see [`close_generic_arg_list`]).
fn at_generic_close<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> bool {
    matches!(p.peek().kind, TokenKind::Gt | TokenKind::Shr | TokenKind::GtEq)
}

fn parse_generic_arg_list<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
) -> ParseResult<&'ast [loom_ast::Expr<'ast>]> {
    let mut args = Vec::new();
    if !at_generic_close(p) {
        loop {
            args.push(*parse_type(p)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if at_generic_close(p) {
                break;
            }
        }
    }
    close_generic_arg_list(p)?;
    Ok(p.ctx.alloc_slice(args))
}

/// Consumes the `>` that closes a generic argument list. A nested list
/// like `List<List<i32>>` lexes its tail as one `Shr` token (`>>`), and a
/// trailing `T>=` would lex as `GtEq`; in both cases this splits off a
/// one-byte `>` and leaves the rest (another `>`, or `=`) as the next
/// token for whatever follows.
fn close_generic_arg_list<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<()> {
    match p.peek().kind {
        TokenKind::Gt => {
            p.advance();
            Ok(())
        }
        TokenKind::Shr | TokenKind::GtEq => {
            p.split_closing_angle();
            p.advance(); // the synthetic closing '>'
            Ok(())
        }
        _ => {
            let span = p.peek().span;
            p.error(span, "expected '>'".to_string());
            Err(crate::error::ParseError)
        }
    }
}

fn parse_type_prefix<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    match p.peek().kind {
        TokenKind::Identifier | TokenKind::SelfType => {
            let tok = p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Identifier(tok.lexeme)))
        }
        TokenKind::Amp => {
            p.advance();
            let mutable = p.match_token(TokenKind::Mut);
            let pointee = parse_type(p)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypeReference { mutable, pointee }))
        }
        TokenKind::Star => {
            p.advance();
            let mutable = p.match_token(TokenKind::Mut);
            let pointee = parse_type(p)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypePointer { mutable, pointee }))
        }
        TokenKind::LBracket => {
            p.advance();
            if p.match_token(TokenKind::RBracket) {
                let element = parse_type(p)?;
                Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypeSlice(element)))
            } else {
                let size = crate::expr::parse_expression(p, Precedence::Lowest)?;
                p.expect(TokenKind::RBracket, "expected ']'")?;
                let element = parse_type(p)?;
                Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypeArray { size, element }))
            }
        }
        TokenKind::Question => {
            p.advance();
            let inner = parse_type(p)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypeOptional(inner)))
        }
        TokenKind::Bang => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypeNever))
        }
        TokenKind::Fn => crate::expr::parse_fn_type(p),
        TokenKind::LParen => parse_type_tuple(p),
        _ => {
            let span = p.peek().span;
            p.error(span, "expected type".to_string());
            Err(crate::error::ParseError)
        }
    }
}

fn parse_type_tuple<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    p.advance(); // '('
    if p.match_token(TokenKind::RParen) {
        return Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TupleLiteral(&[])));
    }
    let first = parse_type(p)?;
    if p.match_token(TokenKind::Comma) {
        let mut items = vec![*first];
        while !p.check(TokenKind::RParen) && !p.check(TokenKind::Eof) {
            items.push(*parse_type(p)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
        }
        p.expect(TokenKind::RParen, "expected ')'")?;
        Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TupleLiteral(p.ctx.alloc_slice(items))))
    } else {
        p.expect(TokenKind::RParen, "expected ')'")?;
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use loom_ast::{AstArena, AstContext};
    use loom_base::{DiagnosticContext, Interner};
    use loom_lexer::Lexer;

    use super::*;
    use crate::stream::TokenStream;

    fn parse(src: &str) -> (loom_ast::ExprKind<'static>, bool) {
        let arena = Box::leak(Box::new(AstArena::new()));
        let ctx = Box::leak(Box::new(AstContext::new(arena)));
        let interner = Box::leak(Box::new(Interner::new()));
        let diagnostics = Box::leak(Box::new(DiagnosticContext::new()));
        let mut parser = Parser::new(TokenStream::new(Lexer::new(src)), interner, ctx, diagnostics);
        let ty = parse_type(&mut parser).expect("type should parse");
        (ty.kind, diagnostics.has_errors())
    }

    #[test]
    fn parses_plain_identifier_type() {
        let (kind, errored) = parse("i32");
        assert!(matches!(kind, ExprKind::Identifier(_)));
        assert!(!errored);
    }

    #[test]
    fn parses_reference_type() {
        let (kind, _) = parse("&mut i32");
        match kind {
            ExprKind::TypeReference { mutable, .. } => assert!(mutable),
            other => panic!("expected TypeReference, got {other:?}"),
        }
    }

    #[test]
    fn parses_slice_type() {
        let (kind, _) = parse("[]u8");
        assert!(matches!(kind, ExprKind::TypeSlice(_)));
    }

    #[test]
    fn parses_array_type_with_size() {
        let (kind, _) = parse("[4]u8");
        assert!(matches!(kind, ExprKind::TypeArray { .. }));
    }

    #[test]
    fn parses_generic_instantiation() {
        let (kind, _) = parse("List<i32>");
        assert!(matches!(kind, ExprKind::GenericInstantiation { .. }));
    }

    #[test]
    fn nested_generic_closes_despite_shr_maximal_munch() {
        let (kind, errored) = parse("List<List<i32>>");
        assert!(!errored);
        match kind {
            ExprKind::GenericInstantiation { args, .. } => {
                assert_eq!(args.len(), 1);
                assert!(matches!(args[0].kind, ExprKind::GenericInstantiation { .. }));
            }
            other => panic!("expected GenericInstantiation, got {other:?}"),
        }
    }

    #[test]
    fn parses_optional_type() {
        let (kind, _) = parse("?i32");
        assert!(matches!(kind, ExprKind::TypeOptional(_)));
    }

    #[test]
    fn parses_never_type() {
        let (kind, _) = parse("!");
        assert!(matches!(kind, ExprKind::TypeNever));
    }

    #[test]
    fn parses_unit_tuple_type() {
        let (kind, _) = parse("()");
        match kind {
            ExprKind::TupleLiteral(items) => assert!(items.is_empty()),
            other => panic!("expected TupleLiteral, got {other:?}"),
        }
    }

    #[test]
    fn parenthesized_single_type_is_just_that_type() {
        let (kind, _) = parse("(i32)");
        assert!(matches!(kind, ExprKind::Identifier(_)));
    }

    #[test]
    fn parses_fn_type_with_return() {
        let (kind, _) = parse("fn(i32, i32) i32");
        match kind {
            ExprKind::TypeFn { params, ret } => {
                assert_eq!(params.len(), 2);
                assert!(ret.is_some());
            }
            other => panic!("expected TypeFn, got {other:?}"),
        }
    }
}
