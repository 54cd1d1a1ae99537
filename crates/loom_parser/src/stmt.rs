//! Statement parsing: everything that can appear inside a block other
//! than its optional trailing result expression.

use loom_ast::{ExprKind, StmtKind};
use loom_lexer::TokenKind;

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::precedence::Precedence;

/// One unit parsed out of a block's body: either a statement to append,
/// or — when the parsed expression is immediately followed by `}` — the
/// block's trailing result.
pub(crate) enum BlockItem<'a> {
    Stmt(&'a loom_ast::Stmt<'a>),
    Result(&'a loom_ast::Expr<'a>),
}

pub(crate) fn parse_block_item<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<BlockItem<'ast>> {
    if is_decl_starter(p) {
        let decl = p.parse_declaration()?;
        let span = decl.span();
        return Ok(BlockItem::Stmt(p.ctx.alloc_stmt(span, StmtKind::Declaration(decl))));
    }
    match p.peek().kind {
        TokenKind::Let => Ok(BlockItem::Stmt(parse_let_stmt(p, true)?)),
        TokenKind::For => Ok(BlockItem::Stmt(parse_for_stmt(p)?)),
        TokenKind::Return => Ok(BlockItem::Stmt(parse_return_stmt(p)?)),
        TokenKind::Break => Ok(BlockItem::Stmt(parse_break_stmt(p)?)),
        TokenKind::Continue => Ok(BlockItem::Stmt(parse_continue_stmt(p)?)),
        TokenKind::Defer => Ok(BlockItem::Stmt(parse_defer_stmt(p)?)),
        _ => parse_expr_stmt_or_result(p),
    }
}

fn is_decl_starter<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> bool {
    let kind = if p.check(TokenKind::Pub) { p.peek_at(1).kind } else { p.peek().kind };
    matches!(
        kind,
        TokenKind::Fn
            | TokenKind::Struct
            | TokenKind::Enum
            | TokenKind::Union
            | TokenKind::Trait
            | TokenKind::Impl
            | TokenKind::Macro
            | TokenKind::Use
            | TokenKind::Type
            | TokenKind::Const
            | TokenKind::Static
            | TokenKind::Extern
    )
}

fn parse_expr_stmt_or_result<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<BlockItem<'ast>> {
    let start = p.mark();
    let expr = crate::expr::parse_expression(p, Precedence::Lowest)?;
    let has_natural_boundary = matches!(expr.kind, ExprKind::If { .. } | ExprKind::Match { .. } | ExprKind::Block { .. });
    if p.match_token(TokenKind::Semicolon) {
        let span = p.span_from(start);
        return Ok(BlockItem::Stmt(p.ctx.alloc_stmt(span, StmtKind::Expression(expr))));
    }
    if p.check(TokenKind::RBrace) {
        return Ok(BlockItem::Result(expr));
    }
    if has_natural_boundary {
        let span = p.span_from(start);
        return Ok(BlockItem::Stmt(p.ctx.alloc_stmt(span, StmtKind::Expression(expr))));
    }
    let span = p.peek().span;
    p.error(span, "expected ';' after expression statement".to_string());
    Err(ParseError)
}

/// `consume_semicolon` is `false` when called from `for`'s initializer
/// clause, where the loop's own `;` separator plays that role instead.
pub(crate) fn parse_let_stmt<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
    consume_semicolon: bool,
) -> ParseResult<&'ast loom_ast::Stmt<'ast>> {
    let start = p.mark();
    p.advance(); // 'let'
    let pattern = crate::pattern::parse_pattern(p)?;
    let ty = if p.match_token(TokenKind::Colon) { Some(crate::type_expr::parse_type(p)?) } else { None };
    p.expect(TokenKind::Eq, "expected '=' in let binding")?;
    let value = crate::expr::parse_expression(p, Precedence::Lowest)?;
    if consume_semicolon {
        p.expect(TokenKind::Semicolon, "expected ';' after let binding")?;
    }
    let span = p.span_from(start);
    Ok(p.ctx.alloc_stmt(span, StmtKind::Let { pattern, ty, value }))
}

pub(crate) fn parse_for_stmt<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Stmt<'ast>> {
    let start = p.mark();
    p.advance(); // 'for'
    if p.check(TokenKind::LBrace) {
        let body = crate::expr::parse_block_expr(p)?;
        let span = p.span_from(start);
        return Ok(p.ctx.alloc_stmt(span, StmtKind::For { init: None, condition: None, post: None, body }));
    }
    let init = if p.check(TokenKind::Semicolon) {
        None
    } else if p.check(TokenKind::Let) {
        Some(parse_let_stmt(p, false)?)
    } else {
        Some(parse_expr_only_stmt(p)?)
    };
    p.expect(TokenKind::Semicolon, "expected ';' after for-loop initializer")?;
    let condition = if p.check(TokenKind::Semicolon) {
        None
    } else {
        Some(crate::expr::parse_expression(p, Precedence::Lowest)?)
    };
    p.expect(TokenKind::Semicolon, "expected ';' after for-loop condition")?;
    let post = if p.check(TokenKind::LBrace) {
        None
    } else {
        Some(p.with_struct_init_disallowed(|p| crate::expr::parse_expression(p, Precedence::Lowest))?)
    };
    let body = crate::expr::parse_block_expr(p)?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_stmt(span, StmtKind::For { init, condition, post, body }))
}

fn parse_expr_only_stmt<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Stmt<'ast>> {
    let start = p.mark();
    let expr = crate::expr::parse_expression(p, Precedence::Lowest)?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_stmt(span, StmtKind::Expression(expr)))
}

pub(crate) fn parse_return_stmt<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Stmt<'ast>> {
    let start = p.mark();
    p.advance(); // 'return'
    let value = if p.check(TokenKind::Semicolon) {
        None
    } else {
        Some(crate::expr::parse_expression(p, Precedence::Lowest)?)
    };
    p.expect(TokenKind::Semicolon, "expected ';' after 'return'")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_stmt(span, StmtKind::Return(value)))
}

pub(crate) fn parse_break_stmt<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Stmt<'ast>> {
    let start = p.mark();
    p.advance(); // 'break'
    p.expect(TokenKind::Semicolon, "expected ';' after 'break'")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_stmt(span, StmtKind::Break))
}

pub(crate) fn parse_continue_stmt<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Stmt<'ast>> {
    let start = p.mark();
    p.advance(); // 'continue'
    p.expect(TokenKind::Semicolon, "expected ';' after 'continue'")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_stmt(span, StmtKind::Continue))
}

pub(crate) fn parse_defer_stmt<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Stmt<'ast>> {
    let start = p.mark();
    p.advance(); // 'defer'
    let expr = crate::expr::parse_expression(p, Precedence::Lowest)?;
    p.expect(TokenKind::Semicolon, "expected ';' after 'defer'")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_stmt(span, StmtKind::Defer(expr)))
}
