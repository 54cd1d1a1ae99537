//! Pratt expression parsing.
//!
//! A single recursive entry, [`parse_expression`], drives all expression
//! parsing: it parses one prefix term, folds on any immediate postfix
//! chain (calls, indexing, member access, …, which always bind tighter
//! than any binary operator), then loops consuming infix/assignment/range
//! operators whose precedence clears the caller's `min_prec` floor.

use loom_ast::{ExprKind, MatchArm, StructInitField};
use loom_lexer::{Token, TokenKind};

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::precedence::{assign_op, binary_precedence, is_range_operator, Precedence};

pub(crate) fn parse_expression<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
    min_prec: Precedence,
) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let prefix = parse_prefix(p)?;
    let mut left = parse_postfix(p, prefix)?;
    loop {
        let kind = p.peek().kind;

        if let Some(op) = assign_op(kind) {
            if Precedence::Assignment < min_prec {
                break;
            }
            p.advance();
            // Right-associative: recurse one level below Assignment so a
            // further assignment on the right is swallowed here rather
            // than stopping the fold.
            let value = parse_expression(p, Precedence::Lowest)?;
            let span = left.span().merge(value.span());
            left = p.ctx.alloc_expr(span, ExprKind::Assignment { op, target: left, value });
            continue;
        }

        if let Some(inclusive) = is_range_operator(kind) {
            if Precedence::Range < min_prec {
                break;
            }
            p.advance();
            let end = if can_start_expression(p) {
                Some(parse_expression(p, Precedence::Range.next_for_left_assoc())?)
            } else {
                if inclusive {
                    let span = p.peek().span;
                    p.error(span, "inclusive range requires an upper bound".to_string());
                }
                None
            };
            let span = match end {
                Some(e) => left.span().merge(e.span()),
                None => left.span(),
            };
            left = p.ctx.alloc_expr(span, ExprKind::Range { start: Some(left), end, inclusive });
            continue;
        }

        if let Some((prec, op)) = binary_precedence(kind) {
            if prec < min_prec {
                break;
            }
            p.advance();
            // Left-associative: recurse allowing only strictly-tighter
            // operators, so a further operator at this same level stops
            // the recursive call and is picked up by this loop instead.
            let right = parse_expression(p, prec.next_for_left_assoc())?;
            let span = left.span().merge(right.span());
            left = p.ctx.alloc_expr(span, ExprKind::Binary { op, left, right });
            continue;
        }

        break;
    }
    Ok(left)
}

/// Whether the current token could begin an expression; used to detect an
/// open-ended range end (`a..`) versus a bound range end (`a..b`).
pub(crate) fn can_start_expression<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> bool {
    !matches!(
        p.peek().kind,
        TokenKind::Eof
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::RBrace
            | TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::Colon
            | TokenKind::FatArrow
    )
}

fn parse_prefix<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    let tok = p.peek();
    match tok.kind {
        TokenKind::Integer => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::IntLiteral(tok.lexeme)))
        }
        TokenKind::Float => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::FloatLiteral(tok.lexeme)))
        }
        TokenKind::Char => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::CharLiteral(tok.lexeme)))
        }
        TokenKind::String => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::StringLiteral(tok.lexeme)))
        }
        TokenKind::BoolLiteral => {
            p.advance();
            let value = p.interner.resolve(tok.lexeme) == "true";
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::BoolLiteral(value)))
        }
        TokenKind::Undef => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Undef))
        }
        TokenKind::Null => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Null))
        }
        TokenKind::Unreachable => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Unreachable))
        }
        TokenKind::Identifier | TokenKind::SelfValue | TokenKind::SelfType => {
            p.advance();
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Identifier(tok.lexeme)))
        }
        TokenKind::LParen => parse_paren_or_tuple(p),
        TokenKind::LBracket => parse_bracket_expr(p),
        TokenKind::Minus => {
            p.advance();
            let operand = parse_expression(p, Precedence::Prefix)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Unary { op: loom_ast::UnaryOp::Neg, operand }))
        }
        TokenKind::Bang => {
            p.advance();
            let operand = parse_expression(p, Precedence::Prefix)?;
            Ok(p
                .ctx
                .alloc_expr(p.span_from(start), ExprKind::Unary { op: loom_ast::UnaryOp::LogicalNot, operand }))
        }
        TokenKind::Tilde => {
            p.advance();
            let operand = parse_expression(p, Precedence::Prefix)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Unary { op: loom_ast::UnaryOp::BitNot, operand }))
        }
        TokenKind::Hash => {
            p.advance();
            let operand = parse_expression(p, Precedence::Prefix)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Unary { op: loom_ast::UnaryOp::Hash, operand }))
        }
        TokenKind::Question => {
            p.advance();
            let operand = parse_expression(p, Precedence::Prefix)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Unary { op: loom_ast::UnaryOp::Try, operand }))
        }
        TokenKind::Amp => {
            p.advance();
            let mutable = p.match_token(TokenKind::Mut);
            let operand = parse_expression(p, Precedence::Prefix)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::AddressOf { mutable, operand }))
        }
        TokenKind::Star => {
            // Prefix `*` only spells a volatile-pointer type; value-level
            // dereference is the postfix `.*` form.
            p.advance();
            let mutable = p.match_token(TokenKind::Mut);
            let pointee = crate::type_expr::parse_type(p)?;
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypePointer { mutable, pointee }))
        }
        TokenKind::If => parse_if_expr(p),
        TokenKind::Match => parse_match_expr(p),
        TokenKind::LBrace => parse_block_expr(p),
        TokenKind::Fn => parse_fn_type(p),
        TokenKind::DotDot | TokenKind::DotDotEq => {
            let inclusive = tok.kind == TokenKind::DotDotEq;
            p.advance();
            let end = if can_start_expression(p) {
                Some(parse_expression(p, Precedence::Range.next_for_left_assoc())?)
            } else {
                if inclusive {
                    let span = p.peek().span;
                    p.error(span, "inclusive range requires an upper bound".to_string());
                }
                None
            };
            Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::Range { start: None, end, inclusive }))
        }
        _ => {
            p.error(tok.span, "expected expression".to_string());
            Err(ParseError)
        }
    }
}

/// `fn(…) R` parsed as a type expression; reachable both from
/// expression-prefix position (types are expressions) and from
/// [`crate::type_expr::parse_type`]'s own prefix dispatch.
pub(crate) fn parse_fn_type<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    p.advance(); // 'fn'
    p.expect(TokenKind::LParen, "expected '(' after 'fn'")?;
    let mut params = Vec::new();
    if !p.check(TokenKind::RParen) {
        loop {
            params.push(*crate::type_expr::parse_type(p)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if p.check(TokenKind::RParen) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen, "expected ')'")?;
    let ret = if crate::type_expr::looks_like_type_start(p) {
        Some(crate::type_expr::parse_type(p)?)
    } else {
        None
    };
    Ok(p
        .ctx
        .alloc_expr(p.span_from(start), ExprKind::TypeFn { params: p.ctx.alloc_slice(params), ret }))
}

fn parse_paren_or_tuple<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    p.advance(); // '('
    if p.match_token(TokenKind::RParen) {
        return Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TupleLiteral(&[])));
    }
    let first = parse_expression(p, Precedence::Lowest)?;
    if p.match_token(TokenKind::Comma) {
        let mut items = vec![*first];
        while !p.check(TokenKind::RParen) && !p.check(TokenKind::Eof) {
            items.push(*parse_expression(p, Precedence::Lowest)?);
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

fn parse_bracket_expr<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    p.advance(); // '['
    if p.match_token(TokenKind::RBracket) {
        if crate::type_expr::looks_like_type_start(p) {
            let element = crate::type_expr::parse_type(p)?;
            return Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypeSlice(element)));
        }
        return Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::ArrayLiteral(&[])));
    }
    let first = parse_expression(p, Precedence::Lowest)?;
    if p.match_token(TokenKind::Semicolon) {
        let count = parse_expression(p, Precedence::Lowest)?;
        p.expect(TokenKind::RBracket, "expected ']'")?;
        return Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::ArrayRepeat { value: first, count }));
    }
    if p.match_token(TokenKind::Comma) {
        let mut items = vec![*first];
        while !p.check(TokenKind::RBracket) && !p.check(TokenKind::Eof) {
            items.push(*parse_expression(p, Precedence::Lowest)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
        }
        p.expect(TokenKind::RBracket, "expected ']'")?;
        return Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::ArrayLiteral(p.ctx.alloc_slice(items))));
    }
    p.expect(TokenKind::RBracket, "expected ']'")?;
    if crate::type_expr::looks_like_type_start(p) {
        let element = crate::type_expr::parse_type(p)?;
        return Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::TypeArray { size: first, element }));
    }
    Ok(p.ctx.alloc_expr(p.span_from(start), ExprKind::ArrayLiteral(p.ctx.alloc_slice([*first]))))
}

fn parse_if_expr<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    p.advance(); // 'if'
    let condition = p.with_struct_init_disallowed(|p| parse_expression(p, Precedence::Lowest))?;
    let then_branch = parse_block_expr(p)?;
    let else_branch = if p.match_token(TokenKind::Else) {
        if p.check(TokenKind::If) {
            Some(parse_if_expr(p)?)
        } else {
            Some(parse_block_expr(p)?)
        }
    } else {
        None
    };
    Ok(p
        .ctx
        .alloc_expr(p.span_from(start), ExprKind::If { condition, then_branch, else_branch }))
}

fn parse_match_expr<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    p.advance(); // 'match'
    let scrutinee = p.with_struct_init_disallowed(|p| parse_expression(p, Precedence::Lowest))?;
    p.expect(TokenKind::LBrace, "expected '{' to start match body")?;
    let mut arms = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match parse_match_arm(p) {
            Ok(arm) => arms.push(arm),
            Err(ParseError) => {
                p.advance();
            }
        }
    }
    p.expect(TokenKind::RBrace, "expected '}'")?;
    Ok(p
        .ctx
        .alloc_expr(p.span_from(start), ExprKind::Match { scrutinee, arms: p.ctx.alloc_slice(arms) }))
}

fn parse_match_arm<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<MatchArm<'ast>> {
    let pattern = crate::pattern::parse_pattern(p)?;
    p.expect(TokenKind::FatArrow, "expected '=>'")?;
    let body = parse_expression(p, Precedence::Lowest)?;
    p.match_token(TokenKind::Comma);
    Ok(MatchArm { pattern, body })
}

/// Parses `{ stmt* expr? }`, re-enabling struct-init disambiguation for
/// the block's own contents regardless of the enclosing context's flag.
pub(crate) fn parse_block_expr<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = p.mark();
    p.expect(TokenKind::LBrace, "expected '{'")?;
    let prev_allow = p.allow_struct_init;
    p.allow_struct_init = true;
    let mut statements = Vec::new();
    let mut result = None;
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match crate::stmt::parse_block_item(p) {
            Ok(crate::stmt::BlockItem::Stmt(s)) => statements.push(*s),
            Ok(crate::stmt::BlockItem::Result(e)) => {
                result = Some(e);
                break;
            }
            Err(ParseError) => p.synchronize(),
        }
    }
    p.allow_struct_init = prev_allow;
    p.expect(TokenKind::RBrace, "expected '}'")?;
    Ok(p.ctx.alloc_expr(
        p.span_from(start),
        ExprKind::Block { statements: p.ctx.alloc_slice(statements), result },
    ))
}

fn parse_postfix<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
    mut left: &'ast loom_ast::Expr<'ast>,
) -> ParseResult<&'ast loom_ast::Expr<'ast>> {
    let start = left.span().start;
    loop {
        match p.peek().kind {
            TokenKind::Dot => {
                p.advance();
                let member = p.expect(TokenKind::Identifier, "expected member name after '.'")?;
                left = p
                    .ctx
                    .alloc_expr(p.span_from(start), ExprKind::MemberAccess { target: left, member: member.lexeme });
            }
            TokenKind::DotLt => {
                p.advance();
                let args = parse_turbofish_args(p)?;
                left = p
                    .ctx
                    .alloc_expr(p.span_from(start), ExprKind::GenericInstantiation { target: left, args });
            }
            TokenKind::DotQuestion => {
                p.advance();
                left = p.ctx.alloc_expr(p.span_from(start), ExprKind::Propagate(left));
            }
            TokenKind::DotStar => {
                p.advance();
                left = p.ctx.alloc_expr(p.span_from(start), ExprKind::Dereference(left));
            }
            TokenKind::LParen => {
                let args = parse_call_args(p)?;
                left = p.ctx.alloc_expr(p.span_from(start), ExprKind::Call { callee: left, args });
            }
            TokenKind::LBracket => {
                p.advance();
                let index = parse_expression(p, Precedence::Lowest)?;
                p.expect(TokenKind::RBracket, "expected ']'")?;
                left = p.ctx.alloc_expr(p.span_from(start), ExprKind::Index { target: left, index });
            }
            TokenKind::Bang => {
                p.advance();
                let tokens = parse_macro_arg_tokens(p)?;
                left = p.ctx.alloc_expr(p.span_from(start), ExprKind::MacroCall { callee: left, tokens });
            }
            TokenKind::LBrace if p.allow_struct_init && is_struct_init_ahead(p) => {
                p.advance();
                let fields = parse_struct_init_fields(p)?;
                p.expect(TokenKind::RBrace, "expected '}'")?;
                left = p.ctx.alloc_expr(p.span_from(start), ExprKind::StructInit { path: left, fields });
            }
            _ => break,
        }
    }
    Ok(left)
}

/// Disambiguates `Ident {` between a struct initialiser and a following
/// block: looks one or two tokens past the `{` for the shape of an empty
/// or field-led struct body.
fn is_struct_init_ahead<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> bool {
    match p.peek_at(1).kind {
        TokenKind::RBrace => true,
        TokenKind::Identifier => {
            matches!(p.peek_at(2).kind, TokenKind::Colon | TokenKind::Comma | TokenKind::RBrace)
        }
        _ => false,
    }
}

fn parse_struct_init_fields<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
) -> ParseResult<&'ast [StructInitField<'ast>]> {
    let mut fields = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        let name = p.expect(TokenKind::Identifier, "expected field name")?;
        let value = if p.match_token(TokenKind::Colon) {
            parse_expression(p, Precedence::Lowest)?
        } else {
            p.ctx.alloc_expr(name.span, ExprKind::Identifier(name.lexeme))
        };
        fields.push(StructInitField { name: name.lexeme, value });
        if !p.match_token(TokenKind::Comma) {
            break;
        }
    }
    Ok(p.ctx.alloc_slice(fields))
}

fn parse_call_args<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast [loom_ast::Expr<'ast>]> {
    p.advance(); // '('
    let mut args = Vec::new();
    if !p.check(TokenKind::RParen) {
        loop {
            args.push(*parse_expression(p, Precedence::Lowest)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if p.check(TokenKind::RParen) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen, "expected ')'")?;
    Ok(p.ctx.alloc_slice(args))
}

/// Whether the current token can close a turbofish argument list — see
/// `type_expr::close_generic_arg_list` for why `Shr`/`GtEq` count too.
fn at_turbofish_close<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> bool {
    matches!(p.peek().kind, TokenKind::Gt | TokenKind::Shr | TokenKind::GtEq)
}

fn parse_turbofish_args<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast [loom_ast::Expr<'ast>]> {
    let mut args = Vec::new();
    if !at_turbofish_close(p) {
        loop {
            args.push(*crate::type_expr::parse_type(p)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if at_turbofish_close(p) {
                break;
            }
        }
    }
    match p.peek().kind {
        TokenKind::Gt => {
            p.advance();
        }
        TokenKind::Shr | TokenKind::GtEq => {
            p.split_closing_angle();
            p.advance(); // the synthetic closing '>'
        }
        _ => {
            let span = p.peek().span;
            p.error(span, "expected '>'".to_string());
            return Err(ParseError);
        }
    }
    Ok(p.ctx.alloc_slice(args))
}

fn parse_macro_arg_tokens<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast [Token]> {
    if !matches!(p.peek().kind, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace) {
        let span = p.peek().span;
        p.error(span, "expected '(', '[', or '{' to open macro arguments".to_string());
        return Err(ParseError);
    }
    p.advance();
    collect_delimited_tokens(p)
}

/// Consumes tokens up to and including the delimiter that balances the
/// one just consumed by the caller, tracking nesting depth across all
/// three bracket kinds rather than matching exact delimiter types — the
/// body is an opaque token tree, not syntax this parser understands.
pub(crate) fn collect_delimited_tokens<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast [Token]> {
    let mut depth: u32 = 1;
    let mut tokens = Vec::new();
    loop {
        if p.check(TokenKind::Eof) {
            let span = p.peek().span;
            p.error(span, "unexpected end of input inside a delimited token tree".to_string());
            return Err(ParseError);
        }
        let kind = p.peek().kind;
        if is_open_delim(kind) {
            depth += 1;
        }
        if is_close_delim(kind) {
            depth -= 1;
            if depth == 0 {
                p.advance();
                break;
            }
        }
        tokens.push(p.advance());
    }
    Ok(p.ctx.alloc_slice(tokens))
}

fn is_open_delim(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
}

fn is_close_delim(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
}
