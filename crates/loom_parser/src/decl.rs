//! Declaration parsing: functions, structs, enums, unions, traits,
//! impls, macros, `use`, `extern`, type aliases, and global variables.

use loom_ast::{
    Decl, DeclKind, EnumDecl, EnumVariantDecl, EnumVariantPayload, ExternDecl, FieldDecl, FragmentSpec,
    FunctionDecl, GlobalVarDecl, GlobalVarKind, ImplDecl, MacroDecl, MacroMatcher, MacroRule, Param,
    RepetitionOp, StructDecl, StructMember, TraitDecl, TypeAliasDecl, UnionDecl, UseDecl, UsePath, UseTail,
};
use loom_base::Symbol;
use loom_lexer::TokenKind;

use crate::error::{ParseError, ParseResult};
use crate::parser::Parser;
use crate::precedence::Precedence;

pub(crate) fn parse_declaration<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast Decl<'ast>> {
    let public = p.match_token(TokenKind::Pub);
    match p.peek().kind {
        TokenKind::Fn => parse_fn_decl(p, public),
        TokenKind::Struct => parse_struct_decl(p, public),
        TokenKind::Enum => parse_enum_decl(p, public),
        TokenKind::Union => parse_union_decl(p, public),
        TokenKind::Trait => parse_trait_decl(p, public),
        TokenKind::Impl if !public => parse_impl_decl(p),
        TokenKind::Macro if !public => parse_macro_decl(p),
        TokenKind::Use => parse_use_decl(p, public),
        TokenKind::Extern if !public => parse_extern_decl(p),
        TokenKind::Type => parse_type_alias_decl(p, public),
        TokenKind::Const | TokenKind::Static => parse_global_var_decl(p, public),
        _ => {
            let span = p.peek().span;
            p.error(span, "expected a declaration".to_string());
            Err(ParseError)
        }
    }
}

fn parse_generics<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast [Symbol]> {
    if !p.match_token(TokenKind::Lt) {
        return Ok(&[]);
    }
    let mut names = Vec::new();
    if !p.check(TokenKind::Gt) {
        loop {
            let name = p.expect(TokenKind::Identifier, "expected a generic parameter name")?;
            names.push(name.lexeme);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if p.check(TokenKind::Gt) {
                break;
            }
        }
    }
    p.expect(TokenKind::Gt, "expected '>' after generic parameter list")?;
    Ok(p.ctx.alloc_slice(names))
}

fn parse_fn_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'fn'
    let name = p.expect(TokenKind::Identifier, "expected a function name")?;
    let generics = parse_generics(p)?;
    let (params, variadic) = parse_param_list(p)?;
    let return_type =
        if p.check(TokenKind::LBrace) || p.check(TokenKind::Semicolon) { None } else { Some(crate::type_expr::parse_type(p)?) };
    let body = if p.check(TokenKind::LBrace) {
        Some(crate::expr::parse_block_expr(p)?)
    } else {
        p.expect(TokenKind::Semicolon, "expected ';' or a body after function signature")?;
        None
    };
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(
        span,
        DeclKind::Function(FunctionDecl {
            public,
            name: name.lexeme,
            generics,
            params,
            return_type,
            body,
            variadic,
        }),
    ))
}

fn parse_param_list<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<(&'ast [Param<'ast>], bool)> {
    p.expect(TokenKind::LParen, "expected '(' to start a parameter list")?;
    let mut params = Vec::new();
    let mut variadic = false;
    if !p.check(TokenKind::RParen) {
        loop {
            if p.match_token(TokenKind::DotDotDot) {
                variadic = true;
                break;
            }
            params.push(parse_param(p)?);
            if !p.match_token(TokenKind::Comma) {
                break;
            }
            if p.check(TokenKind::RParen) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen, "expected ')' to close a parameter list")?;
    Ok((p.ctx.alloc_slice(params), variadic))
}

/// A plain parameter is `name[: type][= default]`; the self-shorthand
/// forms (`self`, `&self`, `&mut self`) are the only ones that can start
/// with `&` or `self` itself, so one token of lookahead disambiguates.
fn parse_param<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<Param<'ast>> {
    if p.check(TokenKind::SelfValue) {
        let tok = p.advance();
        return Ok(Param { name: tok.lexeme, ty: None, binding_cast: false, default: None });
    }
    if p.check(TokenKind::Amp) && (p.check_at(1, TokenKind::SelfValue) || (p.check_at(1, TokenKind::Mut) && p.check_at(2, TokenKind::SelfValue)))
    {
        p.advance(); // '&'
        p.match_token(TokenKind::Mut);
        let tok = p.expect(TokenKind::SelfValue, "expected 'self'")?;
        return Ok(Param { name: tok.lexeme, ty: None, binding_cast: false, default: None });
    }
    let name = p.expect(TokenKind::Identifier, "expected a parameter name")?;
    let (ty, binding_cast) = if p.match_token(TokenKind::Colon) {
        (Some(crate::type_expr::parse_type(p)?), false)
    } else if p.match_token(TokenKind::As) {
        (Some(crate::type_expr::parse_type(p)?), true)
    } else {
        (None, false)
    };
    let default = if p.match_token(TokenKind::Eq) { Some(crate::expr::parse_expression(p, Precedence::Assignment)?) } else { None };
    Ok(Param { name: name.lexeme, ty, binding_cast, default })
}

fn parse_struct_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'struct'
    let name = p.expect(TokenKind::Identifier, "expected a struct name")?;
    let generics = parse_generics(p)?;
    let base = if p.match_token(TokenKind::Colon) { Some(crate::type_expr::parse_type(p)?) } else { None };
    p.expect(TokenKind::LBrace, "expected '{' to start a struct body")?;
    let mut members = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match parse_struct_member(p) {
            Ok(member) => members.push(member),
            Err(ParseError) => p.recover_member(TokenKind::RBrace),
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close a struct body")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(
        span,
        DeclKind::Struct(StructDecl { public, name: name.lexeme, generics, base, members: p.ctx.alloc_slice(members) }),
    ))
}

fn parse_struct_member<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<StructMember<'ast>> {
    let is_nested = {
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
        )
    };
    if is_nested {
        return Ok(StructMember::Nested(p.parse_declaration()?));
    }
    Ok(StructMember::Field(parse_field_decl(p)?))
}

fn parse_field_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<FieldDecl<'ast>> {
    let public = p.match_token(TokenKind::Pub);
    let name = p.expect(TokenKind::Identifier, "expected a field name")?;
    p.expect(TokenKind::Colon, "expected ':' after field name")?;
    let ty = crate::type_expr::parse_type(p)?;
    let default = if p.match_token(TokenKind::Eq) { Some(crate::expr::parse_expression(p, Precedence::Assignment)?) } else { None };
    p.match_token(TokenKind::Comma);
    Ok(FieldDecl { public, name: name.lexeme, ty, default })
}

fn parse_enum_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'enum'
    let name = p.expect(TokenKind::Identifier, "expected an enum name")?;
    let generics = parse_generics(p)?;
    let underlying = if p.match_token(TokenKind::Colon) { Some(crate::type_expr::parse_type(p)?) } else { None };
    p.expect(TokenKind::LBrace, "expected '{' to start an enum body")?;
    let mut variants = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match parse_enum_variant(p) {
            Ok(variant) => {
                variants.push(variant);
                if !p.match_token(TokenKind::Comma) {
                    break;
                }
            }
            Err(ParseError) => p.recover_member(TokenKind::RBrace),
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close an enum body")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(
        span,
        DeclKind::Enum(EnumDecl { public, name: name.lexeme, generics, underlying, variants: p.ctx.alloc_slice(variants) }),
    ))
}

fn parse_enum_variant<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<EnumVariantDecl<'ast>> {
    let name = p.expect(TokenKind::Identifier, "expected a variant name")?;
    let payload = if p.match_token(TokenKind::Eq) {
        EnumVariantPayload::Tag(crate::expr::parse_expression(p, Precedence::Assignment)?)
    } else if p.match_token(TokenKind::LParen) {
        let mut items = Vec::new();
        if !p.check(TokenKind::RParen) {
            loop {
                items.push(*crate::type_expr::parse_type(p)?);
                if !p.match_token(TokenKind::Comma) {
                    break;
                }
                if p.check(TokenKind::RParen) {
                    break;
                }
            }
        }
        p.expect(TokenKind::RParen, "expected ')' to close a tuple-variant payload")?;
        EnumVariantPayload::Tuple(p.ctx.alloc_slice(items))
    } else if p.check(TokenKind::LBrace) {
        p.advance();
        let mut fields = Vec::new();
        while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
            fields.push(parse_field_decl(p)?);
        }
        p.expect(TokenKind::RBrace, "expected '}' to close a struct-variant payload")?;
        EnumVariantPayload::Struct(p.ctx.alloc_slice(fields))
    } else {
        EnumVariantPayload::Unit
    };
    Ok(EnumVariantDecl { name: name.lexeme, payload })
}

fn parse_union_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'union'
    let name = p.expect(TokenKind::Identifier, "expected a union name")?;
    let generics = parse_generics(p)?;
    p.expect(TokenKind::LBrace, "expected '{' to start a union body")?;
    let mut fields = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match parse_field_decl(p) {
            Ok(field) => fields.push(field),
            Err(ParseError) => p.recover_member(TokenKind::RBrace),
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close a union body")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(span, DeclKind::Union(UnionDecl { public, name: name.lexeme, generics, fields: p.ctx.alloc_slice(fields) })))
}

fn parse_trait_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'trait'
    let name = p.expect(TokenKind::Identifier, "expected a trait name")?;
    let generics = parse_generics(p)?;
    let mut supertraits = Vec::new();
    if p.match_token(TokenKind::Colon) {
        loop {
            supertraits.push(*crate::type_expr::parse_type(p)?);
            if !p.match_token(TokenKind::Plus) {
                break;
            }
        }
    }
    p.expect(TokenKind::LBrace, "expected '{' to start a trait body")?;
    let mut members = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match p.parse_declaration() {
            Ok(member) => members.push(*member),
            Err(ParseError) => p.recover_member(TokenKind::RBrace),
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close a trait body")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(
        span,
        DeclKind::Trait(TraitDecl {
            public,
            name: name.lexeme,
            generics,
            supertraits: p.ctx.alloc_slice(supertraits),
            members: p.ctx.alloc_slice(members),
        }),
    ))
}

/// `impl<G> Target: Trait { members }` — colon-separated, mirroring the
/// struct-base syntax rather than a `for`-keyword form. Nested `impl`
/// blocks are rejected: the parser reports and keeps going rather than
/// aborting the whole declaration.
fn parse_impl_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'impl'
    let generics = parse_generics(p)?;
    let target = crate::type_expr::parse_type(p)?;
    let trait_ = if p.match_token(TokenKind::Colon) { Some(crate::type_expr::parse_type(p)?) } else { None };
    p.expect(TokenKind::LBrace, "expected '{' to start an impl body")?;
    let mut members = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match p.parse_declaration() {
            Ok(member) => {
                if member.is_impl() {
                    p.error(member.span(), "impl blocks may not be nested".to_string());
                } else {
                    members.push(*member);
                }
            }
            Err(ParseError) => p.recover_member(TokenKind::RBrace),
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close an impl body")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(span, DeclKind::Impl(ImplDecl { generics, target, trait_, members: p.ctx.alloc_slice(members) })))
}

fn fragment_spec_from_str(text: &str) -> Option<FragmentSpec> {
    Some(match text {
        "expr" => FragmentSpec::Expr,
        "ident" => FragmentSpec::Ident,
        "ty" => FragmentSpec::Type,
        "stmt" => FragmentSpec::Stmt,
        "block" => FragmentSpec::Block,
        "path" => FragmentSpec::Path,
        "literal" => FragmentSpec::Literal,
        "tt" => FragmentSpec::TokenTree,
        _ => return None,
    })
}

fn parse_macro_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'macro'
    let name = p.expect(TokenKind::Identifier, "expected a macro name")?;
    p.expect(TokenKind::LBrace, "expected '{' to start a macro body")?;
    let mut rules = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        rules.push(parse_macro_rule(p)?);
        p.match_token(TokenKind::Semicolon);
    }
    p.expect(TokenKind::RBrace, "expected '}' to close a macro body")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(span, DeclKind::Macro(MacroDecl { name: name.lexeme, rules: p.ctx.alloc_slice(rules) })))
}

fn parse_macro_rule<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<MacroRule<'ast>> {
    p.expect(TokenKind::LParen, "expected '(' to start a macro matcher list")?;
    let matchers = parse_macro_matcher_list(p, TokenKind::RParen)?;
    p.expect(TokenKind::RParen, "expected ')' to close a macro matcher list")?;
    p.expect(TokenKind::FatArrow, "expected '=>' after a macro matcher list")?;
    p.expect(TokenKind::LBrace, "expected '{' to start a macro rule body")?;
    let body = crate::expr::collect_delimited_tokens(p)?;
    Ok(MacroRule { matchers, body })
}

fn parse_macro_matcher_list<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
    closer: TokenKind,
) -> ParseResult<&'ast [MacroMatcher<'ast>]> {
    let mut matchers = Vec::new();
    while !p.check(closer) && !p.check(TokenKind::Eof) {
        matchers.push(parse_macro_matcher(p)?);
    }
    Ok(p.ctx.alloc_slice(matchers))
}

fn parse_macro_matcher<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<MacroMatcher<'ast>> {
    if p.match_token(TokenKind::Dollar) {
        if p.match_token(TokenKind::LParen) {
            let sub = parse_macro_matcher_list(p, TokenKind::RParen)?;
            p.expect(TokenKind::RParen, "expected ')' to close a macro repetition group")?;
            let (separator, op) = parse_repetition_tail(p)?;
            return Ok(MacroMatcher::Repetition { sub, separator, op });
        }
        let name = p.expect(TokenKind::Identifier, "expected a capture name after '$'")?;
        p.expect(TokenKind::Colon, "expected ':' after a macro capture name")?;
        let spec_tok = p.expect(TokenKind::Identifier, "expected a fragment specifier")?;
        let spec_text = p.interner.resolve(spec_tok.lexeme).to_string();
        let spec = fragment_spec_from_str(&spec_text).ok_or_else(|| {
            p.error(spec_tok.span, format!("unknown fragment specifier '{spec_text}'"));
            ParseError
        })?;
        return Ok(MacroMatcher::Capture { name: name.lexeme, spec });
    }
    let tok = p.advance();
    Ok(MacroMatcher::Literal(tok))
}

/// After a repetition group's closing `)`, the next token is either the
/// repetition operator directly (no separator) or a separator token
/// followed by the operator.
fn parse_repetition_tail<'ast, 'src>(
    p: &mut Parser<'ast, 'src>,
) -> ParseResult<(Option<loom_lexer::Token>, RepetitionOp)> {
    if let Some(op) = repetition_op(p.peek().kind) {
        p.advance();
        return Ok((None, op));
    }
    let separator = p.advance();
    let op_tok = p.peek();
    let op = repetition_op(op_tok.kind).ok_or_else(|| {
        p.error(op_tok.span, "expected a macro repetition operator ('*', '+', or '?')".to_string());
        ParseError
    })?;
    p.advance();
    Ok((Some(separator), op))
}

fn repetition_op(kind: TokenKind) -> Option<RepetitionOp> {
    match kind {
        TokenKind::Star => Some(RepetitionOp::ZeroOrMore),
        TokenKind::Plus => Some(RepetitionOp::OneOrMore),
        TokenKind::Question => Some(RepetitionOp::ZeroOrOne),
        _ => None,
    }
}

fn parse_use_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'use'
    let path = parse_use_path(p)?;
    p.expect(TokenKind::Semicolon, "expected ';' after a use declaration")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(span, DeclKind::Use(UseDecl { public, path })))
}

fn parse_use_path<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<UsePath<'ast>> {
    let mut leading_dots = 0u8;
    while p.match_token(TokenKind::Dot) {
        leading_dots += 1;
        if leading_dots > 2 {
            let span = p.previous.span;
            p.error(span, "at most two leading '.' are allowed in a use path".to_string());
        }
    }
    let mut segments = Vec::new();
    loop {
        let seg = p.expect(TokenKind::Identifier, "expected a path segment")?;
        segments.push(seg.lexeme);
        if p.check(TokenKind::Dot) && matches!(p.peek_at(1).kind, TokenKind::Identifier) {
            p.advance();
            continue;
        }
        break;
    }
    let tail = if p.match_token(TokenKind::Dot) {
        if p.match_token(TokenKind::Star) {
            UseTail::Glob
        } else if p.match_token(TokenKind::LBrace) {
            let mut items = Vec::new();
            if !p.check(TokenKind::RBrace) {
                loop {
                    items.push(parse_use_group_item(p)?);
                    if !p.match_token(TokenKind::Comma) {
                        break;
                    }
                    if p.check(TokenKind::RBrace) {
                        break;
                    }
                }
            }
            p.expect(TokenKind::RBrace, "expected '}' to close a use group")?;
            UseTail::Group(p.ctx.alloc_slice(items))
        } else {
            let span = p.peek().span;
            p.error(span, "expected '*' or '{' after '.' in a use path".to_string());
            return Err(ParseError);
        }
    } else if p.match_token(TokenKind::As) {
        let alias = p.expect(TokenKind::Identifier, "expected an alias name after 'as'")?;
        UseTail::Plain { alias: Some(alias.lexeme) }
    } else {
        UseTail::Plain { alias: None }
    };
    Ok(UsePath { leading_dots, segments: p.ctx.alloc_slice(segments), tail })
}

fn parse_use_group_item<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<UsePath<'ast>> {
    let name = p.expect(TokenKind::Identifier, "expected a path segment")?;
    let tail = if p.match_token(TokenKind::As) {
        let alias = p.expect(TokenKind::Identifier, "expected an alias name after 'as'")?;
        UseTail::Plain { alias: Some(alias.lexeme) }
    } else {
        UseTail::Plain { alias: None }
    };
    Ok(UsePath { leading_dots: 0, segments: p.ctx.alloc_slice([name.lexeme]), tail })
}

fn parse_extern_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'extern'
    let abi = if p.check(TokenKind::String) { Some(p.advance().lexeme) } else { None };
    p.expect(TokenKind::LBrace, "expected '{' to start an extern block")?;
    let mut members = Vec::new();
    while !p.check(TokenKind::RBrace) && !p.check(TokenKind::Eof) {
        match p.parse_declaration() {
            Ok(member) => match &member.kind {
                DeclKind::Function(_) | DeclKind::GlobalVar(_) => members.push(*member),
                _ => p.error(member.span(), "extern blocks may only contain functions and global variables".to_string()),
            },
            Err(ParseError) => p.recover_member(TokenKind::RBrace),
        }
    }
    p.expect(TokenKind::RBrace, "expected '}' to close an extern block")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(span, DeclKind::Extern(ExternDecl { abi, members: p.ctx.alloc_slice(members) })))
}

fn parse_type_alias_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    p.advance(); // 'type'
    let name = p.expect(TokenKind::Identifier, "expected a type alias name")?;
    let generics = parse_generics(p)?;
    p.expect(TokenKind::Eq, "expected '=' in a type alias")?;
    let ty = crate::type_expr::parse_type(p)?;
    p.expect(TokenKind::Semicolon, "expected ';' after a type alias")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(span, DeclKind::TypeAlias(TypeAliasDecl { public, name: name.lexeme, generics, ty })))
}

fn parse_global_var_decl<'ast, 'src>(p: &mut Parser<'ast, 'src>, public: bool) -> ParseResult<&'ast Decl<'ast>> {
    let start = p.mark();
    let kind = if p.match_token(TokenKind::Const) {
        GlobalVarKind::Const
    } else {
        p.advance(); // 'static'
        if p.match_token(TokenKind::Mut) { GlobalVarKind::StaticMut } else { GlobalVarKind::Static }
    };
    let name = p.expect(TokenKind::Identifier, "expected a variable name")?;
    let ty = if p.match_token(TokenKind::Colon) { Some(crate::type_expr::parse_type(p)?) } else { None };
    let value = if p.match_token(TokenKind::Eq) { Some(crate::expr::parse_expression(p, Precedence::Lowest)?) } else { None };
    p.expect(TokenKind::Semicolon, "expected ';' after a global variable declaration")?;
    let span = p.span_from(start);
    Ok(p.ctx.alloc_decl(span, DeclKind::GlobalVar(GlobalVarDecl { public, kind, name: name.lexeme, ty, value })))
}

#[cfg(test)]
mod tests {
    use loom_ast::{AstArena, AstContext};
    use loom_base::{DiagnosticContext, Interner};
    use loom_lexer::Lexer;

    use super::*;
    use crate::stream::TokenStream;

    fn parse(src: &str) -> (DeclKind<'static>, usize) {
        let arena = Box::leak(Box::new(AstArena::new()));
        let ctx = Box::leak(Box::new(AstContext::new(arena)));
        let interner = Box::leak(Box::new(Interner::new()));
        let diagnostics = Box::leak(Box::new(DiagnosticContext::new()));
        let mut parser = Parser::new(TokenStream::new(Lexer::new(src)), interner, ctx, diagnostics);
        let decl = parse_declaration(&mut parser).expect("declaration should parse");
        (decl.kind, diagnostics.error_count())
    }

    #[test]
    fn function_with_self_param_and_return_type() {
        let (kind, errs) = parse("fn area(&self) f64 { self.w }");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::Function(f) => {
                assert_eq!(f.params.len(), 1);
                assert!(f.return_type.is_some());
                assert!(f.body.is_some());
            }
            other => panic!("expected Function, got {other:?}"),
        }
    }

    #[test]
    fn variadic_extern_function_has_no_body() {
        let (kind, errs) = parse("extern { fn printf(fmt: &u8, ...) i32; }");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::Extern(e) => assert_eq!(e.members.len(), 1),
            other => panic!("expected Extern, got {other:?}"),
        }
    }

    #[test]
    fn struct_with_base_and_nested_fn() {
        let (kind, errs) = parse("struct Dog: Animal { pub name: str, fn bark() { } }");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::Struct(s) => {
                assert!(s.base.is_some());
                assert_eq!(s.members.len(), 2);
                assert!(matches!(s.members[1], StructMember::Nested(_)));
            }
            other => panic!("expected Struct, got {other:?}"),
        }
    }

    #[test]
    fn struct_recovers_from_a_malformed_field_and_keeps_the_rest() {
        let (kind, errs) = parse("struct Point { x: i32, @ y: i32 }");
        assert_eq!(errs, 1);
        match kind {
            DeclKind::Struct(s) => assert_eq!(s.members.len(), 2),
            other => panic!("expected Struct, got {other:?}"),
        }
    }

    #[test]
    fn enum_recovers_from_a_malformed_variant_and_keeps_the_rest() {
        let (kind, errs) = parse("enum Shape { Point, @ Circle(f64) }");
        assert_eq!(errs, 1);
        match kind {
            DeclKind::Enum(e) => assert_eq!(e.variants.len(), 2),
            other => panic!("expected Enum, got {other:?}"),
        }
    }

    #[test]
    fn enum_with_mixed_variant_payloads() {
        let (kind, errs) = parse("enum Shape { Point, Circle(f64), Rect { w: f64, h: f64 }, Red = 1 }");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::Enum(e) => {
                assert_eq!(e.variants.len(), 4);
                assert!(matches!(e.variants[0].payload, EnumVariantPayload::Unit));
                assert!(matches!(e.variants[1].payload, EnumVariantPayload::Tuple(_)));
                assert!(matches!(e.variants[2].payload, EnumVariantPayload::Struct(_)));
                assert!(matches!(e.variants[3].payload, EnumVariantPayload::Tag(_)));
            }
            other => panic!("expected Enum, got {other:?}"),
        }
    }

    #[test]
    fn impl_rejects_nested_impl_but_recovers() {
        let (kind, errs) = parse("impl Dog: Animal { impl Other: Thing { } fn bark() { } }");
        assert!(errs > 0);
        match kind {
            DeclKind::Impl(i) => assert_eq!(i.members.len(), 1),
            other => panic!("expected Impl, got {other:?}"),
        }
    }

    #[test]
    fn macro_decl_with_repetition_and_separator() {
        let (kind, errs) = parse("macro vec { ($($x:expr),*) => { } }");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::Macro(m) => {
                assert_eq!(m.rules.len(), 1);
                assert_eq!(m.rules[0].matchers.len(), 1);
                match &m.rules[0].matchers[0] {
                    MacroMatcher::Repetition { separator, op, .. } => {
                        assert!(separator.is_some());
                        assert!(matches!(op, RepetitionOp::ZeroOrMore));
                    }
                    other => panic!("expected Repetition, got {other:?}"),
                }
            }
            other => panic!("expected Macro, got {other:?}"),
        }
    }

    #[test]
    fn use_decl_with_group_and_alias() {
        let (kind, errs) = parse("use .collections.{HashMap as Map, HashSet};");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::Use(u) => {
                assert_eq!(u.path.leading_dots, 1);
                match u.path.tail {
                    UseTail::Group(items) => assert_eq!(items.len(), 2),
                    other => panic!("expected Group, got {other:?}"),
                }
            }
            other => panic!("expected Use, got {other:?}"),
        }
    }

    #[test]
    fn use_decl_glob() {
        let (kind, _) = parse("use std.io.*;");
        match kind {
            DeclKind::Use(u) => assert!(matches!(u.path.tail, UseTail::Glob)),
            other => panic!("expected Use, got {other:?}"),
        }
    }

    #[test]
    fn type_alias_with_generics() {
        let (kind, errs) = parse("type Pair<T> = (T, T);");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::TypeAlias(t) => assert_eq!(t.generics.len(), 1),
            other => panic!("expected TypeAlias, got {other:?}"),
        }
    }

    #[test]
    fn static_mut_global_var() {
        let (kind, errs) = parse("static mut counter: i32 = 0;");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::GlobalVar(g) => assert!(matches!(g.kind, GlobalVarKind::StaticMut)),
            other => panic!("expected GlobalVar, got {other:?}"),
        }
    }

    #[test]
    fn trait_with_supertraits() {
        let (kind, errs) = parse("trait Ord: Eq + Show { fn cmp(&self, other: &Self) i32; }");
        assert_eq!(errs, 0);
        match kind {
            DeclKind::Trait(t) => {
                assert_eq!(t.supertraits.len(), 2);
                assert_eq!(t.members.len(), 1);
            }
            other => panic!("expected Trait, got {other:?}"),
        }
    }
}
