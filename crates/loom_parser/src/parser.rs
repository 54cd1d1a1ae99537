//! The `Parser` struct: token-stream plumbing, `expect`/`synchronize`
//! error recovery, and the top-level module loop.
//! Grammar-area parsing methods live in sibling modules and are added as
//! `impl` blocks on this same type, one file per grammar area.

use loom_base::{DiagnosticContext, Interner, Severity, Span};
use loom_ast::{AstContext, Decl, Module};
use loom_lexer::{Token, TokenKind};

use crate::error::{ParseError, ParseResult};
use crate::stream::TokenStream;

pub struct Parser<'ast, 'src> {
    pub(crate) stream: TokenStream<'src>,
    pub(crate) interner: &'ast mut Interner,
    pub(crate) ctx: &'ast AstContext<'ast>,
    pub(crate) diagnostics: &'ast mut DiagnosticContext,
    pub(crate) previous: Token,
    /// Expression-parsing mode flag `false` inside an
    /// `if` condition, `match` scrutinee, or `for` post-clause, where a
    /// bare `Ident {` must start a block, not a struct initialisation.
    pub(crate) allow_struct_init: bool,
}

impl<'ast, 'src> Parser<'ast, 'src> {
    pub fn new(
        stream: TokenStream<'src>,
        interner: &'ast mut Interner,
        ctx: &'ast AstContext<'ast>,
        diagnostics: &'ast mut DiagnosticContext,
    ) -> Self {
        Parser {
            stream,
            interner,
            ctx,
            diagnostics,
            previous: Token::new(TokenKind::Eof, loom_base::Symbol::EMPTY, Span::new(0, 0)),
            allow_struct_init: true,
        }
    }

    /// Parses an entire source file into a [`Module`]. Always returns a
    /// module, possibly partial; callers inspect `diagnostics` to decide
    /// whether to proceed to later compiler stages
    pub fn parse_module(&mut self) -> Module<'ast> {
        let mut declarations = Vec::new();
        while !self.check(TokenKind::Eof) {
            match self.parse_declaration() {
                Ok(decl) => declarations.push(*decl),
                Err(ParseError) => self.synchronize(),
            }
        }
        if self.stream.had_unterminated_comment() {
            self.error(self.previous.span, "unterminated block comment".to_string());
        }
        Module { declarations: self.ctx.alloc_slice(declarations) }
    }

    // -- token cursor --

    pub(crate) fn peek(&mut self) -> Token {
        self.stream.peek(0, self.interner)
    }

    pub(crate) fn peek_at(&mut self, n: usize) -> Token {
        self.stream.peek(n, self.interner)
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub(crate) fn check_at(&mut self, n: usize, kind: TokenKind) -> bool {
        self.peek_at(n).kind == kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.stream.advance(self.interner);
        self.previous = tok;
        tok
    }

    /// Consumes the current token if it matches `kind`, returning whether
    /// it did.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let span = self.peek().span;
            self.error(span, message.to_string());
            Err(ParseError)
        }
    }

    pub(crate) fn error(&mut self, span: Span, message: String) {
        self.diagnostics.report(Severity::Error, span, message);
    }

    /// Begins a span at the current token's start offset; pair with
    /// [`Self::span_from`] once the construct's last token is consumed.
    pub(crate) fn mark(&mut self) -> usize {
        self.peek().span.start
    }

    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.stream_previous_end())
    }

    fn stream_previous_end(&self) -> usize {
        self.previous.span.end
    }

    /// Discards tokens until a plausible statement/declaration boundary:
    /// a `;` just consumed, or the next token is a statement-opener
    /// keyword
    pub(crate) fn synchronize(&mut self) {
        self.diagnostics.synchronize();
        loop {
            if self.check(TokenKind::Eof) {
                return;
            }
            if TokenKind::STATEMENT_OPENERS.contains(&self.peek().kind) {
                return;
            }
            // Advance unconditionally before checking for a consumed `;` so a
            // `previous == Semicolon` left over from before this call can't
            // stall recovery without making progress.
            let consumed = self.advance();
            if consumed.kind == TokenKind::Semicolon {
                return;
            }
        }
    }

    /// Recovers from a bad member inside a struct/enum/union/trait/impl/
    /// extern body: advances past exactly one token (unless already at the
    /// body's closing delimiter or EOF) and clears panic mode, so the next
    /// member gets its own chance to report rather than the whole
    /// declaration aborting on the first bad member.
    pub(crate) fn recover_member(&mut self, closer: TokenKind) {
        if !self.check(closer) && !self.check(TokenKind::Eof) {
            self.advance();
        }
        self.diagnostics.synchronize();
    }

    /// Splits a buffered `>>`/`>=` into a closing `>` plus a residual
    /// token, so a generic argument list's `>` can close even when the
    /// lexer's maximal munch folded it into a wider operator. See
    /// [`TokenStream::split_closing_angle`].
    pub(crate) fn split_closing_angle(&mut self) {
        self.stream.split_closing_angle(self.interner);
    }

    pub(crate) fn with_struct_init_disallowed<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let prev = self.allow_struct_init;
        self.allow_struct_init = false;
        let result = f(self);
        self.allow_struct_init = prev;
        result
    }
}

// Declaration parsing lives in `decl.rs`; re-exported here so
// `parse_module` above can call `self.parse_declaration()`.
impl<'ast, 'src> Parser<'ast, 'src> {
    pub(crate) fn parse_declaration(&mut self) -> ParseResult<&'ast Decl<'ast>> {
        crate::decl::parse_declaration(self)
    }
}
