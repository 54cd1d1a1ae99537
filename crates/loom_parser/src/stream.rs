//! Buffered lookahead over the lexer

use std::collections::VecDeque;

use loom_base::{Interner, Span};
use loom_lexer::{Lexer, Token, TokenKind};

/// Maximum lookahead the parser is allowed to need: at most 4 tokens.
pub const MAX_LOOKAHEAD: usize = 4;

/// A thin ring buffer of pre-fetched tokens, refilled on demand, exposing
/// `peek(n)` for `n ∈ {0,1,2,3}` without consuming and `advance()` to
/// consume the current token.
pub struct TokenStream<'src> {
    lexer: Lexer<'src>,
    buffer: VecDeque<Token>,
    last_consumed_span: Span,
}

impl<'src> TokenStream<'src> {
    pub fn new(lexer: Lexer<'src>) -> Self {
        TokenStream {
            lexer,
            buffer: VecDeque::with_capacity(MAX_LOOKAHEAD),
            last_consumed_span: Span::new(0, 0),
        }
    }

    fn fill_to(&mut self, n: usize, interner: &mut Interner) {
        debug_assert!(n < MAX_LOOKAHEAD, "parser exceeded its 4-token lookahead bound");
        while self.buffer.len() <= n {
            let tok = self.lexer.next(interner);
            self.buffer.push_back(tok);
        }
    }

    /// Returns the token `n` positions ahead of the cursor without
    /// consuming it (`n == 0` is the current token).
    pub fn peek(&mut self, n: usize, interner: &mut Interner) -> Token {
        self.fill_to(n, interner);
        self.buffer[n]
    }

    /// Consumes and returns the current token, advancing the cursor.
    pub fn advance(&mut self, interner: &mut Interner) -> Token {
        self.fill_to(0, interner);
        let tok = self.buffer.pop_front().expect("fill_to(0) guarantees at least one entry");
        self.last_consumed_span = tok.span;
        tok
    }

    /// The span of the most recently consumed token, used to compute
    /// end-of-node spans without re-scanning
    pub fn previous_span(&self) -> Span {
        self.last_consumed_span
    }

    /// Whether the lexer hit EOF with an unclosed block comment.
    pub fn had_unterminated_comment(&self) -> bool {
        self.lexer.had_unterminated_comment()
    }

    /// Splits the buffered `>>`/`>=` token at the front of the stream into
    /// a one-byte closing `>` plus a residual token for what follows it,
    /// and pushes both back so the `>` is now the current token.
    ///
    /// Maximal-munch lexing reads the tail of `List<List<i32>>` as a
    /// single `Shr`, so a nested generic argument list's inner `>` is
    /// never produced as its own token; this splits it back out instead
    /// of re-lexing.
    pub fn split_closing_angle(&mut self, interner: &mut Interner) {
        let tok = self.buffer.pop_front().expect("split_closing_angle requires a buffered token");
        let (residual_kind, residual_text) = match tok.kind {
            TokenKind::Shr => (TokenKind::Gt, ">"),
            TokenKind::GtEq => (TokenKind::Eq, "="),
            other => panic!("split_closing_angle called on non-splittable token {other:?}"),
        };
        let mid = tok.span.start + 1;
        let gt = Token::new(TokenKind::Gt, interner.intern(">"), Span::new(tok.span.start, mid));
        let residual = Token::new(residual_kind, interner.intern(residual_text), Span::new(mid, tok.span.end));
        self.buffer.push_front(residual);
        self.buffer.push_front(gt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_lexer::TokenKind;

    #[test]
    fn peek_does_not_consume() {
        let mut interner = Interner::new();
        let mut stream = TokenStream::new(Lexer::new("1 2 3"));
        let first_peek = stream.peek(0, &mut interner);
        let second_peek = stream.peek(0, &mut interner);
        assert_eq!(first_peek.kind, second_peek.kind);
        assert_eq!(first_peek.span, second_peek.span);
    }

    #[test]
    fn peek_ahead_sees_future_tokens_in_order() {
        let mut interner = Interner::new();
        let mut stream = TokenStream::new(Lexer::new("1 + 2"));
        assert_eq!(stream.peek(0, &mut interner).kind, TokenKind::Integer);
        assert_eq!(stream.peek(1, &mut interner).kind, TokenKind::Plus);
        assert_eq!(stream.peek(2, &mut interner).kind, TokenKind::Integer);
    }

    #[test]
    fn advance_consumes_in_order() {
        let mut interner = Interner::new();
        let mut stream = TokenStream::new(Lexer::new("1 + 2"));
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Integer);
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Plus);
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Integer);
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Eof);
    }

    #[test]
    fn split_closing_angle_turns_shr_into_two_gts() {
        let mut interner = Interner::new();
        let mut stream = TokenStream::new(Lexer::new(">>"));
        assert_eq!(stream.peek(0, &mut interner).kind, TokenKind::Shr);
        stream.split_closing_angle(&mut interner);
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Gt);
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Gt);
    }

    #[test]
    fn split_closing_angle_turns_gt_eq_into_gt_and_eq() {
        let mut interner = Interner::new();
        let mut stream = TokenStream::new(Lexer::new(">="));
        assert_eq!(stream.peek(0, &mut interner).kind, TokenKind::GtEq);
        stream.split_closing_angle(&mut interner);
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Gt);
        assert_eq!(stream.advance(&mut interner).kind, TokenKind::Eq);
    }

    #[test]
    fn previous_span_tracks_last_consumed_token() {
        let mut interner = Interner::new();
        let mut stream = TokenStream::new(Lexer::new("ab cd"));
        let tok = stream.advance(&mut interner);
        assert_eq!(stream.previous_span(), tok.span);
    }
}
