//! The Pratt precedence ladder

use loom_ast::{AssignOp, BinaryOp};
use loom_lexer::TokenKind;

/// Declaration order doubles as discriminant order, so derived `Ord`
/// matches the ladder exactly:
/// `Lowest < Assignment < Range < LogicalOr < LogicalAnd < Equality
///   < Comparison < Bitwise < Shift < Term < Factor < Prefix < Call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assignment,
    Range,
    LogicalOr,
    LogicalAnd,
    Equality,
    Comparison,
    Bitwise,
    Shift,
    Term,
    Factor,
    Prefix,
    Call,
}

impl Precedence {
    /// The precedence to recurse into for a left-associative operator's
    /// right-hand side: the *same* level, so further same-precedence
    /// operators stop merging here rather than nesting right.
    pub fn next_for_left_assoc(self) -> Precedence {
        // One step above `self`; since `self` is always a concrete binary
        // level (never `Call`, the topmost), this always has a successor.
        match self {
            Precedence::Lowest => Precedence::Assignment,
            Precedence::Assignment => Precedence::Range,
            Precedence::Range => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Bitwise,
            Precedence::Bitwise => Precedence::Shift,
            Precedence::Shift => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Prefix,
            Precedence::Prefix => Precedence::Call,
            Precedence::Call => Precedence::Call,
        }
    }
}

/// Binary operators, keyed by their minimum precedence. Assignment is
/// handled separately (it is right-associative and its left side is
/// reinterpreted as an assignment target, not a plain binary operand).
pub fn binary_precedence(kind: TokenKind) -> Option<(Precedence, BinaryOp)> {
    use TokenKind::*;
    Some(match kind {
        PipePipe => (Precedence::LogicalOr, BinaryOp::LogicalOr),
        AmpAmp => (Precedence::LogicalAnd, BinaryOp::LogicalAnd),
        EqEq => (Precedence::Equality, BinaryOp::Eq),
        NotEq => (Precedence::Equality, BinaryOp::NotEq),
        Lt => (Precedence::Comparison, BinaryOp::Lt),
        LtEq => (Precedence::Comparison, BinaryOp::LtEq),
        Gt => (Precedence::Comparison, BinaryOp::Gt),
        GtEq => (Precedence::Comparison, BinaryOp::GtEq),
        Amp => (Precedence::Bitwise, BinaryOp::BitAnd),
        Pipe => (Precedence::Bitwise, BinaryOp::BitOr),
        Caret => (Precedence::Bitwise, BinaryOp::BitXor),
        Shl => (Precedence::Shift, BinaryOp::Shl),
        Shr => (Precedence::Shift, BinaryOp::Shr),
        Plus => (Precedence::Term, BinaryOp::Add),
        Minus => (Precedence::Term, BinaryOp::Sub),
        Star => (Precedence::Factor, BinaryOp::Mul),
        Slash => (Precedence::Factor, BinaryOp::Div),
        Percent => (Precedence::Factor, BinaryOp::Rem),
        _ => return None,
    })
}

pub fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    use TokenKind::*;
    Some(match kind {
        Eq => AssignOp::Assign,
        PlusEq => AssignOp::AddAssign,
        MinusEq => AssignOp::SubAssign,
        StarEq => AssignOp::MulAssign,
        SlashEq => AssignOp::DivAssign,
        PercentEq => AssignOp::RemAssign,
        AmpEq => AssignOp::BitAndAssign,
        PipeEq => AssignOp::BitOrAssign,
        CaretEq => AssignOp::BitXorAssign,
        ShlEq => AssignOp::ShlAssign,
        ShrEq => AssignOp::ShrAssign,
        _ => return None,
    })
}

pub fn is_range_operator(kind: TokenKind) -> Option<bool> {
    match kind {
        TokenKind::DotDot => Some(false),
        TokenKind::DotDotEq => Some(true),
        _ => None,
    }
}
