//! Expression and type-expression nodes
//!
//! Types are expressions here too — `parseType()` produces the same
//! `Expr` family under dedicated `ExprKind` variants (`TypePointer`,
//! `TypeSlice`, …); resolving a type expression into an actual type is a
//! later pass's job, not this crate's.

use loom_base::{Span, Symbol};
use loom_lexer::Token;

use crate::id::NodeId;
use crate::pattern::Pattern;
use crate::stmt::Stmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LogicalAnd,
    LogicalOr,
}

/// Prefix operators `- ! ~ # ?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    LogicalNot,
    BitNot,
    Hash,
    Try,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
}

#[derive(Debug, Clone, Copy)]
pub struct StructInitField<'a> {
    pub name: Symbol,
    pub value: &'a Expr<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchArm<'a> {
    pub pattern: &'a Pattern<'a>,
    pub body: &'a Expr<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum ExprKind<'a> {
    // -- literals --
    IntLiteral(Symbol),
    FloatLiteral(Symbol),
    CharLiteral(Symbol),
    StringLiteral(Symbol),
    BoolLiteral(bool),
    Undef,
    Null,
    Unreachable,

    Identifier(Symbol),

    Binary {
        op: BinaryOp,
        left: &'a Expr<'a>,
        right: &'a Expr<'a>,
    },
    Unary {
        op: UnaryOp,
        operand: &'a Expr<'a>,
    },
    Assignment {
        op: AssignOp,
        target: &'a Expr<'a>,
        value: &'a Expr<'a>,
    },

    /// `&e` / `&mut e` — address-of in expression position.
    AddressOf {
        mutable: bool,
        operand: &'a Expr<'a>,
    },
    /// Postfix `.*` — dereference.
    Dereference(&'a Expr<'a>),
    /// Postfix `.?` — propagate.
    Propagate(&'a Expr<'a>),

    Call {
        callee: &'a Expr<'a>,
        args: &'a [Expr<'a>],
    },
    /// `.<T, …>` turbofish, or bare `<…>` in type context.
    GenericInstantiation {
        target: &'a Expr<'a>,
        args: &'a [Expr<'a>],
    },
    MemberAccess {
        target: &'a Expr<'a>,
        member: Symbol,
    },
    Index {
        target: &'a Expr<'a>,
        index: &'a Expr<'a>,
    },

    StructInit {
        path: &'a Expr<'a>,
        fields: &'a [StructInitField<'a>],
    },
    ArrayLiteral(&'a [Expr<'a>]),
    /// `[value; count]`.
    ArrayRepeat {
        value: &'a Expr<'a>,
        count: &'a Expr<'a>,
    },
    /// `(a, b, …)`; empty slice is the unit value `()`.
    TupleLiteral(&'a [Expr<'a>]),

    /// `start? .. end?` / `start? ..= end`. `..=` requires `end`; the
    /// parser enforces that, this node permits either form structurally.
    Range {
        start: Option<&'a Expr<'a>>,
        end: Option<&'a Expr<'a>>,
        inclusive: bool,
    },

    If {
        condition: &'a Expr<'a>,
        then_branch: &'a Expr<'a>,
        else_branch: Option<&'a Expr<'a>>,
    },
    Match {
        scrutinee: &'a Expr<'a>,
        arms: &'a [MatchArm<'a>],
    },
    /// `{ stmt* expr? }`. `result` is `None` when the block ends with a
    /// `;` or is empty trailing-expression invariant).
    Block {
        statements: &'a [Stmt<'a>],
        result: Option<&'a Expr<'a>>,
    },

    MacroCall {
        callee: &'a Expr<'a>,
        tokens: &'a [Token],
    },

    // -- type expressions; resolution is downstream --
    /// `&T` / `&mut T`.
    TypeReference {
        mutable: bool,
        pointee: &'a Expr<'a>,
    },
    /// `*T` / `*mut T` — volatile pointer.
    TypePointer {
        mutable: bool,
        pointee: &'a Expr<'a>,
    },
    /// `[]T`.
    TypeSlice(&'a Expr<'a>),
    /// `[N]T`.
    TypeArray {
        size: &'a Expr<'a>,
        element: &'a Expr<'a>,
    },
    /// `?T`.
    TypeOptional(&'a Expr<'a>),
    /// `fn(…) R`.
    TypeFn {
        params: &'a [Expr<'a>],
        ret: Option<&'a Expr<'a>>,
    },
    /// `!`.
    TypeNever,
}

/// A single expression node: its identity, its source extent, and its
/// shape "Every node carries a `NodeId` ... and a `Span`").
#[derive(Debug, Clone, Copy)]
pub struct Expr<'a> {
    id: NodeId,
    span: Span,
    pub kind: ExprKind<'a>,
}

impl<'a> Expr<'a> {
    pub fn new(id: NodeId, span: Span, kind: ExprKind<'a>) -> Self {
        Expr { id, span, kind }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
