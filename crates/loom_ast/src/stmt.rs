//! Statement nodes

use loom_base::Span;

use crate::decl::Decl;
use crate::expr::Expr;
use crate::id::NodeId;
use crate::pattern::Pattern;

#[derive(Debug, Clone, Copy)]
pub enum StmtKind<'a> {
    Let {
        pattern: &'a Pattern<'a>,
        ty: Option<&'a Expr<'a>>,
        value: &'a Expr<'a>,
    },
    /// A declaration nested inside a block (fn, struct, …).
    Declaration(&'a Decl<'a>),
    Expression(&'a Expr<'a>),
    /// The strict three-part `for init; condition; post { body }` form;
    /// each part is independently optional
    For {
        init: Option<&'a Stmt<'a>>,
        condition: Option<&'a Expr<'a>>,
        post: Option<&'a Expr<'a>>,
        body: &'a Expr<'a>,
    },
    Break,
    Continue,
    Return(Option<&'a Expr<'a>>),
    Defer(&'a Expr<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct Stmt<'a> {
    id: NodeId,
    span: Span,
    pub kind: StmtKind<'a>,
}

impl<'a> Stmt<'a> {
    pub fn new(id: NodeId, span: Span, kind: StmtKind<'a>) -> Self {
        Stmt { id, span, kind }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
