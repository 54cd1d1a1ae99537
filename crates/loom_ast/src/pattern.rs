//! Pattern nodes

use loom_base::{Span, Symbol};

use crate::expr::Expr;
use crate::id::NodeId;

#[derive(Debug, Clone, Copy)]
pub struct StructPatternField<'a> {
    pub name: Symbol,
    /// `None` for shorthand `{ x }`, meaning "bind to a variable named `x`".
    pub pattern: Option<&'a Pattern<'a>>,
    /// Only meaningful for shorthand fields: `{ mut x }`.
    pub mutable: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum PatternKind<'a> {
    Wildcard,
    Literal(&'a Expr<'a>),
    LiteralRange {
        start: &'a Expr<'a>,
        end: &'a Expr<'a>,
        inclusive: bool,
    },
    Binding {
        mutable: bool,
        name: Symbol,
    },
    Tuple(&'a [Pattern<'a>]),
    /// `.Name(…)` or `Type.Name(…)`; `qualifier` holds `Type` when given.
    EnumVariant {
        qualifier: Option<Symbol>,
        name: Symbol,
        elements: Option<&'a [Pattern<'a>]>,
    },
    /// `Type { field: p, …, .. }`.
    StructDestructure {
        path: Symbol,
        fields: &'a [StructPatternField<'a>],
        has_rest: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Pattern<'a> {
    id: NodeId,
    span: Span,
    pub kind: PatternKind<'a>,
}

impl<'a> Pattern<'a> {
    pub fn new(id: NodeId, span: Span, kind: PatternKind<'a>) -> Self {
        Pattern { id, span, kind }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;

    #[test]
    fn wildcard_pattern_exposes_id_and_span() {
        let p = Pattern::new(NodeId::from_raw(1), Span::new(0, 1), PatternKind::Wildcard);
        assert_eq!(p.id(), NodeId::from_raw(1));
        assert!(matches!(p.kind, PatternKind::Wildcard));
    }
}
