//! Bundles the AST arena with fresh `NodeId` assignment: one place the
//! parser goes through to allocate every node, instead of poking the
//! arena directly at each call site.

use std::cell::Cell;

use loom_base::Span;

use crate::arena::AstArena;
use crate::decl::{Decl, DeclKind};
use crate::expr::{Expr, ExprKind};
use crate::id::NodeId;
use crate::pattern::{Pattern, PatternKind};
use crate::stmt::{Stmt, StmtKind};

pub struct AstContext<'a> {
    arena: &'a AstArena,
    next_id: Cell<u32>,
}

impl<'a> AstContext<'a> {
    pub fn new(arena: &'a AstArena) -> Self {
        AstContext { arena, next_id: Cell::new(0) }
    }

    fn fresh_id(&self) -> NodeId {
        let raw = self.next_id.get();
        self.next_id.set(raw + 1);
        NodeId::from_raw(raw)
    }

    pub fn alloc_expr(&self, span: Span, kind: ExprKind<'a>) -> &'a Expr<'a> {
        self.arena.alloc(Expr::new(self.fresh_id(), span, kind))
    }

    pub fn alloc_pattern(&self, span: Span, kind: PatternKind<'a>) -> &'a Pattern<'a> {
        self.arena.alloc(Pattern::new(self.fresh_id(), span, kind))
    }

    pub fn alloc_stmt(&self, span: Span, kind: StmtKind<'a>) -> &'a Stmt<'a> {
        self.arena.alloc(Stmt::new(self.fresh_id(), span, kind))
    }

    pub fn alloc_decl(&self, span: Span, kind: DeclKind<'a>) -> &'a Decl<'a> {
        self.arena.alloc(Decl::new(self.fresh_id(), span, kind))
    }

    /// Allocates any slice of arena-owned values (expression lists,
    /// parameter lists, token trees, generic-parameter symbol lists, …).
    pub fn alloc_slice<T, I>(&self, items: I) -> &'a [T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.arena.alloc_slice(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_base::Symbol;

    #[test]
    fn each_alloc_call_gets_a_fresh_id() {
        let arena = AstArena::new();
        let ctx = AstContext::new(&arena);
        let a = ctx.alloc_expr(Span::new(0, 1), ExprKind::Undef);
        let b = ctx.alloc_expr(Span::new(1, 2), ExprKind::Null);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn alloc_slice_builds_an_arena_owned_list() {
        let arena = AstArena::new();
        let ctx = AstContext::new(&arena);
        let syms = ctx.alloc_slice(vec![Symbol::EMPTY, Symbol::EMPTY]);
        assert_eq!(syms.len(), 2);
    }

    #[test]
    fn ids_are_assigned_in_allocation_order() {
        let arena = AstArena::new();
        let ctx = AstContext::new(&arena);
        let first = ctx.alloc_stmt(Span::new(0, 1), StmtKind::Break);
        let second = ctx.alloc_stmt(Span::new(1, 2), StmtKind::Continue);
        assert!(first.id().index() < second.id().index());
    }
}
