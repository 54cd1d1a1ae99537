//! Typed AST node definitions for the Loom language
//!
//! Four mutually-recursive node families — expression, pattern,
//! statement, declaration — each a thin `{ id, span, kind }` wrapper
//! around a tagged-variant `*Kind` enum, allocated out of one shared
//! [`AstArena`] via [`AstContext`].

mod arena;
mod context;
mod decl;
mod expr;
mod id;
mod pattern;
mod stmt;

pub use arena::AstArena;
pub use context::AstContext;
pub use decl::{
    Decl, DeclKind, EnumDecl, EnumVariantDecl, EnumVariantPayload, ExternDecl, FieldDecl,
    FragmentSpec, FunctionDecl, GlobalVarDecl, GlobalVarKind, ImplDecl, MacroDecl, MacroMatcher,
    MacroRule, Module, Param, RepetitionOp, StructDecl, StructMember, TraitDecl, TypeAliasDecl,
    UnionDecl, UseDecl, UsePath, UseTail,
};
pub use expr::{AssignOp, BinaryOp, Expr, ExprKind, MatchArm, StructInitField, UnaryOp};
pub use id::NodeId;
pub use pattern::{Pattern, PatternKind, StructPatternField};
pub use stmt::{Stmt, StmtKind};
