//! The single bump region backing an entire parsed AST.
//!
//! One arena per parse: the parser owns a dedicated AST arena and
//! releases it wholesale on teardown. A single untyped region serves
//! every node and payload type in Loom's grammar rather than one typed
//! region per node family, since the grammar has dozens of node and
//! payload kinds.

use bumpalo::Bump;

pub struct AstArena {
    bump: Bump,
}

impl AstArena {
    pub fn new() -> Self {
        AstArena { bump: Bump::new() }
    }

    pub fn alloc<T>(&self, value: T) -> &T {
        self.bump.alloc(value)
    }

    pub fn alloc_slice<T, I>(&self, items: I) -> &[T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.bump.alloc_slice_fill_iter(items)
    }

    /// Invalidates every reference handed out so far but keeps the
    /// allocated capacity, matching `loom_base::Arena::reset`.
    pub fn reset(&mut self) {
        self.bump.reset();
    }
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_stable_reference() {
        let arena = AstArena::new();
        let a = arena.alloc(1i32);
        let b = arena.alloc(2i32);
        assert_eq!((*a, *b), (1, 2));
    }

    #[test]
    fn alloc_slice_preserves_order() {
        let arena = AstArena::new();
        let slice = arena.alloc_slice(vec!["a", "b", "c"]);
        assert_eq!(slice, &["a", "b", "c"]);
    }

    #[test]
    fn a_single_region_serves_multiple_distinct_types() {
        let arena = AstArena::new();
        let int_ref = arena.alloc(7i32);
        let str_ref = arena.alloc("seven".to_string());
        assert_eq!(*int_ref, 7);
        assert_eq!(str_ref, "seven");
    }
}
