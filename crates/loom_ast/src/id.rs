//! Dense per-node identity: every AST node carries a fresh `NodeId`
//! integer handle assigned at construction time.

/// A fresh integer handle assigned to every AST node at construction time.
///
/// Carries no ownership and is not a pointer — two nodes with the same
/// shape still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_raw_value() {
        assert!(NodeId::from_raw(0) < NodeId::from_raw(1));
    }

    #[test]
    fn index_round_trips_raw_value() {
        assert_eq!(NodeId::from_raw(42).index(), 42);
    }
}
