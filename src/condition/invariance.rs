//! Invariance flags and their memoization

use std::ops::BitAnd;
use std::sync::OnceLock;

/// Which context objects an expression does NOT depend on
///
/// `local_candidate` is only meaningful for value references; node-level
/// invariance always reports it as true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invariants {
    pub local_candidate: bool,
    pub root_candidate: bool,
    pub target: bool,
    pub source: bool,
}

impl Invariants {
    pub const ALL: Invariants = Invariants {
        local_candidate: true,
        root_candidate: true,
        target: true,
        source: true,
    };

    /// Drop the local-candidate flag when lifting child invariance to a node
    pub fn for_node(self) -> Invariants {
        Invariants {
            local_candidate: true,
            ..self
        }
    }
}

impl Default for Invariants {
    fn default() -> Self {
        Invariants::ALL
    }
}

impl BitAnd for Invariants {
    type Output = Invariants;

    fn bitand(self, rhs: Invariants) -> Invariants {
        Invariants {
            local_candidate: self.local_candidate && rhs.local_candidate,
            root_candidate: self.root_candidate && rhs.root_candidate,
            target: self.target && rhs.target,
            source: self.source && rhs.source,
        }
    }
}

/// Computed-once invariance of a composite node
///
/// Unset means "unknown"; the first query computes and stores the flags.
/// Nodes are immutable, so the stored value never goes stale.
#[derive(Debug, Default)]
pub struct InvarianceCache(OnceLock<Invariants>);

impl InvarianceCache {
    pub fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> Invariants) -> Invariants {
        *self.0.get_or_init(compute)
    }

    pub fn is_known(&self) -> bool {
        self.0.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_conjunction() {
        let variant_root = Invariants {
            root_candidate: false,
            ..Invariants::ALL
        };
        let variant_source = Invariants {
            source: false,
            ..Invariants::ALL
        };
        let both = variant_root & variant_source;
        assert!(!both.root_candidate);
        assert!(!both.source);
        assert!(both.target);
        assert!(both.local_candidate);
    }

    #[test]
    fn test_for_node_clears_local_dependence() {
        let local = Invariants {
            local_candidate: false,
            ..Invariants::ALL
        };
        assert!(local.for_node().local_candidate);
    }

    #[test]
    fn test_cache_computes_once() {
        let calls = Cell::new(0);
        let cache = InvarianceCache::new();
        assert!(!cache.is_known());
        for _ in 0..3 {
            cache.get_or_compute(|| {
                calls.set(calls.get() + 1);
                Invariants::ALL
            });
        }
        assert!(cache.is_known());
        assert_eq!(calls.get(), 1);
    }
}
