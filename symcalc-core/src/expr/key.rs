//! Structural hashing, equality and ordering of expressions, so they can be used as map keys.
//!
//! The hash of a node is computed once from its content and memoized on the node. Equality
//! first compares node identity, then hashes, and only then the structure. Ordering is purely
//! structural: variants are ranked, then compared by content.

use crate::algebra::Algebra;
use super::{Expr, ExprKind, Node};
use std::{
    cmp::Ordering,
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

impl<A: Algebra> ExprKind<A> {
    /// The position of the variant in the ordering of expressions.
    fn rank(&self) -> u8 {
        match self {
            Self::Atom(_) => 0,
            Self::Terms(_) => 1,
            Self::Factors(_) => 2,
            Self::Composite(..) => 3,
            Self::Component(..) => 4,
            Self::FloorDiv(..) => 5,
            Self::Function(_) => 6,
        }
    }

    fn hash_structure<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Atom(atom) => atom.hash(state),
            Self::Terms(pairs) | Self::Factors(pairs) => {
                pairs.len().hash(state);
                for (key, value) in pairs {
                    key.hash(state);
                    value.hash(state);
                }
            },
            Self::Composite(func, args) => {
                func.hash(state);
                args.hash(state);
            },
            Self::Component(obj, indices) => {
                obj.hash(state);
                indices.hash(state);
            },
            Self::FloorDiv(numer, denom) => {
                numer.hash(state);
                denom.hash(state);
            },
            Self::Function(function) => function.name().hash(state),
        }
    }
}

impl<A: Algebra> PartialEq for ExprKind<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Atom(a), Self::Atom(b)) => a == b,
            (Self::Terms(a), Self::Terms(b)) | (Self::Factors(a), Self::Factors(b)) => a == b,
            (Self::Composite(f, a), Self::Composite(g, b)) => f == g && a == b,
            (Self::Component(x, i), Self::Component(y, j)) => x == y && i == j,
            (Self::FloorDiv(n, d), Self::FloorDiv(m, e)) => n == m && d == e,
            (Self::Function(f), Self::Function(g)) => f.name() == g.name(),
            _ => false,
        }
    }
}

impl<A: Algebra> Eq for ExprKind<A> {}

impl<A: Algebra> Ord for ExprKind<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (Self::Atom(a), Self::Atom(b)) => a.cmp(b),
            (Self::Terms(a), Self::Terms(b)) | (Self::Factors(a), Self::Factors(b)) => a.cmp(b),
            (Self::Composite(f, a), Self::Composite(g, b)) => f.cmp(g).then_with(|| a.cmp(b)),
            (Self::Component(x, i), Self::Component(y, j)) => x.cmp(y).then_with(|| i.cmp(j)),
            (Self::FloorDiv(n, d), Self::FloorDiv(m, e)) => n.cmp(m).then_with(|| d.cmp(e)),
            (Self::Function(f), Self::Function(g)) => f.name().cmp(g.name()),
            // ranks differ
            _ => Ordering::Equal,
        })
    }
}

impl<A: Algebra> PartialOrd for ExprKind<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Algebra> Node<A> {
    /// Returns the memoized structural hash of the node.
    fn structural_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            self.kind.hash_structure(&mut hasher);
            hasher.finish()
        })
    }
}

impl<A: Algebra> Hash for Expr<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.node.structural_hash());
    }
}

impl<A: Algebra> PartialEq for Expr<A> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
            || (self.node.structural_hash() == other.node.structural_hash()
                && self.node.kind == other.node.kind)
    }
}

impl<A: Algebra> Eq for Expr<A> {}

impl<A: Algebra> Ord for Expr<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.node, &other.node) {
            return Ordering::Equal;
        }
        self.node.kind.cmp(&other.node.kind)
    }
}

impl<A: Algebra> PartialOrd for Expr<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
