//! The expression model shared by every algebra.
//!
//! An [`Expr<A>`] is a cheaply clonable, immutable handle to a node of the expression graph.
//! Sub-expressions are shared between nodes, so the same `Expr` can appear as a key inside
//! several sums and products at once.
//!
//! # Canonical form
//!
//! User code can only build atoms and opaque functions directly. Every other node comes out of
//! the operator layer ([`crate::ops`]), which always runs the normalizer before returning, so
//! each `Expr` observed outside of this crate is in canonical form:
//!
//! - [`ExprKind::Terms`] holds at least two entries, or a single entry whose coefficient is not
//!   one (and, in scalar algebras, whose key is not the identity). No key is the zero of the
//!   algebra or itself a sum, and no coefficient is zero.
//! - [`ExprKind::Factors`] holds at least two entries, or a single entry whose exponent is not
//!   one. No key is the identity and no exponent is zero.
//!
//! Canonical forms compare structurally: two expressions built in different orders, such as
//! `a + b` and `b + a`, are equal and hash identically.

mod key;

use crate::algebra::{Algebra, AtomKind, Scalar};
use rug::Rational;
use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
    sync::{Arc, OnceLock},
};

/// A map from canonical sub-expressions to scalars, used by sums (term to coefficient) and
/// products (base to exponent).
pub type Pairs<A> = BTreeMap<Expr<A>, <A as Algebra>::Scalar>;

/// An index into an object, used by [`ExprKind::Component`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Index<S> {
    /// A single position, `obj[i]`.
    At(S),

    /// A range of positions, `obj[start:stop:step]`. Missing parts default to the start of the
    /// axis, the end of the axis and a unit step.
    Slice {
        start: Option<S>,
        stop: Option<S>,
        step: Option<S>,
    },
}

impl<S: Scalar> Index<S> {
    /// Creates a slice index.
    pub fn slice(start: Option<S>, stop: Option<S>, step: Option<S>) -> Self {
        Self::Slice { start, stop, step }
    }

    /// Returns true if the index is a literal integer or a slice.
    pub fn is_literal(&self) -> bool {
        match self {
            Self::At(at) => at.as_integer().is_some(),
            Self::Slice { .. } => true,
        }
    }
}

impl<S: Scalar> From<i64> for Index<S> {
    fn from(n: i64) -> Self {
        Self::At(S::from_number(Rational::from(n)))
    }
}

/// The signature of the evaluation function of a [`Function`].
pub type Evaluate<A> = dyn Fn(&[Expr<A>]) -> Option<Expr<A>> + Send + Sync;

/// An opaque named callable.
///
/// When a function is applied to arguments, it is invoked with them. It returns [`None`] to
/// decline, in which case the application stays unresolved.
pub struct Function<A: Algebra> {
    name: String,
    eval: Arc<Evaluate<A>>,
}

impl<A: Algebra> Function<A> {
    /// The name of the function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the function.
    pub fn evaluate(&self, args: &[Expr<A>]) -> Option<Expr<A>> {
        (self.eval)(args)
    }
}

impl<A: Algebra> Clone for Function<A> {
    fn clone(&self) -> Self {
        Self { name: self.name.clone(), eval: Arc::clone(&self.eval) }
    }
}

impl<A: Algebra> Debug for Function<A> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish_non_exhaustive()
    }
}

/// The variants of an expression.
pub enum ExprKind<A: Algebra> {
    /// A leaf of the algebra.
    Atom(A::Atom),

    /// A sum, `Σ coefficient * term`.
    Terms(Pairs<A>),

    /// A product, `Π base ** exponent`.
    Factors(Pairs<A>),

    /// A deferred application of a function to arguments, `f(a1, ..., an)`.
    Composite(Expr<A>, Vec<Expr<A>>),

    /// A deferred indexing of an object, `obj[i1, ..., in]`.
    Component(Expr<A>, Vec<Index<A::Scalar>>),

    /// A deferred floor division, `floor(numerator, denominator)`.
    FloorDiv(Expr<A>, Expr<A>),

    /// An opaque callable.
    Function(Function<A>),
}

impl<A: Algebra> ExprKind<A> {
    /// The name of the variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Atom(_) => "Atom",
            Self::Terms(_) => "Terms",
            Self::Factors(_) => "Factors",
            Self::Composite(..) => "Composite",
            Self::Component(..) => "Component",
            Self::FloorDiv(..) => "FloorDiv",
            Self::Function(_) => "Function",
        }
    }
}

/// A node of the expression graph, with its memoized hash.
pub(crate) struct Node<A: Algebra> {
    pub(crate) kind: ExprKind<A>,
    pub(crate) hash: OnceLock<u64>,
}

/// A symbolic expression of the algebra `A`.
pub struct Expr<A: Algebra> {
    node: Arc<Node<A>>,
}

impl<A: Algebra> Clone for Expr<A> {
    fn clone(&self) -> Self {
        Self { node: Arc::clone(&self.node) }
    }
}

impl<A: Algebra> Expr<A> {
    /// Wraps a node without normalizing it. The caller is responsible for the node being
    /// canonical.
    pub(crate) fn from_kind(kind: ExprKind<A>) -> Self {
        Self { node: Arc::new(Node { kind, hash: OnceLock::new() }) }
    }

    /// Creates an atom.
    pub fn atom(atom: A::Atom) -> Self {
        Self::from_kind(ExprKind::Atom(atom))
    }

    /// Creates an opaque function with the given name and evaluation function.
    ///
    /// ```
    /// use symcalc_core::integers::{number, symbol, Integers};
    /// use symcalc_core::Expr;
    ///
    /// let square = Expr::<Integers>::function("square", |args| {
    ///     let [x] = args else { return None };
    ///     Some(x * x)
    /// });
    /// let a = symbol("a");
    /// assert_eq!(square.call([a.clone()]).unwrap().to_string(), "a ** 2");
    /// assert_eq!(square.call([number(3)]).unwrap().to_string(), "9");
    /// ```
    pub fn function<F>(name: impl Into<String>, eval: F) -> Self
    where
        F: Fn(&[Expr<A>]) -> Option<Expr<A>> + Send + Sync + 'static,
    {
        Self::from_kind(ExprKind::Function(Function { name: name.into(), eval: Arc::new(eval) }))
    }

    /// Returns the variant of the expression.
    pub fn kind(&self) -> &ExprKind<A> {
        &self.node.kind
    }

    /// Returns the atom, if the expression is one.
    pub fn as_atom(&self) -> Option<&A::Atom> {
        match self.kind() {
            ExprKind::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Returns the value of the expression if it is a literal number.
    pub fn as_number(&self) -> Option<&Rational> {
        self.as_atom().and_then(|atom| atom.as_number())
    }

    /// Returns the map of the expression if it is a sum.
    pub fn as_terms(&self) -> Option<&Pairs<A>> {
        match self.kind() {
            ExprKind::Terms(terms) => Some(terms),
            _ => None,
        }
    }

    /// Returns the map of the expression if it is a product.
    pub fn as_factors(&self) -> Option<&Pairs<A>> {
        match self.kind() {
            ExprKind::Factors(factors) => Some(factors),
            _ => None,
        }
    }

    /// Returns true if the expression is the zero of its algebra.
    pub fn is_zero(&self) -> bool {
        *self == A::zero()
    }

    /// Returns true if the expression is the identity of its algebra.
    pub fn is_one(&self) -> bool {
        *self == A::one()
    }

    /// Returns true if both handles point to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Returns true if the node satisfies the shape constraints of a canonical node. Only the
    /// node itself is inspected, not its children.
    pub(crate) fn is_canonical_node(&self) -> bool {
        match self.kind() {
            ExprKind::Terms(terms) => {
                let single_ok = match terms.iter().next() {
                    Some((term, coef)) if terms.len() == 1 => {
                        !coef.is_one() && !(A::IS_SCALAR_ALGEBRA && term.is_one())
                    },
                    _ => true,
                };
                !terms.is_empty()
                    && single_ok
                    && terms.iter().all(|(term, coef)| {
                        !term.is_zero() && !coef.is_zero() && term.as_terms().is_none()
                    })
            },
            ExprKind::Factors(factors) => {
                let single_ok = match factors.iter().next() {
                    Some((_, exp)) if factors.len() == 1 => !exp.is_one(),
                    _ => true,
                };
                !factors.is_empty()
                    && single_ok
                    && factors.iter().all(|(base, exp)| !base.is_one() && !exp.is_zero())
            },
            _ => true,
        }
    }
}

impl<A: Algebra> Debug for Expr<A> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&crate::fmt::Render::constructor(self))
    }
}
