//! The descriptor traits that parameterize expressions over an algebra.
//!
//! Every expression is an [`Expr<A>`] for some marker type `A` implementing [`Algebra`]. The
//! descriptor tells the normalizer what the identity elements of the algebra are, which type
//! its coefficients and exponents have, and provides hooks for the few places where algebras
//! behave differently (folding literals, powers of atoms, narrowing shapes on indexing).

use crate::{
    config::Limits,
    error::{DivisionByZero, LimitExceeded},
    expr::{Expr, Index, Pairs},
    fmt::{Precedence, Render},
};
use rug::Rational;
use std::{fmt::Debug, hash::Hash};
use symcalc_error::Error;

/// The leaf values of an algebra.
pub trait AtomKind: Clone + Debug + Eq + Hash + Ord + Send + Sync + 'static {
    /// The name of the atom's variant, shown by the tree and constructor targets.
    fn kind_name(&self) -> &'static str;

    /// The precedence of the atom's infix rendering.
    fn precedence(&self) -> Precedence;

    /// Renders the atom in infix form.
    fn infix(&self) -> String;

    /// Renders the atom as a constructor call.
    fn constructor(&self) -> String;

    /// Returns the value of the atom if it is a literal number.
    fn as_number(&self) -> Option<&Rational> {
        None
    }
}

/// The coefficients and exponents of an algebra.
pub trait Scalar: Clone + Debug + Eq + Hash + Ord + Send + Sync + Render + 'static {
    /// Creates the scalar representing the given literal.
    fn from_number(n: Rational) -> Self;

    /// Returns the value of the scalar if it is a literal number.
    fn as_number(&self) -> Option<&Rational>;

    fn checked_add(&self, rhs: &Self) -> Result<Self, Error>;

    fn checked_mul(&self, rhs: &Self) -> Result<Self, Error>;

    fn checked_neg(&self) -> Result<Self, Error>;

    fn checked_pow(&self, exp: &Self) -> Result<Self, Error>;

    /// Returns true if the scalar is the literal zero.
    fn is_zero(&self) -> bool {
        self.as_number().map_or(false, |n| n.cmp0().is_eq())
    }

    /// Returns true if the scalar is the literal one.
    fn is_one(&self) -> bool {
        self.as_number().map_or(false, |n| *n == 1)
    }

    /// Returns true if the scalar is the literal minus one.
    fn is_minus_one(&self) -> bool {
        self.as_number().map_or(false, |n| *n == -1)
    }

    /// Returns the scalar as an integer, if it is an integral literal that fits in an `i64`.
    fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(crate::primitive::to_i64)
    }
}

/// Which kind of map a [`Pairs`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairsKind {
    /// A sum, mapping terms to coefficients.
    Terms,

    /// A product, mapping bases to exponents.
    Factors,
}

/// The descriptor of an algebra.
///
/// Implemented by uninhabited marker types (`enum Integers {}`); all of the information is
/// carried by associated types, constants and functions.
pub trait Algebra: Sized + Send + Sync + 'static {
    /// The leaves of the algebra.
    type Atom: AtomKind;

    /// The coefficient domain of the algebra. This is also the type of exponents.
    type Scalar: Scalar;

    /// The prefix of the constructor names of non-atom nodes, such as `IntegerTerms`.
    const NAME: &'static str;

    /// Whether scalars and algebra elements coincide. When true, a scalar can be raised to an
    /// algebra-valued power, `a / a` is the scalar one, and a sum that collapses to a bare constant
    /// is the constant itself.
    const IS_SCALAR_ALGEBRA: bool;

    /// Whether plain literal counts may serve directly as Terms coefficients, so that a literal
    /// produced while normalizing folds into the coefficient of the constant term.
    const IS_NUMBER_SCALAR: bool;

    /// The additive identity.
    fn zero() -> Expr<Self>;

    /// The multiplicative identity.
    fn one() -> Expr<Self>;

    /// The literal as an element of the algebra, if the algebra has literals.
    fn number(_n: &Rational) -> Option<Expr<Self>> {
        None
    }

    /// The scalar as an element of the algebra, if scalars are algebra elements.
    fn lift(_scalar: &Self::Scalar) -> Option<Expr<Self>> {
        None
    }

    /// The element as a scalar, if algebra elements are scalars.
    fn lower(_expr: &Expr<Self>) -> Option<Self::Scalar> {
        None
    }

    /// Decides whether an expression produced in the middle of a normalization is folded into
    /// a coefficient instead of being kept as a term or factor. Returns the coefficient to fold.
    ///
    /// The default folds literal numbers when [`Algebra::IS_NUMBER_SCALAR`] holds.
    fn as_coefficient(expr: &Expr<Self>) -> Option<Self::Scalar> {
        if Self::IS_NUMBER_SCALAR {
            expr.as_number().map(|n| Self::Scalar::from_number(n.clone()))
        } else {
            None
        }
    }

    /// Special-cases an atom raised to a power. Returns [`None`] when the power stays symbolic.
    fn atom_power(_atom: &Self::Atom, _exp: &Self::Scalar) -> Result<Option<Expr<Self>>, Error> {
        Ok(None)
    }

    /// Special-cases indexing an atom. Returns [`None`] when the indexing stays symbolic.
    fn index_atom(
        _atom: &Self::Atom,
        _indices: &[Index<Self::Scalar>],
    ) -> Result<Option<Expr<Self>>, Error> {
        Ok(None)
    }

    /// Validates a canonical map before it is wrapped in a node.
    fn check_pairs(_kind: PairsKind, _pairs: &Pairs<Self>) -> Result<(), Error> {
        Ok(())
    }
}

/// Raises a literal to a literal power, folding it when the exponent is an integer.
///
/// This is the `power` rule of algebras with literal atoms: `1 ** e` is `1`, integer powers are
/// computed exactly up to the exponent limit, anything else stays symbolic.
pub fn number_power<A: Algebra>(base: &Rational, exp: &A::Scalar) -> Result<Option<Expr<A>>, Error> {
    if *base == 1 {
        return Ok(A::number(base));
    }
    let Some(exp) = exp.as_integer() else {
        return Ok(None);
    };
    let max = Limits::current().max_exponent;
    if exp.unsigned_abs() > max as u64 && *base != 0 && *base != -1 {
        return Err(Error::spanning(
            &[base.to_string(), format!("** {}", exp)],
            LimitExceeded { limit: "exponent", max },
        ));
    }
    match crate::primitive::pow(base, exp) {
        Some(n) => Ok(A::number(&n)),
        None if base.cmp0().is_eq() && exp < 0 => Err(Error::spanning(
            &[base.to_string(), format!("** {}", exp)],
            DivisionByZero { expr: format!("{} ** {}", base, exp) },
        )),
        None => Ok(None),
    }
}
