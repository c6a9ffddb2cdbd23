//! Symbolic integers.
//!
//! The atoms of this algebra are exact rational literals and named integer symbols. Scalars and
//! elements coincide: the coefficients and exponents of a sum or product are themselves
//! expressions of this algebra, and literal results are folded into coefficients.
//!
//! ```
//! use symcalc_core::integers::symbols;
//!
//! let [a, b] = symbols(["a", "b"]);
//! assert_eq!((&a + &b).pow(2).to_string(), "2 * a * b + a ** 2 + b ** 2");
//! assert_eq!((&a / &a).to_string(), "1");
//! ```

use crate::{
    algebra::{number_power, Algebra, AtomKind, Scalar},
    expr::Expr,
    fmt::Precedence,
    ops::{apply, BinOp},
};
use once_cell::sync::Lazy;
use rug::Rational;
use symcalc_error::Error;

/// The algebra of symbolic integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Integers {}

/// An atom of [`Integers`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntAtom {
    /// An exact literal, such as `2` or `1/2`.
    Number(Rational),

    /// A named integer symbol.
    Symbol(String),
}

impl AtomKind for IntAtom {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "Int",
            Self::Symbol(_) => "Integer",
        }
    }

    fn precedence(&self) -> Precedence {
        match self {
            Self::Number(n) if n.cmp0().is_lt() => Precedence::UNARY,
            Self::Number(n) if !n.is_integer() => Precedence::FRAC,
            _ => Precedence::ATOM,
        }
    }

    fn infix(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Symbol(name) => name.clone(),
        }
    }

    fn constructor(&self) -> String {
        match self {
            Self::Number(n) => format!("Int({})", n),
            Self::Symbol(name) => format!("Integer({:?})", name),
        }
    }

    fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Number(n) => Some(n),
            Self::Symbol(_) => None,
        }
    }
}

static ZERO: Lazy<Expr<Integers>> = Lazy::new(|| number(0));
static ONE: Lazy<Expr<Integers>> = Lazy::new(|| number(1));

impl Scalar for Expr<Integers> {
    fn from_number(n: Rational) -> Self {
        Expr::atom(IntAtom::Number(n))
    }

    fn as_number(&self) -> Option<&Rational> {
        Expr::as_number(self)
    }

    fn checked_add(&self, rhs: &Self) -> Result<Self, Error> {
        apply(BinOp::Add, self.into(), rhs.into())
    }

    fn checked_mul(&self, rhs: &Self) -> Result<Self, Error> {
        apply(BinOp::Mul, self.into(), rhs.into())
    }

    fn checked_neg(&self) -> Result<Self, Error> {
        apply(BinOp::Mul, self.into(), (-1).into())
    }

    fn checked_pow(&self, exp: &Self) -> Result<Self, Error> {
        apply(BinOp::Pow, self.into(), exp.into())
    }
}

impl Algebra for Integers {
    type Atom = IntAtom;
    type Scalar = Expr<Integers>;

    const NAME: &'static str = "Integer";
    const IS_SCALAR_ALGEBRA: bool = true;
    const IS_NUMBER_SCALAR: bool = true;

    fn zero() -> Expr<Self> {
        ZERO.clone()
    }

    fn one() -> Expr<Self> {
        ONE.clone()
    }

    fn number(n: &Rational) -> Option<Expr<Self>> {
        Some(Expr::atom(IntAtom::Number(n.clone())))
    }

    fn lift(scalar: &Expr<Self>) -> Option<Expr<Self>> {
        Some(scalar.clone())
    }

    fn lower(expr: &Expr<Self>) -> Option<Expr<Self>> {
        Some(expr.clone())
    }

    fn atom_power(atom: &IntAtom, exp: &Expr<Self>) -> Result<Option<Expr<Self>>, Error> {
        match atom {
            IntAtom::Number(n) => number_power::<Self>(n, exp),
            IntAtom::Symbol(_) => Ok(None),
        }
    }
}

/// Creates an integer symbol.
pub fn symbol(name: impl Into<String>) -> Expr<Integers> {
    Expr::atom(IntAtom::Symbol(name.into()))
}

/// Creates several integer symbols at once.
pub fn symbols<const N: usize>(names: [&str; N]) -> [Expr<Integers>; N] {
    names.map(|name| symbol(name))
}

/// Creates an integer literal.
pub fn number(n: i64) -> Expr<Integers> {
    Expr::atom(IntAtom::Number(Rational::from(n)))
}

/// Creates the rational literal `numer / denom`, in lowest terms.
///
/// # Panics
///
/// Panics if `denom` is zero.
pub fn rational(numer: i64, denom: i64) -> Expr<Integers> {
    Expr::atom(IntAtom::Number(Rational::from((numer, denom))))
}
