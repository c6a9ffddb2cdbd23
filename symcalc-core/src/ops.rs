//! The operator layer.
//!
//! Operators build a raw sum, product, application or indexing node from their operands and
//! immediately hand it to the normalizer, so every expression they return is canonical.
//!
//! Each binary operator is first tried in its forward form on the left operand. When the left
//! operand has no rule for the combination, the reflected form is tried on the right operand.
//! Only when neither applies does the operation fail with [`UnsupportedOperation`].
//!
//! The fallible `checked_*` methods return a [`Result`]. The [`std::ops`] implementations and
//! the [`Expr::pow`] / [`Expr::floor_div`] shorthands panic instead.

use crate::{
    algebra::{Algebra, Scalar},
    error::UnsupportedOperation,
    expr::{Expr, ExprKind, Index},
    fmt::Render,
    normalize::{normalize, pairs},
};
use rug::Rational;
use std::ops::{Add, Div, Mul, Neg, Sub};
use symcalc_error::Error;
use tracing::trace;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    FloorDiv,
}

impl BinOp {
    /// The symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
            Self::FloorDiv => "//",
        }
    }
}

/// An operand of a binary operation.
#[derive(Debug)]
pub enum Operand<A: Algebra> {
    /// An element of the algebra.
    Expr(Expr<A>),

    /// A scalar of the algebra.
    Scalar(A::Scalar),

    /// A host literal, promoted to a literal of the algebra if it has them, or to a scalar.
    Number(Rational),
}

impl<A: Algebra> Operand<A> {
    fn promote(self) -> Self {
        match self {
            Self::Number(n) => match A::number(&n) {
                Some(expr) => Self::Expr(expr),
                None => Self::Scalar(A::Scalar::from_number(n)),
            },
            // scalars of a scalar algebra are elements
            Self::Scalar(scalar) if A::IS_SCALAR_ALGEBRA => match A::lift(&scalar) {
                Some(expr) => Self::Expr(expr),
                None => Self::Scalar(scalar),
            },
            other => other,
        }
    }

    fn text(&self) -> String {
        match self {
            Self::Expr(expr) => expr.infix(),
            Self::Scalar(scalar) => scalar.infix(),
            Self::Number(n) => n.to_string(),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Expr(_) => A::NAME,
            Self::Scalar(_) => "Scalar",
            Self::Number(_) => "Number",
        }
    }
}

impl<A: Algebra> From<Expr<A>> for Operand<A> {
    fn from(expr: Expr<A>) -> Self {
        Self::Expr(expr)
    }
}

impl<A: Algebra> From<&Expr<A>> for Operand<A> {
    fn from(expr: &Expr<A>) -> Self {
        Self::Expr(expr.clone())
    }
}

impl<A: Algebra> From<i32> for Operand<A> {
    fn from(n: i32) -> Self {
        Self::Number(Rational::from(n))
    }
}

impl<A: Algebra> From<i64> for Operand<A> {
    fn from(n: i64) -> Self {
        Self::Number(Rational::from(n))
    }
}

impl<A: Algebra> From<Rational> for Operand<A> {
    fn from(n: Rational) -> Self {
        Self::Number(n)
    }
}

/// Applies the binary operator to the operands.
pub fn apply<A: Algebra>(op: BinOp, lhs: Operand<A>, rhs: Operand<A>) -> Result<Expr<A>, Error> {
    let (lhs, rhs) = (lhs.promote(), rhs.promote());
    if let Some(result) = forward(op, &lhs, &rhs)? {
        return Ok(result);
    }
    if let Some(result) = reflected(op, &lhs, &rhs)? {
        return Ok(result);
    }

    let (left, right) = (lhs.text(), rhs.text());
    trace!(op = op.symbol(), %left, %right, "no rule for operands");
    Err(Error::spanning(
        &[left.clone(), op.symbol().to_string(), right.clone()],
        UnsupportedOperation {
            op: op.symbol(),
            left,
            left_type: lhs.type_name(),
            right,
            right_type: rhs.type_name(),
        },
    ))
}

fn minus_one<A: Algebra>() -> A::Scalar {
    A::Scalar::from_number(Rational::from(-1))
}

/// The rules of the left operand. Returns [`None`] if the combination is not applicable.
fn forward<A: Algebra>(op: BinOp, lhs: &Operand<A>, rhs: &Operand<A>) -> Result<Option<Expr<A>>, Error> {
    let Operand::Expr(lhs) = lhs else {
        return Ok(None);
    };
    let result = match (op, rhs) {
        (_, Operand::Number(_)) => return Ok(None),
        (BinOp::Add, Operand::Expr(rhs)) => lhs.add_expr(rhs)?,
        (BinOp::Add, Operand::Scalar(rhs)) => lhs.add_scalar(rhs)?,
        (BinOp::Sub, Operand::Expr(rhs)) => lhs.add_expr(&rhs.scale(&minus_one::<A>())?)?,
        (BinOp::Sub, Operand::Scalar(rhs)) => lhs.add_scalar(&rhs.checked_neg()?)?,
        (BinOp::Mul, Operand::Expr(rhs)) => lhs.mul_expr(rhs)?,
        (BinOp::Mul, Operand::Scalar(rhs)) => lhs.scale(rhs)?,
        (BinOp::Div, Operand::Expr(rhs)) => lhs.div_expr(rhs)?,
        (BinOp::Div, Operand::Scalar(rhs)) => lhs.scale(&rhs.checked_pow(&minus_one::<A>())?)?,
        (BinOp::Pow, Operand::Expr(rhs)) => match A::lower(rhs) {
            Some(exp) if A::IS_SCALAR_ALGEBRA => lhs.pow_scalar(&exp)?,
            _ => return Ok(None),
        },
        (BinOp::Pow, Operand::Scalar(rhs)) => lhs.pow_scalar(rhs)?,
        (BinOp::FloorDiv, Operand::Expr(rhs)) => lhs.floor_div_expr(rhs)?,
        (BinOp::FloorDiv, Operand::Scalar(rhs)) => match A::lift(rhs) {
            Some(rhs) => lhs.floor_div_expr(&rhs)?,
            None => return Ok(None),
        },
    };
    Ok(Some(result))
}

/// The rules of the right operand, for a scalar on the left. Returns [`None`] if the
/// combination is not applicable.
fn reflected<A: Algebra>(op: BinOp, lhs: &Operand<A>, rhs: &Operand<A>) -> Result<Option<Expr<A>>, Error> {
    let (Operand::Scalar(lhs), Operand::Expr(rhs)) = (lhs, rhs) else {
        return Ok(None);
    };
    let result = match op {
        BinOp::Add => rhs.add_scalar(lhs)?,
        BinOp::Sub => rhs.scale(&minus_one::<A>())?.add_scalar(lhs)?,
        BinOp::Mul => rhs.scale(lhs)?,
        BinOp::Div => rhs.pow_scalar(&minus_one::<A>())?.scale(lhs)?,
        BinOp::Pow => match (A::lift(lhs), A::lower(rhs)) {
            (Some(base), Some(exp)) => base.pow_scalar(&exp)?,
            _ => return Ok(None),
        },
        BinOp::FloorDiv => match A::lift(lhs) {
            Some(numer) => numer.floor_div_expr(rhs)?,
            None => return Ok(None),
        },
    };
    Ok(Some(result))
}

impl<A: Algebra> Expr<A> {
    /// Returns `self + scalar`.
    pub fn add_scalar(&self, scalar: &A::Scalar) -> Result<Self, Error> {
        if let (Some(x), Some(y)) = (self.as_number(), scalar.as_number()) {
            if let Some(sum) = A::number(&Rational::from(x + y)) {
                return Ok(sum);
            }
        }
        let one = A::Scalar::from_number(Rational::from(1));
        let raw = if self.is_one() {
            pairs([(self.clone(), one.checked_add(scalar)?)])?
        } else {
            pairs([(self.clone(), one), (A::one(), scalar.clone())])?
        };
        normalize(ExprKind::Terms(raw))
    }

    /// Returns `self * scalar`.
    pub fn scale(&self, scalar: &A::Scalar) -> Result<Self, Error> {
        if let (Some(x), Some(y)) = (self.as_number(), scalar.as_number()) {
            if let Some(product) = A::number(&Rational::from(x * y)) {
                return Ok(product);
            }
        }
        normalize(ExprKind::Terms(pairs([(self.clone(), scalar.clone())])?))
    }

    /// Returns `self ** exp` for a scalar exponent.
    pub fn pow_scalar(&self, exp: &A::Scalar) -> Result<Self, Error> {
        normalize(ExprKind::Factors(pairs([(self.clone(), exp.clone())])?))
    }

    fn add_expr(&self, rhs: &Self) -> Result<Self, Error> {
        if let Some(scalar) = A::as_coefficient(rhs) {
            return self.add_scalar(&scalar);
        }
        if let Some(scalar) = A::as_coefficient(self) {
            return rhs.add_scalar(&scalar);
        }
        let one = A::Scalar::from_number(Rational::from(1));
        if self == rhs {
            return self.scale(&one.checked_add(&one)?);
        }
        normalize(ExprKind::Terms(pairs([(self.clone(), one.clone()), (rhs.clone(), one)])?))
    }

    fn mul_expr(&self, rhs: &Self) -> Result<Self, Error> {
        if let Some(scalar) = A::as_coefficient(rhs) {
            return self.scale(&scalar);
        }
        if let Some(scalar) = A::as_coefficient(self) {
            return rhs.scale(&scalar);
        }
        let one = A::Scalar::from_number(Rational::from(1));
        if self == rhs {
            return self.pow_scalar(&one.checked_add(&one)?);
        }
        normalize(ExprKind::Factors(pairs([(self.clone(), one.clone()), (rhs.clone(), one)])?))
    }

    fn div_expr(&self, rhs: &Self) -> Result<Self, Error> {
        if A::IS_SCALAR_ALGEBRA && self == rhs {
            return Ok(A::one());
        }
        self.mul_expr(&rhs.pow_scalar(&minus_one::<A>())?)
    }

    fn floor_div_expr(&self, rhs: &Self) -> Result<Self, Error> {
        normalize(ExprKind::FloorDiv(self.clone(), rhs.clone()))
    }

    pub fn checked_add(&self, rhs: impl Into<Operand<A>>) -> Result<Self, Error> {
        apply(BinOp::Add, self.into(), rhs.into())
    }

    pub fn checked_sub(&self, rhs: impl Into<Operand<A>>) -> Result<Self, Error> {
        apply(BinOp::Sub, self.into(), rhs.into())
    }

    pub fn checked_mul(&self, rhs: impl Into<Operand<A>>) -> Result<Self, Error> {
        apply(BinOp::Mul, self.into(), rhs.into())
    }

    pub fn checked_div(&self, rhs: impl Into<Operand<A>>) -> Result<Self, Error> {
        apply(BinOp::Div, self.into(), rhs.into())
    }

    pub fn checked_pow(&self, exp: impl Into<Operand<A>>) -> Result<Self, Error> {
        apply(BinOp::Pow, self.into(), exp.into())
    }

    pub fn checked_floor_div(&self, rhs: impl Into<Operand<A>>) -> Result<Self, Error> {
        apply(BinOp::FloorDiv, self.into(), rhs.into())
    }

    /// Returns `-self`.
    pub fn checked_neg(&self) -> Result<Self, Error> {
        self.scale(&minus_one::<A>())
    }

    /// Raises the expression to a power.
    ///
    /// # Panics
    ///
    /// Panics if the operation is not supported by the algebra or the normalizer fails. Use
    /// [`Expr::checked_pow`] to handle the error instead.
    pub fn pow(&self, exp: impl Into<Operand<A>>) -> Self {
        or_panic(self.checked_pow(exp))
    }

    /// Floor-divides the expression.
    ///
    /// # Panics
    ///
    /// Panics if the operation is not supported by the algebra or the normalizer fails. Use
    /// [`Expr::checked_floor_div`] to handle the error instead.
    pub fn floor_div(&self, rhs: impl Into<Operand<A>>) -> Self {
        or_panic(self.checked_floor_div(rhs))
    }

    /// Applies the expression, as a function, to the arguments.
    pub fn call(&self, args: impl IntoIterator<Item = Expr<A>>) -> Result<Self, Error> {
        normalize(ExprKind::Composite(self.clone(), args.into_iter().collect()))
    }

    /// Indexes the expression.
    pub fn index(&self, indices: impl IntoIterator<Item = Index<A::Scalar>>) -> Result<Self, Error> {
        normalize(ExprKind::Component(self.clone(), indices.into_iter().collect()))
    }
}

fn or_panic<A: Algebra>(result: Result<Expr<A>, Error>) -> Expr<A> {
    match result {
        Ok(expr) => expr,
        Err(err) => panic!("{}", err),
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<A: Algebra> $trait<Expr<A>> for Expr<A> {
            type Output = Expr<A>;

            fn $method(self, rhs: Expr<A>) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }

        impl<A: Algebra> $trait<&Expr<A>> for Expr<A> {
            type Output = Expr<A>;

            fn $method(self, rhs: &Expr<A>) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }

        impl<A: Algebra> $trait<Expr<A>> for &Expr<A> {
            type Output = Expr<A>;

            fn $method(self, rhs: Expr<A>) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }

        impl<A: Algebra> $trait<&Expr<A>> for &Expr<A> {
            type Output = Expr<A>;

            fn $method(self, rhs: &Expr<A>) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }

        impl<A: Algebra> $trait<i64> for Expr<A> {
            type Output = Expr<A>;

            fn $method(self, rhs: i64) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }

        impl<A: Algebra> $trait<i64> for &Expr<A> {
            type Output = Expr<A>;

            fn $method(self, rhs: i64) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }

        impl<A: Algebra> $trait<Expr<A>> for i64 {
            type Output = Expr<A>;

            fn $method(self, rhs: Expr<A>) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }

        impl<A: Algebra> $trait<&Expr<A>> for i64 {
            type Output = Expr<A>;

            fn $method(self, rhs: &Expr<A>) -> Expr<A> {
                or_panic(apply($op, self.into(), rhs.into()))
            }
        }
    };
}

impl_binop!(Add, add, BinOp::Add);
impl_binop!(Sub, sub, BinOp::Sub);
impl_binop!(Mul, mul, BinOp::Mul);
impl_binop!(Div, div, BinOp::Div);

impl<A: Algebra> Neg for Expr<A> {
    type Output = Expr<A>;

    fn neg(self) -> Expr<A> {
        or_panic(self.checked_neg())
    }
}

impl<A: Algebra> Neg for &Expr<A> {
    type Output = Expr<A>;

    fn neg(self) -> Expr<A> {
        or_panic(self.checked_neg())
    }
}

#[cfg(test)]
mod tests {
    use crate::algebra::AtomKind;
    use crate::error::{DivisionByZero, UnsupportedOperation};
    use crate::fmt::Precedence;
    use crate::integers::{number, rational, symbol, symbols, Integers};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn literal_fast_path() {
        assert_eq!(number(2) + number(3), number(5));
        assert_eq!(number(2) * 3, number(6));
        assert_eq!(number(1) / 3, rational(1, 3));
        assert_eq!(number(2).pow(10), number(1024));
        assert_eq!(number(2).pow(-2), rational(1, 4));
        assert_eq!(number(7).floor_div(2), number(3));
        assert_eq!(number(-7).floor_div(2), number(-4));
    }

    #[test]
    fn identities() {
        let a = symbol("a");
        assert_eq!(&a + 0, a);
        assert_eq!(&a * 0, number(0));
        assert_eq!(&a * 1, a);
        assert_eq!(a.pow(0), number(1));
        assert_eq!(a.pow(1), a);
        assert_eq!(&a - &a, number(0));
        assert_eq!(&a / &a, number(1));
    }

    #[test]
    fn like_terms_and_factors() {
        let a = symbol("a");
        assert_eq!(&a + &a, 2 * &a);
        assert_eq!(&a * &a, a.pow(2));
        assert_eq!(&(&a * &a) * &a, a.pow(3));
        assert_eq!((&a + &a).to_string(), "2 * a");
    }

    #[test]
    fn reflected_forms() {
        let a = symbol("a");
        assert_eq!((1 + &a).to_string(), "1 + a");
        assert_eq!((2 * &a).to_string(), "2 * a");
        assert_eq!((2 - &a).to_string(), "2 - a");
        assert_eq!((2 / &a).to_string(), "2 * a ** (-1)");
        assert_eq!(number(2).pow(&a).to_string(), "2 ** a");
    }

    #[test]
    fn scalar_operands() {
        let [a, n] = symbols(["a", "n"]);
        let via_scalar = apply::<Integers>(BinOp::Mul, Operand::Scalar(n.clone()), (&a).into()).unwrap();
        assert_eq!(via_scalar, &a * &n);
        let plus = apply::<Integers>(BinOp::Add, (&a).into(), Operand::Scalar(n.clone())).unwrap();
        assert_eq!(plus, &a + &n);
    }

    #[test]
    fn division_by_zero() {
        let a = symbol("a");
        let err = a.checked_div(0).unwrap_err();
        assert!(err.is::<DivisionByZero>());
        let err = number(3).checked_floor_div(0).unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }

    /// An algebra without literals whose scalars are the symbolic integers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Vectors {}

    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    enum VecAtom {
        Zero,
        One,
        Named(&'static str),
    }

    impl AtomKind for VecAtom {
        fn kind_name(&self) -> &'static str {
            "Vector"
        }

        fn precedence(&self) -> Precedence {
            Precedence::ATOM
        }

        fn infix(&self) -> String {
            match self {
                Self::Zero => "0v".to_string(),
                Self::One => "1v".to_string(),
                Self::Named(name) => name.to_string(),
            }
        }

        fn constructor(&self) -> String {
            format!("Vector({:?})", self.infix())
        }
    }

    impl Algebra for Vectors {
        type Atom = VecAtom;
        type Scalar = Expr<Integers>;

        const NAME: &'static str = "Vector";
        const IS_SCALAR_ALGEBRA: bool = false;
        const IS_NUMBER_SCALAR: bool = false;

        fn zero() -> Expr<Self> {
            Expr::atom(VecAtom::Zero)
        }

        fn one() -> Expr<Self> {
            Expr::atom(VecAtom::One)
        }
    }

    #[test]
    fn operands_without_a_rule() {
        let v = Expr::<Vectors>::atom(VecAtom::Named("v"));

        let err = apply::<Vectors>(BinOp::Pow, 2.into(), (&v).into()).unwrap_err();
        let kind = err.downcast_ref::<UnsupportedOperation>().unwrap();
        assert_eq!(kind.op, "**");
        assert_eq!((kind.left_type, kind.right_type), ("Scalar", "Vector"));
        assert_eq!(err.to_string(), "unsupported operation: `2` ** `v`");
        assert_eq!(err.source, "2 ** v");

        let err = v.checked_pow(&v).unwrap_err();
        assert_eq!(err.downcast_ref::<UnsupportedOperation>().unwrap().right_type, "Vector");

        let err = v.checked_floor_div(3).unwrap_err();
        assert_eq!(err.downcast_ref::<UnsupportedOperation>().unwrap().op, "//");

        let n = symbol("n");
        let err = apply::<Vectors>(BinOp::FloorDiv, Operand::Scalar(n), (&v).into()).unwrap_err();
        assert!(err.is::<UnsupportedOperation>());

        // scalars still scale
        assert_eq!(v.checked_mul(3).unwrap().to_string(), "3 * v");
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn operators_panic_on_error() {
        let _ = symbol("a") / 0;
    }
}
