use crate::{error::ShapeMismatch, shape::Shape};
use once_cell::sync::Lazy;
use symcalc_core::{
    integers::Integers,
    Algebra,
    AtomKind,
    Expr,
    ExprKind,
    Index,
    Pairs,
    PairsKind,
    Precedence,
};
use symcalc_error::Error;
use tracing::trace;

/// The algebra of symbolic arrays. Coefficients and exponents are symbolic integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrays {}

/// An atom of [`Arrays`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArrayAtom {
    /// The additive identity, `<<0>>`.
    Zero,

    /// The multiplicative identity, `<<1>>`.
    One,

    /// A named array. Arrays without a shape may have any shape.
    Array {
        name: String,
        shape: Option<Shape>,
    },
}

impl AtomKind for ArrayAtom {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Zero | Self::One => "ArrayConstant",
            Self::Array { .. } => "Array",
        }
    }

    fn precedence(&self) -> Precedence {
        Precedence::ATOM
    }

    fn infix(&self) -> String {
        match self {
            Self::Zero => "<<0>>".to_string(),
            Self::One => "<<1>>".to_string(),
            Self::Array { name, .. } => name.clone(),
        }
    }

    fn constructor(&self) -> String {
        match self {
            Self::Zero | Self::One => format!("ArrayConstant({:?})", self.infix()),
            Self::Array { name, shape: None } => format!("Array({:?})", name),
            Self::Array { name, shape: Some(shape) } => format!("Array({:?}, {})", name, shape),
        }
    }
}

static ZERO: Lazy<Expr<Arrays>> = Lazy::new(|| Expr::atom(ArrayAtom::Zero));
static ONE: Lazy<Expr<Arrays>> = Lazy::new(|| Expr::atom(ArrayAtom::One));

impl Algebra for Arrays {
    type Atom = ArrayAtom;
    type Scalar = Expr<Integers>;

    const NAME: &'static str = "Array";
    const IS_SCALAR_ALGEBRA: bool = false;
    const IS_NUMBER_SCALAR: bool = false;

    fn zero() -> Expr<Self> {
        ZERO.clone()
    }

    fn one() -> Expr<Self> {
        ONE.clone()
    }

    fn index_atom(atom: &ArrayAtom, indices: &[Index<Expr<Integers>>]) -> Result<Option<Expr<Self>>, Error> {
        match atom {
            ArrayAtom::Array { name, shape: Some(shape) } if indices.iter().all(Index::is_literal) => {
                let shape = shape.index(indices)?;
                trace!(name = name.as_str(), %shape, "resolved static shape");
                Ok(Some(Expr::atom(ArrayAtom::Array { name: name.clone(), shape: Some(shape) })))
            },
            _ => Ok(None),
        }
    }

    fn check_pairs(_kind: PairsKind, pairs: &Pairs<Self>) -> Result<(), Error> {
        let mut seen: Option<(&Expr<Self>, &Shape)> = None;
        for key in pairs.keys() {
            let Some(shape) = shape_of(key) else {
                continue;
            };
            match seen {
                None => seen = Some((key, shape)),
                Some((first, first_shape)) if first_shape != shape => {
                    return Err(Error::spanning(
                        &[first.to_string(), key.to_string()],
                        ShapeMismatch { left: first_shape.to_string(), right: shape.to_string() },
                    ));
                },
                Some(_) => {},
            }
        }
        Ok(())
    }
}

/// Creates an array of any shape.
pub fn array(name: impl Into<String>) -> Expr<Arrays> {
    Expr::atom(ArrayAtom::Array { name: name.into(), shape: None })
}

/// Creates an array with a static shape.
pub fn shaped(name: impl Into<String>, shape: Shape) -> Expr<Arrays> {
    Expr::atom(ArrayAtom::Array { name: name.into(), shape: Some(shape) })
}

/// Returns the static shape of the expression: the shape of a shaped array, or the first known
/// shape among the keys of a sum or product.
pub fn shape_of(expr: &Expr<Arrays>) -> Option<&Shape> {
    match expr.kind() {
        ExprKind::Atom(ArrayAtom::Array { shape, .. }) => shape.as_ref(),
        ExprKind::Terms(pairs) | ExprKind::Factors(pairs) => pairs.keys().find_map(shape_of),
        _ => None,
    }
}

/// Renders the expression in infix form, followed by ` $ ` and its shape if it is known.
pub fn describe(expr: &Expr<Arrays>) -> String {
    match shape_of(expr) {
        Some(shape) => format!("{} $ {}", expr, shape),
        None => expr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ShapeMismatch, shape::ShapeBuilder};
    use pretty_assertions::assert_eq;
    use symcalc_core::{
        error::UnsupportedOperation,
        integers::symbols,
        ops::{apply, BinOp},
    };
    use super::*;

    fn square(n: &Expr<Integers>, name: &str) -> Expr<Arrays> {
        shaped(name, ShapeBuilder::new([n.clone(), n.clone()]).build().unwrap())
    }

    #[test]
    fn constants() {
        let a = array("a");
        assert_eq!(&a * 0, Arrays::zero());
        assert_eq!(&a - &a, Arrays::zero());
        assert_eq!(&a / &a, Arrays::one());
        assert_eq!(Arrays::zero().to_string(), "<<0>>");
        assert_eq!(format!("{:?}", Arrays::one()), r#"ArrayConstant("<<1>>")"#);
    }

    #[test]
    fn scalar_coefficients() {
        let [n] = symbols(["n"]);
        let a = array("a");
        assert_eq!((2 * &a).to_string(), "2 * a");
        assert_eq!((-&a).to_string(), "-a");
        assert_eq!((&a + 1).to_string(), "1 + a");
        assert_eq!(a.scale(&n).unwrap().to_string(), "n * a");
        assert_eq!((&a * &a).to_string(), "a ** 2");
    }

    #[test]
    fn sums_keep_the_shape() {
        let [n, n1, n2] = symbols(["n", "n1", "n2"]);
        let a = array("a");
        let b = shaped("b", ShapeBuilder::new([n1.clone(), n2.clone()]).build().unwrap());
        let expr = &(&(&a + &a.scale(&n).unwrap()) + 2) + &b;
        assert_eq!(expr.to_string(), "2 + b + (1 + n) * a");
        assert_eq!(
            describe(&expr),
            "2 + b + (1 + n) * a $ Shape(dims=(n1, n2), strides=(n1, 1), offset=0, item_size=1)",
        );
        assert_eq!(describe(&a), "a");

        let item = expr.index([Index::from(1)]).unwrap();
        assert_eq!(item.to_string(), "2 + b + (1 + n) * a[1]");
        assert_eq!(
            shape_of(&item).map(ToString::to_string).as_deref(),
            Some("Shape(dims=(n2,), strides=(1,), offset=n1, item_size=1)"),
        );
    }

    #[test]
    fn symbolic_indices_stay_deferred() {
        let [n, i] = symbols(["n", "i"]);
        let b = square(&n, "b");
        let item = b.index([Index::At(i)]).unwrap();
        assert_eq!(item.kind().name(), "Component");
        assert_eq!(item.to_string(), "b[i]");
    }

    #[test]
    fn mismatched_shapes() {
        let [n, m] = symbols(["n", "m"]);
        let (b, c) = (square(&n, "b"), square(&m, "c"));
        let err = b.checked_add(&c).unwrap_err();
        let kind = err.downcast_ref::<ShapeMismatch>().unwrap();
        assert_eq!(kind.left, "Shape(dims=(n, n), strides=(n, 1), offset=0, item_size=1)");
        assert!(b.checked_mul(&c).unwrap_err().is::<ShapeMismatch>());
        assert!(b.checked_add(&square(&n, "d")).is_ok());
    }

    #[test]
    fn unsupported_operations() {
        let a = array("a");
        let err = apply::<Arrays>(BinOp::Pow, 2.into(), (&a).into()).unwrap_err();
        let kind = err.downcast_ref::<UnsupportedOperation>().unwrap();
        assert_eq!((kind.left_type, kind.right_type), ("Scalar", "Array"));
        assert_eq!(err.to_string(), "unsupported operation: `2` ** `a`");
        assert!(a.checked_floor_div(2).unwrap_err().is::<UnsupportedOperation>());
        let report = strip_ansi_escapes::strip_str(err.report_to_string("expr"));
        assert!(report.contains("this operand has type `Array`"));
    }
}
