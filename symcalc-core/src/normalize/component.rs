use crate::{
    algebra::Algebra,
    expr::{Expr, ExprKind, Index},
};
use super::{factors::{pow_by, scale_by}, unimplemented};
use symcalc_error::Error;
use tracing::trace;

/// Normalizes the indexing of `obj` by `indices`.
pub(super) fn normalize<A: Algebra>(
    raw: &Expr<A>,
    obj: &Expr<A>,
    indices: &[Index<A::Scalar>],
) -> Result<Expr<A>, Error> {
    // constants index to themselves
    if obj.as_number().is_some() || obj.is_zero() || obj.is_one() {
        return Ok(obj.clone());
    }

    match obj.kind() {
        ExprKind::Atom(atom) => match A::index_atom(atom, indices)? {
            Some(resolved) => {
                trace!(indices = indices.len(), "resolved indexed atom");
                Ok(resolved)
            },
            None => Ok(raw.clone()),
        },
        ExprKind::Terms(terms) => {
            let mut sum = A::zero();
            for (term, coef) in terms {
                let indexed = scale_by(&term.index(indices.iter().cloned())?, coef.clone())?;
                sum = sum.checked_add(&indexed)?;
            }
            Ok(sum)
        },
        ExprKind::Factors(factors) => {
            let mut product = A::one();
            for (base, exp) in factors {
                let indexed = pow_by(&base.index(indices.iter().cloned())?, exp.clone())?;
                product = product.checked_mul(&indexed)?;
            }
            Ok(product)
        },
        ExprKind::Composite(func, args) => func.index(indices.iter().cloned())?.call(args.iter().cloned()),
        ExprKind::Component(inner, inner_indices) => {
            inner.index(inner_indices.iter().chain(indices).cloned())
        },
        ExprKind::FloorDiv(..) | ExprKind::Function(_) => Err(unimplemented(raw, obj)),
    }
}

#[cfg(test)]
mod tests {
    use crate::error::UnimplementedNormalization;
    use crate::integers::{number, symbols, Integers};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn constants_index_to_themselves() {
        let [i] = symbols(["i"]);
        assert_eq!(number(5).index([Index::At(i)]).unwrap(), number(5));
    }

    #[test]
    fn indexing_distributes() {
        let [x, y, i] = symbols(["x", "y", "i"]);
        let at = || [Index::At(i.clone())];
        assert_eq!((&(2 * &x) + &y).index(at()).unwrap().to_string(), "2 * x[i] + y[i]");
        assert_eq!((&x * &y.pow(2)).index(at()).unwrap().to_string(), "x[i] * y[i] ** 2");
    }

    #[test]
    fn nested_indices_concatenate() {
        let [x, i, j] = symbols(["x", "i", "j"]);
        let once = x.index([Index::At(i.clone())]).unwrap().index([Index::At(j.clone())]).unwrap();
        let both = x.index([Index::At(i), Index::At(j)]).unwrap();
        assert_eq!(once, both);
        assert_eq!(both.to_string(), "x[i, j]");
    }

    #[test]
    fn index_then_apply() {
        let [f, x, i] = symbols(["f", "x", "i"]);
        let indexed = f.call([x]).unwrap().index([Index::At(i)]).unwrap();
        assert_eq!(indexed.to_string(), "f[i](x)");
    }

    #[test]
    fn functions_cannot_be_indexed() {
        let [i] = symbols(["i"]);
        let f = Expr::<Integers>::function("f", |_| None);
        let err = f.index([Index::At(i)]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnimplementedNormalization>().unwrap(),
            &UnimplementedNormalization { operation: "Component", operand: "Function" },
        );
    }
}
