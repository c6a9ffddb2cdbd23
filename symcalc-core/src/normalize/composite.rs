use crate::{
    algebra::Algebra,
    expr::{Expr, ExprKind},
    fmt::Render,
};
use super::{factors::{pow_by, scale_by}, unimplemented};
use symcalc_error::Error;
use tracing::debug;

/// Applies a coefficient or exponent to the arguments. Scalars that are not algebra elements
/// are constants.
fn apply_scalar<A: Algebra>(scalar: &A::Scalar, args: &[Expr<A>]) -> Result<A::Scalar, Error> {
    let Some(lifted) = A::lift(scalar) else {
        return Ok(scalar.clone());
    };
    let applied = lifted.call(args.iter().cloned())?;
    Ok(A::lower(&applied).unwrap_or_else(|| scalar.clone()))
}

/// Normalizes the application of `func` to `args`.
pub(super) fn normalize<A: Algebra>(raw: &Expr<A>, func: &Expr<A>, args: &[Expr<A>]) -> Result<Expr<A>, Error> {
    // constant functions
    if func.as_number().is_some() || func.is_zero() || func.is_one() {
        return Ok(func.clone());
    }

    match func.kind() {
        ExprKind::Terms(terms) => {
            let mut sum = A::zero();
            for (term, coef) in terms {
                let applied = scale_by(&term.call(args.iter().cloned())?, apply_scalar(coef, args)?)?;
                sum = sum.checked_add(&applied)?;
            }
            Ok(sum)
        },
        ExprKind::Factors(factors) => {
            let mut product = A::one();
            for (base, exp) in factors {
                let applied = pow_by(&base.call(args.iter().cloned())?, apply_scalar(exp, args)?)?;
                product = product.checked_mul(&applied)?;
            }
            Ok(product)
        },
        ExprKind::Composite(inner, inner_args) => {
            let composed = inner_args
                .iter()
                .map(|arg| arg.call(args.iter().cloned()))
                .collect::<Result<Vec<_>, _>>()?;
            inner.call(composed)
        },
        ExprKind::Function(function) => match function.evaluate(args) {
            Some(result) => Ok(result),
            None => {
                debug!(function = function.name(), "application left unresolved: `{}`", raw.infix());
                Ok(raw.clone())
            },
        },
        ExprKind::Atom(_) | ExprKind::Component(..) => Ok(raw.clone()),
        ExprKind::FloorDiv(..) => Err(unimplemented(raw, func)),
    }
}
