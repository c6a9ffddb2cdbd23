//! Normalization of products.
//!
//! Two accumulators are kept while the raw pairs are consumed: the running product, a map from
//! base to exponent, and the running sum it will be multiplied into, seeded with
//! `{1: 1}`. Literal factors rescale the sum, sums raised to positive integer
//! powers are expanded into it by repeated convolution, and everything else is merged into the
//! product. At the end the product is distributed over the terms of the sum.

use crate::{
    algebra::{Algebra, PairsKind, Scalar},
    config::Limits,
    error::{DivisionByZero, LimitExceeded},
    expr::{Expr, ExprKind, Pairs},
    fmt::Render,
    ops::{apply, BinOp, Operand},
};
use super::{add_pair, scalar_one, terms::{self as sums, add_term}};
use symcalc_error::Error;
use tracing::trace;

/// The special cases of raising `base` to `exp`. Returns [`None`] when the power stays as it is.
fn power<A: Algebra>(base: &Expr<A>, exp: &A::Scalar) -> Result<Option<Expr<A>>, Error> {
    if exp.is_zero() {
        return Ok(Some(A::one()));
    }
    if exp.is_one() {
        return Ok(Some(base.clone()));
    }
    match base.kind() {
        ExprKind::Atom(atom) => A::atom_power(atom, exp),
        ExprKind::Factors(inner)
            if exp.as_integer().is_some() && inner.values().all(|e| e.as_integer().is_some()) =>
        {
            let mut merged = Pairs::new();
            for (b, e) in inner {
                add_pair(&mut merged, b.clone(), e.checked_mul(exp)?)?;
            }
            let single = match (merged.len(), merged.iter().next()) {
                (0, _) => return Ok(Some(A::one())),
                (1, Some((b, e))) if e.is_one() => Some(b.clone()),
                _ => None,
            };
            // transient, flattened again by the caller
            Ok(Some(single.unwrap_or_else(|| Expr::from_kind(ExprKind::Factors(merged)))))
        },
        _ => Ok(None),
    }
}

fn division_by_zero<A: Algebra>(base: &Expr<A>, exp: &A::Scalar) -> Error {
    let (base, exp) = (base.infix(), exp.infix());
    Error::spanning(
        &[base.clone(), format!("** {}", exp)],
        DivisionByZero { expr: format!("{} ** {}", base, exp) },
    )
}

/// Returns the exponent as a positive integer, if it is one.
fn positive_integer<S: Scalar>(exp: &S) -> Option<usize> {
    exp.as_integer().and_then(|n| usize::try_from(n).ok()).filter(|&n| n > 0)
}

/// Multiplies two terms, skipping the identity.
fn mul<A: Algebra>(x: &Expr<A>, y: &Expr<A>) -> Result<Expr<A>, Error> {
    if x.is_one() {
        Ok(y.clone())
    } else if y.is_one() {
        Ok(x.clone())
    } else {
        x.checked_mul(y)
    }
}

/// Multiplies every coefficient of the sum by the scalar.
fn rescale<A: Algebra>(terms: &mut Pairs<A>, scalar: &A::Scalar) -> Result<(), Error> {
    let mut scaled = Pairs::new();
    for (term, coef) in terms.iter() {
        add_pair(&mut scaled, term.clone(), coef.checked_mul(scalar)?)?;
    }
    *terms = scaled;
    Ok(())
}

/// Multiplies the running sum by another sum.
fn convolve<A: Algebra>(terms: &mut Pairs<A>, other: &Pairs<A>) -> Result<(), Error> {
    let mut product = Pairs::new();
    for (t1, c1) in terms.iter() {
        for (t2, c2) in other {
            add_term(&mut product, mul(t1, t2)?, c1.checked_mul(c2)?)?;
        }
    }

    let max = Limits::current().max_terms;
    if product.len() > max {
        return Err(Error::spanning(
            &[Expr::from_kind(ExprKind::Terms(other.clone())).infix()],
            LimitExceeded { limit: "terms", max },
        ));
    }
    trace!(from = terms.len(), by = other.len(), to = product.len(), "convolved sum");
    *terms = product;
    Ok(())
}

/// Expands `sum ** n` into the running sum.
fn expand<A: Algebra>(terms: &mut Pairs<A>, sum: &Expr<A>, n: usize) -> Result<(), Error> {
    let max = Limits::current().max_exponent;
    if n > max {
        return Err(Error::spanning(
            &[sum.infix(), format!("** {}", n)],
            LimitExceeded { limit: "exponent", max },
        ));
    }
    let Some(inner) = sum.as_terms() else {
        return Ok(());
    };
    trace!(exponent = n, "expanding `{}`", sum.infix());
    for _ in 0..n {
        convolve(terms, inner)?;
    }
    Ok(())
}

/// Normalizes a raw product.
pub(super) fn normalize<A: Algebra>(raw: &Pairs<A>) -> Result<Expr<A>, Error> {
    let one = scalar_one::<A>();
    let mut terms = Pairs::new();
    terms.insert(A::one(), one.clone());
    let mut factors = Pairs::new();

    let mut pending = raw.iter().rev().map(|(b, e)| (b.clone(), e.clone())).collect::<Vec<_>>();
    while let Some((mut base, mut exp)) = pending.pop() {
        if base.is_one() || exp.is_zero() {
            continue;
        }
        if let Some(resolved) = power(&base, &exp)? {
            base = resolved;
            exp = one.clone();
            if base.is_one() {
                continue;
            }
        }

        if base.is_zero() {
            match exp.as_number() {
                Some(n) if n.cmp0().is_gt() => return Ok(A::zero()),
                Some(_) => return Err(division_by_zero(&base, &exp)),
                None => {
                    add_pair(&mut factors, base, exp)?;
                    continue;
                },
            }
        }

        let integral = exp.as_integer().is_some();
        match base.kind() {
            // (c * t) ** n == c ** n * t ** n
            ExprKind::Terms(inner) if integral && inner.len() == 1 => {
                if let Some((t, c)) = inner.iter().next() {
                    rescale(&mut terms, &c.checked_pow(&exp)?)?;
                    pending.push((t.clone(), exp));
                }
            },
            ExprKind::Terms(_) => match positive_integer(&exp) {
                Some(n) => expand(&mut terms, &base, n)?,
                None => add_pair(&mut factors, base.clone(), exp)?,
            },
            ExprKind::Factors(inner) if integral => {
                for (b, e) in inner.iter().rev() {
                    pending.push((b.clone(), e.checked_mul(&exp)?));
                }
            },
            _ => add_pair(&mut factors, base.clone(), exp)?,
        }
    }

    // merged exponents may resolve now
    let mut product = Pairs::new();
    for (base, exp) in &factors {
        match power(base, exp)? {
            Some(resolved) => {
                if resolved.as_terms().is_some() {
                    expand(&mut terms, &resolved, 1)?;
                } else if let Some(scalar) = A::as_coefficient(&resolved) {
                    rescale(&mut terms, &scalar)?;
                } else if let Some(inner) = resolved.as_factors() {
                    for (b, e) in inner {
                        match (b.as_terms(), positive_integer(e)) {
                            (Some(_), Some(n)) => expand(&mut terms, b, n)?,
                            _ => add_pair(&mut product, b.clone(), e.clone())?,
                        }
                    }
                } else if !resolved.is_one() {
                    add_pair(&mut product, resolved, one.clone())?;
                }
            },
            None => match (base.as_terms(), positive_integer(exp)) {
                (Some(_), Some(n)) => expand(&mut terms, base, n)?,
                _ => add_pair(&mut product, base.clone(), exp.clone())?,
            },
        }
    }

    if product.is_empty() {
        return sums::normalize(&terms);
    }
    let single = match (product.len(), product.iter().next()) {
        (1, Some((base, exp))) if exp.is_one() => Some(base.clone()),
        _ => None,
    };
    let factor = match single {
        Some(base) => base,
        None => {
            A::check_pairs(PairsKind::Factors, &product)?;
            Expr::from_kind(ExprKind::Factors(product))
        },
    };

    if terms.len() == 1 && terms.get(&A::one()).map_or(false, Scalar::is_one) {
        return Ok(factor);
    }
    let mut distributed = Pairs::new();
    for (term, coef) in &terms {
        add_term(&mut distributed, mul(term, &factor)?, coef.clone())?;
    }
    sums::normalize(&distributed)
}

/// Raises the expression to a scalar power through the operator layer.
pub(super) fn pow_by<A: Algebra>(base: &Expr<A>, exp: A::Scalar) -> Result<Expr<A>, Error> {
    apply(BinOp::Pow, base.into(), Operand::Scalar(exp))
}

/// Multiplies the expression by a scalar through the operator layer.
pub(super) fn scale_by<A: Algebra>(expr: &Expr<A>, scalar: A::Scalar) -> Result<Expr<A>, Error> {
    apply(BinOp::Mul, expr.into(), Operand::Scalar(scalar))
}
