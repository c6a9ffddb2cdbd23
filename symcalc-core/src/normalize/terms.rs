use crate::{
    algebra::{Algebra, PairsKind, Scalar},
    expr::{Expr, ExprKind, Pairs},
};
use super::add_pair;
use symcalc_error::Error;

/// Adds a term to the map, folding it into the constant term if the algebra treats it as a
/// coefficient.
pub(super) fn add_term<A: Algebra>(terms: &mut Pairs<A>, term: Expr<A>, coef: A::Scalar) -> Result<(), Error> {
    if !term.is_one() {
        if let Some(n) = A::as_coefficient(&term) {
            return add_pair(terms, A::one(), n.checked_mul(&coef)?);
        }
    }
    add_pair(terms, term, coef)
}

/// Normalizes a raw sum.
pub(super) fn normalize<A: Algebra>(raw: &Pairs<A>) -> Result<Expr<A>, Error> {
    let mut terms = Pairs::new();
    for (term, coef) in raw {
        if term.is_zero() || coef.is_zero() {
            continue;
        }
        match term.as_terms() {
            Some(inner) => {
                for (t, c) in inner {
                    add_term(&mut terms, t.clone(), c.checked_mul(coef)?)?;
                }
            },
            None => add_term(&mut terms, term.clone(), coef.clone())?,
        }
    }
    collapse(terms)
}

/// Turns a merged map into an expression.
fn collapse<A: Algebra>(terms: Pairs<A>) -> Result<Expr<A>, Error> {
    let single = match (terms.len(), terms.iter().next()) {
        (0, _) => return Ok(A::zero()),
        (1, Some((term, coef))) => Some((term.clone(), coef.clone())),
        _ => None,
    };
    if let Some((term, coef)) = single {
        if A::IS_SCALAR_ALGEBRA && term.is_one() {
            if let Some(constant) = A::lift(&coef) {
                return Ok(constant);
            }
        }
        if coef.is_one() {
            return Ok(term);
        }
    }

    A::check_pairs(PairsKind::Terms, &terms)?;
    Ok(Expr::from_kind(ExprKind::Terms(terms)))
}
