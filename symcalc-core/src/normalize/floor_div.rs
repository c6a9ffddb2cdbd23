use crate::{
    algebra::{Algebra, Scalar},
    error::DivisionByZero,
    expr::Expr,
    fmt::Render,
    primitive,
};
use rug::Rational;
use symcalc_error::Error;

/// Normalizes `floor(numer, denom)`.
pub(super) fn normalize<A: Algebra>(raw: &Expr<A>, numer: &Expr<A>, denom: &Expr<A>) -> Result<Expr<A>, Error> {
    if denom.as_number().map_or(false, |d| d.cmp0().is_eq()) {
        return Err(Error::spanning(
            &[numer.infix(), format!("// {}", denom.infix())],
            DivisionByZero { expr: raw.infix() },
        ));
    }
    if numer == denom {
        return Ok(A::one());
    }
    if numer.is_zero() || denom.is_one() || A::lower(denom).map_or(false, |d| d.is_one()) {
        return Ok(numer.clone());
    }
    if *numer == denom.checked_neg()? {
        return A::one().checked_neg();
    }
    if let (Some(n), Some(d)) = (numer.as_number(), denom.as_number()) {
        if let Some(quotient) = A::number(&primitive::floor(&Rational::from(n / d))) {
            return Ok(quotient);
        }
    }
    Ok(raw.clone())
}

#[cfg(test)]
mod tests {
    use crate::error::DivisionByZero;
    use crate::integers::{number, rational, symbols};
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_quotients() {
        assert_eq!(number(7).floor_div(2), number(3));
        assert_eq!(number(-7).floor_div(2), number(-4));
        assert_eq!(rational(7, 2).floor_div(rational(1, 2)), number(7));
    }

    #[test]
    fn terminal_rules() {
        let [a, b] = symbols(["a", "b"]);
        assert_eq!(a.floor_div(&a), number(1));
        assert_eq!(number(0).floor_div(&a), number(0));
        assert_eq!(a.floor_div(1), a);
        assert_eq!(a.floor_div(-&a), number(-1));
        assert_eq!(a.floor_div(&b).to_string(), "floor(a, b)");
        assert_eq!((2 * &a).floor_div(&a).to_string(), "floor(2 * a, a)");
    }

    #[test]
    fn literal_zero_denominator() {
        let [a] = symbols(["a"]);
        let err = a.checked_floor_div(0).unwrap_err();
        assert_eq!(err.downcast_ref::<DivisionByZero>().unwrap().expr, "floor(a, 0)");
    }
}
