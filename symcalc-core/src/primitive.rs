//! Helpers to build the arbitrary-precision numbers used by literal atoms.

use rug::{ops::Pow, Integer, Rational};

/// Creates an [`Integer`] from a value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] from a value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Returns the value of the rational as an `i64`, if it is an integer that fits.
pub fn to_i64(n: &Rational) -> Option<i64> {
    if n.is_integer() {
        n.numer().to_i64()
    } else {
        None
    }
}

/// Returns the largest integer less than or equal to the rational.
pub fn floor(n: &Rational) -> Rational {
    n.clone().floor()
}

/// Raises the rational to an integer power. Returns [`None`] if the base is zero and the
/// exponent is negative, or if the exponent does not fit in an `i32`.
pub fn pow(base: &Rational, exp: i64) -> Option<Rational> {
    if exp < 0 && base.cmp0().is_eq() {
        return None;
    }
    let exp = i32::try_from(exp).ok()?;
    Some(base.clone().pow(exp))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn floor_of_negative_fraction() {
        assert_eq!(floor(&rational((-7, 2))), rational(-4));
        assert_eq!(floor(&rational((7, 2))), rational(3));
    }

    #[test]
    fn negative_powers() {
        assert_eq!(pow(&rational(2), -2), Some(rational((1, 4))));
        assert_eq!(pow(&rational((2, 3)), 3), Some(rational((8, 27))));
        assert_eq!(pow(&rational(0), -1), None);
    }

    #[test]
    fn integer_conversion() {
        assert_eq!(to_i64(&rational(12)), Some(12));
        assert_eq!(to_i64(&rational((1, 2))), None);
        assert_eq!(int(5), Integer::from(5));
    }
}
