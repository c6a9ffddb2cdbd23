//! The normalizer, which rewrites a raw node into canonical form.
//!
//! Every operator builds a raw node and passes it to [`normalize`]. The node is dispatched by
//! its variant to one of the rule tables in the submodules, each of which returns a canonical
//! expression. Rules recurse through the operator layer, so the nesting depth is tracked with a
//! [`DepthGuard`] and bounded by [`Limits::max_depth`](crate::config::Limits::max_depth).

mod component;
mod composite;
mod factors;
mod floor_div;
mod terms;

use crate::{
    algebra::{Algebra, Scalar},
    config::DepthGuard,
    error::UnimplementedNormalization,
    expr::{Expr, ExprKind, Pairs},
    fmt::Render,
};
use rug::Rational;
use std::collections::btree_map::Entry;
use symcalc_error::Error;

/// Normalizes a raw node.
///
/// # Panics
///
/// Panics if a rule produces a node that is not canonical. This is a bug in the rule tables or
/// in a hook of the algebra, never a property of the input.
pub(crate) fn normalize<A: Algebra>(kind: ExprKind<A>) -> Result<Expr<A>, Error> {
    let raw = Expr::from_kind(kind);
    let _guard = DepthGuard::enter(|| raw.infix())?;
    let result = match raw.kind() {
        ExprKind::Atom(_) | ExprKind::Function(_) => raw.clone(),
        ExprKind::Terms(pairs) => terms::normalize(pairs)?,
        ExprKind::Factors(pairs) => factors::normalize(pairs)?,
        ExprKind::Composite(func, args) => composite::normalize(&raw, func, args)?,
        ExprKind::Component(obj, indices) => component::normalize(&raw, obj, indices)?,
        ExprKind::FloorDiv(numer, denom) => floor_div::normalize(&raw, numer, denom)?,
    };
    assert!(
        result.is_canonical_node(),
        "normalizing `{}` produced a non-canonical {} node: {}",
        raw.infix(),
        result.kind().name(),
        result.constructor(),
    );
    Ok(result)
}

/// Adds the value to the entry of the key, removing the entry if the sum is zero. Zero values
/// are not inserted.
pub(crate) fn add_pair<A: Algebra>(pairs: &mut Pairs<A>, key: Expr<A>, value: A::Scalar) -> Result<(), Error> {
    if value.is_zero() {
        return Ok(());
    }
    match pairs.entry(key) {
        Entry::Vacant(entry) => {
            entry.insert(value);
        },
        Entry::Occupied(mut entry) => {
            let sum = entry.get().checked_add(&value)?;
            if sum.is_zero() {
                entry.remove();
            } else {
                *entry.get_mut() = sum;
            }
        },
    }
    Ok(())
}

/// Builds a raw map from the pairs, merging colliding keys with [`add_pair`].
pub(crate) fn pairs<A: Algebra>(
    iter: impl IntoIterator<Item = (Expr<A>, A::Scalar)>,
) -> Result<Pairs<A>, Error> {
    let mut pairs = Pairs::new();
    for (key, value) in iter {
        add_pair(&mut pairs, key, value)?;
    }
    Ok(pairs)
}

/// The scalar one.
pub(crate) fn scalar_one<A: Algebra>() -> A::Scalar {
    A::Scalar::from_number(Rational::from(1))
}

/// Fails with [`UnimplementedNormalization`] for the raw node.
fn unimplemented<A: Algebra>(raw: &Expr<A>, operand: &Expr<A>) -> Error {
    Error::spanning(
        &[raw.infix()],
        UnimplementedNormalization { operation: raw.kind().name(), operand: operand.kind().name() },
    )
}

#[cfg(test)]
mod tests {
    use crate::integers::{number, rational, symbols, Integers};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use super::*;

    fn renormalize(expr: &Expr<Integers>) -> Expr<Integers> {
        match expr.kind() {
            ExprKind::Terms(pairs) => normalize(ExprKind::Terms(pairs.clone())).unwrap(),
            ExprKind::Factors(pairs) => normalize(ExprKind::Factors(pairs.clone())).unwrap(),
            _ => expr.clone(),
        }
    }

    #[test]
    fn add_pair_merges_and_removes() {
        let [a, b] = symbols(["a", "b"]);
        let mut map = Pairs::<Integers>::new();
        add_pair(&mut map, a.clone(), number(2)).unwrap();
        add_pair(&mut map, b.clone(), number(0)).unwrap();
        assert_eq!(map.len(), 1);
        add_pair(&mut map, a.clone(), number(3)).unwrap();
        assert_eq!(map[&a], number(5));
        add_pair(&mut map, a.clone(), number(-5)).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn raw_terms_are_flattened() {
        let [a, b] = symbols(["a", "b"]);
        let inner = &a + &b;
        let raw = pairs([(inner, number(2)), (a.clone(), number(-2))]).unwrap();
        assert_eq!(normalize(ExprKind::Terms(raw)).unwrap(), 2 * &b);
    }

    #[test]
    fn literal_keys_fold_into_the_constant() {
        let [a] = symbols(["a"]);
        let raw = pairs([(number(3), number(2)), (a.clone(), number(1)), (Integers::one(), number(1))]).unwrap();
        assert_eq!(normalize(ExprKind::Terms(raw)).unwrap().to_string(), "7 + a");
    }

    #[test]
    fn factors_fold_literals() {
        let raw = pairs([(number(2), number(3)), (number(4), rational(1, 2))]).unwrap();
        // 4 ** 1/2 stays symbolic
        assert_eq!(normalize(ExprKind::Factors(raw)).unwrap().to_string(), "8 * 4 ** 1/2");
    }

    #[test]
    fn depth_limit() {
        use crate::config::LimitsBuilder;
        use crate::error::LimitExceeded;

        let [a, b] = symbols(["a", "b"]);
        let limits = LimitsBuilder::new().max_depth(1).build();
        let err = limits.scope(|| (&a + &b).checked_pow(2)).unwrap_err();
        assert_eq!(err.downcast_ref::<LimitExceeded>().unwrap().limit, "depth");
    }

    #[test]
    fn terms_limit() {
        use crate::config::LimitsBuilder;
        use crate::error::LimitExceeded;

        let [a, b, c] = symbols(["a", "b", "c"]);
        let sum = &(&a + &b) + &c;
        let limits = LimitsBuilder::new().max_terms(10).build();
        let err = limits.scope(|| sum.checked_pow(6)).unwrap_err();
        assert_eq!(err.downcast_ref::<LimitExceeded>(), Some(&LimitExceeded { limit: "terms", max: 10 }));

        // ten terms fit exactly
        let cube = limits.scope(|| sum.checked_pow(3)).unwrap();
        assert_eq!(cube.as_terms().map(|terms| terms.len()), Some(10));
    }

    #[test]
    fn exponent_limit() {
        use crate::config::LimitsBuilder;
        use crate::error::LimitExceeded;

        let [a, b] = symbols(["a", "b"]);
        let sum = &a + &b;
        let limits = LimitsBuilder::new().max_exponent(4).build();
        let err = limits.scope(|| sum.checked_pow(9)).unwrap_err();
        assert_eq!(err.downcast_ref::<LimitExceeded>(), Some(&LimitExceeded { limit: "exponent", max: 4 }));
        assert_eq!(err.source, "a + b ** 9");

        let fourth = limits.scope(|| sum.checked_pow(4)).unwrap();
        assert_eq!(fourth.as_terms().map(|terms| terms.len()), Some(5));
    }

    fn arb_expr() -> impl Strategy<Value = Expr<Integers>> {
        let leaf = prop_oneof![
            (-4i64..5).prop_map(number),
            prop::sample::select(vec!["a", "b", "c"]).prop_map(|name| crate::integers::symbol(name)),
        ];
        leaf.prop_recursive(3, 16, 2, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(x, y)| &x + &y),
                (inner.clone(), inner.clone()).prop_map(|(x, y)| &x - &y),
                (inner.clone(), inner.clone()).prop_map(|(x, y)| &x * &y),
                (inner, 0i64..3).prop_map(|(x, n)| x.pow(n)),
            ]
        })
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(expr in arb_expr()) {
            prop_assert_eq!(renormalize(&expr), expr);
        }

        #[test]
        fn addition_commutes(x in arb_expr(), y in arb_expr()) {
            prop_assert_eq!(&x + &y, &y + &x);
        }

        #[test]
        fn multiplication_commutes(x in arb_expr(), y in arb_expr()) {
            prop_assert_eq!(&x * &y, &y * &x);
        }
    }
}
