use crate::{
    algebra::{Algebra, AtomKind},
    expr::{Expr, ExprKind, Pairs},
};
use super::Render;

fn pairs<A: Algebra>(variant: &str, pairs: &Pairs<A>) -> String {
    let entries = pairs
        .iter()
        .map(|(key, value)| format!("{}: {}", key.constructor(), value.constructor()))
        .collect::<Vec<_>>();
    format!("{}{}({{{}}})", A::NAME, variant, entries.join(", "))
}

fn list<R: Render>(items: &[R]) -> String {
    let items = items.iter().map(Render::constructor).collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

/// Renders the expression as nested constructor calls.
pub(super) fn expr<A: Algebra>(expr: &Expr<A>) -> String {
    match expr.kind() {
        ExprKind::Atom(atom) => atom.constructor(),
        ExprKind::Terms(terms) => pairs("Terms", terms),
        ExprKind::Factors(factors) => pairs("Factors", factors),
        ExprKind::Composite(func, args) => {
            format!("{}Composite({}, {})", A::NAME, func.constructor(), list(args))
        },
        ExprKind::Component(obj, indices) => {
            format!("{}Component({}, {})", A::NAME, obj.constructor(), list(indices))
        },
        ExprKind::FloorDiv(numer, denom) => {
            format!("{}FloorDiv({}, {})", A::NAME, numer.constructor(), denom.constructor())
        },
        ExprKind::Function(function) => format!("{}Function({:?})", A::NAME, function.name()),
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::{Expr, Index};
    use crate::integers::{number, symbol, Integers};
    use pretty_assertions::assert_eq;
    use super::super::Render;

    #[test]
    fn atoms() {
        assert_eq!(number(2).constructor(), "Int(2)");
        assert_eq!(symbol("a").constructor(), r#"Integer("a")"#);
    }

    #[test]
    fn pairs() {
        let a = symbol("a");
        assert_eq!(
            (&a * &a).constructor(),
            r#"IntegerFactors({Integer("a"): Int(2)})"#,
        );
        assert_eq!(
            (&a * 3).constructor(),
            r#"IntegerTerms({Integer("a"): Int(3)})"#,
        );
    }

    #[test]
    fn deferred_nodes() {
        let (f, x) = (symbol("f"), symbol("x"));
        assert_eq!(
            f.call([x.clone(), number(1)]).unwrap().constructor(),
            r#"IntegerComposite(Integer("f"), [Integer("x"), Int(1)])"#,
        );
        assert_eq!(
            x.index([Index::from(1), Index::slice(None, Some(number(3)), None)]).unwrap().constructor(),
            r#"IntegerComponent(Integer("x"), [Index(Int(1)), Slice(None, Int(3), None)])"#,
        );
        assert_eq!(
            x.floor_div(&f).constructor(),
            r#"IntegerFloorDiv(Integer("x"), Integer("f"))"#,
        );
        let g = Expr::<Integers>::function("g", |_| None);
        assert_eq!(g.constructor(), r#"IntegerFunction("g")"#);
    }
}
