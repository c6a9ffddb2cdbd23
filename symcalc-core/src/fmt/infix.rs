use crate::{
    algebra::{Algebra, AtomKind, Scalar},
    expr::{Expr, ExprKind, Index, Pairs},
};
use super::{constructor, parens, tree, Precedence, Render};

/// Marks a fragment that is added.
const PLUS: &str = " @+@ ";

/// Marks a fragment that is subtracted.
const MINUS: &str = " @-@ ";

/// Characters ignored at the start of fragments when sorting them.
const SORT_IGNORED: &str = "-+(*0123456789@ ";

/// The part of a fragment that fragments are sorted by.
fn sort_key(fragment: &str) -> &str {
    fragment.trim_start_matches(|c| SORT_IGNORED.contains(c))
}

/// Turns a leading minus sign of a fragment into a subtraction.
fn fix_sign(fragment: String) -> String {
    if let Some(rest) = fragment.strip_prefix("-1 * ") {
        format!(" - {}", rest)
    } else if let Some(rest) = fragment.strip_prefix('-') {
        format!(" - {}", rest)
    } else if let Some(rest) = fragment.strip_prefix(" + -") {
        format!(" - {}", rest)
    } else {
        fragment
    }
}

fn terms<A: Algebra>(terms: &Pairs<A>) -> String {
    if terms.is_empty() {
        return A::zero().infix();
    }

    let mut fragments = Vec::with_capacity(terms.len());
    for (term, coef) in terms {
        let (tprec, cprec) = (term.precedence(), coef.precedence());
        let (mut st, mut sc) = (term.infix(), coef.infix());
        if term.is_one() {
            if cprec < Precedence::ADD {
                sc = parens(&sc);
            }
            if cprec == Precedence::UNARY {
                fragments.push(sc);
            } else {
                fragments.push(format!("{}{}", PLUS, sc));
            }
        } else if coef.is_one() {
            if tprec < Precedence::ADD {
                st = parens(&st);
            }
            if tprec == Precedence::UNARY {
                fragments.push(st);
            } else {
                fragments.push(format!("{}{}", PLUS, st));
            }
        } else if coef.is_minus_one() {
            if tprec < Precedence::ADD {
                st = parens(&st);
            }
            fragments.push(format!("{}{}", MINUS, st));
        } else {
            if cprec < Precedence::MUL {
                sc = parens(&sc);
            }
            if tprec < Precedence::MUL {
                st = parens(&st);
            }
            if cprec == Precedence::UNARY {
                fragments.push(format!("{} * {}", sc, st));
            } else {
                fragments.push(format!("{}{} * {}", PLUS, sc, st));
            }
        }
    }

    // stable, so fragments with the same key keep the order of the map
    fragments.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));
    let joined = fragments.into_iter().map(fix_sign).collect::<String>();
    let joined = if let Some(rest) = joined.strip_prefix(PLUS) {
        rest.to_string()
    } else if let Some(rest) = joined.strip_prefix(MINUS) {
        format!("-{}", rest)
    } else if let Some(rest) = joined.strip_prefix(" - ") {
        format!("-{}", rest)
    } else {
        joined
    };
    joined
        .replace(" @+@ -", MINUS)
        .replace(PLUS, " + ")
        .replace(MINUS, " - ")
}

/// Renders a base and its exponent, without the leading multiplication sign.
fn power<A: Algebra>(base: &Expr<A>, exp: &A::Scalar) -> String {
    let bprec = base.precedence();
    let mut sb = base.infix();
    if exp.is_one() {
        if bprec <= Precedence::MUL {
            sb = parens(&sb);
        }
        return sb;
    }
    if bprec == Precedence::FRAC || bprec <= Precedence::EXP {
        sb = parens(&sb);
    }
    let mut se = exp.infix();
    if exp.precedence() <= Precedence::EXP {
        se = parens(&se);
    }
    format!("{} ** {}", sb, se)
}

fn factors<A: Algebra>(factors: &Pairs<A>) -> String {
    if factors.is_empty() {
        return A::one().infix();
    }

    if let (1, Some((base, exp))) = (factors.len(), factors.iter().next()) {
        if exp.is_one() {
            return base.infix();
        }
        return power(base, exp);
    }

    let mut fragments = factors
        .iter()
        .map(|(base, exp)| format!(" * {}", power(base, exp)))
        .collect::<Vec<_>>();
    fragments.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));
    let joined = fragments.concat();
    match joined.strip_prefix(" * ") {
        Some(rest) => rest.to_string(),
        None => joined,
    }
}

fn call<A: Algebra>(func: &Expr<A>, args: &[Expr<A>]) -> String {
    let mut sf = func.infix();
    if func.precedence() < Precedence::CALL {
        sf = parens(&sf);
    }
    let args = args.iter().map(Render::infix).collect::<Vec<_>>();
    format!("{}({})", sf, args.join(", "))
}

fn item<A: Algebra>(obj: &Expr<A>, indices: &[Index<A::Scalar>]) -> String {
    let mut so = obj.infix();
    if obj.precedence() < Precedence::ITEM {
        so = parens(&so);
    }
    let indices = indices.iter().map(Render::infix).collect::<Vec<_>>();
    format!("{}[{}]", so, indices.join(", "))
}

impl<S: Render> Render for Index<S> {
    fn precedence(&self) -> Precedence {
        match self {
            Self::At(at) => at.precedence(),
            Self::Slice { .. } => Precedence::ATOM,
        }
    }

    fn infix(&self) -> String {
        match self {
            Self::At(at) => at.infix(),
            Self::Slice { start, stop, step } => {
                let part = |s: &Option<S>| s.as_ref().map(Render::infix).unwrap_or_default();
                match step {
                    Some(step) => format!("{}:{}:{}", part(start), part(stop), step.infix()),
                    None => format!("{}:{}", part(start), part(stop)),
                }
            },
        }
    }

    fn constructor(&self) -> String {
        match self {
            Self::At(at) => format!("Index({})", at.constructor()),
            Self::Slice { start, stop, step } => {
                let part = |s: &Option<S>| {
                    s.as_ref().map(Render::constructor).unwrap_or_else(|| "None".to_string())
                };
                format!("Slice({}, {}, {})", part(start), part(stop), part(step))
            },
        }
    }

    fn tree(&self, level: usize, indent: usize) -> String {
        tree::index(self, level, indent)
    }
}

impl<A: Algebra> Render for Expr<A> {
    fn precedence(&self) -> Precedence {
        match self.kind() {
            ExprKind::Atom(atom) => atom.precedence(),
            ExprKind::Terms(terms) => match (terms.len(), terms.iter().next()) {
                (0, _) => Precedence::ATOM,
                (1, Some((term, coef))) => {
                    if term.is_one() {
                        coef.precedence()
                    } else {
                        Precedence::MUL
                    }
                },
                _ => Precedence::ADD,
            },
            ExprKind::Factors(factors) => match (factors.len(), factors.iter().next()) {
                (0, _) => Precedence::ATOM,
                (1, Some((base, exp))) => {
                    if exp.is_one() {
                        base.precedence()
                    } else {
                        Precedence::EXP
                    }
                },
                _ => Precedence::MUL,
            },
            ExprKind::Composite(..) | ExprKind::FloorDiv(..) => Precedence::CALL,
            ExprKind::Component(..) => Precedence::ITEM,
            ExprKind::Function(_) => Precedence::ATOM,
        }
    }

    fn infix(&self) -> String {
        match self.kind() {
            ExprKind::Atom(atom) => atom.infix(),
            ExprKind::Terms(pairs) => terms(pairs),
            ExprKind::Factors(pairs) => factors(pairs),
            ExprKind::Composite(func, args) => call(func, args),
            ExprKind::Component(obj, indices) => item(obj, indices),
            ExprKind::FloorDiv(numer, denom) => format!("floor({}, {})", numer.infix(), denom.infix()),
            ExprKind::Function(function) => function.name().to_string(),
        }
    }

    fn constructor(&self) -> String {
        constructor::expr(self)
    }

    fn tree(&self, level: usize, indent: usize) -> String {
        tree::expr(self, level, indent)
    }
}

#[cfg(test)]
mod tests {
    use crate::integers::{number, rational, symbol, symbols};
    use crate::expr::Index;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn sort_key_strips_signs_and_coefficients() {
        assert_eq!(sort_key(" @+@ 2 * a * b"), "a * b");
        assert_eq!(sort_key(" @-@ (a + b)"), "a + b)");
        assert_eq!(sort_key(" * 3"), "");
    }

    #[test]
    fn fix_sign_variants() {
        assert_eq!(fix_sign("-1 * a".to_string()), " - a");
        assert_eq!(fix_sign("-2 * a".to_string()), " - 2 * a");
        assert_eq!(fix_sign(" + -a".to_string()), " - a");
        assert_eq!(fix_sign(" @+@ a".to_string()), " @+@ a");
    }

    #[test]
    fn sums() {
        let [a, b, c] = symbols(["a", "b", "c"]);
        assert_eq!((&a + 1).to_string(), "1 + a");
        assert_eq!((&b + &a).to_string(), "a + b");
        assert_eq!((&(&a + &b) - 2).to_string(), "-2 + a + b");
        assert_eq!((-&a - &b).to_string(), "-a - b");
        assert_eq!((&(&a + &b) - &(&c * 2)).to_string(), "a + b - 2 * c");
        assert_eq!((2 - &a).to_string(), "2 - a");
        assert_eq!((-(&a * &b)).to_string(), "-a * b");
    }

    #[test]
    fn products() {
        let [a, b] = symbols(["a", "b"]);
        assert_eq!((&a * &b).to_string(), "a * b");
        assert_eq!((&a / &b).to_string(), "a * b ** (-1)");
        assert_eq!((&b / &a).to_string(), "a ** (-1) * b");
        assert_eq!((&a / 2).to_string(), "1/2 * a");
        assert_eq!((&a * &b).pow(rational(1, 2)).to_string(), "(a * b) ** 1/2");
        assert_eq!(number(2).pow(&(&a * 2)).to_string(), "2 ** (2 * a)");
        let s = &a + &b;
        assert_eq!(s.pow(&s).to_string(), "(a + b) ** (a + b)");
    }

    #[test]
    fn negative_and_fractional_literals() {
        assert_eq!(number(-3).to_string(), "-3");
        assert_eq!(number(-3).precedence(), Precedence::UNARY);
        assert_eq!(rational(2, 3).to_string(), "2/3");
        assert_eq!(rational(2, 3).precedence(), Precedence::FRAC);
        assert_eq!(rational(4, 2).to_string(), "2");
    }

    #[test]
    fn calls_and_items() {
        let [f, x, y, i, n] = symbols(["f", "x", "y", "i", "n"]);
        assert_eq!(f.call([x.clone(), y.clone()]).unwrap().to_string(), "f(x, y)");
        let slice = Index::slice(Some(number(1)), Some(n.clone()), Some(number(2)));
        assert_eq!(
            x.index([Index::At(i.clone()), slice]).unwrap().to_string(),
            "x[i, 1:n:2]",
        );
        let open = Index::slice(None, Some(n.clone()), None);
        assert_eq!(x.index([open]).unwrap().to_string(), "x[:n]");
        let all = Index::slice(None, None, None);
        assert_eq!(x.index([all]).unwrap().to_string(), "x[:]");
        let from = Index::slice(Some(number(1)), None, None);
        assert_eq!(x.index([from]).unwrap().to_string(), "x[1:]");
        let stepped = Index::slice(None, None, Some(number(2)));
        assert_eq!(x.index([stepped]).unwrap().to_string(), "x[::2]");
        assert_eq!(x.index([Index::At(number(1))]).unwrap().to_string(), "x[1]");
        assert_eq!(x.floor_div(&y).to_string(), "floor(x, y)");
    }
}
