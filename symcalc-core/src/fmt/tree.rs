use crate::{
    algebra::{Algebra, AtomKind},
    expr::{Expr, ExprKind, Index},
};
use super::Render;

fn pad(level: usize, indent: usize) -> String {
    " ".repeat(level * indent)
}

/// Renders the index as an indented tree.
pub(super) fn index<S: Render>(index: &Index<S>, level: usize, indent: usize) -> String {
    let tab = pad(level, indent);
    match index {
        Index::At(at) => format!("{}Index:\n{}", tab, at.tree(level + 1, indent)),
        Index::Slice { start, stop, step } => {
            let mut lines = vec![format!("{}Slice:", tab)];
            for part in [start, stop, step] {
                match part {
                    Some(part) => lines.push(part.tree(level + 1, indent)),
                    None => lines.push(format!("{}None", pad(level + 1, indent))),
                }
            }
            lines.join("\n")
        },
    }
}

/// Renders the expression as an indented tree, one node per line.
pub(super) fn expr<A: Algebra>(expr: &Expr<A>, level: usize, indent: usize) -> String {
    let tab = pad(level, indent);
    let mut lines = Vec::new();
    match expr.kind() {
        ExprKind::Atom(atom) => lines.push(format!("{}{}: {}", tab, atom.kind_name(), atom.infix())),
        ExprKind::Terms(pairs) | ExprKind::Factors(pairs) => {
            lines.push(format!("{}{}{}:", tab, A::NAME, expr.kind().name()));
            for (key, value) in pairs {
                lines.push(key.tree(level + 1, indent));
                lines.push(value.tree(level + 1, indent));
            }
        },
        ExprKind::Composite(func, args) => {
            lines.push(format!("{}{}Composite:", tab, A::NAME));
            lines.push(func.tree(level + 1, indent));
            lines.push(format!("{}Arguments:", pad(level + 1, indent)));
            lines.extend(args.iter().map(|arg| arg.tree(level + 2, indent)));
        },
        ExprKind::Component(obj, indices) => {
            lines.push(format!("{}{}Component:", tab, A::NAME));
            lines.push(obj.tree(level + 1, indent));
            lines.push(format!("{}Indices:", pad(level + 1, indent)));
            lines.extend(indices.iter().map(|index| index.tree(level + 2, indent)));
        },
        ExprKind::FloorDiv(numer, denom) => {
            lines.push(format!("{}{}FloorDiv:", tab, A::NAME));
            lines.push(numer.tree(level + 1, indent));
            lines.push(denom.tree(level + 1, indent));
        },
        ExprKind::Function(function) => {
            lines.push(format!("{}{}Function: {}", tab, A::NAME, function.name()));
        },
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use crate::expr::Index;
    use crate::fmt::{FormatOptionsBuilder, Target};
    use crate::integers::{number, symbols};
    use pretty_assertions::assert_eq;

    #[test]
    fn sum_tree() {
        let [a, b] = symbols(["a", "b"]);
        let e = &(&a * 2) + &b;
        let expected = "\
IntegerTerms:
  Integer: a
  Int: 2
  Integer: b
  Int: 1";
        assert_eq!(e.fmt(Target::Tree).to_string(), expected);
    }

    #[test]
    fn nested_tree_with_custom_indent() {
        let [f, x] = symbols(["f", "x"]);
        let e = f.call([x.pow(2)]).unwrap();
        let options = FormatOptionsBuilder::new().target(Target::Tree).indent(4).build();
        let expected = "\
IntegerComposite:
    Integer: f
    Arguments:
        IntegerFactors:
            Integer: x
            Int: 2";
        assert_eq!(e.fmt(options).to_string(), expected);
    }

    #[test]
    fn component_tree() {
        let [x, n] = symbols(["x", "n"]);
        let e = x.index([Index::slice(Some(number(1)), Some(n), None)]).unwrap();
        let expected = "\
IntegerComponent:
  Integer: x
  Indices:
    Slice:
      Int: 1
      Integer: n
      None";
        assert_eq!(e.fmt(Target::Tree).to_string(), expected);
    }
}
