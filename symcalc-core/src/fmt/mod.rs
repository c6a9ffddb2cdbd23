//! Rendering of canonical expressions.
//!
//! Three targets are supported:
//!
//! - [`Target::Infix`], a source-like form such as `2 * a * b + a ** 2 + b ** 2`;
//! - [`Target::Constructor`], nested constructor calls such as
//!   `IntegerFactors({Integer("a"): Int(2)})`;
//! - [`Target::Tree`], an indented dump with one node per line.
//!
//! The target only changes the string, never the expression. The infix form of sums and
//! products is deterministic: fragments are sorted by their symbolic content, ignoring leading
//! signs, digits and operators, so `b + a` and `a + b` both render as `a + b`.

mod constructor;
mod infix;
mod tree;

use crate::{algebra::Algebra, error::UnknownTarget, expr::Expr};
use levenshtein::levenshtein;
use std::{fmt::{Display, Formatter}, str::FromStr};
use symcalc_error::Error;

/// The binding strength of a rendered expression. Sub-renderings with a lower precedence than
/// their context requires are parenthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precedence(pub u8);

impl Precedence {
    /// The precedence used by the tree target.
    pub const TREE: Self = Self(0);
    pub const ADD: Self = Self(40);
    pub const MUL: Self = Self(50);
    /// Unary minus, also used by negative literals.
    pub const UNARY: Self = Self(60);
    pub const EXP: Self = Self(70);
    pub const CALL: Self = Self(80);
    pub const ITEM: Self = Self(80);
    /// Fractions, such as `1/2`.
    pub const FRAC: Self = Self(82);
    pub const ATOM: Self = Self(100);
}

/// A value that can be rendered in every [`Target`].
pub trait Render {
    /// The precedence of the infix rendering.
    fn precedence(&self) -> Precedence;

    /// Renders the value in infix form.
    fn infix(&self) -> String;

    /// Renders the value as constructor calls.
    fn constructor(&self) -> String;

    /// Renders the value as an indented tree, starting at the given nesting level.
    fn tree(&self, level: usize, indent: usize) -> String;
}

/// The output target of the renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A source-like infix form. This is the default target.
    #[default]
    Infix,

    /// Nested constructor calls.
    Constructor,

    /// An indented tree.
    Tree,
}

impl Target {
    /// All targets with their names.
    const NAMES: [(&'static str, Target); 3] = [
        ("infix", Target::Infix),
        ("constructor", Target::Constructor),
        ("tree", Target::Tree),
    ];

    /// Utility function to create a new [`FormatOptions`] with the same formatting options as
    /// the given [`FormatOptions`], but with the target set to this value.
    pub fn inside(self, options: FormatOptions) -> FormatOptions {
        FormatOptions {
            target: self,
            ..options
        }
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, target)| *target)
            .ok_or_else(|| {
                let suggestions = Self::NAMES
                    .iter()
                    .filter(|(n, _)| levenshtein(n, &name) < 3)
                    .map(|(n, _)| *n)
                    .collect();
                Error::spanning(&[s], UnknownTarget { name: s.to_string(), suggestions })
            })
    }
}

/// Formatting options for expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// The output target.
    pub target: Target,

    /// The number of spaces each nesting level is indented by in the tree target.
    pub indent: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { target: Target::Infix, indent: 2 }
    }
}

impl FormatOptions {
    /// Wraps the given [`FormatOptions`] into a builder for further customization.
    pub fn into_builder(self) -> FormatOptionsBuilder {
        FormatOptionsBuilder(self)
    }
}

impl From<Target> for FormatOptions {
    fn from(target: Target) -> Self {
        target.inside(Self::default())
    }
}

/// Helper struct to build a [`FormatOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptionsBuilder(FormatOptions);

impl FormatOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output target. See [`Target`] for more information.
    pub fn target(mut self, target: Target) -> Self {
        self.0.target = target;
        self
    }

    /// Sets the indentation width of the tree target.
    pub fn indent(mut self, indent: usize) -> Self {
        self.0.indent = indent;
        self
    }

    /// Builds the [`FormatOptions`] struct.
    pub fn build(self) -> FormatOptions {
        self.0
    }
}

/// Formatter for a renderable value.
#[derive(Debug, Clone, Copy)]
pub struct ExprFormatter<'a, R: ?Sized> {
    /// The value to format.
    pub value: &'a R,

    /// The options to use when formatting.
    pub options: FormatOptions,
}

impl<R: Render + ?Sized> Display for ExprFormatter<'_, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.options.target {
            Target::Infix => f.write_str(&self.value.infix()),
            Target::Constructor => f.write_str(&self.value.constructor()),
            Target::Tree => f.write_str(&self.value.tree(0, self.options.indent)),
        }
    }
}

impl<A: Algebra> Expr<A> {
    /// Returns a formatter that renders the expression with the given options.
    pub fn fmt(&self, options: impl Into<FormatOptions>) -> ExprFormatter<'_, Self> {
        ExprFormatter { value: self, options: options.into() }
    }
}

impl<A: Algebra> Display for Expr<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.infix())
    }
}

/// Renders the expression in the named target (`"infix"`, `"constructor"` or `"tree"`).
pub fn render<A: Algebra>(expr: &Expr<A>, target: &str) -> Result<String, Error> {
    let target = target.parse::<Target>()?;
    Ok(expr.fmt(target).to_string())
}

/// Wraps the string in parentheses.
pub(crate) fn parens(s: &str) -> String {
    format!("({})", s)
}

#[cfg(test)]
mod tests {
    use crate::error::UnknownTarget;
    use crate::integers::{number, symbol};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_targets() {
        assert_eq!("infix".parse::<Target>().unwrap(), Target::Infix);
        assert_eq!(" Tree ".parse::<Target>().unwrap(), Target::Tree);
        assert_eq!("constructor".parse::<Target>().unwrap(), Target::Constructor);
    }

    #[test]
    fn unknown_target_suggests() {
        let err = "tre".parse::<Target>().unwrap_err();
        let kind = err.downcast_ref::<UnknownTarget>().unwrap();
        assert_eq!(kind.suggestions, vec!["tree"]);

        let err = "latex".parse::<Target>().unwrap_err();
        assert!(err.downcast_ref::<UnknownTarget>().unwrap().suggestions.is_empty());
        let report = strip_ansi_escapes::strip_str(err.report_to_string("target"));
        assert!(report.contains("unknown render target `latex`"));
    }

    #[test]
    fn render_by_name() {
        let e = &symbol("a") + 1;
        assert_eq!(render(&e, "infix").unwrap(), "1 + a");
        assert_eq!(
            render(&e, "constructor").unwrap(),
            r#"IntegerTerms({Int(1): Int(1), Integer("a"): Int(1)})"#,
        );
        assert!(render(&e, "latex").is_err());
    }

    #[test]
    fn options_builder() {
        let options = FormatOptionsBuilder::new()
            .target(Target::Tree)
            .indent(4)
            .build();
        assert_eq!(options, FormatOptions { target: Target::Tree, indent: 4 });
        assert_eq!(Target::Infix.inside(options).indent, 4);
        assert_eq!(number(3).fmt(options).to_string(), "Int: 3");
    }
}
