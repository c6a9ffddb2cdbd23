//! The kinds of errors the operator layer, the normalizer and the renderer report.

use ariadne::Fmt;
use symcalc_attrs::ErrorKind;
use symcalc_error::EXPR;

/// No forward or reflected rule exists for the given operand combination.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("unsupported operation: `{}` {} `{}`", left, op, right),
    labels = [
        format!("this operand has type `{}`", left_type),
        "this operator".to_string(),
        format!("this operand has type `{}`", right_type),
    ],
    help = format!("neither operand knows how to apply `{}` to the other", op.fg(EXPR)),
)]
pub struct UnsupportedOperation {
    /// The operator symbol.
    pub op: &'static str,

    /// The rendered left operand.
    pub left: String,

    /// The type of the left operand.
    pub left_type: &'static str,

    /// The rendered right operand.
    pub right: String,

    /// The type of the right operand.
    pub right_type: &'static str,
}

/// A variant combination has no reduction rule.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("no normalization rule for {} over {}", operation, operand),
    labels = ["this expression"],
    help = "the rule table of the normalizer needs to be extended for this combination",
)]
pub struct UnimplementedNormalization {
    /// The operation being normalized, such as `Composite`.
    pub operation: &'static str,

    /// The variant of the operand that has no rule.
    pub operand: &'static str,
}

/// A literal zero was used as a divisor.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("division by zero in `{}`", expr),
    labels = ["", "this divides by zero"],
)]
pub struct DivisionByZero {
    /// The rendered expression.
    pub expr: String,
}

/// A resource limit of the normalizer was exceeded.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("{} limit of {} exceeded", limit, max),
    labels = ["while normalizing this expression"],
    help = format!("raise the limit with `{}`", "Limits::scope".fg(EXPR)),
)]
pub struct LimitExceeded {
    /// The limit that was exceeded.
    pub limit: &'static str,

    /// The value of the limit.
    pub max: usize,
}

/// The name of a render target was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("unknown render target `{}`", name),
    labels = ["this target"],
    help = if suggestions.is_empty() {
        "the supported targets are `infix`, `constructor` and `tree`".to_string()
    } else {
        format!("did you mean: {}", suggestions.iter().map(|s| format!("`{}`", s.fg(EXPR))).collect::<Vec<_>>().join(", "))
    },
)]
pub struct UnknownTarget {
    /// The name that was given.
    pub name: String,

    /// Known targets with a similar name.
    pub suggestions: Vec<&'static str>,
}
