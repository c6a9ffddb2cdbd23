use ariadne::Fmt;
use symcalc_attrs::ErrorKind;
use symcalc_error::EXPR;

/// The keys of one sum or product have different static shapes.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = "mismatch of shapes",
    labels = [format!("this has shape `{}`", left), format!("this has shape `{}`", right)],
    help = "arrays can only be added or multiplied elementwise if their shapes agree",
)]
pub struct ShapeMismatch {
    /// The first shape.
    pub left: String,

    /// The conflicting shape.
    pub right: String,
}

/// An address was computed with the wrong number of indices.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("incomplete index for {}-dimensional array", ndim),
    labels = [String::new(), format!("{} indices given", found)],
    help = format!("an address needs exactly {} indices", ndim.to_string().fg(EXPR)),
)]
pub struct IncompleteIndex {
    /// The number of dimensions of the shape.
    pub ndim: usize,

    /// The number of indices given.
    pub found: usize,
}

/// A sub-shape was requested with more indices than the shape has dimensions.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("too many indices for {}-dimensional array", ndim),
    labels = [String::new(), format!("{} indices given", found)],
)]
pub struct TooManyIndices {
    /// The number of dimensions of the shape.
    pub ndim: usize,

    /// The number of indices given.
    pub found: usize,
}

/// Explicit strides do not match the dimensions.
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("expected {} strides, found {}", expected, found),
    labels = ["these dimensions", "these strides"],
    help = "give one stride per dimension, or omit the strides to derive them from the layout",
)]
pub struct InvalidStrides {
    /// The number of dimensions.
    pub expected: usize,

    /// The number of strides given.
    pub found: usize,
}
