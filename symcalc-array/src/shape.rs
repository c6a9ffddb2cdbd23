//! Static shapes of strided arrays.
//!
//! A [`Shape`] describes how an N-dimensional array is laid out in flat memory: the length of
//! each axis, the distance between neighbouring elements along each axis, the position of the
//! first element, and the size of one element. All of them are symbolic integers, so the
//! address of an element can be computed before the actual sizes are known:
//!
//! ```
//! use symcalc_array::ShapeBuilder;
//! use symcalc_core::integers::symbols;
//!
//! let [n, m, i, j] = symbols(["n", "m", "i", "j"]);
//! let shape = ShapeBuilder::new([n, m]).build().unwrap();
//! assert_eq!(shape.address([i, j]).unwrap().to_string(), "i * n + j");
//! ```

use crate::error::{IncompleteIndex, InvalidStrides, TooManyIndices};
use std::fmt::{self, Display, Formatter};
use symcalc_core::{
    integers::{number, Integers},
    Expr,
    Index,
    Scalar,
};
use symcalc_error::Error;
use tracing::trace;

/// The order in which default strides are derived from the dimensions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layout {
    /// The trailing axis has unit stride.
    #[default]
    Row,

    /// The leading axis has unit stride.
    Column,
}

/// The static shape of an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Shape {
    dims: Vec<Expr<Integers>>,
    strides: Vec<Expr<Integers>>,
    offset: Expr<Integers>,
    item_size: Expr<Integers>,
}

impl Shape {
    /// The length of each axis.
    pub fn dims(&self) -> &[Expr<Integers>] {
        &self.dims
    }

    /// The distance between neighbouring elements along each axis, in elements.
    pub fn strides(&self) -> &[Expr<Integers>] {
        &self.strides
    }

    /// The position of the first element.
    pub fn offset(&self) -> &Expr<Integers> {
        &self.offset
    }

    /// The size of one element.
    pub fn item_size(&self) -> &Expr<Integers> {
        &self.item_size
    }

    /// The number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Returns the shape of the sub-array selected by the indices.
    ///
    /// An index drops its axis and moves the offset to the selected position. A slice
    /// `start:stop:step` keeps its axis with length `ceil((stop - start) / step)` and stride
    /// `stride * step`, moving the offset to `start`. Missing parts of a slice default to the
    /// start of the axis, its length and a unit step. Axes without an index are kept as is.
    pub fn index(&self, indices: &[Index<Expr<Integers>>]) -> Result<Shape, Error> {
        if indices.len() > self.ndim() {
            return Err(Error::spanning(
                &[self.to_string(), render_indices(indices)],
                TooManyIndices { ndim: self.ndim(), found: indices.len() },
            ));
        }

        let mut dims = Vec::with_capacity(self.ndim());
        let mut strides = Vec::with_capacity(self.ndim());
        let mut offset = self.offset.clone();
        for (axis, (dim, stride)) in self.dims.iter().zip(&self.strides).enumerate() {
            match indices.get(axis) {
                None => {
                    dims.push(dim.clone());
                    strides.push(stride.clone());
                },
                Some(Index::At(at)) => {
                    offset = offset.checked_add(&self.item_size.checked_mul(at)?.checked_mul(stride)?)?;
                },
                Some(Index::Slice { start, stop, step }) => {
                    let start = start.clone().unwrap_or_else(|| number(0));
                    let stop = stop.clone().unwrap_or_else(|| dim.clone());
                    let step = step.clone().unwrap_or_else(|| number(1));

                    let span = stop.checked_sub(&start)?;
                    let len = if Scalar::is_one(&step) {
                        span
                    } else if step.as_number().map_or(false, |n| n.cmp0().is_lt()) {
                        // counting down, the span is negative too
                        span.checked_add(&step)?.checked_add(1)?.checked_floor_div(&step)?
                    } else {
                        span.checked_add(&step)?.checked_sub(1)?.checked_floor_div(&step)?
                    };
                    dims.push(len);
                    strides.push(stride.checked_mul(&step)?);
                    offset = offset.checked_add(&self.item_size.checked_mul(&start)?.checked_mul(stride)?)?;
                },
            }
        }

        trace!(from = self.ndim(), to = dims.len(), "narrowed shape");
        Ok(Shape { dims, strides, offset, item_size: self.item_size.clone() })
    }

    /// Returns the flat address of the element at the index,
    /// `offset + item_size * Σ index[k] * stride[k]`.
    pub fn address(&self, index: impl IntoIterator<Item = Expr<Integers>>) -> Result<Expr<Integers>, Error> {
        let index = index.into_iter().collect::<Vec<_>>();
        if index.len() != self.ndim() {
            let rendered = index.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            return Err(Error::spanning(
                &[self.to_string(), format!("({})", rendered)],
                IncompleteIndex { ndim: self.ndim(), found: index.len() },
            ));
        }

        let mut sum = number(0);
        for (k, stride) in index.iter().zip(&self.strides) {
            sum = sum.checked_add(&k.checked_mul(stride)?)?;
        }
        self.offset.checked_add(&self.item_size.checked_mul(&sum)?)
    }
}

fn render_indices(indices: &[Index<Expr<Integers>>]) -> String {
    use symcalc_core::Render;
    let rendered = indices.iter().map(Render::infix).collect::<Vec<_>>();
    format!("[{}]", rendered.join(", "))
}

/// Writes the expressions as a tuple, `(a, b)`, with a trailing comma for a single element.
fn write_tuple(f: &mut Formatter<'_>, items: &[Expr<Integers>]) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    if items.len() == 1 {
        write!(f, ",")?;
    }
    write!(f, ")")
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Shape(dims=")?;
        write_tuple(f, &self.dims)?;
        write!(f, ", strides=")?;
        write_tuple(f, &self.strides)?;
        write!(f, ", offset={}, item_size={})", self.offset, self.item_size)
    }
}

/// Helper struct to build a [`Shape`]. The strides default to those of [`Layout::Row`], the
/// offset to `0` and the item size to `1`.
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    dims: Vec<Expr<Integers>>,
    strides: Option<Vec<Expr<Integers>>>,
    offset: Expr<Integers>,
    item_size: Expr<Integers>,
    layout: Layout,
}

impl ShapeBuilder {
    /// Creates a new builder for a shape with the given dimensions.
    pub fn new(dims: impl IntoIterator<Item = Expr<Integers>>) -> Self {
        Self {
            dims: dims.into_iter().collect(),
            strides: None,
            offset: number(0),
            item_size: number(1),
            layout: Layout::Row,
        }
    }

    /// Sets explicit strides, one per dimension.
    pub fn strides(mut self, strides: impl IntoIterator<Item = Expr<Integers>>) -> Self {
        self.strides = Some(strides.into_iter().collect());
        self
    }

    /// Sets the offset of the first element.
    pub fn offset(mut self, offset: Expr<Integers>) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the size of one element.
    pub fn item_size(mut self, item_size: Expr<Integers>) -> Self {
        self.item_size = item_size;
        self
    }

    /// Sets the layout the default strides are derived from.
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Builds the [`Shape`] struct.
    pub fn build(self) -> Result<Shape, Error> {
        let strides = match self.strides {
            Some(strides) if strides.len() != self.dims.len() => {
                return Err(Error::spanning(
                    &[render_tuple(&self.dims), render_tuple(&strides)],
                    InvalidStrides { expected: self.dims.len(), found: strides.len() },
                ));
            },
            Some(strides) => strides,
            None => default_strides(&self.dims, self.layout)?,
        };
        Ok(Shape { dims: self.dims, strides, offset: self.offset, item_size: self.item_size })
    }
}

fn render_tuple(items: &[Expr<Integers>]) -> String {
    struct Tuple<'a>(&'a [Expr<Integers>]);

    impl Display for Tuple<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write_tuple(f, self.0)
        }
    }

    Tuple(items).to_string()
}

/// Derives strides from the dimensions.
///
/// The row layout starts from a unit stride for the trailing axis and prepends
/// `strides[0] * d` for each `d` of the leading dimensions, taken in reverse. The column layout
/// starts from a unit stride for the leading axis and appends `strides[last] * d` for each `d`
/// of the trailing dimensions.
fn default_strides(dims: &[Expr<Integers>], layout: Layout) -> Result<Vec<Expr<Integers>>, Error> {
    if dims.is_empty() {
        return Ok(Vec::new());
    }
    let mut strides = vec![number(1)];
    match layout {
        Layout::Row => {
            for dim in dims[..dims.len() - 1].iter().rev() {
                let next = strides[0].checked_mul(dim)?;
                strides.insert(0, next);
            }
        },
        Layout::Column => {
            for dim in &dims[1..] {
                let next = strides[strides.len() - 1].checked_mul(dim)?;
                strides.push(next);
            }
        },
    }
    Ok(strides)
}

/// Creates a shape. See [`ShapeBuilder`] for the defaults of the optional parameters.
pub fn make_shape(
    dims: impl IntoIterator<Item = Expr<Integers>>,
    strides: Option<Vec<Expr<Integers>>>,
    offset: Expr<Integers>,
    item_size: Expr<Integers>,
    layout: Layout,
) -> Result<Shape, Error> {
    let builder = ShapeBuilder::new(dims).offset(offset).item_size(item_size).layout(layout);
    let builder = match strides {
        Some(strides) => builder.strides(strides),
        None => builder,
    };
    builder.build()
}
