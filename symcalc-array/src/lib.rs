//! Symbolic arrays over the symbolic integers.
//!
//! An array atom is named and may carry a static [`Shape`]. Arrays are added, scaled by
//! symbolic integers and multiplied elementwise; every sum or product must agree on the shapes
//! of its shaped members. Indexing a shaped array with literal indices resolves the shape of
//! the selected part:
//!
//! ```
//! use symcalc_array::{describe, shaped, ShapeBuilder};
//! use symcalc_core::{integers::symbols, Index};
//!
//! let [n, m] = symbols(["n", "m"]);
//! let a = shaped("a", ShapeBuilder::new([n, m]).build().unwrap());
//! let row = a.index([Index::from(2)]).unwrap();
//! assert_eq!(describe(&row), "a $ Shape(dims=(m,), strides=(1,), offset=2 * n, item_size=1)");
//! ```

pub mod array;
pub mod error;
pub mod shape;

pub use array::{array, describe, shape_of, shaped, ArrayAtom, Arrays};
pub use shape::{make_shape, Layout, Shape, ShapeBuilder};
