//! A canonicalization engine for symbolic algebras.
//!
//! Expressions are built from atoms with ordinary operators. Every operator normalizes its
//! result before returning it, so equal expressions always have equal canonical forms:
//!
//! ```
//! use symcalc_core::integers::symbols;
//!
//! let [a, b, c] = symbols(["a", "b", "c"]);
//! assert_eq!(&(&a + &b) + &c, &(&c + &a) + &b);
//! assert_eq!((&(&a + &b) * &c).to_string(), "a * c + b * c");
//! ```
//!
//! The engine is generic over the [`Algebra`] the expressions belong to. This crate provides
//! the symbolic [`integers`]; other algebras plug in their own atoms, scalars and hooks.

pub mod algebra;
pub mod config;
pub mod error;
pub mod expr;
pub mod fmt;
pub mod integers;
mod normalize;
pub mod ops;
pub mod primitive;

pub use algebra::{Algebra, AtomKind, PairsKind, Scalar};
pub use config::{Limits, LimitsBuilder};
pub use expr::{Expr, ExprKind, Function, Index, Pairs};
pub use fmt::{render, FormatOptions, FormatOptionsBuilder, Precedence, Render, Target};
pub use ops::{BinOp, Operand};
