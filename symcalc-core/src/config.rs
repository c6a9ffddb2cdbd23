//! Resource limits of the normalizer.
//!
//! Normalizing recurses once per level of expression nesting, and expanding `(a + b) ** n`
//! performs `n` convolutions whose results grow combinatorially. The limits below bound both.
//! They are stored per thread; [`Limits::scope`] applies a set of limits while running a
//! closure.

use crate::error::LimitExceeded;
use std::cell::Cell;
use symcalc_error::Error;
use tracing::debug;

/// Bounds on the work the normalizer is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The maximum number of nested normalizer calls.
    pub max_depth: usize,

    /// The maximum number of terms produced by one polynomial expansion.
    pub max_terms: usize,

    /// The maximum positive integer exponent a sum is expanded to.
    pub max_exponent: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_terms: 10_000,
            max_exponent: 512,
        }
    }
}

thread_local! {
    static LIMITS: Cell<Limits> = Cell::new(Limits::default());
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

impl Limits {
    /// Wraps the given [`Limits`] into a builder for further customization.
    pub fn into_builder(self) -> LimitsBuilder {
        LimitsBuilder(self)
    }

    /// Returns the limits in effect on the current thread.
    pub fn current() -> Self {
        LIMITS.with(Cell::get)
    }

    /// Runs the closure with these limits in effect on the current thread, restoring the
    /// previous limits afterwards (also when the closure panics).
    pub fn scope<R>(self, f: impl FnOnce() -> R) -> R {
        struct Restore(Limits);

        impl Drop for Restore {
            fn drop(&mut self) {
                LIMITS.with(|limits| limits.set(self.0));
            }
        }

        let _restore = Restore(LIMITS.with(|limits| limits.replace(self)));
        f()
    }
}

/// Helper struct to build a [`Limits`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LimitsBuilder(Limits);

impl LimitsBuilder {
    /// Creates a new builder with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of nested normalizer calls.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the maximum number of terms of one expansion.
    pub fn max_terms(mut self, max_terms: usize) -> Self {
        self.0.max_terms = max_terms;
        self
    }

    /// Sets the maximum exponent a sum is expanded to.
    pub fn max_exponent(mut self, max_exponent: usize) -> Self {
        self.0.max_exponent = max_exponent;
        self
    }

    /// Builds the [`Limits`] struct.
    pub fn build(self) -> Limits {
        self.0
    }
}

/// Tracks one level of normalizer recursion. The level is released when the guard is dropped.
#[derive(Debug)]
pub(crate) struct DepthGuard(());

impl DepthGuard {
    /// Enters one level of recursion, failing if the depth limit is reached.
    pub(crate) fn enter(what: impl FnOnce() -> String) -> Result<Self, Error> {
        let max = Limits::current().max_depth;
        let depth = DEPTH.with(Cell::get);
        if depth >= max {
            let expr = what();
            debug!(depth, "normalizer depth limit reached at `{}`", expr);
            return Err(Error::spanning(&[expr], LimitExceeded { limit: "depth", max }));
        }
        DEPTH.with(|d| d.set(depth + 1));
        Ok(Self(()))
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let limits = LimitsBuilder::new().max_terms(10).build();
        assert_eq!(limits.max_terms, 10);
        assert_eq!(limits.max_depth, Limits::default().max_depth);
    }

    #[test]
    fn scope_restores_previous_limits() {
        let before = Limits::current();
        let inner = Limits::default().into_builder().max_depth(3).build();
        let seen = inner.scope(Limits::current);
        assert_eq!(seen.max_depth, 3);
        assert_eq!(Limits::current(), before);
    }

    #[test]
    fn depth_guard_releases_on_drop() {
        let limits = LimitsBuilder::new().max_depth(2).build();
        limits.scope(|| {
            let first = DepthGuard::enter(String::new).unwrap();
            let second = DepthGuard::enter(String::new).unwrap();
            assert!(DepthGuard::enter(|| "x".to_string()).is_err());
            drop(second);
            assert!(DepthGuard::enter(String::new).is_ok());
            drop(first);
        });
    }
}
