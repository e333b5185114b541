//! Shared test utilities for the worldmap-markers workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Country observation fixtures and a builder for observation lists
//! - Panel configurations with a small, readable palette
//! - Generators for larger synthetic observation sets
//! - Approximate float assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, DataBuilder};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting that a marker radius matches, within float noise.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_radius_eq;
///
/// assert_radius_eq!(marker.radius, 6.0);
/// ```
#[macro_export]
macro_rules! assert_radius_eq {
    ($radius:expr, $expected:expr) => {{
        $crate::assert_approx_eq!($radius, $expected, 1e-9);
    }};
}
