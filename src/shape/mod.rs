//! Build and compare unlabeled rooted tree shapes.
//!
//! This module defines the foundational type of the crate:
//!  - The [`Shape`] struct that represents an unlabeled rooted tree, either a leaf
//!    or an internal node with at least two children.
//!  - The [`generator`] module that grows shapes one leaf at a time and enumerates
//!    every shape with a given number of leaves.
//!
//! Shapes are totally ordered by their *canonical order*: a leaf is smaller than any
//! internal node, internal nodes with fewer children are smaller, and internal nodes
//! with the same number of children are compared lexicographically child by child.
//! A shape whose children are sorted (recursively) according to that order is said to
//! be *canonical*, and two shapes are isomorphic iff their canonical forms are equal.
//!

/// A module to grow and enumerate shapes
pub mod generator;
mod shape_impl;

pub use self::shape_impl::{Shape, ShapeError, MAX_PRINT_DEPTH};
pub(crate) use self::shape_impl::check_print_depth;

/// A type that represents leaf counts and other combinatorial
/// quantities (balance index values) computed over a [`Shape`].
pub type Count = u64;
