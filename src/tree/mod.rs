//! Build labeled rooted trees and convert them to and from shapes.
//!
//! This module defines the two structs of the label layer:
//!  - The [`Node`] struct that represents a node of a labeled tree.
//!  - The [`Tree`] struct that holds a collection of [`Node`] objects.
//!
//! A [`Tree`] is turned into an unlabeled [`Shape`](crate::shape::Shape) with
//! [`Tree::to_shape`] and built back from one with [`Tree::from_shape`].
//!

mod node;
mod tree_impl;

pub use self::node::Node;
pub use self::tree_impl::{Tree, TreeError};

/// A type that represents Identifiers of [`Node`] objects
/// within a [`Tree`] object.
pub type NodeId = usize;
