//! Balance indices of tree shapes.
//!
//! Every index is computed by a single bottom-up traversal of the shape
//! (see [`Shape::fold`](crate::shape::Shape::fold)), where each subtree reports its
//! partial index together with its number of leaves. The indices are exposed as
//! methods of [`Shape`](crate::shape::Shape):
//!  - [Sackin](crate::shape::Shape::sackin), sum of leaf depths.
//!  - [Colless](crate::shape::Shape::colless) and its
//!    [quadratic](crate::shape::Shape::quadratic_colless) variant, binary shapes only.
//!  - [Cophenetic](crate::shape::Shape::cophenetic), sum of the depths of the
//!    last common ancestors of every pair of leaves.
//!  - [Rooted quartet index](crate::shape::Shape::quartet_index), weighted count of
//!    the shapes induced by every set of 4 leaves.
//!  - [Automorphisms](crate::shape::Shape::automorphisms) and
//!    [symmetries](crate::shape::Shape::symmetries).
//!  - The [Liu polynomial](crate::shape::Shape::liu_polynomial), a complete isomorphism
//!    invariant, and its [number of monomials](crate::shape::Shape::liu_balance).
//!
//! The shapes attaining the extremal values of each index are computed in
//! the [`extremal`](crate::extremal) module.
//!

mod colless;
mod cophenetic;
mod liu;
mod quartet;
mod sackin;
mod symmetry;

pub use self::liu::LiuPolynomial;
pub use self::quartet::QuartetWeights;

use crate::shape::Count;

/// Number of unordered pairs among `m` elements
pub(crate) fn binom2(m: Count) -> Count {
    if m < 2 {
        0
    } else {
        m * (m - 1) / 2
    }
}

/// Number of unordered triples among `m` elements
pub(crate) fn binom3(m: Count) -> Count {
    if m < 3 {
        0
    } else {
        m * (m - 1) * (m - 2) / 6
    }
}
