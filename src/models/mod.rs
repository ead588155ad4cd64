//! Exact and simulated stochastic models of tree growth.
//!
//! Both models grow a tree one leaf at a time, starting from a single leaf:
//!  - The [Yule model](yule) splits a leaf chosen uniformly at random.
//!  - The [Alpha-Gamma model](alpha_gamma) of Chen, Ford and Winkel attaches the new leaf to an
//!    edge or an internal node, with probabilities depending on two parameters $0 \leq \gamma \leq \alpha \leq 1$.
//!
//! Exact distributions are returned as [`Outcomes`], pairs of canonical shapes and their
//! symbolic [`Probability`]. The same shape is often reached through different insertions,
//! so outcomes are always [merged](merge_isomorphic) by isomorphism class before being returned.
//!

/// The Alpha-Gamma model
pub mod alpha_gamma;
/// The Yule model
pub mod yule;

use std::collections::{btree_map::Entry, BTreeMap};

use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use thiserror::Error;

use crate::{
    shape::{
        generator::{insert_as_child, insert_as_sibling, rebuild},
        Shape,
    },
    symbolic::Probability,
};

/// Errors that can occur when using the stochastic models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The Alpha-Gamma parameters are out of their domain
    #[error("Invalid parameters α={alpha} and γ={gamma}, they must satisfy 0 ≤ γ ≤ α ≤ 1.")]
    InvalidParameters {
        /// Value of α
        alpha: f64,
        /// Value of γ
        gamma: f64,
    },
    /// We are trying to sample a shape with no leaves
    #[error("Cannot sample a shape with no leaves.")]
    NoLeaves,
}

/// Shapes with their exact probabilities, sorted in canonical order
pub type Outcomes = Vec<(Shape, Probability)>;

/// Groups outcomes by isomorphism class, summing the probabilities of isomorphic shapes.
/// The returned shapes are canonical and sorted.
///
/// ```
/// use num_rational::BigRational;
/// use num_traits::One;
/// use treeshape::{models::merge_isomorphic, shape::Shape, symbolic::Probability};
///
/// let shape = Shape::node(vec![Shape::cherry(), Shape::leaf()]).unwrap();
/// let half = Probability::ratio(BigRational::new(1.into(), 2.into()));
///
/// let merged = merge_isomorphic(vec![(shape.clone(), half.clone()), (shape.canonicalize(), half)]);
/// assert_eq!(merged, vec![(shape.canonicalize(), Probability::one())]);
/// ```
pub fn merge_isomorphic(outcomes: impl IntoIterator<Item = (Shape, Probability)>) -> Outcomes {
    let mut merged: BTreeMap<Shape, Probability> = BTreeMap::new();

    for (shape, probability) in outcomes {
        match merged.entry(shape.canonicalize()) {
            Entry::Vacant(entry) => {
                entry.insert(probability);
            }
            Entry::Occupied(mut entry) => {
                let total = &*entry.get() + &probability;
                entry.insert(total);
            }
        }
    }

    merged.into_iter().collect()
}

/// Sum of the probabilities of all outcomes
pub fn total_probability(outcomes: &[(Shape, Probability)]) -> Probability {
    outcomes.iter().map(|(_, p)| p).sum()
}

fn to_f64(value: &BigRational) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Returns an error unless $0 \leq \gamma \leq \alpha \leq 1$
pub fn check_parameters(alpha: f64, gamma: f64) -> Result<(), ModelError> {
    if 0.0 <= gamma && gamma <= alpha && alpha <= 1.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidParameters { alpha, gamma })
    }
}

/// Evaluates the probabilities of outcomes for given values of $\alpha$ and $\gamma$
pub fn evaluate(
    outcomes: &[(Shape, Probability)],
    alpha: &BigRational,
    gamma: &BigRational,
) -> Result<Vec<(Shape, BigRational)>, ModelError> {
    let invalid = || ModelError::InvalidParameters {
        alpha: to_f64(alpha),
        gamma: to_f64(gamma),
    };

    if !(&BigRational::zero() <= gamma && gamma <= alpha && alpha <= &BigRational::one()) {
        return Err(invalid());
    }

    outcomes
        .iter()
        .map(|(shape, p)| {
            p.evaluate(alpha, gamma)
                .map(|value| (shape.clone(), value))
                .ok_or_else(invalid)
        })
        .collect()
}

/// Where a new leaf is attached, relative to an internal node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Site {
    /// Somewhere in the subtree of the child at this index
    Child(usize),
    /// On the edge above the node
    Edge,
    /// As a new child of the node
    Node,
}

/// Adds one leaf to the canonical `shape`, descending from the root and letting `choose`
/// pick a [`Site`] at each internal node. Reaching a leaf splits it into a cherry.
pub(crate) fn grow_from_root<F>(shape: &Shape, mut choose: F) -> Result<Shape, ModelError>
where
    F: FnMut(&Shape) -> Result<Site, ModelError>,
{
    let mut path: Vec<(&Shape, usize)> = vec![];
    let mut current = shape;

    let grown = loop {
        if current.is_leaf() {
            break insert_as_sibling(current);
        }
        match choose(current)? {
            Site::Child(i) => {
                path.push((current, i));
                current = &current.children()[i];
            }
            Site::Edge => break insert_as_sibling(current),
            Site::Node => break insert_as_child(current),
        }
    };

    Ok(rebuild(&path, grown))
}
