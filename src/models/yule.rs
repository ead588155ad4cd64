use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};

use super::{grow_from_root, merge_isomorphic, ModelError, Outcomes, Site};
use crate::{
    cache::LeafCountCache,
    shape::{generator::split_each_leaf, Shape},
    symbolic::{Polynomial, Probability},
};

/// Returns the shapes obtained from `shape` by one speciation under the Yule model,
/// assuming `shape` has probability `probability`. Each leaf of `shape` speciates with
/// probability $1/n$ and isomorphic outcomes are merged.
///
/// ```
/// use num_traits::One;
/// use treeshape::{models::yule::yule_step, shape::generator::comb, symbolic::Probability};
///
/// let outcomes = yule_step(&comb(4).unwrap(), &Probability::one());
/// let shapes: Vec<String> = outcomes.iter().map(|(s, _)| s.to_string()).collect();
/// assert_eq!(shapes, vec!["(*,(*,(*,(*,*))))", "(*,((*,*),(*,*)))", "((*,*),(*,(*,*)))"]);
/// ```
pub fn yule_step(shape: &Shape, probability: &Probability) -> Outcomes {
    let leaves = shape.leaf_count();
    let share = probability.scale(&Polynomial::constant(BigRational::new(
        BigInt::one(),
        BigInt::from(leaves),
    )));

    merge_isomorphic(
        split_each_leaf(shape)
            .into_iter()
            .map(|grown| (grown, share.clone())),
    )
}

/// Exact distribution of shapes under the Yule model, memoized by leaf count.
#[derive(Debug, Default)]
pub struct YuleModel {
    outcomes: LeafCountCache<Outcomes>,
}

impl YuleModel {
    /// Create a new model with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every shape with `n` leaves with its probability under the Yule model
    /// (empty if `n` is 0).
    pub fn outcomes(&self, n: usize) -> Arc<Outcomes> {
        self.outcomes.get_or_insert_with(n, || match n {
            0 => vec![],
            1 => vec![(Shape::leaf(), Probability::one())],
            2 => vec![(Shape::cherry(), Probability::one())],
            _ => merge_isomorphic(
                self.outcomes(n - 1)
                    .iter()
                    .flat_map(|(shape, probability)| yule_step(shape, probability)),
            ),
        })
    }

    /// Evict the memoized distributions
    pub fn clear(&self) {
        self.outcomes.clear()
    }
}

/// Exact distribution of shapes with `n` leaves under the Yule model,
/// using the process-wide model
pub fn yule(n: usize) -> Arc<Outcomes> {
    crate::default_yule().outcomes(n)
}

/// Simulates the Yule model until the tree has `n` leaves
///
/// ```
/// use rand::thread_rng;
/// use treeshape::models::yule::sample_yule;
///
/// let shape = sample_yule(10, &mut thread_rng()).unwrap();
/// assert_eq!(shape.leaf_count(), 10);
/// assert!(shape.is_binary());
/// ```
pub fn sample_yule<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Shape, ModelError> {
    if n == 0 {
        return Err(ModelError::NoLeaves);
    }

    let mut shape = Shape::leaf();
    for _ in 1..n {
        // The subtree holding a uniformly chosen leaf
        shape = grow_from_root(&shape, |node| {
            let weights = node.children().iter().map(Shape::leaf_count);
            let children = WeightedIndex::new(weights).map_err(|_| ModelError::NoLeaves)?;
            Ok(Site::Child(children.sample(&mut *rng)))
        })?;
    }

    Ok(shape)
}
