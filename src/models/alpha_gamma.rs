use std::{collections::BTreeMap, sync::Arc};

use num_traits::One;
use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};

use super::{check_parameters, grow_from_root, merge_isomorphic, ModelError, Outcomes, Site};
use crate::{
    cache::LeafCountCache,
    shape::{
        generator::{for_each_node, insert_as_child, insert_as_sibling, rebuild},
        Shape,
    },
    symbolic::{Polynomial, Probability},
};

/// Adds `probability` to the outcome `shape` in `outcomes`
fn accumulate(outcomes: &mut BTreeMap<Shape, Probability>, shape: Shape, probability: Probability) {
    let total = match outcomes.remove(&shape) {
        Some(previous) => previous + probability,
        None => probability,
    };
    outcomes.insert(shape, total);
}

/// Every way of adding a leaf to the canonical `shape`, merged by isomorphism class.
///
/// At a node with $n$ leaves and $c$ children, the new leaf goes into the subtree of a
/// child with $k$ leaves with probability $(k - \alpha)/(n - \alpha)$, on the edge above the
/// node with probability $\gamma/(n - \alpha)$ and becomes a new child of the node with
/// probability $((c - 1)\alpha - \gamma)/(n - \alpha)$. A leaf is always split into a cherry.
fn grow(shape: &Shape, probability: &Probability) -> BTreeMap<Shape, Probability> {
    let mut outcomes = BTreeMap::new();
    // Probability of the new leaf reaching each node on the current path
    let mut reach: Vec<Probability> = vec![];

    // Isomorphic siblings are handled together
    for_each_node(shape, true, |node, path| {
        reach.truncate(path.len());
        let current = match path.last() {
            None => probability.clone(),
            Some(&(parent, i)) => {
                let children = parent.children();
                let copies = children[i..]
                    .iter()
                    .take_while(|c| **c == children[i])
                    .count() as i64;
                let n = parent.leaf_count() as u64;
                let k = node.leaf_count() as u64;

                reach[path.len() - 1]
                    .scale(&(Polynomial::integer(copies) * Polynomial::shifted_alpha(k)))
                    .div_shifted_alpha(n)
            }
        };

        if node.is_leaf() {
            accumulate(&mut outcomes, rebuild(path, Shape::cherry()), current.clone());
        } else {
            let n = node.leaf_count() as u64;
            let c = node.arity() as i64;

            let edge = current.scale(&Polynomial::gamma()).div_shifted_alpha(n);
            accumulate(&mut outcomes, rebuild(path, insert_as_sibling(node)), edge);

            let new_child = current
                .scale(&(Polynomial::integer(c - 1) * Polynomial::alpha() - Polynomial::gamma()))
                .div_shifted_alpha(n);
            accumulate(&mut outcomes, rebuild(path, insert_as_child(node)), new_child);
        }

        reach.push(current);
    });

    outcomes
}

/// Returns the shapes obtained from `shape` by adding one leaf under the Alpha-Gamma
/// model, assuming `shape` has probability `probability`. Isomorphic outcomes are merged.
///
/// ```
/// use num_traits::One;
/// use treeshape::{models::alpha_gamma::alpha_gamma_step, shape::Shape, symbolic::Probability};
///
/// let outcomes = alpha_gamma_step(&Shape::cherry(), &Probability::one());
/// assert_eq!(outcomes[0].0.to_string(), "(*,(*,*))");
/// assert_eq!(outcomes[0].1.to_string(), "(-2*α + γ + 2) / (2 - α)");
/// assert_eq!(outcomes[1].0.to_string(), "(*,*,*)");
/// assert_eq!(outcomes[1].1.to_string(), "(α - γ) / (2 - α)");
/// ```
pub fn alpha_gamma_step(shape: &Shape, probability: &Probability) -> Outcomes {
    grow(&shape.canonicalize(), probability).into_iter().collect()
}

/// Exact distribution of shapes under the Alpha-Gamma model, symbolic in $\alpha$ and $\gamma$
/// and memoized by leaf count.
#[derive(Debug, Default)]
pub struct AlphaGammaModel {
    outcomes: LeafCountCache<Outcomes>,
}

impl AlphaGammaModel {
    /// Create a new model with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every shape with `n` leaves with its probability under the Alpha-Gamma model
    /// (empty if `n` is 0).
    pub fn outcomes(&self, n: usize) -> Arc<Outcomes> {
        self.outcomes.get_or_insert_with(n, || match n {
            0 => vec![],
            1 => vec![(Shape::leaf(), Probability::one())],
            2 => vec![(Shape::cherry(), Probability::one())],
            _ => merge_isomorphic(
                self.outcomes(n - 1)
                    .iter()
                    .flat_map(|(shape, probability)| alpha_gamma_step(shape, probability)),
            ),
        })
    }

    /// Evict the memoized distributions
    pub fn clear(&self) {
        self.outcomes.clear()
    }
}

/// Exact distribution of shapes with `n` leaves under the Alpha-Gamma model,
/// using the process-wide model
pub fn alpha_gamma(n: usize) -> Arc<Outcomes> {
    crate::default_alpha_gamma().outcomes(n)
}

/// Simulates the Alpha-Gamma model with parameters $0 \leq \gamma \leq \alpha \leq 1$
/// until the tree has `n` leaves
pub fn sample_alpha_gamma<R: Rng + ?Sized>(
    n: usize,
    alpha: f64,
    gamma: f64,
    rng: &mut R,
) -> Result<Shape, ModelError> {
    check_parameters(alpha, gamma)?;
    if n == 0 {
        return Err(ModelError::NoLeaves);
    }

    let invalid = |_| ModelError::InvalidParameters { alpha, gamma };

    let mut shape = Shape::leaf();
    for _ in 1..n {
        shape = grow_from_root(&shape, |node| {
            let children = node.children();
            // Children first, then the edge above the node and the node itself
            let weights: Vec<f64> = children
                .iter()
                .map(|child| child.leaf_count() as f64 - alpha)
                .chain([gamma, (children.len() - 1) as f64 * alpha - gamma])
                .collect();

            let site = WeightedIndex::new(weights).map_err(invalid)?.sample(&mut *rng);
            Ok(if site < children.len() {
                Site::Child(site)
            } else if site == children.len() {
                Site::Edge
            } else {
                Site::Node
            })
        })?;
    }

    Ok(shape)
}
