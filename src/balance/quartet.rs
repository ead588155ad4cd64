use super::{binom2, binom3};
use crate::shape::{Count, Shape, ShapeError};

/// Weights given to each of the five shapes with 4 leaves when computing the
/// [rooted quartet index](Shape::quartet_index_with). Indexed as:
///  - `0`: the comb `(*,(*,(*,*)))`
///  - `1`: `(*,*,(*,*))`
///  - `2`: `(*,(*,*,*))`
///  - `3`: the balanced binary shape `((*,*),(*,*))`
///  - `4`: the star `(*,*,*,*)`
///
/// The default weights are `[0, 1, 2, 3, 4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuartetWeights(pub [Count; 5]);

impl Default for QuartetWeights {
    fn default() -> Self {
        Self([0, 1, 2, 3, 4])
    }
}

/// Elementary symmetric polynomials of degree 1 to 4 of some values
#[derive(Debug, Default, Clone, Copy)]
struct Elementary {
    e1: Count,
    e2: Count,
    e3: Count,
    e4: Count,
}

impl FromIterator<Count> for Elementary {
    fn from_iter<I: IntoIterator<Item = Count>>(iter: I) -> Self {
        let mut e = Self::default();
        for x in iter {
            e.e4 += e.e3 * x;
            e.e3 += e.e2 * x;
            e.e2 += e.e1 * x;
            e.e1 += x;
        }
        e
    }
}

/// Partial values reported by each subtree when computing the quartet index
#[derive(Debug, Clone, Copy)]
struct QuartetCounts {
    index: Count,
    /// Number of 3-leaf subsets inducing the star `(*,*,*)`
    triples: Count,
    kappa: Count,
}

/// Methods that compute rooted quartet indices of the [`Shape`]
///
/// ----
/// ----
impl Shape {
    /// Computes the rooted quartet index with the default [`QuartetWeights`].
    ///
    /// ```
    /// use treeshape::shape::generator::{comb, star};
    ///
    /// assert_eq!(comb(6).unwrap().quartet_index(), 0);
    /// assert_eq!(star(5).unwrap().quartet_index(), 20);
    /// ```
    pub fn quartet_index(&self) -> Count {
        self.quartet_index_with(QuartetWeights::default())
    }

    /// Computes the rooted quartet index, the sum over every set of 4 leaves of the
    /// weight of the shape they induce.
    ///
    /// Subsets are not enumerated: at every node the quartets whose last common ancestor
    /// is that node are counted from the numbers of leaves $k_i$ of its children
    /// and of 3-leaf stars they contain, using elementary symmetric polynomials of the $k_i$.
    pub fn quartet_index_with(&self, weights: QuartetWeights) -> Count {
        let [v0, v1, v2, v3, v4] = weights.0;

        self.fold(|node, children: Vec<QuartetCounts>| {
            if node.is_leaf() {
                return QuartetCounts {
                    index: 0,
                    triples: 0,
                    kappa: 1,
                };
            }

            let k = children.iter().map(|c| c.kappa).collect::<Elementary>();
            let pairs = children.iter().map(|c| binom2(c.kappa)).collect::<Elementary>();

            let mut index = 0;
            let mut triples = k.e3;
            for child in children.iter() {
                let outside = k.e1 - child.kappa;
                // Pairs of leaves taken from two distinct other children
                let outside_pairs = k.e2 - child.kappa * outside;

                index += child.index
                    + v0 * (binom3(child.kappa) - child.triples) * outside
                    + v1 * binom2(child.kappa) * outside_pairs
                    + v2 * child.triples * outside;
                triples += child.triples;
            }
            index += v3 * pairs.e2 + v4 * k.e4;

            QuartetCounts {
                index,
                triples,
                kappa: k.e1,
            }
        })
        .index
    }

    /// Computes the binary rooted quartet index, the number of sets of 4 leaves
    /// inducing the balanced shape `((*,*),(*,*))`. Fails with
    /// [`ShapeError::IsNotBinary`] on shapes that are not binary.
    pub fn binary_quartet_index(&self) -> Result<Count, ShapeError> {
        self.check_binary()?;

        Ok(self
            .fold(|_, children: Vec<(Count, Count)>| match children[..] {
                [(index_l, kappa_l), (index_r, kappa_r)] => (
                    index_l + index_r + binom2(kappa_l) * binom2(kappa_r),
                    kappa_l + kappa_r,
                ),
                _ => (0, 1),
            })
            .0)
    }
}
