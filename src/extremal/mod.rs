//! Shapes attaining the extremal values of balance indices.
//!
//! For a leaf count $n$, the `min_*` and `max_*` functions return *every* shape with $n$
//! leaves that attains the minimum (resp. maximum) of an index, sorted in canonical order.
//! They all return an empty vector when $n = 0$.
//!
//! Most extremal shapes are given by closed forms ([`comb`], [`star`] or [`max_balanced`]).
//! The minimum Colless and minimum Sackin shapes are computed by the [`MinimumColless`]
//! and [`MinimumSackin`] solvers, whose results are memoized. The free functions use
//! process-wide solvers (see [`crate::default_min_colless`]).
//!
//! The [`BalanceIndex`] enum gathers the integer-valued indices and normalizes their
//! values with respect to these extremes.
//!

mod min_colless;
mod min_sackin;

pub use self::min_colless::{root_splits, MinimumColless};
pub use self::min_sackin::MinimumSackin;

use clap::ValueEnum;

use crate::shape::{
    generator::{all_binary_shapes, all_shapes, comb, max_balanced, star},
    Count, Shape, ShapeError,
};

fn single(shape: Result<Shape, ShapeError>) -> Vec<Shape> {
    shape.into_iter().collect()
}

/// Binary shapes with the minimum Sackin index (the star minimizes it over all shapes)
pub fn min_sackin(n: usize) -> Vec<Shape> {
    crate::default_min_sackin().shapes(n).to_vec()
}

/// Shapes with the maximum Sackin index: the comb
pub fn max_sackin(n: usize) -> Vec<Shape> {
    single(comb(n))
}

/// Binary shapes with the minimum Colless index
pub fn min_colless(n: usize) -> Vec<Shape> {
    crate::default_min_colless().shapes(n).to_vec()
}

/// Binary shapes with the maximum Colless index: the comb
pub fn max_colless(n: usize) -> Vec<Shape> {
    single(comb(n))
}

/// Binary shapes with the minimum quadratic Colless index: the maximally balanced shape
pub fn min_quadratic_colless(n: usize) -> Vec<Shape> {
    single(max_balanced(n))
}

/// Binary shapes with the maximum quadratic Colless index: the comb
pub fn max_quadratic_colless(n: usize) -> Vec<Shape> {
    single(comb(n))
}

/// Binary shapes with the minimum cophenetic index: the maximally balanced shape
/// (the star minimizes it over all shapes)
pub fn min_cophenetic(n: usize) -> Vec<Shape> {
    single(max_balanced(n))
}

/// Shapes with the maximum cophenetic index: the comb
pub fn max_cophenetic(n: usize) -> Vec<Shape> {
    single(comb(n))
}

/// Shapes with the minimum rooted quartet index: the comb.
/// With less than 4 leaves the index is 0 for every shape.
pub fn min_quartet(n: usize) -> Vec<Shape> {
    if n < 4 {
        all_shapes(n).to_vec()
    } else {
        single(comb(n))
    }
}

/// Shapes with the maximum rooted quartet index: the star.
/// With less than 4 leaves the index is 0 for every shape.
pub fn max_quartet(n: usize) -> Vec<Shape> {
    if n < 4 {
        all_shapes(n).to_vec()
    } else {
        single(star(n))
    }
}

/// Binary shapes with the minimum binary rooted quartet index: the comb.
/// With less than 4 leaves the index is 0 for every binary shape.
pub fn min_binary_quartet(n: usize) -> Vec<Shape> {
    if n < 4 {
        all_binary_shapes(n).to_vec()
    } else {
        single(comb(n))
    }
}

/// Binary shapes with the maximum binary rooted quartet index: the maximally balanced shape
pub fn max_binary_quartet(n: usize) -> Vec<Shape> {
    if n < 4 {
        all_binary_shapes(n).to_vec()
    } else {
        single(max_balanced(n))
    }
}

/// Shapes with the fewest automorphisms: the comb
pub fn min_automorphisms(n: usize) -> Vec<Shape> {
    single(comb(n))
}

/// Shapes with the most automorphisms: the star
pub fn max_automorphisms(n: usize) -> Vec<Shape> {
    single(star(n))
}

/// Integer-valued balance indices
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum BalanceIndex {
    /// The [Sackin index](Shape::sackin)
    Sackin,
    /// The [Colless index](Shape::colless), binary shapes only
    Colless,
    /// The [quadratic Colless index](Shape::quadratic_colless), binary shapes only
    QuadraticColless,
    /// The [total cophenetic index](Shape::cophenetic)
    Cophenetic,
    /// The [rooted quartet index](Shape::quartet_index) with default weights
    Quartet,
    /// The [binary rooted quartet index](Shape::binary_quartet_index), binary shapes only
    BinaryQuartet,
}

impl BalanceIndex {
    /// Every index
    pub const ALL: [BalanceIndex; 6] = [
        BalanceIndex::Sackin,
        BalanceIndex::Colless,
        BalanceIndex::QuadraticColless,
        BalanceIndex::Cophenetic,
        BalanceIndex::Quartet,
        BalanceIndex::BinaryQuartet,
    ];

    /// Check if the index is only defined on binary shapes
    pub fn binary_only(&self) -> bool {
        matches!(
            self,
            BalanceIndex::Colless | BalanceIndex::QuadraticColless | BalanceIndex::BinaryQuartet
        )
    }

    /// Computes the index for a shape
    pub fn value(&self, shape: &Shape) -> Result<Count, ShapeError> {
        match self {
            BalanceIndex::Sackin => Ok(shape.sackin()),
            BalanceIndex::Colless => shape.colless(),
            BalanceIndex::QuadraticColless => shape.quadratic_colless(),
            BalanceIndex::Cophenetic => Ok(shape.cophenetic()),
            BalanceIndex::Quartet => Ok(shape.quartet_index()),
            BalanceIndex::BinaryQuartet => shape.binary_quartet_index(),
        }
    }

    /// Returns the shapes with `n` leaves minimizing the index
    pub fn minimal_shapes(&self, n: usize) -> Vec<Shape> {
        match self {
            BalanceIndex::Sackin => min_sackin(n),
            BalanceIndex::Colless => min_colless(n),
            BalanceIndex::QuadraticColless => min_quadratic_colless(n),
            BalanceIndex::Cophenetic => min_cophenetic(n),
            BalanceIndex::Quartet => min_quartet(n),
            BalanceIndex::BinaryQuartet => min_binary_quartet(n),
        }
    }

    /// Returns the shapes with `n` leaves maximizing the index
    pub fn maximal_shapes(&self, n: usize) -> Vec<Shape> {
        match self {
            BalanceIndex::Sackin => max_sackin(n),
            BalanceIndex::Colless => max_colless(n),
            BalanceIndex::QuadraticColless => max_quadratic_colless(n),
            BalanceIndex::Cophenetic => max_cophenetic(n),
            BalanceIndex::Quartet => max_quartet(n),
            BalanceIndex::BinaryQuartet => max_binary_quartet(n),
        }
    }

    /// Returns the minimum and maximum values of the index over shapes with `n` leaves
    pub fn range(&self, n: usize) -> Result<(Count, Count), ShapeError> {
        let extreme = |shapes: Vec<Shape>| match shapes.first() {
            Some(shape) => self.value(shape),
            None => Err(ShapeError::NoLeaves),
        };
        Ok((extreme(self.minimal_shapes(n))?, extreme(self.maximal_shapes(n))?))
    }

    /// Normalizes the value of the index for a shape with $n$ leaves:
    /// $$
    /// \frac{I(T) - I_{min}(n)}{I_{max}(n) - I_{min}(n)}
    /// $$
    ///
    /// Fails with [`ShapeError::ConstantIndex`] when the minimum and maximum are equal.
    /// Sackin and cophenetic minima are taken over binary shapes, so multifurcating
    /// shapes can have negative normalized values.
    ///
    /// ```
    /// use treeshape::{extremal::BalanceIndex, shape::generator::{comb, max_balanced}};
    ///
    /// let index = BalanceIndex::Colless;
    /// assert_eq!(index.normalized(&comb(8).unwrap()), Ok(1.0));
    /// assert_eq!(index.normalized(&max_balanced(8).unwrap()), Ok(0.0));
    /// ```
    pub fn normalized(&self, shape: &Shape) -> Result<f64, ShapeError> {
        let value = self.value(shape)?;
        let leaves = shape.leaf_count();
        let (min, max) = self.range(leaves)?;

        if max == min {
            return Err(ShapeError::ConstantIndex { leaves });
        }

        Ok((value as f64 - min as f64) / (max - min) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::generator::ShapeGenerator;

    /// Shapes among `shapes` where `index` is extremal
    fn exhaustive(shapes: &[Shape], index: BalanceIndex) -> (Vec<Shape>, Vec<Shape>) {
        let values: Vec<Count> = shapes.iter().map(|s| index.value(s).unwrap()).collect();
        let (min, max) = (
            *values.iter().min().unwrap(),
            *values.iter().max().unwrap(),
        );
        let select = |target: Count| {
            shapes
                .iter()
                .zip(values.iter())
                .filter(|(_, v)| **v == target)
                .map(|(s, _)| s.clone())
                .collect()
        };
        (select(min), select(max))
    }

    #[test]
    fn empty_leaf_count() {
        for index in BalanceIndex::ALL {
            assert!(index.minimal_shapes(0).is_empty());
            assert!(index.maximal_shapes(0).is_empty());
        }
        assert!(min_automorphisms(0).is_empty());
        assert!(max_automorphisms(0).is_empty());
    }

    #[test]
    fn binary_extremes_match_exhaustive_search() {
        let generator = ShapeGenerator::new();

        for n in 3..=14 {
            let binary = generator.all_binary_shapes(n);
            for index in BalanceIndex::ALL {
                if index == BalanceIndex::Quartet {
                    continue;
                }
                let (min, max) = exhaustive(&binary, index);
                let (min_value, max_value) = index.range(n).unwrap();

                assert_eq!(min_value, index.value(&min[0]).unwrap(), "{index:?} n={n}");
                assert_eq!(max_value, index.value(&max[0]).unwrap(), "{index:?} n={n}");
                assert_eq!(index.minimal_shapes(n), min, "{index:?} n={n}");
                assert_eq!(index.maximal_shapes(n), max, "{index:?} n={n}");
            }
        }
    }

    #[test]
    fn general_extremes_match_exhaustive_search() {
        let generator = ShapeGenerator::new();
        for n in 4..=9 {
            let shapes = generator.all_shapes(n);

            let (min, max) = exhaustive(&shapes, BalanceIndex::Quartet);
            assert_eq!(min_quartet(n), min);
            assert_eq!(max_quartet(n), max);

            let (_, max) = exhaustive(&shapes, BalanceIndex::Sackin);
            assert_eq!(max_sackin(n), max);
            let (_, max) = exhaustive(&shapes, BalanceIndex::Cophenetic);
            assert_eq!(max_cophenetic(n), max);

            let automorphisms: Vec<_> = shapes.iter().map(Shape::automorphisms).collect();
            let fewest = automorphisms.iter().min().unwrap();
            let most = automorphisms.iter().max().unwrap();
            let select = |target| -> Vec<Shape> {
                shapes
                    .iter()
                    .zip(automorphisms.iter())
                    .filter(|(_, a)| *a == target)
                    .map(|(s, _)| s.clone())
                    .collect()
            };
            assert_eq!(min_automorphisms(n), select(fewest));
            assert_eq!(max_automorphisms(n), select(most));
        }
    }

    #[test]
    fn small_quartet_extremes() {
        assert_eq!(min_quartet(3).len(), 2);
        assert_eq!(max_quartet(3).len(), 2);
        assert_eq!(max_binary_quartet(3), vec![comb(3).unwrap()]);
    }

    #[test]
    fn normalization() {
        let index = BalanceIndex::Sackin;
        assert_eq!(index.normalized(&comb(6).unwrap()), Ok(1.0));
        assert_eq!(index.normalized(&max_balanced(6).unwrap()), Ok(0.0));
        // sackin values 16 and 20
        let shape = Shape::sorted_node(vec![Shape::leaf(), max_balanced(5).unwrap()]).unwrap();
        assert_eq!(index.normalized(&shape), Ok(2.0 / 4.0));

        assert_eq!(
            BalanceIndex::Colless.normalized(&Shape::cherry()),
            Err(ShapeError::ConstantIndex { leaves: 2 })
        );
        assert_eq!(
            BalanceIndex::Colless.normalized(&star(4).unwrap()),
            Err(ShapeError::IsNotBinary)
        );
        assert!(BalanceIndex::Sackin.normalized(&star(4).unwrap()).unwrap() < 0.0);
    }
}
