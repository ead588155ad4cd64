//! Shapes with the minimum Colless index, from the binary expansion of the leaf count.
//!
//! Write $n = 2^k \cdot m$ with $m$ odd. Every Colless-minimal shape with $n$ leaves is
//! the join of two Colless-minimal shapes whose leaf counts are one of a few *root splits*
//! $(n_1, n_2)$ of $n$. The splits are read from the runs of set bits of $m$, following
//! Coronado, Fischer, Herbst, Rosselló and Wicke, *On the minimum value of the
//! Colless index and the bifurcating trees that achieve it* (2020).
//!

use std::{collections::BTreeSet, sync::Arc};

use crate::{cache::LeafCountCache, shape::Shape};

/// Returns every way of splitting the leaves at the root of a Colless-minimal
/// shape with `n` leaves, as pairs $(n_1, n_2)$ with $n_1 \leq n_2$ in increasing order.
/// Returns nothing if `n < 2`.
///
/// ```
/// use treeshape::extremal::root_splits;
///
/// assert_eq!(root_splits(12), vec![(4, 8), (6, 6)]);
/// assert_eq!(root_splits(7), vec![(3, 4)]);
/// ```
pub fn root_splits(n: usize) -> Vec<(usize, usize)> {
    if n < 2 {
        return vec![];
    }

    let mut splits = BTreeSet::new();

    if n % 2 == 0 {
        splits.insert((n / 2, n / 2));
    }

    let k = n.trailing_zeros();
    let odd = n >> k;
    let scale: usize = 1 << k;

    // Positions of the set bits of the odd part, most significant first
    let bits: Vec<u32> = (0..usize::BITS)
        .rev()
        .filter(|i| (odd >> i) & 1 == 1)
        .collect();
    let below = |from: usize| -> usize { bits[from..].iter().map(|&b| 1usize << b).sum() };

    let mut push = |a: usize, b: usize| {
        splits.insert((a.min(b), a.max(b)));
    };

    if odd == 3 {
        push(scale, 2 * scale);
    } else if bits.len() > 1 {
        let last = bits.len() - 1;

        // The last set bit is always the lowest one, so ends of runs are searched before it
        for i in 1..last {
            if bits[i + 1] + 1 < bits[i] || i == last - 1 {
                let l = bits[i];
                let t = (below(i + 1) - 1) / 2;
                let p = (odd - (1usize << l) - 2 * t - 1) >> (l + 1);
                push(scale * ((p << l) + 2 * t + 1), (scale << l) * (p + 1));
            }
        }

        for i in 1..bits.len() {
            if bits[i - 1] > bits[i] + 1 {
                let l = bits[i] + 1;
                let p = (odd - below(i + 1)) >> (l + 1);
                let t = ((p << (l + 1)) + (1usize << l) - 1 - odd) / 2;
                push((scale << l) * p, scale * (((p + 1) << l) - 2 * t - 1));
            }
        }
    }

    splits.into_iter().collect()
}

/// Computes the binary shapes with the minimum Colless index, memoizing them by leaf count.
///
/// ```
/// use treeshape::extremal::MinimumColless;
///
/// let solver = MinimumColless::new();
/// assert_eq!(solver.shapes(6).len(), 2);
/// assert!(solver.shapes(6).iter().all(|s| s.colless() == Ok(2)));
/// ```
#[derive(Debug, Default)]
pub struct MinimumColless {
    shapes: LeafCountCache<Vec<Shape>>,
}

impl MinimumColless {
    /// Create a new solver with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every binary shape with `n` leaves that minimizes the Colless index,
    /// sorted in canonical order (empty if `n` is 0).
    pub fn shapes(&self, n: usize) -> Arc<Vec<Shape>> {
        self.shapes.get_or_insert_with(n, || match n {
            0 => vec![],
            1 => vec![Shape::leaf()],
            2 => vec![Shape::cherry()],
            _ => {
                let mut shapes = BTreeSet::new();
                for (n1, n2) in root_splits(n) {
                    let (left, right) = (self.shapes(n1), self.shapes(n2));
                    for t1 in left.iter() {
                        for t2 in right.iter() {
                            let mut children = vec![t1.clone(), t2.clone()];
                            children.sort();
                            shapes.insert(Shape::from_sorted(children));
                        }
                    }
                }
                shapes.into_iter().collect()
            }
        })
    }

    /// Evict the memoized shapes
    pub fn clear(&self) {
        self.shapes.clear()
    }
}
