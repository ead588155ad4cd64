//! Binary shapes with the minimum Sackin index.
//!
//! A binary shape with $n$ leaves minimizes the Sackin index iff all its leaves lie at
//! depth $h - 1$ or $h$, where $h = \lceil \log_2 n \rceil$. When $n$ is a power of two the
//! only such shape is the fully balanced one. Otherwise every minimal shape with $n$ leaves
//! is obtained from a minimal shape with $n + 1$ leaves by collapsing one of its cherries
//! at maximum depth into a leaf, so the minimal shapes are computed from the next power
//! of two downwards.
//!

use std::{collections::BTreeSet, sync::Arc};

use crate::{
    cache::LeafCountCache,
    shape::{
        generator::{for_each_node, max_balanced, rebuild},
        Shape,
    },
};

/// Returns the shapes obtained by collapsing, into a leaf, one cherry whose
/// root is at depth `depth` in the canonical `shape`.
fn collapse_cherries_at(shape: &Shape, depth: usize) -> BTreeSet<Shape> {
    let mut collapsed = BTreeSet::new();
    for_each_node(shape, true, |node, path| {
        if path.len() == depth && !node.is_leaf() && node.children().iter().all(Shape::is_leaf) {
            collapsed.insert(rebuild(path, Shape::leaf()));
        }
    });
    collapsed
}

/// Computes the binary shapes with the minimum Sackin index, memoizing them by leaf count.
///
/// ```
/// use treeshape::extremal::MinimumSackin;
///
/// let solver = MinimumSackin::new();
/// let shapes = solver.shapes(6);
/// assert_eq!(shapes.len(), 2);
/// assert!(shapes.iter().all(|s| s.sackin() == 16));
/// ```
#[derive(Debug, Default)]
pub struct MinimumSackin {
    shapes: LeafCountCache<Vec<Shape>>,
}

impl MinimumSackin {
    /// Create a new solver with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every binary shape with `n` leaves that minimizes the Sackin index,
    /// sorted in canonical order (empty if `n` is 0).
    pub fn shapes(&self, n: usize) -> Arc<Vec<Shape>> {
        if let Some(shapes) = self.shapes.get(n) {
            return shapes;
        }
        if n == 0 {
            return self.shapes.get_or_insert_with(0, Vec::new);
        }

        let top = n.next_power_of_two();
        let mut shapes = self
            .shapes
            .get_or_insert_with(top, || max_balanced(top).into_iter().collect());

        // Leaves of shapes with m+1 leaves are at depth ceil(log2(m)) at most
        for m in (n..top).rev() {
            let depth = (m + 1).next_power_of_two().trailing_zeros() as usize;
            let larger = Arc::clone(&shapes);
            shapes = self.shapes.get_or_insert_with(m, || {
                larger
                    .iter()
                    .flat_map(|shape| collapse_cherries_at(shape, depth - 1))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            });
        }

        shapes
    }

    /// Evict the memoized shapes
    pub fn clear(&self) {
        self.shapes.clear()
    }
}
