//! Grow shapes by inserting leaves and enumerate every shape with a given number of leaves.
//!
//! Two insertion primitives are used:
//!  - [`insert_as_sibling`] hangs a new leaf on the edge above a shape, creating a new root.
//!  - [`insert_as_child`] adds a new leaf to the children of the root of a shape.
//!
//! Every shape with $n$ leaves is obtained by inserting one leaf somewhere in a shape
//! with $n-1$ leaves, this is how [`ShapeGenerator`] enumerates them. The number of shapes
//! grows super-exponentially with $n$, enumeration is only tractable up to $n \approx 12$.
//!

use std::{collections::BTreeSet, iter, sync::Arc};

use super::{Shape, ShapeError};
use crate::cache::LeafCountCache;

/// Returns a new shape whose root has two children: a new leaf and `shape`.
/// This replaces the edge above `shape` by a new internal node carrying the leaf.
pub fn insert_as_sibling(shape: &Shape) -> Shape {
    Shape::from_sorted(vec![Shape::LEAF, shape.clone()])
}

/// Returns a new shape where a leaf was added to the children of the root of `shape`.
/// If `shape` is a leaf this is the same as [`insert_as_sibling`].
///
/// ```
/// use treeshape::shape::generator::{insert_as_child, star};
///
/// let star3 = star(3).unwrap();
/// assert_eq!(insert_as_child(&star3), star(4).unwrap());
/// ```
pub fn insert_as_child(shape: &Shape) -> Shape {
    if shape.is_leaf() {
        insert_as_sibling(shape)
    } else {
        // A leaf is smaller than any shape so it goes first
        Shape::from_sorted(
            iter::once(Shape::LEAF)
                .chain(shape.children().iter().cloned())
                .collect(),
        )
    }
}

/// Returns a copy of the canonical `shape` where child `index` is replaced by the canonical
/// `replacement`, inserted at its sorted position among the remaining children.
pub(crate) fn replace_child(shape: &Shape, index: usize, replacement: Shape) -> Shape {
    let others = shape
        .children()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, child)| child.clone());

    Shape::from_sorted(itertools::merge(others, iter::once(replacement)).collect())
}

/// Visits every node of the canonical `shape` in preorder, along with the path leading
/// to it from the root as `(parent, child index)` pairs. With `distinct`, the subtree of a
/// child identical to its previous sibling is skipped.
///
/// The path is kept on an explicit stack so arbitrarily deep shapes can be walked.
pub(crate) fn for_each_node<'a, F>(shape: &'a Shape, distinct: bool, mut visit: F)
where
    F: FnMut(&'a Shape, &[(&'a Shape, usize)]),
{
    visit(shape, &[]);
    let mut path: Vec<(&'a Shape, usize)> = vec![(shape, 0)];

    while let Some(&(node, next)) = path.last() {
        let children = node.children();
        let mut index = next;
        while distinct
            && 0 < index
            && index < children.len()
            && children[index - 1] == children[index]
        {
            index += 1;
        }

        if index >= children.len() {
            path.pop();
            if let Some(parent) = path.last_mut() {
                parent.1 += 1;
            }
            continue;
        }

        if let Some(last) = path.last_mut() {
            last.1 = index;
        }
        let child = &children[index];
        visit(child, &path);
        path.push((child, 0));
    }
}

/// Rebuilds the canonical shape along `path`, with `grown` in place of the node
/// the path leads to.
pub(crate) fn rebuild(path: &[(&Shape, usize)], grown: Shape) -> Shape {
    path.iter()
        .rev()
        .fold(grown, |child, &(parent, index)| replace_child(parent, index, child))
}

fn one_step_canonical(shape: &Shape, binary: bool) -> BTreeSet<Shape> {
    let mut shapes = BTreeSet::new();

    // Identical siblings yield identical expansions
    for_each_node(shape, true, |node, path| {
        if !binary && !node.is_leaf() {
            shapes.insert(rebuild(path, insert_as_child(node)));
        }
        shapes.insert(rebuild(path, insert_as_sibling(node)));
    });

    shapes
}

/// Returns every shape, up to isomorphism, obtained by adding exactly one leaf anywhere in
/// `shape`: on any edge (including above the root) or as a new child of any internal node.
/// The result is sorted in canonical order.
///
/// ```
/// use treeshape::shape::{generator::one_step, Shape};
///
/// let grown: Vec<String> = one_step(&Shape::cherry())
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// assert_eq!(grown, vec!["(*,(*,*))", "(*,*,*)"]);
/// ```
pub fn one_step(shape: &Shape) -> Vec<Shape> {
    one_step_canonical(&shape.canonicalize(), false)
        .into_iter()
        .collect()
}

/// Returns every binary shape, up to isomorphism, obtained by adding exactly one leaf
/// on an edge of the binary `shape`.
pub fn one_step_binary(shape: &Shape) -> Result<Vec<Shape>, ShapeError> {
    shape.check_binary()?;
    Ok(one_step_canonical(&shape.canonicalize(), true)
        .into_iter()
        .collect())
}

fn split_each_leaf_canonical(shape: &Shape) -> Vec<Shape> {
    let mut splits = vec![];
    for_each_node(shape, false, |node, path| {
        if node.is_leaf() {
            splits.push(rebuild(path, Shape::cherry()));
        }
    });
    splits
}

/// Returns, for each leaf of `shape` from left to right, the shape obtained by replacing
/// that leaf with a cherry. Isomorphic results are *not* merged: the output always
/// has one entry per leaf.
pub fn split_each_leaf(shape: &Shape) -> Vec<Shape> {
    split_each_leaf_canonical(&shape.canonicalize())
}

/// Returns the shape with `n` leaves all hanging from the root
pub fn star(n: usize) -> Result<Shape, ShapeError> {
    match n {
        0 => Err(ShapeError::NoLeaves),
        1 => Ok(Shape::leaf()),
        _ => Ok(Shape::from_sorted(vec![Shape::LEAF; n])),
    }
}

/// Returns the comb (or caterpillar) with `n` leaves, the maximally unbalanced binary shape
/// where every internal node has a leaf child.
pub fn comb(n: usize) -> Result<Shape, ShapeError> {
    match n {
        0 => Err(ShapeError::NoLeaves),
        1 => Ok(Shape::leaf()),
        _ => {
            let mut shape = Shape::cherry();
            for _ in 2..n {
                shape = insert_as_sibling(&shape);
            }
            Ok(shape)
        }
    }
}

fn max_balanced_unchecked(n: usize) -> Shape {
    match n {
        1 => Shape::leaf(),
        2 => Shape::cherry(),
        _ => {
            let mut children = vec![
                max_balanced_unchecked(n / 2),
                max_balanced_unchecked(n - n / 2),
            ];
            children.sort();
            Shape::from_sorted(children)
        }
    }
}

/// Returns the maximally balanced binary shape with `n` leaves, where the leaves
/// of every internal node are split in $\lfloor k/2 \rfloor$ and $\lceil k/2 \rceil$.
pub fn max_balanced(n: usize) -> Result<Shape, ShapeError> {
    if n == 0 {
        return Err(ShapeError::NoLeaves);
    }
    Ok(max_balanced_unchecked(n))
}

/// Enumerates shapes with a given number of leaves, memoizing every leaf count it visits.
///
/// ```
/// use treeshape::shape::generator::ShapeGenerator;
///
/// let generator = ShapeGenerator::new();
/// assert_eq!(generator.all_shapes(5).len(), 12);
/// assert_eq!(generator.all_binary_shapes(5).len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct ShapeGenerator {
    shapes: LeafCountCache<Vec<Shape>>,
    binary_shapes: LeafCountCache<Vec<Shape>>,
}

impl ShapeGenerator {
    /// Create a new generator with empty caches
    pub fn new() -> Self {
        Self::default()
    }

    fn enumerate(&self, n: usize, binary: bool) -> Arc<Vec<Shape>> {
        let cache = if binary {
            &self.binary_shapes
        } else {
            &self.shapes
        };

        cache.get_or_insert_with(n, || match n {
            0 => vec![],
            1 => vec![Shape::leaf()],
            2 => vec![Shape::cherry()],
            _ => self
                .enumerate(n - 1, binary)
                .iter()
                .flat_map(|shape| one_step_canonical(shape, binary))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        })
    }

    /// Returns every shape with `n` leaves, sorted in canonical order
    /// (empty if `n` is 0).
    pub fn all_shapes(&self, n: usize) -> Arc<Vec<Shape>> {
        self.enumerate(n, false)
    }

    /// Returns every binary shape with `n` leaves, sorted in canonical order
    /// (empty if `n` is 0).
    pub fn all_binary_shapes(&self, n: usize) -> Arc<Vec<Shape>> {
        self.enumerate(n, true)
    }

    /// Evict the memoized enumerations
    pub fn clear(&self) {
        self.shapes.clear();
        self.binary_shapes.clear();
    }
}

/// Returns every shape with `n` leaves using the process-wide generator
pub fn all_shapes(n: usize) -> Arc<Vec<Shape>> {
    crate::default_generator().all_shapes(n)
}

/// Returns every binary shape with `n` leaves using the process-wide generator
pub fn all_binary_shapes(n: usize) -> Arc<Vec<Shape>> {
    crate::default_generator().all_binary_shapes(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reprs(shapes: &[Shape]) -> Vec<String> {
        shapes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn insertion_primitives() {
        let leaf = Shape::leaf();
        assert_eq!(insert_as_sibling(&leaf), Shape::cherry());
        assert_eq!(insert_as_child(&leaf), Shape::cherry());

        let comb3 = comb(3).unwrap();
        assert_eq!(insert_as_sibling(&comb3), comb(4).unwrap());
        assert_eq!(insert_as_child(&comb3).to_string(), "(*,*,(*,*))");
        assert!(insert_as_child(&comb3).is_canonical());
    }

    #[test]
    fn base_shapes() {
        let test_cases = vec![
            (1, "*", "*", "*"),
            (2, "(*,*)", "(*,*)", "(*,*)"),
            (3, "(*,*,*)", "(*,(*,*))", "(*,(*,*))"),
            (
                5,
                "(*,*,*,*,*)",
                "(*,(*,(*,(*,*))))",
                "((*,*),(*,(*,*)))",
            ),
        ];

        for (n, star_repr, comb_repr, balanced_repr) in test_cases {
            assert_eq!(star(n).unwrap().to_string(), star_repr);
            assert_eq!(comb(n).unwrap().to_string(), comb_repr);
            assert_eq!(max_balanced(n).unwrap().to_string(), balanced_repr);
        }

        assert_eq!(star(0), Err(ShapeError::NoLeaves));
        assert_eq!(comb(0), Err(ShapeError::NoLeaves));
        assert_eq!(max_balanced(0), Err(ShapeError::NoLeaves));
    }

    #[test]
    fn one_step_from_small_shapes() {
        assert_eq!(reprs(&one_step(&Shape::leaf())), vec!["(*,*)"]);
        assert_eq!(
            reprs(&one_step(&comb(3).unwrap())),
            vec![
                "(*,(*,(*,*)))",
                "(*,(*,*,*))",
                "((*,*),(*,*))",
                "(*,*,(*,*))",
            ]
        );
        assert_eq!(
            reprs(&one_step_binary(&comb(3).unwrap()).unwrap()),
            vec!["(*,(*,(*,*)))", "((*,*),(*,*))"]
        );
        assert_eq!(
            reprs(&one_step(&star(3).unwrap())),
            vec!["(*,(*,*,*))", "(*,*,(*,*))", "(*,*,*,*)"]
        );
    }

    #[test]
    fn one_step_ignores_child_order() {
        let shape = Shape::node(vec![star(3).unwrap(), Shape::cherry(), Shape::leaf()]).unwrap();
        assert_eq!(one_step(&shape), one_step(&shape.canonicalize()));
    }

    #[test]
    fn binary_one_step_rejects_multifurcations() {
        assert_eq!(
            one_step_binary(&star(3).unwrap()),
            Err(ShapeError::IsNotBinary)
        );
    }

    #[test]
    fn enumeration_counts() {
        let generator = ShapeGenerator::new();

        // OEIS A000669
        let general = vec![0, 1, 1, 2, 5, 12, 33, 90, 261];
        // Wedderburn-Etherington numbers
        let binary = vec![0, 1, 1, 1, 2, 3, 6, 11, 23, 46, 98];

        for (n, count) in general.into_iter().enumerate() {
            assert_eq!(generator.all_shapes(n).len(), count, "n={n}");
        }
        for (n, count) in binary.into_iter().enumerate() {
            assert_eq!(generator.all_binary_shapes(n).len(), count, "n={n}");
        }
    }

    #[test]
    fn four_leaves() {
        let generator = ShapeGenerator::new();
        assert_eq!(
            reprs(&generator.all_shapes(4)),
            vec![
                "(*,(*,(*,*)))",
                "(*,(*,*,*))",
                "((*,*),(*,*))",
                "(*,*,(*,*))",
                "(*,*,*,*)",
            ]
        );
    }

    #[test]
    fn enumerated_shapes_are_valid() {
        let generator = ShapeGenerator::new();
        for n in 1..=8 {
            let shapes = generator.all_shapes(n);
            assert!(shapes.windows(2).all(|w| w[0] < w[1]));
            for shape in shapes.iter() {
                assert_eq!(shape.leaf_count(), n);
                assert!(shape.is_canonical());
            }

            let binary = generator.all_binary_shapes(n);
            assert!(binary.iter().all(|s| s.is_binary() && s.leaf_count() == n));
            assert_eq!(
                binary.len(),
                shapes.iter().filter(|s| s.is_binary()).count()
            );
        }
    }

    #[test]
    fn enumeration_is_memoized() {
        let generator = ShapeGenerator::new();
        let first = generator.all_shapes(6);
        let second = generator.all_shapes(6);
        assert!(Arc::ptr_eq(&first, &second));

        generator.clear();
        assert!(!Arc::ptr_eq(&first, &generator.all_shapes(6)));
    }

    #[test]
    fn walk_with_paths() {
        let shape = Shape::node(vec![Shape::leaf(), Shape::leaf(), comb(3).unwrap()]).unwrap();

        let mut visited = vec![];
        for_each_node(&shape, false, |node, path| {
            let indices: Vec<usize> = path.iter().map(|(_, i)| *i).collect();
            visited.push((node.leaf_count(), indices));
            assert_eq!(rebuild(path, node.clone()), shape);
        });
        assert_eq!(
            visited,
            vec![
                (5, vec![]),
                (1, vec![0]),
                (1, vec![1]),
                (3, vec![2]),
                (1, vec![2, 0]),
                (2, vec![2, 1]),
                (1, vec![2, 1, 0]),
                (1, vec![2, 1, 1]),
            ]
        );

        let mut distinct = 0;
        for_each_node(&shape, true, |_, _| distinct += 1);
        // the second leaves of the root and of the cherry are skipped
        assert_eq!(distinct, 6);
    }

    #[test]
    fn deep_shapes_do_not_overflow() {
        // Recursing once per level would exhaust this stack
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let n = 1_500;
                let deep = comb(n).unwrap();

                let splits = split_each_leaf(&deep);
                assert_eq!(splits.len(), n);
                assert!(splits.iter().all(|s| s.leaf_count() == n + 1));
                assert_eq!(splits[n - 1], comb(n + 1).unwrap());

                let grown = one_step_binary(&deep).unwrap();
                assert!(grown.contains(&comb(n + 1).unwrap()));
                assert!(grown.iter().all(|s| s.is_binary() && s.is_canonical()));

                let grown = one_step(&deep);
                assert!(grown.contains(&insert_as_child(&deep)));
                assert!(grown.iter().all(|s| s.leaf_count() == n + 1));
            })
            .unwrap();

        handle.join().unwrap();
    }

    #[test]
    fn split_leaves() {
        let comb4 = comb(4).unwrap();
        let splits = split_each_leaf(&comb4);
        assert_eq!(splits.len(), 4);
        assert_eq!(
            reprs(&splits),
            vec![
                "((*,*),(*,(*,*)))",
                "(*,((*,*),(*,*)))",
                "(*,(*,(*,(*,*))))",
                "(*,(*,(*,(*,*))))",
            ]
        );
        assert_eq!(split_each_leaf(&star(3).unwrap()).len(), 3);
    }
}
