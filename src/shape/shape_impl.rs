use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    sync::Arc,
};

use ptree::{print_tree, TreeBuilder};
use thiserror::Error;

use super::Count;

/// Errors that can occur when building [`Shape`] structs or computing values over them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// We are trying to build an internal node with less than two children,
    /// redundant single-child nodes must be collapsed by the caller
    #[error("An internal node needs at least 2 children, found {found}.")]
    TooFewChildren {
        /// Number of children that were given
        found: usize,
    },
    /// The shape is not binary and we are trying to do something
    /// only possible on binary shapes
    #[error("This shape is not binary.")]
    IsNotBinary,
    /// We are trying to build a shape with no leaves
    #[error("A shape must have at least one leaf.")]
    NoLeaves,
    /// The index takes the same value on every shape with that many leaves,
    /// so it cannot be normalized
    #[error("The index is constant over shapes with {leaves} leaves, it cannot be normalized.")]
    ConstantIndex {
        /// Number of leaves of the shape we tried to normalize
        leaves: usize,
    },
}

#[derive(Clone)]
enum Repr {
    Leaf,
    Node(Arc<Vec<Shape>>),
}

/// An unlabeled rooted tree.
///
/// A shape is either a leaf or an internal node holding an ordered sequence of
/// at least two children. Shapes are immutable: subtrees are shared between the
/// shapes built from them and every operation returns a new value.
///
/// The [`Ord`] implementation is the canonical order. [`PartialEq`] is structural
/// equality which, on canonical shapes, coincides with isomorphism.
#[derive(Clone)]
pub struct Shape(Repr);

/// Base methods to build [`Shape`] objects and access their structure.
///
/// ----
/// ----
impl Shape {
    /// The single leaf shape
    pub const LEAF: Shape = Shape(Repr::Leaf);

    /// Create a new leaf
    pub fn leaf() -> Self {
        Self::LEAF
    }

    /// Create the two-leaf shape
    pub fn cherry() -> Self {
        Self::from_sorted(vec![Self::LEAF, Self::LEAF])
    }

    /// Create an internal node whose children are kept in the given order.
    ///
    /// # Example
    /// ```
    /// use treeshape::shape::{Shape, ShapeError};
    ///
    /// let shape = Shape::node(vec![Shape::cherry(), Shape::leaf()]).unwrap();
    /// assert_eq!(shape.to_string(), "((*,*),*)");
    /// assert!(!shape.is_canonical());
    ///
    /// assert_eq!(
    ///     Shape::node(vec![Shape::leaf()]),
    ///     Err(ShapeError::TooFewChildren { found: 1 })
    /// );
    /// ```
    pub fn node(children: Vec<Shape>) -> Result<Self, ShapeError> {
        if children.len() < 2 {
            return Err(ShapeError::TooFewChildren {
                found: children.len(),
            });
        }
        Ok(Self(Repr::Node(Arc::new(children))))
    }

    /// Create an internal node whose children are sorted in canonical order.
    /// The children themselves are not canonicalized, if they are canonical
    /// then so is the resulting shape.
    pub fn sorted_node(mut children: Vec<Shape>) -> Result<Self, ShapeError> {
        children.sort();
        Self::node(children)
    }

    /// Builds a node from children that are already sorted and at least two.
    pub(crate) fn from_sorted(children: Vec<Shape>) -> Self {
        debug_assert!(children.len() >= 2);
        debug_assert!(children.windows(2).all(|w| w[0] <= w[1]));
        Self(Repr::Node(Arc::new(children)))
    }

    /// Check if the shape is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self.0, Repr::Leaf)
    }

    /// Children of the root of the shape (empty for a leaf)
    pub fn children(&self) -> &[Shape] {
        match &self.0 {
            Repr::Leaf => &[],
            Repr::Node(children) => children.as_slice(),
        }
    }

    /// Number of children of the root of the shape
    pub fn arity(&self) -> usize {
        self.children().len()
    }
}

/// Methods to traverse the [`Shape`] and compute derived attributes.
///
/// ----
/// ----
impl Shape {
    /// Bottom-up aggregation over the shape.
    ///
    /// `visit` is called once per node, in postorder, with the values computed
    /// for its children (an empty vector for leaves). The traversal uses an explicit
    /// stack so it does not overflow on very deep shapes such as large combs.
    ///
    /// ```
    /// use treeshape::shape::{generator::comb, Shape};
    ///
    /// let shape = comb(5).unwrap();
    /// let internal = shape.fold(|node, children: Vec<usize>| {
    ///     children.iter().sum::<usize>() + usize::from(!node.is_leaf())
    /// });
    /// assert_eq!(internal, 4);
    /// ```
    pub fn fold<T>(&self, mut visit: impl FnMut(&Shape, Vec<T>) -> T) -> T {
        let mut stack: Vec<(&Shape, usize)> = vec![(self, 0)];
        let mut values: Vec<T> = Vec::new();

        while let Some((node, next)) = stack.pop() {
            let children = node.children();
            if next < children.len() {
                stack.push((node, next + 1));
                stack.push((&children[next], 0));
            } else {
                let results = values.split_off(values.len() - children.len());
                let value = visit(node, results);
                if stack.is_empty() {
                    return value;
                }
                values.push(value);
            }
        }

        unreachable!("the root is always visited last")
    }

    /// Returns the number of leaves of the shape
    pub fn leaf_count(&self) -> usize {
        self.fold(|node, children: Vec<usize>| {
            if node.is_leaf() {
                1
            } else {
                children.into_iter().sum()
            }
        })
    }

    /// Returns the depth of the shape
    /// (i.e. the number of edges from the root to the deepest leaf)
    /// ```
    /// use treeshape::shape::{generator::{comb, star}, Shape};
    ///
    /// assert_eq!(Shape::leaf().depth(), 0);
    /// assert_eq!(star(6).unwrap().depth(), 1);
    /// assert_eq!(comb(6).unwrap().depth(), 5);
    /// ```
    pub fn depth(&self) -> usize {
        self.fold(|_, children: Vec<usize>| {
            children.into_iter().max().map_or(0, |deepest| deepest + 1)
        })
    }

    /// Returns the depth of every leaf, from left to right
    pub fn leaf_depths(&self) -> Vec<usize> {
        self.fold(|node, children: Vec<Vec<usize>>| {
            if node.is_leaf() {
                vec![0]
            } else {
                children.into_iter().flatten().map(|d| d + 1).collect()
            }
        })
    }

    /// Returns the number of nodes (leaves included) found at each depth
    pub fn nodes_by_depth(&self) -> Vec<Count> {
        let mut counts = vec![0; self.depth() + 1];
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            counts[depth] += 1;
            stack.extend(node.children().iter().map(|child| (child, depth + 1)));
        }
        counts
    }

    /// Check if every internal node of the shape has exactly two children
    pub fn is_binary(&self) -> bool {
        self.fold(|node, children: Vec<bool>| {
            node.is_leaf() || (children.len() == 2 && children.into_iter().all(|b| b))
        })
    }

    /// Returns an error if the shape is not binary
    pub(crate) fn check_binary(&self) -> Result<(), ShapeError> {
        if self.is_binary() {
            Ok(())
        } else {
            Err(ShapeError::IsNotBinary)
        }
    }
}

/// Methods to canonicalize [`Shape`] objects and test them for isomorphism.
///
/// ----
/// ----
impl Shape {
    /// Three-way comparison of two shapes according to the canonical order.
    ///
    /// A leaf is smaller than any internal node. Internal nodes are compared by
    /// number of children first, then child by child from left to right, the
    /// first difference deciding.
    pub fn compare(&self, other: &Shape) -> Ordering {
        let mut stack = vec![(self, other)];

        while let Some((left, right)) = stack.pop() {
            match (&left.0, &right.0) {
                (Repr::Leaf, Repr::Leaf) => continue,
                (Repr::Leaf, Repr::Node(_)) => return Ordering::Less,
                (Repr::Node(_), Repr::Leaf) => return Ordering::Greater,
                (Repr::Node(l), Repr::Node(r)) => {
                    if Arc::ptr_eq(l, r) {
                        continue;
                    }
                    match l.len().cmp(&r.len()) {
                        Ordering::Equal => {}
                        ord => return ord,
                    }
                    // Leftmost pair must be resolved first
                    stack.extend(l.iter().zip(r.iter()).rev());
                }
            }
        }

        Ordering::Equal
    }

    /// Check if the children of every node are sorted in canonical order
    pub fn is_canonical(&self) -> bool {
        self.fold(|node, children: Vec<bool>| {
            children.into_iter().all(|b| b)
                && node.children().windows(2).all(|pair| pair[0] <= pair[1])
        })
    }

    /// Returns the canonical representative of the isomorphism class of the shape,
    /// obtained by recursively sorting the children of every node.
    ///
    /// ```
    /// use treeshape::shape::Shape;
    ///
    /// let shape = Shape::node(vec![Shape::cherry(), Shape::leaf()]).unwrap();
    /// let canonical = shape.canonicalize();
    ///
    /// assert_eq!(canonical.to_string(), "(*,(*,*))");
    /// assert_eq!(canonical.canonicalize(), canonical);
    /// ```
    pub fn canonicalize(&self) -> Shape {
        self.fold(|node, mut children: Vec<Shape>| {
            if node.is_leaf() {
                Shape::LEAF
            } else {
                children.sort();
                Shape::from_sorted(children)
            }
        })
    }

    /// Check if two shapes are isomorphic, i.e. if they only differ by
    /// the order of the children of some of their nodes.
    pub fn isomorphic(&self, other: &Shape) -> bool {
        self.canonicalize() == other.canonicalize()
    }
}

/// Methods to display [`Shape`] objects.
///
/// ----
/// ----
impl Shape {
    /// Print the shape to the console, internal nodes are
    /// labeled by the number of leaves they subtend.
    ///
    /// Shapes deeper than [`MAX_PRINT_DEPTH`] are rejected with an
    /// [`InvalidInput`](std::io::ErrorKind::InvalidInput) error.
    pub fn print(&self) -> std::io::Result<()> {
        check_print_depth(self.depth())?;

        let mut builder = TreeBuilder::new(format!("{}", self.leaf_count()));
        let mut stack: Vec<(&Shape, usize)> = vec![(self, 0)];

        while let Some((node, next)) = stack.pop() {
            let children = node.children();
            if next < children.len() {
                stack.push((node, next + 1));
                let child = &children[next];
                if child.is_leaf() {
                    builder.add_empty_child("*".into());
                } else {
                    builder.begin_child(format!("{}", child.leaf_count()));
                    stack.push((child, 0));
                }
            } else if !stack.is_empty() {
                builder.end_child();
            }
        }

        let tree = builder.build();
        print_tree(&tree)
    }
}

/// Maximum depth of the trees and shapes that can be drawn on the console
pub const MAX_PRINT_DEPTH: usize = 1_000;

/// Returns an error if a tree of depth `depth` is too deep to be drawn
pub(crate) fn check_print_depth(depth: usize) -> std::io::Result<()> {
    if depth > MAX_PRINT_DEPTH {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Cannot print a tree of depth {depth}, the maximum is {MAX_PRINT_DEPTH}."),
        ));
    }
    Ok(())
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Shape {}

impl PartialOrd for Shape {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Shape {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Preorder with arities identifies the shape
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.0 {
                Repr::Leaf => state.write_u8(0),
                Repr::Node(children) => {
                    state.write_u8(1);
                    state.write_usize(children.len());
                    stack.extend(children.iter().rev());
                }
            }
        }
    }
}

// Subtrees are released with an explicit stack so that dropping
// very deep shapes does not overflow.
impl Drop for Shape {
    fn drop(&mut self) {
        let mut pending = match std::mem::replace(&mut self.0, Repr::Leaf) {
            Repr::Leaf => return,
            Repr::Node(children) => vec![children],
        };
        while let Some(children) = pending.pop() {
            if let Ok(mut children) = Arc::try_unwrap(children) {
                for child in children.iter_mut() {
                    if let Repr::Node(grandchildren) = std::mem::replace(&mut child.0, Repr::Leaf) {
                        pending.push(grandchildren);
                    }
                }
            }
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::LEAF
    }
}

/// Topology-only newick-like representation, leaves are written as `*`
impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack: Vec<(&Shape, usize)> = vec![(self, 0)];

        while let Some((node, next)) = stack.pop() {
            let children = node.children();
            if node.is_leaf() {
                write!(f, "*")?;
            } else if next == children.len() {
                write!(f, ")")?;
            } else {
                write!(f, "{}", if next == 0 { "(" } else { "," })?;
                stack.push((node, next + 1));
                stack.push((&children[next], 0));
            }
        }

        Ok(())
    }
}

impl Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Shape{self}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;
    use crate::shape::generator::{comb, max_balanced, star, ShapeGenerator};

    fn node(children: Vec<Shape>) -> Shape {
        Shape::node(children).unwrap()
    }

    /// Reverses the children of every node
    fn mirror(shape: &Shape) -> Shape {
        shape.fold(|node, mut children: Vec<Shape>| {
            if node.is_leaf() {
                Shape::LEAF
            } else {
                children.reverse();
                Shape::node(children).unwrap()
            }
        })
    }

    /// Rotates the children of every node by one position
    fn rotate(shape: &Shape) -> Shape {
        shape.fold(|node, mut children: Vec<Shape>| {
            if node.is_leaf() {
                Shape::LEAF
            } else {
                children.rotate_left(1);
                Shape::node(children).unwrap()
            }
        })
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            Shape::node(vec![]),
            Err(ShapeError::TooFewChildren { found: 0 })
        );
        assert_eq!(
            Shape::node(vec![Shape::cherry()]),
            Err(ShapeError::TooFewChildren { found: 1 })
        );
        assert!(Shape::node(vec![Shape::leaf(), Shape::leaf()]).is_ok());
    }

    #[test]
    fn leaf_is_smallest() {
        let leaf = Shape::leaf();
        assert_eq!(leaf.compare(&leaf), Ordering::Equal);
        assert_eq!(leaf.compare(&Shape::cherry()), Ordering::Less);
        assert_eq!(Shape::cherry().compare(&leaf), Ordering::Greater);
    }

    #[test]
    fn fewer_children_is_smaller() {
        // decided on arity without looking at the children
        let big_binary = node(vec![comb(5).unwrap(), comb(6).unwrap()]);
        let star3 = star(3).unwrap();
        assert_eq!(big_binary.compare(&star3), Ordering::Less);
    }

    #[test]
    fn lexicographic_children() {
        let test_cases = vec![
            ("(*,(*,*))", "((*,*),(*,*))", Ordering::Less),
            ("(*,(*,*,*))", "(*,(*,(*,*)))", Ordering::Greater),
            ("((*,*),(*,*))", "((*,*),(*,*))", Ordering::Equal),
            ("(*,*,(*,*))", "(*,*,*)", Ordering::Greater),
        ];
        let shapes = ShapeGenerator::new();
        let lookup = |repr: &str| -> Shape {
            (1..=5)
                .flat_map(|n| shapes.all_shapes(n).iter().cloned().collect::<Vec<_>>())
                .find(|s| s.to_string() == repr)
                .unwrap()
        };

        for (left, right, expected) in test_cases {
            assert_eq!(
                lookup(left).compare(&lookup(right)),
                expected,
                "{left} vs {right}"
            );
        }
    }

    #[test]
    fn canonical_order_is_total() {
        let shapes = ShapeGenerator::new();
        let all: Vec<Shape> = (1..=7)
            .flat_map(|n| shapes.all_shapes(n).iter().cloned().collect::<Vec<_>>())
            .collect();

        for a in all.iter() {
            for b in all.iter() {
                let ab = a.compare(b);
                assert_eq!(ab, b.compare(a).reverse());
                assert_eq!(ab == Ordering::Equal, a == b);
            }
        }

        for a in all.iter() {
            for b in all.iter().filter(|b| a <= *b) {
                for c in all.iter().filter(|c| b <= *c) {
                    assert!(a <= c, "{a} <= {b} <= {c}");
                }
            }
        }
    }

    #[test]
    fn canonicalize_is_idempotent_and_permutation_invariant() {
        let shapes = ShapeGenerator::new();
        for n in 1..=7 {
            for shape in shapes.all_shapes(n).iter() {
                assert!(shape.is_canonical());
                assert_eq!(&shape.canonicalize(), shape);

                for permuted in [mirror(shape), rotate(shape), rotate(&mirror(shape))] {
                    assert_eq!(&permuted.canonicalize(), shape);
                    assert!(permuted.isomorphic(shape));
                    assert_eq!(permuted.canonicalize().canonicalize(), *shape);
                }
            }
        }
    }

    #[test]
    fn non_isomorphic_shapes() {
        let a = node(vec![Shape::cherry(), Shape::cherry()]);
        let b = comb(4).unwrap();
        assert!(!a.isomorphic(&b));
        assert!(!mirror(&b).isomorphic(&a));
    }

    #[test]
    fn derived_attributes() {
        let shape = node(vec![Shape::cherry(), Shape::leaf(), star(3).unwrap()]);
        assert_eq!(shape.leaf_count(), 6);
        assert_eq!(shape.depth(), 2);
        assert_eq!(shape.leaf_depths(), vec![2, 2, 1, 2, 2, 2]);
        assert_eq!(shape.nodes_by_depth(), vec![1, 3, 5]);
        assert_eq!(shape.arity(), 3);
        assert!(!shape.is_binary());
        assert!(!shape.is_canonical());
        assert_eq!(shape.canonicalize().to_string(), "(*,(*,*),(*,*,*))");
    }

    #[test]
    fn binary_shapes() {
        assert!(Shape::leaf().is_binary());
        assert!(Shape::cherry().is_binary());
        assert!(comb(8).unwrap().is_binary());
        assert!(max_balanced(11).unwrap().is_binary());
        assert!(!star(3).unwrap().is_binary());
        assert_eq!(star(3).unwrap().check_binary(), Err(ShapeError::IsNotBinary));
    }

    #[test]
    fn deep_shapes_do_not_overflow() {
        let deep = comb(20_000).unwrap();
        assert_eq!(deep.leaf_count(), 20_000);
        assert_eq!(deep.depth(), 19_999);
        assert!(deep.is_canonical());
        assert_eq!(deep.compare(&deep.clone()), Ordering::Equal);

        let repr = deep.to_string();
        assert_eq!(repr.len(), 20_000 + 3 * 19_999);
        assert!(repr.starts_with("(*,(*,(*,"));
        assert!(repr.ends_with("(*,*))))"));

        let hash = |shape: &Shape| {
            let mut hasher = DefaultHasher::new();
            shape.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&deep), hash(&comb(20_000).unwrap()));
        assert_ne!(hash(&deep), hash(&comb(19_999).unwrap()));

        let error = deep.print().unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn display() {
        assert_eq!(Shape::leaf().to_string(), "*");
        assert_eq!(Shape::cherry().to_string(), "(*,*)");
        assert_eq!(comb(4).unwrap().to_string(), "(*,(*,(*,*)))");
        assert_eq!(format!("{:?}", Shape::cherry()), "Shape(*,*)");
    }
}
