use num_bigint::BigUint;
use num_traits::One;

use crate::shape::{Count, Shape};

fn factorial(m: usize) -> BigUint {
    (1..=m).map(BigUint::from).product()
}

/// Checks that the children of the root of a canonical shape are all equal
fn has_equal_children(canonical: &Shape) -> bool {
    let children = canonical.children();
    children.iter().all(|child| *child == children[0])
}

/// Methods that count the symmetries of the [`Shape`]
///
/// ----
/// ----
impl Shape {
    /// Computes the number of automorphisms of the shape, i.e. the number of
    /// permutations of its leaves that leave the tree unchanged.
    ///
    /// The children of each node are grouped in isomorphism classes, a class of $m$
    /// isomorphic children with $a$ automorphisms each contributes $a^m \cdot m!$.
    /// The count grows factorially so it is returned as a [`BigUint`].
    ///
    /// ```
    /// use num_bigint::BigUint;
    /// use treeshape::shape::generator::{comb, star};
    ///
    /// assert_eq!(comb(10).unwrap().automorphisms(), BigUint::from(2u32));
    /// assert_eq!(star(5).unwrap().automorphisms(), BigUint::from(120u32));
    /// ```
    pub fn automorphisms(&self) -> BigUint {
        self.canonicalize().fold(|node, children: Vec<BigUint>| {
            let siblings = node.children();
            let mut automorphisms = BigUint::one();
            let mut start = 0;
            while start < siblings.len() {
                let class_size = siblings[start..]
                    .iter()
                    .take_while(|sibling| **sibling == siblings[start])
                    .count();
                automorphisms *= children[start].pow(class_size as u32) * factorial(class_size);
                start += class_size;
            }
            automorphisms
        })
    }

    /// Check if the children of the root are all isomorphic to each other.
    /// A leaf is symmetric.
    pub fn is_symmetric(&self) -> bool {
        self.is_leaf() || has_equal_children(&self.canonicalize())
    }

    /// Counts the internal nodes whose children are all isomorphic to each other
    pub fn symmetries(&self) -> Count {
        self.canonicalize()
            .fold(|node, children: Vec<Count>| {
                let own = !node.is_leaf() && has_equal_children(node);
                children.into_iter().sum::<Count>() + Count::from(own)
            })
    }
}
