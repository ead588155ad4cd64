use crate::shape::{Count, Shape, ShapeError};

/// Methods that compute Colless-like indices of binary [`Shape`] objects
///
/// ----
/// ----
impl Shape {
    /// Sums `imbalance(left, right)` over all internal nodes, where `left` and `right`
    /// are the numbers of leaves of the two children of the node.
    fn binary_imbalance(&self, imbalance: impl Fn(Count, Count) -> Count) -> Result<Count, ShapeError> {
        self.check_binary()?;

        Ok(self
            .fold(|node, children: Vec<(Count, Count)>| match children[..] {
                [(index_l, kappa_l), (index_r, kappa_r)] => (
                    imbalance(kappa_l, kappa_r) + index_l + index_r,
                    kappa_l + kappa_r,
                ),
                _ => {
                    debug_assert!(node.is_leaf());
                    (0, 1)
                }
            })
            .0)
    }

    /// Computes the Colless index for the shape.
    /// The colless index, $I_c$, measures the imbalance of a binary tree:
    /// $$
    /// I_c = \sum_{i \in nodes} |L_i - R_i|
    /// $$
    ///
    /// Where $L_i$ is the number of leaves in the left subtree of node $i$ and
    /// $R_i$ the number of leaves in the right subtree of $i$.
    /// Fails with [`ShapeError::IsNotBinary`] on shapes that are not binary.
    ///
    /// ```
    /// use treeshape::shape::{generator::{comb, star}, ShapeError};
    ///
    /// assert_eq!(comb(5).unwrap().colless(), Ok(6));
    /// assert_eq!(star(3).unwrap().colless(), Err(ShapeError::IsNotBinary));
    /// ```
    pub fn colless(&self) -> Result<Count, ShapeError> {
        self.binary_imbalance(|l, r| l.abs_diff(r))
    }

    /// Computes the quadratic Colless index for the shape:
    /// $$
    /// I_{qc} = \sum_{i \in nodes} (L_i - R_i)^2
    /// $$
    /// Fails with [`ShapeError::IsNotBinary`] on shapes that are not binary.
    pub fn quadratic_colless(&self) -> Result<Count, ShapeError> {
        self.binary_imbalance(|l, r| l.abs_diff(r).pow(2))
    }
}
