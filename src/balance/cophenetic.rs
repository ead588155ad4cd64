use super::binom2;
use crate::shape::{Count, Shape};

/// Methods that compute the cophenetic index of the [`Shape`]
///
/// ----
/// ----
impl Shape {
    /// Computes the total cophenetic index, the sum over every pair of leaves of
    /// the depth of their last common ancestor. Each node other than the root is
    /// the common ancestor of the $\binom{\kappa_v}{2}$ pairs of leaves below it, so:
    /// $$
    /// \Phi(T) = \sum_{v \neq root} \binom{\kappa_v}{2}
    /// $$
    ///
    /// ```
    /// use treeshape::shape::generator::{comb, star};
    ///
    /// assert_eq!(star(7).unwrap().cophenetic(), 0);
    /// assert_eq!(comb(5).unwrap().cophenetic(), 10);
    /// ```
    pub fn cophenetic(&self) -> Count {
        let (below, kappa) = self.fold(|node, children: Vec<(Count, Count)>| {
            if node.is_leaf() {
                return (0, 1);
            }
            let (cophenetics, kappas): (Vec<Count>, Vec<Count>) = children.into_iter().unzip();
            let kappa: Count = kappas.into_iter().sum();
            (cophenetics.into_iter().sum::<Count>() + binom2(kappa), kappa)
        });

        // The root is not counted
        below - binom2(kappa)
    }
}
