use crate::shape::{Count, Shape};

/// Methods that compute the Sackin index and leaf depth statistics of the [`Shape`]
///
/// ----
/// ----
impl Shape {
    /// Computes the Sackin index. The Sackin index, $I_s$, is the sum of the
    /// depths of all the leaves or equivalently the sum over all internal nodes of
    /// the number of leaves descending from that node:
    /// $$
    /// I_s(T) = \sum_{c \in children(T)} I_s(c) + \kappa(T)
    /// $$
    /// A smaller Sackin index means a more balanced tree.
    ///
    /// ```
    /// use treeshape::shape::{generator::{comb, star}, Shape};
    ///
    /// assert_eq!(Shape::leaf().sackin(), 0);
    /// assert_eq!(star(5).unwrap().sackin(), 5);
    /// assert_eq!(comb(5).unwrap().sackin(), 14);
    /// ```
    pub fn sackin(&self) -> Count {
        self.fold(|node, children: Vec<(Count, Count)>| {
            if node.is_leaf() {
                return (0, 1);
            }
            let (sackins, kappas): (Vec<Count>, Vec<Count>) = children.into_iter().unzip();
            let kappa: Count = kappas.into_iter().sum();
            (sackins.into_iter().sum::<Count>() + kappa, kappa)
        })
        .0
    }

    /// Computes the sample variance of the depths of the leaves.
    /// Returns `None` for a single leaf.
    pub fn leaf_depth_variance(&self) -> Option<f64> {
        let depths = self.leaf_depths();
        if depths.len() < 2 {
            return None;
        }

        let n = depths.len() as f64;
        let mean = depths.iter().sum::<usize>() as f64 / n;
        let squares: f64 = depths.iter().map(|&d| (d as f64 - mean).powi(2)).sum();

        Some(squares / (n - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use crate::shape::generator::{comb, max_balanced, star, ShapeGenerator};

    use super::*;

    #[test]
    fn sackin_of_known_shapes() {
        let test_cases = vec![
            (Shape::leaf(), 0),
            (Shape::cherry(), 2),
            (star(5).unwrap(), 5),
            (comb(5).unwrap(), 14),
            (max_balanced(6).unwrap(), 16),
            (max_balanced(8).unwrap(), 24),
        ];

        for (shape, sackin) in test_cases {
            assert_eq!(shape.sackin(), sackin, "{shape}");
        }
    }

    #[test]
    fn sackin_is_sum_of_leaf_depths() {
        let generator = ShapeGenerator::new();
        for n in 1..=7 {
            for shape in generator.all_shapes(n).iter() {
                let depths: usize = shape.leaf_depths().iter().sum();
                assert_eq!(shape.sackin(), depths as Count);
            }
        }
    }

    #[test]
    fn sackin_of_combs() {
        for n in 1..=30 {
            let n_c = n as Count;
            assert_eq!(comb(n).unwrap().sackin(), n_c * (n_c + 1) / 2 - 1);
        }
    }

    #[test]
    fn depth_variance() {
        assert_eq!(Shape::leaf().leaf_depth_variance(), None);
        assert_eq!(star(4).unwrap().leaf_depth_variance(), Some(0.0));
        assert_eq!(max_balanced(8).unwrap().leaf_depth_variance(), Some(0.0));

        // depths 1, 2, 3, 3
        let variance = comb(4).unwrap().leaf_depth_variance().unwrap();
        assert!((variance - 11.0 / 12.0).abs() < f64::EPSILON);
    }
}
