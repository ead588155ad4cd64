use std::{
    collections::BTreeMap,
    fmt::Display,
    ops::{Add, Mul},
};

use num_bigint::{BigInt, BigUint};
use num_traits::{pow, One, Zero};

use crate::shape::{Shape, ShapeError};

/// A polynomial in $x$ and $y$ with non-negative integer coefficients, as used by
/// the tree-distinguishing polynomial of Liu.
///
/// The Liu polynomial of a leaf is $x$, and the Liu polynomial of an internal node is $y$
/// plus the product of the polynomials of its children. Two shapes have the same
/// polynomial iff they are isomorphic.
///
/// ```
/// use treeshape::{balance::LiuPolynomial, shape::generator::comb};
///
/// let p = comb(3).unwrap().liu_polynomial();
/// assert_eq!(p.to_string(), "x^3 + x*y + y");
/// assert_eq!(p, LiuPolynomial::comb(3).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LiuPolynomial {
    // (degree in x, degree in y) -> non-zero coefficient
    terms: BTreeMap<(u32, u32), BigUint>,
}

impl LiuPolynomial {
    fn monomial(x_degree: u32, y_degree: u32, coefficient: BigUint) -> Self {
        let mut p = Self::default();
        p.add_term((x_degree, y_degree), coefficient);
        p
    }

    /// The polynomial $x$, of a leaf
    pub fn x() -> Self {
        Self::monomial(1, 0, BigUint::one())
    }

    /// The polynomial $y$
    pub fn y() -> Self {
        Self::monomial(0, 1, BigUint::one())
    }

    fn add_term(&mut self, degrees: (u32, u32), coefficient: BigUint) {
        if coefficient.is_zero() {
            return;
        }
        *self.terms.entry(degrees).or_insert_with(BigUint::zero) += coefficient;
    }

    /// Iterates over the `((degree in x, degree in y), coefficient)` pairs of the
    /// non-zero terms, in increasing order of degrees
    pub fn terms(&self) -> impl Iterator<Item = ((u32, u32), &BigUint)> {
        self.terms.iter().map(|(degrees, c)| (*degrees, c))
    }

    /// Returns the coefficient of $x^i y^j$
    pub fn coefficient(&self, x_degree: u32, y_degree: u32) -> BigUint {
        self.terms
            .get(&(x_degree, y_degree))
            .cloned()
            .unwrap_or_else(BigUint::zero)
    }

    /// Evaluates the polynomial at $(x, y)$
    pub fn evaluate(&self, x: &BigInt, y: &BigInt) -> BigInt {
        self.terms
            .iter()
            .map(|(&(i, j), c)| {
                BigInt::from(c.clone()) * pow(x.clone(), i as usize) * pow(y.clone(), j as usize)
            })
            .sum()
    }

    /// Number of monomials counted with multiplicity, i.e. the sum of the coefficients
    pub fn number_monomials(&self) -> BigUint {
        self.terms.values().sum()
    }

    /// Closed form of the Liu polynomial of the comb with `n` leaves:
    /// $x^n + y \sum_{i=0}^{n-2} x^i$
    pub fn comb(n: usize) -> Result<Self, ShapeError> {
        if n == 0 {
            return Err(ShapeError::NoLeaves);
        }
        let mut p = Self::monomial(n as u32, 0, BigUint::one());
        for i in 0..n - 1 {
            p.add_term((i as u32, 1), BigUint::one());
        }
        Ok(p)
    }

    /// Liu polynomial of the maximally balanced shape with `n` leaves, computed from the
    /// recurrence $P_n = y + P_{\lfloor n/2 \rfloor} P_{\lceil n/2 \rceil}$
    pub fn max_balanced(n: usize) -> Result<Self, ShapeError> {
        if n == 0 {
            return Err(ShapeError::NoLeaves);
        }
        Ok(max_balanced_memoized(n, &mut BTreeMap::new()))
    }
}

fn max_balanced_memoized(n: usize, memo: &mut BTreeMap<usize, LiuPolynomial>) -> LiuPolynomial {
    if let Some(p) = memo.get(&n) {
        return p.clone();
    }
    let p = if n == 1 {
        LiuPolynomial::x()
    } else {
        let low = max_balanced_memoized(n / 2, memo);
        let high = max_balanced_memoized(n - n / 2, memo);
        &low * &high + LiuPolynomial::y()
    };
    memo.insert(n, p.clone());
    p
}

impl Zero for LiuPolynomial {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl One for LiuPolynomial {
    fn one() -> Self {
        Self::monomial(0, 0, BigUint::one())
    }
}

impl Add<&LiuPolynomial> for &LiuPolynomial {
    type Output = LiuPolynomial;

    fn add(self, rhs: &LiuPolynomial) -> LiuPolynomial {
        let mut sum = self.clone();
        for (degrees, c) in rhs.terms() {
            sum.add_term(degrees, c.clone());
        }
        sum
    }
}

impl Add for LiuPolynomial {
    type Output = LiuPolynomial;

    fn add(self, rhs: LiuPolynomial) -> LiuPolynomial {
        &self + &rhs
    }
}

impl Mul<&LiuPolynomial> for &LiuPolynomial {
    type Output = LiuPolynomial;

    fn mul(self, rhs: &LiuPolynomial) -> LiuPolynomial {
        let mut product = LiuPolynomial::zero();
        for ((i1, j1), c1) in self.terms() {
            for ((i2, j2), c2) in rhs.terms() {
                product.add_term((i1 + i2, j1 + j2), c1 * c2);
            }
        }
        product
    }
}

impl Mul for LiuPolynomial {
    type Output = LiuPolynomial;

    fn mul(self, rhs: LiuPolynomial) -> LiuPolynomial {
        &self * &rhs
    }
}

/// Terms are written by decreasing degree in $x$, then in $y$
impl Display for LiuPolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        for (n, (&(i, j), c)) in self.terms.iter().rev().enumerate() {
            if n > 0 {
                write!(f, " + ")?;
            }

            let mut factors = vec![];
            if !c.is_one() || (i == 0 && j == 0) {
                factors.push(c.to_string());
            }
            for (variable, degree) in [("x", i), ("y", j)] {
                match degree {
                    0 => {}
                    1 => factors.push(variable.to_string()),
                    _ => factors.push(format!("{variable}^{degree}")),
                }
            }
            write!(f, "{}", factors.join("*"))?;
        }

        Ok(())
    }
}

/// Methods that compute the Liu polynomial of the [`Shape`]
///
/// ----
/// ----
impl Shape {
    /// Computes the Liu polynomial of the shape, a complete isomorphism invariant
    /// (see [`LiuPolynomial`]).
    pub fn liu_polynomial(&self) -> LiuPolynomial {
        self.fold(|node, children: Vec<LiuPolynomial>| {
            if node.is_leaf() {
                LiuPolynomial::x()
            } else {
                children
                    .iter()
                    .fold(LiuPolynomial::one(), |product, child| &product * child)
                    + LiuPolynomial::y()
            }
        })
    }

    /// Number of monomials, counted with multiplicity, of the Liu polynomial of the shape.
    ///
    /// ```
    /// use num_bigint::BigUint;
    /// use treeshape::shape::generator::{comb, max_balanced};
    ///
    /// assert_eq!(comb(6).unwrap().liu_balance(), BigUint::from(6u32));
    /// assert_eq!(max_balanced(4).unwrap().liu_balance(), BigUint::from(5u32));
    /// ```
    pub fn liu_balance(&self) -> BigUint {
        self.liu_polynomial().number_monomials()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::shape::generator::{comb, max_balanced, star, ShapeGenerator};

    #[test]
    fn known_polynomials() {
        let test_cases = vec![
            (Shape::leaf(), "x"),
            (Shape::cherry(), "x^2 + y"),
            (star(4).unwrap(), "x^4 + y"),
            (max_balanced(4).unwrap(), "x^4 + 2*x^2*y + y^2 + y"),
            (
                Shape::sorted_node(vec![Shape::leaf(), Shape::cherry(), star(3).unwrap()]).unwrap(),
                "x^6 + x^4*y + x^3*y + x*y^2 + y",
            ),
        ];

        for (shape, repr) in test_cases {
            assert_eq!(shape.liu_polynomial().to_string(), repr, "{shape}");
        }

        let p = max_balanced(4).unwrap().liu_polynomial();
        assert_eq!(p.coefficient(2, 1), BigUint::from(2u32));
        assert_eq!(p.coefficient(1, 1), BigUint::zero());
        assert_eq!(p.number_monomials(), BigUint::from(5u32));
        assert_eq!(LiuPolynomial::zero().to_string(), "0");
    }

    #[test]
    fn closed_forms() {
        assert_eq!(LiuPolynomial::comb(0), Err(ShapeError::NoLeaves));
        assert_eq!(LiuPolynomial::max_balanced(0), Err(ShapeError::NoLeaves));

        for n in 1..=40 {
            assert_eq!(
                comb(n).unwrap().liu_polynomial(),
                LiuPolynomial::comb(n).unwrap(),
                "n={n}"
            );
            assert_eq!(
                max_balanced(n).unwrap().liu_polynomial(),
                LiuPolynomial::max_balanced(n).unwrap(),
                "n={n}"
            );
            assert_eq!(comb(n).unwrap().liu_balance(), BigUint::from(n));
        }
    }

    #[test]
    fn distinguishes_shapes() {
        let generator = ShapeGenerator::new();
        let mut polynomials = HashSet::new();
        let mut count = 0;

        for n in 1..=8 {
            for shape in generator.all_shapes(n).iter() {
                polynomials.insert(shape.liu_polynomial());
                count += 1;
            }
        }

        assert_eq!(count, 405);
        assert_eq!(polynomials.len(), count);
    }

    #[test]
    fn evaluations() {
        let generator = ShapeGenerator::new();
        let zero = BigInt::zero();
        let one = BigInt::one();

        for n in 1..=7 {
            for shape in generator.all_shapes(n).iter() {
                let p = shape.liu_polynomial();
                // without the y terms only the product of the leaves is left
                assert_eq!(p.evaluate(&BigInt::from(2), &zero), BigInt::from(1u64 << n));
                assert_eq!(p.evaluate(&one, &one), BigInt::from(p.number_monomials()));
                assert_eq!(p.coefficient(n as u32, 0), BigUint::one());
            }
        }
    }
}
