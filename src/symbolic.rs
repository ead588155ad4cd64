//! Exact symbolic probabilities in the parameters $\alpha$ and $\gamma$ of the Alpha-Gamma model.
//!
//! A [`Probability`] is a rational function whose numerator is a [`Polynomial`] in
//! $\alpha$ and $\gamma$ with rational coefficients and whose denominator is a product
//! of factors $(m - \alpha)$. This is the only kind of denominator that appears in the
//! models of this crate, so fractions can be kept in lowest terms by trying to divide the
//! numerator by each factor of the denominator. Reduced fractions have a unique
//! representation, which makes structural equality a test of symbolic equality.
//!

use std::{
    collections::BTreeMap,
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub},
};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{pow, One, Signed, Zero};

/// A polynomial in $\alpha$ and $\gamma$ with rational coefficients.
///
/// ```
/// use treeshape::symbolic::Polynomial;
///
/// let p = (Polynomial::integer(1) - Polynomial::alpha()) * (Polynomial::integer(1) + Polynomial::alpha());
/// assert_eq!(p.to_string(), "-α^2 + 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Polynomial {
    /// Non-zero coefficients, keyed by the exponents of $\alpha$ and $\gamma$
    terms: BTreeMap<(u32, u32), BigRational>,
}

impl Polynomial {
    fn monomial(alpha: u32, gamma: u32, coefficient: BigRational) -> Self {
        let mut p = Self::default();
        p.add_term((alpha, gamma), coefficient);
        p
    }

    /// A constant polynomial
    pub fn constant(c: BigRational) -> Self {
        Self::monomial(0, 0, c)
    }

    /// A constant integer polynomial
    pub fn integer(c: i64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(c)))
    }

    /// The polynomial $\alpha$
    pub fn alpha() -> Self {
        Self::monomial(1, 0, BigRational::one())
    }

    /// The polynomial $\gamma$
    pub fn gamma() -> Self {
        Self::monomial(0, 1, BigRational::one())
    }

    /// The polynomial $m - \alpha$
    pub fn shifted_alpha(m: u64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(m))) - Self::alpha()
    }

    fn add_term(&mut self, exponents: (u32, u32), coefficient: BigRational) {
        let sum = self
            .terms
            .remove(&exponents)
            .unwrap_or_else(BigRational::zero)
            + coefficient;
        if !sum.is_zero() {
            self.terms.insert(exponents, sum);
        }
    }

    /// Non-zero terms as `((alpha exponent, gamma exponent), coefficient)`
    pub fn terms(&self) -> impl Iterator<Item = ((u32, u32), &BigRational)> {
        self.terms.iter().map(|(e, c)| (*e, c))
    }

    /// Returns the value of the polynomial if it is constant
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self.terms.get(&(0, 0)).cloned(),
            _ => None,
        }
    }

    /// Evaluates the polynomial for given values of $\alpha$ and $\gamma$
    pub fn evaluate(&self, alpha: &BigRational, gamma: &BigRational) -> BigRational {
        self.terms
            .iter()
            .map(|((i, j), c)| {
                c * pow(alpha.clone(), *i as usize) * pow(gamma.clone(), *j as usize)
            })
            .sum()
    }

    /// Exact division by $(m - \alpha)$, returns `None` if there is a remainder.
    pub fn div_shifted_alpha(&self, m: u64) -> Option<Polynomial> {
        let m = BigRational::from_integer(BigInt::from(m));

        // Dense coefficients in alpha for each power of gamma
        let mut by_gamma: BTreeMap<u32, Vec<BigRational>> = BTreeMap::new();
        for (&(i, j), c) in self.terms.iter() {
            let coefficients = by_gamma.entry(j).or_default();
            if coefficients.len() <= i as usize {
                coefficients.resize(i as usize + 1, BigRational::zero());
            }
            coefficients[i as usize] = c.clone();
        }

        // Synthetic division by (alpha - m), then negate the quotient
        let mut quotient = Polynomial::default();
        for (j, coefficients) in by_gamma {
            let mut carry = BigRational::zero();
            for (i, c) in coefficients.iter().enumerate().rev() {
                carry = c + &m * carry;
                if i > 0 {
                    quotient.add_term((i as u32 - 1, j), -carry.clone());
                }
            }
            if !carry.is_zero() {
                return None;
            }
        }

        Some(quotient)
    }
}

impl Zero for Polynomial {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl One for Polynomial {
    fn one() -> Self {
        Self::integer(1)
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let mut sum = self.clone();
        for (e, c) in rhs.terms.iter() {
            sum.add_term(*e, c.clone());
        }
        sum
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial {
        &self + &rhs
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(mut self) -> Polynomial {
        for c in self.terms.values_mut() {
            *c = -c.clone();
        }
        self
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial {
        self + (-rhs)
    }
}

impl Mul<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut product = Polynomial::default();
        for ((i1, j1), c1) in self.terms.iter() {
            for ((i2, j2), c2) in rhs.terms.iter() {
                product.add_term((i1 + i2, j1 + j2), c1 * c2);
            }
        }
        product
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        &self * &rhs
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }

        for (n, ((i, j), c)) in self.terms.iter().rev().enumerate() {
            match (n, c.is_negative()) {
                (0, true) => write!(f, "-")?,
                (0, false) => {}
                (_, true) => write!(f, " - ")?,
                (_, false) => write!(f, " + ")?,
            }

            let mut factors = vec![];
            let c = c.abs();
            if !c.is_one() || (*i, *j) == (0, 0) {
                factors.push(c.to_string());
            }
            for (symbol, exponent) in [("α", *i), ("γ", *j)] {
                match exponent {
                    0 => {}
                    1 => factors.push(symbol.to_string()),
                    _ => factors.push(format!("{symbol}^{exponent}")),
                }
            }
            write!(f, "{}", factors.join("*"))?;
        }

        Ok(())
    }
}

/// An exact probability: a [`Polynomial`] divided by a product of factors $(m - \alpha)$,
/// always kept in lowest terms.
///
/// ```
/// use num_traits::One;
/// use treeshape::symbolic::{Polynomial, Probability};
///
/// // (2 - α) / (2 - α)
/// let p = Probability::one().scale(&Polynomial::shifted_alpha(2)).div_shifted_alpha(2);
/// assert_eq!(p, Probability::one());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probability {
    numerator: Polynomial,
    /// Exponent of each factor $(m - \alpha)$, keyed by $m$
    denominator: BTreeMap<u64, u32>,
}

impl Probability {
    /// Create a new probability in lowest terms
    pub fn new(numerator: Polynomial, denominator: impl IntoIterator<Item = (u64, u32)>) -> Self {
        let mut factors = BTreeMap::new();
        for (m, e) in denominator {
            *factors.entry(m).or_insert(0) += e;
        }
        Self {
            numerator,
            denominator: factors,
        }
        .reduce()
    }

    /// A constant rational probability
    pub fn ratio(value: BigRational) -> Self {
        Self::new(Polynomial::constant(value), [])
    }

    /// Numerator of the reduced fraction
    pub fn numerator(&self) -> &Polynomial {
        &self.numerator
    }

    /// Factors $(m - \alpha)^e$ of the reduced denominator, as `(m, e)` pairs
    pub fn denominator_factors(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.denominator.iter().map(|(m, e)| (*m, *e))
    }

    /// Expanded denominator of the reduced fraction
    pub fn denominator(&self) -> Polynomial {
        expand(self.denominator_factors())
    }

    /// Returns the value of the probability if it does not depend on $\alpha$ or $\gamma$
    pub fn as_constant(&self) -> Option<BigRational> {
        if self.denominator.is_empty() {
            self.numerator.as_constant()
        } else {
            None
        }
    }

    /// Multiplies the probability by a polynomial
    pub fn scale(&self, factor: &Polynomial) -> Self {
        Self {
            numerator: &self.numerator * factor,
            denominator: self.denominator.clone(),
        }
        .reduce()
    }

    /// Divides the probability by $(m - \alpha)$
    pub fn div_shifted_alpha(&self, m: u64) -> Self {
        let mut denominator = self.denominator.clone();
        *denominator.entry(m).or_insert(0) += 1;
        Self {
            numerator: self.numerator.clone(),
            denominator,
        }
        .reduce()
    }

    /// Evaluates the probability for given values of $\alpha$ and $\gamma$.
    /// Returns `None` if the denominator vanishes.
    pub fn evaluate(&self, alpha: &BigRational, gamma: &BigRational) -> Option<BigRational> {
        let denominator = self.denominator().evaluate(alpha, gamma);
        if denominator.is_zero() {
            return None;
        }
        Some(self.numerator.evaluate(alpha, gamma) / denominator)
    }

    fn reduce(mut self) -> Self {
        if self.numerator.is_zero() {
            self.denominator.clear();
            return self;
        }

        for (m, e) in self.denominator.iter_mut() {
            while *e > 0 {
                match self.numerator.div_shifted_alpha(*m) {
                    Some(quotient) => {
                        self.numerator = quotient;
                        *e -= 1;
                    }
                    None => break,
                }
            }
        }
        self.denominator.retain(|_, e| *e > 0);

        self
    }
}

/// Product of factors $(m - \alpha)^e$
fn expand(factors: impl Iterator<Item = (u64, u32)>) -> Polynomial {
    factors.fold(Polynomial::one(), |product, (m, e)| {
        (0..e).fold(product, |p, _| p * Polynomial::shifted_alpha(m))
    })
}

impl Add<&Probability> for &Probability {
    type Output = Probability;

    fn add(self, rhs: &Probability) -> Probability {
        let mut common = self.denominator.clone();
        for (m, e) in rhs.denominator.iter() {
            let entry = common.entry(*m).or_insert(0);
            *entry = (*entry).max(*e);
        }

        // Factors missing from each denominator to reach the common one
        let missing = |denominator: &BTreeMap<u64, u32>| {
            expand(
                common
                    .iter()
                    .map(|(m, e)| (*m, e - denominator.get(m).copied().unwrap_or(0))),
            )
        };

        let numerator = &self.numerator * &missing(&self.denominator)
            + &rhs.numerator * &missing(&rhs.denominator);

        Probability::new(numerator, common)
    }
}

impl Add for Probability {
    type Output = Probability;

    fn add(self, rhs: Probability) -> Probability {
        &self + &rhs
    }
}

impl Mul<&Probability> for &Probability {
    type Output = Probability;

    fn mul(self, rhs: &Probability) -> Probability {
        Probability::new(
            &self.numerator * &rhs.numerator,
            self.denominator_factors().chain(rhs.denominator_factors()),
        )
    }
}

impl Mul for Probability {
    type Output = Probability;

    fn mul(self, rhs: Probability) -> Probability {
        &self * &rhs
    }
}

impl Zero for Probability {
    fn zero() -> Self {
        Self::new(Polynomial::zero(), [])
    }

    fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }
}

impl One for Probability {
    fn one() -> Self {
        Self::new(Polynomial::one(), [])
    }
}

impl Sum for Probability {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Probability::zero(), |total, p| total + p)
    }
}

impl<'a> Sum<&'a Probability> for Probability {
    fn sum<I: Iterator<Item = &'a Probability>>(iter: I) -> Self {
        iter.fold(Probability::zero(), |total, p| &total + p)
    }
}

impl Display for Probability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denominator.is_empty() {
            return write!(f, "{}", self.numerator);
        }

        if self.numerator.terms.len() > 1 {
            write!(f, "({})", self.numerator)?;
        } else {
            write!(f, "{}", self.numerator)?;
        }

        let factors: Vec<String> = self
            .denominator_factors()
            .map(|(m, e)| match e {
                1 => format!("({m} - α)"),
                _ => format!("({m} - α)^{e}"),
            })
            .collect();
        write!(f, " / {}", factors.join("*"))
    }
}
