//! Summary statistics over a pull-count distribution

use num_traits::Zero;

use crate::distribution::PullDistribution;
use crate::rational::{Prob, Root, SQRT_DIGITS, integer, sqrt};

/// Derived, read-only view over a [`PullDistribution`]
#[derive(Debug, Clone)]
pub struct SummaryStatistics<'a> {
    dist: &'a PullDistribution,
    expected: Prob,
    expected_squared: Prob,
    standard_deviation: Root,
}

impl<'a> SummaryStatistics<'a> {
    /// Statistics with the default square-root precision
    pub fn new(dist: &'a PullDistribution) -> Self {
        Self::with_precision(dist, SQRT_DIGITS)
    }

    /// Statistics keeping `sqrt_digits` fractional digits of an irrational deviation
    pub fn with_precision(dist: &'a PullDistribution, sqrt_digits: u32) -> Self {
        let mut expected = Prob::zero();
        let mut expected_squared = Prob::zero();
        for (i, p) in dist.probs().iter().enumerate() {
            if p.is_zero() {
                continue;
            }
            let weighted = integer(i) * p;
            expected_squared += &weighted * integer(i);
            expected += weighted;
        }

        let variance = &expected_squared - &expected * &expected;
        let standard_deviation = sqrt(&variance, sqrt_digits);

        Self { dist, expected, expected_squared, standard_deviation }
    }

    /// `Σ i·P(i)`
    pub fn expected(&self) -> &Prob {
        &self.expected
    }

    /// `Σ i²·P(i)`
    pub fn expected_squared(&self) -> &Prob {
        &self.expected_squared
    }

    pub fn variance(&self) -> Prob {
        &self.expected_squared - &self.expected * &self.expected
    }

    /// Exact when the variance is a rational square, truncated decimal otherwise
    pub fn standard_deviation(&self) -> &Root {
        &self.standard_deviation
    }

    /// True when all mass sits on one pull count, making scores undefined
    pub fn is_degenerate(&self) -> bool {
        self.standard_deviation.value.is_zero()
    }

    /// Running prefix sums; the last value is exactly one
    pub fn cumulative(&self) -> Vec<Prob> {
        self.dist
            .probs()
            .iter()
            .scan(Prob::zero(), |acc, p| {
                *acc += p;
                Some(acc.clone())
            })
            .collect()
    }

    /// `10·(i - E)/σ + 50`, or `None` when σ is zero
    pub fn normalized_score(&self, i: usize) -> Option<Prob> {
        if self.is_degenerate() {
            return None;
        }
        let z = (integer(i) - &self.expected) / &self.standard_deviation.value;
        Some(z * integer(10) + integer(50))
    }

    /// Score for every pull count of the distribution
    pub fn normalized_scores(&self) -> Vec<Option<Prob>> {
        (0..self.dist.len()).map(|i| self.normalized_score(i)).collect()
    }
}
