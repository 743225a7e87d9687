//! Pull-count distributions and their convolution

use num_traits::{One, Signed, Zero};

use crate::rational::Prob;
use crate::{PityError, PityResult};

/// Fail with [`PityError::InvariantViolation`] unless `probs` sums to exactly one
pub(crate) fn check_mass(probs: &[Prob], stage: &str) -> PityResult<()> {
    let mass: Prob = probs.iter().sum();
    if mass.is_one() {
        Ok(())
    } else {
        log::error!("{stage}: probability mass {mass} is not 1");
        Err(PityError::InvariantViolation {
            stage: stage.to_string(),
            mass: mass.to_string(),
        })
    }
}

/// `P(exactly i pulls)` for `i` in `0..len`.
///
/// Immutable once built; combining two distributions always yields a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullDistribution {
    probs: Vec<Prob>,
}

impl PullDistribution {
    /// Certainty of zero pulls, the identity of [`convolve`]
    pub fn unit() -> Self {
        Self { probs: vec![Prob::one()] }
    }

    /// Validated constructor: non-empty, non-negative, unit mass
    pub fn from_probs(probs: Vec<Prob>) -> PityResult<Self> {
        if probs.is_empty() {
            return Err(PityError::InvalidInput("empty distribution".into()));
        }
        if let Some(i) = probs.iter().position(|p| p.is_negative()) {
            return Err(PityError::InvalidInput(format!("negative probability at index {i}")));
        }
        let mass: Prob = probs.iter().sum();
        if !mass.is_one() {
            return Err(PityError::InvalidInput(format!(
                "distribution mass is {mass}, expected exactly 1"
            )));
        }
        Ok(Self { probs })
    }

    /// Wrap a sequence whose mass the caller has already checked
    pub(crate) fn from_checked(probs: Vec<Prob>) -> Self {
        Self { probs }
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    pub fn probs(&self) -> &[Prob] {
        &self.probs
    }

    /// Probability of exactly `i` pulls; zero past the end
    pub fn get(&self, i: usize) -> Prob {
        self.probs.get(i).cloned().unwrap_or_else(Prob::zero)
    }

    pub fn total_mass(&self) -> Prob {
        self.probs.iter().sum()
    }

    /// First and last pull counts with non-zero probability
    pub fn support(&self) -> Option<(usize, usize)> {
        let first = self.probs.iter().position(|p| !p.is_zero())?;
        let last = self.probs.iter().rposition(|p| !p.is_zero())?;
        Some((first, last))
    }

    /// Re-check the unit-mass invariant, labelling failures with `stage`
    pub fn ensure_normalized(&self, stage: &str) -> PityResult<()> {
        check_mass(&self.probs, stage)
    }

    /// Convolve with `other` and assert the result still has unit mass
    pub fn convolve_checked(&self, other: &Self, stage: &str) -> PityResult<Self> {
        let result = convolve(self, other);
        result.ensure_normalized(stage)?;
        Ok(result)
    }
}

/// Distribution of the sum of two independent pull counts.
///
/// `result[k] = Σ_{i+j=k} a[i]·b[j]`, length `a.len() + b.len() - 1`.
pub fn convolve(a: &PullDistribution, b: &PullDistribution) -> PullDistribution {
    let mut probs = vec![Prob::zero(); a.len() + b.len() - 1];

    for (i, pa) in a.probs.iter().enumerate() {
        if pa.is_zero() {
            continue;
        }
        for (j, pb) in b.probs.iter().enumerate() {
            if !pb.is_zero() {
                probs[i + j] += pa * pb;
            }
        }
    }

    PullDistribution { probs }
}
