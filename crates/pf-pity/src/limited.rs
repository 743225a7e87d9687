//! Limited item model — pulls until the pickup item under the guarantee rule
//!
//! The first rare draw is the pickup with probability `g`. If it is not, the
//! next rare draw is guaranteed to be the pickup. Both rare draws are bounded
//! by hard pity `N`, so the result covers `0..=2N`.

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::curve::{CurveKind, CurveParams, RarityCurve};
use crate::distribution::{PullDistribution, check_mass};
use crate::occurrence::OccurrenceDistribution;
use crate::rational::{Prob, is_probability, prob_serde, ratio};
use crate::{PityError, PityResult};

/// Odds of the first rare draw being the pickup item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerParams {
    /// Base pickup rate of a rare draw (1/2 for characters, 3/4 for light cones)
    #[serde(with = "prob_serde")]
    pub pickup_rate: Prob,

    /// Chance that a lost pickup roll is still converted into the pickup
    #[serde(with = "prob_serde", default = "Prob::zero")]
    pub loss_recovery: Prob,
}

impl BannerParams {
    pub fn for_kind(kind: CurveKind) -> Self {
        let pickup_rate = match kind {
            CurveKind::Character => ratio(1, 2),
            CurveKind::LightCone => ratio(3, 4),
        };
        Self { pickup_rate, loss_recovery: Prob::zero() }
    }

    /// Effective probability the first rare draw is the pickup
    pub fn guarantee_prob(&self) -> Prob {
        &self.pickup_rate + (Prob::one() - &self.pickup_rate) * &self.loss_recovery
    }

    pub fn validate(&self) -> PityResult<()> {
        for (name, value) in [("pickup_rate", &self.pickup_rate), ("loss_recovery", &self.loss_recovery)] {
            if !is_probability(value) {
                return Err(PityError::InvalidConfig(format!("{name} {value} is not a probability")));
            }
        }
        Ok(())
    }
}

/// Curve and pickup odds of one banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerConfig {
    pub curve: CurveParams,
    pub banner: BannerParams,
}

impl BannerConfig {
    pub fn for_kind(kind: CurveKind) -> Self {
        Self {
            curve: CurveParams::for_kind(kind),
            banner: BannerParams::for_kind(kind),
        }
    }

    pub fn validate(&self) -> PityResult<()> {
        self.curve.validate()?;
        self.banner.validate()
    }

    /// Pulls needed to obtain one copy of this banner's pickup
    pub fn pickup_distribution(&self) -> PityResult<PullDistribution> {
        self.banner.validate()?;
        let curve = RarityCurve::from_params(&self.curve)?;
        let occurrence = OccurrenceDistribution::from_curve(&curve)?;
        limited_distribution(&occurrence, &self.banner.guarantee_prob())
    }
}

/// Distribution of pulls until the pickup item, over `0..=2N`
pub fn limited_distribution(
    occurrence: &OccurrenceDistribution,
    guarantee_prob: &Prob,
) -> PityResult<PullDistribution> {
    if !is_probability(guarantee_prob) {
        return Err(PityError::InvalidConfig(format!(
            "guarantee probability {guarantee_prob} is not a probability"
        )));
    }

    let n = occurrence.hard_pity();
    let occ = occurrence.probs();
    let lose = Prob::one() - guarantee_prob;

    // Scale the first rare draw by the loss odds once rather than per split
    let lost_first: Vec<Prob> = occ.iter().map(|p| p * &lose).collect();

    let mut probs = vec![Prob::zero(); 2 * n + 1];
    for (i, slot) in probs.iter_mut().enumerate().skip(1) {
        let mut prob = Prob::zero();

        if i <= n {
            prob += &occ[i] * guarantee_prob;
        }

        // First rare draw (lost) at j, guaranteed pickup i - j pulls later
        let lo = 1.max(i.saturating_sub(n));
        let hi = n.min(i - 1);
        for j in lo..=hi {
            prob += &lost_first[j] * &occ[i - j];
        }

        *slot = prob;
    }

    check_mass(&probs, "limited distribution")?;
    Ok(PullDistribution::from_checked(probs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(kind: CurveKind) -> OccurrenceDistribution {
        OccurrenceDistribution::from_curve(&RarityCurve::for_kind(kind)).unwrap()
    }

    fn two_pull_occurrence() -> OccurrenceDistribution {
        let params = CurveParams {
            base_rate: ratio(1, 2),
            flat_pulls: 1,
            step: Prob::zero(),
            hard_pity: 2,
        };
        OccurrenceDistribution::from_curve(&RarityCurve::from_params(&params).unwrap()).unwrap()
    }

    #[test]
    fn test_limited_sums_to_one_for_any_guarantee() {
        let occ = occurrence(CurveKind::LightCone);
        for g in [ratio(0, 1), ratio(1, 2), ratio(3, 4), ratio(1, 1), ratio(25, 32)] {
            let dist = limited_distribution(&occ, &g).unwrap();
            assert_eq!(dist.len(), 2 * 80 + 1);
            assert!(dist.total_mass().is_one(), "guarantee {g}");
        }
    }

    #[test]
    fn test_certain_pickup_equals_occurrence() {
        let occ = occurrence(CurveKind::Character);
        let dist = limited_distribution(&occ, &Prob::one()).unwrap();
        for i in 0..=90 {
            assert_eq!(dist.get(i), occ.get(i), "pull {i}");
        }
        assert!(dist.probs()[91..].iter().all(Zero::is_zero));
    }

    #[test]
    fn test_small_case_by_hand() {
        // occ = [0, 1/2, 1/2], g = 1/2
        let dist = limited_distribution(&two_pull_occurrence(), &ratio(1, 2)).unwrap();
        assert_eq!(
            dist.probs(),
            &[Prob::zero(), ratio(1, 4), ratio(3, 8), ratio(1, 4), ratio(1, 8)]
        );
    }

    #[test]
    fn test_invalid_guarantee_rejected() {
        let occ = two_pull_occurrence();
        assert!(matches!(
            limited_distribution(&occ, &ratio(5, 4)),
            Err(PityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_guarantee_prob_with_recovery() {
        let mut banner = BannerParams::for_kind(CurveKind::Character);
        assert_eq!(banner.guarantee_prob(), ratio(1, 2));
        banner.loss_recovery = ratio(1, 8);
        assert_eq!(banner.guarantee_prob(), ratio(9, 16));

        let mut banner = BannerParams::for_kind(CurveKind::LightCone);
        banner.loss_recovery = ratio(1, 8);
        assert_eq!(banner.guarantee_prob(), ratio(25, 32));
    }

    #[test]
    fn test_pickup_distribution_support() {
        let dist = BannerConfig::for_kind(CurveKind::LightCone).pickup_distribution().unwrap();
        assert_eq!(dist.support(), Some((1, 160)));
        assert!(dist.get(0).is_zero());
    }
}
