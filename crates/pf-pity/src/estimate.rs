//! Expected pull counts and spend for a bundle of pickups
//!
//! Expectations are additive, so a bundle estimate needs only the two
//! single-pickup distributions, not a convolved grid.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::curve::CurveKind;
use crate::rational::{Prob, integer, prob_serde, ratio, to_f64};
use crate::stats::SummaryStatistics;
use crate::PityResult;

/// Currency cost of pulls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    /// Cost of one pull, default ¥12000 per 8080 premium currency at 160 per pull
    #[serde(with = "prob_serde")]
    pub currency_per_pull: Prob,

    /// Display label for the currency
    pub currency: String,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            currency_per_pull: ratio(12000 * 160, 8080),
            currency: "JPY".to_string(),
        }
    }
}

/// Expected pulls needed for one pickup of `kind`
pub fn expected_pulls(config: &EngineConfig, kind: CurveKind) -> PityResult<Prob> {
    let dist = config.banner(kind).pickup_distribution()?;
    Ok(SummaryStatistics::with_precision(&dist, config.sqrt_digits).expected().clone())
}

/// Expected pulls and spend for `characters` character pickups plus `light_cones` light cones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEstimate {
    pub characters: usize,
    pub light_cones: usize,
    pub expected_pulls: Prob,
    pub expected_cost: Prob,
}

impl BundleEstimate {
    pub fn compute(config: &EngineConfig, characters: usize, light_cones: usize) -> PityResult<Self> {
        let character = expected_pulls(config, CurveKind::Character)?;
        let light_cone = expected_pulls(config, CurveKind::LightCone)?;
        Ok(Self::from_expectations(&config.pricing, &character, &light_cone, characters, light_cones))
    }

    /// Combine already computed per-pickup expectations
    pub fn from_expectations(
        pricing: &Pricing,
        character: &Prob,
        light_cone: &Prob,
        characters: usize,
        light_cones: usize,
    ) -> Self {
        let expected_pulls = character * integer(characters) + light_cone * integer(light_cones);
        let expected_cost = &expected_pulls * &pricing.currency_per_pull;

        Self { characters, light_cones, expected_pulls, expected_cost }
    }

    pub fn expected_pulls_f64(&self) -> f64 {
        to_f64(&self.expected_pulls)
    }

    pub fn expected_cost_f64(&self) -> f64 {
        to_f64(&self.expected_cost)
    }
}
