//! Rarity curve — per-pull rare-draw probability under soft pity

use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::rational::{Prob, integer, is_probability, prob_serde, ratio};
use crate::{PityError, PityResult};

/// Character banner: base rare rate
pub const CHARACTER_BASE_RATE: (i64, i64) = (6, 1000);
/// Character banner: pulls at the flat base rate
pub const CHARACTER_FLAT_PULLS: usize = 73;
/// Character banner: rate increase per pull past the flat region
pub const CHARACTER_STEP: (i64, i64) = (6, 100);
/// Character banner: pull count at which a rare draw is certain
pub const CHARACTER_HARD_PITY: usize = 90;

/// Light cone banner: base rare rate
pub const LIGHT_CONE_BASE_RATE: (i64, i64) = (8, 1000);
/// Light cone banner: pulls at the flat base rate
pub const LIGHT_CONE_FLAT_PULLS: usize = 65;
/// Light cone banner: rate increase per pull past the flat region
pub const LIGHT_CONE_STEP: (i64, i64) = (992, 15000);
/// Light cone banner: pull count at which a rare draw is certain
pub const LIGHT_CONE_HARD_PITY: usize = 80;

/// Banner kind with its own pity curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Character-type banner
    Character,
    /// Equipment-type banner
    LightCone,
}

impl CurveKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::LightCone => "light_cone",
        }
    }
}

/// Shape of a soft-pity curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Rate over the flat region
    #[serde(with = "prob_serde")]
    pub base_rate: Prob,

    /// Number of pulls at the base rate (pulls `1..=flat_pulls`)
    pub flat_pulls: usize,

    /// Linear increase per pull after the flat region
    #[serde(with = "prob_serde")]
    pub step: Prob,

    /// First pull at which a rare draw is certain
    pub hard_pity: usize,
}

impl CurveParams {
    /// Parameters of the built-in curve for `kind`
    pub fn for_kind(kind: CurveKind) -> Self {
        match kind {
            CurveKind::Character => Self {
                base_rate: ratio(CHARACTER_BASE_RATE.0, CHARACTER_BASE_RATE.1),
                flat_pulls: CHARACTER_FLAT_PULLS,
                step: ratio(CHARACTER_STEP.0, CHARACTER_STEP.1),
                hard_pity: CHARACTER_HARD_PITY,
            },
            CurveKind::LightCone => Self {
                base_rate: ratio(LIGHT_CONE_BASE_RATE.0, LIGHT_CONE_BASE_RATE.1),
                flat_pulls: LIGHT_CONE_FLAT_PULLS,
                step: ratio(LIGHT_CONE_STEP.0, LIGHT_CONE_STEP.1),
                hard_pity: LIGHT_CONE_HARD_PITY,
            },
        }
    }

    /// Rate at pull `i` (1-based) before the hard-pity override
    fn rate_at(&self, i: usize) -> Prob {
        if i <= self.flat_pulls {
            self.base_rate.clone()
        } else {
            &self.base_rate + &self.step * integer(i - self.flat_pulls)
        }
    }

    /// Check the parameters describe a valid monotone curve
    pub fn validate(&self) -> PityResult<()> {
        if self.hard_pity == 0 {
            return Err(PityError::InvalidConfig("hard_pity must be at least 1".into()));
        }
        if self.flat_pulls >= self.hard_pity {
            return Err(PityError::InvalidConfig(format!(
                "flat_pulls ({}) must be below hard_pity ({})",
                self.flat_pulls, self.hard_pity
            )));
        }
        if !is_probability(&self.base_rate) {
            return Err(PityError::InvalidConfig(format!(
                "base_rate {} is not a probability",
                self.base_rate
            )));
        }
        if self.step.is_negative() {
            return Err(PityError::InvalidConfig(format!("step {} is negative", self.step)));
        }
        // The ramp is increasing, so its last value before hard pity bounds every other one
        if self.hard_pity > 1 {
            let peak = self.rate_at(self.hard_pity - 1);
            if peak > Prob::one() {
                return Err(PityError::InvalidConfig(format!(
                    "ramp exceeds certainty before hard pity: rate {} at pull {}",
                    peak,
                    self.hard_pity - 1
                )));
            }
        }
        Ok(())
    }
}

/// Per-pull probability of drawing any rare item.
///
/// Index 0 is a zero sentinel so indexing matches pull numbers; indices
/// `1..=hard_pity` hold the curve. The last value is exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RarityCurve {
    probs: Vec<Prob>,
}

impl RarityCurve {
    /// Built-in curve for `kind`
    pub fn for_kind(kind: CurveKind) -> Self {
        Self::generate(&CurveParams::for_kind(kind))
    }

    /// Curve from user-supplied parameters
    pub fn from_params(params: &CurveParams) -> PityResult<Self> {
        params.validate()?;
        Ok(Self::generate(params))
    }

    fn generate(params: &CurveParams) -> Self {
        let mut probs = Vec::with_capacity(params.hard_pity + 1);
        probs.push(Prob::zero());
        probs.extend((1..params.hard_pity).map(|i| params.rate_at(i)));
        probs.push(Prob::one());
        Self { probs }
    }

    /// Pull count at which a rare draw is certain
    pub fn hard_pity(&self) -> usize {
        self.probs.len() - 1
    }

    /// Rate at pull `i`; `None` past hard pity
    pub fn get(&self, i: usize) -> Option<&Prob> {
        self.probs.get(i)
    }

    /// Full sequence including the index-0 sentinel
    pub fn probs(&self) -> &[Prob] {
        &self.probs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_curve_shape() {
        let curve = RarityCurve::for_kind(CurveKind::Character);
        assert_eq!(curve.hard_pity(), 90);
        assert_eq!(curve.probs().len(), 91);
        assert!(curve.get(0).unwrap().is_zero());
        assert_eq!(curve.get(1).unwrap(), &ratio(6, 1000));
        assert_eq!(curve.get(73).unwrap(), &ratio(6, 1000));
        assert_eq!(curve.get(74).unwrap(), &ratio(66, 1000));
        assert_eq!(curve.get(89).unwrap(), &ratio(966, 1000));
        assert_eq!(curve.get(90).unwrap(), &Prob::one());
        assert!(curve.get(91).is_none());
    }

    #[test]
    fn test_light_cone_curve_shape() {
        let curve = RarityCurve::for_kind(CurveKind::LightCone);
        assert_eq!(curve.hard_pity(), 80);
        assert_eq!(curve.get(65).unwrap(), &ratio(8, 1000));
        assert_eq!(curve.get(66).unwrap(), &(ratio(8, 1000) + ratio(992, 15000)));
        assert_eq!(curve.get(80).unwrap(), &Prob::one());
    }

    #[test]
    fn test_curves_are_monotone_probabilities() {
        for kind in [CurveKind::Character, CurveKind::LightCone] {
            let curve = RarityCurve::for_kind(kind);
            let probs = &curve.probs()[1..];
            assert!(probs.iter().all(is_probability), "{}", kind.name());
            assert!(probs.windows(2).all(|w| w[0] <= w[1]), "{}", kind.name());
            assert_eq!(probs.last().unwrap(), &Prob::one());
        }
    }

    #[test]
    fn test_builtin_params_validate() {
        assert!(CurveParams::for_kind(CurveKind::Character).validate().is_ok());
        assert!(CurveParams::for_kind(CurveKind::LightCone).validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = CurveParams::for_kind(CurveKind::Character);
        params.flat_pulls = 90;
        assert!(matches!(RarityCurve::from_params(&params), Err(PityError::InvalidConfig(_))));

        let mut params = CurveParams::for_kind(CurveKind::Character);
        params.step = ratio(1, 10);
        assert!(RarityCurve::from_params(&params).is_err());

        let mut params = CurveParams::for_kind(CurveKind::Character);
        params.base_rate = ratio(3, 2);
        assert!(RarityCurve::from_params(&params).is_err());

        let mut params = CurveParams::for_kind(CurveKind::Character);
        params.hard_pity = 0;
        params.flat_pulls = 0;
        assert!(RarityCurve::from_params(&params).is_err());
    }

    #[test]
    fn test_params_deserialize_from_strings() {
        let params: CurveParams = serde_json::from_str(
            r#"{"base_rate":"6/1000","flat_pulls":73,"step":"0.06","hard_pity":90}"#,
        )
        .unwrap();
        assert_eq!(params, CurveParams::for_kind(CurveKind::Character));
    }

    #[test]
    fn test_single_pull_curve() {
        let params = CurveParams {
            base_rate: ratio(1, 2),
            flat_pulls: 0,
            step: Prob::zero(),
            hard_pity: 1,
        };
        let curve = RarityCurve::from_params(&params).unwrap();
        assert_eq!(curve.probs(), &[Prob::zero(), Prob::one()]);
    }
}
