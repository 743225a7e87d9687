//! Engine configuration

use num_traits::Signed;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::curve::CurveKind;
use crate::estimate::Pricing;
use crate::limited::BannerConfig;
use crate::rational::{Prob, SQRT_DIGITS};
use crate::{PityError, PityResult};

/// Probability engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Character banner curve and pickup odds
    pub character: BannerConfig,

    /// Light cone banner curve and pickup odds
    pub light_cone: BannerConfig,

    /// Number of worker threads (0 = auto)
    pub thread_count: usize,

    /// Fractional digits kept for irrational standard deviations
    pub sqrt_digits: u32,

    /// File stem for persisted reports (`<stem>.json`, `<stem>_symbol.json`)
    pub output_stem: String,

    /// Currency cost of pulls, for estimates
    pub pricing: Pricing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            character: BannerConfig::for_kind(CurveKind::Character),
            light_cone: BannerConfig::for_kind(CurveKind::LightCone),
            thread_count: 0, // Auto-detect
            sqrt_digits: SQRT_DIGITS,
            output_stem: "hsr".to_string(),
            pricing: Pricing::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON or YAML file, chosen by extension
    pub fn load<P: AsRef<Path>>(path: P) -> PityResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            Some("yaml" | "yml") => serde_yml::from_str(&text)?,
            other => {
                return Err(PityError::InvalidConfig(format!(
                    "unsupported config format: {}",
                    other.unwrap_or("<none>")
                )));
            }
        };

        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Banner configuration for `kind`
    pub fn banner(&self, kind: CurveKind) -> &BannerConfig {
        match kind {
            CurveKind::Character => &self.character,
            CurveKind::LightCone => &self.light_cone,
        }
    }

    pub fn validate(&self) -> PityResult<()> {
        self.character.validate()?;
        self.light_cone.validate()?;
        if self.output_stem.is_empty() {
            return Err(PityError::InvalidConfig("output_stem must not be empty".into()));
        }
        if self.pricing.currency_per_pull.is_negative() {
            return Err(PityError::InvalidConfig("currency_per_pull must not be negative".into()));
        }
        Ok(())
    }

    /// Set thread count
    pub fn with_threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }

    /// Set square-root precision
    pub fn with_sqrt_digits(mut self, digits: u32) -> Self {
        self.sqrt_digits = digits;
        self
    }

    /// Apply the same lost-roll recovery chance to both banners
    pub fn with_loss_recovery(mut self, recovery: Prob) -> Self {
        self.character.banner.loss_recovery = recovery.clone();
        self.light_cone.banner.loss_recovery = recovery;
        self
    }
}
