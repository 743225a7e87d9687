//! # pf-pity — exact pull-count distributions for soft-pity banners
//!
//! Computes, with exact rational arithmetic, how many pulls it takes to obtain
//! pickup items on a banner whose rare-draw rate ramps up after a flat region
//! and whose lost 50/50 (or 75/25) is followed by a guaranteed pickup.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          PullGrid                                 │
//! │                                                                   │
//! │  ┌─────────────┐   ┌────────────┐   ┌─────────────┐               │
//! │  │ RarityCurve │ → │ Occurrence │ → │  Limited    │ ─┐            │
//! │  │ (soft pity) │   │ (1st rare) │   │ (guarantee) │  │            │
//! │  └─────────────┘   └────────────┘   └─────────────┘  │            │
//! │                                                       v            │
//! │  ┌─────────────────────────────────────────────────────────────┐  │
//! │  │  Row-wise convolution (rayon)                               │  │
//! │  │  row 0: [1] ⊛ char ⊛ char …    row l: row l-1 ⊛ light cone  │  │
//! │  └─────────────────────────────────────────────────────────────┘  │
//! │                              │                                     │
//! │                              v                                     │
//! │          SummaryStatistics → GridReport (JSON, numeric + exact)    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pf_pity::{EngineConfig, GridReport, GridSize, PullGrid, ReportSink};
//!
//! let config = EngineConfig::default();
//! let grid = PullGrid::compute(&config, GridSize::new(2, 1)?)?;
//! let report = GridReport::build(&grid, config.sqrt_digits);
//! report.write(&ReportSink::Stdout, &config.output_stem)?;
//! ```

mod config;
mod curve;
mod distribution;
mod error;
mod estimate;
mod grid;
mod limited;
mod occurrence;
mod rational;
mod report;
mod stats;

pub use config::*;
pub use curve::*;
pub use distribution::*;
pub use error::*;
pub use estimate::*;
pub use grid::*;
pub use limited::*;
pub use occurrence::*;
pub use rational::*;
pub use report::*;
pub use stats::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
