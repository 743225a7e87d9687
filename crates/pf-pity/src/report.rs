//! Report generation for computed grids
//!
//! Two documents are produced per run: a numeric one (f64, percentages) for
//! charts, and a symbolic one holding exact rational strings for re-analysis.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::distribution::PullDistribution;
use crate::grid::PullGrid;
use crate::rational::{Prob, integer, to_decimal_string, to_f64};
use crate::stats::SummaryStatistics;
use crate::PityResult;

/// Placeholder for an undefined value in the symbolic report
pub const UNDEFINED: &str = "nan";

/// Numeric summary of one grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellReport {
    pub expected: f64,
    pub standard_deviation: f64,
    /// `P(i pulls) * 100`
    pub prob_percents: Vec<f64>,
    /// `P(at most i pulls) * 100`
    pub cumulative_percents: Vec<f64>,
    /// `None` (serialized as `null`) when the deviation is zero
    pub t_scores: Vec<Option<f64>>,
}

/// Exact summary of one grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolicCellReport {
    pub expected: String,
    pub standard_deviation: String,
    pub probs: Vec<String>,
    pub t_scores: Vec<String>,
}

/// Report key for a cell
pub fn cell_key(characters: usize, light_cones: usize) -> String {
    format!("{characters}_{light_cones}")
}

impl CellReport {
    pub fn from_stats(dist: &PullDistribution, stats: &SummaryStatistics<'_>) -> Self {
        let hundred = integer(100);
        let percent = |p: &Prob| to_f64(&(p * &hundred));

        Self {
            expected: to_f64(stats.expected()),
            standard_deviation: to_f64(&stats.standard_deviation().value),
            prob_percents: dist.probs().iter().map(percent).collect(),
            cumulative_percents: stats.cumulative().iter().map(percent).collect(),
            t_scores: stats
                .normalized_scores()
                .iter()
                .map(|score| score.as_ref().map(to_f64))
                .collect(),
        }
    }
}

impl SymbolicCellReport {
    pub fn from_stats(dist: &PullDistribution, stats: &SummaryStatistics<'_>, digits: u32) -> Self {
        let deviation = stats.standard_deviation();
        let standard_deviation = if deviation.exact {
            deviation.value.to_string()
        } else {
            to_decimal_string(&deviation.value, digits)
        };

        Self {
            expected: stats.expected().to_string(),
            standard_deviation,
            probs: dist.probs().iter().map(ToString::to_string).collect(),
            t_scores: stats
                .normalized_scores()
                .iter()
                .map(|score| match score {
                    Some(value) => to_decimal_string(value, digits),
                    None => UNDEFINED.to_string(),
                })
                .collect(),
        }
    }
}

/// Where a report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
    /// Write `<stem>.json` and `<stem>_symbol.json` into this directory
    Directory(PathBuf),
    /// Stream one JSON document to standard output
    Stdout,
}

/// Numeric and symbolic reports for every non-trivial grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridReport {
    pub results: BTreeMap<String, CellReport>,
    pub symbolic: BTreeMap<String, SymbolicCellReport>,
}

impl GridReport {
    /// Evaluate statistics for every cell, in parallel
    pub fn build(grid: &PullGrid, sqrt_digits: u32) -> Self {
        let cells: Vec<_> = grid.cells().collect();

        let entries: Vec<(String, CellReport, SymbolicCellReport)> = cells
            .par_iter()
            .map(|&(c, l, dist)| {
                let stats = SummaryStatistics::with_precision(dist, sqrt_digits);
                (
                    cell_key(c, l),
                    CellReport::from_stats(dist, &stats),
                    SymbolicCellReport::from_stats(dist, &stats, sqrt_digits),
                )
            })
            .collect();

        let mut results = BTreeMap::new();
        let mut symbolic = BTreeMap::new();
        for (key, numeric, exact) in entries {
            results.insert(key.clone(), numeric);
            symbolic.insert(key, exact);
        }

        log::info!("Built report for {} cells", results.len());
        Self { results, symbolic }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Write to `sink`; returns the files written (empty for stdout)
    pub fn write(&self, sink: &ReportSink, stem: &str) -> PityResult<Vec<PathBuf>> {
        match sink {
            ReportSink::Directory(dir) => self.save(dir, stem),
            ReportSink::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                serde_json::to_writer_pretty(&mut handle, self)?;
                writeln!(handle)?;
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, dir: &Path, stem: &str) -> PityResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let numeric_path = dir.join(format!("{stem}.json"));
        let symbolic_path = dir.join(format!("{stem}_symbol.json"));

        std::fs::write(&numeric_path, serde_json::to_string_pretty(&self.results)?)?;
        std::fs::write(&symbolic_path, serde_json::to_string_pretty(&self.symbolic)?)?;

        log::info!("Wrote {} and {}", numeric_path.display(), symbolic_path.display());
        Ok(vec![numeric_path, symbolic_path])
    }
}
