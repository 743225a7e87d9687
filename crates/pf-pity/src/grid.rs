//! Batch orchestration over the (light cone × character) grid
//!
//! Row 0 is built sequentially along the character axis. Every later row
//! depends only on the previous one, so its cells are convolved in parallel
//! and joined by column index before the next row starts.

use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::distribution::PullDistribution;
use crate::{PityError, PityResult};

/// Bounds of the grid to compute (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub max_characters: usize,
    pub max_light_cones: usize,
}

impl GridSize {
    /// Validate raw user counts
    pub fn new(max_characters: i64, max_light_cones: i64) -> PityResult<Self> {
        let to_count = |value: i64, name: &str| {
            usize::try_from(value)
                .map_err(|_| PityError::InvalidInput(format!("{name} must be a non-negative integer")))
        };

        Ok(Self {
            max_characters: to_count(max_characters, "max_characters")?,
            max_light_cones: to_count(max_light_cones, "max_light_cones")?,
        })
    }

    /// Number of cells, including the trivial (0, 0) cell
    pub fn cell_count(&self) -> usize {
        (self.max_characters + 1) * (self.max_light_cones + 1)
    }
}

/// Joint distributions for every (characters, light cones) pair in a [`GridSize`]
#[derive(Debug, Clone)]
pub struct PullGrid {
    size: GridSize,
    /// `rows[light_cones][characters]`
    rows: Vec<Vec<PullDistribution>>,
}

/// Thread pool for row-parallel work (0 = rayon default)
fn build_pool(thread_count: usize) -> PityResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(PityError::from)
}

fn cell_stage(characters: usize, light_cones: usize) -> String {
    format!("convolution for {characters} characters, {light_cones} light cones")
}

impl PullGrid {
    /// Compute the grid for the banners in `config`
    pub fn compute(config: &EngineConfig, size: GridSize) -> PityResult<Self> {
        config.validate()?;
        let character = config.character.pickup_distribution()?;
        let light_cone = config.light_cone.pickup_distribution()?;
        log::info!(
            "Pickup distributions ready: character {} pulls, light cone {} pulls",
            character.len() - 1,
            light_cone.len() - 1
        );

        Self::from_kernels(&character, &light_cone, size, config.thread_count)
    }

    /// Compute the grid from explicit single-pickup distributions
    pub fn from_kernels(
        character: &PullDistribution,
        light_cone: &PullDistribution,
        size: GridSize,
        thread_count: usize,
    ) -> PityResult<Self> {
        let pool = build_pool(thread_count)?;
        let mut rows = Vec::with_capacity(size.max_light_cones + 1);

        let mut first = Vec::with_capacity(size.max_characters + 1);
        first.push(PullDistribution::unit());
        for c in 1..=size.max_characters {
            log::debug!("character: {c}, light_cone: 0");
            let next = first[c - 1].convolve_checked(character, &cell_stage(c, 0))?;
            first.push(next);
        }
        rows.push(first);

        for l in 1..=size.max_light_cones {
            log::info!("Light cone row {l}/{}", size.max_light_cones);
            let previous: &Vec<PullDistribution> = &rows[l - 1];

            let row = pool.install(|| {
                previous
                    .par_iter()
                    .enumerate()
                    .map(|(c, dist)| {
                        log::debug!("character: {c}, light_cone: {l}");
                        dist.convolve_checked(light_cone, &cell_stage(c, l))
                    })
                    .collect::<PityResult<Vec<_>>>()
            })?;
            rows.push(row);
        }

        Ok(Self { size, rows })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Distribution for `characters` character pickups plus `light_cones` light cones
    pub fn get(&self, characters: usize, light_cones: usize) -> Option<&PullDistribution> {
        self.rows.get(light_cones)?.get(characters)
    }

    /// Every cell except the trivial (0, 0) one, as `(characters, light_cones, dist)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &PullDistribution)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(l, row)| row.iter().enumerate().map(move |(c, dist)| (c, l, dist)))
            .filter(|&(c, l, _)| c != 0 || l != 0)
    }
}
