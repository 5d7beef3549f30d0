//! Generation loop (§2, §4.5, §4.6): evaluate+extract, rank, elite
//! triplication, crossover, mutation, then roll the usage histograms.
//!
//! §2 lists the driver's stages as "copy, evaluate, extract, rank,
//! select, crossover, mutate, recompute histograms" as a component
//! summary; the "copy" step is the copy-then-swap discipline inside
//! elite triplication itself (§9), not a separate pipeline phase, so
//! this loop runs evaluate/extract first (it needs the population as
//! it stood at generation start) and folds "copy" into `select`.

use crate::config::RunConfig;
use crate::data::Dataset;
use crate::graph::Population;
use crate::mutate::Histograms;
use crate::pool::RulePool;
use rand::Rng;

use super::{crossover, extract, mutation, selection};

#[derive(Debug, Clone, Copy)]
pub struct GenerationReport {
    pub generation: usize,
    pub accepted_this_generation: usize,
    pub accepted_cumulative: usize,
    pub high_support_cumulative: usize,
    pub low_variance_cumulative: usize,
    pub mean_fitness: f64,
}

pub fn run_generation(
    generation: usize,
    population: &mut Population,
    dataset: &Dataset,
    pool: &mut RulePool,
    histograms: &mut Histograms,
    config: &RunConfig,
    rng: &mut impl Rng,
) -> GenerationReport {
    let stats = extract::extract(population, dataset, pool, histograms, config);
    population.recompute_ranks();
    selection::elite_triplicate(population);
    crossover::crossover(population, config, rng);
    mutation::mutate(population, histograms, config, rng);
    histograms.advance_generation();

    GenerationReport {
        generation,
        accepted_this_generation: stats.accepted_this_generation,
        accepted_cumulative: pool.len(),
        high_support_cumulative: pool.high_support_count(),
        low_variance_cumulative: pool.low_variance_count(),
        mean_fitness: stats.mean_fitness,
    }
}
