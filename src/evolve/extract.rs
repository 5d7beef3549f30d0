//! The "evaluate then extract" half of a generation (§2, §4.5): run
//! every individual's graph over the dataset, turn every candidate
//! path into a quality-predicate check, and fold the outcome into
//! that individual's fitness, the rule pool, and the usage histograms.

use crate::config::RunConfig;
use crate::data::Dataset;
use crate::eval;
use crate::graph::Population;
use crate::mutate::Histograms;
use crate::pool::{InsertOutcome, RulePool};
use crate::quality;

use super::fitness;

#[derive(Debug, Clone, Copy)]
pub struct GenerationStats {
    pub accepted_this_generation: usize,
    pub mean_fitness: f64,
}

/// resets fitness to the birth seed, then accumulates every candidate
/// path's contribution (§4.5). Rule-pool capacity does not stop
/// mid-generation scoring (§4.9's "stop the generation loop at its
/// next check" is honored by the caller between generations), only
/// the pool's own growth.
pub fn extract(population: &mut Population, dataset: &Dataset, pool: &mut RulePool, histograms: &mut Histograms, config: &RunConfig) -> GenerationStats {
    population.reset_fitness();
    let mut accepted_this_generation = 0usize;

    for i in 0..population.len() {
        let evaluation = eval::evaluate(&population.individuals[i], dataset, config);
        for (k_index, chain) in evaluation.chains.iter().enumerate() {
            let depth0 = evaluation.cell(k_index, 0).clone();
            for depth in 1..=chain.depth() {
                let cell = evaluation.cell(k_index, depth);
                let Some(rule) = quality::evaluate_candidate(
                    &config.dialect,
                    &chain.attr[..depth],
                    &chain.lag[..depth],
                    &depth0,
                    cell,
                    dataset,
                    config,
                ) else {
                    continue;
                };

                let qualifies_for_bonus = rule.high_support || rule.low_variance;
                let attributes = rule.attributes;
                let lags = rule.lags;
                // `try_insert` consumes the candidate, so score from a clone
                // taken before the call — `is_new` (and therefore the
                // novelty bonus) must reflect the actual InsertOutcome, not
                // a pre-check against the pool's contents, or a candidate
                // that arrives after the pool is full would wrongly collect
                // the bonus for a rule that never enters the pool.
                let rule_for_scoring = rule.clone();
                let is_new = pool.try_insert(rule) == InsertOutcome::Accepted;
                population.fitness[i] += fitness::score(&rule_for_scoring, is_new, config);

                if is_new {
                    accepted_this_generation += 1;
                    histograms.witness_acceptance(&attributes, &lags, qualifies_for_bonus, config.refresh_bonus);
                }
            }
        }
    }

    let mean_fitness = population.fitness.iter().sum::<f64>() / population.len().max(1) as f64;
    GenerationStats {
        accepted_this_generation,
        mean_fitness,
    }
}
