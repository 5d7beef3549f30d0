//! Mutation schedule (§4.6): three population blocks at increasing
//! disruption, each rate expressed as 1/d ("with probability 1/d").

use crate::config::RunConfig;
use crate::graph::{Individual, Population};
use crate::mutate::Histograms;
use rand::Rng;

fn fires(rng: &mut impl Rng, denominator: u32) -> bool {
    denominator > 0 && rng.random_range(0..denominator) == 0
}

pub fn mutate(population: &mut Population, histograms: &Histograms, config: &RunConfig, rng: &mut impl Rng) {
    let m = population.len();
    let third = m / 3;

    // Block [0, M): every start node may be reshuffled (d_p=1 => always, per the source's convention).
    for individual in population.individuals.iter_mut() {
        for node in Individual::start_nodes(config) {
            if fires(rng, config.start_mutation_denominator) {
                individual.next[node] = rng.random_range(config.start_nodes..config.node_count());
            }
        }
    }

    // Block [M/3, M): judgement-node edge and lag mutation.
    for individual in population.individuals[third..].iter_mut() {
        for node in Individual::judgement_nodes(config) {
            if fires(rng, config.edge_mutation_denominator) {
                individual.next[node] = rng.random_range(config.start_nodes..config.node_count());
            }
            if fires(rng, config.lag_mutation_denominator) {
                individual.lag[node] = histograms.sample_lag(rng);
            }
        }
    }

    // Block [2M/3, M): additionally, attribute mutation via the biased sampler.
    for individual in population.individuals[2 * third..].iter_mut() {
        for node in Individual::judgement_nodes(config) {
            if fires(rng, config.attr_mutation_denominator) {
                individual.attr[node] = histograms.sample_attribute(rng);
            }
        }
    }
}
