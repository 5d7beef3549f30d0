//! Uniform crossover (§4.6): pairs `(i, i + M/6)` for `i in [0, M/6)`,
//! each pair swapping all three gene arrays at `N_cross` independently
//! chosen judgement-node positions.

use crate::config::RunConfig;
use crate::graph::Population;
use rand::Rng;

pub fn crossover(population: &mut Population, config: &RunConfig, rng: &mut impl Rng) {
    let sixth = population.len() / 6;
    if sixth == 0 {
        return;
    }
    for i in 0..sixth {
        let j = i + sixth;
        for _ in 0..config.crossover_repeats {
            let v = rng.random_range(config.start_nodes..config.node_count());
            let (left, right) = population.individuals.split_at_mut(j);
            let a = &mut left[i];
            let b = &mut right[0];
            std::mem::swap(&mut a.attr[v], &mut b.attr[v]);
            std::mem::swap(&mut a.next[v], &mut b.next[v]);
            std::mem::swap(&mut a.lag[v], &mut b.lag[v]);
        }
    }
}
