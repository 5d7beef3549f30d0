//! Static per-(individual, start node) judgement chain.
//!
//! Because every edge is single-successor and `g_next` always targets
//! a judgement node (§3's individual invariant), the sequence of
//! judgement nodes visited along a Yes/Missing walk from a start node
//! does not depend on any particular record — only on the graph
//! itself. So the attribute/lag labels at each depth (§4.2's
//! `attribute_chain`/`lag_chain`) can be precomputed once per
//! individual per start node and then replayed per record, rather
//! than re-walked node by node for every one of the N records.

use crate::config::RunConfig;
use crate::graph::Individual;

#[derive(Debug, Clone)]
pub struct Chain {
    /// zero-based attribute index at each depth, length == max_depth
    pub attr: Vec<usize>,
    /// time-lag at each depth, length == max_depth
    pub lag: Vec<usize>,
}

impl Chain {
    pub fn build(individual: &Individual, start: usize, config: &RunConfig) -> Self {
        let mut attr = Vec::with_capacity(config.max_depth);
        let mut lag = Vec::with_capacity(config.max_depth);
        let mut current = individual.next[start];
        for _ in 0..config.max_depth {
            if !Individual::is_judgement(config, current) {
                break;
            }
            attr.push(individual.attr[current]);
            lag.push(individual.lag[current]);
            current = individual.next[current];
        }
        Self { attr, lag }
    }

    pub fn depth(&self) -> usize {
        self.attr.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn chain_always_reaches_max_depth() {
        // g_next always targets a judgement node by construction, so the
        // chain never terminates early regardless of which individual is sampled.
        let config = RunConfig::default();
        let mut rng = rand::rngs::SmallRng::seed_from_u64(42);
        let individual = Individual::random(&config, 30, &mut rng);
        for k in Individual::start_nodes(&config) {
            let chain = Chain::build(&individual, k, &config);
            assert_eq!(chain.depth(), config.max_depth);
        }
    }
}
