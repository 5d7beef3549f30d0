//! Graph-program model (§4.1). Represented as three parallel flat
//! arrays rather than an adjacency-list/petgraph structure: edges are
//! always single-successor and always target a judgement node, so
//! there is exactly one topology here and no indirection earns its
//! keep (§9 representation note).

use crate::config::RunConfig;
use rand::Rng;

/// One individual's program: indices `[0, start_nodes)` are start
/// nodes, `[start_nodes, start_nodes + judgement_nodes)` are
/// judgement nodes.
#[derive(Debug, Clone)]
pub struct Individual {
    pub attr: Vec<usize>,
    pub next: Vec<usize>,
    pub lag: Vec<usize>,
}

impl Individual {
    pub fn random(config: &RunConfig, attribute_count: usize, rng: &mut impl Rng) -> Self {
        let n = config.node_count();
        let p = config.start_nodes;
        let j = config.judgement_nodes;
        let attr = (0..n).map(|_| rng.random_range(0..attribute_count)).collect();
        let next = (0..n)
            .map(|_| rng.random_range(p..p + j))
            .collect();
        let lag = (0..n).map(|_| rng.random_range(0..=config.max_lag)).collect();
        Self { attr, next, lag }
    }

    pub fn is_judgement(config: &RunConfig, node: usize) -> bool {
        node >= config.start_nodes
    }

    pub fn start_nodes(config: &RunConfig) -> std::ops::Range<usize> {
        0..config.start_nodes
    }

    pub fn judgement_nodes(config: &RunConfig) -> std::ops::Range<usize> {
        config.start_nodes..config.node_count()
    }
}
