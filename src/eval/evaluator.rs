//! The inner-loop engine (§4.2): a single pass over the safe range
//! computing per-(start node, depth) match counts and moment sums.
//! This is the hottest loop in the system, so it walks the
//! precomputed [`Chain`] per start node rather than re-deriving the
//! graph structure per record.

use super::accumulator::Cell;
use super::chain::Chain;
use crate::config::RunConfig;
use crate::data::{Dataset, Trinary};
use crate::graph::Individual;

#[derive(Debug)]
pub struct Evaluation {
    /// one chain per start node, in start-node order
    pub chains: Vec<Chain>,
    /// cells[k_index][depth], depth 0..=chain.depth()
    pub cells: Vec<Vec<Cell>>,
}

impl Evaluation {
    pub fn cell(&self, k_index: usize, depth: usize) -> &Cell {
        &self.cells[k_index][depth]
    }
}

pub fn evaluate(individual: &Individual, dataset: &Dataset, config: &RunConfig) -> Evaluation {
    let future_span = config.dialect.future_span();
    let dual_horizon = future_span == 2;
    let range = dataset.safe_range(config.max_lag, future_span);

    let starts: Vec<usize> = Individual::start_nodes(config).collect();
    let chains: Vec<Chain> = starts
        .iter()
        .map(|&k| Chain::build(individual, k, config))
        .collect();
    let mut cells: Vec<Vec<Cell>> = chains
        .iter()
        .map(|chain| vec![Cell::default(); chain.depth() + 1])
        .collect();

    for (ki, chain) in chains.iter().enumerate() {
        let cell_k = &mut cells[ki];
        for i in range.clone() {
            // depth 0: every visit to the start node counts, independent
            // of subsequent path success (§4.2 edge case).
            cell_k[0].match_count += 1;
            cell_k[0].eval_count += 1;

            let mut effective = true;
            for depth in 1..=chain.depth() {
                let attr = chain.attr[depth - 1];
                let lag = chain.lag[depth - 1];
                if lag > i {
                    // j < 0: terminate this path, no further counting (§4.2, §4.9)
                    break;
                }
                let j = i - lag;
                match dataset.attr(j, attr) {
                    Trinary::True => {
                        cell_k[depth].eval_count += 1;
                        if effective {
                            let cell = &mut cell_k[depth];
                            cell.match_count += 1;
                            let x1 = dataset.x(i + 1);
                            cell.sum_x1 += x1;
                            cell.sum_x1_sq += x1 * x1;
                            if dual_horizon {
                                let x2 = dataset.x(i + 2);
                                cell.sum_x2 += x2;
                                cell.sum_x2_sq += x2 * x2;
                            }
                            cell.matched_indices.push(i);
                        }
                        // Yes branch: continue walking the chain.
                    }
                    Trinary::False => {
                        // No branch: fall back to start, this path ends.
                        break;
                    }
                    Trinary::Missing => {
                        cell_k[depth].eval_count += 1;
                        effective = false;
                        // still walks, but contributes no further statistics.
                    }
                }
            }
        }
    }

    Evaluation { chains, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Row, Timestamp};

    /// builds a dataset where attribute 0 alternates 1,0,1,0,... and
    /// X_i = 1.0 when attribute_i = 1, else -1.0 (E1 in SPEC_FULL §8).
    fn e1_dataset(n: usize) -> Dataset {
        let ts = Timestamp::parse("2024-01-01").unwrap();
        let rows = (0..n)
            .map(|i| {
                let on = i % 2 == 0;
                Row {
                    attrs: vec![Trinary::from(on as i64)],
                    x: if on { 1.0 } else { -1.0 },
                    timestamp: ts,
                }
            })
            .collect();
        Dataset::new(vec!["attribute1".into()], rows)
    }

    fn single_node_individual(attr: usize, lag: usize) -> (RunConfig, Individual) {
        let mut config = RunConfig::default();
        config.start_nodes = 1;
        config.judgement_nodes = 1;
        config.max_depth = 1;
        config.max_lag = 0;
        config.dialect = crate::config::Dialect::Support {
            sigma_max: 0.1,
            s_min: 0.4,
            n_min: 1,
        };
        let individual = Individual {
            attr: vec![attr, attr],
            next: vec![1, 1],
            lag: vec![lag, lag],
        };
        (config, individual)
    }

    #[test]
    fn e1_trivial_single_attribute_pass() {
        let dataset = e1_dataset(100);
        let (config, individual) = single_node_individual(0, 0);
        let evaluation = evaluate(&individual, &dataset, &config);
        let cell = evaluation.cell(0, 1);
        let (mean, sigma) = cell.stats_horizon1().unwrap();
        assert_eq!(cell.match_count, 50);
        assert!((mean - 1.0).abs() < 1e-12);
        assert_eq!(sigma, 0.0);
    }

    #[test]
    fn lag_pushing_below_zero_terminates_path_without_counting() {
        let dataset = e1_dataset(10);
        let (mut config, mut individual) = single_node_individual(0, 5);
        config.max_lag = 5;
        individual.lag = vec![5, 5];
        let evaluation = evaluate(&individual, &dataset, &config);
        let cell = evaluation.cell(0, 1);
        // first 5 records in the safe range (0..5, before lag becomes valid at i=5) never run
        assert!(cell.eval_count <= (dataset.len() - 5) as u64);
    }

    #[test]
    fn missing_value_keeps_walking_but_stops_accumulating() {
        let ts = Timestamp::parse("2024-01-01").unwrap();
        let rows = vec![
            Row { attrs: vec![Trinary::Missing], x: 5.0, timestamp: ts },
            Row { attrs: vec![Trinary::True], x: 1.0, timestamp: ts },
            Row { attrs: vec![Trinary::True], x: 1.0, timestamp: ts },
        ];
        let dataset = Dataset::new(vec!["a".into()], rows);
        let (config, individual) = single_node_individual(0, 0);
        let evaluation = evaluate(&individual, &dataset, &config);
        let cell = evaluation.cell(0, 1);
        // record 0 is missing: eval_count bumps, match_count/sums do not.
        assert_eq!(cell.eval_count, 2); // records 0 and 1 are within safe range [0, len-1)
        assert_eq!(cell.match_count, 1); // only record 1 (True) contributes
    }
}
