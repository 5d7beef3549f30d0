//! Quality predicate (§4.4): the two acceptance dialects as a single
//! tagged enum dispatch, not two rule subclasses (§9).

use crate::config::{Dialect, RunConfig};
use crate::eval::Cell;
use crate::pool::rule::{canonicalize, summarize_temporal, Quadrant, Rule, CANONICAL_WIDTH};

/// Evaluate one (individual, start node, depth) candidate path against
/// the configured dialect. Returns `None` if it fails any acceptance
/// criterion; §4.9 treats all of these as silent rejections, never errors.
pub fn evaluate_candidate(
    dialect: &Dialect,
    attrs_prefix: &[usize],
    lags_prefix: &[usize],
    depth0: &Cell,
    cell: &Cell,
    dataset: &crate::data::Dataset,
    config: &RunConfig,
) -> Option<Rule> {
    let (attributes, lags, num_attributes) = canonicalize(attrs_prefix, lags_prefix);
    if num_attributes < dialect.n_min() || num_attributes == 0 || num_attributes > CANONICAL_WIDTH {
        return None;
    }

    match dialect {
        Dialect::Support { sigma_max, s_min, .. } => {
            let (mean1, sigma1) = cell.stats_horizon1()?;
            if sigma1 > *sigma_max {
                return None;
            }
            let support_rate = cell.support_rate(depth0);
            if support_rate < *s_min {
                return None;
            }
            Some(Rule {
                attributes,
                lags,
                num_attributes,
                mean1,
                sigma1,
                mean2: None,
                sigma2: None,
                support_count: cell.match_count,
                effective_denominator: cell.effective_denominator(depth0),
                high_support: support_rate >= s_min + config.high_support_bonus,
                low_variance: sigma1 <= sigma_max - config.low_variance_bonus,
                concentration: None,
                dominant_quadrant: None,
                temporal: None,
            })
        }
        Dialect::Quadrant { c_min, delta, s_min, .. } => {
            if cell.matched_indices.is_empty() {
                return None;
            }
            let points: Vec<(f64, f64, Quadrant)> = cell
                .matched_indices
                .iter()
                .map(|&i| {
                    let x1 = dataset.x(i + 1);
                    let x2 = dataset.x(i + 2);
                    (x1, x2, Quadrant::classify(x1, x2))
                })
                .collect();

            let total = points.len();
            let mut counts = [0usize; 4];
            for (_, _, q) in &points {
                counts[quadrant_index(*q)] += 1;
            }
            let dominant_index = argmax_first(&counts);
            let dominant = quadrant_from_index(dominant_index);
            let concentration = counts[dominant_index] as f64 / total as f64;
            if concentration < *c_min {
                return None;
            }
            if points.iter().any(|&(x1, x2, _)| violates(dominant, x1, x2, *delta)) {
                return None;
            }

            let (mean1, sigma1) = cell.stats_horizon1()?;
            let (mean2, sigma2) = cell.stats_horizon2()?;
            // §9 decision #1: emit N - FUTURE_SPAN verbatim regardless of
            // whether it participates in acceptance.
            let effective_denominator = (dataset.len() - dialect.future_span()) as u64;
            let support_rate = cell.match_count as f64 / effective_denominator.max(1) as f64;
            if support_rate < *s_min {
                return None;
            }

            Some(Rule {
                attributes,
                lags,
                num_attributes,
                mean1,
                sigma1,
                mean2: Some(mean2),
                sigma2: Some(sigma2),
                support_count: cell.match_count,
                effective_denominator,
                high_support: support_rate >= s_min + config.high_support_bonus,
                // Dialect B has no sigma_max concept (its geometry is
                // concentration + deviation, not dispersion), so
                // low_variance never fires for this dialect.
                low_variance: false,
                concentration: Some(concentration),
                dominant_quadrant: Some(dominant),
                temporal: summarize_temporal(&cell.matched_indices, dataset),
            })
        }
    }
}

fn quadrant_index(q: Quadrant) -> usize {
    match q {
        Quadrant::UpUp => 0,
        Quadrant::DownUp => 1,
        Quadrant::DownDown => 2,
        Quadrant::UpDown => 3,
    }
}

fn quadrant_from_index(i: usize) -> Quadrant {
    match i {
        0 => Quadrant::UpUp,
        1 => Quadrant::DownUp,
        2 => Quadrant::DownDown,
        _ => Quadrant::UpDown,
    }
}

fn argmax_first(counts: &[usize; 4]) -> usize {
    let mut best = 0;
    for i in 1..4 {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    best
}

/// forbidden half-plane per dominant quadrant (§4.4)
fn violates(dominant: Quadrant, x1: f64, x2: f64, delta: f64) -> bool {
    match dominant {
        Quadrant::UpUp => x1 < -delta || x2 < -delta,
        Quadrant::DownUp => x1 > delta || x2 < -delta,
        Quadrant::DownDown => x1 > delta || x2 > delta,
        Quadrant::UpDown => x1 < -delta || x2 > delta,
    }
}
