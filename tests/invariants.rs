//! Universally quantified invariants (SPEC_FULL §8), items 1, 2, 3,
//! 4, 5, and 6. Items 7 (cross-run determinism) and 8 (short-circuit
//! equivalence) are exercised as targeted unit tests elsewhere
//! (`trial::tests::two_trials_with_same_config_are_deterministic`
//! covers determinism directly against the full pipeline).

use proptest::prelude::*;

use tempograph::config::{Dialect, RunConfig};
use tempograph::data::{Dataset, Row, Timestamp, Trinary};
use tempograph::eval::Cell;
use tempograph::mutate::histogram::UsageHistogram;
use tempograph::pool::rule::{canonicalize, Quadrant, CANONICAL_WIDTH};
use tempograph::pool::RulePool;
use tempograph::quality::evaluate_candidate;

fn dataset_with_x(xs: &[f64]) -> Dataset {
    let ts = Timestamp::parse("2024-01-01").unwrap();
    let rows = xs
        .iter()
        .map(|&x| Row {
            attrs: vec![],
            x,
            timestamp: ts,
        })
        .collect();
    Dataset::new(vec![], rows)
}

fn cell_from_matches(dataset: &Dataset, indices: &[usize], dual: bool) -> Cell {
    let mut cell = Cell::default();
    for &i in indices {
        cell.match_count += 1;
        let x1 = dataset.x(i + 1);
        cell.sum_x1 += x1;
        cell.sum_x1_sq += x1 * x1;
        if dual {
            let x2 = dataset.x(i + 2);
            cell.sum_x2 += x2;
            cell.sum_x2_sq += x2 * x2;
        }
        cell.matched_indices.push(i);
    }
    cell.eval_count = cell.match_count;
    cell
}

proptest! {
    /// item 1: canonicalize() always yields a sorted, zero-padded
    /// array with no duplicate nonzero ids.
    #[test]
    fn canonical_key_has_no_duplicates_and_trailing_padding_only(
        raw_attrs in prop::collection::vec(0usize..40, 1..12),
        raw_lags in prop::collection::vec(0usize..5, 1..12),
    ) {
        let n = raw_attrs.len().min(raw_lags.len());
        let (key, _, num_attributes) = canonicalize(&raw_attrs[..n], &raw_lags[..n]);

        let nonzero: Vec<u16> = key.iter().copied().filter(|&a| a != 0).collect();
        let mut sorted = nonzero.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(&nonzero, &sorted, "nonzero prefix must already be sorted and unique");
        prop_assert!(num_attributes <= CANONICAL_WIDTH);

        // every zero slot is a trailing slot: once a zero appears, every
        // slot after it is also zero.
        let mut seen_zero = false;
        for &slot in key.iter() {
            if slot == 0 {
                seen_zero = true;
            } else {
                prop_assert!(!seen_zero, "a nonzero id appeared after a zero padding slot");
            }
        }
    }

    /// item 2: the pool never accepts two rules sharing a canonical
    /// attribute key, regardless of insertion order.
    #[test]
    fn pool_never_holds_two_rules_with_the_same_canonical_key(
        attr_ids in prop::collection::vec(1u16..30, 1..40),
    ) {
        let mut pool = RulePool::new(1_000_000);
        for &attr in &attr_ids {
            let mut attributes = [0u16; CANONICAL_WIDTH];
            attributes[0] = attr;
            let rule = tempograph::pool::Rule {
                attributes,
                lags: [0; CANONICAL_WIDTH],
                num_attributes: 1,
                mean1: 0.0,
                sigma1: 0.0,
                mean2: None,
                sigma2: None,
                support_count: 1,
                effective_denominator: 1,
                high_support: false,
                low_variance: false,
                concentration: None,
                dominant_quadrant: None,
                temporal: None,
            };
            pool.try_insert(rule);
        }
        let mut seen = std::collections::HashSet::new();
        for rule in pool.rules() {
            prop_assert!(seen.insert(rule.attributes), "duplicate canonical key survived in the pool");
        }
    }

    /// item 3: the reported sigma matches the one-pass moment identity
    /// to within 1e-9 relative error, for any nonempty set of x values.
    #[test]
    fn sigma_matches_one_pass_moment_identity(
        xs in prop::collection::vec(-100.0f64..100.0, 1..50),
    ) {
        let mut cell = Cell::default();
        for &x in &xs {
            cell.match_count += 1;
            cell.sum_x1 += x;
            cell.sum_x1_sq += x * x;
        }
        let (mean, sigma) = cell.stats_horizon1().unwrap();
        let n = xs.len() as f64;
        let expected_mean = xs.iter().sum::<f64>() / n;
        let expected_var = (xs.iter().map(|x| x * x).sum::<f64>() / n - expected_mean * expected_mean).max(0.0);
        let expected_sigma = expected_var.sqrt();
        prop_assert!((mean - expected_mean).abs() < 1e-6);
        let relative_error = (sigma - expected_sigma).abs() / expected_sigma.max(1.0);
        prop_assert!(relative_error < 1e-6);
    }

    /// item 4: every accepted Dialect B rule has concentration >= c_min
    /// and no matched point violates its dominant quadrant's deviation bound.
    #[test]
    fn accepted_dialect_b_rules_respect_concentration_and_deviation(
        n_q1 in 5usize..30,
        n_other in 0usize..10,
        delta in 0.001f64..0.05,
    ) {
        let total = n_q1 + n_other + 1;
        let mut xs = vec![0.0f64; total * 3 + 4];
        let mut matched = Vec::new();
        let mut idx = 0usize;
        for _ in 0..n_q1 {
            xs[idx + 1] = delta * 3.0;
            xs[idx + 2] = delta * 3.0;
            matched.push(idx);
            idx += 3;
        }
        for _ in 0..n_other {
            xs[idx + 1] = -delta * 3.0;
            xs[idx + 2] = -delta * 3.0;
            matched.push(idx);
            idx += 3;
        }
        let dataset = dataset_with_x(&xs);
        let cell = cell_from_matches(&dataset, &matched, true);
        let depth0 = Cell { match_count: matched.len() as u64, eval_count: matched.len() as u64, ..Default::default() };
        let dialect = Dialect::Quadrant { c_min: 0.5, delta, s_min: 0.0, n_min: 1 };
        let config = RunConfig::default();

        if let Some(rule) = evaluate_candidate(&dialect, &[0], &[0], &depth0, &cell, &dataset, &config) {
            let concentration = rule.concentration.unwrap();
            prop_assert!(concentration >= 0.5 - 1e-9);
            let dominant = rule.dominant_quadrant.unwrap();
            for &i in &matched {
                let (x1, x2) = (dataset.x(i + 1), dataset.x(i + 2));
                let violates = match dominant {
                    Quadrant::UpUp => x1 < -delta || x2 < -delta,
                    Quadrant::DownUp => x1 > delta || x2 < -delta,
                    Quadrant::DownDown => x1 > delta || x2 > delta,
                    Quadrant::UpDown => x1 < -delta || x2 > delta,
                };
                prop_assert!(!violates, "accepted rule has a matched point outside its deviation bound");
            }
        }
    }

    /// item 5: every accepted Dialect A rule has sigma <= sigma_max and
    /// support_rate >= s_min.
    #[test]
    fn accepted_dialect_a_rules_respect_sigma_and_support_bounds(
        xs in prop::collection::vec(-5.0f64..5.0, 1..60),
        sigma_max in 0.1f64..3.0,
        s_min in 0.0f64..0.5,
    ) {
        let dataset = dataset_with_x(&{
            let mut v = vec![0.0; xs.len() + 2];
            v[2..].copy_from_slice(&xs);
            v
        });
        let matched: Vec<usize> = (0..xs.len()).collect();
        let cell = cell_from_matches(&dataset, &matched, false);
        let depth0 = Cell { match_count: matched.len() as u64, eval_count: matched.len() as u64, ..Default::default() };
        let dialect = Dialect::Support { sigma_max, s_min, n_min: 1 };
        let config = RunConfig::default();

        if let Some(rule) = evaluate_candidate(&dialect, &[0], &[0], &depth0, &cell, &dataset, &config) {
            prop_assert!(rule.sigma1 <= sigma_max + 1e-9);
            let support_rate = rule.support_count as f64 / rule.effective_denominator.max(1) as f64;
            prop_assert!(support_rate >= s_min - 1e-9);
        }
    }

    /// item 6: a biased sampler's empirical draw frequency converges to
    /// each bin's share of the total mass.
    #[test]
    fn biased_sampler_converges_to_its_mass_distribution(
        weights in prop::collection::vec(0.0f64..10.0, 2..6),
        seed in any::<u64>(),
    ) {
        use rand::{rngs::SmallRng, SeedableRng};

        let domain = weights.len();
        let mut histogram = UsageHistogram::new(1, domain, 1_000_000);
        for (bin, &w) in weights.iter().enumerate() {
            histogram.witness(bin, w);
        }
        let total: f64 = weights.iter().sum();
        prop_assume!(total > 0.0);

        let draws = 20_000;
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut counts = vec![0u64; domain];
        for _ in 0..draws {
            counts[histogram.sample(&mut rng)] += 1;
        }
        for bin in 0..domain {
            let expected = weights[bin] / total;
            let observed = counts[bin] as f64 / draws as f64;
            // loose tolerance: this is a convergence property, not an
            // exact-equality one, and low-weight bins draw rarely.
            prop_assert!((observed - expected).abs() < 0.05, "bin {bin}: expected {expected}, observed {observed}");
        }
    }
}
