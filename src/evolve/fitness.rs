//! Fitness scoring for a single candidate path (§4.5).

use crate::config::RunConfig;
use crate::pool::Rule;

/// `base = n*w_n + s*w_s + w_sigma/(sigma+eps)`, plus the novelty
/// bonus on first-time acceptance, plus (Dialect B) the concentration
/// terms. Both the linear `conc_base` and the quadratic `conc_bonus`
/// are added (§9 DESIGN.md decision): the spec names two distinct
/// formulas under one bulleted addition rather than one superseding
/// the other.
pub fn score(rule: &Rule, is_new_to_pool: bool, config: &RunConfig) -> f64 {
    let n = rule.num_attributes as f64;
    let support_rate = if rule.effective_denominator == 0 {
        0.0
    } else {
        rule.support_count as f64 / rule.effective_denominator as f64
    };
    let base = n * config.weight_n + support_rate * config.weight_s + config.weight_sigma / (rule.sigma1 + config.fitness_epsilon);

    let mut delta = base;
    if is_new_to_pool {
        delta += config.weight_novelty;
    }
    if let Some(concentration) = rule.concentration {
        let conc_base = concentration * config.weight_concentration;
        let conc_bonus = if concentration < 0.45 {
            0.0
        } else {
            let z = (concentration - 0.45) * 20.0;
            z * z * 10000.0
        };
        delta += conc_base + conc_bonus;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::rule::CANONICAL_WIDTH;

    fn base_rule() -> Rule {
        Rule {
            attributes: [1, 2, 0, 0, 0, 0, 0, 0],
            lags: [0; CANONICAL_WIDTH],
            num_attributes: 2,
            mean1: 1.0,
            sigma1: 0.1,
            mean2: None,
            sigma2: None,
            support_count: 40,
            effective_denominator: 100,
            high_support: false,
            low_variance: false,
            concentration: None,
            dominant_quadrant: None,
            temporal: None,
        }
    }

    #[test]
    fn novelty_bonus_applies_only_on_first_acceptance() {
        let config = RunConfig::default();
        let rule = base_rule();
        let first = score(&rule, true, &config);
        let repeat = score(&rule, false, &config);
        assert!((first - repeat - config.weight_novelty).abs() < 1e-9);
    }

    #[test]
    fn concentration_bonus_is_zero_below_threshold() {
        let config = RunConfig::default();
        let mut rule = base_rule();
        rule.concentration = Some(0.4);
        let with_low_conc = score(&rule, false, &config);
        rule.concentration = None;
        let without_conc = score(&rule, false, &config);
        // only the linear conc_base term (0.4 * w_c) differs, no quadratic bonus
        assert!((with_low_conc - without_conc - 0.4 * config.weight_concentration).abs() < 1e-6);
    }
}
