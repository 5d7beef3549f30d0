//! Adaptive biased samplers (§4.7): rolling attribute- and lag-usage
//! histograms that drive mutation's biased gene choices.

pub mod histogram;

pub use histogram::UsageHistogram;

use crate::config::RunConfig;
use rand::Rng;

/// The pair of rolling histograms maintained per trial (§3's "Usage
/// histogram" entity, one instance each for attributes and lags).
#[derive(Debug, Clone)]
pub struct Histograms {
    pub attribute: UsageHistogram,
    pub lag: UsageHistogram,
}

impl Histograms {
    pub fn new(config: &RunConfig, attribute_count: usize) -> Self {
        Self {
            attribute: UsageHistogram::new(config.history_length, attribute_count, config.history_reseed_period),
            lag: UsageHistogram::new(config.history_length, config.max_lag + 1, config.history_reseed_period),
        }
    }

    /// witness a freshly accepted rule's attributes and lags (§4.5,
    /// §4.7); `refresh_bonus` is added to every lag bin when the rule
    /// carries either quality flag.
    pub fn witness_acceptance(&mut self, attributes: &[u16], lags: &[u32], qualifies_for_bonus: bool, refresh_bonus: f64) {
        for &attr in attributes {
            if attr == 0 {
                continue;
            }
            // attribute ids are 1-based in the canonical key; bins are 0-based
            self.attribute.witness((attr - 1) as usize, 1.0);
        }
        for (&attr, &lag) in attributes.iter().zip(lags.iter()) {
            if attr == 0 {
                continue;
            }
            let amount = if qualifies_for_bonus { 1.0 + refresh_bonus } else { 1.0 };
            self.lag.witness(lag as usize, amount);
        }
    }

    pub fn advance_generation(&mut self) {
        self.attribute.advance_generation();
        self.lag.advance_generation();
    }

    pub fn sample_attribute(&self, rng: &mut impl Rng) -> usize {
        self.attribute.sample(rng)
    }

    pub fn sample_lag(&self, rng: &mut impl Rng) -> usize {
        self.lag.sample(rng)
    }
}
