//! Explicit configuration surface (§6). Every dimensional, threshold,
//! rate, and trial-control knob named in the spec lives here instead
//! of as a `const` — unlike the teacher, which hard-codes its CFR
//! tunables in `lib.rs`, because §6 explicitly forbids that for this
//! system.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which acceptance geometry the quality predicate uses (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dialect {
    /// dispersion + support, single future horizon
    Support {
        sigma_max: f64,
        s_min: f64,
        n_min: usize,
    },
    /// quadrant concentration with deviation bound, dual future horizon
    Quadrant {
        c_min: f64,
        delta: f64,
        s_min: f64,
        n_min: usize,
    },
}

impl Dialect {
    pub fn n_min(&self) -> usize {
        match self {
            Dialect::Support { n_min, .. } => *n_min,
            Dialect::Quadrant { n_min, .. } => *n_min,
        }
    }

    pub fn future_span(&self) -> usize {
        match self {
            Dialect::Support { .. } => 1,
            Dialect::Quadrant { .. } => 2,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Support {
            sigma_max: 1.0,
            s_min: 0.4,
            n_min: 1,
        }
    }
}

/// The complete, explicit knob set described in SPEC_FULL.md §6/§4.12.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    // --- dimensional ---
    /// number of start nodes (P)
    pub start_nodes: usize,
    /// number of judgement nodes (J)
    pub judgement_nodes: usize,
    /// maximum traversal depth (D_max)
    pub max_depth: usize,
    /// population size (M)
    pub population: usize,
    /// maximum allowed time-lag (MAX_LAG)
    pub max_lag: usize,
    /// rule pool capacity (R_max)
    pub rule_pool_max: usize,
    /// rolling usage-histogram window length (H)
    pub history_length: usize,
    /// generations between forced histogram reseed (R_period)
    pub history_reseed_period: usize,
    /// per-pair crossover repeat count (N_cross)
    pub crossover_repeats: usize,
    /// generations to run per trial (supplements §6, see DESIGN.md #4)
    pub generations: usize,

    // --- quality dialect ---
    pub dialect: Dialect,

    // --- tuning ---
    pub high_support_bonus: f64,
    pub low_variance_bonus: f64,
    pub fitness_epsilon: f64,
    pub weight_n: f64,
    pub weight_s: f64,
    pub weight_sigma: f64,
    pub weight_concentration: f64,
    pub weight_novelty: f64,
    pub refresh_bonus: f64,

    // --- mutation rates, expressed as 1/d ---
    pub start_mutation_denominator: u32,
    pub edge_mutation_denominator: u32,
    pub lag_mutation_denominator: u32,
    pub attr_mutation_denominator: u32,

    // --- trial control ---
    pub trial_count: usize,
    pub trial_start_id: usize,
    pub random_seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            start_nodes: 10,
            judgement_nodes: 100,
            max_depth: 7,
            population: 300,
            max_lag: 3,
            rule_pool_max: 200,
            history_length: 5,
            history_reseed_period: 5,
            crossover_repeats: 20,
            generations: 200,
            dialect: Dialect::default(),
            high_support_bonus: 0.02,
            low_variance_bonus: 1.0,
            fitness_epsilon: 0.1,
            weight_n: 1.0,
            weight_s: 10.0,
            weight_sigma: 4.0,
            weight_concentration: 100.0,
            weight_novelty: 20.0,
            refresh_bonus: 1.0,
            start_mutation_denominator: 1,
            edge_mutation_denominator: 6,
            lag_mutation_denominator: 6,
            attr_mutation_denominator: 6,
            trial_count: 1,
            trial_start_id: 0,
            random_seed: 0xC0FFEE,
        }
    }
}

impl RunConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: RunConfig = toml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// total node count P + J
    pub fn node_count(&self) -> usize {
        self.start_nodes + self.judgement_nodes
    }

    /// validated once at startup; input/config failures are fatal per §7.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.start_nodes == 0 {
            bail!("start_nodes (P) must be nonzero");
        }
        if self.judgement_nodes == 0 {
            bail!("judgement_nodes (J) must be nonzero");
        }
        if self.max_depth == 0 {
            bail!("max_depth (D_max) must be nonzero");
        }
        if self.max_depth > crate::pool::rule::CANONICAL_WIDTH {
            bail!(
                "max_depth (D_max) must be <= {} (the canonical rule key width)",
                crate::pool::rule::CANONICAL_WIDTH
            );
        }
        if self.population == 0 || self.population % 6 != 0 {
            bail!("population (M) must be a positive multiple of 6 (elite thirds, crossover sixths)");
        }
        if self.history_length == 0 {
            bail!("history_length (H) must be nonzero");
        }
        if self.trial_count == 0 {
            bail!("trial_count must be nonzero");
        }
        Ok(())
    }

    /// validate against a loaded dataset's row count (I_lo must be < I_hi, §3)
    pub fn validate_against_row_count(&self, n: usize) -> anyhow::Result<()> {
        let future_span = self.dialect.future_span();
        let lo = self.max_lag;
        if n <= future_span || lo >= n - future_span {
            bail!(
                "dataset too small for max_lag={} and future_span={} (N={})",
                self.max_lag,
                future_span,
                n
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        RunConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_start_nodes_rejected() {
        let mut config = RunConfig::default();
        config.start_nodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn population_not_multiple_of_six_rejected() {
        let mut config = RunConfig::default();
        config.population = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn roundtrip_toml() {
        let config = RunConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: RunConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn row_count_validation() {
        let config = RunConfig::default();
        assert!(config.validate_against_row_count(2).is_err());
        assert!(config.validate_against_row_count(1000).is_ok());
    }
}
