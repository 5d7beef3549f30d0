//! Trial scheduler (§2, §5): runs `trial_count` independent trials,
//! each with a fresh population and fresh usage histograms, but a
//! single `RulePool` shared across the whole run (§9 DESIGN.md
//! decision #5 — a `Rule` is "stored once across all trials").
//!
//! Trials are independent and may run in parallel (gated by the
//! `parallel` feature, mirroring the teacher's `rayon`-gated batch
//! processing), but within a trial the generation loop is a strict,
//! single-threaded data dependency chain (§5).

use crate::config::RunConfig;
use crate::data::Dataset;
use crate::evolve;
use crate::graph::Population;
use crate::mutate::Histograms;
use crate::pool::RulePool;
use rand::{rngs::SmallRng, SeedableRng};

#[derive(Debug, Clone)]
pub struct TrialReport {
    pub trial_id: usize,
    pub generations_run: usize,
    pub accepted_by_this_trial: usize,
    pub stopped_on_capacity: bool,
    pub final_mean_fitness: f64,
}

/// deterministic per-trial seed: every consumer within a trial draws
/// from one `SmallRng` seeded from `(base_seed, trial_id)` so trials
/// are reproducible independent of how many run concurrently (§5).
fn trial_seed(base_seed: u64, trial_id: usize) -> u64 {
    base_seed ^ (trial_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// run a single trial against the shared pool, returning its report.
/// `on_generation` is invoked with each generation's report as it
/// completes, letting a caller stream progress rows without the
/// scheduler itself depending on any output adapter.
pub fn run_trial(
    trial_id: usize,
    dataset: &Dataset,
    pool: &mut RulePool,
    config: &RunConfig,
    mut on_generation: impl FnMut(&evolve::GenerationReport),
) -> TrialReport {
    let mut rng = SmallRng::seed_from_u64(trial_seed(config.random_seed, trial_id));
    let mut population = Population::random(config, dataset.width(), &mut rng);
    let mut histograms = Histograms::new(config, dataset.width());

    let accepted_before = pool.len();
    let mut generations_run = 0usize;
    let mut stopped_on_capacity = false;
    let mut final_mean_fitness = 0.0;

    for generation in 0..config.generations {
        if pool.is_full() {
            stopped_on_capacity = true;
            break;
        }
        let report = evolve::run_generation(generation, &mut population, dataset, pool, &mut histograms, config, &mut rng);
        generations_run += 1;
        final_mean_fitness = report.mean_fitness;
        #[cfg(feature = "cli")]
        log::debug!(
            "trial {trial_id} generation {generation}: accepted+={} pool={}",
            report.accepted_this_generation,
            report.accepted_cumulative
        );
        on_generation(&report);
    }

    TrialReport {
        trial_id,
        generations_run,
        accepted_by_this_trial: pool.len() - accepted_before,
        stopped_on_capacity,
        final_mean_fitness,
    }
}

/// run `config.trial_count` trials starting at `config.trial_start_id`
/// against one shared pool, sequentially.
pub fn run_trials_sequential(dataset: &Dataset, pool: &mut RulePool, config: &RunConfig) -> Vec<TrialReport> {
    (config.trial_start_id..config.trial_start_id + config.trial_count)
        .map(|trial_id| run_trial(trial_id, dataset, pool, config, |_| {}))
        .collect()
}

/// run trials in parallel over independent scratch state, merging
/// each trial's accepted rules into the shared pool afterward in
/// trial-id order (so pool contents stay deterministic regardless of
/// which trial's worker thread finishes first).
#[cfg(feature = "parallel")]
pub fn run_trials_parallel(dataset: &Dataset, pool: &mut RulePool, config: &RunConfig) -> Vec<TrialReport> {
    use rayon::prelude::*;

    // Size the pool explicitly to the host's core count, same role as
    // the teacher's `num_cpus::get()` sharding, rather than leaning on
    // rayon's implicit global pool.
    let worker_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build()
        .expect("building the trial thread pool");

    let trial_ids: Vec<usize> = (config.trial_start_id..config.trial_start_id + config.trial_count).collect();
    let per_trial: Vec<(TrialReport, Vec<crate::pool::Rule>)> = worker_pool.install(|| {
        trial_ids
            .par_iter()
            .map(|&trial_id| {
                // Each worker gets its own pool shadow bounded by the same
                // capacity, since acceptance/duplicate decisions depend on
                // pool contents that cannot be observed across threads
                // mid-run; candidates are merged into the real pool after.
                let mut shadow = RulePool::new(config.rule_pool_max);
                let report = run_trial(trial_id, dataset, &mut shadow, config, |_| {});
                (report, shadow.rules().to_vec())
            })
            .collect()
    });

    let mut reports = Vec::with_capacity(per_trial.len());
    for (report, rules) in per_trial {
        for rule in rules {
            pool.try_insert(rule);
        }
        reports.push(report);
    }
    reports
}
