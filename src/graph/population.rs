use super::individual::Individual;
use crate::config::RunConfig;
use crate::FITNESS_SEED_EPS;
use rand::Rng;

/// Ordered list of individuals with fitness and rank (§3).
#[derive(Debug, Clone)]
pub struct Population {
    pub individuals: Vec<Individual>,
    pub fitness: Vec<f64>,
    pub rank: Vec<usize>,
}

impl Population {
    pub fn random(config: &RunConfig, attribute_count: usize, rng: &mut impl Rng) -> Self {
        let individuals: Vec<Individual> = (0..config.population)
            .map(|_| Individual::random(config, attribute_count, rng))
            .collect();
        let fitness = Self::seeded_fitness(individuals.len());
        let rank = vec![0; individuals.len()];
        Self {
            individuals,
            fitness,
            rank,
        }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// fitness[i] := -i * eps, giving deterministic ordering at birth (§3, §4.5)
    pub fn seeded_fitness(n: usize) -> Vec<f64> {
        (0..n).map(|i| -(i as f64) * FITNESS_SEED_EPS).collect()
    }

    pub fn reset_fitness(&mut self) {
        self.fitness = Self::seeded_fitness(self.individuals.len());
    }

    /// rank[i] := |{ j : fitness[j] > fitness[i] }| (§4.6)
    pub fn recompute_ranks(&mut self) {
        let fitness = &self.fitness;
        for i in 0..fitness.len() {
            self.rank[i] = fitness.iter().filter(|&&f| f > fitness[i]).count();
        }
    }

    /// individual index currently holding rank `r`
    pub fn at_rank(&self, r: usize) -> usize {
        self.rank
            .iter()
            .position(|&rank| rank == r)
            .expect("ranks are a permutation of 0..len")
    }
}
