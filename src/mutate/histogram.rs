//! Rolling usage histogram (§4.7): a ring of `H` generation slots over
//! a fixed domain. Grounded on the teacher's `clustering::Histogram`
//! witness/absorb idiom, adapted from a per-key `HashMap` to a dense
//! `Vec<f64>` since the domain here (attribute index, or lag) is a
//! small dense integer range rather than an open key space.

use rand::Rng;

#[derive(Debug, Clone)]
pub struct UsageHistogram {
    /// history[0] is the current (youngest) generation's slot
    history: Vec<Vec<f64>>,
    domain: usize,
    generation: usize,
    reseed_period: usize,
}

impl UsageHistogram {
    pub fn new(history_length: usize, domain: usize, reseed_period: usize) -> Self {
        Self {
            history: vec![vec![0.0; domain]; history_length.max(1)],
            domain,
            generation: 0,
            reseed_period: reseed_period.max(1),
        }
    }

    /// record one occurrence of `bin` in the current generation slot
    pub fn witness(&mut self, bin: usize, amount: f64) {
        self.history[0][bin] += amount;
    }

    /// shift the ring by one generation; every `reseed_period`
    /// generations the newest slot is seeded to 1 everywhere instead
    /// of 0, so no bin can permanently collapse (§9 decision #2).
    pub fn advance_generation(&mut self) {
        self.generation += 1;
        self.history.rotate_right(1);
        let reseed = self.generation % self.reseed_period == 0;
        let fill = if reseed { 1.0 } else { 0.0 };
        self.history[0] = vec![fill; self.domain];
    }

    pub fn total(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.domain];
        for slot in &self.history {
            for (t, &v) in total.iter_mut().zip(slot.iter()) {
                *t += v;
            }
        }
        total
    }

    /// roulette-wheel draw over the rolling total; uniform fallback
    /// on a zero-mass histogram (§4.9)
    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        let total = self.total();
        let sum: f64 = total.iter().sum();
        if sum <= 0.0 {
            return rng.random_range(0..self.domain);
        }
        let r = rng.random_range(0.0..sum);
        let mut running = 0.0;
        for (i, &v) in total.iter().enumerate() {
            running += v;
            if running > r {
                return i;
            }
        }
        self.domain - 1
    }
}
