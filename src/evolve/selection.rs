//! Elite triplication (§4.6): the only mechanism that retains good
//! individuals. Copies genes from ranked survivors into a fresh
//! buffer, then swaps buffers — no aliasing during the copy (§9
//! ownership-of-genes note).

use crate::graph::Population;

/// top `E = M/3` individuals (by rank) occupy three contiguous
/// copies: `[0,E)`, `[E,2E)`, `[2E,3E)`. With `M` a multiple of 3
/// (enforced by config validation) this fills the whole population.
pub fn elite_triplicate(population: &mut Population) {
    let m = population.len();
    let e = m / 3;
    let elite: Vec<_> = (0..e).map(|rank| population.individuals[population.at_rank(rank)].clone()).collect();

    let mut fresh = Vec::with_capacity(m);
    for _ in 0..3 {
        fresh.extend(elite.iter().cloned());
    }
    population.individuals = fresh;
}
