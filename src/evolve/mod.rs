//! Evolutionary driver (§2, §4.5, §4.6): fitness, ranking, elite
//! triplication, crossover, mutation, and the per-generation loop
//! body. Grounded in shape on the `radiate` example's
//! `GeneticEngine::run` stage sequence (evaluate -> select -> alter),
//! adapted to this spec's elite-triplication scheme in place of
//! radiate's survivor/offspring split.

pub mod crossover;
pub mod driver;
pub mod extract;
pub mod fitness;
pub mod mutation;
pub mod selection;

pub use driver::{run_generation, GenerationReport};
pub use extract::GenerationStats;
