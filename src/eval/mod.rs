pub mod accumulator;
pub mod chain;
pub mod evaluator;

pub use accumulator::Cell;
pub use chain::Chain;
pub use evaluator::{evaluate, Evaluation};
