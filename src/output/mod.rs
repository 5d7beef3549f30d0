//! Output adapters (§6): the three file contracts a run produces.
//! Kept separate from the evolutionary core so `evolve`/`trial` stay
//! pure of file IO; the `bin/tempograph` entry point wires these in.

pub mod csv;
pub mod progress;

pub use self::csv::{write_rule_pool, write_verification};
pub use progress::ProgressWriter;
