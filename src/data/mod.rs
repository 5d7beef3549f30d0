pub mod dataset;
pub mod loader;
pub mod record;
pub mod timestamp;

pub use dataset::Dataset;
pub use record::{Row, Trinary};
pub use timestamp::Timestamp;
