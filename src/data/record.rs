//! Trinary attribute cell and one row of the input matrix (§3).

use serde::{Deserialize, Serialize};

/// A binary attribute value with an explicit missing sentinel, per
/// §3's "trinary with semantics {false, true, missing}".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trinary {
    False,
    True,
    Missing,
}

impl Trinary {
    pub fn is_true(&self) -> bool {
        matches!(self, Trinary::True)
    }
}

impl From<i64> for Trinary {
    fn from(value: i64) -> Self {
        match value {
            0 => Trinary::False,
            1 => Trinary::True,
            _ => Trinary::Missing,
        }
    }
}

/// One row: the attribute bitvector, the target value, and its timestamp.
#[derive(Debug, Clone)]
pub struct Row {
    pub attrs: Vec<Trinary>,
    pub x: f64,
    pub timestamp: crate::data::timestamp::Timestamp,
}
