//! Timestamp parsing contract (§6): year/month/day, derived quarter
//! and ISO weekday, plus a real-time-monotone ordinal used for
//! rolling-window reporting in the temporal-pattern summary (§4.8).

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub quarter: u32,
    /// 1..=7, 1 = Monday
    pub weekday: u32,
    /// days since a fixed epoch, monotone with real time
    pub ordinal: i64,
}

impl Timestamp {
    pub fn parse(text: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .with_context(|| format!("timestamp {:?} is not YYYY-MM-DD", text))?;
        Ok(Self::from_date(date))
    }

    fn from_date(date: NaiveDate) -> Self {
        let month = date.month();
        let weekday = match date.weekday() {
            Weekday::Mon => 1,
            Weekday::Tue => 2,
            Weekday::Wed => 3,
            Weekday::Thu => 4,
            Weekday::Fri => 5,
            Weekday::Sat => 6,
            Weekday::Sun => 7,
        };
        Self {
            year: date.year(),
            month,
            day: date.day(),
            quarter: (month - 1) / 3 + 1,
            weekday,
            ordinal: date.num_days_from_ce() as i64,
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
