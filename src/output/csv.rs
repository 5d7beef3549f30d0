//! Rule-pool and per-rule verification CSV writers (§6). These are
//! output adapters in the external-collaborator sense (§1's
//! out-of-scope list), but implemented here rather than stubbed since
//! the concrete contract (column order, token format) is specified.

use anyhow::Context;
use std::path::Path;

use crate::config::Dialect;
use crate::data::Dataset;
use crate::pool::rule::CANONICAL_WIDTH;
use crate::pool::{Rule, RulePool};

/// `NAME(t-lag)` for an occupied slot, `0` for a zero-padded slot.
fn attribute_token(attributes: &[u16; CANONICAL_WIDTH], lags: &[u32; CANONICAL_WIDTH], slot: usize, dataset: &Dataset) -> String {
    let attr = attributes[slot];
    if attr == 0 {
        "0".to_string()
    } else {
        let name = dataset.attribute_name((attr - 1) as usize);
        format!("{}(t-{})", name, lags[slot])
    }
}

/// one row per accepted rule: 8 attribute-with-lag tokens, mean(s),
/// sigma(s), support_count, effective_denominator, both quality
/// flags, num_attributes, and (Dialect B only) the temporal summary.
pub fn write_rule_pool(path: &Path, pool: &RulePool, dataset: &Dataset, dialect: &Dialect) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening rule-pool output {}", path.display()))?;

    let dual_horizon = matches!(dialect, Dialect::Quadrant { .. });
    writer.write_record(header(dual_horizon))?;
    for rule in pool.rules() {
        writer.write_record(rule_record(rule, dataset, dual_horizon))?;
    }
    writer.flush().context("flushing rule-pool output")?;
    Ok(())
}

fn header(dual_horizon: bool) -> Vec<String> {
    let mut header: Vec<String> = (1..=CANONICAL_WIDTH).map(|i| format!("attr_{i}")).collect();
    header.push("mean1".into());
    header.push("sigma1".into());
    if dual_horizon {
        header.push("mean2".into());
        header.push("sigma2".into());
    }
    header.push("support_count".into());
    header.push("effective_denominator".into());
    header.push("high_support_flag".into());
    header.push("low_variance_flag".into());
    header.push("num_attributes".into());
    if dual_horizon {
        header.push("dominant_month".into());
        header.push("dominant_quarter".into());
        header.push("dominant_weekday".into());
        header.push("start_timestamp".into());
        header.push("end_timestamp".into());
        header.push("span_days".into());
    }
    header
}

fn rule_record(rule: &Rule, dataset: &Dataset, dual_horizon: bool) -> Vec<String> {
    let mut record: Vec<String> = (0..CANONICAL_WIDTH)
        .map(|slot| attribute_token(&rule.attributes, &rule.lags, slot, dataset))
        .collect();
    record.push(rule.mean1.to_string());
    record.push(rule.sigma1.to_string());
    if dual_horizon {
        record.push(rule.mean2.map(|v| v.to_string()).unwrap_or_default());
        record.push(rule.sigma2.map(|v| v.to_string()).unwrap_or_default());
    }
    record.push(rule.support_count.to_string());
    record.push(rule.effective_denominator.to_string());
    record.push(rule.high_support.to_string());
    record.push(rule.low_variance.to_string());
    record.push(rule.num_attributes.to_string());
    if dual_horizon {
        if let Some(temporal) = &rule.temporal {
            record.push(temporal.dominant_month.to_string());
            record.push(temporal.dominant_quarter.to_string());
            record.push(temporal.dominant_weekday.to_string());
            record.push(temporal.start_timestamp.map(|t| t.to_string()).unwrap_or_default());
            record.push(temporal.end_timestamp.map(|t| t.to_string()).unwrap_or_default());
            record.push(temporal.span_days.to_string());
        } else {
            record.extend(std::iter::repeat(String::new()).take(6));
        }
    }
    record
}

/// A record matches a rule when every occupied canonical attribute
/// slot is `True` at that slot's recorded lag relative to the record
/// (the rule's conjunction, replayed directly against the raw data
/// rather than the transient path state from the generation that
/// first found it).
fn matches_at(rule: &Rule, dataset: &Dataset, row: usize) -> bool {
    for slot in 0..CANONICAL_WIDTH {
        let attr = rule.attributes[slot];
        if attr == 0 {
            continue;
        }
        let lag = rule.lags[slot] as usize;
        if lag > row {
            return false;
        }
        if !dataset.attr(row - lag, (attr - 1) as usize).is_true() {
            return false;
        }
    }
    true
}

/// Dialect B per-rule verification file: one row per dataset record
/// (timestamp, x, rule mean/sigma, matched flag, month/quarter/weekday).
pub fn write_verification(path: &Path, rule: &Rule, dataset: &Dataset) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening verification output {}", path.display()))?;
    writer.write_record(["timestamp", "x", "mean", "sigma", "matched", "month", "quarter", "weekday"])?;

    for i in 0..dataset.len() {
        let timestamp = dataset.timestamp(i);
        writer.write_record([
            timestamp.to_string(),
            dataset.x(i).to_string(),
            rule.mean1.to_string(),
            rule.sigma1.to_string(),
            if matches_at(rule, dataset, i) { "1".to_string() } else { "0".to_string() },
            timestamp.month.to_string(),
            timestamp.quarter.to_string(),
            timestamp.weekday.to_string(),
        ])?;
    }
    writer.flush().context("flushing verification output")?;
    Ok(())
}
