//! DataFrame loader (§4.10). Reads the header to locate the unique
//! `X` and `T`/`timestamp` columns; every other column becomes a
//! named binary attribute. Uses `csv` rather than hand-rolled
//! `str::split(',')` so quoting/escaping in a real input file is
//! handled correctly — the one place this crate still does real
//! file-format parsing despite §1 scoping CSV ingestion "out of
//! scope" as a component, because the contract in §6 is explicit.

use super::dataset::Dataset;
use super::record::{Row, Trinary};
use super::timestamp::Timestamp;
use anyhow::{anyhow, Context, Result};
use std::path::Path;

pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening input file {}", path.display()))?;

    let headers = reader
        .headers()
        .context("reading header row")?
        .iter()
        .map(str::to_owned)
        .collect::<Vec<_>>();

    let x_index = single_column_index(&headers, |name| name == "X")
        .context("input header must contain exactly one column named `X`")?;
    let t_index = single_column_index(&headers, |name| name == "T" || name == "timestamp")
        .context("input header must contain exactly one column named `T` or `timestamp`")?;

    let attribute_indices: Vec<usize> = (0..headers.len())
        .filter(|i| *i != x_index && *i != t_index)
        .collect();
    let attribute_names: Vec<String> = attribute_indices
        .iter()
        .map(|&i| headers[i].clone())
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading data row {}", line + 2))?;
        if record.len() != headers.len() {
            return Err(anyhow!(
                "row {} has {} cells, expected {} (ragged row)",
                line + 2,
                record.len(),
                headers.len()
            ));
        }

        let x: f64 = record[x_index]
            .trim()
            .parse()
            .with_context(|| format!("row {}: `X` cell {:?} is not a number", line + 2, &record[x_index]))?;
        let timestamp = Timestamp::parse(&record[t_index])
            .with_context(|| format!("row {}: timestamp cell invalid", line + 2))?;

        let attrs = attribute_indices
            .iter()
            .map(|&i| {
                let cell = record[i].trim();
                let value: i64 = cell
                    .parse()
                    .unwrap_or(i64::MIN); // non-numeric cells are treated as "other" (missing), per §6
                Trinary::from(value)
            })
            .collect();

        rows.push(Row {
            attrs,
            x,
            timestamp,
        });
    }

    Ok(Dataset::new(attribute_names, rows))
}

fn single_column_index(headers: &[String], predicate: impl Fn(&str) -> bool) -> Option<usize> {
    let mut found = None;
    for (i, name) in headers.iter().enumerate() {
        if predicate(name) {
            if found.is_some() {
                return None;
            }
            found = Some(i);
        }
    }
    found
}
