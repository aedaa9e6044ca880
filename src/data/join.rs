use std::fmt;

use ahash::AHashMap;
use anyhow::Result;
use serde::Deserialize;

use crate::region::{AdminCode, RegionLayer};
use super::attribute::AttributeTable;

/// Number of example codes quoted in warnings and errors.
const SAMPLE: usize = 5;

/// What to do when not a single region finds its code in an attribute table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMismatchPolicy {
    #[default]
    Warn,
    Error,
}

/// Every region code missed the attribute table, which almost always means the two
/// sides were keyed in different formats.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMismatch {
    pub table: String,
    pub region_sample: Vec<String>,
    pub table_sample: Vec<String>,
}

impl fmt::Display for KeyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
            "no region matched any row of {:?}; region codes look like [{}], table codes look like [{}]",
            self.table, self.region_sample.join(", "), self.table_sample.join(", "),
        )
    }
}

impl std::error::Error for KeyMismatch {}

/// Match statistics for one left join.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinReport {
    pub table: String,
    pub regions: usize,
    pub matched: usize,
    /// Codes of regions with no row in the table.
    pub unmatched_regions: Vec<AdminCode>,
    /// Table rows whose code matches no region.
    pub unused_rows: usize,
    /// Table rows dropped because an earlier row had the same code.
    pub duplicates: usize,
    /// Per-region match flags, in region order.
    pub matched_mask: Vec<bool>,
}

impl JoinReport {
    pub fn is_complete(&self) -> bool { self.matched == self.regions }

    fn warn(&self) {
        if self.matched == 0 || self.is_complete() { return }
        let sample = self.unmatched_regions.iter()
            .take(SAMPLE)
            .map(AdminCode::as_str)
            .collect::<Vec<_>>();
        eprintln!(
            "[join] warning: {}: {} of {} regions have no row (e.g. {})",
            self.table, self.unmatched_regions.len(), self.regions, sample.join(", "),
        );
    }
}

/// Left join: add `table`'s measure to `layer` as column `column`, aligned to region order.
/// Every region survives; regions without a row get null. The first row for a code wins.
pub fn left_join(
    layer: &mut RegionLayer,
    table: &AttributeTable,
    column: &str,
    policy: KeyMismatchPolicy,
    verbose: u8,
) -> Result<JoinReport> {
    let mut lookup: AHashMap<&AdminCode, Option<f64>> = AHashMap::with_capacity(table.len());
    let mut duplicates = 0;
    for row in &table.rows {
        if lookup.contains_key(&row.code) {
            duplicates += 1;
        } else {
            lookup.insert(&row.code, row.value);
        }
    }

    let mut values = Vec::with_capacity(layer.len());
    let mut matched_mask = Vec::with_capacity(layer.len());
    let mut unmatched_regions = Vec::new();
    for code in layer.codes() {
        let hit = lookup.get(code);
        if hit.is_none() { unmatched_regions.push(code.clone()) }
        matched_mask.push(hit.is_some());
        values.push(hit.copied().flatten());
    }

    let matched = matched_mask.iter().filter(|&&m| m).count();
    let unused_rows = lookup.keys().filter(|code| layer.row_of(code).is_none()).count();

    let report = JoinReport {
        table: table.name.clone(),
        regions: layer.len(),
        matched,
        unmatched_regions,
        unused_rows,
        duplicates,
        matched_mask,
    };

    if matched == 0 && !layer.is_empty() {
        let mismatch = KeyMismatch {
            table: table.name.clone(),
            region_sample: layer.codes().iter().take(SAMPLE).map(|c| c.to_string()).collect(),
            table_sample: table.rows.iter().take(SAMPLE).map(|r| r.code.to_string()).collect(),
        };
        match policy {
            KeyMismatchPolicy::Error => return Err(mismatch.into()),
            KeyMismatchPolicy::Warn => eprintln!("[join] warning: {mismatch}"),
        }
    }

    report.warn();
    if verbose > 0 {
        eprintln!(
            "[join] {}: matched {}/{} regions ({} unused rows, {} duplicate codes)",
            report.table, report.matched, report.regions, report.unused_rows, report.duplicates,
        );
    }

    layer.set_measure(column, values)?;
    Ok(report)
}

/// Count regions matched by exactly one of two independently joined sources.
/// A nonzero count means the sources disagree on which units they cover.
pub fn divergence(a: &JoinReport, b: &JoinReport) -> usize {
    a.matched_mask.iter()
        .zip(&b.matched_mask)
        .filter(|(x, y)| x != y)
        .count()
}
