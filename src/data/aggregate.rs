use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{Registration, VehicleDataset};

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// Registrations per model year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i64,
    pub count: u64,
}

/// Registrations per manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakeCount {
    pub make: String,
    pub count: u64,
}

/// Group rows by `Model Year`, ascending.  Rows without an integer year
/// are skipped; years with no rows are simply absent (no gap filling).
pub fn count_by_year(dataset: &VehicleDataset) -> Vec<YearCount> {
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for rec in &dataset.records {
        if let Some(year) = rec.model_year() {
            *counts.entry(year).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Group rows by `Make`, descending by count.  The sort is stable over
/// first-encounter order, so ties keep the order the makes appeared in.
pub fn count_by_make(dataset: &VehicleDataset) -> Vec<MakeCount> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for rec in &dataset.records {
        if let Some(make) = rec.make() {
            if !counts.contains_key(make) {
                first_seen.push(make.to_string());
            }
            *counts.entry(make.to_string()).or_default() += 1;
        }
    }

    let mut out: Vec<MakeCount> = first_seen
        .into_iter()
        .map(|make| {
            let count = counts[&make];
            MakeCount { make, count }
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

// ---------------------------------------------------------------------------
// Column projection
// ---------------------------------------------------------------------------

/// Project every row down to the named columns (those it has), in row
/// order.  Used for the table view of the dashboard.
pub fn select_columns(dataset: &VehicleDataset, columns: &[&str]) -> VehicleDataset {
    let projected = dataset
        .records
        .iter()
        .map(|rec| {
            let fields = columns
                .iter()
                .filter_map(|col| rec.get(col).map(|v| (col.to_string(), v.clone())))
                .collect();
            Registration::new(fields)
        })
        .collect();
    VehicleDataset::from_records(projected)
}
