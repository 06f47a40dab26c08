use std::collections::HashSet;

use super::model::{FieldValue, Registration, VehicleDataset, COL_ELECTRIC_RANGE};

// ---------------------------------------------------------------------------
// Cleaning stages
// ---------------------------------------------------------------------------
//
// Stage order is duplicates → missing values → numeric coercion.  A
// coercion failure becomes `Float(NAN)` rather than `Null`: rows whose
// `Electric Range` token cannot be parsed survive with a NaN range,
// rows with genuinely empty cells are dropped, and a second pass over
// an already-clean snapshot is a no-op.

/// Remove rows that are field-wise identical to an earlier row.
/// Order of first occurrences is preserved.
pub fn drop_duplicates(dataset: &VehicleDataset) -> VehicleDataset {
    let mut seen: HashSet<Registration> = HashSet::with_capacity(dataset.len());
    let mut kept = Vec::with_capacity(dataset.len());

    for rec in &dataset.records {
        if seen.insert(rec.clone()) {
            kept.push(rec.clone());
        }
    }
    VehicleDataset::from_records(kept)
}

/// Remove rows with a `Null` cell, or with no cell at all for a column
/// that appears elsewhere in the snapshot.
pub fn drop_missing(dataset: &VehicleDataset) -> VehicleDataset {
    let kept = dataset
        .records
        .iter()
        .filter(|rec| {
            dataset
                .column_names
                .iter()
                .all(|col| rec.get(col).is_some_and(|v| !v.is_null()))
        })
        .cloned()
        .collect();
    VehicleDataset::from_records(kept)
}

/// Re-parse one column as numeric.  Integers and floats pass through,
/// numeric-looking strings re-parse to `Float`, everything else becomes
/// `Float(NAN)`.
pub fn coerce_numeric(dataset: &VehicleDataset, column: &str) -> VehicleDataset {
    let coerced = dataset
        .records
        .iter()
        .map(|rec| {
            let mut fields = rec.fields.clone();
            if let Some(v) = fields.get_mut(column) {
                *v = coerce_cell(v);
            }
            Registration::new(fields)
        })
        .collect();
    VehicleDataset::from_records(coerced)
}

fn coerce_cell(v: &FieldValue) -> FieldValue {
    match v {
        FieldValue::Integer(_) | FieldValue::Float(_) => v.clone(),
        FieldValue::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => FieldValue::Float(f),
            Err(_) => FieldValue::Float(f64::NAN),
        },
        FieldValue::Bool(_) | FieldValue::Null => FieldValue::Float(f64::NAN),
    }
}

/// The full cleaning pass over a raw snapshot.
///
/// Idempotent: `clean(clean(d)) == clean(d)`.  The input is never mutated.
pub fn clean(dataset: &VehicleDataset) -> VehicleDataset {
    let deduped = drop_duplicates(dataset);
    let complete = drop_missing(&deduped);
    coerce_numeric(&complete, COL_ELECTRIC_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{COL_MAKE, COL_MODEL_YEAR};

    fn row(pairs: &[(&str, FieldValue)]) -> Registration {
        Registration::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn reg(make: &FieldValue, year: i64, range: &FieldValue) -> Registration {
        row(&[
            (COL_MAKE, make.clone()),
            (COL_MODEL_YEAR, FieldValue::Integer(year)),
            (COL_ELECTRIC_RANGE, range.clone()),
        ])
    }

    fn s(v: &str) -> FieldValue {
        FieldValue::String(v.to_string())
    }

    #[test]
    fn test_drop_duplicates_keeps_first_occurrence() {
        let a = reg(&s("TESLA"), 2021, &FieldValue::Integer(215));
        let b = reg(&s("NISSAN"), 2019, &FieldValue::Integer(150));
        let ds = VehicleDataset::from_records(vec![a.clone(), b.clone(), a.clone()]);

        let out = drop_duplicates(&ds);
        assert_eq!(out.records, vec![a, b]);
    }

    #[test]
    fn test_drop_missing_null_cell() {
        let good = reg(&s("KIA"), 2020, &FieldValue::Integer(239));
        let bad = reg(&FieldValue::Null, 2018, &FieldValue::Integer(151));
        let ds = VehicleDataset::from_records(vec![good.clone(), bad]);

        let out = drop_missing(&ds);
        assert_eq!(out.records, vec![good]);
    }

    #[test]
    fn test_drop_missing_absent_column() {
        let good = reg(&s("KIA"), 2020, &FieldValue::Integer(239));
        // No Electric Range cell at all.
        let bad = row(&[
            (COL_MAKE, s("BMW")),
            (COL_MODEL_YEAR, FieldValue::Integer(2022)),
        ]);
        let ds = VehicleDataset::from_records(vec![good.clone(), bad]);

        let out = drop_missing(&ds);
        assert_eq!(out.records, vec![good]);
    }

    #[test]
    fn test_coerce_numeric_strings_and_failures() {
        let ds = VehicleDataset::from_records(vec![
            reg(&s("TESLA"), 2021, &s("215")),
            reg(&s("FORD"), 2022, &s("N/A")),
            reg(&s("KIA"), 2020, &FieldValue::Integer(239)),
        ]);

        let out = coerce_numeric(&ds, COL_ELECTRIC_RANGE);
        assert_eq!(out.records[0].electric_range(), Some(215.0));
        assert!(out.records[1].electric_range().unwrap().is_nan());
        assert_eq!(out.records[2].electric_range(), Some(239.0));
    }

    #[test]
    fn test_clean_five_row_scenario() {
        // One exact duplicate pair, one row with a missing Make, one row
        // with an unparseable Electric Range, one fully valid row.
        let dup = reg(&s("TESLA"), 2021, &FieldValue::Integer(215));
        let no_make = reg(&FieldValue::Null, 2018, &FieldValue::Integer(151));
        let bad_range = reg(&s("FORD"), 2022, &s("unknown"));
        let good = reg(&s("KIA"), 2020, &FieldValue::Integer(239));
        let ds = VehicleDataset::from_records(vec![
            dup.clone(),
            dup.clone(),
            no_make,
            bad_range,
            good,
        ]);

        let out = clean(&ds);
        assert_eq!(out.len(), 3);
        assert_eq!(out.records[0].make(), Some("TESLA"));
        assert_eq!(out.records[1].make(), Some("FORD"));
        assert!(out.records[1].electric_range().unwrap().is_nan());
        assert_eq!(out.records[2].make(), Some("KIA"));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let ds = VehicleDataset::from_records(vec![
            reg(&s("TESLA"), 2021, &s("215")),
            reg(&s("TESLA"), 2021, &s("215")),
            reg(&s("FORD"), 2022, &s("unknown")),
            reg(&FieldValue::Null, 2018, &FieldValue::Integer(151)),
            reg(&s("CHEVROLET"), 2017, &FieldValue::Integer(238)),
        ]);

        let once = clean(&ds);
        let twice = clean(&once);
        // The NaN placeholder from the unparseable range must survive the
        // second pass unchanged.
        assert!(once.records[1].electric_range().unwrap().is_nan());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_does_not_mutate_input() {
        let ds = VehicleDataset::from_records(vec![
            reg(&s("TESLA"), 2021, &s("215")),
            reg(&s("TESLA"), 2021, &s("215")),
        ]);
        let before = ds.clone();
        let _ = clean(&ds);
        assert_eq!(ds, before);
    }
}
