use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names of the registration snapshot
// ---------------------------------------------------------------------------

pub const COL_COUNTY: &str = "County";
pub const COL_CITY: &str = "City";
pub const COL_MODEL_YEAR: &str = "Model Year";
pub const COL_MAKE: &str = "Make";
pub const COL_EV_TYPE: &str = "Electric Vehicle Type";
pub const COL_ELECTRIC_RANGE: &str = "Electric Range";
pub const COL_LOCATION: &str = "Vehicle Location";

/// Derived columns appended by the region filter.
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

// ---------------------------------------------------------------------------
// FieldValue – a single cell of a registration row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, inferred per cell at load time.
/// Rows are deduplicated exactly, so `FieldValue` must be `Eq + Hash`
/// including floats (bit-level, NaN placeholders included).
#[derive(Debug, Clone)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual PartialEq/Eq so Float compares bit-level (NaN == NaN) --

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        use FieldValue::*;
        match (self, other) {
            (String(a), String(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Bool(a), Bool(b)) => a == b,
            (Null, Null) => true,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::String(s) => s.hash(state),
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Bool(b) => b.hash(state),
            FieldValue::Null => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Null => Ok(()),
        }
    }
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric reading of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Registration – one row of the snapshot
// ---------------------------------------------------------------------------

/// A single vehicle registration (one row of the source table).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Registration {
    /// Dynamic columns: column_name → value.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Registration {
    pub fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Registration { fields }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// `Model Year` as an integer, if present and integral.
    pub fn model_year(&self) -> Option<i64> {
        self.get(COL_MODEL_YEAR).and_then(FieldValue::as_i64)
    }

    /// `Make` as a string, if present.
    pub fn make(&self) -> Option<&str> {
        self.get(COL_MAKE).and_then(FieldValue::as_str)
    }

    /// `Electric Range` as a number, if present and numeric.
    pub fn electric_range(&self) -> Option<f64> {
        self.get(COL_ELECTRIC_RANGE).and_then(FieldValue::as_f64)
    }

    /// Raw `Vehicle Location` WKT point text, if present.
    pub fn location(&self) -> Option<&str> {
        self.get(COL_LOCATION).and_then(FieldValue::as_str)
    }
}

// ---------------------------------------------------------------------------
// VehicleDataset – the complete loaded snapshot
// ---------------------------------------------------------------------------

/// The full tabular snapshot: rows plus the ordered union of column names.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDataset {
    /// All registrations (rows), in source order.
    pub records: Vec<Registration>,
    /// Sorted union of column names across all rows.
    pub column_names: Vec<String>,
}

impl VehicleDataset {
    /// Build the column index from the loaded rows.
    pub fn from_records(records: Vec<Registration>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        for rec in &records {
            for col in rec.fields.keys() {
                column_names_set.insert(col.clone());
            }
        }
        VehicleDataset {
            records,
            column_names: column_names_set.into_iter().collect(),
        }
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
