/// Data layer: core types, loading, cleaning, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → VehicleDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop duplicates / missing, coerce Electric Range
///   └──────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌──────────┐   ┌──────────┐   ┌──────────┐
///   │ aggregate │   │   geo     │   │ aggregate │
///   │ by year   │   │ WA filter │   │ by make   │
///   └──────────┘   └──────────┘   └──────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod geo;
pub mod loader;
pub mod model;
