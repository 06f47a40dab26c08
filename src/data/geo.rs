use super::model::{FieldValue, Registration, VehicleDataset, COL_LATITUDE, COL_LONGITUDE};

// ---------------------------------------------------------------------------
// Coordinates and regions
// ---------------------------------------------------------------------------

/// A geographic coordinate parsed from a WKT point literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Axis-aligned lat/lon rectangle used as an inclusion filter.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Washington State, the region covered by the registration snapshot.
pub const WASHINGTON: BoundingBox = BoundingBox {
    min_lat: 45.5,
    max_lat: 49.1,
    min_lon: -124.8,
    max_lon: -116.9,
};

impl BoundingBox {
    /// Inclusive on both axes.
    pub fn contains(&self, c: Coordinate) -> bool {
        self.min_lat <= c.latitude
            && c.latitude <= self.max_lat
            && self.min_lon <= c.longitude
            && c.longitude <= self.max_lon
    }
}

// ---------------------------------------------------------------------------
// WKT point parsing
// ---------------------------------------------------------------------------

/// Parse a WKT point literal `POINT (<lon> <lat>)`.
///
/// Longitude comes FIRST in the literal (well-known-text convention); the
/// returned [`Coordinate`] swaps the order into lat/lon.  Malformed text
/// is an expected condition and yields `None` rather than an error.
pub fn parse_point(text: &str) -> Option<Coordinate> {
    let interior = text.strip_prefix("POINT (")?.strip_suffix(')')?;

    let mut tokens = interior.split(' ');
    let lon = tokens.next()?.parse::<f64>().ok()?;
    let lat = tokens.next()?.parse::<f64>().ok()?;
    if tokens.next().is_some() {
        return None;
    }

    Some(Coordinate {
        latitude: lat,
        longitude: lon,
    })
}

// ---------------------------------------------------------------------------
// Region filter
// ---------------------------------------------------------------------------

/// Keep rows whose `Vehicle Location` parses to a coordinate inside the
/// box.  Rows without a parseable location are excluded; input order is
/// preserved.  Survivors gain `Latitude` / `Longitude` float columns for
/// the scatter-map view.
pub fn filter_to_region(dataset: &VehicleDataset, bbox: &BoundingBox) -> VehicleDataset {
    let kept = dataset
        .records
        .iter()
        .filter_map(|rec| {
            let coord = rec.location().and_then(parse_point)?;
            if !bbox.contains(coord) {
                return None;
            }
            let mut fields = rec.fields.clone();
            fields.insert(COL_LATITUDE.to_string(), FieldValue::Float(coord.latitude));
            fields.insert(COL_LONGITUDE.to_string(), FieldValue::Float(coord.longitude));
            Some(Registration::new(fields))
        })
        .collect();
    VehicleDataset::from_records(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{COL_LOCATION, COL_MAKE};

    fn located(make: &str, location: &str) -> Registration {
        Registration::new(
            [
                (COL_MAKE.to_string(), FieldValue::String(make.to_string())),
                (
                    COL_LOCATION.to_string(),
                    FieldValue::String(location.to_string()),
                ),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn test_parse_point_swaps_lon_lat() {
        let c = parse_point("POINT (-122.33 47.60)").unwrap();
        assert_eq!(c.latitude, 47.60);
        assert_eq!(c.longitude, -122.33);
    }

    #[test]
    fn test_parse_point_rejects_malformed() {
        assert_eq!(parse_point("garbage"), None);
        assert_eq!(parse_point("POINT (1 2 3)"), None);
        assert_eq!(parse_point("POINT (a b)"), None);
        assert_eq!(parse_point("POINT (-122.33)"), None);
        assert_eq!(parse_point("POINT (-122.33 47.60"), None);
        assert_eq!(parse_point(""), None);
    }

    #[test]
    fn test_bounding_box_bounds_are_inclusive() {
        let on_corner = Coordinate {
            latitude: 45.5,
            longitude: -124.8,
        };
        let just_south = Coordinate {
            latitude: 45.4999,
            longitude: -124.8,
        };
        assert!(WASHINGTON.contains(on_corner));
        assert!(!WASHINGTON.contains(just_south));
    }

    #[test]
    fn test_filter_to_region_keeps_order_and_adds_columns() {
        let ds = VehicleDataset::from_records(vec![
            located("TESLA", "POINT (-122.33 47.60)"),
            located("FORD", "not a point"),
            located("KIA", "POINT (-0.12 51.50)"), // London, out of region
            located("NISSAN", "POINT (-117.42 47.65)"),
        ]);

        let out = filter_to_region(&ds, &WASHINGTON);
        assert_eq!(out.len(), 2);
        assert_eq!(out.records[0].make(), Some("TESLA"));
        assert_eq!(out.records[1].make(), Some("NISSAN"));

        let lat = out.records[0].get(COL_LATITUDE).unwrap().as_f64().unwrap();
        let lon = out.records[0].get(COL_LONGITUDE).unwrap().as_f64().unwrap();
        assert_eq!(lat, 47.60);
        assert_eq!(lon, -122.33);
        assert!(out.column_names.contains(&COL_LATITUDE.to_string()));
    }

    #[test]
    fn test_filter_to_region_skips_rows_without_location() {
        let rec = Registration::new(
            [(COL_MAKE.to_string(), FieldValue::String("BMW".into()))]
                .into_iter()
                .collect(),
        );
        let ds = VehicleDataset::from_records(vec![rec]);
        assert!(filter_to_region(&ds, &WASHINGTON).is_empty());
    }
}
