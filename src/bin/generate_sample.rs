use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// (city, county, lon, lat)
const CITIES: &[(&str, &str, f64, f64)] = &[
    ("Seattle", "King", -122.33, 47.60),
    ("Bellevue", "King", -122.15, 47.61),
    ("Tacoma", "Pierce", -122.44, 47.25),
    ("Spokane", "Spokane", -117.42, 47.65),
    ("Vancouver", "Clark", -122.66, 45.63),
    ("Olympia", "Thurston", -122.90, 47.03),
];

/// (make, electric vehicle type, typical range in miles)
const MAKES: &[(&str, &str, f64)] = &[
    ("TESLA", "Battery Electric Vehicle (BEV)", 280.0),
    ("TESLA", "Battery Electric Vehicle (BEV)", 280.0),
    ("TESLA", "Battery Electric Vehicle (BEV)", 280.0),
    ("NISSAN", "Battery Electric Vehicle (BEV)", 150.0),
    ("NISSAN", "Battery Electric Vehicle (BEV)", 150.0),
    ("CHEVROLET", "Battery Electric Vehicle (BEV)", 259.0),
    ("CHEVROLET", "Battery Electric Vehicle (BEV)", 259.0),
    ("KIA", "Battery Electric Vehicle (BEV)", 239.0),
    ("FORD", "Plug-in Hybrid Electric Vehicle (PHEV)", 21.0),
    ("BMW", "Plug-in Hybrid Electric Vehicle (PHEV)", 30.0),
    ("TOYOTA", "Plug-in Hybrid Electric Vehicle (PHEV)", 25.0),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One generated row; `Option` cells become empty CSV fields / parquet nulls.
struct Row {
    county: Option<String>,
    city: Option<String>,
    model_year: Option<i64>,
    make: Option<String>,
    ev_type: Option<String>,
    electric_range: Option<String>,
    location: Option<String>,
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    let &(city, county, lon, lat) = rng.pick(CITIES);
    let &(make, ev_type, base_range) = rng.pick(MAKES);

    // Adoption skews toward recent model years.
    let year = 2011 + ((rng.next_f64().powf(0.5) * 13.0) as i64).min(13);
    let range = rng.gauss(base_range, base_range * 0.1).max(6.0).round() as i64;

    let lon = lon + rng.gauss(0.0, 0.05);
    let lat = lat + rng.gauss(0.0, 0.05);

    Row {
        county: Some(county.to_string()),
        city: Some(city.to_string()),
        model_year: Some(year),
        make: Some(make.to_string()),
        ev_type: Some(ev_type.to_string()),
        electric_range: Some(range.to_string()),
        location: Some(format!("POINT ({lon:.5} {lat:.5})")),
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut rows: Vec<Row> = (0..200).map(|_| generate_row(&mut rng)).collect();

    // Dirt for the cleaning pipeline: an exact duplicate, a missing city,
    // an unparseable range token, a malformed location, and a coordinate
    // just south of the Washington box.
    rows.push(Row {
        county: rows[0].county.clone(),
        city: rows[0].city.clone(),
        model_year: rows[0].model_year,
        make: rows[0].make.clone(),
        ev_type: rows[0].ev_type.clone(),
        electric_range: rows[0].electric_range.clone(),
        location: rows[0].location.clone(),
    });
    rows.push(Row {
        city: None,
        ..generate_row(&mut rng)
    });
    rows.push(Row {
        electric_range: Some("N/A".to_string()),
        ..generate_row(&mut rng)
    });
    rows.push(Row {
        location: Some("POINT (-122.33)".to_string()),
        ..generate_row(&mut rng)
    });
    rows.push(Row {
        location: Some("POINT (-122.68 45.42)".to_string()),
        ..generate_row(&mut rng)
    });

    write_csv("sample_registrations.csv", &rows);
    write_parquet("sample_registrations.parquet", &rows);

    println!(
        "Wrote {} registrations to sample_registrations.csv / .parquet",
        rows.len()
    );
}

const HEADERS: [&str; 7] = [
    "County",
    "City",
    "Model Year",
    "Make",
    "Electric Vehicle Type",
    "Electric Range",
    "Vehicle Location",
];

fn write_csv(path: &str, rows: &[Row]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer.write_record(HEADERS).expect("Failed to write header");

    let cell = |v: &Option<String>| v.clone().unwrap_or_default();
    for row in rows {
        writer
            .write_record([
                cell(&row.county),
                cell(&row.city),
                row.model_year.map(|y| y.to_string()).unwrap_or_default(),
                cell(&row.make),
                cell(&row.ev_type),
                cell(&row.electric_range),
                cell(&row.location),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(path: &str, rows: &[Row]) {
    let opt_str = |f: fn(&Row) -> Option<&str>| -> StringArray {
        rows.iter().map(f).collect::<Vec<_>>().into()
    };

    let county_array = opt_str(|r| r.county.as_deref());
    let city_array = opt_str(|r| r.city.as_deref());
    let year_array = Int64Array::from(rows.iter().map(|r| r.model_year).collect::<Vec<_>>());
    let make_array = opt_str(|r| r.make.as_deref());
    let type_array = opt_str(|r| r.ev_type.as_deref());
    // Mixed numeric/token column, so it stays Utf8.
    let range_array = opt_str(|r| r.electric_range.as_deref());
    let location_array = opt_str(|r| r.location.as_deref());

    let schema = Arc::new(Schema::new(vec![
        Field::new("County", DataType::Utf8, true),
        Field::new("City", DataType::Utf8, true),
        Field::new("Model Year", DataType::Int64, true),
        Field::new("Make", DataType::Utf8, true),
        Field::new("Electric Vehicle Type", DataType::Utf8, true),
        Field::new("Electric Range", DataType::Utf8, true),
        Field::new("Vehicle Location", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(county_array),
            Arc::new(city_array),
            Arc::new(year_array),
            Arc::new(make_array),
            Arc::new(type_array),
            Arc::new(range_array),
            Arc::new(location_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
