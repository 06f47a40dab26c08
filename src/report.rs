use anyhow::Result;
use log::debug;

use crate::data::aggregate::{count_by_make, count_by_year, select_columns, MakeCount, YearCount};
use crate::data::clean::clean;
use crate::data::geo::{filter_to_region, WASHINGTON};
use crate::data::model::{
    VehicleDataset, COL_CITY, COL_COUNTY, COL_ELECTRIC_RANGE, COL_EV_TYPE, COL_MAKE,
    COL_MODEL_YEAR,
};
use crate::present::{ChartConfig, Presenter};

// ---------------------------------------------------------------------------
// Derived dashboard views
// ---------------------------------------------------------------------------

/// Columns shown in the dashboard table.
pub const TABLE_COLUMNS: [&str; 6] = [
    COL_COUNTY,
    COL_CITY,
    COL_MODEL_YEAR,
    COL_MAKE,
    COL_EV_TYPE,
    COL_ELECTRIC_RANGE,
];

/// Everything the dashboard shows, derived in one pass and handed to a
/// [`Presenter`] as a complete bundle.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    /// Registrations per model year, ascending.
    pub adoption_trend: Vec<YearCount>,
    /// Registrations per manufacturer, most popular first.
    pub make_popularity: Vec<MakeCount>,
    /// Rows inside the Washington bounding box, with parsed coordinates.
    pub regional: VehicleDataset,
    /// Regional rows projected to the table columns.
    pub table: VehicleDataset,
}

/// Clean the raw snapshot and derive all views.  Pure: the raw dataset
/// is left untouched, and either every view is produced or none is.
pub fn build_views(raw: &VehicleDataset) -> DashboardViews {
    let cleaned = clean(raw);
    debug!(
        "cleaned snapshot: {} of {} rows retained",
        cleaned.len(),
        raw.len()
    );

    let adoption_trend = count_by_year(&cleaned);
    let make_popularity = count_by_make(&cleaned);
    let regional = filter_to_region(&cleaned, &WASHINGTON);
    let table = select_columns(&regional, &TABLE_COLUMNS);

    DashboardViews {
        adoption_trend,
        make_popularity,
        regional,
        table,
    }
}

// ---------------------------------------------------------------------------
// Presentation order
// ---------------------------------------------------------------------------

/// Walk a presenter through the dashboard: heading, adoption trend,
/// brand popularity, regional map, table.  Presenter errors are fatal
/// and propagate unchanged.
pub fn present(views: &DashboardViews, presenter: &mut dyn Presenter) -> Result<()> {
    presenter.render_text("# Electric Vehicle Population Data")?;
    presenter.render_text(
        "Battery Electric Vehicles (BEVs) and Plug-in Hybrid Electric Vehicles (PHEVs) \
         currently registered through the Washington State Department of Licensing (DOL).",
    )?;

    presenter.render_line_chart(
        &views.adoption_trend,
        &ChartConfig {
            title: "Electric Vehicle Adoption Trend Over Time".to_string(),
            x_label: COL_MODEL_YEAR.to_string(),
            y_label: "Count".to_string(),
            ..Default::default()
        },
    )?;
    presenter.render_text(
        "Adoption stayed low until 2010, grew steadily through the mid-2010s, and surged \
         around 2020-2023; the drop at the tail is likely incomplete data for the newest \
         model years.",
    )?;

    presenter.render_bar_chart(
        &views.make_popularity,
        &ChartConfig {
            title: "Vehicle Popularity by Brand".to_string(),
            x_label: "Brand".to_string(),
            y_label: "Number of Vehicles".to_string(),
            ..Default::default()
        },
    )?;
    presenter.render_text(
        "Tesla leads by a wide margin, with Chevrolet, Nissan, Ford and Kia following; \
         most other manufacturers hold only a small share.",
    )?;

    presenter.render_scatter_map(
        &views.regional,
        &ChartConfig {
            title: "Washington State EV Registrations by Brand".to_string(),
            color_by: Some(COL_MAKE.to_string()),
            zoom: Some(6),
            ..Default::default()
        },
    )?;

    presenter.render_table(&views.table)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FieldValue, Registration, COL_LOCATION};

    fn reg(county: &str, city: &str, make: &str, year: i64, range: &str, loc: &str) -> Registration {
        Registration::new(
            [
                (COL_COUNTY.to_string(), FieldValue::String(county.into())),
                (COL_CITY.to_string(), FieldValue::String(city.into())),
                (COL_MAKE.to_string(), FieldValue::String(make.into())),
                (COL_MODEL_YEAR.to_string(), FieldValue::Integer(year)),
                (COL_ELECTRIC_RANGE.to_string(), FieldValue::String(range.into())),
                (COL_EV_TYPE.to_string(), FieldValue::String("BEV".into())),
                (COL_LOCATION.to_string(), FieldValue::String(loc.into())),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn snapshot() -> VehicleDataset {
        VehicleDataset::from_records(vec![
            reg("King", "Seattle", "TESLA", 2021, "215", "POINT (-122.33 47.60)"),
            reg("King", "Seattle", "TESLA", 2021, "215", "POINT (-122.33 47.60)"), // duplicate
            reg("Spokane", "Spokane", "NISSAN", 2013, "75", "POINT (-117.42 47.65)"),
            reg("King", "Bellevue", "TESLA", 2020, "322", "POINT (-122.15 47.61)"),
            reg("Out", "London", "KIA", 2020, "239", "POINT (-0.12 51.50)"),
            reg("King", "Kent", "FORD", 2022, "n/a", "not a point"),
        ])
    }

    #[test]
    fn test_build_views_derives_everything() {
        let views = build_views(&snapshot());

        // Duplicate collapsed: 5 rows survive the clean.
        let total: u64 = views.adoption_trend.iter().map(|c| c.count).sum();
        assert_eq!(total, 5);
        assert_eq!(views.adoption_trend.first().unwrap().year, 2013);

        assert_eq!(views.make_popularity[0].make, "TESLA");
        assert_eq!(views.make_popularity[0].count, 2);

        // London row and the unparseable location fall out of the region.
        assert_eq!(views.regional.len(), 3);
        assert_eq!(views.table.len(), 3);
        assert_eq!(
            views.table.column_names.len(),
            TABLE_COLUMNS.len(),
            "table view keeps exactly the meaningful columns"
        );
    }

    struct RecordingPresenter {
        calls: Vec<String>,
    }

    impl Presenter for RecordingPresenter {
        fn render_text(&mut self, _markup: &str) -> Result<()> {
            self.calls.push("text".into());
            Ok(())
        }
        fn render_line_chart(&mut self, _s: &[YearCount], _c: &ChartConfig) -> Result<()> {
            self.calls.push("line".into());
            Ok(())
        }
        fn render_bar_chart(&mut self, _s: &[MakeCount], _c: &ChartConfig) -> Result<()> {
            self.calls.push("bar".into());
            Ok(())
        }
        fn render_scatter_map(&mut self, _r: &VehicleDataset, _c: &ChartConfig) -> Result<()> {
            self.calls.push("map".into());
            Ok(())
        }
        fn render_table(&mut self, _r: &VehicleDataset) -> Result<()> {
            self.calls.push("table".into());
            Ok(())
        }
    }

    #[test]
    fn test_present_walks_dashboard_order() {
        let views = build_views(&snapshot());
        let mut presenter = RecordingPresenter { calls: Vec::new() };
        present(&views, &mut presenter).unwrap();

        assert_eq!(
            presenter.calls,
            vec!["text", "text", "line", "text", "bar", "text", "map", "table"]
        );
    }
}
