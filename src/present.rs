use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::data::aggregate::{MakeCount, YearCount};
use crate::data::model::{FieldValue, VehicleDataset};

// ---------------------------------------------------------------------------
// Presenter boundary
// ---------------------------------------------------------------------------

/// Display configuration for a single chart.  Exported next to the
/// chart data so a downstream renderer can style the view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Column whose values pick the mark colour.
    pub color_by: Option<String>,
    /// Initial zoom level (scatter maps only).
    pub zoom: Option<u8>,
}

/// The rendering boundary.  Implementations receive already-computed
/// views; nothing they return flows back into the pipeline, and a failed
/// render is fatal for the run.
pub trait Presenter {
    fn render_text(&mut self, markup: &str) -> Result<()>;
    fn render_line_chart(&mut self, series: &[YearCount], config: &ChartConfig) -> Result<()>;
    fn render_bar_chart(&mut self, series: &[MakeCount], config: &ChartConfig) -> Result<()>;
    fn render_scatter_map(&mut self, records: &VehicleDataset, config: &ChartConfig)
        -> Result<()>;
    fn render_table(&mut self, records: &VehicleDataset) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileExporter – headless presenter writing each view to disk
// ---------------------------------------------------------------------------

/// Writes every chart's backing data to CSV and JSON files under an
/// output directory, named after the slugified chart title.  Narrative
/// text goes to the log.  Graphical rendering belongs to an external
/// dashboard layer, not this crate.
pub struct FileExporter {
    out_dir: PathBuf,
}

impl FileExporter {
    pub fn new(out_dir: &Path) -> Result<Self> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;
        Ok(FileExporter {
            out_dir: out_dir.to_path_buf(),
        })
    }

    fn write_series<T: Serialize>(&self, series: &[T], config: &ChartConfig) -> Result<()> {
        let stem = slug(&config.title);

        let csv_path = self.out_dir.join(format!("{stem}.csv"));
        let mut writer = csv::Writer::from_path(&csv_path)
            .with_context(|| format!("creating {}", csv_path.display()))?;
        for row in series {
            writer.serialize(row)?;
        }
        writer.flush()?;

        #[derive(Serialize)]
        struct ChartDoc<'a, T> {
            config: &'a ChartConfig,
            series: &'a [T],
        }
        let json_path = self.out_dir.join(format!("{stem}.json"));
        fs::write(
            &json_path,
            serde_json::to_string_pretty(&ChartDoc { config, series })?,
        )
        .with_context(|| format!("writing {}", json_path.display()))?;

        info!("wrote {} rows to {stem}.csv / {stem}.json", series.len());
        Ok(())
    }

    fn write_dataset(&self, stem: &str, dataset: &VehicleDataset) -> Result<()> {
        let path = self.out_dir.join(format!("{stem}.csv"));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;

        // A zero-length record is a csv error, so an empty snapshot
        // yields an empty file.
        if dataset.column_names.is_empty() {
            writer.flush()?;
            info!("wrote 0 rows to {stem}.csv");
            return Ok(());
        }

        writer.write_record(&dataset.column_names)?;
        for rec in &dataset.records {
            let row: Vec<String> = dataset
                .column_names
                .iter()
                .map(|col| match rec.get(col) {
                    Some(v) => v.to_string(),
                    None => String::new(),
                })
                .collect();
            writer.write_record(&row)?;
        }
        writer.flush()?;

        info!("wrote {} rows to {stem}.csv", dataset.len());
        Ok(())
    }
}

impl Presenter for FileExporter {
    fn render_text(&mut self, markup: &str) -> Result<()> {
        info!("{markup}");
        Ok(())
    }

    fn render_line_chart(&mut self, series: &[YearCount], config: &ChartConfig) -> Result<()> {
        self.write_series(series, config)
    }

    fn render_bar_chart(&mut self, series: &[MakeCount], config: &ChartConfig) -> Result<()> {
        self.write_series(series, config)
    }

    fn render_scatter_map(
        &mut self,
        records: &VehicleDataset,
        config: &ChartConfig,
    ) -> Result<()> {
        let stem = slug(&config.title);
        self.write_dataset(&stem, records)?;

        let cfg_path = self.out_dir.join(format!("{stem}.config.json"));
        fs::write(&cfg_path, serde_json::to_string_pretty(config)?)
            .with_context(|| format!("writing {}", cfg_path.display()))?;
        Ok(())
    }

    fn render_table(&mut self, records: &VehicleDataset) -> Result<()> {
        self.write_dataset("table", records)
    }
}

/// File stem from a chart title: lowercase alphanumerics, runs of
/// anything else collapsed to a single `_`.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_sep = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            prev_sep = false;
        } else if !prev_sep {
            out.push('_');
            prev_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        "chart".to_string()
    } else {
        out
    }
}
