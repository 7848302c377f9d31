//! Export helpers for JSON reports, contour CSV, and contour plots.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("nothing to export: {0}")]
    Empty(&'static str),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    ensure_parent(path)?;
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Pretty-print `value` as JSON to `path` (or stdout for `-`).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let mut writer = writer_for_path(path)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub mod nozzle {
    use std::path::Path;

    use motor_nozzle::{
        ContourKind, ExpansionSource, NozzleDesignResult, NozzleGeometry, NozzleParameters,
    };
    use plotters::prelude::*;
    use serde::Serialize;

    use super::{ExportError, ensure_parent, timestamp, writer_for_path};

    /// JSON envelope for a nozzle design: `parameters` plus plot-ready `geometry`.
    #[derive(Debug, Serialize)]
    pub struct NozzleReport {
        pub generated_at: String,
        pub contour: ContourKind,
        pub expansion_source: ExpansionSource,
        pub parameters: NozzleParameters,
        pub geometry: NozzleGeometry,
    }

    impl NozzleReport {
        pub fn new(result: &NozzleDesignResult) -> Self {
            Self {
                generated_at: timestamp(),
                contour: result.contour_kind,
                expansion_source: result.exit.source,
                parameters: result.parameters(),
                geometry: result.geometry(),
            }
        }
    }

    #[derive(Serialize)]
    struct ContourRow {
        x_mm: f64,
        r_mm: f64,
        area_mm2: f64,
    }

    /// Write the wall contour as `x_mm,r_mm,area_mm2` rows.
    pub fn write_contour_csv(path: &Path, geometry: &NozzleGeometry) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_writer(writer_for_path(path)?);
        for ((&x_mm, &r_mm), &area_mm2) in geometry
            .x
            .iter()
            .zip(geometry.r.iter())
            .zip(geometry.areas.iter())
        {
            writer.serialize(ContourRow {
                x_mm,
                r_mm,
                area_mm2,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Render the upper wall and its mirror image to a PNG.
    pub fn render_contour_png(
        path: &Path,
        geometry: &NozzleGeometry,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        if geometry.is_empty() {
            return Err(ExportError::Empty("contour has no samples"));
        }
        let x_max = geometry.x.iter().copied().fold(f64::MIN, f64::max);
        let r_max = geometry.r.iter().copied().fold(f64::MIN, f64::max);
        if !(x_max.is_finite() && r_max.is_finite()) || x_max <= 0.0 || r_max <= 0.0 {
            return Err(ExportError::Empty("contour has no finite extent"));
        }

        ensure_parent(path)?;
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let half_span = r_max * 1.1;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(0.0..x_max, -half_span..half_span)
            .map_err(plot_err)?;

        let upper: Vec<(f64, f64)> = geometry
            .x
            .iter()
            .copied()
            .zip(geometry.r.iter().copied())
            .collect();
        let lower: Vec<(f64, f64)> = upper.iter().map(|&(x, r)| (x, -r)).collect();
        chart
            .draw_series(LineSeries::new(upper, &BLUE))
            .map_err(plot_err)?;
        chart
            .draw_series(LineSeries::new(lower, &BLUE))
            .map_err(plot_err)?;
        chart
            .draw_series(LineSeries::new(vec![(0.0, 0.0), (x_max, 0.0)], &BLACK))
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        Ok(())
    }

    fn plot_err<E: std::fmt::Display>(err: E) -> ExportError {
        ExportError::Plot(err.to_string())
    }
}

pub mod performance {
    use motor_performance::PerformanceResult;
    use serde::Serialize;

    use super::timestamp;

    /// JSON envelope for an apogee-targeting run.
    #[derive(Debug, Serialize)]
    pub struct PerformanceReport<'a> {
        pub generated_at: String,
        pub results: &'a PerformanceResult,
    }

    impl<'a> PerformanceReport<'a> {
        pub fn new(results: &'a PerformanceResult) -> Self {
            Self {
                generated_at: timestamp(),
                results,
            }
        }
    }
}
