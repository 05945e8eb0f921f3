use std::fs;
use std::path::Path;

use chrono::Days;
use plotters::prelude::*;

use super::document::DocumentRenderer;
use super::{ChartError, ChartRenderer, ChartSpec};

fn raster_error(e: impl std::fmt::Display) -> ChartError {
    ChartError::Raster(e.to_string())
}

/// Draws the PNG with plotters and the HTML document from a template.
pub struct PlottersRenderer {
    scale: u32,
    documents: DocumentRenderer,
}

impl PlottersRenderer {
    /// `scale` multiplies the pixel density of the fixed logical canvas.
    pub fn new(scale: u32) -> Result<Self, ChartError> {
        Ok(PlottersRenderer {
            scale: scale.max(1),
            documents: DocumentRenderer::new()?,
        })
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render_image(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError> {
        let scale = self.scale;
        let f = scale as f64;
        let px = scale as i32;
        let (origin, end) = spec.date_span();
        let span = (end - origin).num_days() as f64;
        let rows = spec.rows.len();

        let root = BitMapBackend::new(path, (spec.width * scale, spec.height * scale)).into_drawing_area();
        root.fill(&WHITE).map_err(raster_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title.as_str(), ("sans-serif", 28.0 * f).into_font())
            .margin(12 * scale)
            .x_label_area_size(70 * scale)
            .y_label_area_size(240 * scale)
            .build_cartesian_2d(0f64..span, -0.5f64..rows as f64 - 0.5)
            .map_err(raster_error)?;

        // first row on top
        let row_at = |value: f64| -> Option<&str> {
            let slot = value.round();
            if (value - slot).abs() > 1e-6 || slot < 0.0 {
                return None;
            }
            let slot = slot as usize;
            (slot < rows).then(|| spec.rows[rows - 1 - slot].label.as_str())
        };
        let date_at = |value: &f64| {
            origin
                .checked_add_days(Days::new(value.round().max(0.0) as u64))
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        let label_at = |value: &f64| row_at(*value).unwrap_or_default().to_string();

        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .x_labels(10)
            .y_labels(rows)
            .x_label_formatter(&date_at)
            .y_label_formatter(&label_at)
            .label_style(("sans-serif", 18.0 * f))
            .axis_desc_style(("sans-serif", 22.0 * f))
            .draw()
            .map_err(raster_error)?;

        for (i, row) in spec.rows.iter().enumerate() {
            let color = RGBColor(row.color.r, row.color.g, row.color.b);
            let y = (rows - 1 - i) as f64;
            chart
                .draw_series(row.bars.iter().map(|bar| {
                    let x0 = (bar.start - origin).num_days() as f64;
                    let x1 = ((bar.finish - origin).num_days() as f64).max(x0 + 0.5);
                    Rectangle::new([(x0, y - 0.3), (x1, y + 0.3)], color.filled())
                }))
                .map_err(raster_error)?
                .label(row.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6 * px), (x + 18 * px, y + 6 * px)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font(("sans-serif", 16.0 * f))
            .draw()
            .map_err(raster_error)?;

        root.present().map_err(raster_error)
    }

    fn render_document(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError> {
        let html = self.documents.render(spec)?;
        fs::write(path, html).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
