use chrono::{Datelike, Months, NaiveDate};
use handlebars::Handlebars;
use serde::Serialize;

use super::{ChartError, ChartSpec};

const TEMPLATE_NAME: &str = "chart";
const MARGIN_LEFT: f64 = 260.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 90.0;
const MAX_TICKS: usize = 12;

#[derive(Serialize)]
struct Tick {
    x: f64,
    label: String,
}

#[derive(Serialize)]
struct BarView {
    task: String,
    start: String,
    finish: String,
    days: i64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Serialize)]
struct RowView {
    label: String,
    color: String,
    label_y: f64,
    band_y: f64,
    bars: Vec<BarView>,
}

#[derive(Serialize)]
struct DocumentView {
    title: String,
    x_label: String,
    width: u32,
    height: u32,
    plot_left: f64,
    plot_top: f64,
    plot_right: f64,
    plot_bottom: f64,
    plot_width: f64,
    row_height: f64,
    x_label_y: f64,
    tick_label_y: f64,
    ticks: Vec<Tick>,
    rows: Vec<RowView>,
}

/// First day of each month inside the span, thinned out to at most `MAX_TICKS`.
fn month_ticks(start: NaiveDate, finish: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = start.with_day(1).unwrap_or(start);
    if current < start {
        current = current.checked_add_months(Months::new(1)).unwrap_or(finish);
    }
    while current <= finish {
        months.push(current);
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    let step = months.len().div_ceil(MAX_TICKS).max(1);
    months.into_iter().step_by(step).collect()
}

fn layout(spec: &ChartSpec) -> DocumentView {
    let (origin, end) = spec.date_span();
    let span_days = (end - origin).num_days().max(1) as f64;

    let plot_left = MARGIN_LEFT;
    let plot_top = MARGIN_TOP;
    let plot_right = spec.width as f64 - MARGIN_RIGHT;
    let plot_bottom = spec.height as f64 - MARGIN_BOTTOM;
    let plot_width = plot_right - plot_left;
    let row_height = (plot_bottom - plot_top) / spec.rows.len().max(1) as f64;
    let x_of = |date: NaiveDate| plot_left + (date - origin).num_days() as f64 / span_days * plot_width;

    let rows = spec
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let band_y = plot_top + i as f64 * row_height;
            let bars = row
                .bars
                .iter()
                .map(|bar| {
                    let x = x_of(bar.start);
                    BarView {
                        task: bar.task.clone(),
                        start: bar.start.to_string(),
                        finish: bar.finish.to_string(),
                        days: (bar.finish - bar.start).num_days() + 1,
                        x,
                        y: band_y + row_height * 0.2,
                        width: (x_of(bar.finish) - x).max(2.0),
                        height: row_height * 0.6,
                    }
                })
                .collect();
            RowView {
                label: row.label.clone(),
                color: row.color.hex(),
                label_y: band_y + row_height / 2.0,
                band_y,
                bars,
            }
        })
        .collect();

    let ticks = month_ticks(origin, end)
        .into_iter()
        .map(|d| Tick {
            x: x_of(d),
            label: d.format("%Y-%m").to_string(),
        })
        .collect();

    DocumentView {
        title: spec.title.clone(),
        x_label: spec.x_label.clone(),
        width: spec.width,
        height: spec.height,
        plot_left,
        plot_top,
        plot_right,
        plot_bottom,
        plot_width,
        row_height,
        x_label_y: plot_bottom + 70.0,
        tick_label_y: plot_bottom + 28.0,
        ticks,
        rows,
    }
}

/// Renders the self-contained HTML document for a chart.
pub struct DocumentRenderer {
    registry: Handlebars<'static>,
}

impl DocumentRenderer {
    pub fn new() -> Result<Self, ChartError> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, include_str!("../../templates/chart.hbs"))
            .map_err(|e| ChartError::Document(e.to_string()))?;
        Ok(DocumentRenderer { registry })
    }

    pub fn render(&self, spec: &ChartSpec) -> Result<String, ChartError> {
        self.registry
            .render(TEMPLATE_NAME, &layout(spec))
            .map_err(|e| ChartError::Document(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_spec;
    use crate::colors::assign_for_tasks;
    use crate::models::task::{default_tasks, Task};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ticks_start_on_month_boundaries() {
        let ticks = month_ticks(date(2024, 1, 15), date(2024, 4, 30));
        assert_eq!(ticks, vec![date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]);
    }

    #[test]
    fn long_spans_are_thinned() {
        let ticks = month_ticks(date(2020, 1, 1), date(2025, 12, 31));
        assert!(ticks.len() <= MAX_TICKS);
        assert_eq!(ticks[0], date(2020, 1, 1));
    }

    #[test]
    fn document_lists_every_task_with_its_color() {
        let tasks = default_tasks();
        let spec = build_spec(&tasks, &assign_for_tasks(&tasks)).unwrap();
        let html = DocumentRenderer::new().unwrap().render(&spec).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Gantt Chart for Project</title>"));
        assert_eq!(html.matches("class=\"bar\"").count(), 5);
        assert!(html.contains("Data Preparation: 2024-01-01 to 2024-04-30"));
        assert!(html.contains("#636EFA"));
        assert!(html.contains("2024-01"));
    }

    #[test]
    fn labels_are_escaped() {
        let tasks = vec![Task::new("<script>", date(2024, 1, 1), date(2024, 1, 9))];
        let spec = build_spec(&tasks, &assign_for_tasks(&tasks)).unwrap();
        let html = DocumentRenderer::new().unwrap().render(&spec).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn bars_stay_inside_the_plot() {
        let tasks = default_tasks();
        let spec = build_spec(&tasks, &assign_for_tasks(&tasks)).unwrap();
        let view = layout(&spec);
        for bar in view.rows.iter().flat_map(|r| &r.bars) {
            assert!(bar.x >= view.plot_left - 1e-9);
            assert!(bar.x + bar.width <= view.plot_right + 1e-9);
        }
    }
}
