//! Gantt chart generation.
//!
//! A task list plus a color map becomes a [`ChartSpec`], which a
//! [`ChartRenderer`] turns into a raster image and an interactive HTML
//! document. Artifacts are disposable: every call rewrites both files.

pub mod document;
pub mod raster;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Days, NaiveDate};
use log::{info, warn};
use serde::Serialize;

use crate::colors::{assign_for_tasks, Color, ColorMap};
use crate::models::task::Task;

pub use raster::PlottersRenderer;

pub const CHART_TITLE: &str = "Gantt Chart for Project";
pub const X_AXIS_LABEL: &str = "Date";
pub const CANVAS_WIDTH: u32 = 1600;
pub const CANVAS_HEIGHT: u32 = 800;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("there are no tasks to chart")]
    EmptyTaskList,
    #[error("no color assigned to resource {0:?}")]
    MissingColor(String),
    #[error("could not draw image: {0}")]
    Raster(String),
    #[error("could not build interactive document: {0}")]
    Document(String),
    #[error("could not write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub task: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

/// All bars sharing one resource label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub label: String,
    pub color: Color,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub width: u32,
    pub height: u32,
    pub rows: Vec<ChartRow>,
}

impl ChartSpec {
    pub fn bar_count(&self) -> usize {
        self.rows.iter().map(|r| r.bars.len()).sum()
    }

    /// Earliest start and latest finish; never a zero-length span.
    pub fn date_span(&self) -> (NaiveDate, NaiveDate) {
        let bars = self.rows.iter().flat_map(|r| r.bars.iter());
        let start = bars.clone().map(|b| b.start).min().unwrap_or_default();
        let finish = bars.map(|b| b.finish).max().unwrap_or(start);
        if finish > start {
            return (start, finish);
        }
        match start.checked_add_days(Days::new(1)) {
            Some(next) => (start, next),
            None => (start.pred_opt().unwrap_or(start), start),
        }
    }
}

/// Groups tasks into rows by resource, in first-seen order.
pub fn build_spec(tasks: &[Task], colors: &ColorMap) -> Result<ChartSpec, ChartError> {
    if tasks.is_empty() {
        return Err(ChartError::EmptyTaskList);
    }

    let mut rows: Vec<ChartRow> = Vec::new();
    for task in tasks {
        let bar = ChartBar {
            task: task.name.clone(),
            start: task.start,
            finish: task.finish,
        };
        match rows.iter_mut().find(|r| r.label == task.resource) {
            Some(row) => row.bars.push(bar),
            None => {
                let color = *colors
                    .get(&task.resource)
                    .ok_or_else(|| ChartError::MissingColor(task.resource.clone()))?;
                rows.push(ChartRow {
                    label: task.resource.clone(),
                    color,
                    bars: vec![bar],
                });
            }
        }
    }

    Ok(ChartSpec {
        title: CHART_TITLE.to_string(),
        x_label: X_AXIS_LABEL.to_string(),
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        rows,
    })
}

/// The drawing engine behind the generator.
pub trait ChartRenderer: Send + Sync {
    fn render_image(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError>;
    fn render_document(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifacts {
    pub image_path: PathBuf,
    pub document_path: PathBuf,
}

pub struct ChartGenerator {
    output_dir: PathBuf,
    renderer: Box<dyn ChartRenderer>,
}

impl ChartGenerator {
    pub fn new(output_dir: impl Into<PathBuf>, renderer: Box<dyn ChartRenderer>) -> Self {
        ChartGenerator {
            output_dir: output_dir.into(),
            renderer,
        }
    }

    /// `prefix` for the global chart, `prefix_{project}` per project.
    pub fn output_key(prefix: &str, project_id: Option<i64>) -> String {
        match project_id {
            Some(id) => format!("{prefix}_{id}"),
            None => prefix.to_string(),
        }
    }

    pub fn artifact_paths(&self, key: &str) -> ChartArtifacts {
        ChartArtifacts {
            image_path: self.output_dir.join(format!("{key}.png")),
            document_path: self.output_dir.join(format!("{key}.html")),
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        let paths = self.artifact_paths(key);
        paths.image_path.exists() && paths.document_path.exists()
    }

    /// True when an artifact is missing or was not written after `source_modified`.
    pub fn is_stale(&self, key: &str, source_modified: SystemTime) -> bool {
        let paths = self.artifact_paths(key);
        [paths.image_path, paths.document_path].iter().any(|path| {
            match fs::metadata(path).and_then(|meta| meta.modified()) {
                Ok(written) => written <= source_modified,
                Err(_) => true,
            }
        })
    }

    pub fn render(&self, tasks: &[Task], colors: &ColorMap, key: &str) -> Result<ChartArtifacts, ChartError> {
        let spec = build_spec(tasks, colors)?;
        fs::create_dir_all(&self.output_dir).map_err(|source| ChartError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let paths = self.artifact_paths(key);
        self.renderer.render_image(&spec, &paths.image_path)?;
        self.renderer.render_document(&spec, &paths.document_path)?;
        info!(
            "Rendered chart {} with {} bars in {} rows",
            key,
            spec.bar_count(),
            spec.rows.len()
        );
        Ok(paths)
    }

    /// Regenerates after a mutation. An empty list removes the stale
    /// artifacts and yields `None` instead of a chart.
    pub fn refresh(&self, tasks: &[Task], key: &str) -> Result<Option<ChartArtifacts>, ChartError> {
        if tasks.is_empty() {
            warn!("Chart {} has no tasks, removing old artifacts", key);
            self.clear(key)?;
            return Ok(None);
        }
        self.render(tasks, &assign_for_tasks(tasks), key).map(Some)
    }

    pub fn clear(&self, key: &str) -> Result<(), ChartError> {
        let paths = self.artifact_paths(key);
        for path in [paths.image_path, paths.document_path] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(ChartError::Io { path, source }),
            }
        }
        Ok(())
    }
}
