#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test;
use gantt_board::chart::{ChartError, ChartRenderer, ChartSpec};

/// Stands in for the plotting engine: records each spec and writes marker files.
#[derive(Default, Clone)]
pub struct RecordingRenderer {
    pub specs: Arc<Mutex<Vec<ChartSpec>>>,
}

impl RecordingRenderer {
    pub fn renders(&self) -> usize {
        self.specs.lock().unwrap().len()
    }

    pub fn last(&self) -> ChartSpec {
        self.specs.lock().unwrap().last().cloned().expect("nothing rendered")
    }
}

fn write(path: &Path, contents: &[u8]) -> Result<(), ChartError> {
    fs::write(path, contents).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl ChartRenderer for RecordingRenderer {
    fn render_image(&self, spec: &ChartSpec, path: &Path) -> Result<(), ChartError> {
        self.specs.lock().unwrap().push(spec.clone());
        write(path, b"png")
    }

    fn render_document(&self, _spec: &ChartSpec, path: &Path) -> Result<(), ChartError> {
        write(path, b"<html></html>")
    }
}

pub struct FailingRenderer;

impl ChartRenderer for FailingRenderer {
    fn render_image(&self, _spec: &ChartSpec, _path: &Path) -> Result<(), ChartError> {
        Err(ChartError::Raster("engine unavailable".into()))
    }

    fn render_document(&self, _spec: &ChartSpec, _path: &Path) -> Result<(), ChartError> {
        Err(ChartError::Document("engine unavailable".into()))
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}
