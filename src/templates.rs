use actix_web::{http::header::ContentType, HttpResponse};
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

use crate::error::AppError;

const PAGES: [(&str, &str); 5] = [
    ("board", include_str!("../templates/board.hbs")),
    ("projects", include_str!("../templates/projects.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    ("register", include_str!("../templates/register.hbs")),
    ("new_project", include_str!("../templates/new_project.hbs")),
];

/// HTML pages, compiled once at start-up.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_partial("head", include_str!("../templates/head.hbs"))?;
        registry.register_partial("task_table", include_str!("../templates/task_table.hbs"))?;
        for (name, source) in PAGES {
            registry.register_template_string(name, source)?;
        }
        Ok(Templates { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, AppError> {
        Ok(self.registry.render(name, data)?)
    }

    pub fn page<T: Serialize>(&self, name: &str, data: &T) -> Result<HttpResponse, AppError> {
        let body = self.render(name, data)?;
        Ok(HttpResponse::Ok().content_type(ContentType::html()).body(body))
    }
}
