//! A small Gantt board: keep a list of dated tasks and redraw their chart on
//! every change. Runs either as a single-user board over a JSON file or as a
//! multi-user service with projects stored in SQLite.

pub mod auth;
pub mod chart;
pub mod colors;
pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod routes;
pub mod store;
pub mod templates;
pub mod validator;
