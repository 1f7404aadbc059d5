//! A terminal browser for the PokeAPI catalog: a paginated list screen and a
//! detail screen, both fed by plain HTTP GETs.

pub mod app;
pub mod config;
pub mod detail;
pub mod error;
pub mod fetch;
pub mod list;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;
