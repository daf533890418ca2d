pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod grouping;
pub mod logging;
pub mod models;
pub mod routes;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub const VERSION: &str = "0.1.0";
