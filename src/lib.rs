pub mod api;
pub mod baseline;
pub mod config;
pub mod db;
pub mod error;
pub mod growth_model;
pub mod logging;
pub mod scenario;
