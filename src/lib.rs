// Public so the binary and the integration tests can reach every layer.
pub mod app;
pub mod config;
pub mod core;
pub mod utils;
