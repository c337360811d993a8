// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod keys;
pub mod logging;
pub mod metrics;
pub mod quote;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod store;
pub mod ui;
