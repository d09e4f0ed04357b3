//! dualcast library
//!
//! Validation, provider clients, the forecast pipeline and the terminal form.
//! The binary is a thin shell over [`forecast::ForecastPipeline`].

pub mod app;
pub mod cli;
pub mod data;
pub mod forecast;
pub mod logging;
pub mod presenter;
pub mod ui;
