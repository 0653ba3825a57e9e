//! zoomify - pan/zoom image viewer with polygon annotation
//!
//! The engine lives in `zoomify_core`. This crate adds the config file layer,
//! a software raster renderer and the input script replayer.

pub mod config;
pub mod raster;
pub mod script;

pub use zoomify_core;

pub use config::{AppConfig, ConfigError, LogLevel};
pub use raster::{RasterError, SkiaRenderer};
pub use script::{ReplayError, ReplayOutcome, ReplayScript, run_script};
