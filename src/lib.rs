//! Isolines
//!
//! Configuration, synthetic fields and backend selection around the
//! `isoline_core` CPU generator and the `isoline_gpu` compute generator.

pub mod backend;
pub mod config;
pub mod presets;

pub use backend::{Backend, BackendError};
pub use config::{AppConfig, ConfigError};
pub use isoline_core::{Point2, ScalarField};
