//! Core type definitions for the preprocessing pipeline
//!
//! - [`WindowPolicy`]: Multi-channel normalization strategies
//! - [`DatasetPolicy`]: Record index resampling strategies
//! - [`WindowParams`]: Radiological display window
//! - [`DatasetConfig`]: Configuration consumed by the sample provider

mod config;
mod enums;
mod window;

pub use config::DatasetConfig;
pub use enums::{DatasetPolicy, WindowPolicy};
pub use window::{WindowParams, BONE_WINDOW, BRAIN_WINDOW, SUBDURAL_WINDOW};
