//! Core types and utilities for Zeeman interference-ring analysis.
//!
//! This crate is intentionally small. It holds the lightweight image view
//! used by the detector, the pixel-space ring bookkeeping record shared with
//! the surrounding application, and the logger. It does *not* depend on any
//! concrete image container or detector.

mod image;
mod logger;
mod measurement;

pub use image::{circle_perimeter_stats, sample_bilinear, GrayView, PerimeterStats};
pub use measurement::RingMeasurement;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
