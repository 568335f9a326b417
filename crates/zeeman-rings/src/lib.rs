//! High-level facade crate for the `zeeman-rings-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying analysis crates
//! - end-to-end helpers that enhance an `image` photograph and run the
//!   ring detector on it in one call.
//!
//! ## Quickstart
//!
//! ```no_run
//! use zeeman_rings::analyze;
//! use zeeman_rings::RingSearchParams;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let photo = ImageReader::open("rings.png")?.decode()?;
//! let field = analyze::enhance_image(&photo)?;
//!
//! let params = RingSearchParams::new(40.0, 90.0);
//! let ring = zeeman_rings::detect_ring(&field, 512, 384, &params)?;
//! println!("detected: {}", ring.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `zeeman_rings::core`: shared image view, ring bookkeeping, logging.
//! - `zeeman_rings::detect`: enhancement, Hough pass, scored ring search.
//! - `zeeman_rings::physics`: measurement reduction and magneton fitting.
//! - `zeeman_rings::analyze`: end-to-end helpers from `image` types.
//!
//! The physics pipeline is independent of detection: it consumes calibrated
//! radii however they were obtained, auto-detected or marked by hand.

pub use zeeman_rings_core as core;
pub use zeeman_rings_detect as detect;
pub use zeeman_rings_physics as physics;

pub use zeeman_rings_core::RingMeasurement;
pub use zeeman_rings_detect::{
    detect_ring, enhance, DetectError, DetectedRing, EnhanceError, EnhanceParams, HoughParams,
    RingSearchParams, ScoreWeights,
};
pub use zeeman_rings_physics::{
    BohrMagnetonResult, Optics, PhysicalConstants, ZeemanAnalyzer, ZeemanMeasurement,
};

pub mod analyze;
