//! Measurement reduction and Bohr-magneton estimation for the Zeeman
//! effect.
//!
//! [`ZeemanAnalyzer`] carries the injected instrument and physical
//! constants. [`ZeemanAnalyzer::reduce`] turns one record of (field
//! strength, wavelength, three calibrated radii) into angles, wavelength
//! shifts and energy shifts; [`ZeemanAnalyzer::estimate_magneton`] fits
//! the magneton and the electron's specific charge across a series of
//! reduced records at varying field strengths.
//!
//! Everything is a pure function of its inputs; degenerate data (too few
//! points, zero spread) produces defined zero results rather than errors.

pub mod constants;
mod magneton;
mod measurement;

pub use constants::{Optics, PhysicalConstants};
pub use magneton::BohrMagnetonResult;
pub use measurement::{DerivedShifts, ZeemanAnalyzer, ZeemanMeasurement};
