//! Physical constants (CODATA 2018) and instrument defaults.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Planck constant, J*s.
pub const PLANCK: f64 = 6.62607015e-34;
/// Speed of light in vacuum, m/s.
pub const LIGHT_SPEED: f64 = 2.99792458e8;
/// Elementary charge, C.
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;
/// Electron mass, kg.
pub const ELECTRON_MASS: f64 = 9.1093837015e-31;
/// Accepted Bohr magneton, J/T, for comparing fitted results against.
pub const BOHR_MAGNETON: f64 = 9.2740100783e-24;

/// Fixed optical properties of the spectrometer.
///
/// Injected at construction; defaults describe the reference instrument
/// (150 mm focal length, fused-silica etalon).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Optics {
    /// Imaging lens focal length, m.
    pub focal_length: f64,
    /// Etalon medium refractive index.
    pub refractive_index: f64,
}

impl Default for Optics {
    fn default() -> Self {
        Self {
            focal_length: 0.150,
            refractive_index: 1.46,
        }
    }
}

/// Fundamental constants used by the reduction, injected rather than read
/// from globals so tests can probe edge cases.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Planck constant, J*s.
    pub planck: f64,
    /// Speed of light, m/s.
    pub light_speed: f64,
}

impl PhysicalConstants {
    /// Reduced Planck constant, J*s.
    pub fn h_bar(&self) -> f64 {
        self.planck / TAU
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            planck: PLANCK,
            light_speed: LIGHT_SPEED,
        }
    }
}
