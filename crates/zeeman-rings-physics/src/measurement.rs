//! Reduction of one Zeeman measurement record.
//!
//! Geometry: a ring of radius `r` on the detector corresponds to light
//! entering the etalon at incidence angle `alpha = atan(r / f)` and
//! refracting to `beta = asin(sin(alpha) / n)`. The wavelength shift of a
//! split component follows from the change in `cos(beta)` relative to the
//! unsplit center line, and the energy shift from `E = h*c/lambda`.

use serde::{Deserialize, Serialize};

use crate::constants::{Optics, PhysicalConstants};

/// One spectral photograph's worth of calibrated data.
///
/// Radii are physical lengths (m) on the detector plane; they may be absent
/// while the operator is still marking rings. `derived` is populated by
/// [`ZeemanAnalyzer::reduce`] only when all three radii are present, so the
/// derived quantities are always either all absent or all present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeemanMeasurement {
    /// Magnetic field strength, T.
    pub b_field: f64,
    /// Unsplit line wavelength, m.
    pub wavelength: f64,
    /// Unsplit (middle) ring radius, m.
    pub r_center: Option<f64>,
    /// Inner Zeeman component radius, m.
    pub r_inner: Option<f64>,
    /// Outer Zeeman component radius, m.
    pub r_outer: Option<f64>,
    /// Reduced quantities; see [`DerivedShifts`].
    #[serde(default)]
    pub derived: Option<DerivedShifts>,
}

impl ZeemanMeasurement {
    pub fn new(b_field: f64, wavelength: f64) -> Self {
        Self {
            b_field,
            wavelength,
            ..Self::default()
        }
    }
}

/// Quantities derived from a complete radius triple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedShifts {
    /// Incidence angles, rad.
    pub alpha_center: f64,
    pub alpha_inner: f64,
    pub alpha_outer: f64,
    /// Refraction angles, rad. NaN when the radius exceeds the optical
    /// acceptance of the etalon.
    pub beta_center: f64,
    pub beta_inner: f64,
    pub beta_outer: f64,
    /// Wavelength shifts of the split components, m.
    pub delta_lambda_inner: f64,
    pub delta_lambda_outer: f64,
    /// Energy shifts, J.
    pub delta_e_inner: f64,
    pub delta_e_outer: f64,
    /// Mean magnitude of the two energy shifts, J.
    pub delta_e_avg: f64,
}

/// Reduction and regression engine holding the injected instrument and
/// physical constants.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeemanAnalyzer {
    optics: Optics,
    constants: PhysicalConstants,
}

impl ZeemanAnalyzer {
    pub fn new(optics: Optics, constants: PhysicalConstants) -> Self {
        Self { optics, constants }
    }

    pub fn optics(&self) -> &Optics {
        &self.optics
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Derive angles, wavelength shifts and energy shifts for one record.
    ///
    /// A record with any radius missing is returned unchanged; partial
    /// records are legal while the operator is still working. The function
    /// is pure and idempotent. A radius beyond the optical acceptance turns
    /// the affected quantities into NaN instead of failing, so one bad ring
    /// cannot abort a batch fit.
    pub fn reduce(&self, m: &ZeemanMeasurement) -> ZeemanMeasurement {
        let (Some(rc), Some(ri), Some(ro)) = (m.r_center, m.r_inner, m.r_outer) else {
            return *m;
        };

        let alpha_center = self.incidence(rc);
        let alpha_inner = self.incidence(ri);
        let alpha_outer = self.incidence(ro);

        let beta_center = self.refraction(alpha_center);
        let beta_inner = self.refraction(alpha_inner);
        let beta_outer = self.refraction(alpha_outer);

        let delta_lambda_inner = self.wavelength_shift(beta_inner, beta_center, m.wavelength);
        let delta_lambda_outer = self.wavelength_shift(beta_outer, beta_center, m.wavelength);

        let delta_e_inner = self.energy_shift(delta_lambda_inner, m.wavelength);
        let delta_e_outer = self.energy_shift(delta_lambda_outer, m.wavelength);
        let delta_e_avg = (delta_e_inner.abs() + delta_e_outer.abs()) / 2.0;

        let mut out = *m;
        out.derived = Some(DerivedShifts {
            alpha_center,
            alpha_inner,
            alpha_outer,
            beta_center,
            beta_inner,
            beta_outer,
            delta_lambda_inner,
            delta_lambda_outer,
            delta_e_inner,
            delta_e_outer,
            delta_e_avg,
        });
        out
    }

    fn incidence(&self, radius: f64) -> f64 {
        (radius / self.optics.focal_length).atan()
    }

    /// Snell refraction; an argument beyond +-1 yields NaN and propagates.
    fn refraction(&self, alpha: f64) -> f64 {
        (alpha.sin() / self.optics.refractive_index).asin()
    }

    fn wavelength_shift(&self, beta: f64, beta_center: f64, wavelength: f64) -> f64 {
        wavelength * (beta_center.cos() / beta.cos() - 1.0)
    }

    fn energy_shift(&self, delta_lambda: f64, wavelength: f64) -> f64 {
        self.constants.planck * self.constants.light_speed * delta_lambda
            / (wavelength * wavelength)
    }
}
