use serde::{Deserialize, Serialize};

/// Pixel-space ring measurement for one photograph.
///
/// Owned and filled in by the surrounding application across one or more
/// detection or manual-marking calls, so any field may still be absent.
/// Radii are in pixels; calibration to physical lengths happens elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RingMeasurement {
    /// Ring-system center in pixel coordinates.
    pub center: Option<[f32; 2]>,
    /// Inner Zeeman component radius.
    pub radius_inner: Option<f32>,
    /// Unsplit (middle) line radius.
    pub radius_middle: Option<f32>,
    /// Outer Zeeman component radius.
    pub radius_outer: Option<f32>,
}

impl RingMeasurement {
    /// All three radii and the center are present.
    pub fn is_complete(&self) -> bool {
        self.center.is_some()
            && self.radius_inner.is_some()
            && self.radius_middle.is_some()
            && self.radius_outer.is_some()
    }

    /// Reset every field, keeping the record allocated in place.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partially_filled_record_is_incomplete() {
        let mut m = RingMeasurement::default();
        assert!(!m.is_complete());

        m.center = Some([120.0, 96.5]);
        m.radius_inner = Some(40.0);
        m.radius_middle = Some(46.0);
        assert!(!m.is_complete());

        m.radius_outer = Some(52.5);
        assert!(m.is_complete());

        m.clear();
        assert_eq!(m, RingMeasurement::default());
    }
}
