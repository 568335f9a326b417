use std::f32::consts::TAU;

/// Borrowed view over an 8-bit grayscale buffer.
#[derive(Clone, Copy, Debug)]
pub struct GrayView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl GrayView<'_> {
    /// Pixel value at `(x, y)`, or 0 outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Whether `(x, y)` lies inside the image bounds.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }
}

#[inline]
pub fn sample_bilinear(src: &GrayView<'_>, x: f32, y: f32) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get(x0, y0) as f32;
    let p10 = src.get(x0 + 1, y0) as f32;
    let p01 = src.get(x0, y0 + 1) as f32;
    let p11 = src.get(x0 + 1, y0 + 1) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

/// Intensity statistics collected along a 1-px circle perimeter.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerimeterStats {
    /// Samples that landed inside the image.
    pub on_field: usize,
    /// On-field samples with a nonzero intensity.
    pub nonzero: usize,
    /// Sum of the nonzero intensities.
    pub sum: f64,
}

impl PerimeterStats {
    /// Mean of the nonzero perimeter intensities, or 0 if there were none.
    pub fn mean_nonzero(&self) -> f64 {
        if self.nonzero == 0 {
            0.0
        } else {
            self.sum / self.nonzero as f64
        }
    }
}

/// Walk the perimeter of the circle `(cx, cy, r)` at roughly 1-px arc steps
/// and collect intensity statistics from the nearest pixels.
pub fn circle_perimeter_stats(src: &GrayView<'_>, cx: f32, cy: f32, r: f32) -> PerimeterStats {
    let mut stats = PerimeterStats::default();
    if r <= 0.0 {
        return stats;
    }
    let steps = (TAU * r).ceil().max(8.0) as usize;
    for k in 0..steps {
        let theta = TAU * k as f32 / steps as f32;
        let x = (cx + r * theta.cos()).round() as i32;
        let y = (cy + r * theta.sin()).round() as i32;
        if !src.contains(x, y) {
            continue;
        }
        stats.on_field += 1;
        let v = src.get(x, y);
        if v > 0 {
            stats.nonzero += 1;
            stats.sum += v as f64;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn get_is_zero_outside_bounds() {
        let data = [10u8, 20, 30, 40];
        let v = GrayView {
            width: 2,
            height: 2,
            data: &data,
        };
        assert_eq!(v.get(0, 0), 10);
        assert_eq!(v.get(1, 1), 40);
        assert_eq!(v.get(-1, 0), 0);
        assert_eq!(v.get(0, 2), 0);
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        let data = [0u8, 100, 0, 100];
        let v = GrayView {
            width: 2,
            height: 2,
            data: &data,
        };
        assert_relative_eq!(sample_bilinear(&v, 0.5, 0.0), 50.0, epsilon = 1e-5);
        assert_relative_eq!(sample_bilinear(&v, 0.0, 0.5), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn perimeter_stats_on_uniform_disk() {
        let mut data = vec![0u8; 64 * 64];
        for y in 0..64i32 {
            for x in 0..64i32 {
                let dx = (x - 32) as f32;
                let dy = (y - 32) as f32;
                if (dx * dx + dy * dy).sqrt() <= 20.0 {
                    data[(y * 64 + x) as usize] = 200;
                }
            }
        }
        let v = GrayView {
            width: 64,
            height: 64,
            data: &data,
        };
        let stats = circle_perimeter_stats(&v, 32.0, 32.0, 10.0);
        assert_eq!(stats.on_field, stats.nonzero);
        assert_relative_eq!(stats.mean_nonzero(), 200.0, epsilon = 1e-9);

        let outside = circle_perimeter_stats(&v, 32.0, 32.0, 30.0);
        assert_eq!(outside.nonzero, 0);
        assert_eq!(outside.mean_nonzero(), 0.0);
    }
}
