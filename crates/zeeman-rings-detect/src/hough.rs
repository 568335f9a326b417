//! Gradient-voting circle detection over a radius band.
//!
//! Every strong-gradient pixel votes along its gradient direction (both
//! ways) at distances in `[r_min, r_max]`; circle centers show up as peaks
//! in the vote accumulator because boundary gradients converge radially.
//! A per-center radius histogram over radially-aligned edge pixels then
//! recovers the circle radius.
//!
//! Thresholds default low on purpose: the detector favors recall here and
//! prunes false positives with the quality score afterwards.

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Settings for the circle-detection pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Sobel magnitude threshold for edge pixels (8-bit gradient scale).
    pub grad_threshold: f32,
    /// Minimum accumulator votes to accept a center peak, and minimum
    /// aligned-pixel support to accept a radius.
    pub accum_threshold: f32,
    /// Minimum |cos| between gradient and radial direction for a pixel to
    /// vote in the radius histogram.
    pub align_cos: f32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            grad_threshold: 100.0,
            accum_threshold: 15.0,
            align_cos: 0.7,
        }
    }
}

/// One circle hypothesis from a detection pass.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CircleHypothesis {
    pub x: f32,
    pub y: f32,
    pub r: f32,
}

struct EdgePixel {
    x: f32,
    y: f32,
    // Unit gradient direction.
    dx: f32,
    dy: f32,
}

/// Deposit a vote into the accumulator using bilinear interpolation.
#[inline]
fn bilinear_vote(accum: &mut [f32], stride: usize, x: f32, y: f32, weight: f32) {
    let x0 = x as usize;
    let y0 = y as usize;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;
    let base = y0 * stride + x0;
    accum[base] += weight * (1.0 - fx) * (1.0 - fy);
    accum[base + 1] += weight * fx * (1.0 - fy);
    accum[base + stride] += weight * (1.0 - fx) * fy;
    accum[base + stride + 1] += weight * fx * fy;
}

/// Run one circle-detection pass restricted to radii in `[r_min, r_max]`.
///
/// `min_center_dist` is the non-maximum-suppression radius between center
/// peaks. Returns zero or more hypotheses in deterministic scan order; every
/// returned radius lies within the requested band.
pub fn hough_circles(
    gray: &GrayImage,
    r_min: f32,
    r_max: f32,
    min_center_dist: f32,
    params: &HoughParams,
) -> Vec<CircleHypothesis> {
    let (w, h) = gray.dimensions();
    if w < 4 || h < 4 || r_max < r_min {
        return Vec::new();
    }

    let edges = collect_edges(gray, params.grad_threshold);
    if edges.is_empty() {
        return Vec::new();
    }

    let stride = w as usize;
    let accum = vote_centers(&edges, w, h, r_min, r_max);
    let centers = extract_peaks(
        &accum,
        stride,
        h as usize,
        min_center_dist.max(1.0),
        params.accum_threshold,
    );
    log::debug!(
        "hough pass: {} edge pixels, {} center peaks",
        edges.len(),
        centers.len()
    );

    let mut out = Vec::new();
    for (cx, cy) in centers {
        if let Some(r) = estimate_radius(&edges, cx, cy, r_min, r_max, params) {
            out.push(CircleHypothesis { x: cx, y: cy, r });
        }
    }
    out
}

fn collect_edges(gray: &GrayImage, grad_threshold: f32) -> Vec<EdgePixel> {
    let gx = imageproc::gradients::horizontal_sobel(gray);
    let gy = imageproc::gradients::vertical_sobel(gray);
    let gx_raw = gx.as_raw();
    let gy_raw = gy.as_raw();
    let (w, h) = gray.dimensions();
    let threshold_sq = grad_threshold * grad_threshold;

    let mut edges = Vec::new();
    for y in 0..h as usize {
        let row = y * w as usize;
        for x in 0..w as usize {
            let gxv = gx_raw[row + x] as f32;
            let gyv = gy_raw[row + x] as f32;
            let mag_sq = gxv * gxv + gyv * gyv;
            if mag_sq < threshold_sq {
                continue;
            }
            let inv_mag = 1.0 / mag_sq.sqrt();
            edges.push(EdgePixel {
                x: x as f32,
                y: y as f32,
                dx: gxv * inv_mag,
                dy: gyv * inv_mag,
            });
        }
    }
    edges
}

fn vote_centers(edges: &[EdgePixel], w: u32, h: u32, r_min: f32, r_max: f32) -> Vec<f32> {
    let stride = w as usize;
    let mut accum = vec![0.0f32; stride * h as usize];
    let x_limit = (w - 1) as f32;
    let y_limit = (h - 1) as f32;

    let mut radii = Vec::new();
    let mut r = r_min.max(1.0);
    while r <= r_max {
        radii.push(r);
        r += 1.0;
    }

    for e in edges {
        // Vote along +gradient and -gradient; the true center sits on one
        // side but the masked annulus makes both worth counting.
        for &r in &radii {
            let vx = e.x + e.dx * r;
            let vy = e.y + e.dy * r;
            if vx >= 0.0 && vx < x_limit && vy >= 0.0 && vy < y_limit {
                bilinear_vote(&mut accum, stride, vx, vy, 1.0);
            }

            let vx = e.x - e.dx * r;
            let vy = e.y - e.dy * r;
            if vx >= 0.0 && vx < x_limit && vy >= 0.0 && vy < y_limit {
                bilinear_vote(&mut accum, stride, vx, vy, 1.0);
            }
        }
    }
    accum
}

/// Local maxima over `nms_radius` with at least `min_votes` support, in scan
/// order. Equal-valued neighbors break toward the lower buffer index so the
/// peak set is reproducible.
fn extract_peaks(
    accum: &[f32],
    stride: usize,
    height: usize,
    nms_radius: f32,
    min_votes: f32,
) -> Vec<(f32, f32)> {
    let nms_r = nms_radius.ceil() as i32;
    let nms_r_sq = nms_radius * nms_radius;

    let mut peaks = Vec::new();
    for y in 0..height as i32 {
        for x in 0..stride as i32 {
            let idx = y as usize * stride + x as usize;
            let val = accum[idx];
            if val < min_votes {
                continue;
            }
            let mut is_max = true;
            'nms: for dy in -nms_r..=nms_r {
                let ny = y + dy;
                if ny < 0 || ny >= height as i32 {
                    continue;
                }
                for dx in -nms_r..=nms_r {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    if (dx * dx + dy * dy) as f32 > nms_r_sq {
                        continue;
                    }
                    let nx = x + dx;
                    if nx < 0 || nx >= stride as i32 {
                        continue;
                    }
                    let nidx = ny as usize * stride + nx as usize;
                    if accum[nidx] > val || (accum[nidx] == val && nidx < idx) {
                        is_max = false;
                        break 'nms;
                    }
                }
            }
            if is_max {
                peaks.push((x as f32, y as f32));
            }
        }
    }
    peaks
}

/// Histogram edge-pixel distances from the center and take the mean distance
/// over the bins near the modal count (at least half of it). Both gradient
/// shells of a thick ring land in that window, so the estimate tracks the
/// ring centerline rather than one of its edges.
fn estimate_radius(
    edges: &[EdgePixel],
    cx: f32,
    cy: f32,
    r_min: f32,
    r_max: f32,
    params: &HoughParams,
) -> Option<f32> {
    let bins = ((r_max - r_min).ceil() as usize) + 1;
    let mut counts = vec![0u32; bins];
    let mut dist_sums = vec![0.0f64; bins];

    for e in edges {
        let dx = e.x - cx;
        let dy = e.y - cy;
        let d = (dx * dx + dy * dy).sqrt();
        if d < r_min || d > r_max || d <= 0.0 {
            continue;
        }
        // Radially aligned gradient only; tangential edges are clutter.
        let cos = (dx * e.dx + dy * e.dy) / d;
        if cos.abs() < params.align_cos {
            continue;
        }
        let bin = ((d - r_min).floor() as usize).min(bins - 1);
        counts[bin] += 1;
        dist_sums[bin] += d as f64;
    }

    let modal = *counts.iter().max()?;
    if modal == 0 {
        return None;
    }
    let mut support = 0u32;
    let mut sum = 0.0f64;
    for (count, dist_sum) in counts.iter().zip(&dist_sums) {
        if *count * 2 >= modal {
            support += *count;
            sum += *dist_sum;
        }
    }
    if (support as f32) < params.accum_threshold {
        return None;
    }
    Some((sum / support as f64) as f32)
}
