use std::f64::consts::PI;

use crate::foundation::core::Point;

/// Fraction of the buffer's shorter side used as the vortex radius at full strength.
pub const VORTEX_RADIUS_FRACTION: f64 = 0.15;

/// Axis-aligned window of buffer pixels touched by one warp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarpWindow {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Window for a warp of `strength` (fraction in `[0, 1]`) centered at `center`.
///
/// `None` when the clamped window has no area or the inputs are not finite.
pub fn vortex_window(
    buffer_width: u32,
    buffer_height: u32,
    center: Point,
    strength: f64,
) -> Option<(WarpWindow, f64)> {
    if !center.x.is_finite() || !center.y.is_finite() || !strength.is_finite() {
        return None;
    }
    let w = f64::from(buffer_width);
    let h = f64::from(buffer_height);
    let radius = strength * VORTEX_RADIUS_FRACTION * w.min(h);
    if radius <= 0.0 {
        return None;
    }

    let start_x = (center.x - radius).max(0.0).floor();
    let start_y = (center.y - radius).max(0.0).floor();
    let width = w.min(center.x + radius).floor() - start_x;
    let height = h.min(center.y + radius).floor() - start_y;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    Some((
        WarpWindow {
            x: start_x as usize,
            y: start_y as usize,
            width: width as usize,
            height: height as usize,
        },
        radius,
    ))
}

/// Twist the pixels of an RGBA8 buffer around `center` (buffer pixel coordinates).
///
/// The rotation applied to a pixel at distance `d` is `(1 - d/r)^2 * strength * PI`, sampled
/// nearest-neighbour from a snapshot of the window taken before any write. Sources that land
/// outside the window fall back to the unwarped pixel. Pixels outside the window are never
/// touched. Returns whether anything was written.
#[tracing::instrument(skip(rgba))]
pub fn apply_vortex(
    rgba: &mut [u8],
    buffer_width: u32,
    buffer_height: u32,
    center: Point,
    strength: f64,
) -> bool {
    let stride = buffer_width as usize * 4;
    if rgba.len() < stride * buffer_height as usize {
        tracing::warn!(len = rgba.len(), "vortex skipped: buffer smaller than its dimensions");
        return false;
    }
    let Some((win, radius)) = vortex_window(buffer_width, buffer_height, center, strength) else {
        return false;
    };
    let twist = strength * PI;

    let row_bytes = win.width * 4;
    let mut snapshot = Vec::with_capacity(row_bytes * win.height);
    for row in 0..win.height {
        let start = (win.y + row) * stride + win.x * 4;
        snapshot.extend_from_slice(&rgba[start..start + row_bytes]);
    }

    let (x0, y0) = (win.x as f64, win.y as f64);
    let (x1, y1) = (x0 + win.width as f64, y0 + win.height as f64);

    for row in 0..win.height {
        for col in 0..win.width {
            let px = x0 + col as f64;
            let py = y0 + row as f64;
            let dx = px - center.x;
            let dy = py - center.y;
            let distance = dx.hypot(dy);

            let mut src = (col, row);
            if distance < radius {
                let percent = 1.0 - distance / radius;
                let theta = dy.atan2(dx) - percent * percent * twist;
                let sx = (center.x + distance * theta.cos()).floor();
                let sy = (center.y + distance * theta.sin()).floor();
                if sx >= x0 && sx < x1 && sy >= y0 && sy < y1 {
                    src = ((sx - x0) as usize, (sy - y0) as usize);
                }
            }

            let s = src.1 * row_bytes + src.0 * 4;
            let d = (win.y + row) * stride + (win.x + col) * 4;
            rgba[d..d + 4].copy_from_slice(&snapshot[s..s + 4]);
        }
    }

    tracing::debug!(?win, radius, "vortex applied");
    true
}

#[cfg(test)]
#[path = "../../tests/unit/fx/vortex.rs"]
mod tests;
