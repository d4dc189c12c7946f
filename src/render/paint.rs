use crate::foundation::core::{Point, Rgba8};

/// Gradient color stop; `offset` in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba8,
}

impl ColorStop {
    pub const fn new(offset: f64, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// Fill style of a layer, evaluated in canvas pixel space.
///
/// Gradients follow 2D canvas semantics: pad extend, colors interpolated premultiplied, and
/// radial gradients are two-point conical (`c0, r0` to `c1, r1`). They are rebuilt every frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    Linear {
        p0: Point,
        p1: Point,
        stops: Vec<ColorStop>,
    },
    Radial {
        c0: Point,
        r0: f64,
        c1: Point,
        r1: f64,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    /// Concentric radial gradient from the center out to `radius`.
    pub fn radial(center: Point, radius: f64, stops: Vec<ColorStop>) -> Self {
        Paint::Radial {
            c0: center,
            r0: 0.0,
            c1: center,
            r1: radius,
            stops,
        }
    }

    /// Premultiplied color at `p`; transparent where a radial gradient is undefined.
    pub fn sample(&self, p: Point) -> [f32; 4] {
        match self {
            Paint::Solid(c) => c.premul_f32(),
            Paint::Linear { p0, p1, stops } => {
                let axis = *p1 - *p0;
                let len2 = axis.hypot2();
                if len2 <= 0.0 {
                    return [0.0; 4];
                }
                let t = (p - *p0).dot(axis) / len2;
                sample_stops(stops, t)
            }
            Paint::Radial {
                c0,
                r0,
                c1,
                r1,
                stops,
            } => match conical_t(*c0, *r0, *c1, *r1, p) {
                Some(t) => sample_stops(stops, t),
                None => [0.0; 4],
            },
        }
    }
}

/// Largest `w` with `r(w) >= 0` such that `p` lies on the circle interpolated at `w`.
fn conical_t(c0: Point, r0: f64, c1: Point, r1: f64, p: Point) -> Option<f64> {
    let cd = c1 - c0;
    let pd = p - c0;
    let dr = r1 - r0;

    let a = cd.dot(cd) - dr * dr;
    let b = pd.dot(cd) + r0 * dr;
    let c = pd.dot(pd) - r0 * r0;
    let radius_ok = |w: f64| r0 + w * dr >= 0.0;

    if a.abs() < 1e-9 {
        if b.abs() < 1e-12 {
            return None;
        }
        let w = c / (2.0 * b);
        return radius_ok(w).then_some(w);
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (w1, w2) = ((b + sq) / a, (b - sq) / a);
    let (hi, lo) = if w1 >= w2 { (w1, w2) } else { (w2, w1) };
    if radius_ok(hi) {
        Some(hi)
    } else if radius_ok(lo) {
        Some(lo)
    } else {
        None
    }
}

fn sample_stops(stops: &[ColorStop], t: f64) -> [f32; 4] {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0.0; 4];
    };
    if !t.is_finite() || t <= first.offset {
        return first.color.premul_f32();
    }
    if t >= last.offset {
        return last.color.premul_f32();
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= 0.0 {
                return b.color.premul_f32();
            }
            let k = ((t - a.offset) / span) as f32;
            let ca = a.color.premul_f32();
            let cb = b.color.premul_f32();
            return [
                ca[0] + (cb[0] - ca[0]) * k,
                ca[1] + (cb[1] - ca[1]) * k,
                ca[2] + (cb[2] - ca[2]) * k,
                ca[3] + (cb[3] - ca[3]) * k,
            ];
        }
    }
    last.color.premul_f32()
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
