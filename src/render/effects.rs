//! Per-family layer builders. Each turns one entity into its ordered draw operations.
//!
//! Sizes stored on entities are fractions of the drawn image's shorter side; fixed pixel sizes
//! (needle head, ripple stroke) are canvas pixels.

use std::f64::consts::FRAC_PI_2;

use kurbo::{Cap, Circle, Ellipse, Shape};

use crate::foundation::core::{Affine, BezPath, Point, Rgba8, TimeMs, Vec2};
use crate::fx::fracture::grow_fracture;
use crate::layout::letterbox::Letterbox;
use crate::render::blend::BlendMode;
use crate::render::layers::{Layer, PATH_TOLERANCE, polyline, stroke_outline};
use crate::render::paint::{ColorStop, Paint};
use crate::scene::entities::{Bruise, Crack, Dent, Needle, Slap, Spider, Swelling};
use crate::scene::timing::EffectTiming;

const RIPPLE_COLOR: Rgba8 = Rgba8::opaque(250, 204, 21);
const NEEDLE_HEAD_PX: f64 = 4.5;
const NEEDLE_SHAFT_PX: f64 = 2.0;
const SPIDER_FILL: Rgba8 = Rgba8::opaque(0x1a, 0x1a, 0x1a);
const HAND_COLOR: Rgba8 = Rgba8::opaque(255, 220, 200);

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn stop(offset: f64, r: u8, g: u8, b: u8, a: f64) -> ColorStop {
    ColorStop::new(offset, Rgba8::new(r, g, b, a.clamp(0.0, 1.0) as f32))
}

/// Shadow ellipse, highlight ellipse and, inside the ripple window, the expanding ring.
pub fn dent_layers(dent: &Dent, now: TimeMs, timing: &EffectTiming, lb: &Letterbox, out: &mut Vec<Layer>) {
    let center = lb.to_canvas(dent.pos);
    let radius = dent.radius * lb.min_side();
    if !positive(radius) {
        return;
    }

    out.push(Layer::new(
        Ellipse::new(center, (radius, radius * 0.8), dent.rotation),
        Paint::radial(
            center,
            radius,
            vec![
                ColorStop::new(0.0, Rgba8::transparent()),
                ColorStop::new(0.7, dent.shadow_color.with_alpha(0.3)),
                ColorStop::new(1.0, dent.shadow_color.with_alpha(0.7)),
            ],
        ),
        BlendMode::Normal,
    ));
    out.push(Layer::new(
        Ellipse::new(center, (radius * 0.8, radius), dent.rotation),
        Paint::radial(
            center,
            radius * 1.5,
            vec![
                ColorStop::new(0.0, dent.highlight_color),
                ColorStop::new(1.0, dent.highlight_color.with_alpha(0.0)),
            ],
        ),
        BlendMode::Normal,
    ));

    if let Some(ripple) = dent.ripple(now, timing.ripple_ms) {
        let width = ripple.line_width();
        if positive(width) {
            let ring = Circle::new(center, radius * ripple.radius_factor()).to_path(PATH_TOLERANCE);
            out.push(Layer::solid(
                stroke_outline(&ring, width, Cap::Butt),
                RIPPLE_COLOR.with_alpha((ripple.opacity() * 0.8) as f32),
            ));
        }
    }
}

/// Dark body, head and eight stroked legs, oriented along the current heading.
pub fn spider_layers(spider: &Spider, lb: &Letterbox, out: &mut Vec<Layer>) {
    let s = spider.size * lb.min_side();
    if !positive(s) {
        return;
    }
    let t = Affine::translate(lb.to_canvas(spider.pos).to_vec2())
        * Affine::rotate(spider.rotation + FRAC_PI_2);

    out.push(
        Layer::solid(Ellipse::new(Point::ZERO, (s * 0.7, s), FRAC_PI_2), SPIDER_FILL).transformed(t),
    );
    out.push(Layer::solid(Circle::new((0.0, s * 0.8), s * 0.5), SPIDER_FILL).transformed(t));

    let mut legs = BezPath::new();
    for m in [1.0, -1.0] {
        let leg_points: [[(f64, f64); 3]; 4] = [
            [(0.0, 0.2), (1.5 * m, 0.5), (2.0 * m, -0.5)],
            [(0.0, -0.1), (1.8 * m, -0.3), (2.2 * m, -1.2)],
            [(0.0, 0.5), (1.2 * m, 1.2), (1.8 * m, 1.8)],
            [(0.0, -0.4), (1.0 * m, -1.5), (1.5 * m, -2.2)],
        ];
        for leg in leg_points {
            let pts: Vec<Point> = leg.iter().map(|&(x, y)| Point::new(x * s, y * s)).collect();
            legs.extend(stroke_outline(&polyline(&pts), s * 0.1, Cap::Butt).iter());
        }
    }
    out.push(Layer::solid(legs, Rgba8::opaque(0, 0, 0)).transformed(t));
}

/// Puncture wound, then the shaded needle with its head and specular highlight.
pub fn needle_layers(needle: &Needle, lb: &Letterbox, out: &mut Vec<Layer>) {
    let center = lb.to_canvas(needle.pos);
    let length = needle.length * lb.min_side();
    if !positive(length) {
        return;
    }
    let (head, shaft) = (NEEDLE_HEAD_PX, NEEDLE_SHAFT_PX);

    out.push(Layer::solid(
        Circle::new(center, shaft / 1.5),
        Rgba8::new(10, 0, 0, 0.6),
    ));
    out.push(Layer::new(
        Circle::new(center, head * 2.5),
        Paint::Radial {
            c0: center,
            r0: shaft,
            c1: center,
            r1: head * 2.5,
            stops: vec![
                stop(0.0, 150, 50, 50, 0.4),
                stop(0.7, 100, 30, 30, 0.2),
                stop(1.0, 100, 30, 30, 0.0),
            ],
        },
        BlendMode::Normal,
    ));

    let t = Affine::translate(center.to_vec2()) * Affine::rotate(needle.rotation);
    let shaft_line = polyline(&[Point::new(0.0, -2.0), Point::new(0.0, -length)]);
    let mut shaft_path = stroke_outline(&shaft_line, shaft, Cap::Round);
    shaft_path.apply_affine(t);
    let head_center = t * Point::new(0.0, -length);

    // Drop shadow, offset in canvas space.
    let shadow_offset = Affine::translate((3.0, 3.0));
    let mut shadow = shaft_path.clone();
    shadow.extend(Circle::new(head_center, head).path_elements(PATH_TOLERANCE));
    out.push(
        Layer::solid(shadow, Rgba8::new(0, 0, 0, 0.35)).transformed(shadow_offset),
    );

    out.push(Layer::new(
        shaft_path,
        Paint::Linear {
            p0: t * Point::new(-shaft, 0.0),
            p1: t * Point::new(shaft, 0.0),
            stops: vec![
                stop(0.0, 0x71, 0x71, 0x7a, 1.0),
                stop(0.4, 0xe5, 0xe5, 0xe5, 1.0),
                stop(1.0, 0xa1, 0xa1, 0xaa, 1.0),
            ],
        },
        BlendMode::Normal,
    ));
    out.push(Layer::solid(Circle::new(head_center, head), needle.color));

    let focus = t * Point::new(-head * 0.4, -length - head * 0.4);
    out.push(Layer::new(
        Circle::new(head_center, head),
        Paint::radial(
            focus,
            head * 1.5,
            vec![stop(0.0, 255, 255, 255, 0.9), stop(1.0, 255, 255, 255, 0.0)],
        ),
        BlendMode::Normal,
    ));
}

fn ellipse_radii(radius: f64, aspect_ratio: f64, lb: &Letterbox) -> Option<(f64, f64)> {
    let rx = radius * aspect_ratio * lb.min_side();
    let ry = radius * lb.min_side();
    (positive(rx) && positive(ry)).then_some((rx, ry))
}

/// Irritation halo, inner shadow, blister body and glossy highlight.
pub fn bruise_layers(bruise: &Bruise, lb: &Letterbox, out: &mut Vec<Layer>) {
    let Some((rx, ry)) = ellipse_radii(bruise.radius, bruise.aspect_ratio, lb) else {
        return;
    };
    let c = lb.to_canvas(bruise.pos);
    let i = bruise.intensity.clamp(0.0, 1.0);
    let m = rx.max(ry);
    let body = Ellipse::new(c, (rx, ry), bruise.rotation);

    out.push(Layer::new(
        Circle::new(c, m * 2.5),
        Paint::radial(
            c,
            m * 2.5,
            vec![
                stop(0.0, 220, 80, 80, 0.35 * i),
                stop(0.5, 200, 100, 100, 0.2 * i),
                stop(1.0, 200, 100, 100, 0.0),
            ],
        ),
        BlendMode::Overlay,
    ));
    out.push(Layer::new(
        body,
        Paint::Radial {
            c0: c + Vec2::new(rx * 0.3, ry * 0.3),
            r0: 0.0,
            c1: c,
            r1: m * 1.5,
            stops: vec![stop(0.0, 100, 40, 40, 0.0), stop(1.0, 100, 40, 40, 0.4 * i)],
        },
        BlendMode::Multiply,
    ));
    out.push(Layer::new(
        body,
        Paint::Radial {
            c0: c - Vec2::new(rx * 0.3, ry * 0.3),
            r0: 0.0,
            c1: c,
            r1: m,
            stops: vec![stop(0.0, 255, 250, 220, 0.9 * i), stop(1.0, 255, 220, 200, 0.6 * i)],
        },
        BlendMode::SoftLight,
    ));
    out.push(Layer::new(
        body,
        Paint::radial(
            c - Vec2::new(rx * 0.4, ry * 0.4),
            m * 0.7,
            vec![
                stop(0.0, 255, 255, 255, 0.9 * i),
                stop(0.3, 255, 255, 255, 0.7 * i),
                stop(1.0, 255, 255, 255, 0.0),
            ],
        ),
        BlendMode::Overlay,
    ));
}

/// Base redness, raised highlight and impact core, scaled by the faded intensity.
pub fn swelling_layers(
    swelling: &Swelling,
    now: TimeMs,
    timing: &EffectTiming,
    lb: &Letterbox,
    out: &mut Vec<Layer>,
) {
    let i = swelling.effective_intensity(now, timing);
    if !positive(i) {
        return;
    }
    let Some((rx, ry)) = ellipse_radii(swelling.radius, swelling.aspect_ratio, lb) else {
        return;
    };
    let c = lb.to_canvas(swelling.pos);
    let m = rx.max(ry);
    let body = Ellipse::new(c, (rx, ry), swelling.rotation);

    out.push(Layer::new(
        Circle::new(c, m * 1.8),
        Paint::radial(
            c,
            m * 1.8,
            vec![stop(0.2, 200, 40, 40, 0.5 * i), stop(1.0, 200, 40, 40, 0.0)],
        ),
        BlendMode::Overlay,
    ));
    out.push(Layer::new(
        body,
        Paint::Radial {
            c0: c - Vec2::new(rx * 0.2, ry * 0.2),
            r0: 0.0,
            c1: c,
            r1: m * 1.2,
            stops: vec![stop(0.0, 255, 200, 200, 0.6 * i), stop(1.0, 255, 200, 200, 0.0)],
        },
        BlendMode::SoftLight,
    ));
    out.push(Layer::new(
        body,
        Paint::radial(
            c,
            m,
            vec![stop(0.0, 150, 0, 0, 0.4 * i), stop(0.8, 150, 0, 0, 0.0)],
        ),
        BlendMode::ColorBurn,
    ));
}

/// Fracture network regrown from its seed, in three passes: shadow, raised edges, dark core.
pub fn crack_layers(crack: &Crack, lb: &Letterbox, out: &mut Vec<Layer>) {
    let scale = lb.min_side();
    if !positive(scale) {
        return;
    }
    let origin = lb.to_canvas(crack.pos);
    let segments = grow_fracture(crack);
    if segments.is_empty() {
        return;
    }

    let mut shadow = BezPath::new();
    let mut edges = BezPath::new();
    let mut core = BezPath::new();
    for seg in &segments {
        let a = origin + seg.from * scale;
        let b = origin + seg.to * scale;
        let w = seg.width * scale;
        if !positive(w) || a == b {
            continue;
        }
        let line = polyline(&[a, b]);
        shadow.extend(stroke_outline(&line, w * 3.0, Cap::Round).iter());
        core.extend(stroke_outline(&line, (w * 0.5).max(0.75), Cap::Round).iter());

        let normal = (b - a).normalize().turn_90() * (w * 0.8);
        let edge = polyline(&[a + normal, b + normal]);
        edges.extend(stroke_outline(&edge, w * 0.6, Cap::Round).iter());
    }

    out.push(Layer::new(shadow, Paint::Solid(Rgba8::new(40, 30, 30, 0.25)), BlendMode::Multiply));
    out.push(Layer::new(
        edges,
        Paint::Solid(Rgba8::new(255, 255, 255, 0.5)),
        BlendMode::SoftLight,
    ));
    out.push(Layer::new(core, Paint::Solid(Rgba8::new(30, 20, 20, 0.9)), BlendMode::Multiply));
}

/// Hand print at its current approach/retract pose.
pub fn slap_layers(slap: &Slap, now: TimeMs, timing: &EffectTiming, lb: &Letterbox, out: &mut Vec<Layer>) {
    let Some(pose) = slap.pose(now, timing) else {
        return;
    };
    let size = slap.size * lb.min_side();
    if !positive(size) || pose.alpha <= 0.0 {
        return;
    }
    let center = lb.to_canvas(slap.pos);
    let hand = center + Vec2::from_angle(pose.angle) * (pose.distance * size);
    let t = Affine::translate(hand.to_vec2()) * Affine::rotate(pose.rotation);
    let alpha = pose.alpha as f32;
    let color = HAND_COLOR.with_alpha(0.9 * alpha);

    let palm_h = size * 1.1;
    let finger_w = size * 0.25;
    let finger_l = size * 0.9;
    let base_y = -palm_h / 2.0;

    // (x, y, width, height, rotation)
    let pieces = [
        (0.0, 0.0, size, palm_h, 0.0),
        (-size * 0.35, base_y, finger_w * 0.8, finger_l * 0.7, 0.2),
        (-size * 0.1, base_y, finger_w, finger_l * 0.9, 0.05),
        (size * 0.15, base_y, finger_w, finger_l, -0.05),
        (size * 0.38, base_y, finger_w * 0.95, finger_l * 0.85, -0.2),
        (-size / 2.0 * 0.8, palm_h / 2.0 * 0.4, finger_w * 2.2, finger_l * 1.2, -0.9),
    ];
    for (x, y, w, h, rot) in pieces {
        out.push(
            Layer::solid(Ellipse::new((x, y), (w / 2.0, h / 2.0), rot), color)
                .with_alpha(alpha)
                .transformed(t),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/effects.rs"]
mod tests;
