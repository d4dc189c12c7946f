use std::f64::consts::FRAC_PI_2;

use crate::animation::ease::{Ease, progress};
use crate::foundation::core::{NormPoint, Rgba8, TimeMs};
use crate::foundation::error::{PoppetError, PoppetResult};
use crate::scene::timing::EffectTiming;
use crate::scene::tools::Strength;

/// Identifier for entities that need one (spiders, slaps, fractures). Unique per store.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct EntityId(pub u64);

/// Mallet impact: shaded ellipse with a short-lived ripple ring.
#[derive(Clone, Debug, PartialEq)]
pub struct Dent {
    pub pos: NormPoint,
    pub radius: f64,
    pub rotation: f64,
    pub shadow_color: Rgba8,
    pub highlight_color: Rgba8,
    pub created_at: TimeMs,
}

/// Ripple sample for a dent still inside its ripple window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    /// Linear progress `age / duration`.
    pub progress: f64,
    /// Ease-out cubic of `progress`.
    pub eased: f64,
}

impl Ripple {
    /// Ring radius as a multiple of the dent radius.
    pub fn radius_factor(&self) -> f64 {
        1.0 + self.eased * 2.0
    }

    /// Ring opacity.
    pub fn opacity(&self) -> f64 {
        1.0 - self.progress
    }

    /// Ring stroke width in canvas pixels.
    pub fn line_width(&self) -> f64 {
        3.0 * (1.0 - self.eased)
    }
}

impl Dent {
    /// Ripple state at `now`, or `None` once the window has closed (or before creation).
    pub fn ripple(&self, now: TimeMs, ripple_ms: f64) -> Option<Ripple> {
        let age = now.since(self.created_at);
        if age < 0.0 || age >= ripple_ms {
            return None;
        }
        let p = age / ripple_ms;
        Some(Ripple {
            progress: p,
            eased: Ease::OutCubic.apply(p),
        })
    }
}

/// Voodoo needle stuck into the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Needle {
    pub pos: NormPoint,
    pub length: f64,
    pub rotation: f64,
    pub color: Rgba8,
}

/// Blister-like bruise.
#[derive(Clone, Debug, PartialEq)]
pub struct Bruise {
    pub pos: NormPoint,
    pub radius: f64,
    pub rotation: f64,
    pub intensity: f64,
    pub aspect_ratio: f64,
}

/// Reddened swelling left by a slap; fades in, holds, fades out, then is removed.
#[derive(Clone, Debug, PartialEq)]
pub struct Swelling {
    pub pos: NormPoint,
    pub radius: f64,
    pub intensity: f64,
    pub aspect_ratio: f64,
    pub rotation: f64,
    pub created_at: TimeMs,
}

impl Swelling {
    /// Intensity actually drawn at `now`.
    ///
    /// 0 at creation, ease-out rise to `intensity` across the fade-in, held, then a linear fall
    /// reaching exactly 0 at the end of the lifetime.
    pub fn effective_intensity(&self, now: TimeMs, timing: &EffectTiming) -> f64 {
        let age = now.since(self.created_at);
        if age <= 0.0 || age >= timing.swell_lifetime_ms() {
            return 0.0;
        }
        if age < timing.swell_fade_in_ms {
            let eased = Ease::OutCubic.apply(progress(age, timing.swell_fade_in_ms));
            return self.intensity * eased;
        }
        let fade_start = timing.swell_fade_in_ms + timing.swell_hold_ms;
        if age < fade_start {
            return self.intensity;
        }
        let t = progress(age - fade_start, timing.swell_fade_out_ms);
        self.intensity * (1.0 - Ease::Linear.apply(t))
    }

    /// Whether the swelling has outlived its lifetime.
    pub fn is_expired(&self, now: TimeMs, timing: &EffectTiming) -> bool {
        now.since(self.created_at) >= timing.swell_lifetime_ms()
    }
}

/// Decorative spider wandering over the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Spider {
    pub id: EntityId,
    pub pos: NormPoint,
    pub size: f64,
    /// Current heading in radians.
    pub rotation: f64,
    /// Normalized units per tick.
    pub speed: f64,
    pub target: NormPoint,
    pub created_at: TimeMs,
}

impl Spider {
    /// Whether the spider has outlived its time-to-live.
    pub fn is_expired(&self, now: TimeMs, timing: &EffectTiming) -> bool {
        now.since(self.created_at) >= timing.spider_ttl_ms
    }
}

/// Transient slap gesture; one or more approach/retract cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct Slap {
    pub id: EntityId,
    pub pos: NormPoint,
    pub size: f64,
    pub rotation: f64,
    pub created_at: TimeMs,
    /// Number of slap cycles; `None` is a single slap.
    pub total_slaps: Option<u32>,
    /// Strength the gesture was made with; drives the swellings it leaves behind.
    pub strength: Strength,
    /// Cycles whose entry side effect has already fired.
    pub fired: u32,
}

/// Where the hand is drawn at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlapPose {
    /// Index of the current cycle.
    pub cycle: u32,
    /// Distance from the impact point, as a multiple of the slap size.
    pub distance: f64,
    /// Direction the hand is displaced towards, radians.
    pub angle: f64,
    /// Drawing rotation of the hand print, radians.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

const SLAP_START_DISTANCE: f64 = 2.5;
const SLAP_APPROACH_FRACTION: f64 = 0.25;

impl Slap {
    /// Number of cycles in this gesture.
    pub fn cycles(&self) -> u32 {
        self.total_slaps.unwrap_or(1).max(1)
    }

    /// Total gesture duration.
    pub fn duration_ms(&self, timing: &EffectTiming) -> f64 {
        timing.slap_ms * f64::from(self.cycles())
    }

    /// Whether the gesture has finished.
    pub fn is_finished(&self, now: TimeMs, timing: &EffectTiming) -> bool {
        now.since(self.created_at) >= self.duration_ms(timing)
    }

    /// Number of cycles entered by `now` (cycle 0 is entered at creation).
    pub fn cycles_entered(&self, now: TimeMs, timing: &EffectTiming) -> u32 {
        let age = now.since(self.created_at);
        if age < 0.0 {
            return 0;
        }
        if timing.slap_ms <= 0.0 {
            return self.cycles();
        }
        let entered = (age / timing.slap_ms).floor() as u64 + 1;
        entered.min(u64::from(self.cycles())) as u32
    }

    /// Pose at `now`, or `None` outside the gesture's lifetime.
    pub fn pose(&self, now: TimeMs, timing: &EffectTiming) -> Option<SlapPose> {
        let age = now.since(self.created_at);
        if age < 0.0 || age >= self.duration_ms(timing) || timing.slap_ms <= 0.0 {
            return None;
        }
        let cycle = ((age / timing.slap_ms).floor() as u32).min(self.cycles() - 1);
        let p = (age - f64::from(cycle) * timing.slap_ms) / timing.slap_ms;

        let (distance, alpha) = if p < SLAP_APPROACH_FRACTION {
            let t = p / SLAP_APPROACH_FRACTION;
            (SLAP_START_DISTANCE * (1.0 - Ease::OutCubic.apply(t)), t)
        } else {
            let t = (p - SLAP_APPROACH_FRACTION) / (1.0 - SLAP_APPROACH_FRACTION);
            (Ease::InQuad.apply(t) * SLAP_START_DISTANCE * 0.5, 1.0 - t)
        };

        // Alternate cycles come in from the opposite side.
        let side = if cycle % 2 == 0 { 1.0 } else { -1.0 };
        let rotation = self.rotation * side;
        Some(SlapPose {
            cycle,
            distance,
            angle: rotation - side * FRAC_PI_2,
            rotation,
            alpha: alpha.clamp(0.0, 1.0),
        })
    }
}

/// Procedural crack; geometry is regrown from `seed` on every redraw.
#[derive(Clone, Debug, PartialEq)]
pub struct Crack {
    pub id: EntityId,
    pub pos: NormPoint,
    /// Strength in `[0, 100]`.
    pub strength: f64,
    pub seed: u64,
    pub initial_angle: f64,
}

/// Detected face bounding box in normalized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaceRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Slack allowed past the image edge for imprecise detectors.
pub const FACE_EDGE_TOLERANCE: f64 = 1.05;

impl FaceRegion {
    /// Validate a normalized box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> PoppetResult<Self> {
        let finite = [x, y, width, height].iter().all(|v| v.is_finite());
        if !finite
            || x < 0.0
            || y < 0.0
            || width <= 0.0
            || height <= 0.0
            || x + width > FACE_EDGE_TOLERANCE
            || y + height > FACE_EDGE_TOLERANCE
        {
            return Err(PoppetError::validation(format!(
                "face region out of range: x={x} y={y} w={width} h={height}"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: NormPoint) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/entities.rs"]
mod tests;
