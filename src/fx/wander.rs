use rand::Rng;

use crate::foundation::core::NormPoint;
use crate::scene::entities::{FaceRegion, Spider};

/// Steering constants for wandering spiders, in normalized units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WanderTuning {
    /// Distance at which a target counts as reached.
    pub arrive_epsilon: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    /// Bound of the per-tick heading perturbation, radians.
    pub wander_rad: f64,
}

impl Default for WanderTuning {
    fn default() -> Self {
        Self {
            arrive_epsilon: 0.04,
            speed_min: 0.002,
            speed_max: 0.005,
            wander_rad: 0.2,
        }
    }
}

impl WanderTuning {
    /// Fresh speed within the configured band.
    pub fn roll_speed<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.speed_max <= self.speed_min {
            return self.speed_min;
        }
        rng.gen_range(self.speed_min..self.speed_max)
    }

    fn roll_wander<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.wander_rad <= 0.0 {
            return 0.0;
        }
        rng.gen_range(-self.wander_rad..self.wander_rad)
    }
}

/// Uniform target inside `face`, or anywhere on the image when no face is known.
pub fn pick_target<R: Rng + ?Sized>(face: Option<FaceRegion>, rng: &mut R) -> NormPoint {
    match face {
        Some(f) => NormPoint::new(
            f.x + rng.gen_range(0.0..1.0) * f.width,
            f.y + rng.gen_range(0.0..1.0) * f.height,
        ),
        None => NormPoint::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
    }
}

/// Advance one spider by one tick.
///
/// Heading is recomputed from scratch every tick (`atan2` towards the target plus a fresh
/// perturbation), so the only steering state is position, target and speed.
pub fn step_spider<R: Rng + ?Sized>(
    spider: &mut Spider,
    face: Option<FaceRegion>,
    tuning: &WanderTuning,
    rng: &mut R,
) {
    let dx = spider.target.x - spider.pos.x;
    let dy = spider.target.y - spider.pos.y;

    if dx.hypot(dy) < tuning.arrive_epsilon {
        spider.target = pick_target(face, rng);
        spider.speed = tuning.roll_speed(rng);
    }

    let heading = dy.atan2(dx) + tuning.roll_wander(rng);
    spider.rotation = heading;
    spider.pos = NormPoint::new(
        spider.pos.x + heading.cos() * spider.speed,
        spider.pos.y + heading.sin() * spider.speed,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/fx/wander.rs"]
mod tests;
