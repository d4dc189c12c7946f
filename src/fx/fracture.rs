use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_3, TAU};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::foundation::core::Vec2;
use crate::scene::entities::Crack;

/// One straight piece of a fracture.
///
/// Coordinates are offsets from the crack origin in units of the drawn image's shorter side, so
/// the same geometry scales with the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f64,
}

/// Shape constants for fracture growth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractureParams {
    /// Segments shorter than this end their branch.
    pub min_length: f64,
    /// Maximum heading change per step, radians.
    pub jitter: f64,
    /// Branch heading offset, radians.
    pub branch_angle: f64,
}

impl Default for FractureParams {
    fn default() -> Self {
        Self {
            min_length: 0.006,
            jitter: 0.5,
            branch_angle: FRAC_PI_3,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Tip {
    origin: Vec2,
    angle: f64,
    length: f64,
    width: f64,
}

/// Segment budget for a crack of `strength` in `[0, 100]`.
pub fn max_segments(strength: f64) -> usize {
    20 + (strength.clamp(0.0, 100.0) * 0.6) as usize
}

/// Heading of the first segment of a crack grown from `seed`.
///
/// Drawn from its own stream of the seed's generator, so it never shifts the growth sequence.
pub fn initial_angle_for(seed: u64) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(1);
    rng.gen_range(0.0..TAU)
}

/// Grow the segment network of `crack`.
///
/// A pure function of the crack's seed, strength and initial angle.
pub fn grow_fracture(crack: &Crack) -> Vec<Segment> {
    grow_fracture_with(crack, &FractureParams::default())
}

pub fn grow_fracture_with(crack: &Crack, params: &FractureParams) -> Vec<Segment> {
    let mut rng = ChaCha8Rng::seed_from_u64(crack.seed);
    let strength = crack.strength.clamp(0.0, 100.0);
    let s = strength / 100.0;
    let branch_probability = 0.3 + strength / 250.0;
    let budget = max_segments(strength);

    let mut segments = Vec::with_capacity(budget);
    let mut queue = VecDeque::new();
    queue.push_back(Tip {
        origin: Vec2::ZERO,
        angle: crack.initial_angle,
        length: 0.04 + s * 0.08,
        width: 0.004 + s * 0.006,
    });

    while let Some(tip) = queue.pop_front() {
        if segments.len() >= budget {
            break;
        }
        let angle = tip.angle + jitter(&mut rng, params.jitter);
        let to = tip.origin + Vec2::from_angle(angle) * tip.length;
        segments.push(Segment {
            from: tip.origin,
            to,
            width: tip.width,
        });

        let next = tip.length * rng.gen_range(0.85..=1.0);
        if next < params.min_length {
            continue;
        }
        queue.push_back(Tip {
            origin: to,
            angle,
            length: next,
            width: tip.width * 0.9,
        });

        if rng.gen_bool(branch_probability.min(1.0)) {
            let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            let length = tip.length * rng.gen_range(0.5..=0.8);
            if length >= params.min_length {
                queue.push_back(Tip {
                    origin: to,
                    angle: angle + side * params.branch_angle,
                    length,
                    width: tip.width * 0.7,
                });
            }
        }
    }

    segments
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, bound: f64) -> f64 {
    if bound <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-bound..bound)
}

#[cfg(test)]
#[path = "../../tests/unit/fx/fracture.rs"]
mod tests;
