use std::f64::consts::TAU;

use rand::{Rng, RngCore};

use crate::foundation::core::{NormPoint, Rgba8, TimeMs};
use crate::fx::fracture::initial_angle_for;
use crate::fx::wander::{WanderTuning, pick_target};
use crate::scene::entities::{
    Bruise, Crack, Dent, EntityId, FaceRegion, Needle, Slap, Spider, Swelling,
};

/// User-selected impact strength, clamped to `0..=100`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub struct Strength(u8);

impl Strength {
    pub const MAX: Strength = Strength(100);

    /// Clamp `value` into `0..=100`.
    pub fn new(value: u32) -> Self {
        Self(value.min(100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Strength as a fraction in `[0, 1]`.
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Effect intensity in `(0, 1]`; strength 0 still yields a faint effect.
    pub fn intensity(self) -> f64 {
        self.fraction().max(0.01)
    }
}

impl From<u32> for Strength {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Strength> for u32 {
    fn from(value: Strength) -> Self {
        u32::from(value.0)
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self(50)
    }
}

/// How a tool acts on the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    /// Appends procedural entities to the store.
    Local,
    /// Warps the backing image in place; repeats while dragging.
    Warp,
    /// Delegates to the external generative service.
    Generative,
}

/// Closed set of tools the user can hit the image with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Mallet,
    Hand,
    /// Multi-slap gesture.
    Flurry,
    FistPunch,
    VoodooSpider,
    VoodooNeedle,
    Crack,
    Tornado,
    Shatter,
    Ugly,
    Skull,
}

/// Needle head palette.
pub const NEEDLE_PALETTE: [&str; 6] = [
    "#ef4444", "#f97316", "#facc15", "#4ade80", "#3b82f6", "#a855f7",
];

/// Slap cycles in a flurry.
pub const FLURRY_SLAPS: u32 = 3;

/// Inputs for turning a tool press into entities.
pub struct ImpactContext<'a, R: Rng + ?Sized> {
    pub pos: NormPoint,
    pub strength: Strength,
    pub now: TimeMs,
    pub face: Option<FaceRegion>,
    /// Backing-buffer color under the pointer (straight alpha).
    pub sampled: Rgba8,
    pub wander: WanderTuning,
    /// Fixed crack seed; drawn from `rng` when absent.
    pub crack_seed: Option<u64>,
    pub id: EntityId,
    pub rng: &'a mut R,
}

/// Entities produced by one local impact.
#[derive(Clone, Debug, PartialEq)]
pub enum Impact {
    Dent(Dent),
    /// Swellings are emitted by the slap cycles themselves.
    Slap(Slap),
    Spider(Spider),
    Needle(Needle),
    Bruises(Vec<Bruise>),
    Crack(Crack),
}

impl Tool {
    pub const ALL: [Tool; 11] = [
        Tool::Mallet,
        Tool::Hand,
        Tool::Flurry,
        Tool::FistPunch,
        Tool::VoodooSpider,
        Tool::VoodooNeedle,
        Tool::Crack,
        Tool::Tornado,
        Tool::Shatter,
        Tool::Ugly,
        Tool::Skull,
    ];

    pub fn kind(self) -> ToolKind {
        match self {
            Tool::Mallet
            | Tool::Hand
            | Tool::Flurry
            | Tool::FistPunch
            | Tool::VoodooSpider
            | Tool::VoodooNeedle
            | Tool::Crack => ToolKind::Local,
            Tool::Tornado => ToolKind::Warp,
            Tool::Shatter | Tool::Ugly | Tool::Skull => ToolKind::Generative,
        }
    }

    /// Build the entities for a local tool; `None` for warp and generative tools.
    pub fn build<R: Rng + ?Sized>(self, mut ctx: ImpactContext<'_, R>) -> Option<Impact> {
        let s = ctx.strength.fraction();
        let impact = match self {
            Tool::Mallet => Impact::Dent(Dent {
                pos: ctx.pos,
                radius: 0.02 + s * 0.04 + ctx.rng.gen_range(0.0..0.01),
                rotation: ctx.rng.gen_range(0.0..TAU),
                shadow_color: ctx.sampled.shifted(-50).with_alpha(0.5),
                highlight_color: ctx.sampled.shifted(50).with_alpha(0.5),
                created_at: ctx.now,
            }),
            Tool::Hand => Impact::Slap(new_slap(&mut ctx, None)),
            Tool::Flurry => Impact::Slap(new_slap(&mut ctx, Some(FLURRY_SLAPS))),
            Tool::FistPunch => Impact::Bruises(bruise_cluster(ctx.pos, ctx.strength, &mut *ctx.rng)),
            Tool::VoodooSpider => Impact::Spider(Spider {
                id: ctx.id,
                pos: ctx.pos,
                size: 0.015 + s * 0.02 + ctx.rng.gen_range(0.0..0.005),
                rotation: ctx.rng.gen_range(0.0..TAU),
                speed: ctx.wander.roll_speed(&mut *ctx.rng),
                target: pick_target(ctx.face, &mut *ctx.rng),
                created_at: ctx.now,
            }),
            Tool::VoodooNeedle => {
                let pick = ctx.rng.gen_range(0..NEEDLE_PALETTE.len());
                let color =
                    Rgba8::from_hex(NEEDLE_PALETTE[pick]).unwrap_or(Rgba8::opaque(239, 68, 68));
                Impact::Needle(Needle {
                    pos: ctx.pos,
                    length: 0.03 + s * 0.09,
                    rotation: ctx.rng.gen_range(0.0..TAU),
                    color,
                })
            }
            Tool::Crack => {
                let seed = match ctx.crack_seed {
                    Some(seed) => seed,
                    None => ctx.rng.next_u64(),
                };
                Impact::Crack(Crack {
                    id: ctx.id,
                    pos: ctx.pos,
                    strength: f64::from(ctx.strength.value()),
                    seed,
                    initial_angle: initial_angle_for(seed),
                })
            }
            Tool::Tornado | Tool::Shatter | Tool::Ugly | Tool::Skull => return None,
        };
        Some(impact)
    }
}

fn new_slap<R: Rng + ?Sized>(ctx: &mut ImpactContext<'_, R>, total_slaps: Option<u32>) -> Slap {
    let s = ctx.strength.fraction();
    Slap {
        id: ctx.id,
        pos: ctx.pos,
        size: (0.08 + s * 0.08) * 1.2,
        rotation: ctx.rng.gen_range(-0.25..0.25),
        created_at: ctx.now,
        total_slaps,
        strength: ctx.strength,
        fired: 0,
    }
}

/// Swelling left behind by one slap cycle.
pub fn slap_swelling<R: Rng + ?Sized>(
    pos: NormPoint,
    strength: Strength,
    now: TimeMs,
    rng: &mut R,
) -> Swelling {
    let s = strength.fraction();
    Swelling {
        pos,
        radius: 0.06 + s * 0.09,
        intensity: strength.intensity(),
        aspect_ratio: 1.0 + rng.gen_range(-0.35..0.35),
        rotation: rng.gen_range(0.0..TAU),
        created_at: now,
    }
}

fn bruise_cluster<R: Rng + ?Sized>(
    center: NormPoint,
    strength: Strength,
    rng: &mut R,
) -> Vec<Bruise> {
    let s = strength.fraction();
    let count = 1 + (s * 4.0).floor() as usize;
    let cluster_radius = 0.02 + s * 0.04;
    let base_radius = 0.015 + s * 0.03;

    (0..count)
        .map(|i| {
            let main = i == 0;
            let scale = if main { 1.0 } else { rng.gen_range(0.2..0.7) };
            let angle = rng.gen_range(0.0..TAU);
            let distance = if main {
                0.0
            } else {
                rng.gen_range(0.0..cluster_radius)
            };
            Bruise {
                pos: NormPoint::new(
                    center.x + angle.cos() * distance,
                    center.y + angle.sin() * distance,
                ),
                radius: base_radius * scale,
                rotation: rng.gen_range(0.0..TAU),
                intensity: strength.intensity(),
                aspect_ratio: 1.0 + rng.gen_range(-0.2..0.2),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tools.rs"]
mod tests;
