//! Poppet is a procedural impact-effect compositor for photos.
//!
//! A [`Session`] owns a backing image and a store of typed effect entities (dents, needles,
//! bruises, swellings, wandering spiders, slaps and cracks) anchored in normalized image
//! coordinates. Every frame is composed on the CPU from the letterboxed image and ordered
//! gradient/blend layers. Time-bounded animations run on frame loops that go idle on their own.
//!
//! - Load an image and optionally a face region
//! - Register impacts with a [`Tool`] and [`Strength`]
//! - Drive frame callbacks through a [`FrameDriver`] and render [`FrameRGBA`]s
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod fx;
pub(crate) mod layout;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod schedule;
pub(crate) mod services;
pub(crate) mod session;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, NormPoint, Point, Rect, Rgba8, TimeMs, Vec2,
};
pub use crate::foundation::error::{PoppetError, PoppetResult};

pub use crate::animation::ease::Ease;
pub use crate::fx::fracture::{
    FractureParams, Segment, grow_fracture, grow_fracture_with, initial_angle_for,
};
pub use crate::fx::vortex::{VORTEX_RADIUS_FRACTION, WarpWindow, apply_vortex, vortex_window};
pub use crate::fx::wander::{WanderTuning, pick_target, step_spider};
pub use crate::layout::letterbox::Letterbox;
pub use crate::render::backing::BackingImage;
pub use crate::render::blend::BlendMode;
pub use crate::render::compositor::{Compositor, FrameRGBA, build_layers};
pub use crate::render::effects::{
    bruise_layers, crack_layers, dent_layers, needle_layers, slap_layers, spider_layers,
    swelling_layers,
};
pub use crate::render::layers::{Layer, polyline, stroke_outline};
pub use crate::render::paint::{ColorStop, Paint};
pub use crate::scene::entities::{
    Bruise, Crack, Dent, EntityId, FaceRegion, Needle, Ripple, Slap, SlapPose, Spider, Swelling,
};
pub use crate::scene::store::{EffectBackup, EffectCounts, EffectStore, EntityRef, Family};
pub use crate::scene::timing::EffectTiming;
pub use crate::scene::tools::{Impact, ImpactContext, Strength, Tool, ToolKind, slap_swelling};
pub use crate::schedule::driver::{FrameDriver, FrameHandle, FrameLoop, ManualFrameDriver};
pub use crate::schedule::scheduler::AnimationScheduler;
pub use crate::services::collaborators::{
    FaceDetector, Feedback, FeedbackSink, GenerativeImageService,
};
pub use crate::services::face::{RawFaceBox, normalize_face_box};
pub use crate::services::prompts::{prompt_for, shatter_prompt, skull_prompt, ugly_prompt};
pub use crate::session::opts::SessionOpts;
pub use crate::session::punch_session::{
    EXCHANGE_MIME, ExternalFailure, ExternalRequest, FrameOutcome, IgnoreReason, ImpactOutcome,
    Session,
};
pub use crate::session::score::{Score, ScoringRules};
pub use crate::session::script::{ImpactScript, REPLAY_FRAME_MS, ScriptedImpact};
