use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::foundation::core::{Canvas, NormPoint, Point, TimeMs};
use crate::foundation::error::{PoppetError, PoppetResult};
use crate::fx::wander::step_spider;
use crate::layout::letterbox::Letterbox;
use crate::render::backing::BackingImage;
use crate::render::compositor::{Compositor, FrameRGBA};
use crate::scene::entities::FaceRegion;
use crate::scene::store::{EffectBackup, EffectCounts, EffectStore};
use crate::scene::tools::{Impact, ImpactContext, Strength, Tool, ToolKind, slap_swelling};
use crate::schedule::driver::{FrameDriver, FrameHandle, FrameLoop, ManualFrameDriver};
use crate::schedule::scheduler::AnimationScheduler;
use crate::services::collaborators::{FaceDetector, Feedback, FeedbackSink, GenerativeImageService};
use crate::services::face::normalize_face_box;
use crate::services::prompts::prompt_for;
use crate::session::opts::SessionOpts;
use crate::session::score::Score;

/// MIME type of images handed to the collaborators.
pub const EXCHANGE_MIME: &str = "image/png";

/// Why a pointer press did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No image has been loaded yet.
    NoImage,
    /// The pointer is on the letterbox bars.
    OutsideImage,
    /// A face region is known and the pointer is outside it.
    OutsideFace,
    /// A generative effect is in flight.
    Busy,
}

/// Result of registering an impact.
#[derive(Clone, Debug, PartialEq)]
pub enum ImpactOutcome {
    Ignored(IgnoreReason),
    /// Local entities were added and the hit was scored.
    Local { tool: Tool },
    /// The vortex warp ran; `changed` is false when its window was empty.
    Warped { changed: bool },
    /// A generative effect started; the caller must run it and report back through
    /// [`Session::complete_external`].
    External(ExternalRequest),
}

/// Payload for the generative image service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalRequest {
    pub tool: Tool,
    /// Current backing image, PNG encoded.
    pub image: Vec<u8>,
    pub mime: &'static str,
    pub prompt: String,
}

/// How a generative effect failed. Every variant leaves the session as it was before the call.
#[derive(thiserror::Error, Debug)]
pub enum ExternalFailure {
    /// The service answered without an image.
    #[error(
        "the image service could not generate this effect; try again or adjust the strength"
    )]
    Declined,
    /// The call failed or returned something unusable.
    #[error("an error occurred while applying the effect: {0:#}")]
    Unexpected(anyhow::Error),
    /// Nothing was in flight.
    #[error("no generative effect is in flight")]
    NotPending,
}

impl From<ExternalFailure> for PoppetError {
    fn from(value: ExternalFailure) -> Self {
        PoppetError::external(value.to_string())
    }
}

/// Result of handling a fired frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The handle was cancelled or superseded; nothing happened.
    Stale,
    /// The loop advanced; `rescheduled` tells whether it requested another frame.
    Ticked {
        frame_loop: FrameLoop,
        rescheduled: bool,
    },
}

struct PendingExternal {
    tool: Tool,
    backup: EffectBackup,
}

/// Explicit state of one interactive session: image, effects, tool selection, score and loops.
///
/// Single-threaded. Input handlers and frame callbacks call in one at a time; the only
/// long-running step, the generative call, is split into [`Session::begin_external`] and
/// [`Session::complete_external`] so frames keep flowing while it runs.
pub struct Session<D: FrameDriver = ManualFrameDriver> {
    opts: SessionOpts,
    driver: D,
    scheduler: AnimationScheduler,
    compositor: Compositor,
    rng: ChaCha8Rng,

    canvas: Canvas,
    original: Option<BackingImage>,
    backing: Option<BackingImage>,
    letterbox: Option<Letterbox>,
    face: Option<FaceRegion>,

    store: EffectStore,
    tool: Tool,
    strength: Strength,
    crack_seed: Option<u64>,
    score: Score,
    destructive: bool,
    dragging: bool,
    pending: Option<PendingExternal>,
    feedback: Vec<Feedback>,
}

impl<D: FrameDriver> Session<D> {
    pub fn new(canvas: Canvas, opts: SessionOpts, driver: D) -> Self {
        let rng = match opts.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let score = Score::new(&opts.scoring);
        Self {
            opts,
            driver,
            scheduler: AnimationScheduler::new(),
            compositor: Compositor::new(),
            rng,
            canvas,
            original: None,
            backing: None,
            letterbox: None,
            face: None,
            store: EffectStore::new(),
            tool: Tool::Mallet,
            strength: Strength::default(),
            crack_seed: None,
            score,
            destructive: false,
            dragging: false,
            pending: None,
            feedback: Vec::new(),
        }
    }

    // ---- setup -------------------------------------------------------------------------------

    /// Decode and install a new image, clearing every effect and the face region.
    ///
    /// On a decode error nothing changes.
    #[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn load_image(&mut self, bytes: &[u8]) -> PoppetResult<()> {
        let img = BackingImage::decode(bytes)?;
        let letterbox = Letterbox::fit(self.canvas, img.width(), img.height())?;
        tracing::info!(width = img.width(), height = img.height(), "image loaded");

        self.clear_effects();
        self.face = None;
        self.destructive = false;
        self.original = Some(img.clone());
        self.backing = Some(img);
        self.letterbox = Some(letterbox);
        Ok(())
    }

    /// Set or clear the interactive face region.
    pub fn set_face_region(&mut self, face: Option<FaceRegion>) {
        tracing::debug!(?face, "face region");
        self.face = face;
    }

    /// Ask `detector` for a face region. Detector failures degrade to "whole image interactive".
    pub fn detect_face(&mut self, detector: &dyn FaceDetector) -> PoppetResult<Option<FaceRegion>> {
        let backing = self
            .backing
            .as_ref()
            .ok_or_else(|| PoppetError::setup("no image loaded"))?;
        let png = backing.encode_png()?;
        let face = match detector.detect_face(&png, EXCHANGE_MIME) {
            Ok(Some(raw)) => normalize_face_box(raw),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "face detection failed");
                None
            }
        };
        if face.is_none() {
            tracing::info!("no face region; whole image is interactive");
        }
        self.set_face_region(face);
        Ok(face)
    }

    /// New display size; the letterbox is refitted.
    pub fn resize(&mut self, canvas: Canvas) -> PoppetResult<()> {
        if let Some(img) = &self.backing {
            self.letterbox = Some(Letterbox::fit(canvas, img.width(), img.height())?);
        }
        self.canvas = canvas;
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != Tool::Tornado {
            self.dragging = false;
        }
        self.tool = tool;
    }

    pub fn set_strength(&mut self, strength: Strength) {
        self.strength = strength;
    }

    /// Fix the seed used for new cracks; `None` draws a fresh one per crack.
    pub fn set_crack_seed(&mut self, seed: Option<u64>) {
        self.crack_seed = seed;
    }

    // ---- input -------------------------------------------------------------------------------

    /// Select `tool` and `strength`, then press at `pointer`.
    pub fn register_impact(
        &mut self,
        pointer: Point,
        tool: Tool,
        strength: Strength,
        now: TimeMs,
    ) -> PoppetResult<ImpactOutcome> {
        self.set_tool(tool);
        self.set_strength(strength);
        self.pointer_down(pointer, now)
    }

    /// Press at a canvas-space pointer with the current tool.
    pub fn pointer_down(&mut self, pointer: Point, now: TimeMs) -> PoppetResult<ImpactOutcome> {
        if self.pending.is_some() {
            return Ok(ImpactOutcome::Ignored(IgnoreReason::Busy));
        }
        match self.locate(pointer) {
            Ok(pos) => self.impact_at(pos, now),
            Err(reason) => Ok(ImpactOutcome::Ignored(reason)),
        }
    }

    /// Drag; keeps warping while the tornado is held down. Returns whether pixels changed.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        if !self.dragging || self.tool != Tool::Tornado || self.pending.is_some() {
            return false;
        }
        match self.locate(pointer) {
            Ok(pos) => self.warp_at(pos),
            Err(_) => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Press at a normalized image position with the current tool.
    #[tracing::instrument(skip(self), fields(tool = ?self.tool, strength = self.strength.value()))]
    pub fn impact_at(&mut self, pos: NormPoint, now: TimeMs) -> PoppetResult<ImpactOutcome> {
        if self.pending.is_some() {
            return Ok(ImpactOutcome::Ignored(IgnoreReason::Busy));
        }
        if self.backing.is_none() || self.letterbox.is_none() {
            return Ok(ImpactOutcome::Ignored(IgnoreReason::NoImage));
        }
        let on_image = (0.0..=1.0).contains(&pos.x) && (0.0..=1.0).contains(&pos.y);
        if !on_image {
            return Ok(ImpactOutcome::Ignored(IgnoreReason::OutsideImage));
        }
        if let Some(face) = self.face
            && !face.contains(pos)
        {
            tracing::debug!("impact outside face region");
            return Ok(ImpactOutcome::Ignored(IgnoreReason::OutsideFace));
        }

        match self.tool.kind() {
            ToolKind::Local => self.place_local(pos, now),
            ToolKind::Warp => {
                self.dragging = true;
                let changed = self.warp_at(pos);
                self.scheduler.ensure(&mut self.driver, FrameLoop::Animate);
                Ok(ImpactOutcome::Warped { changed })
            }
            ToolKind::Generative => Ok(ImpactOutcome::External(self.begin_external(self.tool)?)),
        }
    }

    fn locate(&self, pointer: Point) -> Result<NormPoint, IgnoreReason> {
        let lb = self.letterbox.as_ref().ok_or(IgnoreReason::NoImage)?;
        lb.to_normalized(pointer).ok_or(IgnoreReason::OutsideImage)
    }

    fn place_local(&mut self, pos: NormPoint, now: TimeMs) -> PoppetResult<ImpactOutcome> {
        let (Some(backing), Some(lb)) = (&self.backing, &self.letterbox) else {
            return Ok(ImpactOutcome::Ignored(IgnoreReason::NoImage));
        };
        let sampled = backing.sample(lb.to_buffer(pos));
        let id = self.store.next_id();
        let ctx = ImpactContext {
            pos,
            strength: self.strength,
            now,
            face: self.face,
            sampled,
            wander: self.opts.wander,
            crack_seed: self.crack_seed,
            id,
            rng: &mut self.rng,
        };
        let impact = self.tool.build(ctx).ok_or_else(|| {
            PoppetError::validation(format!("{:?} does not place local effects", self.tool))
        })?;

        let frame_loop = match &impact {
            Impact::Dent(_) | Impact::Slap(_) => Some(FrameLoop::Animate),
            Impact::Spider(_) => Some(FrameLoop::Wander),
            Impact::Needle(_) | Impact::Bruises(_) | Impact::Crack(_) => None,
        };
        let slap = matches!(impact, Impact::Slap(_));
        self.store.add_impact(impact);
        if slap {
            self.fire_slap_cycles(now);
        }
        self.score.record_hit(self.opts.scoring.coins_per_hit);
        if let Some(frame_loop) = frame_loop {
            self.scheduler.ensure(&mut self.driver, frame_loop);
        }
        tracing::debug!(hits = self.score.hits, "local impact placed");
        Ok(ImpactOutcome::Local { tool: self.tool })
    }

    fn warp_at(&mut self, pos: NormPoint) -> bool {
        let (Some(backing), Some(lb)) = (&mut self.backing, &self.letterbox) else {
            return false;
        };
        let changed = backing.apply_vortex(lb.to_buffer(pos), self.strength.fraction());
        self.destructive |= changed;
        changed
    }

    /// Emit the swelling and slap sound of every slap cycle entered by `now` and not yet fired.
    fn fire_slap_cycles(&mut self, now: TimeMs) {
        let timing = self.opts.timing;
        let mut entered = Vec::new();
        for slap in self.store.slaps_mut() {
            let due = slap.cycles_entered(now, &timing);
            while slap.fired < due {
                let at = slap.created_at.plus(f64::from(slap.fired) * timing.slap_ms);
                entered.push((slap.pos, slap.strength, at));
                slap.fired += 1;
            }
        }
        for (pos, strength, at) in entered {
            let swelling = slap_swelling(pos, strength, at, &mut self.rng);
            self.store.add_swelling(swelling);
            self.feedback.push(Feedback::SlapSound { strength });
        }
    }

    // ---- frame loop --------------------------------------------------------------------------

    /// Advance the loop a fired frame belongs to, re-arming it only while work remains.
    pub fn on_frame(&mut self, handle: FrameHandle, now: TimeMs) -> FrameOutcome {
        let Some(frame_loop) = self.scheduler.fired(handle) else {
            tracing::trace!(?handle, "stale frame");
            return FrameOutcome::Stale;
        };
        let timing = self.opts.timing;
        let keep_running = match frame_loop {
            FrameLoop::Animate => {
                self.fire_slap_cycles(now);
                self.store.prune_expired(now, &timing);
                self.dragging || self.store.any_animating(now, &timing)
            }
            FrameLoop::Wander => {
                self.store.prune_expired(now, &timing);
                let tuning = self.opts.wander;
                for spider in self.store.spiders_mut() {
                    step_spider(spider, self.face, &tuning, &mut self.rng);
                }
                self.store.has_spiders()
            }
        };
        let rescheduled = self
            .scheduler
            .continue_or_stop(&mut self.driver, frame_loop, keep_running);
        FrameOutcome::Ticked {
            frame_loop,
            rescheduled,
        }
    }

    /// [`Session::on_frame`] followed by a redraw; `None` for stale handles.
    pub fn tick(&mut self, handle: FrameHandle, now: TimeMs) -> PoppetResult<Option<FrameRGBA>> {
        match self.on_frame(handle, now) {
            FrameOutcome::Stale => Ok(None),
            FrameOutcome::Ticked { .. } => self.render(now).map(Some),
        }
    }

    /// Compose the canvas at `now`.
    ///
    /// Until an image is loaded this fails with [`PoppetError::Setup`], the session's fatal setup
    /// path: there is no surface to draw, as opposed to a frame that failed to render.
    pub fn render(&mut self, now: TimeMs) -> PoppetResult<FrameRGBA> {
        let (Some(backing), Some(lb)) = (&self.backing, &self.letterbox) else {
            return Err(PoppetError::setup("no image loaded"));
        };
        self.compositor
            .render(backing, &self.store, lb, now, &self.opts.timing)
    }

    // ---- generative effects ------------------------------------------------------------------

    /// Start a generative effect: local effects are hidden and the session turns busy.
    pub fn begin_external(&mut self, tool: Tool) -> PoppetResult<ExternalRequest> {
        if self.pending.is_some() {
            return Err(PoppetError::validation("a generative effect is already in flight"));
        }
        let prompt = prompt_for(tool, self.strength)
            .ok_or_else(|| PoppetError::validation(format!("{tool:?} is not a generative tool")))?;
        let backing = self
            .backing
            .as_ref()
            .ok_or_else(|| PoppetError::setup("no image loaded"))?;
        let image = backing.encode_png()?;

        let backup = self.store.take_backup();
        self.dragging = false;
        self.pending = Some(PendingExternal { tool, backup });
        tracing::info!(?tool, strength = self.strength.value(), "generative effect started");
        Ok(ExternalRequest {
            tool,
            image,
            mime: EXCHANGE_MIME,
            prompt,
        })
    }

    /// Finish the in-flight generative effect with the service's answer.
    ///
    /// A usable image replaces the backing image and drops the hidden effects. Anything else
    /// restores the hidden effects and leaves the image untouched.
    pub fn complete_external(
        &mut self,
        result: anyhow::Result<Option<Vec<u8>>>,
    ) -> Result<(), ExternalFailure> {
        let Some(pending) = self.pending.take() else {
            return Err(ExternalFailure::NotPending);
        };
        let prepared = match result {
            Ok(Some(bytes)) => self.prepare_replacement(&bytes),
            Ok(None) => Err(ExternalFailure::Declined),
            Err(err) => Err(ExternalFailure::Unexpected(err)),
        };

        match prepared {
            Ok((img, letterbox)) => {
                if let Some(backing) = &mut self.backing {
                    backing.replace_with(img);
                }
                self.letterbox = Some(letterbox);
                self.destructive = true;
                self.score.record_hit(self.opts.scoring.coins_per_external);
                tracing::info!(tool = ?pending.tool, "generative effect committed");
                Ok(())
            }
            Err(failure) => {
                self.store.restore(pending.backup);
                self.rearm_loops();
                tracing::warn!(tool = ?pending.tool, %failure, "generative effect rolled back");
                Err(failure)
            }
        }
    }

    fn prepare_replacement(
        &self,
        bytes: &[u8],
    ) -> Result<(BackingImage, Letterbox), ExternalFailure> {
        let img = BackingImage::decode(bytes)
            .map_err(|e| ExternalFailure::Unexpected(anyhow::Error::new(e)))?;
        let letterbox = Letterbox::fit(self.canvas, img.width(), img.height())
            .map_err(|e| ExternalFailure::Unexpected(anyhow::Error::new(e)))?;
        Ok((img, letterbox))
    }

    /// Run `tool` through `service` synchronously.
    pub fn run_external(
        &mut self,
        tool: Tool,
        service: &dyn GenerativeImageService,
    ) -> PoppetResult<()> {
        let req = self.begin_external(tool)?;
        let result = service.apply_effect(&req.image, req.mime, &req.prompt);
        self.complete_external(result).map_err(PoppetError::from)
    }

    fn rearm_loops(&mut self) {
        let s = &self.store;
        if !s.dents().is_empty() || !s.swellings().is_empty() || !s.slaps().is_empty() {
            self.scheduler.ensure(&mut self.driver, FrameLoop::Animate);
        }
        if s.has_spiders() {
            self.scheduler.ensure(&mut self.driver, FrameLoop::Wander);
        }
    }

    // ---- resets ------------------------------------------------------------------------------

    fn clear_effects(&mut self) {
        self.scheduler.cancel_all(&mut self.driver);
        self.store.clear_all();
        self.score.hits = 0;
        self.dragging = false;
        self.pending = None;
        self.feedback.clear();
    }

    /// Put the pristine uploaded pixels back into the backing buffer; `false` with no image.
    fn restore_original(&mut self) -> PoppetResult<bool> {
        let Some(original) = self.original.clone() else {
            return Ok(false);
        };
        let letterbox = Letterbox::fit(self.canvas, original.width(), original.height())?;
        match &mut self.backing {
            Some(backing) => backing.replace_with(original),
            None => self.backing = Some(original),
        }
        self.letterbox = Some(letterbox);
        self.destructive = false;
        Ok(true)
    }

    /// Clear every effect and the hit counter; coins are kept.
    ///
    /// Warps and generative results are undone as well: the backing buffer goes back to the
    /// uploaded image. An in-flight generative effect is abandoned and its late answer is
    /// reported as not pending.
    pub fn reset_effects(&mut self) -> PoppetResult<()> {
        self.clear_effects();
        self.restore_original()?;
        tracing::info!("effects reset");
        Ok(())
    }

    /// Restore the pristine uploaded image and clear everything, coins included.
    pub fn reset_image(&mut self) -> PoppetResult<()> {
        if !self.restore_original()? {
            return Err(PoppetError::setup("no image loaded"));
        }
        self.clear_effects();
        self.score = Score::new(&self.opts.scoring);
        tracing::info!("image reset");
        Ok(())
    }

    // ---- queries -----------------------------------------------------------------------------

    /// Whether a press at `pointer` would land on an interactive area.
    pub fn hover(&self, pointer: Point) -> bool {
        if self.pending.is_some() {
            return false;
        }
        match self.locate(pointer) {
            Ok(pos) => self.face.is_none_or(|f| f.contains(pos)),
            Err(_) => false,
        }
    }

    pub fn counts(&self) -> EffectCounts {
        self.store.counts()
    }

    pub fn store(&self) -> &EffectStore {
        &self.store
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn has_destructive_changes(&self) -> bool {
        self.destructive
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    pub fn face_region(&self) -> Option<FaceRegion> {
        self.face
    }

    pub fn backing(&self) -> Option<&BackingImage> {
        self.backing.as_ref()
    }

    pub fn letterbox(&self) -> Option<&Letterbox> {
        self.letterbox.as_ref()
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Take the feedback events produced since the last drain.
    pub fn drain_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback)
    }

    /// Forward pending feedback events to `sink`.
    pub fn flush_feedback(&mut self, sink: &mut dyn FeedbackSink) {
        for event in self.feedback.drain(..) {
            sink.emit(event);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/punch_session.rs"]
mod tests;
