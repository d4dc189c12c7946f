use crate::foundation::core::{Canvas, NormPoint, TimeMs};
use crate::foundation::error::{PoppetError, PoppetResult};
use crate::render::compositor::FrameRGBA;
use crate::scene::tools::{Strength, Tool, ToolKind};
use crate::schedule::driver::ManualFrameDriver;
use crate::services::face::{RawFaceBox, normalize_face_box};
use crate::session::opts::SessionOpts;
use crate::session::punch_session::Session;

/// Simulated display refresh used when replaying a script.
pub const REPLAY_FRAME_MS: f64 = 1000.0 / 60.0;

/// One scripted press, in normalized image coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptedImpact {
    pub tool: Tool,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub strength: Strength,
    #[serde(default)]
    pub at_ms: f64,
}

/// Offline description of a session: canvas, optional face box and the impacts to replay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImpactScript {
    pub canvas: Canvas,
    /// Face box as a detector would report it (fractions or percentages).
    #[serde(default)]
    pub face: Option<RawFaceBox>,
    #[serde(default)]
    pub crack_seed: Option<u64>,
    #[serde(default)]
    pub opts: SessionOpts,
    pub impacts: Vec<ScriptedImpact>,
    /// Render time; defaults to the time of the last impact.
    #[serde(default)]
    pub render_at_ms: Option<f64>,
}

impl ImpactScript {
    /// Replay the script over `image` and render the final frame.
    ///
    /// Frame callbacks fire every [`REPLAY_FRAME_MS`] between events. Generative tools have no
    /// service to call here and are skipped.
    #[tracing::instrument(skip_all, fields(impacts = self.impacts.len()))]
    pub fn replay(&self, image: &[u8]) -> PoppetResult<FrameRGBA> {
        let canvas = Canvas::new(self.canvas.width, self.canvas.height)?;
        let mut session = Session::new(canvas, self.opts.clone(), ManualFrameDriver::new());
        session.load_image(image)?;
        session.set_face_region(self.face.and_then(normalize_face_box));
        session.set_crack_seed(self.crack_seed);

        let mut impacts: Vec<&ScriptedImpact> = self.impacts.iter().collect();
        impacts.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

        let mut now = 0.0;
        for impact in impacts {
            if !impact.at_ms.is_finite() {
                return Err(PoppetError::validation("impact time must be finite"));
            }
            now = advance(&mut session, now, impact.at_ms);
            if impact.tool.kind() == ToolKind::Generative {
                tracing::warn!(tool = ?impact.tool, "generative tools are not replayed");
                continue;
            }
            session.set_tool(impact.tool);
            session.set_strength(impact.strength);
            let outcome = session.impact_at(NormPoint::new(impact.x, impact.y), TimeMs(now))?;
            tracing::debug!(?outcome, at_ms = now, "replayed impact");
            session.pointer_up();
        }

        let end = self.render_at_ms.unwrap_or(now).max(now);
        let now = advance(&mut session, now, end);
        session.render(TimeMs(now))
    }
}

/// Fire pending frames on a fixed cadence from `from` up to `to`; returns `to`.
fn advance(session: &mut Session, from: f64, to: f64) -> f64 {
    let mut t = from;
    while t + REPLAY_FRAME_MS <= to && !session.driver().is_idle() {
        t += REPLAY_FRAME_MS;
        for (handle, _) in session.driver_mut().take_pending() {
            session.on_frame(handle, TimeMs(t));
        }
    }
    to.max(from)
}

#[cfg(test)]
#[path = "../../tests/unit/session/script.rs"]
mod tests;
