//! Interfaces of the collaborators the session talks to but does not implement.
//!
//! Implementations live in the application shell (network clients, audio output). Failures are
//! reported as `anyhow::Error`; the session decides how each one degrades.

use crate::scene::tools::Strength;
use crate::services::face::RawFaceBox;

/// Locates the primary face in an encoded image.
pub trait FaceDetector {
    /// `Ok(None)` means no face was found; the whole image stays interactive.
    fn detect_face(&self, image: &[u8], mime: &str) -> anyhow::Result<Option<RawFaceBox>>;
}

/// Remote image-to-image transformation driven by a text prompt.
pub trait GenerativeImageService {
    /// Returns the transformed encoded image, or `Ok(None)` when the service declined.
    fn apply_effect(&self, image: &[u8], mime: &str, prompt: &str)
    -> anyhow::Result<Option<Vec<u8>>>;
}

/// Fire-and-forget user feedback produced by effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    /// One slap landed; louder for higher strength.
    SlapSound { strength: Strength },
}

/// Consumer of [`Feedback`] events (for example a sound synthesizer).
pub trait FeedbackSink {
    fn emit(&mut self, feedback: Feedback);
}

impl FeedbackSink for Vec<Feedback> {
    fn emit(&mut self, feedback: Feedback) {
        self.push(feedback);
    }
}
