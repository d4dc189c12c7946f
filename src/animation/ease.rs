/// Easing curves used by the time-based effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in, used for retract motion.
    InQuad,
    /// Cubic ease-out (`1-(1-t)^3`), used for ripples, fade-ins and approach motion.
    OutCubic,
}

impl Ease {
    /// Apply this easing function to normalized progress `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Normalized progress of `age` through a window of `duration` milliseconds, clamped to `[0, 1]`.
///
/// Non-positive durations are treated as already complete.
pub fn progress(age_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (age_ms / duration_ms).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
