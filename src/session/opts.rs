use crate::fx::wander::WanderTuning;
use crate::scene::timing::EffectTiming;
use crate::session::score::ScoringRules;

/// Session tunables.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Effect lifetimes and animation windows.
    pub timing: EffectTiming,
    /// Spider motion tuning.
    pub wander: WanderTuning,
    /// Coin and hit rewards.
    pub scoring: ScoringRules,
    /// Seed for every random draw the session makes. `None` seeds from OS entropy.
    pub rng_seed: Option<u64>,
}

impl SessionOpts {
    /// Defaults with environment overrides applied.
    ///
    /// - `POPPET_SEED`: `u64` seed for the session generator
    /// - `POPPET_SPIDER_TTL_MS`: positive spider time-to-live in milliseconds
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(seed) = lookup("POPPET_SEED").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.rng_seed = Some(seed);
        }
        if let Some(ttl) = lookup("POPPET_SPIDER_TTL_MS")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|&ms| ms.is_finite() && ms > 0.0)
        {
            self.timing.spider_ttl_ms = ttl;
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
