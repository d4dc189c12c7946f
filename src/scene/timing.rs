/// Lifetimes and animation windows of the time-based effects, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EffectTiming {
    /// Dent ripple ring duration.
    pub ripple_ms: f64,
    /// Swelling fade-in duration.
    pub swell_fade_in_ms: f64,
    /// Swelling full-intensity hold after the fade-in.
    pub swell_hold_ms: f64,
    /// Swelling fade-out duration after the hold.
    pub swell_fade_out_ms: f64,
    /// Duration of one slap cycle.
    pub slap_ms: f64,
    /// Time-to-live of a wandering spider.
    pub spider_ttl_ms: f64,
}

impl Default for EffectTiming {
    fn default() -> Self {
        Self {
            ripple_ms: 500.0,
            swell_fade_in_ms: 500.0,
            swell_hold_ms: 3000.0,
            swell_fade_out_ms: 1000.0,
            slap_ms: 400.0,
            spider_ttl_ms: 60_000.0,
        }
    }
}

impl EffectTiming {
    /// Total swelling lifetime; the swelling is removed once its age reaches this.
    pub fn swell_lifetime_ms(&self) -> f64 {
        self.swell_fade_in_ms + self.swell_hold_ms + self.swell_fade_out_ms
    }
}
