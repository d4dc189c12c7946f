/// Coin and hit rewards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub starting_coins: u32,
    /// Reward for each local impact.
    pub coins_per_hit: u32,
    /// Reward for each committed generative effect.
    pub coins_per_external: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            starting_coins: 480,
            coins_per_hit: 5,
            coins_per_external: 10,
        }
    }
}

/// Hit counter and coin balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Score {
    pub hits: u32,
    pub coins: u32,
}

impl Score {
    pub fn new(rules: &ScoringRules) -> Self {
        Self {
            hits: 0,
            coins: rules.starting_coins,
        }
    }

    pub(crate) fn record_hit(&mut self, coins: u32) {
        self.hits = self.hits.saturating_add(1);
        self.coins = self.coins.saturating_add(coins);
    }
}
