use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::state::DEFAULT_STARTING_CAPITAL;

/// Season length in weeks.
pub const MAX_WEEKS: u32 = 24;

/// Tunable game parameters. Every field has a default, so partial YAML works.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Weeks in a season; the game ends once `week > max_weeks`.
    pub max_weeks: u32,
    /// Pause before the next week is revealed, in milliseconds.
    pub progress_delay_ms: u64,
    /// Seed for the deterministic RNG.
    pub rng_seed: u64,
    /// Capital before the location penalty is taken off.
    pub starting_capital: i64,
    /// Fixed cost charged every week.
    pub weekly_upkeep: i64,
    /// Environment points lost every week.
    pub environment_decay: i64,
    /// Interest charged on debt each period (0.015 = 1.5%).
    pub interest_rate: Decimal,
    /// Interest falls due on weeks divisible by this.
    pub interest_period_weeks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_weeks: MAX_WEEKS,
            progress_delay_ms: 1500,
            rng_seed: 42,
            starting_capital: DEFAULT_STARTING_CAPITAL,
            weekly_upkeep: 500,
            environment_decay: 1,
            interest_rate: Decimal::new(15, 3),
            interest_period_weeks: 4,
        }
    }
}

impl GameConfig {
    pub fn progress_delay(&self) -> Duration {
        Duration::from_millis(self.progress_delay_ms)
    }

    /// Same config with the turn pause removed; handy for tests and batch runs.
    pub fn without_delay(mut self) -> Self {
        self.progress_delay_ms = 0;
        self
    }
}
