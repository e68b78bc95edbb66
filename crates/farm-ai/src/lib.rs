#![deny(warnings)]

//! Choice strategies for headless play.
//!
//! A strategy scores every option of a decision with [`utility`] and picks the
//! best one; ties go to the earliest option.

use farm_core::{Consequence, Decision};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Weights applied to a consequence's deltas. Risk-type metrics are
/// subtracted, so a positive weight always means "less of the bad thing".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    /// Per thousand of money.
    pub money: f64,
    pub debt: f64,
    pub environment: f64,
    pub health_risk: f64,
    pub stress: f64,
    pub pest_risk: f64,
    pub infrastructure: f64,
    pub resilience: f64,
}

/// Utility of a consequence under `w`: higher is better.
pub fn utility(c: &Consequence, w: &Weights) -> f64 {
    (c.money as f64 / 1000.0) * w.money - (c.debt as f64 / 1000.0) * w.debt
        + c.environment as f64 * w.environment
        - c.health_risk as f64 * w.health_risk
        - c.hidden_stress as f64 * w.stress
        - c.hidden_pest_risk as f64 * w.pest_risk
        + c.infrastructure_level as f64 * w.infrastructure
        + c.climate_resilience as f64 * w.resilience
}

/// How an autoplayer picks among a decision's options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Always the first option.
    First,
    /// Keep as much cash as possible.
    Cash,
    /// Protect the land and the consumer.
    Green,
    /// Weigh everything, roughly the way the final score does.
    #[default]
    Balanced,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::First,
        Strategy::Cash,
        Strategy::Green,
        Strategy::Balanced,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|st| st.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::First => "first",
            Strategy::Cash => "cash",
            Strategy::Green => "green",
            Strategy::Balanced => "balanced",
        }
    }

    pub fn weights(self) -> Option<Weights> {
        match self {
            Strategy::First => None,
            Strategy::Cash => Some(Weights {
                money: 1.0,
                debt: 1.0,
                environment: 0.0,
                health_risk: 0.0,
                stress: 0.0,
                pest_risk: 0.0,
                infrastructure: 0.0,
                resilience: 0.0,
            }),
            Strategy::Green => Some(Weights {
                money: 0.1,
                debt: 0.1,
                environment: 2.0,
                health_risk: 1.5,
                stress: 0.2,
                pest_risk: 1.0,
                infrastructure: 0.2,
                resilience: 1.0,
            }),
            // 3 points per thousand of profit, 1.5 per environment point,
            // 0.15 per pest point through the yield penalty.
            Strategy::Balanced => Some(Weights {
                money: 3.0,
                debt: 3.15,
                environment: 1.5,
                health_risk: 0.5,
                stress: 1.0,
                pest_risk: 0.45,
                infrastructure: 1.0,
                resilience: 1.6,
            }),
        }
    }

    /// Index of the option to take. `0` for a decision without options.
    pub fn choose(self, decision: &Decision) -> usize {
        let Some(w) = self.weights() else {
            return 0;
        };
        let mut best = 0;
        let mut best_u = f64::NEG_INFINITY;
        for (i, choice) in decision.choices.iter().enumerate() {
            let u = utility(&choice.consequence, &w);
            if u > best_u {
                best = i;
                best_u = u;
            }
        }
        debug!(strategy = self.name(), week = decision.week, choice = best, "option picked");
        best
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
