//! Reference data: locations, scripted decisions, random events and headline
//! rules. Immutable once loaded and shared by reference.

use serde::{Deserialize, Serialize};

use crate::consequence::{Consequence, Metric};
use crate::state::FarmState;

/// Static economic and ecological profile of a place to farm.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Lookup key, e.g. "Central Asia - Steppe".
    pub key: String,
    pub flag: String,
    /// Display name, e.g. "Kazakh Steppe".
    pub name: String,
    pub soil: String,
    pub climate: String,
    /// "Developed" or "Developing".
    pub development_status: String,
    /// Loan balance carried into the season.
    pub starting_debt: i64,
    /// Subtracted from the starting capital.
    pub initial_money_penalty: i64,
    /// Initial pest risk; may be negative.
    pub base_pest_risk: i64,
    pub initial_resilience: i64,
    pub initial_infrastructure: i64,
    #[serde(default)]
    pub common_crops: Vec<String>,
}

/// One option of a scripted decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub consequence: Consequence,
}

/// A week-specific multi-choice prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub week: u32,
    pub category: String,
    pub prompt: String,
    pub choices: Vec<Choice>,
}

/// Pure predicate over a set of metric readings.
///
/// Random events read the farm state; headline rules read the deltas of the
/// consequence that was just committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "camelCase")]
pub enum Condition {
    Always,
    Above { metric: Metric, value: i64 },
    Below { metric: Metric, value: i64 },
}

impl Condition {
    fn test(&self, read: impl Fn(Metric) -> i64) -> bool {
        match *self {
            Condition::Always => true,
            Condition::Above { metric, value } => read(metric) > value,
            Condition::Below { metric, value } => read(metric) < value,
        }
    }

    pub fn holds_for_state(&self, state: &FarmState) -> bool {
        self.test(|m| state.metric(m))
    }

    pub fn holds_for_consequence(&self, c: &Consequence) -> bool {
        self.test(|m| c.delta(m))
    }
}

/// Condition-gated, probabilistic consequence rolled on monitoring weeks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub id: String,
    pub condition: Condition,
    /// Probability in `[0, 1]` that the event fires when its condition holds.
    pub risk: f64,
    pub consequence: Consequence,
}

/// Reactive "breaking news" penalty keyed off a just-committed consequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineRule {
    pub id: String,
    pub condition: Condition,
    pub headline: String,
    pub penalty: Consequence,
}

/// Flavour line shown while a turn is in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMessage {
    pub emoji: String,
    pub text: String,
}

/// All reference tables for one scenario. Order is significant: random events
/// and headlines are scanned first-match-wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub locations: Vec<Location>,
    pub decisions: Vec<Decision>,
    pub random_events: Vec<RandomEvent>,
    pub headlines: Vec<HeadlineRule>,
    pub progress_messages: Vec<ProgressMessage>,
}

impl Catalog {
    pub fn location(&self, key: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.key == key)
    }

    /// The scripted decision for `week`, or `None` on a monitoring week.
    pub fn decision_for_week(&self, week: u32) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.week == week)
    }

    pub fn has_decision(&self, week: u32) -> bool {
        self.decision_for_week(week).is_some()
    }
}
