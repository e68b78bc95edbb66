//! Weekly turn resolution.
//!
//! A turn runs in two phases. [`begin_turn`] only captures what the reveal
//! needs; [`finish_turn`] does every state change. Whatever sits between the
//! two (a timer, a keypress) is up to the caller.

use farm_core::{
    clamp_metric, format_thousands, ApplyScope, Catalog, Consequence, FarmState, GameConfig,
    ProgressMessage, Status,
};
use farm_econ::{debt_interest, interest_due, ScoreReport};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Range of the weekly pest drift when no random event fires.
pub const PEST_DRIFT: i64 = 5;

/// An announced turn that has not been resolved yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnTicket {
    /// Week that will be revealed.
    pub week: u32,
    pub progress: Option<ProgressMessage>,
    /// Consequence committed just before this turn, if any.
    pub applied: Option<Consequence>,
}

/// Something that happened while a turn resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TurnEvent {
    WeeklyCosts { upkeep: i64, environment_decay: i64 },
    DebtInterest { amount: i64 },
    RandomEvent { id: String, narrative: String, money: i64 },
    PestDrift { delta: i64 },
    Headline { id: String, headline: String, penalty: i64 },
    SeasonEnded,
}

impl TurnEvent {
    /// Player-facing notice, if the event warrants one.
    pub fn message(&self) -> Option<String> {
        match self {
            TurnEvent::DebtInterest { amount } => Some(format!(
                "🚨 DEBT ALERT: -${} deducted for loan interest!",
                format_thousands(*amount)
            )),
            TurnEvent::RandomEvent { narrative, .. } => Some(format!("⚠️ EVENT: {narrative}")),
            TurnEvent::Headline {
                headline, penalty, ..
            } => Some(format!(
                "BREAKING LOCAL NEWS: {headline} Immediate Penalty: ${} and Reputation Hit.",
                format_thousands(penalty.abs())
            )),
            TurnEvent::SeasonEnded => Some("The season is over.".to_string()),
            TurnEvent::WeeklyCosts { .. } | TurnEvent::PestDrift { .. } => None,
        }
    }
}

/// Where play goes after a turn.
#[derive(Clone, Debug, PartialEq)]
pub enum NextStep {
    /// A scripted decision waits for a choice.
    Decision { week: u32 },
    /// A monitoring week; advance again to continue.
    Monitoring { week: u32 },
    SeasonOver(Box<ScoreReport>),
}

/// Outcome of [`finish_turn`].
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub week: u32,
    pub events: Vec<TurnEvent>,
    pub next: NextStep,
}

impl TurnReport {
    pub fn messages(&self) -> impl Iterator<Item = String> + '_ {
        self.events.iter().filter_map(TurnEvent::message)
    }

    pub fn score(&self) -> Option<&ScoreReport> {
        match &self.next {
            NextStep::SeasonOver(r) => Some(r),
            _ => None,
        }
    }
}

/// Announce the next turn. Does not touch the state.
pub fn begin_turn<R: Rng>(
    state: &FarmState,
    catalog: &Catalog,
    applied: Option<Consequence>,
    rng: &mut R,
) -> TurnTicket {
    TurnTicket {
        week: state.week + 1,
        progress: catalog.progress_messages.choose(rng).cloned(),
        applied,
    }
}

/// Resolve an announced turn: advance the week, charge costs and interest,
/// roll events, check headlines and end the season when it runs out.
pub fn finish_turn<R: Rng>(
    state: &mut FarmState,
    catalog: &Catalog,
    config: &GameConfig,
    rng: &mut R,
    ticket: TurnTicket,
) -> TurnReport {
    let mut events = Vec::new();

    state.week += 1;
    let week = state.week;
    debug_assert_eq!(week, ticket.week);

    state.money -= config.weekly_upkeep;
    state.environment = (state.environment - config.environment_decay).max(0);
    events.push(TurnEvent::WeeklyCosts {
        upkeep: config.weekly_upkeep,
        environment_decay: config.environment_decay,
    });

    if interest_due(week, state.debt, config.interest_period_weeks) {
        match debt_interest(state.debt, config.interest_rate) {
            Ok(amount) => {
                state.money -= amount;
                info!(week, debt = state.debt, amount, "debt interest charged");
                events.push(TurnEvent::DebtInterest { amount });
            }
            Err(err) => warn!(week, %err, "skipping debt interest"),
        }
    }

    if !catalog.has_decision(week) && week > 1 {
        events.push(roll_random_event(state, catalog, rng));
    }

    if let Some(applied) = ticket.applied.as_ref() {
        if let Some(rule) = catalog
            .headlines
            .iter()
            .find(|h| h.condition.holds_for_consequence(applied))
        {
            state.apply(&rule.penalty, ApplyScope::Headline);
            info!(week, id = %rule.id, "headline fired");
            events.push(TurnEvent::Headline {
                id: rule.id.clone(),
                headline: rule.headline.clone(),
                penalty: rule.penalty.money,
            });
        }
    }
    state.clamp_bounded();

    let next = if week > config.max_weeks {
        state.status = Status::End;
        events.push(TurnEvent::SeasonEnded);
        NextStep::SeasonOver(Box::new(farm_econ::score(state)))
    } else if catalog.has_decision(week) {
        NextStep::Decision { week }
    } else {
        NextStep::Monitoring { week }
    };
    debug!(week, money = state.money, env = state.environment, "turn resolved");

    TurnReport { week, events, next }
}

/// First-match scan of the event deck; falls back to pest drift.
///
/// The probability draw is only taken for events whose condition holds.
fn roll_random_event<R: Rng>(
    state: &mut FarmState,
    catalog: &Catalog,
    rng: &mut R,
) -> TurnEvent {
    for event in &catalog.random_events {
        if event.condition.holds_for_state(state) && rng.gen::<f64>() < event.risk {
            state.apply(&event.consequence, ApplyScope::RandomEvent);
            info!(week = state.week, id = %event.id, "random event");
            return TurnEvent::RandomEvent {
                id: event.id.clone(),
                narrative: event.consequence.narrative.clone(),
                money: event.consequence.money,
            };
        }
    }
    let delta = rng.gen_range(-PEST_DRIFT..=PEST_DRIFT);
    state.hidden_pest_risk = clamp_metric(state.hidden_pest_risk + delta);
    debug!(week = state.week, delta, pest = state.hidden_pest_risk, "pest drift");
    TurnEvent::PestDrift { delta }
}
