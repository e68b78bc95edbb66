//! Preview, browse and accept the scripted decision of the current week.

use farm_core::{ApplyScope, Catalog, Consequence, Decision, FarmState, PendingDecision};
use tracing::{debug, info};

use crate::view::Preview;
use crate::GameError;

/// The choice that was just applied, handed on to the turn for headline checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommittedChoice {
    pub week: u32,
    pub text: String,
    pub consequence: Consequence,
}

impl CommittedChoice {
    pub fn message(&self) -> String {
        format!("Decision processed: {}", self.text)
    }
}

fn current_decision<'a>(state: &FarmState, catalog: &'a Catalog) -> Result<&'a Decision, GameError> {
    if !state.is_playing() {
        return Err(GameError::SeasonNotActive);
    }
    catalog
        .decision_for_week(state.week)
        .ok_or(GameError::NoDecision(state.week))
}

/// Tentatively pick `choice_index` of the decision scheduled for `week`.
pub fn select_option(
    state: &mut FarmState,
    catalog: &Catalog,
    week: u32,
    choice_index: usize,
) -> Result<Preview, GameError> {
    if !state.is_playing() {
        return Err(GameError::SeasonNotActive);
    }
    if week != state.week {
        return Err(GameError::NotCurrentWeek {
            requested: week,
            current: state.week,
        });
    }
    let decision = current_decision(state, catalog)?;
    let count = decision.choices.len();
    if choice_index >= count {
        return Err(GameError::ChoiceOutOfRange {
            index: choice_index,
            count,
        });
    }
    state.pending_decision = Some(PendingDecision { week, choice_index });
    state.current_decision_index = choice_index;
    debug!(week, choice_index, "previewing choice");
    Ok(Preview::of(decision, choice_index))
}

/// Move the browse cursor to the next option, wrapping around.
///
/// The pending selection is left alone; it changes only on the next
/// [`select_option`].
pub fn cycle_option(state: &mut FarmState, catalog: &Catalog) -> Result<usize, GameError> {
    let decision = current_decision(state, catalog)?;
    if state.pending_decision.is_none() {
        return Err(GameError::NotPreviewing);
    }
    let count = decision.choices.len();
    state.current_decision_index = (state.current_decision_index + 1) % count;
    Ok(state.current_decision_index)
}

/// Apply the pending choice and clear the preview bookkeeping.
///
/// The caller is expected to advance the turn with the returned consequence.
pub fn commit(state: &mut FarmState, catalog: &Catalog) -> Result<CommittedChoice, GameError> {
    let decision = current_decision(state, catalog)?;
    let pending = state.pending_decision.ok_or(GameError::NotPreviewing)?;
    let choice = decision
        .choices
        .get(pending.choice_index)
        .filter(|_| pending.week == decision.week)
        .ok_or(GameError::NotPreviewing)?;

    state.apply(&choice.consequence, ApplyScope::Decision);
    state.pending_decision = None;
    state.current_decision_index = 0;
    info!(
        week = state.week,
        choice = pending.choice_index,
        money = state.money,
        "decision committed"
    );
    Ok(CommittedChoice {
        week: state.week,
        text: choice.text.clone(),
        consequence: choice.consequence.clone(),
    })
}
