#![deny(warnings)]

//! Core domain model for the farm season simulation.
//!
//! Farm state, consequences, reference data and tunables live here, together
//! with validation helpers that check the state and catalog invariants.

pub mod catalog;
pub mod config;
pub mod consequence;
pub mod data;
pub mod state;

pub use catalog::{
    Catalog, Choice, Condition, Decision, HeadlineRule, Location, ProgressMessage, RandomEvent,
};
pub use config::{GameConfig, MAX_WEEKS};
pub use consequence::{format_thousands, ApplyScope, Consequence, Metric};
pub use state::{
    clamp_metric, BusinessStructure, FarmState, FarmType, PendingDecision, Status, UrbanStatus,
    DEFAULT_STARTING_CAPITAL, METRIC_MAX, METRIC_MIN, SETUP_PHASES,
};

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// Validation errors for state and catalog invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A bounded metric escaped `[0, 100]`.
    #[error("{metric} = {value} is outside [0, 100]")]
    MetricOutOfRange { metric: Metric, value: i64 },
    #[error("debt must be non-negative, got {0}")]
    NegativeDebt(i64),
    #[error("setup phase {0} is out of range [0, 4]")]
    SetupPhaseOutOfRange(u8),
    /// `setup` status requires an unfinished setup phase.
    #[error("status is setup but setup phase is {0}")]
    SetupStatusMismatch(u8),
    #[error("season is active but setup selections are incomplete")]
    IncompleteSetup,
    #[error("pending decision (week {week}, choice {choice_index}) does not exist for the current week")]
    DanglingPendingDecision { week: u32, choice_index: usize },
    #[error("unknown location: {0}")]
    UnknownLocation(String),
    #[error("duplicate location key: {0}")]
    DuplicateLocation(String),
    #[error("more than one decision scripted for week {0}")]
    DuplicateDecisionWeek(u32),
    #[error("decision for week {0} has no choices")]
    EmptyDecision(u32),
    /// Probability must lie in `[0, 1]`.
    #[error("random event {id} has invalid risk {risk}")]
    InvalidRisk { id: String, risk: f64 },
}

/// Validate the farm state against the catalog it is played with.
pub fn validate_state(state: &FarmState, catalog: &Catalog) -> Result<(), ValidationError> {
    for metric in Metric::BOUNDED {
        let value = state.metric(metric);
        if !(METRIC_MIN..=METRIC_MAX).contains(&value) {
            return Err(ValidationError::MetricOutOfRange { metric, value });
        }
    }
    if state.debt < 0 {
        return Err(ValidationError::NegativeDebt(state.debt));
    }
    if state.setup_phase > SETUP_PHASES {
        return Err(ValidationError::SetupPhaseOutOfRange(state.setup_phase));
    }
    match state.status {
        Status::Setup if state.setup_phase >= SETUP_PHASES => {
            return Err(ValidationError::SetupStatusMismatch(state.setup_phase));
        }
        Status::Playing | Status::End if !state.is_setup_complete() => {
            return Err(ValidationError::IncompleteSetup);
        }
        _ => {}
    }
    if let Some(key) = &state.location {
        if catalog.location(key).is_none() {
            return Err(ValidationError::UnknownLocation(key.clone()));
        }
    }
    if let Some(p) = state.pending_decision {
        let in_range = p.week == state.week
            && catalog
                .decision_for_week(p.week)
                .is_some_and(|d| p.choice_index < d.choices.len());
        if !in_range {
            return Err(ValidationError::DanglingPendingDecision {
                week: p.week,
                choice_index: p.choice_index,
            });
        }
    }
    Ok(())
}

/// Validate the reference tables: unique keys, one decision per week,
/// non-empty choice lists and probabilities in `[0, 1]`.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), ValidationError> {
    let mut keys = BTreeSet::new();
    for l in &catalog.locations {
        if !keys.insert(l.key.as_str()) {
            return Err(ValidationError::DuplicateLocation(l.key.clone()));
        }
    }
    let mut weeks = BTreeSet::new();
    for d in &catalog.decisions {
        if !weeks.insert(d.week) {
            return Err(ValidationError::DuplicateDecisionWeek(d.week));
        }
        if d.choices.is_empty() {
            return Err(ValidationError::EmptyDecision(d.week));
        }
    }
    for e in &catalog.random_events {
        if !(0.0..=1.0).contains(&e.risk) {
            return Err(ValidationError::InvalidRisk {
                id: e.id.clone(),
                risk: e.risk,
            });
        }
    }
    debug!(
        locations = catalog.locations.len(),
        decisions = catalog.decisions.len(),
        events = catalog.random_events.len(),
        headlines = catalog.headlines.len(),
        "catalog validated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing_state() -> FarmState {
        FarmState {
            farm_name: Some("Doom Acres".into()),
            status: Status::Playing,
            setup_phase: SETUP_PHASES,
            week: 2,
            location: Some("Siberia - Taiga".into()),
            farm_type: Some(FarmType::CropGrains),
            business_structure: Some(BusinessStructure::FamilyRun),
            urban_status: Some(UrbanStatus::Rural),
            ..FarmState::default()
        }
    }

    #[test]
    fn builtin_catalog_is_valid() {
        validate_catalog(&Catalog::builtin()).unwrap();
    }

    #[test]
    fn fresh_and_playing_states_validate() {
        let cat = Catalog::builtin();
        validate_state(&FarmState::default(), &cat).unwrap();
        validate_state(&playing_state(), &cat).unwrap();
    }

    #[test]
    fn rejects_out_of_range_metric() {
        let s = FarmState {
            environment: 101,
            ..FarmState::default()
        };
        assert_eq!(
            validate_state(&s, &Catalog::builtin()),
            Err(ValidationError::MetricOutOfRange {
                metric: Metric::Environment,
                value: 101
            })
        );
    }

    #[test]
    fn rejects_pending_decision_for_another_week() {
        let cat = Catalog::builtin();
        let mut s = playing_state();
        s.pending_decision = Some(PendingDecision {
            week: 2,
            choice_index: 3,
        });
        validate_state(&s, &cat).unwrap();
        s.pending_decision = Some(PendingDecision {
            week: 2,
            choice_index: 4,
        });
        assert!(validate_state(&s, &cat).is_err());
        s.week = 3;
        s.pending_decision = Some(PendingDecision {
            week: 2,
            choice_index: 0,
        });
        assert!(validate_state(&s, &cat).is_err());
    }

    #[test]
    fn rejects_playing_without_selections() {
        let s = FarmState {
            status: Status::Playing,
            setup_phase: SETUP_PHASES,
            ..FarmState::default()
        };
        assert_eq!(
            validate_state(&s, &Catalog::builtin()),
            Err(ValidationError::IncompleteSetup)
        );
    }

    #[test]
    fn rejects_duplicate_decision_week() {
        let mut cat = Catalog::builtin();
        let dup = cat.decisions[0].clone();
        cat.decisions.push(dup);
        assert_eq!(
            validate_catalog(&cat),
            Err(ValidationError::DuplicateDecisionWeek(2))
        );
    }

    proptest! {
        #[test]
        fn clamping_always_validates(env in -500i64..500, health in -500i64..500,
                                     stress in -500i64..500, infra in -500i64..500,
                                     res in -500i64..500, pest in -500i64..500) {
            let mut s = FarmState {
                environment: env,
                health_risk: health,
                hidden_stress: stress,
                infrastructure_level: infra,
                climate_resilience: res,
                hidden_pest_risk: pest,
                ..FarmState::default()
            };
            s.clamp_bounded();
            prop_assert!(validate_state(&s, &Catalog::builtin()).is_ok());
            prop_assert_eq!(s.hidden_pest_risk, pest);
        }
    }
}
