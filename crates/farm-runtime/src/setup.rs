//! Four-phase farm setup: name, location, production, business structure.

use farm_core::{
    BusinessStructure, Catalog, FarmState, FarmType, GameConfig, Status, UrbanStatus, SETUP_PHASES,
};
use tracing::{debug, info};

use crate::GameError;

/// A selection made while a setup phase is on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupChoice {
    Location(String),
    FarmType(FarmType),
    UrbanStatus(UrbanStatus),
    BusinessStructure(BusinessStructure),
}

impl SetupChoice {
    /// The setup phase that offers this selection.
    pub fn phase(&self) -> u8 {
        match self {
            SetupChoice::Location(_) => 1,
            SetupChoice::FarmType(_) | SetupChoice::UrbanStatus(_) => 2,
            SetupChoice::BusinessStructure(_) => 3,
        }
    }
}

/// Result of confirming a setup phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupProgress {
    /// Moved on to the given phase.
    Advanced(u8),
    /// Every selection is in; the season can be finalized.
    ReadyToStart,
}

fn ensure_setup(state: &FarmState) -> Result<(), GameError> {
    if state.status != Status::Setup || state.setup_phase >= SETUP_PHASES {
        return Err(GameError::NotInSetup);
    }
    Ok(())
}

/// Record a selection for the phase currently on screen.
pub fn stage(state: &mut FarmState, choice: SetupChoice) -> Result<(), GameError> {
    ensure_setup(state)?;
    if choice.phase() != state.setup_phase {
        return Err(GameError::ChoiceNotOffered(state.setup_phase));
    }
    debug!(?choice, phase = state.setup_phase, "setup selection");
    match choice {
        SetupChoice::Location(key) => state.location = Some(key),
        SetupChoice::FarmType(t) => state.farm_type = Some(t),
        SetupChoice::UrbanStatus(u) => state.urban_status = Some(u),
        SetupChoice::BusinessStructure(b) => state.business_structure = Some(b),
    }
    Ok(())
}

/// Validate the current phase and move to the next one.
///
/// `name` is only read in phase 0.
pub fn advance_phase(
    state: &mut FarmState,
    catalog: &Catalog,
    name: Option<&str>,
) -> Result<SetupProgress, GameError> {
    ensure_setup(state)?;
    match state.setup_phase {
        0 => {
            let name = name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or(GameError::MissingName)?;
            state.farm_name = Some(name.to_string());
        }
        1 => {
            let key = state.location.as_deref().ok_or(GameError::MissingLocation)?;
            if catalog.location(key).is_none() {
                return Err(GameError::UnknownLocation(key.to_string()));
            }
        }
        2 => {
            if state.farm_type.is_none() || state.urban_status.is_none() {
                return Err(GameError::MissingProduction);
            }
        }
        _ => {
            if state.business_structure.is_none() {
                return Err(GameError::MissingBusinessStructure);
            }
            return Ok(SetupProgress::ReadyToStart);
        }
    }
    state.setup_phase += 1;
    Ok(SetupProgress::Advanced(state.setup_phase))
}

/// Reset the economy from the chosen location, apply the setup modifiers and
/// flip the state to `playing`. Does not open the first week.
pub fn finalize(
    state: &mut FarmState,
    catalog: &Catalog,
    config: &GameConfig,
) -> Result<(), GameError> {
    if state.status != Status::Setup {
        return Err(GameError::NotInSetup);
    }
    if !state.is_setup_complete() {
        return Err(GameError::SetupIncomplete);
    }
    let (Some(key), Some(farm_type), Some(structure)) =
        (state.location.clone(), state.farm_type, state.business_structure)
    else {
        return Err(GameError::SetupIncomplete);
    };
    let loc = catalog
        .location(&key)
        .ok_or_else(|| GameError::UnknownLocation(key.clone()))?;

    state.money = config.starting_capital - loc.initial_money_penalty;
    state.debt = loc.starting_debt;
    state.climate_resilience = loc.initial_resilience;
    state.infrastructure_level = loc.initial_infrastructure;
    state.hidden_pest_risk = loc.base_pest_risk;
    state.development_status = loc.development_status.clone();

    if state.urban_status == Some(UrbanStatus::Urban) {
        state.money -= 10_000;
        state.hidden_stress += 15;
        state.infrastructure_level += 10;
    }
    if farm_type.is_mixed() {
        state.hidden_stress += 20;
    }
    match structure {
        BusinessStructure::SoleTrader => state.hidden_stress += 10,
        BusinessStructure::Cooperative => {
            state.money -= 10_000;
            state.hidden_stress -= 10;
        }
        BusinessStructure::FamilyRun => {}
    }
    state.clamp_bounded();

    state.setup_phase = SETUP_PHASES;
    state.status = Status::Playing;
    info!(
        location = %key,
        role = %state.development_status,
        money = state.money,
        debt = state.debt,
        "season started"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(
        state: &mut FarmState,
        cat: &Catalog,
        loc: &str,
        t: FarmType,
        u: UrbanStatus,
        b: BusinessStructure,
    ) {
        advance_phase(state, cat, Some("  Doom Acres ")).unwrap();
        stage(state, SetupChoice::Location(loc.into())).unwrap();
        advance_phase(state, cat, None).unwrap();
        stage(state, SetupChoice::FarmType(t)).unwrap();
        stage(state, SetupChoice::UrbanStatus(u)).unwrap();
        advance_phase(state, cat, None).unwrap();
        stage(state, SetupChoice::BusinessStructure(b)).unwrap();
        assert_eq!(advance_phase(state, cat, None), Ok(SetupProgress::ReadyToStart));
    }

    #[test]
    fn steppe_family_farm_has_no_modifiers() {
        let cat = Catalog::builtin();
        let mut s = FarmState::default();
        walk(
            &mut s,
            &cat,
            "Central Asia - Steppe",
            FarmType::CropGrains,
            UrbanStatus::Rural,
            BusinessStructure::FamilyRun,
        );
        finalize(&mut s, &cat, &GameConfig::default()).unwrap();
        assert_eq!(s.farm_name.as_deref(), Some("Doom Acres"));
        assert_eq!(s.money, 80_000);
        assert_eq!(s.debt, 50_000);
        assert_eq!(s.hidden_pest_risk, -10);
        assert_eq!(s.climate_resilience, 10);
        assert_eq!(s.infrastructure_level, 15);
        assert_eq!(s.hidden_stress, 0);
        assert_eq!(s.development_status, "Developing");
        assert_eq!(s.status, Status::Playing);
        assert_eq!(s.setup_phase, 4);
        assert_eq!(s.week, 0);
    }

    #[test]
    fn modifiers_stack_in_order() {
        let cat = Catalog::builtin();
        let mut s = FarmState::default();
        walk(
            &mut s,
            &cat,
            "Japan - Yakushima",
            FarmType::MixedVegPoultry,
            UrbanStatus::Urban,
            BusinessStructure::SoleTrader,
        );
        finalize(&mut s, &cat, &GameConfig::default()).unwrap();
        assert_eq!(s.money, 100_000 - 30_000 - 10_000);
        assert_eq!(s.hidden_stress, 15 + 20 + 10);
        assert_eq!(s.infrastructure_level, 60);
    }

    #[test]
    fn cooperative_stress_relief_is_clamped() {
        let cat = Catalog::builtin();
        let mut s = FarmState::default();
        walk(
            &mut s,
            &cat,
            "Siberia - Taiga",
            FarmType::LivestockCattle,
            UrbanStatus::Rural,
            BusinessStructure::Cooperative,
        );
        finalize(&mut s, &cat, &GameConfig::default()).unwrap();
        assert_eq!(s.money, 80_000);
        assert_eq!(s.hidden_stress, 0);
        assert_eq!(s.hidden_pest_risk, -20);
    }

    #[test]
    fn blank_name_does_not_advance() {
        let cat = Catalog::builtin();
        let mut s = FarmState::default();
        assert_eq!(advance_phase(&mut s, &cat, Some("   ")), Err(GameError::MissingName));
        assert_eq!(advance_phase(&mut s, &cat, None), Err(GameError::MissingName));
        assert_eq!(s, FarmState::default());
    }

    #[test]
    fn unknown_location_is_rejected() {
        let cat = Catalog::builtin();
        let mut s = FarmState::default();
        advance_phase(&mut s, &cat, Some("Doom Acres")).unwrap();
        stage(&mut s, SetupChoice::Location("Atlantis".into())).unwrap();
        assert_eq!(
            advance_phase(&mut s, &cat, None),
            Err(GameError::UnknownLocation("Atlantis".into()))
        );
        assert_eq!(s.setup_phase, 1);
    }

    #[test]
    fn phase_two_needs_both_selections() {
        let cat = Catalog::builtin();
        let mut s = FarmState::default();
        advance_phase(&mut s, &cat, Some("Doom Acres")).unwrap();
        stage(&mut s, SetupChoice::Location("Siberia - Taiga".into())).unwrap();
        advance_phase(&mut s, &cat, None).unwrap();
        stage(&mut s, SetupChoice::FarmType(FarmType::CropGrains)).unwrap();
        assert_eq!(advance_phase(&mut s, &cat, None), Err(GameError::MissingProduction));
        assert_eq!(s.setup_phase, 2);
    }

    #[test]
    fn selections_only_in_their_phase() {
        let mut s = FarmState::default();
        assert_eq!(
            stage(&mut s, SetupChoice::BusinessStructure(BusinessStructure::FamilyRun)),
            Err(GameError::ChoiceNotOffered(0))
        );
        assert!(s.business_structure.is_none());
    }

    #[test]
    fn finalize_with_gap_is_a_no_op() {
        let cat = Catalog::builtin();
        let mut s = FarmState {
            farm_name: Some("Doom Acres".into()),
            location: Some("Siberia - Taiga".into()),
            farm_type: Some(FarmType::CropGrains),
            ..FarmState::default()
        };
        let before = s.clone();
        assert_eq!(
            finalize(&mut s, &cat, &GameConfig::default()),
            Err(GameError::SetupIncomplete)
        );
        assert_eq!(s, before);
    }
}
