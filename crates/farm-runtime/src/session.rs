//! One play-through: the farm state, its RNG and the store it is saved to.

use std::sync::Arc;

use farm_core::{validate_state, Catalog, FarmState, GameConfig, Status};
use farm_econ::{validate_rate, ScoreReport};
use persistence::StateStore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::decision::{self, CommittedChoice};
use crate::setup::{self, SetupChoice, SetupProgress};
use crate::turn::{self, TurnReport, TurnTicket};
use crate::view::{Preview, WeekView};
use crate::GameError;

/// Result of confirming a setup phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupOutcome {
    Advanced(u8),
    /// Setup is done and the opening turn has been announced.
    Started(TurnTicket),
}

/// Single writer of a [`FarmState`].
///
/// Every operation either succeeds and saves, or returns a [`GameError`] and
/// leaves the state as it was. An operation that announces a turn is saved
/// together with that turn in [`Session::finish_turn`].
pub struct Session {
    state: FarmState,
    catalog: Arc<Catalog>,
    config: GameConfig,
    rng: ChaCha8Rng,
    store: Box<dyn StateStore>,
    pending_turn: Option<TurnTicket>,
    report: Option<ScoreReport>,
    resumed: bool,
}

impl Session {
    /// Open a session, resuming whatever the store holds unless it is still in
    /// setup.
    pub fn new(
        catalog: Arc<Catalog>,
        config: GameConfig,
        mut store: Box<dyn StateStore>,
    ) -> Result<Self, GameError> {
        validate_rate(config.interest_rate)?;
        let rng = ChaCha8Rng::seed_from_u64(config.rng_seed);

        let mut state = FarmState::default();
        let mut resumed = false;
        match store.load() {
            Ok(Some(saved)) if saved.status != Status::Setup => {
                if let Err(err) = validate_state(&saved, &catalog) {
                    warn!(%err, "saved session looks inconsistent; resuming anyway");
                }
                state = saved;
                state.clamp_bounded();
                resumed = true;
                info!(farm = state.display_name(), week = state.week, "session resumed");
            }
            Ok(_) => debug!("starting a fresh session"),
            Err(err) => warn!(error = %err, "could not load saved session"),
        }
        let report = state.is_over().then(|| farm_econ::score(&state));

        Ok(Self {
            state,
            catalog,
            config,
            rng,
            store,
            pending_turn: None,
            report,
            resumed,
        })
    }

    pub fn state(&self) -> &FarmState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// True when the state came from the store rather than a fresh start.
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    /// The turn waiting to be revealed, if any.
    pub fn pending_turn(&self) -> Option<&TurnTicket> {
        self.pending_turn.as_ref()
    }

    pub fn view(&self) -> WeekView {
        WeekView::build(
            &self.state,
            &self.catalog,
            self.pending_turn.as_ref().map(|t| t.week),
            self.report.as_ref(),
        )
    }

    fn idle(&self) -> Result<(), GameError> {
        match &self.pending_turn {
            Some(t) => Err(GameError::TurnInProgress(t.week)),
            None => Ok(()),
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.state) {
            warn!(error = %err, week = self.state.week, "failed to save session");
        }
    }

    fn announce(&mut self, applied: Option<farm_core::Consequence>) -> TurnTicket {
        let ticket = turn::begin_turn(&self.state, &self.catalog, applied, &mut self.rng);
        self.pending_turn = Some(ticket.clone());
        ticket
    }

    /// Record a selection for the setup phase on screen.
    pub fn stage(&mut self, choice: SetupChoice) -> Result<(), GameError> {
        self.idle()?;
        setup::stage(&mut self.state, choice)?;
        self.persist();
        Ok(())
    }

    /// Confirm the setup phase on screen. Confirming the last phase starts the
    /// season.
    pub fn confirm_setup_phase(&mut self, name: Option<&str>) -> Result<SetupOutcome, GameError> {
        self.idle()?;
        match setup::advance_phase(&mut self.state, &self.catalog, name)? {
            SetupProgress::Advanced(phase) => {
                self.persist();
                Ok(SetupOutcome::Advanced(phase))
            }
            SetupProgress::ReadyToStart => self.start_season().map(SetupOutcome::Started),
        }
    }

    /// Finalize setup and announce the opening turn.
    pub fn start_season(&mut self) -> Result<TurnTicket, GameError> {
        self.idle()?;
        setup::finalize(&mut self.state, &self.catalog, &self.config)?;
        Ok(self.announce(None))
    }

    pub fn select_option(&mut self, week: u32, choice_index: usize) -> Result<Preview, GameError> {
        self.idle()?;
        let preview = decision::select_option(&mut self.state, &self.catalog, week, choice_index)?;
        self.persist();
        Ok(preview)
    }

    pub fn cycle_option(&mut self) -> Result<usize, GameError> {
        self.idle()?;
        let index = decision::cycle_option(&mut self.state, &self.catalog)?;
        self.persist();
        Ok(index)
    }

    /// Accept the pending choice and announce the turn it leads into.
    pub fn commit(&mut self) -> Result<(CommittedChoice, TurnTicket), GameError> {
        self.idle()?;
        let committed = decision::commit(&mut self.state, &self.catalog)?;
        let ticket = self.announce(Some(committed.consequence.clone()));
        Ok((committed, ticket))
    }

    /// Announce the next turn from a monitoring week.
    pub fn advance_turn(&mut self) -> Result<TurnTicket, GameError> {
        self.idle()?;
        if self.state.status != Status::Playing {
            return Err(GameError::SeasonNotActive);
        }
        if self.catalog.has_decision(self.state.week) {
            return Err(GameError::DecisionRequired(self.state.week));
        }
        Ok(self.announce(None))
    }

    /// Resolve the announced turn.
    pub fn finish_turn(&mut self) -> Result<TurnReport, GameError> {
        let ticket = self.pending_turn.take().ok_or(GameError::NoTurnPending)?;
        let report = turn::finish_turn(
            &mut self.state,
            &self.catalog,
            &self.config,
            &mut self.rng,
            ticket,
        );
        if let Some(score) = report.score() {
            self.report = Some(score.clone());
        }
        self.persist();
        Ok(report)
    }

    /// Throw the play-through away and clear the store.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.idle()?;
        self.state = FarmState::default();
        self.report = None;
        self.resumed = false;
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear saved session");
        }
        info!("session reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::{BusinessStructure, FarmType, UrbanStatus};
    use persistence::MemoryStore;

    fn session(store: MemoryStore) -> Session {
        Session::new(
            Arc::new(Catalog::builtin()),
            GameConfig::default().without_delay(),
            Box::new(store),
        )
        .unwrap()
    }

    fn through_setup(s: &mut Session) -> TurnTicket {
        s.confirm_setup_phase(Some("Doom Acres")).unwrap();
        s.stage(SetupChoice::Location("Central Asia - Steppe".into())).unwrap();
        s.confirm_setup_phase(None).unwrap();
        s.stage(SetupChoice::FarmType(FarmType::CropGrains)).unwrap();
        s.stage(SetupChoice::UrbanStatus(UrbanStatus::Rural)).unwrap();
        s.confirm_setup_phase(None).unwrap();
        s.stage(SetupChoice::BusinessStructure(BusinessStructure::FamilyRun)).unwrap();
        match s.confirm_setup_phase(None).unwrap() {
            SetupOutcome::Started(t) => t,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn opening_turn_lands_on_week_one() {
        let store = MemoryStore::new();
        let mut s = session(store.clone());
        let ticket = through_setup(&mut s);
        assert_eq!(ticket.week, 1);
        assert_eq!(s.view(), WeekView::TurnInProgress { week: 1 });
        assert_eq!(s.advance_turn(), Err(GameError::TurnInProgress(1)));

        s.finish_turn().unwrap();
        assert_eq!(s.state().week, 1);
        assert_eq!(s.state().money, 79_500);
        assert_eq!(store.snapshot().map(|st| st.week), Some(1));
    }

    #[test]
    fn decision_week_refuses_plain_advance() {
        let mut s = session(MemoryStore::new());
        through_setup(&mut s);
        s.finish_turn().unwrap();
        s.advance_turn().unwrap();
        s.finish_turn().unwrap();
        assert_eq!(s.state().week, 2);
        assert_eq!(s.advance_turn(), Err(GameError::DecisionRequired(2)));
    }

    #[test]
    fn setup_state_is_not_resumed() {
        let saved = FarmState {
            setup_phase: 2,
            farm_name: Some("Half Done".into()),
            ..FarmState::default()
        };
        let s = session(MemoryStore::with_state(saved));
        assert!(!s.is_resumed());
        assert_eq!(s.state(), &FarmState::default());
    }

    #[test]
    fn reset_clears_the_store() {
        let store = MemoryStore::new();
        let mut s = session(store.clone());
        through_setup(&mut s);
        s.finish_turn().unwrap();
        s.reset().unwrap();
        assert!(store.snapshot().is_none());
        assert_eq!(s.view(), WeekView::Setup { phase: 0 });
    }

    #[test]
    fn bad_interest_rate_is_rejected() {
        let config = GameConfig {
            interest_rate: rust_decimal::Decimal::from(3),
            ..GameConfig::default()
        };
        let err = Session::new(
            Arc::new(Catalog::builtin()),
            config,
            Box::new(MemoryStore::new()),
        )
        .err();
        assert!(matches!(err, Some(GameError::Config(_))));
    }
}
