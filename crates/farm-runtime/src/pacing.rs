//! Timed reveal of an announced turn.

use tokio::time::sleep;
use tracing::debug;

use crate::session::Session;
use crate::turn::TurnReport;
use crate::GameError;

/// Wait out the configured progress delay, then resolve the pending turn.
///
/// Nothing else can touch the session while this runs; the borrow is held
/// across the pause.
pub async fn play_out(session: &mut Session) -> Result<TurnReport, GameError> {
    let week = session
        .pending_turn()
        .map(|t| t.week)
        .ok_or(GameError::NoTurnPending)?;
    let delay = session.config().progress_delay();
    if !delay.is_zero() {
        debug!(week, delay_ms = delay.as_millis() as u64, "revealing week");
        sleep(delay).await;
    }
    session.finish_turn()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetupChoice;
    use farm_core::{BusinessStructure, Catalog, FarmType, GameConfig, UrbanStatus};
    use persistence::MemoryStore;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn waits_then_reveals() {
        let config = GameConfig {
            progress_delay_ms: 1_500,
            ..GameConfig::default()
        };
        let mut s = Session::new(
            Arc::new(Catalog::builtin()),
            config,
            Box::new(MemoryStore::new()),
        )
        .unwrap();
        assert_eq!(play_out(&mut s).await, Err(GameError::NoTurnPending));

        s.confirm_setup_phase(Some("Slow Farm")).unwrap();
        s.stage(SetupChoice::Location("Siberia - Taiga".into())).unwrap();
        s.confirm_setup_phase(None).unwrap();
        s.stage(SetupChoice::FarmType(FarmType::LivestockCattle)).unwrap();
        s.stage(SetupChoice::UrbanStatus(UrbanStatus::Rural)).unwrap();
        s.confirm_setup_phase(None).unwrap();
        s.stage(SetupChoice::BusinessStructure(BusinessStructure::SoleTrader)).unwrap();
        s.confirm_setup_phase(None).unwrap();

        let before = tokio::time::Instant::now();
        let report = play_out(&mut s).await.unwrap();
        assert_eq!(report.week, 1);
        assert!(before.elapsed() >= std::time::Duration::from_millis(1_500));
        assert!(s.pending_turn().is_none());
    }
}
