//! Read-only snapshots for a presentation layer. Nothing here mutates state.

use farm_core::{Catalog, Decision, FarmState, Status};
use farm_econ::ScoreReport;
use serde::Serialize;

/// Consequence preview of one choice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub week: u32,
    pub choice_index: usize,
    pub text: String,
    pub narrative: String,
    pub trade_offs: Vec<String>,
}

impl Preview {
    /// Preview of `decision.choices[index]`. The index must be in range.
    pub(crate) fn of(decision: &Decision, index: usize) -> Self {
        let choice = &decision.choices[index];
        Self {
            week: decision.week,
            choice_index: index,
            text: choice.text.clone(),
            narrative: choice.consequence.narrative.clone(),
            trade_offs: choice.consequence.trade_offs(),
        }
    }
}

/// The decision screen: one choice at a time, plus its preview once selected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecisionPrompt {
    pub week: u32,
    pub category: String,
    pub prompt: String,
    /// Index of the choice on screen.
    pub cursor: usize,
    pub option_count: usize,
    pub choice_text: String,
    /// Set when the choice on screen is the pending one.
    pub preview: Option<Preview>,
}

impl DecisionPrompt {
    fn build(state: &FarmState, decision: &Decision) -> Self {
        let count = decision.choices.len();
        let cursor = state.current_decision_index.min(count.saturating_sub(1));
        let preview = state
            .pending_decision
            .filter(|p| p.week == decision.week && p.choice_index == cursor && cursor < count)
            .map(|p| Preview::of(decision, p.choice_index));
        Self {
            week: decision.week,
            category: decision.category.clone(),
            prompt: decision.prompt.clone(),
            cursor,
            option_count: count,
            choice_text: decision
                .choices
                .get(cursor)
                .map(|c| c.text.clone())
                .unwrap_or_default(),
            preview,
        }
    }

    pub fn position(&self) -> String {
        format!("Option {} of {}.", self.cursor + 1, self.option_count)
    }
}

const PEST_ALARM: i64 = 70;
const STRESS_ALARM: i64 = 50;

/// Routine update shown on weeks without a scripted decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonitoringReport {
    pub week: u32,
    pub pest_alarm: bool,
    pub observation: String,
    pub stress_alarm: bool,
    pub farm_report: String,
}

impl MonitoringReport {
    pub fn of(state: &FarmState) -> Self {
        let pest_alarm = state.hidden_pest_risk > PEST_ALARM;
        let stress_alarm = state.hidden_stress > STRESS_ALARM;
        let observation = if pest_alarm {
            "Pest and disease pressures are spiking! Your crop is visibly unhappy and posting vague complaints on social media."
        } else {
            "Routine monitoring shows stable conditions. The field looks resilient, but the critics are waiting."
        };
        let farm_report = if stress_alarm {
            "Your stress is high; you snapped at the weather forecast and a bookkeeping error cost you $2,000."
        } else {
            "A quiet week; you feel organized and briefly achieved true inner peace (for 15 minutes)."
        };
        Self {
            week: state.week,
            pest_alarm,
            observation: observation.to_string(),
            stress_alarm,
            farm_report: farm_report.to_string(),
        }
    }

    pub fn title(&self) -> String {
        format!("Week {}: Maintenance & Monitoring", self.week)
    }
}

/// What the player should be looking at right now.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum WeekView {
    Setup { phase: u8 },
    /// The given week is being revealed.
    TurnInProgress { week: u32 },
    Decision(DecisionPrompt),
    Monitoring(MonitoringReport),
    Finished(Box<ScoreReport>),
}

impl WeekView {
    pub fn build(
        state: &FarmState,
        catalog: &Catalog,
        revealing: Option<u32>,
        report: Option<&ScoreReport>,
    ) -> Self {
        if let Some(week) = revealing {
            return WeekView::TurnInProgress { week };
        }
        match state.status {
            Status::Setup => WeekView::Setup {
                phase: state.setup_phase,
            },
            Status::End => WeekView::Finished(Box::new(
                report
                    .cloned()
                    .unwrap_or_else(|| farm_econ::score(state)),
            )),
            Status::Playing => match catalog.decision_for_week(state.week) {
                Some(d) if !d.choices.is_empty() => {
                    WeekView::Decision(DecisionPrompt::build(state, d))
                }
                _ => WeekView::Monitoring(MonitoringReport::of(state)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::PendingDecision;

    fn playing(week: u32) -> FarmState {
        FarmState {
            status: Status::Playing,
            setup_phase: 4,
            week,
            ..FarmState::default()
        }
    }

    #[test]
    fn decision_week_shows_cursor_choice() {
        let cat = Catalog::builtin();
        let mut s = playing(6);
        s.current_decision_index = 2;
        let WeekView::Decision(p) = WeekView::build(&s, &cat, None, None) else {
            panic!("expected a decision");
        };
        assert_eq!(p.cursor, 2);
        assert_eq!(p.position(), "Option 3 of 4.");
        assert!(p.preview.is_none());

        s.pending_decision = Some(PendingDecision { week: 6, choice_index: 2 });
        let WeekView::Decision(p) = WeekView::build(&s, &cat, None, None) else {
            panic!("expected a decision");
        };
        assert_eq!(p.preview.map(|pv| pv.choice_index), Some(2));
    }

    #[test]
    fn monitoring_alarms() {
        let cat = Catalog::builtin();
        let mut s = playing(3);
        s.hidden_pest_risk = 71;
        s.hidden_stress = 50;
        let WeekView::Monitoring(m) = WeekView::build(&s, &cat, None, None) else {
            panic!("expected monitoring");
        };
        assert!(m.pest_alarm);
        assert!(!m.stress_alarm);
        assert_eq!(m.title(), "Week 3: Maintenance & Monitoring");
    }

    #[test]
    fn pending_turn_hides_the_week() {
        let cat = Catalog::builtin();
        assert_eq!(
            WeekView::build(&playing(1), &cat, Some(2), None),
            WeekView::TurnInProgress { week: 2 }
        );
        assert_eq!(
            WeekView::build(&FarmState::default(), &cat, None, None),
            WeekView::Setup { phase: 0 }
        );
    }
}
