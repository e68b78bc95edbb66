#![deny(warnings)]

//! Money arithmetic for the farm season.
//!
//! This module provides:
//! - Half-up rounding matching the scoring rules
//! - Periodic debt interest
//! - The end-of-season legacy score and National Loss Index

use farm_core::FarmState;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;

/// Revenue a farm is assumed to bring in over a season.
pub const BASE_REVENUE: i64 = 50_000;
/// Value lost per point of pest risk at harvest.
pub const YIELD_PENALTY_PER_PEST_POINT: i64 = 150;
/// Value gained per point of climate resilience.
pub const RESILIENCE_BONUS_PER_POINT: i64 = 200;

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Interest rate must lie in [0, 1].
    #[error("invalid interest rate: {0}")]
    InvalidRate(Decimal),
    /// Result does not fit an integer amount.
    #[error("amount out of range")]
    Overflow,
}

/// Round to the nearest integer, halves toward positive infinity.
///
/// Example:
/// assert_eq!(round_half_up(Decimal::new(25, 1)), Decimal::new(3, 0));
/// assert_eq!(round_half_up(Decimal::new(-25, 1)), Decimal::new(-2, 0));
pub fn round_half_up(value: Decimal) -> Decimal {
    (value + Decimal::new(5, 1)).floor()
}

/// Check that an interest rate is usable.
pub fn validate_rate(rate: Decimal) -> Result<(), EconError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EconError::InvalidRate(rate));
    }
    Ok(())
}

/// Whether interest falls due this week.
pub fn interest_due(week: u32, debt: i64, period_weeks: u32) -> bool {
    debt > 0 && period_weeks > 0 && week % period_weeks == 0
}

/// Interest owed on `debt` for one period, rounded half-up to whole money.
///
/// Example:
/// assert_eq!(debt_interest(50_000, Decimal::new(15, 3)).unwrap(), 750);
pub fn debt_interest(debt: i64, rate: Decimal) -> Result<i64, EconError> {
    validate_rate(rate)?;
    round_half_up(Decimal::from(debt) * rate)
        .to_i64()
        .ok_or(EconError::Overflow)
}

/// Four-way classification of the legacy score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyRank {
    SustainableTitan,
    ResilientManager,
    SurvivingOperator,
    HighRiskVenture,
}

impl LegacyRank {
    pub fn from_score(total: Decimal) -> Self {
        if total > Decimal::from(850) {
            LegacyRank::SustainableTitan
        } else if total > Decimal::from(500) {
            LegacyRank::ResilientManager
        } else if total > Decimal::from(200) {
            LegacyRank::SurvivingOperator
        } else {
            LegacyRank::HighRiskVenture
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LegacyRank::SustainableTitan => "Sustainable Titan",
            LegacyRank::ResilientManager => "Resilient Manager",
            LegacyRank::SurvivingOperator => "Surviving Operator",
            LegacyRank::HighRiskVenture => "High Risk Venture",
        }
    }
}

impl fmt::Display for LegacyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// End-of-season report. Read-only; computed once from the final state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub farm_name: String,
    pub development_status: String,
    /// Harvest value lost to pests.
    pub yield_penalty: Decimal,
    pub resilience_bonus: Decimal,
    /// Debt plus a 5% settlement charge.
    pub final_debt_penalty: Decimal,
    pub final_profit: Decimal,
    pub total_score: Decimal,
    /// (debt + yield loss) as a percentage of base revenue.
    pub national_loss_index: i64,
    pub legacy_rank: LegacyRank,
}

impl ScoreReport {
    /// Score rounded for display, halves away from zero.
    pub fn display_score(&self) -> Decimal {
        self.total_score
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Compute the legacy score from the final farm state.
pub fn score(state: &FarmState) -> ScoreReport {
    let yield_penalty =
        Decimal::from(state.hidden_pest_risk) * Decimal::from(YIELD_PENALTY_PER_PEST_POINT);
    let resilience_bonus =
        Decimal::from(state.climate_resilience) * Decimal::from(RESILIENCE_BONUS_PER_POINT);
    let final_debt_penalty = Decimal::from(state.debt) * Decimal::new(105, 2);
    let final_profit = Decimal::from(state.money) + Decimal::from(BASE_REVENUE) + resilience_bonus
        - yield_penalty
        - final_debt_penalty;

    let total_score = final_profit / Decimal::from(1000) * Decimal::from(3)
        + Decimal::from(state.environment) * Decimal::new(15, 1)
        + Decimal::from(100 - state.hidden_stress)
        + Decimal::from(state.infrastructure_level)
        + Decimal::from(state.climate_resilience);

    let nli = round_half_up(
        (Decimal::from(state.debt) + yield_penalty) / Decimal::from(BASE_REVENUE)
            * Decimal::from(100),
    );
    let national_loss_index = nli.to_i64().unwrap_or(if nli.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    });
    let legacy_rank = LegacyRank::from_score(total_score);

    info!(%total_score, national_loss_index, rank = %legacy_rank, "season scored");
    ScoreReport {
        farm_name: state.display_name().to_string(),
        development_status: state.development_status.clone(),
        yield_penalty,
        resilience_bonus,
        final_debt_penalty,
        final_profit,
        total_score,
        national_loss_index,
        legacy_rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn final_state() -> FarmState {
        FarmState {
            money: 40_000,
            hidden_pest_risk: 20,
            climate_resilience: 30,
            debt: 10_000,
            environment: 60,
            hidden_stress: 40,
            infrastructure_level: 50,
            ..FarmState::default()
        }
    }

    #[test]
    fn worked_example_scores() {
        let r = score(&final_state());
        assert_eq!(r.yield_penalty, Decimal::from(3_000));
        assert_eq!(r.resilience_bonus, Decimal::from(6_000));
        assert_eq!(r.final_debt_penalty, Decimal::from(10_500));
        assert_eq!(r.final_profit, Decimal::from(82_500));
        assert_eq!(r.total_score, Decimal::new(4775, 1));
        assert_eq!(r.national_loss_index, 26);
        assert_eq!(r.legacy_rank, LegacyRank::SurvivingOperator);
        assert_eq!(r.display_score(), Decimal::from(478));
    }

    #[test]
    fn display_score_rounds_halves_away_from_zero() {
        // money -120_000 gives a total score of exactly -2.5
        let s = FarmState {
            money: -120_000,
            ..final_state()
        };
        let r = score(&s);
        assert_eq!(r.total_score, Decimal::new(-25, 1));
        assert_eq!(r.display_score(), Decimal::from(-3));
        assert_eq!(round_half_up(r.total_score), Decimal::from(-2));
    }

    #[test]
    fn rank_thresholds_are_strict() {
        assert_eq!(LegacyRank::from_score(Decimal::from(851)), LegacyRank::SustainableTitan);
        assert_eq!(LegacyRank::from_score(Decimal::from(850)), LegacyRank::ResilientManager);
        assert_eq!(LegacyRank::from_score(Decimal::from(500)), LegacyRank::SurvivingOperator);
        assert_eq!(LegacyRank::from_score(Decimal::from(200)), LegacyRank::HighRiskVenture);
        assert_eq!(LegacyRank::HighRiskVenture.to_string(), "High Risk Venture");
    }

    #[test]
    fn negative_pest_risk_lowers_the_loss_index() {
        let s = FarmState {
            debt: 0,
            hidden_pest_risk: -20,
            ..FarmState::default()
        };
        let r = score(&s);
        assert_eq!(r.yield_penalty, Decimal::from(-3_000));
        assert_eq!(r.national_loss_index, -6);
    }

    #[test]
    fn interest_rounds_half_up() {
        assert_eq!(debt_interest(50_000, Decimal::new(15, 3)).unwrap(), 750);
        // 1_100 * 0.015 = 16.5
        assert_eq!(debt_interest(1_100, Decimal::new(15, 3)).unwrap(), 17);
        assert_eq!(debt_interest(33, Decimal::new(15, 3)).unwrap(), 0);
        assert!(debt_interest(1_000, Decimal::from(2)).is_err());
    }

    #[test]
    fn interest_schedule() {
        assert!(interest_due(4, 1, 4));
        assert!(!interest_due(5, 1, 4));
        assert!(!interest_due(8, 0, 4));
        assert!(!interest_due(8, 100, 0));
    }

    proptest! {
        #[test]
        fn interest_never_exceeds_debt(debt in 0i64..10_000_000, bps in 0i64..=10_000) {
            let rate = Decimal::new(bps, 4);
            let i = debt_interest(debt, rate).unwrap();
            prop_assert!(i >= 0);
            prop_assert!(i <= debt);
        }

        #[test]
        fn more_money_never_lowers_score(money in -200_000i64..200_000, extra in 1i64..50_000) {
            let a = score(&FarmState { money, ..final_state() });
            let b = score(&FarmState { money: money + extra, ..final_state() });
            prop_assert!(b.total_score > a.total_score);
        }
    }
}
