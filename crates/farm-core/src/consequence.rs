//! Consequences: sparse metric deltas plus narrative, and the one routine that
//! merges them into [`FarmState`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::{clamp_metric, FarmState};

/// Named numeric metrics of the farm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Money,
    Debt,
    Environment,
    HealthRisk,
    HiddenStress,
    InfrastructureLevel,
    ClimateResilience,
    HiddenPestRisk,
}

impl Metric {
    /// Metrics kept inside `[0, 100]` after every public operation.
    pub const BOUNDED: [Metric; 5] = [
        Metric::Environment,
        Metric::HealthRisk,
        Metric::HiddenStress,
        Metric::InfrastructureLevel,
        Metric::ClimateResilience,
    ];

    pub fn is_bounded(self) -> bool {
        Self::BOUNDED.contains(&self)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Money => "money",
            Metric::Debt => "debt",
            Metric::Environment => "environment",
            Metric::HealthRisk => "healthRisk",
            Metric::HiddenStress => "hiddenStress",
            Metric::InfrastructureLevel => "infrastructureLevel",
            Metric::ClimateResilience => "climateResilience",
            Metric::HiddenPestRisk => "hiddenPestRisk",
        };
        f.write_str(s)
    }
}

/// Sparse set of metric deltas with a narrative. Absent fields are zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Consequence {
    pub money: i64,
    pub debt: i64,
    pub environment: i64,
    pub health_risk: i64,
    pub hidden_stress: i64,
    pub infrastructure_level: i64,
    pub climate_resilience: i64,
    pub hidden_pest_risk: i64,
    pub narrative: String,
}

/// Which rule produced a consequence; decides the fields that are honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyScope {
    /// Committed decision: every field.
    Decision,
    /// Random event: money, pest risk, stress and infrastructure.
    RandomEvent,
    /// Headline penalty: money, health risk and stress.
    Headline,
}

impl Consequence {
    /// Delta for a named metric.
    pub fn delta(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Money => self.money,
            Metric::Debt => self.debt,
            Metric::Environment => self.environment,
            Metric::HealthRisk => self.health_risk,
            Metric::HiddenStress => self.hidden_stress,
            Metric::InfrastructureLevel => self.infrastructure_level,
            Metric::ClimateResilience => self.climate_resilience,
            Metric::HiddenPestRisk => self.hidden_pest_risk,
        }
    }

    /// Human-readable trade-off lines for the visible metrics.
    ///
    /// Zero deltas are skipped, so an empty vector means "no visible change".
    pub fn trade_offs(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if self.money != 0 {
            let sign = if self.money > 0 { "+$" } else { "-$" };
            parts.push(format!(
                "Money: {sign}{}",
                format_thousands(self.money.abs())
            ));
        }
        if self.debt != 0 {
            parts.push(format!("Debt: +${}", format_thousands(self.debt.abs())));
        }
        for (label, v) in [
            ("Environment", self.environment),
            ("Consumer Risk", self.health_risk),
            ("Farmer Stress", self.hidden_stress),
        ] {
            if v != 0 {
                let sign = if v > 0 { '+' } else { '-' };
                parts.push(format!("{label}: {sign}{}", v.abs()));
            }
        }
        parts
    }
}

impl FarmState {
    /// Merge a consequence into the state.
    ///
    /// Pest risk is clamped whenever the scope touches it, even for a zero
    /// delta. Bounded metrics are clamped on return regardless of scope.
    pub fn apply(&mut self, c: &Consequence, scope: ApplyScope) {
        self.money += c.money;
        match scope {
            ApplyScope::Decision => {
                self.debt = (self.debt + c.debt).max(0);
                self.environment += c.environment;
                self.health_risk += c.health_risk;
                self.hidden_pest_risk = clamp_metric(self.hidden_pest_risk + c.hidden_pest_risk);
                self.hidden_stress += c.hidden_stress;
                self.infrastructure_level += c.infrastructure_level;
                self.climate_resilience += c.climate_resilience;
            }
            ApplyScope::RandomEvent => {
                self.hidden_pest_risk = clamp_metric(self.hidden_pest_risk + c.hidden_pest_risk);
                self.hidden_stress += c.hidden_stress;
                self.infrastructure_level += c.infrastructure_level;
            }
            ApplyScope::Headline => {
                self.health_risk += c.health_risk;
                self.hidden_stress += c.hidden_stress;
            }
        }
        self.clamp_bounded();
    }
}

/// Format an integer with comma thousands separators.
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chemical_rush() -> Consequence {
        Consequence {
            money: -15_000,
            environment: -20,
            health_risk: 15,
            hidden_pest_risk: 10,
            narrative: "quick growth".into(),
            ..Consequence::default()
        }
    }

    #[test]
    fn decision_scope_touches_every_field() {
        let mut s = FarmState::default();
        s.apply(&chemical_rush(), ApplyScope::Decision);
        assert_eq!(s.money, 85_000);
        assert_eq!(s.environment, 30);
        assert_eq!(s.health_risk, 25);
        assert_eq!(s.hidden_pest_risk, 10);
    }

    #[test]
    fn decision_scope_snaps_negative_pest_risk_to_zero() {
        let mut s = FarmState {
            hidden_pest_risk: -10,
            ..FarmState::default()
        };
        s.apply(&Consequence::default(), ApplyScope::Decision);
        assert_eq!(s.hidden_pest_risk, 0);
    }

    #[test]
    fn headline_scope_ignores_pest_and_environment() {
        let mut s = FarmState {
            hidden_pest_risk: -10,
            ..FarmState::default()
        };
        let c = Consequence {
            money: -1000,
            environment: -40,
            health_risk: 95,
            hidden_pest_risk: 50,
            ..Consequence::default()
        };
        s.apply(&c, ApplyScope::Headline);
        assert_eq!(s.money, 99_000);
        assert_eq!(s.environment, 50);
        assert_eq!(s.health_risk, 100);
        assert_eq!(s.hidden_pest_risk, -10);
    }

    #[test]
    fn random_event_scope_skips_health_risk() {
        let mut s = FarmState::default();
        let c = Consequence {
            health_risk: 30,
            infrastructure_level: -50,
            ..Consequence::default()
        };
        s.apply(&c, ApplyScope::RandomEvent);
        assert_eq!(s.health_risk, 10);
        assert_eq!(s.infrastructure_level, 0);
    }

    #[test]
    fn debt_never_goes_negative() {
        let mut s = FarmState::default();
        let c = Consequence {
            debt: -5_000,
            ..Consequence::default()
        };
        s.apply(&c, ApplyScope::Decision);
        assert_eq!(s.debt, 0);
    }

    #[test]
    fn trade_offs_skip_zero_deltas() {
        let lines = chemical_rush().trade_offs();
        assert_eq!(
            lines,
            vec![
                "Money: -$15,000".to_string(),
                "Environment: -20".to_string(),
                "Consumer Risk: +15".to_string(),
            ]
        );
        assert!(Consequence::default().trade_offs().is_empty());
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(-1_234_567), "-1,234,567");
    }
}
