//! The mutable record of one play-through.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consequence::Metric;

/// Lower bound of every bounded metric.
pub const METRIC_MIN: i64 = 0;
/// Upper bound of every bounded metric.
pub const METRIC_MAX: i64 = 100;
/// Capital a fresh farm holds before location penalties.
pub const DEFAULT_STARTING_CAPITAL: i64 = 100_000;
/// Number of setup phases; `setup_phase == SETUP_PHASES` means setup is done.
pub const SETUP_PHASES: u8 = 4;

/// Clamp a value into `[METRIC_MIN, METRIC_MAX]`.
pub fn clamp_metric(value: i64) -> i64 {
    value.clamp(METRIC_MIN, METRIC_MAX)
}

/// Lifecycle of a play-through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Player is still answering the setup phases.
    Setup,
    /// The season is running.
    Playing,
    /// The season is over and the state is read-only.
    End,
}

/// Primary production focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FarmType {
    #[serde(rename = "Crop - Grains")]
    CropGrains,
    #[serde(rename = "Livestock - Cattle")]
    LivestockCattle,
    #[serde(rename = "Mixed - Veg/Poultry")]
    MixedVegPoultry,
}

impl FarmType {
    pub const ALL: [FarmType; 3] = [
        FarmType::CropGrains,
        FarmType::LivestockCattle,
        FarmType::MixedVegPoultry,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FarmType::CropGrains => "Crop - Grains",
            FarmType::LivestockCattle => "Livestock - Cattle",
            FarmType::MixedVegPoultry => "Mixed - Veg/Poultry",
        }
    }

    /// Mixed operations juggle more enterprises and start more stressed.
    pub fn is_mixed(self) -> bool {
        self.label().contains("Mixed")
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for FarmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Neighborhood type; affects regulation and land cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrbanStatus {
    Rural,
    Urban,
}

impl UrbanStatus {
    pub const ALL: [UrbanStatus; 2] = [UrbanStatus::Rural, UrbanStatus::Urban];

    pub fn label(self) -> &'static str {
        match self {
            UrbanStatus::Rural => "Rural",
            UrbanStatus::Urban => "Urban",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.label().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for UrbanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Liability and management style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessStructure {
    #[serde(rename = "Sole Trader")]
    SoleTrader,
    #[serde(rename = "Family Run")]
    FamilyRun,
    Cooperative,
}

impl BusinessStructure {
    pub const ALL: [BusinessStructure; 3] = [
        BusinessStructure::SoleTrader,
        BusinessStructure::FamilyRun,
        BusinessStructure::Cooperative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BusinessStructure::SoleTrader => "Sole Trader",
            BusinessStructure::FamilyRun => "Family Run",
            BusinessStructure::Cooperative => "Cooperative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.label().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for BusinessStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A choice the player is previewing but has not accepted yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDecision {
    /// Week of the scripted decision.
    pub week: u32,
    /// Index into that decision's choices.
    pub choice_index: usize,
}

/// Farm state for a single play-through; the sole unit of persistence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmState {
    /// Farm name, fixed once phase 0 is confirmed.
    pub farm_name: Option<String>,
    /// Current week (0 before the season opens).
    pub week: u32,
    pub status: Status,
    /// Setup phase in `0..=4`.
    pub setup_phase: u8,
    /// Key into the location table.
    pub location: Option<String>,
    pub farm_type: Option<FarmType>,
    pub business_structure: Option<BusinessStructure>,
    pub urban_status: Option<UrbanStatus>,
    /// Cash on hand; may go negative.
    pub money: i64,
    /// Outstanding loans (>= 0).
    pub debt: i64,
    pub environment: i64,
    pub health_risk: i64,
    pub hidden_stress: i64,
    pub infrastructure_level: i64,
    pub climate_resilience: i64,
    /// Not range-checked; seeded from the location's base pest risk.
    pub hidden_pest_risk: i64,
    pub pending_decision: Option<PendingDecision>,
    /// Cursor over the current decision's choices.
    pub current_decision_index: usize,
    /// Copied from the location when the season starts.
    pub development_status: String,
}

impl Default for FarmState {
    fn default() -> Self {
        Self {
            farm_name: None,
            week: 0,
            status: Status::Setup,
            setup_phase: 0,
            location: None,
            farm_type: None,
            business_structure: None,
            urban_status: None,
            money: DEFAULT_STARTING_CAPITAL,
            debt: 0,
            environment: 50,
            health_risk: 10,
            hidden_stress: 0,
            infrastructure_level: 20,
            climate_resilience: 10,
            hidden_pest_risk: 0,
            pending_decision: None,
            current_decision_index: 0,
            development_status: "N/A".to_string(),
        }
    }
}

impl FarmState {
    /// Read a metric by name.
    pub fn metric(&self, metric: Metric) -> i64 {
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

    /// Force every bounded metric back into `[0, 100]`.
    pub fn clamp_bounded(&mut self) {
        self.environment = clamp_metric(self.environment);
        self.health_risk = clamp_metric(self.health_risk);
        self.hidden_stress = clamp_metric(self.hidden_stress);
        self.infrastructure_level = clamp_metric(self.infrastructure_level);
        self.climate_resilience = clamp_metric(self.climate_resilience);
    }

    /// True when name, location, farm type and business structure are all set.
    pub fn is_setup_complete(&self) -> bool {
        self.farm_name.as_deref().is_some_and(|n| !n.trim().is_empty())
            && self.location.is_some()
            && self.farm_type.is_some()
            && self.business_structure.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::End
    }

    /// Display name, falling back to a placeholder during setup.
    pub fn display_name(&self) -> &str {
        self.farm_name.as_deref().unwrap_or("FARMING SIMULATOR")
    }
}
