#![deny(warnings)]

//! Season runtime: setup, weekly decisions, turn resolution and the session
//! that ties them to persistence.
//!
//! The free functions in [`setup`], [`decision`] and [`turn`] mutate a
//! [`FarmState`](farm_core::FarmState) directly and are deterministic given an
//! RNG. [`Session`] owns one play-through and is what a front-end talks to.

pub mod decision;
pub mod pacing;
pub mod session;
pub mod setup;
pub mod turn;
pub mod view;

pub use decision::CommittedChoice;
pub use session::{Session, SetupOutcome};
pub use setup::{SetupChoice, SetupProgress};
pub use turn::{NextStep, TurnEvent, TurnReport, TurnTicket};
pub use view::{DecisionPrompt, MonitoringReport, Preview, WeekView};

use farm_econ::EconError;
use thiserror::Error;

/// Recoverable rule failures. The state is unchanged whenever one is
/// returned; the message is meant for the player.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("Please enter a name for your farm.")]
    MissingName,
    #[error("Please click on a location box to select where you will farm.")]
    MissingLocation,
    #[error("Unknown location: {0}")]
    UnknownLocation(String),
    #[error("Please click one option for Production Type and one for Neighborhood Type.")]
    MissingProduction,
    #[error("Please click one option for Business Structure.")]
    MissingBusinessStructure,
    #[error("Please complete all setup steps before starting the season.")]
    SetupIncomplete,
    /// A selection was offered for a different setup phase.
    #[error("That option is not available in setup phase {0}.")]
    ChoiceNotOffered(u8),
    #[error("Setup is already finished.")]
    NotInSetup,
    #[error("The season is not running.")]
    SeasonNotActive,
    #[error("There is no decision to make in week {0}.")]
    NoDecision(u32),
    #[error("Week {requested} is not the current week ({current}).")]
    NotCurrentWeek { requested: u32, current: u32 },
    #[error("Option {index} does not exist; this decision has {count} options.")]
    ChoiceOutOfRange { index: usize, count: usize },
    #[error("Select an option to preview before accepting or browsing.")]
    NotPreviewing,
    #[error("Week {0} has a decision waiting; choose an option first.")]
    DecisionRequired(u32),
    #[error("Week {0} is still being revealed.")]
    TurnInProgress(u32),
    #[error("No turn is waiting to be revealed.")]
    NoTurnPending,
    #[error("invalid configuration: {0}")]
    Config(#[from] EconError),
}
