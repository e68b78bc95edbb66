#![deny(warnings)]

//! Scenario packs: a directory holding `scenario.yaml` that overrides the game
//! config and any of the reference tables.
//!
//! Tables a pack leaves out come from [`Catalog::builtin`]. Every loaded
//! catalog is validated before it is handed out.

use farm_core::{
    validate_catalog, Catalog, Decision, GameConfig, HeadlineRule, Location, ProgressMessage,
    RandomEvent, ValidationError,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

pub const SCENARIO_FILE: &str = "scenario.yaml";
/// Schema version this build understands.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid scenario file: {0}")]
    Yaml(String),
    #[error("unsupported schema version {found} (expected {})", SCHEMA_VERSION)]
    Schema { found: u32 },
    #[error("invalid catalog: {0}")]
    Invalid(#[from] ValidationError),
    #[error("no scenario named {0}")]
    NotFound(String),
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ScenarioError {
    fn from(e: serde_yaml::Error) -> Self {
        ScenarioError::Yaml(e.to_string())
    }
}

/// Header of a scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub schema_version: u32,
}

/// On-disk shape of `scenario.yaml`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioFile {
    meta: ScenarioMeta,
    #[serde(default)]
    config: Option<GameConfig>,
    #[serde(default)]
    locations: Option<Vec<Location>>,
    #[serde(default)]
    decisions: Option<Vec<Decision>>,
    #[serde(default)]
    random_events: Option<Vec<RandomEvent>>,
    #[serde(default)]
    headlines: Option<Vec<HeadlineRule>>,
    #[serde(default)]
    progress_messages: Option<Vec<ProgressMessage>>,
}

/// A validated scenario ready to play.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub meta: ScenarioMeta,
    pub dir: PathBuf,
    pub catalog: Catalog,
    pub config: GameConfig,
}

/// Parse a scenario document. Missing tables fall back to the built-in ones.
pub fn parse_scenario(text: &str) -> Result<(ScenarioMeta, Catalog, GameConfig), ScenarioError> {
    let file: ScenarioFile = serde_yaml::from_str(text)?;
    if file.meta.schema_version != SCHEMA_VERSION {
        return Err(ScenarioError::Schema {
            found: file.meta.schema_version,
        });
    }
    let base = Catalog::builtin();
    let catalog = Catalog {
        locations: file.locations.unwrap_or(base.locations),
        decisions: file.decisions.unwrap_or(base.decisions),
        random_events: file.random_events.unwrap_or(base.random_events),
        headlines: file.headlines.unwrap_or(base.headlines),
        progress_messages: file.progress_messages.unwrap_or(base.progress_messages),
    };
    validate_catalog(&catalog)?;
    Ok((file.meta, catalog, file.config.unwrap_or_default()))
}

/// Load the scenario stored in `dir`.
pub fn load_scenario<P: AsRef<Path>>(dir: P) -> Result<Scenario, ScenarioError> {
    let dir = dir.as_ref();
    let text = fs::read_to_string(dir.join(SCENARIO_FILE))?;
    let (meta, catalog, config) = parse_scenario(&text)?;
    info!(
        id = %meta.id,
        locations = catalog.locations.len(),
        decisions = catalog.decisions.len(),
        "scenario loaded"
    );
    Ok(Scenario {
        meta,
        dir: dir.to_path_buf(),
        catalog,
        config,
    })
}

/// Scenario packs found under one root directory, one per subdirectory.
pub struct ScenarioLibrary {
    root: PathBuf,
    packs: Vec<(Scenario, SystemTime)>,
}

impl ScenarioLibrary {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            packs: vec![],
        }
    }

    /// Scan the root. Directories without a scenario file are skipped.
    pub fn load_all(&mut self) -> Result<(), ScenarioError> {
        let entries = fs::read_dir(&self.root)?;
        self.packs.clear();
        for ent in entries {
            let ent = ent?;
            if !ent.file_type()?.is_dir() {
                continue;
            }
            let dir = ent.path();
            let file = dir.join(SCENARIO_FILE);
            if !file.exists() {
                continue;
            }
            let mtime = modified(&file)?;
            self.packs.push((load_scenario(&dir)?, mtime));
        }
        self.packs.sort_by(|a, b| a.0.meta.id.cmp(&b.0.meta.id));
        debug!(root = %self.root.display(), count = self.packs.len(), "scenario library scanned");
        Ok(())
    }

    /// Re-read any pack whose file changed since it was loaded.
    pub fn reload_if_changed(&mut self) -> Result<usize, ScenarioError> {
        let mut reloaded = 0;
        for (pack, loaded_at) in &mut self.packs {
            let mtime = modified(&pack.dir.join(SCENARIO_FILE))?;
            if mtime > *loaded_at {
                info!("Reloading scenario: {}", pack.meta.id);
                *pack = load_scenario(&pack.dir)?;
                *loaded_at = mtime;
                reloaded += 1;
            }
        }
        Ok(reloaded)
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.packs.iter().map(|(s, _)| s)
    }

    pub fn get(&self, id: &str) -> Result<&Scenario, ScenarioError> {
        self.scenarios()
            .find(|s| s.meta.id == id)
            .ok_or_else(|| ScenarioError::NotFound(id.to_string()))
    }
}

fn modified(path: &Path) -> Result<SystemTime, ScenarioError> {
    Ok(fs::metadata(path)?
        .modified()
        .unwrap_or(SystemTime::UNIX_EPOCH))
}
