#![deny(warnings)]

//! Headless CLI: sets up a farm and autoplays one season.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use farm_ai::Strategy;
use farm_core::{BusinessStructure, Catalog, FarmType, GameConfig, UrbanStatus};
use farm_runtime::{pacing, Session, SetupChoice, SetupOutcome, TurnReport, WeekView};
use persistence::{JsonFileStore, MemoryStore, SqliteStore, StateStore, DEFAULT_SLOT};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    scenario: Option<PathBuf>,
    seed: Option<u64>,
    strategy: Option<String>,
    name: Option<String>,
    location: Option<String>,
    farm_type: Option<String>,
    urban: bool,
    structure: Option<String>,
    save: Option<PathBuf>,
    sqlite: Option<String>,
    paced: bool,
    json: bool,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = it.next().map(PathBuf::from),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--strategy" => args.strategy = it.next(),
            "--name" => args.name = it.next(),
            "--location" => args.location = it.next(),
            "--farm-type" => args.farm_type = it.next(),
            "--urban" => args.urban = true,
            "--structure" => args.structure = it.next(),
            "--save" => args.save = it.next().map(PathBuf::from),
            "--sqlite" => args.sqlite = it.next(),
            "--paced" => args.paced = true,
            "--json" => args.json = true,
            _ => {}
        }
    }
    args
}

/// Pick the save backend. A store that cannot be opened leaves the season
/// playable in memory.
fn open_store(args: &Args) -> Box<dyn StateStore> {
    if let Some(url) = &args.sqlite {
        match SqliteStore::open(url, DEFAULT_SLOT) {
            Ok(store) => return Box::new(store),
            Err(err) => {
                warn!(error = %err, "sqlite store unavailable; playing without saves");
                return Box::new(MemoryStore::new());
            }
        }
    }
    if let Some(path) = &args.save {
        return Box::new(JsonFileStore::new(path));
    }
    Box::new(MemoryStore::new())
}

fn load_game(args: &Args) -> Result<(Catalog, GameConfig)> {
    let (catalog, mut config) = match &args.scenario {
        Some(dir) => {
            let s = scenario::load_scenario(dir)
                .with_context(|| format!("loading scenario {}", dir.display()))?;
            println!("Scenario: {} ({})", s.meta.name, s.meta.id);
            (s.catalog, s.config)
        }
        None => (Catalog::builtin(), GameConfig::default()),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    if !args.paced {
        config = config.without_delay();
    }
    Ok((catalog, config))
}

fn run_setup(session: &mut Session, args: &Args) -> Result<()> {
    let location = match &args.location {
        Some(l) => l.clone(),
        None => session
            .catalog()
            .locations
            .first()
            .map(|l| l.key.clone())
            .ok_or_else(|| anyhow!("scenario has no locations"))?,
    };
    let farm_type = match &args.farm_type {
        Some(t) => FarmType::parse(t).ok_or_else(|| anyhow!("unknown farm type {t}"))?,
        None => FarmType::CropGrains,
    };
    let structure = match &args.structure {
        Some(b) => {
            BusinessStructure::parse(b).ok_or_else(|| anyhow!("unknown business structure {b}"))?
        }
        None => BusinessStructure::FamilyRun,
    };
    let urban = if args.urban {
        UrbanStatus::Urban
    } else {
        UrbanStatus::Rural
    };
    let name = args.name.as_deref().unwrap_or("Doom Acres");

    session.confirm_setup_phase(Some(name))?;
    session.stage(SetupChoice::Location(location))?;
    session.confirm_setup_phase(None)?;
    session.stage(SetupChoice::FarmType(farm_type))?;
    session.stage(SetupChoice::UrbanStatus(urban))?;
    session.confirm_setup_phase(None)?;
    session.stage(SetupChoice::BusinessStructure(structure))?;
    match session.confirm_setup_phase(None)? {
        SetupOutcome::Started(_) => {}
        SetupOutcome::Advanced(phase) => return Err(anyhow!("setup stuck at phase {phase}")),
    }

    let st = session.state();
    println!(
        "{} | {} | {} | {} | {}",
        st.display_name(),
        st.location.as_deref().unwrap_or("N/A"),
        farm_type,
        urban,
        structure
    );
    println!(
        "Start | money: ${} | debt: ${} | stress: {} | infra: {}% | resilience: {}%",
        farm_core::format_thousands(st.money),
        farm_core::format_thousands(st.debt),
        st.hidden_stress,
        st.infrastructure_level,
        st.climate_resilience
    );
    Ok(())
}

fn reveal(session: &mut Session, rt: Option<&tokio::runtime::Runtime>) -> Result<TurnReport> {
    if let Some(progress) = session.pending_turn().and_then(|t| t.progress.clone()) {
        println!("  {} {}...", progress.emoji, progress.text);
    }
    let report = match rt {
        Some(rt) => rt.block_on(pacing::play_out(session))?,
        None => session.finish_turn()?,
    };
    for msg in report.messages() {
        println!("  {msg}");
    }
    Ok(report)
}

fn play(session: &mut Session, strategy: Strategy, rt: Option<&tokio::runtime::Runtime>) -> Result<()> {
    loop {
        match session.view() {
            WeekView::Setup { .. } => return Err(anyhow!("setup is not finished")),
            WeekView::TurnInProgress { .. } => {}
            WeekView::Finished(_) => return Ok(()),
            WeekView::Decision(prompt) => {
                let decision = session
                    .catalog()
                    .decision_for_week(prompt.week)
                    .cloned()
                    .ok_or_else(|| anyhow!("decision for week {} vanished", prompt.week))?;
                println!("Week {} | {} | {}", prompt.week, prompt.category, prompt.prompt);
                let preview = session.select_option(prompt.week, strategy.choose(&decision))?;
                println!("  > {}", preview.text);
                println!("    {}", preview.narrative);
                if !preview.trade_offs.is_empty() {
                    println!("    TRADE-OFFS: {}", preview.trade_offs.join(", "));
                }
                let (done, _) = session.commit()?;
                info!(week = done.week, "{}", done.message());
            }
            WeekView::Monitoring(report) => {
                println!("{}", report.title());
                println!("  🐞 Observation: {}", report.observation);
                println!("  📋 Farm Report: {}", report.farm_report);
                session.advance_turn()?;
            }
        }
        reveal(session, rt)?;
    }
}

/// Console subscriber; `filter` alone decides what gets through.
fn log_subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing::subscriber::set_global_default(log_subscriber(filter))?;

    let args = parse_args();
    info!(
        git_sha = env!("GIT_SHA"),
        build_date = env!("BUILD_DATE"),
        ?args,
        "starting CLI"
    );
    let strategy = match &args.strategy {
        Some(s) => Strategy::parse(s).ok_or_else(|| anyhow!("unknown strategy {s}"))?,
        None => Strategy::default(),
    };

    let (catalog, config) = load_game(&args)?;
    let store = open_store(&args);
    let mut session = Session::new(Arc::new(catalog), config, store)?;
    if session.is_resumed() {
        let st = session.state();
        println!("Resumed {} at week {}", st.display_name(), st.week);
    } else {
        run_setup(&mut session, &args)?;
    }

    let rt = if args.paced {
        Some(
            tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?,
        )
    } else {
        None
    };
    play(&mut session, strategy, rt.as_ref())?;

    let report = session
        .report()
        .ok_or_else(|| anyhow!("season ended without a report"))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "FINAL | {} ({}) | legacy score: {} | rank: {} | NLI: {}%",
            report.farm_name,
            report.development_status,
            report.display_score(),
            report.legacy_rank,
            report.national_loss_index
        );
        println!(
            "      | profit: ${} | yield loss: ${} | resilience bonus: ${} | debt payoff: ${}",
            report.final_profit.round(),
            report.yield_penalty,
            report.resilience_bonus,
            report.final_debt_penalty.round()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_sqlite_falls_back_to_memory() {
        let args = Args {
            sqlite: Some("sqlite:///no-such-farm-dir/nested/season.db".into()),
            ..Args::default()
        };
        let (catalog, config) = load_game(&args).unwrap();
        let mut session = Session::new(Arc::new(catalog), config, open_store(&args)).unwrap();
        assert!(!session.is_resumed());

        run_setup(&mut session, &args).unwrap();
        play(&mut session, Strategy::default(), None).unwrap();
        assert!(session.state().is_over());
        assert!(session.report().is_some());
    }

    #[test]
    fn log_filter_is_not_overridden() {
        tracing::subscriber::with_default(log_subscriber(EnvFilter::new("error")), || {
            assert!(tracing::enabled!(tracing::Level::ERROR));
            assert!(!tracing::enabled!(tracing::Level::INFO));
            assert!(!tracing::enabled!(tracing::Level::DEBUG));
        });
        tracing::subscriber::with_default(log_subscriber(EnvFilter::new("info")), || {
            assert!(tracing::enabled!(tracing::Level::INFO));
            assert!(!tracing::enabled!(tracing::Level::DEBUG));
        });
    }

    #[test]
    fn no_backend_means_memory() {
        let mut store = open_store(&Args::default());
        assert!(store.load().unwrap().is_none());
    }
}
