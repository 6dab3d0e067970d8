use anyhow::{bail, Context};
use colored::Colorize;
use crease_engine::{EngineConfig, EventFilter, InMemoryStore, ScoreStore, ScoringEngine};
use serde::Serialize;
use tracing::info;

use crate::cli::*;
use crate::output;
use crate::script::{self, PlayedMatch};
use crate::simulate::simulate;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = ScoringEngine::new(InMemoryStore::new(), config)?;
    let format = cli.format;

    match cli.command {
        Command::Score(args) => cmd_score(&engine, args, format),
        Command::Simulate(args) => cmd_simulate(&engine, args, format),
        Command::Rankings(args) => cmd_rankings(&engine, args, format),
        Command::Verify(args) => cmd_verify(&engine, args, format),
    }
}

fn cmd_score<S: ScoreStore>(
    engine: &ScoringEngine<S>,
    args: ScoreArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let script = script::load(&args.script)?;
    let played = if args.commentary && format == OutputFormat::Text {
        let mut stream = engine.subscribe(EventFilter::default())?;
        script::play(engine, &script, || {
            while let Ok(event) = stream.try_recv() {
                output::print_event(&event);
            }
        })?
    } else {
        script::play(engine, &script, || {})?
    };
    info!(match_id = %played.match_id, innings = played.innings.len(), "script played");
    print_match(engine, &played, format)
}

fn cmd_simulate<S: ScoreStore>(
    engine: &ScoringEngine<S>,
    args: SimulateArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let played = simulate(engine, args.overs, args.seed, args.players)?;
    info!(seed = args.seed, overs = args.overs, "simulated match");
    print_match(engine, &played, format)
}

fn cmd_rankings<S: ScoreStore>(
    engine: &ScoringEngine<S>,
    args: RankingsArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let script = script::load(&args.script)?;
    script::play(engine, &script, || {})?;
    let entries = engine.rankings(args.category, args.limit)?;
    match format {
        OutputFormat::Json => output::print_json(&entries),
        OutputFormat::Text => {
            output::print_rankings(&entries, args.category);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct Verification {
    report: crease_engine::ValidationReport,
    replay: crease_engine::ReplayResult,
}

fn cmd_verify<S: ScoreStore>(
    engine: &ScoringEngine<S>,
    args: VerifyArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let script = script::load(&args.script)?;
    let played = script::play(engine, &script, || {})?;

    let mut results = Vec::with_capacity(played.innings.len());
    for id in &played.innings {
        results.push(Verification {
            report: engine.validate_ledger(*id)?,
            replay: engine.replay_innings(*id)?,
        });
    }
    match format {
        OutputFormat::Json => output::print_json(&results)?,
        OutputFormat::Text => {
            for v in &results {
                output::print_verification(&v.report, &v.replay);
            }
        }
    }

    let broken = results.iter().filter(|v| !v.report.is_valid()).count();
    if broken > 0 {
        bail!("{broken} innings ledger(s) failed verification");
    }
    if format == OutputFormat::Text {
        println!("{} All ledgers verified", "✓".green().bold());
    }
    Ok(())
}

fn print_match<S: ScoreStore>(
    engine: &ScoringEngine<S>,
    played: &PlayedMatch,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let record = engine.match_record(played.match_id)?;
    let mut cards = Vec::with_capacity(played.innings.len());
    for id in &played.innings {
        cards.push(engine.scorecard(*id)?);
    }
    let summary = match &played.summary {
        Some(summary) => summary.clone(),
        None => engine.match_summary(played.match_id)?,
    };

    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Report<'a> {
                scorecards: &'a [crease_engine::Scorecard],
                summary: &'a crease_engine::MatchSummary,
            }
            output::print_json(&Report {
                scorecards: &cards,
                summary: &summary,
            })
        }
        OutputFormat::Text => {
            for card in &cards {
                output::print_scorecard(card, record.team_name(card.innings.batting_side));
            }
            output::print_summary(&summary);
            Ok(())
        }
    }
}
