//! Text rendering of engine projections. JSON output goes straight through
//! `serde_json`.

use colored::Colorize;
use crease_engine::{
    EventKind, EventPayload, MatchResult, MatchSummary, RankingCategory, RankingEntry,
    ReplayResult, Scorecard, ScoreEvent, ValidationReport,
};
use crease_types::{InningsStatus, TeamSide};
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_scorecard(card: &Scorecard, team: &str) {
    let innings = &card.innings;
    println!(
        "{} {} {} ({} ov) {}",
        format!("Innings {}", innings.innings_number).bold(),
        team.cyan().bold(),
        innings.display_score().bold(),
        innings.display_overs(),
        status_label(innings.status),
    );
    if let Some(target) = innings.target {
        println!("  Target: {}", target.to_string().yellow());
    }

    println!("\n  {:<16} {:>4} {:>4} {:>3} {:>3}  {}", "Batter", "R", "B", "4s", "6s", "");
    for line in &card.batting {
        let how = match (&line.dismissal, &line.dismissed_by) {
            (Some(kind), Some(bowler)) => format!("{} b {}", kind.display_name(), bowler),
            (Some(kind), None) => kind.display_name().to_string(),
            (None, _) => "not out".green().to_string(),
        };
        println!(
            "  {:<16} {:>4} {:>4} {:>3} {:>3}  {}",
            line.player.as_str(),
            line.runs,
            line.balls,
            line.fours,
            line.sixes,
            how.dimmed()
        );
    }
    println!(
        "  Extras: {} (wd {}, nb {})",
        card.extras.total(),
        card.extras.wides,
        card.extras.no_balls
    );

    println!("\n  {:<16} {:>4} {:>4} {:>3} {:>3} {:>3}", "Bowler", "O", "R", "W", "Wd", "Nb");
    for line in &card.bowling {
        println!(
            "  {:<16} {:>4} {:>4} {:>3} {:>3} {:>3}",
            line.player.as_str(),
            line.overs().to_string(),
            line.runs_conceded,
            line.wickets,
            line.wides,
            line.no_balls
        );
    }

    if !card.fall_of_wickets.is_empty() {
        let falls: Vec<String> = card
            .fall_of_wickets
            .iter()
            .map(|f| format!("{}-{} ({}, {})", f.wicket, f.runs, f.player, f.ball))
            .collect();
        println!("\n  FoW: {}", falls.join(", "));
    }
    for over in &card.overs {
        println!(
            "  Over {:>2} {:<12} {}  {}",
            over.over + 1,
            over.bowler.as_str().dimmed(),
            over.deliveries.join(" "),
            format!("{} runs, {} wkts", over.runs, over.wickets).dimmed()
        );
    }
    println!();
}

pub fn print_summary(summary: &MatchSummary) {
    let team = |side: TeamSide| match side {
        TeamSide::A => summary.team_a.as_str(),
        TeamSide::B => summary.team_b.as_str(),
    };
    println!("{} v {}", summary.team_a.bold(), summary.team_b.bold());
    for line in &summary.innings {
        println!(
            "  {}. {:<16} {}/{} ({} ov)",
            line.number,
            team(line.batting_side),
            line.runs,
            line.wickets,
            line.overs
        );
    }
    let result = match &summary.result {
        MatchResult::WonByRuns { winner, margin } => {
            format!("{} won by {} runs", team(*winner), margin).green()
        }
        MatchResult::WonByWickets { winner, margin } => {
            format!("{} won by {} wickets", team(*winner), margin).green()
        }
        MatchResult::Tied => "Match tied".yellow(),
        MatchResult::NoResult => "No result".dimmed(),
    };
    println!("{} {}", "Result:".bold(), result.bold());
}

pub fn print_rankings(entries: &[RankingEntry], category: RankingCategory) {
    if entries.is_empty() {
        println!("No players to rank.");
        return;
    }
    println!("{} {}", "Rankings by".bold(), category.to_string().cyan().bold());
    for entry in entries {
        let value = match category {
            RankingCategory::Average => format!("{:.2}", entry.value),
            _ => format!("{}", entry.value),
        };
        println!(
            "  {:>3}. {:<16} {:>8}  {}",
            entry.rank,
            entry.player.as_str(),
            value.bold(),
            format!(
                "{} inns, {} balls faced, {} balls bowled",
                entry.stats.innings, entry.stats.balls_faced, entry.stats.balls_bowled
            )
            .dimmed()
        );
    }
}

pub fn print_verification(report: &ValidationReport, replay: &ReplayResult) {
    let mark = if report.is_valid() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!(
        "{} Innings {} ({} events)",
        mark,
        report.innings.short_id().yellow(),
        report.event_count
    );
    println!("  Sequence: {}", check(report.sequence_gapless, "gapless"));
    println!("  Slots: {}", check(report.slots_consistent, "consistent"));
    println!("  Counters: {}", check(report.counters_match, "match ledger"));
    println!(
        "  Replay: {}/{} after {} legal balls, {}",
        replay.tally.runs,
        replay.tally.wickets,
        replay.tally.legal_balls,
        status_label(replay.status)
    );
    for violation in &report.violations {
        println!("    {} #{}: {}", "!".red(), violation.seq, violation.description);
    }
}

/// One line of live commentary for a published event.
pub fn print_event(event: &ScoreEvent) {
    let detail = match &event.payload {
        EventPayload::Ball { ball, innings } => format!(
            "{} {}  {} ({} ov)",
            ball.label(),
            ball.display_text(),
            innings.display_score(),
            innings.display_overs()
        ),
        EventPayload::Innings { innings } => format!(
            "innings {} {} {}",
            innings.innings_number,
            innings.display_score(),
            status_label(innings.status)
        ),
        EventPayload::Match { record } => {
            format!("{} v {} [{:?}]", record.team_a_name, record.team_b_name, record.status)
        }
        EventPayload::Transfer { transfer } => {
            format!("{} -> {} [{:?}]", transfer.from_user, transfer.to_user, transfer.status)
        }
    };
    let kind = event.kind.to_string();
    let kind = match event.kind {
        EventKind::BallUndone => kind.red(),
        EventKind::InningsClosed => kind.green().bold(),
        _ => kind.blue(),
    };
    println!("{:>4} {:<20} {}", event.seq.to_string().dimmed(), kind, detail);
}

fn status_label(status: InningsStatus) -> colored::ColoredString {
    match status {
        InningsStatus::InProgress => status.as_str().yellow(),
        InningsStatus::NotStarted => status.as_str().dimmed(),
        _ => status.as_str().green(),
    }
}

fn check(ok: bool, label: &str) -> colored::ColoredString {
    if ok {
        label.green()
    } else {
        "failed".red()
    }
}
