use std::collections::BTreeSet;

use crease_types::{
    BallEvent, CreditSource, Innings, MatchTeam, PlayerId, StatLine, StatsCredit,
};
use serde::{Deserialize, Serialize};

/// Who is credited with a match and an innings when an innings closes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsCreditPolicy {
    /// Every roster member of the batting side, whether or not they batted.
    #[default]
    Roster,
    /// Only batters who faced at least one legal delivery in the innings.
    FacedBall,
}

/// Statistics lines contributed by one committed ball.
///
/// The batter gets bat runs, a ball faced for a legal delivery, and a four
/// or six when the bat runs are exactly 4 or 6. The bowler concedes the
/// event total, bowls a ball for a legal delivery, and takes a wicket only
/// for bowler-credited dismissals.
pub fn ball_credit(event: &BallEvent) -> StatsCredit {
    let legal = u32::from(event.is_legal_delivery());
    let batter = StatLine {
        runs: event.runs_scored,
        balls_faced: legal,
        fours: u32::from(event.runs_scored == 4),
        sixes: u32::from(event.runs_scored == 6),
        ..StatLine::default()
    };
    let bowler = StatLine {
        runs_conceded: event.total_runs(),
        balls_bowled: legal,
        wickets: u32::from(event.credits_bowler_wicket()),
        ..StatLine::default()
    };

    let mut lines = Vec::with_capacity(2);
    push_line(&mut lines, &event.batter, batter);
    push_line(&mut lines, &event.bowler, bowler);
    StatsCredit {
        source: CreditSource::Ball(event.id),
        lines,
    }
}

/// Match and innings credit for the batting side of a closed innings.
pub fn innings_credit(
    innings: &Innings,
    roster: &[MatchTeam],
    events: &[BallEvent],
    policy: InningsCreditPolicy,
) -> StatsCredit {
    let line = StatLine {
        matches: 1,
        innings: 1,
        ..StatLine::default()
    };
    let players: BTreeSet<&PlayerId> = match policy {
        InningsCreditPolicy::Roster => roster
            .iter()
            .filter(|m| m.match_id == innings.match_id && m.side == innings.batting_side)
            .map(|m| &m.player)
            .collect(),
        InningsCreditPolicy::FacedBall => events
            .iter()
            .filter(|e| e.innings_id == innings.id && e.is_legal_delivery())
            .map(|e| &e.batter)
            .collect(),
    };

    StatsCredit {
        source: CreditSource::InningsClosed(innings.id),
        lines: players.into_iter().map(|p| (p.clone(), line)).collect(),
    }
}

fn push_line(lines: &mut Vec<(PlayerId, StatLine)>, player: &PlayerId, line: StatLine) {
    if line.is_empty() {
        return;
    }
    match lines.iter_mut().find(|(p, _)| p == player) {
        Some((_, existing)) => existing.merge(&line),
        None => lines.push((player.clone(), line)),
    }
}
