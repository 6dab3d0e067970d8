use std::collections::BTreeMap;

use crease_store::StoreRead;
use crease_types::{
    BallEvent, Innings, InningsId, InningsStatus, Match, MatchId, OverPosition, PlayerId,
    TeamSide, WicketType,
};
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};

/// One batter's line on a scorecard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BattingLine {
    pub player: PlayerId,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub dismissal: Option<WicketType>,
    /// Bowler of the dismissing delivery.
    pub dismissed_by: Option<PlayerId>,
}

/// One bowler's line on a scorecard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BowlingLine {
    pub player: PlayerId,
    pub balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub wides: u32,
    pub no_balls: u32,
}

impl BowlingLine {
    pub fn overs(&self) -> OverPosition {
        OverPosition::from_legal_balls(self.balls)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExtrasLine {
    pub wides: u32,
    pub no_balls: u32,
}

impl ExtrasLine {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls
    }
}

/// Deliveries of one over, in ledger order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverSummary {
    pub over: u32,
    pub bowler: PlayerId,
    pub runs: u32,
    pub wickets: u32,
    pub deliveries: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FallOfWicket {
    pub wicket: u32,
    pub runs: u32,
    pub ball: String,
    pub player: PlayerId,
}

/// Full scorecard of one innings, rebuilt from its ledger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scorecard {
    pub innings: Innings,
    /// Batters in order of first appearance.
    pub batting: Vec<BattingLine>,
    /// Bowlers in order of first appearance.
    pub bowling: Vec<BowlingLine>,
    pub extras: ExtrasLine,
    pub overs: Vec<OverSummary>,
    pub fall_of_wickets: Vec<FallOfWicket>,
}

/// Headline figures of one innings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InningsLine {
    pub innings: InningsId,
    pub number: u32,
    pub batting_side: TeamSide,
    pub runs: u32,
    pub wickets: u32,
    pub overs: OverPosition,
    pub status: InningsStatus,
    pub balls_recorded: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MatchResult {
    WonByRuns { winner: TeamSide, margin: u32 },
    WonByWickets { winner: TeamSide, margin: u32 },
    Tied,
    NoResult,
}

/// Summary of a whole match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub team_a: String,
    pub team_b: String,
    pub innings: Vec<InningsLine>,
    pub total_balls: u32,
    pub result: MatchResult,
}

/// Deterministic projection builders.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn scorecard(innings: &Innings, events: &[BallEvent]) -> Scorecard {
        let mut batting: Vec<BattingLine> = Vec::new();
        let mut bowling: Vec<BowlingLine> = Vec::new();
        let mut extras = ExtrasLine::default();
        let mut overs: Vec<OverSummary> = Vec::new();
        let mut fall_of_wickets = Vec::new();
        let mut runs = 0u32;
        let mut wickets = 0u32;

        for event in events {
            let bat = batting_entry(&mut batting, &event.batter);
            bat.runs += event.runs_scored;
            if event.is_legal_delivery() {
                bat.balls += 1;
            }
            match event.runs_scored {
                4 => bat.fours += 1,
                6 => bat.sixes += 1,
                _ => {}
            }

            let bowl = bowling_entry(&mut bowling, &event.bowler);
            bowl.runs_conceded += event.total_runs();
            if event.is_legal_delivery() {
                bowl.balls += 1;
            }
            if event.credits_bowler_wicket() {
                bowl.wickets += 1;
            }
            if event.is_wide {
                bowl.wides += 1;
                extras.wides += event.extras;
            }
            if event.is_no_ball {
                bowl.no_balls += 1;
                extras.no_balls += event.extras;
            }

            runs += event.total_runs();
            if let Some(out) = event.dismissed_batter() {
                wickets += 1;
                let line = batting_entry(&mut batting, out);
                line.dismissal = event.wicket_type;
                line.dismissed_by = Some(event.bowler.clone());
                fall_of_wickets.push(FallOfWicket {
                    wicket: wickets,
                    runs,
                    ball: event.label(),
                    player: out.clone(),
                });
            }

            if overs.last().map_or(true, |o| o.over != event.over_number) {
                overs.push(OverSummary {
                    over: event.over_number,
                    bowler: event.bowler.clone(),
                    runs: 0,
                    wickets: 0,
                    deliveries: Vec::new(),
                });
            }
            if let Some(current) = overs.last_mut() {
                current.runs += event.total_runs();
                if event.is_wicket {
                    current.wickets += 1;
                }
                current.deliveries.push(event.display_text());
            }
        }

        Scorecard {
            innings: innings.clone(),
            batting,
            bowling,
            extras,
            overs,
            fall_of_wickets,
        }
    }

    /// Summarise a match from its innings in order of play.
    pub fn match_summary(record: &Match, innings: &[Innings], max_wickets: u32) -> MatchSummary {
        let lines: Vec<InningsLine> = innings
            .iter()
            .map(|i| InningsLine {
                innings: i.id,
                number: i.innings_number,
                batting_side: i.batting_side,
                runs: i.runs,
                wickets: i.wickets,
                overs: i.position,
                status: i.status,
                balls_recorded: i.balls_recorded,
            })
            .collect();

        MatchSummary {
            match_id: record.id,
            team_a: record.team_a_name.clone(),
            team_b: record.team_b_name.clone(),
            total_balls: lines.iter().map(|l| l.balls_recorded).sum(),
            result: decide_result(record, innings, max_wickets),
            innings: lines,
        }
    }

    pub fn scorecard_stored<R: StoreRead + ?Sized>(
        reader: &R,
        innings: &InningsId,
    ) -> LedgerResult<Scorecard> {
        let record = reader
            .get_innings(innings)?
            .ok_or(LedgerError::InningsNotFound(*innings))?;
        let events = reader.ball_events(innings)?;
        Ok(Self::scorecard(&record, &events))
    }
}

fn batting_entry<'a>(lines: &'a mut Vec<BattingLine>, player: &PlayerId) -> &'a mut BattingLine {
    let index = match lines.iter().position(|l| &l.player == player) {
        Some(index) => index,
        None => {
            lines.push(BattingLine {
                player: player.clone(),
                runs: 0,
                balls: 0,
                fours: 0,
                sixes: 0,
                dismissal: None,
                dismissed_by: None,
            });
            lines.len() - 1
        }
    };
    &mut lines[index]
}

fn bowling_entry<'a>(lines: &'a mut Vec<BowlingLine>, player: &PlayerId) -> &'a mut BowlingLine {
    let index = match lines.iter().position(|l| &l.player == player) {
        Some(index) => index,
        None => {
            lines.push(BowlingLine {
                player: player.clone(),
                balls: 0,
                runs_conceded: 0,
                wickets: 0,
                wides: 0,
                no_balls: 0,
            });
            lines.len() - 1
        }
    };
    &mut lines[index]
}

/// A chase that reaches its target wins by the wickets in hand. Otherwise,
/// once every innings the format allows has closed, the higher aggregate
/// wins by the run difference.
fn decide_result(record: &Match, innings: &[Innings], max_wickets: u32) -> MatchResult {
    let Some(last) = innings.last() else {
        return MatchResult::NoResult;
    };
    if last.status == InningsStatus::TargetChased {
        return MatchResult::WonByWickets {
            winner: last.batting_side,
            margin: max_wickets.saturating_sub(last.wickets),
        };
    }

    let all_played = innings.len() as u32 == record.format.max_innings()
        && innings.iter().all(Innings::is_complete);
    if !all_played {
        return MatchResult::NoResult;
    }

    let mut totals: BTreeMap<TeamSide, u32> = BTreeMap::new();
    for i in innings {
        *totals.entry(i.batting_side).or_default() += i.runs;
    }
    let a = totals.get(&TeamSide::A).copied().unwrap_or(0);
    let b = totals.get(&TeamSide::B).copied().unwrap_or(0);
    match a.cmp(&b) {
        std::cmp::Ordering::Greater => MatchResult::WonByRuns {
            winner: TeamSide::A,
            margin: a - b,
        },
        std::cmp::Ordering::Less => MatchResult::WonByRuns {
            winner: TeamSide::B,
            margin: b - a,
        },
        std::cmp::Ordering::Equal => MatchResult::Tied,
    }
}
