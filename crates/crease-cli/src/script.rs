//! JSON match scripts: a match setup followed by the innings to play,
//! each a list of scoring steps.

use std::path::Path;

use anyhow::Context;
use crease_engine::{MatchSummary, NewMatch, NewMember, ScoreStore, ScoringEngine};
use crease_types::{Delivery, InningsId, MatchId, Player, PlayerId, TeamSide, Toss, UserId};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchScript {
    /// User that creates the match and scores it until a handoff.
    pub scorer: UserId,
    #[serde(rename = "match")]
    pub setup: NewMatch,
    #[serde(default)]
    pub toss: Option<Toss>,
    /// Players to register before the match.
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub roster: Vec<NewMember>,
    #[serde(default)]
    pub innings: Vec<InningsScript>,
    /// Close the match once every innings has been played.
    #[serde(default)]
    pub complete: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InningsScript {
    /// Batting side. Defaults to the toss result for the first innings and
    /// to the side that did not bat last afterwards.
    #[serde(default)]
    pub batting: Option<TeamSide>,
    /// Start as the final-innings chase with an engine-computed target.
    #[serde(default)]
    pub chase: bool,
    #[serde(default)]
    pub target: Option<u32>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Ball(Delivery),
    Undo,
    Batters {
        striker: PlayerId,
        non_striker: PlayerId,
    },
    Bowler {
        bowler: PlayerId,
    },
    /// Hand scoring rights to another user, who accepts at once.
    Handoff {
        to: UserId,
    },
}

/// What a played script left behind.
#[derive(Clone, Debug)]
pub struct PlayedMatch {
    pub match_id: MatchId,
    pub innings: Vec<InningsId>,
    /// Present when the script completed the match.
    pub summary: Option<MatchSummary>,
}

pub fn load(path: &Path) -> anyhow::Result<MatchScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid script {}", path.display()))
}

pub fn parse(content: &str) -> anyhow::Result<MatchScript> {
    Ok(serde_json::from_str(content)?)
}

/// Drive `script` through `engine`. `after_step` runs after every committed
/// operation.
pub fn play<S: ScoreStore>(
    engine: &ScoringEngine<S>,
    script: &MatchScript,
    mut after_step: impl FnMut(),
) -> anyhow::Result<PlayedMatch> {
    for player in &script.players {
        engine
            .register_player(player.clone())
            .with_context(|| format!("registering player {}", player.id))?;
    }
    let mut scorer = script.scorer.clone();
    let record = engine.create_match(&scorer, script.setup.clone())?;
    if let Some(toss) = script.toss {
        engine.set_toss(&scorer, record.id, toss)?;
    }
    for member in &script.roster {
        engine
            .add_player_to_team(&scorer, record.id, member.clone())
            .with_context(|| format!("adding {} to side {}", member.player, member.side))?;
    }
    after_step();

    let mut played = Vec::with_capacity(script.innings.len());
    let mut last_side: Option<TeamSide> = None;
    for (n, plan) in script.innings.iter().enumerate() {
        let started = if plan.chase {
            engine.start_chase(&scorer, record.id)
        } else {
            let side = plan.batting.unwrap_or_else(|| match last_side {
                Some(side) => side.opposite(),
                None => script.toss.map_or(TeamSide::A, |t| t.batting_first()),
            });
            engine.start_innings(&scorer, record.id, side, plan.target)
        };
        let innings = started.with_context(|| format!("starting innings {}", n + 1))?;
        after_step();

        for (i, step) in plan.steps.iter().enumerate() {
            apply_step(engine, &mut scorer, record.id, innings.id, step)
                .with_context(|| format!("innings {}, step {}", n + 1, i + 1))?;
            after_step();
        }
        last_side = Some(innings.batting_side);
        played.push(innings.id);
    }

    let summary = if script.complete {
        let summary = engine.complete_match(&scorer, record.id)?;
        after_step();
        Some(summary)
    } else {
        None
    };

    Ok(PlayedMatch {
        match_id: record.id,
        innings: played,
        summary,
    })
}

fn apply_step<S: ScoreStore>(
    engine: &ScoringEngine<S>,
    scorer: &mut UserId,
    match_id: MatchId,
    innings: InningsId,
    step: &Step,
) -> anyhow::Result<()> {
    match step {
        Step::Ball(delivery) => {
            engine.record_ball(scorer, innings, delivery.clone(), None)?;
        }
        Step::Undo => {
            engine.undo_last_ball(scorer, innings)?;
        }
        Step::Batters {
            striker,
            non_striker,
        } => {
            engine.set_batters(scorer, innings, striker.clone(), non_striker.clone())?;
        }
        Step::Bowler { bowler } => {
            engine.set_bowler(scorer, innings, bowler.clone())?;
        }
        Step::Handoff { to } => {
            let transfer = engine.transfer_match(scorer, match_id, to.clone())?;
            engine.accept_transfer(to, transfer.id)?;
            *scorer = to.clone();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crease_engine::{EngineConfig, InMemoryStore, MatchResult};
    use crease_types::InningsStatus;

    use super::*;

    const FRIENDLY: &str = include_str!("../../../demos/friendly.json");

    fn engine() -> ScoringEngine<InMemoryStore> {
        ScoringEngine::new(InMemoryStore::new(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn demo_script_plays_to_a_result() {
        let script = parse(FRIENDLY).unwrap();
        let engine = engine();
        let mut steps = 0;
        let played = play(&engine, &script, || steps += 1).unwrap();

        assert_eq!(played.innings.len(), 2);
        assert!(steps > 20);
        let summary = played.summary.unwrap();
        assert!(matches!(
            summary.result,
            MatchResult::WonByWickets {
                winner: TeamSide::B,
                ..
            }
        ));
        let chase = engine.innings(played.innings[1]).unwrap();
        assert_eq!(chase.status, InningsStatus::TargetChased);
        assert_eq!(
            engine.match_record(played.match_id).unwrap().current_scorer,
            UserId::new("umpire").unwrap()
        );
    }

    #[test]
    fn undo_steps_leave_no_trace_in_the_ledger() {
        let script = parse(
            r#"{
                "scorer": "s",
                "match": { "team_a_name": "X", "team_b_name": "Y" },
                "players": [ { "id": "p", "name": "P" }, { "id": "q", "name": "Q" } ],
                "innings": [ { "steps": [
                    { "ball": { "batter": "p", "bowler": "q", "runs_scored": 4 } },
                    { "ball": { "batter": "p", "bowler": "q", "is_wide": true } },
                    "undo",
                    { "ball": { "batter": "p", "bowler": "q", "runs_scored": 1 } }
                ] } ]
            }"#,
        )
        .unwrap();
        let engine = engine();
        let played = play(&engine, &script, || {}).unwrap();
        let events = engine.ball_events(played.innings[0]).unwrap();
        let seqs: Vec<u32> = events.iter().map(|e| e.ball_sequence).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert_eq!(engine.innings(played.innings[0]).unwrap().runs, 5);
        assert!(played.summary.is_none());
    }

    #[test]
    fn failing_step_is_located() {
        let script = parse(
            r#"{
                "scorer": "s",
                "match": { "team_a_name": "X", "team_b_name": "Y" },
                "innings": [ { "steps": [ "undo" ] } ]
            }"#,
        )
        .unwrap();
        let err = play(&engine(), &script, || {}).unwrap_err();
        assert!(format!("{err:#}").contains("innings 1, step 1"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse(r#"{ "scorer": "s", "match": { "team_a_name": "X", "team_b_name": "Y" }, "overs": 3 }"#);
        assert!(err.is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("friendly.json");
        std::fs::write(&path, FRIENDLY).unwrap();
        assert_eq!(load(&path).unwrap().innings.len(), 2);
        assert!(load(&dir.path().join("missing.json")).is_err());
    }
}
