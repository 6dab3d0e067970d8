use chrono::Utc;
use crease_fabric::{EventKind, EventPayload};
use crease_gate::{ScoringAction, ScoringProposal};
use crease_ledger::{CompletionRules, InningsMachine, ReplayEngine};
use crease_stats::{ball_credit, innings_credit, StatsAggregator};
use crease_store::{ScoreStore, StoreTx};
use crease_types::{
    BallEvent, CreditSource, Delivery, Innings, InningsId, MatchId, PlayerId,
    TeamSide, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{load_innings, load_match, require_ongoing, require_scorer, ScoringEngine};
use crate::error::{EngineError, EngineResult};

/// Result of a committed `record_ball`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallOutcome {
    pub event: BallEvent,
    /// The innings after the ball was applied.
    pub innings: Innings,
    /// Whether this ball moved the innings to a terminal status.
    pub closed: bool,
}

/// Result of a committed `undo_last_ball`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoOutcome {
    pub removed: BallEvent,
    /// The innings recomputed from the remaining ledger.
    pub innings: Innings,
    /// Whether the removed ball had closed the innings.
    pub reopened: bool,
}

impl<S: ScoreStore> ScoringEngine<S> {
    // ---- Innings lifecycle ----

    /// Open the next innings of a match with `side` batting.
    ///
    /// Fails if another innings of the match is still in progress, if the
    /// format allows no further innings, or if the match is over.
    pub fn start_innings(
        &self,
        caller: &UserId,
        match_id: MatchId,
        side: TeamSide,
        target: Option<u32>,
    ) -> EngineResult<Innings> {
        let innings = self
            .store
            .transact(|tx| -> EngineResult<Innings> {
                self.begin_innings(tx, caller, match_id, side, target)
            })?;
        self.announce_start(&innings);
        Ok(innings)
    }

    /// Open the final innings of a match as a chase: the side that did not
    /// bat last bats, needing one run more than the aggregate lead against
    /// it.
    pub fn start_chase(&self, caller: &UserId, match_id: MatchId) -> EngineResult<Innings> {
        let innings = self.store.transact(|tx| -> EngineResult<Innings> {
            let record = load_match(&*tx, &match_id)?;
            let played = tx.innings_for_match(&match_id)?;
            let Some(last) = played.last() else {
                return Err(EngineError::Validation(format!(
                    "match {match_id} has no innings to chase"
                )));
            };
            let final_number = record.format.max_innings();
            if played.len() as u32 + 1 != final_number {
                return Err(EngineError::Validation(format!(
                    "only innings {final_number} chases a target, next is innings {}",
                    played.len() + 1
                )));
            }
            let side = last.batting_side.opposite();
            let aggregate = |s: TeamSide| -> u32 {
                played
                    .iter()
                    .filter(|i| i.batting_side == s)
                    .map(|i| i.runs)
                    .sum()
            };
            let target = aggregate(side.opposite())
                .saturating_sub(aggregate(side))
                .saturating_add(1);
            self.begin_innings(tx, caller, match_id, side, Some(target))
        })?;
        self.announce_start(&innings);
        Ok(innings)
    }

    fn begin_innings(
        &self,
        tx: &mut dyn StoreTx,
        caller: &UserId,
        match_id: MatchId,
        side: TeamSide,
        target: Option<u32>,
    ) -> EngineResult<Innings> {
        let record = load_match(&*tx, &match_id)?;
        require_scorer(&record, caller)?;
        require_ongoing(&record)?;
        if target == Some(0) {
            return Err(EngineError::Validation("target must be at least 1".into()));
        }

        let existing = tx.innings_for_match(&match_id)?;
        if let Some(open) = existing.iter().find(|i| !i.is_complete()) {
            return Err(EngineError::Validation(format!(
                "innings {} of match {match_id} is still in progress",
                open.innings_number
            )));
        }
        let number = existing.len() as u32 + 1;
        if number > record.format.max_innings() {
            return Err(EngineError::Validation(format!(
                "match {match_id} allows {} innings",
                record.format.max_innings()
            )));
        }

        let innings = Innings::start(match_id, side, number, target);
        tx.put_innings(innings.clone())?;
        Ok(innings)
    }

    fn announce_start(&self, innings: &Innings) {
        info!(
            match_id = %innings.match_id,
            innings = innings.innings_number,
            side = %innings.batting_side,
            target = ?innings.target,
            "innings started"
        );
        self.publish(
            innings.match_id,
            Some(innings.id),
            EventKind::InningsStarted,
            EventPayload::Innings {
                innings: innings.clone(),
            },
        );
    }

    // ---- Ball ledger ----

    /// Append one delivery to an innings.
    ///
    /// The ledger append, the innings counters, the per-ball statistics and
    /// (when the ball ends the innings) the innings credit commit together.
    /// With `expected_sequence` set, the call fails with
    /// [`EngineError::Consistency`] unless the ball would receive exactly
    /// that sequence number, which makes a retry after an unknown outcome
    /// safe.
    pub fn record_ball(
        &self,
        caller: &UserId,
        innings_id: InningsId,
        delivery: Delivery,
        expected_sequence: Option<u32>,
    ) -> EngineResult<BallOutcome> {
        let mut proposal = ScoringProposal::new(
            caller.clone(),
            innings_id,
            ScoringAction::RecordBall(delivery.clone()),
        );
        if let Some(seq) = expected_sequence {
            proposal = proposal.fenced(seq);
        }

        let now = Utc::now();
        let outcome = self.store.transact(|tx| -> EngineResult<BallOutcome> {
            let mut innings = load_innings(&*tx, &innings_id)?;
            let record = load_match(&*tx, &innings.match_id)?;
            let mut known = Vec::with_capacity(3);
            for player in delivery_players(&delivery) {
                if tx.get_player(player)?.is_some() {
                    known.push(player.clone());
                }
            }
            self.admit(&proposal, record.clone(), innings.clone(), known)?;

            let rules = CompletionRules::for_format(&record.format, self.config.max_wickets);
            let event = InningsMachine::stamp(&innings, &delivery, &record.format, now)?;
            let transition = InningsMachine::apply(&mut innings, &event, &rules)?;
            tx.append_ball(event.clone())?;
            tx.put_innings(innings.clone())?;

            StatsAggregator::apply(tx, ball_credit(&event), now)?;
            if transition.closed() {
                let roster = tx.team_members(&innings.match_id)?;
                let events = tx.ball_events(&innings.id)?;
                let credit = innings_credit(&innings, &roster, &events, self.config.innings_credit);
                StatsAggregator::apply(tx, credit, now)?;
            }

            Ok(BallOutcome {
                event,
                innings,
                closed: transition.closed(),
            })
        })?;

        let innings = &outcome.innings;
        debug!(
            innings = %innings.id,
            seq = outcome.event.ball_sequence,
            ball = %outcome.event.label(),
            score = %innings.display_score(),
            "ball recorded"
        );
        self.publish(
            innings.match_id,
            Some(innings.id),
            EventKind::BallRecorded,
            EventPayload::Ball {
                ball: outcome.event.clone(),
                innings: innings.clone(),
            },
        );
        if outcome.closed {
            info!(
                innings = %innings.id,
                status = %innings.status,
                score = %innings.display_score(),
                overs = %innings.display_overs(),
                "innings closed"
            );
            self.publish(
                innings.match_id,
                Some(innings.id),
                EventKind::InningsClosed,
                EventPayload::Innings {
                    innings: innings.clone(),
                },
            );
        }
        Ok(outcome)
    }

    /// Remove the last ball of an innings and recompute its counters from
    /// the remaining ledger.
    ///
    /// The innings returns to `in_progress` even if the removed ball had
    /// closed it. The ball's statistics, and the innings credit it
    /// triggered, are reversed in the same transaction. Undo is refused
    /// once a later innings of the match has started, whatever its status.
    pub fn undo_last_ball(&self, caller: &UserId, innings_id: InningsId) -> EngineResult<UndoOutcome> {
        let proposal = ScoringProposal::new(caller.clone(), innings_id, ScoringAction::UndoLastBall);
        let now = Utc::now();
        let outcome = self.store.transact(|tx| -> EngineResult<UndoOutcome> {
            let mut innings = load_innings(&*tx, &innings_id)?;
            let record = load_match(&*tx, &innings.match_id)?;
            self.admit(&proposal, record, innings.clone(), Vec::new())?;

            // Only the latest innings of a match can be rewound.
            let later = tx
                .innings_for_match(&innings.match_id)?
                .into_iter()
                .filter(|i| i.innings_number > innings.innings_number)
                .max_by_key(|i| i.innings_number);
            if let Some(other) = later {
                return Err(EngineError::Validation(format!(
                    "innings {} has already started ({})",
                    other.innings_number, other.status
                )));
            }

            let removed = tx
                .pop_ball(&innings.id)?
                .ok_or_else(|| EngineError::NotFound(format!("no ball to undo in innings {innings_id}")))?;
            if removed.ball_sequence != innings.balls_recorded {
                return Err(EngineError::Consistency(format!(
                    "ledger ends at sequence {} but innings records {} balls",
                    removed.ball_sequence, innings.balls_recorded
                )));
            }

            let reopened = innings.is_complete();
            let remaining = tx.ball_events(&innings.id)?;
            ReplayEngine::rewind(&mut innings, &remaining);
            tx.put_innings(innings.clone())?;

            StatsAggregator::revert(tx, &CreditSource::Ball(removed.id), now)?;
            StatsAggregator::revert(tx, &CreditSource::InningsClosed(innings.id), now)?;

            Ok(UndoOutcome {
                removed,
                innings,
                reopened,
            })
        })?;

        let innings = &outcome.innings;
        info!(
            innings = %innings.id,
            seq = outcome.removed.ball_sequence,
            reopened = outcome.reopened,
            "ball undone"
        );
        self.publish(
            innings.match_id,
            Some(innings.id),
            EventKind::BallUndone,
            EventPayload::Ball {
                ball: outcome.removed.clone(),
                innings: innings.clone(),
            },
        );
        Ok(outcome)
    }

    // ---- Lineup ----

    pub fn set_batters(
        &self,
        caller: &UserId,
        innings_id: InningsId,
        striker: PlayerId,
        non_striker: PlayerId,
    ) -> EngineResult<Innings> {
        let action = ScoringAction::SetBatters {
            striker: striker.clone(),
            non_striker: non_striker.clone(),
        };
        self.change_lineup(caller, innings_id, action, move |innings| {
            innings.striker = Some(striker);
            innings.non_striker = Some(non_striker);
        })
    }

    pub fn set_bowler(
        &self,
        caller: &UserId,
        innings_id: InningsId,
        bowler: PlayerId,
    ) -> EngineResult<Innings> {
        let action = ScoringAction::SetBowler {
            bowler: bowler.clone(),
        };
        self.change_lineup(caller, innings_id, action, move |innings| {
            innings.bowler = Some(bowler);
        })
    }

    fn change_lineup(
        &self,
        caller: &UserId,
        innings_id: InningsId,
        action: ScoringAction,
        assign: impl FnOnce(&mut Innings),
    ) -> EngineResult<Innings> {
        let proposal = ScoringProposal::new(caller.clone(), innings_id, action);
        let innings = self.store.transact(|tx| -> EngineResult<Innings> {
            let mut innings = load_innings(&*tx, &innings_id)?;
            let record = load_match(&*tx, &innings.match_id)?;
            self.admit(&proposal, record, innings.clone(), Vec::new())?;
            assign(&mut innings);
            tx.put_innings(innings.clone())?;
            Ok(innings)
        })?;
        self.publish(
            innings.match_id,
            Some(innings.id),
            EventKind::LineupChanged,
            EventPayload::Innings {
                innings: innings.clone(),
            },
        );
        Ok(innings)
    }
}

fn delivery_players(delivery: &Delivery) -> impl Iterator<Item = &PlayerId> {
    [&delivery.batter, &delivery.bowler]
        .into_iter()
        .chain(delivery.run_out_batter.as_ref())
}

#[cfg(test)]
mod tests {
    use crease_fabric::EventFilter;
    use crease_types::{InningsStatus, MatchFormat, OverPosition, StatsCredit, WicketType};
    use proptest::prelude::*;

    use super::*;
    use crate::config::EngineConfig;
    use crate::testing::{bat, bowl, player, scorer, setup, user, Fixture};

    fn dot(runs: u32) -> Delivery {
        Delivery::new(bat(), bowl(), runs)
    }

    #[test]
    fn six_singles_then_wide_then_undo() {
        let f = setup(MatchFormat::limited_overs(20));
        let innings = f.open_innings();
        for _ in 0..6 {
            f.ball(&innings, dot(1));
        }
        let after_over = f.engine.innings(innings.id).unwrap();
        assert_eq!(after_over.runs, 6);
        assert_eq!(after_over.wickets, 0);
        assert_eq!(after_over.position, OverPosition::new(1, 0));
        assert!((after_over.overs_faced() - 1.0).abs() < f64::EPSILON);
        assert_eq!(after_over.status, InningsStatus::InProgress);

        let wide = f.ball(&innings, dot(0).wide());
        assert_eq!(wide.event.ball_sequence, 7);
        assert_eq!(wide.event.slot(), OverPosition::new(1, 0));
        assert_eq!(wide.innings.runs, 7);
        assert_eq!(wide.innings.position, OverPosition::new(1, 0));
        assert_eq!(wide.innings.status, InningsStatus::InProgress);

        let undone = f.engine.undo_last_ball(&scorer(), innings.id).unwrap();
        assert_eq!(undone.removed.ball_sequence, 7);
        assert!(!undone.reopened);
        assert_eq!(undone.innings.runs, 6);
        assert_eq!(undone.innings.position, OverPosition::new(1, 0));
        assert_eq!(f.engine.ball_events(innings.id).unwrap().len(), 6);
        assert_eq!(undone.innings, after_over);
    }

    #[test]
    fn sixth_legal_ball_is_stamped_in_its_own_over() {
        let f = setup(MatchFormat::limited_overs(20));
        let innings = f.open_innings();
        let labels: Vec<String> = (0..7).map(|_| f.ball(&innings, dot(0)).event.label()).collect();
        assert_eq!(labels, ["0.1", "0.2", "0.3", "0.4", "0.5", "0.6", "1.1"]);
    }

    #[test]
    fn tenth_wicket_is_all_out_with_overs_left() {
        let f = setup(MatchFormat::limited_overs(20));
        let innings = f.open_innings();
        // 8.2 overs: 41 dot balls and 9 wickets spread through them.
        for i in 0..50 {
            let delivery = if i % 5 == 4 && i < 45 {
                dot(0).wicket(WicketType::Bowled)
            } else {
                dot(0)
            };
            f.ball(&innings, delivery);
        }
        let before = f.engine.innings(innings.id).unwrap();
        assert_eq!(before.wickets, 9);
        assert_eq!(before.display_overs(), "8.2");

        let last = f.ball(&innings, dot(0).wicket(WicketType::Caught));
        assert!(last.closed);
        assert_eq!(last.innings.status, InningsStatus::AllOut);
        assert_eq!(last.innings.display_overs(), "8.3");
    }

    #[test]
    fn terminal_innings_rejects_balls_without_appending() {
        let f = setup(MatchFormat::limited_overs(1));
        let innings = f.open_innings();
        for _ in 0..6 {
            f.ball(&innings, dot(2));
        }
        let closed = f.engine.innings(innings.id).unwrap();
        assert_eq!(closed.status, InningsStatus::Completed);

        let err = f
            .engine
            .record_ball(&scorer(), innings.id, dot(4), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(f.engine.ball_events(innings.id).unwrap().len(), 6);
        assert_eq!(f.engine.innings(innings.id).unwrap(), closed);
    }

    #[test]
    fn only_the_current_scorer_records() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        let err = f
            .engine
            .record_ball(&user("spectator"), innings.id, dot(1), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization(_)));
        assert!(f.engine.ball_events(innings.id).unwrap().is_empty());
        assert_eq!(f.engine.player_stats(&bat()).unwrap().runs, 0);
    }

    #[test]
    fn stale_fence_appends_nothing() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        let first = f
            .engine
            .record_ball(&scorer(), innings.id, dot(1), Some(1))
            .unwrap();
        assert_eq!(first.event.ball_sequence, 1);

        // A retry of the same call must not double-append.
        let err = f
            .engine
            .record_ball(&scorer(), innings.id, dot(1), Some(1))
            .unwrap_err();
        assert!(matches!(err, EngineError::Consistency(_)));
        assert_eq!(f.engine.innings(innings.id).unwrap().runs, 1);
        assert_eq!(f.engine.ball_events(innings.id).unwrap().len(), 1);
    }

    #[test]
    fn unknown_players_and_missing_innings_are_not_found() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        let ghost = Delivery::new(player("ghost"), bowl(), 1);
        let err = f.engine.record_ball(&scorer(), innings.id, ghost, None).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let err = f
            .engine
            .record_ball(&scorer(), InningsId::new(), dot(1), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn undo_on_empty_ledger_is_not_found() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        let err = f.engine.undo_last_ball(&scorer(), innings.id).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn only_one_innings_in_progress() {
        let f = setup(MatchFormat::default());
        f.open_innings();
        let err = f
            .engine
            .start_innings(&scorer(), f.match_id, TeamSide::B, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn chase_targets_one_more_than_first_innings() {
        let f = setup(MatchFormat::limited_overs(1));
        let first = f.open_innings();
        for runs in [1, 4, 0, 6, 2, 1] {
            f.ball(&first, dot(runs));
        }
        let chase = f.engine.start_chase(&scorer(), f.match_id).unwrap();
        assert_eq!(chase.innings_number, 2);
        assert_eq!(chase.batting_side, TeamSide::B);
        assert_eq!(chase.target, Some(15));

        let chaser = Delivery::new(bowl(), bat(), 6);
        f.ball(&chase, chaser.clone());
        f.ball(&chase, chaser.clone());
        let won = f.ball(&chase, chaser);
        assert!(won.closed);
        assert_eq!(won.innings.status, InningsStatus::TargetChased);

        let err = f
            .engine
            .start_innings(&scorer(), f.match_id, TeamSide::A, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref m) if m.contains("allows 2 innings")));
    }

    #[test]
    fn undo_reverses_ball_stats_and_innings_credit() {
        let f = setup(MatchFormat::limited_overs(1));
        let innings = f.open_innings();
        for _ in 0..5 {
            f.ball(&innings, dot(0));
        }
        let closing = f.ball(&innings, dot(4));
        assert!(closing.closed);

        let stats = f.engine.player_stats(&bat()).unwrap();
        assert_eq!((stats.runs, stats.fours, stats.balls_faced), (4, 1, 6));
        assert_eq!((stats.matches, stats.innings), (1, 1));
        let bowler = f.engine.player_stats(&bowl()).unwrap();
        assert_eq!((bowler.balls_bowled, bowler.runs_conceded), (6, 4));

        let undone = f.engine.undo_last_ball(&scorer(), innings.id).unwrap();
        assert!(undone.reopened);
        assert_eq!(undone.innings.status, InningsStatus::InProgress);
        let stats = f.engine.player_stats(&bat()).unwrap();
        assert_eq!((stats.runs, stats.fours, stats.balls_faced), (0, 0, 5));
        assert_eq!((stats.matches, stats.innings), (0, 0));
        let bowler = f.engine.player_stats(&bowl()).unwrap();
        assert_eq!((bowler.balls_bowled, bowler.runs_conceded), (5, 0));
    }

    #[test]
    fn undo_is_refused_while_a_later_innings_runs() {
        let f = setup(MatchFormat::limited_overs(1));
        let first = f.open_innings();
        for _ in 0..6 {
            f.ball(&first, dot(1));
        }
        f.engine.start_chase(&scorer(), f.match_id).unwrap();
        let err = f.engine.undo_last_ball(&scorer(), first.id).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(f.engine.ball_events(first.id).unwrap().len(), 6);
    }

    #[test]
    fn undo_is_refused_once_a_later_innings_has_closed() {
        let f = setup(MatchFormat::limited_overs(1));
        let first = f.open_innings();
        for _ in 0..6 {
            f.ball(&first, dot(1));
        }
        let chase = f.engine.start_chase(&scorer(), f.match_id).unwrap();
        assert_eq!(chase.target, Some(7));
        f.ball(&chase, Delivery::new(bowl(), bat(), 6));
        let done = f.ball(&chase, Delivery::new(bowl(), bat(), 6));
        assert_eq!(done.innings.status, InningsStatus::TargetChased);

        let err = f.engine.undo_last_ball(&scorer(), first.id).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        let first_now = f.engine.innings(first.id).unwrap();
        assert_eq!(first_now.status, InningsStatus::Completed);
        assert_eq!(first_now.runs, 6);
        assert_eq!(f.engine.ball_events(first.id).unwrap().len(), 6);

        let err = f
            .engine
            .record_ball(&scorer(), first.id, dot(6), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // The closed chase itself is still the latest innings and can be rewound.
        let undone = f.engine.undo_last_ball(&scorer(), chase.id).unwrap();
        assert!(undone.reopened);
    }

    #[test]
    fn failed_store_rolls_back_and_is_retryable() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        f.engine.store().set_available(false);
        let err = f
            .engine
            .record_ball(&scorer(), innings.id, dot(1), Some(1))
            .unwrap_err();
        assert!(err.is_retryable());

        f.engine.store().set_available(true);
        let retried = f
            .engine
            .record_ball(&scorer(), innings.id, dot(1), Some(1))
            .unwrap();
        assert_eq!(retried.event.ball_sequence, 1);
    }

    #[test]
    fn lineup_changes_persist() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        f.engine
            .set_batters(&scorer(), innings.id, bat(), player("mate"))
            .unwrap();
        let updated = f.engine.set_bowler(&scorer(), innings.id, bowl()).unwrap();
        assert_eq!(updated.striker, Some(bat()));
        assert_eq!(updated.non_striker, Some(player("mate")));
        assert_eq!(updated.bowler, Some(bowl()));

        let err = f
            .engine
            .set_bowler(&user("spectator"), innings.id, bat())
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization(_)));
    }

    #[tokio::test]
    async fn subscribers_see_committed_balls() {
        let f = setup(MatchFormat::limited_overs(1));
        let innings = f.open_innings();
        let mut stream = f.engine.subscribe(EventFilter::for_innings(innings.id)).unwrap();

        for _ in 0..6 {
            f.ball(&innings, dot(1));
        }
        for seq in 1..=6 {
            let event = stream.recv().await.unwrap();
            assert_eq!(event.kind, EventKind::BallRecorded);
            assert_eq!(event.innings().map(|i| i.balls_recorded), Some(seq));
        }
        let closed = stream.recv().await.unwrap();
        assert_eq!(closed.kind, EventKind::InningsClosed);
        assert_eq!(closed.innings().map(|i| i.status), Some(InningsStatus::Completed));

        // Rejected calls publish nothing.
        let _ = f.engine.record_ball(&scorer(), innings.id, dot(1), None);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn faced_ball_policy_skips_idle_roster() {
        let config = EngineConfig {
            innings_credit: crease_stats::InningsCreditPolicy::FacedBall,
            ..EngineConfig::default()
        };
        let f = Fixture::with_config(MatchFormat::limited_overs(1), config);
        let innings = f.open_innings();
        for _ in 0..6 {
            f.ball(&innings, dot(0));
        }
        assert_eq!(f.engine.player_stats(&bat()).unwrap().matches, 1);
        assert_eq!(f.engine.player_stats(&player("mate")).unwrap().matches, 0);
        let journaled: Option<StatsCredit> = f
            .engine
            .store()
            .read(|r| -> EngineResult<_> { Ok(r.get_credit(&CreditSource::InningsClosed(innings.id))?) })
            .unwrap();
        assert_eq!(journaled.map(|c| c.lines.len()), Some(1));
    }

    fn arb_delivery() -> impl Strategy<Value = Delivery> {
        (0u32..7, 0u8..10).prop_map(|(runs, kind)| match kind {
            0 => dot(runs).wide(),
            1 => dot(runs).no_ball(),
            2 => dot(runs).wicket(WicketType::Bowled),
            3 => dot(runs).run_out(player("mate")),
            _ => dot(runs),
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn undo_is_a_left_inverse_of_record(
            prefix in proptest::collection::vec(arb_delivery(), 0..40),
            last in arb_delivery(),
        ) {
            let f = setup(MatchFormat::limited_overs(5));
            let innings = f.open_innings();
            for d in prefix {
                if f.engine.innings(innings.id).unwrap().is_complete() {
                    break;
                }
                f.ball(&innings, d);
            }
            let before = f.engine.innings(innings.id).unwrap();
            prop_assume!(!before.is_complete());
            let stats_before = f.engine.player_stats(&bat()).unwrap();

            f.ball(&innings, last);
            f.engine.undo_last_ball(&scorer(), innings.id).unwrap();

            let after = f.engine.innings(innings.id).unwrap();
            prop_assert_eq!(after.runs, before.runs);
            prop_assert_eq!(after.wickets, before.wickets);
            prop_assert_eq!(after.position, before.position);
            prop_assert_eq!(after.status, before.status);
            prop_assert_eq!(after.balls_recorded, before.balls_recorded);
            let stats_after = f.engine.player_stats(&bat()).unwrap();
            prop_assert_eq!(stats_after.runs, stats_before.runs);
            prop_assert_eq!(stats_after.balls_faced, stats_before.balls_faced);
            prop_assert_eq!(stats_after.matches, stats_before.matches);
        }
    }
}
