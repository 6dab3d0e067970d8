use std::collections::BTreeSet;

use chrono::Utc;
use crease_fabric::{EventKind, EventPayload};
use crease_ledger::{MatchSummary, ProjectionBuilder};
use crease_store::ScoreStore;
use crease_types::{
    Match, MatchFormat, MatchId, MatchStatus, MatchTeam, MatchTransfer, MembershipId, Player,
    PlayerId, PlayerStats, TeamSide, Toss, TransferId, TransferStatus, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{load_match, open_innings, require_ongoing, require_scorer, ScoringEngine};
use crate::error::{EngineError, EngineResult};

/// Setup of a new match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub team_a_name: String,
    pub team_b_name: String,
    #[serde(default)]
    pub format: MatchFormat,
}

/// A roster entry to add to one side of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMember {
    pub side: TeamSide,
    pub player: PlayerId,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_common_player: bool,
    #[serde(default)]
    pub batting_order: Option<u32>,
}

impl<S: ScoreStore> ScoringEngine<S> {
    // ---- Match lifecycle ----

    /// Create a match. The creator starts out as its scorer.
    pub fn create_match(&self, caller: &UserId, setup: NewMatch) -> EngineResult<Match> {
        setup.format.validate()?;
        for name in [&setup.team_a_name, &setup.team_b_name] {
            if name.trim().is_empty() {
                return Err(EngineError::Validation("team names must not be blank".into()));
            }
        }

        let record = Match {
            id: MatchId::new(),
            created_by: caller.clone(),
            team_a_name: setup.team_a_name,
            team_b_name: setup.team_b_name,
            format: setup.format,
            toss: None,
            status: MatchStatus::Ongoing,
            created_at: Utc::now(),
            current_scorer: caller.clone(),
        };
        self.store.transact(|tx| -> EngineResult<()> {
            tx.put_match(record.clone())?;
            Ok(())
        })?;

        info!(match_id = %record.id, creator = %caller, "match created");
        self.publish(
            record.id,
            None,
            EventKind::MatchCreated,
            EventPayload::Match {
                record: record.clone(),
            },
        );
        Ok(record)
    }

    /// Record the toss. Only possible before the first innings.
    pub fn set_toss(&self, caller: &UserId, match_id: MatchId, toss: Toss) -> EngineResult<Match> {
        let record = self.store.transact(|tx| -> EngineResult<Match> {
            let mut record = load_match(&*tx, &match_id)?;
            require_scorer(&record, caller)?;
            require_ongoing(&record)?;
            if !tx.innings_for_match(&match_id)?.is_empty() {
                return Err(EngineError::Validation(
                    "toss cannot change once play has started".into(),
                ));
            }
            record.toss = Some(toss);
            tx.put_match(record.clone())?;
            Ok(record)
        })?;
        self.publish_status(&record);
        Ok(record)
    }

    /// Close a match. No innings may be in progress.
    pub fn complete_match(&self, caller: &UserId, match_id: MatchId) -> EngineResult<MatchSummary> {
        let (record, summary) = self.store.transact(|tx| -> EngineResult<(Match, MatchSummary)> {
            let mut record = load_match(&*tx, &match_id)?;
            require_scorer(&record, caller)?;
            require_ongoing(&record)?;
            if let Some(open) = open_innings(&*tx, &match_id)? {
                return Err(EngineError::Validation(format!(
                    "innings {} is still in progress",
                    open.innings_number
                )));
            }
            record.status = MatchStatus::Completed;
            tx.put_match(record.clone())?;
            let innings = tx.innings_for_match(&match_id)?;
            let summary = ProjectionBuilder::match_summary(&record, &innings, self.config.max_wickets);
            Ok((record, summary))
        })?;

        info!(match_id = %match_id, result = ?summary.result, "match completed");
        self.publish_status(&record);
        Ok(summary)
    }

    /// Abandon a match, whatever state its innings are in.
    pub fn abandon_match(&self, caller: &UserId, match_id: MatchId) -> EngineResult<Match> {
        let record = self.store.transact(|tx| -> EngineResult<Match> {
            let mut record = load_match(&*tx, &match_id)?;
            require_scorer(&record, caller)?;
            require_ongoing(&record)?;
            record.status = MatchStatus::Abandoned;
            tx.put_match(record.clone())?;
            Ok(record)
        })?;
        info!(match_id = %match_id, "match abandoned");
        self.publish_status(&record);
        Ok(record)
    }

    fn publish_status(&self, record: &Match) {
        self.publish(
            record.id,
            None,
            EventKind::MatchStatusChanged,
            EventPayload::Match {
                record: record.clone(),
            },
        );
    }

    // ---- Roster ----

    /// Add a registered player to one side. Only before the first innings.
    ///
    /// A player may appear on both sides only when both memberships are
    /// flagged as common players.
    pub fn add_player_to_team(
        &self,
        caller: &UserId,
        match_id: MatchId,
        member: NewMember,
    ) -> EngineResult<MatchTeam> {
        self.store.transact(|tx| -> EngineResult<MatchTeam> {
            let record = load_match(&*tx, &match_id)?;
            require_scorer(&record, caller)?;
            require_ongoing(&record)?;
            ensure_roster_open(&*tx, &match_id)?;
            if tx.get_player(&member.player)?.is_none() {
                return Err(EngineError::NotFound(format!("player {}", member.player)));
            }

            for existing in tx.team_members(&match_id)? {
                if existing.player != member.player {
                    continue;
                }
                if existing.side == member.side {
                    return Err(EngineError::Validation(format!(
                        "{} is already on side {}",
                        member.player, member.side
                    )));
                }
                if !(existing.is_common_player && member.is_common_player) {
                    return Err(EngineError::Validation(format!(
                        "{} plays for side {}; only common players join both sides",
                        member.player, existing.side
                    )));
                }
            }

            let entry = MatchTeam {
                id: MembershipId::new(),
                match_id,
                side: member.side,
                player: member.player,
                is_captain: member.is_captain,
                is_common_player: member.is_common_player,
                batting_order: member.batting_order,
            };
            tx.put_member(entry.clone())?;
            Ok(entry)
        })
    }

    /// Remove a roster entry. Only before the first innings.
    pub fn remove_player_from_team(
        &self,
        caller: &UserId,
        membership: MembershipId,
    ) -> EngineResult<MatchTeam> {
        self.store.transact(|tx| -> EngineResult<MatchTeam> {
            let entry = tx
                .get_member(&membership)?
                .ok_or_else(|| EngineError::NotFound(format!("membership {membership}")))?;
            let record = load_match(&*tx, &entry.match_id)?;
            require_scorer(&record, caller)?;
            ensure_roster_open(&*tx, &entry.match_id)?;
            tx.remove_member(&membership)?;
            Ok(entry)
        })
    }

    /// Number one side's batters in the given order. Players of that side
    /// left out of `order` become unranked.
    pub fn set_batting_order(
        &self,
        caller: &UserId,
        match_id: MatchId,
        side: TeamSide,
        order: &[PlayerId],
    ) -> EngineResult<Vec<MatchTeam>> {
        let mut seen = BTreeSet::new();
        if let Some(dup) = order.iter().find(|p| !seen.insert(*p)) {
            return Err(EngineError::Validation(format!("{dup} listed twice")));
        }

        self.store.transact(|tx| -> EngineResult<Vec<MatchTeam>> {
            let record = load_match(&*tx, &match_id)?;
            require_scorer(&record, caller)?;
            let mut side_members: Vec<MatchTeam> = tx
                .team_members(&match_id)?
                .into_iter()
                .filter(|m| m.side == side)
                .collect();
            if let Some(missing) = order
                .iter()
                .find(|p| !side_members.iter().any(|m| &m.player == *p))
            {
                return Err(EngineError::NotFound(format!("{missing} is not on side {side}")));
            }

            for member in &mut side_members {
                member.batting_order = order
                    .iter()
                    .position(|p| p == &member.player)
                    .map(|i| i as u32 + 1);
                tx.put_member(member.clone())?;
            }
            side_members.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
            Ok(side_members)
        })
    }

    // ---- Player registry ----

    /// Register a player and give it zeroed statistics.
    pub fn register_player(&self, player: Player) -> EngineResult<Player> {
        if player.name.trim().is_empty() {
            return Err(EngineError::Validation("player name must not be blank".into()));
        }
        self.store.transact(|tx| -> EngineResult<()> {
            if tx.get_player(&player.id)?.is_some() {
                return Err(EngineError::Validation(format!(
                    "player {} is already registered",
                    player.id
                )));
            }
            tx.put_player(player.clone())?;
            tx.put_stats(PlayerStats::zeroed(player.id.clone()))?;
            Ok(())
        })?;
        Ok(player)
    }

    /// Remove a player from the registry together with its statistics.
    pub fn remove_player(&self, id: &PlayerId) -> EngineResult<Player> {
        self.store.transact(|tx| -> EngineResult<Player> {
            let player = tx
                .remove_player(id)?
                .ok_or_else(|| EngineError::NotFound(format!("player {id}")))?;
            tx.remove_stats(id)?;
            Ok(player)
        })
    }

    // ---- Scoring handoff ----

    /// Ask for scoring rights to pass to `to_user`. Nothing changes until
    /// the transfer is accepted.
    pub fn transfer_match(
        &self,
        caller: &UserId,
        match_id: MatchId,
        to_user: UserId,
    ) -> EngineResult<MatchTransfer> {
        let transfer = self.store.transact(|tx| -> EngineResult<MatchTransfer> {
            let record = load_match(&*tx, &match_id)?;
            require_scorer(&record, caller)?;
            require_ongoing(&record)?;
            if record.is_scorer(&to_user) {
                return Err(EngineError::Validation(format!(
                    "{to_user} already scores match {match_id}"
                )));
            }
            let transfer = MatchTransfer {
                id: TransferId::new(),
                match_id,
                from_user: record.current_scorer,
                to_user,
                status: TransferStatus::Pending,
                requested_at: Utc::now(),
                responded_at: None,
            };
            tx.put_transfer(transfer.clone())?;
            Ok(transfer)
        })?;

        self.publish(
            match_id,
            None,
            EventKind::TransferRequested,
            EventPayload::Transfer {
                transfer: transfer.clone(),
            },
        );
        Ok(transfer)
    }

    /// Accept a pending transfer: the caller becomes the match's scorer.
    ///
    /// The transfer goes stale once its requester no longer holds scoring
    /// rights, and can then no longer be accepted.
    pub fn accept_transfer(&self, caller: &UserId, transfer_id: TransferId) -> EngineResult<MatchTransfer> {
        let now = Utc::now();
        let (transfer, superseded) = self
            .store
            .transact(|tx| -> EngineResult<(MatchTransfer, usize)> {
                let mut transfer = tx
                    .get_transfer(&transfer_id)?
                    .ok_or_else(|| EngineError::NotFound(format!("transfer {transfer_id}")))?;
                if &transfer.to_user != caller {
                    return Err(EngineError::Authorization(format!(
                        "transfer {transfer_id} is addressed to {}",
                        transfer.to_user
                    )));
                }
                if !transfer.is_pending() {
                    return Err(EngineError::Validation(format!(
                        "transfer {transfer_id} is {:?}",
                        transfer.status
                    )));
                }
                let mut record = load_match(&*tx, &transfer.match_id)?;
                require_ongoing(&record)?;
                if !record.is_scorer(&transfer.from_user) {
                    return Err(EngineError::Validation(format!(
                        "transfer {transfer_id} is stale: {} no longer scores the match",
                        transfer.from_user
                    )));
                }

                transfer.status = TransferStatus::Accepted;
                transfer.responded_at = Some(now);
                tx.put_transfer(transfer.clone())?;
                record.current_scorer = transfer.to_user.clone();
                tx.put_match(record)?;

                let mut superseded = 0;
                if self.config.supersede_pending_transfers {
                    for mut other in tx.transfers_for_match(&transfer.match_id)? {
                        if other.id != transfer.id && other.is_pending() {
                            other.status = TransferStatus::Superseded;
                            other.responded_at = Some(now);
                            tx.put_transfer(other)?;
                            superseded += 1;
                        }
                    }
                }
                Ok((transfer, superseded))
            })?;

        info!(
            match_id = %transfer.match_id,
            from = %transfer.from_user,
            to = %transfer.to_user,
            superseded,
            "scoring rights transferred"
        );
        self.publish(
            transfer.match_id,
            None,
            EventKind::TransferAccepted,
            EventPayload::Transfer {
                transfer: transfer.clone(),
            },
        );
        Ok(transfer)
    }
}

fn ensure_roster_open<R: crease_store::StoreRead + ?Sized>(
    reader: &R,
    match_id: &MatchId,
) -> EngineResult<()> {
    if reader.innings_for_match(match_id)?.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Validation(
            "the roster is fixed once play has started".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crease_ledger::MatchResult;
    use crease_types::{Delivery, TossDecision};

    use super::*;
    use crate::config::EngineConfig;
    use crate::testing::{bat, bowl, player, scorer, setup, user, Fixture};

    #[test]
    fn creator_scores_the_new_match() {
        let f = setup(MatchFormat::default());
        let record = f.engine.match_record(f.match_id).unwrap();
        assert_eq!(record.current_scorer, scorer());
        assert_eq!(record.created_by, scorer());
        assert!(record.status.is_ongoing());

        let err = f
            .engine
            .create_match(
                &scorer(),
                NewMatch {
                    team_a_name: " ".into(),
                    team_b_name: "Owls".into(),
                    format: MatchFormat::default(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn zero_over_format_is_rejected() {
        let f = setup(MatchFormat::default());
        let err = f
            .engine
            .create_match(
                &scorer(),
                NewMatch {
                    team_a_name: "Larks".into(),
                    team_b_name: "Owls".into(),
                    format: MatchFormat::limited_overs(0),
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref m) if m.contains("overs_per_innings")));
    }

    #[test]
    fn oversized_overs_limit_is_rejected_and_store_stays_usable() {
        let f = setup(MatchFormat::default());
        let err = f
            .engine
            .create_match(
                &scorer(),
                NewMatch {
                    team_a_name: "Larks".into(),
                    team_b_name: "Owls".into(),
                    format: MatchFormat::limited_overs(u32::MAX),
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref m) if m.contains("overs_per_innings")));

        let innings = f
            .engine
            .start_innings(&scorer(), f.match_id, TeamSide::A, None)
            .unwrap();
        let outcome = f
            .engine
            .record_ball(&scorer(), innings.id, Delivery::new(bat(), bowl(), 1), None)
            .unwrap();
        assert_eq!(outcome.innings.runs, 1);
    }

    #[test]
    fn toss_is_fixed_once_play_starts() {
        let f = setup(MatchFormat::default());
        let toss = Toss {
            winner: TeamSide::B,
            decision: TossDecision::Field,
        };
        let record = f.engine.set_toss(&scorer(), f.match_id, toss).unwrap();
        assert_eq!(record.toss.map(|t| t.batting_first()), Some(TeamSide::A));

        f.open_innings();
        let err = f.engine.set_toss(&scorer(), f.match_id, toss).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn roster_rules() {
        let f = setup(MatchFormat::default());
        let dup = NewMember {
            side: TeamSide::A,
            player: bat(),
            is_captain: false,
            is_common_player: false,
            batting_order: None,
        };
        let err = f.engine.add_player_to_team(&scorer(), f.match_id, dup.clone()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // bat is on A without the common flag, so it cannot join B either.
        let other_side = NewMember {
            side: TeamSide::B,
            is_common_player: true,
            ..dup.clone()
        };
        let err = f
            .engine
            .add_player_to_team(&scorer(), f.match_id, other_side)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref m) if m.contains("common")));

        let unknown = NewMember {
            player: player("ghost"),
            ..dup
        };
        let err = f.engine.add_player_to_team(&scorer(), f.match_id, unknown).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn common_players_join_both_sides() {
        let f = setup(MatchFormat::default());
        f.engine
            .register_player(Player::new(player("sub"), "Sub"))
            .unwrap();
        for side in [TeamSide::A, TeamSide::B] {
            f.engine
                .add_player_to_team(
                    &scorer(),
                    f.match_id,
                    NewMember {
                        side,
                        player: player("sub"),
                        is_captain: false,
                        is_common_player: true,
                        batting_order: None,
                    },
                )
                .unwrap();
        }
        let both = f.engine.team(f.match_id, None).unwrap();
        assert_eq!(both.iter().filter(|m| m.player == player("sub")).count(), 2);
    }

    #[test]
    fn roster_is_fixed_after_the_first_innings() {
        let f = setup(MatchFormat::default());
        let member = f.engine.team(f.match_id, Some(TeamSide::B)).unwrap().remove(0);
        f.open_innings();
        let err = f
            .engine
            .remove_player_from_team(&scorer(), member.id)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn remove_member_before_play() {
        let f = setup(MatchFormat::default());
        let member = f.engine.team(f.match_id, Some(TeamSide::B)).unwrap().remove(0);
        let removed = f.engine.remove_player_from_team(&scorer(), member.id).unwrap();
        assert_eq!(removed.player, bowl());
        assert!(f.engine.team(f.match_id, Some(TeamSide::B)).unwrap().is_empty());
    }

    #[test]
    fn batting_order_ranks_listed_players_first() {
        let f = setup(MatchFormat::default());
        let ordered = f
            .engine
            .set_batting_order(&scorer(), f.match_id, TeamSide::A, &[player("mate")])
            .unwrap();
        let names: Vec<_> = ordered.iter().map(|m| (m.player.clone(), m.batting_order)).collect();
        assert_eq!(names, vec![(player("mate"), Some(1)), (bat(), None)]);

        let err = f
            .engine
            .set_batting_order(&scorer(), f.match_id, TeamSide::A, &[bowl()])
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        let err = f
            .engine
            .set_batting_order(&scorer(), f.match_id, TeamSide::A, &[bat(), bat()])
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn registry_owns_stats() {
        let f = setup(MatchFormat::default());
        let err = f
            .engine
            .register_player(Player::new(bat(), "Again"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        f.engine.remove_player(&player("mate")).unwrap();
        assert!(matches!(
            f.engine.player_stats(&player("mate")),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn transfer_changes_scorer_only_on_accept() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        let transfer = f
            .engine
            .transfer_match(&scorer(), f.match_id, user("relief"))
            .unwrap();
        assert_eq!(transfer.status, TransferStatus::Pending);
        assert_eq!(f.engine.match_record(f.match_id).unwrap().current_scorer, scorer());

        let err = f
            .engine
            .accept_transfer(&user("someone"), transfer.id)
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization(_)));

        let accepted = f.engine.accept_transfer(&user("relief"), transfer.id).unwrap();
        assert!(accepted.accepted());
        assert!(accepted.responded_at.is_some());
        assert_eq!(
            f.engine.match_record(f.match_id).unwrap().current_scorer,
            user("relief")
        );

        let old = f
            .engine
            .record_ball(&scorer(), innings.id, Delivery::new(bat(), bowl(), 1), None)
            .unwrap_err();
        assert!(matches!(old, EngineError::Authorization(_)));
        f.engine
            .record_ball(&user("relief"), innings.id, Delivery::new(bat(), bowl(), 1), None)
            .unwrap();

        let again = f.engine.accept_transfer(&user("relief"), transfer.id).unwrap_err();
        assert!(matches!(again, EngineError::Validation(_)));
    }

    #[test]
    fn accepting_supersedes_other_requests() {
        let f = setup(MatchFormat::default());
        let first = f
            .engine
            .transfer_match(&scorer(), f.match_id, user("one"))
            .unwrap();
        let second = f
            .engine
            .transfer_match(&scorer(), f.match_id, user("two"))
            .unwrap();
        f.engine.accept_transfer(&user("two"), second.id).unwrap();

        let transfers = f.engine.transfers(f.match_id).unwrap();
        let status = |id| transfers.iter().find(|t| t.id == id).map(|t| t.status);
        assert_eq!(status(first.id), Some(TransferStatus::Superseded));
        assert_eq!(status(second.id), Some(TransferStatus::Accepted));

        let err = f.engine.accept_transfer(&user("one"), first.id).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn stale_transfer_cannot_be_accepted() {
        let config = EngineConfig {
            supersede_pending_transfers: false,
            ..EngineConfig::default()
        };
        let f = Fixture::with_config(MatchFormat::default(), config);
        let first = f
            .engine
            .transfer_match(&scorer(), f.match_id, user("one"))
            .unwrap();
        let second = f
            .engine
            .transfer_match(&scorer(), f.match_id, user("two"))
            .unwrap();
        f.engine.accept_transfer(&user("two"), second.id).unwrap();

        let pending = f.engine.transfers(f.match_id).unwrap();
        let status = pending.iter().find(|t| t.id == first.id).map(|t| t.status);
        assert_eq!(status, Some(TransferStatus::Pending));

        let err = f.engine.accept_transfer(&user("one"), first.id).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ref m) if m.contains("stale")));
        assert_eq!(
            f.engine.match_record(f.match_id).unwrap().current_scorer,
            user("two")
        );
    }

    #[test]
    fn self_transfer_is_rejected() {
        let f = setup(MatchFormat::default());
        let err = f
            .engine
            .transfer_match(&scorer(), f.match_id, scorer())
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        let err = f
            .engine
            .transfer_match(&user("relief"), f.match_id, user("other"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Authorization(_)));
    }

    #[test]
    fn completion_summarises_the_match() {
        let f = setup(MatchFormat::limited_overs(1));
        let first = f.open_innings();
        for _ in 0..6 {
            f.ball(&first, Delivery::new(bat(), bowl(), 2));
        }
        let chase = f.engine.start_chase(&scorer(), f.match_id).unwrap();
        let err = f.engine.complete_match(&scorer(), f.match_id).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        for _ in 0..6 {
            f.ball(&chase, Delivery::new(bowl(), bat(), 1));
        }
        let summary = f.engine.complete_match(&scorer(), f.match_id).unwrap();
        assert_eq!(summary.total_balls, 12);
        assert_eq!(summary.innings.len(), 2);
        assert!(matches!(
            summary.result,
            MatchResult::WonByRuns { winner: TeamSide::A, margin: 6 }
        ));

        let err = f
            .engine
            .start_innings(&scorer(), f.match_id, TeamSide::A, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn abandoned_match_freezes_scoring() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        let record = f.engine.abandon_match(&scorer(), f.match_id).unwrap();
        assert_eq!(record.status, MatchStatus::Abandoned);
        let err = f
            .engine
            .record_ball(&scorer(), innings.id, Delivery::new(bat(), bowl(), 1), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
