use crease_ledger::{
    MatchSummary, ProjectionBuilder, ReplayEngine, ReplayResult, Scorecard, StreamValidator,
    ValidationReport,
};
use crease_stats::{rank, RankingCategory, RankingEntry};
use crease_store::ScoreStore;
use crease_types::{
    BallEvent, Innings, InningsId, Match, MatchId, MatchTeam, MatchTransfer, Player, PlayerId,
    PlayerStats, TeamSide,
};

use crate::engine::{load_innings, load_match, open_innings, ScoringEngine};
use crate::error::{EngineError, EngineResult};

impl<S: ScoreStore> ScoringEngine<S> {
    pub fn match_record(&self, match_id: MatchId) -> EngineResult<Match> {
        self.store.read(|r| -> EngineResult<_> { load_match(r, &match_id) })
    }

    pub fn innings(&self, innings_id: InningsId) -> EngineResult<Innings> {
        self.store.read(|r| -> EngineResult<_> { load_innings(r, &innings_id) })
    }

    /// The innings currently accepting balls, if any.
    pub fn current_innings(&self, match_id: MatchId) -> EngineResult<Option<Innings>> {
        self.store.read(|r| -> EngineResult<_> {
            load_match(r, &match_id)?;
            open_innings(r, &match_id)
        })
    }

    /// All innings of a match in order of play.
    pub fn innings_for_match(&self, match_id: MatchId) -> EngineResult<Vec<Innings>> {
        self.store.read(|r| -> EngineResult<_> {
            load_match(r, &match_id)?;
            Ok(r.innings_for_match(&match_id)?)
        })
    }

    /// The committed ledger of an innings, by sequence.
    pub fn ball_events(&self, innings_id: InningsId) -> EngineResult<Vec<BallEvent>> {
        self.store.read(|r| -> EngineResult<_> {
            load_innings(r, &innings_id)?;
            Ok(r.ball_events(&innings_id)?)
        })
    }

    /// Roster of a match, optionally one side only, in batting order.
    pub fn team(&self, match_id: MatchId, side: Option<TeamSide>) -> EngineResult<Vec<MatchTeam>> {
        let mut members = self.store.read(|r| -> EngineResult<_> {
            load_match(r, &match_id)?;
            Ok(r.team_members(&match_id)?)
        })?;
        members.retain(|m| side.map_or(true, |s| m.side == s));
        members.sort_by(|a, b| (a.side, a.order_key()).cmp(&(b.side, b.order_key())));
        Ok(members)
    }

    pub fn transfers(&self, match_id: MatchId) -> EngineResult<Vec<MatchTransfer>> {
        self.store.read(|r| -> EngineResult<_> {
            load_match(r, &match_id)?;
            Ok(r.transfers_for_match(&match_id)?)
        })
    }

    pub fn players(&self) -> EngineResult<Vec<Player>> {
        self.store.read(|r| -> EngineResult<_> { Ok(r.players()?) })
    }

    pub fn player_stats(&self, player: &PlayerId) -> EngineResult<PlayerStats> {
        self.store.read(|r| -> EngineResult<_> {
            r.get_stats(player)?
                .ok_or_else(|| EngineError::NotFound(format!("stats for player {player}")))
        })
    }

    /// Top players by `category`. `limit` defaults to the configured
    /// ranking limit.
    pub fn rankings(
        &self,
        category: RankingCategory,
        limit: Option<usize>,
    ) -> EngineResult<Vec<RankingEntry>> {
        let stats = self.store.read(|r| -> EngineResult<_> { Ok(r.all_stats()?) })?;
        Ok(rank(stats, category, limit.unwrap_or(self.config.ranking_limit)))
    }

    pub fn scorecard(&self, innings_id: InningsId) -> EngineResult<Scorecard> {
        self.store
            .read(|r| -> EngineResult<_> { Ok(ProjectionBuilder::scorecard_stored(r, &innings_id)?) })
    }

    /// Summary of a match as it stands; the result is only decided once
    /// every innings the format allows has closed or a chase succeeded.
    pub fn match_summary(&self, match_id: MatchId) -> EngineResult<MatchSummary> {
        self.store.read(|r| -> EngineResult<_> {
            let record = load_match(r, &match_id)?;
            let innings = r.innings_for_match(&match_id)?;
            Ok(ProjectionBuilder::match_summary(
                &record,
                &innings,
                self.config.max_wickets,
            ))
        })
    }

    /// Check a stored ledger against the stored innings counters.
    pub fn validate_ledger(&self, innings_id: InningsId) -> EngineResult<ValidationReport> {
        self.store.read(|r| -> EngineResult<_> {
            Ok(StreamValidator::validate_stored(
                r,
                &innings_id,
                self.config.max_wickets,
            )?)
        })
    }

    /// Recompute an innings from its ledger alone.
    pub fn replay_innings(&self, innings_id: InningsId) -> EngineResult<ReplayResult> {
        self.store.read(|r| -> EngineResult<_> {
            Ok(ReplayEngine::replay_stored(
                r,
                &innings_id,
                self.config.max_wickets,
            )?)
        })
    }
}

#[cfg(test)]
mod tests {
    use crease_types::{Delivery, MatchFormat, WicketType};

    use super::*;
    use crate::testing::{bat, bowl, player, setup};

    #[test]
    fn current_innings_follows_play() {
        let f = setup(MatchFormat::limited_overs(1));
        assert!(f.engine.current_innings(f.match_id).unwrap().is_none());
        let innings = f.open_innings();
        assert_eq!(
            f.engine.current_innings(f.match_id).unwrap().map(|i| i.id),
            Some(innings.id)
        );
        for _ in 0..6 {
            f.ball(&innings, Delivery::new(bat(), bowl(), 0));
        }
        assert!(f.engine.current_innings(f.match_id).unwrap().is_none());
        assert_eq!(f.engine.innings_for_match(f.match_id).unwrap().len(), 1);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let f = setup(MatchFormat::default());
        assert!(matches!(
            f.engine.match_record(MatchId::new()),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            f.engine.ball_events(InningsId::new()),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            f.engine.scorecard(InningsId::new()),
            Err(EngineError::NotFound(_))
        ));
        assert!(matches!(
            f.engine.player_stats(&player("ghost")),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn rankings_order_and_truncate() {
        let f = setup(MatchFormat::default());
        let innings = f.open_innings();
        f.ball(&innings, Delivery::new(bat(), bowl(), 4));
        f.ball(&innings, Delivery::new(player("mate"), bowl(), 6));
        f.ball(&innings, Delivery::new(bat(), bowl(), 0).wicket(WicketType::Lbw));

        let top = f.engine.rankings(RankingCategory::Runs, Some(2)).unwrap();
        let order: Vec<_> = top.iter().map(|e| (e.player.clone(), e.rank)).collect();
        assert_eq!(order, vec![(player("mate"), 1), (bat(), 2)]);

        let wickets = f.engine.rankings(RankingCategory::Wickets, None).unwrap();
        assert_eq!(wickets[0].player, bowl());
        assert_eq!(wickets.len(), 3);
    }

    #[test]
    fn stored_ledger_validates_and_replays() {
        let f = setup(MatchFormat::limited_overs(2));
        let innings = f.open_innings();
        for runs in [1, 0, 4] {
            f.ball(&innings, Delivery::new(bat(), bowl(), runs));
        }
        f.ball(&innings, Delivery::new(bat(), bowl(), 0).no_ball());

        let report = f.engine.validate_ledger(innings.id).unwrap();
        assert!(report.is_valid(), "{:?}", report.violations);
        assert_eq!(report.event_count, 4);

        let replay = f.engine.replay_innings(innings.id).unwrap();
        let stored = f.engine.innings(innings.id).unwrap();
        assert_eq!(replay.tally.runs, stored.runs);
        assert_eq!(replay.status, stored.status);

        let card = f.engine.scorecard(innings.id).unwrap();
        assert_eq!(card.extras.no_balls, 1);
        assert_eq!(card.batting[0].runs, 5);
    }

    #[test]
    fn team_lists_sides_in_batting_order() {
        let f = setup(MatchFormat::default());
        let all = f.engine.team(f.match_id, None).unwrap();
        let sides: Vec<_> = all.iter().map(|m| m.side).collect();
        assert_eq!(sides, vec![TeamSide::A, TeamSide::A, TeamSide::B]);
    }
}
