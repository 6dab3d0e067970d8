//! Shared fixture for engine tests: a match between two registered sides
//! with `bat` and `mate` on side A and `bowl` on side B.

use crease_store::InMemoryStore;
use crease_types::{Delivery, Innings, MatchFormat, MatchId, Player, PlayerId, TeamSide, UserId};

use crate::config::EngineConfig;
use crate::coordinator::{NewMatch, NewMember};
use crate::engine::ScoringEngine;
use crate::scoring::BallOutcome;

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn player(id: &str) -> PlayerId {
    PlayerId::new(id).unwrap()
}

pub(crate) fn scorer() -> UserId {
    user("scorer")
}

pub(crate) fn bat() -> PlayerId {
    player("bat")
}

pub(crate) fn bowl() -> PlayerId {
    player("bowl")
}

pub(crate) struct Fixture {
    pub engine: ScoringEngine<InMemoryStore>,
    pub match_id: MatchId,
}

impl Fixture {
    pub fn with_config(format: MatchFormat, config: EngineConfig) -> Self {
        let engine = ScoringEngine::new(InMemoryStore::new(), config).unwrap();
        for id in ["bat", "bowl", "mate"] {
            engine
                .register_player(Player::new(player(id), id.to_uppercase()))
                .unwrap();
        }
        let record = engine
            .create_match(
                &scorer(),
                NewMatch {
                    team_a_name: "Larks".into(),
                    team_b_name: "Owls".into(),
                    format,
                },
            )
            .unwrap();
        for (side, id) in [(TeamSide::A, "bat"), (TeamSide::A, "mate"), (TeamSide::B, "bowl")] {
            engine
                .add_player_to_team(
                    &scorer(),
                    record.id,
                    NewMember {
                        side,
                        player: player(id),
                        is_captain: false,
                        is_common_player: false,
                        batting_order: None,
                    },
                )
                .unwrap();
        }
        Self {
            engine,
            match_id: record.id,
        }
    }

    /// Start the first innings with side A batting.
    pub fn open_innings(&self) -> Innings {
        self.engine
            .start_innings(&scorer(), self.match_id, TeamSide::A, None)
            .unwrap()
    }

    pub fn ball(&self, innings: &Innings, delivery: Delivery) -> BallOutcome {
        self.engine
            .record_ball(&scorer(), innings.id, delivery, None)
            .unwrap()
    }
}

pub(crate) fn setup(format: MatchFormat) -> Fixture {
    Fixture::with_config(format, EngineConfig::default())
}
