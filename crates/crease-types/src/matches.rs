use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::{MatchId, MembershipId, PlayerId, TransferId, UserId};

/// One of the two sides contesting a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

impl FromStr for TeamSide {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            other => Err(TypeError::UnknownVariant {
                kind: "team side",
                value: other.to_string(),
            }),
        }
    }
}

/// What the toss winner chose to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossDecision {
    Bat,
    Field,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toss {
    pub winner: TeamSide,
    pub decision: TossDecision,
}

impl Toss {
    /// The side that bats first given this toss outcome.
    pub fn batting_first(&self) -> TeamSide {
        match self.decision {
            TossDecision::Bat => self.winner,
            TossDecision::Field => self.winner.opposite(),
        }
    }
}

/// Lifecycle of a match. Only `Ongoing` matches accept new innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Ongoing,
    Completed,
    Abandoned,
}

impl MatchStatus {
    pub fn is_ongoing(&self) -> bool {
        matches!(self, Self::Ongoing)
    }
}

/// Format parameters fixed when the match is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFormat {
    pub overs_per_innings: u32,
    /// Each side bats twice when set.
    pub two_innings: bool,
    /// Whether the automatic run for a wide or no-ball counts toward the
    /// batting side's total.
    pub wide_no_ball_runs: bool,
}

/// Upper bound on `overs_per_innings`; a five-day match with unlimited
/// innings stays well below it.
pub const MAX_OVERS_PER_INNINGS: u32 = 1_000;

impl MatchFormat {
    pub fn limited_overs(overs_per_innings: u32) -> Self {
        Self {
            overs_per_innings,
            two_innings: false,
            wide_no_ball_runs: true,
        }
    }

    /// Number of innings the format allows across both sides.
    pub fn max_innings(&self) -> u32 {
        if self.two_innings {
            4
        } else {
            2
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if self.overs_per_innings == 0 {
            return Err(TypeError::InvalidValue {
                field: "overs_per_innings",
                reason: "must be at least 1".into(),
            });
        }
        if self.overs_per_innings > MAX_OVERS_PER_INNINGS {
            return Err(TypeError::InvalidValue {
                field: "overs_per_innings",
                reason: format!("must be at most {MAX_OVERS_PER_INNINGS}"),
            });
        }
        Ok(())
    }
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::limited_overs(20)
    }
}

/// A match between two named sides.
///
/// `current_scorer` is the only user allowed to append ball events. It
/// changes exclusively through an accepted [`MatchTransfer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub created_by: UserId,
    pub team_a_name: String,
    pub team_b_name: String,
    pub format: MatchFormat,
    pub toss: Option<Toss>,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub current_scorer: UserId,
}

impl Match {
    pub fn team_name(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::A => &self.team_a_name,
            TeamSide::B => &self.team_b_name,
        }
    }

    pub fn is_scorer(&self, user: &UserId) -> bool {
        &self.current_scorer == user
    }
}

/// Roster membership of one player on one side of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTeam {
    pub id: MembershipId,
    pub match_id: MatchId,
    pub side: TeamSide,
    pub player: PlayerId,
    pub is_captain: bool,
    /// Plays for both sides (common in short-handed amateur games).
    pub is_common_player: bool,
    pub batting_order: Option<u32>,
}

impl MatchTeam {
    /// Sort key placing unranked players after every ranked one.
    pub fn order_key(&self) -> (u32, &PlayerId) {
        (self.batting_order.unwrap_or(u32::MAX), &self.player)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Pending,
    Accepted,
    /// Another transfer for the same match was accepted first.
    Superseded,
}

/// Request to hand scoring rights from one user to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTransfer {
    pub id: TransferId,
    pub match_id: MatchId,
    pub from_user: UserId,
    pub to_user: UserId,
    pub status: TransferStatus,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl MatchTransfer {
    pub fn accepted(&self) -> bool {
        self.status == TransferStatus::Accepted
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransferStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toss_decides_who_bats_first() {
        let bat = Toss {
            winner: TeamSide::B,
            decision: TossDecision::Bat,
        };
        let field = Toss {
            winner: TeamSide::B,
            decision: TossDecision::Field,
        };
        assert_eq!(bat.batting_first(), TeamSide::B);
        assert_eq!(field.batting_first(), TeamSide::A);
    }

    #[test]
    fn format_innings_limit() {
        let mut format = MatchFormat::limited_overs(10);
        assert_eq!(format.max_innings(), 2);
        format.two_innings = true;
        assert_eq!(format.max_innings(), 4);
    }

    #[test]
    fn zero_overs_is_invalid() {
        assert!(MatchFormat::limited_overs(0).validate().is_err());
        assert!(MatchFormat::default().validate().is_ok());
    }

    #[test]
    fn overs_limit_is_bounded() {
        assert!(MatchFormat::limited_overs(MAX_OVERS_PER_INNINGS).validate().is_ok());
        assert!(MatchFormat::limited_overs(MAX_OVERS_PER_INNINGS + 1).validate().is_err());
        assert!(MatchFormat::limited_overs(u32::MAX).validate().is_err());
    }

    #[test]
    fn side_parsing() {
        assert_eq!("a".parse::<TeamSide>().unwrap(), TeamSide::A);
        assert!("C".parse::<TeamSide>().is_err());
        assert_eq!(TeamSide::A.opposite(), TeamSide::B);
    }

    #[test]
    fn unranked_members_sort_last() {
        let member = |player: &str, order: Option<u32>| MatchTeam {
            id: MembershipId::new(),
            match_id: MatchId::new(),
            side: TeamSide::A,
            player: PlayerId::new(player).unwrap(),
            is_captain: false,
            is_common_player: false,
            batting_order: order,
        };
        let mut team = vec![member("z", None), member("y", Some(2)), member("x", Some(1))];
        team.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        let players: Vec<_> = team.iter().map(|m| m.player.as_str()).collect();
        assert_eq!(players, vec!["x", "y", "z"]);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TransferStatus::Superseded).unwrap(),
            "\"superseded\""
        );
        assert_eq!(serde_json::to_string(&MatchStatus::Ongoing).unwrap(), "\"ongoing\"");
    }
}
