use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::{BallId, InningsId, PlayerId};
use crate::innings::OverPosition;

/// How a batter was dismissed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WicketType {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    Retired,
    TimedOut,
}

impl WicketType {
    pub const ALL: [WicketType; 8] = [
        Self::Bowled,
        Self::Caught,
        Self::Lbw,
        Self::RunOut,
        Self::Stumped,
        Self::HitWicket,
        Self::Retired,
        Self::TimedOut,
    ];

    /// Dismissals that count toward the bowler's wicket tally.
    pub fn credits_bowler(&self) -> bool {
        matches!(
            self,
            Self::Bowled | Self::Caught | Self::Lbw | Self::HitWicket
        )
    }

    pub fn credits_keeper(&self) -> bool {
        matches!(self, Self::Stumped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bowled => "bowled",
            Self::Caught => "caught",
            Self::Lbw => "lbw",
            Self::RunOut => "run_out",
            Self::Stumped => "stumped",
            Self::HitWicket => "hit_wicket",
            Self::Retired => "retired",
            Self::TimedOut => "timed_out",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bowled => "Bowled",
            Self::Caught => "Caught",
            Self::Lbw => "LBW",
            Self::RunOut => "Run Out",
            Self::Stumped => "Stumped",
            Self::HitWicket => "Hit Wicket",
            Self::Retired => "Retired",
            Self::TimedOut => "Timed Out",
        }
    }
}

impl fmt::Display for WicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for WicketType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| TypeError::UnknownVariant {
                kind: "wicket type",
                value: s.to_string(),
            })
    }
}

/// A delivery as proposed by the scorer, before the engine assigns its
/// sequence number and over/ball slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub batter: PlayerId,
    pub bowler: PlayerId,
    /// Runs off the bat (or run between the wickets); excludes the
    /// automatic extra for a wide or no-ball.
    #[serde(default)]
    pub runs_scored: u32,
    #[serde(default)]
    pub is_wide: bool,
    #[serde(default)]
    pub is_no_ball: bool,
    #[serde(default)]
    pub wicket: Option<WicketType>,
    /// Which batter was run out, when it was not the striker.
    #[serde(default)]
    pub run_out_batter: Option<PlayerId>,
    /// Administrative credit of a delivery that was never physically bowled.
    #[serde(default)]
    pub grant_without_ball: bool,
}

impl Delivery {
    pub fn new(batter: PlayerId, bowler: PlayerId, runs_scored: u32) -> Self {
        Self {
            batter,
            bowler,
            runs_scored,
            is_wide: false,
            is_no_ball: false,
            wicket: None,
            run_out_batter: None,
            grant_without_ball: false,
        }
    }

    pub fn wide(mut self) -> Self {
        self.is_wide = true;
        self
    }

    pub fn no_ball(mut self) -> Self {
        self.is_no_ball = true;
        self
    }

    pub fn wicket(mut self, kind: WicketType) -> Self {
        self.wicket = Some(kind);
        self
    }

    pub fn run_out(mut self, batter: PlayerId) -> Self {
        self.wicket = Some(WicketType::RunOut);
        self.run_out_batter = Some(batter);
        self
    }

    pub fn granted(mut self) -> Self {
        self.grant_without_ball = true;
        self
    }

    pub fn is_legal(&self) -> bool {
        !self.is_wide && !self.is_no_ball
    }
}

/// One committed entry in an innings ledger.
///
/// Immutable once committed; only the highest-sequence event can be removed
/// (undo). `ball_sequence` is gapless: the n-th event of an innings carries
/// sequence n.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallEvent {
    pub id: BallId,
    pub innings_id: InningsId,
    pub ball_sequence: u32,
    /// Over in which the delivery was bowled.
    pub over_number: u32,
    /// Legal balls already bowled in that over (0..=5). Not advanced by
    /// wides and no-balls, which share the slot of the next legal ball.
    pub ball_number: u32,
    pub batter: PlayerId,
    pub bowler: PlayerId,
    pub runs_scored: u32,
    /// Automatic run for a wide or no-ball (0 or 1), fixed at append time.
    pub extras: u32,
    pub is_wide: bool,
    pub is_no_ball: bool,
    pub is_wicket: bool,
    pub wicket_type: Option<WicketType>,
    pub run_out_batter: Option<PlayerId>,
    pub grant_without_ball: bool,
    pub timestamp: DateTime<Utc>,
}

impl BallEvent {
    pub fn is_legal_delivery(&self) -> bool {
        !self.is_wide && !self.is_no_ball
    }

    pub fn total_runs(&self) -> u32 {
        self.runs_scored + self.extras
    }

    pub fn slot(&self) -> OverPosition {
        OverPosition {
            over: self.over_number,
            ball: self.ball_number,
        }
    }

    /// The batter dismissed by this event, if any.
    pub fn dismissed_batter(&self) -> Option<&PlayerId> {
        if !self.is_wicket {
            return None;
        }
        Some(self.run_out_batter.as_ref().unwrap_or(&self.batter))
    }

    pub fn credits_bowler_wicket(&self) -> bool {
        self.is_wicket && self.wicket_type.is_some_and(|w| w.credits_bowler())
    }

    /// Label of the delivery within the innings, e.g. "3.4" for the fourth
    /// ball of the fourth over.
    pub fn label(&self) -> String {
        format!("{}.{}", self.over_number, self.ball_number + 1)
    }

    /// Short scoring-sheet text: "Wd", "Nb+2", "4 W", "1 (GWB)".
    pub fn display_text(&self) -> String {
        let mut text = String::new();
        if self.is_wide {
            text.push_str("Wd");
        }
        if self.is_no_ball {
            text.push_str("Nb");
        }
        if self.runs_scored > 0 {
            if text.is_empty() {
                text.push_str(&self.runs_scored.to_string());
            } else {
                text.push_str(&format!("+{}", self.runs_scored));
            }
        } else if text.is_empty() {
            text.push('0');
        }
        if self.is_wicket {
            text.push_str(" W");
        }
        if self.grant_without_ball {
            text.push_str(" (GWB)");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str) -> PlayerId {
        PlayerId::new(id).unwrap()
    }

    fn event(runs: u32, extras: u32) -> BallEvent {
        BallEvent {
            id: BallId::new(),
            innings_id: InningsId::new(),
            ball_sequence: 1,
            over_number: 3,
            ball_number: 3,
            batter: player("bat"),
            bowler: player("bowl"),
            runs_scored: runs,
            extras,
            is_wide: false,
            is_no_ball: false,
            is_wicket: false,
            wicket_type: None,
            run_out_batter: None,
            grant_without_ball: false,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn bowler_credit_excludes_run_out_and_stumping() {
        assert!(WicketType::Bowled.credits_bowler());
        assert!(WicketType::Caught.credits_bowler());
        assert!(WicketType::Lbw.credits_bowler());
        assert!(WicketType::HitWicket.credits_bowler());
        assert!(!WicketType::RunOut.credits_bowler());
        assert!(!WicketType::Stumped.credits_bowler());
        assert!(!WicketType::Retired.credits_bowler());
        assert!(!WicketType::TimedOut.credits_bowler());
        assert!(WicketType::Stumped.credits_keeper());
    }

    #[test]
    fn wicket_type_parses_wire_names() {
        for kind in WicketType::ALL {
            assert_eq!(kind.as_str().parse::<WicketType>().unwrap(), kind);
        }
        assert!("handled_ball".parse::<WicketType>().is_err());
    }

    #[test]
    fn total_runs_adds_extras() {
        let mut wide = event(2, 1);
        wide.is_wide = true;
        assert_eq!(wide.total_runs(), 3);
        assert!(!wide.is_legal_delivery());
        assert_eq!(event(4, 0).total_runs(), 4);
    }

    #[test]
    fn display_text_tokens() {
        let mut e = event(0, 1);
        e.is_wide = true;
        assert_eq!(e.display_text(), "Wd");
        e.runs_scored = 2;
        assert_eq!(e.display_text(), "Wd+2");

        let mut dot = event(0, 0);
        dot.is_wicket = true;
        dot.wicket_type = Some(WicketType::Bowled);
        assert_eq!(dot.display_text(), "0 W");

        let mut granted = event(1, 0);
        granted.grant_without_ball = true;
        assert_eq!(granted.display_text(), "1 (GWB)");
    }

    #[test]
    fn run_out_dismisses_named_batter() {
        let mut e = event(1, 0);
        e.is_wicket = true;
        e.wicket_type = Some(WicketType::RunOut);
        e.run_out_batter = Some(player("non-striker"));
        assert_eq!(e.dismissed_batter(), Some(&player("non-striker")));
        assert!(!e.credits_bowler_wicket());

        let mut bowled = event(0, 0);
        bowled.is_wicket = true;
        bowled.wicket_type = Some(WicketType::Bowled);
        assert_eq!(bowled.dismissed_batter(), Some(&player("bat")));
        assert!(bowled.credits_bowler_wicket());
    }

    #[test]
    fn label_is_one_based_ball() {
        assert_eq!(event(0, 0).label(), "3.4");
    }

    #[test]
    fn delivery_builder() {
        let d = Delivery::new(player("a"), player("b"), 0).no_ball();
        assert!(!d.is_legal());
        let r = Delivery::new(player("a"), player("b"), 1).run_out(player("c"));
        assert_eq!(r.wicket, Some(WicketType::RunOut));
        assert_eq!(r.run_out_batter, Some(player("c")));
    }
}
