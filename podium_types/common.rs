use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::AppError;

/// Identifier of a player, as sent by clients.
pub type PlayerId = i64;

/// A score contribution or a cumulative total.
pub type Score = i64;

/// 1-based position in the leaderboard.
pub type Rank = u64;

/// The mode a game session was played in. Informational only: it never
/// changes how scores are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum GameMode {
    Solo,
    Team,
}

impl FromStr for GameMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solo" => Ok(GameMode::Solo),
            "team" => Ok(GameMode::Team),
            other => Err(AppError::InvalidGameMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for GameMode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Solo => write!(f, "solo"),
            GameMode::Team => write!(f, "team"),
        }
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedPlayer {
    pub player_id: PlayerId,
    pub total_score: Score,
    pub rank: Rank,
}
