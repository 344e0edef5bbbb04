use podium_types::common::{GameMode, PlayerId, Score};

use crate::cqrs::Command;

/// Records one played session for a player.
#[derive(Debug, Clone)]
pub struct SubmitScore {
    pub player_id: PlayerId,
    pub score: Score,
    pub mode: GameMode,
}

impl SubmitScore {
    pub fn new(player_id: PlayerId, score: Score, mode: GameMode) -> Self {
        Self {
            player_id,
            score,
            mode,
        }
    }
}

impl Command for SubmitScore {}
