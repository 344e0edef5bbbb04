use thiserror::Error;

use crate::common::{PlayerId, Score};

/// Errors for rejected input. Raised before any state is touched.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid player id {0}: must be a positive integer")]
    InvalidPlayerId(PlayerId),

    #[error("Player id {player_id} out of range: must be between 1 and {max}")]
    PlayerIdOutOfRange { player_id: PlayerId, max: PlayerId },

    #[error("Invalid score {0}: must be a positive integer")]
    InvalidScore(Score),

    #[error("Invalid game mode '{0}': must be 'solo' or 'team'")]
    InvalidGameMode(String),

    #[error("Total score of player {0} would overflow")]
    ScoreOverflow(PlayerId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
