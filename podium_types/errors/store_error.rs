use thiserror::Error;

use crate::common::{PlayerId, Score};

/// Errors raised by the ranking state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Player with ID {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Rank index out of sync: {scores} scored players, {ranked} ranked players")]
    IndexOutOfSync { scores: usize, ranked: usize },

    #[error("Rank index holds score {ranked:?} for player {player_id}, store holds {stored:?}")]
    PlayerOutOfSync {
        player_id: PlayerId,
        stored: Option<Score>,
        ranked: Option<Score>,
    },

    #[error("Write attempted on a read-only unit of work")]
    ReadOnlyUnitOfWork,
}
