use podium_types::common::{PlayerId, RankedPlayer};

use crate::cqrs::Query;

/// Fetch the best ranked players, rank 1 first.
pub struct GetTopPlayers {
    pub limit: i64,
}

impl Query for GetTopPlayers {
    type Output = Vec<RankedPlayer>;
}

/// Fetch the rank and total score of a single player.
pub struct GetPlayerRank {
    pub player_id: PlayerId,
}

impl Query for GetPlayerRank {
    type Output = RankedPlayer;
}
