mod get_player_rank;
mod get_top_players;

pub use get_player_rank::GetPlayerRankHandler;
pub use get_top_players::GetTopPlayersHandler;
