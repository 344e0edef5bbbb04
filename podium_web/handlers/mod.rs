mod helpers;
mod leaderboard_handler;

pub use helpers::ApiError;
pub use leaderboard_handler::{
    LeaderboardEntry, MessageResponse, SubmitScoreForm, TopPlayersResponse, TopQuery, UserRank,
    player_rank, submit_score, top_players,
};
