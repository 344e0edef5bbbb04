use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};

use podium_types::common::{GameMode, PlayerId, Rank, RankedPlayer, Score};

use crate::{handlers::ApiError, http::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct TopQuery {
    pub n: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub user_id: PlayerId,
    pub total_score: Score,
    pub rank: Rank,
}

impl From<RankedPlayer> for LeaderboardEntry {
    fn from(player: RankedPlayer) -> Self {
        Self {
            user_id: player.player_id,
            total_score: player.total_score,
            rank: player.rank,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopPlayersResponse {
    pub top_players: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserRank {
    pub user_id: PlayerId,
    pub rank: Rank,
    pub total_score: Score,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitScoreForm {
    pub user_id: PlayerId,
    pub score: Score,
    pub game_mode: GameMode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /top?n=
pub async fn top_players(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<TopQuery>, ApiError>,
) -> Result<Json<TopPlayersResponse>, ApiError> {
    let players = state.leaderboard.get_top(query.n).await?;

    Ok(Json(TopPlayersResponse {
        top_players: players.into_iter().map(LeaderboardEntry::from).collect(),
    }))
}

/// GET /rank/{user_id}
pub async fn player_rank(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<PlayerId>, ApiError>,
) -> Result<Json<UserRank>, ApiError> {
    let player = state.leaderboard.get_rank(user_id).await?;

    Ok(Json(UserRank {
        user_id: player.player_id,
        rank: player.rank,
        total_score: player.total_score,
    }))
}

/// POST /submit
pub async fn submit_score(
    State(state): State<AppState>,
    WithRejection(Json(form), _): WithRejection<Json<SubmitScoreForm>, ApiError>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .leaderboard
        .submit_score(form.user_id, form.score, form.game_mode)
        .await?;

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}
