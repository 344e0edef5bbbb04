use chrono::{DateTime, Utc};
use std::collections::HashMap;

use podium_types::{
    common::{GameMode, PlayerId, Score},
    errors::{AppError, StoreError},
};

use crate::aggregation::AggregationPolicy;

/// The aggregated record of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub total_score: Score,
    pub last_mode: GameMode,
    pub sessions_played: u64,
    pub updated_at: DateTime<Utc>,
}

/// Source of truth for the total score of each player.
///
/// Has no ordering responsibility: it only maps a player to its record and
/// applies the configured [`AggregationPolicy`] on every write.
#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    policy: AggregationPolicy,
    entries: HashMap<PlayerId, PlayerScore>,
}

impl ScoreStore {
    pub fn new(policy: AggregationPolicy) -> Self {
        Self {
            policy,
            entries: HashMap::new(),
        }
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Applies a score contribution and returns the updated record.
    pub fn upsert(
        &mut self,
        player_id: PlayerId,
        contribution: Score,
        mode: GameMode,
    ) -> Result<PlayerScore, AppError> {
        self.upsert_at(player_id, contribution, mode, Utc::now())
    }

    fn upsert_at(
        &mut self,
        player_id: PlayerId,
        contribution: Score,
        mode: GameMode,
        now: DateTime<Utc>,
    ) -> Result<PlayerScore, AppError> {
        if player_id <= 0 {
            return Err(AppError::InvalidPlayerId(player_id));
        }
        if contribution <= 0 {
            return Err(AppError::InvalidScore(contribution));
        }

        let current = self.entries.get(&player_id);
        let total_score = self
            .policy
            .apply(current.map(|p| p.total_score), contribution)
            .ok_or(AppError::ScoreOverflow(player_id))?;

        let record = PlayerScore {
            player_id,
            total_score,
            last_mode: mode,
            sessions_played: current.map_or(0, |p| p.sessions_played) + 1,
            updated_at: now,
        };
        self.entries.insert(player_id, record);

        Ok(record)
    }

    pub fn get(&self, player_id: PlayerId) -> Result<PlayerScore, StoreError> {
        self.entries
            .get(&player_id)
            .copied()
            .ok_or(StoreError::PlayerNotFound(player_id))
    }

    /// Puts back a previous state of a player. `None` forgets the player.
    pub fn restore(&mut self, player_id: PlayerId, previous: Option<PlayerScore>) {
        match previous {
            Some(record) => {
                self.entries.insert(player_id, record);
            }
            None => {
                self.entries.remove(&player_id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
