use podium_ranking::{AggregationPolicy, RankIndex, ScoreStore};
use podium_types::{common::PlayerId, errors::StoreError};

/// The ranking state shared by every request: the score store and the rank
/// index always hold the same set of players.
#[derive(Debug, Default)]
pub struct LeaderboardState {
    pub(crate) scores: ScoreStore,
    pub(crate) index: RankIndex,
}

impl LeaderboardState {
    pub fn new(policy: AggregationPolicy) -> Self {
        Self {
            scores: ScoreStore::new(policy),
            index: RankIndex::new(),
        }
    }

    /// Same as [`LeaderboardState::new`] with deterministic index balancing.
    pub fn with_seed(policy: AggregationPolicy, seed: u64) -> Self {
        Self {
            scores: ScoreStore::new(policy),
            index: RankIndex::with_seed(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Checks that both structures agree, looking closely at `touched`.
    pub(crate) fn check_lockstep(&self, touched: &[PlayerId]) -> Result<(), StoreError> {
        if self.scores.len() != self.index.len() {
            return Err(StoreError::IndexOutOfSync {
                scores: self.scores.len(),
                ranked: self.index.len(),
            });
        }

        for &player_id in touched {
            let stored = self.scores.get(player_id).ok().map(|p| p.total_score);
            let ranked = self.index.score_of(player_id);
            if stored != ranked {
                return Err(StoreError::PlayerOutOfSync {
                    player_id,
                    stored,
                    ranked,
                });
            }
        }

        Ok(())
    }
}
