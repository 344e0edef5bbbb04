#![cfg(not(tarpaulin_include))]

use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use podium_ranking::{PlayerScore, RankIndex, ScoreStore};
use podium_types::{
    common::{GameMode, PlayerId, RankedPlayer, Score},
    errors::{ApplicationError, StoreError},
};

use crate::{
    repository::{RankRepository, ScoreRepository},
    uow::{UnitOfWork, UnitOfWorkProvider},
};

#[derive(Default, Clone)]
pub struct MockScoreRepository {
    store: Arc<Mutex<ScoreStore>>,
}

#[async_trait]
impl ScoreRepository for MockScoreRepository {
    async fn upsert(
        &self,
        player_id: PlayerId,
        contribution: Score,
        mode: GameMode,
    ) -> Result<PlayerScore, ApplicationError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .upsert(player_id, contribution, mode)?)
    }

    async fn get(&self, player_id: PlayerId) -> Result<PlayerScore, ApplicationError> {
        Ok(self.store.lock().unwrap().get(player_id)?)
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.store.lock().unwrap().len())
    }
}

#[derive(Default, Clone)]
pub struct MockRankRepository {
    index: Arc<Mutex<RankIndex>>,
}

#[async_trait]
impl RankRepository for MockRankRepository {
    async fn upsert(&self, player_id: PlayerId, score: Score) -> Result<(), ApplicationError> {
        self.index.lock().unwrap().upsert(player_id, score);
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<RankedPlayer>, ApplicationError> {
        Ok(self.index.lock().unwrap().top_k(limit))
    }

    async fn rank_of(&self, player_id: PlayerId) -> Result<RankedPlayer, ApplicationError> {
        let index = self.index.lock().unwrap();
        match (index.rank_of(player_id), index.score_of(player_id)) {
            (Some(rank), Some(total_score)) => Ok(RankedPlayer {
                player_id,
                total_score,
                rank,
            }),
            _ => Err(StoreError::PlayerNotFound(player_id).into()),
        }
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.index.lock().unwrap().len())
    }
}

#[derive(Clone)]
pub struct MockUnitOfWork {
    scores: MockScoreRepository,
    ranks: MockRankRepository,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
}

#[async_trait]
impl<'a> UnitOfWork<'a> for MockUnitOfWork {
    fn scores(&self) -> Arc<dyn ScoreRepository + 'a> {
        Arc::new(self.scores.clone())
    }

    fn ranks(&self) -> Arc<dyn RankRepository + 'a> {
        Arc::new(self.ranks.clone())
    }

    async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out units of work sharing the same state. Writes are applied
/// immediately and never undone; only commits and rollbacks are counted.
#[derive(Default)]
pub struct MockUnitOfWorkProvider {
    scores: MockScoreRepository,
    ranks: MockRankRepository,
    commits: Arc<AtomicUsize>,
    rollbacks: Arc<AtomicUsize>,
}

impl MockUnitOfWorkProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits one solo session per `(player_id, score)` pair.
    pub fn seed(&self, players: &[(PlayerId, Score)]) {
        for (player_id, score) in players {
            let record = self
                .scores
                .store
                .lock()
                .unwrap()
                .upsert(*player_id, *score, GameMode::Solo)
                .unwrap();
            self.ranks
                .index
                .lock()
                .unwrap()
                .upsert(record.player_id, record.total_score);
        }
    }

    /// Ranks a player the score store doesn't know about.
    pub fn seed_index_only(&self, player_id: PlayerId, score: Score) {
        self.ranks.index.lock().unwrap().upsert(player_id, score);
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    fn unit_of_work(&self) -> MockUnitOfWork {
        MockUnitOfWork {
            scores: self.scores.clone(),
            ranks: self.ranks.clone(),
            commits: self.commits.clone(),
            rollbacks: self.rollbacks.clone(),
        }
    }
}

#[async_trait]
impl UnitOfWorkProvider for MockUnitOfWorkProvider {
    async fn begin<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
        Ok(Box::new(self.unit_of_work()))
    }

    async fn begin_read<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
        Ok(Box::new(self.unit_of_work()))
    }
}
