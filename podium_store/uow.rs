use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use podium_app::{
    repository::{RankRepository, ScoreRepository},
    uow::{UnitOfWork, UnitOfWorkProvider},
};
use podium_ranking::{AggregationPolicy, PlayerScore};
use podium_types::{
    common::{PlayerId, Score},
    errors::{ApplicationError, StoreError},
};

use crate::{
    repository::{InMemoryRankRepository, InMemoryScoreRepository},
    state::LeaderboardState,
};

enum StateGuard<'a> {
    Read(RwLockReadGuard<'a, LeaderboardState>),
    Write(RwLockWriteGuard<'a, LeaderboardState>),
}

/// Pre-image of a single write, replayed on rollback.
#[derive(Debug)]
pub(crate) enum Undo {
    Score {
        player_id: PlayerId,
        previous: Option<PlayerScore>,
    },
    Rank {
        player_id: PlayerId,
        previous: Option<Score>,
    },
}

/// Holds the lock on the ranking state for the lifetime of a unit of work.
///
/// Writes go straight to the state and push their pre-image onto the
/// journal. The journal is replayed when the unit of work is rolled back,
/// fails validation on commit, or is dropped before committing (e.g. the
/// request future was cancelled), all while the write lock is still held.
pub(crate) struct Transaction<'a> {
    guard: StateGuard<'a>,
    journal: Vec<Undo>,
}

impl<'a> Transaction<'a> {
    fn new(guard: StateGuard<'a>) -> Self {
        Self {
            guard,
            journal: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> &LeaderboardState {
        match &self.guard {
            StateGuard::Read(state) => &**state,
            StateGuard::Write(state) => &**state,
        }
    }

    pub(crate) fn state_mut(&mut self) -> Result<&mut LeaderboardState, StoreError> {
        match &mut self.guard {
            StateGuard::Write(state) => Ok(&mut **state),
            StateGuard::Read(_) => Err(StoreError::ReadOnlyUnitOfWork),
        }
    }

    pub(crate) fn record(&mut self, undo: Undo) {
        self.journal.push(undo);
    }

    fn validate(&self) -> Result<(), StoreError> {
        let mut touched: Vec<PlayerId> = self
            .journal
            .iter()
            .map(|undo| match undo {
                Undo::Score { player_id, .. } | Undo::Rank { player_id, .. } => *player_id,
            })
            .collect();
        touched.sort_unstable();
        touched.dedup();

        self.state().check_lockstep(&touched)
    }

    fn rollback(&mut self) {
        let StateGuard::Write(state) = &mut self.guard else {
            return;
        };

        while let Some(undo) = self.journal.pop() {
            match undo {
                Undo::Score {
                    player_id,
                    previous,
                } => state.scores.restore(player_id, previous),
                Undo::Rank {
                    player_id,
                    previous: Some(score),
                } => state.index.upsert(player_id, score),
                Undo::Rank {
                    player_id,
                    previous: None,
                } => {
                    state.index.remove(player_id);
                }
            }
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.journal.is_empty() {
            tracing::warn!(
                "Unit of work dropped with {} pending writes, rolling back",
                self.journal.len()
            );
            self.rollback();
        }
    }
}

pub struct InMemoryUnitOfWork<'a> {
    tx: Arc<Mutex<Transaction<'a>>>,
}

impl<'a> InMemoryUnitOfWork<'a> {
    fn new(guard: StateGuard<'a>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Transaction::new(guard))),
        }
    }
}

#[async_trait::async_trait]
impl<'a> UnitOfWork<'a> for InMemoryUnitOfWork<'a> {
    fn scores(&self) -> Arc<dyn ScoreRepository + 'a> {
        Arc::new(InMemoryScoreRepository::new(self.tx.clone()))
    }

    fn ranks(&self) -> Arc<dyn RankRepository + 'a> {
        Arc::new(InMemoryRankRepository::new(self.tx.clone()))
    }

    async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
        let mut tx = self.tx.lock().await;

        if let Err(e) = tx.validate() {
            tx.rollback();
            return Err(e.into());
        }
        tx.journal.clear();

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ApplicationError> {
        self.tx.lock().await.rollback();
        Ok(())
    }
}

/// Owns the single ranking state of the service and hands out units of
/// work over it: writers get exclusive access, readers share it.
pub struct InMemoryUnitOfWorkProvider {
    state: RwLock<LeaderboardState>,
}

impl InMemoryUnitOfWorkProvider {
    pub fn new(policy: AggregationPolicy) -> Self {
        Self::from_state(LeaderboardState::new(policy))
    }

    pub fn from_state(state: LeaderboardState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }
}

#[async_trait::async_trait]
impl UnitOfWorkProvider for InMemoryUnitOfWorkProvider {
    async fn begin<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
        let guard = self.state.write().await;
        Ok(Box::new(InMemoryUnitOfWork::new(StateGuard::Write(guard))))
    }

    async fn begin_read<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
        let guard = self.state.read().await;
        Ok(Box::new(InMemoryUnitOfWork::new(StateGuard::Read(guard))))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::timeout;

    use podium_types::{Result, common::GameMode};

    use super::*;

    fn provider() -> InMemoryUnitOfWorkProvider {
        InMemoryUnitOfWorkProvider::from_state(LeaderboardState::with_seed(
            AggregationPolicy::Sum,
            17,
        ))
    }

    async fn submit(uow: &Box<dyn UnitOfWork<'_> + '_>, player_id: PlayerId, score: Score) -> Result<()> {
        let record = uow.scores().upsert(player_id, score, GameMode::Solo).await?;
        uow.ranks().upsert(player_id, record.total_score).await
    }

    #[tokio::test]
    async fn test_commit_keeps_writes() -> Result<()> {
        let provider = provider();

        let uow = provider.begin().await?;
        submit(&uow, 1, 10).await?;
        submit(&uow, 2, 20).await?;
        uow.commit().await?;

        let uow = provider.begin_read().await?;
        assert_eq!(uow.scores().get(1).await?.total_score, 10);
        assert_eq!(uow.ranks().rank_of(2).await?.rank, 1);
        assert_eq!(uow.ranks().count().await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_rollback_restores_previous_state() -> Result<()> {
        let provider = provider();

        let uow = provider.begin().await?;
        submit(&uow, 1, 10).await?;
        uow.commit().await?;

        let uow = provider.begin().await?;
        submit(&uow, 1, 40).await?;
        submit(&uow, 2, 20).await?;
        assert_eq!(uow.ranks().rank_of(2).await?.rank, 2);
        uow.rollback().await?;

        let uow = provider.begin_read().await?;
        let record = uow.scores().get(1).await?;
        assert_eq!(record.total_score, 10);
        assert_eq!(record.sessions_played, 1);
        assert_eq!(uow.ranks().rank_of(1).await?.total_score, 10);
        assert!(uow.scores().get(2).await.is_err());
        assert!(uow.ranks().rank_of(2).await.is_err());
        assert_eq!(uow.scores().count().await?, 1);
        assert_eq!(uow.ranks().count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() -> Result<()> {
        let provider = provider();

        {
            let uow = provider.begin().await?;
            submit(&uow, 5, 10).await?;
        }

        let uow = provider.begin_read().await?;
        assert_eq!(uow.scores().count().await?, 0);
        assert_eq!(uow.ranks().count().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_half_applied_write_is_not_committed() -> Result<()> {
        let provider = provider();

        let uow = provider.begin().await?;
        uow.scores().upsert(3, 10, GameMode::Team).await?;
        let err = uow.commit().await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Store(StoreError::IndexOutOfSync {
                scores: 1,
                ranked: 0
            })
        ));

        let uow = provider.begin_read().await?;
        assert_eq!(uow.scores().count().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_read_only_unit_of_work_rejects_writes() -> Result<()> {
        let provider = provider();

        let uow = provider.begin_read().await?;
        let result = uow.scores().upsert(1, 10, GameMode::Solo).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Store(StoreError::ReadOnlyUnitOfWork))
        ));
        let result = uow.ranks().upsert(1, 10).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Store(StoreError::ReadOnlyUnitOfWork))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_readers_share_writers_exclude() -> Result<()> {
        let provider = provider();

        let first = provider.begin_read().await?;
        let second = timeout(Duration::from_millis(100), provider.begin_read())
            .await
            .expect("readers should not block each other")?;
        assert!(
            timeout(Duration::from_millis(50), provider.begin())
                .await
                .is_err(),
            "writer must wait for readers"
        );
        drop(first);
        drop(second);

        let writer = provider.begin().await?;
        assert!(
            timeout(Duration::from_millis(50), provider.begin_read())
                .await
                .is_err(),
            "readers must wait for the writer"
        );
        writer.rollback().await?;

        assert!(provider.begin_read().await.is_ok());
        Ok(())
    }
}
