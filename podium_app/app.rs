use std::sync::Arc;

use podium_types::errors::{ApplicationError, ErrorKind};

use crate::{
    config::Config,
    cqrs::{Command, CommandHandler, Query, QueryHandler},
    uow::UnitOfWorkProvider,
};

/// AppBus (Mediator)
/// This struct is the central entry point for all application logic.
/// It does not contain any business logic itself.
/// Its primary roles are:
/// 1. Managing Unit of Work (transaction) lifecycles.
/// 2. Dispatching Commands and Queries to their respective handlers.
pub struct AppBus {
    config: Arc<Config>,
    uow_provider: Arc<dyn UnitOfWorkProvider>,
}

impl AppBus {
    pub fn new(config: Arc<Config>, uow_provider: Arc<dyn UnitOfWorkProvider>) -> Self {
        Self {
            config,
            uow_provider,
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Executes a command.
    /// A command is an operation that modifies the system state.
    /// This method manages the transaction:
    /// - It begins a Unit of Work.
    /// - It passes the UoW to the handler.
    /// - If the handler succeeds, it commits the UoW.
    /// - If the handler fails, it rolls back the UoW.
    pub async fn execute<C, H>(&self, cmd: C, handler: H) -> Result<(), ApplicationError>
    where
        C: Command,
        H: CommandHandler<C>,
    {
        let uow = self.uow_provider.begin().await?;

        let result = match handler.handle(cmd, &uow, &self.config).await {
            Ok(_) => uow.commit().await,
            Err(e) => {
                uow.rollback().await?;
                Err(e)
            }
        };

        result.inspect_err(log_internal)
    }

    /// Executes a query.
    /// A query is an operation that reads system state and returns data.
    /// It should *never* modify the state.
    /// This method ensures the transaction is *always* rolled back.
    pub async fn query<Q, H>(&self, query: Q, handler: H) -> Result<Q::Output, ApplicationError>
    where
        Q: Query,
        H: QueryHandler<Q>,
    {
        let uow = self.uow_provider.begin_read().await?;

        let result = handler.handle(query, &uow, &self.config).await;

        // Always rollback a query, as it should never write data.
        uow.rollback().await?;

        result.inspect_err(log_internal)
    }
}

fn log_internal(e: &ApplicationError) {
    if e.kind() == ErrorKind::Internal {
        tracing::error!("Operation aborted: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command_handlers::SubmitScoreCommandHandler,
        cqrs::{
            commands::SubmitScore,
            queries::{GetPlayerRank, GetTopPlayers},
        },
        queries_handlers::{GetPlayerRankHandler, GetTopPlayersHandler},
        test_utils::MockUnitOfWorkProvider,
    };
    use podium_types::{common::GameMode, errors::StoreError};

    fn setup() -> (AppBus, Arc<MockUnitOfWorkProvider>) {
        let provider = Arc::new(MockUnitOfWorkProvider::new());
        let bus = AppBus::new(Arc::new(Config::default()), provider.clone());
        (bus, provider)
    }

    #[tokio::test]
    async fn test_execute_commits_on_success() {
        let (bus, provider) = setup();

        bus.execute(
            SubmitScore::new(7, 50, GameMode::Solo),
            SubmitScoreCommandHandler::new(),
        )
        .await
        .unwrap();

        assert_eq!(provider.commits(), 1);
        assert_eq!(provider.rollbacks(), 0);
    }

    #[tokio::test]
    async fn test_execute_rolls_back_on_failure() {
        let (bus, provider) = setup();

        let result = bus
            .execute(
                SubmitScore::new(0, 50, GameMode::Solo),
                SubmitScoreCommandHandler::new(),
            )
            .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(provider.commits(), 0);
        assert_eq!(provider.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_queries_are_always_rolled_back() {
        let (bus, provider) = setup();

        bus.query(GetTopPlayers { limit: 10 }, GetTopPlayersHandler::new())
            .await
            .unwrap();
        let missing = bus
            .query(GetPlayerRank { player_id: 999 }, GetPlayerRankHandler::new())
            .await;

        assert!(matches!(
            missing,
            Err(ApplicationError::Store(StoreError::PlayerNotFound(999)))
        ));
        assert_eq!(provider.commits(), 0);
        assert_eq!(provider.rollbacks(), 2);
    }
}
