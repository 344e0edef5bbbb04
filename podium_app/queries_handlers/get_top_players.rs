use async_trait::async_trait;
use std::sync::Arc;

use podium_types::errors::ApplicationError;

use crate::{
    config::Config,
    cqrs::{Query, QueryHandler, queries::GetTopPlayers},
    uow::UnitOfWork,
};

pub struct GetTopPlayersHandler {}

impl GetTopPlayersHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetTopPlayers> for GetTopPlayersHandler {
    async fn handle(
        &self,
        query: GetTopPlayers,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        _config: &Arc<Config>,
    ) -> Result<<GetTopPlayers as Query>::Output, ApplicationError> {
        // A non-positive limit is an empty page, not an error.
        if query.limit <= 0 {
            return Ok(Vec::new());
        }
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        uow.ranks().top(limit).await
    }
}
