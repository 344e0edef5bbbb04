use std::sync::Arc;

use podium_types::{Result, errors::AppError};

use crate::{
    config::Config,
    cqrs::{CommandHandler, commands::SubmitScore},
    uow::UnitOfWork,
};

pub struct SubmitScoreCommandHandler {}

impl Default for SubmitScoreCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitScoreCommandHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait::async_trait]
impl CommandHandler<SubmitScore> for SubmitScoreCommandHandler {
    async fn handle(
        &self,
        command: SubmitScore,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<()> {
        config.check_player_id(command.player_id)?;
        if command.score <= 0 {
            return Err(AppError::InvalidScore(command.score).into());
        }

        let score_repo = uow.scores();
        let rank_repo = uow.ranks();

        let record = score_repo
            .upsert(command.player_id, command.score, command.mode)
            .await?;
        rank_repo
            .upsert(record.player_id, record.total_score)
            .await?;

        tracing::debug!(
            player_id = record.player_id,
            score = command.score,
            total_score = record.total_score,
            mode = %command.mode,
            "Score submitted"
        );

        Ok(())
    }
}
