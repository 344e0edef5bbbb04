pub mod repository;
mod state;
pub mod uow;

pub use repository::*;
pub use state::LeaderboardState;
pub use uow::InMemoryUnitOfWorkProvider;
