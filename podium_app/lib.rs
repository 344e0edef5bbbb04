pub mod app;
pub mod command_handlers;
pub mod config;
pub mod cqrs;
pub mod queries_handlers;
pub mod repository;
pub mod service;
pub mod uow;

#[cfg(test)]
pub mod test_utils;
