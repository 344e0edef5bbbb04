use dotenvy::dotenv;
use std::env;

use podium_ranking::AggregationPolicy;
use podium_types::{common::PlayerId, errors::AppError};

pub struct Config {
    pub port: u16,
    pub top_default: i64,
    pub max_player_id: PlayerId,
    pub aggregation: AggregationPolicy,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            top_default: 10,
            max_player_id: 1_000_000,
            aggregation: AggregationPolicy::Sum,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config reading each variable through `lookup`.
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PODIUM_PORT") {
            Some(val) => val.parse::<u16>().unwrap_or(defaults.port),
            None => defaults.port,
        };

        let top_default = match lookup("PODIUM_TOP_DEFAULT") {
            Some(val) => val.parse::<i64>().unwrap_or(defaults.top_default).max(0),
            None => defaults.top_default,
        };

        let max_player_id = match lookup("PODIUM_MAX_PLAYER_ID") {
            Some(val) => match val.parse::<PlayerId>() {
                Ok(max) if max > 0 => max,
                _ => defaults.max_player_id,
            },
            None => defaults.max_player_id,
        };

        let aggregation = match lookup("PODIUM_AGGREGATION") {
            Some(val) => val.parse::<AggregationPolicy>().unwrap_or_else(|e| {
                tracing::warn!("{e}, falling back to {}", defaults.aggregation);
                defaults.aggregation
            }),
            None => defaults.aggregation,
        };

        let cors_origins = match lookup("PODIUM_CORS_ORIGINS") {
            Some(val) => {
                let origins: Vec<String> = val
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                if origins.is_empty() {
                    defaults.cors_origins
                } else {
                    origins
                }
            }
            None => defaults.cors_origins,
        };

        Self {
            port,
            top_default,
            max_player_id,
            aggregation,
            cors_origins,
        }
    }

    /// Accepts ids in `1..=max_player_id`.
    pub fn check_player_id(&self, player_id: PlayerId) -> Result<(), AppError> {
        if player_id <= 0 {
            return Err(AppError::InvalidPlayerId(player_id));
        }
        if player_id > self.max_player_id {
            return Err(AppError::PlayerIdOutOfRange {
                player_id,
                max: self.max_player_id,
            });
        }
        Ok(())
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}
