use dotenvy::dotenv;
use rand::{Rng, SeedableRng, rngs::StdRng};
use reqwest::{Client, StatusCode};
use std::{
    env,
    ops::RangeInclusive,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use podium_types::common::{GameMode, PlayerId, Score};
use podium_web::handlers::{MessageResponse, SubmitScoreForm, TopPlayersResponse, UserRank};

const SCORES: RangeInclusive<Score> = 10..=1000;

/// Settings of the load simulator.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub base_url: String,
    pub workers: usize,
    pub max_player_id: PlayerId,
    pub pause_ms: RangeInclusive<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/leaderboard".to_string(),
            workers: 10,
            max_player_id: 1_000_000,
            pause_ms: 100..=500,
        }
    }
}

impl SimulationConfig {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = match lookup("PODIUM_SIMULATE_URL") {
            Some(val) if !val.trim().is_empty() => val.trim().trim_end_matches('/').to_string(),
            _ => defaults.base_url,
        };

        let workers = match lookup("PODIUM_SIMULATE_WORKERS") {
            Some(val) => match val.parse::<usize>() {
                Ok(workers) if workers > 0 => workers,
                _ => defaults.workers,
            },
            None => defaults.workers,
        };

        let max_player_id = match lookup("PODIUM_SIMULATE_MAX_PLAYER_ID") {
            Some(val) => match val.parse::<PlayerId>() {
                Ok(max) if max > 0 => max,
                _ => defaults.max_player_id,
            },
            None => defaults.max_player_id,
        };

        let pause_ms = match lookup("PODIUM_SIMULATE_PAUSE_MS") {
            Some(val) => parse_range(&val).unwrap_or(defaults.pause_ms),
            None => defaults.pause_ms,
        };

        Self {
            base_url,
            workers,
            max_player_id,
            pause_ms,
        }
    }
}

/// Parses `min..max` (both inclusive).
fn parse_range(val: &str) -> Option<RangeInclusive<u64>> {
    let (min, max) = val.split_once("..")?;
    let min = min.trim().parse::<u64>().ok()?;
    let max = max.trim().parse::<u64>().ok()?;
    (min <= max).then_some(min..=max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    Top,
    Rank,
}

impl Action {
    fn pick<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Action::Submit,
            1 => Action::Top,
            _ => Action::Rank,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    NotFound,
    Failed,
}

impl Outcome {
    fn from_status(action: Action, status: StatusCode) -> Self {
        if status == StatusCode::NOT_FOUND {
            return Outcome::NotFound;
        }
        tracing::warn!("{action:?} answered with {status}");
        Outcome::Failed
    }
}

#[derive(Debug, Default)]
pub struct Counter {
    ok: AtomicU64,
    not_found: AtomicU64,
    failed: AtomicU64,
}

impl Counter {
    fn record(&self, outcome: Outcome) {
        let slot = match outcome {
            Outcome::Ok => &self.ok,
            Outcome::NotFound => &self.not_found,
            Outcome::Failed => &self.failed,
        };
        slot.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ok(&self) -> u64 {
        self.ok.load(Ordering::Relaxed)
    }

    pub fn not_found(&self) -> u64 {
        self.not_found.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.ok() + self.not_found() + self.failed()
    }
}

/// Request outcomes per action, shared by every worker.
#[derive(Debug, Default)]
pub struct Stats {
    pub submit: Counter,
    pub top: Counter,
    pub rank: Counter,
}

impl Stats {
    fn counter(&self, action: Action) -> &Counter {
        match action {
            Action::Submit => &self.submit,
            Action::Top => &self.top,
            Action::Rank => &self.rank,
        }
    }

    pub fn total(&self) -> u64 {
        self.submit.total() + self.top.total() + self.rank.total()
    }

    pub fn failed(&self) -> u64 {
        self.submit.failed() + self.top.failed() + self.rank.failed()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "{} requests: {} scores submitted, {} top reads, {} rank reads ({} unknown players), {} failed",
            self.total(),
            self.submit.ok(),
            self.top.ok(),
            self.rank.ok(),
            self.rank.not_found(),
            self.failed()
        );
    }
}

/// Runs random actions against the API, pausing between them.
/// Stops after `iterations` actions, or never when `None`.
pub async fn run_worker(
    client: Client,
    config: Arc<SimulationConfig>,
    stats: Arc<Stats>,
    iterations: Option<u64>,
) {
    let mut rng = StdRng::from_entropy();
    let mut done = 0;

    while iterations.is_none_or(|n| done < n) {
        let action = Action::pick(&mut rng);
        let result = match action {
            Action::Submit => {
                let form = SubmitScoreForm {
                    user_id: rng.gen_range(1..=config.max_player_id),
                    score: rng.gen_range(SCORES),
                    game_mode: if rng.gen_bool(0.5) {
                        GameMode::Solo
                    } else {
                        GameMode::Team
                    },
                };
                submit(&client, &config.base_url, &form).await
            }
            Action::Top => top(&client, &config.base_url).await,
            Action::Rank => {
                let user_id = rng.gen_range(1..=config.max_player_id);
                rank(&client, &config.base_url, user_id).await
            }
        };

        let outcome = result.unwrap_or_else(|e| {
            tracing::warn!("{action:?} request failed: {e}");
            Outcome::Failed
        });
        stats.counter(action).record(outcome);
        done += 1;

        let pause = rng.gen_range(config.pause_ms.clone());
        if pause > 0 {
            tokio::time::sleep(Duration::from_millis(pause)).await;
        }
    }
}

async fn submit(
    client: &Client,
    base_url: &str,
    form: &SubmitScoreForm,
) -> Result<Outcome, reqwest::Error> {
    let res = client
        .post(format!("{base_url}/submit"))
        .json(form)
        .send()
        .await?;
    if !res.status().is_success() {
        return Ok(Outcome::from_status(Action::Submit, res.status()));
    }

    res.json::<MessageResponse>().await?;
    Ok(Outcome::Ok)
}

async fn top(client: &Client, base_url: &str) -> Result<Outcome, reqwest::Error> {
    let res = client.get(format!("{base_url}/top")).send().await?;
    if !res.status().is_success() {
        return Ok(Outcome::from_status(Action::Top, res.status()));
    }

    res.json::<TopPlayersResponse>().await?;
    Ok(Outcome::Ok)
}

async fn rank(
    client: &Client,
    base_url: &str,
    user_id: PlayerId,
) -> Result<Outcome, reqwest::Error> {
    let res = client
        .get(format!("{base_url}/rank/{user_id}"))
        .send()
        .await?;
    if !res.status().is_success() {
        return Ok(Outcome::from_status(Action::Rank, res.status()));
    }

    res.json::<UserRank>().await?;
    Ok(Outcome::Ok)
}
