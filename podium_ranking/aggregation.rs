use std::{fmt, str::FromStr};

use podium_types::common::Score;

/// How a new submission combines with a player's existing total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregationPolicy {
    /// Every session adds to the running total.
    #[default]
    Sum,
    /// The total is the best single session.
    Best,
    /// The total is the most recent session.
    Latest,
}

impl AggregationPolicy {
    /// Returns the new total, or `None` if it can't be represented.
    pub fn apply(&self, current: Option<Score>, contribution: Score) -> Option<Score> {
        match (self, current) {
            (_, None) => Some(contribution),
            (AggregationPolicy::Sum, Some(total)) => total.checked_add(contribution),
            (AggregationPolicy::Best, Some(total)) => Some(total.max(contribution)),
            (AggregationPolicy::Latest, Some(_)) => Some(contribution),
        }
    }
}

impl FromStr for AggregationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregationPolicy::Sum),
            "best" => Ok(AggregationPolicy::Best),
            "latest" => Ok(AggregationPolicy::Latest),
            other => Err(format!("unknown aggregation policy '{other}'")),
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationPolicy::Sum => "sum",
            AggregationPolicy::Best => "best",
            AggregationPolicy::Latest => "latest",
        };
        write!(f, "{name}")
    }
}
