//! Runtime settings for the triage services, read from the environment

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Default number of symptoms kept in a frequency ranking
pub const DEFAULT_TOP_SYMPTOMS: usize = 5;

/// Default number of patients summarized concurrently on a roster
pub const DEFAULT_ROSTER_CONCURRENCY: usize = 4;

/// Default timeout for a single repository fetch, in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Settings for summary and roster computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageConfig {
    /// How many symptoms a summary keeps (`PRENATAL_TOP_SYMPTOMS`)
    pub top_symptoms: usize,

    /// Upper bound on concurrent patient summaries (`PRENATAL_ROSTER_CONCURRENCY`)
    pub roster_concurrency: usize,

    /// Timeout applied to each repository fetch (`PRENATAL_FETCH_TIMEOUT_MS`, 0 disables)
    pub fetch_timeout: Option<Duration>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            top_symptoms: DEFAULT_TOP_SYMPTOMS,
            roster_concurrency: DEFAULT_ROSTER_CONCURRENCY,
            fetch_timeout: Some(Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS)),
        }
    }
}

impl TriageConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Unparseable values fall back to the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let top_symptoms = parse_or_default(&lookup, "PRENATAL_TOP_SYMPTOMS", DEFAULT_TOP_SYMPTOMS);

        let roster_concurrency =
            parse_or_default(&lookup, "PRENATAL_ROSTER_CONCURRENCY", DEFAULT_ROSTER_CONCURRENCY);
        let roster_concurrency = if roster_concurrency == 0 {
            warn!("PRENATAL_ROSTER_CONCURRENCY must be at least 1, using 1");
            1
        } else {
            roster_concurrency
        };

        let timeout_ms = parse_or_default(&lookup, "PRENATAL_FETCH_TIMEOUT_MS", DEFAULT_FETCH_TIMEOUT_MS);
        let fetch_timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

        Self {
            top_symptoms,
            roster_concurrency,
            fetch_timeout,
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using default {}", raw, key, default);
            default
        }),
        None => default,
    }
}
