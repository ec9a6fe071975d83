use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RUN_TIMEOUT_SECS: u64 = 20;
const DEFAULT_TEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    /// Client-side budget for "run with custom input" calls.
    pub run_timeout_secs: u64,
    /// Client-side budget for graded test-case runs.
    pub test_timeout_secs: u64,
    pub poll_interval_secs: u64,
    /// Upper bound on result polling rounds; `None` polls until grading settles.
    pub poll_limit: Option<u32>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            api_base_url: get_env("CSCORE_API_BASE_URL")?,
            api_token: env::var("CSCORE_API_TOKEN").ok(),
            request_timeout_secs: get_env_parse_or(
                "CSCORE_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?,
            run_timeout_secs: get_env_parse_or("CSCORE_RUN_TIMEOUT_SECS", DEFAULT_RUN_TIMEOUT_SECS)?,
            test_timeout_secs: get_env_parse_or(
                "CSCORE_TEST_TIMEOUT_SECS",
                DEFAULT_TEST_TIMEOUT_SECS,
            )?,
            poll_interval_secs: get_env_parse_or(
                "CSCORE_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )?,
            poll_limit: match env::var("CSCORE_POLL_LIMIT") {
                Ok(raw) => Some(parse_value("CSCORE_POLL_LIMIT", &raw)?),
                Err(_) => None,
            },
        })
    }

    /// Config with defaults for everything but the base URL.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            run_timeout_secs: DEFAULT_RUN_TIMEOUT_SECS,
            test_timeout_secs: DEFAULT_TEST_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            poll_limit: None,
        }
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
