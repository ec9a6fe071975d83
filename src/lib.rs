pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

use crate::services::api_service::{ApiService, LmsApi};
use crate::services::attempt_service::AttemptService;
use crate::services::execution_service::{CodeExecutor, ExecutionService};
use crate::services::result_service::ResultService;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Entry point of the crate: one shared HTTP client and the per-concern
/// services built from it. The embedding UI keeps one of these per signed-in
/// student and opens attempt sessions and result watches from it.
#[derive(Clone)]
pub struct CscoreClient {
    pub api: Arc<ApiService>,
    pub executor: Arc<ExecutionService>,
    pub attempts: AttemptService,
    pub results: ResultService,
}

impl CscoreClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(Error::Network)?;

        let api = Arc::new(ApiService::new(
            http_client.clone(),
            &config.api_base_url,
            config.api_token.clone(),
        )?);
        let executor = Arc::new(ExecutionService::new(
            http_client,
            &config.api_base_url,
            config.api_token.clone(),
            Duration::from_secs(config.run_timeout_secs),
            Duration::from_secs(config.test_timeout_secs),
        )?);

        let attempts = AttemptService::new(
            api.clone() as Arc<dyn LmsApi>,
            executor.clone() as Arc<dyn CodeExecutor>,
        );
        let results = ResultService::new(
            api.clone() as Arc<dyn LmsApi>,
            Duration::from_secs(config.poll_interval_secs),
            config.poll_limit,
        );

        Ok(Self {
            api,
            executor,
            attempts,
            results,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }
}
