use crate::dto::execution_dto::{CodeCheckRequest, ExecutionReport};
use crate::error::{Error, Result};
use crate::services::api_service::decode_json;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;
use validator::Validate;

pub const CHECK_QUESTION_CODE_PATH: &str = "/api/student/check-question-code";

const RUN_TIMEOUT_HINT: &str = "This might indicate an infinite loop in your code, a server \
                                overload, or a connectivity problem.";
const TEST_TIMEOUT_HINT: &str = "Auto-grading took too long. Check for infinite loops or \
                                 performance problems in your code, or try again when the server \
                                 is less busy.";

/// Client of the code-execution API. Compilation and sandboxing happen on the
/// server; this side only ships code and normalizes the reply.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Execute without grading, optionally against custom stdin.
    async fn run(&self, request: CodeCheckRequest) -> Result<ExecutionReport>;
    /// Execute against the question's server-held test cases, hidden ones
    /// included, and collect per-case verdicts.
    async fn test(&self, request: CodeCheckRequest) -> Result<ExecutionReport>;
}

#[derive(Clone)]
pub struct ExecutionService {
    client: Client,
    base_url: Url,
    token: Option<String>,
    run_timeout: Duration,
    test_timeout: Duration,
}

impl ExecutionService {
    pub fn new(
        client: Client,
        base_url: &str,
        token: Option<String>,
        run_timeout: Duration,
        test_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            token,
            run_timeout,
            test_timeout,
        })
    }

    async fn check(
        &self,
        request: &CodeCheckRequest,
        timeout: Duration,
        timeout_hint: &str,
    ) -> Result<ExecutionReport> {
        request.validate()?;

        let url = self.base_url.join(CHECK_QUESTION_CODE_PATH)?;
        let mut builder = self.client.post(url).json(request).timeout(timeout);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                Error::Timeout(format!(
                    "Code execution exceeded {} seconds. {}",
                    timeout.as_secs(),
                    timeout_hint
                ))
            } else {
                Error::from(err)
            }
        })?;

        decode_json(response).await
    }
}

#[async_trait]
impl CodeExecutor for ExecutionService {
    async fn run(&self, request: CodeCheckRequest) -> Result<ExecutionReport> {
        let had_input = request.input.as_deref().is_some_and(|s| !s.is_empty());
        tracing::debug!(
            question_id = request.question_id,
            language = %request.language,
            "running code without grading"
        );

        let mut report = self.check(&request, self.run_timeout, RUN_TIMEOUT_HINT).await?;
        report.graded = false;
        if had_input {
            report.message = Some(
                "Ran with custom input. The output is for reference only and is not graded."
                    .to_string(),
            );
        }
        Ok(report)
    }

    async fn test(&self, request: CodeCheckRequest) -> Result<ExecutionReport> {
        tracing::debug!(
            question_id = request.question_id,
            language = %request.language,
            "testing code against server test cases"
        );

        let mut report = self.check(&request, self.test_timeout, TEST_TIMEOUT_HINT).await?;
        report.graded = true;
        Ok(report)
    }
}
