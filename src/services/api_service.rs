use crate::dto::submission_dto::SubmissionRequest;
use crate::error::{Error, Result};
use crate::models::assignment::Assignment;
use crate::models::course::Course;
use crate::models::submission::Submission;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// Student-facing surface of the CScore backend REST API.
#[async_trait]
pub trait LmsApi: Send + Sync {
    async fn get_student_course(&self, course_id: i64) -> Result<Course>;
    async fn get_assignment_for_student(&self, assignment_id: i64) -> Result<Assignment>;
    async fn submit_assignment(&self, request: SubmissionRequest) -> Result<Submission>;
    async fn my_submissions(&self) -> Result<Vec<Submission>>;
    async fn submission_details(&self, submission_id: i64) -> Result<Submission>;
}

#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiService {
    pub fn new(client: Client, base_url: &str, token: Option<String>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.authorize(self.client.get(url)).send().await?;
        decode_json(response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.endpoint(path)?;
        let response = self
            .authorize(self.client.post(url))
            .json(body)
            .send()
            .await?;
        decode_json(response).await
    }
}

#[async_trait]
impl LmsApi for ApiService {
    async fn get_student_course(&self, course_id: i64) -> Result<Course> {
        self.get_json(&format!("/api/student/courses/{course_id}"))
            .await
    }

    async fn get_assignment_for_student(&self, assignment_id: i64) -> Result<Assignment> {
        let assignment: Assignment = self
            .get_json(&format!("/api/student/assignments/{assignment_id}"))
            .await?;
        // Older single-question assignments arrive with no questions array.
        Ok(assignment.into_multi_question())
    }

    async fn submit_assignment(&self, request: SubmissionRequest) -> Result<Submission> {
        tracing::info!(
            assignment_id = request.assignment_id,
            language = %request.programming_language,
            "submitting assignment"
        );
        self.post_json(
            &format!("/api/student/assignments/{}/submit", request.assignment_id),
            &request,
        )
        .await
    }

    async fn my_submissions(&self) -> Result<Vec<Submission>> {
        self.get_json("/api/student/submissions").await
    }

    async fn submission_details(&self, submission_id: i64) -> Result<Submission> {
        self.get_json(&format!("/api/student/submissions/{submission_id}"))
            .await
    }
}

/// Decode a backend response, turning non-2xx replies into `Error::Api` with
/// the backend's own `message`/`error` text passed through verbatim.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .or_else(|| value.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status_fallback(status).to_string());
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(Error::from)
}

fn status_fallback(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Invalid data. Please check your input and try again.",
        401 => "Your session has expired. Please sign in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        500 => "Internal server error. Please try again later.",
        503 => "The service is temporarily unavailable. Please try again later.",
        _ => "The request failed with an unexpected status.",
    }
}
