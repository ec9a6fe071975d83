use crate::models::submission::TestCaseResult;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CodeCheckRequest {
    pub question_id: i64,
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub code: String,
    pub language: String,
    /// Custom stdin for ungraded runs; absent for graded checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

/// Normalized response of the execution API for both run and test calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub compilation_error: Option<String>,
    #[serde(default)]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub memory_usage: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub passed_tests: Option<i64>,
    #[serde(default)]
    pub total_tests: Option<i64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub test_results: Vec<TestCaseResult>,
    /// Client-side marker: true when the report came from a graded check,
    /// false for experimental runs. Never serialized.
    #[serde(skip)]
    pub graded: bool,
}

impl ExecutionReport {
    /// Report for a question that has no test cases configured. Built locally
    /// so the student gets actionable feedback without a pointless round trip.
    pub fn no_test_cases() -> Self {
        Self {
            success: false,
            error: Some(
                "This question has no test cases available. Please contact your instructor."
                    .to_string(),
            ),
            message: Some("No test cases configured".to_string()),
            passed_tests: Some(0),
            total_tests: Some(0),
            graded: true,
            ..Self::default()
        }
    }

    pub fn failure_text(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.compilation_error.as_deref())
    }
}
