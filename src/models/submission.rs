use crate::models::assignment::QuestionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    #[serde(default)]
    pub assignment_title: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub programming_language: String,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub memory_used: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub submission_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub graded_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_cases_passed: Option<i64>,
    #[serde(default)]
    pub total_test_cases: Option<i64>,
    #[serde(default)]
    pub question_results: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    NotSubmitted,
    Submitted,
    Grading,
    Graded,
    Passed,
    Partial,
    Failed,
    CompilationError,
    CompileError,
    RuntimeError,
    Error,
    NoTests,
    Late,
    Pending,
}

impl SubmissionStatus {
    /// Grading has not settled yet.
    pub fn is_processing(self) -> bool {
        matches!(self, SubmissionStatus::Submitted | SubmissionStatus::Grading)
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::NotSubmitted => "Not submitted",
            SubmissionStatus::Submitted => "Submitted",
            SubmissionStatus::Grading => "Grading",
            SubmissionStatus::Graded => "Graded",
            SubmissionStatus::Passed => "Passed",
            SubmissionStatus::Partial => "Partially correct",
            SubmissionStatus::Failed => "Failed",
            SubmissionStatus::CompilationError | SubmissionStatus::CompileError => {
                "Compilation error"
            }
            SubmissionStatus::RuntimeError => "Runtime error",
            SubmissionStatus::Error => "Error",
            SubmissionStatus::NoTests => "No test cases",
            SubmissionStatus::Late => "Late",
            SubmissionStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: i64,
    #[serde(default)]
    pub question_title: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub max_score: f64,
    #[serde(default)]
    pub earned_score: f64,
    pub status: QuestionVerdict,
    #[serde(default)]
    pub test_case_results: Vec<TestCaseResult>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionVerdict {
    Correct,
    Partial,
    Incorrect,
    NotAnswered,
}

/// Outcome of one test case, as reported by the grader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub actual_output: Option<String>,
    pub passed: bool,
    #[serde(default)]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub memory_usage: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}
