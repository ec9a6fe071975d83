use crate::error::Result;
use crate::models::assignment::Assignment;
use crate::models::submission::{QuestionVerdict, Submission, SubmissionStatus};
use crate::services::api_service::LmsApi;
use std::sync::Arc;
use std::time::Duration;

/// Watches submissions for an assignment until grading settles and shapes
/// them into displayable score breakdowns.
#[derive(Clone)]
pub struct ResultService {
    api: Arc<dyn LmsApi>,
    poll_interval: Duration,
    poll_limit: Option<u32>,
}

/// Everything a result view renders for one graded submission.
#[derive(Debug, Clone)]
pub struct ScoreSummary {
    pub submission_id: i64,
    pub status: SubmissionStatus,
    pub status_label: &'static str,
    pub language: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub tests_passed: Option<i64>,
    pub tests_total: Option<i64>,
    pub feedback: Option<String>,
    pub questions: Vec<QuestionSummary>,
}

#[derive(Debug, Clone)]
pub struct QuestionSummary {
    pub question_id: i64,
    pub title: String,
    pub verdict: QuestionVerdict,
    pub earned_score: f64,
    pub max_score: f64,
    pub feedback: Option<String>,
    pub test_cases: Vec<TestCaseReview>,
}

/// Expected/actual detail for one test case of a programming question.
#[derive(Debug, Clone)]
pub struct TestCaseReview {
    pub input: String,
    pub expected_output: String,
    pub actual_output: Option<String>,
    pub passed: bool,
    pub error: Option<String>,
}

impl ResultService {
    pub fn new(api: Arc<dyn LmsApi>, poll_interval: Duration, poll_limit: Option<u32>) -> Self {
        Self {
            api,
            poll_interval,
            poll_limit,
        }
    }

    /// Submissions for one assignment, oldest first (the backend lists in
    /// submission order, so the newest attempt is the last element).
    pub async fn submissions_for(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        let submissions = self.api.my_submissions().await?;
        Ok(submissions
            .into_iter()
            .filter(|s| s.assignment_id == assignment_id)
            .collect())
    }

    pub fn latest(submissions: &[Submission]) -> Option<&Submission> {
        submissions.last()
    }

    /// Grading is still in flight: the status is non-terminal or the score
    /// has not been recorded yet.
    pub fn needs_refresh(submission: &Submission) -> bool {
        submission.status.is_processing() || submission.score.is_none()
    }

    /// Poll the submission list until the newest submission for the
    /// assignment leaves the grading pipeline, then return the final list.
    /// This is progress polling, not error retry: a failed refresh is logged
    /// and polling continues on the same cadence. Dropping the returned
    /// future cancels the watch.
    pub async fn watch(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        let mut submissions = self.submissions_for(assignment_id).await?;
        let mut polls: u32 = 0;

        loop {
            let processing = Self::latest(&submissions).is_some_and(Self::needs_refresh);
            if !processing {
                return Ok(submissions);
            }
            if let Some(limit) = self.poll_limit {
                if polls >= limit {
                    tracing::warn!(
                        assignment_id,
                        polls,
                        "stopped watching before grading settled"
                    );
                    return Ok(submissions);
                }
            }

            tokio::time::sleep(self.poll_interval).await;
            polls += 1;

            match self.submissions_for(assignment_id).await {
                Ok(refreshed) => submissions = refreshed,
                Err(err) => {
                    tracing::warn!(assignment_id, error = %err, "failed to refresh submissions")
                }
            }
        }
    }

    /// Shape a submission into the score breakdown the result view renders.
    /// The percentage is computed against the assignment's max score, the
    /// same way the backend reports it after grading.
    pub fn score_summary(assignment: &Assignment, submission: &Submission) -> ScoreSummary {
        let score = submission.score.unwrap_or(0.0);
        let max_score = if assignment.max_score > 0.0 {
            assignment.max_score
        } else {
            submission
                .question_results
                .iter()
                .map(|q| q.max_score)
                .sum()
        };
        let percentage = if max_score > 0.0 {
            (score / max_score) * 100.0
        } else {
            0.0
        };

        let questions = submission
            .question_results
            .iter()
            .map(|result| QuestionSummary {
                question_id: result.question_id,
                title: result.question_title.clone(),
                verdict: result.status,
                earned_score: result.earned_score,
                max_score: result.max_score,
                feedback: result.feedback.clone(),
                test_cases: result
                    .test_case_results
                    .iter()
                    .map(|case| TestCaseReview {
                        input: case.input.clone(),
                        expected_output: case.expected_output.clone(),
                        actual_output: case.actual_output.clone(),
                        passed: case.passed,
                        error: case.error.clone(),
                    })
                    .collect(),
            })
            .collect();

        ScoreSummary {
            submission_id: submission.id,
            status: submission.status,
            status_label: submission.status.label(),
            language: submission.programming_language.clone(),
            score,
            max_score,
            percentage,
            tests_passed: submission.test_cases_passed,
            tests_total: submission.total_test_cases,
            feedback: submission.feedback.clone(),
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment::{AssignmentType, QuestionType};
    use crate::models::submission::{QuestionResult, TestCaseResult};

    fn assignment() -> Assignment {
        Assignment {
            id: 42,
            title: "Exam".into(),
            description: String::new(),
            requirements: None,
            assignment_type: AssignmentType::Exam,
            course_id: 1,
            course_name: "Algorithms".into(),
            max_score: 100.0,
            time_limit: 60,
            start_time: None,
            end_time: None,
            allow_late_submission: false,
            is_submitted: true,
            current_score: None,
            submission_time: None,
            submission_status: None,
            public_test_cases: Vec::new(),
            total_test_cases: 0,
            total_questions: 1,
            questions: Vec::new(),
            created_at: None,
        }
    }

    fn submission(status: SubmissionStatus, score: Option<f64>) -> Submission {
        Submission {
            id: 9,
            assignment_id: 42,
            assignment_title: "Exam".into(),
            student_name: "Alice".into(),
            student_id: "S1".into(),
            programming_language: "C".into(),
            status,
            score,
            execution_time: None,
            memory_used: None,
            feedback: None,
            submission_time: None,
            graded_time: None,
            test_cases_passed: Some(3),
            total_test_cases: Some(4),
            question_results: vec![QuestionResult {
                question_id: 1,
                question_title: "Sum".into(),
                question_type: QuestionType::Programming,
                max_score: 100.0,
                earned_score: 75.0,
                status: QuestionVerdict::Partial,
                test_case_results: vec![TestCaseResult {
                    id: 1,
                    input: "1 2".into(),
                    expected_output: "3".into(),
                    actual_output: Some("4".into()),
                    passed: false,
                    execution_time: Some(0.01),
                    memory_usage: None,
                    error: None,
                }],
                feedback: None,
            }],
        }
    }

    #[test]
    fn grading_and_missing_scores_need_refresh() {
        assert!(ResultService::needs_refresh(&submission(
            SubmissionStatus::Grading,
            None
        )));
        assert!(ResultService::needs_refresh(&submission(
            SubmissionStatus::Submitted,
            Some(10.0)
        )));
        assert!(ResultService::needs_refresh(&submission(
            SubmissionStatus::Passed,
            None
        )));
        assert!(!ResultService::needs_refresh(&submission(
            SubmissionStatus::Passed,
            Some(100.0)
        )));
        assert!(!ResultService::needs_refresh(&submission(
            SubmissionStatus::Failed,
            Some(0.0)
        )));
    }

    #[test]
    fn summary_reports_percentage_and_per_case_detail() {
        let summary =
            ResultService::score_summary(&assignment(), &submission(SubmissionStatus::Partial, Some(75.0)));
        assert_eq!(summary.score, 75.0);
        assert_eq!(summary.max_score, 100.0);
        assert_eq!(summary.percentage, 75.0);
        assert_eq!(summary.status_label, "Partially correct");
        assert_eq!(summary.questions.len(), 1);

        let question = &summary.questions[0];
        assert_eq!(question.verdict, QuestionVerdict::Partial);
        assert_eq!(question.test_cases.len(), 1);
        assert_eq!(question.test_cases[0].actual_output.as_deref(), Some("4"));
        assert!(!question.test_cases[0].passed);
    }
}
