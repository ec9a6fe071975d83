use crate::dto::execution_dto::{CodeCheckRequest, ExecutionReport};
use crate::dto::submission_dto::SubmissionRequest;
use crate::error::{Error, Result};
use crate::models::answer::AnswerSheet;
use crate::models::assignment::{Assignment, Question, QuestionType};
use crate::models::course::Course;
use crate::models::submission::Submission;
use crate::services::api_service::LmsApi;
use crate::services::execution_service::CodeExecutor;
use crate::utils::countdown::{Countdown, Tick};
use crate::utils::language::{detect_language, ProgrammingLanguage};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// Separator between per-question code blocks in the legacy flattened payload.
pub const QUESTION_SEPARATOR: &str = "\n\n// --- Next Question ---\n\n";
/// Declared language for submissions without programming questions.
pub const FALLBACK_LANGUAGE: &str = "javascript";

#[derive(Clone)]
pub struct AttemptService {
    api: Arc<dyn LmsApi>,
    executor: Arc<dyn CodeExecutor>,
}

impl AttemptService {
    pub fn new(api: Arc<dyn LmsApi>, executor: Arc<dyn CodeExecutor>) -> Self {
        Self { api, executor }
    }

    /// Fetch course and assignment concurrently and open a session: answers
    /// restored from whatever the backend has on file, countdown seeded from
    /// the assignment's time limit.
    pub async fn start(&self, course_id: i64, assignment_id: i64) -> Result<AttemptSession> {
        let (course, assignment) = tokio::try_join!(
            self.api.get_student_course(course_id),
            self.api.get_assignment_for_student(assignment_id),
        )?;
        tracing::info!(
            course_id,
            assignment_id,
            questions = assignment.questions.len(),
            time_limit = assignment.time_limit,
            "attempt session opened"
        );
        Ok(AttemptSession::new(
            course,
            assignment,
            self.api.clone(),
            self.executor.clone(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Ready,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// The student confirmed submission in the UI.
    Manual,
    /// The countdown ran out; same submit logic, no confirmation step.
    Auto,
}

/// Navigator entry for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionState {
    pub question_id: i64,
    pub answered: bool,
    /// Outcome of the latest graded check, if one was run for the current code.
    pub passed: Option<bool>,
}

/// One timed attempt at an assignment. Owns the answer sheet and the
/// countdown; the embedding UI drives it and treats everything else as
/// read-only.
pub struct AttemptSession {
    course: Course,
    assignment: Assignment,
    api: Arc<dyn LmsApi>,
    executor: Arc<dyn CodeExecutor>,
    answers: AnswerSheet,
    countdown: Countdown,
    current_index: usize,
    phase: AttemptPhase,
    last_error: Option<String>,
    submission: Option<Submission>,
}

impl AttemptSession {
    pub fn new(
        course: Course,
        assignment: Assignment,
        api: Arc<dyn LmsApi>,
        executor: Arc<dyn CodeExecutor>,
    ) -> Self {
        let assignment = assignment.into_multi_question();
        let answers = AnswerSheet::seed(&assignment.questions);
        let countdown = match assignment.time_limit_seconds() {
            Some(seconds) => Countdown::new(seconds),
            None => Countdown::inactive(),
        };
        Self {
            course,
            assignment,
            api,
            executor,
            answers,
            countdown,
            current_index: 0,
            phase: AttemptPhase::Ready,
            last_error: None,
            submission: None,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Submission record returned by the backend, once submitted.
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn time_remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.assignment.questions.get(self.current_index)
    }

    /// Navigation is clamped to the question range.
    pub fn next_question(&mut self) -> usize {
        let last = self.assignment.questions.len().saturating_sub(1);
        self.current_index = (self.current_index + 1).min(last);
        self.current_index
    }

    pub fn prev_question(&mut self) -> usize {
        self.current_index = self.current_index.saturating_sub(1);
        self.current_index
    }

    pub fn goto_question(&mut self, index: usize) -> usize {
        let last = self.assignment.questions.len().saturating_sub(1);
        self.current_index = index.min(last);
        self.current_index
    }

    pub fn question_states(&self) -> Vec<QuestionState> {
        self.assignment
            .questions
            .iter()
            .map(|q| QuestionState {
                question_id: q.id,
                answered: self.answers.is_answered(q.id),
                passed: self.answers.report(q.id).map(|r| r.success),
            })
            .collect()
    }

    /// Replace the free-text answer for a question. Choice questions are
    /// answered through `select_option`, never through text.
    pub fn set_free_text(&mut self, question_id: i64, text: impl Into<String>) -> Result<()> {
        let question = self.require_question(question_id)?;
        if question.question_type.is_choice() {
            return Err(Error::BadRequest(format!(
                "question {question_id} expects an option selection, not free text"
            )));
        }
        self.answers.set_free_text(question_id, text);
        Ok(())
    }

    pub fn select_option(&mut self, question_id: i64, option_id: i64) -> Result<()> {
        let question = self.require_question(question_id)?;
        if !question.question_type.is_choice() {
            return Err(Error::BadRequest(format!(
                "question {question_id} expects a text answer, not an option selection"
            )));
        }
        let multiple = question.question_type.allows_multiple_selections();
        self.answers.toggle_option(question_id, option_id, multiple);
        Ok(())
    }

    /// Ungraded run of the current code for a question, optionally with
    /// custom stdin. The result is returned to the caller but not recorded:
    /// only graded checks drive the navigator pass/fail markers.
    pub async fn run_question(
        &mut self,
        question_id: i64,
        input: Option<String>,
    ) -> Result<ExecutionReport> {
        let request = self.code_request(question_id, input)?;
        self.executor.run(request).await
    }

    /// Graded check of the current code against the question's test cases.
    /// The report replaces any previous one for the question.
    pub async fn test_question(&mut self, question_id: i64) -> Result<ExecutionReport> {
        let question = self.require_question(question_id)?;
        if question.visible_test_cases().is_empty() {
            let report = ExecutionReport::no_test_cases();
            self.answers.record_report(question_id, report.clone());
            return Ok(report);
        }

        let request = self.code_request(question_id, None)?;
        let report = self.executor.test(request).await?;
        self.answers.record_report(question_id, report.clone());
        Ok(report)
    }

    fn code_request(&self, question_id: i64, input: Option<String>) -> Result<CodeCheckRequest> {
        let question = self.require_question(question_id)?;
        let code = self.answers.free_text(question_id);
        if code.trim().is_empty() {
            return Err(Error::BadRequest(
                "Enter code before checking it".to_string(),
            ));
        }
        let language = question
            .language
            .as_deref()
            .and_then(ProgrammingLanguage::parse)
            .unwrap_or_else(|| detect_language(code));
        Ok(CodeCheckRequest {
            question_id,
            code: code.to_string(),
            language: language.as_str().to_string(),
            input,
        })
    }

    /// Submit the attempt. Manual and automatic triggers share this path; the
    /// at-most-once guard makes a timer expiry racing a user click result in
    /// exactly one backend call. A failed submit keeps the answers and leaves
    /// the session retryable.
    pub async fn submit(&mut self, trigger: SubmitTrigger) -> Result<Submission> {
        match self.phase {
            AttemptPhase::Submitting => {
                return Err(Error::BadRequest(
                    "a submission is already in progress".to_string(),
                ))
            }
            AttemptPhase::Submitted => {
                return Err(Error::BadRequest(
                    "this attempt has already been submitted".to_string(),
                ))
            }
            AttemptPhase::Ready => {}
        }

        let request = match self.build_submission_request() {
            Ok(request) => request,
            Err(err) => {
                self.last_error = Some(err.user_message());
                return Err(err);
            }
        };
        request.validate()?;

        if trigger == SubmitTrigger::Auto {
            tracing::info!(
                assignment_id = self.assignment.id,
                "time limit reached, submitting automatically"
            );
        }

        self.phase = AttemptPhase::Submitting;
        self.last_error = None;

        match self.api.submit_assignment(request).await {
            Ok(submission) => {
                self.phase = AttemptPhase::Submitted;
                self.countdown.cancel();
                self.submission = Some(submission.clone());
                Ok(submission)
            }
            Err(err) => {
                // Stay retryable; the student's answers are untouched.
                self.phase = AttemptPhase::Ready;
                self.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Drive the countdown at one tick per second until it expires, then
    /// auto-submit once. Resolves immediately for untimed assignments.
    /// Dropping the returned future cancels the timer.
    pub async fn run_countdown(&mut self) -> Result<Option<Submission>> {
        if !self.countdown.is_active() {
            return Ok(None);
        }

        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            match self.countdown.tick() {
                Tick::Running(_) => {}
                Tick::Idle => return Ok(None),
                Tick::Expired => {
                    if self.phase != AttemptPhase::Ready {
                        return Ok(None);
                    }
                    return self.submit(SubmitTrigger::Auto).await.map(Some);
                }
            }
        }
    }

    /// Flatten the answer sheet into the legacy single-string payload.
    ///
    /// An attempt with at least one programming question submits only the
    /// programming answers, joined by the separator comment, declared under
    /// the language detected for the first non-empty answer even when later
    /// questions are written in other languages. Anything else submits every
    /// non-empty answer under a question header with a placeholder language.
    /// Both are backend compatibility behavior, kept as-is.
    fn build_submission_request(&self) -> Result<SubmissionRequest> {
        if self.assignment.has_programming_questions() {
            let blocks: Vec<(&str, ProgrammingLanguage)> = self
                .assignment
                .questions
                .iter()
                .filter(|q| q.question_type == QuestionType::Programming)
                .filter_map(|q| {
                    let code = self.answers.free_text(q.id);
                    (!code.trim().is_empty()).then(|| (code, detect_language(code)))
                })
                .collect();

            if blocks.is_empty() {
                return Err(Error::BadRequest(
                    "Enter code for at least one question before submitting".to_string(),
                ));
            }

            let language = blocks[0].1;
            let code = blocks
                .iter()
                .map(|(code, _)| *code)
                .collect::<Vec<_>>()
                .join(QUESTION_SEPARATOR);

            return Ok(SubmissionRequest {
                assignment_id: self.assignment.id,
                code,
                programming_language: language.as_str().to_string(),
            });
        }

        let blocks: Vec<String> = self
            .assignment
            .questions
            .iter()
            .filter_map(|q| {
                let answer = self.answers.free_text(q.id);
                (!answer.trim().is_empty())
                    .then(|| format!("// Question {}: {}\n{}", q.id, q.title, answer))
            })
            .collect();

        if blocks.is_empty() {
            return Err(Error::BadRequest(
                "Enter an answer for at least one question before submitting".to_string(),
            ));
        }

        Ok(SubmissionRequest {
            assignment_id: self.assignment.id,
            code: blocks.join(QUESTION_SEPARATOR),
            programming_language: FALLBACK_LANGUAGE.to_string(),
        })
    }

    fn require_question(&self, question_id: i64) -> Result<&Question> {
        self.assignment
            .question(question_id)
            .ok_or_else(|| {
                Error::NotFound(format!("question {question_id} not found in this assignment"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignment::{AssignmentType, QuestionOption, TestCase};
    use async_trait::async_trait;

    struct NullApi;

    #[async_trait]
    impl LmsApi for NullApi {
        async fn get_student_course(&self, _course_id: i64) -> Result<Course> {
            unreachable!("not used in these tests")
        }
        async fn get_assignment_for_student(&self, _assignment_id: i64) -> Result<Assignment> {
            unreachable!("not used in these tests")
        }
        async fn submit_assignment(&self, _request: SubmissionRequest) -> Result<Submission> {
            unreachable!("not used in these tests")
        }
        async fn my_submissions(&self) -> Result<Vec<Submission>> {
            unreachable!("not used in these tests")
        }
        async fn submission_details(&self, _submission_id: i64) -> Result<Submission> {
            unreachable!("not used in these tests")
        }
    }

    struct NullExecutor;

    #[async_trait]
    impl CodeExecutor for NullExecutor {
        async fn run(&self, _request: CodeCheckRequest) -> Result<ExecutionReport> {
            unreachable!("not used in these tests")
        }
        async fn test(&self, _request: CodeCheckRequest) -> Result<ExecutionReport> {
            unreachable!("not used in these tests")
        }
    }

    fn question(id: i64, question_type: QuestionType) -> Question {
        Question {
            id,
            title: format!("Question {id}"),
            description: String::new(),
            question_type,
            points: 10.0,
            order_index: id as i32,
            public_test_cases: vec![TestCase {
                id,
                input: "1".into(),
                expected_output: "1".into(),
                is_hidden: false,
                points: 5.0,
            }],
            example_test_cases: Vec::new(),
            options: if question_type.is_choice() {
                vec![
                    QuestionOption {
                        id: id * 100 + 1,
                        question_id: id,
                        option_text: "A".into(),
                        order_index: 1,
                    },
                    QuestionOption {
                        id: id * 100 + 2,
                        question_id: id,
                        option_text: "B".into(),
                        order_index: 2,
                    },
                ]
            } else {
                Vec::new()
            },
            is_answered: false,
            user_answer: None,
            selected_option_ids: Vec::new(),
            starter_code: None,
            language: None,
            total_test_cases: None,
        }
    }

    fn assignment(questions: Vec<Question>) -> Assignment {
        Assignment {
            id: 42,
            title: "Weekly exercise".into(),
            description: String::new(),
            requirements: None,
            assignment_type: AssignmentType::Exercise,
            course_id: 7,
            course_name: "Programming 1".into(),
            max_score: 100.0,
            time_limit: 0,
            start_time: None,
            end_time: None,
            allow_late_submission: false,
            is_submitted: false,
            current_score: None,
            submission_time: None,
            submission_status: None,
            public_test_cases: Vec::new(),
            total_test_cases: 0,
            total_questions: questions.len() as i64,
            questions,
            created_at: None,
        }
    }

    fn course() -> Course {
        Course {
            id: 7,
            name: "Programming 1".into(),
            code: "PRG101".into(),
            description: String::new(),
            credit_hours: 3,
            semester: "Fall".into(),
            year: 2025,
            is_active: true,
            max_students: 60,
            current_student_count: 48,
            teacher: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn session(questions: Vec<Question>) -> AttemptSession {
        AttemptSession::new(
            course(),
            assignment(questions),
            Arc::new(NullApi),
            Arc::new(NullExecutor),
        )
    }

    #[test]
    fn navigation_is_clamped_to_the_question_range() {
        let mut session = session(vec![
            question(1, QuestionType::Programming),
            question(2, QuestionType::Essay),
        ]);
        assert_eq!(session.prev_question(), 0);
        assert_eq!(session.next_question(), 1);
        assert_eq!(session.next_question(), 1);
        assert_eq!(session.goto_question(99), 1);
        assert_eq!(session.goto_question(0), 0);
    }

    #[test]
    fn programming_payload_joins_blocks_and_uses_first_language() {
        let mut session = session(vec![
            question(1, QuestionType::Programming),
            question(2, QuestionType::Programming),
            question(3, QuestionType::Essay),
        ]);
        session.set_free_text(1, "def f():\n    return 1").unwrap();
        session
            .set_free_text(2, "public class Main { public static void main(String[] a) {} }")
            .unwrap();
        session.set_free_text(3, "an essay answer that is dropped").unwrap();

        let request = session.build_submission_request().unwrap();
        assert_eq!(request.programming_language, "PYTHON");
        assert!(request.code.contains(QUESTION_SEPARATOR));
        assert!(request.code.contains("def f()"));
        assert!(request.code.contains("public class Main"));
        assert!(!request.code.contains("essay answer"));
    }

    #[test]
    fn generic_payload_prefixes_question_headers() {
        let mut session = session(vec![
            question(1, QuestionType::Essay),
            question(2, QuestionType::Essay),
        ]);
        session.set_free_text(1, "first answer").unwrap();

        let request = session.build_submission_request().unwrap();
        assert_eq!(request.programming_language, FALLBACK_LANGUAGE);
        assert!(request.code.starts_with("// Question 1: Question 1\n"));
        assert!(!request.code.contains("Question 2:"));
    }

    #[test]
    fn free_text_is_refused_on_choice_questions() {
        let mut session = session(vec![question(1, QuestionType::MultipleChoice)]);
        let err = session.set_free_text(1, "text").unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(!session.answers().is_answered(1));
    }

    #[test]
    fn option_selection_is_refused_on_text_questions() {
        let mut session = session(vec![question(1, QuestionType::Essay)]);
        assert!(session.select_option(1, 101).is_err());
    }

    #[test]
    fn true_false_keeps_radio_semantics() {
        let mut session = session(vec![question(1, QuestionType::TrueFalse)]);
        session.select_option(1, 101).unwrap();
        session.select_option(1, 102).unwrap();
        assert_eq!(session.answers().selected_options(1), &[102]);
    }
}
