use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Assignment as served to a student, with nested questions, options and
/// public test cases. Read-only for the duration of an attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(rename = "type")]
    pub assignment_type: AssignmentType,
    pub course_id: i64,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub max_score: f64,
    /// Minutes; zero or negative means the attempt is untimed.
    #[serde(default)]
    pub time_limit: i64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub allow_late_submission: bool,
    #[serde(default)]
    pub is_submitted: bool,
    #[serde(default)]
    pub current_score: Option<f64>,
    #[serde(default)]
    pub submission_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submission_status: Option<String>,
    #[serde(default)]
    pub public_test_cases: Vec<TestCase>,
    #[serde(default)]
    pub total_test_cases: i64,
    #[serde(default)]
    pub total_questions: i64,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentType {
    Exercise,
    Exam,
    Project,
    Quiz,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub public_test_cases: Vec<TestCase>,
    #[serde(default)]
    pub example_test_cases: Vec<TestCase>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub is_answered: bool,
    #[serde(default)]
    pub user_answer: Option<String>,
    #[serde(default)]
    pub selected_option_ids: Vec<i64>,
    #[serde(default)]
    pub starter_code: Option<String>,
    /// Language declared by the teacher for this question, if any.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub total_test_cases: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Programming,
    MultipleChoice,
    Essay,
    TrueFalse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: i64,
    #[serde(default)]
    pub question_id: i64,
    pub option_text: String,
    #[serde(default)]
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub points: f64,
}

impl QuestionType {
    /// Answered by picking options rather than typing text.
    pub fn is_choice(self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }

    /// Checkbox semantics; TRUE_FALSE keeps radio semantics.
    pub fn allows_multiple_selections(self) -> bool {
        matches!(self, QuestionType::MultipleChoice)
    }
}

impl Question {
    /// Test cases shown to the student and used for the graded check. The
    /// example set takes precedence when the backend distinguishes the two.
    pub fn visible_test_cases(&self) -> &[TestCase] {
        if !self.example_test_cases.is_empty() {
            &self.example_test_cases
        } else {
            &self.public_test_cases
        }
    }
}

impl Assignment {
    pub fn time_limit_seconds(&self) -> Option<u32> {
        (self.time_limit > 0).then(|| self.time_limit as u32 * 60)
    }

    pub fn has_programming_questions(&self) -> bool {
        self.questions
            .iter()
            .any(|q| q.question_type == QuestionType::Programming)
    }

    pub fn question(&self, question_id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Normalize a legacy single-question assignment into the multi-question
    /// shape: older assignments carry their statement and public test cases at
    /// the top level with an empty `questions` array, so a synthetic question
    /// is derived from the assignment itself.
    pub fn into_multi_question(mut self) -> Self {
        if !self.questions.is_empty() {
            self.total_questions = self.questions.len() as i64;
            return self;
        }

        let question_type = if !self.public_test_cases.is_empty() || self.total_test_cases > 0 {
            QuestionType::Programming
        } else {
            QuestionType::Essay
        };

        let mut description = self.description.clone();
        if let Some(requirements) = &self.requirements {
            if !description.is_empty() {
                description.push_str("\n\n");
            }
            description.push_str(requirements);
        }

        let question = Question {
            id: self.id,
            title: self.title.clone(),
            description,
            question_type,
            points: self.max_score,
            order_index: 1,
            public_test_cases: self.public_test_cases.clone(),
            example_test_cases: Vec::new(),
            options: Vec::new(),
            is_answered: self.is_submitted,
            user_answer: None,
            selected_option_ids: Vec::new(),
            starter_code: None,
            language: None,
            total_test_cases: Some(self.total_test_cases),
        };

        if self.total_questions < 1 {
            self.total_questions = 1;
        }
        self.questions = vec![question];
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_assignment() -> Assignment {
        Assignment {
            id: 7,
            title: "Count characters".into(),
            description: "Count the characters in the input.".into(),
            requirements: Some("Read from stdin.".into()),
            assignment_type: AssignmentType::Exercise,
            course_id: 1,
            course_name: "Intro".into(),
            max_score: 10.0,
            time_limit: 45,
            start_time: None,
            end_time: None,
            allow_late_submission: false,
            is_submitted: false,
            current_score: None,
            submission_time: None,
            submission_status: None,
            public_test_cases: vec![TestCase {
                id: 1,
                input: "abc".into(),
                expected_output: "3".into(),
                is_hidden: false,
                points: 5.0,
            }],
            total_test_cases: 4,
            total_questions: 0,
            questions: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn legacy_assignment_gains_one_synthetic_question() {
        let assignment = legacy_assignment().into_multi_question();
        assert_eq!(assignment.questions.len(), 1);
        assert_eq!(assignment.total_questions, 1);

        let question = &assignment.questions[0];
        assert_eq!(question.id, 7);
        assert_eq!(question.question_type, QuestionType::Programming);
        assert_eq!(question.points, 10.0);
        assert!(question.description.contains("Read from stdin."));
        assert_eq!(question.public_test_cases.len(), 1);
    }

    #[test]
    fn multi_question_assignment_is_left_alone() {
        let mut assignment = legacy_assignment();
        assignment.questions = vec![Question {
            id: 21,
            title: "Q1".into(),
            description: String::new(),
            question_type: QuestionType::Essay,
            points: 5.0,
            order_index: 1,
            public_test_cases: Vec::new(),
            example_test_cases: Vec::new(),
            options: Vec::new(),
            is_answered: false,
            user_answer: None,
            selected_option_ids: Vec::new(),
            starter_code: None,
            language: None,
            total_test_cases: None,
        }];

        let assignment = assignment.into_multi_question();
        assert_eq!(assignment.questions.len(), 1);
        assert_eq!(assignment.questions[0].id, 21);
    }

    #[test]
    fn time_limit_converts_to_seconds() {
        let mut assignment = legacy_assignment();
        assert_eq!(assignment.time_limit_seconds(), Some(45 * 60));

        assignment.time_limit = 0;
        assert_eq!(assignment.time_limit_seconds(), None);
    }
}
