use crate::dto::execution_dto::ExecutionReport;
use crate::models::assignment::Question;
use std::collections::HashMap;

/// Per-question answers for one attempt, plus the latest graded check result
/// for each question. Owned by the attempt session; everything else reads it.
///
/// Invariants: at most one entry and one report per question id, and editing
/// a question's code always drops its report, so a stale pass/fail can never
/// sit next to changed code.
#[derive(Debug, Clone, Default)]
pub struct AnswerSheet {
    entries: HashMap<i64, AnswerEntry>,
    reports: HashMap<i64, ExecutionReport>,
}

#[derive(Debug, Clone, Default)]
pub struct AnswerEntry {
    pub answer: String,
    pub selected_options: Vec<i64>,
}

impl AnswerSheet {
    /// Initialize from the questions of a freshly fetched assignment,
    /// restoring any answers the backend already has on file.
    pub fn seed(questions: &[Question]) -> Self {
        let entries = questions
            .iter()
            .map(|q| {
                (
                    q.id,
                    AnswerEntry {
                        answer: q.user_answer.clone().unwrap_or_default(),
                        selected_options: q.selected_option_ids.clone(),
                    },
                )
            })
            .collect();
        Self {
            entries,
            reports: HashMap::new(),
        }
    }

    pub fn set_free_text(&mut self, question_id: i64, text: impl Into<String>) {
        self.entries.entry(question_id).or_default().answer = text.into();
        // The previous check result no longer describes this code.
        self.reports.remove(&question_id);
    }

    /// Radio semantics when `multiple` is false, checkbox toggle otherwise.
    pub fn toggle_option(&mut self, question_id: i64, option_id: i64, multiple: bool) {
        let entry = self.entries.entry(question_id).or_default();
        if multiple {
            if let Some(pos) = entry.selected_options.iter().position(|id| *id == option_id) {
                entry.selected_options.remove(pos);
            } else {
                entry.selected_options.push(option_id);
            }
        } else {
            entry.selected_options = vec![option_id];
        }
    }

    pub fn free_text(&self, question_id: i64) -> &str {
        self.entries
            .get(&question_id)
            .map(|e| e.answer.as_str())
            .unwrap_or_default()
    }

    pub fn selected_options(&self, question_id: i64) -> &[i64] {
        self.entries
            .get(&question_id)
            .map(|e| e.selected_options.as_slice())
            .unwrap_or_default()
    }

    pub fn is_answered(&self, question_id: i64) -> bool {
        self.entries.get(&question_id).is_some_and(|e| {
            !e.answer.trim().is_empty() || !e.selected_options.is_empty()
        })
    }

    pub fn answered_count(&self) -> usize {
        self.entries
            .keys()
            .filter(|id| self.is_answered(**id))
            .count()
    }

    pub fn record_report(&mut self, question_id: i64, report: ExecutionReport) {
        self.reports.insert(question_id, report);
    }

    pub fn report(&self, question_id: i64) -> Option<&ExecutionReport> {
        self.reports.get(&question_id)
    }

    pub fn clear_report(&mut self, question_id: i64) {
        self.reports.remove(&question_id);
    }
}
