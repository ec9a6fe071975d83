use serde::{Deserialize, Serialize};
use validator::Validate;

/// Legacy submission payload: every answered question flattened into one code
/// string with comment separators, plus a single declared language. The wire
/// shape is owned by the backend and kept for compatibility with older
/// single-question assignments.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub assignment_id: i64,
    #[validate(length(min = 1, message = "submission code must not be empty"))]
    pub code: String,
    #[validate(length(min = 1, message = "programming language must be set"))]
    pub programming_language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_is_rejected_before_it_reaches_the_network() {
        let request = SubmissionRequest {
            assignment_id: 1,
            code: String::new(),
            programming_language: "C".into(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn payload_uses_camel_case_field_names() {
        let request = SubmissionRequest {
            assignment_id: 5,
            code: "int main() {}".into(),
            programming_language: "C".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["assignmentId"], 5);
        assert_eq!(json["programmingLanguage"], "C");
    }
}
