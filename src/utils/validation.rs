use crate::utils::language::ProgrammingLanguage;

/// Advisory pre-flight checks on code about to be run or tested. Issues are
/// warnings for the student to confirm past, never hard failures; the
/// execution backend has the final word.
pub fn lint_code(code: &str, language: ProgrammingLanguage) -> Vec<String> {
    let mut issues = Vec::new();

    if code.trim().is_empty() {
        issues.push("Code is empty".to_string());
        return issues;
    }

    match language {
        ProgrammingLanguage::Python => {
            if !code.contains("def ") && !code.contains('=') && !code.contains("print") {
                issues.push(
                    "Python code might be incomplete - consider adding functions or statements"
                        .to_string(),
                );
            }
        }
        ProgrammingLanguage::C | ProgrammingLanguage::Cpp => {
            if !code.contains('{') || !code.contains('}') {
                issues.push("C/C++ code might be missing function structure".to_string());
            }
        }
        ProgrammingLanguage::Java => {
            if !code.contains('{') || !code.contains('}') {
                issues.push("Java code might be missing class/method structure".to_string());
            }
        }
    }

    issues
}
