use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the execution backend accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgrammingLanguage {
    C,
    Cpp,
    Java,
    Python,
}

impl ProgrammingLanguage {
    /// Name the backend expects on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            ProgrammingLanguage::C => "C",
            ProgrammingLanguage::Cpp => "CPP",
            ProgrammingLanguage::Java => "JAVA",
            ProgrammingLanguage::Python => "PYTHON",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" => Some(ProgrammingLanguage::C),
            "cpp" | "c++" => Some(ProgrammingLanguage::Cpp),
            "java" => Some(ProgrammingLanguage::Java),
            "python" | "py" => Some(ProgrammingLanguage::Python),
            _ => None,
        }
    }
}

impl fmt::Display for ProgrammingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess the language of a code snippet by ordered substring rules, first
/// match wins. This is a heuristic, not a parser: Python code that happens to
/// contain both "import " and "#include"-like text will misclassify, and that
/// is accepted behavior. Unmatched code falls back to C.
pub fn detect_language(code: &str) -> ProgrammingLanguage {
    if code.contains("public class")
        || code.contains("System.out.println")
        || code.contains("import java")
    {
        ProgrammingLanguage::Java
    } else if code.contains("print(")
        || code.contains("def ")
        || (code.contains("import ") && !code.contains("#include"))
    {
        ProgrammingLanguage::Python
    } else if code.contains("#include")
        && (code.contains("iostream") || code.contains("vector") || code.contains("string>"))
    {
        ProgrammingLanguage::Cpp
    } else if code.contains("#include")
        && (code.contains("stdio.h") || code.contains("printf") || code.contains("scanf"))
    {
        ProgrammingLanguage::C
    } else {
        ProgrammingLanguage::C
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_class_always_wins() {
        let snippets = [
            "public class Main {}",
            "#include <stdio.h>\npublic class Weird {}",
            "print(x)\npublic class AlsoWeird {}",
        ];
        for code in snippets {
            assert_eq!(detect_language(code), ProgrammingLanguage::Java, "{code}");
        }
    }

    #[test]
    fn python_by_def_or_print() {
        assert_eq!(detect_language("def sqr(n):\n    return n * n"), ProgrammingLanguage::Python);
        assert_eq!(detect_language("print('hello')"), ProgrammingLanguage::Python);
        assert_eq!(detect_language("import sys\nsys.exit(0)"), ProgrammingLanguage::Python);
    }

    #[test]
    fn import_plus_include_is_not_python() {
        let code = "#include <stdio.h>\n// import something\nint main() { scanf(\"%d\", &n); }";
        assert_eq!(detect_language(code), ProgrammingLanguage::C);
    }

    #[test]
    fn cpp_needs_include_and_a_cpp_header() {
        assert_eq!(
            detect_language("#include <iostream>\nint main() { std::cout << 1; }"),
            ProgrammingLanguage::Cpp
        );
        assert_eq!(
            detect_language("#include <vector>\nint main() {}"),
            ProgrammingLanguage::Cpp
        );
    }

    #[test]
    fn stdio_printf_scanf_is_c() {
        assert_eq!(
            detect_language("#include <stdio.h>\nint main() { printf(\"hi\"); }"),
            ProgrammingLanguage::C
        );
    }

    #[test]
    fn no_rule_matches_defaults_to_c() {
        assert_eq!(detect_language(""), ProgrammingLanguage::C);
        assert_eq!(detect_language("SELECT * FROM users;"), ProgrammingLanguage::C);
        assert_eq!(detect_language("fn main() {}"), ProgrammingLanguage::C);
    }

    #[test]
    fn wire_names_and_parsing() {
        assert_eq!(ProgrammingLanguage::Cpp.as_str(), "CPP");
        assert_eq!(ProgrammingLanguage::parse("c++"), Some(ProgrammingLanguage::Cpp));
        assert_eq!(ProgrammingLanguage::parse("Python"), Some(ProgrammingLanguage::Python));
        assert_eq!(ProgrammingLanguage::parse("haskell"), None);
    }
}
