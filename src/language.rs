//! Fence language guessing for code blocks
//!
//! Only a handful of languages are recognised, by plain substring checks on
//! the lowercased block text. The checks run in a fixed order and the first
//! hit wins. Because `"sh"` is tested first, text mentioning `csharp` is
//! tagged `bash`.

/// Language tag written after the opening code fence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    Bash,
    Python,
    Cpp,
    CSharp,
    /// No tag, the fence is left bare
    Unknown,
}

impl CodeLanguage {
    /// The tag as written in the fence (`""` for [`CodeLanguage::Unknown`])
    pub fn as_str(self) -> &'static str {
        match self {
            CodeLanguage::Bash => "bash",
            CodeLanguage::Python => "python",
            CodeLanguage::Cpp => "cpp",
            CodeLanguage::CSharp => "csharp",
            CodeLanguage::Unknown => "",
        }
    }
}

/// Guess the fence language of a code block
///
/// ```rust
/// use htm2md::language::{guess_language, CodeLanguage};
///
/// assert_eq!(guess_language("!/bin/bash"), CodeLanguage::Bash);
/// assert_eq!(guess_language("# Python 3 only"), CodeLanguage::Python);
/// assert_eq!(guess_language("int main() {}"), CodeLanguage::Unknown);
/// ```
pub fn guess_language(code: &str) -> CodeLanguage {
    let lower = code.to_lowercase();

    if code.starts_with('!') || lower.contains("sh") {
        CodeLanguage::Bash
    } else if lower.contains("python") {
        CodeLanguage::Python
    } else if lower.contains("cpp") {
        CodeLanguage::Cpp
    } else if lower.contains("csharp") {
        CodeLanguage::CSharp
    } else {
        CodeLanguage::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bang_prefix_is_bash() {
        assert_eq!(guess_language("!/bin/bash"), CodeLanguage::Bash);
        assert_eq!(guess_language("!pip install numpy"), CodeLanguage::Bash);
    }

    #[test]
    fn test_sh_substring_is_bash() {
        assert_eq!(guess_language("$ SHELL=zsh"), CodeLanguage::Bash);
        assert_eq!(guess_language("git push origin main"), CodeLanguage::Bash);
    }

    #[test]
    fn test_python_any_case() {
        assert_eq!(guess_language("# Python example\nx = 1"), CodeLanguage::Python);
        assert_eq!(guess_language("PYTHON"), CodeLanguage::Python);
    }

    #[test]
    fn test_bash_outranks_python() {
        assert_eq!(guess_language("python -m pip install flask"), CodeLanguage::Python);
        assert_eq!(guess_language("python script.sh"), CodeLanguage::Bash);
    }

    #[test]
    fn test_cpp() {
        assert_eq!(guess_language("// main.cpp\nint main() {}"), CodeLanguage::Cpp);
    }

    #[test]
    fn test_csharp_is_shadowed_by_sh() {
        assert_eq!(guess_language("// csharp\nvar x = 1;"), CodeLanguage::Bash);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(guess_language(""), CodeLanguage::Unknown);
        assert_eq!(guess_language("let x = 5;"), CodeLanguage::Unknown);
        assert_eq!(CodeLanguage::Unknown.as_str(), "");
    }

    proptest! {
        #[test]
        fn prop_python_marker_without_bash_markers(
            prefix in "[a-gi-rt-z ]{0,20}",
            suffix in "[a-gi-rt-z ]{0,20}",
            marker in prop::sample::select(vec!["python", "Python", "PYTHON", "pYtHoN"]),
        ) {
            let code = format!("{prefix}{marker}{suffix}");
            prop_assert_eq!(guess_language(&code), CodeLanguage::Python);
        }

        #[test]
        fn prop_guess_is_deterministic(code in ".{0,80}") {
            prop_assert_eq!(guess_language(&code), guess_language(&code));
        }

        #[test]
        fn prop_bang_prefix_always_bash(rest in ".{0,40}") {
            let code = format!("!{rest}");
            prop_assert_eq!(guess_language(&code), CodeLanguage::Bash);
        }
    }
}
