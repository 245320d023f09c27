#![forbid(unsafe_code)]

//! Console narrative for a completed run.

use serde::Serialize;

use crate::protocol::ExecutionResult;

pub const SUCCESS_HEADER: &str = "=== SUCCESS ===\n";
pub const SUCCESS_PLACEHOLDER: &str = "Program executed successfully";
pub const SUCCESS_STATUS: &str = "Execution complete";

pub const ERROR_HEADER: &str = "=== ERROR ===\n";
pub const ERROR_PLACEHOLDER: &str = "Unknown error";
pub const OUTPUT_HEADER: &str = "\n\n=== OUTPUT ===\n";
pub const ERROR_STATUS: &str = "Compilation error";

/// Which branch a result fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    NonZeroExit,
}

/// Console text plus status line for one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub outcome: Outcome,
    pub text: String,
    pub status: &'static str,
}

/// Classify `result`. Total and deterministic.
#[must_use]
pub fn classify(result: &ExecutionResult) -> Narrative {
    if result.exit_code == 0 {
        let body = non_empty_or(&result.stdout, SUCCESS_PLACEHOLDER);
        return Narrative {
            outcome: Outcome::Success,
            text: format!("{SUCCESS_HEADER}{body}"),
            status: SUCCESS_STATUS,
        };
    }

    let mut text = String::with_capacity(
        ERROR_HEADER.len() + result.stderr.len() + OUTPUT_HEADER.len() + result.stdout.len(),
    );
    text.push_str(ERROR_HEADER);
    text.push_str(non_empty_or(&result.stderr, ERROR_PLACEHOLDER));
    if !result.stdout.is_empty() {
        text.push_str(OUTPUT_HEADER);
        text.push_str(&result.stdout);
    }
    Narrative {
        outcome: Outcome::NonZeroExit,
        text,
        status: ERROR_STATUS,
    }
}

fn non_empty_or<'a>(s: &'a str, placeholder: &'a str) -> &'a str {
    if s.is_empty() { placeholder } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_with_output() {
        let n = classify(&ExecutionResult::new(0, "42\n", ""));
        assert_eq!(n.outcome, Outcome::Success);
        assert_eq!(n.text, "=== SUCCESS ===\n42\n");
        assert_eq!(n.status, "Execution complete");
    }

    #[test]
    fn success_without_output_uses_placeholder() {
        let n = classify(&ExecutionResult::new(0, "", "warning"));
        assert_eq!(n.text, "=== SUCCESS ===\nProgram executed successfully");
    }

    #[test]
    fn error_without_stdout_has_no_output_section() {
        let n = classify(&ExecutionResult::new(1, "", "parse error"));
        assert_eq!(n.outcome, Outcome::NonZeroExit);
        assert_eq!(n.text, "=== ERROR ===\nparse error");
        assert_eq!(n.status, "Compilation error");
    }

    #[test]
    fn error_with_stdout_appends_output_section() {
        let n = classify(&ExecutionResult::new(2, "partial\n", "crash"));
        assert_eq!(n.text, "=== ERROR ===\ncrash\n\n=== OUTPUT ===\npartial\n");
    }

    #[test]
    fn error_without_stderr_uses_placeholder() {
        let n = classify(&ExecutionResult::new(-9, "", ""));
        assert_eq!(n.text, "=== ERROR ===\nUnknown error");
    }

    #[test]
    fn extreme_exit_codes_are_errors() {
        for code in [i64::MIN, i64::MAX] {
            assert_eq!(classify(&ExecutionResult::new(code, "", "")).outcome, Outcome::NonZeroExit);
        }
    }
}
