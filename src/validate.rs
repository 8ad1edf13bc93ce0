//! Input validation ahead of dispatch.
//!
//! A rejected submission never reaches the network; the rejection message is
//! shown verbatim in the output area.

use thiserror::Error;

/// Hard ceiling on submitted input length, in characters.
pub const MAX_INPUT_CHARS: usize = 10_000;

/// Why a submission was rejected before dispatch.
///
/// Checks run in a fixed priority order; the first failing check wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No tool selected. Pick a tool from the list first.")]
    NoToolSelected,
    #[error("Input is empty. Type something to process.")]
    EmptyInput,
    #[error("Input too long (max {MAX_INPUT_CHARS} characters).")]
    InputTooLong,
}

/// Validate a pending submission.
///
/// Order: tool selection, then emptiness (whitespace-only counts as empty),
/// then length.
pub fn validate(selected_tool: Option<&str>, raw_input: &str) -> Result<(), Rejection> {
    if selected_tool.is_none() {
        return Err(Rejection::NoToolSelected);
    }
    if raw_input.trim().is_empty() {
        return Err(Rejection::EmptyInput);
    }
    if raw_input.chars().count() > MAX_INPUT_CHARS {
        return Err(Rejection::InputTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_normal_input() {
        assert_eq!(validate(Some("summarizer"), "hello world"), Ok(()));
    }

    #[test]
    fn test_rejects_missing_tool_before_anything_else() {
        // Even with non-empty input, the missing selection wins.
        assert_eq!(validate(None, "hello"), Err(Rejection::NoToolSelected));
        // And it also wins over emptiness and length.
        assert_eq!(validate(None, ""), Err(Rejection::NoToolSelected));
        let long = "x".repeat(MAX_INPUT_CHARS + 1);
        assert_eq!(validate(None, &long), Err(Rejection::NoToolSelected));
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_eq!(validate(Some("t"), ""), Err(Rejection::EmptyInput));
    }

    #[test]
    fn test_rejects_whitespace_only_input() {
        assert_eq!(validate(Some("t"), "  \n\t  "), Err(Rejection::EmptyInput));
    }

    #[test]
    fn test_rejects_overlong_input() {
        let long = "x".repeat(MAX_INPUT_CHARS + 1);
        assert_eq!(validate(Some("t"), &long), Err(Rejection::InputTooLong));
    }

    #[test]
    fn test_accepts_input_at_exact_limit() {
        let exact = "x".repeat(MAX_INPUT_CHARS);
        assert_eq!(validate(Some("t"), &exact), Ok(()));
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // Multibyte characters must be counted per character.
        let exact = "é".repeat(MAX_INPUT_CHARS);
        assert_eq!(validate(Some("t"), &exact), Ok(()));
    }
}
