//! Token accounting.

use std::ops::AddAssign;

use serde::Deserialize;

/// Tokens billed for one reply, or summed over a run.
///
/// Deserializes from OpenAI's `prompt_tokens` / `completion_tokens` as well
/// as the `input_tokens` / `output_tokens` names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    /// Prompt side.
    #[serde(default, alias = "prompt_tokens")]
    pub input_tokens: u32,
    /// Completion side.
    #[serde(default, alias = "completion_tokens")]
    pub output_tokens: u32,
}

impl Usage {
    /// Counts for one reply.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Both sides together.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        self.input_tokens += rhs.input_tokens;
        self.output_tokens += rhs.output_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_field_names() {
        let usage: Usage = serde_json::from_str(
            r#"{"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}"#,
        )
        .expect("deserializes");
        assert_eq!(usage, Usage::new(12, 8));
        assert_eq!(usage.total(), 20);
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let usage: Usage = serde_json::from_str(r#"{"output_tokens": 3}"#).expect("deserializes");
        assert_eq!(usage, Usage::new(0, 3));
    }

    #[test]
    fn test_run_totals_accumulate() {
        let mut total = Usage::default();
        total += Usage::new(10, 5);
        total += Usage::new(3, 2);
        assert_eq!(total, Usage::new(13, 7));
    }
}
