//! Compiler configuration.
//!
//! The defaults are the service limits DynamoDB enforces on expressions. They
//! can be tightened (or loosened, for DynamoDB-compatible stores) through
//! environment variables.

use std::env;

/// Default maximum length of one compiled expression string, in bytes.
pub const DEFAULT_MAX_EXPRESSION_LENGTH: usize = 4096;

/// Default maximum number of candidates in an `IN` list.
pub const DEFAULT_MAX_IN_OPERANDS: usize = 100;

/// Expression compiler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpressionConfig {
    /// Longest compiled expression string accepted, in bytes.
    pub max_expression_length: usize,
    /// Most candidates accepted by a single `IN` condition.
    pub max_in_operands: usize,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            max_expression_length: DEFAULT_MAX_EXPRESSION_LENGTH,
            max_in_operands: DEFAULT_MAX_IN_OPERANDS,
        }
    }
}

impl ExpressionConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `DYNAMODB_MAX_EXPRESSION_LENGTH` and `DYNAMODB_MAX_IN_OPERANDS`;
    /// missing, unparsable or zero values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_expression_length: env_usize(
                "DYNAMODB_MAX_EXPRESSION_LENGTH",
                DEFAULT_MAX_EXPRESSION_LENGTH,
            ),
            max_in_operands: env_usize("DYNAMODB_MAX_IN_OPERANDS", DEFAULT_MAX_IN_OPERANDS),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    parse_limit(env::var(key).ok().as_deref(), default)
}

fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = ExpressionConfig::default();
        assert_eq!(config.max_expression_length, 4096);
        assert_eq!(config.max_in_operands, 100);
    }

    #[test]
    fn test_should_fall_back_on_bad_limits() {
        assert_eq!(parse_limit(Some("512"), 10), 512);
        assert_eq!(parse_limit(Some(" 64 "), 10), 64);
        assert_eq!(parse_limit(Some("0"), 10), 10);
        assert_eq!(parse_limit(Some("-3"), 10), 10);
        assert_eq!(parse_limit(Some("lots"), 10), 10);
        assert_eq!(parse_limit(None, 10), 10);
    }

    #[test]
    fn test_should_deserialize_partial_config() {
        let config: ExpressionConfig =
            serde_json::from_str(r#"{"maxInOperands": 5}"#).unwrap();
        assert_eq!(config.max_in_operands, 5);
        assert_eq!(config.max_expression_length, DEFAULT_MAX_EXPRESSION_LENGTH);
    }
}
