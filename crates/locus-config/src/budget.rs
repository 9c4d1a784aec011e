//! Token-length to edit-distance policy.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Largest edit distance the fuzzy matcher supports.
pub const MAX_SUPPORTED_ERRORS: u8 = 3;

/// One step of an [`ErrorBudget`]: tokens up to `max_len` code points get `errors` edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorStep {
    /// Inclusive upper bound on token length for this step.
    pub max_len: usize,
    /// Edits allowed for tokens in this step.
    pub errors: u8,
}

/// Maps token length to the number of typos fuzzy matching tolerates.
///
/// Steps are checked in order; the first step whose `max_len` covers the token wins. Tokens
/// longer than every step get `max_errors`. Construction guarantees the function is
/// monotonic: a longer token never gets a smaller budget than a shorter one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBudget {
    /// Steps sorted by strictly increasing `max_len`.
    steps: Vec<ErrorStep>,
    /// Budget for tokens longer than every step.
    max_errors: u8,
}

impl Default for ErrorBudget {
    fn default() -> Self {
        Self {
            steps: vec![
                ErrorStep {
                    max_len: 3,
                    errors: 0,
                },
                ErrorStep {
                    max_len: 6,
                    errors: 1,
                },
            ],
            max_errors: 2,
        }
    }
}

impl ErrorBudget {
    /// Creates a budget, rejecting policies that are not monotonic step functions.
    pub fn new(steps: Vec<ErrorStep>, max_errors: u8) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidErrorBudget { reason };

        if max_errors > MAX_SUPPORTED_ERRORS {
            return Err(invalid(format!(
                "max_errors = {max_errors} exceeds the supported maximum of {MAX_SUPPORTED_ERRORS}"
            )));
        }

        for pair in steps.windows(2) {
            if pair[1].max_len <= pair[0].max_len {
                return Err(invalid(format!(
                    "step max_len values must increase ({} follows {})",
                    pair[1].max_len, pair[0].max_len
                )));
            }
            if pair[1].errors < pair[0].errors {
                return Err(invalid(format!(
                    "errors must not decrease with length ({} follows {})",
                    pair[1].errors, pair[0].errors
                )));
            }
        }

        if let Some(last) = steps.last()
            && last.errors > max_errors
        {
            return Err(invalid(format!(
                "max_errors = {max_errors} is below the last step's {} errors",
                last.errors
            )));
        }

        Ok(Self { steps, max_errors })
    }

    /// A budget that allows the same number of errors for every token length.
    pub fn uniform(errors: u8) -> Result<Self, ConfigError> {
        Self::new(Vec::new(), errors)
    }

    /// Number of edits allowed for a token of `len` code points.
    pub fn errors_for(&self, len: usize) -> u8 {
        self.steps
            .iter()
            .find(|step| len <= step.max_len)
            .map_or(self.max_errors, |step| step.errors)
    }

    /// The configured steps.
    pub fn steps(&self) -> &[ErrorStep] {
        &self.steps
    }

    /// Budget for tokens longer than every step.
    pub fn max_errors(&self) -> u8 {
        self.max_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shorthand for building a step.
    fn step(max_len: usize, errors: u8) -> ErrorStep {
        ErrorStep { max_len, errors }
    }

    #[test]
    fn default_budget_thresholds() {
        let budget = ErrorBudget::default();
        assert_eq!(budget.errors_for(0), 0);
        assert_eq!(budget.errors_for(3), 0);
        assert_eq!(budget.errors_for(4), 1);
        assert_eq!(budget.errors_for(6), 1);
        assert_eq!(budget.errors_for(7), 2);
        assert_eq!(budget.errors_for(40), 2);
    }

    #[test]
    fn default_budget_is_monotonic() {
        let budget = ErrorBudget::default();
        for len in 0..32 {
            assert!(budget.errors_for(len) <= budget.errors_for(len + 1));
        }
    }

    #[test]
    fn uniform_budget() {
        let budget = ErrorBudget::uniform(1).unwrap();
        assert_eq!(budget.errors_for(1), 1);
        assert_eq!(budget.errors_for(100), 1);
    }

    #[test]
    fn rejects_decreasing_errors() {
        let err = ErrorBudget::new(vec![step(3, 1), step(6, 0)], 2).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidErrorBudget { .. }));
    }

    #[test]
    fn rejects_unsorted_lengths() {
        assert!(ErrorBudget::new(vec![step(6, 0), step(3, 1)], 2).is_err());
        assert!(ErrorBudget::new(vec![step(3, 0), step(3, 1)], 2).is_err());
    }

    #[test]
    fn rejects_tail_below_last_step() {
        assert!(ErrorBudget::new(vec![step(3, 0), step(6, 2)], 1).is_err());
    }

    #[test]
    fn rejects_unsupported_distance() {
        let err = ErrorBudget::uniform(4).unwrap_err();
        assert!(err.to_string().contains("supported maximum"));
    }
}
