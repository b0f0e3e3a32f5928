use crate::constants::{OUTCOME_FAIL, OUTCOME_SUCCESS, OUTCOME_TIMEOUT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Parsed decision body; empty unless the call succeeded.
pub type DecisionResult = Map<String, Value>;

/// Classification of one policy invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Fail,
    Timeout,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => OUTCOME_SUCCESS,
            Outcome::Fail => OUTCOME_FAIL,
            Outcome::Timeout => OUTCOME_TIMEOUT,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision body paired with its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyResponse {
    pub result: DecisionResult,
    pub outcome: Outcome,
}

impl PolicyResponse {
    pub fn success(result: DecisionResult) -> Self {
        Self {
            result,
            outcome: Outcome::Success,
        }
    }

    /// Failed or timed-out call; the result is always empty.
    pub fn empty(outcome: Outcome) -> Self {
        Self {
            result: DecisionResult::new(),
            outcome,
        }
    }
}
