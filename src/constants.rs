use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS);

/// Payload key holding the session context.
pub const CONTEXT: &str = "context";

/// Option key enabling local claim collection.
pub const SEND_CLAIMS: &str = "sendClaims";
/// Option key enabling role collection.
pub const SEND_ROLES: &str = "sendRoles";

pub(crate) const USER: &str = "user";

pub(crate) const TYPE_APPLICATION_JSON: &str = "application/json";

pub(crate) const OUTCOME_SUCCESS: &str = "success";
pub(crate) const OUTCOME_FAIL: &str = "fail";
pub(crate) const OUTCOME_TIMEOUT: &str = "timeout";

/// Step slot whose subject is sent to the policy engine.
pub(crate) const SUBJECT_STEP: usize = 1;
