//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ATTEMPT_ID: &str = "attempt_id";

// Approval file identifiers
pub const FIELD_APPROVED_FILE: &str = "approved_file";
pub const FIELD_NOT_APPROVED_FILE: &str = "not_approved_file";
pub const FIELD_OUTCOME: &str = "outcome";

// Collection sizes
pub const FIELD_CIRCULAR_TYPES_LEN: &str = "circular_types_len";
pub const FIELD_CUSTOM_MATCHERS_LEN: &str = "custom_matchers_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
