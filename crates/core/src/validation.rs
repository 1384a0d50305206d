//! Request-field validation for the auth flows.

use std::sync::OnceLock;

use regex::Regex;

/// Authentication mode for the send-otp endpoint.
pub const MODE_SIGNIN: &str = "signin";
pub const MODE_SIGNUP: &str = "signup";

/// All valid send-otp modes.
pub const VALID_MODES: &[&str] = &[MODE_SIGNIN, MODE_SIGNUP];

/// Pragmatic email shape check: one `@`, non-empty local part, a dot in the
/// domain. Full RFC 5321 parsing is the mail server's problem.
fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

/// Validate an email address, returning an error message on failure.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(format!("Invalid email address: {email}"))
    }
}

/// Validate a send-otp mode string.
pub fn validate_mode(mode: &str) -> Result<(), String> {
    if VALID_MODES.contains(&mode) {
        Ok(())
    } else {
        Err(format!(
            "Mode must be one of: {}",
            VALID_MODES.join(", ")
        ))
    }
}
