//! One-time-code generation and expiry constants.
//!
//! Codes are short-lived numeric secrets mailed to a user to prove control
//! of an email address. Generation is pure; storage and the compare-and-clear
//! consumption step live in the database layer.

use rand::Rng;

/// Number of digits in a generated code.
pub const OTP_LENGTH: usize = 6;

/// Minutes a code stays valid after issuance.
pub const OTP_EXPIRY_MINS: i64 = 5;

/// Generate a zero-padded numeric one-time code (e.g. `"042917"`).
pub fn generate_otp() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:0width$}", width = OTP_LENGTH)
}
