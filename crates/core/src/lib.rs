//! Domain types, error taxonomy, and pure auth/notes logic shared by the
//! database and API crates. No I/O lives here.

pub mod error;
pub mod notes;
pub mod otp;
pub mod types;
pub mod validation;
