//! Authentication primitives.
//!
//! - [`jwt`] -- session-token generation and validation (HS256).
//! - [`cookie`] -- the HTTP-only session cookie carrying the token.
//! - [`google`] -- Google OAuth 2.0 authorization-code flow with PKCE.

pub mod cookie;
pub mod google;
pub mod jwt;
