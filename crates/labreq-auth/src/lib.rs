//! labreq-auth
//!
//! Verification of identity-provider tokens. Sign-in and refresh happen at
//! the provider; this crate only turns a bearer token into an [`jwt::AuthUser`].

pub mod error;
pub mod jwt;
