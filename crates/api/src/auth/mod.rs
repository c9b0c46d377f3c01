//! Authentication primitives.
//!
//! - [`jwt`] -- HS256 access-token validation (and generation, for trusted
//!   issuers and tests).

pub mod jwt;
