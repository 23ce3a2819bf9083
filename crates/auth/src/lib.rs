//! `folio-auth`: authentication boundary.
//!
//! Token issuing/validation, password hashing and password-reset tokens.
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod reset;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtCodec, JwtValidator, TokenError, TokenIssuer};
pub use password::{PasswordError, hash_password, verify_password};
pub use reset::{ResetToken, digest_reset_token};
