//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! /wake query parameters:
//!     → validation.rs (id charset/length, key length)
//!     → auth.rs (constant-time secret comparison)
//!     → Pass to registry lookup
//! ```
//!
//! # Design Decisions
//! - Format checks strictly precede the secret comparison
//! - A failed comparison is one bit of information, nothing more
//! - Credentials are only ever logged masked

pub mod auth;
pub mod validation;

pub use auth::{mask_credential, Authenticator};
pub use validation::{validate_credential, validate_id, CredentialRejection, IdRejection};
