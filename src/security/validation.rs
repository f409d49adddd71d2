//! Syntactic checks for the `id` and `key` query parameters.
//!
//! These run before any secret comparison, so malformed input never reaches
//! the authenticator.

use std::fmt;

pub const MAX_ID_LEN: usize = 50;
pub const MIN_CREDENTIAL_LEN: usize = 20;
pub const MAX_CREDENTIAL_LEN: usize = 256;

/// Why a device id was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdRejection {
    Empty,
    TooLong { len: usize },
    BadCharset,
}

impl fmt::Display for IdRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdRejection::Empty => write!(f, "ID parameter is required"),
            IdRejection::TooLong { len } => write!(
                f,
                "ID parameter exceeds maximum length ({MAX_ID_LEN} chars, got {len})"
            ),
            IdRejection::BadCharset => {
                write!(f, "ID parameter must contain only alphanumeric characters")
            }
        }
    }
}

/// Why a credential was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialRejection {
    Empty,
    TooShort { len: usize },
    TooLong { len: usize },
}

impl fmt::Display for CredentialRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialRejection::Empty => write!(f, "API key parameter is required"),
            CredentialRejection::TooShort { len } => write!(
                f,
                "API key is too short (min {MIN_CREDENTIAL_LEN} chars, got {len})"
            ),
            CredentialRejection::TooLong { len } => write!(
                f,
                "API key exceeds maximum length ({MAX_CREDENTIAL_LEN} chars, got {len})"
            ),
        }
    }
}

/// Device ids are 1 to 50 ASCII letters or digits.
pub fn validate_id(raw: &str) -> Result<(), IdRejection> {
    if raw.is_empty() {
        return Err(IdRejection::Empty);
    }
    let len = raw.chars().count();
    if len > MAX_ID_LEN {
        return Err(IdRejection::TooLong { len });
    }
    if !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(IdRejection::BadCharset);
    }
    Ok(())
}

/// Credentials are 20 to 256 characters of anything.
pub fn validate_credential(raw: &str) -> Result<(), CredentialRejection> {
    if raw.is_empty() {
        return Err(CredentialRejection::Empty);
    }
    let len = raw.chars().count();
    if len < MIN_CREDENTIAL_LEN {
        return Err(CredentialRejection::TooShort { len });
    }
    if len > MAX_CREDENTIAL_LEN {
        return Err(CredentialRejection::TooLong { len });
    }
    Ok(())
}
