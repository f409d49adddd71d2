//! Shared-secret authentication.

use subtle::ConstantTimeEq;

use crate::config::schema::Secret;

/// Characters of a credential that survive masking.
const MASK_VISIBLE: usize = 10;
const MASK_MARKER: &str = "***";

/// Compares presented credentials against the configured secret.
#[derive(Clone)]
pub struct Authenticator {
    secret: Secret,
}

impl Authenticator {
    pub fn new(secret: Secret) -> Self {
        Self { secret }
    }

    /// Full-secret equality. Runs in time independent of where the inputs
    /// first differ; both sides are padded to the longer length and the
    /// length check is folded into the same constant-time result.
    pub fn authenticate(&self, supplied: &str) -> bool {
        let expected = self.secret.expose().as_bytes();
        let supplied = supplied.as_bytes();

        let max_len = expected.len().max(supplied.len());
        let mut a = vec![0u8; max_len];
        let mut b = vec![0u8; max_len];
        a[..expected.len()].copy_from_slice(expected);
        b[..supplied.len()].copy_from_slice(supplied);

        let lengths_equal = expected.len().ct_eq(&supplied.len());
        let contents_equal = a.ct_eq(&b);
        (lengths_equal & contents_equal).into()
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("secret", &self.secret)
            .finish()
    }
}

/// Log-safe rendering of a credential: the first ten characters followed by
/// `***`. Credentials of ten characters or fewer render as `***` alone, so a
/// whole credential is never printed.
pub fn mask_credential(credential: &str) -> String {
    match credential.char_indices().nth(MASK_VISIBLE) {
        Some((cut, _)) => format!("{}{MASK_MARKER}", &credential[..cut]),
        None => MASK_MARKER.to_string(),
    }
}
