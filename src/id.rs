//! Post ID generation and validation
//!
//! Feed post IDs are `smk-` followed by 6 characters drawn uniformly from a
//! 62-symbol alphanumeric alphabet, e.g. `smk-x7Rq2M`. The fixed width and
//! prefix make IDs cheap to format-check and visually distinct from content.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{Result, SmokeError};

/// Prefix carried by every post ID.
pub const ID_PREFIX: &str = "smk-";

/// Number of random characters after the prefix.
pub const ID_RANDOM_LEN: usize = 6;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// Largest multiple of 62 that fits in a byte; bytes at or above this are
// rejected so the modulo stays uniform.
const REJECT_THRESHOLD: u8 = 248;

/// Generate a fresh post ID from the OS secure random source.
///
/// A failing random source is a hard error; IDs are never generated from a
/// weaker fallback.
pub fn generate_post_id() -> Result<String> {
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_RANDOM_LEN);
    id.push_str(ID_PREFIX);

    let mut buf = [0u8; 16];
    while id.len() < ID_PREFIX.len() + ID_RANDOM_LEN {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| SmokeError::IdGeneration(e.to_string()))?;
        for byte in buf {
            if byte >= REJECT_THRESHOLD {
                continue;
            }
            id.push(ALPHABET[(byte % 62) as usize] as char);
            if id.len() == ID_PREFIX.len() + ID_RANDOM_LEN {
                break;
            }
        }
    }

    Ok(id)
}

/// Check whether a string has the exact shape `smk-[A-Za-z0-9]{6}`.
pub fn is_valid_post_id(id: &str) -> bool {
    match id.strip_prefix(ID_PREFIX) {
        Some(rest) => rest.len() == ID_RANDOM_LEN && rest.bytes().all(|b| b.is_ascii_alphanumeric()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_post_id().unwrap();
        assert!(is_valid_post_id(&id));
        assert!(id.starts_with("smk-"));
        assert_eq!(id.len(), 10);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            let id = generate_post_id().unwrap();
            assert!(is_valid_post_id(&id));
            assert!(seen.insert(id), "duplicate id generated");
        }
    }

    #[test]
    fn test_valid_ids() {
        assert!(is_valid_post_id("smk-000000"));
        assert!(is_valid_post_id("smk-a1B2c3"));
        assert!(is_valid_post_id("smk-ZZZZZZ"));
    }

    #[test]
    fn test_invalid_ids() {
        assert!(!is_valid_post_id(""));
        assert!(!is_valid_post_id("smk-"));
        assert!(!is_valid_post_id("smk-abc12"));
        assert!(!is_valid_post_id("smk-abc1234"));
        assert!(!is_valid_post_id("smk-abc!12"));
        assert!(!is_valid_post_id("smk-abc 12"));
        assert!(!is_valid_post_id("SMK-abc123"));
        assert!(!is_valid_post_id("sig-abc123"));
        assert!(!is_valid_post_id("abc123"));
    }

    #[test]
    fn test_non_ascii_rejected() {
        assert!(!is_valid_post_id("smk-abcdé"));
        assert!(!is_valid_post_id("smk-ábc123"));
    }
}
