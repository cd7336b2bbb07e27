//! Identity types shared across the Osborn crates

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Opaque identifier using UUIDv7 so ids sort by creation time.
/// Used for cache entries, analytics events, timer handles and sessions.
pub type EntityId = Uuid;

/// Wall-clock timestamp in UTC.
pub type Timestamp = DateTime<Utc>;

/// SHA-256 digest used for request fingerprints and candidate-set signatures.
pub type ContentHash = [u8; 32];

/// Generate a new UUIDv7 identifier.
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

/// Compute the SHA-256 hash of `content`.
pub fn compute_content_hash(content: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_id_is_v7_and_unique() {
        let a = new_entity_id();
        let b = new_entity_id();
        assert_ne!(a, b);
        assert_eq!(a.get_version_num(), 7);
    }

    #[test]
    fn test_compute_content_hash_is_stable() {
        let a = compute_content_hash(b"lamp with a built-in speaker");
        let b = compute_content_hash(b"lamp with a built-in speaker");
        let c = compute_content_hash(b"lamp with a built-in heater");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
