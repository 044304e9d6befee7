//! Identifier utilities
//!
//! Entity ids are the first 8 hex characters of a UUIDv4 (32 bits of
//! randomness), which keeps collisions negligible at catalog sizes in the
//! low thousands. Photo-request ids carry a literal prefix so the two id
//! spaces are easy to tell apart.

use rand::Rng;
use uuid::Uuid;

/// Length of a generated entity id
pub const ID_LEN: usize = 8;

/// Prefix distinguishing photo-request ids from catalog entity ids
pub const PHOTO_REQUEST_PREFIX: &str = "req-";

/// Generate a new 8-character entity id
pub fn generate() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}

/// Generate a new photo-request id (`req-` + 8 characters)
pub fn generate_photo_request() -> String {
    format!("{}{}", PHOTO_REQUEST_PREFIX, generate())
}

/// Random lowercase hex string of `bytes * 2` characters
pub fn random_hex(bytes: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..bytes)
        .map(|_| format!("{:02x}", rng.gen::<u8>()))
        .collect()
}
