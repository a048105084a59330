//! Short code generation.

use rand::Rng;

/// Fixed 62-symbol alphanumeric alphabet codes are drawn from.
pub const CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generated code length.
pub const CODE_LENGTH: usize = 8;

/// Samples a random 8-character code from the alphanumeric alphabet.
///
/// Uniqueness is not checked here; the storage layer's unique index on live
/// codes is the authority, and the allocator retries on insert conflict.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
