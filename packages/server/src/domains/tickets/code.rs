//! Ticket code generation.
//!
//! Codes are short, human-verifiable strings printed on tickets and read
//! aloud at check-in, not secrets. Uniqueness is NOT assumed from
//! randomness: the `tickets_code_key` constraint is authoritative and
//! `issuance` retries on collision.

use rand::Rng;

/// Uppercase letters and digits: unambiguous to transcribe, compared
/// case-insensitively on lookup.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of issued ticket codes.
pub const CODE_LENGTH: usize = 8;

/// Generate a candidate ticket code.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();

    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
