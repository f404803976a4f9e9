//! Room codes.
//!
//! Codes are 4 characters from an alphabet without look-alikes
//! (no I, L, O, 0, 1). Lookups accept any case and ignore anything past
//! the sixth character.

use rand::Rng;

pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LEN: usize = 4;
const MAX_INPUT_LEN: usize = 6;

pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a user-typed code.
pub fn normalize_room_code(input: &str) -> String {
    input
        .trim()
        .chars()
        .take(MAX_INPUT_LEN)
        .flat_map(char::to_uppercase)
        .collect()
}
