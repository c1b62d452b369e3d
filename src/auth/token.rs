use rand::rngs::OsRng;
use rand::RngCore;

/// Raw entropy per token. Hex-encoded, so the stored value is twice as long.
const TOKEN_BYTES: usize = 32;

/// Generates an opaque API token: 32 random bytes, hex-encoded.
pub fn generate_token() -> String {
    let mut buf = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Constant-time string equality. Accumulates differences over the full
/// length instead of short-circuiting, so comparison time does not leak
/// where two tokens diverge.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_hex_of_expected_length() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn constant_time_eq_matches_equal_strings() {
        let token = generate_token();
        assert!(constant_time_eq(&token, &token.clone()));
    }

    #[test]
    fn constant_time_eq_rejects_differences() {
        assert!(!constant_time_eq("abcdef", "abcdee"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(!constant_time_eq("", "a"));
        assert!(constant_time_eq("", ""));
    }
}
