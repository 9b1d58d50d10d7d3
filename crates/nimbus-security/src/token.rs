//! Opaque session tokens

use nimbus_shared::constants::SESSION_TOKEN_BYTES;

/// 256 bits from the thread-local CSPRNG, hex encoded (64 chars).
pub fn generate_session_token() -> String {
    let token: [u8; SESSION_TOKEN_BYTES] = rand::random();
    hex::encode(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), SESSION_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }
}
