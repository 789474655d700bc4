use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;

/// The size of the OIDC state value in bytes.
const STATE_TOKEN_SIZE: usize = 32;

/// Generates a fresh, single-use OIDC `state` value.
///
/// # Returns
///
/// A URL-safe base64-encoded random string.
pub fn generate_state_token() -> String {
    let mut token = [0u8; STATE_TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_tokens_are_url_safe_and_unique() {
        let a = generate_state_token();
        let b = generate_state_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
