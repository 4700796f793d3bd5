use base64::Engine;
use rand::Rng;

/// Generate a cryptographically secure random CSRF state token.
///
/// 32 bytes from the thread-local CSPRNG, URL-safe base64 without padding so
/// the token survives a round trip through a query string unchanged.
pub fn generate_state_token() -> String {
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut token_bytes);

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(token_bytes)
}
