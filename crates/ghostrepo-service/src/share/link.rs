//! Share link token generation and validation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Random bytes per token.
const TOKEN_BYTES: usize = 24;
/// Longest token accepted on lookup.
const MAX_TOKEN_LEN: usize = 128;

/// Generates and checks share link tokens.
#[derive(Debug, Clone)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// Generates an unguessable base64url token from the thread-local CSPRNG.
    pub fn generate_token(&self) -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Whether `token` could have been issued by this service or its
    /// predecessors. Malformed tokens never reach storage.
    pub fn is_well_formed(&self, token: &str) -> bool {
        !token.is_empty()
            && token.len() <= MAX_TOKEN_LEN
            && token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new()
    }
}
