use crate::Generator;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use snip_core::ShortCode;

/// Number of digest bytes that encode to exactly [`ShortCode::LENGTH`]
/// base64 characters. Since base64 maps every 3 input bytes to 4 output
/// characters, this is the same prefix as truncating the full encoding.
const PREFIX_BYTES: usize = ShortCode::LENGTH / 4 * 3;

/// Derives short codes from a SHA-256 digest of the input.
///
/// The digest is encoded with the URL-safe base64 alphabet (no padding) and
/// truncated to [`ShortCode::LENGTH`] characters, keeping 48 bits of the
/// 256-bit digest. Two distinct inputs can therefore share a code; such
/// collisions are neither detected nor resolved here.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestGenerator;

impl DigestGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for DigestGenerator {
    type Output = ShortCode;

    fn generate(&self, input: &str) -> Self::Output {
        let digest = Sha256::digest(input.as_bytes());
        let encoded = URL_SAFE_NO_PAD.encode(&digest[..PREFIX_BYTES]);
        ShortCode::new_unchecked(encoded)
    }
}
