//! Errors produced by the cipher layer.

use thiserror::Error;

/// Failure modes of descriptor construction and the AEAD transform.
///
/// Messages never include key, nonce, or plaintext bytes.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The OS CSPRNG could not supply the requested bytes.
    #[error("failed to read {what} from the secure random source: {reason}")]
    RandomSource {
        /// Which descriptor part was being generated (`"key"` or `"nonce"`).
        what: &'static str,
        /// Message reported by the random source.
        reason: String,
    },

    /// The descriptor text is not valid standard base64.
    #[error("failed to decode cipher descriptor: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The decoded descriptor is too short for the key or the nonce.
    #[error("cipher {part} is invalid: len={actual}, expected at least {expected}")]
    MalformedDescriptor {
        /// `"key"` or `"nonce"`.
        part: &'static str,
        /// Bytes available for this part.
        actual: usize,
        /// Bytes the transform requires.
        expected: usize,
    },

    /// Tag verification failed: tampered, truncated, or sealed under another
    /// key or nonce. The cases are deliberately indistinguishable.
    #[error("ciphertext failed authentication")]
    Authentication(#[source] aes_gcm::Error),

    /// Sealing failed. GCM only rejects plaintexts beyond its length limit
    /// (about 64 GiB), so this is unreachable for in-memory values.
    #[error("aead seal operation failed")]
    Seal(#[source] aes_gcm::Error),
}
