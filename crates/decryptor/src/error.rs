//! CLI error type and its exit-code mapping.

use kots_crypto::CipherError;
use thiserror::Error;

/// Usage text printed for a malformed invocation.
pub const USAGE: &str = "Usage: kots-decryptor <cipher> <encrypted value>
       kots-decryptor --encrypt <cipher> <plaintext>
       kots-decryptor --generate";

/// Every way a CLI invocation can fail.
///
/// Variants map to process exit codes:
/// - [`CliError::Usage`] → 1
/// - everything else → 2
#[derive(Debug, Error)]
pub enum CliError {
    /// Wrong argument count or unrecognised flag.
    #[error("{}", USAGE)]
    Usage,

    /// The cipher descriptor argument could not be parsed.
    #[error("Error decoding cipher: {0}")]
    Cipher(#[source] CipherError),

    /// The encrypted value argument is not base64.
    #[error("Encrypted value must be base64 encoded: {0}")]
    ValueEncoding(#[source] base64::DecodeError),

    /// Tag verification failed.
    #[error("Error decrypting value: {0}")]
    Decrypt(#[source] CipherError),

    #[error("Error encrypting value: {0}")]
    Encrypt(#[source] CipherError),

    #[error("Error generating cipher: {0}")]
    Generate(#[source] CipherError),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage => 1,
            CliError::Cipher(_)
            | CliError::ValueEncoding(_)
            | CliError::Decrypt(_)
            | CliError::Encrypt(_)
            | CliError::Generate(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(CliError::Usage.exit_code(), 1);
        assert_eq!(
            CliError::Cipher(CipherError::MalformedDescriptor {
                part: "key",
                actual: 5,
                expected: 24,
            })
            .exit_code(),
            2
        );
        let cipher = kots_crypto::AesCipher::generate().unwrap();
        let err = cipher.decrypt(b"not a sealed value").unwrap_err();
        assert_eq!(CliError::Decrypt(err).exit_code(), 2);
    }

    #[test]
    fn display_carries_cause() {
        let e = CliError::Cipher(CipherError::MalformedDescriptor {
            part: "nonce",
            actual: 3,
            expected: 12,
        });
        assert_eq!(
            e.to_string(),
            "Error decoding cipher: cipher nonce is invalid: len=3, expected at least 12"
        );
    }

    #[test]
    fn usage_display_is_usage_text() {
        assert!(CliError::Usage.to_string().starts_with("Usage: kots-decryptor"));
    }
}
