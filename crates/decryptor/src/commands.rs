//! Command dispatch into the cipher core.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use kots_crypto::AesCipher;
use tracing::{debug, info, warn};

use crate::cli::Command;
use crate::error::CliError;

/// Run `command`, returning the bytes to write to stdout.
///
/// # Errors
///
/// Returns the [`CliError`] whose message and exit code the caller reports.
pub fn execute(command: &Command) -> Result<Vec<u8>, CliError> {
    match command {
        Command::Decrypt { cipher, value } => decrypt(cipher, value),
        Command::Encrypt { cipher, plaintext } => encrypt(cipher, plaintext.as_bytes()),
        Command::Generate => generate(),
    }
}

fn decrypt(cipher: &str, value: &str) -> Result<Vec<u8>, CliError> {
    let cipher = parse_cipher(cipher)?;

    let sealed = STANDARD.decode(value).map_err(|e| {
        warn!(error = %e, "encrypted value is not base64");
        CliError::ValueEncoding(e)
    })?;

    let plaintext = cipher.decrypt(&sealed).map_err(|e| {
        warn!(error = %e, "decryption failed");
        CliError::Decrypt(e)
    })?;

    debug!(plaintext_len = plaintext.len(), "value decrypted");
    Ok(plaintext)
}

fn encrypt(cipher: &str, plaintext: &[u8]) -> Result<Vec<u8>, CliError> {
    let cipher = parse_cipher(cipher)?;
    let sealed = cipher.encrypt(plaintext).map_err(CliError::Encrypt)?;
    debug!(ciphertext_len = sealed.len(), "value encrypted");
    Ok(STANDARD.encode(sealed).into_bytes())
}

fn generate() -> Result<Vec<u8>, CliError> {
    let cipher = AesCipher::generate().map_err(|e| {
        warn!(error = %e, "cipher generation failed");
        CliError::Generate(e)
    })?;
    info!("generated new cipher descriptor");
    Ok(cipher.to_string_repr().into_bytes())
}

fn parse_cipher(s: &str) -> Result<AesCipher, CliError> {
    AesCipher::from_string_repr(s).map_err(|e| {
        warn!(error = %e, "cipher descriptor rejected");
        CliError::Cipher(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn generate_encrypt_decrypt() {
        let cipher = text(execute(&Command::Generate).unwrap());
        let value = text(
            execute(&Command::Encrypt {
                cipher: cipher.clone(),
                plaintext: "hello".into(),
            })
            .unwrap(),
        );
        let plaintext = execute(&Command::Decrypt { cipher, value }).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn bad_cipher_is_cipher_error() {
        let err = execute(&Command::Decrypt {
            cipher: "not-base64!!".into(),
            value: "AAAA".into(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Cipher(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bad_value_is_encoding_error() {
        let cipher = AesCipher::generate().unwrap().to_string_repr();
        let err = execute(&Command::Decrypt {
            cipher,
            value: "***".into(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::ValueEncoding(_)));
        assert!(err.to_string().starts_with("Encrypted value must be base64 encoded:"));
    }

    #[test]
    fn foreign_value_is_decrypt_error() {
        let a = AesCipher::generate().unwrap();
        let b = AesCipher::generate().unwrap();
        let value = STANDARD.encode(a.encrypt(b"secret").unwrap());
        let err = execute(&Command::Decrypt {
            cipher: b.to_string_repr(),
            value,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Decrypt(_)));
        assert!(err.to_string().starts_with("Error decrypting value:"));
    }

    #[test]
    fn empty_value_round_trips() {
        let cipher = AesCipher::generate().unwrap();
        let value = STANDARD.encode(cipher.encrypt(b"").unwrap());
        let plaintext = execute(&Command::Decrypt {
            cipher: cipher.to_string_repr(),
            value,
        })
        .unwrap();
        assert!(plaintext.is_empty());
    }
}
