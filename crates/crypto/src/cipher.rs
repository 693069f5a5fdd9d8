//! [`AesCipher`]: a key + nonce pair bound to an AES-192-GCM instance.
//!
//! **Nonce reuse:** the nonce is fixed when the descriptor is built and is used
//! for every call to [`AesCipher::encrypt`]. Never seal two different
//! plaintexts with the same descriptor. Plain GCM offers no misuse resistance.

use std::fmt;
use std::str::FromStr;

use aes_gcm::{
    aead::{consts::U12, rand_core::RngCore, Aead, KeyInit, OsRng},
    aes::Aes192,
    AesGcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::CipherError;

/// Byte length of an AES-192 key (24 bytes = 192 bits).
pub const KEY_LEN: usize = 24;

/// Byte length of a GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Fixed-size key buffer, zeroed on drop.
///
/// Only this raw copy is wiped. The expanded key schedule held by the AEAD
/// instance is not.
#[derive(Clone, PartialEq, Eq)]
struct KeyBytes(Box<[u8; KEY_LEN]>);

impl KeyBytes {
    fn zeroed() -> Self {
        Self(Box::new([0u8; KEY_LEN]))
    }

    /// Callers guarantee `bytes.len() == KEY_LEN`.
    fn copy_from(bytes: &[u8]) -> Self {
        let mut key = Self::zeroed();
        key.0.copy_from_slice(bytes);
        key
    }
}

impl Drop for KeyBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

/// An immutable AES-192-GCM cipher descriptor.
///
/// Built by [`AesCipher::generate`] or by parsing the base64 string form with
/// [`AesCipher::from_string_repr`]. There is no way to construct a value with
/// a short key or nonce.
#[derive(Clone)]
pub struct AesCipher {
    key: KeyBytes,
    // At least NONCE_LEN bytes. Only the first NONCE_LEN feed the transform;
    // any trailing bytes from a parsed descriptor are kept for round-tripping.
    nonce: Vec<u8>,
    aead: Aes192Gcm,
}

impl AesCipher {
    /// Draw a fresh key and nonce from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if the random source cannot supply
    /// the bytes. No retry is attempted.
    pub fn generate() -> Result<Self, CipherError> {
        Self::generate_with(&mut OsRng)
    }

    fn generate_with(rng: &mut impl RngCore) -> Result<Self, CipherError> {
        let mut key = KeyBytes::zeroed();
        fill_random(rng, &mut key.0[..], "key")?;

        let mut nonce = vec![0u8; NONCE_LEN];
        fill_random(rng, &mut nonce, "nonce")?;

        let cipher = Self::assemble(key, nonce)?;
        debug!("generated fresh cipher descriptor");
        Ok(cipher)
    }

    /// Parse the base64 string form `base64(key || nonce)`.
    ///
    /// The first [`KEY_LEN`] decoded bytes become the key and the rest the
    /// nonce, which must hold at least [`NONCE_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encoding`] if `s` is not standard padded base64.
    /// Returns [`CipherError::MalformedDescriptor`] if the decoded bytes are too
    /// short for the key or the nonce.
    pub fn from_string_repr(s: &str) -> Result<Self, CipherError> {
        let mut decoded = STANDARD.decode(s).map_err(|e| {
            debug!(error = %e, "cipher descriptor is not valid base64");
            CipherError::Encoding(e)
        })?;

        let parsed = split_descriptor(&decoded);
        decoded.iter_mut().for_each(|b| *b = 0);

        let (key, nonce) = parsed.map_err(|e| {
            debug!(error = %e, "cipher descriptor rejected");
            e
        })?;
        Self::assemble(key, nonce)
    }

    /// Encode this descriptor to its canonical string form.
    pub fn to_string_repr(&self) -> String {
        let mut raw = Vec::with_capacity(KEY_LEN + self.nonce.len());
        raw.extend_from_slice(&self.key.0[..]);
        raw.extend_from_slice(&self.nonce);
        let encoded = STANDARD.encode(&raw);
        raw.iter_mut().for_each(|b| *b = 0);
        encoded
    }

    /// Seal `plaintext` under this descriptor's key and nonce, with no
    /// associated data. The output is `ciphertext || tag`.
    ///
    /// Sealing a second, different plaintext with the same descriptor reuses
    /// the nonce. That is the caller's responsibility to avoid.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Seal`] only for plaintexts beyond the GCM length
    /// limit.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.aead
            .encrypt(self.transform_nonce(), plaintext)
            .map_err(CipherError::Seal)
    }

    /// Open `ciphertext || tag` and verify the tag.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Authentication`] if the tag does not verify. This
    /// covers tampering, truncation (including inputs shorter than
    /// [`TAG_LEN`]), and a wrong key or nonce alike.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.aead
            .decrypt(self.transform_nonce(), ciphertext)
            .map_err(|e| {
                debug!(ciphertext_len = ciphertext.len(), "tag verification failed");
                CipherError::Authentication(e)
            })
    }

    /// Raw key bytes. Never log these.
    pub fn key(&self) -> &[u8] {
        &self.key.0[..]
    }

    /// Raw nonce bytes, including any trailing bytes beyond [`NONCE_LEN`].
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    fn assemble(key: KeyBytes, nonce: Vec<u8>) -> Result<Self, CipherError> {
        if nonce.len() < NONCE_LEN {
            return Err(CipherError::MalformedDescriptor {
                part: "nonce",
                actual: nonce.len(),
                expected: NONCE_LEN,
            });
        }
        let aead = Aes192Gcm::new_from_slice(&key.0[..]).map_err(|_| {
            CipherError::MalformedDescriptor {
                part: "key",
                actual: key.0.len(),
                expected: KEY_LEN,
            }
        })?;
        Ok(Self { key, nonce, aead })
    }

    fn transform_nonce(&self) -> &Nonce<U12> {
        Nonce::from_slice(&self.nonce[..NONCE_LEN])
    }
}

/// Serialize an optional descriptor, yielding `""` when there is none.
pub fn descriptor_string(cipher: Option<&AesCipher>) -> String {
    cipher.map(AesCipher::to_string_repr).unwrap_or_default()
}

fn split_descriptor(decoded: &[u8]) -> Result<(KeyBytes, Vec<u8>), CipherError> {
    if decoded.len() < KEY_LEN {
        return Err(CipherError::MalformedDescriptor {
            part: "key",
            actual: decoded.len(),
            expected: KEY_LEN,
        });
    }
    let (key, nonce) = decoded.split_at(KEY_LEN);
    if nonce.len() < NONCE_LEN {
        return Err(CipherError::MalformedDescriptor {
            part: "nonce",
            actual: nonce.len(),
            expected: NONCE_LEN,
        });
    }
    Ok((KeyBytes::copy_from(key), nonce.to_vec()))
}

fn fill_random(
    rng: &mut impl RngCore,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), CipherError> {
    rng.try_fill_bytes(buf)
        .map_err(|e| CipherError::RandomSource {
            what,
            reason: e.to_string(),
        })
}

impl PartialEq for AesCipher {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.nonce == other.nonce
    }
}

impl Eq for AesCipher {}

impl fmt::Debug for AesCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        f.debug_struct("AesCipher")
            .field("key", &"[REDACTED]")
            .field("nonce_len", &self.nonce.len())
            .finish()
    }
}

impl fmt::Display for AesCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_repr())
    }
}

impl FromStr for AesCipher {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string_repr(s)
    }
}
