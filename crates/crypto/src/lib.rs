//! AES-192-GCM cipher descriptors.
//!
//! A descriptor is a 24-byte key plus a 96-bit nonce. Its only external form
//! is the standard-alphabet, padded base64 text of `key || nonce`:
//!
//! ```text
//! base64(key[24] || nonce[12..])
//! ```
//!
//! Each descriptor carries exactly one nonce for its whole lifetime. Sealing two
//! different plaintexts under the same descriptor reuses the (key, nonce) pair,
//! which destroys both confidentiality and authentication under GCM. Callers
//! must treat a descriptor as single-message, or generate one per message.

pub mod cipher;
pub mod error;

pub use cipher::{descriptor_string, AesCipher, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use error::CipherError;
