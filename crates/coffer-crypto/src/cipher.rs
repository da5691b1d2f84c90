//! XChaCha20-Poly1305 authenticated encryption under a symmetric key
//!
//! The nonce and tag are kept as separate values rather than concatenated
//! onto the ciphertext: the persisted records (`FileMetadata`,
//! `EncryptedMetadata`, `PrivateKeyData`) carry them as explicit fields.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use zeroize::Zeroize;

use coffer_core::{CofferError, CofferResult};

use crate::{KEY_SIZE, NONCE_SIZE, TAG_SIZE};

/// A 256-bit symmetric key. Zeroized on drop.
///
/// One key serves exactly one role (file key, metadata key, or vault key);
/// the type itself is role-agnostic, the construction site is not.
#[derive(Clone)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Build a key from a slice of unchecked length (e.g. a decoded record
    /// field). Fails with `MalformedMetadata` on any other length.
    pub fn from_slice(bytes: &[u8]) -> CofferResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| {
            CofferError::MalformedMetadata(format!(
                "key has wrong size: {} bytes (expected {KEY_SIZE})",
                bytes.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Output of one `encrypt` call: ciphertext plus the nonce and tag needed
/// to open it.
#[derive(Debug, Clone)]
pub struct SealedBox {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_SIZE],
    pub tag: [u8; TAG_SIZE],
}

impl SealedBox {
    /// Reassemble a box from record fields of unchecked length.
    pub fn from_parts(ciphertext: Vec<u8>, nonce: &[u8], tag: &[u8]) -> CofferResult<Self> {
        let nonce: [u8; NONCE_SIZE] = nonce.try_into().map_err(|_| {
            CofferError::MalformedMetadata(format!(
                "nonce has wrong size: {} bytes (expected {NONCE_SIZE})",
                nonce.len()
            ))
        })?;
        let tag: [u8; TAG_SIZE] = tag.try_into().map_err(|_| {
            CofferError::MalformedMetadata(format!(
                "tag has wrong size: {} bytes (expected {TAG_SIZE})",
                tag.len()
            ))
        })?;
        Ok(Self {
            ciphertext,
            nonce,
            tag,
        })
    }
}

/// Generate a random 256-bit symmetric key.
pub fn generate_key() -> SymmetricKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    SymmetricKey::from_bytes(bytes)
}

/// Encrypt with a fresh random nonce. The nonce never repeats for a given
/// key because every call draws a new one from the CSPRNG.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> CofferResult<SealedBox> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);

    let mut sealed = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CofferError::EncryptionFailure(e.to_string()))?;

    // chacha20poly1305 appends the tag; the records want it separate
    let tag_start = sealed.len() - TAG_SIZE;
    let mut tag = [0u8; TAG_SIZE];
    tag.copy_from_slice(&sealed[tag_start..]);
    sealed.truncate(tag_start);

    Ok(SealedBox {
        ciphertext: sealed,
        nonce,
        tag,
    })
}

/// Decrypt and verify. Any bit flip in ciphertext, nonce, or tag — or a
/// wrong key — fails with `AuthenticationFailure`; corrupted plaintext is
/// never returned.
pub fn decrypt(key: &SymmetricKey, sealed: &SealedBox) -> CofferResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut joined = Vec::with_capacity(sealed.ciphertext.len() + TAG_SIZE);
    joined.extend_from_slice(&sealed.ciphertext);
    joined.extend_from_slice(&sealed.tag);

    cipher
        .decrypt(XNonce::from_slice(&sealed.nonce), joined.as_slice())
        .map_err(|_| CofferError::AuthenticationFailure)
}
