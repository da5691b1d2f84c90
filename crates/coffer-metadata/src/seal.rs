//! Metadata sealing under the per-collection metadata key
//!
//! The plaintext metadata (file identifier → `FileMetadata`) is serialized
//! to canonical JSON — the BTreeMap keeps keys sorted, so equal maps seal
//! to equal plaintext — and encrypted with the collection's metadata key.

use coffer_core::{CofferError, CofferResult, DecryptedMetadata, EncryptedMetadata};
use coffer_crypto::cipher::{self, SealedBox, SymmetricKey};

/// Seal a metadata collection under the metadata key.
pub fn encrypt_metadata(
    key: &SymmetricKey,
    metadata: &DecryptedMetadata,
) -> CofferResult<EncryptedMetadata> {
    let plaintext = serde_json::to_vec(metadata)
        .map_err(|e| CofferError::MalformedMetadata(e.to_string()))?;

    let sealed = cipher::encrypt(key, &plaintext)?;

    Ok(EncryptedMetadata {
        ciphertext: sealed.ciphertext,
        nonce: sealed.nonce.to_vec(),
        tag: sealed.tag.to_vec(),
    })
}

/// Open a sealed metadata blob.
///
/// `AuthenticationFailure` on tag mismatch or wrong key;
/// `MalformedMetadata` if the recovered bytes do not parse into the
/// expected structure.
pub fn decrypt_metadata(
    key: &SymmetricKey,
    sealed: &EncryptedMetadata,
) -> CofferResult<DecryptedMetadata> {
    let sealed_box = SealedBox::from_parts(sealed.ciphertext.clone(), &sealed.nonce, &sealed.tag)?;
    let plaintext = cipher::decrypt(key, &sealed_box)?;

    serde_json::from_slice(&plaintext).map_err(|e| CofferError::MalformedMetadata(e.to_string()))
}
