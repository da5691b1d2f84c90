//! coffer-files: per-file content encryption
//!
//! Each file gets a fresh random key and nonce; the ciphertext body is
//! written to the destination path while the key, nonce, tag, mimetype,
//! and plaintext checksum go into a `FileMetadata` header destined for the
//! sealed metadata blob. File handles are scoped to the read/write calls;
//! nothing is held open across a crypto failure.

pub mod checksum;

use std::fs;
use std::path::Path;

use coffer_core::{CofferError, CofferResult, FileMetadata};
use coffer_crypto::cipher::{self, SealedBox, SymmetricKey};

pub use checksum::{checksum_bytes, verify_checksum};

/// Encrypt `src` into `dst` under a fresh file key.
///
/// The destination holds the raw ciphertext body only; everything needed
/// to open it again is in the returned `FileMetadata`.
pub fn encrypt_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    mimetype: &str,
) -> CofferResult<FileMetadata> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    let plaintext = fs::read(src).map_err(|e| CofferError::io("reading", src, e))?;
    let checksum = checksum_bytes(&plaintext);

    let key = cipher::generate_key();
    let sealed = cipher::encrypt(&key, &plaintext)?;

    fs::write(dst, &sealed.ciphertext).map_err(|e| CofferError::io("writing", dst, e))?;

    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        plaintext_len = plaintext.len(),
        "encrypted file"
    );

    Ok(FileMetadata {
        key: key.as_bytes().to_vec(),
        nonce: sealed.nonce.to_vec(),
        tag: sealed.tag.to_vec(),
        mimetype: mimetype.to_string(),
        checksum,
    })
}

/// Decrypt `src` into `dst` using its `FileMetadata` header.
///
/// Fails with `AuthenticationFailure` on tag mismatch and with
/// `ChecksumMismatch` if the recovered plaintext disagrees with the
/// recorded checksum. The destination is written only after both checks
/// pass.
pub fn decrypt_file(
    meta: &FileMetadata,
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
) -> CofferResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    let ciphertext = fs::read(src).map_err(|e| CofferError::io("reading", src, e))?;

    let key = SymmetricKey::from_slice(&meta.key)?;
    let sealed = SealedBox::from_parts(ciphertext, &meta.nonce, &meta.tag)?;

    let plaintext = cipher::decrypt(&key, &sealed)?;
    verify_checksum(&plaintext, &meta.checksum)?;

    fs::write(dst, &plaintext).map_err(|e| CofferError::io("writing", dst, e))?;

    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        plaintext_len = plaintext.len(),
        "decrypted file"
    );

    Ok(())
}
