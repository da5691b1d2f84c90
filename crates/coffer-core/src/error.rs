use std::path::PathBuf;

use thiserror::Error;

pub type CofferResult<T> = Result<T, CofferError>;

/// Errors surfaced by the coffer protocol layer.
///
/// Cryptographic failures are terminal: retrying cannot change the outcome,
/// so callers must never loop on them. Display output carries no key
/// material, mnemonics, or plaintext.
#[derive(Debug, Error)]
pub enum CofferError {
    /// AEAD tag verification failed: tampered data or wrong key.
    #[error("authentication failure: ciphertext rejected")]
    AuthenticationFailure,

    /// AEAD encryption itself failed (input exceeds cipher limits).
    #[error("encryption failed: {0}")]
    EncryptionFailure(String),

    /// Asymmetric unwrap failed: wrong private key or corrupted wrapped key.
    #[error("key unwrap failed: wrong private key or corrupted wrapped key")]
    UnwrapFailure,

    /// The mnemonic-derived key failed to open a private key record.
    #[error("wrong mnemonic for private key record")]
    WrongMnemonic,

    /// Plaintext checksum disagreed after a successful decryption.
    ///
    /// Distinct from `AuthenticationFailure`: the AEAD accepted the
    /// ciphertext, so this signals corruption outside the cryptographic
    /// envelope (e.g. a bad metadata record paired with the wrong file).
    #[error("checksum mismatch: recorded {recorded}, computed {computed}")]
    ChecksumMismatch { recorded: String, computed: String },

    /// Decrypted metadata bytes did not parse into the expected structure.
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),

    /// A persisted record (Metadata, PrivateKeyData) failed to parse.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// No recipient entry matches the given certificate.
    ///
    /// `find_recipient` reports absence as `None`; this variant exists for
    /// flows where the caller must be an authorized recipient.
    #[error("no recipient matches the given certificate")]
    RecipientNotFound,

    /// Two recipients with byte-identical certificates in one Metadata.
    #[error("duplicate recipient certificate")]
    DuplicateRecipient,

    /// Key derivation failed (invalid cost parameters, internal error).
    #[error("key derivation failed: {0}")]
    Kdf(String),

    /// File I/O failure, with the operation and path for context.
    /// Never used for cryptographic failures.
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CofferError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
