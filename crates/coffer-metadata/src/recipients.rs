//! Recipient fan-out and lookup
//!
//! One metadata key per `Metadata` object, wrapped once per authorized
//! recipient. Recipients are an ordered list of (certificate, wrapped key)
//! pairs; certificates are opaque DER bytes issued elsewhere and matched
//! by exact byte equality.

use coffer_core::{
    CofferError, CofferResult, DecryptedMetadata, FileMetadata, Metadata, Recipient,
    FORMAT_VERSION,
};
use coffer_crypto::cipher::{self, SymmetricKey};
use coffer_crypto::wrap::{unwrap_key, wrap_key, PublicKey, SecretKey};

use crate::seal::{decrypt_metadata, encrypt_metadata};

/// Find the recipient entry whose certificate bytes exactly equal `cert`.
///
/// Absence is a normal outcome, not an error: a caller that is not (or no
/// longer) authorized simply gets `None`. On data that already violates
/// the uniqueness invariant, the first match wins.
pub fn find_recipient<'a>(cert: &[u8], recipients: &'a [Recipient]) -> Option<&'a Recipient> {
    recipients.iter().find(|r| r.certificate == cert)
}

/// Assembles a `Metadata` record: collects file entries, generates the
/// metadata key exactly once at `build`, and wraps it per recipient.
#[derive(Debug, Default)]
pub struct MetadataBuilder {
    files: DecryptedMetadata,
    recipients: Vec<(Vec<u8>, PublicKey)>,
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one encrypted file's header under its file identifier.
    pub fn add_file(mut self, file_id: impl Into<String>, meta: FileMetadata) -> Self {
        self.files.insert(file_id, meta);
        self
    }

    /// Authorize a recipient: its certificate (opaque bytes) and the
    /// public key to wrap the metadata key against. Byte-identical
    /// certificates are a data-integrity violation, rejected here rather
    /// than silently merged.
    pub fn add_recipient(mut self, certificate: &[u8], public_key: PublicKey) -> CofferResult<Self> {
        if self.recipients.iter().any(|(c, _)| c == certificate) {
            return Err(CofferError::DuplicateRecipient);
        }
        self.recipients.push((certificate.to_vec(), public_key));
        Ok(self)
    }

    /// Generate the metadata key, seal the collection, wrap the key for
    /// every recipient, and emit the final record.
    ///
    /// The metadata key lives only inside this call; it is dropped (and
    /// zeroized) before the record is returned.
    pub fn build(self) -> CofferResult<Metadata> {
        let metadata_key = cipher::generate_key();
        let sealed = encrypt_metadata(&metadata_key, &self.files)?;

        let mut recipients = Vec::with_capacity(self.recipients.len());
        for (certificate, public_key) in self.recipients {
            let encrypted_key = wrap_key(&public_key, &metadata_key)?;
            recipients.push(Recipient {
                certificate,
                encrypted_key,
            });
        }

        Ok(Metadata {
            version: FORMAT_VERSION,
            recipients,
            metadata: sealed,
        })
    }
}

/// Full read path for one caller: locate its recipient entry by
/// certificate, unwrap the metadata key with its private key, and open the
/// sealed collection.
///
/// Fails with `RecipientNotFound` if the certificate has no entry — this
/// is the flow where the caller must be authorized, so absence escalates.
pub fn unlock_metadata(
    metadata: &Metadata,
    cert: &[u8],
    secret: &SecretKey,
) -> CofferResult<DecryptedMetadata> {
    let recipient =
        find_recipient(cert, &metadata.recipients).ok_or(CofferError::RecipientNotFound)?;
    let metadata_key: SymmetricKey = unwrap_key(secret, &recipient.encrypted_key)?;
    decrypt_metadata(&metadata_key, &metadata.metadata)
}
