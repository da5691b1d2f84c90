//! coffer-metadata: metadata sealing and multi-recipient key fan-out
//!
//! Write path: collect `FileMetadata` entries → seal under a freshly
//! generated metadata key → wrap that key once per recipient public key →
//! emit the `Metadata` record, the only artifact a storage backend holds.
//!
//! Read path: find the caller's recipient entry by certificate → unwrap
//! the metadata key with its private key → open the sealed collection →
//! look up individual files by identifier.

pub mod recipients;
pub mod seal;

pub use recipients::{find_recipient, unlock_metadata, MetadataBuilder};
pub use seal::{decrypt_metadata, encrypt_metadata};
