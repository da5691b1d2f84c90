//! coffer-core: shared record types, error types, and persisted-format codecs

pub mod error;
pub mod types;

pub use error::{CofferError, CofferResult};
pub use types::{
    DecryptedMetadata, EncryptedMetadata, FileMetadata, KdfParams, Metadata, PrivateKeyData,
    Recipient, FORMAT_VERSION,
};
