//! Persisted record types for the coffer protocol.
//!
//! Two artifacts leave the client: `Metadata` (per encrypted collection,
//! held by the storage backend) and `PrivateKeyData` (per user identity).
//! Both are format-significant and must round-trip exactly through
//! `to_json`/`from_json`. Binary fields are base64 in the JSON form;
//! checksums are lowercase hex.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CofferError, CofferResult};

/// Current record format version, written into new `Metadata` and
/// `PrivateKeyData` records.
pub const FORMAT_VERSION: u32 = 1;

/// Argon2id cost parameters, serialized into `PrivateKeyData` so stored
/// records keep working when the defaults are raised later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub mem_cost_kib: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Lanes.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            mem_cost_kib: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Everything needed to decrypt one file, except the ciphertext itself.
///
/// Lives only inside a `DecryptedMetadata` map, which is only ever
/// serialized into the sealed metadata blob — the raw file key never
/// appears in a plaintext record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Raw 32-byte file encryption key.
    #[serde(with = "b64")]
    pub key: Vec<u8>,
    /// 24-byte AEAD nonce used for the file content.
    #[serde(with = "b64")]
    pub nonce: Vec<u8>,
    /// 16-byte Poly1305 tag over the file content.
    #[serde(with = "b64")]
    pub tag: Vec<u8>,
    /// Declared media type of the plaintext.
    pub mimetype: String,
    /// BLAKE3-256 of the plaintext, lowercase hex.
    pub checksum: String,
}

/// Plaintext form of a collection's metadata: file identifier → header.
///
/// Exists only transiently in memory between unsealing and use. A BTreeMap
/// keeps the serialized form canonical (sorted keys) and identifiers
/// unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptedMetadata {
    pub files: BTreeMap<String, FileMetadata>,
}

impl DecryptedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file_id: impl Into<String>, meta: FileMetadata) {
        self.files.insert(file_id.into(), meta);
    }

    pub fn get(&self, file_id: &str) -> Option<&FileMetadata> {
        self.files.get(file_id)
    }
}

/// Sealed form of `DecryptedMetadata`: ciphertext plus the nonce and tag
/// needed to open it under the metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMetadata {
    #[serde(with = "b64")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "b64")]
    pub nonce: Vec<u8>,
    #[serde(with = "b64")]
    pub tag: Vec<u8>,
}

/// One authorized party: its certificate (opaque DER bytes, issued and
/// verified elsewhere) and its wrapped copy of the metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(with = "b64")]
    pub certificate: Vec<u8>,
    #[serde(with = "b64")]
    pub encrypted_key: Vec<u8>,
}

/// The single artifact persisted per encrypted collection.
///
/// Invariant: every recipient's `encrypted_key` unwraps (with the matching
/// private key) to the one metadata key that seals `metadata`. Recipients
/// are an ordered list, not a map — certificates are the external
/// identifier and insertion order keeps serialization stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: u32,
    pub recipients: Vec<Recipient>,
    pub metadata: EncryptedMetadata,
}

impl Metadata {
    pub fn to_json(&self) -> CofferResult<String> {
        serde_json::to_string(self).map_err(|e| CofferError::MalformedRecord(e.to_string()))
    }

    pub fn from_json(data: &str) -> CofferResult<Self> {
        serde_json::from_str(data).map_err(|e| CofferError::MalformedRecord(e.to_string()))
    }
}

/// A user's private key at rest: sealed under a mnemonic-derived key.
///
/// The salt and Argon2id cost parameters travel with the record, so the
/// mnemonic is the only input needed to open it and cost defaults can be
/// raised without invalidating stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKeyData {
    pub version: u32,
    pub kdf: KdfParams,
    #[serde(with = "b64")]
    pub salt: Vec<u8>,
    #[serde(with = "b64")]
    pub nonce: Vec<u8>,
    #[serde(with = "b64")]
    pub tag: Vec<u8>,
    #[serde(with = "b64")]
    pub encrypted_key: Vec<u8>,
}

impl PrivateKeyData {
    pub fn to_json(&self) -> CofferResult<String> {
        serde_json::to_string(self).map_err(|e| CofferError::MalformedRecord(e.to_string()))
    }

    pub fn from_json(data: &str) -> CofferResult<Self> {
        serde_json::from_str(data).map_err(|e| CofferError::MalformedRecord(e.to_string()))
    }
}

/// Base64 (standard alphabet, padded) serde codec for binary fields.
mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_file_metadata() -> FileMetadata {
        FileMetadata {
            key: vec![0x11; 32],
            nonce: vec![0x22; 24],
            tag: vec![0x33; 16],
            mimetype: "text/plain".to_string(),
            checksum: "aa".repeat(32),
        }
    }

    fn sample_metadata() -> Metadata {
        Metadata {
            version: FORMAT_VERSION,
            recipients: vec![Recipient {
                certificate: b"fake-der-cert".to_vec(),
                encrypted_key: vec![0x44; 104],
            }],
            metadata: EncryptedMetadata {
                ciphertext: vec![0x55; 64],
                nonce: vec![0x66; 24],
                tag: vec![0x77; 16],
            },
        }
    }

    #[test]
    fn metadata_json_roundtrip() {
        let m = sample_metadata();
        let json = m.to_json().unwrap();
        let back = Metadata::from_json(&json).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn metadata_binary_fields_are_base64_strings() {
        let json = sample_metadata().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["recipients"][0]["certificate"].is_string());
        assert!(value["metadata"]["ciphertext"].is_string());
    }

    #[test]
    fn malformed_metadata_record_is_reported() {
        let err = Metadata::from_json("{\"version\": 1}").unwrap_err();
        assert!(matches!(err, CofferError::MalformedRecord(_)));
    }

    #[test]
    fn private_key_data_roundtrip_preserves_kdf_params() {
        let record = PrivateKeyData {
            version: FORMAT_VERSION,
            kdf: KdfParams {
                mem_cost_kib: 1024,
                time_cost: 1,
                parallelism: 1,
            },
            salt: vec![0x01; 16],
            nonce: vec![0x02; 24],
            tag: vec![0x03; 16],
            encrypted_key: vec![0x04; 32],
        };
        let json = record.to_json().unwrap();
        let back = PrivateKeyData::from_json(&json).unwrap();
        assert_eq!(record, back);
        assert_eq!(back.kdf.mem_cost_kib, 1024);
    }

    #[test]
    fn decrypted_metadata_keys_are_unique_and_sorted() {
        let mut meta = DecryptedMetadata::new();
        meta.insert("bbb", sample_file_metadata());
        meta.insert("aaa", sample_file_metadata());
        meta.insert("aaa", sample_file_metadata());

        assert_eq!(meta.files.len(), 2);
        let ids: Vec<&str> = meta.files.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["aaa", "bbb"]);
    }

    proptest! {
        #[test]
        fn recipient_roundtrip(
            cert in proptest::collection::vec(any::<u8>(), 0..=512),
            wrapped in proptest::collection::vec(any::<u8>(), 0..=256),
        ) {
            let mut m = sample_metadata();
            m.recipients[0] = Recipient { certificate: cert, encrypted_key: wrapped };
            let json = m.to_json().unwrap();
            let back = Metadata::from_json(&json).unwrap();
            prop_assert_eq!(m, back);
        }
    }
}
