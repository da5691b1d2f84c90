//! coffer-crypto: cryptographic core of the coffer E2EE protocol
//!
//! Key roles (all 256-bit, never reused across roles):
//! ```text
//! File key      — random, one per file, seals that file's content
//! Metadata key  — random, one per Metadata object, seals the metadata blob,
//!                 wrapped once per recipient public key
//! Vault key     — Argon2id from the user's mnemonic, seals the private key
//! ```
//!
//! Content and metadata sealing: XChaCha20-Poly1305 (24-byte random nonce,
//! 16-byte Poly1305 tag). Key wrapping: X25519 ephemeral envelope
//! (crypto_box). Mnemonic derivation: Argon2id with per-record salt and
//! serialized cost parameters.

pub mod cipher;
pub mod kdf;
pub mod vault;
pub mod wrap;

pub use cipher::{decrypt, encrypt, generate_key, SealedBox, SymmetricKey};
pub use kdf::{derive_vault_key, normalize_mnemonic};
pub use vault::{decrypt_private_key, encrypt_private_key, generate_mnemonic};
pub use wrap::{unwrap_key, wrap_key, PublicKey, SecretKey, WrapKeyPair};

/// Size of a symmetric key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Size of an Argon2id salt
pub const SALT_SIZE: usize = 16;

/// Size of a wrapped symmetric key:
/// `[32B ephemeral pk][24B nonce][32B key ciphertext][16B tag]`
pub const WRAPPED_KEY_SIZE: usize = 32 + 24 + KEY_SIZE + TAG_SIZE;
