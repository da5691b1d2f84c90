//! Asymmetric key wrapping: X25519 ephemeral envelope
//!
//! Wraps a symmetric key under a recipient's public key so each authorized
//! party gets its own copy of the metadata key. Every wrap generates a
//! fresh ephemeral sender keypair, so ciphertexts are never reusable across
//! recipients and reveal nothing about the wrapping party.
//!
//! Wire layout: `[32B ephemeral pk][24B nonce][32B key ciphertext][16B tag]`

use crypto_box::{aead::Aead, Nonce, SalsaBox};
pub use crypto_box::{PublicKey, SecretKey};
use rand::RngCore;
use zeroize::Zeroize;

use coffer_core::{CofferError, CofferResult};

use crate::cipher::SymmetricKey;
use crate::{KEY_SIZE, WRAPPED_KEY_SIZE};

const EPHEMERAL_PK_SIZE: usize = 32;
const WRAP_NONCE_SIZE: usize = 24;

/// An X25519 keypair. The secret half is what `PrivateKeyData` protects
/// at rest; the public half is what a certificate binds to an identity.
#[derive(Debug)]
pub struct WrapKeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl WrapKeyPair {
    pub fn generate() -> Self {
        let secret = SecretKey::generate(&mut rand::rngs::OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Reconstruct a keypair from raw secret key bytes (e.g. after opening
    /// a `PrivateKeyData` record).
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn public_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }
}

/// Wrap a symmetric key for one recipient.
///
/// Must be called once per recipient; the ephemeral keypair and nonce are
/// fresh per call, so two wraps of the same key never share ciphertext.
pub fn wrap_key(recipient: &PublicKey, key: &SymmetricKey) -> CofferResult<Vec<u8>> {
    let ephemeral = SecretKey::generate(&mut rand::rngs::OsRng);
    let ephemeral_pk = ephemeral.public_key();

    let salsa_box = SalsaBox::new(recipient, &ephemeral);

    let mut nonce = [0u8; WRAP_NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = salsa_box
        .encrypt(Nonce::from_slice(&nonce), key.as_bytes().as_slice())
        .map_err(|e| CofferError::EncryptionFailure(format!("key wrap failed: {e}")))?;

    let mut wrapped = Vec::with_capacity(WRAPPED_KEY_SIZE);
    wrapped.extend_from_slice(ephemeral_pk.as_bytes());
    wrapped.extend_from_slice(&nonce);
    wrapped.extend_from_slice(&ciphertext);
    Ok(wrapped)
}

/// Unwrap a symmetric key with the recipient's private key.
///
/// Fails with `UnwrapFailure` on a wrong private key, any corruption of
/// the wrapped bytes, or an unexpected length.
pub fn unwrap_key(secret: &SecretKey, wrapped: &[u8]) -> CofferResult<SymmetricKey> {
    if wrapped.len() != WRAPPED_KEY_SIZE {
        return Err(CofferError::UnwrapFailure);
    }

    let (ephemeral_pk, rest) = wrapped.split_at(EPHEMERAL_PK_SIZE);
    let (nonce, ciphertext) = rest.split_at(WRAP_NONCE_SIZE);

    let ephemeral_pk_bytes: [u8; 32] = ephemeral_pk
        .try_into()
        .map_err(|_| CofferError::UnwrapFailure)?;
    let salsa_box = SalsaBox::new(&PublicKey::from(ephemeral_pk_bytes), secret);

    let mut plaintext = salsa_box
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CofferError::UnwrapFailure)?;

    if plaintext.len() != KEY_SIZE {
        plaintext.zeroize();
        return Err(CofferError::UnwrapFailure);
    }

    let mut key_bytes = [0u8; KEY_SIZE];
    key_bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();

    Ok(SymmetricKey::from_bytes(key_bytes))
}
