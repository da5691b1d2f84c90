//! Private key at rest: sealed under a mnemonic-derived vault key
//!
//! The private key is never stored raw. A fresh random salt and the current
//! Argon2id cost parameters go into the `PrivateKeyData` record alongside
//! the sealed key, so the mnemonic alone opens it and cost defaults can be
//! raised for new records without breaking old ones.

use bip39::Mnemonic;
use rand::RngCore;
use secrecy::SecretString;

use coffer_core::{CofferError, CofferResult, KdfParams, PrivateKeyData, FORMAT_VERSION};

use crate::cipher::{self, SealedBox};
use crate::kdf::derive_vault_key;
use crate::wrap::WrapKeyPair;
use crate::SALT_SIZE;

/// Generate a 12-word BIP-39 mnemonic for a new user identity.
///
/// Displayed once for the user to memorize or write down; never stored.
pub fn generate_mnemonic() -> CofferResult<String> {
    let mut entropy = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy(&entropy)
        .map_err(|e| CofferError::Kdf(format!("mnemonic generation failed: {e}")))?;
    Ok(mnemonic.to_string())
}

/// Seal a private key under a key derived from the mnemonic.
pub fn encrypt_private_key(
    keypair: &WrapKeyPair,
    mnemonic: &SecretString,
) -> CofferResult<PrivateKeyData> {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);

    let params = KdfParams::default();
    let vault_key = derive_vault_key(mnemonic, &salt, &params)?;

    let sealed = cipher::encrypt(&vault_key, &keypair.secret.to_bytes())?;

    Ok(PrivateKeyData {
        version: FORMAT_VERSION,
        kdf: params,
        salt: salt.to_vec(),
        nonce: sealed.nonce.to_vec(),
        tag: sealed.tag.to_vec(),
        encrypted_key: sealed.ciphertext,
    })
}

/// Open a `PrivateKeyData` record with its mnemonic.
///
/// Derives the vault key using the salt and cost parameters stored in the
/// record itself. A wrong mnemonic fails authentication and surfaces as
/// `WrongMnemonic`.
pub fn decrypt_private_key(
    record: &PrivateKeyData,
    mnemonic: &SecretString,
) -> CofferResult<WrapKeyPair> {
    let vault_key = derive_vault_key(mnemonic, &record.salt, &record.kdf)?;

    let sealed = SealedBox::from_parts(record.encrypted_key.clone(), &record.nonce, &record.tag)
        .map_err(|_| CofferError::MalformedRecord("bad private key record field sizes".into()))?;

    let plaintext = cipher::decrypt(&vault_key, &sealed).map_err(|e| match e {
        CofferError::AuthenticationFailure => CofferError::WrongMnemonic,
        other => other,
    })?;

    let secret_bytes: [u8; 32] = plaintext.as_slice().try_into().map_err(|_| {
        CofferError::MalformedRecord(format!(
            "decrypted private key has wrong size: {} bytes",
            plaintext.len()
        ))
    })?;

    Ok(WrapKeyPair::from_secret_bytes(secret_bytes))
}
