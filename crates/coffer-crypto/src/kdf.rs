//! Key derivation: Argon2id mnemonic → vault key
//!
//! A mnemonic has far less entropy than a real key, so the derivation cost
//! is the primary defense against offline brute force. Cost parameters are
//! never a hidden constant: they come from (and are stored in) the
//! `PrivateKeyData` record, so defaults can be raised without invalidating
//! existing records.

use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::{ExposeSecret, SecretString};

use coffer_core::{CofferError, CofferResult, KdfParams};

use crate::cipher::SymmetricKey;
use crate::KEY_SIZE;

/// Canonical mnemonic form: lowercase, all whitespace stripped.
///
/// Applied before every derivation so `"Quarter Plate"` and
/// `"quarter  plate\n"` open the same record.
pub fn normalize_mnemonic(mnemonic: &str) -> String {
    mnemonic
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Derive a 256-bit vault key from a mnemonic via Argon2id.
///
/// Deterministic for a fixed (mnemonic, salt, params) triple. The salt is
/// random per record and travels with it; it is not secret.
pub fn derive_vault_key(
    mnemonic: &SecretString,
    salt: &[u8],
    params: &KdfParams,
) -> CofferResult<SymmetricKey> {
    let argon2_params = Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| CofferError::Kdf(format!("invalid Argon2id params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let normalized = normalize_mnemonic(mnemonic.expose_secret());
    let mut key = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(normalized.as_bytes(), salt, &mut key)
        .map_err(|e| CofferError::Kdf(format!("Argon2id derivation failed: {e}")))?;

    Ok(SymmetricKey::from_bytes(key))
}

#[cfg(test)]
pub(crate) fn test_params() -> KdfParams {
    KdfParams {
        mem_cost_kib: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}
