//! BLAKE3 plaintext checksums
//!
//! The checksum is computed over the plaintext before encryption and
//! verified after a successful decryption. It is not a substitute for the
//! AEAD tag: it survives re-encryption under a new key and separates
//! storage-layer corruption (`ChecksumMismatch`) from tampering
//! (`AuthenticationFailure`).

use coffer_core::{CofferError, CofferResult};

/// Checksum a byte slice, returned as 64 lowercase hex chars.
pub fn checksum_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Verify recovered plaintext against the checksum recorded at encryption
/// time.
pub fn verify_checksum(data: &[u8], recorded: &str) -> CofferResult<()> {
    let computed = checksum_bytes(data);
    if computed != recorded {
        return Err(CofferError::ChecksumMismatch {
            recorded: recorded.to_string(),
            computed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_deterministic() {
        assert_eq!(checksum_bytes(b"hello"), checksum_bytes(b"hello"));
        assert_eq!(checksum_bytes(b"hello").len(), 64);
    }

    #[test]
    fn verify_accepts_matching_data() {
        let sum = checksum_bytes(b"Hello World!\n");
        assert!(verify_checksum(b"Hello World!\n", &sum).is_ok());
    }

    #[test]
    fn verify_rejects_different_data() {
        let sum = checksum_bytes(b"Hello World!\n");
        let err = verify_checksum(b"Hello World?\n", &sum).unwrap_err();
        assert!(matches!(err, CofferError::ChecksumMismatch { .. }));
    }
}
