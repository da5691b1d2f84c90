//! Full protocol flow: encrypt a file, seal its metadata for a recipient,
//! persist the records as JSON, then recover everything from the caller's
//! mnemonic alone.

use std::fs;

use anyhow::Result;
use secrecy::SecretString;
use tempfile::tempdir;

use coffer_core::{CofferError, Metadata, PrivateKeyData};
use coffer_crypto::{decrypt_private_key, encrypt_private_key, normalize_mnemonic, WrapKeyPair};
use coffer_files::{decrypt_file, encrypt_file};
use coffer_metadata::{unlock_metadata, MetadataBuilder};

/// Stand-in for the external CA collaborator: opaque certificate bytes
/// binding an identity to a public key. The core never parses these.
fn issue_certificate(identity: &str, keypair: &WrapKeyPair) -> Vec<u8> {
    let mut cert = Vec::new();
    cert.extend_from_slice(&[0x30, 0x82]);
    cert.extend_from_slice(identity.as_bytes());
    cert.extend_from_slice(&keypair.public_bytes());
    cert
}

fn file_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[test]
fn hello_world_single_recipient_flow() -> Result<()> {
    let dir = tempdir()?;

    let mnemonic =
        "quarter plate lunch sick stone height canvas key scatter trust copper labor";

    // -- encryption side --
    let plain = dir.path().join("hello.txt");
    let enc = dir.path().join("hello.enc");
    fs::write(&plain, b"Hello World!\n")?;

    let fid = file_id();
    let file_meta = encrypt_file(&plain, &enc, "text/plain")?;

    let keypair = WrapKeyPair::generate();
    let certificate = issue_certificate("alice", &keypair);

    let metadata = MetadataBuilder::new()
        .add_file(fid.clone(), file_meta)
        .add_recipient(&certificate, keypair.public.clone())?
        .build()?;

    // both persisted artifacts round-trip exactly through JSON
    let metadata_json = metadata.to_json()?;
    let key_record = encrypt_private_key(&keypair, &SecretString::from(mnemonic))?;
    let key_record_json = key_record.to_json()?;

    // -- decryption side, from the serialized records --
    let metadata = Metadata::from_json(&metadata_json)?;
    let key_record = PrivateKeyData::from_json(&key_record_json)?;

    let keypair = decrypt_private_key(
        &key_record,
        &SecretString::from(normalize_mnemonic(mnemonic)),
    )?;

    let opened = unlock_metadata(&metadata, &certificate, &keypair.secret)?;
    let file_meta = opened.get(&fid).expect("file id present in metadata");

    let out = dir.path().join("hello.out");
    decrypt_file(file_meta, &enc, &out)?;

    assert_eq!(fs::read(&out)?, b"Hello World!\n");
    Ok(())
}

#[test]
fn all_recipients_recover_identical_metadata() -> Result<()> {
    let dir = tempdir()?;
    let plain = dir.path().join("doc.txt");
    fs::write(&plain, b"shared between several parties")?;

    let fid = file_id();
    let file_meta = encrypt_file(&plain, dir.path().join("doc.enc"), "text/plain")?;

    let parties: Vec<(WrapKeyPair, Vec<u8>)> = (0..4)
        .map(|i| {
            let pair = WrapKeyPair::generate();
            let cert = issue_certificate(&format!("party-{i}"), &pair);
            (pair, cert)
        })
        .collect();

    let mut builder = MetadataBuilder::new().add_file(fid.clone(), file_meta);
    for (pair, cert) in &parties {
        builder = builder.add_recipient(cert, pair.public.clone())?;
    }
    let metadata = builder.build()?;

    let views: Vec<_> = parties
        .iter()
        .map(|(pair, cert)| unlock_metadata(&metadata, cert, &pair.secret).unwrap())
        .collect();

    for view in &views[1..] {
        assert_eq!(&views[0], view, "every recipient sees identical metadata");
    }
    assert!(views[0].get(&fid).is_some());
    Ok(())
}

#[test]
fn unauthorized_party_cannot_unlock() -> Result<()> {
    let authorized = WrapKeyPair::generate();
    let cert = issue_certificate("owner", &authorized);

    let metadata = MetadataBuilder::new()
        .add_recipient(&cert, authorized.public.clone())?
        .build()?;

    // a party whose certificate was never added
    let outsider = WrapKeyPair::generate();
    let outsider_cert = issue_certificate("outsider", &outsider);
    let err = unlock_metadata(&metadata, &outsider_cert, &outsider.secret).unwrap_err();
    assert!(matches!(err, CofferError::RecipientNotFound));

    // a party presenting a stolen certificate but holding the wrong key
    let err = unlock_metadata(&metadata, &cert, &outsider.secret).unwrap_err();
    assert!(matches!(err, CofferError::UnwrapFailure));
    Ok(())
}

#[test]
fn tampered_metadata_record_fails_closed() -> Result<()> {
    let pair = WrapKeyPair::generate();
    let cert = issue_certificate("owner", &pair);

    let mut metadata = MetadataBuilder::new()
        .add_recipient(&cert, pair.public.clone())?
        .build()?;
    metadata.metadata.ciphertext.push(0x00);

    let err = unlock_metadata(&metadata, &cert, &pair.secret).unwrap_err();
    assert!(matches!(err, CofferError::AuthenticationFailure));
    Ok(())
}

#[test]
fn metadata_key_never_appears_in_the_record() -> Result<()> {
    // The serialized Metadata must not contain any wrapped key's plaintext.
    // Unwrap one copy and scan the record for it.
    let pair = WrapKeyPair::generate();
    let cert = issue_certificate("owner", &pair);

    let metadata = MetadataBuilder::new()
        .add_recipient(&cert, pair.public.clone())?
        .build()?;

    let metadata_key =
        coffer_crypto::unwrap_key(&pair.secret, &metadata.recipients[0].encrypted_key)?;
    let json = metadata.to_json()?;

    use base64::Engine;
    let key_b64 = base64::engine::general_purpose::STANDARD.encode(metadata_key.as_bytes());
    assert!(!json.contains(&key_b64), "metadata key leaked into record");
    Ok(())
}

#[test]
fn garbage_records_parse_as_malformed() {
    assert!(matches!(
        Metadata::from_json("not json"),
        Err(CofferError::MalformedRecord(_))
    ));
    assert!(matches!(
        PrivateKeyData::from_json("{\"version\":1}"),
        Err(CofferError::MalformedRecord(_))
    ));
}
