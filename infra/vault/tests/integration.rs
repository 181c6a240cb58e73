use keyhold_vault::prelude::*;
use keyhold_vault::{SealedSecret, VaultError};

#[test]
fn key_hierarchy_round_trip() {
    // Register: derive wrap vault from master secret, wrap a fresh data key.
    let salt = generate_salt();
    let wrap_vault = Vault::<Aes>::builder().derived_key("master-secret", salt).unwrap().build().unwrap();

    let data_key = DataKey::generate();
    let wrapped = wrap_vault.wrap_key(&data_key, b"user-key").unwrap();

    // Save a login under the data key.
    let entry_vault = Vault::<Aes>::builder().data_key(&data_key).build().unwrap();
    let sealed = entry_vault.seal(b"site-password", b"login-entry").unwrap();

    // Returning session: same secret + salt unwraps the same data key.
    let wrap_vault =
        Vault::<Aes>::builder().derived_key("master-secret", salt).unwrap().build().unwrap();
    let restored = wrap_vault.unwrap_key(&wrapped, b"user-key").unwrap();
    assert_eq!(restored.as_bytes(), data_key.as_bytes());

    let entry_vault = Vault::<Aes>::builder().data_key(&restored).build().unwrap();
    assert_eq!(entry_vault.open(&sealed, b"login-entry").unwrap(), b"site-password");
}

#[test]
fn wrong_master_secret_cannot_unwrap() {
    let salt = generate_salt();
    let wrap_vault =
        Vault::<Aes>::builder().derived_key("master-secret", salt).unwrap().build().unwrap();
    let wrapped = wrap_vault.wrap_key(&DataKey::generate(), b"user-key").unwrap();

    let wrong =
        Vault::<Aes>::builder().derived_key("wrong-secret", salt).unwrap().build().unwrap();
    let result = wrong.unwrap_key(&wrapped, b"user-key");

    assert!(matches!(result, Err(VaultError::Decryption { .. })));
}

#[test]
fn context_binding_security() {
    let vault = Vault::<Aes>::builder().data_key(&DataKey::generate()).build().unwrap();
    let sealed = vault.seal(b"bound-data", b"right-context").unwrap();

    let result = vault.open(&sealed, b"wrong-context");

    assert!(
        matches!(result, Err(VaultError::Decryption { .. })),
        "Must fail with Decryption when context is wrong"
    );
}

#[test]
fn algorithm_agility_cha_cha() {
    let key = DataKey::generate();
    let vault = Vault::<ChaCha>::builder().data_key(&key).build().unwrap();

    let sealed = vault.seal([1u8, 2, 3, 4, 5], b"test").unwrap();
    let opened = vault.open(&sealed, b"test").unwrap();

    assert_eq!(opened, vec![1, 2, 3, 4, 5]);
}

#[test]
fn sealed_parts_survive_storage_round_trip() {
    let vault = Vault::<Aes>::builder().data_key(&DataKey::generate()).build().unwrap();
    let sealed = vault.seal(b"persisted", b"login-entry").unwrap();

    // Simulate the database storing ciphertext and IV in separate fields.
    let (ciphertext, iv) = (sealed.ciphertext.clone(), sealed.iv.clone());
    let restored = SealedSecret::from_parts(ciphertext, iv).unwrap();

    assert_eq!(vault.open(&restored, b"login-entry").unwrap(), b"persisted");
}

#[test]
fn from_parts_rejects_malformed_columns() {
    assert!(matches!(
        SealedSecret::from_parts(vec![1, 2], vec![0; 12]),
        Err(VaultError::InvalidPayload { .. })
    ));
    assert!(matches!(
        SealedSecret::from_parts(vec![0; 64], vec![0; 7]),
        Err(VaultError::InvalidPayload { .. })
    ));
}
