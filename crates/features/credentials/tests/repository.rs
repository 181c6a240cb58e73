use keyhold_credentials::{
    CredentialPatch, Credentials, CredentialsError, LoginEntryPatch, NewLoginEntry,
};
use keyhold_database::Database;
use keyhold_users::{NewUser, Users};
use surrealdb::types::Bytes;

async fn setup() -> (Users, Credentials) {
    let db = Database::builder()
        .url("mem://")
        .session("test", "credentials")
        .init()
        .await
        .expect("in-memory database");
    (keyhold_users::init(db.clone()), keyhold_credentials::init(db))
}

async fn create_owner(users: &Users, username: &str) -> String {
    users
        .create(NewUser {
            username: username.to_owned(),
            secret_hash: "$argon2id$v=19$m=65536,t=3,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_owned(),
            salt: Bytes::from(vec![1u8; 16]),
            encrypted_key: Bytes::from(vec![2u8; 48]),
            key_iv: Bytes::from(vec![3u8; 12]),
        })
        .await
        .expect("create owner")
        .id
}

fn sample_entry(username: &str) -> NewLoginEntry {
    NewLoginEntry {
        username: username.to_owned(),
        secret: Bytes::from(vec![0xAA; 32]),
        iv: Bytes::from(vec![0xBB; 12]),
        notes: None,
    }
}

#[tokio::test]
async fn create_then_read_round_trips() {
    let (users, credentials) = setup().await;
    let owner = create_owner(&users, "alice").await;

    let created = credentials
        .create(&owner, "example.com", vec![sample_entry("alice@example.com")])
        .await
        .expect("create");

    let fetched = credentials.read(&created.id).await.expect("read");
    assert_eq!(fetched.owner, owner);
    assert_eq!(fetched.website, "example.com");
    assert_eq!(fetched.entries.len(), 1);
    assert_eq!(fetched.entries[0].username, "alice@example.com");
    assert_eq!(fetched.entries[0].secret, Bytes::from(vec![0xAA; 32]));
}

#[tokio::test]
async fn create_for_missing_owner_fails() {
    let (_, credentials) = setup().await;

    let result = credentials.create("does-not-exist", "example.com", vec![]).await;

    assert!(matches!(result, Err(CredentialsError::OwnerNotFound { .. })));
}

#[tokio::test]
async fn read_missing_record_is_not_found() {
    let (_, credentials) = setup().await;

    let result = credentials.read("does-not-exist").await;

    assert!(matches!(result, Err(CredentialsError::NotFound { .. })));
}

#[tokio::test]
async fn read_by_user_returns_only_owned_records() {
    let (users, credentials) = setup().await;
    let alice = create_owner(&users, "alice").await;
    let bob = create_owner(&users, "bob").await;

    credentials.create(&alice, "one.example", vec![]).await.expect("create");
    credentials.create(&alice, "two.example", vec![]).await.expect("create");
    credentials.create(&bob, "three.example", vec![]).await.expect("create");

    let owned = credentials.read_by_user(&alice).await.expect("read_by_user");
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|record| record.owner == alice));
}

#[tokio::test]
async fn same_site_entries_coexist_in_one_record() {
    let (users, credentials) = setup().await;
    let owner = create_owner(&users, "alice").await;

    let created = credentials
        .create(&owner, "example.com", vec![sample_entry("personal@example.com")])
        .await
        .expect("create");

    let changed =
        credentials.add_entry(&created.id, sample_entry("work@example.com")).await.expect("add");
    assert_eq!(changed, 1);

    let fetched = credentials.read(&created.id).await.expect("read");
    assert_eq!(fetched.entries.len(), 2, "appending must not overwrite");
    assert_eq!(fetched.entries[0].username, "personal@example.com");
    assert_eq!(fetched.entries[1].username, "work@example.com");
}

#[tokio::test]
async fn update_entry_mutates_only_the_target() {
    let (users, credentials) = setup().await;
    let owner = create_owner(&users, "alice").await;
    let created = credentials
        .create(&owner, "example.com", vec![sample_entry("first"), sample_entry("second")])
        .await
        .expect("create");

    let patch = LoginEntryPatch {
        secret: Some(Bytes::from(vec![0xCC; 32])),
        iv: Some(Bytes::from(vec![0xDD; 12])),
        notes: Some(Some("rotated".to_owned())),
        ..LoginEntryPatch::default()
    };
    let changed = credentials.update_entry(&created.id, 1, patch).await.expect("update_entry");
    assert_eq!(changed, 1);

    let fetched = credentials.read(&created.id).await.expect("read");
    assert_eq!(fetched.entries[0].secret, Bytes::from(vec![0xAA; 32]), "untouched entry");
    assert_eq!(fetched.entries[1].secret, Bytes::from(vec![0xCC; 32]));
    assert_eq!(fetched.entries[1].notes.as_deref(), Some("rotated"));
    assert!(fetched.entries[1].updated_at >= fetched.entries[1].created_at);
}

#[tokio::test]
async fn entry_index_past_the_list_is_rejected() {
    let (users, credentials) = setup().await;
    let owner = create_owner(&users, "alice").await;
    let created =
        credentials.create(&owner, "example.com", vec![sample_entry("only")]).await.expect("create");

    let update = credentials
        .update_entry(&created.id, 1, LoginEntryPatch::default())
        .await;
    assert!(matches!(update, Err(CredentialsError::EntryOutOfRange { .. })));

    let remove = credentials.remove_entry(&created.id, 1).await;
    assert!(matches!(remove, Err(CredentialsError::EntryOutOfRange { .. })));
}

#[tokio::test]
async fn remove_entry_preserves_order_of_the_rest() {
    let (users, credentials) = setup().await;
    let owner = create_owner(&users, "alice").await;
    let created = credentials
        .create(
            &owner,
            "example.com",
            vec![sample_entry("first"), sample_entry("second"), sample_entry("third")],
        )
        .await
        .expect("create");

    let changed = credentials.remove_entry(&created.id, 1).await.expect("remove_entry");
    assert_eq!(changed, 1);

    let fetched = credentials.read(&created.id).await.expect("read");
    let usernames: Vec<_> = fetched.entries.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(usernames, vec!["first", "third"]);
}

#[tokio::test]
async fn update_renames_the_website() {
    let (users, credentials) = setup().await;
    let owner = create_owner(&users, "alice").await;
    let created =
        credentials.create(&owner, "old.example", vec![]).await.expect("create");

    let changed = credentials
        .update(&created.id, CredentialPatch { website: Some("new.example".to_owned()) })
        .await
        .expect("update");
    assert_eq!(changed, 1);

    let fetched = credentials.read(&created.id).await.expect("read");
    assert_eq!(fetched.website, "new.example");
    assert!(fetched.updated_at >= created.updated_at);
}

#[tokio::test]
async fn delete_and_delete_by_owner_report_counts() {
    let (users, credentials) = setup().await;
    let owner = create_owner(&users, "alice").await;
    let one = credentials.create(&owner, "one.example", vec![]).await.expect("create");
    credentials.create(&owner, "two.example", vec![]).await.expect("create");
    credentials.create(&owner, "three.example", vec![]).await.expect("create");

    assert_eq!(credentials.delete(&one.id).await.expect("delete"), 1);
    assert_eq!(credentials.delete(&one.id).await.expect("repeat delete"), 0);

    assert_eq!(credentials.delete_by_owner(&owner).await.expect("delete_by_owner"), 2);
    assert!(credentials.read_by_user(&owner).await.expect("read_by_user").is_empty());
}
