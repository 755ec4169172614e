use film_finder_db::*;

#[test]
fn create_then_verify() {
    let store = AccountStore::open_memory().unwrap();
    store.create_user("alice", "wonderland").unwrap();
    assert!(store.user_exists("alice").unwrap());
    assert!(store.verify("alice", "wonderland").unwrap());
    assert!(!store.verify("alice", "wrong-pass").unwrap());
    assert!(!store.verify("nobody", "wonderland").unwrap());
}

#[test]
fn usernames_are_case_sensitive() {
    let store = AccountStore::open_memory().unwrap();
    store.create_user("alice", "wonderland").unwrap();
    assert!(!store.user_exists("ALICE").unwrap());
    assert!(!store.verify("Alice", "wonderland").unwrap());
}

#[test]
fn short_credentials_are_rejected() {
    let store = AccountStore::open_memory().unwrap();
    assert!(matches!(
        store.create_user("bob", "longenough"),
        Err(AccountError::UsernameTooShort)
    ));
    assert!(matches!(
        store.create_user("bobby", "pw"),
        Err(AccountError::PasswordTooShort)
    ));
    assert_eq!(store.user_count().unwrap(), 0);
}

#[test]
fn duplicate_username_is_rejected() {
    let store = AccountStore::open_memory().unwrap();
    store.create_user("alice", "wonderland").unwrap();
    assert!(matches!(
        store.create_user("alice", "another1"),
        Err(AccountError::UsernameTaken(_))
    ));
}

#[test]
fn accounts_persist_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.db");
    AccountStore::open(&path)
        .unwrap()
        .create_user("carol", "secret")
        .unwrap();
    let reopened = AccountStore::open(&path).unwrap();
    assert!(reopened.verify("carol", "secret").unwrap());
}
