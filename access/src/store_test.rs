use super::*;
use crate::session::Role;

/// Storage that refuses writes to one key.
struct RejectingKey {
    inner: MemoryStorage,
    rejected: &'static str,
}

impl SessionStorage for RejectingKey {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.rejected {
            return Err(StorageError::Write("quota exceeded".to_owned()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key)
    }
}

fn ops_session() -> Session {
    Session {
        token: "abc123".to_owned(),
        role: Role::OpsUser,
        identity: "ops@example.com".to_owned(),
    }
}

#[test]
fn load_returns_none_on_empty_storage() {
    let mut store = SessionStore::new(MemoryStorage::new());
    assert_eq!(store.load(), None);
}

#[test]
fn save_then_load_restores_session() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.save(&ops_session()).unwrap();
    assert_eq!(store.load(), Some(ops_session()));
}

#[test]
fn save_writes_token_and_profile_keys() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.save(&ops_session()).unwrap();

    assert_eq!(store.storage().get_item(TOKEN_KEY).as_deref(), Some("abc123"));
    let profile: serde_json::Value =
        serde_json::from_str(&store.storage().get_item(PROFILE_KEY).unwrap()).unwrap();
    assert_eq!(profile, serde_json::json!({ "email": "ops@example.com", "role": "OPS_USER" }));
}

#[test]
fn load_treats_malformed_profile_as_absent_and_purges() {
    let storage = MemoryStorage::new()
        .with_item(TOKEN_KEY, "abc123")
        .with_item(PROFILE_KEY, "{not json");
    let mut store = SessionStore::new(storage);

    assert_eq!(store.load(), None);
    assert!(store.storage().is_empty());
}

#[test]
fn load_treats_unknown_role_as_absent() {
    let storage = MemoryStorage::new()
        .with_item(TOKEN_KEY, "abc123")
        .with_item(PROFILE_KEY, r#"{"email":"a@b.com","role":"SUPERUSER"}"#);
    let mut store = SessionStore::new(storage);
    assert_eq!(store.load(), None);
}

#[test]
fn load_requires_token() {
    let storage =
        MemoryStorage::new().with_item(PROFILE_KEY, r#"{"email":"a@b.com","role":"OPS_USER"}"#);
    let mut store = SessionStore::new(storage);
    assert_eq!(store.load(), None);
    assert!(store.storage().is_empty());
}

#[test]
fn load_rejects_blank_token() {
    let storage = MemoryStorage::new()
        .with_item(TOKEN_KEY, "   ")
        .with_item(PROFILE_KEY, r#"{"email":"a@b.com","role":"OPS_USER"}"#);
    let mut store = SessionStore::new(storage);
    assert_eq!(store.load(), None);
}

#[test]
fn load_requires_profile() {
    let storage = MemoryStorage::new().with_item(TOKEN_KEY, "abc123");
    let mut store = SessionStore::new(storage);
    assert_eq!(store.load(), None);
}

#[test]
fn save_to_read_only_storage_fails_and_leaves_nothing() {
    let mut store = SessionStore::new(MemoryStorage::read_only());
    let err = store.save(&ops_session()).unwrap_err();
    assert!(matches!(err, StorageError::Write(_)));
    assert_eq!(store.load(), None);
}

#[test]
fn clear_is_idempotent() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.save(&ops_session()).unwrap();
    store.clear().unwrap();
    store.clear().unwrap();
    assert_eq!(store.load(), None);
}

#[test]
fn failed_profile_write_restores_previous_session() {
    let mut seeded = SessionStore::new(MemoryStorage::new());
    seeded.save(&ops_session()).unwrap();
    let mut store = SessionStore::new(RejectingKey {
        inner: seeded.storage().clone(),
        rejected: PROFILE_KEY,
    });

    let replacement = Session {
        token: "new-token".to_owned(),
        role: Role::ClientUser,
        identity: "client@example.com".to_owned(),
    };
    assert!(store.save(&replacement).is_err());

    assert_eq!(store.storage().get_item(TOKEN_KEY).as_deref(), Some("abc123"));
    assert_eq!(store.load(), Some(ops_session()));
}

#[test]
fn failed_first_save_leaves_no_token_behind() {
    let mut store = SessionStore::new(RejectingKey {
        inner: MemoryStorage::new(),
        rejected: PROFILE_KEY,
    });
    assert!(store.save(&ops_session()).is_err());
    assert_eq!(store.storage().get_item(TOKEN_KEY), None);
}

#[test]
fn clear_on_read_only_storage_reports_failure() {
    let mut store = SessionStore::new(
        MemoryStorage::read_only()
            .with_item(TOKEN_KEY, "abc123")
            .with_item(PROFILE_KEY, r#"{"email":"ops@example.com","role":"OPS_USER"}"#),
    );
    assert!(matches!(store.clear(), Err(StorageError::Write(_))));
    assert_eq!(store.load(), Some(ops_session()));
}
