use tempfile::TempDir;

use veraclaim::api::models::{Role, Tokens, User, UserStatus};
use veraclaim::session::{Session, SessionStore};

fn make_session() -> Session {
    Session {
        tokens: Tokens {
            access: "access-token".into(),
            refresh: "refresh-token".into(),
        },
        user: User {
            user_id: "7f1c".into(),
            username: "kim".into(),
            email: "kim@example.com".into(),
            role: Role::DeptAdmin,
            status: UserStatus::Active,
            company: Some(1),
            company_name: Some("Acme".into()),
            department: Some(4),
            department_name: Some("IP".into()),
            last_login: None,
        },
    }
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);

    let session = make_session();
    store.save(&session).unwrap();

    assert_eq!(store.load(), Some(session));
}

#[test]
fn test_load_missing_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);
    assert_eq!(store.load(), None);
}

#[test]
fn test_save_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = SessionStore::new(nested.clone(), 600);

    store.save(&make_session()).unwrap();
    assert!(nested.join("session.json").exists());
}

#[test]
fn test_expired_session_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 0);

    store.save(&make_session()).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1100));

    assert_eq!(store.load(), None);
}

#[test]
fn test_corrupt_file_returns_none() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);

    std::fs::write(store.path(), "{ not json").unwrap();
    assert_eq!(store.load(), None);
}

#[test]
fn test_clear_removes_session() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);

    store.save(&make_session()).unwrap();
    store.clear().unwrap();

    assert!(!store.path().exists());
    assert_eq!(store.load(), None);
}

#[test]
fn test_clear_without_session_is_ok() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);
    assert!(store.clear().is_ok());
}

#[test]
fn test_save_overwrites_previous_session() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);

    let mut session = make_session();
    store.save(&session).unwrap();

    session.tokens.access = "rotated".into();
    store.save(&session).unwrap();

    assert_eq!(store.load().unwrap().tokens.access, "rotated");
}

#[cfg(unix)]
#[test]
fn test_session_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("veraclaim");
    let store = SessionStore::new(nested.clone(), 600);
    store.save(&make_session()).unwrap();

    let file_mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(file_mode & 0o777, 0o600);
    let dir_mode = std::fs::metadata(&nested).unwrap().permissions().mode();
    assert_eq!(dir_mode & 0o777, 0o700);
}

#[cfg(unix)]
#[test]
fn test_save_tightens_existing_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);
    std::fs::write(store.path(), "{}").unwrap();
    std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

    store.save(&make_session()).unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_open_forgets_even_when_not_kept() {
    let dir = TempDir::new().unwrap();
    SessionStore::new(dir.path().to_path_buf(), 600)
        .save(&make_session())
        .unwrap();

    let store = SessionStore::open(dir.path().to_path_buf(), 600, false, true).unwrap();
    assert!(store.is_none());
    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn test_open_keeps_session_without_forget() {
    let dir = TempDir::new().unwrap();
    SessionStore::new(dir.path().to_path_buf(), 600)
        .save(&make_session())
        .unwrap();

    let store = SessionStore::open(dir.path().to_path_buf(), 600, true, false)
        .unwrap()
        .unwrap();
    assert_eq!(store.load(), Some(make_session()));
}

// --- Logout ---

#[test]
fn test_local_logout_clears_before_network() {
    use veraclaim::api::ApiClient;
    use veraclaim::app::event_loop::end_local_session;

    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf(), 600);
    let session = make_session();
    store.save(&session).unwrap();
    let client = ApiClient::new("http://127.0.0.1:9", 1).unwrap();
    client.set_tokens(Some(session.tokens.clone()));

    let tokens = end_local_session(&client, Some(&store));
    assert_eq!(tokens, Some(session.tokens));
    assert!(client.tokens().is_none());
    assert_eq!(store.load(), None);

    assert_eq!(end_local_session(&client, None), None);
}

#[tokio::test]
async fn test_server_logout_leaves_new_login_alone() {
    use veraclaim::api::ApiClient;

    let client = ApiClient::new("http://127.0.0.1:9", 1).unwrap();
    let old = Tokens {
        access: "old-access".into(),
        refresh: "old-refresh".into(),
    };
    let new = Tokens {
        access: "new-access".into(),
        refresh: "new-refresh".into(),
    };
    client.set_tokens(Some(new.clone()));

    // Nothing listens on the discard port; the call fails either way.
    assert!(client.logout(&old).await.is_err());
    assert_eq!(client.tokens(), Some(new));
}
