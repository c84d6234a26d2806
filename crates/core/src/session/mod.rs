//! Authentication session state machine
//!
//! States: anonymous → authenticating → authenticated, and back to anonymous
//! on failed authentication or logout. The current session is mirrored into a
//! [`KeyValueStore`] under [`TOKEN_KEY`] and [`USER_KEY`] so it survives a
//! restart. A restored token is trusted as-is; nothing re-validates it.

mod credentials;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::config::simulate_latency;
use crate::error::{Error, Result};
use crate::models::{Identity, NewUser, Session, User, UserPatch, UserRole};
use crate::repository::UserRepository;
use crate::storage::KeyValueStore;

pub use credentials::{SharedPassword, SHARED_PASSWORD};

/// Storage key for the opaque session token
pub const TOKEN_KEY: &str = "session_token";

/// Storage key for the JSON-serialized session user
pub const USER_KEY: &str = "session_user";

/// Owns the current session and its durable mirror
pub struct SessionStore {
    users: Arc<UserRepository>,
    storage: Arc<dyn KeyValueStore>,
    password: SharedPassword,
    auth_latency: Duration,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// Build the store and hydrate it from `storage`.
    ///
    /// A persisted token/user pair that parses becomes the authenticated
    /// session immediately. A partial or unreadable pair is wiped.
    pub fn new(
        users: Arc<UserRepository>,
        storage: Arc<dyn KeyValueStore>,
        auth_latency: Duration,
    ) -> Result<Self> {
        let password = SharedPassword::new(SHARED_PASSWORD)?;
        let initial = hydrate(storage.as_ref());
        let (state, _) = watch::channel(initial);

        Ok(Self {
            users,
            storage,
            password,
            auth_latency,
            state,
        })
    }

    /// Current session snapshot
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Observe every published session state
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Authenticate an existing account
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        self.begin_authentication();
        simulate_latency(self.auth_latency).await;

        let outcome = self.sign_in(email, password).await;
        self.finish_authentication(outcome)
    }

    /// Create an account with the default role and sign in as it.
    ///
    /// The password is not stored; every account signs in with the shared
    /// password.
    #[instrument(skip(self, _password))]
    pub async fn register(&self, email: &str, _password: &str, name: &str) -> Result<Identity> {
        self.begin_authentication();
        simulate_latency(self.auth_latency).await;

        let outcome = self.sign_up(email, name).await;
        self.finish_authentication(outcome)
    }

    /// Drop the session and wipe its durable mirror. Never fails.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        if let Err(e) = self.storage.remove_all(&[TOKEN_KEY, USER_KEY]) {
            warn!(error = %e, "Failed to clear persisted session");
        }
        self.state.send_replace(Session::anonymous());
        info!("Logged out");
    }

    /// Merge `patch` into the session user and re-persist it.
    ///
    /// Returns the updated user, or `None` when nobody is signed in. The
    /// token is untouched. The users collection is not modified.
    #[instrument(skip(self, patch))]
    pub fn update_user(&self, patch: UserPatch) -> Option<User> {
        let mut updated = None;
        self.state.send_if_modified(|session| match session.identity.as_mut() {
            Some(identity) => {
                identity.user.apply_patch(patch);
                updated = Some(identity.user.clone());
                true
            }
            None => false,
        });

        let user = updated?;
        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.storage.put_all(&[(USER_KEY, json.as_str())]) {
                    warn!(error = %e, "Failed to persist updated session user");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize session user"),
        }
        Some(user)
    }

    fn begin_authentication(&self) {
        self.state.send_modify(|session| session.is_loading = true);
    }

    /// Publish the outcome: authenticated on success, anonymous on failure
    fn finish_authentication(&self, outcome: Result<Identity>) -> Result<Identity> {
        match outcome {
            Ok(identity) => {
                info!(user_id = %identity.user.id, "Authenticated");
                self.state.send_replace(Session::authenticated(
                    identity.user.clone(),
                    identity.token.clone(),
                ));
                Ok(identity)
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                self.state.send_replace(Session::anonymous());
                Err(e)
            }
        }
    }

    /// Check credentials, stamp the login and persist the session. A failed
    /// persist puts the previous `last_login` back.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .ok_or(Error::InvalidCredentials)?;

        if !self.password.verify(password) {
            return Err(Error::InvalidCredentials);
        }

        let previous = user.last_login;
        let user = self.users.record_login(&user.id).await?;
        let identity = Identity {
            token: issue_token(&user),
            user,
        };

        if let Err(e) = self.persist(&identity) {
            if let Err(undo) = self
                .users
                .restore_last_login(&identity.user.id, previous)
                .await
            {
                warn!(error = %undo, "Failed to restore last login");
            }
            return Err(e);
        }
        Ok(identity)
    }

    /// Create the account, stamp the login and persist the session. Any
    /// failure after the insert removes the new account again.
    async fn sign_up(&self, email: &str, name: &str) -> Result<Identity> {
        if self.users.find_by_email(email).await.is_some() {
            return Err(Error::AccountExists(email.to_string()));
        }

        let draft = NewUser {
            email: email.to_string(),
            name: name.to_string(),
            role: UserRole::User,
            avatar: None,
        };
        let user = self.users.insert(draft).await.map_err(|e| match e {
            Error::DuplicateKey { .. } => Error::AccountExists(email.to_string()),
            other => other,
        })?;

        match self.complete_sign_up(&user.id).await {
            Ok(identity) => Ok(identity),
            Err(e) => {
                if let Err(undo) = self.users.remove(&user.id).await {
                    warn!(error = %undo, "Failed to remove half-registered account");
                }
                Err(e)
            }
        }
    }

    async fn complete_sign_up(&self, id: &str) -> Result<Identity> {
        let user = self.users.record_login(id).await?;
        let identity = Identity {
            token: issue_token(&user),
            user,
        };
        self.persist(&identity)?;
        Ok(identity)
    }

    fn persist(&self, identity: &Identity) -> Result<()> {
        let user_json = serde_json::to_string(&identity.user)?;
        self.storage.put_all(&[
            (TOKEN_KEY, identity.token.as_str()),
            (USER_KEY, user_json.as_str()),
        ])
    }
}

/// Opaque token for a freshly authenticated user
fn issue_token(user: &User) -> String {
    format!("jwt_token_{}_{}", user.id, Utc::now().timestamp_millis())
}

/// Restore a persisted session, wiping anything incomplete or unreadable
fn hydrate(storage: &dyn KeyValueStore) -> Session {
    let token = storage.get(TOKEN_KEY);
    let user = storage.get(USER_KEY);

    let restored = match (token, user) {
        (Ok(None), Ok(None)) => return Session::anonymous(),
        (Ok(Some(token)), Ok(Some(user_json))) => serde_json::from_str::<User>(&user_json)
            .map(|user| Session::authenticated(user, token))
            .map_err(Error::from),
        (Err(e), _) | (_, Err(e)) => Err(e),
        _ => Err(Error::InvalidValue {
            kind: "persisted session",
            value: "token and user must both be present".to_string(),
        }),
    };

    match restored {
        Ok(session) => {
            if let Some(user) = session.user() {
                info!(user_id = %user.id, "Restored persisted session");
            }
            session
        }
        Err(e) => {
            warn!(error = %e, "Discarding persisted session");
            if let Err(e) = storage.remove_all(&[TOKEN_KEY, USER_KEY]) {
                warn!(error = %e, "Failed to clear persisted session");
            }
            Session::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;
    use crate::models::AuthStatus;
    use crate::repository::seed_users;
    use crate::storage::MemoryStore;

    /// Storage whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn put_all(&self, _entries: &[(&str, &str)]) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn remove_all(&self, _keys: &[&str]) -> Result<()> {
            Ok(())
        }
    }

    fn read_only_setup() -> (SessionStore, Arc<UserRepository>) {
        let users = Arc::new(UserRepository::with_records(
            seed_users(),
            LatencyConfig::zero(),
        ));
        let store =
            SessionStore::new(users.clone(), Arc::new(ReadOnlyStore), Duration::ZERO).unwrap();
        (store, users)
    }

    fn setup() -> (SessionStore, Arc<UserRepository>, Arc<MemoryStore>) {
        let users = Arc::new(UserRepository::with_records(
            seed_users(),
            LatencyConfig::zero(),
        ));
        let storage = Arc::new(MemoryStore::new());
        let store = SessionStore::new(users.clone(), storage.clone(), Duration::ZERO).unwrap();
        (store, users, storage)
    }

    #[tokio::test]
    async fn test_login_success_persists_pair() {
        let (store, users, storage) = setup();
        assert_eq!(store.session().status(), AuthStatus::Anonymous);

        let identity = store
            .login("admin@cloudboard.com", "password123")
            .await
            .unwrap();

        let session = store.session();
        assert_eq!(session.status(), AuthStatus::Authenticated);
        assert_eq!(session.token(), Some(identity.token.as_str()));
        assert!(identity.token.starts_with("jwt_token_1_"));
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.len(), 2);

        let stored: User =
            serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, identity.user);

        let in_repo = users.find_by_email("admin@cloudboard.com").await.unwrap();
        assert_eq!(in_repo.last_login, identity.user.last_login);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (store, _, storage) = setup();
        let result = store.login("admin@cloudboard.com", "wrong").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert_eq!(store.session(), Session::anonymous());
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (store, _, storage) = setup();
        let result = store.login("nobody@cloudboard.com", "password123").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_loading_flag_during_login() {
        let users = Arc::new(UserRepository::with_records(
            seed_users(),
            LatencyConfig::zero(),
        ));
        let storage = Arc::new(MemoryStore::new());
        let store = Arc::new(
            SessionStore::new(users, storage, Duration::from_millis(50)).unwrap(),
        );
        let mut rx = store.subscribe();

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.login("user@cloudboard.com", "password123").await })
        };

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading);
        assert_eq!(store.session().status(), AuthStatus::Authenticating);

        task.await.unwrap().unwrap();
        let session = store.session();
        assert!(!session.is_loading);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_existing_email() {
        let (store, users, storage) = setup();
        let result = store
            .register("user@cloudboard.com", "whatever", "Dup")
            .await;
        assert!(matches!(result, Err(Error::AccountExists(_))));
        assert_eq!(users.len().await, 3);
        assert_eq!(storage.write_count(), 0);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_creates_and_signs_in() {
        let (store, users, _) = setup();
        let identity = store
            .register("new@cloudboard.com", "secret", "Newcomer")
            .await
            .unwrap();
        assert_eq!(identity.user.role, UserRole::User);
        assert!(identity.user.last_login.is_some());
        assert_eq!(users.len().await, 4);
        assert_eq!(store.current_user().unwrap().email, "new@cloudboard.com");
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (store, _, storage) = setup();
        store
            .login("viewer@cloudboard.com", "password123")
            .await
            .unwrap();
        store.logout();
        assert_eq!(store.session(), Session::anonymous());
        assert!(storage.is_empty());

        // logging out twice is harmless
        store.logout();
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_after_success_drops_session() {
        let (store, _, storage) = setup();
        store
            .login("admin@cloudboard.com", "password123")
            .await
            .unwrap();
        let result = store.login("admin@cloudboard.com", "nope").await;
        assert!(result.is_err());
        assert!(!store.is_authenticated());
        // durable entries from the earlier login are left alone
        assert_eq!(storage.len(), 2);
    }

    #[tokio::test]
    async fn test_update_user_keeps_token() {
        let (store, users, storage) = setup();
        let identity = store
            .login("admin@cloudboard.com", "password123")
            .await
            .unwrap();

        let updated = store
            .update_user(UserPatch {
                name: Some("Boss".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.name, "Boss");
        assert_eq!(updated.id, identity.user.id);
        assert_eq!(store.session().token(), Some(identity.token.as_str()));

        let stored: User =
            serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.name, "Boss");

        let in_repo = users.find_by_email("admin@cloudboard.com").await.unwrap();
        assert_eq!(in_repo.name, "Admin User");
    }

    #[test]
    fn test_update_user_when_anonymous_is_noop() {
        let (store, _, storage) = setup();
        let result = store.update_user(UserPatch {
            name: Some("Ghost".to_string()),
            ..Default::default()
        });
        assert!(result.is_none());
        assert_eq!(storage.write_count(), 0);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_hydrate_valid_pair() {
        let storage = MemoryStore::new();
        let user = seed_users().remove(0);
        let json = serde_json::to_string(&user).unwrap();
        storage
            .put_all(&[(TOKEN_KEY, "jwt_token_1_0"), (USER_KEY, json.as_str())])
            .unwrap();

        let session = hydrate(&storage);
        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&user));
        assert_eq!(session.token(), Some("jwt_token_1_0"));
    }

    #[test]
    fn test_hydrate_token_only_is_wiped() {
        let storage = MemoryStore::new();
        storage.put_all(&[(TOKEN_KEY, "orphan")]).unwrap();

        let session = hydrate(&storage);
        assert!(!session.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_hydrate_bad_json_is_wiped() {
        let storage = MemoryStore::new();
        storage
            .put_all(&[(TOKEN_KEY, "t"), (USER_KEY, "{not json")])
            .unwrap();

        let session = hydrate(&storage);
        assert_eq!(session, Session::anonymous());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_hydrate_user_only_is_wiped() {
        let storage = MemoryStore::new();
        let json = serde_json::to_string(&seed_users().remove(1)).unwrap();
        storage.put_all(&[(USER_KEY, json.as_str())]).unwrap();

        let session = hydrate(&storage);
        assert_eq!(session, Session::anonymous());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_register_with_failing_storage_is_retryable() {
        let (store, users) = read_only_setup();

        let first = store
            .register("new@cloudboard.com", "secret", "Newcomer")
            .await;
        assert!(matches!(first, Err(Error::Io(_))));
        assert_eq!(users.len().await, 3);
        assert!(users.find_by_email("new@cloudboard.com").await.is_none());
        assert!(!store.is_authenticated());

        let retry = store
            .register("new@cloudboard.com", "secret", "Newcomer")
            .await;
        assert!(matches!(retry, Err(Error::Io(_))));
        assert_eq!(users.len().await, 3);
    }

    #[tokio::test]
    async fn test_login_with_failing_storage_keeps_last_login() {
        let (store, users) = read_only_setup();
        let before = users.find_by_email("admin@cloudboard.com").await.unwrap();

        let result = store.login("admin@cloudboard.com", "password123").await;
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!store.is_authenticated());

        let after = users.find_by_email("admin@cloudboard.com").await.unwrap();
        assert_eq!(after.last_login, before.last_login);
        assert_eq!(after, before);
    }
}
