//! Session storage and lifecycle.
//!
//! Stores the session in `<home>/session.json` with restricted permissions
//! (0600). Tokens are never logged or displayed in full. A corrupt persisted
//! session is treated as "no session" and cleaned up, never an error.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use omnify_types::Session;

use crate::client::{ApiClient, Credential};
use crate::config::paths;
use crate::error::{ApiError, ApiResult};

/// Persistence for the session file.
///
/// Holds the path so tests can point it at a temp directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default location, `${OMNIFY_HOME}/session.json`.
    pub fn new() -> Self {
        SessionStore {
            path: paths::session_path(),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        SessionStore { path }
    }

    /// Reads the persisted session.
    ///
    /// Absent file means logged-out. A file that cannot be read or parsed is
    /// deleted and also means logged-out; restore never errors.
    pub fn restore(&self) -> Option<Session> {
        if !self.path.exists() {
            return None;
        }

        let session = fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok());

        if session.is_none() {
            tracing::warn!(path = %self.path.display(), "discarding corrupt session file");
            let _ = fs::remove_file(&self.path);
        }
        session
    }

    /// Saves the session to disk with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn persist(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Removes the persisted session. Missing file is fine.
    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the current session and its persistence.
///
/// Login and signup adopt the in-memory and persisted session only on
/// success; a failed attempt leaves both untouched. Calls are serialized by
/// `&mut self`; overlapping attempts are not deduplicated.
pub struct SessionManager {
    store: SessionStore,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(store: SessionStore) -> Self {
        SessionManager {
            store,
            session: None,
        }
    }

    /// Adopts the persisted session, if one exists and is well-formed.
    pub fn restore(&mut self) -> Option<&Session> {
        self.session = self.store.restore();
        self.session.as_ref()
    }

    /// Authenticates and adopts the returned session.
    ///
    /// # Errors
    /// `Validation` for empty inputs (no network call is made), otherwise
    /// whatever the gateway surfaces.
    pub async fn login(
        &mut self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> ApiResult<&Session> {
        if email.trim().is_empty() {
            return Err(ApiError::Validation("Email is required".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }

        let reply = client.login(email.trim(), password).await?;
        self.adopt(reply.into_session())
    }

    /// Registers a new account and adopts the returned session.
    ///
    /// # Errors
    /// `Validation` for empty inputs (no network call is made), otherwise
    /// whatever the gateway surfaces.
    pub async fn signup(
        &mut self,
        client: &ApiClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<&Session> {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("Name is required".to_string()));
        }
        if email.trim().is_empty() {
            return Err(ApiError::Validation("Email is required".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }

        let reply = client.signup(name.trim(), email.trim(), password).await?;
        self.adopt(reply.into_session())
    }

    /// Clears the persisted and in-memory session. No remote call; never
    /// fails.
    pub fn logout(&mut self) {
        self.store.clear();
        self.session = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns the credential for authorized calls, if logged in.
    pub fn credential(&self) -> Option<Credential> {
        self.session
            .as_ref()
            .map(|session| Credential::new(session.token.clone()))
    }

    fn adopt(&mut self, session: Session) -> ApiResult<&Session> {
        // A failed write is not fatal: the session still works for this
        // process, it just won't survive a restart.
        if let Err(err) = self.store.persist(&session) {
            tracing::warn!("could not persist session: {err:#}");
        }
        Ok(self.session.insert(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnify_types::User;

    fn sample_session() -> Session {
        Session {
            token: "jwt-token".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            },
        }
    }

    /// Test: persist then restore round-trips the session.
    #[test]
    fn test_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));

        store.persist(&sample_session()).unwrap();
        let restored = store.restore().unwrap();
        assert_eq!(restored.token, "jwt-token");
        assert_eq!(restored.user.name, "Ada");
    }

    /// Test: restoring a corrupt file yields logged-out and deletes the file.
    #[test]
    fn test_restore_corrupt_file_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::at(path.clone());
        assert!(store.restore().is_none());
        assert!(!path.exists());

        // Restore again is a quiet no-op.
        assert!(store.restore().is_none());
    }

    /// Test: a session file missing a field is corrupt, not logged-in.
    #[test]
    fn test_restore_partial_session_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"token":"jwt-token"}"#).unwrap();

        let store = SessionStore::at(path.clone());
        assert!(store.restore().is_none());
        assert!(!path.exists());
    }

    /// Test: logout clears disk and memory and always succeeds.
    #[test]
    fn test_logout_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.persist(&sample_session()).unwrap();

        let mut manager = SessionManager::new(store.clone());
        manager.restore();
        assert!(manager.is_authenticated());

        manager.logout();
        assert!(!manager.is_authenticated());
        assert!(store.restore().is_none());

        // Logging out while logged out is fine too.
        manager.logout();
    }

    /// Test: validation failures happen before any network call and leave
    /// the session untouched.
    #[tokio::test]
    async fn test_login_validation_precedes_network() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        let mut manager = SessionManager::new(store);

        // Unroutable base URL: if validation did not short-circuit, this
        // would surface a network error instead.
        let config = crate::config::Config {
            base_url: "http://127.0.0.1:9".to_string(),
        };
        let client = ApiClient::new(&config).unwrap();

        let err = manager.login(&client, "", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(!manager.is_authenticated());

        let err = manager
            .signup(&client, "Ada", "ada@example.com", "")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(!manager.is_authenticated());
    }

    /// Test: unix permissions on the persisted session are 0600.
    #[cfg(unix)]
    #[test]
    fn test_session_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::at(path.clone());
        store.persist(&sample_session()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
