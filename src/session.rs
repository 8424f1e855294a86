use anyhow::Context;

use crate::err::Error;
use crate::models::{Principal, Role};
use crate::storage::Storage;

/// Storage key holding the JSON-encoded principal while authenticated.
pub const USER_KEY: &str = "user";
/// Storage key holding the session token while authenticated. The value is
/// opaque, only its presence matters.
pub const TOKEN_KEY: &str = "token";

const MOCK_TOKEN: &str = "mock-jwt-token";
const ADMIN_EMAIL: &str = "admin@escola.com";
const ADMIN_PASSWORD: &str = "adminpassword";

/// Credential check, isolated behind a trait so a real backend can later
/// replace the mock without touching the session state machine.
pub trait Authenticator {
    fn authenticate(&self, email: &str, password: &str) -> Result<Principal, Error>;
}

/// Hardcoded single-credential stand-in for a real authentication service.
/// No hashing, no lockout, intentionally.
#[derive(Debug, Default)]
pub struct MockAuthenticator;

impl Authenticator for MockAuthenticator {
    fn authenticate(&self, email: &str, password: &str) -> Result<Principal, Error> {
        if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
            Ok(Principal {
                id: 1,
                email: ADMIN_EMAIL.to_string(),
                perfil: Role::Admin,
            })
        } else {
            Err(Error::InvalidCredentials)
        }
    }
}

/// Holds at most one authenticated principal and keeps the durable store in
/// step with it. Two states: anonymous and authenticated. The only way in
/// is a successful [`login`](Self::login) or [`restore`](Self::restore),
/// the only way out is [`logout`](Self::logout).
pub struct SessionStore<S, A = MockAuthenticator> {
    storage: S,
    authenticator: A,
    user: Option<Principal>,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_authenticator(storage, MockAuthenticator)
    }
}

impl<S: Storage, A: Authenticator> SessionStore<S, A> {
    pub fn with_authenticator(storage: S, authenticator: A) -> Self {
        Self {
            storage,
            authenticator,
            user: None,
        }
    }

    /// Rehydrates a persisted session, called once at startup. Best-effort:
    /// a missing key or an undecodable principal leaves the store anonymous.
    pub fn restore(&mut self) {
        let stored_user = self.storage.get_item(USER_KEY);
        let token = self.storage.get_item(TOKEN_KEY);
        if let (Some(raw), Some(_)) = (stored_user, token) {
            match serde_json::from_str(&raw) {
                Ok(user) => self.user = Some(user),
                Err(err) => {
                    log::warn!("sessão persistida ilegível, permanecendo anônimo: {err}");
                }
            }
        }
    }

    /// On success the principal and a placeholder token are persisted and
    /// the returned principal is the caller's cue to move to the dashboard.
    /// On failure nothing changes, in memory or in storage.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&Principal, Error> {
        let user = self.authenticator.authenticate(email, password)?;
        let raw = serde_json::to_string(&user).context("serializando principal")?;
        self.storage.set_item(USER_KEY, &raw)?;
        self.storage.set_item(TOKEN_KEY, MOCK_TOKEN)?;
        log::debug!("sessão aberta para {}", user.email);
        Ok(self.user.insert(user))
    }

    /// Clears the session and both persisted keys. Idempotent.
    pub fn logout(&mut self) -> Result<(), Error> {
        self.user = None;
        self.storage.remove_item(USER_KEY)?;
        self.storage.remove_item(TOKEN_KEY)?;
        log::debug!("sessão encerrada");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn current_user(&self) -> Option<&Principal> {
        self.user.as_ref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    #[test]
    fn right_credentials_open_a_session() {
        let mut session = store();
        let user = session.login("admin@escola.com", "adminpassword").unwrap();
        assert_eq!(user.email, "admin@escola.com");
        assert_eq!(user.perfil, Role::Admin);
        assert!(session.is_authenticated());

        assert!(session.storage().get_item(USER_KEY).is_some());
        assert_eq!(
            session.storage().get_item(TOKEN_KEY).as_deref(),
            Some("mock-jwt-token")
        );
    }

    #[test]
    fn wrong_password_is_rejected_and_leaves_no_trace() {
        let mut session = store();
        let err = session.login("admin@escola.com", "wrong").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get_item(USER_KEY), None);
        assert_eq!(session.storage().get_item(TOKEN_KEY), None);
    }

    #[test]
    fn unknown_email_is_rejected() {
        let mut session = store();
        let err = session.login("aluno@escola.com", "adminpassword").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
        assert!(session.current_user().is_none());
    }

    #[test]
    fn logout_clears_memory_and_storage_and_is_idempotent() {
        let mut session = store();
        session.login("admin@escola.com", "adminpassword").unwrap();
        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.storage().get_item(USER_KEY), None);
        assert_eq!(session.storage().get_item(TOKEN_KEY), None);

        // nothing to clear the second time around
        session.logout().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn restore_rehydrates_a_persisted_session() {
        let mut session = store();
        session.login("admin@escola.com", "adminpassword").unwrap();
        let storage = session.into_storage();

        let mut reloaded = SessionStore::new(storage);
        assert!(!reloaded.is_authenticated());
        reloaded.restore();
        assert!(reloaded.is_authenticated());
        assert_eq!(
            reloaded.current_user().map(|u| u.email.as_str()),
            Some("admin@escola.com")
        );
    }

    #[test]
    fn restore_without_token_stays_anonymous() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(USER_KEY, r#"{"id":1,"email":"admin@escola.com","perfil":"ADMIN"}"#)
            .unwrap();

        let mut session = SessionStore::new(storage);
        session.restore();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn restore_with_corrupt_principal_stays_anonymous() {
        let mut storage = MemoryStorage::new();
        storage.set_item(USER_KEY, "{broken").unwrap();
        storage.set_item(TOKEN_KEY, "mock-jwt-token").unwrap();

        let mut session = SessionStore::new(storage);
        session.restore();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn custom_authenticator_is_honored() {
        struct DenyAll;
        impl Authenticator for DenyAll {
            fn authenticate(&self, _: &str, _: &str) -> Result<Principal, Error> {
                Err(Error::InvalidCredentials)
            }
        }

        let mut session = SessionStore::with_authenticator(MemoryStorage::new(), DenyAll);
        assert!(session.login("admin@escola.com", "adminpassword").is_err());
    }
}
