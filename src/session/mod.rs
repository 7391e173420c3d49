//! Credential-gated session for the dashboard
//!
//! One operator works the counter at a time, so the gate holds at most one
//! live [`Session`]. Logging in verifies credentials through an async
//! [`CredentialVerifier`] under a timeout; a second login attempt while one
//! is still in flight is rejected rather than queued.
//!
//! A `Session` is a capability: mutating operations take `&Session` and the
//! gate checks it is the current one. After logout (or a newer login) a held
//! session turns stale and every use of it fails with `SessionExpired`.

use crate::core::clock::{Clock, SystemClock};
use crate::core::error::{AuthError, OficinaResult};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Default bound on how long a credential check may take
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Who logged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

/// A live session capability
///
/// The token is private on purpose: the only way to obtain a valid session
/// is through [`SessionGate::login`], and the only thing that can check one
/// is the gate itself.
#[derive(Debug, Clone)]
pub struct Session {
    token: Uuid,
    pub user: UserIdentity,
    pub established_at: DateTime<Utc>,
}

/// Verifies an email/password pair
///
/// `Ok(None)` means the pair is wrong; `Err` means the verifier itself
/// failed (unreachable directory, broken config) and is reported as an
/// internal error, not as bad credentials.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> anyhow::Result<Option<UserIdentity>>;
}

/// Verifier with a single fixed credential pair
///
/// This is the out-of-the-box setup for a one-operator workshop; anything
/// bigger plugs in its own [`CredentialVerifier`].
pub struct StaticCredentialVerifier {
    email: String,
    password: String,
    display_name: String,
}

impl StaticCredentialVerifier {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            display_name: display_name.into(),
        }
    }

    /// The demo account preloaded in fresh installs
    pub fn demo() -> Self {
        Self::new("admin@roboticasustentavel.com", "admin123", "Administrator")
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, email: &str, password: &str) -> anyhow::Result<Option<UserIdentity>> {
        if email.eq_ignore_ascii_case(&self.email) && password == self.password {
            Ok(Some(UserIdentity {
                name: self.display_name.clone(),
                email: self.email.clone(),
            }))
        } else {
            Ok(None)
        }
    }
}

/// The login/logout gate holding the current session
pub struct SessionGate {
    verifier: Arc<dyn CredentialVerifier>,
    timeout: Duration,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<Session>>,
    login_lock: Mutex<()>,
}

impl SessionGate {
    /// Create a gate with the default timeout and the system clock
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            timeout: DEFAULT_LOGIN_TIMEOUT,
            clock: Arc::new(SystemClock),
            current: RwLock::new(None),
            login_lock: Mutex::new(()),
        }
    }

    /// Override the credential-check timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the clock (tests)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify credentials and establish a session
    ///
    /// Fails fast with `LoginInProgress` when another attempt holds the
    /// gate, with `MissingCredentials` before touching the verifier, with
    /// `Timeout` when the verifier exceeds the bound, and with
    /// `InvalidCredentials` when the pair is wrong. A successful login
    /// replaces whatever session was current before.
    pub async fn login(&self, email: &str, password: &str) -> OficinaResult<Session> {
        let _in_flight = self
            .login_lock
            .try_lock()
            .map_err(|_| AuthError::LoginInProgress)?;

        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials.into());
        }

        let verdict = tokio::time::timeout(self.timeout, self.verifier.verify(email, password))
            .await
            .map_err(|_| AuthError::Timeout {
                waited_ms: self.timeout.as_millis() as u64,
            })??;

        let user = verdict.ok_or(AuthError::InvalidCredentials)?;

        let session = Session {
            token: Uuid::new_v4(),
            user,
            established_at: self.clock.now(),
        };

        let mut current = self
            .current
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        *current = Some(session.clone());

        tracing::info!(user = %session.user.email, "session established");
        Ok(session)
    }

    /// Destroy the current session
    ///
    /// The session being handed in must be the live one; a stale capability
    /// cannot log anyone out.
    pub fn logout(&self, session: &Session) -> OficinaResult<()> {
        let mut current = self
            .current
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match current.as_ref() {
            Some(live) if live.token == session.token => {
                tracing::info!(user = %session.user.email, "session closed");
                *current = None;
                Ok(())
            }
            _ => Err(AuthError::SessionExpired.into()),
        }
    }

    /// Check that `session` is the live one
    pub fn guard(&self, session: &Session) -> OficinaResult<()> {
        let current = self
            .current
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        match current.as_ref() {
            Some(live) if live.token == session.token => Ok(()),
            _ => Err(AuthError::SessionExpired.into()),
        }
    }

    /// The live session, if someone is logged in
    pub fn current(&self) -> OficinaResult<Option<Session>> {
        let current = self
            .current
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(current.clone())
    }
}
