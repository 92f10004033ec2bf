use crate::domain::model::{AuthEvent, Session};
use crate::domain::ports::AuthProvider;
use crate::utils::error::{CmsError, Result};
use crate::utils::validation::validate_email;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

pub const ADMIN_PREFIX: &str = "/admin";
pub const DEFAULT_LOGIN_ROUTE: &str = "/admin/login";
pub const RESET_PASSWORD_ROUTE: &str = "/admin/reset-password";
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// Route outside the admin tree, or an admin route that needs no session.
    Public,
    Granted(Session),
    Redirect(String),
}

/// Session holder for the admin area.
///
/// The current session lives in a `watch` channel and every change is also
/// published on a `broadcast` channel, so views can either read the latest
/// state or react to sign-in and sign-out as they happen.
pub struct AuthGate {
    provider: Arc<dyn AuthProvider>,
    login_route: String,
    session: watch::Sender<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthGate {
    pub fn new(provider: Arc<dyn AuthProvider>, login_route: &str) -> Self {
        let (session, _) = watch::channel(None);
        let (events, _) = broadcast::channel(16);
        Self {
            provider,
            login_route: login_route.to_string(),
            session,
            events,
        }
    }

    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    fn publish(&self, event: AuthEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn set_session(&self, session: Option<Session>) {
        let event = match &session {
            Some(session) => AuthEvent::SignedIn(session.clone()),
            None => AuthEvent::SignedOut,
        };
        self.session.send_replace(session);
        self.publish(event);
    }

    /// The active session, or `None` once it has expired. Expiry counts as a sign-out.
    pub fn current_session(&self) -> Option<Session> {
        let session = self.session.borrow().clone()?;
        if session.is_expired_at(Utc::now()) {
            tracing::info!("Session for {} expired", session.user.id);
            self.provider.clear_local_session();
            self.set_session(None);
            return None;
        }
        Some(session)
    }

    pub fn require_session(&self) -> Result<Session> {
        self.current_session().ok_or(CmsError::Unauthenticated)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate_email("email", email)?;
        let session = self.provider.sign_in(email, password).await?;
        tracing::info!("Signed in as {}", email);
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Clears the local session even when the backend call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let previous = self.session.borrow().clone();
        let Some(previous) = previous else {
            return Ok(());
        };

        let result = self.provider.sign_out(&previous).await;
        self.set_session(None);
        tracing::info!("Signed out {}", previous.user.id);
        result
    }

    pub async fn request_password_reset(&self, email: &str, redirect_to: Option<&str>) -> Result<()> {
        validate_email("email", email)?;
        self.provider.send_password_reset(email, redirect_to).await?;
        self.publish(AuthEvent::PasswordRecoverySent {
            email: email.to_string(),
        });
        Ok(())
    }

    pub async fn update_password(&self, new_password: &str) -> Result<()> {
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CmsError::validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        let session = self.require_session()?;
        self.provider.update_password(&session, new_password).await?;
        self.publish(AuthEvent::PasswordUpdated);
        Ok(())
    }

    pub fn is_protected(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path).trim_end_matches('/');
        let in_admin = path == ADMIN_PREFIX || path.starts_with(&format!("{}/", ADMIN_PREFIX));
        in_admin && path != self.login_route.trim_end_matches('/') && path != RESET_PASSWORD_ROUTE
    }

    pub fn guard(&self, path: &str) -> Access {
        if !self.is_protected(path) {
            return Access::Public;
        }
        match self.current_session() {
            Some(session) => Access::Granted(session),
            None => Access::Redirect(self.login_route.clone()),
        }
    }

    /// Where an open admin view should navigate in response to `event`.
    pub fn redirect_for(&self, event: &AuthEvent) -> Option<String> {
        match event {
            AuthEvent::SignedOut => Some(self.login_route.clone()),
            _ => None,
        }
    }
}
