//! Session gate over the external identity provider.
//!
//! The provider itself (sign-in, sign-up, OAuth redirect, session storage)
//! is an external collaborator reached over HTTP; this module only tracks
//! whether a user is present and exposes the calls the UI needs. The gate
//! is a three-state machine:
//!
//! ```text
//! Loading ──(session answer)──▶ Authenticated ──(sign out)──▶ Unauthenticated
//!    └──────(no session)───────────────────────────────────────────▲
//! ```
//!
//! There is no transition back to `Loading` short of a fresh mount.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// The signed-in user as far as this application cares: an address to show
/// and a token to hand back to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub email: String,
    pub access_token: String,
}

/// Gate state for the tools view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for the identity provider's first definitive answer.
    Loading,
    Authenticated(UserSession),
    Unauthenticated,
}

impl GateState {
    pub fn user(&self) -> Option<&UserSession> {
        match self {
            GateState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Session gate state machine. Owns nothing but the state; all provider
/// calls happen elsewhere and feed their answers in.
#[derive(Debug)]
pub struct SessionGate {
    state: GateState,
}

impl SessionGate {
    /// A fresh mount always starts in `Loading`.
    pub fn new() -> Self {
        Self {
            state: GateState::Loading,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, GateState::Loading)
    }

    /// Record the provider's definitive session answer. An error from the
    /// session query counts as "no user" — the gate never stays loading.
    pub fn resolve(&mut self, session: Option<UserSession>) {
        self.state = match session {
            Some(user) => {
                info!(email = %user.email, "session restored");
                GateState::Authenticated(user)
            }
            None => GateState::Unauthenticated,
        };
    }

    /// A successful sign-in or sign-up moves the gate to authenticated.
    pub fn signed_in(&mut self, user: UserSession) {
        self.state = GateState::Authenticated(user);
    }

    /// Sign-out is immediate from the caller's perspective; the provider's
    /// revocation call runs in the background.
    pub fn signed_out(&mut self) {
        self.state = GateState::Unauthenticated;
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Calls the application makes against the identity collaborator. Opaque
/// beyond "is a user present" plus an error message when something fails.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Query for an existing session (e.g. a stored token that still works).
    async fn session(&self) -> Result<Option<UserSession>>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserSession>;

    /// The browser URL that starts the provider's OAuth redirect flow.
    fn oauth_url(&self) -> String;

    async fn sign_out(&self, access_token: &str) -> Result<()>;
}

// --- HTTP implementation ---

/// Identity client speaking the hosted auth REST dialect: password grant,
/// signup, logout, and a user probe, all under `/auth/v1`.
pub struct HttpIdentityProvider {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    user: Option<ApiUser>,
    error_description: Option<String>,
    msg: Option<String>,
}

#[derive(Deserialize)]
struct ApiUser {
    email: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            base_url,
            anon_key,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn token_request(&self, path: &str, email: &str, password: &str) -> Result<UserSession> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("apikey", &self.anon_key)
            .json(&PasswordGrant { email, password })
            .send()
            .await
            .context("Failed to reach the identity provider")?;

        let body: TokenResponse = response
            .json()
            .await
            .context("Failed to parse identity provider response")?;

        if let Some(token) = body.access_token {
            let email = body
                .user
                .and_then(|u| u.email)
                .unwrap_or_else(|| email.to_string());
            let session = UserSession {
                email,
                access_token: token,
            };
            save_stored_session(&session);
            return Ok(session);
        }

        let message = body
            .error_description
            .or(body.msg)
            .unwrap_or_else(|| "Authentication failed. Please try again.".to_string());
        anyhow::bail!("{}", message)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn session(&self) -> Result<Option<UserSession>> {
        let Some(stored) = load_stored_session() else {
            return Ok(None);
        };

        // Probe the provider to confirm the stored token still maps to a
        // live user; a rejected token clears the store.
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&stored.access_token)
            .send()
            .await
            .context("Failed to reach the identity provider")?;

        if !response.status().is_success() {
            clear_stored_session();
            return Ok(None);
        }

        let user: ApiUser = response
            .json()
            .await
            .context("Failed to parse identity provider response")?;
        match user.email {
            Some(email) => Ok(Some(UserSession {
                email,
                access_token: stored.access_token,
            })),
            None => {
                clear_stored_session();
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserSession> {
        self.token_request("token?grant_type=password", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserSession> {
        self.token_request("signup", email, password).await
    }

    fn oauth_url(&self) -> String {
        format!("{}?provider=google", self.endpoint("authorize"))
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        clear_stored_session();
        self.client
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to reach the identity provider")?;
        Ok(())
    }
}

// --- Stored session ---

fn session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".toolhub").join("session.json"))
}

fn load_stored_session() -> Option<UserSession> {
    let path = session_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

fn save_stored_session(session: &UserSession) {
    if let Some(path) = session_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(session) {
            let _ = std::fs::write(&path, json);
        }
    }
}

fn clear_stored_session() {
    if let Some(path) = session_path() {
        let _ = std::fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> UserSession {
        UserSession {
            email: email.to_string(),
            access_token: "tok".to_string(),
        }
    }

    #[test]
    fn test_gate_starts_loading() {
        let gate = SessionGate::new();
        assert!(gate.is_loading());
        assert!(gate.state().user().is_none());
    }

    #[test]
    fn test_resolve_with_user_authenticates() {
        let mut gate = SessionGate::new();
        gate.resolve(Some(user("a@b.c")));
        assert_eq!(gate.state().user().map(|u| u.email.as_str()), Some("a@b.c"));
    }

    #[test]
    fn test_resolve_without_user_unauthenticates() {
        let mut gate = SessionGate::new();
        gate.resolve(None);
        assert_eq!(*gate.state(), GateState::Unauthenticated);
    }

    #[test]
    fn test_sign_out_is_immediate() {
        let mut gate = SessionGate::new();
        gate.resolve(Some(user("a@b.c")));
        gate.signed_out();
        assert_eq!(*gate.state(), GateState::Unauthenticated);
    }

    #[test]
    fn test_sign_in_from_unauthenticated() {
        let mut gate = SessionGate::new();
        gate.resolve(None);
        gate.signed_in(user("new@b.c"));
        assert_eq!(gate.state().user().map(|u| u.email.as_str()), Some("new@b.c"));
    }

    #[test]
    fn test_oauth_url_shape() {
        let provider =
            HttpIdentityProvider::new("https://auth.example.com/".to_string(), "anon".to_string());
        assert_eq!(
            provider.oauth_url(),
            "https://auth.example.com/auth/v1/authorize?provider=google"
        );
    }

    #[test]
    fn test_session_roundtrip_serialization() {
        let session = user("round@trip.io");
        let json = serde_json::to_string(&session).unwrap();
        let back: UserSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
