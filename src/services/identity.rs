// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider: email/password accounts and auth-state notifications.
//!
//! Handles:
//! - Sign-in and sign-up via the Identity Toolkit REST API
//! - ID token refresh when expiring (5-minute margin)
//! - Optional session persistence across restarts
//! - Auth state broadcast over a `watch` channel

use crate::config::Config;
use crate::error::{AppError, AuthErrorCode};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{watch, Mutex};

/// Margin before ID token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Signed-in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Stable account ID, also the key of the profile document
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) <= now
    }
}

/// Operations the app needs from the identity collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Sign in with email and password, publishing the new session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError>;

    /// Create an account; the new account is signed in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AppError>;

    /// Drop the current session and publish the signed-out state.
    async fn sign_out(&self) -> Result<(), AppError>;

    /// A valid ID token for the current session, refreshing it if needed.
    async fn id_token(&self) -> Result<Option<String>, AppError>;

    /// Subscribe to auth state changes. The current state is readable
    /// immediately through the receiver.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;

    fn current_session(&self) -> Option<Session> {
        self.subscribe().borrow().clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FirebaseAuth - Identity Toolkit REST client
// ─────────────────────────────────────────────────────────────────────────────

/// Request body shared by sign-in and sign-up.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Successful sign-in/sign-up response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    email: String,
    id_token: String,
    refresh_token: String,
    /// Seconds, as a string
    expires_in: String,
}

/// Secure token refresh response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn expiry_from(expires_in: &str) -> DateTime<Utc> {
    let secs = expires_in.trim().parse::<i64>().unwrap_or(3600);
    Utc::now() + Duration::seconds(secs)
}

/// Identity Toolkit (Firebase Auth) REST client.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    identity_base_url: String,
    secure_token_base_url: String,
    session_file: Option<PathBuf>,
    state: watch::Sender<Option<Session>>,
    /// Serializes token refreshes.
    refresh_lock: Mutex<()>,
}

impl FirebaseAuth {
    pub fn new(config: &Config) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            api_key: config.firebase_api_key.clone(),
            identity_base_url: config.identity_base_url.trim_end_matches('/').to_string(),
            secure_token_base_url: config
                .secure_token_base_url
                .trim_end_matches('/')
                .to_string(),
            session_file: config.session_file.clone(),
            state,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Restore a persisted session, if session persistence is configured.
    ///
    /// A missing or unreadable file leaves the user signed out.
    pub async fn restore(&self) {
        let Some(path) = &self.session_file else {
            return;
        };

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read session file");
                return;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => {
                tracing::info!(uid = %session.uid, "Restored persisted session");
                self.state.send_replace(Some(session));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt session file");
            }
        }
    }

    async fn password_call(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let url = format!("{}/accounts:{}", self.identity_base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| AppError::Auth(AuthErrorCode::Other(e.to_string())))?;

        let body: PasswordResponse = check_response_json(response).await?;

        Ok(Session {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: expiry_from(&body.expires_in),
        })
    }

    /// Exchange the refresh token for a new ID token.
    async fn refresh(&self, session: &Session) -> Result<Session, AppError> {
        let url = format!("{}/token", self.secure_token_base_url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(AuthErrorCode::Other(e.to_string())))?;

        let body: RefreshResponse = check_response_json(response).await?;

        Ok(Session {
            uid: body.user_id,
            email: session.email.clone(),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: expiry_from(&body.expires_in),
        })
    }

    async fn publish(&self, session: Option<Session>) {
        self.persist(session.as_ref()).await;
        self.state.send_replace(session);
    }

    async fn persist(&self, session: Option<&Session>) {
        let Some(path) = &self.session_file else {
            return;
        };

        let result = match session {
            Some(session) => match serde_json::to_string(session) {
                Ok(json) => tokio::fs::write(path, json).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode session");
                    return;
                }
            },
            None => match tokio::fs::remove_file(path).await {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to update session file");
        }
    }
}

/// Check response status and parse the JSON body, mapping Identity Toolkit
/// error codes.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let code = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => AuthErrorCode::from_rest_message(&envelope.error.message),
            Err(_) => AuthErrorCode::Other(format!("HTTP {}: {}", status, body)),
        };
        tracing::debug!(%status, code = code.as_str(), "Identity request rejected");
        return Err(AppError::Auth(code));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Auth(AuthErrorCode::Other(format!("JSON parse error: {}", e))))
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let session = self
            .password_call("signInWithPassword", email.trim(), password)
            .await?;
        tracing::info!(uid = %session.uid, "Signed in");
        self.publish(Some(session.clone())).await;
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let session = self.password_call("signUp", email.trim(), password).await?;
        tracing::info!(uid = %session.uid, "Account created");
        self.publish(Some(session.clone())).await;
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        if let Some(session) = self.current_session() {
            tracing::info!(uid = %session.uid, "Signed out");
        }
        self.publish(None).await;
        Ok(())
    }

    async fn id_token(&self) -> Result<Option<String>, AppError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if !session.needs_refresh(Utc::now()) {
            return Ok(Some(session.id_token));
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited.
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if !session.needs_refresh(Utc::now()) {
            return Ok(Some(session.id_token));
        }

        tracing::debug!(uid = %session.uid, "Refreshing ID token");
        let refreshed = match self.refresh(&session).await {
            Ok(refreshed) => refreshed,
            Err(AppError::Auth(code)) if code.ends_session() => {
                tracing::warn!(uid = %session.uid, code = code.as_str(), "Refresh rejected, signing out");
                self.publish(None).await;
                return Err(AppError::Auth(code));
            }
            Err(e) => return Err(e),
        };
        let token = refreshed.id_token.clone();
        self.publish(Some(refreshed)).await;
        Ok(Some(token))
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LocalIdentity - in-memory accounts for offline mode and tests
// ─────────────────────────────────────────────────────────────────────────────

const LOCAL_MIN_PASSWORD_LEN: usize = 6;

struct LocalAccount {
    uid: String,
    password: String,
}

/// In-memory identity provider with the same error behavior as the
/// REST service.
pub struct LocalIdentity {
    accounts: DashMap<String, LocalAccount>,
    next_uid: AtomicU64,
    state: watch::Sender<Option<Session>>,
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentity {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            accounts: DashMap::new(),
            next_uid: AtomicU64::new(1),
            state,
        }
    }

    /// Register an account without signing in. Returns the new uid.
    pub fn add_account(&self, email: &str, password: &str) -> Result<String, AppError> {
        let key = email.trim().to_lowercase();
        if !key.contains('@') {
            return Err(AppError::Auth(AuthErrorCode::InvalidEmail));
        }
        if password.chars().count() < LOCAL_MIN_PASSWORD_LEN {
            return Err(AppError::Auth(AuthErrorCode::WeakPassword));
        }

        match self.accounts.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(AppError::Auth(AuthErrorCode::EmailAlreadyInUse))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let uid = format!(
                    "local-{:06}",
                    self.next_uid.fetch_add(1, Ordering::Relaxed)
                );
                slot.insert(LocalAccount {
                    uid: uid.clone(),
                    password: password.to_string(),
                });
                Ok(uid)
            }
        }
    }

    fn session_for(uid: &str, email: &str) -> Session {
        Session {
            uid: uid.to_string(),
            email: email.to_string(),
            id_token: format!("local-id-token-{}", uid),
            refresh_token: format!("local-refresh-token-{}", uid),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let email = email.trim().to_lowercase();
        let uid = {
            let account = self
                .accounts
                .get(&email)
                .ok_or(AppError::Auth(AuthErrorCode::UserNotFound))?;
            if account.password != password {
                return Err(AppError::Auth(AuthErrorCode::WrongPassword));
            }
            account.uid.clone()
        };

        let session = Self::session_for(&uid, &email);
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let uid = self.add_account(email, password)?;
        let session = Self::session_for(&uid, &email.trim().to_lowercase());
        self.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.state.send_replace(None);
        Ok(())
    }

    async fn id_token(&self) -> Result<Option<String>, AppError> {
        Ok(self.current_session().map(|s| s.id_token))
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}
