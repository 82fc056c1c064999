// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

/// Application error type shared by every collaborator call.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Authentication failed: {}", .0.as_str())]
    Auth(AuthErrorCode),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Movie API error: {0}")]
    MovieApi(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message suitable for an inline error or an alert dialog.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Auth(code) => code.user_message(),
            AppError::NotSignedIn => "Please sign in to continue.".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(msg) | AppError::MovieApi(msg) => {
                format!("Something went wrong: {}", msg)
            }
            AppError::Internal(err) => format!("Something went wrong: {}", err),
        }
    }
}

/// Identity provider error codes.
///
/// Parsed from the `error.message` field of Identity Toolkit responses,
/// which looks like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    InvalidEmail,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    EmailAlreadyInUse,
    WeakPassword,
    UserDisabled,
    TooManyRequests,
    /// The refresh token was revoked, expired or belongs to a deleted user.
    SessionExpired,
    /// Unmapped code, carrying the raw message.
    Other(String),
}

impl AuthErrorCode {
    /// Parse a raw Identity Toolkit error message.
    pub fn from_rest_message(raw: &str) -> Self {
        let code = raw.split(':').next().unwrap_or_default().trim();
        match code {
            "INVALID_EMAIL" => AuthErrorCode::InvalidEmail,
            "EMAIL_NOT_FOUND" => AuthErrorCode::UserNotFound,
            "INVALID_PASSWORD" => AuthErrorCode::WrongPassword,
            "INVALID_LOGIN_CREDENTIALS" => AuthErrorCode::InvalidCredential,
            "EMAIL_EXISTS" => AuthErrorCode::EmailAlreadyInUse,
            "WEAK_PASSWORD" => AuthErrorCode::WeakPassword,
            "USER_DISABLED" => AuthErrorCode::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthErrorCode::TooManyRequests,
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
                AuthErrorCode::SessionExpired
            }
            _ => AuthErrorCode::Other(raw.to_string()),
        }
    }

    /// Stable short identifier, used in logs.
    pub fn as_str(&self) -> &str {
        match self {
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::InvalidCredential => "auth/invalid-credential",
            AuthErrorCode::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthErrorCode::WeakPassword => "auth/weak-password",
            AuthErrorCode::UserDisabled => "auth/user-disabled",
            AuthErrorCode::TooManyRequests => "auth/too-many-requests",
            AuthErrorCode::SessionExpired => "auth/user-token-expired",
            AuthErrorCode::Other(raw) => raw,
        }
    }

    /// Fixed user-facing text for the code.
    pub fn user_message(&self) -> String {
        match self {
            AuthErrorCode::InvalidEmail => "The email address is badly formatted.".to_string(),
            AuthErrorCode::UserNotFound => "No account found with this email.".to_string(),
            AuthErrorCode::WrongPassword => "Incorrect password. Please try again.".to_string(),
            AuthErrorCode::InvalidCredential => "Invalid email or password.".to_string(),
            AuthErrorCode::EmailAlreadyInUse => {
                "This email address is already in use.".to_string()
            }
            AuthErrorCode::WeakPassword => {
                "Password should be at least 6 characters.".to_string()
            }
            AuthErrorCode::UserDisabled => "This account has been disabled.".to_string(),
            AuthErrorCode::TooManyRequests => {
                "Too many attempts. Please try again later.".to_string()
            }
            AuthErrorCode::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AuthErrorCode::Other(raw) => format!("Something went wrong: {}", raw),
        }
    }

    /// Whether the stored session can no longer be used and must be dropped.
    pub fn ends_session(&self) -> bool {
        matches!(
            self,
            AuthErrorCode::SessionExpired | AuthErrorCode::UserDisabled
        )
    }
}

/// Result type alias for collaborator calls
pub type Result<T> = std::result::Result<T, AppError>;
