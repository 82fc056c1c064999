// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;

const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_SECURE_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Firebase ---
    /// Web API key of the Firebase project
    pub firebase_api_key: String,
    /// Firebase/GCP project ID hosting Firestore
    pub firebase_project_id: String,
    /// Identity Toolkit REST base URL
    pub identity_base_url: String,
    /// Secure token (refresh) REST base URL
    pub secure_token_base_url: String,
    /// Where to persist the signed-in session, if anywhere
    pub session_file: Option<PathBuf>,

    // --- TMDB ---
    /// TMDB v3 API key
    pub tmdb_api_key: String,
    /// TMDB REST base URL
    pub tmdb_base_url: String,
    /// Fetch per-movie details (production countries) for search results
    pub search_details: bool,

    /// Run against in-memory collaborators instead of the network
    pub offline: bool,
}

impl Config {
    /// Deterministic offline configuration for tests.
    pub fn test_default() -> Self {
        Self {
            firebase_api_key: "test-api-key".to_string(),
            firebase_project_id: "test-project".to_string(),
            identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
            secure_token_base_url: DEFAULT_SECURE_TOKEN_BASE_URL.to_string(),
            session_file: None,
            tmdb_api_key: "test-tmdb-key".to_string(),
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            search_details: true,
            offline: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Credentials are only required when running online.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let offline = parse_bool("OFFLINE", false)?;

        let required = |name: &'static str| -> Result<String, ConfigError> {
            match env::var(name) {
                Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ if offline => Ok(String::new()),
                _ => Err(ConfigError::Missing(name)),
            }
        };

        Ok(Self {
            firebase_api_key: required("FIREBASE_API_KEY")?,
            firebase_project_id: required("FIREBASE_PROJECT_ID")?,
            identity_base_url: env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_BASE_URL.to_string()),
            secure_token_base_url: env::var("SECURE_TOKEN_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SECURE_TOKEN_BASE_URL.to_string()),
            session_file: env::var("SESSION_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            tmdb_api_key: required("TMDB_API_KEY")?,
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TMDB_BASE_URL.to_string()),
            search_details: parse_bool("SEARCH_DETAILS", true)?,
            offline,
        })
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "" => Ok(default),
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid(name, v)),
        },
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
