// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model.

use serde::{Deserialize, Serialize};

/// Profile stored at `users/{uid}`, written once at sign-up.
///
/// Fields missing from a stored document read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub address: String,
    /// When the account was created (RFC 3339)
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
