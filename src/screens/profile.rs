// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile screen with sign-out.

use crate::models::UserProfile;
use crate::screens::{Dialogs, LoadState, NavAction, Route};
use crate::AppContext;

pub const MSG_NO_PROFILE: &str = "No user data found.";
pub const MSG_PROFILE_FAILED: &str = "Failed to fetch user data.";

#[derive(Debug, Default)]
pub struct ProfileScreen {
    /// Account ID of the signed-in user
    pub uid: Option<String>,
    pub state: LoadState<UserProfile>,
}

impl ProfileScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `users/{uid}` for the signed-in user.
    pub async fn load(&mut self, ctx: &AppContext) {
        self.state = LoadState::Loading;
        self.uid = ctx.current_uid();

        let Some(uid) = self.uid.as_deref() else {
            self.state = LoadState::Empty(MSG_NO_PROFILE.to_string());
            return;
        };

        self.state = match ctx.store.get_profile(uid).await {
            Ok(Some(profile)) => LoadState::Success(profile),
            Ok(None) => LoadState::Empty(MSG_NO_PROFILE.to_string()),
            Err(e) => {
                tracing::error!(uid, error = %e, "Error fetching profile");
                LoadState::Error(MSG_PROFILE_FAILED.to_string())
            }
        };
    }

    /// Confirm, sign out, and clear history back to sign-in.
    pub async fn sign_out(&mut self, ctx: &AppContext, dialogs: &dyn Dialogs) -> Option<NavAction> {
        if !dialogs
            .confirm("Sign Out", "Are you sure you want to sign out?")
            .await
        {
            return None;
        }

        if let Err(e) = ctx.identity.sign_out().await {
            tracing::error!(error = %e, "Error signing out");
            dialogs.alert("Error", &e.user_message());
            return None;
        }

        self.uid = None;
        self.state = LoadState::Idle;
        Some(NavAction::Reset(Route::SignIn))
    }
}
