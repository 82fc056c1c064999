// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-up screen: account creation followed by the profile write.

use crate::models::UserProfile;
use crate::screens::{Dialogs, NavAction};
use crate::time_utils::now_rfc3339;
use crate::validation::SignUpForm;
use crate::AppContext;

#[derive(Debug, Default)]
pub struct SignUpScreen {
    pub form: SignUpForm,
    pub error: Option<String>,
}

impl SignUpScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, create the account, then write `users/{uid}`.
    ///
    /// If the profile write fails the account already exists and is kept;
    /// the user is told and can still sign in, just without profile data.
    pub async fn submit(&mut self, ctx: &AppContext, dialogs: &dyn Dialogs) -> Option<NavAction> {
        self.error = None;

        if let Err(msg) = self.form.validate() {
            self.error = Some(msg.to_string());
            return None;
        }

        let email = self.form.email.trim().to_string();
        let session = match ctx.identity.sign_up(&email, &self.form.password).await {
            Ok(session) => session,
            Err(e) => {
                tracing::info!(error = %e, "Sign-up rejected");
                self.error = Some(e.user_message());
                return None;
            }
        };

        let profile = UserProfile {
            name: self.form.name.trim().to_string(),
            email,
            phone_number: self.form.phone_number.trim().to_string(),
            address: self.form.address.trim().to_string(),
            created_at: now_rfc3339(),
        };

        if let Err(e) = ctx.store.set_profile(&session.uid, &profile).await {
            tracing::error!(
                uid = %session.uid,
                error = %e,
                "Account created but profile write failed"
            );
            self.error = Some(format!(
                "Your account was created, but your profile could not be saved. {}",
                e.user_message()
            ));
            return None;
        }

        tracing::info!(uid = %session.uid, "Profile created");
        self.form = SignUpForm::default();
        dialogs.alert("Success", "Account created successfully.");
        Some(NavAction::Back)
    }
}
