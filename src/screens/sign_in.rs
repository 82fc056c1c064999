// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in screen.

use crate::screens::{NavAction, Route, Tab};
use crate::validation::SignInForm;
use crate::AppContext;

#[derive(Debug, Default)]
pub struct SignInScreen {
    pub form: SignInForm,
    /// Inline error shown under the form
    pub error: Option<String>,
}

impl SignInScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and submit. Returns where to go on success.
    pub async fn submit(&mut self, ctx: &AppContext) -> Option<NavAction> {
        self.error = None;

        if let Err(msg) = self.form.validate() {
            self.error = Some(msg.to_string());
            return None;
        }

        match ctx
            .identity
            .sign_in(self.form.email.trim(), &self.form.password)
            .await
        {
            Ok(_) => {
                self.form.password.clear();
                Some(NavAction::Navigate(Route::Main(Tab::Home)))
            }
            Err(e) => {
                tracing::info!(error = %e, "Sign-in rejected");
                self.error = Some(e.user_message());
                None
            }
        }
    }

    pub fn go_to_sign_up(&self) -> NavAction {
        NavAction::Navigate(Route::SignUp)
    }
}
