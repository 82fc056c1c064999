// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gate: routes to the catalog or the sign-in flow as auth state
//! changes.

use crate::screens::{NavAction, Route, Tab};
use crate::services::IdentityProvider;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Mounted auth-state observer.
///
/// Emits one [`NavAction`] for the state current at mount time and one for
/// every sign-in or sign-out after that. Token refreshes of the same user
/// are ignored. Dropping the gate unsubscribes.
pub struct SessionGate {
    actions: mpsc::UnboundedReceiver<NavAction>,
    watcher: JoinHandle<()>,
}

impl SessionGate {
    pub fn mount(identity: &dyn IdentityProvider) -> Self {
        let mut auth_state = identity.subscribe();
        let (tx, actions) = mpsc::unbounded_channel();

        let watcher = tokio::spawn(async move {
            let mut last_uid: Option<Option<String>> = None;
            loop {
                let uid = auth_state
                    .borrow_and_update()
                    .as_ref()
                    .map(|session| session.uid.clone());

                if last_uid.as_ref() != Some(&uid) {
                    tracing::debug!(signed_in = uid.is_some(), "Auth state changed");
                    if tx.send(Self::route_for(uid.is_some())).is_err() {
                        break;
                    }
                    last_uid = Some(uid);
                }

                if auth_state.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { actions, watcher }
    }

    /// Where an auth state leads.
    pub fn route_for(signed_in: bool) -> NavAction {
        if signed_in {
            NavAction::Reset(Route::Main(Tab::Home))
        } else {
            NavAction::Reset(Route::SignIn)
        }
    }

    /// Wait for the next routing decision.
    pub async fn next(&mut self) -> Option<NavAction> {
        self.actions.recv().await
    }

    /// Routing decision if one is pending.
    pub fn try_next(&mut self) -> Option<NavAction> {
        self.actions.try_recv().ok()
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}
