// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist screen backed by a live subscription.

use crate::db::{WishlistEvent, WishlistSubscription};
use crate::error::AppError;
use crate::models::WishlistEntry;
use crate::screens::{Dialogs, LoadState};
use crate::AppContext;

pub const MSG_EMPTY_WISHLIST: &str = "Your wishlist is empty.";
pub const MSG_FETCH_FAILED: &str = "Failed to fetch wishlist.";

#[derive(Default)]
pub struct WishlistScreen {
    pub state: LoadState<Vec<WishlistEntry>>,
    /// Entries received before the initial snapshot completed
    pending: Vec<WishlistEntry>,
    subscription: Option<WishlistSubscription>,
}

impl WishlistScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe and wait for the initial snapshot.
    pub async fn activate(&mut self, ctx: &AppContext) {
        self.deactivate();
        self.state = LoadState::Loading;

        let Some(uid) = ctx.current_uid() else {
            self.state = LoadState::Error(MSG_FETCH_FAILED.to_string());
            return;
        };

        match ctx.wishlist.watch(&uid).await {
            Ok(subscription) => self.subscription = Some(subscription),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching wishlist");
                self.state = LoadState::Error(MSG_FETCH_FAILED.to_string());
                return;
            }
        }

        while self.state.is_loading() {
            if !self.next_update().await {
                break;
            }
        }
    }

    /// Stop listening. Local state is kept until the next activation.
    pub fn deactivate(&mut self) {
        self.subscription = None;
        self.pending.clear();
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Wait for one pushed change and apply it. `false` once the
    /// subscription has ended.
    pub async fn next_update(&mut self) -> bool {
        let event = match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => return false,
        };
        match event {
            Some(event) => {
                self.apply(event);
                true
            }
            None => {
                self.subscription = None;
                false
            }
        }
    }

    /// Apply every change that has already arrived.
    pub fn drain_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: WishlistEvent) {
        if self.state.is_loading() {
            match event {
                WishlistEvent::Upsert(entry) => upsert(&mut self.pending, entry),
                WishlistEvent::Removed(id) => self.pending.retain(|e| e.id != id),
                WishlistEvent::Synced => {
                    let entries = std::mem::take(&mut self.pending);
                    self.set_entries(entries);
                }
                WishlistEvent::Failed(msg) => self.fail(&msg),
            }
            return;
        }

        let mut entries = self.state.data().cloned().unwrap_or_default();
        match event {
            WishlistEvent::Upsert(entry) => upsert(&mut entries, entry),
            WishlistEvent::Removed(id) => entries.retain(|e| e.id != id),
            WishlistEvent::Synced => return,
            WishlistEvent::Failed(msg) => return self.fail(&msg),
        }
        self.set_entries(entries);
    }

    fn fail(&mut self, msg: &str) {
        tracing::error!(error = msg, "Wishlist listener failed");
        self.state = LoadState::Error(MSG_FETCH_FAILED.to_string());
        self.subscription = None;
    }

    fn set_entries(&mut self, entries: Vec<WishlistEntry>) {
        self.state = if entries.is_empty() {
            LoadState::Empty(MSG_EMPTY_WISHLIST.to_string())
        } else {
            LoadState::Success(entries)
        };
    }

    pub fn entry(&self, index: usize) -> Option<&WishlistEntry> {
        self.state.data().and_then(|entries| entries.get(index))
    }

    /// Confirm, delete on the server, then drop the entry locally without
    /// waiting for the listener. Returns whether the entry was removed.
    pub async fn remove(&mut self, ctx: &AppContext, dialogs: &dyn Dialogs, movie_id: &str) -> bool {
        let Some(uid) = ctx.current_uid() else {
            dialogs.alert("Error", &AppError::NotSignedIn.user_message());
            return false;
        };

        if !dialogs
            .confirm(
                "Confirm",
                "Are you sure you want to remove this movie from your wishlist?",
            )
            .await
        {
            return false;
        }

        if let Err(e) = ctx.wishlist.remove(&uid, movie_id).await {
            tracing::error!(movie_id, error = %e, "Error removing from wishlist");
            dialogs.alert("Error", "Failed to remove the movie from your wishlist.");
            return false;
        }

        if let Some(entries) = self.state.data() {
            let remaining = entries
                .iter()
                .filter(|e| e.id != movie_id)
                .cloned()
                .collect();
            self.set_entries(remaining);
        }
        dialogs.alert(
            "Removed from Wishlist",
            "The movie has been removed from your wishlist.",
        );
        true
    }
}

fn upsert(entries: &mut Vec<WishlistEntry>, entry: WishlistEntry) {
    match entries.iter_mut().find(|e| e.id == entry.id) {
        Some(existing) => *existing = entry,
        None => entries.push(entry),
    }
}
