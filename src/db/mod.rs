// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document database layer (Firestore, or in-memory when offline).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::{demo_catalog, MemoryStore};

use crate::error::AppError;
use crate::models::{Movie, UserProfile, WishlistEntry};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Collection names as constants.
pub mod collections {
    pub const MOVIES: &str = "movies";
    pub const USERS: &str = "users";
    /// Subcollection under `users/{uid}`
    pub const WISHLIST: &str = "wishlist";
}

/// Operations the app needs from the document database.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All documents of the `movies` collection.
    async fn list_movies(&self) -> Result<Vec<Movie>, AppError>;

    /// Profile document `users/{uid}`.
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;

    /// Write (overwrite) the profile document `users/{uid}`.
    async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), AppError>;

    /// Equality query on the `id` field of the user's wishlist.
    async fn find_wishlist_entry(
        &self,
        uid: &str,
        movie_id: &str,
    ) -> Result<Option<WishlistEntry>, AppError>;

    /// Write `users/{uid}/wishlist/{entry.id}`.
    async fn set_wishlist_entry(&self, uid: &str, entry: &WishlistEntry) -> Result<(), AppError>;

    /// Delete `users/{uid}/wishlist/{movie_id}`.
    async fn delete_wishlist_entry(&self, uid: &str, movie_id: &str) -> Result<(), AppError>;

    /// One-shot read of the user's wishlist.
    async fn list_wishlist(&self, uid: &str) -> Result<Vec<WishlistEntry>, AppError>;

    /// Live subscription on the user's wishlist.
    ///
    /// Existing documents are delivered first as `Upsert` events, followed
    /// by `Synced`.
    async fn watch_wishlist(&self, uid: &str) -> Result<WishlistSubscription, AppError>;
}

/// Change pushed by a live wishlist subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistEvent {
    /// Entry added or changed.
    Upsert(WishlistEntry),
    /// Entry with this movie ID was deleted.
    Removed(String),
    /// Initial snapshot fully delivered.
    Synced,
    /// The listener failed and will not deliver further events.
    Failed(String),
}

/// Handle on a live wishlist listener.
///
/// Dropping the subscription signals the listener to stop.
pub struct WishlistSubscription {
    events: mpsc::UnboundedReceiver<WishlistEvent>,
    _shutdown: oneshot::Sender<()>,
}

impl WishlistSubscription {
    /// Create a subscription pair.
    ///
    /// The producer side sends events on the returned sender and should stop
    /// once the returned receiver resolves (sender dropped).
    pub fn channel() -> (
        Self,
        mpsc::UnboundedSender<WishlistEvent>,
        oneshot::Receiver<()>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        (
            Self {
                events: rx,
                _shutdown: shutdown_tx,
            },
            tx,
            shutdown_rx,
        )
    }

    /// Wait for the next event. `None` once the listener has stopped.
    pub async fn next(&mut self) -> Option<WishlistEvent> {
        self.events.recv().await
    }

    /// Next event if one is already queued.
    pub fn try_next(&mut self) -> Option<WishlistEvent> {
        self.events.try_recv().ok()
    }
}
