// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist operations on top of the document store.
//!
//! The duplicate check is a query followed by a separate write, so two
//! concurrent additions of the same movie can both pass the check. Both then
//! write the same document key, so the race overwrites instead of
//! duplicating.

use crate::db::{MovieStore, WishlistSubscription};
use crate::error::AppError;
use crate::models::{Movie, WishlistEntry};
use std::sync::Arc;

/// Result of an add request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// Per-user wishlist operations.
#[derive(Clone)]
pub struct WishlistService {
    store: Arc<dyn MovieStore>,
}

impl WishlistService {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    /// Whether the user's wishlist holds an entry for `movie_id`.
    ///
    /// A failed lookup counts as "not present"; the keyed write that follows
    /// cannot create a duplicate.
    pub async fn contains(&self, uid: &str, movie_id: &str) -> bool {
        match self.store.find_wishlist_entry(uid, movie_id).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                tracing::warn!(uid, movie_id, error = %e, "Wishlist lookup failed");
                false
            }
        }
    }

    /// Add a denormalized copy of `movie` unless one is already present.
    pub async fn add(&self, uid: &str, movie: &Movie) -> Result<AddOutcome, AppError> {
        if movie.id.is_empty() {
            return Err(AppError::Validation("Movie has no ID".to_string()));
        }

        if self.contains(uid, &movie.id).await {
            tracing::debug!(uid, movie_id = %movie.id, "Movie already in wishlist");
            return Ok(AddOutcome::AlreadyExists);
        }

        let entry = WishlistEntry::from_movie(movie);
        self.store.set_wishlist_entry(uid, &entry).await?;
        tracing::info!(uid, movie_id = %movie.id, "Added to wishlist");
        Ok(AddOutcome::Added)
    }

    pub async fn remove(&self, uid: &str, movie_id: &str) -> Result<(), AppError> {
        self.store.delete_wishlist_entry(uid, movie_id).await?;
        tracing::info!(uid, movie_id, "Removed from wishlist");
        Ok(())
    }

    pub async fn watch(&self, uid: &str) -> Result<WishlistSubscription, AppError> {
        self.store.watch_wishlist(uid).await
    }
}
