// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store for offline mode and tests.
//!
//! Documents are kept as JSON values keyed by their full path so that every
//! read goes through the same serde mapping as a real database round-trip.

use crate::db::{collections, MovieStore, WishlistEvent, WishlistSubscription};
use crate::error::AppError;
use crate::models::{Movie, UserProfile, WishlistEntry};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// A document write or delete, published to live listeners.
#[derive(Debug, Clone)]
struct DocChange {
    path: String,
    value: Option<serde_json::Value>,
}

/// In-memory document store.
#[derive(Clone)]
pub struct MemoryStore {
    docs: Arc<DashMap<String, serde_json::Value>>,
    changes: broadcast::Sender<DocChange>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_change_capacity(CHANGE_CHANNEL_CAPACITY)
    }

    fn with_change_capacity(capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity);
        Self {
            docs: Arc::new(DashMap::new()),
            changes,
        }
    }

    /// Store pre-seeded with catalog movies.
    pub fn with_movies(movies: &[Movie]) -> Result<Self, AppError> {
        let store = Self::new();
        for movie in movies {
            store.put(&movie_path(&movie.id), movie)?;
        }
        Ok(store)
    }

    /// Write a catalog movie. The catalog is read-only for the app itself.
    pub fn insert_movie(&self, movie: &Movie) -> Result<(), AppError> {
        self.put(&movie_path(&movie.id), movie)
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn put<T: Serialize>(&self, path: &str, doc: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(doc)
            .map_err(|e| AppError::Database(format!("Failed to encode {}: {}", path, e)))?;
        self.docs.insert(path.to_string(), value.clone());
        // No receivers is fine.
        let _ = self.changes.send(DocChange {
            path: path.to_string(),
            value: Some(value),
        });
        Ok(())
    }

    fn remove(&self, path: &str) {
        self.docs.remove(path);
        let _ = self.changes.send(DocChange {
            path: path.to_string(),
            value: None,
        });
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        self.docs
            .get(path)
            .map(|doc| decode(path, doc.value().clone()))
            .transpose()
    }

    /// Documents directly inside `collection_path`, sorted by document ID.
    fn list<T: DeserializeOwned>(&self, collection_path: &str) -> Result<Vec<(String, T)>, AppError> {
        let mut docs: Vec<(String, serde_json::Value)> = self
            .docs
            .iter()
            .filter_map(|doc| {
                doc_id_in(collection_path, doc.key())
                    .map(|id| (id.to_string(), doc.value().clone()))
            })
            .collect();
        docs.sort_by(|a, b| a.0.cmp(&b.0));

        docs.into_iter()
            .map(|(id, value)| {
                let path = format!("{}/{}", collection_path, id);
                decode(&path, value).map(|doc| (id, doc))
            })
            .collect()
    }
}

/// Small catalog for offline demos.
pub fn demo_catalog() -> Vec<Movie> {
    let movie = |id: &str, name: &str, genre: &str, rating: f64, date: &str, director: &str| Movie {
        id: id.to_string(),
        movie_name: Some(name.to_string()),
        genre: Some(genre.to_string()),
        rating: Some(rating),
        release_date: Some(date.to_string()),
        director: Some(director.to_string()),
        description: None,
        image_url: None,
    };

    vec![
        movie("alien", "Alien", "Horror", 8.5, "1979-05-25", "Ridley Scott"),
        movie("arrival", "Arrival", "Science Fiction", 7.9, "2016-11-11", "Denis Villeneuve"),
        movie("heat", "Heat", "Crime", 8.3, "1995-12-15", "Michael Mann"),
        movie("paddington-2", "Paddington 2", "Comedy", 7.8, "2017-11-10", "Paul King"),
        Movie {
            id: "untitled".to_string(),
            ..Movie::default()
        },
    ]
}

fn decode<T: DeserializeOwned>(path: &str, value: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Database(format!("Failed to decode {}: {}", path, e)))
}

/// ID of the document at `path` when it sits directly in `collection_path`.
fn doc_id_in<'a>(collection_path: &str, path: &'a str) -> Option<&'a str> {
    path.strip_prefix(collection_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

fn movie_path(movie_id: &str) -> String {
    format!("{}/{}", collections::MOVIES, movie_id)
}

fn profile_path(uid: &str) -> String {
    format!("{}/{}", collections::USERS, uid)
}

fn wishlist_path(uid: &str) -> String {
    format!("{}/{}/{}", collections::USERS, uid, collections::WISHLIST)
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, AppError> {
        Ok(self
            .list::<Movie>(collections::MOVIES)?
            .into_iter()
            .map(|(id, mut movie)| {
                movie.id = id;
                movie
            })
            .collect())
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get(&profile_path(uid))
    }

    async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), AppError> {
        self.put(&profile_path(uid), profile)
    }

    async fn find_wishlist_entry(
        &self,
        uid: &str,
        movie_id: &str,
    ) -> Result<Option<WishlistEntry>, AppError> {
        Ok(self
            .list_wishlist(uid)
            .await?
            .into_iter()
            .find(|entry| entry.id == movie_id))
    }

    async fn set_wishlist_entry(&self, uid: &str, entry: &WishlistEntry) -> Result<(), AppError> {
        self.put(&format!("{}/{}", wishlist_path(uid), entry.id), entry)
    }

    async fn delete_wishlist_entry(&self, uid: &str, movie_id: &str) -> Result<(), AppError> {
        self.remove(&format!("{}/{}", wishlist_path(uid), movie_id));
        Ok(())
    }

    async fn list_wishlist(&self, uid: &str) -> Result<Vec<WishlistEntry>, AppError> {
        Ok(self
            .list::<WishlistEntry>(&wishlist_path(uid))?
            .into_iter()
            .map(|(id, entry)| entry.keyed_by(&id))
            .collect())
    }

    async fn watch_wishlist(&self, uid: &str) -> Result<WishlistSubscription, AppError> {
        let collection_path = wishlist_path(uid);
        let (subscription, tx, mut shutdown) = WishlistSubscription::channel();

        // Subscribe before the snapshot so no write falls in between.
        let mut changes = self.changes.subscribe();
        for (id, entry) in self.list::<WishlistEntry>(&collection_path)? {
            let _ = tx.send(WishlistEvent::Upsert(entry.keyed_by(&id)));
        }
        let _ = tx.send(WishlistEvent::Synced);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown => break,
                    change = changes.recv() => {
                        let change = match change {
                            Ok(change) => change,
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                // The view can no longer be trusted to match the store.
                                tracing::warn!(skipped, "Wishlist listener lagged");
                                let _ = tx.send(WishlistEvent::Failed(format!(
                                    "Missed {} wishlist changes",
                                    skipped
                                )));
                                break;
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        };
                        let Some(doc_id) = doc_id_in(&collection_path, &change.path) else {
                            continue;
                        };
                        let event = match change.value {
                            Some(value) => match decode::<WishlistEntry>(&change.path, value) {
                                Ok(entry) => WishlistEvent::Upsert(entry.keyed_by(doc_id)),
                                Err(e) => {
                                    tracing::warn!(error = %e, "Skipping undecodable wishlist document");
                                    continue;
                                }
                            },
                            None => WishlistEvent::Removed(doc_id.to_string()),
                        };
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(path = %collection_path, "Wishlist listener stopped");
        });

        Ok(subscription)
    }
}
