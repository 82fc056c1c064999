// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Movies (read-only catalog)
//! - Users (profile written at sign-up)
//! - Wishlist (per-user subcollection, with a live listener)
//!
//! Requests are authorized with the signed-in user's ID token so that
//! Firestore security rules apply exactly as they would for the web SDK.

use crate::db::{collections, MovieStore, WishlistEvent, WishlistSubscription};
use crate::error::AppError;
use crate::models::{Movie, UserProfile, WishlistEntry};
use crate::services::identity::IdentityProvider;
use async_trait::async_trait;
use firestore::{FirestoreListenEvent, FirestoreListenerTarget, FirestoreMemListenStateStorage};
use gcloud_sdk::google::firestore::v1::target_change::TargetChangeType;
use gcloud_sdk::google::firestore::v1::Document;
use std::sync::Arc;

const WISHLIST_LISTEN_TARGET: FirestoreListenerTarget = FirestoreListenerTarget::new(1_u32);

// Unsigned token accepted by the emulator and rejected by production.
const ANONYMOUS_TOKEN: &str = "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0.";

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client authorized as the signed-in user.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(
        project_id: &str,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        // The token is looked up on every refresh so sign-in, sign-out and
        // ID token renewal are picked up without reconnecting. The lookup runs
        // on its own task because the token future must be Sync.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(move || {
            let identity = identity.clone();
            async move {
                let lookup = tokio::spawn(async move { identity.id_token().await });
                let token = match lookup.await {
                    Ok(Ok(Some(token))) => token,
                    Ok(Ok(None)) => ANONYMOUS_TOKEN.to_string(),
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "Failed to obtain ID token for Firestore");
                        ANONYMOUS_TOKEN.to_string()
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "ID token lookup task failed");
                        ANONYMOUS_TOKEN.to_string()
                    }
                };
                Ok(gcloud_sdk::Token {
                    token_type: "Bearer".to_string(),
                    token: gcloud_sdk::SecretValue::new(token.into()),
                    expiry: chrono::Utc::now() + chrono::Duration::minutes(1),
                })
            }
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    pub async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(ANONYMOUS_TOKEN.to_string().into()),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    /// Parent path `users/{uid}` for the wishlist subcollection.
    fn user_path(&self, uid: &str) -> Result<firestore::ParentPathBuilder, AppError> {
        self.client
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl MovieStore for FirestoreDb {
    // ─── Catalog ─────────────────────────────────────────────────

    async fn list_movies(&self) -> Result<Vec<Movie>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::MOVIES)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Profile ────────────────────────────────────────────

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Wishlist ────────────────────────────────────────────────

    async fn find_wishlist_entry(
        &self,
        uid: &str,
        movie_id: &str,
    ) -> Result<Option<WishlistEntry>, AppError> {
        let parent_path = self.user_path(uid)?;
        let movie_id = movie_id.to_string();

        let docs: Vec<Document> = self
            .client
            .fluent()
            .select()
            .from(collections::WISHLIST)
            .parent(&parent_path)
            .filter(move |q| q.field("id").eq(movie_id.clone()))
            .limit(1)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        docs.first().map(decode_wishlist_doc).transpose()
    }

    async fn set_wishlist_entry(&self, uid: &str, entry: &WishlistEntry) -> Result<(), AppError> {
        let parent_path = self.user_path(uid)?;

        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::WISHLIST)
            .document_id(&entry.id)
            .parent(&parent_path)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete_wishlist_entry(&self, uid: &str, movie_id: &str) -> Result<(), AppError> {
        let parent_path = self.user_path(uid)?;

        self.client
            .fluent()
            .delete()
            .from(collections::WISHLIST)
            .document_id(movie_id)
            .parent(&parent_path)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_wishlist(&self, uid: &str) -> Result<Vec<WishlistEntry>, AppError> {
        let parent_path = self.user_path(uid)?;

        let docs: Vec<Document> = self
            .client
            .fluent()
            .select()
            .from(collections::WISHLIST)
            .parent(&parent_path)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        docs.iter().map(decode_wishlist_doc).collect()
    }

    async fn watch_wishlist(&self, uid: &str) -> Result<WishlistSubscription, AppError> {
        let parent_path = self.user_path(uid)?;

        let mut listener = self
            .client
            .create_listener(FirestoreMemListenStateStorage::new())
            .await
            .map_err(|e| AppError::Database(format!("Failed to create listener: {}", e)))?;

        self.client
            .fluent()
            .select()
            .from(collections::WISHLIST)
            .parent(&parent_path)
            .listen()
            .add_target(WISHLIST_LISTEN_TARGET, &mut listener)
            .map_err(|e| AppError::Database(format!("Failed to add listen target: {}", e)))?;

        let (subscription, events, shutdown) = WishlistSubscription::channel();

        listener
            .start(move |event| {
                let events = events.clone();
                async move {
                    if let Some(event) = translate_listen_event(event) {
                        // Receiver gone means the view is being torn down.
                        let _ = events.send(event);
                    }
                    Ok(())
                }
            })
            .await
            .map_err(|e| AppError::Database(format!("Failed to start listener: {}", e)))?;

        tracing::debug!(uid, "Wishlist listener started");

        let uid = uid.to_string();
        tokio::spawn(async move {
            // Resolves when the subscription is dropped.
            let _ = shutdown.await;
            if let Err(e) = listener.shutdown().await {
                tracing::warn!(uid = %uid, error = %e, "Failed to stop wishlist listener");
            } else {
                tracing::debug!(uid = %uid, "Wishlist listener stopped");
            }
        });

        Ok(subscription)
    }
}

/// Map a raw listen response onto a wishlist change.
fn translate_listen_event(event: FirestoreListenEvent) -> Option<WishlistEvent> {
    match event {
        FirestoreListenEvent::DocumentChange(change) => {
            let doc = change.document?;
            match decode_wishlist_doc(&doc) {
                Ok(entry) => Some(WishlistEvent::Upsert(entry)),
                Err(e) => {
                    tracing::warn!(doc = %doc.name, error = %e, "Skipping undecodable wishlist document");
                    None
                }
            }
        }
        FirestoreListenEvent::DocumentDelete(delete) => {
            Some(WishlistEvent::Removed(document_id(&delete.document).to_string()))
        }
        FirestoreListenEvent::DocumentRemove(remove) => {
            Some(WishlistEvent::Removed(document_id(&remove.document).to_string()))
        }
        FirestoreListenEvent::TargetChange(change) => {
            match change.target_change_type() {
                TargetChangeType::Current => Some(WishlistEvent::Synced),
                TargetChangeType::Remove => Some(WishlistEvent::Failed(
                    change
                        .cause
                        .map(|status| status.message)
                        .unwrap_or_else(|| "Listener target removed".to_string()),
                )),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Decode a wishlist document, keyed by its document ID.
fn decode_wishlist_doc(doc: &Document) -> Result<WishlistEntry, AppError> {
    firestore::FirestoreDb::deserialize_doc_to::<WishlistEntry>(doc)
        .map(|entry| entry.keyed_by(document_id(&doc.name)))
        .map_err(|e| AppError::Database(format!("Failed to decode {}: {}", doc.name, e)))
}

/// Last segment of a full document resource name.
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
