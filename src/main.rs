// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Movie Wishlist terminal client
//!
//! Browse the movie catalog, search TMDB and keep a personal wishlist
//! backed by Firebase Auth and Firestore.

use anyhow::Context;
use movie_wishlist::{
    config::Config,
    db::{demo_catalog, FirestoreDb, MemoryStore, MovieStore},
    services::{FirebaseAuth, IdentityProvider, LocalIdentity, MovieApi, TmdbClient},
    terminal::Terminal,
    AppContext,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the UI.
    init_logging()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(offline = config.offline, "Starting Movie Wishlist");

    let movie_api: Arc<dyn MovieApi> = Arc::new(TmdbClient::new(&config));

    let (identity, store): (Arc<dyn IdentityProvider>, Arc<dyn MovieStore>) = if config.offline {
        let catalog = demo_catalog();
        let store = MemoryStore::with_movies(&catalog).context("Failed to seed demo catalog")?;
        tracing::info!(count = catalog.len(), "Offline mode, demo catalog loaded");
        let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentity::new());
        let store: Arc<dyn MovieStore> = Arc::new(store);
        (identity, store)
    } else {
        let auth = Arc::new(FirebaseAuth::new(&config));
        auth.restore().await;
        let identity: Arc<dyn IdentityProvider> = auth;

        let db = FirestoreDb::new(&config.firebase_project_id, identity.clone())
            .await
            .context("Failed to connect to Firestore")?;
        let store: Arc<dyn MovieStore> = Arc::new(db);
        (identity, store)
    };

    let ctx = AppContext::new(config, identity, store, movie_api);
    Terminal::new(ctx).run().await?;

    tracing::info!("Goodbye");
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("movie_wishlist=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
