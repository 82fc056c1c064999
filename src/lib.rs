// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Movie Wishlist: browse a movie catalog, search TMDB, keep a wishlist.
//!
//! This crate provides the client side of the app: collaborator clients for
//! Firebase Auth, Firestore and TMDB, the screen controllers that drive
//! them, and a terminal front end.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod screens;
pub mod services;
pub mod terminal;
pub mod time_utils;
pub mod validation;

use config::Config;
use db::MovieStore;
use services::{IdentityProvider, MovieApi, SearchService, WishlistService};
use std::sync::Arc;

/// Collaborators shared by every screen, constructed once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn MovieStore>,
    pub search: SearchService,
    pub wishlist: WishlistService,
}

impl AppContext {
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn MovieStore>,
        movie_api: Arc<dyn MovieApi>,
    ) -> Self {
        let search = SearchService::new(movie_api, config.search_details);
        let wishlist = WishlistService::new(store.clone());
        Self {
            config,
            identity,
            store,
            search,
            wishlist,
        }
    }

    /// ID of the signed-in user.
    pub fn current_uid(&self) -> Option<String> {
        self.identity.current_session().map(|s| s.uid)
    }
}
