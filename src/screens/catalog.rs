// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog (home) screen: the movie list and "add to wishlist".

use crate::error::AppError;
use crate::models::Movie;
use crate::screens::{Dialogs, LoadState};
use crate::services::AddOutcome;
use crate::AppContext;

pub const MSG_NO_MOVIES: &str = "No movies found.";
pub const MSG_FETCH_FAILED: &str = "Failed to fetch movies.";

#[derive(Debug, Default)]
pub struct CatalogScreen {
    pub state: LoadState<Vec<Movie>>,
}

impl CatalogScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the whole catalog.
    pub async fn load(&mut self, ctx: &AppContext) {
        self.state = LoadState::Loading;

        self.state = match ctx.store.list_movies().await {
            Ok(movies) if movies.is_empty() => LoadState::Empty(MSG_NO_MOVIES.to_string()),
            Ok(movies) => {
                tracing::debug!(count = movies.len(), "Catalog loaded");
                LoadState::Success(movies)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching movies");
                LoadState::Error(MSG_FETCH_FAILED.to_string())
            }
        };
    }

    /// Movie at a position of the current list.
    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.state.data().and_then(|movies| movies.get(index))
    }

    /// Confirm, then add `movie` to the signed-in user's wishlist.
    ///
    /// Returns the outcome when a write was attempted and succeeded or was
    /// skipped as a duplicate; every path ends in a dialog.
    pub async fn add_to_wishlist(
        &self,
        ctx: &AppContext,
        dialogs: &dyn Dialogs,
        movie: &Movie,
    ) -> Option<AddOutcome> {
        let Some(uid) = ctx.current_uid() else {
            dialogs.alert("Error", &AppError::NotSignedIn.user_message());
            return None;
        };

        if !dialogs
            .confirm(
                "Confirm",
                "Are you sure you want to add this movie to your wishlist?",
            )
            .await
        {
            return None;
        }

        match ctx.wishlist.add(&uid, movie).await {
            Ok(AddOutcome::AlreadyExists) => {
                dialogs.alert(
                    "Already in Wishlist",
                    "This movie is already in your wishlist.",
                );
                Some(AddOutcome::AlreadyExists)
            }
            Ok(AddOutcome::Added) => {
                dialogs.alert(
                    "Added to Wishlist",
                    "The movie has been added to your wishlist.",
                );
                Some(AddOutcome::Added)
            }
            Err(e) => {
                tracing::error!(movie_id = %movie.id, error = %e, "Error adding to wishlist");
                dialogs.alert("Error", "Failed to add the movie to your wishlist.");
                None
            }
        }
    }
}
