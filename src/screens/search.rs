// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Search screen.

use crate::models::SearchResult;
use crate::screens::{Dialogs, LoadState};
use crate::AppContext;

pub const MSG_NO_RESULTS: &str = "No movies found";
pub const MSG_SEARCH_FAILED: &str = "Failed to fetch movies";

#[derive(Debug, Default)]
pub struct SearchScreen {
    pub query: String,
    pub state: LoadState<Vec<SearchResult>>,
}

impl SearchScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the search for the current query.
    ///
    /// No results is reported through a dialog, not as an error.
    pub async fn submit(&mut self, ctx: &AppContext, dialogs: &dyn Dialogs) {
        if self.query.trim().is_empty() {
            self.state = LoadState::Idle;
            return;
        }

        self.state = LoadState::Loading;

        self.state = match ctx.search.search(&self.query).await {
            Ok(results) if results.is_empty() => {
                dialogs.alert("No Results", "No movies found for your search.");
                LoadState::Empty(MSG_NO_RESULTS.to_string())
            }
            Ok(results) => LoadState::Success(results),
            Err(e) => {
                tracing::error!(query = %self.query, error = %e, "Search failed");
                LoadState::Error(MSG_SEARCH_FAILED.to_string())
            }
        };
    }
}
