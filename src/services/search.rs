// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Movie search with per-result detail enrichment.

use crate::error::AppError;
use crate::models::SearchResult;
use crate::services::tmdb::MovieApi;
use futures_util::{stream, StreamExt};
use std::sync::Arc;

/// Upper bound on detail requests in flight for one search.
const MAX_CONCURRENT_DETAIL_CALLS: usize = 8;

/// Searches the movie API and merges production countries into each result.
#[derive(Clone)]
pub struct SearchService {
    api: Arc<dyn MovieApi>,
    enrich: bool,
}

impl SearchService {
    pub fn new(api: Arc<dyn MovieApi>, enrich: bool) -> Self {
        Self { api, enrich }
    }

    /// Search by raw title query.
    ///
    /// Returns an empty list when the API has no results. A failed details
    /// call leaves that result with no production countries; only a failed
    /// search fails the whole operation.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AppError> {
        let results = self.api.search_movies(query).await?.unwrap_or_default();
        if results.is_empty() || !self.enrich {
            return Ok(results);
        }

        let api = &self.api;
        let enriched = stream::iter(results)
            .map(|mut result| async move {
                match api.production_countries(result.id).await {
                    Ok(countries) => result.production_countries = countries,
                    Err(e) => {
                        tracing::warn!(
                            movie_id = result.id,
                            error = %e,
                            "Movie details unavailable, showing result without countries"
                        );
                        result.production_countries = Vec::new();
                    }
                }
                result
            })
            // `buffered` keeps the API's relevance order.
            .buffered(MAX_CONCURRENT_DETAIL_CALLS)
            .collect::<Vec<SearchResult>>()
            .await;

        tracing::info!(query, count = enriched.len(), "Search complete");
        Ok(enriched)
    }
}
