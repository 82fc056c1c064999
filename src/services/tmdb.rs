// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TMDB (The Movie Database) API client for movie search.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ProductionCountry, SearchResult};
use async_trait::async_trait;
use serde::Deserialize;

/// Operations the app needs from the movie metadata API.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Search movies by title. `None` when the response carries no results.
    async fn search_movies(&self, query: &str) -> Result<Option<Vec<SearchResult>>, AppError>;

    /// Production countries from the per-movie details.
    async fn production_countries(&self, movie_id: u64)
        -> Result<Vec<ProductionCountry>, AppError>;
}

/// Search response envelope.
#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

/// The subset of `/movie/{id}` we use.
#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    #[serde(default)]
    production_countries: Vec<ProductionCountry>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct TmdbError {
    status_message: String,
}

/// TMDB REST client.
#[derive(Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.tmdb_base_url, &config.tmdb_api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::MovieApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbError>(&body)
                .map(|e| e.status_message)
                .unwrap_or(body);

            if status.as_u16() == 429 {
                tracing::warn!("TMDB rate limit hit (429)");
            }
            if status.as_u16() == 404 {
                return Err(AppError::NotFound(format!("TMDB {}: {}", path, message)));
            }
            return Err(AppError::MovieApi(format!("HTTP {}: {}", status, message)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::MovieApi(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl MovieApi for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Option<Vec<SearchResult>>, AppError> {
        let response: TmdbSearchResponse = self
            .get_json("/search/movie", &[("query", query)])
            .await?;

        tracing::debug!(
            query,
            count = response.results.as_ref().map(Vec::len).unwrap_or(0),
            "TMDB search complete"
        );
        Ok(response.results)
    }

    async fn production_countries(
        &self,
        movie_id: u64,
    ) -> Result<Vec<ProductionCountry>, AppError> {
        let path = format!("/movie/{}", movie_id);
        let details: TmdbMovieDetails = self.get_json(&path, &[]).await?;
        Ok(details.production_countries)
    }
}
