// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Search result model (TMDB projection, never persisted).

use serde::{Deserialize, Serialize};

use super::NOT_AVAILABLE;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Production country from the TMDB movie details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

/// One movie from a TMDB search, enriched with its production countries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Empty until enriched, or when the details call failed
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
}

impl SearchResult {
    /// Year part of the release date.
    pub fn release_year(&self) -> &str {
        self.release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .and_then(|d| d.split('-').next())
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", POSTER_BASE_URL, p))
    }

    pub fn overview(&self) -> &str {
        self.overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }

    /// TMDB uses 0 for "no votes", which displays as "N/A".
    pub fn display_rating(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{}", v),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn country_names(&self) -> String {
        if self.production_countries.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        self.production_countries
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
