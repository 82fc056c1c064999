// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist entry model.

use serde::{Deserialize, Serialize};

use super::movie::non_empty;
use super::{Movie, NOT_AVAILABLE, PLACEHOLDER_IMAGE_URL};

/// Rating as stored in a wishlist entry: the catalog score, or "N/A" text
/// when the catalog had none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Text(String),
}

impl Rating {
    pub fn display(&self) -> String {
        match self {
            Rating::Score(score) => format!("{:.1}", score),
            Rating::Text(text) => text.clone(),
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating::Text(NOT_AVAILABLE.to_string())
    }
}

/// Denormalized movie copy stored at `users/{uid}/wishlist/{movieId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Catalog movie ID. Written into the body for the duplicate lookup,
    /// but on read the document key wins.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "movieName")]
    pub movie_name: String,
    pub genre: String,
    #[serde(default)]
    pub rating: Rating,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl WishlistEntry {
    /// Snapshot the catalog fields at insertion time.
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            id: movie.id.clone(),
            movie_name: non_empty(&movie.movie_name)
                .unwrap_or("No Title")
                .to_string(),
            genre: non_empty(&movie.genre).unwrap_or("No Genre").to_string(),
            rating: movie.rating.map(Rating::Score).unwrap_or_default(),
            release_date: non_empty(&movie.release_date)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            image_url: non_empty(&movie.image_url)
                .unwrap_or(PLACEHOLDER_IMAGE_URL)
                .to_string(),
        }
    }

    /// Key the entry by the ID of the document it was read from.
    pub(crate) fn keyed_by(mut self, doc_id: &str) -> Self {
        self.id = doc_id.to_string();
        self
    }
}
