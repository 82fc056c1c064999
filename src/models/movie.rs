// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog movie model.

use serde::{Deserialize, Serialize};

use super::{NOT_AVAILABLE, PLACEHOLDER_IMAGE_URL};

/// Movie document from the `movies` collection.
///
/// The catalog is maintained outside this app, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Document ID
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    #[serde(rename = "movieName", default)]
    pub movie_name: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Free-form release date as entered in the catalog
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(rename = "movieDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
}

impl Movie {
    pub fn title(&self) -> &str {
        non_empty(&self.movie_name).unwrap_or("No Title")
    }

    pub fn genre(&self) -> &str {
        non_empty(&self.genre).unwrap_or("No Genre")
    }

    pub fn director(&self) -> &str {
        non_empty(&self.director).unwrap_or("No Director")
    }

    pub fn description(&self) -> &str {
        non_empty(&self.description).unwrap_or("No Description")
    }

    pub fn release_date(&self) -> &str {
        non_empty(&self.release_date).unwrap_or(NOT_AVAILABLE)
    }

    pub fn image_url(&self) -> &str {
        non_empty(&self.image_url).unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    /// Rating with one decimal, or "N/A".
    pub fn display_rating(&self) -> String {
        self.rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Treats empty strings like missing values.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
