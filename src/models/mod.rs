// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod movie;
pub mod search;
pub mod user;
pub mod wishlist;

pub use movie::Movie;
pub use search::{ProductionCountry, SearchResult};
pub use user::UserProfile;
pub use wishlist::{Rating, WishlistEntry};

/// Shown wherever a movie has no image of its own.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// Text used for missing values.
pub const NOT_AVAILABLE: &str = "N/A";
