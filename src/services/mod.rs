// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - collaborator clients and business logic.

pub mod identity;
pub mod search;
pub mod tmdb;
pub mod wishlist;

pub use identity::{FirebaseAuth, IdentityProvider, LocalIdentity, Session};
pub use search::SearchService;
pub use tmdb::{MovieApi, TmdbClient};
pub use wishlist::{AddOutcome, WishlistService};
