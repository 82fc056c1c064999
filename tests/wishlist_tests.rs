// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wishlist tests: duplicate check, live subscription, removal.

use movie_wishlist::db::MovieStore;
use movie_wishlist::models::{Movie, Rating, WishlistEntry};
use movie_wishlist::screens::{CatalogScreen, LoadState, WishlistScreen};
use movie_wishlist::services::{AddOutcome, IdentityProvider};
use std::sync::atomic::Ordering;
use std::time::Duration;

mod common;
use common::{movie, test_env, ScriptedDialogs};

const UPDATE_TIMEOUT: Duration = Duration::from_secs(2);

fn entry_ids(screen: &WishlistScreen) -> Vec<String> {
    screen
        .state
        .data()
        .map(|entries| entries.iter().map(|e| e.id.clone()).collect())
        .unwrap_or_default()
}

/// Wait until a pushed change has been applied.
async fn next_update(screen: &mut WishlistScreen) {
    let applied = tokio::time::timeout(UPDATE_TIMEOUT, screen.next_update())
        .await
        .expect("Timed out waiting for wishlist update");
    assert!(applied, "Subscription ended unexpectedly");
}

// ═══════════════════════════════════════════════════════════════════════════
// ADD
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_adding_existing_movie_does_not_write() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    let dialogs = ScriptedDialogs::new();
    let catalog = CatalogScreen::new();
    let m1 = movie("m1", "First Movie");

    let outcome = catalog.add_to_wishlist(&env.ctx, &dialogs, &m1).await;
    assert_eq!(outcome, Some(AddOutcome::Added));
    assert_eq!(env.store.writes(), 1);

    let outcome = catalog.add_to_wishlist(&env.ctx, &dialogs, &m1).await;
    assert_eq!(outcome, Some(AddOutcome::AlreadyExists));
    assert_eq!(env.store.writes(), 1, "second add must not write");
    assert_eq!(
        dialogs.alert_titles(),
        vec!["Added to Wishlist", "Already in Wishlist"]
    );

    assert_eq!(env.store.list_wishlist(&uid).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancelled_confirm_does_nothing() {
    let env = test_env();
    env.signed_in("ada@example.com").await;
    let dialogs = ScriptedDialogs::answering(&[false]);

    let outcome = CatalogScreen::new()
        .add_to_wishlist(&env.ctx, &dialogs, &movie("m1", "First Movie"))
        .await;

    assert_eq!(outcome, None);
    assert_eq!(dialogs.confirm_count(), 1);
    assert_eq!(env.store.writes(), 0);
    assert!(dialogs.alerts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_lookup_falls_through_to_keyed_write() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    let dialogs = ScriptedDialogs::new();
    let m1 = movie("m1", "First Movie");

    env.ctx.wishlist.add(&uid, &m1).await.unwrap();
    env.store.fail_lookups.store(true, Ordering::SeqCst);

    // The check fails open, but the write lands on the same document.
    let outcome = CatalogScreen::new()
        .add_to_wishlist(&env.ctx, &dialogs, &m1)
        .await;
    assert_eq!(outcome, Some(AddOutcome::Added));
    assert_eq!(env.store.writes(), 2);
    assert_eq!(env.store.list_wishlist(&uid).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_requires_sign_in() {
    let env = test_env();
    let dialogs = ScriptedDialogs::new();

    let outcome = CatalogScreen::new()
        .add_to_wishlist(&env.ctx, &dialogs, &movie("m1", "First Movie"))
        .await;

    assert_eq!(outcome, None);
    assert_eq!(dialogs.confirm_count(), 0);
    assert_eq!(
        dialogs.last_alert(),
        Some(("Error".to_string(), "Please sign in to continue.".to_string()))
    );
    assert_eq!(env.store.writes(), 0);
}

#[tokio::test]
async fn test_missing_catalog_fields_get_defaults() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    let bare = Movie {
        id: "bare".to_string(),
        ..Movie::default()
    };

    env.ctx.wishlist.add(&uid, &bare).await.unwrap();

    let stored = env
        .store
        .find_wishlist_entry(&uid, "bare")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.movie_name, "No Title");
    assert_eq!(stored.genre, "No Genre");
    assert_eq!(stored.rating, Rating::Text("N/A".to_string()));
    assert_eq!(stored.release_date, "N/A");
    assert_eq!(stored.image_url, "https://via.placeholder.com/150");
}

#[tokio::test]
async fn test_entry_fields_round_trip() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;

    let entry = WishlistEntry {
        id: "m7".to_string(),
        movie_name: "Seven Samurai".to_string(),
        genre: "Action".to_string(),
        rating: Rating::Score(8.6),
        release_date: "1954-04-26".to_string(),
        image_url: "https://example.com/seven.jpg".to_string(),
    };
    env.store.set_wishlist_entry(&uid, &entry).await.unwrap();

    let read_back = env.store.list_wishlist(&uid).await.unwrap();
    assert_eq!(read_back, vec![entry]);
}

// ═══════════════════════════════════════════════════════════════════════════
// LIVE VIEW
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_activate_shows_empty_state() {
    let env = test_env();
    env.signed_in("ada@example.com").await;

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;

    assert_eq!(
        screen.state,
        LoadState::Empty("Your wishlist is empty.".to_string())
    );
    assert!(screen.is_subscribed());
}

#[tokio::test]
async fn test_server_side_changes_reach_subscribed_view() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    env.ctx
        .wishlist
        .add(&uid, &movie("m1", "First Movie"))
        .await
        .unwrap();
    env.ctx
        .wishlist
        .add(&uid, &movie("m2", "Second Movie"))
        .await
        .unwrap();

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;
    let mut ids = entry_ids(&screen);
    ids.sort();
    assert_eq!(ids, vec!["m1", "m2"]);

    // Another client deletes m1; no re-fetch from this side.
    env.store.delete_wishlist_entry(&uid, "m1").await.unwrap();
    next_update(&mut screen).await;
    assert_eq!(entry_ids(&screen), vec!["m2"]);

    // And adds m3.
    env.ctx
        .wishlist
        .add(&uid, &movie("m3", "Third Movie"))
        .await
        .unwrap();
    next_update(&mut screen).await;
    assert_eq!(entry_ids(&screen), vec!["m2", "m3"]);

    env.store.delete_wishlist_entry(&uid, "m2").await.unwrap();
    env.store.delete_wishlist_entry(&uid, "m3").await.unwrap();
    next_update(&mut screen).await;
    next_update(&mut screen).await;
    assert_eq!(
        screen.state.message(),
        Some("Your wishlist is empty.")
    );
}

#[tokio::test]
async fn test_other_users_changes_are_not_delivered() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;

    env.ctx
        .wishlist
        .add("someone-else", &movie("m1", "First Movie"))
        .await
        .unwrap();
    env.ctx
        .wishlist
        .add(&uid, &movie("m2", "Second Movie"))
        .await
        .unwrap();

    next_update(&mut screen).await;
    assert_eq!(entry_ids(&screen), vec!["m2"]);
    assert_eq!(screen.drain_updates(), 0);
}

#[tokio::test]
async fn test_remove_filters_locally_and_on_server() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    env.ctx
        .wishlist
        .add(&uid, &movie("m1", "First Movie"))
        .await
        .unwrap();
    let dialogs = ScriptedDialogs::new();

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;
    assert_eq!(entry_ids(&screen), vec!["m1"]);

    assert!(screen.remove(&env.ctx, &dialogs, "m1").await);
    assert_eq!(
        screen.state,
        LoadState::Empty("Your wishlist is empty.".to_string())
    );
    assert_eq!(dialogs.alert_titles(), vec!["Removed from Wishlist"]);
    assert!(env.store.list_wishlist(&uid).await.unwrap().is_empty());

    // The listener's echo of our own delete leaves the view unchanged.
    next_update(&mut screen).await;
    assert!(screen.state.data().is_none());
}

#[tokio::test]
async fn test_failed_remove_keeps_entry() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    env.ctx
        .wishlist
        .add(&uid, &movie("m1", "First Movie"))
        .await
        .unwrap();
    env.store.fail_deletes.store(true, Ordering::SeqCst);
    let dialogs = ScriptedDialogs::new();

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;

    assert!(!screen.remove(&env.ctx, &dialogs, "m1").await);
    assert_eq!(entry_ids(&screen), vec!["m1"]);
    assert_eq!(
        dialogs.last_alert(),
        Some((
            "Error".to_string(),
            "Failed to remove the movie from your wishlist.".to_string()
        ))
    );
}

#[tokio::test]
async fn test_remove_after_sign_out_is_refused() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    env.ctx
        .wishlist
        .add(&uid, &movie("m1", "First Movie"))
        .await
        .unwrap();
    let dialogs = ScriptedDialogs::new();

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;
    env.ctx.identity.sign_out().await.unwrap();

    assert!(!screen.remove(&env.ctx, &dialogs, "m1").await);
    assert_eq!(dialogs.confirm_count(), 0);
    assert_eq!(
        dialogs.last_alert(),
        Some(("Error".to_string(), "Please sign in to continue.".to_string()))
    );
    assert_eq!(env.store.list_wishlist(&uid).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancelled_remove_keeps_entry() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;
    env.ctx
        .wishlist
        .add(&uid, &movie("m1", "First Movie"))
        .await
        .unwrap();
    let dialogs = ScriptedDialogs::answering(&[false]);

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;

    assert!(!screen.remove(&env.ctx, &dialogs, "m1").await);
    assert_eq!(entry_ids(&screen), vec!["m1"]);
    assert_eq!(env.store.list_wishlist(&uid).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_deactivate_stops_listening() {
    let env = test_env();
    let uid = env.signed_in("ada@example.com").await;

    let mut screen = WishlistScreen::new();
    screen.activate(&env.ctx).await;
    screen.deactivate();
    assert!(!screen.is_subscribed());

    env.ctx
        .wishlist
        .add(&uid, &movie("m1", "First Movie"))
        .await
        .unwrap();
    assert!(!screen.next_update().await);
    assert!(screen.state.data().is_none());
}
