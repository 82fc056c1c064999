// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use movie_wishlist::config::Config;
use movie_wishlist::db::{FirestoreDb, MemoryStore, MovieStore, WishlistSubscription};
use movie_wishlist::error::AppError;
use movie_wishlist::models::{Movie, ProductionCountry, SearchResult, UserProfile, WishlistEntry};
use movie_wishlist::screens::Dialogs;
use movie_wishlist::services::{IdentityProvider, LocalIdentity, MovieApi, Session};
use movie_wishlist::AppContext;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::watch;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::create_emulator_client("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Catalog movie with every field set.
#[allow(dead_code)]
pub fn movie(id: &str, name: &str) -> Movie {
    Movie {
        id: id.to_string(),
        movie_name: Some(name.to_string()),
        genre: Some("Drama".to_string()),
        rating: Some(7.5),
        release_date: Some("2001-01-01".to_string()),
        director: Some("Someone".to_string()),
        description: Some(format!("About {}", name)),
        image_url: Some(format!("https://example.com/{}.jpg", id)),
    }
}

#[allow(dead_code)]
pub fn search_result(id: u64, title: &str) -> SearchResult {
    SearchResult {
        id,
        title: title.to_string(),
        release_date: Some("1999-03-30".to_string()),
        overview: Some(format!("Overview of {}", title)),
        vote_average: Some(8.2),
        poster_path: Some(format!("/{}.jpg", id)),
        production_countries: Vec::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test environment
// ─────────────────────────────────────────────────────────────────────────────

/// Context wired to in-memory collaborators, plus handles to inspect them.
#[allow(dead_code)]
pub struct TestEnv {
    pub ctx: AppContext,
    pub identity: Arc<CountingIdentity>,
    pub store: Arc<RecordingStore>,
    pub api: Arc<FakeMovieApi>,
}

#[allow(dead_code)]
impl TestEnv {
    /// Register an account and sign it in. Returns the uid.
    pub async fn signed_in(&self, email: &str) -> String {
        self.identity
            .inner
            .add_account(email, "secret123")
            .expect("Failed to add account");
        self.identity
            .inner
            .sign_in(email, "secret123")
            .await
            .expect("Failed to sign in")
            .uid
    }
}

#[allow(dead_code)]
pub fn test_env() -> TestEnv {
    test_env_with(&[movie("m1", "First Movie"), movie("m2", "Second Movie")])
}

#[allow(dead_code)]
pub fn test_env_with(movies: &[Movie]) -> TestEnv {
    let identity = Arc::new(CountingIdentity::default());
    let store = Arc::new(RecordingStore::new(
        MemoryStore::with_movies(movies).expect("Failed to seed movies"),
    ));
    let api = Arc::new(FakeMovieApi::default());

    let ctx = AppContext::new(
        Config::test_default(),
        identity.clone(),
        store.clone(),
        api.clone(),
    );

    TestEnv {
        ctx,
        identity,
        store,
        api,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialogs
// ─────────────────────────────────────────────────────────────────────────────

/// Dialogs with scripted confirm answers. Confirms default to "yes" once the
/// script runs out.
#[derive(Default)]
pub struct ScriptedDialogs {
    answers: Mutex<VecDeque<bool>>,
    pub confirms: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(answers: &[bool]) -> Self {
        let dialogs = Self::default();
        dialogs.answers.lock().unwrap().extend(answers);
        dialogs
    }

    pub fn alert_titles(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }

    pub fn last_alert(&self) -> Option<(String, String)> {
        self.alerts.lock().unwrap().last().cloned()
    }

    pub fn confirm_count(&self) -> usize {
        self.confirms.lock().unwrap().len()
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn confirm(&self, _title: &str, message: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().unwrap_or(true)
    }

    fn alert(&self, title: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Local identity that counts calls reaching the provider.
#[derive(Default)]
pub struct CountingIdentity {
    pub inner: LocalIdentity,
    pub sign_in_calls: AtomicUsize,
    pub sign_up_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingIdentity {
    pub fn calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst) + self.sign_up_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for CountingIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign_in(email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AppError> {
        self.sign_up_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign_up(email, password).await
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.inner.sign_out().await
    }

    async fn id_token(&self) -> Result<Option<String>, AppError> {
        self.inner.id_token().await
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.subscribe()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Memory store with switchable failures and a write counter.
pub struct RecordingStore {
    pub inner: MemoryStore,
    pub fail_movies: AtomicBool,
    pub fail_profile_writes: AtomicBool,
    pub fail_lookups: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub wishlist_writes: AtomicUsize,
}

#[allow(dead_code)]
impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_movies: AtomicBool::new(false),
            fail_profile_writes: AtomicBool::new(false),
            fail_lookups: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            wishlist_writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.wishlist_writes.load(Ordering::SeqCst)
    }
}

fn unavailable() -> AppError {
    AppError::Database("unavailable".to_string())
}

#[async_trait]
impl MovieStore for RecordingStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, AppError> {
        if self.fail_movies.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.list_movies().await
    }

    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.inner.get_profile(uid).await
    }

    async fn set_profile(&self, uid: &str, profile: &UserProfile) -> Result<(), AppError> {
        if self.fail_profile_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.set_profile(uid, profile).await
    }

    async fn find_wishlist_entry(
        &self,
        uid: &str,
        movie_id: &str,
    ) -> Result<Option<WishlistEntry>, AppError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.find_wishlist_entry(uid, movie_id).await
    }

    async fn set_wishlist_entry(&self, uid: &str, entry: &WishlistEntry) -> Result<(), AppError> {
        self.wishlist_writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_wishlist_entry(uid, entry).await
    }

    async fn delete_wishlist_entry(&self, uid: &str, movie_id: &str) -> Result<(), AppError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.delete_wishlist_entry(uid, movie_id).await
    }

    async fn list_wishlist(&self, uid: &str) -> Result<Vec<WishlistEntry>, AppError> {
        self.inner.list_wishlist(uid).await
    }

    async fn watch_wishlist(&self, uid: &str) -> Result<WishlistSubscription, AppError> {
        self.inner.watch_wishlist(uid).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Movie API
// ─────────────────────────────────────────────────────────────────────────────

/// Canned movie API.
#[derive(Default)]
pub struct FakeMovieApi {
    pub results: Mutex<Option<Vec<SearchResult>>>,
    pub countries: Mutex<HashMap<u64, Vec<ProductionCountry>>>,
    pub failing_details: Mutex<HashSet<u64>>,
    pub fail_search: AtomicBool,
    pub search_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeMovieApi {
    pub fn set_results(&self, results: Option<Vec<SearchResult>>) {
        *self.results.lock().unwrap() = results;
    }

    pub fn set_countries(&self, movie_id: u64, names: &[(&str, &str)]) {
        let countries = names
            .iter()
            .map(|(iso, name)| ProductionCountry {
                iso_3166_1: iso.to_string(),
                name: name.to_string(),
            })
            .collect();
        self.countries.lock().unwrap().insert(movie_id, countries);
    }

    pub fn fail_details_for(&self, movie_id: u64) {
        self.failing_details.lock().unwrap().insert(movie_id);
    }
}

#[async_trait]
impl MovieApi for FakeMovieApi {
    async fn search_movies(&self, _query: &str) -> Result<Option<Vec<SearchResult>>, AppError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(AppError::MovieApi("HTTP 503: unavailable".to_string()));
        }
        Ok(self.results.lock().unwrap().clone())
    }

    async fn production_countries(
        &self,
        movie_id: u64,
    ) -> Result<Vec<ProductionCountry>, AppError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.lock().unwrap().contains(&movie_id) {
            return Err(AppError::MovieApi("HTTP 500: boom".to_string()));
        }
        Ok(self
            .countries
            .lock()
            .unwrap()
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP stub
// ─────────────────────────────────────────────────────────────────────────────

/// Minimal HTTP server answering every request through `respond`, which
/// gets the request line and body and returns a status and JSON body.
#[allow(dead_code)]
pub struct StubServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
pub async fn stub_server<F>(respond: F) -> StubServer
where
    F: Fn(&str, &str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("No local address");
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let seen = requests.clone();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let seen = seen.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let Some((request_line, body)) = read_request(&mut stream).await else {
                    return;
                };
                seen.lock().unwrap().push(format!("{}\n{}", request_line, body));

                let (status, payload) = respond(&request_line, &body);
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    payload.len(),
                    payload
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    StubServer {
        base_url: format!("http://{}", addr),
        requests,
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = head_end + 4;
        if buf.len() >= body_start + content_length {
            let request_line = head.lines().next().unwrap_or_default().to_string();
            let body = String::from_utf8_lossy(&buf[body_start..body_start + content_length])
                .to_string();
            return Some((request_line, body));
        }
    }
}
