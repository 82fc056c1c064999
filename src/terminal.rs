// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Line-oriented terminal front end.
//!
//! Renders the current route to stdout, reads commands from stdin, and
//! applies the navigation returned by the screens. Dialogs read their answer
//! from the same input stream.

use crate::models::{Movie, SearchResult, WishlistEntry};
use crate::screens::{
    CatalogScreen, Dialogs, LoadState, NavAction, Navigator, ProfileScreen, Route, SearchScreen,
    SessionGate, SignInScreen, SignUpScreen, Tab, WishlistScreen,
};
use crate::AppContext;
use async_trait::async_trait;
use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

const HELP: &str = "\
Commands:
  login                 sign in
  signup                create an account
  home | search <title> | wishlist | profile
                        switch tab
  add <n>               add catalog movie n to your wishlist
  remove <n>            remove wishlist entry n
  refresh               reload the current tab
  logout                sign out
  back                  go back
  help                  show this help
  quit                  exit";

/// Parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    SignUp,
    Home,
    Search(String),
    Wishlist,
    Profile,
    /// 1-based list position
    Add(usize),
    /// 1-based list position
    Remove(usize),
    Refresh,
    Logout,
    Back,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let index = |rest: &str| rest.parse::<usize>().ok().filter(|n| *n > 0);

        Some(match word.to_ascii_lowercase().as_str() {
            "login" | "signin" => Command::Login,
            "signup" | "register" => Command::SignUp,
            "home" | "movies" => Command::Home,
            "search" => Command::Search(rest.to_string()),
            "wishlist" => Command::Wishlist,
            "profile" => Command::Profile,
            "add" => match index(rest) {
                Some(n) => Command::Add(n),
                None => Command::Unknown(line.to_string()),
            },
            "remove" | "rm" => match index(rest) {
                Some(n) => Command::Remove(n),
                None => Command::Unknown(line.to_string()),
            },
            "refresh" => Command::Refresh,
            "logout" | "signout" => Command::Logout,
            "back" => Command::Back,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        })
    }
}

/// Dialogs answered on stdin.
pub struct TerminalDialogs {
    input: InputLines,
}

#[async_trait]
impl Dialogs for TerminalDialogs {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        print!("{}: {} [y/N] ", title, message);
        let _ = std::io::stdout().flush();

        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }

    fn alert(&self, title: &str, message: &str) {
        println!("\n== {} ==\n{}\n", title, message);
    }
}

enum Input {
    Line(std::io::Result<Option<String>>),
    Nav(NavAction),
    WishlistChanged,
}

/// Terminal application state.
pub struct Terminal {
    ctx: AppContext,
    input: InputLines,
    dialogs: TerminalDialogs,
    nav: Navigator,
    gate: SessionGate,
    sign_in: SignInScreen,
    sign_up: SignUpScreen,
    catalog: CatalogScreen,
    search: SearchScreen,
    wishlist: WishlistScreen,
    profile: ProfileScreen,
}

impl Terminal {
    pub fn new(ctx: AppContext) -> Self {
        let input: InputLines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
        let gate = SessionGate::mount(ctx.identity.as_ref());
        Self {
            dialogs: TerminalDialogs {
                input: input.clone(),
            },
            input,
            ctx,
            nav: Navigator::default(),
            gate,
            sign_in: SignInScreen::new(),
            sign_up: SignUpScreen::new(),
            catalog: CatalogScreen::new(),
            search: SearchScreen::new(),
            wishlist: WishlistScreen::new(),
            profile: ProfileScreen::new(),
        }
    }

    /// Run until `quit` or end of input.
    pub async fn run(mut self) -> anyhow::Result<()> {
        println!("{}", render_route_title(self.nav.current()));

        // Stay on the splash until the first auth state arrives.
        if let Some(action) = self.gate.next().await {
            self.go(action).await;
        }

        loop {
            self.render();

            let watching =
                self.nav.current() == Route::Main(Tab::Wishlist) && self.wishlist.is_subscribed();
            let input = self.input.clone();
            let read_line = async move { input.lock().await.next_line().await };

            let event = tokio::select! {
                line = read_line => Input::Line(line),
                Some(action) = self.gate.next() => Input::Nav(action),
                true = self.wishlist.next_update(), if watching => Input::WishlistChanged,
            };

            match event {
                Input::Line(Ok(None)) => break,
                Input::Line(Err(e)) => return Err(e.into()),
                Input::Line(Ok(Some(line))) => {
                    let Some(command) = Command::parse(&line) else {
                        continue;
                    };
                    if command == Command::Quit {
                        break;
                    }
                    self.handle(command).await?;
                }
                Input::Nav(action) => self.go(action).await,
                Input::WishlistChanged => {
                    // Apply whatever else arrived with the change that woke us up.
                    let applied = self.wishlist.drain_updates();
                    tracing::debug!(applied, "Applied queued wishlist changes");
                }
            }
        }

        self.wishlist.deactivate();
        Ok(())
    }

    async fn handle(&mut self, command: Command) -> anyhow::Result<()> {
        let route = self.nav.current();
        let signed_in = matches!(route, Route::Main(_));

        match command {
            Command::Help => println!("{}", HELP),
            Command::Back => self.go(NavAction::Back).await,
            Command::Login if route == Route::SignIn => {
                self.sign_in.form.email = self.prompt("Email: ").await?;
                self.sign_in.form.password = self.prompt("Password: ").await?;
                if let Some(action) = self.sign_in.submit(&self.ctx).await {
                    self.go(action).await;
                }
            }
            Command::SignUp if route == Route::SignIn => {
                let action = self.sign_in.go_to_sign_up();
                self.go(action).await;
            }
            Command::SignUp if route == Route::SignUp => {
                let form = &mut self.sign_up.form;
                form.name = prompt_line(&self.input, "Name: ").await?;
                form.phone_number = prompt_line(&self.input, "Phone number: ").await?;
                form.address = prompt_line(&self.input, "Address: ").await?;
                form.email = prompt_line(&self.input, "Email: ").await?;
                form.password = prompt_line(&self.input, "Password: ").await?;
                form.confirm_password = prompt_line(&self.input, "Confirm password: ").await?;
                if let Some(action) = self.sign_up.submit(&self.ctx, &self.dialogs).await {
                    self.go(action).await;
                }
            }
            Command::Home if signed_in => {
                self.go(NavAction::Navigate(Route::Main(Tab::Home))).await
            }
            Command::Wishlist if signed_in => {
                self.go(NavAction::Navigate(Route::Main(Tab::Wishlist))).await
            }
            Command::Profile if signed_in => {
                self.go(NavAction::Navigate(Route::Main(Tab::Profile))).await
            }
            Command::Search(query) if signed_in => {
                self.go(NavAction::Navigate(Route::Main(Tab::Search))).await;
                if !query.is_empty() {
                    self.search.query = query;
                    self.search.submit(&self.ctx, &self.dialogs).await;
                }
            }
            Command::Add(n) if route == Route::Main(Tab::Home) => {
                match self.catalog.movie(n - 1).cloned() {
                    Some(movie) => {
                        self.catalog
                            .add_to_wishlist(&self.ctx, &self.dialogs, &movie)
                            .await;
                    }
                    None => println!("No movie #{}", n),
                }
            }
            Command::Remove(n) if route == Route::Main(Tab::Wishlist) => {
                match self.wishlist.entry(n - 1).map(|e| e.id.clone()) {
                    Some(movie_id) => {
                        self.wishlist
                            .remove(&self.ctx, &self.dialogs, &movie_id)
                            .await;
                    }
                    None => println!("No wishlist entry #{}", n),
                }
            }
            Command::Refresh if signed_in => self.activate(route).await,
            Command::Logout if signed_in => {
                if let Some(action) = self.profile.sign_out(&self.ctx, &self.dialogs).await {
                    self.go(action).await;
                }
            }
            Command::Unknown(line) => println!("Unknown command: {} (try `help`)", line),
            other => println!("`{:?}` is not available here (try `help`)", other),
        }
        Ok(())
    }

    /// Apply navigation and activate the new route if it changed.
    async fn go(&mut self, action: NavAction) {
        let before = self.nav.current();
        let after = self.nav.apply(action);
        if before == after {
            return;
        }

        if before == Route::Main(Tab::Wishlist) {
            self.wishlist.deactivate();
        }
        self.activate(after).await;
    }

    async fn activate(&mut self, route: Route) {
        match route {
            Route::Main(Tab::Home) => self.catalog.load(&self.ctx).await,
            Route::Main(Tab::Wishlist) => self.wishlist.activate(&self.ctx).await,
            Route::Main(Tab::Profile) => self.profile.load(&self.ctx).await,
            Route::SignIn => self.sign_in = SignInScreen::new(),
            Route::SignUp => self.sign_up = SignUpScreen::new(),
            Route::Main(Tab::Search) | Route::AuthLoading => {}
        }
    }

    async fn prompt(&self, label: &str) -> anyhow::Result<String> {
        prompt_line(&self.input, label).await
    }

    fn render(&self) {
        let route = self.nav.current();
        let body = match route {
            Route::AuthLoading => String::new(),
            Route::SignIn => {
                render_form_error(self.sign_in.error.as_deref(), "Type `login` or `signup`.")
            }
            Route::SignUp => render_form_error(
                self.sign_up.error.as_deref(),
                "Type `signup` to fill in the form, or `back`.",
            ),
            Route::Main(Tab::Home) => render_catalog(&self.catalog.state),
            Route::Main(Tab::Search) => render_search(&self.search.state),
            Route::Main(Tab::Wishlist) => render_wishlist(&self.wishlist.state),
            Route::Main(Tab::Profile) => render_profile(&self.profile),
        };
        println!("\n{}\n{}", render_route_title(route), body);
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}

async fn prompt_line(input: &InputLines, label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(input.lock().await.next_line().await?.unwrap_or_default())
}

pub fn render_route_title(route: Route) -> &'static str {
    match route {
        Route::AuthLoading => "Loading...",
        Route::SignIn => "== Sign In ==",
        Route::SignUp => "== Sign Up ==",
        Route::Main(Tab::Home) => "== Movies ==",
        Route::Main(Tab::Search) => "== Search ==",
        Route::Main(Tab::Wishlist) => "== Wishlist ==",
        Route::Main(Tab::Profile) => "== Profile ==",
    }
}

fn render_form_error(error: Option<&str>, hint: &str) -> String {
    match error {
        Some(error) => format!("Error: {}\n{}", error, hint),
        None => hint.to_string(),
    }
}

fn render_state<T>(state: &LoadState<T>, render: impl FnOnce(&T) -> String) -> String {
    match state {
        LoadState::Idle => String::new(),
        LoadState::Loading => "Loading...".to_string(),
        LoadState::Success(data) => render(data),
        LoadState::Empty(msg) | LoadState::Error(msg) => msg.clone(),
    }
}

pub fn render_catalog(state: &LoadState<Vec<Movie>>) -> String {
    render_state(state, |movies| {
        let mut out = String::new();
        for (i, movie) in movies.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, movie.title());
            let _ = writeln!(out, "   Release Date: {}", movie.release_date());
            let _ = writeln!(out, "   Genre: {}", movie.genre());
            let _ = writeln!(out, "   Director: {}", movie.director());
            let _ = writeln!(out, "   Description: {}", movie.description());
            let _ = writeln!(out, "   IMDb Rating: {}", movie.display_rating());
            let _ = writeln!(out, "   Image: {}", movie.image_url());
        }
        out
    })
}

pub fn render_wishlist(state: &LoadState<Vec<WishlistEntry>>) -> String {
    render_state(state, |entries| {
        let mut out = String::new();
        for (i, entry) in entries.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, entry.movie_name);
            let _ = writeln!(out, "   Release Date: {}", entry.release_date);
            let _ = writeln!(out, "   Genre: {}", entry.genre);
            let _ = writeln!(out, "   IMDb Rating: {}", entry.rating.display());
            let _ = writeln!(out, "   Image: {}", entry.image_url);
        }
        out
    })
}

pub fn render_search(state: &LoadState<Vec<SearchResult>>) -> String {
    render_state(state, |results| {
        let mut out = String::new();
        for result in results {
            let _ = writeln!(out, "* {}", result.title);
            let _ = writeln!(out, "   Release Year: {}", result.release_year());
            let _ = writeln!(out, "   Overview: {}", result.overview());
            let _ = writeln!(out, "   Rating: {}", result.display_rating());
            let _ = writeln!(out, "   Countries: {}", result.country_names());
            let _ = writeln!(
                out,
                "   Poster: {}",
                result.poster_url().unwrap_or_else(|| "No Image".to_string())
            );
        }
        out
    })
}

fn render_profile(screen: &ProfileScreen) -> String {
    let header = format!("User ID: {}", screen.uid.as_deref().unwrap_or("No user signed in"));
    let body = render_state(&screen.state, |profile| {
        format!(
            "Name: {}\nEmail: {}\nPhone: {}\nAddress: {}",
            profile.name, profile.email, profile.phone_number, profile.address
        )
    });
    format!("{}\n{}", header, body)
}
