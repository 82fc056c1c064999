// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen controllers, navigation, and shared screen state.
//!
//! Each screen owns its form/list state and talks to the collaborators in
//! [`crate::AppContext`]. Screens never navigate themselves; they return a
//! [`NavAction`] that the front end applies to its [`Navigator`].

pub mod catalog;
pub mod profile;
pub mod search;
pub mod session_gate;
pub mod sign_in;
pub mod sign_up;
pub mod wishlist;

pub use catalog::CatalogScreen;
pub use profile::ProfileScreen;
pub use search::SearchScreen;
pub use session_gate::SessionGate;
pub use sign_in::SignInScreen;
pub use sign_up::SignUpScreen;
pub use wishlist::WishlistScreen;

use async_trait::async_trait;

/// Tabs of the signed-in area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Search,
    Wishlist,
    Profile,
}

/// Every screen the app can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Splash shown until the first auth state arrives
    AuthLoading,
    SignIn,
    SignUp,
    Main(Tab),
}

/// Navigation requested by a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Push a route (or switch tab inside `Main`).
    Navigate(Route),
    /// Replace the current route.
    Replace(Route),
    /// Clear history and show the route.
    Reset(Route),
    Back,
}

/// Route history stack.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Route::AuthLoading],
        }
    }
}

impl Navigator {
    pub fn current(&self) -> Route {
        // The stack is never empty.
        self.stack.last().copied().unwrap_or(Route::AuthLoading)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn apply(&mut self, action: NavAction) -> Route {
        match action {
            NavAction::Navigate(route) => self.navigate(route),
            NavAction::Replace(route) => self.replace(route),
            NavAction::Reset(route) => self.reset(route),
            NavAction::Back => self.back(),
        }
        tracing::debug!(route = ?self.current(), depth = self.depth(), "Navigated");
        self.current()
    }

    /// Push `route`. Tab switches inside `Main` replace instead of stacking.
    pub fn navigate(&mut self, route: Route) {
        match (self.current(), route) {
            (current, next) if current == next => {}
            (Route::Main(_), Route::Main(_)) => self.replace(route),
            _ => self.stack.push(route),
        }
    }

    pub fn replace(&mut self, route: Route) {
        self.stack.pop();
        self.stack.push(route);
    }

    pub fn reset(&mut self, route: Route) {
        self.stack.clear();
        self.stack.push(route);
    }

    /// Pop one route. The root route stays.
    pub fn back(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
}

/// Screen data lifecycle, re-entered on every activation.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Success(T),
    /// Nothing to show, with the message to show instead.
    Empty(String),
    Error(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Message of an `Empty` or `Error` state.
    pub fn message(&self) -> Option<&str> {
        match self {
            LoadState::Empty(msg) | LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Modal dialogs provided by the front end.
#[async_trait]
pub trait Dialogs: Send + Sync {
    /// Ask for confirmation. `false` means cancelled.
    async fn confirm(&self, title: &str, message: &str) -> bool;

    /// Show an informational alert.
    fn alert(&self, title: &str, message: &str);
}
