//! Route guards: which screen a session may see, and where to send it otherwise.

use std::fmt;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated entry point.
    Login,
    /// Authenticated landing page (the user list).
    Home,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "login"),
            Route::Home => write!(f, "home"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Render,
    Redirect(Route),
}

/// Only lets authenticated sessions through.
pub fn protected(session: &Session) -> Access {
    if session.is_authenticated() {
        Access::Render
    } else {
        Access::Redirect(Route::Login)
    }
}

/// Only lets unauthenticated sessions through.
pub fn public(session: &Session) -> Access {
    if session.is_authenticated() {
        Access::Redirect(Route::Home)
    } else {
        Access::Render
    }
}

/// Where a fresh console session should start.
pub fn entry_route(session: &Session) -> Route {
    match public(session) {
        Access::Render => Route::Login,
        Access::Redirect(route) => route,
    }
}
