//! Page routes
//!
//! Four pages addressed by hash path. The dashboard needs a session and the
//! login page is skipped when one exists.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    Home,
    Library,
    AdminLogin,
    AdminDashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Library => "/library",
            Route::AdminLogin => "/admin/login",
            Route::AdminDashboard => "/admin",
        }
    }

    /// Map a path to a page; anything unknown is the home page
    pub fn parse(path: &str) -> Self {
        let path = path.trim().trim_start_matches('#');
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        match path {
            "/library" => Route::Library,
            "/admin/login" => Route::AdminLogin,
            "/admin" => Route::AdminDashboard,
            _ => Route::Home,
        }
    }

    /// The page actually shown for `path`, given whether someone is logged in
    pub fn resolve(path: &str, logged_in: bool) -> Self {
        match (Self::parse(path), logged_in) {
            (Route::AdminDashboard, false) => Route::AdminLogin,
            (Route::AdminLogin, true) => Route::AdminDashboard,
            (route, _) => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
