//! Route table and the login guard

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    /// Login screen
    #[default]
    Login,
    Home,
    Trending,
    Favorites,
}

impl Route {
    pub const PROTECTED: [Route; 3] = [Route::Home, Route::Trending, Route::Favorites];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Home => "/home",
            Route::Trending => "/trending",
            Route::Favorites => "/favorites",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/" => Some(Route::Login),
            "/home" => Some(Route::Home),
            "/trending" => Some(Route::Trending),
            "/favorites" => Some(Route::Favorites),
            _ => None,
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Tab label in the header
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Home => "Home",
            Route::Trending => "Trending",
            Route::Favorites => "Favorites",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a navigation to `route` actually lands
pub fn guard(route: Route, authenticated: bool) -> Route {
    if route.requires_auth() && !authenticated {
        tracing::debug!(requested = %route, "Redirecting unauthenticated navigation");
        Route::Login
    } else {
        route
    }
}
