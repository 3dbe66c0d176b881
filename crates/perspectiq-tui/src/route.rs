//! Screens and the authentication guard.

use std::fmt;

/// One screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Landing,
    Login,
    Dashboard,
    Setup,
    Chat(i64),
    Summary(i64),
}

impl Route {
    /// Parses a path such as `/chat/42`. Unknown paths resolve to `Landing`.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["login"] => Route::Login,
            ["dashboard"] => Route::Dashboard,
            ["setup"] => Route::Setup,
            ["chat", id] => id.parse().map_or(Route::Landing, Route::Chat),
            ["summary", id] => id.parse().map_or(Route::Landing, Route::Summary),
            _ => Route::Landing,
        }
    }

    /// Routes that require stored credentials.
    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Landing | Route::Login)
    }

    /// Route to actually show for `self` given the auth status.
    pub fn guard(self, authenticated: bool) -> Self {
        if self.is_protected() && !authenticated {
            Route::Login
        } else {
            self
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Landing => "Welcome",
            Route::Login => "Access Terminal",
            Route::Dashboard => "Dashboard",
            Route::Setup => "New Simulation",
            Route::Chat(_) => "Simulation",
            Route::Summary(_) => "Analysis",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Landing => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Dashboard => write!(f, "/dashboard"),
            Route::Setup => write!(f, "/setup"),
            Route::Chat(id) => write!(f, "/chat/{id}"),
            Route::Summary(id) => write!(f, "/summary/{id}"),
        }
    }
}
