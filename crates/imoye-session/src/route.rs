//! Navigation targets produced by the flows.

use std::fmt;

/// Where the client should go next.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// The landing page.
    Home,
    /// The dashboard, reached through the wizard's back button.
    Dashboard,
    /// A created session, addressed by the backend's display name.
    Session(String),
}

impl Route {
    /// Creates a session route.
    #[must_use]
    pub fn session(display_name: impl Into<String>) -> Self {
        Self::Session(display_name.into())
    }

    /// Returns the URL path for this route.
    ///
    /// # Examples
    ///
    /// ```
    /// use imoye_session::Route;
    ///
    /// assert_eq!(Route::Home.path(), "/");
    /// assert_eq!(Route::session("Notes-abc").path(), "/session/Notes-abc");
    /// ```
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Session(name) => format!("/session/{name}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
