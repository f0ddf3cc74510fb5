// ABOUTME: The error raised when a URL cannot be rendered into HTML.
// ABOUTME: Carries the failing URL, a coarse kind for callers to match on, and the underlying cause.

use std::fmt;

/// Why a page could not be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationErrorKind {
    InvalidUrl,
    Fetch,
    Timeout,
    Ssrf,
}

impl fmt::Display for NavigationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NavigationErrorKind::InvalidUrl => "invalid URL",
            NavigationErrorKind::Fetch => "fetch error",
            NavigationErrorKind::Timeout => "timeout",
            NavigationErrorKind::Ssrf => "private network blocked",
        };
        f.write_str(s)
    }
}

/// A page could not be turned into HTML.
#[derive(Debug, thiserror::Error)]
pub struct NavigationError {
    pub kind: NavigationErrorKind,
    pub url: String,
    #[source]
    pub cause: Option<anyhow::Error>,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot render {:?}: {}", self.url, self.kind)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl NavigationError {
    pub fn new(kind: NavigationErrorKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            cause: None,
        }
    }

    /// Attaches the underlying failure.
    pub fn caused_by(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}
