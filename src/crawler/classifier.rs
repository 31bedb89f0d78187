//! Issue classification of fetch outcomes

use crate::crawler::{FetchOutcome, TransportError};
use std::fmt;

/// What a fetch outcome means for the audited site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueCategory {
    Ok,
    Redirect,
    RedirectChain,
    Broken404,
    Forbidden403,
    ServerError5xx,
    ConnectionError,
    Timeout,

    /// Unhandled status code, or `None` for an unclassified transport failure
    Other(Option<u16>),
}

impl IssueCategory {
    /// Human readable label, used in exports and the summary
    pub fn label(&self) -> String {
        match self {
            Self::Ok => "OK".to_string(),
            Self::Redirect => "Redirect".to_string(),
            Self::RedirectChain => "Redirect Chain".to_string(),
            Self::Broken404 => "Broken Link (404)".to_string(),
            Self::Forbidden403 => "Forbidden (403)".to_string(),
            Self::ServerError5xx => "Server Error (5xx)".to_string(),
            Self::ConnectionError => "Connection Error".to_string(),
            Self::Timeout => "Timeout".to_string(),
            Self::Other(Some(code)) => format!("Other ({})", code),
            Self::Other(None) => "Other (Transport Error)".to_string(),
        }
    }

    /// Returns true for categories produced by a transport failure
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError | Self::Timeout | Self::Other(None)
        )
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect | Self::RedirectChain)
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Maps a fetch outcome to exactly one issue category
///
/// # Precedence
///
/// 1. Transport error (`Timeout`, `ConnectionError`, anything else)
/// 2. Status 404, 403, then any 5xx
/// 3. Redirect count: more than 2 hops is a chain, 1 or 2 a redirect
/// 4. Status 200 is OK
/// 5. Everything else is `Other(code)`
///
/// A 404 reached through three redirects is therefore `Broken404`: the
/// terminal status wins over the redirect count.
pub fn classify(outcome: &FetchOutcome) -> IssueCategory {
    if let Some(error) = outcome.transport_error() {
        return match error {
            TransportError::Timeout => IssueCategory::Timeout,
            TransportError::ConnectionError => IssueCategory::ConnectionError,
            TransportError::Other(_) => IssueCategory::Other(None),
        };
    }

    match (outcome.status_code(), outcome.redirect_count()) {
        (Some(404), _) => IssueCategory::Broken404,
        (Some(403), _) => IssueCategory::Forbidden403,
        (Some(500..=599), _) => IssueCategory::ServerError5xx,
        (_, hops) if hops > 2 => IssueCategory::RedirectChain,
        (_, hops) if hops > 0 => IssueCategory::Redirect,
        (Some(200), _) => IssueCategory::Ok,
        (code, _) => IssueCategory::Other(code),
    }
}
