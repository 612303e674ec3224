// View-model types shared by the listing and contact controllers.
//
// Controllers own these exclusively; the presentation layer only reads them.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Exclusive load state of a controller's view-model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// The user-facing message when the view failed to load.
    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Longest deadline a notice is given when its TTL does not fit the clock
const NOTICE_TTL_CEILING: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// A transient message shown next to the view, never in place of it.
///
/// Each notice carries its own deadline, so a later action cannot extend or
/// cut short an earlier notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NoticeKind::Success, message, ttl)
    }

    pub fn failure(message: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NoticeKind::Failure, message, ttl)
    }

    fn new(kind: NoticeKind, message: impl Into<String>, ttl: Duration) -> Self {
        let now = Instant::now();
        // A TTL past what the clock can represent means "until replaced"
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + NOTICE_TTL_CEILING);
        Self {
            kind,
            message: message.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Routing request produced by a controller; the presentation layer performs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "path", rename_all = "snake_case")]
pub enum NavigationIntent {
    NavigateTo(String),
}

impl NavigationIntent {
    pub fn path(&self) -> &str {
        match self {
            NavigationIntent::NavigateTo(path) => path,
        }
    }
}
