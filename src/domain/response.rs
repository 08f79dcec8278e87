use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Outcome of a single fetch: a success with an optional payload or an error
/// with an optional message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: Option<T> },
    Error { message: Option<String> },
}

impl<T> Response<T> {
    pub fn success(data: T) -> Self {
        Response::Success { data: Some(data) }
    }

    pub fn empty() -> Self {
        Response::Success { data: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    /// Transforms the payload. An absent payload stays absent and errors keep
    /// their message.
    pub fn map<R>(self, transform: impl FnOnce(T) -> R) -> Response<R> {
        match self {
            Response::Success { data } => Response::Success {
                data: data.map(transform),
            },
            Response::Error { message } => Response::Error { message },
        }
    }

    pub fn fold<R>(
        self,
        on_success: impl FnOnce(Option<T>) -> R,
        on_error: impl FnOnce(Option<String>) -> R,
    ) -> R {
        match self {
            Response::Success { data } => on_success(data),
            Response::Error { message } => on_error(message),
        }
    }

    pub fn on_success(self, action: impl FnOnce(Option<&T>)) -> Self {
        if let Response::Success { data } = &self {
            action(data.as_ref());
        }
        self
    }

    pub fn on_error(self, action: impl FnOnce(Option<&str>)) -> Self {
        if let Response::Error { message } = &self {
            action(message.as_deref());
        }
        self
    }

    pub fn get_or_none(self) -> Option<T> {
        match self {
            Response::Success { data } => data,
            Response::Error { .. } => None,
        }
    }

    /// Payload, or `default()` on error or when the payload is absent.
    pub fn get_or_else(self, default: impl FnOnce() -> T) -> T {
        self.get_or_none().unwrap_or_else(default)
    }

    pub fn into_parts(self) -> (Option<T>, Option<String>) {
        match self {
            Response::Success { data } => (data, None),
            Response::Error { message } => (None, message),
        }
    }
}

impl<T, E: Display> From<std::result::Result<T, E>> for Response<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(data) => Response::success(data),
            Err(e) => Response::error(e.to_string()),
        }
    }
}
