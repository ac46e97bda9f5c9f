//! Fetch lifecycle phases.

use serde::Serialize;
use std::fmt;

/// View state of a fetch-backed page. Exactly one phase is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum FetchState<T> {
    /// No identifier to fetch; no request issued.
    NoTarget,
    /// A request is in flight.
    Loading,
    /// The request failed.
    Error { message: String },
    /// The request succeeded.
    Ready { value: T },
}

/// Payload-free discriminant of [`FetchState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NoTarget,
    Loading,
    Error,
    Ready,
}

impl<T> FetchState<T> {
    pub fn phase(&self) -> Phase {
        match self {
            FetchState::NoTarget => Phase::NoTarget,
            FetchState::Loading => Phase::Loading,
            FetchState::Error { .. } => Phase::Error,
            FetchState::Ready { .. } => Phase::Ready,
        }
    }

    /// The fetched value, present only when Ready.
    pub fn value(&self) -> Option<&T> {
        match self {
            FetchState::Ready { value } => Some(value),
            _ => None,
        }
    }

    /// The error message, present only in the Error phase.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Maps the Ready value by reference, keeping the phase.
    pub fn map_value<'a, U>(&'a self, f: impl FnOnce(&'a T) -> U) -> FetchState<U> {
        match self {
            FetchState::NoTarget => FetchState::NoTarget,
            FetchState::Loading => FetchState::Loading,
            FetchState::Error { message } => FetchState::Error { message: message.clone() },
            FetchState::Ready { value } => FetchState::Ready { value: f(value) },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchState::Ready { .. })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NoTarget => write!(f, "no_target"),
            Phase::Loading => write!(f, "loading"),
            Phase::Error => write!(f, "error"),
            Phase::Ready => write!(f, "ready"),
        }
    }
}
