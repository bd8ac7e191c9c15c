use schemars::JsonSchema;
use serde::Serialize;

use crate::error::AppError;

/// Result of a provider lookup that never propagates as an error.
///
/// Callers that only care about "something or nothing" use [`Lookup::into_value`];
/// callers that need to tell an empty answer from a failed request match on [`Miss`].
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Empty(Miss),
}

/// Why a lookup came back empty.
#[derive(Debug, thiserror::Error)]
pub enum Miss {
    #[error("no matching rows")]
    NoRows,

    #[error("no business code in details url '{0}'")]
    NoBusinessCode(String),

    #[error(transparent)]
    Failed(#[from] AppError),
}

/// Wire label for a lookup's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Found,
    NoRows,
    NoBusinessCode,
    Failed,
}

impl<T> Lookup<T> {
    pub fn outcome(&self) -> Outcome {
        match self {
            Lookup::Found(_) => Outcome::Found,
            Lookup::Empty(Miss::NoRows) => Outcome::NoRows,
            Lookup::Empty(Miss::NoBusinessCode(_)) => Outcome::NoBusinessCode,
            Lookup::Empty(Miss::Failed(_)) => Outcome::Failed,
        }
    }

    /// Error text for failed lookups; `None` for found or legitimately empty ones.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Lookup::Empty(miss @ (Miss::Failed(_) | Miss::NoBusinessCode(_))) => {
                Some(miss.to_string())
            }
            _ => None,
        }
    }

    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Empty(_) => None,
        }
    }
}

impl<T: Default> Lookup<T> {
    /// The found value, or the empty value of the same shape.
    pub fn into_value(self) -> T {
        self.found().unwrap_or_default()
    }
}
