use serde::{Deserialize, Serialize};

/// Message reported when a single-record read matches zero or many rows.
pub const SINGLE_RESULT_EXPECTED: &str = "JSON object requested, multiple (or no) rows returned";

/// The one error kind surfaced by reads against the data store.
///
/// Whether the read failed in transport, was rejected by the store, or
/// violated a single-record expectation, the caller only ever sees the
/// message, which is carried verbatim from the store where one exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct DataAccessError {
    message: String,
}

impl DataAccessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for DataAccessError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("unable to decode row: {err}"))
    }
}

#[cfg(feature = "rest")]
impl From<reqwest::Error> for DataAccessError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Outcome of a read that expects exactly one record.
///
/// Internal logic and tests can tell the failure causes apart; callers
/// that only care about the boundary contract use [`into_result`](
/// SingleResult::into_result), which folds every failure into a
/// [`DataAccessError`].
#[derive(Clone, Debug, PartialEq)]
pub enum SingleResult<T> {
    One(T),
    None,
    Many(usize),
    Transport(DataAccessError),
}

impl<T> SingleResult<T> {
    pub fn from_rows(rows: Result<Vec<T>, DataAccessError>) -> Self {
        match rows {
            Err(err) => Self::Transport(err),
            Ok(mut rows) => match rows.len() {
                0 => Self::None,
                1 => Self::One(rows.remove(0)),
                n => Self::Many(n),
            },
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Self::One(_))
    }

    pub fn into_result(self) -> Result<T, DataAccessError> {
        match self {
            Self::One(value) => Ok(value),
            Self::None | Self::Many(_) => Err(DataAccessError::new(SINGLE_RESULT_EXPECTED)),
            Self::Transport(err) => Err(err),
        }
    }
}
