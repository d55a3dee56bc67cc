//! Tagged result of an asynchronous fetch

use std::fmt;
use std::sync::Arc;

/// Error returned when a value is read from a non-`Success` state
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataStateError {
    #[error("data state is empty")]
    Empty,
    #[error("data is still loading")]
    Loading,
    #[error("data failed to load: {0}")]
    Failed(String),
}

/// Result envelope for anything loaded in the background.
///
/// Only `Success` carries a readable value. The error cause is kept opaque and
/// shared so that snapshots of the state stay cheap to clone.
#[derive(Clone, Default)]
pub enum DataState<T> {
    #[default]
    Empty,
    Loading,
    Success(T),
    Error(Arc<anyhow::Error>),
}

impl<T> DataState<T> {
    pub fn error(cause: anyhow::Error) -> Self {
        DataState::Error(Arc::new(cause))
    }

    pub fn from_result(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => DataState::Success(value),
            Err(e) => DataState::error(e),
        }
    }

    /// Read the loaded value; any other variant is a caller mistake.
    pub fn read(&self) -> Result<&T, DataStateError> {
        match self {
            DataState::Success(value) => Ok(value),
            DataState::Empty => Err(DataStateError::Empty),
            DataState::Loading => Err(DataStateError::Loading),
            DataState::Error(e) => Err(DataStateError::Failed(e.to_string())),
        }
    }

    pub fn read_safely(&self) -> Option<&T> {
        match self {
            DataState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DataState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataState::Error(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for DataState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataState::Empty => write!(f, "Empty"),
            DataState::Loading => write!(f, "Loading"),
            DataState::Success(value) => f.debug_tuple("Success").field(value).finish(),
            DataState::Error(e) => write!(f, "Error({})", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_succeeds_on_success() {
        let state = DataState::Success(7);
        assert_eq!(state.read(), Ok(&7));

        let loading: DataState<i32> = DataState::Loading;
        assert_eq!(loading.read(), Err(DataStateError::Loading));

        let empty: DataState<i32> = DataState::Empty;
        assert_eq!(empty.read(), Err(DataStateError::Empty));
    }

    #[test]
    fn test_error_keeps_cause_text() {
        let state: DataState<i32> = DataState::error(anyhow::anyhow!("timeout"));
        assert!(state.is_error());
        assert_eq!(state.read(), Err(DataStateError::Failed("timeout".to_string())));
        assert!(state.read_safely().is_none());
    }
}
