/// Lifecycle of the query service's book table
use std::fmt;

/// Load state of a [`BookTable`](crate::storage::BookTable)
///
/// The only transition is `Unloaded -> Ready`, taken once at startup. A
/// missing or malformed record file still ends in `Ready`, with an empty table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableState {
    Unloaded,
    Ready,
}

impl TableState {
    /// Returns true once the table can answer queries
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unloaded => write!(f, "unloaded"),
            Self::Ready => write!(f, "ready"),
        }
    }
}
