/// Walk state definitions for tracking a crawl's progress
///
/// A walk moves from `Walking` to exactly one terminal state and never back.
use std::fmt;

/// Represents where the page walker is in its traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkState {
    /// A cursor page is pending; more pages may follow
    Walking,

    /// The last fetched page had no "next" link
    Finished,

    /// A listing page fetch failed; pages gathered so far are kept
    Aborted,
}

impl WalkState {
    /// Returns true if no further pages will be fetched
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Walking)
    }

    /// Returns true if the walk stopped on a transport failure
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Short lowercase label used in logs and statistics output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Finished => "finished",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
