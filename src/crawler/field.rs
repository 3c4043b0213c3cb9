//! Per-field extraction outcomes
//!
//! Every record field is first computed as a [`FieldOutcome`], so an absent
//! value and the reason for it stay visible until the record is assembled.
//! Defaults are applied in exactly one place, the record builder.

/// Result of extracting one field from page markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome<T> {
    /// The field was present and parsed
    Found(T),

    /// The field could not be determined
    Absent(&'static str),
}

impl<T> FieldOutcome<T> {
    /// Wraps an optional value, recording `reason` when it is `None`
    pub fn from_option(value: Option<T>, reason: &'static str) -> Self {
        match value {
            Some(v) => Self::Found(v),
            None => Self::Absent(reason),
        }
    }

    /// Returns true if a value was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Keeps a found value, otherwise tries the fallback
    ///
    /// When both are absent the fallback's reason wins, since it describes
    /// the last source consulted.
    pub fn or_else(self, fallback: impl FnOnce() -> FieldOutcome<T>) -> Self {
        match self {
            Self::Found(v) => Self::Found(v),
            Self::Absent(_) => fallback(),
        }
    }

    /// Applies `f` to a found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldOutcome<U> {
        match self {
            Self::Found(v) => FieldOutcome::Found(f(v)),
            Self::Absent(reason) => FieldOutcome::Absent(reason),
        }
    }

    /// Converts into an `Option`, dropping the reason
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Absent(_) => None,
        }
    }

    /// The absence reason, if any
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::Absent(reason) => Some(reason),
        }
    }
}

impl<T: Default> FieldOutcome<T> {
    /// The found value, or the type's default (`""` or `0`)
    pub fn unwrap_or_default(self) -> T {
        self.found().unwrap_or_default()
    }
}
