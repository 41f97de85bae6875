use std::fmt;

/// A selection value that does not name any known choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Discipline other than All / Full Power / Single Lifts.
    UnknownDiscipline(String),
    /// Testing status other than All / Tested / Untested.
    UnknownTestingStatus(String),
    /// Search mode other than substring / tokens.
    UnknownSearchMode(String),
    /// Division grouping other than base / grouped.
    UnknownGrouping(String),
    /// Selection key that is not a filter field.
    UnknownField(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDiscipline(v) => {
                write!(f, "unknown discipline '{v}' (expected All, Full Power, Single Lifts)")
            }
            Self::UnknownTestingStatus(v) => {
                write!(f, "unknown testing status '{v}' (expected All, Tested, Untested)")
            }
            Self::UnknownSearchMode(v) => {
                write!(f, "unknown search mode '{v}' (expected substring, tokens)")
            }
            Self::UnknownGrouping(v) => {
                write!(f, "unknown division grouping '{v}' (expected base, grouped)")
            }
            Self::UnknownField(v) => write!(f, "unknown filter '{v}'"),
        }
    }
}

impl std::error::Error for SelectionError {}
