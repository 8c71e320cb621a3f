/// The result of a conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The row matched the guard and was updated.
    Updated,
    /// No row matched, either because the order does not exist or because the guard did not hold. The caller has to
    /// re-read the order to tell which.
    NotApplied,
}

impl UpdateOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            Self::Updated
        } else {
            Self::NotApplied
        }
    }
}
