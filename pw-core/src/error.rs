/// Input problems detected before a save or an analysis is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("a polygon needs at least 3 points (found {found})")]
    InsufficientPoints { found: usize },
    #[error("both date ranges must have a start and an end date")]
    MissingDateRange,
}
