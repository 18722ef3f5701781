use pw_core::{DateRange, PeriodSelection, Polygon, ValidationError};

/// A polygon and two complete periods, checked before the engine runs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub polygon: Polygon,
    pub period1: DateRange,
    pub period2: DateRange,
}

impl AnalysisRequest {
    /// Check the user's selections. The polygon is checked first, so a
    /// missing area is reported before missing dates.
    pub fn validate(
        polygon: &Polygon,
        period1: &PeriodSelection,
        period2: &PeriodSelection,
    ) -> Result<Self, ValidationError> {
        polygon.ensure_valid()?;
        let (Some(period1), Some(period2)) = (period1.range(), period2.range()) else {
            return Err(ValidationError::MissingDateRange);
        };
        Ok(Self {
            polygon: polygon.clone(),
            period1,
            period2,
        })
    }
}
