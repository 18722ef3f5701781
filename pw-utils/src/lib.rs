//! Shared utility functions for parcel-watch crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, NaiveDate, Utc};

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }

    /// Parse a "YYYY-MM-DD..YYYY-MM-DD" period into its start and end dates.
    pub fn parse_period(s: &str) -> anyhow::Result<(NaiveDate, NaiveDate)> {
        let Some((start, end)) = s.split_once("..") else {
            anyhow::bail!("period {s:?} must look like YYYY-MM-DD..YYYY-MM-DD");
        };
        Ok((parse_date(start)?, parse_date(end)?))
    }

    /// Human-readable date, e.g. "Mar 9, 2024". Empty for an unset date.
    pub fn format_display_date(date: Option<&NaiveDate>) -> String {
        match date {
            Some(d) => d.format("%b %-d, %Y").to_string(),
            None => String::new(),
        }
    }

    /// Human-readable timestamp, e.g. "Mar 9, 2024, 04:05 PM".
    pub fn format_display_datetime(at: &DateTime<Utc>) -> String {
        at.format("%b %-d, %Y, %I:%M %p").to_string()
    }

}

/// Number formatting for display
pub mod format {
    /// Vegetation index difference with three decimals, e.g. "-0.153".
    pub fn format_ndvi(value: f64) -> String {
        format!("{value:.3}")
    }

}
