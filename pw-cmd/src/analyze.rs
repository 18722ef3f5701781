//! `analyze` subcommand.

use crate::backend::CliBackend;
use crate::polygon::saved_at;
use crate::Settings;
use anyhow::Context;
use chrono::Local;
use pw_analysis::{AnalysisConfig, AnalysisEngine, AnalysisRequest};
use pw_core::{AnalysisResult, DateRange, PeriodSelection};
use pw_store::{HistoryStore, PolygonStore};
use pw_utils::dates::{format_display_date, parse_period};
use pw_utils::format::format_ndvi;

/// Run one analysis of the saved polygon at `index` and print the result.
///
/// Periods not given on the command line fall back to the defaults of
/// [`PeriodSelection::default_pair`].
pub async fn run_analyze(
    settings: &Settings,
    index: usize,
    period1: Option<&str>,
    period2: Option<&str>,
) -> anyhow::Result<()> {
    let kv = settings.open_store()?;
    let mut polygons = PolygonStore::open(kv.clone());
    saved_at(&polygons, index)?;
    polygons.select_saved(index);

    let today = Local::now().date_naive();
    let (mut first, mut second) = PeriodSelection::default_pair(today);
    if let Some(text) = period1 {
        apply_period(&mut first, text).context("invalid --period1")?;
    }
    if let Some(text) = period2 {
        apply_period(&mut second, text).context("invalid --period2")?;
    }

    let request = match AnalysisRequest::validate(polygons.selected(), &first, &second) {
        Ok(request) => request,
        Err(e) => anyhow::bail!("{}", e),
    };

    let config = AnalysisConfig {
        change_threshold: settings.threshold,
        timeout_ms: settings.timeout_secs.saturating_mul(1000),
    };
    let engine = AnalysisEngine::new(
        CliBackend::from_settings(settings)?,
        HistoryStore::open(kv),
        config,
    );

    match engine.run(&request).await {
        Ok(result) => {
            print_result(&result, &request);
            Ok(())
        }
        Err(e) => {
            let message = engine.error().unwrap_or_else(|| e.to_string());
            eprintln!("{}", message);
            Err(e.into())
        }
    }
}

fn apply_period(selection: &mut PeriodSelection, text: &str) -> anyhow::Result<()> {
    let (start, end) = parse_period(text)?;
    selection.set_start(start);
    selection.set_end(end);
    Ok(())
}

fn print_result(result: &AnalysisResult, request: &AnalysisRequest) {
    println!("{}", result.status);
    println!("NDVI Difference: {}", format_ndvi(result.ndvi_difference));
    println!("{}", period_line("Period 1", &request.period1));
    println!("{}", period_line("Period 2", &request.period2));
    println!("{}", result.details);
    println!("Image: {}", result.image_url);
}

fn period_line(label: &str, period: &DateRange) -> String {
    format!(
        "{}: {} to {} ({} days)",
        label,
        format_display_date(Some(&period.start())),
        format_display_date(Some(&period.end())),
        period.num_days()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_apply_period_overrides_defaults() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let (mut first, _) = PeriodSelection::default_pair(today);
        apply_period(&mut first, "2023-01-01..2023-02-01").unwrap();
        assert_eq!(first.start, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(first.end, NaiveDate::from_ymd_opt(2023, 2, 1));
    }

    #[test]
    fn test_apply_period_keeps_order() {
        let mut selection = PeriodSelection::default();
        apply_period(&mut selection, "2024-05-10..2024-05-01").unwrap();
        assert_eq!(selection.start, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(selection.end, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_period_line_counts_days() {
        let period = DateRange(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        );
        assert_eq!(
            period_line("Period 1", &period),
            "Period 1: Mar 1, 2024 to Mar 15, 2024 (15 days)"
        );
    }
}
