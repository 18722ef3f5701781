//! Change metrics between two periods of imagery.

use pw_core::DateRange;
use rand::Rng;

/// Imagery gathered for one comparison period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodImagery {
    pub period: DateRange,
    /// Per-pixel (or per-scene) vegetation index values inside the parcel.
    pub ndvi_samples: Vec<f64>,
}

impl PeriodImagery {
    pub fn new(period: DateRange, ndvi_samples: Vec<f64>) -> Self {
        Self {
            period,
            ndvi_samples,
        }
    }

    /// Mean of the samples; zero when there are none.
    pub fn mean_ndvi(&self) -> f64 {
        if self.ndvi_samples.is_empty() {
            return 0.0;
        }
        self.ndvi_samples.iter().sum::<f64>() / self.ndvi_samples.len() as f64
    }
}

/// Scores the change from `before` to `after` as a single scalar.
pub trait ChangeMetric {
    fn difference(&self, before: &PeriodImagery, after: &PeriodImagery) -> f64;
}

/// Mean NDVI of the later period minus the earlier, clamped to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanNdviDifference;

impl ChangeMetric for MeanNdviDifference {
    fn difference(&self, before: &PeriodImagery, after: &PeriodImagery) -> f64 {
        (after.mean_ndvi() - before.mean_ndvi()).clamp(-1.0, 1.0)
    }
}

/// Placeholder score drawn uniformly from `[min, max]`, ignoring the
/// imagery. Stands in until a provider delivers real samples.
///
/// The default range leans negative; under the default threshold about two
/// runs in five are flagged.
#[derive(Debug, Clone, Copy)]
pub struct RandomDifference {
    pub min: f64,
    pub max: f64,
}

impl Default for RandomDifference {
    fn default() -> Self {
        Self {
            min: -0.45,
            max: 0.15,
        }
    }
}

impl ChangeMetric for RandomDifference {
    fn difference(&self, _before: &PeriodImagery, _after: &PeriodImagery) -> f64 {
        let low = self.min.min(self.max).clamp(-1.0, 1.0);
        let high = self.min.max(self.max).clamp(-1.0, 1.0);
        rand::thread_rng().gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period(month: u32) -> DateRange {
        DateRange(
            NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, month, 15).unwrap(),
        )
    }

    #[test]
    fn test_mean_difference() {
        let before = PeriodImagery::new(period(1), vec![0.5, 0.75]);
        let after = PeriodImagery::new(period(6), vec![0.25, 0.25, 0.25]);
        assert_eq!(MeanNdviDifference.difference(&before, &after), -0.375);
        assert_eq!(MeanNdviDifference.difference(&after, &before), 0.375);
    }

    #[test]
    fn test_mean_difference_is_clamped() {
        let before = PeriodImagery::new(period(1), vec![-1.0]);
        let after = PeriodImagery::new(period(6), vec![1.0]);
        assert_eq!(MeanNdviDifference.difference(&before, &after), 1.0);
    }

    #[test]
    fn test_empty_imagery_means_zero() {
        let empty = PeriodImagery::new(period(1), Vec::new());
        assert_eq!(empty.mean_ndvi(), 0.0);
    }

    #[test]
    fn test_random_difference_stays_in_range() {
        let metric = RandomDifference::default();
        let before = PeriodImagery::new(period(1), Vec::new());
        let after = PeriodImagery::new(period(6), Vec::new());
        for _ in 0..200 {
            let d = metric.difference(&before, &after);
            assert!((-0.45..=0.15).contains(&d), "{d} out of range");
        }
    }

    #[test]
    fn test_random_difference_accepts_swapped_bounds() {
        let metric = RandomDifference { min: 0.5, max: -2.0 };
        let before = PeriodImagery::new(period(1), Vec::new());
        let after = PeriodImagery::new(period(6), Vec::new());
        for _ in 0..50 {
            let d = metric.difference(&before, &after);
            assert!((-1.0..=0.5).contains(&d), "{d} out of range");
        }
    }
}
