//! Sources of change measurements.

use crate::metric::{ChangeMetric, PeriodImagery};
use pw_core::imagery::StaticMapStyle;
use pw_core::{DateRange, GeometryError, ImageryRequest};
use std::time::Duration;
use thiserror::Error;

/// What a backend reports for one parcel and pair of periods.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub ndvi_difference: f64,
    pub image_url: String,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("no imagery available for {} to {}", .0.start(), .0.end())]
    NoImagery(DateRange),
    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
    #[error("analysis service error: {0}")]
    Service(String),
    #[error("request error: {0}")]
    Request(String),
}

/// Measures vegetation change for an imagery request between two periods.
#[allow(async_fn_in_trait)]
pub trait AnalysisBackend {
    async fn measure(
        &self,
        request: &ImageryRequest,
        period1: &DateRange,
        period2: &DateRange,
    ) -> Result<Measurement, BackendError>;
}

/// Satellite imagery collaborator.
#[allow(async_fn_in_trait)]
pub trait ImageryProvider {
    /// A displayable image reference for the request.
    async fn render(&self, request: &ImageryRequest) -> Result<String, BackendError>;

    /// Imagery of the parcel captured during `period`.
    async fn capture(
        &self,
        request: &ImageryRequest,
        period: &DateRange,
    ) -> Result<PeriodImagery, BackendError>;
}

/// Renders through a static map URL. Captures carry no samples, so pair it
/// with a metric that does not need them.
#[derive(Debug, Clone)]
pub struct StaticMapProvider {
    style: StaticMapStyle,
}

impl StaticMapProvider {
    pub fn new(style: StaticMapStyle) -> Self {
        Self { style }
    }
}

impl ImageryProvider for StaticMapProvider {
    async fn render(&self, request: &ImageryRequest) -> Result<String, BackendError> {
        Ok(request.static_map_url(&self.style))
    }

    async fn capture(
        &self,
        _request: &ImageryRequest,
        period: &DateRange,
    ) -> Result<PeriodImagery, BackendError> {
        Ok(PeriodImagery::new(*period, Vec::new()))
    }
}

/// Combines an imagery provider with a change metric.
#[derive(Debug, Clone)]
pub struct ImageryBackend<P, M> {
    provider: P,
    metric: M,
}

impl<P, M> ImageryBackend<P, M> {
    pub fn new(provider: P, metric: M) -> Self {
        Self { provider, metric }
    }
}

impl<P: ImageryProvider, M: ChangeMetric> AnalysisBackend for ImageryBackend<P, M> {
    async fn measure(
        &self,
        request: &ImageryRequest,
        period1: &DateRange,
        period2: &DateRange,
    ) -> Result<Measurement, BackendError> {
        let image_url = self.provider.render(request).await?;
        let before = self.provider.capture(request, period1).await?;
        let after = self.provider.capture(request, period2).await?;
        log::debug!(
            "imagery: {} samples before, {} after",
            before.ndvi_samples.len(),
            after.ndvi_samples.len()
        );
        Ok(Measurement {
            ndvi_difference: self.metric.difference(&before, &after),
            image_url,
        })
    }
}
