//! Backend selection for the CLI.

use crate::Settings;
use pw_analysis::{
    AnalysisBackend, BackendError, ImageryBackend, Measurement, RandomDifference, StaticMapProvider,
};
use pw_core::imagery::StaticMapStyle;
use pw_core::{DateRange, ImageryRequest};

/// The backend chosen from [`Settings`].
pub enum CliBackend {
    /// Static map imagery with a placeholder change score.
    Imagery(ImageryBackend<StaticMapProvider, RandomDifference>),
    #[cfg(feature = "api")]
    Remote(pw_analysis::RemoteBackend),
}

impl CliBackend {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        match settings.backend_url.as_deref() {
            #[cfg(feature = "api")]
            Some(url) => {
                log::info!("using analysis service at {}", url);
                let timeout = std::time::Duration::from_secs(settings.timeout_secs);
                Ok(CliBackend::Remote(pw_analysis::RemoteBackend::new(url, timeout)?))
            }
            #[cfg(not(feature = "api"))]
            Some(url) => anyhow::bail!(
                "--backend-url {} needs pw-cli built with the `api` feature",
                url
            ),
            None => {
                if settings.maps_key.is_empty() {
                    log::warn!("no maps API key set; image URLs will not load");
                }
                let provider = StaticMapProvider::new(StaticMapStyle::new(settings.maps_key.clone()));
                Ok(CliBackend::Imagery(ImageryBackend::new(
                    provider,
                    RandomDifference::default(),
                )))
            }
        }
    }
}

impl AnalysisBackend for CliBackend {
    async fn measure(
        &self,
        request: &ImageryRequest,
        period1: &DateRange,
        period2: &DateRange,
    ) -> Result<Measurement, BackendError> {
        match self {
            CliBackend::Imagery(backend) => backend.measure(request, period1, period2).await,
            #[cfg(feature = "api")]
            CliBackend::Remote(backend) => backend.measure(request, period1, period2).await,
        }
    }
}
