//! Client for an HTTP analysis service.
//!
//! The service accepts `POST {base_url}/api/analyze` with the parcel ring and
//! both periods, and answers with the measured NDVI difference and a
//! thumbnail URL. Failures come back as `{"error": "..."}` with a 4xx/5xx
//! status.

use crate::backend::{AnalysisBackend, BackendError, Measurement};
use log::{info, warn};
use pw_core::{DateRange, ImageryRequest, Point};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeBody<'a> {
    polygon: &'a [Point],
    start_date1: String,
    end_date1: String,
    start_date2: String,
    end_date2: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeReply {
    ndvi_difference: Option<f64>,
    image_url: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: Client,
    base_url: String,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/analyze", self.base_url)
    }
}

fn body<'a>(request: &'a ImageryRequest, period1: &DateRange, period2: &DateRange) -> AnalyzeBody<'a> {
    AnalyzeBody {
        polygon: &request.path,
        start_date1: period1.start().format(DATE_FORMAT).to_string(),
        end_date1: period1.end().format(DATE_FORMAT).to_string(),
        start_date2: period2.start().format(DATE_FORMAT).to_string(),
        end_date2: period2.end().format(DATE_FORMAT).to_string(),
    }
}

fn interpret(status_ok: bool, status: &str, text: &str) -> Result<Measurement, BackendError> {
    let reply: AnalyzeReply = serde_json::from_str(text)
        .map_err(|e| BackendError::Service(format!("unreadable reply ({status}): {e}")))?;
    if let Some(message) = reply.error {
        return Err(BackendError::Service(message));
    }
    if !status_ok {
        return Err(BackendError::Service(format!("bad response status {status}")));
    }
    match (reply.ndvi_difference, reply.image_url) {
        (Some(ndvi_difference), Some(image_url)) => Ok(Measurement {
            ndvi_difference,
            image_url,
        }),
        _ => Err(BackendError::Service(
            "reply is missing ndviDifference or imageUrl".to_string(),
        )),
    }
}

impl AnalysisBackend for RemoteBackend {
    async fn measure(
        &self,
        request: &ImageryRequest,
        period1: &DateRange,
        period2: &DateRange,
    ) -> Result<Measurement, BackendError> {
        let url = self.endpoint();
        info!("remote: POST {} ({} points)", url, request.path.len());
        let response = self
            .client
            .post(&url)
            .json(&body(request, period1, period2))
            .send()
            .await
            .map_err(|e| {
                warn!("remote: request to {} failed: {}", url, e);
                BackendError::Request(e.to_string())
            })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        interpret(status.is_success(), status.as_str(), &text)
    }
}
