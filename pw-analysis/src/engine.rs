//! The analysis workflow.
//!
//! [`AnalysisEngine::perform_analysis`] turns a polygon and two periods into
//! a classified [`AnalysisResult`], records it as the current result and
//! prepends it to the history. Alongside the returned `Result` the engine
//! keeps display state (`loading`, `error`, current result) for the
//! interaction surface.
//!
//! Only one analysis runs at a time; an overlapping call is rejected with
//! [`AnalysisError::Busy`] without touching the display state.

use crate::backend::{AnalysisBackend, BackendError, Measurement};
use crate::classify::classify;
use crate::config::AnalysisConfig;
use crate::request::AnalysisRequest;
use chrono::Utc;
use log::{info, warn};
use pw_core::ids::IdGenerator;
use pw_core::imagery::build_imagery_request;
use pw_core::{AnalysisResult, DateRange, HistoryItem, Polygon, ValidationError};
use pw_store::HistoryStore;
use std::cell::RefCell;
use thiserror::Error;

/// Message placed in the error slot when an analysis fails.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to perform analysis. Please try again.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("an analysis is already in progress")]
    Busy,
    #[error("analysis failed: {0}")]
    AnalysisFailed(#[source] BackendError),
}

#[derive(Debug, Default)]
struct EngineState {
    loading: bool,
    error: Option<String>,
    current: Option<AnalysisResult>,
}

/// Clears `loading` when the in-flight analysis ends, including when its
/// future is dropped before completion.
struct LoadingGuard<'a> {
    state: &'a RefCell<EngineState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.borrow_mut().loading = false;
    }
}

pub struct AnalysisEngine<B> {
    backend: B,
    history: HistoryStore,
    config: AnalysisConfig,
    ids: IdGenerator,
    state: RefCell<EngineState>,
}

impl<B: AnalysisBackend> AnalysisEngine<B> {
    pub fn new(backend: B, history: HistoryStore, config: AnalysisConfig) -> Self {
        Self {
            backend,
            history,
            config,
            ids: IdGenerator::new(),
            state: RefCell::new(EngineState::default()),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn current_result(&self) -> Option<AnalysisResult> {
        self.state.borrow().current.clone()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Run a validated request.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        self.perform_analysis(&request.polygon, &request.period1, &request.period2)
            .await
    }

    /// Measure, classify and record the change in `polygon` from `period1`
    /// to `period2`.
    ///
    /// A polygon with fewer than three points is refused before any state
    /// changes. Backend failures and timeouts set the error slot, keep the
    /// previous result and are returned as [`AnalysisError::AnalysisFailed`].
    pub async fn perform_analysis(
        &self,
        polygon: &Polygon,
        period1: &DateRange,
        period2: &DateRange,
    ) -> Result<AnalysisResult, AnalysisError> {
        polygon.ensure_valid()?;
        let _loading = self.begin()?;
        info!(
            "analysis: {} from {}..{} to {}..{}",
            display_name(polygon),
            period1.start(),
            period1.end(),
            period2.start(),
            period2.end()
        );

        match self.measure(polygon, period1, period2).await {
            Ok(measurement) => Ok(self.record(polygon, measurement)),
            Err(e) => {
                warn!("Analysis error: {}", e);
                self.state.borrow_mut().error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
                Err(AnalysisError::AnalysisFailed(e))
            }
        }
    }

    fn begin(&self) -> Result<LoadingGuard<'_>, AnalysisError> {
        let mut state = self.state.borrow_mut();
        if state.loading {
            return Err(AnalysisError::Busy);
        }
        state.loading = true;
        state.error = None;
        Ok(LoadingGuard { state: &self.state })
    }

    async fn measure(
        &self,
        polygon: &Polygon,
        period1: &DateRange,
        period2: &DateRange,
    ) -> Result<Measurement, BackendError> {
        let request = build_imagery_request(polygon)?;
        let limit = self.config.timeout();
        let measurement = tokio::time::timeout(limit, self.backend.measure(&request, period1, period2))
            .await
            .map_err(|_| BackendError::Timeout(limit))??;
        if !measurement.ndvi_difference.is_finite() {
            return Err(BackendError::Service(format!(
                "non-finite NDVI difference {}",
                measurement.ndvi_difference
            )));
        }
        Ok(measurement)
    }

    fn record(&self, polygon: &Polygon, measurement: Measurement) -> AnalysisResult {
        let ndvi_difference = measurement.ndvi_difference.clamp(-1.0, 1.0);
        let status = classify(ndvi_difference, self.config.change_threshold);
        let now = Utc::now();
        let result = AnalysisResult {
            id: self.ids.next_id_at(now),
            date: now,
            polygon_id: polygon.id.clone(),
            ndvi_difference,
            image_url: measurement.image_url,
            status,
            details: status.details().to_string(),
        };
        info!(
            "analysis: {} ndvi difference {:.3} -> {:?}",
            result.id, result.ndvi_difference, result.status
        );

        self.state.borrow_mut().current = Some(result.clone());

        let location = if polygon.name.is_empty() {
            format!("Area {}", self.history.len() + 1)
        } else {
            polygon.name.clone()
        };
        if let Err(e) = self.history.append(HistoryItem::from_result(&result, location)) {
            warn!("analysis: history entry {} kept in memory only: {}", result.id, e);
        }
        result
    }
}

fn display_name(polygon: &Polygon) -> &str {
    if polygon.name.is_empty() {
        "unnamed polygon"
    } else {
        &polygon.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pw_core::{ChangeStatus, ImageryRequest, Point};
    use pw_store::MemoryStore;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    struct FixedBackend {
        ndvi: f64,
        calls: Cell<usize>,
    }

    impl FixedBackend {
        fn new(ndvi: f64) -> Self {
            Self {
                ndvi,
                calls: Cell::new(0),
            }
        }
    }

    impl AnalysisBackend for FixedBackend {
        async fn measure(
            &self,
            request: &ImageryRequest,
            _period1: &DateRange,
            _period2: &DateRange,
        ) -> Result<Measurement, BackendError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Measurement {
                ndvi_difference: self.ndvi,
                image_url: format!("memory://{}", request.zoom),
            })
        }
    }

    /// Succeeds after `delay`, or fails when `fail` is set.
    struct ScriptedBackend {
        delay: Duration,
        fail: Cell<bool>,
    }

    impl AnalysisBackend for ScriptedBackend {
        async fn measure(
            &self,
            _request: &ImageryRequest,
            _period1: &DateRange,
            _period2: &DateRange,
        ) -> Result<Measurement, BackendError> {
            tokio::time::sleep(self.delay).await;
            if self.fail.get() {
                return Err(BackendError::Service("imagery unavailable".to_string()));
            }
            Ok(Measurement {
                ndvi_difference: 0.05,
                image_url: "memory://scripted".to_string(),
            })
        }
    }

    fn periods() -> (DateRange, DateRange) {
        let d = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        (DateRange(d(1), d(2)), DateRange(d(6), d(7)))
    }

    fn parcel(name: &str) -> Polygon {
        Polygon {
            id: "1700000000000".to_string(),
            name: name.to_string(),
            ..Polygon::with_points(vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(1.0, 1.0),
            ])
        }
    }

    fn engine<B: AnalysisBackend>(backend: B) -> AnalysisEngine<B> {
        let history = HistoryStore::open(Rc::new(MemoryStore::new()));
        AnalysisEngine::new(backend, history, AnalysisConfig::default())
    }

    #[tokio::test]
    async fn successful_analysis_is_recorded() {
        let engine = engine(FixedBackend::new(-0.5));
        let (p1, p2) = periods();
        let result = engine
            .perform_analysis(&parcel("Land Area 1"), &p1, &p2)
            .await
            .unwrap();

        assert_eq!(result.polygon_id, "1700000000000");
        assert_eq!(result.status, ChangeStatus::PossibleIllegal);
        assert_eq!(result.details, ChangeStatus::PossibleIllegal.details());
        assert_eq!(result.image_url, "memory://9");
        assert!(!engine.is_loading());
        assert_eq!(engine.error(), None);
        assert_eq!(engine.current_result(), Some(result.clone()));

        let history = engine.history().items();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, result.id);
        assert_eq!(history[0].location, "Land Area 1");
    }

    #[tokio::test]
    async fn every_run_prepends_a_history_entry() {
        let engine = engine(FixedBackend::new(0.1));
        let (p1, p2) = periods();
        let first = engine.perform_analysis(&parcel(""), &p1, &p2).await.unwrap();
        let second = engine.perform_analysis(&parcel(""), &p1, &p2).await.unwrap();
        assert_eq!(first.status, ChangeStatus::NoChange);

        let history = engine.history().items();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[0].location, "Area 2");
        assert_eq!(history[1].location, "Area 1");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn out_of_range_measurement_is_clamped() {
        let engine = engine(FixedBackend::new(-3.0));
        let (p1, p2) = periods();
        let result = engine.perform_analysis(&parcel("x"), &p1, &p2).await.unwrap();
        assert_eq!(result.ndvi_difference, -1.0);
    }

    #[tokio::test]
    async fn invalid_polygon_is_refused_without_state_change() {
        let engine = engine(FixedBackend::new(0.0));
        let (p1, p2) = periods();
        for n in 0..3 {
            let mut polygon = parcel("small");
            polygon.points.truncate(n);
            let err = engine.perform_analysis(&polygon, &p1, &p2).await.unwrap_err();
            assert!(matches!(
                err,
                AnalysisError::Invalid(ValidationError::InsufficientPoints { .. })
            ));
        }
        assert_eq!(engine.backend.calls.get(), 0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.current_result(), None);
        assert_eq!(engine.error(), None);
    }

    #[tokio::test]
    async fn failure_sets_error_and_keeps_previous_result() {
        let engine = engine(ScriptedBackend {
            delay: Duration::ZERO,
            fail: Cell::new(false),
        });
        let (p1, p2) = periods();
        let previous = engine.perform_analysis(&parcel("a"), &p1, &p2).await.unwrap();

        engine.backend.fail.set(true);
        let err = engine.perform_analysis(&parcel("a"), &p1, &p2).await.unwrap_err();
        assert!(matches!(err, AnalysisError::AnalysisFailed(BackendError::Service(_))));
        assert!(!engine.is_loading());
        assert_eq!(engine.error().as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
        assert_eq!(engine.current_result(), Some(previous));
        assert_eq!(engine.history().len(), 1);

        engine.backend.fail.set(false);
        engine.perform_analysis(&parcel("a"), &p1, &p2).await.unwrap();
        assert_eq!(engine.error(), None);
        assert_eq!(engine.history().len(), 2);
    }

    #[tokio::test]
    async fn overlapping_call_is_busy() {
        let engine = engine(ScriptedBackend {
            delay: Duration::from_millis(30),
            fail: Cell::new(false),
        });
        let (p1, p2) = periods();
        let polygon = parcel("a");
        let (first, second) = tokio::join!(
            engine.perform_analysis(&polygon, &p1, &p2),
            engine.perform_analysis(&polygon, &p1, &p2)
        );
        assert!(first.is_ok());
        assert!(matches!(second, Err(AnalysisError::Busy)));
        assert!(!engine.is_loading());
        assert_eq!(engine.error(), None);
        assert_eq!(engine.history().len(), 1);
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let history = HistoryStore::open(Rc::new(MemoryStore::new()));
        let config = AnalysisConfig {
            timeout_ms: 10,
            ..AnalysisConfig::default()
        };
        let backend = ScriptedBackend {
            delay: Duration::from_millis(500),
            fail: Cell::new(false),
        };
        let engine = AnalysisEngine::new(backend, history, config);
        let (p1, p2) = periods();
        let err = engine.perform_analysis(&parcel("a"), &p1, &p2).await.unwrap_err();
        assert!(matches!(err, AnalysisError::AnalysisFailed(BackendError::Timeout(_))));
        assert!(!engine.is_loading());
        assert_eq!(engine.error().as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
        assert!(engine.history().is_empty());
    }

    #[tokio::test]
    async fn drawn_parcel_analysis_survives_restart() {
        use crate::request::AnalysisRequest;
        use pw_core::PeriodSelection;
        use pw_store::{PolygonStore, SqliteStore};

        let kv = SqliteStore::open_in_memory().unwrap();
        let mut polygons = PolygonStore::open(Rc::new(kv.clone()));
        polygons.add_point(Point::new(0.0, 0.0));
        polygons.add_point(Point::new(0.0, 1.0));
        polygons.add_point(Point::new(1.0, 1.0));
        let saved = polygons.save().unwrap();

        let (p1, p2) = periods();
        let request = AnalysisRequest::validate(
            polygons.selected(),
            &PeriodSelection::from(p1),
            &PeriodSelection::from(p2),
        )
        .unwrap();
        let engine = AnalysisEngine::new(
            FixedBackend::new(-0.3),
            HistoryStore::open(Rc::new(kv.clone())),
            AnalysisConfig::default(),
        );
        let result = engine.run(&request).await.unwrap();
        assert_eq!(result.polygon_id, saved.id);

        let history = HistoryStore::open(Rc::new(kv.clone()));
        let items = history.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].location, "Land Area 1");
        assert_eq!(items[0].status, ChangeStatus::PossibleIllegal);
        assert_eq!(PolygonStore::open(Rc::new(kv)).saved(), &[saved]);
    }

    #[tokio::test]
    async fn dropped_analysis_clears_loading() {
        let engine = engine(ScriptedBackend {
            delay: Duration::from_millis(500),
            fail: Cell::new(false),
        });
        let (p1, p2) = periods();
        let polygon = parcel("a");
        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            engine.perform_analysis(&polygon, &p1, &p2),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(!engine.is_loading());
        assert_eq!(engine.current_result(), None);
    }
}
