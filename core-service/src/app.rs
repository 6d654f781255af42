//! Prediction App - caller-owned application state
//!
//! Holds what the prediction page shows: the current prediction, the
//! history list, per-field validation messages and an error banner.
//! Every user action is one method call; each runs to completion before
//! the next can start because they all take `&mut self`.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::constants::{HISTORY_LOAD_FAILED_MESSAGE, PREDICTION_FAILED_MESSAGE};
use crate::logic::conditions::{ConditionValues, ValidationErrors};
use crate::logic::history::{HistoryError, HistorySource, HistoryStore};
use crate::logic::service::{PredictError, PredictionService};
use crate::logic::session::{AccessError, SessionWatch};
use crate::logic::severity::{ConfidenceSource, PredictionResult, RandomConfidence};
use crate::logic::stats::AdminStats;

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Inline per-field messages; nothing was submitted
    #[error("form is incomplete")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Prediction(#[from] PredictError),

    #[error(transparent)]
    Save(#[from] HistoryError),
}

/// State of the history section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryView {
    /// Not loaded yet
    Loading,
    Ready,
    /// Load failed; stays here until retried
    Unavailable,
}

pub struct PredictionApp<S: HistorySource, C: ConfidenceSource = RandomConfidence> {
    service: PredictionService<C>,
    source: S,
    session: SessionWatch,
    /// Identifies this app instance to the single-flight guard
    flight_key: Uuid,
    history: HistoryStore,
    history_view: HistoryView,
    current: Option<PredictionResult>,
    field_errors: ValidationErrors,
    banner: Option<String>,
}

impl<S: HistorySource, C: ConfidenceSource> PredictionApp<S, C> {
    pub fn new(service: PredictionService<C>, source: S, session: SessionWatch) -> Self {
        Self {
            service,
            source,
            session,
            flight_key: Uuid::new_v4(),
            history: HistoryStore::new(),
            history_view: HistoryView::Loading,
            current: None,
            field_errors: ValidationErrors::new(),
            banner: None,
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Read the full history from the storage collaborator
    pub fn load_history(&mut self) -> Result<(), HistoryError> {
        match self.source.load() {
            Ok(entries) => {
                self.history.replace(entries);
                self.history_view = HistoryView::Ready;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load prediction history: {}", e);
                self.history_view = HistoryView::Unavailable;
                self.banner = Some(HISTORY_LOAD_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Submit the form: validate, predict, save, prepend to history
    ///
    /// Validation failures only set field messages and leave any banner in
    /// place. Any later failure sets the banner and leaves the history
    /// untouched. The save runs inside the prediction's flight.
    pub async fn submit(&mut self, values: ConditionValues) -> Result<PredictionResult, SubmitError> {
        let flight = match self.service.begin(self.flight_key, &values) {
            Ok(flight) => flight,
            Err(PredictError::Invalid(errors)) => {
                self.field_errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
            Err(e) => {
                log::error!("Prediction failed: {}", e);
                self.banner = Some(PREDICTION_FAILED_MESSAGE.to_string());
                return Err(e.into());
            }
        };

        self.banner = None;
        self.field_errors = ValidationErrors::new();

        let result = self.service.run(&flight, &values).await;
        self.current = Some(result.clone());

        if let Err(e) = self.source.save(&result) {
            log::error!("Failed to save prediction {}: {}", result.id, e);
            self.banner = Some(PREDICTION_FAILED_MESSAGE.to_string());
            return Err(e.into());
        }

        self.history.record(result.clone());
        Ok(result)
    }

    /// The user edited a field: its message goes away
    pub fn edit_field(&mut self, id: &str) {
        self.field_errors.clear(id);
    }

    /// Show a past prediction as the current one
    pub fn select(&mut self, id: Uuid) -> Option<&PredictionResult> {
        let selected = self.history.find(id)?.clone();
        self.current = Some(selected);
        self.current.as_ref()
    }

    /// Admin aggregates; requires a live session
    pub fn dashboard(&self, total_users: u64) -> Result<AdminStats, AccessError> {
        self.session.require(Utc::now())?;
        Ok(AdminStats::from_predictions(self.history.iter(), total_users))
    }

    // ------------------------------------------------------------------
    // View state
    // ------------------------------------------------------------------

    pub fn history(&self) -> &[PredictionResult] {
        self.history.all()
    }

    pub fn history_view(&self) -> HistoryView {
        self.history_view
    }

    pub fn current(&self) -> Option<&PredictionResult> {
        self.current.as_ref()
    }

    pub fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::conditions::ConditionValue;
    use crate::logic::session::{Session, SessionHandle};
    use crate::logic::severity::{FixedConfidence, Severity};
    use std::time::Duration;

    /// Backend that fails on demand
    #[derive(Default)]
    struct FlakySource {
        inner: HistoryStore,
        fail_load: bool,
        fail_save: bool,
    }

    impl HistorySource for FlakySource {
        fn load(&self) -> Result<Vec<PredictionResult>, HistoryError> {
            if self.fail_load {
                return Err(HistoryError::Unavailable("offline".to_string()));
            }
            self.inner.load()
        }

        fn save(&mut self, prediction: &PredictionResult) -> Result<(), HistoryError> {
            if self.fail_save {
                return Err(HistoryError::Unavailable("offline".to_string()));
            }
            self.inner.save(prediction)
        }
    }

    fn form(weather: &str, road: &str, visibility: f64) -> ConditionValues {
        [
            ("weather", ConditionValue::from(weather)),
            ("time", ConditionValue::from("14:30")),
            ("date", ConditionValue::from("2025-03-10")),
            ("location", ConditionValue::from("Rural")),
            ("speedLimit", ConditionValue::from(45.0)),
            ("trafficDensity", ConditionValue::from("Low")),
            ("roadCondition", ConditionValue::from(road)),
            ("visibilityMeters", ConditionValue::from(visibility)),
        ]
        .into_iter()
        .collect()
    }

    fn app<S: HistorySource>(source: S, handle: &SessionHandle) -> PredictionApp<S, FixedConfidence> {
        let _ = env_logger::builder().is_test(true).try_init();
        let service = PredictionService::new(FixedConfidence(0.8)).with_latency(Duration::ZERO);
        PredictionApp::new(service, source, handle.subscribe())
    }

    #[tokio::test]
    async fn test_submit_prepends_to_history() {
        let handle = SessionHandle::new();
        let mut app = app(HistoryStore::sample(), &handle);
        app.load_history().unwrap();
        assert_eq!(app.history_view(), HistoryView::Ready);

        let first = app.submit(form("Rain", "Dry", 300.0)).await.unwrap();
        let second = app.submit(form("Clear", "Dry", 1000.0)).await.unwrap();

        assert_eq!(first.severity, Severity::Severe);
        assert_eq!(second.severity, Severity::Minor);
        assert_eq!(app.history().len(), 5);
        assert_eq!(app.history()[0], second);
        assert_eq!(app.history()[1], first);
        assert_eq!(app.current(), Some(&second));

        // The backend saw the same inserts.
        assert_eq!(app.source().load().unwrap(), app.history().to_vec());
    }

    #[tokio::test]
    async fn test_invalid_submit_sets_field_errors_only() {
        let handle = SessionHandle::new();
        let mut app = app(HistoryStore::new(), &handle);
        app.load_history().unwrap();

        let mut values = form("Clear", "Dry", 1000.0);
        values.insert("visibilityMeters", 0.0);

        assert!(matches!(app.submit(values).await, Err(SubmitError::Invalid(_))));
        assert!(app.field_errors().contains("visibilityMeters"));
        assert_eq!(app.banner(), None);
        assert!(app.history().is_empty());

        app.edit_field("visibilityMeters");
        assert!(app.field_errors().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_sets_banner_and_keeps_history() {
        let handle = SessionHandle::new();
        let source = FlakySource {
            fail_save: true,
            ..Default::default()
        };
        let mut app = app(source, &handle);
        app.load_history().unwrap();

        let outcome = app.submit(form("Snow", "Icy", 50.0)).await;

        assert!(matches!(outcome, Err(SubmitError::Save(_))));
        assert_eq!(app.banner(), Some(PREDICTION_FAILED_MESSAGE));
        assert!(app.history().is_empty());
    }

    #[tokio::test]
    async fn test_retry_after_failure_clears_banner() {
        let handle = SessionHandle::new();
        let source = FlakySource {
            fail_save: true,
            ..Default::default()
        };
        let mut app = app(source, &handle);
        assert!(app.submit(form("Fog", "Wet", 150.0)).await.is_err());

        app.source.fail_save = false;
        let result = app.submit(form("Fog", "Wet", 150.0)).await.unwrap();

        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(app.banner(), None);
        assert_eq!(app.history().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_submit_keeps_existing_banner() {
        let handle = SessionHandle::new();
        let source = FlakySource {
            fail_save: true,
            ..Default::default()
        };
        let mut app = app(source, &handle);
        assert!(app.submit(form("Rain", "Wet", 400.0)).await.is_err());
        assert_eq!(app.banner(), Some(PREDICTION_FAILED_MESSAGE));

        let mut values = form("Rain", "Wet", 400.0);
        values.insert("weather", "");
        assert!(matches!(app.submit(values).await, Err(SubmitError::Invalid(_))));

        assert_eq!(app.banner(), Some(PREDICTION_FAILED_MESSAGE));
        assert!(app.field_errors().contains("weather"));
    }

    #[test]
    fn test_history_load_failure() {
        let handle = SessionHandle::new();
        let source = FlakySource {
            fail_load: true,
            ..Default::default()
        };
        let mut app = app(source, &handle);

        assert!(app.load_history().is_err());
        assert_eq!(app.history_view(), HistoryView::Unavailable);
        assert_eq!(app.banner(), Some(HISTORY_LOAD_FAILED_MESSAGE));

        app.source.fail_load = false;
        app.load_history().unwrap();
        assert_eq!(app.history_view(), HistoryView::Ready);
    }

    #[test]
    fn test_select_history_item() {
        let handle = SessionHandle::new();
        let mut app = app(HistoryStore::sample(), &handle);
        app.load_history().unwrap();

        let target = app.history()[2].clone();
        assert_eq!(app.select(target.id), Some(&target));
        assert_eq!(app.current(), Some(&target));
        assert_eq!(app.select(Uuid::nil()), None);
    }

    #[test]
    fn test_dashboard_requires_session() {
        let handle = SessionHandle::new();
        let mut app = app(HistoryStore::sample(), &handle);
        app.load_history().unwrap();

        assert_eq!(app.dashboard(1), Err(AccessError::SignInRequired));

        handle.sign_in(Session {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        });

        let stats = app.dashboard(1).unwrap();
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.total_users, 1);
    }
}
