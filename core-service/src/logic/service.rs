//! Prediction Service
//!
//! Wraps the classifier in an asynchronous call with a fixed artificial
//! latency, standing in for a round-trip to a remote model.
//! At most one call per session is in flight; a second submit while the
//! first is pending is rejected, never run concurrently. Once started, a
//! call always completes.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::constants::{get_prediction_latency, DEFAULT_PREDICTION_LATENCY_MS};
use crate::logic::conditions::{validate, ConditionValues, ValidationErrors, ACCIDENT_CONDITIONS};
use crate::logic::severity::{classify, Clock, ConfidenceSource, PredictionResult, RandomConfidence, SystemClock};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{} field(s) failed validation", .0.len())]
    Invalid(ValidationErrors),

    #[error("a prediction is already in progress for this session")]
    InFlight,
}

// ============================================================================
// SINGLE FLIGHT
// ============================================================================

/// Registry of sessions with a pending prediction
#[derive(Debug, Default)]
pub struct SingleFlight {
    active: Mutex<HashSet<Uuid>>,
}

/// Marks a session as busy until dropped
#[derive(Debug)]
pub struct FlightGuard<'a> {
    owner: &'a SingleFlight,
    session: Uuid,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, session: Uuid) -> Result<FlightGuard<'_>, PredictError> {
        if !self.active.lock().insert(session) {
            log::warn!("Rejected concurrent prediction for session {}", session);
            return Err(PredictError::InFlight);
        }
        Ok(FlightGuard {
            owner: self,
            session,
        })
    }

    pub fn is_active(&self, session: Uuid) -> bool {
        self.active.lock().contains(&session)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.active.lock().remove(&self.session);
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct PredictionService<C: ConfidenceSource = RandomConfidence> {
    confidence: Mutex<C>,
    clock: Arc<dyn Clock>,
    latency: Duration,
    flights: SingleFlight,
}

impl PredictionService<RandomConfidence> {
    /// Entropy-seeded confidence and the system clock; latency from
    /// `PREDICTION_LATENCY_MS` when set
    pub fn random() -> Self {
        Self::new(RandomConfidence::new()).with_latency(get_prediction_latency())
    }
}

impl<C: ConfidenceSource> PredictionService<C> {
    pub fn new(confidence: C) -> Self {
        Self {
            confidence: Mutex::new(confidence),
            clock: Arc::new(SystemClock),
            latency: Duration::from_millis(DEFAULT_PREDICTION_LATENCY_MS),
            flights: SingleFlight::new(),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Whether `session` has a prediction pending
    pub fn is_pending(&self, session: Uuid) -> bool {
        self.flights.is_active(session)
    }

    /// Validate, wait out the simulated latency, then classify
    ///
    /// The session is free again as soon as this returns. Callers that
    /// persist the result use [`begin`](Self::begin) and
    /// [`run`](Self::run) so the save happens inside the flight.
    pub async fn predict(
        &self,
        session: Uuid,
        values: &ConditionValues,
    ) -> Result<PredictionResult, PredictError> {
        let flight = self.begin(session, values)?;
        Ok(self.run(&flight, values).await)
    }

    /// Validate and claim the session's flight
    ///
    /// Further submits for `session` are rejected until the guard drops.
    pub fn begin(
        &self,
        session: Uuid,
        values: &ConditionValues,
    ) -> Result<FlightGuard<'_>, PredictError> {
        validate(&ACCIDENT_CONDITIONS, values).map_err(PredictError::Invalid)?;
        self.flights.try_begin(session)
    }

    /// Classify within a claimed flight
    pub async fn run(&self, flight: &FlightGuard<'_>, values: &ConditionValues) -> PredictionResult {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = {
            let mut confidence = self.confidence.lock();
            classify(values, &mut *confidence, self.clock.as_ref())
        };

        log::info!(
            "Prediction {} for session {}: {} ({}%)",
            result.id,
            flight.session,
            result.severity,
            result.confidence_percent()
        );

        result
    }
}

// ============================================================================
// TESTS
// ============================================================================
