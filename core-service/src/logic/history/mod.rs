//! History Module
//!
//! Ordered record of past predictions, newest first.
//! No update, no delete, no eviction: the list only grows.
//!
//! The store is owned by the caller and passed where it is needed;
//! there is no process-wide history.

pub mod samples;
pub mod store;


use thiserror::Error;

use crate::logic::severity::PredictionResult;

pub use store::HistoryStore;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage collaborator holding predictions between loads
///
/// A plain insert/select: `save` prepends, `load` returns everything
/// newest first.
pub trait HistorySource {
    fn load(&self) -> Result<Vec<PredictionResult>, HistoryError>;
    fn save(&mut self, prediction: &PredictionResult) -> Result<(), HistoryError>;
}

impl HistorySource for HistoryStore {
    fn load(&self) -> Result<Vec<PredictionResult>, HistoryError> {
        Ok(self.all().to_vec())
    }

    fn save(&mut self, prediction: &PredictionResult) -> Result<(), HistoryError> {
        self.record(prediction.clone());
        Ok(())
    }
}
