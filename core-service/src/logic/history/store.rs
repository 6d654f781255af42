//! In-memory prediction history, newest first

use uuid::Uuid;

use crate::logic::severity::PredictionResult;

/// Newest-first prediction history
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<PredictionResult>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demo records
    pub fn sample() -> Self {
        Self::from_newest_first(super::samples::sample_history())
    }

    /// Build from a list that is already ordered newest first
    pub fn from_newest_first(entries: Vec<PredictionResult>) -> Self {
        Self { entries }
    }

    /// Prepend a new prediction. Duplicates are kept.
    pub fn record(&mut self, prediction: PredictionResult) {
        self.entries.insert(0, prediction);
    }

    /// Replace the contents with a freshly loaded list
    pub fn replace(&mut self, entries: Vec<PredictionResult>) {
        self.entries = entries;
    }

    /// Everything, newest first
    pub fn all(&self) -> &[PredictionResult] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionResult> {
        self.entries.iter()
    }

    pub fn find(&self, id: Uuid) -> Option<&PredictionResult> {
        self.entries.iter().find(|p| p.id == id)
    }

    pub fn latest(&self) -> Option<&PredictionResult> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
