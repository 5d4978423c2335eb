//! Observation sources
//!
//! Queries are paged newest-first, optionally filtered by origin.

use serde::{Deserialize, Serialize};

use super::auth::Session;
use crate::error::SourceError;
use crate::observation::Observation;

/// Default page size
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Paged observation query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationQuery {
    /// Origin filter (`None`: all sources)
    pub source: Option<String>,
    /// 1-based page
    pub page: usize,
    pub per_page: usize,
}

impl Default for ObservationQuery {
    fn default() -> Self {
        Self {
            source: None,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ObservationQuery {
    /// Index range of this page
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.page.saturating_sub(1) * self.per_page;
        start..start + self.per_page
    }
}

/// Asynchronous, fallible observation collection
#[allow(async_fn_in_trait)]
pub trait ObservationSource {
    async fn fetch(
        &self,
        session: &Session,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, SourceError>;
}

/// Source backed by an in-memory collection
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    observations: Vec<Observation>,
}

impl InMemorySource {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }
}

impl ObservationSource for InMemorySource {
    async fn fetch(
        &self,
        _session: &Session,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, SourceError> {
        let mut matching: Vec<&Observation> = self
            .observations
            .iter()
            .filter(|o| match &query.source {
                Some(source) => o.source.as_deref() == Some(source.as_str()),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let range = query.range();
        Ok(matching
            .into_iter()
            .skip(range.start)
            .take(range.len())
            .cloned()
            .collect())
    }
}
