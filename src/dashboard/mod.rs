//! Dashboard Module: Session-Bound Portrait Lifecycle
//!
//! Glue between the asynchronous collaborators (authentication, observation
//! source) and the synchronous core (simulator, animator):
//!
//! - **AuthClient**: `get_session`, `on_session_change`, `sign_out`
//! - **ObservationSource**: paged, filtered, fallible fetch
//! - **DashboardController**: owns the current animator and trend chart

mod auth;
mod source;
mod controller;

pub use auth::{AuthClient, Session, InMemoryAuth};
pub use source::{ObservationSource, ObservationQuery, InMemorySource, DEFAULT_PAGE_SIZE};
pub use controller::{DashboardController, DashboardConfig, TrendChart, RefreshOutcome};
