//! Dashboard Controller: Lifecycle of the Portrait and Trend Chart
//!
//! The controller is the single owner of the current animator and trend
//! chart. Every render releases the previous instances before creating new
//! ones, and nothing is built until the session and the data have
//! resolved:
//!
//! ```text
//!   get_session ──► fetch page ──► simulate ──► teardown old ──► attach new
//!        │              │ (error → empty set)      │
//!        └─ none/expired: teardown                 └─ config error: teardown
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::auth::{AuthClient, Session};
use super::source::{ObservationQuery, ObservationSource, DEFAULT_PAGE_SIZE};
use crate::error::DashboardError;
use crate::observation::Observation;
use crate::portrait::{Animator, AnimatorConfig, Scheduler, SurfaceProvider};
use crate::systems::{Component, Simulator, SimulatorConfig, Trajectory};

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Identifier of the portrait surface
    pub surface_id: String,
    pub posts_per_page: usize,
    /// Origin filter (`None`: all sources)
    pub source: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            surface_id: "phase-portrait".to_string(),
            posts_per_page: DEFAULT_PAGE_SIZE,
            source: None,
        }
    }
}

/// Series handed to the external charting collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    trajectory: Arc<Trajectory>,
}

impl TrendChart {
    pub fn new(trajectory: Arc<Trajectory>) -> Self {
        Self { trajectory }
    }

    pub fn negative(&self) -> Vec<f64> {
        self.trajectory.series(Component::S)
    }

    pub fn positive(&self) -> Vec<f64> {
        self.trajectory.series(Component::I)
    }

    pub fn neutral(&self) -> Vec<f64> {
        self.trajectory.series(Component::N)
    }

    pub fn stability(&self) -> Vec<f64> {
        self.trajectory.stability_series()
    }

    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }
}

/// What a refresh did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Portrait rebuilt from this many observations
    Rendered { observations: usize },
    /// No valid session; everything torn down
    SignedOut,
}

/// Owns the session-bound portrait and chart
pub struct DashboardController<A, O, P, K>
where
    A: AuthClient,
    O: ObservationSource,
    P: SurfaceProvider,
    K: Scheduler + Clone,
{
    auth: A,
    source: O,
    provider: P,
    scheduler: K,
    simulator: SimulatorConfig,
    animator_config: AnimatorConfig,
    config: DashboardConfig,
    query: ObservationQuery,
    observations: Vec<Observation>,
    animator: Option<Animator<P::Surface, K>>,
    chart: Option<TrendChart>,
}

impl<A, O, P, K> DashboardController<A, O, P, K>
where
    A: AuthClient,
    O: ObservationSource,
    P: SurfaceProvider,
    K: Scheduler + Clone,
{
    pub fn new(
        auth: A,
        source: O,
        provider: P,
        scheduler: K,
        simulator: SimulatorConfig,
        animator_config: AnimatorConfig,
        config: DashboardConfig,
    ) -> Self {
        let query = ObservationQuery {
            source: config.source.clone(),
            page: 1,
            per_page: config.posts_per_page,
        };
        Self {
            auth,
            source,
            provider,
            scheduler,
            simulator,
            animator_config,
            config,
            query,
            observations: Vec::new(),
            animator: None,
            chart: None,
        }
    }

    pub fn animator(&self) -> Option<&Animator<P::Surface, K>> {
        self.animator.as_ref()
    }

    pub fn animator_mut(&mut self) -> Option<&mut Animator<P::Surface, K>> {
        self.animator.as_mut()
    }

    pub fn chart(&self) -> Option<&TrendChart> {
        self.chart.as_ref()
    }

    pub fn query(&self) -> &ObservationQuery {
        &self.query
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    /// Reload the first page and rebuild the portrait
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, DashboardError> {
        self.query.page = 1;
        let Some(session) = self.active_session().await? else {
            return Ok(RefreshOutcome::SignedOut);
        };
        self.observations = self.fetch_page(&session).await;
        self.render()?;
        Ok(RefreshOutcome::Rendered { observations: self.observations.len() })
    }

    /// Append the next page and rebuild the portrait
    pub async fn load_next_page(&mut self) -> Result<RefreshOutcome, DashboardError> {
        let Some(session) = self.active_session().await? else {
            return Ok(RefreshOutcome::SignedOut);
        };
        self.query.page += 1;
        let page = self.fetch_page(&session).await;
        if page.is_empty() {
            debug!(page = self.query.page, "no more observations");
            self.query.page -= 1;
            return Ok(RefreshOutcome::Rendered { observations: self.observations.len() });
        }
        self.observations.extend(page);
        self.render()?;
        Ok(RefreshOutcome::Rendered { observations: self.observations.len() })
    }

    /// Switch the origin filter and reload from page 1
    pub async fn set_source(
        &mut self,
        source: Option<String>,
    ) -> Result<RefreshOutcome, DashboardError> {
        self.query.source = source;
        self.refresh().await
    }

    /// Sign out through the auth client and release everything
    pub async fn sign_out(&mut self) -> Result<(), DashboardError> {
        self.auth.sign_out().await?;
        self.teardown();
        Ok(())
    }

    /// Follow session changes until the auth client goes away
    ///
    /// A new session triggers a refresh; sign-out tears down.
    pub async fn follow_session_changes(&mut self) {
        let mut changes = self.auth.on_session_change();
        while changes.changed().await.is_ok() {
            let signed_in = changes.borrow_and_update().is_some();
            if signed_in {
                if let Err(e) = self.refresh().await {
                    error!("refresh after session change failed: {e}");
                }
            } else {
                info!("signed out; releasing dashboard");
                self.teardown();
            }
        }
    }

    /// Release the animator and chart
    pub fn teardown(&mut self) {
        if let Some(mut animator) = self.animator.take() {
            animator.stop();
            debug!("released phase portrait");
        }
        self.chart = None;
    }

    async fn active_session(&mut self) -> Result<Option<Session>, DashboardError> {
        let session = match self.auth.get_session().await {
            Ok(session) => session,
            Err(e) => {
                error!("session lookup failed: {e}");
                self.teardown();
                return Err(e.into());
            }
        };
        match session {
            Some(session) if !session.is_expired(Utc::now()) => Ok(Some(session)),
            Some(session) => {
                warn!(user = %session.user_id, "session expired");
                self.teardown();
                Ok(None)
            }
            None => {
                self.teardown();
                Ok(None)
            }
        }
    }

    async fn fetch_page(&self, session: &Session) -> Vec<Observation> {
        match self.source.fetch(session, &self.query).await {
            Ok(observations) => observations,
            Err(e) => {
                warn!(page = self.query.page, "observation fetch failed, using empty set: {e}");
                Vec::new()
            }
        }
    }

    /// Simulator settings for the loaded observations
    ///
    /// C grows to the number of observations so paging never overfills it.
    fn run_config(&self) -> SimulatorConfig {
        let loaded = self.observations.len() as f64;
        let mut config = self.simulator.clone();
        if loaded > config.population {
            debug!(
                loaded,
                configured = config.population,
                "population raised to observation count"
            );
            config.population = loaded;
        }
        config
    }

    fn render(&mut self) -> Result<(), DashboardError> {
        let trajectory = match Simulator::new(self.run_config())
            .and_then(|sim| sim.run_observations(&self.observations))
        {
            Ok(trajectory) => Arc::new(trajectory),
            Err(e) => {
                error!("simulation failed: {e}");
                self.teardown();
                return Err(e.into());
            }
        };

        self.teardown();

        let mut animator = Animator::attach(
            &mut self.provider,
            &self.config.surface_id,
            Arc::clone(&trajectory),
            self.scheduler.clone(),
            self.animator_config.clone(),
        );
        animator.start();
        self.animator = Some(animator);
        self.chart = Some(TrendChart::new(trajectory));
        Ok(())
    }
}
