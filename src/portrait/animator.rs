//! Trajectory Animator: Incremental Phase-Portrait Playback
//!
//! Plays a `Trajectory` back onto a `Surface`, one point per tick:
//!
//! ```text
//!   restart() ──► schedule(delay) ──► host fires ──► tick()
//!                      ▲                               │
//!                      │         draw frame[cursor]    │
//!                      └──── cursor += 1 ◄─────────────┘
//!                               (stops after the last frame)
//! ```
//!
//! - delay = base_delay / speed
//! - at most one tick is pending; restart/stop/drop cancel it first
//! - the cursor never passes `len - 1` and never wraps
//!
//! An animator whose surface lookup failed is inert: every operation is a
//! logged no-op and nothing is ever scheduled.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::color::{Color, TrailColoring};
use super::mapping::{Point, Viewport, ViewportFit};
use super::scheduler::{Scheduler, TickHandle};
use super::surface::{Stroke, Surface, SurfaceProvider};
use crate::error::AnimatorError;
use crate::systems::{Component, Trajectory};

/// Grid divisions per axis
const GRID_DIVISIONS: usize = 10;

/// Tick labels per axis
const AXIS_TICKS: usize = 5;

/// Animator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// Delay between ticks at speed 1, in milliseconds
    pub base_delay_ms: u64,
    /// Initial speed multiplier
    pub speed: f64,
    /// Component on the horizontal axis
    pub x: Component,
    /// Component on the vertical axis
    pub y: Component,
    /// Viewport fitting strategy
    pub fit: ViewportFit,
    /// Draw grid, axes and tick labels
    pub decorations: bool,
    /// Trail coloring strategy
    pub trail: TrailColoring,
    pub trail_width: f64,
    pub marker_radius: f64,
    /// Draw the model's equilibrium point when known
    pub show_equilibrium: bool,
    pub equilibrium_radius: f64,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 100,
            speed: 1.0,
            x: Component::S,
            y: Component::I,
            fit: ViewportFit::default(),
            decorations: true,
            trail: TrailColoring::default(),
            trail_width: 2.0,
            marker_radius: 4.0,
            show_equilibrium: true,
            equilibrium_radius: 12.0,
        }
    }
}

impl AnimatorConfig {
    pub fn validate(&self) -> Result<(), AnimatorError> {
        check_speed(self.speed)
    }
}

fn check_speed(speed: f64) -> Result<(), AnimatorError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(AnimatorError::InvalidSpeed(speed))
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Not started or stopped
    Idle,
    /// Ticks are being scheduled
    Playing,
    /// Last frame drawn
    Finished,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No surface bound
    Inert,
    /// Not playing (idle or finished)
    Idle,
    /// Frame drawn; `finished` when it was the last one
    Drew { frame: usize, finished: bool },
    /// Nothing to draw (empty trajectory)
    Skipped,
}

/// Phase-portrait animator bound to one surface and one trajectory
pub struct Animator<S: Surface, K: Scheduler> {
    surface: Option<S>,
    trajectory: Arc<Trajectory>,
    scheduler: K,
    config: AnimatorConfig,
    viewport: Viewport,
    /// Animation cursor: next frame to draw
    cursor: usize,
    speed: f64,
    playback: Playback,
    pending: Option<TickHandle>,
    /// Construction fault that made this animator inert
    fault: Option<AnimatorError>,
}

impl<S: Surface, K: Scheduler> Animator<S, K> {
    /// Bind an animator to a surface already in hand
    ///
    /// An invalid initial speed falls back to 1 and is logged.
    pub fn new(
        surface: S,
        trajectory: impl Into<Arc<Trajectory>>,
        scheduler: K,
        config: AnimatorConfig,
    ) -> Self {
        Self::build(Some(surface), trajectory.into(), scheduler, config, None)
    }

    /// Look the surface up by identifier
    ///
    /// A missing surface is reported and yields an inert animator.
    pub fn attach<P>(
        provider: &mut P,
        surface_id: &str,
        trajectory: impl Into<Arc<Trajectory>>,
        scheduler: K,
        config: AnimatorConfig,
    ) -> Self
    where
        P: SurfaceProvider<Surface = S>,
    {
        match provider.surface(surface_id) {
            Some(surface) => Self::build(Some(surface), trajectory.into(), scheduler, config, None),
            None => {
                let fault = AnimatorError::SurfaceNotFound(surface_id.to_string());
                error!("{fault}; animator left inert");
                Self::build(None, trajectory.into(), scheduler, config, Some(fault))
            }
        }
    }

    /// Like `attach`, but a missing surface is an error
    pub fn try_attach<P>(
        provider: &mut P,
        surface_id: &str,
        trajectory: impl Into<Arc<Trajectory>>,
        scheduler: K,
        config: AnimatorConfig,
    ) -> Result<Self, AnimatorError>
    where
        P: SurfaceProvider<Surface = S>,
    {
        config.validate()?;
        let surface = provider
            .surface(surface_id)
            .ok_or_else(|| AnimatorError::SurfaceNotFound(surface_id.to_string()))?;
        Ok(Self::build(Some(surface), trajectory.into(), scheduler, config, None))
    }

    fn build(
        surface: Option<S>,
        trajectory: Arc<Trajectory>,
        scheduler: K,
        config: AnimatorConfig,
        fault: Option<AnimatorError>,
    ) -> Self {
        let (width, height) = surface
            .as_ref()
            .map(Surface::size)
            .unwrap_or((0.0, 0.0));

        let extra = if config.show_equilibrium {
            equilibrium_point(&trajectory, config.x, config.y)
        } else {
            None
        };
        let viewport = Viewport::fit(
            &trajectory,
            config.x,
            config.y,
            extra,
            config.fit,
            width,
            height,
        );

        let speed = match check_speed(config.speed) {
            Ok(()) => config.speed,
            Err(e) => {
                warn!("{e}; using 1");
                1.0
            }
        };

        if trajectory.is_empty() {
            warn!("animator bound to an empty trajectory");
        }

        Self {
            surface,
            trajectory,
            scheduler,
            config,
            viewport,
            cursor: 0,
            speed,
            playback: Playback::Idle,
            pending: None,
            fault,
        }
    }

    /// Construction fault, if the animator is inert
    pub fn fault(&self) -> Option<&AnimatorError> {
        self.fault.as_ref()
    }

    pub fn is_inert(&self) -> bool {
        self.surface.is_none()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn is_finished(&self) -> bool {
        self.playback == Playback::Finished
    }

    pub fn has_pending_tick(&self) -> bool {
        self.pending.is_some()
    }

    pub fn trajectory(&self) -> &Arc<Trajectory> {
        &self.trajectory
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn scheduler(&self) -> &K {
        &self.scheduler
    }

    /// Delay until the next tick at the current speed
    pub fn tick_delay(&self) -> Duration {
        let nanos = (self.config.base_delay_ms as f64 * 1e6 / self.speed).round();
        Duration::from_nanos(nanos as u64)
    }

    /// Begin playback from frame 0
    pub fn start(&mut self) {
        self.restart();
    }

    /// Cancel any pending tick, rewind to frame 0 and play
    pub fn restart(&mut self) {
        if self.is_inert() {
            warn!("restart ignored: animator has no surface");
            return;
        }
        self.cancel_pending();
        self.cursor = 0;
        self.playback = Playback::Playing;
        self.schedule_next();
        debug!(frames = self.trajectory.len(), speed = self.speed, "playback restarted");
    }

    /// Cancel any pending tick and idle
    pub fn stop(&mut self) {
        self.cancel_pending();
        if self.playback == Playback::Playing {
            self.playback = Playback::Idle;
        }
    }

    /// Change the speed multiplier; applies from the next scheduled tick
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), AnimatorError> {
        check_speed(multiplier)?;
        self.speed = multiplier;
        Ok(())
    }

    /// Scheduled step: draw the cursor's frame and schedule the next one
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_inert() {
            return TickOutcome::Inert;
        }
        // A fired handle is no longer queued, so cancelling it is a no-op
        self.cancel_pending();

        if self.playback != Playback::Playing {
            return TickOutcome::Idle;
        }

        let frame = self.cursor;
        if let Err(e) = self.draw_frame(frame) {
            warn!("tick skipped: {e}");
            self.playback = Playback::Finished;
            return TickOutcome::Skipped;
        }

        if frame + 1 >= self.trajectory.len() {
            self.playback = Playback::Finished;
            debug!(frame, "playback finished");
            return TickOutcome::Drew { frame, finished: true };
        }

        self.cursor = frame + 1;
        self.schedule_next();
        TickOutcome::Drew { frame, finished: false }
    }

    /// Render the state of frame `index`
    ///
    /// Out-of-range frames draw nothing.
    pub fn draw_frame(&mut self, index: usize) -> Result<(), AnimatorError> {
        let len = self.trajectory.len();
        if len == 0 {
            return Err(AnimatorError::EmptyTrajectory);
        }
        if index >= len {
            return Err(AnimatorError::FrameOutOfRange { index, len });
        }
        let Some(surface) = self.surface.as_mut() else {
            return Err(AnimatorError::Inert);
        };

        let config = &self.config;
        let viewport = &self.viewport;
        let states = self.trajectory.states();

        surface.clear();
        if config.decorations {
            draw_grid(surface, viewport);
            draw_axes(surface, viewport);
        }

        let project = |k: usize| {
            let st = &states[k];
            viewport.map(st.component(config.x), st.component(config.y))
        };

        for k in 1..=index {
            let color = config.trail.segment_color(k, len, states[k].di);
            let stroke = Stroke::solid(color, config.trail_width);
            surface.stroke_line(project(k - 1), project(k), &stroke);
        }

        if config.show_equilibrium {
            if let Some((ex, ey)) = equilibrium_point(&self.trajectory, config.x, config.y) {
                surface.fill_circle(
                    viewport.map(ex, ey),
                    config.equilibrium_radius,
                    &Color::EQUILIBRIUM,
                );
            }
        }

        surface.fill_circle(project(index), config.marker_radius, &Color::MARKER);
        Ok(())
    }

    fn schedule_next(&mut self) {
        let delay = self.tick_delay();
        self.pending = Some(self.scheduler.schedule(delay));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<S: Surface, K: Scheduler> Drop for Animator<S, K> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Equilibrium in plotted coordinates, only for the (S, I) plane
fn equilibrium_point(trajectory: &Trajectory, x: Component, y: Component) -> Option<(f64, f64)> {
    let (s, i) = trajectory.equilibrium()?;
    match (x, y) {
        (Component::S, Component::I) => Some((s, i)),
        (Component::I, Component::S) => Some((i, s)),
        _ => None,
    }
}

fn draw_grid<S: Surface>(surface: &mut S, viewport: &Viewport) {
    let stroke = Stroke::dashed(Color::GRID, 1.0, 2.0, 3.0);
    let (w, h) = (viewport.width, viewport.height);
    for k in 0..=GRID_DIVISIONS {
        let x = w * k as f64 / GRID_DIVISIONS as f64;
        surface.stroke_line(Point::new(x, 0.0), Point::new(x, h), &stroke);
    }
    for k in 0..=GRID_DIVISIONS {
        let y = h * k as f64 / GRID_DIVISIONS as f64;
        surface.stroke_line(Point::new(0.0, y), Point::new(w, y), &stroke);
    }
}

fn draw_axes<S: Surface>(surface: &mut S, viewport: &Viewport) {
    let stroke = Stroke::solid(Color::AXIS, 1.0);
    let (w, h) = (viewport.width, viewport.height);

    surface.stroke_line(Point::new(0.0, h), Point::new(w, h), &stroke);
    surface.stroke_line(Point::new(0.0, 0.0), Point::new(0.0, h), &stroke);

    for k in 0..=AXIS_TICKS {
        let t = k as f64 / AXIS_TICKS as f64;
        let label = format!("{:.1}", viewport.x.lerp(t));
        surface.fill_text(Point::new(t * w - 10.0, h - 5.0), &label, &Color::LABEL);
    }
    for k in 0..=AXIS_TICKS {
        let t = k as f64 / AXIS_TICKS as f64;
        let label = format!("{:.1}", viewport.y.lerp(t));
        surface.fill_text(Point::new(5.0, h - t * h + 5.0), &label, &Color::LABEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portrait::scheduler::ManualScheduler;
    use crate::portrait::surface::{DrawOp, RecordingProvider, RecordingSurface};
    use crate::systems::{ModelState, Simulator};

    type TestAnimator = Animator<RecordingSurface, ManualScheduler>;

    fn trajectory(len: usize) -> Arc<Trajectory> {
        let states = (0..len)
            .map(|step| ModelState {
                step,
                s: step as f64,
                i: (step * step) as f64,
                n: 0.0,
                di: if step % 2 == 0 { 1.0 } else { -1.0 },
            })
            .collect();
        Arc::new(Trajectory::new(states, 0.0, None))
    }

    fn animator(len: usize, config: AnimatorConfig) -> (TestAnimator, ManualScheduler) {
        let host = ManualScheduler::new();
        let anim =
            Animator::new(RecordingSurface::default(), trajectory(len), host.clone(), config);
        (anim, host)
    }

    fn play_to_end(anim: &mut TestAnimator, host: &ManualScheduler) -> usize {
        let mut ticks = 0;
        while host.fire_next().is_some() {
            anim.tick();
            ticks += 1;
        }
        ticks
    }

    fn current_marker(anim: &TestAnimator) -> Point {
        let surface = anim.surface().unwrap();
        let (center, _, _) = surface
            .circles()
            .filter(|(_, _, c)| **c == Color::MARKER)
            .last()
            .unwrap();
        *center
    }

    #[test]
    fn test_full_playback_draws_every_frame_once() {
        let (mut anim, host) = animator(5, AnimatorConfig::default());
        anim.start();
        assert_eq!(host.pending_count(), 1);

        let ticks = play_to_end(&mut anim, &host);
        assert_eq!(ticks, 5);
        assert!(anim.is_finished());
        assert_eq!(anim.cursor(), 4);
        assert_eq!(anim.surface().unwrap().frames(), 5);
        assert_eq!(host.pending_count(), 0, "no tick may be scheduled after the last frame");
    }

    #[test]
    fn test_tick_after_end_is_noop() {
        let (mut anim, host) = animator(3, AnimatorConfig::default());
        anim.start();
        play_to_end(&mut anim, &host);

        let frames = anim.surface().unwrap().frames();
        assert_eq!(anim.tick(), TickOutcome::Idle);
        assert_eq!(anim.tick(), TickOutcome::Idle);
        assert_eq!(anim.cursor(), 2);
        assert_eq!(anim.surface().unwrap().frames(), frames);
    }

    #[test]
    fn test_restart_renders_frame_zero() {
        let (mut anim, host) = animator(6, AnimatorConfig::default());
        let origin = anim.viewport().map(0.0, 0.0);

        // Mid-playback.
        anim.start();
        host.fire_next();
        anim.tick();
        host.fire_next();
        anim.tick();
        anim.restart();
        assert_eq!(anim.cursor(), 0);
        assert_eq!(host.pending_count(), 1, "restart must not double-schedule");
        host.fire_next();
        assert_eq!(anim.tick(), TickOutcome::Drew { frame: 0, finished: false });
        assert_eq!(current_marker(&anim), origin);

        // After completion.
        play_to_end(&mut anim, &host);
        anim.restart();
        assert_eq!(anim.cursor(), 0);
        host.fire_next();
        anim.tick();
        assert_eq!(current_marker(&anim), origin);
    }

    #[test]
    fn test_restart_cancels_pending_tick() {
        let (mut anim, host) = animator(10, AnimatorConfig::default());
        anim.start();
        anim.restart();
        anim.restart();
        assert_eq!(host.pending_count(), 1);
        assert_eq!(host.cancelled_count(), 2);
    }

    #[test]
    fn test_direct_tick_replaces_pending_tick() {
        let (mut anim, host) = animator(10, AnimatorConfig::default());
        anim.restart();
        assert_eq!(anim.tick(), TickOutcome::Drew { frame: 0, finished: false });
        assert_eq!(host.pending_count(), 1, "a direct tick must not leave two loops running");
        assert_eq!(host.cancelled_count(), 1);

        // Draining the host now advances one frame per fired tick.
        let ticks = play_to_end(&mut anim, &host);
        assert_eq!(ticks, 9);
        assert_eq!(anim.surface().unwrap().frames(), 10);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_host_fired_tick_not_counted_as_cancelled() {
        let (mut anim, host) = animator(3, AnimatorConfig::default());
        anim.start();
        play_to_end(&mut anim, &host);
        assert_eq!(host.cancelled_count(), 0);
    }

    #[test]
    fn test_speed_applies_to_next_tick() {
        let (mut anim, host) = animator(4, AnimatorConfig::default());
        anim.start();
        assert_eq!(anim.set_speed(4.0), Ok(()));
        host.fire_next();
        anim.tick();

        let delays = host.requested_delays();
        assert_eq!(delays[0], Duration::from_millis(100));
        assert_eq!(delays[1], Duration::from_millis(25));
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let (mut anim, _host) = animator(4, AnimatorConfig::default());
        assert_eq!(anim.set_speed(0.0), Err(AnimatorError::InvalidSpeed(0.0)));
        assert!(anim.set_speed(f64::NAN).is_err());
        assert_eq!(anim.speed(), 1.0);
    }

    #[test]
    fn test_missing_surface_is_inert() {
        let mut provider = RecordingProvider::new();
        let host = ManualScheduler::new();
        let mut anim: TestAnimator = Animator::attach(
            &mut provider,
            "no-such-canvas",
            trajectory(5),
            host.clone(),
            AnimatorConfig::default(),
        );

        assert_eq!(anim.fault(), Some(&AnimatorError::SurfaceNotFound("no-such-canvas".into())));
        anim.restart();
        assert_eq!(anim.tick(), TickOutcome::Inert);
        assert_eq!(host.pending_count(), 0);
        assert!(host.requested_delays().is_empty(), "inert animator must never schedule");
        assert_eq!(anim.draw_frame(0), Err(AnimatorError::Inert));
    }

    #[test]
    fn test_try_attach_reports_missing_surface() {
        let mut provider = RecordingProvider::new();
        let result: Result<TestAnimator, _> = Animator::try_attach(
            &mut provider,
            "gone",
            trajectory(2),
            ManualScheduler::new(),
            AnimatorConfig::default(),
        );
        assert!(matches!(result, Err(AnimatorError::SurfaceNotFound(_))));
    }

    #[test]
    fn test_draw_frame_out_of_range() {
        let (mut anim, _host) = animator(3, AnimatorConfig::default());
        assert_eq!(anim.draw_frame(3), Err(AnimatorError::FrameOutOfRange { index: 3, len: 3 }));
        assert_eq!(anim.surface().unwrap().frames(), 0, "out-of-range frame must draw nothing");
    }

    #[test]
    fn test_empty_trajectory_tick_skipped() {
        let (mut anim, host) = animator(0, AnimatorConfig::default());
        anim.start();
        host.fire_next();
        assert_eq!(anim.tick(), TickOutcome::Skipped);
        assert_eq!(host.pending_count(), 0);
        assert_eq!(anim.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_trail_segments_up_to_cursor() {
        let config = AnimatorConfig { decorations: false, ..AnimatorConfig::default() };
        let (mut anim, _host) = animator(6, config);
        anim.draw_frame(4).unwrap();

        let surface = anim.surface().unwrap();
        let segments = surface.solid_lines().count();
        assert_eq!(segments, 4);
        let hues: Vec<f64> = surface
            .solid_lines()
            .map(|(_, _, stroke)| match stroke.color {
                Color::Hsl(h, _, _) => h,
                other => panic!("unexpected trail color {other}"),
            })
            .collect();
        assert!(hues.windows(2).all(|w| w[0] < w[1]), "hues must increase: {:?}", hues);
    }

    #[test]
    fn test_slope_sign_coloring() {
        let config = AnimatorConfig {
            decorations: false,
            trail: TrailColoring::SlopeSign,
            ..AnimatorConfig::default()
        };
        let (mut anim, _host) = animator(4, config);
        anim.draw_frame(3).unwrap();
        let colors: Vec<Color> = anim
            .surface()
            .unwrap()
            .solid_lines()
            .map(|(_, _, stroke)| stroke.color)
            .collect();
        // di alternates +1 / -1 starting at step 0; segment k ends at step k.
        assert_eq!(colors, vec![Color::FALLING, Color::RISING, Color::FALLING]);
    }

    #[test]
    fn test_decorations_present() {
        let (mut anim, _host) = animator(2, AnimatorConfig::default());
        anim.draw_frame(0).unwrap();
        let ops = anim.surface().unwrap().ops();
        let grid = ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { stroke, .. } if stroke.dash.is_some()))
            .count();
        let labels = ops.iter().filter(|op| matches!(op, DrawOp::Text { .. })).count();
        assert_eq!(grid, 2 * (GRID_DIVISIONS + 1));
        assert_eq!(labels, 2 * (AXIS_TICKS + 1));
    }

    #[test]
    fn test_equilibrium_marker_from_simulation() {
        let traj = Simulator::standard(100.0)
            .unwrap()
            .run_scores(&[-5.0, -4.0, 0.0, 4.0, 5.0])
            .unwrap();
        let (s_eq, i_eq) = traj.equilibrium().unwrap();
        let host = ManualScheduler::new();
        let mut anim =
            Animator::new(RecordingSurface::default(), traj, host, AnimatorConfig::default());
        anim.draw_frame(0).unwrap();

        let expected = anim.viewport().map(s_eq, i_eq);
        let found = anim
            .surface()
            .unwrap()
            .circles()
            .any(|(c, r, color)| *color == Color::EQUILIBRIUM && r == 12.0 && *c == expected);
        assert!(found, "equilibrium marker missing");
    }

    #[test]
    fn test_drop_cancels_pending() {
        let host = ManualScheduler::new();
        {
            let mut anim: TestAnimator = Animator::new(
                RecordingSurface::default(),
                trajectory(3),
                host.clone(),
                AnimatorConfig::default(),
            );
            anim.start();
            assert_eq!(host.pending_count(), 1);
        }
        assert_eq!(host.pending_count(), 0);
    }

    #[test]
    fn test_stop_idles() {
        let (mut anim, host) = animator(5, AnimatorConfig::default());
        anim.start();
        anim.stop();
        assert_eq!(anim.playback(), Playback::Idle);
        assert_eq!(host.pending_count(), 0);
        assert_eq!(anim.tick(), TickOutcome::Idle);
    }
}
