//! Model States and Trajectories
//!
//! A `ModelState` is one point of the simulated state space:
//!
//! - S: negative-population measure
//! - I: positive-population measure
//! - N: neutral-population measure
//! - dI: derivative sample of I at that point
//!
//! A `Trajectory` is the ordered sequence produced by one simulation run.
//! It is never mutated after production and is shared read-only
//! (`Arc<Trajectory>`) between the animator and the charting consumers.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One point in the simulated state space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    /// Step index (simulation time in steps)
    pub step: usize,
    /// Negative-population measure
    pub s: f64,
    /// Positive-population measure
    pub i: f64,
    /// Neutral-population measure
    pub n: f64,
    /// Derivative of I evaluated at this state
    pub di: f64,
}

impl ModelState {
    /// Read a named component
    pub fn component(&self, component: Component) -> f64 {
        match component {
            Component::S => self.s,
            Component::I => self.i,
            Component::N => self.n,
            Component::DI => self.di,
        }
    }

    /// S + I + N
    pub fn total(&self) -> f64 {
        self.s + self.i + self.n
    }

    /// Relative growth of the positive population, in percent
    ///
    /// stability = dI / I · 100, or 0 when I vanishes.
    pub fn stability_index(&self) -> f64 {
        if self.i.abs() < f64::EPSILON {
            return 0.0;
        }
        let index = self.di / self.i * 100.0;
        if index.is_finite() { index } else { 0.0 }
    }
}

/// Named component of a `ModelState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Negative population
    S,
    /// Positive population
    I,
    /// Neutral population
    N,
    /// Derivative of the positive population
    DI,
}

impl Component {
    pub const ALL: [Component; 4] = [Component::S, Component::I, Component::N, Component::DI];

    pub fn label(&self) -> &'static str {
        match self {
            Component::S => "S",
            Component::I => "I",
            Component::N => "N",
            Component::DI => "dI",
        }
    }
}

/// Ordered, immutable sequence of states from one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    states: Vec<ModelState>,
    /// Population constant C fixed at simulator start
    population: f64,
    /// Fixed point (S*, I*) of the generating model, if known
    equilibrium: Option<(f64, f64)>,
}

impl Trajectory {
    pub fn new(states: Vec<ModelState>, population: f64, equilibrium: Option<(f64, f64)>) -> Self {
        Self {
            states,
            population,
            equilibrium,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ModelState> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[ModelState] {
        &self.states
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelState> {
        self.states.iter()
    }

    pub fn first(&self) -> Option<&ModelState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&ModelState> {
        self.states.last()
    }

    pub fn population(&self) -> f64 {
        self.population
    }

    pub fn equilibrium(&self) -> Option<(f64, f64)> {
        self.equilibrium
    }

    /// Values of one component over time
    pub fn series(&self, component: Component) -> Vec<f64> {
        self.states.iter().map(|s| s.component(component)).collect()
    }

    /// Stability index over time
    pub fn stability_series(&self) -> Vec<f64> {
        self.states.iter().map(ModelState::stability_index).collect()
    }

    /// (min, max) of one component, `None` for an empty trajectory
    pub fn bounds(&self, component: Component) -> Option<(f64, f64)> {
        if self.states.is_empty() {
            return None;
        }
        let values = self.states.iter().map(|s| s.component(component));
        let min = values.clone().fold(f64::INFINITY, f64::min);
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Export as a (steps × 4) matrix with columns S, I, N, dI
    pub fn to_array(&self) -> Array2<f64> {
        let mut data = Array2::zeros((self.states.len(), Component::ALL.len()));
        for (row, state) in self.states.iter().enumerate() {
            for (col, &component) in Component::ALL.iter().enumerate() {
                data[[row, col]] = state.component(component);
            }
        }
        data
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a ModelState;
    type IntoIter = std::slice::Iter<'a, ModelState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(step: usize, s: f64, i: f64, n: f64, di: f64) -> ModelState {
        ModelState { step, s, i, n, di }
    }

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![
                state(0, 2.0, 2.0, 96.0, 28.9),
                state(1, 20.0, 30.9, 49.1, 10.0),
                state(2, 15.0, 40.0, 45.0, -1.0),
            ],
            100.0,
            None,
        )
    }

    #[test]
    fn test_series_and_bounds() {
        let traj = sample();
        assert_eq!(traj.series(Component::S), vec![2.0, 20.0, 15.0]);
        assert_eq!(traj.bounds(Component::I), Some((2.0, 40.0)));
        assert_eq!(traj.bounds(Component::DI), Some((-1.0, 28.9)));
    }

    #[test]
    fn test_bounds_empty() {
        let traj = Trajectory::new(Vec::new(), 0.0, None);
        assert!(traj.bounds(Component::S).is_none());
        assert!(traj.to_array().is_empty());
    }

    #[test]
    fn test_to_array_layout() {
        let arr = sample().to_array();
        assert_eq!(arr.dim(), (3, 4));
        assert_eq!(arr[[1, 0]], 20.0);
        assert_eq!(arr[[1, 2]], 49.1);
        assert_eq!(arr[[2, 3]], -1.0);
    }

    #[test]
    fn test_stability_index_zero_population() {
        let s = state(0, 10.0, 0.0, 90.0, 5.0);
        assert_eq!(s.stability_index(), 0.0);

        let s = state(0, 10.0, 20.0, 70.0, 5.0);
        assert!((s.stability_index() - 25.0).abs() < 1e-12);
    }
}
