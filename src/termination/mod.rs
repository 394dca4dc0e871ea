//! Termination criteria
//!
//! Criteria are checked between generations, after the archive has been
//! updated, so stopping early never leaves a partially committed generation.

/// Search state for termination checking
#[derive(Clone, Copy, Debug)]
pub struct SearchSnapshot<'a> {
    /// Generations completed so far
    pub generation: usize,
    /// Objective evaluations so far
    pub evaluations: usize,
    /// Current archive size
    pub archive_size: usize,
    /// Reported hypervolume per generation, initial value first
    pub hypervolume_history: &'a [f64],
}

impl SearchSnapshot<'_> {
    /// Latest reported hypervolume
    pub fn hypervolume(&self) -> Option<f64> {
        self.hypervolume_history.last().copied()
    }
}

/// Termination criterion trait
pub trait TerminationCriterion: Send + Sync {
    /// Check if the search should stop
    fn should_terminate(&self, state: &SearchSnapshot<'_>) -> bool;

    /// Get a description of why termination occurred
    fn reason(&self) -> &'static str;
}

/// Terminate after a maximum number of generations
#[derive(Clone, Debug)]
pub struct MaxGenerations(pub usize);

impl MaxGenerations {
    /// Create a new max generations criterion
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationCriterion for MaxGenerations {
    fn should_terminate(&self, state: &SearchSnapshot<'_>) -> bool {
        state.generation >= self.0
    }

    fn reason(&self) -> &'static str {
        "Maximum generations reached"
    }
}

/// Terminate after a maximum number of objective evaluations
#[derive(Clone, Debug)]
pub struct MaxEvaluations(pub usize);

impl MaxEvaluations {
    /// Create a new max evaluations criterion
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationCriterion for MaxEvaluations {
    fn should_terminate(&self, state: &SearchSnapshot<'_>) -> bool {
        state.evaluations >= self.0
    }

    fn reason(&self) -> &'static str {
        "Maximum evaluations reached"
    }
}

/// Terminate when the hypervolume stops improving
///
/// Looks at the last `window` recorded values and stops when the gain from
/// the first to the last of them is below `epsilon`.
#[derive(Clone, Debug)]
pub struct HypervolumeStagnation {
    /// Number of history entries to look back
    pub window: usize,
    /// Minimum improvement threshold
    pub epsilon: f64,
}

impl HypervolumeStagnation {
    /// Create a new stagnation criterion
    pub fn new(window: usize, epsilon: f64) -> Self {
        Self { window, epsilon }
    }
}

impl TerminationCriterion for HypervolumeStagnation {
    fn should_terminate(&self, state: &SearchSnapshot<'_>) -> bool {
        let history = state.hypervolume_history;
        if self.window < 2 || history.len() < self.window {
            return false;
        }
        let window = &history[history.len() - self.window..];
        window[window.len() - 1] - window[0] < self.epsilon
    }

    fn reason(&self) -> &'static str {
        "Hypervolume stagnation detected"
    }
}

/// Terminate once the hypervolume reaches a target
#[derive(Clone, Debug)]
pub struct TargetHypervolume {
    /// Target value
    pub target: f64,
}

impl TargetHypervolume {
    /// Create a new target criterion
    pub fn new(target: f64) -> Self {
        Self { target }
    }
}

impl TerminationCriterion for TargetHypervolume {
    fn should_terminate(&self, state: &SearchSnapshot<'_>) -> bool {
        state.hypervolume().is_some_and(|hv| hv >= self.target)
    }

    fn reason(&self) -> &'static str {
        "Target hypervolume reached"
    }
}

/// Combine criteria with OR logic (any one triggers termination)
pub struct AnyOf {
    criteria: Vec<Box<dyn TerminationCriterion>>,
}

impl AnyOf {
    /// Create a new AnyOf combinator
    pub fn new(criteria: Vec<Box<dyn TerminationCriterion>>) -> Self {
        Self { criteria }
    }

    /// First criterion that fires
    pub fn triggered(&self, state: &SearchSnapshot<'_>) -> Option<&dyn TerminationCriterion> {
        self.criteria
            .iter()
            .find(|c| c.should_terminate(state))
            .map(|c| c.as_ref())
    }

    /// Add a criterion
    pub fn push(&mut self, criterion: Box<dyn TerminationCriterion>) {
        self.criteria.push(criterion);
    }

    /// Number of criteria
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Check if there are no criteria
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl Default for AnyOf {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl std::fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reasons: Vec<&str> = self.criteria.iter().map(|c| c.reason()).collect();
        f.debug_struct("AnyOf").field("criteria", &reasons).finish()
    }
}

impl TerminationCriterion for AnyOf {
    fn should_terminate(&self, state: &SearchSnapshot<'_>) -> bool {
        self.triggered(state).is_some()
    }

    fn reason(&self) -> &'static str {
        "One of multiple criteria met"
    }
}

pub mod prelude {
    pub use super::{
        AnyOf, HypervolumeStagnation, MaxEvaluations, MaxGenerations, SearchSnapshot,
        TargetHypervolume, TerminationCriterion,
    };
}
