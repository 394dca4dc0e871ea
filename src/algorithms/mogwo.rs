//! Multi-objective grey wolf optimizer
//!
//! One parameterized search loop. The population is pulled towards three
//! archive leaders every generation; the archive keeps the non-dominated
//! solutions found so far and the hypervolume of the archive is recorded
//! after every generation.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::archive::bounded::BoundedArchive;
use crate::archive::pruning::{PruningStrategy, DEFAULT_SIGMA_SHARE};
use crate::diagnostics::{
    ConvergenceHistory, GenerationStats, OptimizationResult, RunStats, TimingStats,
};
use crate::error::{MogwoError, MogwoResult};
use crate::fitness::traits::ObjectiveFunction;
use crate::genome::bounds::MultiBounds;
use crate::hyperparameter::schedules::{DecaySchedule, DiversitySchedule, ParameterSchedule};
use crate::indicators::hypervolume::{
    HypervolumeEstimator, ReferencePointPolicy, MIN_MONTE_CARLO_SAMPLES,
};
use crate::leaders::{LeaderSelector, LeaderStrategy};
use crate::operators::boundary::BoundaryHandling;
use crate::operators::levy::LevyFlight;
use crate::operators::position::{DifferentialHybrid, PositionUpdate};
use crate::pareto::dominance::select_n;
use crate::population::population::{Initialization, Population};
use crate::termination::{AnyOf, MaxGenerations, SearchSnapshot, TerminationCriterion};

/// Whether the smoothed hypervolume signal reaches leader selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HypervolumeFeedback {
    /// Smoothing only affects the reported history
    #[default]
    Cosmetic,
    /// Composite leaders measure contributions against a reference point
    /// smoothed with the same factor
    Leaders,
}

/// Configuration for the optimizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MogwoConfig {
    /// Population size
    pub population_size: usize,
    /// Number of generations after initialization
    pub max_generations: usize,
    /// Archive capacity
    pub archive_size: usize,
    /// Archive truncation strategy
    pub pruning: PruningStrategy,
    /// Leader selection strategy
    pub leaders: LeaderStrategy,
    /// Reference point policy for the hypervolume
    pub reference_point: ReferencePointPolicy,
    /// Decay of the exploration coefficient
    pub decay: DecaySchedule,
    /// Differential hybridization (off when `None`)
    pub hybrid: Option<DifferentialHybrid>,
    /// Sharing radius used by composite leader selection
    pub sigma_share: f64,
    /// Weights of the alpha, beta and delta pulls
    pub leader_weights: [f64; 3],
    /// Retention of the previous position
    pub diversity: DiversitySchedule,
    /// Add Lévy steps scaled by the retention fraction
    pub levy_flight: bool,
    /// Lévy stability index
    pub levy_beta: f64,
    /// Bound repair
    pub boundary: BoundaryHandling,
    /// Monte-Carlo samples for three or more objectives
    pub hypervolume_samples: usize,
    /// Smoothing factor β of the reported hypervolume (off when `None`)
    pub hypervolume_smoothing: Option<f64>,
    /// Whether smoothing feeds back into leader selection
    pub hypervolume_feedback: HypervolumeFeedback,
    /// Seeding of the first population
    pub initialization: Initialization,
    /// Evaluate the population on the rayon pool
    pub parallel_evaluation: bool,
    /// Seed used by [`Mogwo::run`]
    pub seed: Option<u64>,
}

impl Default for MogwoConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            archive_size: 100,
            pruning: PruningStrategy::Crowding,
            leaders: LeaderStrategy::Random,
            reference_point: ReferencePointPolicy::default(),
            decay: DecaySchedule::Linear,
            hybrid: None,
            sigma_share: DEFAULT_SIGMA_SHARE,
            leader_weights: [1.0, 1.0, 1.0],
            diversity: DiversitySchedule::Off,
            levy_flight: false,
            levy_beta: LevyFlight::DEFAULT_BETA,
            boundary: BoundaryHandling::Clip,
            hypervolume_samples: MIN_MONTE_CARLO_SAMPLES,
            hypervolume_smoothing: None,
            hypervolume_feedback: HypervolumeFeedback::Cosmetic,
            initialization: Initialization::Uniform,
            parallel_evaluation: cfg!(feature = "parallel"),
            seed: None,
        }
    }
}

impl MogwoConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> MogwoResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MogwoError::Configuration(format!("invalid configuration: {}", e)))
    }

    /// Serialize the configuration to pretty-printed JSON
    pub fn to_json(&self) -> MogwoResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MogwoError::Configuration(format!("cannot serialize configuration: {}", e)))
    }

    /// Check every parameter
    pub fn validate(&self) -> MogwoResult<()> {
        if self.population_size == 0 {
            return Err(MogwoError::Configuration(
                "population_size must be at least 1".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(MogwoError::Configuration(
                "max_generations must be at least 1".to_string(),
            ));
        }
        if self.archive_size == 0 {
            return Err(MogwoError::DegenerateArchive(
                "archive_size must be at least 1".to_string(),
            ));
        }
        if !(self.sigma_share > 0.0 && self.sigma_share.is_finite()) {
            return Err(MogwoError::Configuration(format!(
                "sigma_share must be positive, got {}",
                self.sigma_share
            )));
        }
        if let Some(beta) = self.hypervolume_smoothing {
            if !(beta > 0.0 && beta <= 1.0) {
                return Err(MogwoError::Configuration(format!(
                    "hypervolume_smoothing must be in (0, 1], got {}",
                    beta
                )));
            }
        }
        if self.levy_flight && self.diversity == DiversitySchedule::Off {
            return Err(MogwoError::Configuration(
                "levy_flight needs a diversity schedule to scale its steps".to_string(),
            ));
        }
        self.pruning.validate()?;
        self.reference_point.validate()?;
        self.decay.validate()?;
        Ok(())
    }
}

/// Lifecycle of a search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    /// Built, nothing evaluated yet
    Uninitialized,
    /// First population evaluated and archived
    Initialized,
    /// `generation` generations completed
    Running { generation: usize },
    /// Stopped after `generation` generations
    Terminated { generation: usize },
}

impl SearchState {
    /// Generations completed so far
    pub fn generation(&self) -> usize {
        match *self {
            Self::Uninitialized | Self::Initialized => 0,
            Self::Running { generation } | Self::Terminated { generation } => generation,
        }
    }

    /// Check if the search has stopped
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated { .. })
    }
}

/// Builder for [`Mogwo`]
pub struct MogwoBuilder<O> {
    config: MogwoConfig,
    bounds: Option<MultiBounds>,
    objective: Option<O>,
    termination: Vec<Box<dyn TerminationCriterion>>,
}

impl MogwoBuilder<()> {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: MogwoConfig::default(),
            bounds: None,
            objective: None,
            termination: Vec::new(),
        }
    }
}

impl Default for MogwoBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> MogwoBuilder<O> {
    /// Replace the whole configuration
    pub fn config(mut self, config: MogwoConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the number of generations
    pub fn max_generations(mut self, max: usize) -> Self {
        self.config.max_generations = max;
        self
    }

    /// Set the archive capacity
    pub fn archive_size(mut self, size: usize) -> Self {
        self.config.archive_size = size;
        self
    }

    /// Set the archive pruning strategy
    pub fn pruning(mut self, strategy: PruningStrategy) -> Self {
        self.config.pruning = strategy;
        self
    }

    /// Set the leader selection strategy
    pub fn leaders(mut self, strategy: LeaderStrategy) -> Self {
        self.config.leaders = strategy;
        self
    }

    /// Set the reference point policy
    pub fn reference_point(mut self, policy: ReferencePointPolicy) -> Self {
        self.config.reference_point = policy;
        self
    }

    /// Set the decay schedule of `a`
    pub fn decay(mut self, decay: DecaySchedule) -> Self {
        self.config.decay = decay;
        self
    }

    /// Enable differential hybridization
    pub fn hybrid(mut self, hybrid: DifferentialHybrid) -> Self {
        self.config.hybrid = Some(hybrid);
        self
    }

    /// Set the composite leader sharing radius
    pub fn sigma_share(mut self, sigma: f64) -> Self {
        self.config.sigma_share = sigma;
        self
    }

    /// Set the alpha, beta and delta weights
    pub fn leader_weights(mut self, weights: [f64; 3]) -> Self {
        self.config.leader_weights = weights;
        self
    }

    /// Set the position retention schedule
    pub fn diversity(mut self, diversity: DiversitySchedule) -> Self {
        self.config.diversity = diversity;
        self
    }

    /// Enable Lévy steps with the given stability index
    pub fn levy_flight(mut self, beta: f64) -> Self {
        self.config.levy_flight = true;
        self.config.levy_beta = beta;
        self
    }

    /// Set the bound repair
    pub fn boundary(mut self, boundary: BoundaryHandling) -> Self {
        self.config.boundary = boundary;
        self
    }

    /// Set the Monte-Carlo sample count
    pub fn hypervolume_samples(mut self, samples: usize) -> Self {
        self.config.hypervolume_samples = samples;
        self
    }

    /// Smooth the reported hypervolume with factor `beta`
    pub fn hypervolume_smoothing(mut self, beta: f64, feedback: HypervolumeFeedback) -> Self {
        self.config.hypervolume_smoothing = Some(beta);
        self.config.hypervolume_feedback = feedback;
        self
    }

    /// Set the seeding scheme
    pub fn initialization(mut self, initialization: Initialization) -> Self {
        self.config.initialization = initialization;
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel_evaluation(mut self, enabled: bool) -> Self {
        self.config.parallel_evaluation = enabled;
        self
    }

    /// Set the seed used by [`Mogwo::run`]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the search space bounds
    pub fn bounds(mut self, bounds: MultiBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Add a termination criterion checked after every generation, on top
    /// of `max_generations`
    pub fn termination<T>(mut self, criterion: T) -> Self
    where
        T: TerminationCriterion + 'static,
    {
        self.termination.push(Box::new(criterion));
        self
    }

    /// Set the objective function
    pub fn objective<NewO>(self, objective: NewO) -> MogwoBuilder<NewO>
    where
        NewO: ObjectiveFunction,
    {
        MogwoBuilder {
            config: self.config,
            bounds: self.bounds,
            objective: Some(objective),
            termination: self.termination,
        }
    }
}

impl<O: ObjectiveFunction> MogwoBuilder<O> {
    /// Validate the configuration and build the optimizer
    pub fn build(self) -> MogwoResult<Mogwo<O>> {
        let bounds = self
            .bounds
            .ok_or_else(|| MogwoError::Configuration("Bounds must be specified".to_string()))?;
        bounds.validate()?;

        let objective = self.objective.ok_or_else(|| {
            MogwoError::Configuration("Objective function must be specified".to_string())
        })?;

        let config = self.config;
        config.validate()?;

        let mut criteria: Vec<Box<dyn TerminationCriterion>> =
            vec![Box::new(MaxGenerations::new(config.max_generations))];
        criteria.extend(self.termination);
        let termination = AnyOf::new(criteria);

        let mut update = PositionUpdate::new()
            .with_weights(config.leader_weights)?
            .with_diversity(config.diversity)?
            .with_boundary(config.boundary);
        if let Some(hybrid) = config.hybrid {
            update = update.with_hybrid(hybrid)?;
        }
        if config.levy_flight {
            update = update.with_levy(LevyFlight::new(config.levy_beta)?);
        }

        let archive = BoundedArchive::new(config.archive_size, config.pruning)?;
        let estimator =
            HypervolumeEstimator::new(config.reference_point.clone(), config.hypervolume_samples)?;
        let selector = LeaderSelector::new(
            config.leaders,
            config.sigma_share,
            config.hypervolume_samples,
        );

        Ok(Mogwo {
            config,
            bounds,
            objective,
            termination,
            update,
            selector,
            estimator,
            archive,
            population: Population::new(),
            history: ConvergenceHistory::new(),
            stats: RunStats::new(),
            state: SearchState::Uninitialized,
            evaluations: 0,
            leader_reference: None,
        })
    }
}

/// Multi-objective grey wolf optimizer
pub struct Mogwo<O> {
    config: MogwoConfig,
    bounds: MultiBounds,
    objective: O,
    termination: AnyOf,
    update: PositionUpdate,
    selector: LeaderSelector,
    estimator: HypervolumeEstimator,
    archive: BoundedArchive,
    population: Population,
    history: ConvergenceHistory,
    stats: RunStats,
    state: SearchState,
    evaluations: usize,
    leader_reference: Option<Vec<f64>>,
}

impl Mogwo<()> {
    /// Create a builder
    pub fn builder() -> MogwoBuilder<()> {
        MogwoBuilder::new()
    }
}

impl<O: ObjectiveFunction> Mogwo<O> {
    /// Evaluate and archive the first population
    ///
    /// Records the generation-0 hypervolume.
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) -> MogwoResult<()> {
        if self.state != SearchState::Uninitialized {
            return Err(MogwoError::InvalidState(format!(
                "initialize called in state {:?}",
                self.state
            )));
        }
        let start = Instant::now();
        let size = self.config.population_size;

        let (population, evaluated) = match self.config.initialization {
            Initialization::Uniform => {
                let decisions = Population::random_decisions(size, &self.bounds, rng);
                (self.evaluate(decisions)?, size)
            }
            Initialization::LatinHypercube => {
                let decisions = Population::latin_hypercube(size, &self.bounds, rng);
                (self.evaluate(decisions)?, size)
            }
            Initialization::Opposition => {
                let mut decisions = Population::random_decisions(size, &self.bounds, rng);
                let opposites: Vec<Vec<f64>> = decisions
                    .iter()
                    .map(|d| self.bounds.opposite_vec(d))
                    .collect();
                decisions.extend(opposites);
                let evaluated = decisions.len();
                let mut pool = self.evaluate(decisions)?;
                let keep = select_n(pool.solutions(), size);
                pool.retain_indices(&keep);
                (pool, evaluated)
            }
        };
        let eval_time = start.elapsed();

        if let (ReferencePointPolicy::Static(point), Some(m)) =
            (&self.config.reference_point, population.num_objectives())
        {
            if point.len() != m {
                return Err(MogwoError::DimensionMismatch {
                    expected: m,
                    actual: point.len(),
                });
            }
        }

        self.evaluations += evaluated;

        let archive_start = Instant::now();
        self.archive
            .try_insert_all(population.solutions().iter().cloned());
        let archive_time = archive_start.elapsed();

        self.population = population;
        self.state = SearchState::Initialized;

        let timing = TimingStats::new()
            .with_evaluation(eval_time)
            .with_archive(archive_time);
        let decay = self.config.decay.value_at(0, self.config.max_generations);
        self.record_generation(0, decay, timing, start, rng);

        info!(
            population = self.population.len(),
            archive_size = self.archive.len(),
            hypervolume = self.history.last().unwrap_or(0.0),
            "population initialized"
        );
        self.check_termination();
        Ok(())
    }

    /// Advance the search by one generation
    ///
    /// The whole new population is evaluated and validated before the archive
    /// is touched; on error the archive and state are unchanged.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> MogwoResult<()> {
        let generation = match self.state {
            SearchState::Initialized => 0,
            SearchState::Running { generation } => generation,
            state => {
                return Err(MogwoError::InvalidState(format!(
                    "step called in state {:?}",
                    state
                )))
            }
        };
        let start = Instant::now();
        let max_generations = self.config.max_generations;

        let pool = if self.archive.is_empty() {
            self.population.solutions()
        } else {
            self.archive.solutions()
        };
        let reference = match self.config.hypervolume_feedback {
            HypervolumeFeedback::Leaders => self
                .leader_reference
                .as_deref()
                .or_else(|| self.estimator.reference_point()),
            HypervolumeFeedback::Cosmetic => self.estimator.reference_point(),
        };
        let leaders = self
            .selector
            .select(pool, reference, rng)
            .ok_or_else(|| {
                MogwoError::InvalidState("no solutions to select leaders from".to_string())
            })?;
        let leader_time = start.elapsed();

        let update_start = Instant::now();
        let a = self.config.decay.value_at(generation, max_generations);
        let guides = leaders.decisions(pool);
        let decisions: Vec<Vec<f64>> = self
            .population
            .iter()
            .map(|member| {
                self.update.update(
                    member.decision(),
                    guides,
                    a,
                    generation,
                    max_generations,
                    &self.bounds,
                    rng,
                )
            })
            .collect();
        let update_time = update_start.elapsed();

        let eval_start = Instant::now();
        let population = self.evaluate(decisions)?;
        let eval_time = eval_start.elapsed();
        self.evaluations += population.len();

        let archive_start = Instant::now();
        let accepted = self
            .archive
            .try_insert_all(population.solutions().iter().cloned());
        let archive_time = archive_start.elapsed();
        self.population = population;

        let generation = generation + 1;
        self.state = SearchState::Running { generation };

        let timing = TimingStats::new()
            .with_leaders(leader_time)
            .with_update(update_time)
            .with_evaluation(eval_time)
            .with_archive(archive_time);
        self.record_generation(generation, a, timing, start, rng);

        debug!(
            generation,
            a,
            accepted,
            archive_size = self.archive.len(),
            hypervolume = self.history.last().unwrap_or(0.0),
            "generation complete"
        );
        self.check_termination();
        Ok(())
    }

    /// Run to termination with a generator seeded from `config.seed`
    /// (entropy when unset)
    pub fn run(&mut self) -> MogwoResult<OptimizationResult> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run_with_rng(&mut rng)
    }

    /// Run to termination with the given generator
    ///
    /// Initializes first if needed; resumes from the current generation
    /// otherwise.
    pub fn run_with_rng<R: Rng>(&mut self, rng: &mut R) -> MogwoResult<OptimizationResult> {
        let _span = tracing::info_span!(
            "mogwo_run",
            population_size = self.config.population_size,
            max_generations = self.config.max_generations,
            leaders = ?self.config.leaders,
            pruning = ?self.config.pruning
        )
        .entered();
        let start = Instant::now();

        if self.state == SearchState::Uninitialized {
            self.initialize(rng)?;
        }
        while !self.state.is_terminated() {
            self.step(rng)?;
        }

        self.stats.set_runtime(start.elapsed());
        info!(
            generations = self.state.generation(),
            evaluations = self.evaluations,
            archive_size = self.archive.len(),
            reason = self.stats.termination_reason.as_deref().unwrap_or("unknown"),
            "search terminated"
        );
        Ok(self.result())
    }

    /// Snapshot of the current archive and history
    pub fn result(&self) -> OptimizationResult {
        OptimizationResult {
            decisions: self.archive.decisions(),
            objectives: self.archive.objectives(),
            hypervolume_history: self.history.values().to_vec(),
            raw_hypervolume_history: self.history.raw().to_vec(),
            generations: self.state.generation(),
            evaluations: self.evaluations,
            stats: self.stats.clone(),
        }
    }

    /// Evaluate and validate a batch; the caller commits the evaluation count
    fn evaluate(&self, decisions: Vec<Vec<f64>>) -> MogwoResult<Population> {
        for decision in &decisions {
            if decision.len() != self.bounds.dimension() {
                return Err(MogwoError::DimensionMismatch {
                    expected: self.bounds.dimension(),
                    actual: decision.len(),
                });
            }
        }
        let expected = self
            .archive
            .solutions()
            .first()
            .map(|s| s.num_objectives())
            .or_else(|| self.objective.num_objectives());
        if self.config.parallel_evaluation {
            Population::evaluate_parallel(decisions, &self.objective, expected)
        } else {
            Population::evaluate(decisions, &self.objective, expected)
        }
    }

    fn record_generation<R: Rng>(
        &mut self,
        generation: usize,
        decay: f64,
        timing: TimingStats,
        start: Instant,
        rng: &mut R,
    ) {
        let objectives = self.archive.solutions();
        if self.estimator.policy().is_dynamic() {
            self.estimator.update_reference(objectives);
        }
        let raw = self.estimator.compute(objectives, rng);
        let smoothing = self.config.hypervolume_smoothing;
        let reported = self.history.record(raw, smoothing);

        let reference = self
            .estimator
            .reference_point()
            .map(<[f64]>::to_vec)
            .unwrap_or_default();
        if let (HypervolumeFeedback::Leaders, Some(beta)) =
            (self.config.hypervolume_feedback, smoothing)
        {
            self.leader_reference = Some(smooth_reference(
                self.leader_reference.as_deref(),
                &reference,
                beta,
            ));
        }

        self.stats.record(GenerationStats {
            generation,
            evaluations: self.evaluations,
            archive_size: self.archive.len(),
            hypervolume_raw: raw,
            hypervolume: reported,
            reference_point: reference,
            decay,
            diversity: self.population.diversity(),
            timing: timing.with_total(start.elapsed()),
        });
    }

    fn check_termination(&mut self) {
        let generation = self.state.generation();
        let snapshot = SearchSnapshot {
            generation,
            evaluations: self.evaluations,
            archive_size: self.archive.len(),
            hypervolume_history: self.history.values(),
        };
        if let Some(reason) = self.termination.triggered(&snapshot).map(|c| c.reason()) {
            self.stats.set_termination_reason(reason);
            self.state = SearchState::Terminated { generation };
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Active configuration
    pub fn config(&self) -> &MogwoConfig {
        &self.config
    }

    /// Search space bounds
    pub fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    /// Current archive
    pub fn archive(&self) -> &BoundedArchive {
        &self.archive
    }

    /// Current population
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Hypervolume history so far
    pub fn history(&self) -> &ConvergenceHistory {
        &self.history
    }

    /// Per-generation statistics so far
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Objective evaluations so far
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Current hypervolume reference point
    pub fn reference_point(&self) -> Option<&[f64]> {
        self.estimator.reference_point()
    }
}

/// `β·current + (1 - β)·previous`, never below `current`
fn smooth_reference(previous: Option<&[f64]>, current: &[f64], beta: f64) -> Vec<f64> {
    match previous {
        Some(prev) if prev.len() == current.len() => prev
            .iter()
            .zip(current)
            .map(|(&p, &c)| (beta * c + (1.0 - beta) * p).max(c))
            .collect(),
        _ => current.to_vec(),
    }
}
