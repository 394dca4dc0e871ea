//! Hypervolume indicator
//!
//! The hypervolume of a front is the volume of objective space it dominates,
//! bounded above by a reference point. Two objectives use an exact sweep;
//! three or more use a Monte-Carlo estimate whose standard error scales with
//! `1 / sqrt(n_samples)`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MogwoError, MogwoResult};
use crate::pareto::dominance::{non_dominated_filter, weakly_dominates};

/// Minimum number of Monte-Carlo samples accepted by the estimator
pub const MIN_MONTE_CARLO_SAMPLES: usize = 10_000;

/// How the reference point follows the archive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ReferencePointPolicy {
    /// Fixed point given at construction
    Static(Vec<f64>),
    /// Per-objective maximum pushed out by `buffer_fraction · |max|`
    BufferedMax {
        /// Relative buffer added to the nadir
        buffer_fraction: f64,
    },
    /// Exponential moving average of the nadir plus an adaptive buffer
    SmoothedNadir {
        /// Weight of the current nadir in the moving average
        smoothing: f64,
        /// Buffer as a fraction of the nadir-ideal range
        buffer_fraction: f64,
    },
}

impl Default for ReferencePointPolicy {
    fn default() -> Self {
        Self::BufferedMax {
            buffer_fraction: 0.1,
        }
    }
}

impl ReferencePointPolicy {
    /// Smoothed nadir with α = 0.1 and a 5% buffer
    pub fn smoothed_nadir() -> Self {
        Self::SmoothedNadir {
            smoothing: 0.1,
            buffer_fraction: 0.05,
        }
    }

    /// Whether the point is recomputed from the archive every generation
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Self::Static(_))
    }

    /// Check the policy parameters
    pub fn validate(&self) -> MogwoResult<()> {
        match self {
            Self::Static(point) => {
                if point.len() < 2 || point.iter().any(|v| !v.is_finite()) {
                    return Err(MogwoError::Configuration(
                        "static reference point needs at least two finite coordinates".to_string(),
                    ));
                }
            }
            Self::BufferedMax { buffer_fraction } => {
                if !(*buffer_fraction >= 0.0 && buffer_fraction.is_finite()) {
                    return Err(MogwoError::Configuration(format!(
                        "buffer_fraction must be non-negative, got {}",
                        buffer_fraction
                    )));
                }
            }
            Self::SmoothedNadir {
                smoothing,
                buffer_fraction,
            } => {
                if !(*smoothing > 0.0 && *smoothing <= 1.0) {
                    return Err(MogwoError::Configuration(format!(
                        "smoothing must be in (0, 1], got {}",
                        smoothing
                    )));
                }
                if !(*buffer_fraction >= 0.0 && buffer_fraction.is_finite()) {
                    return Err(MogwoError::Configuration(format!(
                        "buffer_fraction must be non-negative, got {}",
                        buffer_fraction
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Stateful hypervolume calculator owning the current reference point
#[derive(Clone, Debug)]
pub struct HypervolumeEstimator {
    policy: ReferencePointPolicy,
    reference_point: Option<Vec<f64>>,
    nadir: Option<Vec<f64>>,
    n_samples: usize,
}

impl HypervolumeEstimator {
    /// Create an estimator
    pub fn new(policy: ReferencePointPolicy, n_samples: usize) -> MogwoResult<Self> {
        policy.validate()?;
        if n_samples < MIN_MONTE_CARLO_SAMPLES {
            return Err(MogwoError::Configuration(format!(
                "Monte-Carlo hypervolume needs at least {} samples, got {}",
                MIN_MONTE_CARLO_SAMPLES, n_samples
            )));
        }
        let reference_point = match &policy {
            ReferencePointPolicy::Static(point) => Some(point.clone()),
            _ => None,
        };
        Ok(Self {
            policy,
            reference_point,
            nadir: None,
            n_samples,
        })
    }

    /// Current reference point (None until the first dynamic update)
    pub fn reference_point(&self) -> Option<&[f64]> {
        self.reference_point.as_deref()
    }

    /// Active policy
    pub fn policy(&self) -> &ReferencePointPolicy {
        &self.policy
    }

    /// Number of Monte-Carlo samples used for three or more objectives
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Recompute the reference point from the tracked objective vectors
    ///
    /// No-op for the static policy or an empty input. Dynamic points are
    /// never below the current per-objective maximum.
    pub fn update_reference<O: AsRef<[f64]>>(&mut self, objectives: &[O]) {
        if objectives.is_empty() {
            return;
        }
        let (ideal, current_max) = extent(objectives);
        let reference = match self.policy {
            ReferencePointPolicy::Static(_) => return,
            ReferencePointPolicy::BufferedMax { buffer_fraction } => current_max
                .iter()
                .map(|&v| v + buffer_fraction * v.abs())
                .collect::<Vec<f64>>(),
            ReferencePointPolicy::SmoothedNadir {
                smoothing,
                buffer_fraction,
            } => {
                let nadir: Vec<f64> = match &self.nadir {
                    Some(previous) if previous.len() == current_max.len() => previous
                        .iter()
                        .zip(&current_max)
                        .map(|(&prev, &cur)| smoothing * cur + (1.0 - smoothing) * prev)
                        .collect(),
                    _ => current_max.clone(),
                };
                let convergence = 1.0 + 0.1 * (-(objectives.len() as f64) / 50.0).exp();
                let reference = nadir
                    .iter()
                    .zip(&ideal)
                    .map(|(&n, &lo)| {
                        let adaptive = n + buffer_fraction * (n - lo) * convergence;
                        adaptive.max(n + 0.01 * n.abs())
                    })
                    .collect();
                self.nadir = Some(nadir);
                reference
            }
        };
        self.reference_point = Some(
            reference
                .into_iter()
                .zip(&current_max)
                .map(|(r, &m)| r.max(m))
                .collect(),
        );
    }

    /// Hypervolume of `objectives` against the current reference point
    ///
    /// Returns 0.0 for an empty input or when no reference point is set yet.
    pub fn compute<O: AsRef<[f64]>, R: Rng>(&self, objectives: &[O], rng: &mut R) -> f64 {
        match &self.reference_point {
            Some(reference) => hypervolume(objectives, reference, self.n_samples, rng),
            None => 0.0,
        }
    }

    /// Exclusive contribution of every point, `HV(all) - HV(all without i)`
    pub fn contributions<O: AsRef<[f64]>, R: Rng>(
        &self,
        objectives: &[O],
        rng: &mut R,
    ) -> Vec<f64> {
        match &self.reference_point {
            Some(reference) => hypervolume_contributions(objectives, reference, self.n_samples, rng),
            None => vec![0.0; objectives.len()],
        }
    }
}

/// Hypervolume with automatic choice between exact sweep and Monte-Carlo
pub fn hypervolume<O: AsRef<[f64]>, R: Rng>(
    objectives: &[O],
    reference: &[f64],
    n_samples: usize,
    rng: &mut R,
) -> f64 {
    if reference.len() == 2 {
        hypervolume_2d(objectives, reference)
    } else {
        hypervolume_monte_carlo(objectives, reference, n_samples, rng)
    }
}

/// Exact dominated area for two objectives
///
/// Dominated points and points not strictly better than the reference in
/// both objectives are ignored. The remaining staircase is swept in order of
/// the first objective.
pub fn hypervolume_2d<O: AsRef<[f64]>>(objectives: &[O], reference: &[f64]) -> f64 {
    let mut front = relevant_front(objectives, reference);
    if front.is_empty() {
        return 0.0;
    }
    front.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));

    let mut area = 0.0;
    for (i, point) in front.iter().enumerate() {
        let next_f1 = front.get(i + 1).map_or(reference[0], |next| next[0]);
        let width = next_f1 - point[0];
        let height = reference[1] - point[1];
        area += (width * height).max(0.0);
    }
    area
}

/// Monte-Carlo hypervolume estimate for any number of objectives
///
/// Samples uniformly in the box spanned by the front's ideal point and the
/// reference point and scales the dominated fraction by the box volume. The
/// estimate is consistent with error `O(1 / sqrt(n_samples))`.
pub fn hypervolume_monte_carlo<O: AsRef<[f64]>, R: Rng>(
    objectives: &[O],
    reference: &[f64],
    n_samples: usize,
    rng: &mut R,
) -> f64 {
    let front = relevant_front(objectives, reference);
    if front.is_empty() || n_samples == 0 {
        return 0.0;
    }
    let (ideal, _) = extent(&front);
    let volume: f64 = ideal.iter().zip(reference).map(|(lo, hi)| hi - lo).product();

    let mut sample = vec![0.0; reference.len()];
    let mut dominated = 0usize;
    for _ in 0..n_samples {
        draw(&mut sample, &ideal, reference, rng);
        if front.iter().any(|p| weakly_dominates(p, &sample)) {
            dominated += 1;
        }
    }
    volume * dominated as f64 / n_samples as f64
}

/// Exclusive hypervolume contribution of every input point
///
/// Exact for two objectives. For more objectives a single shared sample set
/// is used: a sample dominated by exactly one point counts towards that
/// point. Dominated or out-of-reference points contribute 0.
pub fn hypervolume_contributions<O: AsRef<[f64]>, R: Rng>(
    objectives: &[O],
    reference: &[f64],
    n_samples: usize,
    rng: &mut R,
) -> Vec<f64> {
    let n = objectives.len();
    if n == 0 {
        return vec![];
    }

    if reference.len() == 2 {
        let total = hypervolume_2d(objectives, reference);
        return (0..n)
            .map(|i| {
                let without: Vec<&[f64]> = objectives
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, o)| o.as_ref())
                    .collect();
                (total - hypervolume_2d(&without, reference)).max(0.0)
            })
            .collect();
    }

    let front = relevant_front(objectives, reference);
    if front.is_empty() || n_samples == 0 {
        return vec![0.0; n];
    }
    let (ideal, _) = extent(&front);
    let volume: f64 = ideal.iter().zip(reference).map(|(lo, hi)| hi - lo).product();

    let mut exclusive = vec![0usize; n];
    let mut sample = vec![0.0; reference.len()];
    for _ in 0..n_samples {
        draw(&mut sample, &ideal, reference, rng);
        let mut owner = None;
        let mut count = 0;
        for (i, o) in objectives.iter().enumerate() {
            if weakly_dominates(o.as_ref(), &sample) {
                count += 1;
                owner = Some(i);
                if count > 1 {
                    break;
                }
            }
        }
        if let (1, Some(i)) = (count, owner) {
            exclusive[i] += 1;
        }
    }
    exclusive
        .into_iter()
        .map(|c| volume * c as f64 / n_samples as f64)
        .collect()
}

/// Non-dominated points lying strictly inside the reference box
fn relevant_front<'a, O: AsRef<[f64]>>(objectives: &'a [O], reference: &[f64]) -> Vec<&'a [f64]> {
    let inside: Vec<&[f64]> = objectives
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| p.iter().zip(reference).all(|(v, r)| v < r))
        .collect();
    non_dominated_filter(&inside)
        .into_iter()
        .map(|i| inside[i])
        .collect()
}

/// Per-objective (min, max)
fn extent<O: AsRef<[f64]>>(objectives: &[O]) -> (Vec<f64>, Vec<f64>) {
    let m = objectives[0].as_ref().len();
    let mut lo = vec![f64::INFINITY; m];
    let mut hi = vec![f64::NEG_INFINITY; m];
    for p in objectives {
        for (k, &v) in p.as_ref().iter().enumerate() {
            lo[k] = lo[k].min(v);
            hi[k] = hi[k].max(v);
        }
    }
    (lo, hi)
}

fn draw<R: Rng>(sample: &mut [f64], lo: &[f64], hi: &[f64], rng: &mut R) {
    for ((s, &a), &b) in sample.iter_mut().zip(lo).zip(hi) {
        *s = a + (b - a) * rng.gen::<f64>();
    }
}
