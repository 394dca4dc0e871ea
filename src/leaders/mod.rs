//! Leader selection
//!
//! Every generation the search is guided by three leaders (alpha, beta and
//! delta) drawn from the archive, or from the current population when the
//! archive is still empty. All strategies repeat members when the pool holds
//! fewer than three solutions.

use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::indicators::hypervolume::hypervolume_contributions;
use crate::pareto::diversity::{euclidean, sharing_values};
use crate::pareto::dominance::crowding_order;
use crate::population::solution::Solution;

/// How alpha, beta and delta are drawn from the pool
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderStrategy {
    /// Uniform random triple
    #[default]
    Random,
    /// Alpha by crowding distance, beta farthest from alpha, delta random
    CrowdingRanked,
    /// Alpha by hypervolume contribution, beta by angular deviation,
    /// delta by lowest sharing value
    Composite,
}

/// Indices of the selected leaders within the pool they were drawn from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leaders {
    pub alpha: usize,
    pub beta: usize,
    pub delta: usize,
}

impl Leaders {
    /// Decision vectors of the three leaders
    pub fn decisions<'a>(&self, pool: &'a [Solution]) -> [&'a [f64]; 3] {
        [
            pool[self.alpha].decision(),
            pool[self.beta].decision(),
            pool[self.delta].decision(),
        ]
    }
}

/// Configured leader selection
#[derive(Clone, Debug)]
pub struct LeaderSelector {
    strategy: LeaderStrategy,
    sigma_share: f64,
    n_samples: usize,
}

impl LeaderSelector {
    /// Create a selector
    ///
    /// `sigma_share` and `n_samples` are only read by the composite strategy.
    pub fn new(strategy: LeaderStrategy, sigma_share: f64, n_samples: usize) -> Self {
        Self {
            strategy,
            sigma_share,
            n_samples,
        }
    }

    /// Active strategy
    pub fn strategy(&self) -> LeaderStrategy {
        self.strategy
    }

    /// Pick leaders from `pool`; `None` only for an empty pool
    ///
    /// `reference` anchors the hypervolume contributions of the composite
    /// strategy. Without one, a reference 10% beyond the pool's nadir is used.
    pub fn select<R: Rng>(
        &self,
        pool: &[Solution],
        reference: Option<&[f64]>,
        rng: &mut R,
    ) -> Option<Leaders> {
        if pool.is_empty() {
            return None;
        }
        let leaders = match self.strategy {
            LeaderStrategy::Random => select_random(pool.len(), rng),
            LeaderStrategy::CrowdingRanked => select_crowding_ranked(pool, rng),
            LeaderStrategy::Composite => {
                select_composite(pool, reference, self.sigma_share, self.n_samples, rng)
            }
        };
        Some(leaders)
    }
}

/// Uniform random triple, distinct when the pool allows it
pub fn select_random<R: Rng>(n: usize, rng: &mut R) -> Leaders {
    if n >= 3 {
        let picked = sample(rng, n, 3).into_vec();
        Leaders {
            alpha: picked[0],
            beta: picked[1],
            delta: picked[2],
        }
    } else {
        Leaders {
            alpha: rng.gen_range(0..n),
            beta: rng.gen_range(0..n),
            delta: rng.gen_range(0..n),
        }
    }
}

/// Alpha is the most isolated member, beta the member farthest from alpha
/// in objective space, delta a random member among the rest
pub fn select_crowding_ranked<R: Rng>(pool: &[Solution], rng: &mut R) -> Leaders {
    let n = pool.len();
    let all: Vec<usize> = (0..n).collect();
    let alpha = crowding_order(pool, &all)[0];

    let beta = (0..n)
        .filter(|&i| i != alpha)
        .map(|i| (i, euclidean(pool[i].objectives(), pool[alpha].objectives())))
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd >= d => best,
            _ => Some((i, d)),
        })
        .map_or(alpha, |(i, _)| i);

    let rest: Vec<usize> = (0..n).filter(|&i| i != alpha && i != beta).collect();
    let delta = if rest.is_empty() {
        rng.gen_range(0..n)
    } else {
        rest[rng.gen_range(0..rest.len())]
    };

    Leaders { alpha, beta, delta }
}

/// Composite selection balancing convergence and spread
///
/// - alpha: largest exclusive hypervolume contribution
/// - beta: largest angle between its offset from the centroid and the mean
///   offset direction, alpha excluded
/// - delta: lowest sigma-sharing value among the remaining members
pub fn select_composite<R: Rng>(
    pool: &[Solution],
    reference: Option<&[f64]>,
    sigma_share: f64,
    n_samples: usize,
    rng: &mut R,
) -> Leaders {
    let fallback;
    let reference: &[f64] = match reference {
        Some(r) => r,
        None => {
            fallback = buffered_nadir(pool);
            &fallback
        }
    };

    let contributions = hypervolume_contributions(pool, reference, n_samples, rng);
    let alpha = argmax(contributions.iter().copied().enumerate()).unwrap_or(0);

    let deviations = angular_deviations(pool);
    let beta = argmax(
        deviations
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| i != alpha),
    )
    .unwrap_or(alpha);

    let shares = sharing_values(pool, sigma_share);
    let delta = argmin(
        shares
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| i != alpha && i != beta),
    )
    .or_else(|| argmin(shares.iter().copied().enumerate().filter(|&(i, _)| i != alpha)))
    .unwrap_or(alpha);

    Leaders { alpha, beta, delta }
}

/// Angle of every member's offset from the centroid to the mean offset
/// direction; members sitting on the centroid get 0
fn angular_deviations(pool: &[Solution]) -> Vec<f64> {
    let n = pool.len() as f64;
    let m = pool[0].num_objectives();

    let mut centroid = vec![0.0; m];
    for s in pool {
        for (c, v) in centroid.iter_mut().zip(s.objectives()) {
            *c += v / n;
        }
    }

    let units: Vec<Option<Vec<f64>>> = pool
        .iter()
        .map(|s| {
            let offset: Vec<f64> = s.objectives().iter().zip(&centroid).map(|(v, c)| v - c).collect();
            normalize(offset)
        })
        .collect();

    let mut mean = vec![0.0; m];
    for u in units.iter().flatten() {
        for (acc, v) in mean.iter_mut().zip(u) {
            *acc += v;
        }
    }
    let mean = normalize(mean);

    units
        .iter()
        .map(|u| match (u, &mean) {
            (Some(u), Some(mean)) => {
                let cos: f64 = u.iter().zip(mean).map(|(a, b)| a * b).sum();
                cos.clamp(-1.0, 1.0).acos()
            }
            (Some(_), None) => std::f64::consts::FRAC_PI_2,
            (None, _) => 0.0,
        })
        .collect()
}

fn normalize(v: Vec<f64>) -> Option<Vec<f64>> {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > f64::EPSILON {
        Some(v.into_iter().map(|x| x / norm).collect())
    } else {
        None
    }
}

fn buffered_nadir(pool: &[Solution]) -> Vec<f64> {
    let m = pool[0].num_objectives();
    (0..m)
        .map(|k| {
            let max = pool
                .iter()
                .map(|s| s.objectives()[k])
                .fold(f64::NEG_INFINITY, f64::max);
            max + 0.1 * max.abs()
        })
        .collect()
}

/// First index with the largest value
fn argmax(values: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    values
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// First index with the smallest value
fn argmin(values: impl Iterator<Item = (usize, f64)>) -> Option<usize> {
    values
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, bv)) if bv <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

pub mod prelude {
    pub use super::{LeaderSelector, LeaderStrategy, Leaders};
}
