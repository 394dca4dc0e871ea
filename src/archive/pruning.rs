//! Archive truncation strategies
//!
//! When an insertion pushes the archive past its capacity, one of these
//! strategies picks which mutually non-dominated members survive.

use serde::{Deserialize, Serialize};

use crate::error::{MogwoError, MogwoResult};
use crate::pareto::diversity::{crowding_distance, select_by_sharing};
use crate::pareto::dominance::{crowding_order, select_n};

/// Default sharing radius, in units of the objective bounding-box diagonal
pub const DEFAULT_SIGMA_SHARE: f64 = 0.1;

/// Strategy used to shrink an over-full archive
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PruningStrategy {
    /// Keep the members with the largest crowding distance
    Crowding,
    /// Keep the members with the smallest sigma-sharing niche count
    SigmaSharing {
        /// Sharing radius (normalized)
        sigma: f64,
    },
    /// Always keep per-objective extremes, fill the rest by crowding distance;
    /// if the extremes alone overflow, thin them by sigma-sharing
    Clustering {
        /// Sharing radius used when the extremes overflow
        sigma: f64,
    },
}

impl Default for PruningStrategy {
    fn default() -> Self {
        Self::Crowding
    }
}

impl PruningStrategy {
    /// Sigma-sharing with the default radius
    pub fn sigma_sharing() -> Self {
        Self::SigmaSharing {
            sigma: DEFAULT_SIGMA_SHARE,
        }
    }

    /// Boundary-protecting clustering with the default radius
    pub fn clustering() -> Self {
        Self::Clustering {
            sigma: DEFAULT_SIGMA_SHARE,
        }
    }

    /// Check the strategy parameters
    pub fn validate(&self) -> MogwoResult<()> {
        match *self {
            Self::Crowding => Ok(()),
            Self::SigmaSharing { sigma } | Self::Clustering { sigma } => {
                if sigma > 0.0 && sigma.is_finite() {
                    Ok(())
                } else {
                    Err(MogwoError::Configuration(format!(
                        "sharing radius must be positive and finite, got {}",
                        sigma
                    )))
                }
            }
        }
    }

    /// Choose `keep` survivors among `objectives`
    ///
    /// Returns indices into `objectives` in ascending order, of length
    /// `min(objectives.len(), keep)`.
    pub fn select<O: AsRef<[f64]>>(&self, objectives: &[O], keep: usize) -> Vec<usize> {
        if objectives.len() <= keep {
            return (0..objectives.len()).collect();
        }

        let all: Vec<usize> = (0..objectives.len()).collect();
        let mut kept = match *self {
            Self::Crowding => select_n(objectives, keep),
            Self::SigmaSharing { sigma } => select_by_sharing(objectives, &all, keep, sigma),
            Self::Clustering { sigma } => select_protecting_extremes(objectives, &all, keep, sigma),
        };
        kept.sort_unstable();
        kept
    }
}

fn select_protecting_extremes<O: AsRef<[f64]>>(
    objectives: &[O],
    candidates: &[usize],
    keep: usize,
    sigma: f64,
) -> Vec<usize> {
    let distances = crowding_distance(objectives, candidates);
    let (extremes, interior): (Vec<(usize, f64)>, Vec<(usize, f64)>) = candidates
        .iter()
        .copied()
        .zip(distances)
        .partition(|(_, d)| d.is_infinite());
    let extremes: Vec<usize> = extremes.into_iter().map(|(i, _)| i).collect();

    if extremes.len() > keep {
        return select_by_sharing(objectives, &extremes, keep, sigma);
    }

    let interior: Vec<usize> = interior.into_iter().map(|(i, _)| i).collect();
    let mut kept = extremes;
    let remaining = keep - kept.len();
    // Ranked against the full candidate set so extremes still shape the gaps
    let ranked = crowding_order(objectives, candidates);
    kept.extend(
        ranked
            .into_iter()
            .filter(|i| interior.contains(i))
            .take(remaining),
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![0.2, 0.8],
            vec![0.5, 0.5],
            vec![1.0, 0.0],
        ]
    }

    #[test]
    fn test_crowding_keeps_extremes() {
        let kept = PruningStrategy::Crowding.select(&front(), 2);
        assert_eq!(kept, vec![0, 4]);
    }

    #[test]
    fn test_crowding_prefers_isolated() {
        let kept = PruningStrategy::Crowding.select(&front(), 3);
        assert_eq!(kept, vec![0, 3, 4]);
    }

    #[test]
    fn test_sigma_sharing_drops_crowded_cluster() {
        let kept = PruningStrategy::SigmaSharing { sigma: 0.2 }.select(&front(), 3);
        assert_eq!(kept, vec![0, 3, 4]);
    }

    #[test]
    fn test_clustering_protects_extremes() {
        let kept = PruningStrategy::clustering().select(&front(), 3);
        assert_eq!(kept, vec![0, 3, 4]);
    }

    #[test]
    fn test_clustering_thins_extremes_when_they_overflow() {
        // Three objectives, three points: every point is an extreme somewhere
        let objs = vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ];
        let kept = PruningStrategy::Clustering { sigma: 0.1 }.select(&objs, 2);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_select_is_noop_under_capacity() {
        let kept = PruningStrategy::sigma_sharing().select(&front(), 10);
        assert_eq!(kept, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_validate_rejects_bad_sigma() {
        assert!(PruningStrategy::SigmaSharing { sigma: 0.0 }.validate().is_err());
        assert!(PruningStrategy::Clustering { sigma: f64::NAN }.validate().is_err());
        assert!(PruningStrategy::Crowding.validate().is_ok());
    }
}
