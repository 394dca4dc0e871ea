//! Swarm position update
//!
//! Every member is pulled towards the three leaders with the grey wolf
//! encircling rule, optionally crossed with a differential trial vector,
//! blended with its previous position and shaken by a Lévy step. The result
//! is repaired back into the box.

use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::error::{MogwoError, MogwoResult};
use crate::genome::bounds::MultiBounds;
use crate::hyperparameter::schedules::{
    AdaptiveCrossoverRate, AdaptiveScaleFactor, DiversitySchedule, ParameterSchedule,
};
use crate::operators::boundary::BoundaryHandling;
use crate::operators::levy::LevyFlight;

/// Differential trial vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeVariant {
    /// alpha + F(beta - delta)
    #[default]
    Rand1,
    /// With probability 0.5 adds F(x - beta) to the `Rand1` trial
    Best2Mixed,
}

/// Differential-mutation hybridization of the leader pull
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifferentialHybrid {
    /// Scale factor F
    pub scale_factor: f64,
    /// Crossover rate CR
    pub crossover_rate: f64,
    /// Use the generation-dependent F and CR
    pub adaptive: bool,
    /// Trial vector construction
    pub variant: DeVariant,
}

impl Default for DifferentialHybrid {
    fn default() -> Self {
        Self {
            scale_factor: 0.5,
            crossover_rate: 0.7,
            adaptive: false,
            variant: DeVariant::Rand1,
        }
    }
}

impl DifferentialHybrid {
    /// Adaptive F/CR with the mixed trial
    pub fn adaptive() -> Self {
        Self {
            adaptive: true,
            variant: DeVariant::Best2Mixed,
            ..Self::default()
        }
    }

    /// Check F and CR
    pub fn validate(&self) -> MogwoResult<()> {
        if !(self.scale_factor > 0.0 && self.scale_factor <= 2.0) {
            return Err(MogwoError::Configuration(format!(
                "scale factor F must be in (0, 2], got {}",
                self.scale_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(MogwoError::Configuration(format!(
                "crossover rate CR must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        Ok(())
    }

    /// Effective (F, CR) at a generation
    pub fn parameters(&self, generation: usize, max_generations: usize) -> (f64, f64) {
        if self.adaptive {
            (
                AdaptiveScaleFactor::new(self.scale_factor).value_at(generation, max_generations),
                AdaptiveCrossoverRate::new(self.crossover_rate)
                    .value_at(generation, max_generations),
            )
        } else {
            (self.scale_factor, self.crossover_rate)
        }
    }
}

/// Candidate position pulled towards one leader
///
/// Per coordinate: `A = 2a·r1 - a`, `C = 2·r2`, `D = |C·leader - x|`,
/// result `leader - A·D`.
pub fn gwo_pull<R: Rng>(leader: &[f64], position: &[f64], a: f64, rng: &mut R) -> Vec<f64> {
    leader
        .iter()
        .zip(position)
        .map(|(&l, &x)| {
            let coef_a = 2.0 * a * rng.gen::<f64>() - a;
            let coef_c = 2.0 * rng.gen::<f64>();
            let distance = (coef_c * l - x).abs();
            l - coef_a * distance
        })
        .collect()
}

/// Position update rule applied to every member each generation
#[derive(Clone, Debug)]
pub struct PositionUpdate {
    weights: [f64; 3],
    hybrid: Option<DifferentialHybrid>,
    diversity: DiversitySchedule,
    levy: Option<LevyFlight>,
    boundary: BoundaryHandling,
}

impl PositionUpdate {
    /// Plain equal-weight grey wolf update with clipping
    pub fn new() -> Self {
        Self {
            weights: [1.0 / 3.0; 3],
            hybrid: None,
            diversity: DiversitySchedule::Off,
            levy: None,
            boundary: BoundaryHandling::Clip,
        }
    }

    /// Leader weights, normalized to sum to one
    pub fn with_weights(mut self, weights: [f64; 3]) -> MogwoResult<Self> {
        let total: f64 = weights.iter().sum();
        if weights.iter().any(|w| !(*w >= 0.0 && w.is_finite())) || total <= 0.0 {
            return Err(MogwoError::Configuration(format!(
                "leader weights must be non-negative with a positive sum, got {:?}",
                weights
            )));
        }
        self.weights = weights.map(|w| w / total);
        Ok(self)
    }

    /// Enable differential hybridization
    pub fn with_hybrid(mut self, hybrid: DifferentialHybrid) -> MogwoResult<Self> {
        hybrid.validate()?;
        self.hybrid = Some(hybrid);
        Ok(self)
    }

    /// Set the retention schedule
    pub fn with_diversity(mut self, diversity: DiversitySchedule) -> MogwoResult<Self> {
        diversity.validate()?;
        self.diversity = diversity;
        Ok(self)
    }

    /// Enable Lévy perturbation, scaled by the retention fraction and the
    /// bound widths
    pub fn with_levy(mut self, levy: LevyFlight) -> Self {
        self.levy = Some(levy);
        self
    }

    /// Set the bound repair
    pub fn with_boundary(mut self, boundary: BoundaryHandling) -> Self {
        self.boundary = boundary;
        self
    }

    /// Normalized leader weights
    pub fn weights(&self) -> [f64; 3] {
        self.weights
    }

    /// New position for one member
    pub fn update<R: Rng>(
        &self,
        position: &[f64],
        leaders: [&[f64]; 3],
        a: f64,
        generation: usize,
        max_generations: usize,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> Vec<f64> {
        let [alpha, beta, delta] = leaders;
        let pulls = leaders.map(|leader| gwo_pull(leader, position, a, rng));

        let mut next: Vec<f64> = (0..position.len())
            .map(|d| {
                pulls
                    .iter()
                    .zip(&self.weights)
                    .map(|(pull, w)| w * pull[d])
                    .sum()
            })
            .collect();

        if let Some(hybrid) = &self.hybrid {
            let (f, cr) = hybrid.parameters(generation, max_generations);
            if rng.gen::<f64>() < cr {
                let mixed = hybrid.variant == DeVariant::Best2Mixed && rng.gen_bool(0.5);
                for (d, value) in next.iter_mut().enumerate() {
                    let mut trial = alpha[d] + f * (beta[d] - delta[d]);
                    if mixed {
                        trial += f * (position[d] - beta[d]);
                    }
                    if rng.gen::<f64>() < cr {
                        *value = trial;
                    }
                }
            }
        }

        let retention = self.diversity.value_at(generation, max_generations);
        if retention > 0.0 {
            for (value, &previous) in next.iter_mut().zip(position) {
                *value = (1.0 - retention) * *value + retention * previous;
            }
            if let Some(levy) = &self.levy {
                for (value, b) in next.iter_mut().zip(&bounds.bounds) {
                    *value += retention * b.range() * levy.sample(rng);
                }
            }
        }

        self.boundary.apply(&mut next, bounds);
        next
    }
}

impl Default for PositionUpdate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::bounds::Bounds;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_pull_collapses_onto_leader_when_a_is_zero() {
        let leader = [0.3, -1.0, 2.0];
        let position = [5.0, 5.0, 5.0];
        let pulled = gwo_pull(&leader, &position, 0.0, &mut rng());
        assert_eq!(pulled, leader.to_vec());
    }

    #[test]
    fn test_pull_spread_bounded_by_a() {
        let mut rng = rng();
        let leader = [1.0];
        let position = [0.0];
        for _ in 0..200 {
            let pulled = gwo_pull(&leader, &position, 2.0, &mut rng)[0];
            // |A| <= a and D <= |2·leader - x| = 2
            assert!((pulled - 1.0).abs() <= 4.0 + 1e-12);
        }
    }

    #[test]
    fn test_update_stays_in_bounds() {
        let mut rng = rng();
        let bounds = MultiBounds::uniform(Bounds::new(-1.0, 1.0), 4);
        let update = PositionUpdate::new()
            .with_hybrid(DifferentialHybrid::adaptive())
            .unwrap()
            .with_diversity(DiversitySchedule::exponential())
            .unwrap()
            .with_levy(LevyFlight::new(1.5).unwrap())
            .with_boundary(BoundaryHandling::Reflect);
        let alpha = [0.9, 0.9, 0.9, 0.9];
        let beta = [-0.9, 0.5, 0.0, 1.0];
        let delta = [0.0, -1.0, 0.3, -0.2];
        let position = [0.1, 0.2, 0.3, 0.4];
        for g in 0..50 {
            let a = 2.0 * (1.0 - g as f64 / 50.0);
            let next = update.update(&position, [&alpha, &beta, &delta], a, g, 50, &bounds, &mut rng);
            assert_eq!(next.len(), 4);
            assert!(bounds.contains_vec(&next));
        }
    }

    #[test]
    fn test_converges_to_shared_leader_at_end_of_run() {
        let bounds = MultiBounds::uniform(Bounds::new(-5.0, 5.0), 2);
        let leader = [1.0, 2.0];
        let next = PositionUpdate::new().update(
            &[4.0, -4.0],
            [&leader, &leader, &leader],
            0.0,
            10,
            10,
            &bounds,
            &mut rng(),
        );
        assert_relative_eq!(next[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(next[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_crossover_uses_trial_vector() {
        let bounds = MultiBounds::uniform(Bounds::new(-10.0, 10.0), 2);
        let update = PositionUpdate::new()
            .with_hybrid(DifferentialHybrid {
                scale_factor: 0.5,
                crossover_rate: 1.0,
                adaptive: false,
                variant: DeVariant::Rand1,
            })
            .unwrap();
        let next = update.update(
            &[0.0, 0.0],
            [&[1.0, 1.0], &[3.0, 2.0], &[1.0, 0.0]],
            2.0,
            0,
            10,
            &bounds,
            &mut rng(),
        );
        // alpha + 0.5(beta - delta)
        assert_relative_eq!(next[0], 2.0);
        assert_relative_eq!(next[1], 2.0);
    }

    #[test]
    fn test_mixed_variant_adds_position_term() {
        let bounds = MultiBounds::uniform(Bounds::new(-10.0, 10.0), 2);
        let update = PositionUpdate::new()
            .with_hybrid(DifferentialHybrid {
                scale_factor: 0.5,
                crossover_rate: 1.0,
                adaptive: false,
                variant: DeVariant::Best2Mixed,
            })
            .unwrap();
        let alpha = [1.0, 1.0];
        let beta = [3.0, 2.0];
        let delta = [1.0, 0.0];
        // alpha + 0.5(beta - delta)
        let rand1 = [2.0, 2.0];
        // rand1 + 0.5(x - beta)
        let best2 = [0.5, 1.0];

        let (mut saw_rand1, mut saw_best2) = (false, false);
        for seed in 0..32 {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let next = update.update(
                &[0.0, 0.0],
                [&alpha, &beta, &delta],
                2.0,
                0,
                10,
                &bounds,
                &mut rng,
            );
            let matches = |target: &[f64; 2]| {
                next.iter()
                    .zip(target)
                    .all(|(a, b)| (a - b).abs() < 1e-12)
            };
            if matches(&rand1) {
                saw_rand1 = true;
            } else if matches(&best2) {
                saw_best2 = true;
            } else {
                panic!("unexpected trial vector {:?}", next);
            }
        }
        assert!(saw_rand1 && saw_best2);
    }

    #[test]
    fn test_weights_are_normalized() {
        let update = PositionUpdate::new().with_weights([4.0, 3.0, 3.0]).unwrap();
        assert_relative_eq!(update.weights()[0], 0.4);
        assert!(PositionUpdate::new().with_weights([0.0, 0.0, 0.0]).is_err());
        assert!(PositionUpdate::new().with_weights([-1.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_hybrid_validation_and_adaptive_parameters() {
        assert!(DifferentialHybrid {
            crossover_rate: 1.5,
            ..DifferentialHybrid::default()
        }
        .validate()
        .is_err());
        let (f, cr) = DifferentialHybrid::adaptive().parameters(0, 100);
        assert_relative_eq!(f, 0.75);
        assert_relative_eq!(cr, 0.7);
        let (f, cr) = DifferentialHybrid::default().parameters(50, 100);
        assert_relative_eq!(f, 0.5);
        assert_relative_eq!(cr, 0.7);
    }
}
