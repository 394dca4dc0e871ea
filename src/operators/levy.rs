//! Lévy-stable step lengths (Mantegna's algorithm)

use rand::Rng;
use rand_distr::{Distribution, Normal};
use statrs::function::gamma::gamma;

use crate::error::{MogwoError, MogwoResult};

/// Heavy-tailed step distribution with stability index `beta`
///
/// A step is `u / |v|^(1/beta)` with `u ~ N(0, sigma_u²)` and `v ~ N(0, 1)`,
/// where `sigma_u` is Mantegna's scale for the given `beta`.
#[derive(Clone, Copy, Debug)]
pub struct LevyFlight {
    beta: f64,
    numerator: Normal<f64>,
    denominator: Normal<f64>,
}

impl LevyFlight {
    /// Default stability index
    pub const DEFAULT_BETA: f64 = 1.5;

    /// Create a Lévy flight; `beta` must lie in (0, 2]
    pub fn new(beta: f64) -> MogwoResult<Self> {
        if !(beta > 0.0 && beta <= 2.0) {
            return Err(MogwoError::Configuration(format!(
                "Lévy stability index must be in (0, 2], got {}",
                beta
            )));
        }
        let sigma_u = mantegna_sigma(beta);
        let numerator = Normal::new(0.0, sigma_u)
            .map_err(|e| MogwoError::Configuration(format!("Lévy scale: {}", e)))?;
        let denominator = Normal::new(0.0, 1.0)
            .map_err(|e| MogwoError::Configuration(format!("Lévy scale: {}", e)))?;
        Ok(Self {
            beta,
            numerator,
            denominator,
        })
    }

    /// Stability index
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl Distribution<f64> for LevyFlight {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = self.numerator.sample(rng);
        let v = self.denominator.sample(rng);
        let magnitude = v.abs().powf(1.0 / self.beta);
        if magnitude > 0.0 {
            u / magnitude
        } else {
            0.0
        }
    }
}

fn mantegna_sigma(beta: f64) -> f64 {
    let num = gamma(1.0 + beta) * (std::f64::consts::PI * beta / 2.0).sin();
    let den = gamma((1.0 + beta) / 2.0) * beta * 2f64.powf((beta - 1.0) / 2.0);
    (num / den).powf(1.0 / beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    #[test]
    fn test_mantegna_sigma_for_default_beta() {
        assert_relative_eq!(mantegna_sigma(1.5), 0.6966, epsilon = 1e-3);
    }

    #[test]
    fn test_mantegna_sigma_for_gaussian_limit() {
        // beta = 2: Γ(3)·sin(π) = 0
        assert_relative_eq!(mantegna_sigma(2.0), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rejects_bad_beta() {
        assert!(LevyFlight::new(0.0).is_err());
        assert!(LevyFlight::new(2.5).is_err());
        assert!(LevyFlight::new(f64::NAN).is_err());
    }

    #[test]
    fn test_samples_are_finite_and_heavy_tailed() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let levy = LevyFlight::new(LevyFlight::DEFAULT_BETA).unwrap();
        let samples: Vec<f64> = (0..10_000).map(|_| levy.sample(&mut rng)).collect();
        assert!(samples.iter().all(|s| s.is_finite()));
        let max = samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
        // A Gaussian of comparable scale would essentially never exceed 5
        assert!(max > 5.0);
    }
}
