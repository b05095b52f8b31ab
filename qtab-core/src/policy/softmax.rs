use super::ensure_non_empty;
use crate::{error::QtabError, RandomSource};
use serde::{Deserialize, Serialize};

/// Softmax (Boltzmann) action selection.
///
/// Action `i` is chosen with probability `exp(q_i / T) / sum_j exp(q_j / T)`.
/// A high temperature `T` flattens the distribution, a low one sharpens it
/// towards greedy selection.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
#[serde(try_from = "SoftmaxParams")]
pub struct Softmax {
    pub(crate) temperature: f64,
}

#[derive(Deserialize)]
struct SoftmaxParams {
    temperature: f64,
}

impl TryFrom<SoftmaxParams> for Softmax {
    type Error = QtabError;

    fn try_from(params: SoftmaxParams) -> Result<Self, Self::Error> {
        Self::new(params.temperature)
    }
}

impl Softmax {
    /// Constructs softmax policy.
    pub fn new(temperature: f64) -> Result<Self, QtabError> {
        if temperature.is_nan() || temperature <= 0.0 || temperature.is_infinite() {
            return Err(QtabError::invalid(format!(
                "temperature must be positive, got {}",
                temperature
            )));
        }
        Ok(Self { temperature })
    }

    /// Temperature, strictly positive.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Selection probability of every action.
    pub fn probabilities(&self, q: &[f64]) -> Result<Vec<f64>, QtabError> {
        ensure_non_empty(q)?;
        Self::new(self.temperature)?;
        // Shifting by the maximum leaves the ratios unchanged and keeps exp() finite.
        let max = q.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = q
            .iter()
            .map(|v| ((v - max) / self.temperature).exp())
            .collect();
        let total: f64 = weights.iter().sum();
        if total.is_nan() || total <= 0.0 || total.is_infinite() {
            return Err(QtabError::invalid(format!(
                "softmax is undefined for Q-values {:?}",
                q
            )));
        }
        Ok(weights.into_iter().map(|w| w / total).collect())
    }

    /// Samples an index by inverting the cumulative distribution.
    pub fn sample_action<R>(&self, q: &[f64], rng: &mut R) -> Result<usize, QtabError>
    where
        R: RandomSource + ?Sized,
    {
        let probs = self.probabilities(q)?;
        let u = rng.uniform_float(0.0, 1.0);
        let mut cum = 0.0;
        for (i, p) in probs.iter().enumerate() {
            cum += p;
            if u < cum {
                return Ok(i);
            }
        }
        // Rounding can leave the sum a hair below 1.
        Ok(probs
            .iter()
            .rposition(|p| *p > 0.0)
            .unwrap_or(probs.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RngSource;

    #[test]
    fn test_invalid_temperature() {
        assert!(Softmax::new(0.0).is_err());
        assert!(Softmax::new(-1.0).is_err());
        assert!(Softmax::new(f64::NAN).is_err());
        assert!(Softmax::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_literal_with_bad_temperature_is_rejected() {
        let mut rng = RngSource::seed_from_u64(0);
        for temperature in [-1.0, 0.0, f64::NAN] {
            let softmax = Softmax { temperature };
            assert!(matches!(
                softmax.probabilities(&[0.0, 5.0]),
                Err(QtabError::InvalidConfiguration(_))
            ));
            assert!(softmax.sample_action(&[0.0, 5.0], &mut rng).is_err());
        }
    }

    #[test]
    fn test_probabilities_sum_to_one_and_are_monotone() {
        let cases: [(&[f64], f64); 4] = [
            (&[1.0, 2.0, 3.0], 1.0),
            (&[-10.0, 0.0, 10.0, 10.0], 0.5),
            (&[500.0, -500.0], 0.1),
            (&[0.3], 2.0),
        ];
        for (q, t) in cases.iter() {
            let p = Softmax::new(*t).unwrap().probabilities(q).unwrap();
            let sum: f64 = p.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{:?}", p);
            for i in 0..q.len() {
                for j in 0..q.len() {
                    if q[i] > q[j] {
                        assert!(p[i] >= p[j]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_equal_values_give_uniform_distribution() {
        let p = Softmax::new(1.0).unwrap().probabilities(&[4.0; 4]).unwrap();
        for v in p {
            assert!((v - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empirical_frequencies() {
        let softmax = Softmax::new(1.0).unwrap();
        let q = [0.0, 1.0, 2.0];
        let p = softmax.probabilities(&q).unwrap();
        let mut rng = RngSource::seed_from_u64(21);
        let n = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            counts[softmax.sample_action(&q, &mut rng).unwrap()] += 1;
        }
        for i in 0..3 {
            let freq = counts[i] as f64 / n as f64;
            assert!((freq - p[i]).abs() < 0.02, "{:?} vs {:?}", counts, p);
        }
    }
}
