use super::{ensure_non_empty, Greedy, Random};
use crate::{error::QtabError, RandomSource};
use serde::{Deserialize, Serialize};

/// Epsilon-greedy action selection.
///
/// Deserializing checks `epsilon` like [`EpsilonGreedy::new`] does.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy)]
#[serde(try_from = "EpsilonGreedyParams")]
pub struct EpsilonGreedy {
    pub(crate) epsilon: f64,
}

#[derive(Deserialize)]
struct EpsilonGreedyParams {
    epsilon: f64,
}

impl TryFrom<EpsilonGreedyParams> for EpsilonGreedy {
    type Error = QtabError;

    fn try_from(params: EpsilonGreedyParams) -> Result<Self, Self::Error> {
        Self::new(params.epsilon)
    }
}

/// Explores one step in five.
impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self { epsilon: 0.2 }
    }
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy policy.
    pub fn new(epsilon: f64) -> Result<Self, QtabError> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(QtabError::invalid(format!(
                "epsilon must be in [0, 1], got {}",
                epsilon
            )));
        }
        Ok(Self { epsilon })
    }

    /// Probability of taking a random action.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Draws `u` in `[0, 1)`; explores if `u < epsilon`, exploits otherwise.
    pub fn sample_action<R>(&self, q: &[f64], rng: &mut R) -> Result<usize, QtabError>
    where
        R: RandomSource + ?Sized,
    {
        ensure_non_empty(q)?;
        Self::new(self.epsilon)?;
        if rng.uniform_float(0.0, 1.0) < self.epsilon {
            Random.sample_action(q, rng)
        } else {
            Greedy.sample_action(q, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RngSource;

    /// Replays fixed draws so two policies can be fed the same randomness.
    struct Scripted {
        floats: Vec<f64>,
        ints: Vec<usize>,
    }

    impl RandomSource for Scripted {
        fn uniform_int(&mut self, min: usize, max: usize) -> usize {
            let v = self.ints.remove(0);
            min + v % (max - min + 1)
        }

        fn uniform_float(&mut self, min: f64, max: f64) -> f64 {
            min + self.floats.remove(0) * (max - min)
        }
    }

    #[test]
    fn test_out_of_range_epsilon() {
        assert!(EpsilonGreedy::new(-0.1).is_err());
        assert!(EpsilonGreedy::new(1.01).is_err());
        assert!(EpsilonGreedy::new(f64::NAN).is_err());
        assert!(EpsilonGreedy::new(0.0).is_ok());
        assert!(EpsilonGreedy::new(1.0).is_ok());
    }

    #[test]
    fn test_literal_with_bad_epsilon_is_rejected() {
        let mut rng = RngSource::seed_from_u64(0);
        for epsilon in [-0.5, 1.5, f64::NAN] {
            assert!(matches!(
                EpsilonGreedy { epsilon }.sample_action(&[0.0, 1.0], &mut rng),
                Err(QtabError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_deserialize_checks_epsilon() {
        let p: EpsilonGreedy = serde_yaml::from_str("epsilon: 0.3\n").unwrap();
        assert_eq!(p.epsilon(), 0.3);
        assert!(serde_yaml::from_str::<EpsilonGreedy>("epsilon: 1.5\n").is_err());
        assert_eq!(EpsilonGreedy::default().epsilon(), 0.2);
    }

    #[test]
    fn test_epsilon_zero_is_greedy() {
        let qs: [&[f64]; 3] = [&[0.0, 1.0, 0.5], &[3.0, -1.0], &[-2.0, -2.0, -5.0, 4.0]];
        let policy = EpsilonGreedy::new(0.0).unwrap();
        let mut rng = RngSource::seed_from_u64(11);
        for q in qs.iter() {
            for _ in 0..100 {
                let expected = Greedy.sample_action(q, &mut RngSource::seed_from_u64(0)).unwrap();
                assert_eq!(policy.sample_action(q, &mut rng).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_epsilon_one_is_random() {
        let q = [10.0, 0.0, 0.0, 0.0];
        let ints = vec![3, 1, 0, 2, 2, 1];
        let policy = EpsilonGreedy::new(1.0).unwrap();

        let mut eps_rng = Scripted {
            floats: vec![0.999; ints.len()],
            ints: ints.clone(),
        };
        let mut rnd_rng = Scripted {
            floats: vec![],
            ints,
        };
        for _ in 0..6 {
            assert_eq!(
                policy.sample_action(&q, &mut eps_rng).unwrap(),
                Random.sample_action(&q, &mut rnd_rng).unwrap()
            );
        }
    }

    #[test]
    fn test_explores_at_expected_rate() {
        let policy = EpsilonGreedy::new(0.3).unwrap();
        let q = [1.0, 0.0];
        let mut rng = RngSource::seed_from_u64(12);
        let n = 10_000;
        let worse = (0..n)
            .filter(|_| policy.sample_action(&q, &mut rng).unwrap() == 1)
            .count();
        // Half of the explorations land on the worse action.
        let rate = worse as f64 / n as f64;
        assert!((rate - 0.15).abs() < 0.02, "rate = {}", rate);
    }
}
