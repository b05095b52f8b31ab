//! Q-learning.
use super::Algorithm;
use crate::{
    error::QtabError, Action, ActionId, ActionSpace, LookupTable, Policy, RandomSource, State,
    StateSpace,
};
use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`QLearning`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QLearningConfig {
    /// Value every state-action pair starts with.
    pub initial_q: f64,

    /// Learning rate, in `[0, 1]`.
    pub alpha: f64,

    /// Discount factor, in `[0, 1]`.
    pub gamma: f64,

    /// Action-selection policy. Greedy is used when absent.
    pub policy: Option<Policy>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            initial_q: 0.0,
            alpha: 0.5,
            gamma: 0.9,
            policy: None,
        }
    }
}

impl QLearningConfig {
    /// Sets the initial Q-value.
    pub fn initial_q(mut self, v: f64) -> Self {
        self.initial_q = v;
        self
    }

    /// Sets the learning rate.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the policy.
    pub fn policy(mut self, v: Policy) -> Self {
        self.policy = Some(v);
        self
    }

    /// Constructs [`QLearningConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QLearningConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Q-learning with the one-step Bellman update
/// `Q(s, a) <- Q(s, a) + alpha * (r + gamma * max_a' Q(s', a') - Q(s, a))`.
#[derive(Debug, Clone)]
pub struct QLearning {
    initial_q: f64,
    alpha: f64,
    gamma: f64,
    policy: Option<Policy>,
    table: LookupTable,
    initialized: bool,
}

impl QLearning {
    /// Builds the algorithm, checking the parameters.
    pub fn build(config: QLearningConfig) -> Result<Self, QtabError> {
        for (name, v) in [("alpha", config.alpha), ("gamma", config.gamma)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(QtabError::InvalidConfiguration(format!(
                    "{} must be in [0, 1], got {}",
                    name, v
                )));
            }
        }
        if let Some(policy) = &config.policy {
            policy.validate()?;
        }
        Ok(Self {
            initial_q: config.initial_q,
            alpha: config.alpha,
            gamma: config.gamma,
            policy: config.policy,
            table: LookupTable::new(),
            initialized: false,
        })
    }

    /// Q-values of every action at `state`, in action registration order.
    pub fn q_values(&self, state: &State, actions: &ActionSpace) -> Result<Vec<f64>, QtabError> {
        if !self.initialized || actions.is_empty() {
            return Err(QtabError::NotFound {
                state: state.name().to_string(),
                action: None,
            });
        }
        actions
            .iter()
            .map(|(_, a)| self.table.get(state, a))
            .collect()
    }

    /// The largest Q-value at `state`.
    pub fn max_q(&self, state: &State, actions: &ActionSpace) -> Result<f64, QtabError> {
        // Only the value matters here, so ties need no breaking.
        Ok(self
            .q_values(state, actions)?
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max))
    }

    fn policy_or_default(&mut self) -> &Policy {
        if self.policy.is_none() {
            warn!("No policy specified for Q-learning, defaulting to greedy");
        }
        self.policy.get_or_insert_with(Policy::default)
    }
}

impl Algorithm for QLearning {
    fn init(&mut self, states: &StateSpace, actions: &ActionSpace) -> Result<(), QtabError> {
        if self.initialized {
            return Err(QtabError::invalid("Q-learning is already initialized"));
        }
        if actions.is_empty() {
            return Err(QtabError::invalid("no action is registered"));
        }
        if states.is_empty() {
            return Err(QtabError::invalid("no state is registered"));
        }
        for (_, s) in states.iter() {
            for (_, a) in actions.iter() {
                self.table.set(s, a, self.initial_q);
            }
        }
        self.initialized = true;
        debug!(
            "Initialized {} Q-values ({} states x {} actions)",
            self.table.len(),
            states.len(),
            actions.len()
        );
        Ok(())
    }

    fn step(
        &mut self,
        state: &State,
        actions: &ActionSpace,
        rng: &mut dyn RandomSource,
    ) -> Result<ActionId, QtabError> {
        let q = self.q_values(state, actions)?;
        let ix = self.policy_or_default().sample_action(&q, rng)?;
        Ok(ActionId(ix))
    }

    fn update(
        &mut self,
        previous: &State,
        action: &Action,
        reward: f64,
        current: &State,
        actions: &ActionSpace,
    ) -> Result<(), QtabError> {
        let old_q = self.table.get(previous, action)?;
        let max_q = self.max_q(current, actions)?;
        let new_q = old_q + self.alpha * (reward + self.gamma * max_q - old_q);
        self.table.set(previous, action, new_q);
        Ok(())
    }

    fn set_policy(&mut self, policy: Policy) -> Result<(), QtabError> {
        policy.validate()?;
        self.policy = Some(policy);
        Ok(())
    }

    fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    fn table(&self) -> &LookupTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RngSource, Transition};
    use tempdir::TempDir;

    fn single_loop() -> (StateSpace, ActionSpace) {
        let mut states = StateSpace::new();
        states.add(State::new("s")).unwrap();
        let mut actions = ActionSpace::new();
        actions
            .add(Action::new("stay", |_: &State, states: &StateSpace| {
                Ok(Transition::MoveTo(states.id_of("s")?))
            }))
            .unwrap();
        (states, actions)
    }

    #[test]
    fn test_invalid_parameters() {
        for config in [
            QLearningConfig::default().alpha(1.5),
            QLearningConfig::default().alpha(-0.1),
            QLearningConfig::default().gamma(2.0),
            QLearningConfig::default().gamma(f64::NAN),
        ] {
            assert!(matches!(
                QLearning::build(config),
                Err(QtabError::InvalidConfiguration(_))
            ));
        }
        let bad_policy = QLearningConfig {
            policy: Some(Policy::Softmax(crate::policy::Softmax { temperature: -1.0 })),
            ..Default::default()
        };
        assert!(QLearning::build(bad_policy).is_err());
    }

    #[test]
    fn test_init_fills_cross_product() {
        let mut states = StateSpace::new();
        for s in ["a", "b", "c"] {
            states.add(State::new(s)).unwrap();
        }
        let mut actions = ActionSpace::new();
        for a in ["l", "r"] {
            actions
                .add(Action::new(a, |_: &State, _: &StateSpace| Ok(Transition::Blocked)))
                .unwrap();
        }
        let mut ql = QLearning::build(QLearningConfig::default().initial_q(0.25)).unwrap();
        ql.init(&states, &actions).unwrap();
        assert_eq!(ql.table().len(), 6);
        assert!(ql.table().iter().all(|(_, _, v)| v == 0.25));

        // A second call is a setup bug.
        assert!(ql.init(&states, &actions).is_err());
    }

    #[test]
    fn test_init_without_actions() {
        let (states, _) = single_loop();
        let mut ql = QLearning::build(QLearningConfig::default()).unwrap();
        assert!(matches!(
            ql.init(&states, &ActionSpace::new()),
            Err(QtabError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_step_before_init() {
        let (states, actions) = single_loop();
        let mut ql = QLearning::build(QLearningConfig::default()).unwrap();
        let mut rng = RngSource::seed_from_u64(0);
        let s = states.get(states.id_of("s").unwrap()).unwrap();
        assert!(matches!(
            ql.step(s, &actions, &mut rng),
            Err(QtabError::NotFound { .. })
        ));
    }

    #[test]
    fn test_default_policy_is_greedy() {
        let (states, actions) = single_loop();
        let mut ql = QLearning::build(QLearningConfig::default()).unwrap();
        ql.init(&states, &actions).unwrap();
        assert!(ql.policy().is_none());

        let mut rng = RngSource::seed_from_u64(0);
        let s = states.get(states.id_of("s").unwrap()).unwrap();
        assert_eq!(ql.step(s, &actions, &mut rng).unwrap(), ActionId(0));
        assert_eq!(ql.policy(), Some(&Policy::greedy()));
    }

    #[test]
    fn test_set_policy_checks_parameters() {
        let mut ql = QLearning::build(QLearningConfig::default()).unwrap();
        let bad = Policy::Softmax(crate::policy::Softmax { temperature: -1.0 });
        assert!(matches!(
            ql.set_policy(bad),
            Err(QtabError::InvalidConfiguration(_))
        ));
        assert!(ql.policy().is_none());

        ql.set_policy(Policy::random()).unwrap();
        assert_eq!(ql.policy(), Some(&Policy::random()));
    }

    #[test]
    fn test_single_update() {
        let (states, actions) = single_loop();
        let mut ql = QLearning::build(QLearningConfig::default().alpha(0.5).gamma(0.9)).unwrap();
        ql.init(&states, &actions).unwrap();
        let s = states.get(states.id_of("s").unwrap()).unwrap();
        let a = actions.get(ActionId(0)).unwrap();

        ql.update(s, a, 1.0, s, &actions).unwrap();
        // 0 + 0.5 * (1 + 0.9 * 0 - 0)
        assert!((ql.table().get(s, a).unwrap() - 0.5).abs() < 1e-12);
        ql.update(s, a, 1.0, s, &actions).unwrap();
        // 0.5 + 0.5 * (1 + 0.9 * 0.5 - 0.5)
        assert!((ql.table().get(s, a).unwrap() - 0.975).abs() < 1e-12);
    }

    #[test]
    fn test_converges_to_discounted_return() {
        let (states, actions) = single_loop();
        let mut ql = QLearning::build(
            QLearningConfig::default()
                .initial_q(0.0)
                .alpha(0.5)
                .gamma(0.9),
        )
        .unwrap();
        ql.init(&states, &actions).unwrap();
        let s = states.get(states.id_of("s").unwrap()).unwrap();
        let a = actions.get(ActionId(0)).unwrap();

        for _ in 0..200 {
            ql.update(s, a, 1.0, s, &actions).unwrap();
        }
        let q = ql.table().get(s, a).unwrap();
        assert!((q - 10.0).abs() < 0.05, "q = {}", q);
    }

    #[test]
    fn test_update_uses_max_over_next_state() {
        let mut states = StateSpace::new();
        for s in ["x", "y"] {
            states.add(State::new(s)).unwrap();
        }
        let mut actions = ActionSpace::new();
        for a in ["p", "q"] {
            actions
                .add(Action::new(a, |_: &State, _: &StateSpace| Ok(Transition::Blocked)))
                .unwrap();
        }
        let mut ql = QLearning::build(QLearningConfig::default().alpha(1.0).gamma(0.5)).unwrap();
        ql.init(&states, &actions).unwrap();

        let x = states.get(states.id_of("x").unwrap()).unwrap();
        let y = states.get(states.id_of("y").unwrap()).unwrap();
        let p = actions.get(ActionId(0)).unwrap();
        let q = actions.get(ActionId(1)).unwrap();
        ql.table.set(y, p, 2.0);
        ql.table.set(y, q, 8.0);

        ql.update(x, p, 1.0, y, &actions).unwrap();
        // alpha = 1: Q = r + gamma * max(2, 8)
        assert_eq!(ql.table().get(x, p).unwrap(), 5.0);
    }

    #[test]
    fn test_serde_config() -> Result<()> {
        let config = QLearningConfig::default()
            .initial_q(1.0)
            .alpha(0.2)
            .gamma(0.95)
            .policy(Policy::softmax(0.5)?);

        let dir = TempDir::new("q_learning_config")?;
        let path = dir.path().join("q_learning.yaml");
        config.save(&path)?;
        let config_ = QLearningConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }
}
