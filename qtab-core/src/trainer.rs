//! Train an [`Algorithm`] on a [`Problem`].
mod config;
use crate::{
    algorithm::{QLearning, QLearningConfig},
    record::{NullRecorder, Record, RecordValue, Recorder},
    ActionSpace, Agent, Algorithm, Context, Problem, RandomSource, RngSource, StateSpace,
    Transition,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Statistics of the last completed trial.
///
/// `trials_completed` and `total_steps` accumulate over the lifetime of the
/// [`Trainer`]; the other two fields describe the trial that just finished.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Stats {
    /// The number of finished trials.
    pub trials_completed: usize,

    /// The number of steps over all trials.
    pub total_steps: usize,

    /// Steps taken in the last trial.
    pub steps_per_trial: usize,

    /// Sum of rewards in the last trial.
    pub rewards_per_trial: f64,
}

impl From<&Stats> for Record {
    fn from(stats: &Stats) -> Self {
        Record::from_slice(&[
            (
                "trials_completed",
                RecordValue::Scalar(stats.trials_completed as f64),
            ),
            ("total_steps", RecordValue::Scalar(stats.total_steps as f64)),
            (
                "steps_per_trial",
                RecordValue::Scalar(stats.steps_per_trial as f64),
            ),
            ("rewards_per_trial", RecordValue::Scalar(stats.rewards_per_trial)),
            ("timestamp", RecordValue::DateTime(Local::now())),
        ])
    }
}

/// Phase of the episode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Between trials.
    Idle,

    /// Inside a trial.
    Running,

    /// The trial has ended and its bookkeeping is in progress.
    Terminated,
}

/// A flag asking a [`Trainer`] to stop.
///
/// Clones share the flag. The trainer looks at it only between trials, so a
/// trial in progress always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Asks the trainer to stop before the next trial.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if stop has been requested.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Withdraws a stop request.
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop and related objects.
///
/// # Setup
///
/// [`Trainer::build`] calls, in this order, [`Problem::setup_states`],
/// [`Problem::setup_actions`] and [`Problem::setup_algorithm`], then
/// [`Algorithm::init`] once. When the problem supplies no algorithm,
/// Q-learning with [`QLearningConfig::default()`] is used.
///
/// # Training loop
///
/// A trial goes through `Idle -> Running -> Terminated -> Idle`.
/// While `Running`, every step does the following:
///
/// 1. `action = algorithm.step(current_state)`.
/// 2. The action is recorded on the [`Agent`].
/// 3. The effect of the action is applied. [`Transition::MoveTo`] moves the
///    agent, [`Transition::Blocked`] is handed to [`Problem::on_blocked`].
/// 4. [`Problem::step`] decides if the trial goes on.
/// 5. [`Problem::reward`] is added to the rewards of the trial.
/// 6. `algorithm.update(previous_state, action, reward, current_state)`.
///
/// When the trial is `Terminated`, [`Problem::end_of_trial`] is called, a
/// [`Stats`] snapshot is handed to every event listener and written to the
/// recorder as a [`Record`], and the per-trial counters are reset.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     T[Trainer]-->|State|A[Algorithm]
///     A -->|Q-values|P[Policy]
///     P -->|ActionId|T
///     T -->|Context|E[Problem]
///     E -->|continue, reward|T
///     T -->|transition, reward|A
/// ```
pub struct Trainer<P: Problem, R: RandomSource = RngSource> {
    problem: P,
    states: StateSpace,
    actions: ActionSpace,
    agent: Agent,
    algorithm: Box<dyn Algorithm>,
    rng: R,
    config: TrainerConfig,
    stop: StopSignal,
    listeners: Vec<Box<dyn FnMut(&Stats)>>,
    recorder: Box<dyn Recorder>,
    phase: Phase,
    trials_completed: usize,
    total_steps: usize,
    steps_per_trial: usize,
    rewards_per_trial: f64,
    last_stats: Stats,
}

impl<P: Problem, R: RandomSource> Trainer<P, R> {
    /// Sets up `problem` and constructs a trainer for it.
    pub fn build(mut problem: P, config: TrainerConfig, rng: R) -> Result<Self> {
        let mut states = StateSpace::new();
        let initial = problem.setup_states(&mut states)?;
        states.get(initial)?;

        let mut actions = ActionSpace::new();
        problem.setup_actions(&states, &mut actions)?;

        let mut algorithm: Box<dyn Algorithm> = match problem.setup_algorithm()? {
            Some(algorithm) => algorithm,
            None => {
                warn!("No algorithm specified by the problem, defaulting to Q-learning");
                Box::new(QLearning::build(QLearningConfig::default())?)
            }
        };
        algorithm.init(&states, &actions)?;
        info!(
            "Set up {} states and {} actions",
            states.len(),
            actions.len()
        );

        Ok(Self {
            problem,
            states,
            actions,
            agent: Agent::new(initial),
            algorithm,
            rng,
            config,
            stop: StopSignal::default(),
            listeners: Vec::new(),
            recorder: Box::new(NullRecorder::default()),
            phase: Phase::Idle,
            trials_completed: 0,
            total_steps: 0,
            steps_per_trial: 0,
            rewards_per_trial: 0.0,
            last_stats: Stats::default(),
        })
    }

    /// Registers a function called with the [`Stats`] of every completed trial.
    pub fn add_event_listener(&mut self, f: impl FnMut(&Stats) + 'static) {
        self.listeners.push(Box::new(f));
    }

    /// Sets the recorder receiving one [`Record`] per completed trial.
    pub fn set_recorder(&mut self, recorder: Box<dyn Recorder>) {
        self.recorder = recorder;
    }

    /// Returns a handle to stop [`run`](Trainer::run) and
    /// [`run_until_stopped`](Trainer::run_until_stopped) between trials.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Runs one step of the current trial.
    ///
    /// Returns `false` if the problem terminated the trial.
    fn step(&mut self) -> Result<bool> {
        let from = self.agent.current_state();
        let state = self.states.get(from)?;
        let action_id = self.algorithm.step(state, &self.actions, &mut self.rng)?;
        self.agent.set_last_action(action_id);

        let action = self.actions.get(action_id)?;
        match action.perform(state, &self.states)? {
            Transition::MoveTo(to) => self.agent.set_state(to),
            Transition::Blocked => {
                self.agent.set_state(from);
                self.problem.on_blocked(&mut self.agent)?;
            }
        }

        let ctx = Context {
            agent: &self.agent,
            states: &self.states,
            actions: &self.actions,
        };
        let running = self.problem.step(&ctx)?;
        let reward = self.problem.reward(&ctx)?;
        self.steps_per_trial += 1;
        self.rewards_per_trial += reward;

        let current = self.states.get(self.agent.current_state())?;
        debug!(
            "{} --{}--> {}, reward {}",
            state.name(),
            action.name(),
            current.name(),
            reward
        );
        self.algorithm
            .update(state, action, reward, current, &self.actions)?;

        Ok(running)
    }

    /// Runs a single trial to its end and returns its statistics.
    ///
    /// On error the trial is abandoned. Its steps are not counted and no
    /// stats are emitted. The problem still gets
    /// [`end_of_trial`](Problem::end_of_trial) to put the agent back, and
    /// the trainer returns to [`Phase::Idle`]. Values already learnt during
    /// the trial are kept.
    pub fn run_trial(&mut self) -> Result<Stats> {
        match self.run_steps() {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!(
                    "Trial {} abandoned after {} steps: {}",
                    self.trials_completed + 1,
                    self.steps_per_trial,
                    e
                );
                if let Err(e) = self.problem.end_of_trial(&mut self.agent, &self.states) {
                    warn!("Failed to reset the abandoned trial: {}", e);
                }
                self.steps_per_trial = 0;
                self.rewards_per_trial = 0.0;
                self.phase = Phase::Idle;
                Err(e)
            }
        }
    }

    fn run_steps(&mut self) -> Result<Stats> {
        self.phase = Phase::Running;
        while self.phase == Phase::Running {
            if !self.step()? {
                self.phase = Phase::Terminated;
            } else if let Some(max_steps) = self.config.max_steps_per_trial {
                if self.steps_per_trial >= max_steps {
                    debug!("Trial truncated after {} steps", max_steps);
                    self.phase = Phase::Terminated;
                }
            }
        }

        self.problem.end_of_trial(&mut self.agent, &self.states)?;
        self.trials_completed += 1;
        self.total_steps += self.steps_per_trial;
        let stats = Stats {
            trials_completed: self.trials_completed,
            total_steps: self.total_steps,
            steps_per_trial: self.steps_per_trial,
            rewards_per_trial: self.rewards_per_trial,
        };

        for f in self.listeners.iter_mut() {
            f(&stats);
        }
        self.recorder.write(Record::from(&stats));
        if self.config.log_interval > 0 && stats.trials_completed % self.config.log_interval == 0
        {
            info!(
                "Trial {}: {} steps, reward {:.1}",
                stats.trials_completed, stats.steps_per_trial, stats.rewards_per_trial
            );
        }

        self.steps_per_trial = 0;
        self.rewards_per_trial = 0.0;
        self.last_stats = stats;
        self.phase = Phase::Idle;
        Ok(stats)
    }

    /// Runs `n` trials, or fewer if the stop signal is raised.
    ///
    /// Returns the number of trials run.
    pub fn run(&mut self, n: usize) -> Result<usize> {
        info!("Start training for {} trials", n);
        for i in 0..n {
            if self.stop.is_raised() {
                info!("Stopped after {} of {} trials", i, n);
                return Ok(i);
            }
            self.run_trial()?;
        }
        Ok(n)
    }

    /// Runs trials until the stop signal is raised.
    ///
    /// Returns the number of trials run.
    pub fn run_until_stopped(&mut self) -> Result<usize> {
        info!("Start training until stopped");
        let mut n = 0;
        while !self.stop.is_raised() {
            self.run_trial()?;
            n += 1;
        }
        info!("Stopped after {} trials", n);
        Ok(n)
    }

    /// Statistics of the last completed trial, all zero before the first one.
    pub fn stats(&self) -> Stats {
        self.last_stats
    }

    /// The current phase of the trial state machine.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The agent.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// The learning algorithm.
    pub fn algorithm(&self) -> &dyn Algorithm {
        self.algorithm.as_ref()
    }

    /// Mutable reference to the learning algorithm, e.g. to change its policy.
    pub fn algorithm_mut(&mut self) -> &mut dyn Algorithm {
        self.algorithm.as_mut()
    }

    /// All states of the problem.
    pub fn states(&self) -> &StateSpace {
        &self.states
    }

    /// All actions of the problem.
    pub fn actions(&self) -> &ActionSpace {
        &self.actions
    }

    /// The problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }
}
