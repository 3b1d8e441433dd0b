//! Episodes: one fitness-evaluation run from spawn to termination.
//!
//! An episode borrows one policy per flyer from the caller, drives the
//! [`PopulationSimulator`] tick by tick and stops when the population is
//! empty, the score passes the threshold, or a stop is requested.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ConfigError;
use super::params::Params;
use super::policy::Policy;
use super::population::PopulationSimulator;
use super::presentation::{NullPresenter, Presenter};

/// Cooperative stop request shared between an episode and its controller.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Creates a signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every episode holding this signal to stop before its next tick.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    /// Every flyer died.
    Empty,
    /// The score went past the threshold; `champion` is the policy handle of
    /// the first flyer still alive.
    ScoreThresholdReached {
        /// Policy handle of the representative survivor.
        champion: usize,
    },
    /// A stop was requested.
    Cancelled,
}

/// Lifecycle of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeState {
    /// Ticks are still being processed.
    Running,
    /// No further ticks will run.
    Terminated(EpisodeOutcome),
}

/// Summary of a finished (or interrupted) episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Generation label supplied by the caller.
    pub generation: u32,
    /// Seed used for obstacle gaps.
    pub seed: u64,
    /// Final state; `Running` if the report was taken mid-episode.
    pub state: EpisodeState,
    /// Obstacles passed.
    pub score: u32,
    /// Ticks processed.
    pub ticks: u64,
    /// Fitness earned by each policy, indexed by handle.
    pub fitness: Vec<f32>,
}

impl EpisodeReport {
    /// The policy handle with the highest fitness.
    pub fn fittest(&self) -> Option<usize> {
        self.fitness
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
    }
}

/// One bounded simulation run over a borrowed population of policies.
pub struct Episode<'p, P: Policy> {
    simulator: PopulationSimulator,
    policies: &'p mut [P],
    generation: u32,
    seed: u64,
    state: EpisodeState,
    stop: StopSignal,
}

impl<'p, P: Policy> Episode<'p, P> {
    /// Creates an episode with one flyer per policy.
    ///
    /// Fails if the parameters are invalid or the number of policies differs
    /// from `params.population_size`.
    pub fn new(
        params: Params,
        policies: &'p mut [P],
        generation: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        if policies.len() != params.population_size {
            return Err(ConfigError::PopulationMismatch {
                expected: params.population_size,
                actual: policies.len(),
            });
        }

        let simulator = PopulationSimulator::new(params, policies.len(), seed)?;
        info!(
            generation,
            seed,
            population = policies.len(),
            "episode started"
        );

        Ok(Self {
            simulator,
            policies,
            generation,
            seed,
            state: EpisodeState::Running,
            stop: StopSignal::new(),
        })
    }

    /// Attaches a stop signal checked once per tick.
    #[must_use]
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EpisodeState {
        self.state
    }

    /// Generation label.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The underlying simulator.
    pub fn simulator(&self) -> &PopulationSimulator {
        &self.simulator
    }

    /// Mutable access to the simulator, for staging scenarios.
    pub fn simulator_mut(&mut self) -> &mut PopulationSimulator {
        &mut self.simulator
    }

    /// The borrowed policies, indexed by handle.
    pub fn policies(&self) -> &[P] {
        &*self.policies
    }

    /// The representative policy once the score threshold has been reached.
    pub fn champion(&self) -> Option<&P> {
        match self.state {
            EpisodeState::Terminated(EpisodeOutcome::ScoreThresholdReached { champion }) => {
                self.policies.get(champion)
            }
            _ => None,
        }
    }

    /// Runs one tick, presents it, and checks the stop conditions.
    ///
    /// Does nothing once the episode has terminated.
    pub fn step<R: Presenter + ?Sized>(&mut self, presenter: &mut R) -> EpisodeState {
        if self.state != EpisodeState::Running {
            return self.state;
        }
        if self.stop.is_requested() {
            return self.terminate(EpisodeOutcome::Cancelled);
        }

        self.simulator.tick(&mut *self.policies);
        presenter.present(&self.simulator.frame(self.generation));

        if let Some(lead) = self.simulator.agents.first() {
            if self.simulator.score > self.simulator.params.score_threshold {
                let champion = lead.policy;
                return self.terminate(EpisodeOutcome::ScoreThresholdReached { champion });
            }
        } else {
            return self.terminate(EpisodeOutcome::Empty);
        }

        self.state
    }

    /// Ticks until the episode terminates.
    pub fn run<R: Presenter + ?Sized>(&mut self, presenter: &mut R) -> EpisodeOutcome {
        loop {
            if let EpisodeState::Terminated(outcome) = self.step(presenter) {
                return outcome;
            }
        }
    }

    /// Ticks until the episode terminates, without presenting.
    pub fn run_headless(&mut self) -> EpisodeOutcome {
        self.run(&mut NullPresenter)
    }

    /// Summarises the episode so far.
    pub fn report(&self) -> EpisodeReport {
        EpisodeReport {
            generation: self.generation,
            seed: self.seed,
            state: self.state,
            score: self.simulator.score,
            ticks: self.simulator.ticks,
            fitness: self.simulator.fitness_ledger.clone(),
        }
    }

    fn terminate(&mut self, outcome: EpisodeOutcome) -> EpisodeState {
        info!(
            generation = self.generation,
            score = self.simulator.score,
            ticks = self.simulator.ticks,
            ?outcome,
            "episode terminated"
        );
        self.state = EpisodeState::Terminated(outcome);
        self.state
    }
}

/// Runs one headless episode per seed in parallel.
///
/// `make_policies` builds a fresh population for a seed; episodes share
/// nothing, so each runs on its own rayon worker.
pub fn evaluate_batch<P, F>(
    params: &Params,
    generation: u32,
    seeds: &[u64],
    make_policies: F,
) -> Result<Vec<EpisodeReport>, ConfigError>
where
    P: Policy,
    F: Fn(u64) -> Vec<P> + Sync,
{
    params.validate()?;
    seeds
        .par_iter()
        .map(|&seed| {
            let mut policies = make_policies(seed);
            let mut episode = Episode::new(params.clone(), &mut policies, generation, seed)?;
            episode.run_headless();
            Ok(episode.report())
        })
        .collect()
}
