//! Population simulator: one tick across every live flyer and obstacle.
//!
//! Each tick:
//! 1. Picks the obstacle the flyers steer by
//! 2. Rewards survival, moves each flyer and asks its policy whether to jump
//! 3. Scrolls the floor
//! 4. Moves obstacles and records collisions, passes and despawns
//! 5. Records flyers that left the world
//! 6. Applies everything recorded, atomically (see [`events::apply_events`])

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::trace;

use super::collision::CollisionEngine;
use super::error::ConfigError;
use super::event_log::EventLog;
use super::events::{self, EventQueue, TickEvent, TickSummary};
use super::floor::Floor;
use super::flyer::Flyer;
use super::locatable::Locatable;
use super::obstacle::Obstacle;
use super::params::Params;
use super::policy::{Observation, Policy};
use super::presentation::{FloorView, FlyerView, Frame, ObstacleView};

/// One member of the population: its flyer, the handle of the policy that
/// drives it, and its fitness in this episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Kinematic state.
    pub flyer: Flyer,
    /// Index of the driving policy in the caller's policy slice.
    pub policy: usize,
    /// Fitness accumulated this episode.
    pub fitness: f32,
    /// Cleared when the agent is scheduled for removal.
    pub alive: bool,
}

/// Orchestrates the flyers, obstacles and floor of one episode.
#[derive(Debug)]
pub struct PopulationSimulator {
    /// Simulation parameters.
    pub params: Params,
    /// Live agents in spawn order.
    pub agents: Vec<Agent>,
    /// Live obstacles, nearest first.
    pub obstacles: Vec<Obstacle>,
    /// Scrolling floor.
    pub floor: Floor,
    /// Obstacles passed so far.
    pub score: u32,
    /// Ticks processed so far.
    pub ticks: u64,
    /// Final or running fitness of every policy, indexed by handle.
    pub fitness_ledger: Vec<f32>,
    /// Recent notable events.
    pub log: EventLog,
    /// Obstacle index used for observations on the last tick.
    pub active_obstacle: usize,
    pub(crate) rng: StdRng,
    collision: CollisionEngine,
}

impl PopulationSimulator {
    /// Creates a simulator with `population` flyers at the start position and
    /// one obstacle at `first_obstacle_x`.
    ///
    /// # Arguments
    ///
    /// * `params` - Validated before anything is built
    /// * `population` - Number of agents; agent `i` is driven by policy `i`
    /// * `seed` - Seed for obstacle gap heights
    pub fn new(params: Params, population: usize, seed: u64) -> Result<Self, ConfigError> {
        params.validate()?;
        if population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let agents = (0..population)
            .map(|policy| Agent {
                flyer: Flyer::spawn(&params),
                policy,
                fitness: 0.0,
                alive: true,
            })
            .collect();
        let obstacles = vec![Obstacle::new(params.first_obstacle_x, &mut rng, &params)];
        let floor = Floor::new(params.floor_y, params.floor_width);
        let collision = CollisionEngine::new(params.collision_model);

        Ok(Self {
            agents,
            obstacles,
            floor,
            score: 0,
            ticks: 0,
            fitness_ledger: vec![0.0; population],
            log: EventLog::default(),
            active_obstacle: 0,
            rng,
            collision,
            params,
        })
    }

    /// Number of live flyers.
    pub fn alive(&self) -> usize {
        self.agents.len()
    }

    /// The collision engine in use.
    pub fn collision(&self) -> &CollisionEngine {
        &self.collision
    }

    /// Index of the obstacle the flyers should steer by.
    ///
    /// The first obstacle, unless there is a second one and the lead flyer
    /// is already past the first one's right edge. All flyers share one x,
    /// so the lead flyer speaks for everyone.
    pub fn active_obstacle_index(&self) -> usize {
        match (self.agents.first(), self.obstacles.first()) {
            (Some(lead), Some(first))
                if self.obstacles.len() > 1 && lead.flyer.x > first.right_edge(&self.params) =>
            {
                1
            }
            _ => 0,
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// `policies` is indexed by [`Agent::policy`].
    pub fn tick<P: Policy>(&mut self, policies: &mut [P]) -> TickSummary {
        self.ticks += 1;
        let params = &self.params;

        let active = self.active_obstacle_index();
        self.active_obstacle = active;
        let steering = self
            .obstacles
            .get(active)
            .or_else(|| self.obstacles.last());

        for agent in &mut self.agents {
            credit(
                agent,
                &mut self.fitness_ledger,
                policies,
                params.survival_reward,
            );
            agent.flyer.update(params);

            // nothing to steer by, so nothing to decide
            let Some(obstacle) = steering else {
                continue;
            };
            let Some(policy) = policies.get_mut(agent.policy) else {
                continue;
            };
            let observation = Observation::new(&agent.flyer, obstacle);
            if policy.decide(&observation) > params.jump_threshold {
                agent.flyer.jump(params);
            }
        }

        self.floor.advance(params);

        let mut queue = EventQueue::new();
        let mut doomed = vec![false; self.agents.len()];

        for (oi, obstacle) in self.obstacles.iter_mut().enumerate() {
            obstacle.advance(params);

            for (ai, agent) in self.agents.iter().enumerate() {
                if doomed[ai] {
                    continue;
                }
                if obstacle.collides_with(&agent.flyer, &mut self.collision, params) {
                    doomed[ai] = true;
                    queue.push(TickEvent::FlyerCollided {
                        agent: ai,
                        obstacle: oi,
                    });
                }
            }

            if obstacle.is_offscreen(params) {
                queue.push(TickEvent::ObstacleDespawned { obstacle: oi });
            }

            let overtaken = self
                .agents
                .iter()
                .zip(&doomed)
                .any(|(agent, &dead)| !dead && obstacle.x < agent.flyer.x);
            if !obstacle.passed && overtaken {
                obstacle.passed = true;
                queue.push(TickEvent::ObstaclePassed { obstacle: oi });
            }
        }

        for (ai, agent) in self.agents.iter().enumerate() {
            if !doomed[ai] && self.collision.flyer_out_of_bounds(&agent.flyer, params) {
                queue.push(TickEvent::FlyerOutOfBounds {
                    agent: ai,
                    y: agent.flyer.y,
                });
            }
        }

        trace!(tick = self.ticks, events = queue.len(), "tick scanned");
        events::apply_events(self, policies, queue)
    }

    /// Builds a read-only snapshot of the current state.
    pub fn frame(&self, generation: u32) -> Frame {
        Frame {
            tick: self.ticks,
            generation,
            score: self.score,
            flyers: self
                .agents
                .iter()
                .map(|agent| FlyerView {
                    policy: agent.policy,
                    x: agent.flyer.x,
                    y: agent.flyer.y,
                    tilt: agent.flyer.tilt,
                    frame: agent.flyer.frame,
                })
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    gap_height: o.gap_height,
                    top: o.top,
                    bot: o.bot,
                    passed: o.passed,
                })
                .collect(),
            floor: FloorView {
                y: self.floor.y,
                x1: self.floor.x1,
                x2: self.floor.x2,
            },
            active_obstacle: self.active_obstacle,
            events: self.log.on_tick(self.ticks).cloned().collect(),
        }
    }
}

/// Adds `amount` to an agent's fitness, its ledger entry and its policy.
pub(crate) fn credit<P: Policy>(
    agent: &mut Agent,
    ledger: &mut [f32],
    policies: &mut [P],
    amount: f32,
) {
    agent.fitness += amount;
    if let Some(entry) = ledger.get_mut(agent.policy) {
        *entry += amount;
    }
    if let Some(policy) = policies.get_mut(agent.policy) {
        policy.record_fitness_delta(amount);
    }
}
