//! Tick events and their atomic application.
//!
//! While a tick scans flyers and obstacles it only records what happened;
//! removals, rewards and spawns are applied together once the scan is over,
//! so no comparison is skipped because a list shrank underneath it.

use tracing::debug;

use super::event_log::EventKind;
use super::obstacle::Obstacle;
use super::policy::Policy;
use super::population::{PopulationSimulator, credit};

/// Something that happened during a tick's scan.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// A flyer touched an obstacle.
    FlyerCollided {
        /// Index of the agent in the live list.
        agent: usize,
        /// Index of the obstacle in the live list.
        obstacle: usize,
    },
    /// A flyer hit the floor or left the top of the world.
    FlyerOutOfBounds {
        /// Index of the agent in the live list.
        agent: usize,
        /// Flyer height at removal.
        y: f32,
    },
    /// An obstacle was passed for the first time.
    ObstaclePassed {
        /// Index of the obstacle in the live list.
        obstacle: usize,
    },
    /// An obstacle scrolled off the left edge.
    ObstacleDespawned {
        /// Index of the obstacle in the live list.
        obstacle: usize,
    },
}

/// Queue for collecting events during one tick.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<TickEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: TickEvent) {
        self.events.push(event);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Checks whether nothing was queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, TickEvent> {
        self.events.drain(..)
    }
}

/// What a tick changed, as counted while applying its events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Flyers removed by obstacle collisions.
    pub collisions: usize,
    /// Flyers removed for leaving the world.
    pub out_of_bounds: usize,
    /// Whether an obstacle was passed and a new one spawned.
    pub spawned: bool,
    /// Obstacles removed for scrolling off screen.
    pub despawned: usize,
}

/// Applies all queued events to the simulator state.
///
/// Order: collision penalties, then the pass reward and spawn (which reach
/// every flyer not removed by a collision), then obstacle despawns, then
/// out-of-bounds removals, and finally the dead flyers are dropped from the
/// live list with the survivors' order preserved.
pub fn apply_events<P: Policy>(
    sim: &mut PopulationSimulator,
    policies: &mut [P],
    mut queue: EventQueue,
) -> TickSummary {
    let mut summary = TickSummary::default();
    let mut despawned: Vec<usize> = Vec::new();
    let mut out_of_bounds: Vec<(usize, f32)> = Vec::new();
    let mut passed = false;
    let tick = sim.ticks;

    for event in queue.drain() {
        match event {
            TickEvent::FlyerCollided { agent, obstacle } => {
                let Some(record) = sim.agents.get_mut(agent) else {
                    continue;
                };
                if !record.alive {
                    continue;
                }
                record.alive = false;
                credit(
                    record,
                    &mut sim.fitness_ledger,
                    policies,
                    -sim.params.collision_penalty,
                );
                summary.collisions += 1;
                debug!(tick, policy = record.policy, obstacle, "flyer collided");
                sim.log.log(
                    tick,
                    format!("flyer {} hit obstacle {}", record.policy, obstacle),
                    EventKind::Collision,
                );
            }
            TickEvent::FlyerOutOfBounds { agent, y } => out_of_bounds.push((agent, y)),
            TickEvent::ObstaclePassed { obstacle } => {
                passed = true;
                debug!(tick, obstacle, "obstacle passed");
            }
            TickEvent::ObstacleDespawned { obstacle } => despawned.push(obstacle),
        }
    }

    if passed {
        sim.score += 1;
        let reward = sim.params.pass_reward;
        for record in sim.agents.iter_mut().filter(|a| a.alive) {
            credit(record, &mut sim.fitness_ledger, policies, reward);
        }
        let obstacle = Obstacle::new(sim.params.world_width, &mut sim.rng, &sim.params);
        sim.log.log(
            tick,
            format!(
                "score {} (next gap at {})",
                sim.score, obstacle.gap_height
            ),
            EventKind::Pass,
        );
        sim.obstacles.push(obstacle);
        summary.spawned = true;
    }

    // Remove in reverse order to maintain indices
    despawned.sort_unstable();
    despawned.dedup();
    for idx in despawned.into_iter().rev() {
        if idx < sim.obstacles.len() {
            sim.obstacles.remove(idx);
            summary.despawned += 1;
            debug!(tick, obstacle = idx, "obstacle despawned");
            sim.log
                .log(tick, format!("obstacle {idx} despawned"), EventKind::Despawn);
        }
    }

    for (agent, y) in out_of_bounds {
        let Some(record) = sim.agents.get_mut(agent) else {
            continue;
        };
        if !record.alive {
            continue;
        }
        record.alive = false;
        summary.out_of_bounds += 1;
        debug!(tick, policy = record.policy, y, "flyer out of bounds");
        sim.log.log(
            tick,
            format!("flyer {} left the world at y={y:.1}", record.policy),
            EventKind::OutOfBounds,
        );
    }

    sim.agents.retain(|a| a.alive);
    summary
}
