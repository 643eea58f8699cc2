use crate::scheduler::Scheduler;
use crate::simulation::{SimulationState, StepOutcome};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info};

// ticks read the state as it is now, so control changes apply on the next step
pub struct Trainer {
    state: SimulationState,
    scheduler: Scheduler,
    rng: StdRng,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Trainer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            state: SimulationState::default(),
            scheduler: Scheduler::default(),
            rng,
        }
    }

    pub fn state(&self) -> &SimulationState {&self.state}
    pub fn snapshot(&self) -> SimulationState {self.state.clone()}
    pub fn is_training(&self) -> bool {self.state.training}
    pub fn speed(&self) -> f32 {self.scheduler.speed()}
    pub fn interval(&self) -> Duration {self.scheduler.interval()}

    pub fn start_training(&mut self) {
        if self.state.training {
            return;
        }
        self.state.training = true;
        self.scheduler.arm();
        info!(episode = self.state.agent.episode, interval = ?self.scheduler.interval(), "training started");
    }

    pub fn pause_training(&mut self) {
        if !self.state.training {
            return;
        }
        self.state.training = false;
        self.scheduler.disarm();
        info!(episode = self.state.agent.episode, "training paused");
    }

    pub fn toggle_training(&mut self) {
        if self.state.training {
            self.pause_training();
        } else {
            self.start_training();
        }
    }

    pub fn reset(&mut self) {
        self.scheduler.disarm();
        self.state.reset();
        info!(auto_epsilon = self.state.agent.auto_epsilon, "simulation reset");
    }

    pub fn set_exploration_rate(&mut self, epsilon: f32) {
        self.state.agent.set_epsilon(epsilon);
    }

    pub fn set_automatic_decay(&mut self, enabled: bool) {
        self.state.agent.auto_epsilon = enabled;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.scheduler.set_speed(speed);
        debug!(speed = self.scheduler.speed(), interval = ?self.scheduler.interval(), "speed changed");
    }

    pub fn tick(&mut self) -> Option<StepOutcome> {
        if !self.state.training {
            return None;
        }
        Some(self.state.step(&mut self.rng))
    }

    pub fn update(&mut self, elapsed: Duration) -> Vec<StepOutcome> {
        let due = self.scheduler.advance(elapsed);
        (0..due).map_while(|_| self.tick()).collect()
    }
}
