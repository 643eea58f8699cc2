pub mod experience;

use crate::grid::{Action, NUM_ACTIONS, Pos};
use crate::params::{EPSILON_DECAY, INITIAL_EPSILON, MIN_EPSILON, START};
use rand::Rng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Pos,
    pub epsilon: f32,
    pub auto_epsilon: bool,
    pub episode: u32,
    pub score: f32,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Agent {
    pub fn new(auto_epsilon: bool) -> Self {
        Self {
            position: START,
            epsilon: INITIAL_EPSILON,
            auto_epsilon,
            episode: 1,
            score: 0.0,
        }
    }

    pub fn set_epsilon(&mut self, epsilon: f32) {
        if !epsilon.is_nan() {
            self.epsilon = epsilon.clamp(0.0, 1.0);
        }
    }

    // start a new episode after reaching the goal or the pit
    pub fn finish_episode(&mut self) {
        self.position = START;
        self.episode += 1;
        self.score = 0.0;

        if self.auto_epsilon {
            self.epsilon = (self.epsilon * EPSILON_DECAY).max(MIN_EPSILON);
        }
    }

    pub fn select_action<R: Rng>(&self, q_values: &[f32; NUM_ACTIONS], rng: &mut R) -> Action {
        select_action(q_values, self.epsilon, rng)
    }
}

pub fn select_action<R: Rng>(q_values: &[f32; NUM_ACTIONS], epsilon: f32, rng: &mut R) -> Action {
    if rng.random::<f32>() < epsilon {
        return random_action(rng);
    }

    // ties broken at random, so all-zero cells do not always pick Up
    let max_q = q_values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let best: Vec<Action> = Action::ALL
        .into_iter()
        .filter(|a| q_values[a.index()] == max_q)
        .collect();

    best.choose(rng).copied().unwrap_or_else(|| random_action(rng))
}

fn random_action<R: Rng>(rng: &mut R) -> Action {
    Action::ALL[rng.random_range(0..NUM_ACTIONS)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_greedy_picks_max() {
        let mut rng = StdRng::seed_from_u64(7);
        let q = [0.1, -0.5, 2.0, 1.9];
        for _ in 0..100 {
            assert_eq!(select_action(&q, 0.0, &mut rng), Action::Down);
        }
    }

    #[test]
    fn test_tie_break_reaches_every_action() {
        let mut rng = StdRng::seed_from_u64(42);
        let q = [0.0; NUM_ACTIONS];
        let mut counts = [0usize; NUM_ACTIONS];

        for _ in 0..4000 {
            counts[select_action(&q, 0.0, &mut rng).index()] += 1;
        }

        // roughly 1000 each, far from a fixed bias towards index 0
        for count in counts {
            assert!(count > 800, "counts: {:?}", counts);
        }
    }

    #[test]
    fn test_tie_break_only_among_best() {
        let mut rng = StdRng::seed_from_u64(3);
        let q = [1.0, 0.0, 1.0, -1.0];
        let mut seen = [false; NUM_ACTIONS];

        for _ in 0..200 {
            seen[select_action(&q, 0.0, &mut rng).index()] = true;
        }
        assert_eq!(seen, [true, false, true, false]);
    }

    #[test]
    fn test_full_exploration_ignores_values() {
        let mut rng = StdRng::seed_from_u64(11);
        let q = [5.0, 0.0, 0.0, 0.0];
        let mut counts = [0usize; NUM_ACTIONS];

        for _ in 0..4000 {
            counts[select_action(&q, 1.0, &mut rng).index()] += 1;
        }
        assert!(counts.iter().all(|&c| c > 800), "counts: {:?}", counts);
    }

    #[test]
    fn test_finish_episode_decays_epsilon() {
        let mut agent = Agent::new(true);
        agent.position = (3, 3);
        agent.score = -1.5;

        agent.finish_episode();

        assert_eq!(agent.position, START);
        assert_eq!(agent.episode, 2);
        assert_eq!(agent.score, 0.0);
        assert!((agent.epsilon - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_finish_episode_keeps_fixed_epsilon() {
        let mut agent = Agent::new(false);
        agent.set_epsilon(0.3);
        agent.finish_episode();
        assert_eq!(agent.epsilon, 0.3);
    }

    #[test]
    fn test_epsilon_floor() {
        let mut agent = Agent::new(true);
        for _ in 0..1000 {
            agent.finish_episode();
            assert!(agent.epsilon >= MIN_EPSILON);
        }
        assert_eq!(agent.epsilon, MIN_EPSILON);
    }

    #[test]
    fn test_set_epsilon_clamps() {
        let mut agent = Agent::default();
        agent.set_epsilon(1.5);
        assert_eq!(agent.epsilon, 1.0);
        agent.set_epsilon(-0.2);
        assert_eq!(agent.epsilon, 0.0);
        agent.set_epsilon(f32::NAN);
        assert_eq!(agent.epsilon, 0.0);
    }
}
