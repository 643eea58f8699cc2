use crate::agent::Agent;
use crate::agent::experience::{Experience, ExperienceLog};
use crate::grid::{Action, CellKind, Grid};
use crate::params::{
    DISCOUNT_FACTOR, EXPERIENCE_CAPACITY, GOAL_REWARD, LEARNING_RATE, LIVING_PENALTY, PIT_REWARD,
};
use rand::Rng;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Goal,
    Pit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub experience: Experience,
    pub terminal: Option<Terminal>,
    pub blocked: bool, // bumped into a wall or the border
}

impl StepOutcome {
    pub fn done(&self) -> bool {
        self.terminal.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub grid: Grid,
    pub agent: Agent,
    pub training: bool,
    pub experiences: ExperienceLog,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(Grid::new())
    }
}

impl SimulationState {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            agent: Agent::new(true),
            training: false,
            experiences: ExperienceLog::new(EXPERIENCE_CAPACITY),
        }
    }

    // only the automatic-decay preference survives
    pub fn reset(&mut self) {
        let grid = Grid::with_size(self.grid.size()).unwrap_or_default();

        *self = Self {
            grid,
            agent: Agent::new(self.agent.auto_epsilon),
            training: false,
            experiences: self.experiences.cleared(),
        };
    }

    pub fn step<R: Rng>(&mut self, rng: &mut R) -> StepOutcome {
        let q_values = self.grid.q_values(self.agent.position);
        let action = self.agent.select_action(&q_values, rng);
        self.apply(action)
    }

    pub fn apply(&mut self, action: Action) -> StepOutcome {
        let origin = self.agent.position;
        debug_assert!(self.grid.in_bounds(origin), "agent at {:?} is off the grid", origin);
        debug_assert_ne!(self.grid.kind_at(origin), Some(CellKind::Wall));
        let (next, blocked) = self.grid.resolve_move(origin, action);

        let (reward, terminal) = match self.grid.kind_at(next) {
            Some(CellKind::Goal) => (GOAL_REWARD, Some(Terminal::Goal)),
            Some(CellKind::Pit) => (PIT_REWARD, Some(Terminal::Pit)),
            _ => (LIVING_PENALTY, None),
        };

        // bootstrap from the table as it was before this update
        let max_next_q = self.grid[next].max_q();
        let cell = &mut self.grid[origin];
        let old_q = cell.q_values[action.index()];
        let new_q = old_q + LEARNING_RATE * (reward + DISCOUNT_FACTOR * max_next_q - old_q);
        cell.q_values[action.index()] = new_q;
        trace!(?origin, ?action, old_q, new_q, "q update");

        let experience = self.experiences.record(origin, action, reward, next);

        if let Some(terminal) = terminal {
            debug!(
                episode = self.agent.episode,
                ?terminal,
                score = self.agent.score + reward,
                epsilon = self.agent.epsilon,
                "episode finished"
            );
            self.agent.finish_episode();
        } else {
            self.agent.position = next;
            self.agent.score += reward;
        }

        debug_assert!(self.grid.in_bounds(self.agent.position));
        debug_assert_ne!(self.grid.kind_at(self.agent.position), Some(CellKind::Wall));

        StepOutcome {
            experience,
            terminal,
            blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{EPSILON_DECAY, START};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_float_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-6, "expected {b}, got {a}");
    }

    #[test]
    fn test_initial_state() {
        let state = SimulationState::default();
        assert_eq!(state.agent.position, START);
        assert_eq!(state.agent.episode, 1);
        assert_eq!(state.agent.score, 0.0);
        assert_eq!(state.agent.epsilon, 1.0);
        assert!(state.agent.auto_epsilon);
        assert!(!state.training);
        assert!(state.experiences.is_empty());
    }

    #[test]
    fn test_q_update_living_penalty() {
        let mut state = SimulationState::default();
        let outcome = state.apply(Action::Right);

        // 0 + 0.2 * (-0.1 + 0.9 * 0 - 0)
        assert_float_eq(state.grid.q_values((0, 0))[Action::Right.index()], -0.02);
        assert_eq!(state.agent.position, (1, 0));
        assert_float_eq(state.agent.score, -0.1);
        assert!(!outcome.done());
        assert!(!outcome.blocked);
    }

    #[test]
    fn test_q_update_bootstraps_from_next_cell() {
        let mut state = SimulationState::default();
        state.grid.cell_mut((1, 0)).unwrap().q_values = [1.0, 3.0, -2.0, 0.5];
        state.apply(Action::Right);

        // 0.2 * (-0.1 + 0.9 * 3.0)
        assert_float_eq(state.grid.q_values((0, 0))[Action::Right.index()], 0.52);
    }

    #[test]
    fn test_only_one_entry_changes() {
        let mut state = SimulationState::default();
        let before = state.grid.clone();
        state.apply(Action::Down);

        let changed: Vec<_> = before
            .cells()
            .iter()
            .zip(state.grid.cells())
            .flat_map(|(a, b)| (0..4).filter(move |&i| a.q_values[i] != b.q_values[i]).map(move |i| (b.pos, i)))
            .collect();
        assert_eq!(changed, vec![((0, 0), Action::Down.index())]);
    }

    #[test]
    fn test_wall_bump() {
        let mut state = SimulationState::default();
        state.agent.position = (2, 1); // wall at (2, 2) below

        let outcome = state.apply(Action::Down);

        assert_float_eq(outcome.experience.reward, -0.1);
        assert_eq!(outcome.experience.next_state, (2, 1));
        assert_eq!(state.agent.position, (2, 1));
        assert!(outcome.blocked);
        assert!(!outcome.done());
        assert_eq!(state.agent.episode, 1);
        // the attempted action is the one that learns
        assert_float_eq(state.grid.q_values((2, 1))[Action::Down.index()], -0.02);
    }

    #[test]
    fn test_border_bump_bootstraps_from_own_cell() {
        let mut state = SimulationState::default();
        state.grid.cell_mut((0, 0)).unwrap().q_values = [0.0, 1.0, 0.0, 0.0];

        state.apply(Action::Up);

        // max over (0, 0) before the update is 1.0
        assert_float_eq(state.grid.q_values((0, 0))[Action::Up.index()], 0.2 * (-0.1 + 0.9));
        assert_eq!(state.agent.position, (0, 0));
    }

    #[test]
    #[should_panic]
    fn test_apply_from_outside_grid_panics() {
        let mut state = SimulationState::default();
        state.agent.position = (-1, 0);
        state.apply(Action::Right);
    }

    #[test]
    #[should_panic]
    fn test_q_values_outside_grid_panics() {
        let grid = Grid::new();
        grid.q_values((6, 0));
    }

    #[test]
    fn test_step_into_pit() {
        let mut state = SimulationState::default();
        state.agent.position = (1, 2); // pit at (1, 3) below
        state.agent.score = -0.7;

        let outcome = state.apply(Action::Down);

        assert_eq!(outcome.experience.reward, -10.0);
        assert_eq!(outcome.terminal, Some(Terminal::Pit));
        assert_eq!(outcome.experience.next_state, (1, 3));
        assert_eq!(state.agent.position, START);
        assert_eq!(state.agent.episode, 2);
        assert_eq!(state.agent.score, 0.0);
        assert_float_eq(state.agent.epsilon, EPSILON_DECAY);
        assert_float_eq(state.grid.q_values((1, 2))[Action::Down.index()], -2.0);
    }

    #[test]
    fn test_step_into_goal() {
        let mut state = SimulationState::default();
        state.agent.auto_epsilon = false;
        state.agent.set_epsilon(0.4);
        state.agent.position = (4, 3);

        let outcome = state.apply(Action::Down);

        assert_eq!(outcome.experience.reward, 10.0);
        assert_eq!(outcome.terminal, Some(Terminal::Goal));
        assert_eq!(state.agent.position, START);
        assert_eq!(state.agent.episode, 2);
        assert_eq!(state.agent.epsilon, 0.4);
        assert_float_eq(state.grid.q_values((4, 3))[Action::Down.index()], 2.0);
    }

    #[test]
    fn test_down_column_walk() {
        let mut state = SimulationState::default();
        let mut rng = StdRng::seed_from_u64(0);
        state.agent.set_epsilon(0.0);

        // column x = 0 holds no walls; make Down the strict greedy choice
        for y in 0..6 {
            state.grid.cell_mut((0, y)).unwrap().q_values = [-1.0, -1.0, 1.0, -1.0];
        }

        let mut last_y = 0;
        for _ in 0..5 {
            let outcome = state.step(&mut rng);
            assert_eq!(outcome.experience.action, Action::Down);
            assert!(state.agent.position.1 > last_y);
            last_y = state.agent.position.1;
        }
        assert_eq!(state.agent.position, (0, 5));

        let outcome = state.step(&mut rng);
        assert!(outcome.blocked);
        assert_eq!(state.agent.position, (0, 5));
    }

    #[test]
    fn test_experience_log_order() {
        let mut state = SimulationState::default();
        state.apply(Action::Right);
        state.apply(Action::Down);

        let latest = state.experiences.latest().unwrap();
        assert_eq!(latest.state, (1, 0));
        assert_eq!(latest.action, Action::Down);
        assert_eq!(latest.next_state, (1, 1));
        assert_eq!(state.experiences.len(), 2);
    }

    #[test]
    fn test_reset_keeps_only_decay_preference() {
        let mut state = SimulationState::default();
        let mut rng = StdRng::seed_from_u64(5);
        state.agent.auto_epsilon = false;
        state.training = true;
        for _ in 0..50 {
            state.step(&mut rng);
        }
        state.agent.set_epsilon(0.2);

        state.reset();

        let mut expected = SimulationState::default();
        expected.agent.auto_epsilon = false;
        assert_eq!(state.grid, expected.grid);
        assert_eq!(state.agent, expected.agent);
        assert!(!state.training);
        assert!(state.experiences.is_empty());
    }
}
