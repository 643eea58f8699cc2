use crate::grid::Pos;

pub const GRID_SIZE: i32 = 6;
pub const MIN_GRID_SIZE: i32 = 5; // smallest size that still holds the fixed layout

pub const START: Pos = (0, 0);
pub const GOAL: Pos = (4, 4);
pub const PIT: Pos = (1, 3);
pub const WALLS: [Pos; 3] = [(2, 2), (2, 3), (3, 1)];

pub const LIVING_PENALTY: f32 = -0.1;
pub const GOAL_REWARD: f32 = 10.0;
pub const PIT_REWARD: f32 = -10.0;

pub const LEARNING_RATE: f32 = 0.2; // alpha
pub const DISCOUNT_FACTOR: f32 = 0.9; // gamma

pub const INITIAL_EPSILON: f32 = 1.0;
pub const EPSILON_DECAY: f32 = 0.98; // per finished episode
pub const MIN_EPSILON: f32 = 0.01;

pub const EXPERIENCE_CAPACITY: usize = 8;

pub const MIN_DELAY_MS: f64 = 20.0;
pub const MAX_DELAY_MS: f64 = 1000.0;
pub const MAX_SPEED: f32 = 100.0;
pub const DEFAULT_SPEED: f32 = 90.0;
pub const MAX_CATCH_UP_TICKS: u32 = 4;
