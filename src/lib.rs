pub mod params;
pub mod error;

pub use error::{GridError, Result};

pub mod grid;

pub use grid::{Action, Cell, CellKind, Grid, Pos};

pub mod agent;

pub use agent::Agent;
pub use agent::experience::{Experience, ExperienceLog};

pub mod simulation;

pub use simulation::{SimulationState, StepOutcome, Terminal};

pub mod scheduler;
pub mod trainer;

pub use scheduler::Scheduler;
pub use trainer::Trainer;

pub mod report;
pub mod render;
