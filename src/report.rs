use crate::error::{GridError, Result};
use crate::simulation::{SimulationState, Terminal};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Goal,
    Pit,
}

impl From<Terminal> for Outcome {
    fn from(terminal: Terminal) -> Self {
        match terminal {
            Terminal::Goal => Outcome::Goal,
            Terminal::Pit => Outcome::Pit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRecord {
    pub seed: u64,
    pub episode: u32,
    pub steps: u32,
    pub total_reward: f32,
    pub outcome: Outcome,
    pub epsilon: f32, // exploration rate during the episode
}

pub struct Run {
    pub seed: u64,
    pub state: SimulationState,
    pub records: Vec<EpisodeRecord>,
}

// stops after `episodes` episodes or `step_limit` steps in total, whichever comes first
pub fn run_episodes(seed: u64, episodes: u32, step_limit: u64) -> Run {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = SimulationState::default();
    let mut records = Vec::new();

    let mut steps_taken: u64 = 0;
    let mut steps: u32 = 0;
    let mut total_reward: f32 = 0.0;

    while records.len() < episodes as usize {
        if steps_taken >= step_limit {
            warn!(seed, step_limit, finished = records.len(), "step limit reached before all episodes finished");
            break;
        }

        let episode = state.agent.episode;
        let epsilon = state.agent.epsilon;
        let outcome = state.step(&mut rng);
        steps_taken += 1;
        steps += 1;
        total_reward += outcome.experience.reward;

        if let Some(terminal) = outcome.terminal {
            records.push(EpisodeRecord {
                seed,
                episode,
                steps,
                total_reward,
                outcome: terminal.into(),
                epsilon,
            });
            steps = 0;
            total_reward = 0.0;
        }
    }

    Run { seed, state, records }
}

pub fn run_seeds(seeds: &[u64], episodes: u32, step_limit: u64) -> Vec<Run> {
    seeds
        .par_iter()
        .map(|&seed| run_episodes(seed, episodes, step_limit))
        .collect()
}

pub fn write_csv<W: Write>(records: &[EpisodeRecord], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub episodes: usize,
    pub goals: usize,
    pub pits: usize,
    pub mean_steps: f32,
    pub mean_recent_reward: f32,
}

impl Summary {
    // mean_recent_reward averages the last `window` episodes
    pub fn from_records(records: &[EpisodeRecord], window: usize) -> Result<Self> {
        if window == 0 {
            return Err(GridError::InvalidArgument {
                name: "window".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        let episodes = records.len();
        let goals = records.iter().filter(|r| r.outcome == Outcome::Goal).count();
        let mean_steps = if episodes == 0 {
            0.0
        } else {
            records.iter().map(|r| r.steps as f32).sum::<f32>() / episodes as f32
        };

        let recent = &records[episodes.saturating_sub(window)..];
        let mean_recent_reward = if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|r| r.total_reward).sum::<f32>() / recent.len() as f32
        };

        Ok(Self {
            episodes,
            goals,
            pits: episodes - goals,
            mean_steps,
            mean_recent_reward,
        })
    }
}
