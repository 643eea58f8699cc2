use crate::grid::{Action, Pos};

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub id: u64,
    pub state: Pos,
    pub action: Action,
    pub reward: f32,
    pub next_state: Pos,
}

// most recent first, display only
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceLog {
    buffer: VecDeque<Experience>,
    capacity: usize,
    next_id: u64,
}

impl ExperienceLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_id: 0,
        }
    }

    // ids keep counting where this log stopped
    pub fn cleared(&self) -> Self {
        Self {
            next_id: self.next_id,
            ..Self::new(self.capacity)
        }
    }

    pub fn record(&mut self, state: Pos, action: Action, reward: f32, next_state: Pos) -> Experience {
        let experience = Experience {
            id: self.next_id,
            state,
            action,
            reward,
            next_state,
        };
        self.next_id += 1;

        self.buffer.push_front(experience.clone());
        self.buffer.truncate(self.capacity);

        experience
    }

    pub fn latest(&self) -> Option<&Experience> {
        self.buffer.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_log() {
        let mut log = ExperienceLog::new(8);
        assert!(log.is_empty());

        for i in 0..10 {
            log.record((i, 0), Action::Right, -0.1, (i + 1, 0));
        }
        assert_eq!(log.len(), 8);

        // newest at the front, the two oldest evicted from the tail
        let states: Vec<i32> = log.iter().map(|e| e.state.0).collect();
        assert_eq!(states, vec![9, 8, 7, 6, 5, 4, 3, 2]);
        assert_eq!(log.latest().unwrap().id, 9);
    }

    #[test]
    fn test_cleared_keeps_id_counter() {
        let mut log = ExperienceLog::new(4);
        log.record((0, 0), Action::Up, -0.1, (0, 0));
        log.record((0, 0), Action::Down, -0.1, (0, 1));

        let mut fresh = log.cleared();
        assert!(fresh.is_empty());
        assert_eq!(fresh.capacity(), 4);

        let id = fresh.record((0, 1), Action::Up, -0.1, (0, 0)).id;
        assert_eq!(id, 2);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut log = ExperienceLog::new(0);
        log.record((0, 0), Action::Up, -0.1, (0, 0));
        assert!(log.is_empty());
    }
}
