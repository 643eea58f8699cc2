use crate::params::{DEFAULT_SPEED, MAX_CATCH_UP_TICKS, MAX_DELAY_MS, MAX_SPEED, MIN_DELAY_MS};
use std::time::Duration;

// speed 0 -> 1000ms, speed 100 -> 20ms
pub fn delay_for_speed(speed: f32) -> Duration {
    let speed = if speed.is_nan() { 0.0 } else { speed.clamp(0.0, MAX_SPEED) };
    let speed = f64::from(speed);
    let millis = MAX_DELAY_MS - (MAX_DELAY_MS - MIN_DELAY_MS) * speed / f64::from(MAX_SPEED);
    let millis = millis.clamp(MIN_DELAY_MS, MAX_DELAY_MS);

    Duration::from_micros((millis * 1000.0).round() as u64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scheduler {
    speed: f32,
    interval: Duration,
    armed: bool,
    accumulator: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SPEED)
    }
}

impl Scheduler {
    pub fn new(speed: f32) -> Self {
        let mut scheduler = Self {
            speed: DEFAULT_SPEED,
            interval: delay_for_speed(DEFAULT_SPEED),
            armed: false,
            accumulator: Duration::ZERO,
        };
        scheduler.set_speed(speed);
        scheduler
    }

    pub fn speed(&self) -> f32 {self.speed}
    pub fn interval(&self) -> Duration {self.interval}
    pub fn is_armed(&self) -> bool {self.armed}

    pub fn arm(&mut self) {
        self.armed = true;
        self.accumulator = Duration::ZERO;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.accumulator = Duration::ZERO;
    }

    // re-arms an armed timer, the partial interval is dropped
    pub fn set_speed(&mut self, speed: f32) {
        if speed.is_nan() {
            return;
        }
        self.speed = speed.clamp(0.0, MAX_SPEED);
        self.interval = delay_for_speed(self.speed);

        if self.armed {
            self.arm();
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.armed {
            return 0;
        }

        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            ticks += 1;

            // after a stall drop the backlog instead of replaying it
            if ticks == MAX_CATCH_UP_TICKS {
                self.accumulator = Duration::ZERO;
                break;
            }
        }

        ticks
    }
}
