//! Interval timers driven by the frame clock.
//!
//! The registry belongs to the world it schedules for.  Advancing it is the
//! only way a timer fires, so a restart that tears the registry down leaves
//! nothing behind that could touch the fresh world.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerPurpose {
    EnemySpawn,
    DroneSpawn,
    PowerUpSpawn,
}

#[derive(Clone, Debug)]
struct FrameTimer {
    id: TimerId,
    purpose: TimerPurpose,
    period: u32,
    remaining: u32,
}

#[derive(Clone, Debug, Default)]
pub struct TimerRegistry {
    timers: Vec<FrameTimer>,
    next_id: u32,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `purpose` to fire every `period` frames, first after `period` frames.
    pub fn register(&mut self, purpose: TimerPurpose, period: u32) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let period = period.max(1);
        self.timers.push(FrameTimer {
            id,
            purpose,
            period,
            remaining: period,
        });
        id
    }

    /// Returns `false` if the timer was already gone.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Advance every timer by one frame and report which purposes fired.
    pub fn advance(&mut self) -> Vec<TimerPurpose> {
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            timer.remaining -= 1;
            if timer.remaining == 0 {
                timer.remaining = timer.period;
                fired.push(timer.purpose);
            }
        }
        fired
    }

    /// Drop every timer; returns how many were cancelled.
    pub fn teardown(&mut self) -> usize {
        let cancelled = self.timers.len();
        self.timers.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }
}
