/// One tick of the attempt countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Timer inactive, cancelled, or already expired.
    Idle,
    /// Seconds remaining after this tick.
    Running(u32),
    /// The countdown just hit zero. Yielded exactly once per countdown.
    Expired,
}

/// Countdown for a timed attempt. Pure state machine: the caller drives it at
/// one tick per second; `Expired` is reported exactly once and the remaining
/// time clamps at zero. There is no persistence across restarts: a new
/// session re-seeds from the assignment's time limit.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: Option<u32>,
    expired: bool,
}

impl Countdown {
    /// Timer for an untimed assignment; every tick is `Idle`.
    pub fn inactive() -> Self {
        Self {
            remaining: None,
            expired: false,
        }
    }

    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: Some(seconds),
            expired: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some() && !self.expired
    }

    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn tick(&mut self) -> Tick {
        let Some(seconds) = self.remaining else {
            return Tick::Idle;
        };
        if seconds > 1 {
            self.remaining = Some(seconds - 1);
            return Tick::Running(seconds - 1);
        }
        self.remaining = Some(0);
        if self.expired {
            Tick::Idle
        } else {
            self.expired = true;
            Tick::Expired
        }
    }
}
