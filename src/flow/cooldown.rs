//! Resend cooldown. Always restarts at the full window on remount and on
//! every resend; there is no resume of a previously running timer.

pub const RESEND_COOLDOWN_SECS: u32 = 27;

#[derive(Debug, Clone)]
pub struct ResendCooldown {
    remaining: u32,
}

impl ResendCooldown {
    pub fn start() -> Self {
        Self {
            remaining: RESEND_COOLDOWN_SECS,
        }
    }

    /// One-second tick. Returns the seconds left after the tick.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = RESEND_COOLDOWN_SECS;
    }
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_from_27_and_becomes_ready() {
        let mut cooldown = ResendCooldown::start();
        assert_eq!(cooldown.remaining(), 27);
        assert!(!cooldown.is_ready());
        for _ in 0..27 {
            cooldown.tick();
        }
        assert!(cooldown.is_ready());
        // Ticking past zero stays at zero.
        assert_eq!(cooldown.tick(), 0);
    }

    #[test]
    fn reset_restores_the_full_window() {
        let mut cooldown = ResendCooldown::start();
        for _ in 0..27 {
            cooldown.tick();
        }
        cooldown.reset();
        assert_eq!(cooldown.remaining(), 27);
        assert!(!cooldown.is_ready());
    }
}
