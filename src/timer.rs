/// The delay and sound timers. Neither knows about wall-clock time: they only
/// move when something calls `tick`, nominally at 60Hz.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// count both timers down by one, stopping at zero
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// true while the speaker should be sounding
    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_floors_at_zero() {
        let mut t = Timers { delay: 2, sound: 0 };
        t.tick();
        assert_eq!(t, Timers { delay: 1, sound: 0 });
        t.tick();
        t.tick();
        assert_eq!(t, Timers { delay: 0, sound: 0 });
    }

    #[test]
    fn test_timers_independent() {
        let mut t = Timers { delay: 5, sound: 1 };
        assert!(t.is_sounding());
        t.tick();
        assert_eq!(t.delay, 4);
        assert_eq!(t.sound, 0);
        assert!(!t.is_sounding());
    }
}
