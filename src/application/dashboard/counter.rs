use std::time::Duration;

use crate::shared::format_thousands;

/// Linear count-up from the previous value to the new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAnimation {
    pub start: i64,
    pub target: i64,
    pub duration: Duration,
}

impl CounterAnimation {
    pub fn new(start: i64, target: i64, duration: Duration) -> Self {
        Self {
            start,
            target,
            duration,
        }
    }

    fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Value shown `elapsed` after the animation started, floored
    pub fn value_at(&self, elapsed: Duration) -> i64 {
        let delta = (self.target - self.start) as f64;
        (self.start as f64 + delta * self.progress(elapsed)).floor() as i64
    }

    pub fn label_at(&self, elapsed: Duration) -> String {
        format_thousands(self.value_at(elapsed))
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }

    /// Labels sampled every `step` until the target is reached (inclusive)
    pub fn frames(&self, step: Duration) -> Vec<String> {
        let mut frames = Vec::new();
        let mut elapsed = Duration::ZERO;
        loop {
            frames.push(self.label_at(elapsed));
            if self.is_finished(elapsed) || step.is_zero() {
                break;
            }
            elapsed += step;
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_and_floored() {
        let anim = CounterAnimation::new(0, 1500, Duration::from_millis(2000));
        assert_eq!(anim.value_at(Duration::ZERO), 0);
        assert_eq!(anim.value_at(Duration::from_millis(1000)), 750);
        assert_eq!(anim.value_at(Duration::from_millis(1333)), 999);
        assert_eq!(anim.value_at(Duration::from_millis(5000)), 1500);
        assert_eq!(anim.label_at(Duration::from_millis(2000)), "1.500");
        assert!(anim.is_finished(Duration::from_millis(2000)));
    }

    #[test]
    fn counts_down_too() {
        let anim = CounterAnimation::new(10, 4, Duration::from_millis(100));
        assert_eq!(anim.value_at(Duration::from_millis(50)), 7);
        assert_eq!(anim.frames(Duration::from_millis(50)), vec!["10", "7", "4"]);
    }
}
