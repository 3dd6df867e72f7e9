/// Counts in-bounds candidate hits before a result may be delivered.
///
/// Hits accumulate across frames. Unless `reset_on_miss` is set, frames
/// without an in-bounds candidate leave the count untouched.
#[derive(Debug, Clone)]
pub struct DebounceCounter {
    threshold: u32,
    count: u32,
    reset_on_miss: bool,
}

impl DebounceCounter {
    pub fn new(threshold: u32, reset_on_miss: bool) -> Self {
        Self {
            threshold: threshold.max(1),
            count: 0,
            reset_on_miss,
        }
    }

    /// Record one in-bounds candidate; true once the threshold is reached
    pub fn record_hit(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.count >= self.threshold
    }

    /// Record a frame with no in-bounds candidate
    pub fn record_miss(&mut self) {
        if self.reset_on_miss {
            self.count = 0;
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crosses_at_threshold() {
        let mut counter = DebounceCounter::new(3, false);
        assert!(!counter.record_hit());
        assert!(!counter.record_hit());
        assert!(counter.record_hit());
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn test_miss_keeps_count_by_default() {
        let mut counter = DebounceCounter::new(3, false);
        counter.record_hit();
        counter.record_miss();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn test_miss_resets_when_configured() {
        let mut counter = DebounceCounter::new(3, true);
        counter.record_hit();
        counter.record_hit();
        counter.record_miss();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_zero_threshold_clamped() {
        let mut counter = DebounceCounter::new(0, false);
        assert_eq!(counter.threshold(), 1);
        assert!(counter.record_hit());
    }
}
