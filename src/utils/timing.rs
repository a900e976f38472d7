//! Timing metrics for performance analysis.
//!
//! Records how long each pipeline stage took so the end-of-run summary can
//! show where wall-clock time went.

use std::time::Duration;

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
pub fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Wall-clock duration of each pipeline stage in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageTimings {
    pub load_ms: u64,
    pub probe_ms: u64,
    pub qualify_ms: u64,
    pub geolocate_ms: u64,
    pub report_ms: u64,
}

impl StageTimings {
    pub fn total_ms(&self) -> u64 {
        self.load_ms
            .saturating_add(self.probe_ms)
            .saturating_add(self.qualify_ms)
            .saturating_add(self.geolocate_ms)
            .saturating_add(self.report_ms)
    }

    /// `(stage, ms)` pairs in pipeline order.
    pub fn stages(&self) -> [(&'static str, u64); 5] {
        [
            ("Load sources", self.load_ms),
            ("Reachability probe", self.probe_ms),
            ("Throughput qualification", self.qualify_ms),
            ("Geolocation", self.geolocate_ms),
            ("Reports", self.report_ms),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_ms() {
        assert_eq!(duration_to_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_to_ms(Duration::from_micros(999)), 0);
    }

    #[test]
    fn test_total_ms() {
        let timings = StageTimings {
            load_ms: 1,
            probe_ms: 2,
            qualify_ms: 3,
            geolocate_ms: 4,
            report_ms: 5,
        };
        assert_eq!(timings.total_ms(), 15);
        assert_eq!(timings.stages()[2], ("Throughput qualification", 3));
    }
}
