//! End-of-run statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats};
use crate::utils::StageTimings;

/// Logs every non-zero failure counter.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    if total_errors == 0 {
        return;
    }

    info!("Absorbed failures ({} total):", total_errors);
    for error_type in ErrorType::iter() {
        let count = error_stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}

/// Logs how wall-clock time was split between stages.
pub fn print_timing_statistics(timings: &StageTimings) {
    let total = timings.total_ms();
    info!("Stage timings ({} ms total):", total);
    for (stage, ms) in timings.stages() {
        let share = if total > 0 {
            ms as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        info!("   {:<26} {:>8} ms ({:>5.1}%)", stage, ms, share);
    }
}
