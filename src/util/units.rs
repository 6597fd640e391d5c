//! Units formatting and conversion utilities
//! 
//! Provides functions for human-readable formatting of sizes, durations
//! and throughput.

use byte_unit::{Byte, UnitType};
use std::time::Duration;

const MIB: f64 = 1024.0 * 1024.0;

/// Format bytes into human-readable size with binary units
/// 
/// # Examples
/// ```
/// use awkbench::util::units::format_bytes;
/// 
/// assert!(format_bytes(10 * 1024 * 1024).contains("MiB"));
/// ```
pub fn format_bytes(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{:.1}", adjusted)
}

/// Format a duration with a unit matched to its magnitude
/// 
/// # Examples
/// ```
/// use std::time::Duration;
/// use awkbench::util::units::format_duration;
/// 
/// assert_eq!(format_duration(Duration::from_nanos(750)), "750ns");
/// assert_eq!(format_duration(Duration::from_micros(1500)), "1.5ms");
/// assert_eq!(format_duration(Duration::from_millis(2250)), "2.25s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_micros(1) {
        format!("{}ns", duration.as_nanos())
    } else if duration < Duration::from_millis(1) {
        format!("{:.1}µs", duration.as_nanos() as f64 / 1_000.0)
    } else if duration < Duration::from_secs(1) {
        format!("{:.1}ms", duration.as_nanos() as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Calculate throughput in MiB/s from bytes and duration
/// 
/// Zero bytes or a zero duration yield zero rather than an error.
/// 
/// # Examples
/// ```
/// use std::time::Duration;
/// use awkbench::util::units::calculate_throughput_mbps;
/// 
/// let throughput = calculate_throughput_mbps(1048576, Duration::from_secs(1));
/// assert!((throughput - 1.0).abs() < 0.01);
/// ```
pub fn calculate_throughput_mbps(bytes: u64, duration: Duration) -> f64 {
    if duration.is_zero() || bytes == 0 {
        return 0.0;
    }
    
    bytes as f64 / MIB / duration.as_secs_f64()
}

/// Format a MiB/s throughput figure
pub fn format_throughput(mbps: f64) -> String {
    format!("{:.1} MB/s", mbps)
}
