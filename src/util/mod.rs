//! Utility functions module
//! 
//! Contains helper functions for units formatting and throughput
//! calculation.

pub mod units;

// Re-export commonly used functions
pub use units::{
    format_bytes,
    format_duration,
    calculate_throughput_mbps,
    format_throughput,
};
