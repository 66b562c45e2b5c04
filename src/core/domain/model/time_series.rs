use crate::core::domain::value_object::Timeframe;
use serde::{Deserialize, Serialize};

/// One normalized historical sample.
///
/// Network and disk figures are upstream's per-interval averages (bytes/s)
/// and therefore fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Epoch seconds.
    pub time: u64,
    pub cpu_usage: f64,
    pub mem_used: u64,
    /// `memtotal` for node samples, `maxmem` for guest samples.
    pub mem_total: u64,
    pub mem_percent: f64,
    pub netin: f64,
    pub netout: f64,
    pub diskread: f64,
    pub diskwrite: f64,
}

/// A chronologically ordered series for one node or guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub timeframe: Timeframe,
    pub points: Vec<TimeSeriesPoint>,
}
