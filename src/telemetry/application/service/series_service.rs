use crate::{
    core::{
        domain::{
            error::ProxmoxResult,
            model::{
                rrd_sample::{GuestRrdSample, NodeRrdSample},
                time_series::{TimeSeries, TimeSeriesPoint},
            },
            value_object::{GuestKind, NodeName, Timeframe},
        },
        infrastructure::api_client::ProxmoxApi,
    },
    telemetry::{application::service::decode_list, domain::normalizer},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Time-Series Fetcher over upstream RRD data.
///
/// Upstream errors are returned as-is so that "no history" (an empty series)
/// stays distinguishable from "fetch failed".
#[derive(Clone)]
pub struct SeriesService {
    api: Arc<dyn ProxmoxApi>,
    timeout: Duration,
}

impl SeriesService {
    pub fn new(api: Arc<dyn ProxmoxApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    /// History of one node.
    ///
    /// # Errors
    /// Returns the upstream failure unchanged.
    pub async fn node_series(
        &self,
        node: &NodeName,
        timeframe: Timeframe,
    ) -> ProxmoxResult<TimeSeries> {
        let path = format!("nodes/{}/rrddata?timeframe={}", node, timeframe);
        let samples: Vec<NodeRrdSample> = self.fetch(&path).await?;
        Ok(build_series(
            timeframe,
            samples.iter().filter_map(normalizer::normalize_node_sample),
        ))
    }

    /// History of one guest.
    ///
    /// # Errors
    /// Returns the upstream failure unchanged.
    pub async fn guest_series(
        &self,
        node: &NodeName,
        kind: GuestKind,
        vmid: u32,
        timeframe: Timeframe,
    ) -> ProxmoxResult<TimeSeries> {
        let path = format!(
            "nodes/{}/{}/{}/rrddata?timeframe={}",
            node,
            kind.api_segment(),
            vmid,
            timeframe
        );
        let samples: Vec<GuestRrdSample> = self.fetch(&path).await?;
        Ok(build_series(
            timeframe,
            samples.iter().filter_map(normalizer::normalize_guest_sample),
        ))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ProxmoxResult<Vec<T>> {
        let data = self.api.get(path, self.timeout).await?;
        let samples: Vec<T> = decode_list(path, data)?;
        debug!(path, samples = samples.len(), "Fetched RRD samples");
        Ok(samples)
    }
}

fn build_series(
    timeframe: Timeframe,
    points: impl Iterator<Item = TimeSeriesPoint>,
) -> TimeSeries {
    let mut points: Vec<TimeSeriesPoint> = points.collect();
    points.sort_by_key(|point| point.time);
    TimeSeries { timeframe, points }
}
