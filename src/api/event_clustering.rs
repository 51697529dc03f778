use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Badge standing in for a dense run of events at low zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCluster {
    pub bucket: i64,
    /// Bucket center in screen fractions, clamped to `[0, 1]`.
    pub screen_fraction: f64,
    pub count: usize,
    pub event_ids: Vec<String>,
    pub start_yf: f64,
    pub end_yf: f64,
}

/// Members of one position bucket, as indexes into the bucketed slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterBucket {
    pub bucket: i64,
    pub center_fraction: f64,
    pub members: Vec<usize>,
}

/// Result of bucketing: collapsed buckets and the indexes left to render
/// individually, both in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketPartition {
    pub clusters: Vec<ClusterBucket>,
    pub individuals: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketConfig {
    pub bucket_width: f64,
    pub edge_pad: f64,
    pub min_size: usize,
}

/// Buckets screen positions into fixed-width bins.
///
/// Positions are clamped into `[edge_pad, 1 - edge_pad]` first so events
/// just off screen pile into the edge buckets instead of vanishing.
#[must_use]
pub fn bucket_by_position(fractions: &[f64], config: BucketConfig) -> BucketPartition {
    if !config.bucket_width.is_finite() || config.bucket_width <= 0.0 {
        return BucketPartition {
            clusters: Vec::new(),
            individuals: (0..fractions.len()).collect(),
        };
    }

    let pad = config.edge_pad.clamp(0.0, 0.5);
    let mut buckets: IndexMap<i64, Vec<usize>> = IndexMap::new();
    for (index, fraction) in fractions.iter().enumerate() {
        let fraction = if fraction.is_finite() { *fraction } else { 0.5 };
        let bucket = (fraction.clamp(pad, 1.0 - pad) / config.bucket_width).round() as i64;
        buckets.entry(bucket).or_default().push(index);
    }

    let min_size = config.min_size.max(2);
    let mut partition = BucketPartition::default();
    let mut collapsed = vec![false; fractions.len()];
    for (bucket, members) in buckets {
        if members.len() >= min_size {
            for member in &members {
                collapsed[*member] = true;
            }
            partition.clusters.push(ClusterBucket {
                bucket,
                center_fraction: (bucket as f64 * config.bucket_width).clamp(0.0, 1.0),
                members,
            });
        }
    }
    partition.individuals = collapsed
        .iter()
        .enumerate()
        .filter(|(_, collapsed)| !**collapsed)
        .map(|(index, _)| index)
        .collect();
    partition
}
