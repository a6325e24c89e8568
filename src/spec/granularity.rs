//! Granularity specs of ingestion and compaction tasks.

use serde::Serialize;

use crate::collection::IntervalCollection;
use crate::types::Granularity;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformGranularity {
    pub segment_granularity: Granularity,
    pub query_granularity: Granularity,
    pub rollup: bool,
    pub intervals: IntervalCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitraryGranularity {
    pub query_granularity: Granularity,
    pub rollup: bool,
    pub intervals: IntervalCollection,
}

/// How ingested rows are bucketed into segments and rolled up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GranularitySpec {
    Uniform(UniformGranularity),
    Arbitrary(ArbitraryGranularity),
}

impl GranularitySpec {
    pub fn uniform(
        segment_granularity: Granularity,
        query_granularity: Granularity,
        rollup: bool,
        intervals: IntervalCollection,
    ) -> Self {
        GranularitySpec::Uniform(UniformGranularity {
            segment_granularity,
            query_granularity,
            rollup,
            intervals,
        })
    }

    pub fn arbitrary(query_granularity: Granularity, rollup: bool, intervals: IntervalCollection) -> Self {
        GranularitySpec::Arbitrary(ArbitraryGranularity {
            query_granularity,
            rollup,
            intervals,
        })
    }

    pub fn intervals(&self) -> &IntervalCollection {
        match self {
            GranularitySpec::Uniform(g) => &g.intervals,
            GranularitySpec::Arbitrary(g) => &g.intervals,
        }
    }

    pub fn query_granularity(&self) -> Granularity {
        match self {
            GranularitySpec::Uniform(g) => g.query_granularity,
            GranularitySpec::Arbitrary(g) => g.query_granularity,
        }
    }
}
