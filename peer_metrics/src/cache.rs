//! Per-district memoization of the transformer outputs.
//!
//! The dataset does not change for the lifetime of the cache (the cache
//! borrows it), so the outputs only depend on the district id and are
//! computed at most once per id.

use log::{debug, info};
use std::collections::HashMap;

use crate::*;

/// Everything the transformer produces for one district.
#[derive(PartialEq, Debug, Clone)]
pub struct DistrictMetrics {
    pub district_id: String,
    pub comparison: Vec<ResourceComparisonRow>,
    pub demographics: Vec<DemographicShareRow>,
    pub revenue: Vec<RevenueShareRow>,
    pub summary: FundingSummary,
}

impl DistrictMetrics {
    /// Runs the whole transformer for one record.
    pub fn compute(record: &DistrictRecord) -> Result<DistrictMetrics, MetricsError> {
        let records = std::slice::from_ref(record);
        let comparison = build_resource_comparison(records);
        let summary = summarize(&comparison, record)?;
        Ok(DistrictMetrics {
            district_id: record.id.clone(),
            comparison,
            demographics: build_demographic_shares(records),
            revenue: build_revenue_shares(records),
            summary,
        })
    }

    pub fn row(&self, category: ResourceCategory) -> Option<&ResourceComparisonRow> {
        self.comparison.iter().find(|r| r.category == category)
    }
}

/// Cache of [`DistrictMetrics`] keyed by district id, for one dataset.
pub struct MetricsCache<'a> {
    dataset: &'a Dataset,
    entries: HashMap<String, DistrictMetrics>,
    misses: usize,
}

impl<'a> MetricsCache<'a> {
    pub fn new(dataset: &'a Dataset) -> MetricsCache<'a> {
        MetricsCache {
            dataset,
            entries: HashMap::new(),
            misses: 0,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Returns the metrics of a district, computing them on first use.
    ///
    /// An unknown id gives `Ok(None)` and nothing is stored for it.
    pub fn get(&mut self, district_id: &str) -> Result<Option<&DistrictMetrics>, MetricsError> {
        if !self.entries.contains_key(district_id) {
            let record = match select_district(self.dataset, district_id).first() {
                Some(r) => r,
                None => return Ok(None),
            };
            info!("MetricsCache: computing metrics for district {}", district_id);
            let metrics = DistrictMetrics::compute(record)?;
            self.misses += 1;
            self.entries.insert(district_id.to_string(), metrics);
        } else {
            debug!("MetricsCache: hit for district {}", district_id);
        }
        Ok(self.entries.get(district_id))
    }

    /// Number of districts currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of computations performed so far.
    pub fn computations(&self) -> usize {
        self.misses
    }
}
