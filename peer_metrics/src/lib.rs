mod config;
use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;

pub mod builder;
pub mod cache;
pub mod figures;
pub mod legislative;
pub mod manual;

/// Default tolerance when checking that the revenue shares add up to one.
pub const REVENUE_SHARE_TOLERANCE: f64 = 0.01;

/// The full wide-format dataset, unique by district id.
///
/// A dataset is immutable once built (see [`builder::DatasetBuilder`]).
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Dataset {
    pub(crate) records: Vec<DistrictRecord>,
    pub(crate) by_id: HashMap<String, usize>,
}

impl Dataset {
    pub fn records(&self) -> &[DistrictRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, district_id: &str) -> Option<&DistrictRecord> {
        self.by_id.get(district_id).map(|idx| &self.records[*idx])
    }

    /// The district names, in dataset order.
    pub fn district_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// The aggregate statewide row, if the dataset has one.
    pub fn statewide(&self) -> Option<&DistrictRecord> {
        self.records.iter().find(|r| r.is_statewide())
    }
}

/// Selects the rows of one district.
///
/// The result holds zero or one record: an unknown id is not an error, the
/// caller gets an empty row set and must check it before going further.
pub fn select_district<'a>(dataset: &'a Dataset, district_id: &str) -> &'a [DistrictRecord] {
    match dataset.by_id.get(district_id) {
        Some(idx) => &dataset.records[*idx..*idx + 1],
        None => {
            debug!("select_district: no district with id {:?}", district_id);
            &[]
        }
    }
}

/// Same as [`select_district`], using the display name of the district.
///
/// Names are expected to be unique; the first match wins otherwise.
pub fn select_district_by_name<'a>(dataset: &'a Dataset, name: &str) -> &'a [DistrictRecord] {
    match dataset.records.iter().position(|r| r.name == name) {
        Some(idx) => &dataset.records[idx..idx + 1],
        None => {
            debug!("select_district_by_name: no district named {:?}", name);
            &[]
        }
    }
}

/// Reshapes the resource families of each record into the long format.
///
/// Each record yields one row per category, in canonical order. The category
/// list comes from the adequacy family, and the other families are joined
/// onto it: a missing value leaves a hole in the row but never drops the row.
pub fn build_resource_comparison(records: &[DistrictRecord]) -> Vec<ResourceComparisonRow> {
    let mut res: Vec<ResourceComparisonRow> = Vec::with_capacity(records.len() * 10);
    for record in records {
        for cf in CATEGORY_FIELDS.iter() {
            let row = ResourceComparisonRow {
                district_id: record.id.clone(),
                category: cf.category,
                adequate: record.get(cf.adequate),
                actual: cf.actual.and_then(|f| record.get(f)),
                gap: record.get(cf.gap),
                gap_per_school: cf.gap_per_school.and_then(|f| record.get(f)),
                enrollment: record.enrollment,
            };
            debug!("build_resource_comparison: {:?}", row);
            res.push(row);
        }
    }
    res
}

/// The group name of a share column: the raw name without the share marker.
pub fn share_label(raw: &str) -> &str {
    raw.strip_suffix(SHARE_SUFFIX).unwrap_or(raw)
}

pub fn build_demographic_shares(records: &[DistrictRecord]) -> Vec<DemographicShareRow> {
    let mut res: Vec<DemographicShareRow> = Vec::new();
    for record in records {
        for field in DEMOGRAPHIC_FIELDS.iter() {
            let share = record.get(field);
            if let Some(s) = share {
                if !(0.0..=1.0).contains(&s) {
                    warn!(
                        "district {}: share for {:?} is out of range: {}",
                        record.id, field, s
                    );
                }
            }
            res.push(DemographicShareRow {
                district_id: record.id.clone(),
                group_name: share_label(field).to_string(),
                share,
            });
        }
    }
    res
}

pub fn build_revenue_shares(records: &[DistrictRecord]) -> Vec<RevenueShareRow> {
    let mut res: Vec<RevenueShareRow> = Vec::new();
    for record in records {
        for field in REVENUE_FIELDS.iter() {
            res.push(RevenueShareRow {
                district_id: record.id.clone(),
                source_name: share_label(field).to_string(),
                share: record.get(field),
            });
        }
    }
    res
}

/// Sum of the revenue shares of the given rows. Missing shares count as 0.
pub fn revenue_share_total(rows: &[RevenueShareRow]) -> f64 {
    rows.iter().filter_map(|r| r.share).sum()
}

/// Checks that the revenue shares add up to one, within the tolerance.
///
/// A failure points at the input data, not at the computation.
pub fn revenue_shares_balanced(rows: &[RevenueShareRow], tolerance: f64) -> bool {
    let total = revenue_share_total(rows);
    let balanced = (total - 1.0).abs() <= tolerance;
    if !balanced {
        warn!(
            "revenue shares add up to {:.4} (tolerance {})",
            total, tolerance
        );
    }
    balanced
}

/// Extracts the totals of one district from its long-format rows.
///
/// The aggregate dollar row must be present with both values: every other
/// figure is derived from it, so its absence is reported as an error instead
/// of a zero.
pub fn summarize(
    rows: &[ResourceComparisonRow],
    record: &DistrictRecord,
) -> Result<FundingSummary, MetricsError> {
    let total_row = rows
        .iter()
        .find(|r| r.district_id == record.id && r.category == ResourceCategory::TotalResources)
        .ok_or_else(|| MetricsError::MissingAggregate {
            district_id: record.id.clone(),
        })?;
    let fields = category_fields(ResourceCategory::TotalResources);
    let actual_total = total_row.actual.ok_or_else(|| MetricsError::MissingValue {
        district_id: record.id.clone(),
        field: fields.actual.unwrap_or_default().to_string(),
    })?;
    let adequate_total = total_row.adequate.ok_or_else(|| MetricsError::MissingValue {
        district_id: record.id.clone(),
        field: fields.adequate.to_string(),
    })?;
    let summary = FundingSummary {
        actual_total,
        adequate_total,
        enrollment: record.enrollment,
    };
    info!("summarize: district {}: {:?}", record.id, summary);
    Ok(summary)
}

/// A total divided by the enrollment. A zero enrollment gives 0.
pub fn per_pupil(total: f64, enrollment: f64) -> f64 {
    if enrollment > 0.0 {
        total / enrollment
    } else {
        0.0
    }
}

/// Actual minus adequate. Negative means under-resourced.
pub fn gap(actual: f64, adequate: f64) -> f64 {
    actual - adequate
}

/// The statewide gap of a category: the most negative gap observed for that
/// category across all the districts of the dataset.
///
/// Returns `None` when no district has a gap value for the category.
pub fn statewide_gap(dataset: &Dataset, category: ResourceCategory) -> Option<f64> {
    let field = category_fields(category).gap;
    let res = dataset
        .records
        .iter()
        .filter_map(|r| r.get(field))
        .fold(None, |acc: Option<f64>, g| match acc {
            Some(m) if m <= g => Some(m),
            _ => Some(g),
        });
    debug!("statewide_gap: {} -> {:?}", category, res);
    res
}

/// Routes the `log` output of the tests through the test harness.
/// `RUST_LOG=debug cargo test` shows the row-level detail.
#[cfg(test)]
pub(crate) fn init_test_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
