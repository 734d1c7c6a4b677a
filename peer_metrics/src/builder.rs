pub use crate::config::*;
use crate::Dataset;

use log::debug;
use std::collections::{HashMap, HashSet};

/// A builder for assembling a dataset, one district at a time.
///
/// The loaders go through the builder so that the uniqueness of the district
/// ids and the sign of the enrollment are checked in one place.
///
/// ```
/// use peer_metrics::builder::DatasetBuilder;
/// # use peer_metrics::MetricsError;
///
/// let mut builder = DatasetBuilder::new();
/// builder.add_row("15016299025", "Chicago Public Schools District 299", 320_000.0,
///     &[("Adequacy Target", 9.0e9), ("Actual Resources", 7.5e9)])?;
/// let dataset = builder.build();
/// assert_eq!(dataset.len(), 1);
///
/// # Ok::<(), MetricsError>(())
/// ```
pub struct DatasetBuilder {
    pub(crate) _records: Vec<DistrictRecord>,
    pub(crate) _ids: HashSet<String>,
}

impl DatasetBuilder {
    pub fn new() -> DatasetBuilder {
        DatasetBuilder {
            _records: Vec::new(),
            _ids: HashSet::new(),
        }
    }

    /// Adds a district given its id, name, enrollment and numeric fields.
    pub fn add_row(
        &mut self,
        id: &str,
        name: &str,
        enrollment: f64,
        fields: &[(&str, f64)],
    ) -> Result<(), MetricsError> {
        let mut record = DistrictRecord::new(id, name, enrollment);
        for (field, value) in fields {
            record.fields.insert(field.to_string(), *value);
        }
        self.add_record(record)
    }

    pub fn add_record(&mut self, record: DistrictRecord) -> Result<(), MetricsError> {
        if !record.enrollment.is_finite() || record.enrollment < 0.0 {
            return Err(MetricsError::NegativeEnrollment {
                district_id: record.id.clone(),
                enrollment: record.enrollment,
            });
        }
        if !self._ids.insert(record.id.clone()) {
            return Err(MetricsError::DuplicateDistrict(record.id));
        }
        debug!(
            "add_record: {} ({}) with {} fields",
            record.id,
            record.name,
            record.fields.len()
        );
        self._records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self._records.len()
    }

    pub fn is_empty(&self) -> bool {
        self._records.is_empty()
    }

    pub fn build(self) -> Dataset {
        let by_id: HashMap<String, usize> = self
            ._records
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id.clone(), idx))
            .collect();
        Dataset {
            records: self._records,
            by_id,
        }
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        DatasetBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_ids() {
        let mut builder = DatasetBuilder::new();
        builder.add_row("1", "A", 10.0, &[]).unwrap();
        let res = builder.add_row("1", "B", 20.0, &[]);
        assert_eq!(res, Err(MetricsError::DuplicateDistrict("1".to_string())));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn rejects_negative_enrollment() {
        let mut builder = DatasetBuilder::new();
        let res = builder.add_row("1", "A", -1.0, &[]);
        assert!(matches!(
            res,
            Err(MetricsError::NegativeEnrollment { .. })
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn rejects_non_finite_enrollment() {
        let mut builder = DatasetBuilder::new();
        for (idx, enrollment) in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN]
            .iter()
            .enumerate()
        {
            let res = builder.add_row(&idx.to_string(), "A", *enrollment, &[]);
            assert!(matches!(
                res,
                Err(MetricsError::NegativeEnrollment { .. })
            ));
        }
        assert!(builder.is_empty());
    }

    #[test]
    fn zero_enrollment_is_accepted() {
        let mut builder = DatasetBuilder::new();
        builder.add_row("1", STATEWIDE_NAME, 0.0, &[]).unwrap();
        let dataset = builder.build();
        assert_eq!(dataset.get("1").map(|r| r.enrollment), Some(0.0));
    }
}
