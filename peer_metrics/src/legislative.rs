//! Legislative coverage: which school districts fall within each state
//! legislative district, and the funding figures of those school districts.

use log::{debug, info, warn};
use std::collections::BTreeSet;

use crate::*;

/// One (legislative district, school district) pair.
#[derive(PartialEq, Debug, Clone)]
pub struct CoverageRow {
    pub chamber: String,
    pub district_number: u32,
    pub legislator: Option<String>,
    pub rcdts: String,
    pub school_district: String,
    pub total_students: Option<f64>,
    /// Share of the students of the legislative district in this school
    /// district.
    pub share_of_students: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct Coverage {
    rows: Vec<CoverageRow>,
}

/// The coverage rows of one legislative district.
#[derive(PartialEq, Debug, Clone)]
pub struct LegislativeSelection<'a> {
    pub chamber: String,
    pub district_number: u32,
    pub legislator: Option<String>,
    pub rows: Vec<&'a CoverageRow>,
}

impl Coverage {
    pub fn new(rows: Vec<CoverageRow>) -> Coverage {
        info!("Coverage: {} rows", rows.len());
        Coverage { rows }
    }

    pub fn rows(&self) -> &[CoverageRow] {
        &self.rows
    }

    /// All the chambers, sorted.
    pub fn chambers(&self) -> Vec<&str> {
        let s: BTreeSet<&str> = self.rows.iter().map(|r| r.chamber.as_str()).collect();
        s.into_iter().collect()
    }

    /// The district numbers of one chamber, sorted.
    pub fn districts_in_chamber(&self, chamber: &str) -> Vec<u32> {
        let s: BTreeSet<u32> = self
            .rows
            .iter()
            .filter(|r| r.chamber == chamber)
            .map(|r| r.district_number)
            .collect();
        s.into_iter().collect()
    }

    /// All the legislator names, sorted. Rows without a legislator are skipped.
    pub fn legislators(&self) -> Vec<&str> {
        let s: BTreeSet<&str> = self
            .rows
            .iter()
            .filter_map(|r| r.legislator.as_deref())
            .filter(|n| !n.is_empty())
            .collect();
        s.into_iter().collect()
    }

    pub fn select_by_district(
        &self,
        chamber: &str,
        district_number: u32,
    ) -> Option<LegislativeSelection<'_>> {
        let rows: Vec<&CoverageRow> = self
            .rows
            .iter()
            .filter(|r| r.chamber == chamber && r.district_number == district_number)
            .collect();
        debug!(
            "select_by_district: {} {} -> {} rows",
            chamber,
            district_number,
            rows.len()
        );
        let first = rows.first()?;
        Some(LegislativeSelection {
            chamber: chamber.to_string(),
            district_number,
            legislator: first.legislator.clone(),
            rows,
        })
    }

    /// Selects the legislative district of a legislator.
    ///
    /// The chamber and district number are read from the first matching row.
    pub fn select_by_legislator(&self, legislator: &str) -> Option<LegislativeSelection<'_>> {
        let rows: Vec<&CoverageRow> = self
            .rows
            .iter()
            .filter(|r| r.legislator.as_deref() == Some(legislator))
            .collect();
        debug!("select_by_legislator: {} -> {} rows", legislator, rows.len());
        let first = rows.first()?;
        Some(LegislativeSelection {
            chamber: first.chamber.clone(),
            district_number: first.district_number,
            legislator: Some(legislator.to_string()),
            rows,
        })
    }
}

/// One school district of a legislative district, joined with its record.
#[derive(PartialEq, Debug, Clone)]
pub struct LegislativeDistrictView<'a> {
    pub coverage: &'a CoverageRow,
    /// `None` when the school district is not in the dataset.
    pub record: Option<&'a DistrictRecord>,
}

impl<'a> LegislativeDistrictView<'a> {
    fn field(&self, field: &str) -> Option<f64> {
        self.record.and_then(|r| r.get(field))
    }

    pub fn adequacy_gap(&self) -> Option<f64> {
        self.field(category_fields(ResourceCategory::TotalResources).gap)
    }

    pub fn adequacy_gap_per_student(&self) -> Option<f64> {
        self.field(category_fields(ResourceCategory::TotalResourcesPerStudent).gap)
    }

    pub fn adequacy_level(&self) -> Option<f64> {
        self.record.and_then(|r| r.adequacy_level())
    }

    /// The gap of each staff position, in canonical order.
    pub fn staff_gaps(&self) -> Vec<(ResourceCategory, Option<f64>)> {
        ResourceCategory::STAFF
            .iter()
            .map(|c| (*c, self.field(category_fields(*c).gap)))
            .collect()
    }

    pub fn demographics(&self) -> Vec<DemographicShareRow> {
        match self.record {
            Some(r) => build_demographic_shares(std::slice::from_ref(r)),
            None => vec![],
        }
    }

    pub fn revenue(&self) -> Vec<RevenueShareRow> {
        match self.record {
            Some(r) => build_revenue_shares(std::slice::from_ref(r)),
            None => vec![],
        }
    }
}

impl<'a> LegislativeSelection<'a> {
    /// Left join of the selected coverage rows onto the dataset, by RCDTS.
    pub fn join(&self, dataset: &'a Dataset) -> Vec<LegislativeDistrictView<'a>> {
        self.rows
            .iter()
            .map(|&row| {
                let record = dataset.get(&row.rcdts);
                if record.is_none() {
                    warn!(
                        "{} district {}: school district {} ({}) is not in the dataset",
                        self.chamber, self.district_number, row.school_district, row.rcdts
                    );
                }
                LegislativeDistrictView {
                    coverage: row,
                    record,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DatasetBuilder;

    fn row(chamber: &str, number: u32, legislator: Option<&str>, rcdts: &str) -> CoverageRow {
        CoverageRow {
            chamber: chamber.to_string(),
            district_number: number,
            legislator: legislator.map(|s| s.to_string()),
            rcdts: rcdts.to_string(),
            school_district: format!("SD {}", rcdts),
            total_students: Some(1000.0),
            share_of_students: Some(0.5),
        }
    }

    fn coverage() -> Coverage {
        Coverage::new(vec![
            row("Senate", 12, Some("Jane Doe"), "a"),
            row("Senate", 12, Some("Jane Doe"), "b"),
            row("House", 3, Some("John Roe"), "a"),
            row("House", 24, None, "c"),
            row("House", 3, Some("John Roe"), "missing"),
        ])
    }

    #[test]
    fn lists_are_sorted_and_unique() {
        let c = coverage();
        assert_eq!(c.chambers(), vec!["House", "Senate"]);
        assert_eq!(c.districts_in_chamber("House"), vec![3, 24]);
        assert_eq!(c.districts_in_chamber("Senate"), vec![12]);
        assert_eq!(c.legislators(), vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn selection() {
        let c = coverage();
        let s = c.select_by_district("Senate", 12).unwrap();
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.legislator.as_deref(), Some("Jane Doe"));
        let l = c.select_by_legislator("John Roe").unwrap();
        assert_eq!(l.chamber, "House");
        assert_eq!(l.district_number, 3);
        assert_eq!(l.rows.len(), 2);
        assert!(c.select_by_district("Senate", 99).is_none());
        assert!(c.select_by_legislator("Nobody").is_none());
    }

    #[test]
    fn join_keeps_unmatched_rows() {
        crate::init_test_logs();
        let mut builder = DatasetBuilder::new();
        builder
            .add_row(
                "a",
                "SD a",
                100.0,
                &[
                    ("Adequacy Funding Gap", -1.0e6),
                    ("Adequacy Funding Gap Per Student", -10_000.0),
                    ("Adequacy Level", 0.7),
                    ("Nurses Gap (IRC)", -2.0),
                    ("White (%)", 0.4),
                ],
            )
            .unwrap();
        let dataset = builder.build();
        let c = coverage();
        let s = c.select_by_legislator("John Roe").unwrap();
        let views = s.join(&dataset);
        assert_eq!(views.len(), 2);
        let a = &views[0];
        assert_eq!(a.adequacy_gap(), Some(-1.0e6));
        assert_eq!(a.adequacy_gap_per_student(), Some(-10_000.0));
        assert_eq!(a.adequacy_level(), Some(0.7));
        let gaps = a.staff_gaps();
        assert_eq!(gaps.len(), 8);
        assert_eq!(gaps[3], (ResourceCategory::Nurses, Some(-2.0)));
        assert_eq!(a.demographics().len(), 9);
        assert_eq!(a.revenue().len(), 5);
        let missing = &views[1];
        assert!(missing.record.is_none());
        assert_eq!(missing.adequacy_gap(), None);
        assert!(missing.demographics().is_empty());
    }
}
