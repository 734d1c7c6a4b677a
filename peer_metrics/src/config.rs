// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The display name of the aggregate row that stands for the whole state.
pub const STATEWIDE_NAME: &str = "State of Illinois";

/// Column holding the district identifier (RCDTS code).
pub const ID_FIELD: &str = "RCDTS";
/// Column holding the district display name.
pub const NAME_FIELD: &str = "District Name (IRC)";
/// Column holding the adjusted student enrollment.
pub const ENROLLMENT_FIELD: &str = "Total ASE";
/// Column holding the fraction of adequate funding the district has.
pub const ADEQUACY_LEVEL_FIELD: &str = "Adequacy Level";

/// One district, in the wide format of the source dataset.
///
/// All the numeric columns other than the enrollment live in `fields`, keyed
/// by their raw column name. A column that is absent from the map is a
/// missing value, not an error.
#[derive(PartialEq, Debug, Clone)]
pub struct DistrictRecord {
    pub id: String,
    pub name: String,
    pub enrollment: f64,
    pub fields: HashMap<String, f64>,
}

impl DistrictRecord {
    pub fn new(id: &str, name: &str, enrollment: f64) -> DistrictRecord {
        DistrictRecord {
            id: id.to_string(),
            name: name.to_string(),
            enrollment,
            fields: HashMap::new(),
        }
    }

    /// Sets a field, consuming and returning the record.
    pub fn with_field(mut self, field: &str, value: f64) -> DistrictRecord {
        self.fields.insert(field.to_string(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).cloned()
    }

    pub fn adequacy_level(&self) -> Option<f64> {
        self.get(ADEQUACY_LEVEL_FIELD)
    }

    pub fn is_statewide(&self) -> bool {
        self.name == STATEWIDE_NAME
    }
}

// ******** Resource categories *********

/// The canonical resource categories tracked by the funding formula.
///
/// The declaration order is the display order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum ResourceCategory {
    TotalResources,
    TotalResourcesPerStudent,
    CoreAndSpecialistTeachers,
    SpecialEducationTeachers,
    Counselors,
    Nurses,
    Psychologists,
    Principals,
    AssistantPrincipals,
    ElTeachers,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 10] = [
        ResourceCategory::TotalResources,
        ResourceCategory::TotalResourcesPerStudent,
        ResourceCategory::CoreAndSpecialistTeachers,
        ResourceCategory::SpecialEducationTeachers,
        ResourceCategory::Counselors,
        ResourceCategory::Nurses,
        ResourceCategory::Psychologists,
        ResourceCategory::Principals,
        ResourceCategory::AssistantPrincipals,
        ResourceCategory::ElTeachers,
    ];

    /// The staff positions, without the two dollar aggregates.
    pub const STAFF: [ResourceCategory; 8] = [
        ResourceCategory::CoreAndSpecialistTeachers,
        ResourceCategory::SpecialEducationTeachers,
        ResourceCategory::Counselors,
        ResourceCategory::Nurses,
        ResourceCategory::Psychologists,
        ResourceCategory::Principals,
        ResourceCategory::AssistantPrincipals,
        ResourceCategory::ElTeachers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResourceCategory::TotalResources => "Total Resources (Dollar Amount)",
            ResourceCategory::TotalResourcesPerStudent => {
                "Total Resources Per Student (Dollar Amount)"
            }
            ResourceCategory::CoreAndSpecialistTeachers => "Core and Specialist Teachers",
            ResourceCategory::SpecialEducationTeachers => "Special Education Teachers",
            ResourceCategory::Counselors => "Counselors",
            ResourceCategory::Nurses => "Nurses",
            ResourceCategory::Psychologists => "Psychologists",
            ResourceCategory::Principals => "Principals",
            ResourceCategory::AssistantPrincipals => "Assistant Principals",
            ResourceCategory::ElTeachers => "EL Teachers",
        }
    }

    /// Finds a category from its canonical label.
    pub fn from_label(label: &str) -> Option<ResourceCategory> {
        ResourceCategory::ALL
            .iter()
            .find(|c| c.label() == label)
            .cloned()
    }

    pub fn is_staff(&self) -> bool {
        !matches!(
            self,
            ResourceCategory::TotalResources | ResourceCategory::TotalResourcesPerStudent
        )
    }
}

impl Display for ResourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The raw wide-format column of each value family for one category.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct CategoryFields {
    pub category: ResourceCategory,
    pub adequate: &'static str,
    pub actual: Option<&'static str>,
    pub gap: &'static str,
    pub gap_per_school: Option<&'static str>,
}

/// Raw column names for every category, in canonical order.
///
/// This table is the join key between the value families. It is written out
/// in full: no name is derived from another one.
pub const CATEGORY_FIELDS: [CategoryFields; 10] = [
    CategoryFields {
        category: ResourceCategory::TotalResources,
        adequate: "Adequacy Target",
        actual: Some("Actual Resources"),
        gap: "Adequacy Funding Gap",
        gap_per_school: Some("Adequacy Funding Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::TotalResourcesPerStudent,
        adequate: "Adequacy Target Per Student",
        actual: Some("Actual Resources Per Student"),
        gap: "Adequacy Funding Gap Per Student",
        gap_per_school: None,
    },
    CategoryFields {
        category: ResourceCategory::CoreAndSpecialistTeachers,
        adequate: "Adequate Core and Specialist Teachers",
        actual: Some("Actual Core and Specialist Teachers Count (EIS)"),
        gap: "Core and Specialist Teachers Gap (EIS)",
        gap_per_school: Some("Core and Specialist Teachers Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::SpecialEducationTeachers,
        adequate: "Adequate Special Education Teachers",
        actual: Some("Actual Special Education Teachers Count (EIS)"),
        gap: "Special Education Teachers Gap (EIS)",
        gap_per_school: Some("Special Education Teachers Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::Counselors,
        adequate: "Adequate Counselors",
        actual: Some("Actual Counselors Count (IRC)"),
        gap: "Counselors Gap (IRC)",
        gap_per_school: Some("Counselors Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::Nurses,
        adequate: "Adequate Nurses",
        actual: Some("Actual Nurses Count (IRC)"),
        gap: "Nurses Gap (IRC)",
        gap_per_school: Some("Nurses Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::Psychologists,
        adequate: "Adequate Psychologists",
        actual: Some("Actual Psychologists Count (IRC)"),
        gap: "Psychologists Gap (IRC)",
        gap_per_school: Some("Psychologists Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::Principals,
        adequate: "Adequate Principals",
        actual: Some("Actual Principals Count (EIS)"),
        gap: "Principals Gap (EIS)",
        gap_per_school: Some("Principals Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::AssistantPrincipals,
        adequate: "Adequate Assistant Principals",
        actual: Some("Actual Assistant Principals Count (EIS)"),
        gap: "Assistant Principals Gap (EIS)",
        gap_per_school: Some("Assistant Principals Gap Per School"),
    },
    CategoryFields {
        category: ResourceCategory::ElTeachers,
        adequate: "Adequate EL Teachers",
        actual: Some("Actual EL Teachers (EIS)"),
        gap: "EL Teachers Gap (EIS)",
        gap_per_school: Some("EL Teachers Gap Per School"),
    },
];

pub fn category_fields(category: ResourceCategory) -> &'static CategoryFields {
    // The table is indexed in declaration order.
    &CATEGORY_FIELDS[category as usize]
}

/// Suffix marking a share column (a fraction between 0 and 1).
pub const SHARE_SUFFIX: &str = " (%)";

pub const DEMOGRAPHIC_FIELDS: [&str; 9] = [
    "White (%)",
    "Black (%)",
    "Latine (%)",
    "Asian (%)",
    "Native Hawaiian or Other Pacific Islander (%)",
    "American Indian or Alaska Native (%)",
    "IEP (%)",
    "EL (%)",
    "Low Income (%)",
];

pub const REVENUE_FIELDS: [&str; 5] = [
    "Local Property Taxes (%)",
    "Other Local Funding (%)",
    "Evidence-Based Funding (%)",
    "Other State Funding (%)",
    "Federal Funding (%)",
];

/// All the numeric columns the transformer knows about.
pub fn known_fields() -> Vec<&'static str> {
    let mut res: Vec<&'static str> = vec![ENROLLMENT_FIELD, ADEQUACY_LEVEL_FIELD];
    for cf in CATEGORY_FIELDS.iter() {
        res.push(cf.adequate);
        res.extend(cf.actual);
        res.push(cf.gap);
        res.extend(cf.gap_per_school);
    }
    res.extend(DEMOGRAPHIC_FIELDS.iter());
    res.extend(REVENUE_FIELDS.iter());
    res
}

// ******** Output data structures *********

/// One (district, category) pair of the long-format resource table.
#[derive(PartialEq, Debug, Clone)]
pub struct ResourceComparisonRow {
    pub district_id: String,
    pub category: ResourceCategory,
    pub adequate: Option<f64>,
    pub actual: Option<f64>,
    pub gap: Option<f64>,
    pub gap_per_school: Option<f64>,
    pub enrollment: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DemographicShareRow {
    pub district_id: String,
    pub group_name: String,
    pub share: Option<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RevenueShareRow {
    pub district_id: String,
    pub source_name: String,
    pub share: Option<f64>,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct FundingSummary {
    pub actual_total: f64,
    pub adequate_total: f64,
    pub enrollment: f64,
}

/// Errors that prevent the metrics from being computed.
#[derive(PartialEq, Debug, Clone)]
pub enum MetricsError {
    /// The aggregate dollar row is absent for this district.
    MissingAggregate { district_id: String },
    /// A value required for the summary is missing.
    MissingValue { district_id: String, field: String },
    DuplicateDistrict(String),
    /// The enrollment is negative, infinite or NaN.
    NegativeEnrollment { district_id: String, enrollment: f64 },
}

impl Error for MetricsError {}

impl Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::MissingAggregate { district_id } => write!(
                f,
                "district {}: missing the '{}' row",
                district_id,
                ResourceCategory::TotalResources.label()
            ),
            MetricsError::MissingValue { district_id, field } => {
                write!(f, "district {}: missing value for '{}'", district_id, field)
            }
            MetricsError::DuplicateDistrict(id) => {
                write!(f, "district {} appears more than once in the dataset", id)
            }
            MetricsError::NegativeEnrollment {
                district_id,
                enrollment,
            } => write!(
                f,
                "district {}: enrollment must be finite and non-negative, got {}",
                district_id, enrollment
            ),
        }
    }
}
