//! Headline figures shown for a district, in total or per-pupil units.

use crate::*;

/// Whether the figures are shown as totals or divided by the enrollment.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum DisplayUnits {
    #[default]
    Total,
    PerPupil,
}

impl DisplayUnits {
    pub fn parse(s: &str) -> Option<DisplayUnits> {
        match s {
            "total" => Some(DisplayUnits::Total),
            "perPupil" | "per_pupil" | "per-pupil" => Some(DisplayUnits::PerPupil),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnits::Total => "total",
            DisplayUnits::PerPupil => "perPupil",
        }
    }
}

/// How a gap is presented: a shortfall or a surplus.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum GapLabel {
    Gap,
    Surplus,
}

impl GapLabel {
    /// A gap of exactly zero is a surplus.
    pub fn of(gap: f64) -> GapLabel {
        if gap >= 0.0 {
            GapLabel::Surplus
        } else {
            GapLabel::Gap
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GapLabel::Gap => "gap",
            GapLabel::Surplus => "surplus",
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct FundingFigures {
    pub units: DisplayUnits,
    pub adequate: f64,
    pub actual: f64,
    pub gap: f64,
}

impl FundingFigures {
    /// Computes the figures of one district.
    ///
    /// `statewide_gap` is only given for the aggregate statewide row: its gap
    /// is the worst district gap (see [`crate::statewide_gap`]), not the
    /// difference of the statewide totals.
    pub fn compute(
        summary: &FundingSummary,
        statewide_gap: Option<f64>,
        units: DisplayUnits,
    ) -> FundingFigures {
        let enrollment = summary.enrollment;
        match units {
            DisplayUnits::Total => FundingFigures {
                units,
                adequate: summary.adequate_total,
                actual: summary.actual_total,
                gap: statewide_gap
                    .unwrap_or_else(|| gap(summary.actual_total, summary.adequate_total)),
            },
            DisplayUnits::PerPupil => {
                let actual = per_pupil(summary.actual_total, enrollment);
                let adequate = per_pupil(summary.adequate_total, enrollment);
                FundingFigures {
                    units,
                    adequate,
                    actual,
                    gap: match statewide_gap {
                        Some(g) => per_pupil(g, enrollment),
                        None => gap(actual, adequate),
                    },
                }
            }
        }
    }

    pub fn label(&self) -> GapLabel {
        GapLabel::of(self.gap)
    }
}

/// Whether the district has the funding it needs, from its adequacy level.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AdequacyStanding {
    Underfunded,
    Adequate,
}

impl AdequacyStanding {
    /// A level of exactly 1 (100%) still counts as underfunded.
    pub fn of(level: f64) -> AdequacyStanding {
        if level <= 1.0 {
            AdequacyStanding::Underfunded
        } else {
            AdequacyStanding::Adequate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdequacyStanding::Underfunded => "underfunded",
            AdequacyStanding::Adequate => "adequate",
        }
    }
}

/// The staffing outcome for one position.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum StaffingNeed {
    Adequate,
    /// Number of additional staff needed (per school for a district, in
    /// total for the state).
    Shortfall(f64),
}

impl StaffingNeed {
    /// Reads the staffing need of one category from the long-format rows.
    ///
    /// The statewide row is judged on the total gap, districts on the gap per
    /// school. Missing values count as no gap.
    pub fn of(
        rows: &[ResourceComparisonRow],
        category: ResourceCategory,
        statewide: bool,
    ) -> StaffingNeed {
        let value = rows
            .iter()
            .find(|r| r.category == category)
            .and_then(|r| if statewide { r.gap } else { r.gap_per_school })
            .unwrap_or(0.0);
        if value >= 0.0 {
            StaffingNeed::Adequate
        } else {
            StaffingNeed::Shortfall(value.abs())
        }
    }
}
