// Assembly of the JSON report for one district.

use serde_json::{json, Value as JSValue};

use crate::peer::*;
use peer_metrics::cache::DistrictMetrics;
use peer_metrics::figures::{AdequacyStanding, FundingFigures, StaffingNeed};
use peer_metrics::legislative::{Coverage, LegislativeDistrictView, LegislativeSelection};

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DistrictQuery {
    ById(String),
    ByName(String),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LegislativeQuery {
    District { chamber: String, number: u32 },
    Legislator(String),
}

/// Everything needed to produce one report, after merging the configuration
/// and the command line.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportRequest {
    pub report_name: String,
    pub data_source: InputSource,
    pub coverage_source: Option<InputSource>,
    pub district: DistrictQuery,
    pub units: DisplayUnits,
    /// Restricts the staffing section to one position.
    pub staff_category: Option<ResourceCategory>,
    pub legislative: Option<LegislativeQuery>,
    pub out: Option<String>,
    pub reference: Option<String>,
}

fn find_record<'a>(dataset: &'a Dataset, query: &DistrictQuery) -> Option<&'a DistrictRecord> {
    let selection = match query {
        DistrictQuery::ById(id) => select_district(dataset, id),
        DistrictQuery::ByName(name) => select_district_by_name(dataset, name),
    };
    selection.first()
}

fn resource_rows_js(rows: &[ResourceComparisonRow]) -> JSValue {
    let l: Vec<JSValue> = rows
        .iter()
        .map(|r| {
            json!({
                "resource": r.category.label(),
                "adequate": r.adequate,
                "actual": r.actual,
                "gap": r.gap,
                "gapPerSchool": r.gap_per_school,
                "totalAse": r.enrollment,
            })
        })
        .collect();
    JSValue::Array(l)
}

fn staffing_js(
    metrics: &DistrictMetrics,
    statewide: bool,
    only: Option<ResourceCategory>,
) -> JSValue {
    let categories: Vec<ResourceCategory> = match only {
        Some(c) => vec![c],
        None => ResourceCategory::STAFF.to_vec(),
    };
    let l: Vec<JSValue> = categories
        .iter()
        .map(|c| match StaffingNeed::of(&metrics.comparison, *c, statewide) {
            StaffingNeed::Adequate => json!({
                "position": c.label(),
                "adequatelyStaffed": true,
                "shortfall": null,
            }),
            StaffingNeed::Shortfall(n) => json!({
                "position": c.label(),
                "adequatelyStaffed": false,
                "shortfall": n,
            }),
        })
        .collect();
    JSValue::Array(l)
}

fn demographics_js(rows: &[DemographicShareRow]) -> JSValue {
    let l: Vec<JSValue> = rows
        .iter()
        .map(|r| json!({"group": r.group_name, "share": r.share}))
        .collect();
    JSValue::Array(l)
}

fn revenue_js(rows: &[RevenueShareRow]) -> JSValue {
    let l: Vec<JSValue> = rows
        .iter()
        .map(|r| json!({"source": r.source_name, "share": r.share}))
        .collect();
    json!({
        "shares": l,
        "total": revenue_share_total(rows),
        "balanced": revenue_shares_balanced(rows, REVENUE_SHARE_TOLERANCE),
    })
}

fn legislative_view_js(view: &LegislativeDistrictView) -> JSValue {
    let staff: Vec<JSValue> = view
        .staff_gaps()
        .iter()
        .map(|(c, g)| json!({"position": c.label(), "gap": g}))
        .collect();
    json!({
        "rcdts": view.coverage.rcdts,
        "schoolDistrict": view.coverage.school_district,
        "totalStudents": view.coverage.total_students,
        "shareOfStudents": view.coverage.share_of_students,
        "inDataset": view.record.is_some(),
        "adequacyGap": view.adequacy_gap(),
        "adequacyGapPerStudent": view.adequacy_gap_per_student(),
        "adequacyLevel": view.adequacy_level(),
        "staffGaps": staff,
        "demographics": demographics_js(&view.demographics()),
        "revenue": revenue_js(&view.revenue()),
    })
}

fn legislative_js(
    dataset: &Dataset,
    coverage: Option<&Coverage>,
    query: &LegislativeQuery,
) -> PeerResult<JSValue> {
    let coverage = match coverage {
        Some(c) => c,
        None => whatever!("A legislative view needs a coverage file (--coverage)"),
    };
    let selection: Option<LegislativeSelection> = match query {
        LegislativeQuery::District { chamber, number } => {
            coverage.select_by_district(chamber, *number)
        }
        LegislativeQuery::Legislator(name) => coverage.select_by_legislator(name),
    };
    let selection = match selection {
        Some(s) => s,
        None => {
            warn!("No legislative district matches {:?}", query);
            return Ok(JSValue::Null);
        }
    };
    let views: Vec<JSValue> = selection
        .join(dataset)
        .iter()
        .map(legislative_view_js)
        .collect();
    Ok(json!({
        "chamber": selection.chamber,
        "districtNumber": selection.district_number,
        "legislator": selection.legislator,
        "schoolDistricts": views,
    }))
}

/// Builds the report. An unknown district gives a report with a null
/// district and empty sections.
pub fn build_report(
    dataset: &Dataset,
    coverage: Option<&Coverage>,
    request: &ReportRequest,
) -> PeerResult<JSValue> {
    let config_js = json!({
        "reportName": request.report_name,
        "displayUnits": request.units.as_str(),
    });
    let legislative = match &request.legislative {
        Some(q) => Some(legislative_js(dataset, coverage, q)?),
        None => None,
    };

    let record = match find_record(dataset, &request.district) {
        Some(r) => r,
        None => {
            warn!("No district matches {:?}", request.district);
            let mut report = json!({
                "config": config_js,
                "district": null,
                "figures": null,
                "adequacy": null,
                "resources": [],
                "staffing": [],
                "demographics": [],
                "revenue": {"shares": [], "total": 0.0, "balanced": false},
            });
            if let Some(l) = legislative {
                report["legislative"] = l;
            }
            return Ok(report);
        }
    };
    info!("build_report: district {} ({})", record.name, record.id);

    let metrics = DistrictMetrics::compute(record).context(MetricsSnafu {})?;

    let statewide = record.is_statewide();
    let sw_gap = if statewide {
        statewide_gap(dataset, ResourceCategory::TotalResources)
    } else {
        None
    };
    let figures = FundingFigures::compute(&metrics.summary, sw_gap, request.units);
    debug!("build_report: figures: {:?}", figures);

    let adequacy_js = match record.adequacy_level() {
        Some(level) => json!({
            "level": level,
            "standing": AdequacyStanding::of(level).as_str(),
        }),
        None => JSValue::Null,
    };

    let mut report = json!({
        "config": config_js,
        "district": {
            "id": record.id,
            "name": record.name,
            "totalAse": record.enrollment,
            "statewide": statewide,
        },
        "figures": {
            "units": figures.units.as_str(),
            "adequate": figures.adequate,
            "actual": figures.actual,
            "gap": figures.gap,
            "label": figures.label().as_str(),
        },
        "adequacy": adequacy_js,
        "resources": resource_rows_js(&metrics.comparison),
        "staffing": staffing_js(&metrics, statewide, request.staff_category),
        "demographics": demographics_js(&metrics.demographics),
        "revenue": revenue_js(&metrics.revenue),
    });
    if let Some(l) = legislative {
        report["legislative"] = l;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_path(name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    fn dataset() -> Dataset {
        load_dataset(&InputSource {
            provider: Provider::Csv,
            path: data_path("districts.csv"),
            excel_worksheet_name: None,
        })
        .unwrap()
    }

    fn request(district: DistrictQuery, units: DisplayUnits) -> ReportRequest {
        ReportRequest {
            report_name: "test".to_string(),
            data_source: InputSource {
                provider: Provider::Csv,
                path: data_path("districts.csv"),
                excel_worksheet_name: None,
            },
            coverage_source: None,
            district,
            units,
            staff_category: None,
            legislative: None,
            out: None,
            reference: None,
        }
    }

    fn payson() -> DistrictQuery {
        DistrictQuery::ByName("Payson CUSD 1".to_string())
    }

    #[test]
    fn district_totals() {
        let ds = dataset();
        let r = build_report(&ds, None, &request(payson(), DisplayUnits::Total)).unwrap();
        assert_eq!(r["district"]["id"], "010010010260000");
        assert_eq!(r["figures"]["adequate"].as_f64(), Some(10_000_000.0));
        assert_eq!(r["figures"]["actual"].as_f64(), Some(8_000_000.0));
        assert_eq!(r["figures"]["gap"].as_f64(), Some(-2_000_000.0));
        assert_eq!(r["figures"]["label"], "gap");
        assert_eq!(r["adequacy"]["standing"], "underfunded");
        assert_eq!(r["resources"].as_array().unwrap().len(), 10);
        assert_eq!(r["demographics"].as_array().unwrap().len(), 9);
        assert_eq!(r["revenue"]["balanced"], true);
        assert!(r.get("legislative").is_none());
    }

    #[test]
    fn district_per_pupil() {
        let ds = dataset();
        let r = build_report(&ds, None, &request(payson(), DisplayUnits::PerPupil)).unwrap();
        assert_eq!(r["config"]["displayUnits"], "perPupil");
        assert_eq!(r["figures"]["adequate"].as_f64(), Some(10_000.0));
        assert_eq!(r["figures"]["actual"].as_f64(), Some(8_000.0));
        assert_eq!(r["figures"]["gap"].as_f64(), Some(-2_000.0));
    }

    #[test]
    fn staffing_per_school() {
        let ds = dataset();
        let r = build_report(&ds, None, &request(payson(), DisplayUnits::Total)).unwrap();
        let staffing = r["staffing"].as_array().unwrap();
        assert_eq!(staffing.len(), 8);
        assert_eq!(staffing[0]["position"], "Core and Specialist Teachers");
        assert_eq!(staffing[0]["adequatelyStaffed"], false);
        assert_eq!(staffing[0]["shortfall"].as_f64(), Some(2.67));
        assert_eq!(staffing[1]["adequatelyStaffed"], true);
        // Assistant principals: surplus.
        assert_eq!(staffing[6]["adequatelyStaffed"], true);
    }

    #[test]
    fn staffing_single_category() {
        let ds = dataset();
        let mut req = request(payson(), DisplayUnits::Total);
        req.staff_category = Some(ResourceCategory::Nurses);
        let r = build_report(&ds, None, &req).unwrap();
        let staffing = r["staffing"].as_array().unwrap();
        assert_eq!(staffing.len(), 1);
        assert_eq!(staffing[0]["position"], "Nurses");
        assert_eq!(staffing[0]["shortfall"].as_f64(), Some(0.33));
    }

    #[test]
    fn statewide_uses_minimum_gap() {
        let ds = dataset();
        let q = DistrictQuery::ByName(STATEWIDE_NAME.to_string());
        let r = build_report(&ds, None, &request(q.clone(), DisplayUnits::Total)).unwrap();
        assert_eq!(r["district"]["statewide"], true);
        assert_eq!(r["figures"]["gap"].as_f64(), Some(-7_000_000_000.0));
        // Judged on the total gap, not per school.
        assert_eq!(r["staffing"][0]["shortfall"].as_f64(), Some(10_000.0));
        let pp = build_report(&ds, None, &request(q, DisplayUnits::PerPupil)).unwrap();
        assert_eq!(pp["figures"]["gap"].as_f64(), Some(0.0));
        assert_eq!(pp["figures"]["actual"].as_f64(), Some(0.0));
    }

    #[test]
    fn surplus_district() {
        let ds = dataset();
        let q = DistrictQuery::ById("020020020260000".to_string());
        let r = build_report(&ds, None, &request(q, DisplayUnits::Total)).unwrap();
        assert_eq!(r["figures"]["gap"].as_f64(), Some(1_000_000.0));
        assert_eq!(r["figures"]["label"], "surplus");
        assert_eq!(r["adequacy"]["standing"], "adequate");
        assert_eq!(r["revenue"]["balanced"], true);
    }

    #[test]
    fn unknown_district() {
        let ds = dataset();
        let q = DistrictQuery::ByName("Nowhere SD 404".to_string());
        let r = build_report(&ds, None, &request(q, DisplayUnits::Total)).unwrap();
        assert!(r["district"].is_null());
        assert!(r["resources"].as_array().unwrap().is_empty());
        assert!(r["staffing"].as_array().unwrap().is_empty());
    }

    #[test]
    fn legislative_view() {
        let ds = dataset();
        let coverage = load_coverage(&InputSource {
            provider: Provider::Csv,
            path: data_path("coverage.csv"),
            excel_worksheet_name: None,
        })
        .unwrap();
        let mut req = request(payson(), DisplayUnits::Total);
        req.legislative = Some(LegislativeQuery::District {
            chamber: "Senate".to_string(),
            number: 47,
        });
        let r = build_report(&ds, Some(&coverage), &req).unwrap();
        let l = &r["legislative"];
        assert_eq!(l["legislator"], "Jane Doe");
        let sds = l["schoolDistricts"].as_array().unwrap();
        assert_eq!(sds.len(), 2);
        assert_eq!(sds[0]["adequacyGap"].as_f64(), Some(-2_000_000.0));
        assert_eq!(sds[0]["staffGaps"].as_array().unwrap().len(), 8);
        assert_eq!(sds[1]["inDataset"], false);
        assert!(sds[1]["adequacyGap"].is_null());
    }

    #[test]
    fn legislative_view_by_legislator() {
        let ds = dataset();
        let coverage = load_coverage(&InputSource {
            provider: Provider::Csv,
            path: data_path("coverage.csv"),
            excel_worksheet_name: None,
        })
        .unwrap();
        let mut req = request(payson(), DisplayUnits::Total);
        req.legislative = Some(LegislativeQuery::Legislator("John Roe".to_string()));
        let r = build_report(&ds, Some(&coverage), &req).unwrap();
        assert_eq!(r["legislative"]["chamber"], "House");
        assert_eq!(r["legislative"]["districtNumber"], 94);
        req.legislative = Some(LegislativeQuery::Legislator("Nobody".to_string()));
        let none = build_report(&ds, Some(&coverage), &req).unwrap();
        assert!(none["legislative"].is_null());
    }

    #[test]
    fn incomplete_district_fails() {
        let mut builder = peer_metrics::builder::DatasetBuilder::new();
        builder
            .add_row("1", "Half SD", 10.0, &[("Adequacy Target", 100.0)])
            .unwrap();
        let ds = builder.build();
        let q = DistrictQuery::ById("1".to_string());
        assert!(matches!(
            build_report(&ds, None, &request(q, DisplayUnits::Total)),
            Err(PeerError::Metrics {
                source: MetricsError::MissingValue { .. }
            })
        ));
    }

    #[test]
    fn repeated_reports_agree() {
        let ds = dataset();
        let req = request(payson(), DisplayUnits::Total);
        let first = build_report(&ds, None, &req).unwrap();
        let second = build_report(&ds, None, &req).unwrap();
        assert_eq!(first, second);
        let record = select_district_by_name(&ds, "Payson CUSD 1")[0].clone();
        let metrics = DistrictMetrics::compute(&record).unwrap();
        assert_eq!(
            first["resources"].as_array().map(|l| l.len()),
            Some(metrics.comparison.len())
        );
    }

    #[test]
    fn legislative_view_needs_coverage() {
        let ds = dataset();
        let mut req = request(payson(), DisplayUnits::Total);
        req.legislative = Some(LegislativeQuery::Legislator("John Roe".to_string()));
        assert!(build_report(&ds, None, &req).is_err());
    }
}
