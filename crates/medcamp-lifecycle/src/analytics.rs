//! Dashboard aggregates, recomputed from the full record set on each request.

use std::collections::{BTreeMap, BTreeSet};

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use medcamp_core::models::camp::{Camp, CampStatus};
use medcamp_core::models::test_entry::{TestEntry, TestReportStatus, VendorStatus};

/// A camp with at least this many units sold counts as successful.
pub const SUCCESS_THRESHOLD: u32 = 35;
/// Upper bound (exclusive) of the lowest units-sold bucket.
pub const LOW_UNITS_THRESHOLD: u32 = 25;
/// Number of completed camps in the performance series.
pub const PERFORMANCE_WINDOW: usize = 50;

/// Value meaning "no filter" in dashboard selectors.
pub const ALL: &str = "all";

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CampDashboardFilter {
    pub state: Option<String>,
    pub district: Option<String>,
}

impl CampDashboardFilter {
    pub fn matches(&self, camp: &Camp) -> bool {
        selects(self.state.as_deref(), &camp.state) && selects(self.district.as_deref(), &camp.district)
    }
}

fn selects(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(w) if w.eq_ignore_ascii_case(ALL) => true,
        Some(w) => w.eq_ignore_ascii_case(actual.trim()),
    }
}

/// A labelled count, as drawn in a pie or bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Slice {
    pub name: String,
    pub value: u64,
}

impl Slice {
    fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PerformancePoint {
    pub label: String,
    pub camp_code: String,
    pub date: Date,
    pub units_sold: u32,
    pub is_successful: bool,
    pub nurse_name: String,
    pub marketing_expense: u64,
    pub operational_expense: u64,
    pub report_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CampMetrics {
    pub total_camps: u64,
    pub total_tests: u64,
    pub total_revenue: u64,
    pub current_month_camps: u64,
    pub current_month_tests: u64,
    pub current_month_revenue: u64,
    pub average_units_sold: f64,
    pub success_rate: f64,
    pub successful_camps: u64,
    pub unsuccessful_camps: u64,
    pub units_sold_ranges: Vec<Slice>,
    pub success_split: Vec<Slice>,
    pub performance: Vec<PerformancePoint>,
}

/// Aggregate camps matching `filter`. Cancelled camps are left out; camps
/// not yet completed count with zero units and revenue. `today` decides the
/// current month.
pub fn camp_metrics(camps: &[Camp], filter: &CampDashboardFilter, today: Date) -> CampMetrics {
    let selected: Vec<&Camp> = camps
        .iter()
        .filter(|camp| camp.status != CampStatus::Cancelled && filter.matches(camp))
        .collect();

    let units = |camp: &Camp| camp.units_sold.unwrap_or(0);
    let revenue = |camp: &Camp| camp.revenue.unwrap_or(0);
    let in_current_month =
        |camp: &Camp| camp.date.year() == today.year() && camp.date.month() == today.month();

    let total_camps = selected.len() as u64;
    let total_tests: u64 = selected.iter().map(|c| u64::from(units(c))).sum();
    let total_revenue: u64 = selected.iter().map(|c| revenue(c)).sum();

    let current: Vec<&Camp> = selected.iter().copied().filter(|c| in_current_month(c)).collect();

    let successful_camps = selected.iter().filter(|c| units(c) >= SUCCESS_THRESHOLD).count() as u64;
    let unsuccessful_camps = total_camps - successful_camps;
    let below = selected.iter().filter(|c| units(c) < LOW_UNITS_THRESHOLD).count() as u64;

    CampMetrics {
        total_camps,
        total_tests,
        total_revenue,
        current_month_camps: current.len() as u64,
        current_month_tests: current.iter().map(|c| u64::from(units(c))).sum(),
        current_month_revenue: current.iter().map(|c| revenue(c)).sum(),
        average_units_sold: ratio(total_tests as f64, total_camps as f64),
        success_rate: ratio(successful_camps as f64 * 100.0, total_camps as f64),
        successful_camps,
        unsuccessful_camps,
        units_sold_ranges: vec![
            Slice::new("Below 25", below),
            Slice::new("25-34", total_camps - below - successful_camps),
            Slice::new("35 & Above", successful_camps),
        ],
        success_split: vec![
            Slice::new("Successful", successful_camps),
            Slice::new("Unsuccessful", unsuccessful_camps),
        ],
        performance: performance_series(&selected),
    }
}

// Latest completed camps by date, oldest first.
fn performance_series(camps: &[&Camp]) -> Vec<PerformancePoint> {
    let mut completed: Vec<&Camp> = camps
        .iter()
        .copied()
        .filter(|camp| camp.status == CampStatus::Completed)
        .collect();
    completed.sort_by(|a, b| b.date.cmp(&a.date));
    completed.truncate(PERFORMANCE_WINDOW);
    completed.reverse();

    completed
        .into_iter()
        .enumerate()
        .map(|(i, camp)| {
            let units_sold = camp.units_sold.unwrap_or(0);
            PerformancePoint {
                label: format!("Camp {}", i + 1),
                camp_code: camp.camp_code.clone(),
                date: camp.date,
                units_sold,
                is_successful: units_sold >= SUCCESS_THRESHOLD,
                nurse_name: camp.staff.nurse_name.clone(),
                marketing_expense: camp.marketing_expense.unwrap_or(0),
                operational_expense: camp.operational_expense.unwrap_or(0),
                report_status: camp
                    .report_status
                    .map_or_else(|| "pending".to_string(), |s| s.to_string()),
            }
        })
        .collect()
}

/// Rounded to one decimal place; zero when there is nothing to divide.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    (numerator / denominator * 10.0).round() / 10.0
}

/// Selector values for the camp dashboard: every state, and the districts
/// of the selected state (all districts when no state is selected).
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CampDashboardOptions {
    pub states: Vec<String>,
    pub districts: Vec<String>,
}

pub fn camp_dashboard_options(camps: &[Camp], state: Option<&str>) -> CampDashboardOptions {
    let states: BTreeSet<String> = camps
        .iter()
        .map(|camp| camp.state.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let districts: BTreeSet<String> = camps
        .iter()
        .filter(|camp| selects(state, &camp.state))
        .map(|camp| camp.district.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();

    CampDashboardOptions {
        states: states.into_iter().collect(),
        districts: districts.into_iter().collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TestMetrics {
    pub total_tests: u64,
    pub total_revenue: u64,
    pub pending_reports: u64,
    pub completed_tests: u64,
    pub test_distribution: Vec<Slice>,
    pub revenue_by_test: Vec<Slice>,
    pub status_distribution: Vec<Slice>,
    pub partner_distribution: Vec<Slice>,
    pub test_names: Vec<String>,
}

/// Aggregate test entries, optionally restricted to one test name.
pub fn test_metrics(entries: &[TestEntry], test_name: Option<&str>) -> TestMetrics {
    let selected: Vec<&TestEntry> = entries
        .iter()
        .filter(|entry| selects(test_name, &entry.test_name))
        .collect();

    let total_tests = selected.len() as u64;
    let total_revenue: u64 = selected.iter().map(|e| e.price).sum();
    let pending_reports = selected
        .iter()
        .filter(|e| e.report_status == TestReportStatus::NotSubmitted)
        .count() as u64;
    let completed_tests = selected
        .iter()
        .filter(|e| {
            e.vendor_status == VendorStatus::Completed
                && e.report_status == TestReportStatus::Submitted
        })
        .count() as u64;

    let mut by_name: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for entry in &selected {
        let slot = by_name.entry(entry.test_name.as_str()).or_default();
        slot.0 += 1;
        slot.1 += entry.price;
    }

    let with_partner = selected.iter().filter(|e| e.has_partner).count() as u64;

    TestMetrics {
        total_tests,
        total_revenue,
        pending_reports,
        completed_tests,
        test_distribution: by_name
            .iter()
            .map(|(name, (count, _))| Slice::new(*name, *count))
            .collect(),
        revenue_by_test: by_name
            .iter()
            .map(|(name, (_, revenue))| Slice::new(*name, *revenue))
            .collect(),
        status_distribution: vec![
            Slice::new("Completed", completed_tests),
            Slice::new("Pending Reports", pending_reports),
            Slice::new(
                "In Progress",
                total_tests.saturating_sub(completed_tests + pending_reports),
            ),
        ],
        partner_distribution: vec![
            Slice::new("Partner", with_partner),
            Slice::new("Direct", total_tests - with_partner),
        ],
        test_names: entries
            .iter()
            .map(|e| e.test_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    }
}
