//! Read-side views over the full camp and test collections: status boards,
//! code search, and record-table filters.

use std::collections::BTreeSet;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use medcamp_core::models::camp::{Camp, CampReportStatus, CampStatus};
use medcamp_core::models::test_entry::{PaymentStatus, TestEntry, TestReportStatus, VendorStatus};

/// Minimum query length before camp code suggestions are offered.
pub const MIN_SUGGEST_LEN: usize = 3;
pub const MAX_SUGGESTIONS: usize = 5;

/// A record together with its store key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyed<T> {
    pub key: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Keyed<T> {
    pub fn new(key: impl Into<String>, record: T) -> Self {
        Self {
            key: key.into(),
            record,
        }
    }
}

// ---------------------------------------------------------------------------
// Camp board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CampTab {
    Incomplete,
    PendingClosure,
    Closed,
}

impl CampTab {
    pub fn label(self) -> &'static str {
        match self {
            CampTab::Incomplete => "Scheduled Camps",
            CampTab::PendingClosure => "Report Pending",
            CampTab::Closed => "Closed",
        }
    }

    fn contains(self, camp: &Camp) -> bool {
        match self {
            CampTab::Incomplete => camp.status == CampStatus::Scheduled,
            CampTab::PendingClosure => {
                camp.status == CampStatus::Completed && camp.report_status.is_none()
            }
            CampTab::Closed => {
                camp.status == CampStatus::Completed
                    && camp.report_status == Some(CampReportStatus::Sent)
            }
        }
    }
}

/// Which workflow screen the board is shown on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BoardContext {
    Schedule,
    Complete,
    Close,
    #[default]
    All,
}

impl BoardContext {
    pub fn tabs(self) -> &'static [CampTab] {
        match self {
            BoardContext::Schedule => &[CampTab::Incomplete],
            BoardContext::Complete => &[CampTab::Incomplete, CampTab::PendingClosure],
            BoardContext::Close => &[CampTab::PendingClosure, CampTab::Closed],
            BoardContext::All => &[CampTab::Incomplete, CampTab::PendingClosure, CampTab::Closed],
        }
    }

    pub fn default_tab(self) -> CampTab {
        match self {
            BoardContext::Close => CampTab::PendingClosure,
            _ => CampTab::Incomplete,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardTab<K, T> {
    pub tab: K,
    pub label: &'static str,
    pub count: usize,
    pub records: Vec<Keyed<T>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampBoard {
    pub default_tab: CampTab,
    pub tabs: Vec<BoardTab<CampTab, Camp>>,
}

/// Group camps into workflow tabs, newest camp date first. Cancelled camps
/// appear on no tab.
pub fn camp_board(camps: &[Keyed<Camp>], context: BoardContext) -> CampBoard {
    let mut sorted: Vec<&Keyed<Camp>> = camps
        .iter()
        .filter(|camp| camp.record.status != CampStatus::Cancelled)
        .collect();
    sorted.sort_by(|a, b| b.record.date.cmp(&a.record.date));

    let tabs = context
        .tabs()
        .iter()
        .map(|&tab| {
            let records: Vec<Keyed<Camp>> = sorted
                .iter()
                .filter(|camp| tab.contains(&camp.record))
                .map(|&camp| camp.clone())
                .collect();
            BoardTab {
                tab,
                label: tab.label(),
                count: records.len(),
                records,
            }
        })
        .collect();

    CampBoard {
        default_tab: context.default_tab(),
        tabs,
    }
}

// ---------------------------------------------------------------------------
// Test board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TestTab {
    Incomplete,
    PendingVendor,
    PendingReport,
    Completed,
}

impl TestTab {
    pub const ALL: [TestTab; 4] = [
        TestTab::Incomplete,
        TestTab::PendingVendor,
        TestTab::PendingReport,
        TestTab::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TestTab::Incomplete => "Incomplete",
            TestTab::PendingVendor => "Pending Vendor",
            TestTab::PendingReport => "Pending Report",
            TestTab::Completed => "Completed",
        }
    }

    pub fn of(entry: &TestEntry) -> TestTab {
        match (entry.payment_status, entry.vendor_status, entry.report_status) {
            (PaymentStatus::Pending | PaymentStatus::Failed, _, _) => TestTab::Incomplete,
            (PaymentStatus::Completed, VendorStatus::NotCompleted, _) => TestTab::PendingVendor,
            (PaymentStatus::Completed, VendorStatus::Completed, TestReportStatus::NotSubmitted) => {
                TestTab::PendingReport
            }
            (PaymentStatus::Completed, VendorStatus::Completed, TestReportStatus::Submitted) => {
                TestTab::Completed
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestBoard {
    pub tabs: Vec<BoardTab<TestTab, TestEntry>>,
}

/// Group entries by their furthest completed stage, newest first.
pub fn test_board(entries: &[Keyed<TestEntry>]) -> TestBoard {
    let mut sorted: Vec<&Keyed<TestEntry>> = entries.iter().collect();
    sorted.sort_by(|a, b| b.record.metadata.created_at.cmp(&a.record.metadata.created_at));

    let tabs = TestTab::ALL
        .into_iter()
        .map(|tab| {
            let records: Vec<Keyed<TestEntry>> = sorted
                .iter()
                .filter(|entry| TestTab::of(&entry.record) == tab)
                .map(|&entry| entry.clone())
                .collect();
            BoardTab {
                tab,
                label: tab.label(),
                count: records.len(),
                records,
            }
        })
        .collect();

    TestBoard { tabs }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Exact camp code lookup, ignoring case.
pub fn find_camp_by_code<'a>(camps: &'a [Keyed<Camp>], code: &str) -> Option<&'a Keyed<Camp>> {
    let code = code.trim();
    camps
        .iter()
        .find(|camp| camp.record.camp_code.eq_ignore_ascii_case(code))
}

/// Camp codes containing `partial`, once at least three characters are typed.
pub fn suggest_camps<'a>(
    camps: &'a [Keyed<Camp>],
    partial: &str,
    exclude_completed: bool,
) -> Vec<&'a Keyed<Camp>> {
    let needle = partial.trim().to_uppercase();
    if needle.chars().count() < MIN_SUGGEST_LEN {
        return Vec::new();
    }

    camps
        .iter()
        .filter(|camp| !(exclude_completed && camp.record.status == CampStatus::Completed))
        .filter(|camp| camp.record.camp_code.to_uppercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Exact test code lookup, ignoring case.
pub fn find_test_by_code<'a>(
    entries: &'a [Keyed<TestEntry>],
    code: &str,
) -> Option<&'a Keyed<TestEntry>> {
    let code = code.trim();
    entries
        .iter()
        .find(|entry| entry.record.test_code.eq_ignore_ascii_case(code))
}

/// Substring match over test code, patient name and booking id.
pub fn search_tests<'a>(entries: &'a [Keyed<TestEntry>], query: &str) -> Vec<&'a Keyed<TestEntry>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|entry| {
            let record = &entry.record;
            record.test_code.to_lowercase().contains(&needle)
                || record.patient.name.to_lowercase().contains(&needle)
                || record.booking_id.to_lowercase().contains(&needle)
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

// ---------------------------------------------------------------------------
// Record tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CampFilter {
    pub camp_code: Option<String>,
    pub clinic_code: Option<String>,
    pub date: Option<Date>,
    pub status: Option<CampStatus>,
}

impl CampFilter {
    pub fn matches(&self, camp: &Camp) -> bool {
        eq_ignore_case(self.camp_code.as_deref(), &camp.camp_code)
            && eq_ignore_case(self.clinic_code.as_deref(), &camp.clinic_code)
            && self.date.is_none_or(|date| date == camp.date)
            && self.status.is_none_or(|status| status == camp.status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct TestFilter {
    pub test_code: Option<String>,
    pub test_name: Option<String>,
    pub submitted_date: Option<Date>,
    pub report_status: Option<TestReportStatus>,
    pub vendor_status: Option<VendorStatus>,
}

impl TestFilter {
    pub fn matches(&self, entry: &TestEntry) -> bool {
        eq_ignore_case(self.test_code.as_deref(), &entry.test_code)
            && eq_ignore_case(self.test_name.as_deref(), &entry.test_name)
            && self
                .submitted_date
                .is_none_or(|date| date == utc_date(entry.submitter.submitted_at))
            && self.report_status.is_none_or(|status| status == entry.report_status)
            && self.vendor_status.is_none_or(|status| status == entry.vendor_status)
    }
}

fn eq_ignore_case(wanted: Option<&str>, actual: &str) -> bool {
    wanted
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .is_none_or(|w| w.eq_ignore_ascii_case(actual))
}

/// Calendar date of a timestamp, in UTC.
pub fn utc_date(ts: Timestamp) -> Date {
    ts.to_zoned(TimeZone::UTC).date()
}

pub fn filter_camps<'a>(camps: &'a [Keyed<Camp>], filter: &CampFilter) -> Vec<&'a Keyed<Camp>> {
    camps.iter().filter(|camp| filter.matches(&camp.record)).collect()
}

pub fn filter_tests<'a>(
    entries: &'a [Keyed<TestEntry>],
    filter: &TestFilter,
) -> Vec<&'a Keyed<TestEntry>> {
    entries
        .iter()
        .filter(|entry| filter.matches(&entry.record))
        .collect()
}

/// Distinct values for each camp filter column, sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CampFilterOptions {
    pub camp_codes: Vec<String>,
    pub clinic_codes: Vec<String>,
    pub dates: Vec<Date>,
    pub statuses: Vec<CampStatus>,
}

pub fn camp_filter_options(camps: &[Keyed<Camp>]) -> CampFilterOptions {
    let records = || camps.iter().map(|camp| &camp.record);
    CampFilterOptions {
        camp_codes: distinct(records().map(|c| c.camp_code.clone())),
        clinic_codes: distinct(records().map(|c| c.clinic_code.clone())),
        dates: distinct(records().map(|c| c.date)),
        statuses: distinct(records().map(|c| c.status)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TestFilterOptions {
    pub test_codes: Vec<String>,
    pub test_names: Vec<String>,
    pub submitted_dates: Vec<Date>,
    pub report_statuses: Vec<TestReportStatus>,
    pub vendor_statuses: Vec<VendorStatus>,
}

pub fn test_filter_options(entries: &[Keyed<TestEntry>]) -> TestFilterOptions {
    let records = || entries.iter().map(|entry| &entry.record);
    TestFilterOptions {
        test_codes: distinct(records().map(|e| e.test_code.clone())),
        test_names: distinct(records().map(|e| e.test_name.clone())),
        submitted_dates: distinct(records().map(|e| utc_date(e.submitter.submitted_at))),
        report_statuses: distinct(records().map(|e| e.report_status)),
        vendor_statuses: distinct(records().map(|e| e.vendor_status)),
    }
}

fn distinct<T: Ord>(values: impl Iterator<Item = T>) -> Vec<T> {
    values.collect::<BTreeSet<_>>().into_iter().collect()
}

/// Filtered rows plus the selector values for every filter column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTable<T, O> {
    pub records: Vec<Keyed<T>>,
    pub options: O,
}
