use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One individual diagnostic test booking.
///
/// Progresses through three gated stages: payment, vendor booking, report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TestEntry {
    #[serde(flatten)]
    pub patient: PatientDetails,

    // Test identity, derived from the catalog at creation
    pub test_code: String,
    pub test_name: String,
    pub price: u64,
    pub booking_id: String,

    #[serde(default)]
    pub has_partner: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_reference_id: Option<String>,

    // Payment stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub is_free: bool,

    // Vendor stage
    #[serde(default)]
    pub vendor_status: VendorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_booking_id: Option<String>,

    // Report stage
    #[serde(default)]
    pub report_status: TestReportStatus,

    pub submitter: Submitter,
    pub metadata: TestMetadata,
}

/// Patient fields. Frozen once payment completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PatientDetails {
    pub name: String,
    pub mobile_no: String,
    pub age: u32,
    pub gender: Gender,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PaymentMode {
    Cash,
    /// Prepaid via UPI.
    Upi,
    Free,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VendorStatus {
    #[default]
    NotCompleted,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TestReportStatus {
    #[default]
    NotSubmitted,
    Submitted,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        })
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VendorStatus::NotCompleted => "not_completed",
            VendorStatus::Completed => "completed",
        })
    }
}

impl fmt::Display for TestReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestReportStatus::NotSubmitted => "not_submitted",
            TestReportStatus::Submitted => "submitted",
        })
    }
}

/// Who submitted the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Submitter {
    pub email: String,
    pub uid: String,
    pub submitted_at: jiff::Timestamp,
}

/// Creation time plus one updated-at/updated-by stamp per stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TestMetadata {
    pub created_at: jiff::Timestamp,
    pub last_modified: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status_updated_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status_updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_status_updated_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_status_updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status_updated_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status_updated_by: Option<String>,
}

impl TestMetadata {
    pub fn new(now: jiff::Timestamp) -> Self {
        Self {
            created_at: now,
            last_modified: now,
            payment_status_updated_at: None,
            payment_status_updated_by: None,
            vendor_status_updated_at: None,
            vendor_status_updated_by: None,
            report_status_updated_at: None,
            report_status_updated_by: None,
        }
    }
}
