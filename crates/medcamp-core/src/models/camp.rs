use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::staff::StaffAssignment;
use crate::error::CoreError;

/// One scheduled community health camp.
///
/// Financial, partner, vendor and phlebotomist fields stay empty until the
/// camp is completed. `camp_code` never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Camp {
    pub camp_code: String,
    pub date: jiff::civil::Date,
    pub clinic_code: String,

    // Location
    pub address: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
    pub mobile_no: String,

    #[serde(flatten)]
    pub staff: StaffAssignment,

    pub status: CampStatus,

    // Financials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_sold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid_to_finance: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_expense: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_expense: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    // Partner adjustment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_type: Option<PartnerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_adjusted_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_adjustment_amount: Option<u64>,

    // Vendor / phlebotomist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phlebo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phlebo_mobile_no: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status: Option<CampReportStatus>,

    // Audit
    pub created_by: String,
    pub created_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<jiff::Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status_updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status_updated_at: Option<jiff::Timestamp>,
    pub last_modified: jiff::Timestamp,
}

impl Camp {
    /// Partner adjustment is recorded only when the camp was completed with
    /// a partner.
    pub fn has_partner_adjustment(&self) -> bool {
        self.partner_type.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CampStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl CampStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CampStatus::Scheduled => "scheduled",
            CampStatus::Completed => "completed",
            CampStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CampStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report delivery outcome, written once after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CampReportStatus {
    Sent,
    NotSent,
}

impl CampReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CampReportStatus::Sent => "sent",
            CampReportStatus::NotSent => "not_sent",
        }
    }
}

impl fmt::Display for CampReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partner organisations whose camps carry a price tier and a per-test
/// adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PartnerType {
    #[serde(rename = "PAHAL")]
    Pahal,
    #[serde(rename = "HUMANA")]
    Humana,
}

impl PartnerType {
    pub fn as_str(self) -> &'static str {
        match self {
            PartnerType::Pahal => "PAHAL",
            PartnerType::Humana => "HUMANA",
        }
    }
}

impl fmt::Display for PartnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartnerType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PAHAL" => Ok(PartnerType::Pahal),
            "HUMANA" => Ok(PartnerType::Humana),
            _ => Err(CoreError::UnknownPartnerType(s.to_string())),
        }
    }
}

/// Form input for an optional partner. Forms send `""` when no partner is
/// selected, so a blank string reads as `None`.
pub fn optional_partner_type<'de, D>(deserializer: D) -> Result<Option<PartnerType>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
