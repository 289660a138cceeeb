use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::staff::StaffAssignment;

/// Latest location and staff data seen for a clinic code.
///
/// Overwritten every time a camp is scheduled for the clinic and read back
/// to prefill the next scheduling form. Not audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Clinic {
    pub clinic_code: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
    pub mobile_no: String,
    #[serde(flatten)]
    pub staff: StaffAssignment,
    pub last_updated: jiff::Timestamp,
}
