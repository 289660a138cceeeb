//! Document store key conventions.
//!
//! Plain string functions that define where each record lives in the store.

use uuid::Uuid;

use crate::models::staff::StaffRole;

pub const HEALTH_CAMPS_PREFIX: &str = "healthCamps/";

pub const CLINICS_PREFIX: &str = "clinics/";

pub const STAFF_DATA_PREFIX: &str = "staffData/";

pub const STAFF_FLATTENED_PREFIX: &str = "staffFlattened/";

pub const TEST_ENTRIES_PREFIX: &str = "testEntries/";

pub const USERS_PREFIX: &str = "users/";

pub const CAMP_CODES_PREFIX: &str = "campCodes/";

pub fn health_camp(key: &str) -> String {
    format!("{HEALTH_CAMPS_PREFIX}{key}")
}

/// Clinic codes are stored upper-cased.
pub fn clinic(clinic_code: &str) -> String {
    format!("{CLINICS_PREFIX}{}", clinic_code.trim().to_ascii_uppercase())
}

pub fn staff_role_prefix(role: StaffRole) -> String {
    format!("{STAFF_DATA_PREFIX}{}/", role.partition())
}

pub fn staff_by_role(role: StaffRole, emp_code: &str) -> String {
    format!("{}{emp_code}", staff_role_prefix(role))
}

pub fn staff_flattened(emp_code: &str) -> String {
    format!("{STAFF_FLATTENED_PREFIX}{emp_code}")
}

/// Create-only marker that reserves a camp code.
pub fn camp_code(code: &str) -> String {
    format!("{CAMP_CODES_PREFIX}{code}")
}

pub fn test_entry(key: &str) -> String {
    format!("{TEST_ENTRIES_PREFIX}{key}")
}

pub fn user(uid: &str) -> String {
    format!("{USERS_PREFIX}{uid}")
}

/// Generate a fresh record key for a camp or test entry.
pub fn new_record_key() -> String {
    Uuid::new_v4().to_string()
}

/// The record key of a full store path under `prefix`, if it is a direct child.
pub fn record_key<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && !rest.contains('/'))
}
