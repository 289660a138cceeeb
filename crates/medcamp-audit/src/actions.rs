//! Action and resource names used in audit events.

pub const CAMP_SCHEDULED: &str = "camp.scheduled";
pub const CAMP_COMPLETED: &str = "camp.completed";
pub const CAMP_CANCELLED: &str = "camp.cancelled";
pub const CAMP_REPORT_STATUS_SET: &str = "camp.report_status_set";

pub const STAFF_REGISTERED: &str = "staff.registered";
pub const CLINIC_BACKFILLED: &str = "clinic.backfilled";

pub const TEST_CREATED: &str = "test.created";
pub const TEST_PAYMENT_UPDATED: &str = "test.payment_updated";
pub const TEST_PATIENT_UPDATED: &str = "test.patient_updated";
pub const TEST_VENDOR_UPDATED: &str = "test.vendor_updated";
pub const TEST_REPORT_UPDATED: &str = "test.report_updated";

pub const SESSION_SIGNED_IN: &str = "session.signed_in";

pub const RESOURCE_CAMP: &str = "camp";
pub const RESOURCE_STAFF: &str = "staff_member";
pub const RESOURCE_CLINIC: &str = "clinic";
pub const RESOURCE_TEST_ENTRY: &str = "test_entry";
pub const RESOURCE_USER: &str = "user";
