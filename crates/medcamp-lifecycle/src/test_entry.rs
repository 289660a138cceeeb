//! Individual test entries: creation and the three gated stages.
//!
//! payment (pending | completed | failed)
//!   -> vendor booking (not_completed -> completed), needs payment completed
//!   -> report (not_submitted -> submitted), needs vendor completed

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use medcamp_core::catalog::{self, CatalogTest};
use medcamp_core::models::test_entry::{
    Gender, PatientDetails, PaymentMode, PaymentStatus, Submitter, TestEntry, TestMetadata,
    TestReportStatus, VendorStatus,
};
use medcamp_core::models::user::Principal;

use crate::codes;
use crate::error::LifecycleError;

pub const FREE_PAYMENT_REFERENCE: &str = "FREE";
pub const CASH_PAYMENT_REFERENCE: &str = "N/A";

/// Patient fields as submitted. Required fields are checked by
/// [`validate_patient`] so that every missing field is reported at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PatientForm {
    pub name: String,
    pub mobile_no: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub address: String,
    pub city: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct PaymentForm {
    pub payment_mode: Option<PaymentMode>,
    pub payment_reference: String,
    pub payment_status: Option<PaymentStatus>,
    pub is_free: bool,
}

/// Input to test entry creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct TestEntryForm {
    #[serde(flatten)]
    pub patient: PatientForm,
    pub test_name: String,
    pub has_partner: bool,
    pub partner_name: String,
    pub partner_reference_id: String,
    #[serde(flatten)]
    pub payment: PaymentForm,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct VendorUpdate {
    pub vendor_status: VendorStatus,
    pub vendor_booking_id: String,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn missing_fields(missing: Vec<&str>) -> LifecycleError {
    LifecycleError::validation(missing.join(", "), "please fill in all required fields")
}

fn missing_patient_fields(form: &PatientForm) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if form.name.trim().is_empty() {
        missing.push("name");
    }
    if form.mobile_no.trim().is_empty() {
        missing.push("mobileNo");
    }
    if form.age.is_none_or(|age| age == 0) {
        missing.push("age");
    }
    if form.gender.is_none() {
        missing.push("gender");
    }
    if form.address.trim().is_empty() {
        missing.push("address");
    }
    missing
}

/// Check name, mobileNo, age, gender and address. All missing fields are
/// named in one error.
pub fn validate_patient(form: &PatientForm) -> Result<PatientDetails, LifecycleError> {
    let missing = missing_patient_fields(form);
    match (form.age, form.gender) {
        (Some(age), Some(gender)) if missing.is_empty() => Ok(PatientDetails {
            name: form.name.trim().to_string(),
            mobile_no: form.mobile_no.trim().to_string(),
            age,
            gender,
            address: form.address.trim().to_string(),
            city: form.city.trim().to_string(),
            district: form.district.trim().to_string(),
            state: form.state.trim().to_string(),
            pincode: form.pincode.trim().to_string(),
        }),
        _ => Err(missing_fields(missing)),
    }
}

fn validate_entry(form: &TestEntryForm) -> Result<(PatientDetails, &'static CatalogTest), LifecycleError> {
    let test_name = form.test_name.trim();

    let mut missing = missing_patient_fields(&form.patient);
    if test_name.is_empty() {
        missing.push("testName");
    }
    if !missing.is_empty() {
        return Err(missing_fields(missing));
    }

    let test = catalog::lookup(test_name).ok_or_else(|| {
        LifecycleError::validation("testName", format!("unknown test {test_name:?}"))
    })?;
    Ok((validate_patient(&form.patient)?, test))
}

/// Build a new entry. `test_code` comes from [`codes::test_code`].
pub fn create(
    form: &TestEntryForm,
    test_code: String,
    principal: &Principal,
    now: Timestamp,
) -> Result<TestEntry, LifecycleError> {
    let (patient, test) = validate_entry(form)?;

    let mut entry = TestEntry {
        patient,
        booking_id: codes::booking_id(&test_code),
        test_code,
        test_name: test.name.to_string(),
        price: test.price,
        has_partner: form.has_partner,
        partner_name: form.has_partner.then(|| non_empty(&form.partner_name)).flatten(),
        partner_reference_id: form
            .has_partner
            .then(|| non_empty(&form.partner_reference_id))
            .flatten(),
        payment_mode: None,
        payment_reference: None,
        payment_status: PaymentStatus::Pending,
        is_free: false,
        vendor_status: VendorStatus::NotCompleted,
        vendor_booking_id: None,
        report_status: TestReportStatus::NotSubmitted,
        submitter: Submitter {
            email: principal.email.clone(),
            uid: principal.uid.clone(),
            submitted_at: now,
        },
        metadata: TestMetadata::new(now),
    };

    apply_payment_fields(&mut entry, &form.payment)?;
    if form.payment.is_free || form.payment.payment_status.is_some() {
        entry.metadata.payment_status_updated_at = Some(now);
        entry.metadata.payment_status_updated_by = Some(principal.email.clone());
    }
    Ok(entry)
}

// `is_free` wins over everything else and sets the whole free triple.
fn apply_payment_fields(entry: &mut TestEntry, payment: &PaymentForm) -> Result<(), LifecycleError> {
    if payment.is_free {
        entry.is_free = true;
        entry.payment_mode = Some(PaymentMode::Free);
        entry.payment_status = PaymentStatus::Completed;
        entry.payment_reference = Some(FREE_PAYMENT_REFERENCE.to_string());
        return Ok(());
    }

    if payment.payment_mode == Some(PaymentMode::Free) {
        return Err(LifecycleError::validation(
            "paymentMode",
            "free mode is set by marking the test as free",
        ));
    }

    let status = payment.payment_status.unwrap_or(entry.payment_status);
    let reference = match payment.payment_mode {
        Some(PaymentMode::Cash) => Some(CASH_PAYMENT_REFERENCE.to_string()),
        _ => non_empty(&payment.payment_reference),
    };
    if status == PaymentStatus::Completed && payment.payment_mode.is_none() {
        return Err(LifecycleError::validation(
            "paymentMode",
            "is required for a completed payment",
        ));
    }
    if status == PaymentStatus::Completed && reference.is_none() {
        return Err(LifecycleError::validation(
            "paymentReference",
            "is required for a completed payment",
        ));
    }

    entry.is_free = false;
    entry.payment_mode = payment.payment_mode;
    entry.payment_reference = reference;
    entry.payment_status = status;
    Ok(())
}

/// Edit payment details. Allowed until the vendor stage completes. The
/// free/paid choice is fixed at creation, and a completed payment cannot be
/// moved back to pending or failed.
pub fn update_payment(
    entry: &mut TestEntry,
    payment: &PaymentForm,
    actor: &str,
    now: Timestamp,
) -> Result<(), LifecycleError> {
    if entry.vendor_status == VendorStatus::Completed {
        return Err(LifecycleError::precondition(format!(
            "payment of {} can no longer be edited after vendor booking",
            entry.test_code
        )));
    }
    if payment.is_free != entry.is_free {
        return Err(LifecycleError::precondition(format!(
            "free/paid selection of {} is fixed at creation",
            entry.test_code
        )));
    }
    if entry.payment_status == PaymentStatus::Completed
        && payment
            .payment_status
            .is_some_and(|status| status != PaymentStatus::Completed)
    {
        return Err(LifecycleError::precondition(format!(
            "payment of {} is completed and cannot be reverted",
            entry.test_code
        )));
    }

    apply_payment_fields(entry, payment)?;
    entry.metadata.payment_status_updated_at = Some(now);
    entry.metadata.payment_status_updated_by = Some(actor.to_string());
    entry.metadata.last_modified = now;
    Ok(())
}

/// Edit patient details. Frozen once payment completes.
pub fn update_patient(
    entry: &mut TestEntry,
    form: &PatientForm,
    now: Timestamp,
) -> Result<(), LifecycleError> {
    if entry.payment_status == PaymentStatus::Completed {
        return Err(LifecycleError::precondition(format!(
            "patient details of {} are locked after payment",
            entry.test_code
        )));
    }

    entry.patient = validate_patient(form)?;
    entry.metadata.last_modified = now;
    Ok(())
}

/// Record vendor booking. Needs a completed payment; write-once.
pub fn update_vendor(
    entry: &mut TestEntry,
    update: &VendorUpdate,
    actor: &str,
    now: Timestamp,
) -> Result<(), LifecycleError> {
    if entry.payment_status != PaymentStatus::Completed {
        return Err(LifecycleError::precondition(format!(
            "payment of {} must be completed before vendor booking",
            entry.test_code
        )));
    }
    if entry.vendor_status == VendorStatus::Completed {
        return Err(LifecycleError::precondition(format!(
            "vendor booking of {} is already completed",
            entry.test_code
        )));
    }

    let booking_id = non_empty(&update.vendor_booking_id);
    if update.vendor_status == VendorStatus::Completed && booking_id.is_none() {
        return Err(LifecycleError::validation(
            "vendorBookingId",
            "is required to complete vendor booking",
        ));
    }

    entry.vendor_status = update.vendor_status;
    entry.vendor_booking_id = booking_id.or(entry.vendor_booking_id.take());
    entry.metadata.vendor_status_updated_at = Some(now);
    entry.metadata.vendor_status_updated_by = Some(actor.to_string());
    entry.metadata.last_modified = now;
    Ok(())
}

/// Mark the report submitted. Needs a completed vendor booking; write-once.
pub fn update_report(
    entry: &mut TestEntry,
    report_status: TestReportStatus,
    actor: &str,
    now: Timestamp,
) -> Result<(), LifecycleError> {
    if entry.vendor_status != VendorStatus::Completed {
        return Err(LifecycleError::precondition(format!(
            "vendor booking of {} must be completed before the report",
            entry.test_code
        )));
    }
    if entry.report_status == TestReportStatus::Submitted {
        return Err(LifecycleError::precondition(format!(
            "report of {} is already submitted",
            entry.test_code
        )));
    }

    entry.report_status = report_status;
    entry.metadata.report_status_updated_at = Some(now);
    entry.metadata.report_status_updated_by = Some(actor.to_string());
    entry.metadata.last_modified = now;
    Ok(())
}
