//! Camp scheduling validation and the camp state machine.
//!
//! ```text
//! scheduled --complete--> completed --report--> completed + sent|not_sent
//!     \
//!      --cancel--> cancelled
//! ```
//!
//! Every function here is pure: it checks the transition against the
//! current record and mutates it in place. Persistence is the engine's job.

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use medcamp_core::models::camp::{Camp, CampReportStatus, CampStatus, PartnerType, optional_partner_type};
use medcamp_core::models::staff::{StaffAssignment, StaffEntry, StaffRole};

use crate::error::LifecycleError;
use crate::financial::{self, ReconciliationInput};

/// Input to the schedule transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CampForm {
    pub date: Option<Date>,
    pub clinic_code: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
    pub mobile_no: String,
    #[serde(flatten)]
    pub staff: StaffAssignment,
}

/// A parsed staff reference from the scheduling form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRef {
    pub role: StaffRole,
    pub name: String,
    pub code: String,
}

/// A scheduling form that passed validation, normalized for storage.
#[derive(Debug, Clone)]
pub struct ValidatedCamp {
    pub date: Date,
    pub clinic_code: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub pin_code: String,
    pub mobile_no: String,
    pub staff: StaffAssignment,
    pub staff_refs: Vec<StaffRef>,
}

impl ValidatedCamp {
    pub fn into_camp(self, camp_code: String, created_by: &str, now: Timestamp) -> Camp {
        Camp {
            camp_code,
            date: self.date,
            clinic_code: self.clinic_code,
            address: self.address,
            district: self.district,
            state: self.state,
            pin_code: self.pin_code,
            mobile_no: self.mobile_no,
            staff: self.staff,
            status: CampStatus::Scheduled,
            units_sold: None,
            revenue: None,
            amount_paid_to_finance: None,
            marketing_expense: None,
            operational_expense: None,
            transaction_id: None,
            partner_type: None,
            partner_name: None,
            partner_adjusted_count: None,
            partner_adjustment_amount: None,
            vendor_name: None,
            phlebo_name: None,
            phlebo_mobile_no: None,
            report_status: None,
            created_by: created_by.to_string(),
            created_at: now,
            completed_by: None,
            completed_at: None,
            cancelled_by: None,
            cancelled_at: None,
            report_status_updated_by: None,
            report_status_updated_at: None,
            last_modified: now,
        }
    }
}

pub fn is_pin_code(value: &str) -> bool {
    value.len() == 6 && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_mobile_no(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}

fn required(field: &str, value: &str) -> Result<String, LifecycleError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LifecycleError::validation(field, "is required"));
    }
    Ok(value.to_uppercase())
}

/// Validate a scheduling form. Fails on the first missing or malformed
/// field, in form order.
pub fn validate_schedule(form: &CampForm) -> Result<ValidatedCamp, LifecycleError> {
    let date = form
        .date
        .ok_or_else(|| LifecycleError::validation("date", "is required"))?;
    let clinic_code = required("clinicCode", &form.clinic_code)?;
    let address = required("address", &form.address)?;
    let district = required("district", &form.district)?;
    let state = required("state", &form.state)?;

    let pin_code = required("pinCode", &form.pin_code)?;
    if !is_pin_code(&pin_code) {
        return Err(LifecycleError::validation("pinCode", "must be 6 digits"));
    }
    let mobile_no = required("mobileNo", &form.mobile_no)?;
    if !is_mobile_no(&mobile_no) {
        return Err(LifecycleError::validation("mobileNo", "must be 10 digits"));
    }

    let mut staff = StaffAssignment::default();
    let mut staff_refs = Vec::with_capacity(StaffRole::ALL.len());
    for (role, value) in form.staff.iter() {
        let value = required(role.field(), value)?;
        let StaffEntry::Valid { name, code } = StaffEntry::parse(&value) else {
            return Err(LifecycleError::validation(role.field(), "must be in the form NAME (CODE)"));
        };
        *staff_mut(&mut staff, role) = format!("{name} ({code})");
        staff_refs.push(StaffRef { role, name, code });
    }

    Ok(ValidatedCamp {
        date,
        clinic_code,
        address,
        district,
        state,
        pin_code,
        mobile_no,
        staff,
        staff_refs,
    })
}

fn staff_mut(staff: &mut StaffAssignment, role: StaffRole) -> &mut String {
    match role {
        StaffRole::Nurse => &mut staff.nurse_name,
        StaffRole::TeamLeader => &mut staff.team_leader,
        StaffRole::DistrictCoordinator => &mut staff.dc_name,
        StaffRole::Agent => &mut staff.agent_name,
        StaffRole::RegionalOfficer => &mut staff.ro_name,
        StaffRole::SalesOfficerManager => &mut staff.som_name,
    }
}

/// Input to the complete transition. Revenue and partner adjustment are not
/// accepted from the caller; they are derived from units and partner inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CompletionForm {
    pub units_sold: Option<u32>,
    pub amount_paid_to_finance: Option<u64>,
    pub marketing_expense: Option<u64>,
    pub operational_expense: Option<u64>,
    pub transaction_id: String,
    #[serde(deserialize_with = "optional_partner_type")]
    pub partner_type: Option<PartnerType>,
    pub partner_name: String,
    pub partner_adjusted_count: Option<u32>,
    pub vendor_name: String,
    pub phlebo_name: String,
    pub phlebo_mobile_no: String,
}

impl CompletionForm {
    /// The values the reconciliation gate sees for this form.
    pub fn reconciliation(&self) -> ReconciliationInput {
        let revenue = financial::revenue(self.units_sold.unwrap_or(0), self.partner_type);
        let partner_adjustment_amount = self.partner_type.map_or(0, |partner| {
            financial::partner_adjustment(self.partner_adjusted_count.unwrap_or(0), partner)
        });
        ReconciliationInput {
            revenue,
            amount_paid_to_finance: self.amount_paid_to_finance.unwrap_or(0),
            marketing_expense: self.marketing_expense.unwrap_or(0),
            operational_expense: self.operational_expense.unwrap_or(0),
            has_partner_adjustment: self.partner_type.is_some(),
            partner_adjustment_amount,
        }
    }
}

fn required_amount<T: Copy>(field: &str, value: Option<T>) -> Result<T, LifecycleError> {
    value.ok_or_else(|| LifecycleError::validation(field, "is required"))
}

fn ensure_scheduled(camp: &Camp, action: &str) -> Result<(), LifecycleError> {
    match camp.status {
        CampStatus::Scheduled => Ok(()),
        status => Err(LifecycleError::precondition(format!(
            "camp {} is {status} and cannot be {action}",
            camp.camp_code
        ))),
    }
}

/// `scheduled -> completed`, gated on the reconciliation check.
pub fn complete(
    camp: &mut Camp,
    form: &CompletionForm,
    actor: &str,
    now: Timestamp,
) -> Result<(), LifecycleError> {
    ensure_scheduled(camp, "completed")?;

    let units_sold = required_amount("unitsSold", form.units_sold)?;
    let transaction_id = required("transactionId", &form.transaction_id)?;
    let amount_paid_to_finance = required_amount("amountPaidToFinance", form.amount_paid_to_finance)?;
    let marketing_expense = required_amount("marketingExpense", form.marketing_expense)?;
    let operational_expense = required_amount("operationalExpense", form.operational_expense)?;
    let phlebo_name = required("phleboName", &form.phlebo_name)?;
    let phlebo_mobile_no = required("phleboMobileNo", &form.phlebo_mobile_no)?;
    if !is_mobile_no(&phlebo_mobile_no) {
        return Err(LifecycleError::validation("phleboMobileNo", "must be 10 digits"));
    }

    let partner = match form.partner_type {
        Some(partner_type) => {
            let name = required("partnerName", &form.partner_name)?;
            let count = required_amount("partnerAdjustedCount", form.partner_adjusted_count)?;
            Some((partner_type, name, count))
        }
        None => None,
    };

    let check = form.reconciliation();
    if !check.reconciles() {
        let message = match check.expenses() {
            Some(total) => format!(
                "expenses must equal revenue: expenses total {total} but revenue is {}",
                check.revenue
            ),
            None => format!(
                "expenses must equal revenue: expenses exceed the supported total, revenue is {}",
                check.revenue
            ),
        };
        return Err(LifecycleError::precondition(message));
    }

    camp.status = CampStatus::Completed;
    camp.units_sold = Some(units_sold);
    camp.revenue = Some(check.revenue);
    camp.amount_paid_to_finance = Some(amount_paid_to_finance);
    camp.marketing_expense = Some(marketing_expense);
    camp.operational_expense = Some(operational_expense);
    camp.transaction_id = Some(transaction_id);
    camp.vendor_name = Some(form.vendor_name.trim().to_uppercase()).filter(|v| !v.is_empty());
    camp.phlebo_name = Some(phlebo_name);
    camp.phlebo_mobile_no = Some(phlebo_mobile_no);
    if let Some((partner_type, name, count)) = partner {
        camp.partner_type = Some(partner_type);
        camp.partner_name = Some(name);
        camp.partner_adjusted_count = Some(count);
        camp.partner_adjustment_amount = Some(check.partner_adjustment_amount);
    }
    camp.completed_by = Some(actor.to_string());
    camp.completed_at = Some(now);
    camp.last_modified = now;
    Ok(())
}

/// `scheduled -> cancelled`. Irreversible.
pub fn cancel(camp: &mut Camp, actor: &str, now: Timestamp) -> Result<(), LifecycleError> {
    ensure_scheduled(camp, "cancelled")?;

    camp.status = CampStatus::Cancelled;
    camp.cancelled_by = Some(actor.to_string());
    camp.cancelled_at = Some(now);
    camp.last_modified = now;
    Ok(())
}

/// Record the report outcome of a completed camp. Write-once.
pub fn set_report_status(
    camp: &mut Camp,
    report_status: CampReportStatus,
    actor: &str,
    now: Timestamp,
) -> Result<(), LifecycleError> {
    if camp.status != CampStatus::Completed {
        return Err(LifecycleError::precondition(format!(
            "camp {} is {} and has no report to close",
            camp.camp_code, camp.status
        )));
    }
    if let Some(existing) = camp.report_status {
        return Err(LifecycleError::precondition(format!(
            "report status of camp {} is already {existing}",
            camp.camp_code
        )));
    }

    camp.report_status = Some(report_status);
    camp.report_status_updated_by = Some(actor.to_string());
    camp.report_status_updated_at = Some(now);
    camp.last_modified = now;
    Ok(())
}
