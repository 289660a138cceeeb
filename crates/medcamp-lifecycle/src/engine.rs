use std::collections::HashSet;
use std::sync::Arc;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use medcamp_audit::actions;
use medcamp_audit::events::AuditEvent;
use medcamp_core::models::camp::{Camp, CampReportStatus};
use medcamp_core::models::staff::{StaffMember, StaffRole};
use medcamp_core::models::test_entry::{TestEntry, TestReportStatus};
use medcamp_core::models::user::{Area, Principal};
use medcamp_core::store_keys;
use medcamp_storage::error::StorageError;
use medcamp_storage::json;
use medcamp_storage::store::DocumentStore;

use crate::access::authorize;
use crate::analytics::{self, CampDashboardFilter, CampDashboardOptions, CampMetrics, TestMetrics};
use crate::camp::{self, CampForm, CompletionForm};
use crate::clinic::{self, ClinicPrefill, PrefillSource};
use crate::codes;
use crate::error::LifecycleError;
use crate::staff;
use crate::test_entry::{self, PatientForm, PaymentForm, TestEntryForm, VendorUpdate};
use crate::views::{
    self, BoardContext, CampBoard, CampFilter, CampFilterOptions, Keyed, RecordTable, TestBoard,
    TestFilter, TestFilterOptions,
};

/// Attempts at drawing an unused camp code before giving up.
pub const MAX_CAMP_CODE_ATTEMPTS: usize = 10;

pub type CampTable = RecordTable<Camp, CampFilterOptions>;
pub type TestTable = RecordTable<TestEntry, TestFilterOptions>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampDashboard {
    pub metrics: CampMetrics,
    pub options: CampDashboardOptions,
}

/// The lifecycle engine. Every operation takes the acting principal, checks
/// its role, and reads or writes through the injected store.
pub struct Lifecycle<S> {
    store: Arc<S>,
    clock: fn() -> Timestamp,
}

impl<S> Clone for Lifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock,
        }
    }
}

impl<S: DocumentStore> Lifecycle<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Timestamp::now,
        }
    }

    /// Use a fixed time source instead of the system clock.
    pub fn with_clock(store: Arc<S>, clock: fn() -> Timestamp) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> Timestamp {
        (self.clock)()
    }

    fn today(&self) -> Date {
        views::utc_date(self.now())
    }

    // -----------------------------------------------------------------------
    // Camps
    // -----------------------------------------------------------------------

    /// Validate the form, register any new staff, then create the camp and
    /// refresh the clinic cache.
    pub async fn schedule_camp(
        &self,
        principal: &Principal,
        form: &CampForm,
    ) -> Result<Keyed<Camp>, LifecycleError> {
        authorize(principal, Area::HealthCamps)?;
        let validated = camp::validate_schedule(form)?;

        for member in &validated.staff_refs {
            let created =
                staff::ensure_registered(self.store(), member.role, &member.name, &member.code).await?;
            if created {
                AuditEvent::new(
                    actions::STAFF_REGISTERED,
                    actions::RESOURCE_STAFF,
                    &member.code,
                    &principal.email,
                )
                .with_details(serde_json::json!({ "role": member.role.tag(), "name": member.name }))
                .emit();
            }
        }

        let key = store_keys::new_record_key();
        let camp_code = self.reserve_camp_code(validated.date, &key).await?;

        let now = self.now();
        let record = validated.into_camp(camp_code, &principal.email, now);
        let path = store_keys::health_camp(&key);
        match json::create_json(self.store(), &path, &record).await {
            Ok(_) => {}
            Err(StorageError::AlreadyExists { .. }) => return Err(LifecycleError::Conflict(path)),
            Err(e) => return Err(e.into()),
        }

        if let Err(e) = clinic::upsert(self.store(), &clinic::from_camp(&record, now)).await {
            warn!(clinic_code = %record.clinic_code, error = %e, "failed to refresh clinic cache");
        }

        info!(camp_code = %record.camp_code, key = %key, "camp scheduled");
        AuditEvent::new(
            actions::CAMP_SCHEDULED,
            actions::RESOURCE_CAMP,
            &record.camp_code,
            &principal.email,
        )
        .with_details(serde_json::json!({ "key": key, "clinicCode": record.clinic_code, "date": record.date }))
        .emit();

        Ok(Keyed::new(key, record))
    }

    /// Pick a camp code for `date` that no stored camp uses and claim it
    /// with a create-only marker, so concurrent schedules never share one.
    async fn reserve_camp_code(&self, date: Date, camp_key: &str) -> Result<String, LifecycleError> {
        let mut taken: HashSet<String> = self
            .load_keyed::<Camp>(store_keys::HEALTH_CAMPS_PREFIX)
            .await?
            .into_iter()
            .map(|camp| camp.record.camp_code)
            .collect();
        let marker = serde_json::json!({ "campKey": camp_key, "date": date });

        for _ in 0..MAX_CAMP_CODE_ATTEMPTS {
            let code = codes::camp_code(date, &mut rand::thread_rng());
            if taken.contains(&code) {
                continue;
            }
            match json::create_json(self.store(), &store_keys::camp_code(&code), &marker).await {
                Ok(_) => return Ok(code),
                Err(StorageError::AlreadyExists { .. }) => {
                    taken.insert(code);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LifecycleError::precondition(format!(
            "no unused camp code left for {date} after {MAX_CAMP_CODE_ATTEMPTS} attempts"
        )))
    }

    pub async fn complete_camp(
        &self,
        principal: &Principal,
        key: &str,
        form: &CompletionForm,
    ) -> Result<Keyed<Camp>, LifecycleError> {
        authorize(principal, Area::HealthCamps)?;
        let now = self.now();
        let record: Camp = self
            .modify(&store_keys::health_camp(key), |camp| {
                camp::complete(camp, form, &principal.email, now)
            })
            .await?;

        info!(camp_code = %record.camp_code, revenue = ?record.revenue, "camp completed");
        AuditEvent::new(
            actions::CAMP_COMPLETED,
            actions::RESOURCE_CAMP,
            &record.camp_code,
            &principal.email,
        )
        .with_details(serde_json::json!({
            "unitsSold": record.units_sold,
            "revenue": record.revenue,
            "partnerType": record.partner_type,
            "partnerAdjustmentAmount": record.partner_adjustment_amount,
        }))
        .emit();

        Ok(Keyed::new(key, record))
    }

    pub async fn cancel_camp(&self, principal: &Principal, key: &str) -> Result<Keyed<Camp>, LifecycleError> {
        authorize(principal, Area::HealthCamps)?;
        let now = self.now();
        let record: Camp = self
            .modify(&store_keys::health_camp(key), |camp| {
                camp::cancel(camp, &principal.email, now)
            })
            .await?;

        info!(camp_code = %record.camp_code, "camp cancelled");
        AuditEvent::new(
            actions::CAMP_CANCELLED,
            actions::RESOURCE_CAMP,
            &record.camp_code,
            &principal.email,
        )
        .emit();

        Ok(Keyed::new(key, record))
    }

    pub async fn set_camp_report_status(
        &self,
        principal: &Principal,
        key: &str,
        report_status: CampReportStatus,
    ) -> Result<Keyed<Camp>, LifecycleError> {
        authorize(principal, Area::HealthCamps)?;
        let now = self.now();
        let record: Camp = self
            .modify(&store_keys::health_camp(key), |camp| {
                camp::set_report_status(camp, report_status, &principal.email, now)
            })
            .await?;

        info!(camp_code = %record.camp_code, report_status = %report_status, "camp report status set");
        AuditEvent::new(
            actions::CAMP_REPORT_STATUS_SET,
            actions::RESOURCE_CAMP,
            &record.camp_code,
            &principal.email,
        )
        .with_details(serde_json::json!({ "reportStatus": report_status }))
        .emit();

        Ok(Keyed::new(key, record))
    }

    pub async fn list_camps(
        &self,
        principal: &Principal,
        filter: &CampFilter,
    ) -> Result<CampTable, LifecycleError> {
        let camps = self.camps(principal).await?;
        Ok(RecordTable {
            options: views::camp_filter_options(&camps),
            records: views::filter_camps(&camps, filter).into_iter().cloned().collect(),
        })
    }

    pub async fn camp_board(
        &self,
        principal: &Principal,
        context: BoardContext,
    ) -> Result<CampBoard, LifecycleError> {
        let camps = self.camps(principal).await?;
        Ok(views::camp_board(&camps, context))
    }

    pub async fn suggest_camps(
        &self,
        principal: &Principal,
        partial: &str,
        exclude_completed: bool,
    ) -> Result<Vec<Keyed<Camp>>, LifecycleError> {
        let camps = self.camps(principal).await?;
        Ok(views::suggest_camps(&camps, partial, exclude_completed)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn camp_by_code(&self, principal: &Principal, code: &str) -> Result<Keyed<Camp>, LifecycleError> {
        let camps = self.camps(principal).await?;
        views::find_camp_by_code(&camps, code)
            .cloned()
            .ok_or_else(|| LifecycleError::NotFound(format!("camp {}", code.trim())))
    }

    /// Prefill for a clinic code, from the cache or from an earlier camp.
    pub async fn resolve_clinic(
        &self,
        principal: &Principal,
        clinic_code: &str,
    ) -> Result<ClinicPrefill, LifecycleError> {
        authorize(principal, Area::HealthCamps)?;
        let prefill = clinic::resolve(self.store(), clinic_code, self.now())
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("clinic {}", clinic_code.trim())))?;

        if prefill.source == PrefillSource::PreviousCamp {
            info!(clinic_code = %prefill.clinic.clinic_code, "clinic cache backfilled from camp");
            AuditEvent::new(
                actions::CLINIC_BACKFILLED,
                actions::RESOURCE_CLINIC,
                &prefill.clinic.clinic_code,
                &principal.email,
            )
            .emit();
        }
        Ok(prefill)
    }

    pub async fn search_staff(
        &self,
        principal: &Principal,
        role: Option<StaffRole>,
        query: &str,
    ) -> Result<Vec<StaffMember>, LifecycleError> {
        authorize(principal, Area::HealthCamps)?;
        Ok(staff::search(self.store(), role, query).await?)
    }

    async fn camps(&self, principal: &Principal) -> Result<Vec<Keyed<Camp>>, LifecycleError> {
        authorize(principal, Area::HealthCamps)?;
        self.load_keyed(store_keys::HEALTH_CAMPS_PREFIX).await
    }

    // -----------------------------------------------------------------------
    // Individual tests
    // -----------------------------------------------------------------------

    pub async fn create_test_entry(
        &self,
        principal: &Principal,
        form: &TestEntryForm,
    ) -> Result<Keyed<TestEntry>, LifecycleError> {
        authorize(principal, Area::IndividualTests)?;
        let now = self.now();
        let test_code = codes::test_code(&form.test_name, now, &mut rand::thread_rng());
        let record = test_entry::create(form, test_code, principal, now)?;

        let key = store_keys::new_record_key();
        let path = store_keys::test_entry(&key);
        match json::create_json(self.store(), &path, &record).await {
            Ok(_) => {}
            Err(StorageError::AlreadyExists { .. }) => return Err(LifecycleError::Conflict(path)),
            Err(e) => return Err(e.into()),
        }

        info!(test_code = %record.test_code, key = %key, "test entry created");
        AuditEvent::new(
            actions::TEST_CREATED,
            actions::RESOURCE_TEST_ENTRY,
            &record.test_code,
            &principal.email,
        )
        .with_details(serde_json::json!({
            "key": key,
            "testName": record.test_name,
            "paymentStatus": record.payment_status,
        }))
        .emit();

        Ok(Keyed::new(key, record))
    }

    pub async fn update_test_payment(
        &self,
        principal: &Principal,
        key: &str,
        payment: &PaymentForm,
    ) -> Result<Keyed<TestEntry>, LifecycleError> {
        authorize(principal, Area::IndividualTests)?;
        let now = self.now();
        let record: TestEntry = self
            .modify(&store_keys::test_entry(key), |entry| {
                test_entry::update_payment(entry, payment, &principal.email, now)
            })
            .await?;

        info!(test_code = %record.test_code, payment_status = %record.payment_status, "test payment updated");
        self.audit_test(actions::TEST_PAYMENT_UPDATED, &record, principal, serde_json::json!({
            "paymentStatus": record.payment_status,
            "paymentMode": record.payment_mode,
        }));
        Ok(Keyed::new(key, record))
    }

    pub async fn update_test_patient(
        &self,
        principal: &Principal,
        key: &str,
        patient: &PatientForm,
    ) -> Result<Keyed<TestEntry>, LifecycleError> {
        authorize(principal, Area::IndividualTests)?;
        let now = self.now();
        let record: TestEntry = self
            .modify(&store_keys::test_entry(key), |entry| {
                test_entry::update_patient(entry, patient, now)
            })
            .await?;

        info!(test_code = %record.test_code, "test patient details updated");
        self.audit_test(actions::TEST_PATIENT_UPDATED, &record, principal, serde_json::Value::Null);
        Ok(Keyed::new(key, record))
    }

    pub async fn update_test_vendor(
        &self,
        principal: &Principal,
        key: &str,
        update: &VendorUpdate,
    ) -> Result<Keyed<TestEntry>, LifecycleError> {
        authorize(principal, Area::IndividualTests)?;
        let now = self.now();
        let record: TestEntry = self
            .modify(&store_keys::test_entry(key), |entry| {
                test_entry::update_vendor(entry, update, &principal.email, now)
            })
            .await?;

        info!(test_code = %record.test_code, vendor_status = %record.vendor_status, "test vendor status updated");
        self.audit_test(actions::TEST_VENDOR_UPDATED, &record, principal, serde_json::json!({
            "vendorStatus": record.vendor_status,
            "vendorBookingId": record.vendor_booking_id,
        }));
        Ok(Keyed::new(key, record))
    }

    pub async fn update_test_report(
        &self,
        principal: &Principal,
        key: &str,
        report_status: TestReportStatus,
    ) -> Result<Keyed<TestEntry>, LifecycleError> {
        authorize(principal, Area::IndividualTests)?;
        let now = self.now();
        let record: TestEntry = self
            .modify(&store_keys::test_entry(key), |entry| {
                test_entry::update_report(entry, report_status, &principal.email, now)
            })
            .await?;

        info!(test_code = %record.test_code, report_status = %record.report_status, "test report status updated");
        self.audit_test(actions::TEST_REPORT_UPDATED, &record, principal, serde_json::json!({
            "reportStatus": record.report_status,
        }));
        Ok(Keyed::new(key, record))
    }

    pub async fn list_tests(
        &self,
        principal: &Principal,
        filter: &TestFilter,
    ) -> Result<TestTable, LifecycleError> {
        let entries = self.tests(principal).await?;
        Ok(RecordTable {
            options: views::test_filter_options(&entries),
            records: views::filter_tests(&entries, filter).into_iter().cloned().collect(),
        })
    }

    pub async fn test_board(&self, principal: &Principal) -> Result<TestBoard, LifecycleError> {
        let entries = self.tests(principal).await?;
        Ok(views::test_board(&entries))
    }

    pub async fn search_tests(
        &self,
        principal: &Principal,
        query: &str,
    ) -> Result<Vec<Keyed<TestEntry>>, LifecycleError> {
        let entries = self.tests(principal).await?;
        Ok(views::search_tests(&entries, query).into_iter().cloned().collect())
    }

    pub async fn test_by_code(
        &self,
        principal: &Principal,
        code: &str,
    ) -> Result<Keyed<TestEntry>, LifecycleError> {
        let entries = self.tests(principal).await?;
        views::find_test_by_code(&entries, code)
            .cloned()
            .ok_or_else(|| LifecycleError::NotFound(format!("test {}", code.trim())))
    }

    async fn tests(&self, principal: &Principal) -> Result<Vec<Keyed<TestEntry>>, LifecycleError> {
        authorize(principal, Area::IndividualTests)?;
        self.load_keyed(store_keys::TEST_ENTRIES_PREFIX).await
    }

    fn audit_test(&self, action: &'static str, record: &TestEntry, principal: &Principal, details: serde_json::Value) {
        AuditEvent::new(action, actions::RESOURCE_TEST_ENTRY, &record.test_code, &principal.email)
            .with_details(details)
            .emit();
    }

    // -----------------------------------------------------------------------
    // Dashboards
    // -----------------------------------------------------------------------

    pub async fn camp_dashboard(
        &self,
        principal: &Principal,
        filter: &CampDashboardFilter,
    ) -> Result<CampDashboard, LifecycleError> {
        authorize(principal, Area::Superadmin)?;
        let camps: Vec<Camp> = self
            .load_keyed(store_keys::HEALTH_CAMPS_PREFIX)
            .await?
            .into_iter()
            .map(|camp| camp.record)
            .collect();

        Ok(CampDashboard {
            metrics: analytics::camp_metrics(&camps, filter, self.today()),
            options: analytics::camp_dashboard_options(&camps, filter.state.as_deref()),
        })
    }

    pub async fn test_dashboard(
        &self,
        principal: &Principal,
        test_name: Option<&str>,
    ) -> Result<TestMetrics, LifecycleError> {
        authorize(principal, Area::Superadmin)?;
        let entries: Vec<TestEntry> = self
            .load_keyed(store_keys::TEST_ENTRIES_PREFIX)
            .await?
            .into_iter()
            .map(|entry| entry.record)
            .collect();

        Ok(analytics::test_metrics(&entries, test_name))
    }

    // -----------------------------------------------------------------------
    // Store access
    // -----------------------------------------------------------------------

    /// Direct children of `prefix`, keyed by their record key.
    async fn load_keyed<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<Keyed<T>>, LifecycleError> {
        let documents: Vec<(String, T)> = json::load_all_json(self.store(), prefix).await?;
        Ok(documents
            .into_iter()
            .filter_map(|(path, record)| {
                store_keys::record_key(&path, prefix).map(|key| Keyed::new(key, record))
            })
            .collect())
    }

    /// Load, apply `transition`, and write back conditioned on the ETag that
    /// was read. Nothing is written when the transition fails.
    async fn modify<T, F>(&self, path: &str, transition: F) -> Result<T, LifecycleError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce(&mut T) -> Result<(), LifecycleError> + Send,
    {
        let (mut record, etag): (T, String) = json::try_load_json(self.store(), path)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(path.to_string()))?;

        transition(&mut record)?;

        match json::save_json_if_match(self.store(), path, &record, &etag).await {
            Ok(_) => Ok(record),
            Err(StorageError::PreconditionFailed { .. }) => {
                warn!(key = %path, "lost compare-and-swap race");
                Err(LifecycleError::Conflict(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

