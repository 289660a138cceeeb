//! Clinic prefill for the scheduling form.

use jiff::Timestamp;
use serde::Serialize;
use tracing::warn;
use ts_rs::TS;

use medcamp_core::models::camp::Camp;
use medcamp_core::models::clinic::Clinic;
use medcamp_core::store_keys;
use medcamp_storage::error::StorageError;
use medcamp_storage::json;
use medcamp_storage::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PrefillSource {
    /// Read from `clinics/<code>`.
    Cache,
    /// Rebuilt from an earlier camp and written back to the cache.
    PreviousCamp,
}

/// Location and staff fields for a known clinic. The form shows these
/// read-only; only the date is entered for a repeat camp.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClinicPrefill {
    #[serde(flatten)]
    pub clinic: Clinic,
    pub source: PrefillSource,
    pub locked: bool,
}

/// Look up a clinic code. Falls back to the most recently created camp with
/// the same code (ignoring case), backfilling the cache from it. A failed
/// backfill is logged and the prefill is still returned.
pub async fn resolve<S: DocumentStore>(
    store: &S,
    clinic_code: &str,
    now: Timestamp,
) -> Result<Option<ClinicPrefill>, StorageError> {
    let code = clinic_code.trim();
    if code.is_empty() {
        return Ok(None);
    }

    if let Some((clinic, _)) = json::try_load_json::<Clinic, _>(store, &store_keys::clinic(code)).await? {
        return Ok(Some(ClinicPrefill {
            clinic,
            source: PrefillSource::Cache,
            locked: true,
        }));
    }

    let camps: Vec<(String, Camp)> = json::load_all_json(store, store_keys::HEALTH_CAMPS_PREFIX).await?;
    let Some(camp) = camps
        .into_iter()
        .map(|(_, camp)| camp)
        .filter(|camp| camp.clinic_code.eq_ignore_ascii_case(code))
        .max_by_key(|camp| camp.created_at)
    else {
        return Ok(None);
    };

    let clinic = backfill_from_camp(&camp, now);
    if let Err(e) = upsert(store, &clinic).await {
        warn!(clinic_code = %clinic.clinic_code, error = %e, "failed to backfill clinic cache");
    }

    Ok(Some(ClinicPrefill {
        clinic,
        source: PrefillSource::PreviousCamp,
        locked: true,
    }))
}

/// Latest-write-wins overwrite of the clinic cache.
pub async fn upsert<S: DocumentStore>(store: &S, clinic: &Clinic) -> Result<(), StorageError> {
    json::save_json(store, &store_keys::clinic(&clinic.clinic_code), clinic).await?;
    Ok(())
}

/// Cache entry written when a camp is scheduled.
pub fn from_camp(camp: &Camp, now: Timestamp) -> Clinic {
    Clinic {
        clinic_code: camp.clinic_code.trim().to_ascii_uppercase(),
        address: camp.address.clone(),
        district: camp.district.clone(),
        state: camp.state.clone(),
        pin_code: camp.pin_code.clone(),
        mobile_no: camp.mobile_no.clone(),
        staff: camp.staff.clone(),
        last_updated: now,
    }
}

// Cached location fields are upper-cased even when the source camp is not.
fn backfill_from_camp(camp: &Camp, now: Timestamp) -> Clinic {
    let mut clinic = from_camp(camp, now);
    clinic.address = clinic.address.to_uppercase();
    clinic.district = clinic.district.to_uppercase();
    clinic.state = clinic.state.to_uppercase();
    clinic
}
