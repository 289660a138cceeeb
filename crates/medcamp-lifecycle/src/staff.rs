//! Role-partitioned staff directory with a flattened lookup index.
//!
//! A member is written to `staffData/<role>/<code>` and then to
//! `staffFlattened/<code>`. The two writes are independent create-only puts,
//! so re-running a registration fills in whichever index is missing.

use tracing::{debug, info};

use medcamp_core::models::staff::{StaffMember, StaffRole};
use medcamp_core::store_keys;
use medcamp_storage::error::StorageError;
use medcamp_storage::json;
use medcamp_storage::store::DocumentStore;

/// Maximum number of staff search results.
pub const SEARCH_LIMIT: usize = 20;

/// Register `name (code)` under `role` unless already present.
///
/// Returns `true` when the role partition entry was newly created.
pub async fn ensure_registered<S: DocumentStore>(
    store: &S,
    role: StaffRole,
    name: &str,
    code: &str,
) -> Result<bool, StorageError> {
    let member = StaffMember::new(role, name, code);

    let created = create_if_absent(store, &store_keys::staff_by_role(role, &member.emp_code), &member).await?;
    create_if_absent(store, &store_keys::staff_flattened(&member.emp_code), &member).await?;

    if created {
        info!(role = %role, emp_code = %member.emp_code, "staff member registered");
    }
    Ok(created)
}

async fn create_if_absent<S: DocumentStore>(
    store: &S,
    key: &str,
    member: &StaffMember,
) -> Result<bool, StorageError> {
    match json::create_json(store, key, member).await {
        Ok(_) => Ok(true),
        Err(StorageError::AlreadyExists { .. }) => {
            debug!(key, "staff entry already present");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Case-insensitive substring search over display name and employee code.
/// Without a role, searches the flattened index.
pub async fn search<S: DocumentStore>(
    store: &S,
    role: Option<StaffRole>,
    query: &str,
) -> Result<Vec<StaffMember>, StorageError> {
    let prefix = match role {
        Some(role) => store_keys::staff_role_prefix(role),
        None => store_keys::STAFF_FLATTENED_PREFIX.to_string(),
    };
    let needle = query.trim().to_lowercase();

    let mut members: Vec<StaffMember> = json::load_all_json::<StaffMember, _>(store, &prefix)
        .await?
        .into_iter()
        .map(|(_, member)| member)
        .filter(|member| {
            needle.is_empty()
                || member.display_name.to_lowercase().contains(&needle)
                || member.emp_code.to_lowercase().contains(&needle)
        })
        .collect();

    members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    members.truncate(SEARCH_LIMIT);
    Ok(members)
}
