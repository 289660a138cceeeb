use medcamp_core::models::user::{Area, Principal};

use crate::error::LifecycleError;

/// Every transition needs an identified principal whose role covers the area.
pub fn authorize(principal: &Principal, area: Area) -> Result<(), LifecycleError> {
    if principal.uid.trim().is_empty() || principal.email.trim().is_empty() {
        return Err(LifecycleError::Unauthenticated);
    }
    if !principal.role.can_access(area) {
        return Err(LifecycleError::Forbidden {
            role: principal.role,
            area,
        });
    }
    Ok(())
}
