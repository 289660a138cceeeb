use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Administrative roles attached to a signed-in principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Role {
    Superadmin,
    HealthCampAdmin,
    IndividualCampAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::HealthCampAdmin => "health-camp-admin",
            Role::IndividualCampAdmin => "individual-camp-admin",
        }
    }

    pub fn can_access(self, area: Area) -> bool {
        match area {
            Area::HealthCamps => matches!(self, Role::Superadmin | Role::HealthCampAdmin),
            Area::IndividualTests => true,
            Area::Superadmin => self == Role::Superadmin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::Superadmin),
            "health-camp-admin" => Ok(Role::HealthCampAdmin),
            "individual-camp-admin" => Ok(Role::IndividualCampAdmin),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

/// Functional areas gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    HealthCamps,
    IndividualTests,
    Superadmin,
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Area::HealthCamps => "health camps",
            Area::IndividualTests => "individual tests",
            Area::Superadmin => "superadmin dashboard",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AccountStatus {
    #[default]
    Active,
    Blocked,
}

/// Record stored at `users/<uid>`, consulted at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserRecord {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<jiff::Timestamp>,
}

/// An authenticated operator. Every state transition is stamped with the
/// principal's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Principal {
    pub uid: String,
    pub email: String,
    pub role: Role,
}
