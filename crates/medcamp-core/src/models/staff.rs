use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The six staff roles assigned to every camp. Each role has its own
/// partition in the staff directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum StaffRole {
    Nurse,
    TeamLeader,
    DistrictCoordinator,
    Agent,
    RegionalOfficer,
    SalesOfficerManager,
}

impl StaffRole {
    pub const ALL: [StaffRole; 6] = [
        StaffRole::Nurse,
        StaffRole::TeamLeader,
        StaffRole::DistrictCoordinator,
        StaffRole::Agent,
        StaffRole::RegionalOfficer,
        StaffRole::SalesOfficerManager,
    ];

    /// Partition name under `staffData/`.
    pub fn partition(self) -> &'static str {
        match self {
            StaffRole::Nurse => "nurses",
            StaffRole::TeamLeader => "teamLeaders",
            StaffRole::DistrictCoordinator => "districtCoordinators",
            StaffRole::Agent => "agents",
            StaffRole::RegionalOfficer => "regionalOfficers",
            StaffRole::SalesOfficerManager => "salesOfficerManagers",
        }
    }

    /// Role tag stored on a registered member: the partition name,
    /// singular and upper-cased.
    pub fn tag(self) -> &'static str {
        match self {
            StaffRole::Nurse => "NURSE",
            StaffRole::TeamLeader => "TEAMLEADER",
            StaffRole::DistrictCoordinator => "DISTRICTCOORDINATOR",
            StaffRole::Agent => "AGENT",
            StaffRole::RegionalOfficer => "REGIONALOFFICER",
            StaffRole::SalesOfficerManager => "SALESOFFICERMANAGER",
        }
    }

    /// Name of the camp field holding this role's assignment.
    pub fn field(self) -> &'static str {
        match self {
            StaffRole::Nurse => "nurseName",
            StaffRole::TeamLeader => "teamLeader",
            StaffRole::DistrictCoordinator => "dcName",
            StaffRole::Agent => "agentName",
            StaffRole::RegionalOfficer => "roName",
            StaffRole::SalesOfficerManager => "somName",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.partition())
    }
}

impl FromStr for StaffRole {
    type Err = CoreError;

    /// Accepts the partition name (`nurses`) or the camelCase role (`nurse`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StaffRole::ALL
            .into_iter()
            .find(|role| {
                role.partition().eq_ignore_ascii_case(s)
                    || role.partition().trim_end_matches('s').eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| CoreError::UnknownStaffRole(s.to_string()))
    }
}

/// A registered staff member. Stored twice: under its role partition and
/// in the flattened lookup index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StaffMember {
    pub name: String,
    pub emp_code: String,
    pub role: String,
    pub display_name: String,
}

impl StaffMember {
    pub fn new(role: StaffRole, name: &str, emp_code: &str) -> Self {
        let name = name.trim().to_string();
        let emp_code = emp_code.to_ascii_uppercase();
        let display_name = format!("{name} ({emp_code})");
        Self {
            name,
            emp_code,
            role: role.tag().to_string(),
            display_name,
        }
    }
}

/// Outcome of parsing a free-text `NAME (CODE)` staff entry.
///
/// Callers branch on the variant; there is no "maybe matched" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffEntry {
    Valid { name: String, code: String },
    Invalid,
}

impl StaffEntry {
    /// Parse `NAME (CODE)`. The code is the text inside the last pair of
    /// parentheses, must be ASCII alphanumeric, and is upper-cased. Matching
    /// is case-insensitive.
    pub fn parse(input: &str) -> Self {
        let Some(body) = input.trim().strip_suffix(')') else {
            return StaffEntry::Invalid;
        };
        let Some(open) = body.rfind('(') else {
            return StaffEntry::Invalid;
        };

        let code = &body[open + 1..];
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return StaffEntry::Invalid;
        }

        let name = body[..open].trim();
        if name.is_empty() {
            return StaffEntry::Invalid;
        }

        StaffEntry::Valid {
            name: name.to_string(),
            code: code.to_ascii_uppercase(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, StaffEntry::Valid { .. })
    }
}

/// The staff assigned to a camp, each as a `"Name (Code)"` display string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct StaffAssignment {
    pub nurse_name: String,
    pub team_leader: String,
    pub dc_name: String,
    pub agent_name: String,
    pub ro_name: String,
    pub som_name: String,
}

impl StaffAssignment {
    pub fn get(&self, role: StaffRole) -> &str {
        match role {
            StaffRole::Nurse => &self.nurse_name,
            StaffRole::TeamLeader => &self.team_leader,
            StaffRole::DistrictCoordinator => &self.dc_name,
            StaffRole::Agent => &self.agent_name,
            StaffRole::RegionalOfficer => &self.ro_name,
            StaffRole::SalesOfficerManager => &self.som_name,
        }
    }

    /// Assignments in form order.
    pub fn iter(&self) -> impl Iterator<Item = (StaffRole, &str)> {
        StaffRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }
}
