//! Identity types returned by `GET /api/user`.

use serde::{Deserialize, Serialize};

/// The signed-in Pulumi Cloud user.
///
/// A snapshot taken once per state-recovery pass; never refreshed in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub github_login: String,
    pub avatar_url: String,
    #[serde(rename = "hasMFA", default)]
    pub has_mfa: bool,
    /// Organizations in the order the backend returned them.
    #[serde(default)]
    pub organizations: Vec<OrganizationSummary>,
}

impl User {
    /// Find an organization by its login handle (case-sensitive).
    pub fn organization(&self, handle: &str) -> Option<&OrganizationSummary> {
        self.organizations.iter().find(|o| o.github_login == handle)
    }
}

/// A Pulumi Cloud organization the user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    /// The organization's login handle, used as `orgId` on the wire.
    pub github_login: String,
    pub name: String,
    pub avatar_url: String,
}

impl OrganizationSummary {
    /// Name shown in pick lists; falls back to the handle when the
    /// display name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.github_login
        } else {
            &self.name
        }
    }
}
