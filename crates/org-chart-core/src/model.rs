//! Member records as supplied by the calling page
//!
//! These are already joined with profile and role data. The hierarchy engine
//! only reads `id`, `reports_to` and `roles`; everything else is carried
//! through for the card renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// MEMBER ID
// =============================================================================

/// Stable identifier of a team member (also the card's geometry key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MemberId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// ROLES
// =============================================================================

/// Role tag attached to a member
///
/// Only the leadership tags are interpreted; operational roles are kept
/// verbatim for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    BusinessOwner,
    Executive,
    Operational(String),
}

impl Role {
    pub fn from_str(s: &str) -> Self {
        match s {
            "business_owner" => Self::BusinessOwner,
            "executive" => Self::Executive,
            _ => Self::Operational(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::BusinessOwner => "business_owner",
            Self::Executive => "executive",
            Self::Operational(tag) => tag,
        }
    }

    /// Leadership roles force root promotion regardless of reporting lines
    pub fn is_leadership(&self) -> bool {
        matches!(self, Self::BusinessOwner | Self::Executive)
    }

    /// Human-readable label for badges
    pub fn label(&self) -> String {
        match self {
            Self::BusinessOwner => "Business Owner".to_string(),
            Self::Executive => "Executive".to_string(),
            Self::Operational(tag) => tag
                .split(['_', '-', ' '])
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<String>>()
                .join(" "),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Invitation status; anything other than "pending" counts as active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberStatus {
    Pending,
    #[default]
    Active,
}

impl From<String> for MemberStatus {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("pending") {
            Self::Pending
        } else {
            Self::Active
        }
    }
}

impl From<MemberStatus> for String {
    fn from(status: MemberStatus) -> Self {
        match status {
            MemberStatus::Pending => "pending".to_string(),
            MemberStatus::Active => "active".to_string(),
        }
    }
}

// =============================================================================
// ORG CHART NODE
// =============================================================================

/// One person in the org chart, as received from the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgChartNode {
    pub id: MemberId,
    /// Manager reference; may point at an id that is not in the input set
    #[serde(default)]
    pub reports_to: Option<MemberId>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub office_location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub status: MemberStatus,
}

impl OrgChartNode {
    /// Minimal record, mostly useful for tests and fixtures
    pub fn new(id: impl Into<MemberId>) -> Self {
        Self {
            id: id.into(),
            reports_to: None,
            roles: Vec::new(),
            full_name: String::new(),
            email: String::new(),
            title: None,
            office_location: None,
            avatar_url: None,
            status: MemberStatus::Active,
        }
    }

    pub fn reporting_to(mut self, manager: impl Into<MemberId>) -> Self {
        self.reports_to = Some(manager.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }

    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }

    pub fn has_leadership_role(&self) -> bool {
        self.roles.iter().any(Role::is_leadership)
    }

    pub fn is_pending(&self) -> bool {
        self.status == MemberStatus::Pending
    }

    /// Full name, falling back to the email address, then the id
    pub fn display_name(&self) -> &str {
        if !self.full_name.trim().is_empty() {
            self.full_name.trim()
        } else if !self.email.trim().is_empty() {
            self.email.trim()
        } else {
            self.id.as_str()
        }
    }

    /// Up to two initials for the avatar placeholder
    pub fn initials(&self) -> String {
        let initials: String = self
            .display_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tags_parse_without_failing() {
        assert_eq!(Role::from_str("business_owner"), Role::BusinessOwner);
        assert_eq!(Role::from_str("executive"), Role::Executive);
        assert_eq!(
            Role::from_str("qa_lead"),
            Role::Operational("qa_lead".to_string())
        );
        assert!(Role::BusinessOwner.is_leadership());
        assert!(!Role::from_str("developer").is_leadership());
    }

    #[test]
    fn only_exact_leadership_tags_are_leadership() {
        for tag in ["owner", "Business-Owner", "EXECUTIVE", " executive"] {
            let role = Role::from_str(tag);
            assert_eq!(role, Role::Operational(tag.to_string()));
            assert!(!role.is_leadership(), "{tag} must not promote to root");
        }
    }

    #[test]
    fn role_tags_round_trip_verbatim() {
        let roles: Vec<Role> =
            serde_json::from_str(r#"["owner", "executive", "Business-Owner"]"#).unwrap();
        assert_eq!(
            serde_json::to_string(&roles).unwrap(),
            r#"["owner","executive","Business-Owner"]"#
        );
    }

    #[test]
    fn role_label_is_title_cased() {
        assert_eq!(Role::from_str("project_manager").label(), "Project Manager");
        assert_eq!(Role::Executive.label(), "Executive");
    }

    #[test]
    fn status_other_than_pending_is_active() {
        assert_eq!(MemberStatus::from("PENDING".to_string()), MemberStatus::Pending);
        assert_eq!(MemberStatus::from("invited".to_string()), MemberStatus::Active);
    }

    #[test]
    fn deserializes_partial_record() {
        let json = r#"{
            "id": "u-1",
            "reports_to": null,
            "roles": ["executive", "marketing"],
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "status": "pending"
        }"#;
        let node: OrgChartNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.id, MemberId::from("u-1"));
        assert!(node.reports_to.is_none());
        assert!(node.has_leadership_role());
        assert!(node.is_pending());
        assert_eq!(node.roles[1], Role::Operational("marketing".to_string()));
    }

    #[test]
    fn display_name_falls_back() {
        let mut node = OrgChartNode::new("u-9");
        assert_eq!(node.display_name(), "u-9");
        node.email = "x@example.com".to_string();
        assert_eq!(node.display_name(), "x@example.com");
        node.full_name = "grace brewster hopper".to_string();
        assert_eq!(node.initials(), "GB");
    }
}
