/// Roster records: users, courses, groups, and the request/patch shapes that
/// flow into the validator and the group store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::groups::ids::{ids_equal, normalize_opt, CourseId};
use crate::groups::members::MemberSet;
use crate::groups::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub institutional_id: String,
    pub role: Role,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(institutional_id: impl Into<String>, role: Role) -> Self {
        User {
            institutional_id: institutional_id.into(),
            role,
            display_name: String::new(),
            email: String::new(),
        }
    }

    /// Build a user whose role is inferred from the shape of the id.
    pub fn with_detected_role(institutional_id: impl Into<String>) -> Self {
        let institutional_id = institutional_id.into();
        let role = Role::from_institutional_id(&institutional_id);
        User::new(institutional_id, role)
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn is(&self, id: &str) -> bool {
        ids_equal(&self.institutional_id, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: CourseId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

impl Course {
    pub fn new(course_id: CourseId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Course {
            course_id,
            name: name.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Assigned by the store; `None` on a draft.
    #[serde(default)]
    pub group_id: Option<String>,
    pub group_name: String,
    pub course_id: CourseId,
    pub leader_id: String,
    /// May or may not include the leader on persisted records.
    #[serde(default)]
    pub member_ids: MemberSet,
    /// Absent on records written before creator tracking existed.
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub adviser_id: Option<String>,
    /// Only meaningful on teacher-created groups.
    #[serde(default)]
    pub allow_leader_edit: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Group {
    pub fn id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn is_led_by(&self, id: &str) -> bool {
        ids_equal(&self.leader_id, id)
    }

    /// Leader or listed member.
    pub fn has_member(&self, id: &str) -> bool {
        self.is_led_by(id) || self.member_ids.contains(id)
    }

    /// Normalized creator, `None` for legacy records (and blank values).
    pub fn creator(&self) -> Option<&str> {
        normalize_opt(self.created_by.as_deref())
    }
}

/// Creation request as assembled by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    pub group_name: String,
    #[serde(default)]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub member_ids: MemberSet,
    #[serde(default)]
    pub requested_leader_id: Option<String>,
}

impl GroupRequest {
    pub fn new(group_name: impl Into<String>, course_id: CourseId) -> Self {
        GroupRequest {
            group_name: group_name.into(),
            course_id: Some(course_id),
            ..Default::default()
        }
    }

    pub fn members<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.member_ids = ids.into_iter().collect();
        self
    }

    pub fn leader(mut self, id: impl Into<String>) -> Self {
        self.requested_leader_id = Some(id.into());
        self
    }
}

/// Partial update handed to the group store. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPatch {
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub leader_id: Option<String>,
    #[serde(default)]
    pub member_ids: Option<MemberSet>,
    /// `Some(None)` clears the adviser.
    #[serde(default)]
    pub adviser_id: Option<Option<String>>,
}

impl GroupPatch {
    pub fn is_empty(&self) -> bool {
        self.group_name.is_none()
            && self.leader_id.is_none()
            && self.member_ids.is_none()
            && self.adviser_id.is_none()
    }

    pub fn apply_to(&self, group: &mut Group) {
        if let Some(name) = &self.group_name {
            group.group_name = name.clone();
        }
        if let Some(leader) = &self.leader_id {
            group.leader_id = leader.clone();
        }
        if let Some(members) = &self.member_ids {
            group.member_ids = members.clone();
        }
        if let Some(adviser) = &self.adviser_id {
            group.adviser_id = adviser.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_row() -> &'static str {
        r#"{
            "groupId": "g-1",
            "groupName": "Alpha",
            "courseId": 5,
            "leaderId": "S1",
            "memberIds": "[\"S2\",\"S3\"]"
        }"#
    }

    #[test]
    fn test_legacy_row_deserializes() {
        let group: Group = serde_json::from_str(legacy_row()).unwrap();
        assert_eq!(group.id(), Some("g-1"));
        assert_eq!(group.creator(), None);
        assert_eq!(group.member_ids.as_slice(), &["S2", "S3"]);
        assert!(group.has_member("S1"));
        assert!(group.has_member(" S3"));
        assert!(!group.has_member("S4"));
    }

    #[test]
    fn test_blank_creator_is_legacy() {
        let mut group: Group = serde_json::from_str(legacy_row()).unwrap();
        group.created_by = Some("   ".into());
        assert_eq!(group.creator(), None);
        group.created_by = Some(" 1643 ".into());
        assert_eq!(group.creator(), Some("1643"));
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut group: Group = serde_json::from_str(legacy_row()).unwrap();
        let patch = GroupPatch {
            group_name: Some("Beta".into()),
            adviser_id: Some(Some("12".into())),
            ..Default::default()
        };
        patch.apply_to(&mut group);
        assert_eq!(group.group_name, "Beta");
        assert_eq!(group.leader_id, "S1");
        assert_eq!(group.adviser_id.as_deref(), Some("12"));

        GroupPatch {
            adviser_id: Some(None),
            ..Default::default()
        }
        .apply_to(&mut group);
        assert_eq!(group.adviser_id, None);
        assert!(GroupPatch::default().is_empty());
    }

    #[test]
    fn test_user_builders() {
        let user = User::with_detected_role("22-1234-567")
            .display_name("Ana")
            .email("ana@example.edu");
        assert_eq!(user.role, Role::Student);
        assert!(user.is(" 22-1234-567 "));
    }
}
