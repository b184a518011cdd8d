/// Roster policy configuration and group authorization.
///
/// Who may edit or delete a group is not a rule of the composition engine;
/// callers supply a [`GroupAuthorizer`]. [`DefaultAuthorizer`] implements the
/// standard roster rules, configured by [`RosterPolicy`].

use std::fmt;

use crate::groups::model::{Group, User};
use crate::groups::role::Role;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionRule {
    /// Only teachers may delete groups.
    TeacherOnly,
    /// Teachers, or the group's own leader.
    TeacherOrLeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterPolicy {
    pub deletion: DeletionRule,
    /// `allow_leader_edit` stamped on groups a teacher creates.
    pub leader_edit_default: bool,
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            deletion: DeletionRule::TeacherOnly,
            leader_edit_default: false,
        }
    }
}

impl fmt::Display for RosterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RosterPolicy(deletion={:?}, leader_edit_default={})",
            self.deletion, self.leader_edit_default
        )
    }
}

// ---------------------------------------------------------------------------
// Authorization contract (caller implements or uses DefaultAuthorizer)
// ---------------------------------------------------------------------------

pub trait GroupAuthorizer {
    fn can_edit(&self, group: &Group, actor: &User) -> bool;
    fn can_delete(&self, group: &Group, actor: &User) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAuthorizer {
    policy: RosterPolicy,
}

impl DefaultAuthorizer {
    pub fn new(policy: RosterPolicy) -> Self {
        DefaultAuthorizer { policy }
    }

    pub fn policy(&self) -> &RosterPolicy {
        &self.policy
    }
}

impl GroupAuthorizer for DefaultAuthorizer {
    /// Teachers always; a student leader on their own or legacy groups, and on
    /// teacher-created groups only when leader editing was granted.
    fn can_edit(&self, group: &Group, actor: &User) -> bool {
        match actor.role {
            Role::Teacher => true,
            Role::Student => {
                if !group.is_led_by(&actor.institutional_id) {
                    return false;
                }
                match group.creator() {
                    None => true,
                    Some(creator) if actor.is(creator) => true,
                    Some(_) => group.allow_leader_edit == Some(true),
                }
            }
            Role::Other(_) => false,
        }
    }

    fn can_delete(&self, group: &Group, actor: &User) -> bool {
        match (self.policy.deletion, &actor.role) {
            (_, Role::Teacher) => true,
            (DeletionRule::TeacherOrLeader, Role::Student) => {
                group.is_led_by(&actor.institutional_id)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::members::MemberSet;

    fn group(leader: &str, created_by: Option<&str>, allow: Option<bool>) -> Group {
        Group {
            group_id: Some("g".into()),
            group_name: "G".into(),
            course_id: 1,
            leader_id: leader.into(),
            member_ids: MemberSet::new(),
            created_by: created_by.map(Into::into),
            adviser_id: None,
            allow_leader_edit: allow,
            created_at: None,
        }
    }

    #[test]
    fn test_default_policy_is_teacher_only_delete() {
        let auth = DefaultAuthorizer::default();
        let g = group("S1", Some("S1"), None);
        assert!(auth.can_delete(&g, &User::new("7", Role::Teacher)));
        assert!(!auth.can_delete(&g, &User::new("S1", Role::Student)));
        assert!(!auth.can_delete(&g, &User::new("X", Role::Other("ADMIN".into()))));
    }

    #[test]
    fn test_teacher_or_leader_delete() {
        let auth = DefaultAuthorizer::new(RosterPolicy {
            deletion: DeletionRule::TeacherOrLeader,
            ..Default::default()
        });
        let g = group("S1", Some("7"), None);
        assert!(auth.can_delete(&g, &User::new(" S1", Role::Student)));
        assert!(!auth.can_delete(&g, &User::new("S2", Role::Student)));
    }

    #[test]
    fn test_leader_edit_rules() {
        let auth = DefaultAuthorizer::default();
        let leader = User::new("S1", Role::Student);

        assert!(auth.can_edit(&group("S1", Some("S1"), None), &leader));
        assert!(auth.can_edit(&group("S1", None, None), &leader));
        assert!(!auth.can_edit(&group("S1", Some("7"), None), &leader));
        assert!(!auth.can_edit(&group("S1", Some("7"), Some(false)), &leader));
        assert!(auth.can_edit(&group("S1", Some("7"), Some(true)), &leader));
        assert!(!auth.can_edit(&group("S2", Some("S1"), None), &leader));
        assert!(auth.can_edit(&group("S2", Some("S2"), None), &User::new("7", Role::Teacher)));
    }
}
