/// Group edit session: rename, membership and leader changes on a stored
/// group, re-validated on submit.
///
/// The session seats the stored leader in the member list on open, so the
/// leader-in-members invariant holds throughout. Removing the leader promotes
/// the next member (see [`on_member_removed`]); removing the last member
/// leaves the session without a leader until one is set again.

use crate::collab::CourseCatalog;
use crate::groups::composition::{GroupCompositionValidator, ValidationErrors};
use crate::groups::ids::{ids_equal, normalize_opt};
use crate::groups::leadership::on_member_removed;
use crate::groups::members::MemberSet;
use crate::groups::model::{Group, GroupPatch, User};

#[derive(Clone, Debug)]
pub struct GroupEditSession {
    original: Group,
    group_name: String,
    leader_id: Option<String>,
    member_ids: MemberSet,
}

impl GroupEditSession {
    pub fn open(group: Group) -> Self {
        let leader_id = normalize_opt(Some(group.leader_id.as_str())).map(str::to_string);
        let mut member_ids = group.member_ids.clone();
        if let Some(leader) = &leader_id {
            member_ids.prepend(leader);
        }
        GroupEditSession {
            group_name: group.group_name.clone(),
            leader_id,
            member_ids,
            original: group,
        }
    }

    pub fn original(&self) -> &Group {
        &self.original
    }

    pub fn group_id(&self) -> Option<&str> {
        self.original.id()
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn leader(&self) -> Option<&str> {
        self.leader_id.as_deref()
    }

    pub fn members(&self) -> &MemberSet {
        &self.member_ids
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.group_name = name.into();
    }

    /// Returns `true` if the member was added.
    pub fn add_member(&mut self, id: &str) -> bool {
        self.member_ids.insert(id)
    }

    /// Returns `true` if the member was present. Re-derives the leader when
    /// the leader is the one removed.
    pub fn remove_member(&mut self, id: &str) -> bool {
        if !self.member_ids.remove(id) {
            return false;
        }
        if let Some(leader) = self.leader_id.take() {
            self.leader_id = on_member_removed(&leader, id, self.member_ids.as_slice());
        }
        true
    }

    /// Make `id` the leader, adding them to the members when absent. A blank
    /// id is ignored.
    pub fn set_leader(&mut self, id: &str) {
        if let Some(id) = normalize_opt(Some(id)) {
            self.member_ids.insert(id);
            self.leader_id = Some(id.to_string());
        }
    }

    /// True when nothing differs from the state the session opened with.
    pub fn is_unchanged(&self) -> bool {
        let opened = GroupEditSession::open(self.original.clone());
        self.group_name == opened.group_name
            && self.leader_id == opened.leader_id
            && self.member_ids == opened.member_ids
    }

    /// Validate the edited state and produce the patch for the group store.
    pub fn submit<C: CourseCatalog + ?Sized>(
        &self,
        validator: &GroupCompositionValidator<'_, C>,
        editor: &User,
    ) -> Result<GroupPatch, ValidationErrors> {
        self.submit_onto(&self.original, validator, editor)
    }

    /// Like [`submit`](Self::submit), but validated and diffed against
    /// `base`, normally the record as currently stored.
    pub fn submit_onto<C: CourseCatalog + ?Sized>(
        &self,
        base: &Group,
        validator: &GroupCompositionValidator<'_, C>,
        editor: &User,
    ) -> Result<GroupPatch, ValidationErrors> {
        let revised = validator.validate_revision(
            base,
            &self.group_name,
            self.leader_id.as_deref(),
            &self.member_ids,
            editor,
        )?;
        let patch = diff(base, &revised);
        log::debug!(
            "Edit of group {:?} by {} validated",
            base.group_id,
            editor.institutional_id.trim()
        );
        Ok(patch)
    }
}

/// Fields of `target` that differ from `base`.
fn diff(base: &Group, target: &Group) -> GroupPatch {
    GroupPatch {
        group_name: (target.group_name != base.group_name).then(|| target.group_name.clone()),
        leader_id: (!ids_equal(&target.leader_id, &base.leader_id))
            .then(|| target.leader_id.clone()),
        member_ids: (target.member_ids != base.member_ids).then(|| target.member_ids.clone()),
        adviser_id: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::composition::ValidationError;
    use crate::groups::ids::CourseId;
    use crate::groups::model::Course;
    use crate::groups::role::Role;

    struct OneCourse;

    impl CourseCatalog for OneCourse {
        fn get_course(&self, course_id: CourseId) -> Option<Course> {
            (course_id == 5).then(|| Course::new(5, "Thesis", "CS499"))
        }

        fn list_enrolled(&self, _student_id: &str) -> Vec<Course> {
            vec![Course::new(5, "Thesis", "CS499")]
        }
    }

    fn stored(leader: &str, members: &[&str]) -> Group {
        Group {
            group_id: Some("g1".into()),
            group_name: "Alpha".into(),
            course_id: 5,
            leader_id: leader.into(),
            member_ids: members.iter().collect(),
            created_by: Some("12".into()),
            adviser_id: Some("40".into()),
            allow_leader_edit: Some(true),
            created_at: None,
        }
    }

    fn teacher() -> User {
        User::new("12", Role::Teacher)
    }

    #[test]
    fn test_open_seats_leader() {
        let session = GroupEditSession::open(stored("S1", &["S2", "S3"]));
        assert_eq!(session.leader(), Some("S1"));
        assert_eq!(session.members().as_slice(), &["S1", "S2", "S3"]);
        assert!(session.is_unchanged());
    }

    #[test]
    fn test_removing_leader_promotes_next_in_display_order() {
        let mut session = GroupEditSession::open(stored("S1", &["S1", "S2", "S3"]));
        assert!(session.remove_member("S1"));
        assert_eq!(session.leader(), Some("S2"));

        assert!(session.remove_member("S3"));
        assert_eq!(session.leader(), Some("S2"));
        assert!(!session.remove_member("S9"));
    }

    #[test]
    fn test_removing_everyone_blocks_submit_until_leader_set() {
        let v = GroupCompositionValidator::new(&OneCourse);
        let mut session = GroupEditSession::open(stored("S1", &["S1"]));
        session.remove_member("S1");
        assert_eq!(session.leader(), None);

        let err = session.submit(&v, &teacher()).unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::LeaderRequired]);

        session.set_leader(" S5 ");
        assert_eq!(session.members().as_slice(), &["S5"]);
        let patch = session.submit(&v, &teacher()).unwrap();
        assert_eq!(patch.leader_id.as_deref(), Some("S5"));
        assert_eq!(patch.member_ids.unwrap().as_slice(), &["S5"]);
        assert_eq!(patch.group_name, None);
    }

    #[test]
    fn test_submit_patch_contains_only_changes() {
        let v = GroupCompositionValidator::new(&OneCourse);
        let mut session = GroupEditSession::open(stored("S1", &["S1", "S2"]));
        session.rename("  Alpha Prime ");
        session.add_member("S3");
        assert!(!session.add_member("S2"));

        let patch = session.submit(&v, &teacher()).unwrap();
        assert_eq!(patch.group_name.as_deref(), Some("Alpha Prime"));
        assert_eq!(patch.leader_id, None);
        assert_eq!(patch.member_ids.unwrap().as_slice(), &["S1", "S2", "S3"]);
        assert_eq!(patch.adviser_id, None);
    }

    #[test]
    fn test_submit_rejects_blank_name() {
        let v = GroupCompositionValidator::new(&OneCourse);
        let mut session = GroupEditSession::open(stored("S1", &["S1"]));
        session.rename(" ");
        let err = session.submit(&v, &teacher()).unwrap_err();
        assert_eq!(err.errors(), &[ValidationError::EmptyName]);
    }

    #[test]
    fn test_student_editor_keeps_session_leader() {
        let v = GroupCompositionValidator::new(&OneCourse);
        let mut session = GroupEditSession::open(stored("S1", &["S1", "S2"]));
        session.set_leader("S2");

        let patch = session.submit(&v, &User::new("S1", Role::Student)).unwrap();
        assert_eq!(patch.leader_id.as_deref(), Some("S2"));
    }

    #[test]
    fn test_submit_onto_diffs_against_given_record() {
        let v = GroupCompositionValidator::new(&OneCourse);
        let session = GroupEditSession::open(stored("S1", &["S1", "S2"]));
        let mut current = stored("S1", &["S1", "S2", "S3"]);
        current.group_name = "Renamed".into();

        let patch = session.submit_onto(&current, &v, &teacher()).unwrap();
        assert_eq!(patch.group_name.as_deref(), Some("Alpha"));
        assert_eq!(patch.member_ids.unwrap().as_slice(), &["S1", "S2"]);
        assert_eq!(patch.leader_id, None);
    }
}
