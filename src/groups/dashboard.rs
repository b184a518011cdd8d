/// Dashboard classification: splits the groups a viewer can see into the
/// groups they created and the groups they were assigned to.
///
/// Each group is mapped to at most one [`Bucket`], so the two lists are
/// disjoint by construction. Groups that belong in neither are dropped.
///
/// Records without `created_by` predate creator tracking; a student leading
/// one is treated as its creator.

use serde::Serialize;

use crate::groups::model::{Group, User};
use crate::groups::role::Role;
use crate::groups::size::membership_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Created,
    Assigned,
}

/// Classified view over a borrowed group catalog. Input order is kept
/// within each bucket.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dashboard<'a> {
    pub created: Vec<&'a Group>,
    pub assigned: Vec<&'a Group>,
}

impl<'a> Dashboard<'a> {
    pub fn len(&self) -> usize {
        self.created.len() + self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.assigned.is_empty()
    }

    /// Owned copy with display sizes attached.
    pub fn annotate(&self) -> DashboardView {
        DashboardView {
            created: self.created.iter().map(|g| DashboardEntry::new(g)).collect(),
            assigned: self.assigned.iter().map(|g| DashboardEntry::new(g)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    #[serde(flatten)]
    pub group: Group,
    pub member_count: usize,
}

impl DashboardEntry {
    pub fn new(group: &Group) -> Self {
        DashboardEntry {
            member_count: membership_size(group),
            group: group.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub created: Vec<DashboardEntry>,
    pub assigned: Vec<DashboardEntry>,
}

/// Bucket for one group as seen by `viewer`, if any.
pub fn bucket_for(group: &Group, viewer: &User) -> Option<Bucket> {
    let me = viewer.institutional_id.as_str();
    let is_leader = group.is_led_by(me);
    let is_member = group.has_member(me);
    let creator = group.creator();

    match &viewer.role {
        Role::Student => {
            let self_created = creator.map_or(true, |c| viewer.is(c));
            if is_leader && self_created {
                Some(Bucket::Created)
            } else if is_member {
                // A leader reaching here was appointed by someone else.
                Some(Bucket::Assigned)
            } else {
                None
            }
        }
        Role::Teacher => match creator {
            Some(c) if viewer.is(c) => Some(Bucket::Created),
            _ => None,
        },
        Role::Other(_) => {
            if is_leader {
                Some(Bucket::Created)
            } else if is_member {
                Some(Bucket::Assigned)
            } else {
                None
            }
        }
    }
}

/// Partition `groups` for `viewer`. Read-only over the input.
pub fn classify<'a>(groups: &'a [Group], viewer: &User) -> Dashboard<'a> {
    let mut dashboard = Dashboard::default();
    for group in groups {
        match bucket_for(group, viewer) {
            Some(Bucket::Created) => dashboard.created.push(group),
            Some(Bucket::Assigned) => dashboard.assigned.push(group),
            None => {}
        }
    }
    log::debug!(
        "Classified {} groups for {} ({}): {} created, {} assigned",
        groups.len(),
        viewer.institutional_id.trim(),
        viewer.role,
        dashboard.created.len(),
        dashboard.assigned.len()
    );
    dashboard
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::members::MemberSet;

    fn group(id: &str, leader: &str, members: &[&str], created_by: Option<&str>) -> Group {
        Group {
            group_id: Some(id.into()),
            group_name: id.to_uppercase(),
            course_id: 5,
            leader_id: leader.into(),
            member_ids: members.iter().collect(),
            created_by: created_by.map(Into::into),
            adviser_id: None,
            allow_leader_edit: None,
            created_at: None,
        }
    }

    fn ids(groups: &[&Group]) -> Vec<String> {
        groups.iter().filter_map(|g| g.group_id.clone()).collect()
    }

    fn catalog() -> Vec<Group> {
        vec![
            // S1 created and leads
            group("g1", "S1", &["S1", "S2"], Some("S1")),
            // legacy record led by S1
            group("g2", "S1", &["S3"], None),
            // teacher 12 appointed S1 as leader
            group("g3", "S1", &["S1", "S4"], Some("12")),
            // S1 plain member
            group("g4", "S2", &["S2", "S1"], Some("S2")),
            // S1 not involved
            group("g5", "S5", &["S6"], Some("12")),
            // created by S1 but S1 no longer leads or belongs
            group("g6", "S7", &["S8"], Some("S1")),
        ]
    }

    #[test]
    fn test_student_buckets() {
        let groups = catalog();
        let d = classify(&groups, &User::new("S1", Role::Student));
        assert_eq!(ids(&d.created), vec!["g1", "g2"]);
        assert_eq!(ids(&d.assigned), vec!["g3", "g4"]);
    }

    #[test]
    fn test_legacy_leader_lands_in_created() {
        let groups = vec![group("g", " S1 ", &[], None)];
        let d = classify(&groups, &User::new("S1", Role::Student));
        assert_eq!(d.created.len(), 1);
        assert!(d.assigned.is_empty());
    }

    #[test]
    fn test_teacher_appointed_leader_lands_in_assigned() {
        let groups = vec![group("g", "S1", &["S2"], Some("1643"))];
        let d = classify(&groups, &User::new("S1", Role::Student));
        assert!(d.created.is_empty());
        assert_eq!(d.assigned.len(), 1);
    }

    #[test]
    fn test_teacher_sees_only_own_creations() {
        let groups = catalog();
        let d = classify(&groups, &User::new(" 12", Role::Teacher));
        assert_eq!(ids(&d.created), vec!["g3", "g5"]);
        assert!(d.assigned.is_empty());
    }

    #[test]
    fn test_teacher_ignores_legacy_records() {
        let groups = vec![group("g", "12", &["12"], None)];
        let d = classify(&groups, &User::new("12", Role::Teacher));
        assert!(d.is_empty());
    }

    #[test]
    fn test_other_role_fallback() {
        let groups = catalog();
        let viewer = User::new("S1", Role::Other("ADMIN".into()));
        let d = classify(&groups, &viewer);
        assert_eq!(ids(&d.created), vec!["g1", "g2", "g3"]);
        assert_eq!(ids(&d.assigned), vec!["g4"]);
    }

    #[test]
    fn test_degraded_members_only_affect_that_group() {
        let mut broken = group("bad", "S9", &[], Some("S9"));
        broken.member_ids = MemberSet::from_encoded("[\"S1\"");
        let groups = vec![broken, group("ok", "S2", &["S1"], Some("S2"))];

        let d = classify(&groups, &User::new("S1", Role::Student));
        assert!(d.created.is_empty());
        assert_eq!(ids(&d.assigned), vec!["ok"]);
    }

    #[test]
    fn test_buckets_never_overlap() {
        let groups = catalog();
        let viewers = ["S1", "S2", "S3", "S7", "12", "99"];
        let roles = [Role::Student, Role::Teacher, Role::Other("UNKNOWN".into())];

        for id in viewers {
            for role in &roles {
                let d = classify(&groups, &User::new(id, role.clone()));
                for g in &d.created {
                    assert!(!d.assigned.iter().any(|a| std::ptr::eq(*a, *g)));
                }
                assert!(d.len() <= groups.len());
            }
        }
    }

    #[test]
    fn test_annotate_attaches_sizes() {
        let groups = catalog();
        let view = classify(&groups, &User::new("S1", Role::Student)).annotate();
        let counts: Vec<usize> = view.created.iter().map(|e| e.member_count).collect();
        assert_eq!(counts, vec![2, 2]);
        assert_eq!(view.assigned[0].member_count, 2);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["created"][0]["groupId"], "g1");
        assert_eq!(json["created"][0]["memberCount"], 2);
    }
}
