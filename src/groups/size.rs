/// Display member count: `|member_ids ∪ {leader_id}|`.

use crate::groups::model::Group;

/// Number of people in the group, counting the leader once whether or not
/// the persisted member list repeats them. A group whose member list was
/// unreadable still reports its leader.
pub fn membership_size(group: &Group) -> usize {
    let listed = group.member_ids.len();
    if group.member_ids.contains(&group.leader_id) {
        listed
    } else {
        listed + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::members::MemberSet;

    fn group(leader: &str, members: &[&str]) -> Group {
        Group {
            group_id: None,
            group_name: "G".into(),
            course_id: 1,
            leader_id: leader.into(),
            member_ids: members.iter().collect(),
            created_by: None,
            adviser_id: None,
            allow_leader_edit: None,
            created_at: None,
        }
    }

    #[test]
    fn test_leader_not_listed() {
        assert_eq!(membership_size(&group("S1", &["S2", "S3"])), 3);
    }

    #[test]
    fn test_leader_listed() {
        assert_eq!(membership_size(&group("S1", &["S1", "S2"])), 2);
        assert_eq!(membership_size(&group(" S1", &["S1 ", "S2"])), 2);
    }

    #[test]
    fn test_degraded_member_list_counts_leader() {
        let mut g = group("S1", &[]);
        g.member_ids = MemberSet::from_encoded("{not json");
        assert_eq!(membership_size(&g), 1);
    }

    #[test]
    fn test_size_does_not_mutate() {
        let g = group("S1", &["S2"]);
        let before = g.clone();
        let _ = membership_size(&g);
        assert_eq!(g, before);
    }
}
