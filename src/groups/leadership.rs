/// Leader re-derivation when a member is removed during an edit.

use crate::groups::ids::{ids_equal, normalize_id};

/// Leader after `removed` leaves the group.
///
/// Removing anyone but the leader keeps the leader. Removing the leader
/// promotes the first of `remaining` in display order, or yields `None` when
/// nobody is left. `None` is a valid in-progress state; submitting it fails
/// with `LeaderRequired`.
pub fn on_member_removed<S: AsRef<str>>(
    current_leader: &str,
    removed: &str,
    remaining: &[S],
) -> Option<String> {
    if !ids_equal(current_leader, removed) {
        return Some(normalize_id(current_leader).to_string());
    }

    let next = remaining
        .iter()
        .map(|m| normalize_id(m.as_ref()))
        .find(|m| !m.is_empty() && !ids_equal(m, removed))
        .map(str::to_string);

    match &next {
        Some(id) => log::debug!("Leader {} removed, promoting {}", normalize_id(removed), id),
        None => log::debug!("Leader {} removed, no members left", normalize_id(removed)),
    }
    next
}
