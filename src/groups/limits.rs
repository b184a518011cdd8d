/// Roster guardrails.

/// Max group name length in characters (width of the name column).
pub const MAX_GROUP_NAME_CHARS: usize = 255;

/// Max candidates returned by a directory search.
pub const MAX_DIRECTORY_RESULTS: usize = 50;

/// Check a trimmed group name against the length cap.
pub fn name_within_limit(name: &str) -> bool {
    name.chars().count() <= MAX_GROUP_NAME_CHARS
}
