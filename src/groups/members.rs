/// MemberSet: deduplicated, order-preserving list of institutional IDs.
///
/// Entries are stored normalized (see [`normalize_id`]); blank entries are
/// dropped on insert. Order is first-seen order, which is also the display
/// order used when a leader has to be re-derived.
///
/// Deserialization is lenient: legacy rows store the list as a JSON array
/// encoded inside a string, and corrupt values degrade to an empty set rather
/// than failing the surrounding record.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::groups::ids::{ids_equal, normalize_id};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MemberSet {
    ids: Vec<String>,
}

impl MemberSet {
    pub fn new() -> Self {
        MemberSet { ids: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership test by normalized id.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|m| ids_equal(m, id))
    }

    /// First member in display order.
    pub fn first(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    /// Append if not already present. Returns `true` if the set changed.
    pub fn insert(&mut self, id: &str) -> bool {
        let id = normalize_id(id);
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Insert at the front if not already present. Returns `true` if the set changed.
    pub fn prepend(&mut self, id: &str) -> bool {
        let id = normalize_id(id);
        if id.is_empty() || self.contains(id) {
            return false;
        }
        self.ids.insert(0, id.to_string());
        true
    }

    /// Remove by normalized id. Returns `true` if a member was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|m| !ids_equal(m, id));
        self.ids.len() != before
    }

    /// Parse the legacy string-encoded form (`["id1", "id2"]`).
    ///
    /// Blank input is an empty set. Anything that is not a JSON array of
    /// strings is logged and treated as empty.
    pub fn from_encoded(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return MemberSet::new();
        }
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(ids) => ids.iter().collect(),
            Err(e) => {
                log::warn!("Malformed member list treated as empty: {}", e);
                MemberSet::new()
            }
        }
    }

    /// Encode in the legacy string form.
    pub fn to_encoded(&self) -> String {
        // A Vec<String> always serializes.
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string())
    }
}

impl<S: AsRef<str>> FromIterator<S> for MemberSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = MemberSet::new();
        for id in iter {
            set.insert(id.as_ref());
        }
        set
    }
}

impl fmt::Display for MemberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.ids.join(", "))
    }
}

/// Wire shapes accepted for a member list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMembers {
    List(Vec<String>),
    Encoded(String),
    Unreadable(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for MemberSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawMembers::deserialize(deserializer)? {
            RawMembers::List(ids) => ids.iter().collect(),
            RawMembers::Encoded(raw) => MemberSet::from_encoded(&raw),
            RawMembers::Unreadable(_) => {
                log::warn!("Unreadable member list treated as empty");
                MemberSet::new()
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
