/// User roles and institutional-ID based role detection.
///
/// `Role` is a closed variant set with an explicit catch-all: anything that is
/// not `STUDENT` or `TEACHER` is carried verbatim in `Other` so the fallback
/// branches of the validator and classifier stay exhaustive.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `YY-####-###`, e.g. `22-1234-567`.
static STUDENT_SHORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{4}-\d{3}$").expect("valid student pattern"));

/// `YYYY-#####`, e.g. `2010-12345`.
static STUDENT_LONG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{5}$").expect("valid student pattern"));

/// Plain staff number, 1 to 4 digits.
static TEACHER_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,4}$").expect("valid teacher pattern"));

pub const ADMIN_TAG: &str = "ADMIN";
pub const UNKNOWN_TAG: &str = "UNKNOWN";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Student,
    Teacher,
    /// Any other role tag, kept as received (upper-cased).
    Other(String),
}

impl Role {
    /// Derive a role from the shape of an institutional ID.
    pub fn from_institutional_id(id: &str) -> Role {
        let id = id.trim();
        if id.is_empty() {
            return Role::Other(UNKNOWN_TAG.to_string());
        }
        if STUDENT_SHORT.is_match(id) || STUDENT_LONG.is_match(id) {
            return Role::Student;
        }
        if TEACHER_NUMBER.is_match(id) {
            return Role::Teacher;
        }
        // Case-sensitive: "Administrator" is not an admin id.
        if id.contains(ADMIN_TAG) {
            return Role::Other(ADMIN_TAG.to_string());
        }
        Role::Other(UNKNOWN_TAG.to_string())
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Role::Student)
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::Teacher)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Other(tag) if tag == ADMIN_TAG)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "STUDENT",
            Role::Teacher => "TEACHER",
            Role::Other(tag) => tag,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        let tag = s.trim().to_ascii_uppercase();
        match tag.as_str() {
            "STUDENT" => Role::Student,
            "TEACHER" => Role::Teacher,
            _ => Role::Other(tag),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
