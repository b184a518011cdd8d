//! External collaborator contracts.
//!
//! The rules in [`crate::groups`] never fetch or persist anything. The
//! application supplies these collaborators (a database, an HTTP client, the
//! sign-in layer); the `memory` feature ships in-memory implementations for
//! tests and embedded use.

use thiserror::Error;

use crate::groups::ids::CourseId;
use crate::groups::model::{Course, Group, GroupPatch, User};

#[cfg(feature = "memory")]
pub mod memory;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Group not found: {0}")]
    NotFound(String),
    #[error("Group has no id")]
    MissingId,
    #[error("Group store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Contracts (app implements)
// ---------------------------------------------------------------------------

/// Course lookup. `None` from `get_course` is the catalog's NotFound.
pub trait CourseCatalog {
    fn get_course(&self, course_id: CourseId) -> Option<Course>;

    /// Courses the student is enrolled in as a student.
    fn list_enrolled(&self, student_id: &str) -> Vec<Course>;
}

/// User lookup: exact by id, and candidate search used by callers
/// assembling a request.
pub trait UserDirectory {
    /// Exact match on the normalized institutional id.
    fn get(&self, institutional_id: &str) -> Option<User>;

    /// Fuzzy, capped search. Not suitable for resolving a known id.
    fn search(&self, query: &str) -> Vec<User>;
}

/// Source of the group catalog and sink for validated groups.
pub trait GroupStore {
    fn list_all(&self) -> StoreResult<Vec<Group>>;

    fn get(&self, group_id: &str) -> StoreResult<Option<Group>>;

    /// Persist a draft. The store assigns `group_id` (and `created_at` when
    /// unset) and returns the stored record.
    fn create(&self, group: Group) -> StoreResult<Group>;

    fn update(&self, group_id: &str, patch: GroupPatch) -> StoreResult<Group>;

    fn delete(&self, group_id: &str) -> StoreResult<()>;
}

/// Supplies the signed-in user, if any.
pub trait SessionContext {
    fn current_user(&self) -> Option<User>;
}

impl SessionContext for Option<User> {
    fn current_user(&self) -> Option<User> {
        self.clone()
    }
}
