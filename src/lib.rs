//! roster-core: group membership and dashboard rules for course rosters.
//!
//! | Module | Contents |
//! |---|---|
//! | [`groups`] | Pure rules: MemberSet, composition validation, leader reassignment, sizing, dashboard buckets, authorization policy |
//! | [`collab`] | Collaborator contracts (course catalog, user directory, group store, session) and in-memory implementations |
//! | [`service`] | RosterService workflows over the collaborators |
//!
//! | Feature | Default | Effect |
//! |---|---|---|
//! | `memory` | yes | In-memory collaborators in [`collab::memory`] |
//!
//! The crate logs through the `log` facade and never installs a logger.

pub mod collab;
pub mod groups;
pub mod service;

// ── Re-export main types ────────────────────────────────────────────────────
pub use collab::{
    CourseCatalog, GroupStore, SessionContext, StoreError, StoreResult, UserDirectory,
};
pub use groups::{
    classify, membership_size, normalize_id, on_member_removed, Bucket, Course, CourseId,
    DefaultAuthorizer, DeletionRule, Group, GroupAuthorizer, GroupCompositionValidator,
    GroupEditSession, GroupPatch, GroupRequest, MemberSet, Role, RosterPolicy, User,
    ValidationError, ValidationErrors,
};
pub use service::{RosterService, ServiceError};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version
pub fn get_version() -> &'static str {
    VERSION
}
