pub mod composition;
/// Group rules: composition, leadership, sizing and dashboard buckets for
/// course project groups.
///
/// Everything here is pure: inputs come from the caller's collaborators
/// (see [`crate::collab`]) and results are returned, never persisted.
///
/// # Module structure
/// - `ids`: institutional id normalization, CourseId
/// - `members`: MemberSet, ordered deduplicated member ids with lenient decoding
/// - `role`: Role and institutional-id role detection
/// - `model`: User, Course, Group, GroupRequest, GroupPatch
/// - `limits`: Name length and directory result caps
/// - `policy`: RosterPolicy and the GroupAuthorizer contract
/// - `composition`: GroupCompositionValidator and ValidationError
/// - `leadership`: Leader reassignment on member removal
/// - `edit`: GroupEditSession
/// - `size`: Display member count
/// - `dashboard`: Created/assigned classification
pub mod dashboard;
pub mod edit;
pub mod ids;
pub mod leadership;
pub mod limits;
pub mod members;
pub mod model;
pub mod policy;
pub mod role;
pub mod size;

// Re-export core types for convenience
pub use composition::{GroupCompositionValidator, ValidationError, ValidationErrors};
pub use dashboard::{bucket_for, classify, Bucket, Dashboard, DashboardEntry, DashboardView};
pub use edit::GroupEditSession;
pub use ids::{ids_equal, is_blank, normalize_id, CourseId};
pub use leadership::on_member_removed;
pub use limits::{MAX_DIRECTORY_RESULTS, MAX_GROUP_NAME_CHARS};
pub use members::MemberSet;
pub use model::{Course, Group, GroupPatch, GroupRequest, User};
pub use policy::{DefaultAuthorizer, DeletionRule, GroupAuthorizer, RosterPolicy};
pub use role::Role;
pub use size::membership_size;
