//! Roster service: the group workflows an application exposes, wired over
//! the collaborator contracts.
//!
//! Every operation takes the acting user explicitly. Rules come from
//! [`crate::groups`]; this layer only authorizes, sequences and persists.

use thiserror::Error;

use crate::collab::{CourseCatalog, GroupStore, SessionContext, StoreError, UserDirectory};
use crate::groups::composition::{GroupCompositionValidator, ValidationErrors};
use crate::groups::dashboard::{classify, DashboardView};
use crate::groups::edit::GroupEditSession;
use crate::groups::ids::normalize_opt;
use crate::groups::model::{Group, GroupPatch, GroupRequest, User};
use crate::groups::policy::{DefaultAuthorizer, GroupAuthorizer, RosterPolicy};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Adviser must be a teacher or administrator: {0}")]
    InvalidAdviser(String),
    #[error("No signed-in user")]
    Unauthenticated,
}

pub type Result<T> = std::result::Result<T, ServiceError>;

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct RosterService<C, S, A = DefaultAuthorizer> {
    catalog: C,
    store: S,
    authorizer: A,
    policy: RosterPolicy,
}

impl<C: CourseCatalog, S: GroupStore> RosterService<C, S, DefaultAuthorizer> {
    pub fn new(catalog: C, store: S) -> Self {
        Self::with_policy(catalog, store, RosterPolicy::default())
    }

    pub fn with_policy(catalog: C, store: S, policy: RosterPolicy) -> Self {
        RosterService {
            catalog,
            store,
            authorizer: DefaultAuthorizer::new(policy),
            policy,
        }
    }
}

impl<C: CourseCatalog, S: GroupStore, A: GroupAuthorizer> RosterService<C, S, A> {
    /// Use a caller-supplied authorizer. `policy` still drives composition
    /// defaults such as `leader_edit_default`.
    pub fn with_authorizer(catalog: C, store: S, authorizer: A, policy: RosterPolicy) -> Self {
        RosterService {
            catalog,
            store,
            authorizer,
            policy,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &RosterPolicy {
        &self.policy
    }

    fn validator(&self) -> GroupCompositionValidator<'_, C> {
        GroupCompositionValidator::new(&self.catalog).with_policy(self.policy)
    }

    fn load(&self, group_id: &str) -> Result<Group> {
        self.store
            .get(group_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("group {}", group_id)))
    }

    /// Validate a request against the current roster and persist the
    /// resulting group.
    pub fn create_group(&self, request: &GroupRequest, actor: &User) -> Result<Group> {
        let roster = self.store.list_all()?;
        let draft = self.validator().with_roster(&roster).validate(request, actor)?;
        let group = self.store.create(draft)?;
        log::info!(
            "Group {:?} '{}' created by {} ({})",
            group.group_id,
            group.group_name,
            actor.institutional_id.trim(),
            actor.role
        );
        Ok(group)
    }

    /// Open an edit session on a stored group the actor may edit.
    pub fn edit_group(&self, group_id: &str, actor: &User) -> Result<GroupEditSession> {
        let group = self.load(group_id)?;
        if !self.authorizer.can_edit(&group, actor) {
            log::warn!(
                "{} ({}) denied edit of group {}",
                actor.institutional_id.trim(),
                actor.role,
                group_id
            );
            return Err(ServiceError::Forbidden(format!("cannot edit group {}", group_id)));
        }
        Ok(GroupEditSession::open(group))
    }

    /// Validate a session and write its changes. Authorization and the patch
    /// are computed against the record as stored now, not the copy the
    /// session was opened on. An unchanged edit returns the stored record
    /// without touching the store.
    pub fn submit_edit(&self, session: &GroupEditSession, actor: &User) -> Result<Group> {
        let group_id = session.group_id().ok_or(StoreError::MissingId)?;
        let stored = self.load(group_id)?;
        if !self.authorizer.can_edit(&stored, actor) {
            log::warn!(
                "{} ({}) denied submit on group {}",
                actor.institutional_id.trim(),
                actor.role,
                group_id
            );
            return Err(ServiceError::Forbidden(format!("cannot edit group {}", group_id)));
        }

        let roster = self.store.list_all()?;
        let validator = self.validator().with_roster(&roster);
        let patch = session.submit_onto(&stored, &validator, actor)?;
        if patch.is_empty() {
            log::debug!("Edit of group {} has no changes", group_id);
            return Ok(stored);
        }

        let group = self.store.update(group_id, patch)?;
        log::info!("Group {} updated by {}", group_id, actor.institutional_id.trim());
        Ok(group)
    }

    pub fn delete_group(&self, group_id: &str, actor: &User) -> Result<()> {
        let group = self.load(group_id)?;
        if !self.authorizer.can_delete(&group, actor) {
            log::warn!(
                "{} ({}) denied delete of group {}",
                actor.institutional_id.trim(),
                actor.role,
                group_id
            );
            return Err(ServiceError::Forbidden(format!("cannot delete group {}", group_id)));
        }
        self.store.delete(group_id)?;
        log::info!("Group {} deleted by {}", group_id, actor.institutional_id.trim());
        Ok(())
    }

    /// Created/assigned view of the whole catalog for `viewer`, with sizes.
    pub fn dashboard(&self, viewer: &User) -> Result<DashboardView> {
        let groups = self.store.list_all()?;
        Ok(classify(&groups, viewer).annotate())
    }

    pub fn dashboard_for_session(&self, session: &impl SessionContext) -> Result<DashboardView> {
        let viewer = session.current_user().ok_or(ServiceError::Unauthenticated)?;
        self.dashboard(&viewer)
    }

    /// Set or clear (`None`) a group's adviser. Teachers only; the adviser is
    /// resolved through `directory` and must be a teacher or administrator.
    pub fn assign_adviser(
        &self,
        group_id: &str,
        adviser_id: Option<&str>,
        actor: &User,
        directory: &impl UserDirectory,
    ) -> Result<Group> {
        if !actor.role.is_teacher() {
            return Err(ServiceError::Forbidden("only teachers assign advisers".into()));
        }
        self.load(group_id)?;

        let adviser = match normalize_opt(adviser_id) {
            Some(id) => {
                let user = directory
                    .get(id)
                    .ok_or_else(|| ServiceError::NotFound(format!("user {}", id)))?;
                if !(user.role.is_teacher() || user.role.is_admin()) {
                    return Err(ServiceError::InvalidAdviser(id.to_string()));
                }
                Some(id.to_string())
            }
            None => None,
        };

        let patch = GroupPatch {
            adviser_id: Some(adviser.clone()),
            ..Default::default()
        };
        let group = self.store.update(group_id, patch)?;
        log::info!(
            "Group {} adviser set to {:?} by {}",
            group_id,
            adviser,
            actor.institutional_id.trim()
        );
        Ok(group)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
