/// Group composition: builds a normalized group draft from a creation request
/// and re-checks revisions produced by an edit session.
///
/// Leader derivation depends on who is acting:
/// - Student: always leads the group they create; a requested leader is ignored.
/// - Teacher: must name the leader.
/// - Any other role: requested leader, else first member, else the actor.
///
/// The leader is always seated in the member set (prepended when missing).
/// All checks run before returning so every failure is reported at once.
///
/// With a roster attached ([`GroupCompositionValidator::with_roster`]) every
/// seated member must also be enrolled in the course and must not belong to
/// another group of the same course.

use thiserror::Error;

use crate::collab::CourseCatalog;
use crate::groups::ids::{ids_equal, normalize_id, normalize_opt, CourseId};
use crate::groups::limits::{name_within_limit, MAX_GROUP_NAME_CHARS};
use crate::groups::members::MemberSet;
use crate::groups::model::{Group, GroupRequest, User};
use crate::groups::policy::RosterPolicy;
use crate::groups::role::Role;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Group name cannot be empty")]
    EmptyName,

    #[error("Group name exceeds {max} characters")]
    NameTooLong { max: usize },

    #[error("Course is missing or not visible to the acting user")]
    MissingCourse,

    #[error("A group leader is required")]
    LeaderRequired,

    #[error("Group has no members")]
    NoMembers,

    #[error("Member {id} is not enrolled in the course")]
    MemberNotEnrolled { id: String },

    #[error("Member {id} is already assigned to another group in the course")]
    MemberAlreadyGrouped { id: String },
}

/// Every failure found for one request, in rule order. Never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

pub struct GroupCompositionValidator<'a, C: CourseCatalog + ?Sized> {
    catalog: &'a C,
    policy: RosterPolicy,
    /// Existing groups, for the already-grouped check.
    roster: Option<&'a [Group]>,
}

impl<'a, C: CourseCatalog + ?Sized> GroupCompositionValidator<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        GroupCompositionValidator {
            catalog,
            policy: RosterPolicy::default(),
            roster: None,
        }
    }

    pub fn with_policy(mut self, policy: RosterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check seated members against enrollment and the groups in `roster`.
    pub fn with_roster<'b>(self, roster: &'b [Group]) -> GroupCompositionValidator<'b, C>
    where
        'a: 'b,
    {
        GroupCompositionValidator {
            catalog: self.catalog,
            policy: self.policy,
            roster: Some(roster),
        }
    }

    pub fn policy(&self) -> &RosterPolicy {
        &self.policy
    }

    /// Validate a creation request. Pure: nothing is persisted.
    pub fn validate(&self, request: &GroupRequest, acting: &User) -> Result<Group, ValidationErrors> {
        let mut errors = Vec::new();

        let group_name = check_name(&request.group_name, &mut errors);

        let course_id = self.visible_course(request.course_id, acting);
        if course_id.is_none() {
            errors.push(ValidationError::MissingCourse);
        }

        let mut member_ids: MemberSet = request.member_ids.iter().collect();
        let leader_id = derive_leader(acting, request.requested_leader_id.as_deref(), &member_ids);
        seat_leader(leader_id.as_deref(), &mut member_ids, &mut errors);
        if let Some(course_id) = course_id {
            self.check_membership(course_id, &member_ids, None, &mut errors);
        }

        match (course_id, leader_id) {
            (Some(course_id), Some(leader_id)) if errors.is_empty() => {
                log::debug!(
                    "Validated group '{}' in course {} led by {} ({} members)",
                    group_name,
                    course_id,
                    leader_id,
                    member_ids.len()
                );
                Ok(Group {
                    group_id: None,
                    group_name,
                    course_id,
                    leader_id,
                    member_ids,
                    created_by: normalize_opt(Some(acting.institutional_id.as_str())).map(str::to_string),
                    adviser_id: None,
                    allow_leader_edit: acting
                        .role
                        .is_teacher()
                        .then_some(self.policy.leader_edit_default),
                    created_at: None,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }

    /// Re-check an edited group. Leader and members come from the edit, not
    /// from the editor's role; the course stays that of the stored record and
    /// must be visible to the editor.
    pub fn validate_revision(
        &self,
        original: &Group,
        group_name: &str,
        leader_id: Option<&str>,
        member_ids: &MemberSet,
        editor: &User,
    ) -> Result<Group, ValidationErrors> {
        let mut errors = Vec::new();

        let group_name = check_name(group_name, &mut errors);

        let course_id = self.visible_course(Some(original.course_id), editor);
        if course_id.is_none() {
            errors.push(ValidationError::MissingCourse);
        }

        let mut member_ids: MemberSet = member_ids.iter().collect();
        let leader_id = normalize_opt(leader_id);
        seat_leader(leader_id, &mut member_ids, &mut errors);
        if let Some(course_id) = course_id {
            self.check_membership(course_id, &member_ids, original.id(), &mut errors);
        }

        match leader_id {
            Some(leader_id) if errors.is_empty() => Ok(Group {
                group_name,
                leader_id: leader_id.to_string(),
                member_ids,
                ..original.clone()
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }

    /// The course id if it resolves and the actor can see it.
    fn visible_course(&self, course_id: Option<CourseId>, acting: &User) -> Option<CourseId> {
        let course_id = course_id?;
        let visible = match acting.role {
            Role::Student => self
                .catalog
                .list_enrolled(normalize_id(&acting.institutional_id))
                .iter()
                .any(|c| c.course_id == course_id),
            Role::Teacher | Role::Other(_) => self.catalog.get_course(course_id).is_some(),
        };
        if !visible {
            log::debug!(
                "Course {} not visible to {} ({})",
                course_id,
                normalize_id(&acting.institutional_id),
                acting.role
            );
        }
        visible.then_some(course_id)
    }

    /// Enrollment and single-group checks. Skipped without a roster.
    /// `own_group` is excluded from the already-grouped scan.
    fn check_membership(
        &self,
        course_id: CourseId,
        members: &MemberSet,
        own_group: Option<&str>,
        errors: &mut Vec<ValidationError>,
    ) {
        let roster = match self.roster {
            Some(roster) => roster,
            None => return,
        };
        for id in members.iter() {
            let enrolled = self
                .catalog
                .list_enrolled(id)
                .iter()
                .any(|c| c.course_id == course_id);
            if !enrolled {
                errors.push(ValidationError::MemberNotEnrolled { id: id.to_string() });
                continue;
            }
            let grouped = roster.iter().any(|g| {
                g.course_id == course_id
                    && !matches!((g.id(), own_group), (Some(a), Some(b)) if ids_equal(a, b))
                    && g.has_member(id)
            });
            if grouped {
                errors.push(ValidationError::MemberAlreadyGrouped { id: id.to_string() });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn check_name(raw: &str, errors: &mut Vec<ValidationError>) -> String {
    let name = raw.trim();
    if name.is_empty() {
        errors.push(ValidationError::EmptyName);
    } else if !name_within_limit(name) {
        errors.push(ValidationError::NameTooLong {
            max: MAX_GROUP_NAME_CHARS,
        });
    }
    name.to_string()
}

fn derive_leader(acting: &User, requested: Option<&str>, members: &MemberSet) -> Option<String> {
    let actor_id = normalize_opt(Some(acting.institutional_id.as_str()));
    let requested = normalize_opt(requested);

    let leader = match &acting.role {
        Role::Student => {
            if let (Some(req), Some(actor)) = (requested, actor_id) {
                if !ids_equal(req, actor) {
                    log::debug!("Student {} creating group, requested leader {} overridden", actor, req);
                }
            }
            actor_id
        }
        Role::Teacher => requested,
        Role::Other(tag) => {
            log::warn!("Deriving leader for unrecognized role {}", tag);
            requested.or_else(|| members.first()).or(actor_id)
        }
    };
    leader.map(str::to_string)
}

fn seat_leader(leader: Option<&str>, members: &mut MemberSet, errors: &mut Vec<ValidationError>) {
    match leader {
        Some(leader) => {
            members.prepend(leader);
        }
        None => errors.push(ValidationError::LeaderRequired),
    }
    if members.is_empty() && !errors.contains(&ValidationError::LeaderRequired) {
        errors.push(ValidationError::NoMembers);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
