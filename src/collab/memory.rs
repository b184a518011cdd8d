/// In-memory collaborators for tests and embedded use.
///
/// `MemoryGroupStore` keeps groups in insertion order so dashboards read back
/// the same order they were created in.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::{CourseCatalog, GroupStore, StoreError, StoreResult, UserDirectory};
use crate::groups::ids::{ids_equal, normalize_id, CourseId};
use crate::groups::limits::MAX_DIRECTORY_RESULTS;
use crate::groups::model::{Course, Group, GroupPatch, User};

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryGroupStore {
    groups: Mutex<Vec<Group>>,
}

impl MemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing records as-is, e.g. legacy rows without a creator.
    pub fn with_groups(groups: Vec<Group>) -> Self {
        MemoryGroupStore {
            groups: Mutex::new(groups),
        }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Vec<Group>>> {
        self.groups
            .lock()
            .map_err(|_| StoreError::Unavailable("group store lock poisoned".into()))
    }
}

fn has_id(group: &Group, group_id: &str) -> bool {
    group.id().map_or(false, |id| ids_equal(id, group_id))
}

impl GroupStore for MemoryGroupStore {
    fn list_all(&self) -> StoreResult<Vec<Group>> {
        Ok(self.lock()?.clone())
    }

    fn get(&self, group_id: &str) -> StoreResult<Option<Group>> {
        Ok(self.lock()?.iter().find(|g| has_id(g, group_id)).cloned())
    }

    fn create(&self, mut group: Group) -> StoreResult<Group> {
        let mut groups = self.lock()?;
        if group.id().is_none() {
            group.group_id = Some(Uuid::new_v4().to_string());
        }
        if group.created_at.is_none() {
            group.created_at = Some(Utc::now());
        }
        groups.push(group.clone());
        log::debug!("Stored group {:?} ({} total)", group.group_id, groups.len());
        Ok(group)
    }

    fn update(&self, group_id: &str, patch: GroupPatch) -> StoreResult<Group> {
        let mut groups = self.lock()?;
        let group = groups
            .iter_mut()
            .find(|g| has_id(g, group_id))
            .ok_or_else(|| StoreError::NotFound(group_id.to_string()))?;
        patch.apply_to(group);
        Ok(group.clone())
    }

    fn delete(&self, group_id: &str) -> StoreResult<()> {
        let mut groups = self.lock()?;
        let before = groups.len();
        groups.retain(|g| !has_id(g, group_id));
        if groups.len() == before {
            return Err(StoreError::NotFound(group_id.to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryCourseCatalog {
    courses: Vec<Course>,
    /// student id -> enrolled course ids
    enrollments: HashMap<String, Vec<CourseId>>,
}

impl MemoryCourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.retain(|c| c.course_id != course.course_id);
        self.courses.push(course);
    }

    pub fn enroll(&mut self, student_id: &str, course_id: CourseId) {
        let enrolled = self
            .enrollments
            .entry(normalize_id(student_id).to_string())
            .or_default();
        if !enrolled.contains(&course_id) {
            enrolled.push(course_id);
        }
    }
}

impl CourseCatalog for MemoryCourseCatalog {
    fn get_course(&self, course_id: CourseId) -> Option<Course> {
        self.courses.iter().find(|c| c.course_id == course_id).cloned()
    }

    fn list_enrolled(&self, student_id: &str) -> Vec<Course> {
        self.enrollments
            .get(normalize_id(student_id))
            .map(|ids| ids.iter().filter_map(|id| self.get_course(*id)).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryUserDirectory {
    users: Vec<User>,
}

impl MemoryUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        MemoryUserDirectory { users }
    }
}

impl UserDirectory for MemoryUserDirectory {
    fn get(&self, institutional_id: &str) -> Option<User> {
        self.users.iter().find(|u| u.is(institutional_id)).cloned()
    }

    /// Case-insensitive substring match on id, display name or email.
    fn search(&self, query: &str) -> Vec<User> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.users
            .iter()
            .filter(|u| {
                [&u.institutional_id, &u.display_name, &u.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .take(MAX_DIRECTORY_RESULTS)
            .cloned()
            .collect()
    }
}
