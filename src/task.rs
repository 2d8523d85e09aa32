//! Check records and the in-memory check store.
//!
//! The store is the only owner of mutable check records. Callers get clones
//! back from every operation, and every mutation consults the permission
//! policy before touching anything.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::config::TasksConfig;
use crate::error::{Error, Result};
use crate::model::{Category, Frequency, Priority, Role};
use crate::policy::{self, Action};

const ULID_TIME_LEN: usize = 10;
const ULID_RANDOM_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub owner_role: Role,
    pub frequency: Frequency,
    pub priority: Priority,
    pub completed: bool,
    pub approved: bool,
    pub due_date: NaiveDate,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: Category,
}

impl Task {
    /// Short status hint for an open check, empty once it is completed.
    pub fn reminder(&self) -> &'static str {
        reminder(self)
    }
}

/// Fields supplied when creating a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub owner_role: Role,
    pub frequency: Frequency,
    pub priority: Priority,
    pub category: Category,
    pub due_date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl TaskDraft {
    /// Draft with the create form's defaults: employee-owned, daily, medium
    /// priority, General, due on `due_date`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            owner_role: Role::Employee,
            frequency: Frequency::Daily,
            priority: Priority::Medium,
            category: Category::General,
            due_date,
            description: description.into(),
            image: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("check name is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(Error::Validation("description is required".to_string()));
        }
        Ok(())
    }
}

/// Reminder text keyed by frequency; empty for completed checks.
pub fn reminder(task: &Task) -> &'static str {
    if task.completed {
        return "";
    }
    match task.frequency {
        Frequency::Daily => "Due today!",
        Frequency::Weekly => "Due this week!",
        Frequency::Monthly => "Due this month!",
        Frequency::Once => "Due soon!",
    }
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    config: TasksConfig,
}

impl TaskStore {
    pub fn new(config: TasksConfig) -> Self {
        Self {
            tasks: Vec::new(),
            config,
        }
    }

    /// Store preloaded with the demo checks.
    pub fn seeded(config: TasksConfig) -> Self {
        Self {
            tasks: seed_tasks(),
            config,
        }
    }

    pub fn config(&self) -> &TasksConfig {
        &self.config
    }

    /// Snapshot in insertion order.
    pub fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Borrowed view for read-only pipelines.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.iter().find(|task| task.id == id).cloned()
    }

    pub fn create(&mut self, draft: TaskDraft, actor: Role) -> Result<Task> {
        if !policy::can_create(actor) {
            tracing::warn!(role = %actor, "create denied");
            return Err(Error::PermissionDenied {
                role: actor,
                action: Action::Create,
            });
        }
        draft.validate()?;

        let task = Task {
            id: self.generate_task_id()?,
            name: draft.name.trim().to_string(),
            owner_role: draft.owner_role,
            frequency: draft.frequency,
            priority: draft.priority,
            completed: false,
            approved: false,
            due_date: draft.due_date,
            description: draft.description.trim().to_string(),
            image: draft
                .image
                .map(|uri| uri.trim().to_string())
                .filter(|uri| !uri.is_empty()),
            category: draft.category,
        };
        tracing::debug!(id = %task.id, owner = %task.owner_role, "check created");
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn delete(&mut self, id: &str, actor: Role) -> Result<()> {
        if !policy::can_delete(actor) {
            tracing::warn!(role = %actor, id, "delete denied");
            return Err(Error::PermissionDenied {
                role: actor,
                action: Action::Delete,
            });
        }
        let index = self.position(id)?;
        self.tasks.remove(index);
        tracing::debug!(id, "check deleted");
        Ok(())
    }

    pub fn set_completed(&mut self, id: &str, actor: Role, value: bool) -> Result<Task> {
        self.update(id, actor, Action::Complete, |task| task.completed = value)
    }

    pub fn toggle_completed(&mut self, id: &str, actor: Role) -> Result<Task> {
        self.update(id, actor, Action::Complete, |task| {
            task.completed = !task.completed
        })
    }

    pub fn set_approved(&mut self, id: &str, actor: Role, value: bool) -> Result<Task> {
        self.update(id, actor, Action::Approve, |task| task.approved = value)
    }

    pub fn toggle_approved(&mut self, id: &str, actor: Role) -> Result<Task> {
        self.update(id, actor, Action::Approve, |task| task.approved = !task.approved)
    }

    /// Lookup, then permission against the owner role, then a single
    /// in-place edit. Nothing is written when either check fails.
    fn update<F>(&mut self, id: &str, actor: Role, action: Action, apply: F) -> Result<Task>
    where
        F: FnOnce(&mut Task),
    {
        let index = self.position(id)?;
        let record = &mut self.tasks[index];
        if !policy::allows(actor, record.owner_role, action) {
            tracing::warn!(role = %actor, %action, id, "mutation denied");
            return Err(Error::PermissionDenied {
                role: actor,
                action,
            });
        }
        apply(record);
        tracing::debug!(
            id,
            %action,
            completed = record.completed,
            approved = record.approved,
            "check updated"
        );
        Ok(record.clone())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    /// Fails with `InvalidConfig` when the store was built from settings
    /// that cannot produce an id.
    fn generate_task_id(&self) -> Result<String> {
        self.config.validate()?;
        let prefix = self.config.id_prefix.trim();
        let existing: HashSet<&str> = self.tasks.iter().map(|task| task.id.as_str()).collect();
        loop {
            let base = Ulid::new().to_string();
            let suffix = suffix_from_ulid(&base, self.config.id_len).ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "tasks.id_len must be between 1 and {ULID_RANDOM_LEN}"
                ))
            })?;
            let id = format!("{prefix}-{suffix}");
            if !existing.contains(id.as_str()) {
                return Ok(id);
            }
        }
    }
}

/// Slice of the random section of a ULID, lowercased.
fn suffix_from_ulid(base: &str, len: usize) -> Option<String> {
    let base = base.to_lowercase();
    let random_end = ULID_TIME_LEN + ULID_RANDOM_LEN;
    if base.len() < random_end || len == 0 || len > ULID_RANDOM_LEN {
        return None;
    }
    Some(base[ULID_TIME_LEN..ULID_TIME_LEN + len].to_string())
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn seed_task(
    id: &str,
    name: &str,
    owner_role: Role,
    frequency: Frequency,
    priority: Priority,
    completed: bool,
    approved: bool,
    due_date: NaiveDate,
    category: Category,
) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        owner_role,
        frequency,
        priority,
        completed,
        approved,
        due_date,
        description: String::new(),
        image: None,
        category,
    }
}

/// The seven demo checks every session starts with.
pub fn seed_tasks() -> Vec<Task> {
    use Category::*;
    use Frequency::*;
    use Role::*;

    vec![
        seed_task(
            "1",
            "Complete onboarding paperwork",
            Employee,
            Once,
            Priority::Medium,
            false,
            false,
            seed_date(2025, 5, 1),
            Hr,
        ),
        seed_task(
            "2",
            "Conduct team briefing",
            Supervisor,
            Daily,
            Priority::High,
            true,
            false,
            seed_date(2025, 4, 29),
            Operations,
        ),
        seed_task(
            "3",
            "Review weekly reports",
            Supervisor,
            Weekly,
            Priority::Medium,
            false,
            false,
            seed_date(2025, 5, 3),
            Operations,
        ),
        seed_task(
            "4",
            "Update compliance records",
            Employee,
            Monthly,
            Priority::High,
            false,
            false,
            seed_date(2025, 5, 31),
            Compliance,
        ),
        seed_task(
            "5",
            "Approve budget",
            Manager,
            Monthly,
            Priority::High,
            true,
            true,
            seed_date(2025, 5, 31),
            Finance,
        ),
        seed_task(
            "6",
            "Perform safety inspection",
            Supervisor,
            Weekly,
            Priority::Medium,
            false,
            false,
            seed_date(2025, 5, 3),
            Safety,
        ),
        seed_task(
            "7",
            "Submit timesheet",
            Employee,
            Weekly,
            Priority::Low,
            true,
            false,
            seed_date(2025, 5, 3),
            Hr,
        ),
    ]
}
