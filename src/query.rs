//! Query pipeline over checks.
//!
//! Stages run in a fixed order: role visibility, attribute filter, name
//! search, sort, pagination. Each stage is a pure function so the
//! presentation layer and tests can run any prefix of the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Frequency, Priority, Role};
use crate::policy;
use crate::task::Task;

pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Single-predicate filters offered in the filter picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    All,
    Completed,
    Uncompleted,
    Approved,
    Unapproved,
    Employee,
    Supervisor,
    Manager,
    Daily,
    Weekly,
    Monthly,
    Low,
    Medium,
    High,
}

impl FilterKey {
    pub const ALL: [FilterKey; 14] = [
        FilterKey::All,
        FilterKey::Completed,
        FilterKey::Uncompleted,
        FilterKey::Approved,
        FilterKey::Unapproved,
        FilterKey::Employee,
        FilterKey::Supervisor,
        FilterKey::Manager,
        FilterKey::Daily,
        FilterKey::Weekly,
        FilterKey::Monthly,
        FilterKey::Low,
        FilterKey::Medium,
        FilterKey::High,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Uncompleted => "uncompleted",
            Self::Approved => "approved",
            Self::Unapproved => "unapproved",
            Self::Employee => "employee",
            Self::Supervisor => "supervisor",
            Self::Manager => "manager",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Checks",
            Self::Completed => "Completed",
            Self::Uncompleted => "Uncompleted",
            Self::Approved => "Approved",
            Self::Unapproved => "Unapproved",
            Self::Employee => "Employee",
            Self::Supervisor => "Supervisor",
            Self::Manager => "Manager",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Low => "Low Priority",
            Self::Medium => "Medium Priority",
            Self::High => "High Priority",
        }
    }

    /// Filters worth offering to `role`. Employees only ever see their own
    /// tier, so the owner-role filters are left out for them.
    pub fn available_for(role: Role) -> Vec<FilterKey> {
        FilterKey::ALL
            .into_iter()
            .filter(|key| role != Role::Employee || key.owner_role().is_none())
            .collect()
    }

    fn owner_role(self) -> Option<Role> {
        match self {
            Self::Employee => Some(Role::Employee),
            Self::Supervisor => Some(Role::Supervisor),
            Self::Manager => Some(Role::Manager),
            _ => None,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::Uncompleted => !task.completed,
            Self::Approved => task.approved,
            Self::Unapproved => !task.approved,
            Self::Employee | Self::Supervisor | Self::Manager => {
                Some(task.owner_role) == self.owner_role()
            }
            Self::Daily => task.frequency == Frequency::Daily,
            Self::Weekly => task.frequency == Frequency::Weekly,
            Self::Monthly => task.frequency == Frequency::Monthly,
            Self::Low => task.priority == Priority::Low,
            Self::Medium => task.priority == Priority::Medium,
            Self::High => task.priority == Priority::High,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FilterKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidArgument(format!("invalid filter '{s}'")))
    }
}

/// Sort orders offered in the sort picker. `None` keeps the incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Completed,
    Approved,
    Priority,
    None,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Name,
        SortKey::Completed,
        SortKey::Approved,
        SortKey::Priority,
        SortKey::None,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Completed => "completed",
            Self::Approved => "approved",
            Self::Priority => "priority",
            Self::None => "none",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "completed" => Ok(SortKey::Completed),
            "approved" => Ok(SortKey::Approved),
            "priority" => Ok(SortKey::Priority),
            "none" => Ok(SortKey::None),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort '{s}': must be name, completed, approved, priority, or none"
            ))),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub items: Vec<Task>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// User-selected view state fed to [`query_tasks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub filter: FilterKey,
    pub sort: SortKey,
    pub search: String,
    pub page: usize,
    pub page_size: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            filter: FilterKey::All,
            sort: SortKey::Name,
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub fn visible_tasks<'a, I>(tasks: I, actor: Role) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|task| policy::can_view(actor, task.owner_role))
        .cloned()
        .collect()
}

pub fn apply_filter(mut tasks: Vec<Task>, filter: FilterKey) -> Vec<Task> {
    tasks.retain(|task| filter.matches(task));
    tasks
}

/// Case-insensitive substring match on the name. Whitespace counts as part
/// of the query; only the empty string matches everything.
pub fn apply_search(mut tasks: Vec<Task>, query: &str) -> Vec<Task> {
    if query.is_empty() {
        return tasks;
    }
    let needle = query.to_lowercase();
    tasks.retain(|task| task.name.to_lowercase().contains(&needle));
    tasks
}

/// Stable sort; equal keys keep their incoming order.
pub fn apply_sort(mut tasks: Vec<Task>, sort: SortKey) -> Vec<Task> {
    match sort {
        SortKey::Name => tasks.sort_by(|left, right| {
            left.name
                .to_lowercase()
                .cmp(&right.name.to_lowercase())
                .then_with(|| left.name.cmp(&right.name))
        }),
        SortKey::Completed => tasks.sort_by_key(|task| !task.completed),
        SortKey::Approved => tasks.sort_by_key(|task| !task.approved),
        SortKey::Priority => tasks.sort_by(|left, right| right.priority.cmp(&left.priority)),
        SortKey::None => {}
    }
    tasks
}

/// Slice out 1-indexed `page`. Pages past the end (and page 0) come back
/// empty rather than clamped.
pub fn paginate(tasks: &[Task], page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total_items = tasks.len();
    let total_pages = total_items.div_ceil(page_size);
    let items = if page == 0 {
        Vec::new()
    } else {
        tasks
            .iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    };
    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

/// Full pipeline: visibility, filter, search, sort, pagination.
pub fn query_tasks<'a, I>(tasks: I, actor: Role, params: &QueryParams) -> Page
where
    I: IntoIterator<Item = &'a Task>,
{
    let visible = visible_tasks(tasks, actor);
    let filtered = apply_filter(visible, params.filter);
    let searched = apply_search(filtered, &params.search);
    let sorted = apply_sort(searched, params.sort);
    paginate(&sorted, params.page, params.page_size)
}
