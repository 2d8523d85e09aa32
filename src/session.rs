//! Session state: who is logged in, plus the transient view selection.
//!
//! Changing the filter, sort, or search text always jumps back to page 1.
//! Logout restores every field to its default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::model::Role;
use crate::policy;
use crate::query::{FilterKey, QueryParams, SortKey};

/// Screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Tasks,
    Create,
    Stats,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Tasks, Tab::Create, Tab::Stats];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Create => "create",
            Self::Stats => "stats",
        }
    }

    /// Every role has the task list; only managers create; employees do
    /// not get the stats screen.
    pub fn is_available_to(self, role: Role) -> bool {
        match self {
            Self::Tasks => true,
            Self::Create => policy::can_create(role),
            Self::Stats => role != Role::Employee,
        }
    }

    pub fn available_for(role: Role) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|tab| tab.is_available_to(role))
            .collect()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tasks" => Ok(Tab::Tasks),
            "create" | "add" => Ok(Tab::Create),
            "stats" => Ok(Tab::Stats),
            _ => Err(Error::InvalidArgument(format!(
                "invalid tab '{s}': must be tasks, create, or stats"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    username: Option<String>,
    role: Option<Role>,
    filter: FilterKey,
    sort: SortKey,
    search: String,
    page: usize,
    active_tab: Tab,
    #[serde(skip)]
    defaults: SessionDefaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionDefaults {
    filter: FilterKey,
    sort: SortKey,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        let defaults = SessionDefaults {
            filter: config.default_filter,
            sort: config.default_sort,
        };
        Self {
            username: None,
            role: None,
            filter: defaults.filter,
            sort: defaults.sort,
            search: String::new(),
            page: 1,
            active_tab: Tab::Tasks,
            defaults,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Role of the logged-in user, or `NotAuthenticated`.
    pub fn require_role(&self) -> Result<Role> {
        self.role.ok_or(Error::NotAuthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    pub fn filter(&self) -> FilterKey {
        self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub(crate) fn begin(&mut self, username: &str, role: Role) {
        self.reset();
        self.username = Some(username.to_string());
        self.role = Some(role);
    }

    /// Back to an unauthenticated session with default view state.
    pub fn reset(&mut self) {
        self.username = None;
        self.role = None;
        self.filter = self.defaults.filter;
        self.sort = self.defaults.sort;
        self.search.clear();
        self.page = 1;
        self.active_tab = Tab::Tasks;
    }

    pub fn set_filter(&mut self, filter: FilterKey) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(Error::InvalidArgument("page must be >= 1".to_string()));
        }
        self.page = page;
        Ok(())
    }

    pub fn set_tab(&mut self, tab: Tab) -> Result<()> {
        let role = self.require_role()?;
        if !tab.is_available_to(role) {
            return Err(Error::TabUnavailable { role, tab });
        }
        self.active_tab = tab;
        Ok(())
    }

    pub fn query_params(&self, page_size: usize) -> QueryParams {
        QueryParams {
            filter: self.filter,
            sort: self.sort,
            search: self.search.clone(),
            page: self.page,
            page_size,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}
