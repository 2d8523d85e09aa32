//! Application facade.
//!
//! `App` is the single owned value that ties the credential store, the check
//! store, and the session together. Every operation that needs an actor reads
//! it from the session.

use crate::config::Config;
use crate::credentials::{CredentialStore, UserInfo};
use crate::error::{Error, Result};
use crate::model::Role;
use crate::query::{self, FilterKey, Page, SortKey};
use crate::session::{Session, Tab};
use crate::stats::{compute_stats, TaskStats};
use crate::task::{Task, TaskDraft, TaskStore};

#[derive(Debug, Clone)]
pub struct App {
    config: Config,
    credentials: CredentialStore,
    store: TaskStore,
    session: Session,
}

impl App {
    /// Build an app from `config`, rejecting settings the store cannot use.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: Config) -> Self {
        let store = if config.tasks.seed_demo {
            TaskStore::seeded(config.tasks.clone())
        } else {
            TaskStore::new(config.tasks.clone())
        };
        let session = Session::new(&config.session);
        Self {
            config,
            credentials: CredentialStore::builtin(),
            store,
            session,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn users(&self) -> Vec<UserInfo> {
        self.credentials.users()
    }

    /// Authenticate and start a fresh session. A failed attempt leaves any
    /// existing session untouched.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Role> {
        let role = self.credentials.authenticate(username, password)?;
        self.session.begin(username, role);
        tracing::info!(username, role = %role, "logged in");
        Ok(role)
    }

    pub fn logout(&mut self) {
        if let Some(username) = self.session.username() {
            tracing::info!(username, "logged out");
        }
        self.session.reset();
    }

    pub fn role(&self) -> Result<Role> {
        self.session.require_role()
    }

    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let role = self.role()?;
        self.store.create(draft, role)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let role = self.role()?;
        self.store.delete(id, role)
    }

    pub fn toggle_completed(&mut self, id: &str) -> Result<Task> {
        let role = self.role()?;
        self.store.toggle_completed(id, role)
    }

    pub fn toggle_approved(&mut self, id: &str) -> Result<Task> {
        let role = self.role()?;
        self.store.toggle_approved(id, role)
    }

    /// A check the current role may see. Hidden checks read as missing.
    pub fn task(&self, id: &str) -> Result<Task> {
        let role = self.role()?;
        self.store
            .get(id)
            .filter(|task| crate::policy::can_view(role, task.owner_role))
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    /// Every check visible to the current role, in insertion order.
    pub fn visible_tasks(&self) -> Result<Vec<Task>> {
        let role = self.role()?;
        Ok(query::visible_tasks(self.store.iter(), role))
    }

    /// The page selected by the session's filter, sort, search, and page.
    pub fn current_page(&self) -> Result<Page> {
        let role = self.role()?;
        let params = self.session.query_params(self.config.tasks.page_size);
        Ok(query::query_tasks(self.store.iter(), role, &params))
    }

    pub fn set_filter(&mut self, filter: FilterKey) {
        self.session.set_filter(filter);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.session.set_sort(sort);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.session.set_search(search);
    }

    pub fn set_page(&mut self, page: usize) -> Result<()> {
        self.session.set_page(page)
    }

    /// Advance one page, stopping at the last one.
    pub fn next_page(&mut self) -> Result<usize> {
        let total_pages = self.current_page()?.total_pages;
        let page = self.session.page();
        if page < total_pages {
            self.session.set_page(page + 1)?;
        }
        Ok(self.session.page())
    }

    /// Go back one page, stopping at page 1.
    pub fn prev_page(&mut self) -> Result<usize> {
        self.role()?;
        let page = self.session.page();
        if page > 1 {
            self.session.set_page(page - 1)?;
        }
        Ok(self.session.page())
    }

    pub fn set_tab(&mut self, tab: Tab) -> Result<()> {
        self.session.set_tab(tab)
    }

    /// Counts over the session's current view: visible checks narrowed by
    /// the active filter and search, before pagination.
    pub fn stats(&self) -> Result<TaskStats> {
        let role = self.role()?;
        if !Tab::Stats.is_available_to(role) {
            return Err(Error::TabUnavailable {
                role,
                tab: Tab::Stats,
            });
        }
        let visible = query::visible_tasks(self.store.iter(), role);
        let filtered = query::apply_filter(visible, self.session.filter());
        let searched = query::apply_search(filtered, self.session.search());
        Ok(compute_stats(&searched))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::NaiveDate;

    fn app_as(username: &str, password: &str) -> App {
        let mut app = App::default();
        app.login(username, password).expect("login");
        app
    }

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("date")
    }

    #[test]
    fn operations_need_login() {
        let mut app = App::default();
        assert!(matches!(app.current_page(), Err(Error::NotAuthenticated)));
        assert!(matches!(app.toggle_completed("1"), Err(Error::NotAuthenticated)));
        assert!(matches!(app.delete_task("1"), Err(Error::NotAuthenticated)));
        assert!(matches!(app.stats(), Err(Error::NotAuthenticated)));
        assert_eq!(app.store().len(), 7);
    }

    #[test]
    fn employee_sees_own_checks_and_cannot_touch_supervisor_work() {
        let mut app = App::default();
        assert_eq!(app.login("employee", "emp123").expect("login"), Role::Employee);

        let page = app.current_page().expect("page");
        assert_eq!(page.total_items, 3);
        assert!(page.items.iter().all(|task| task.owner_role == Role::Employee));

        let err = app.toggle_completed("3").expect_err("supervisor check");
        assert!(matches!(err, Error::PermissionDenied { role: Role::Employee, .. }));
        assert!(app.store().get("3").is_some_and(|task| !task.completed));
    }

    #[test]
    fn manager_creates_after_fixing_validation() {
        let mut app = app_as("manager", "man123");

        let err = app
            .create_task(TaskDraft::new("", "Quarterly review", due()))
            .expect_err("blank name");
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(app.store().len(), 7);

        let created = app
            .create_task(TaskDraft::new("Quarterly review", "Review KPIs", due()))
            .expect("create");
        assert!(!created.completed);
        assert!(!created.approved);
        assert!(app.store().list().iter().any(|task| task.id == created.id));
        assert_eq!(app.store().len(), 8);
    }

    #[test]
    fn failed_login_keeps_current_session() {
        let mut app = app_as("supervisor", "sup123");
        app.set_search("inspect");
        assert!(matches!(
            app.login("manager", "wrong"),
            Err(Error::InvalidCredentials)
        ));
        assert_eq!(app.role().expect("role"), Role::Supervisor);
        assert_eq!(app.session().search(), "inspect");
    }

    #[test]
    fn logout_resets_view_state() {
        let mut app = app_as("manager", "man123");
        app.set_filter(FilterKey::High);
        app.set_sort(SortKey::Priority);
        app.set_search("budget");
        app.set_tab(Tab::Create).expect("tab");

        app.logout();
        assert_eq!(app.session().role(), None);
        assert_eq!(app.session().filter(), FilterKey::All);
        assert_eq!(app.session().sort(), SortKey::Name);
        assert_eq!(app.session().search(), "");
        assert_eq!(app.session().page(), 1);
        assert_eq!(app.session().active_tab(), Tab::Tasks);
    }

    #[test]
    fn paging_is_clamped() {
        let mut app = app_as("manager", "man123");
        assert_eq!(app.current_page().expect("page").total_pages, 2);

        assert_eq!(app.prev_page().expect("prev"), 1);
        assert_eq!(app.next_page().expect("next"), 2);
        assert_eq!(app.next_page().expect("next"), 2);
        assert_eq!(app.current_page().expect("page").items.len(), 3);

        app.set_filter(FilterKey::Completed);
        assert_eq!(app.session().page(), 1);
    }

    #[test]
    fn hidden_checks_read_as_missing() {
        let app = app_as("employee", "emp123");
        assert!(app.task("1").is_ok());
        assert!(matches!(app.task("5"), Err(Error::TaskNotFound(_))));
        assert!(matches!(app.task("nope"), Err(Error::TaskNotFound(_))));
    }

    #[test]
    fn stats_follow_filter_and_search() {
        let mut app = app_as("manager", "man123");
        assert_eq!(app.stats().expect("stats").total, 7);

        app.set_filter(FilterKey::Uncompleted);
        let stats = app.stats().expect("stats");
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed_count, 0);
    }

    #[test]
    fn employees_have_no_stats() {
        let app = app_as("employee", "emp123");
        assert!(matches!(
            app.stats(),
            Err(Error::TabUnavailable { tab: Tab::Stats, .. })
        ));
    }

    #[test]
    fn priority_sort_through_session() {
        let mut app = app_as("manager", "man123");
        app.set_sort(SortKey::Priority);
        let page = app.current_page().expect("page");
        assert_eq!(page.items[0].priority, Priority::High);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = Config::default();
        config.tasks.id_len = 20;
        assert!(matches!(App::new(config), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.tasks.page_size = 0;
        assert!(matches!(App::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn unseeded_store_starts_empty() {
        let mut config = Config::default();
        config.tasks.seed_demo = false;
        let mut app = App::new(config).expect("app");
        app.login("manager", "man123").expect("login");
        let page = app.current_page().expect("page");
        assert_eq!(page.total_items, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(app.next_page().expect("next"), 1);
    }
}
