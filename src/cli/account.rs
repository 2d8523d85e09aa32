//! tt whoami and tt users.

use serde::Serialize;

use crate::cli::GlobalOptions;
use crate::credentials::UserInfo;
use crate::error::Result;
use crate::model::Role;
use crate::output::{emit_success, HumanOutput};
use crate::session::Tab;

pub struct WhoamiOptions {
    pub global: GlobalOptions,
}

pub struct UsersOptions {
    pub global: GlobalOptions,
}

#[derive(Serialize)]
pub(super) struct WhoamiOutput {
    pub username: String,
    pub role: Role,
    pub tabs: Vec<Tab>,
}

#[derive(Serialize)]
struct UsersOutput {
    users: Vec<UserInfo>,
}

pub fn run_whoami(options: WhoamiOptions) -> Result<()> {
    let app = options.global.open_app()?;
    let role = app.role()?;
    let output = WhoamiOutput {
        username: app.session().username().unwrap_or_default().to_string(),
        role,
        tabs: Tab::available_for(role),
    };
    let human = whoami_human(&output);
    emit_success(options.global.output(), "whoami", &output, Some(&human))
}

pub fn run_users(options: UsersOptions) -> Result<()> {
    let app = options.global.open_app()?;
    let output = UsersOutput { users: app.users() };

    let mut human = HumanOutput::new("Users");
    for user in &output.users {
        human.push_summary(user.username.clone(), user.role.label());
    }
    human.push_next_step("tt --user <name> --password <password> whoami");

    emit_success(options.global.output(), "users", &output, Some(&human))
}

pub(super) fn whoami_human(output: &WhoamiOutput) -> HumanOutput {
    let mut human = HumanOutput::new(format!("Logged in as {}", output.username));
    human.push_summary("Role", output.role.label());
    let tabs: Vec<&str> = output.tabs.iter().map(|tab| tab.as_str()).collect();
    human.push_summary("Tabs", tabs.join(", "));
    human
}
