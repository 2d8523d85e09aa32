//! tt check and tt stats command implementations.

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::App;
use crate::cli::{GlobalOptions, NewArgs, ViewArgs};
use crate::error::{Error, Result};
use crate::model::Role;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::{FilterKey, SortKey};
use crate::stats::TaskStats;
use crate::task::{Task, TaskDraft};

pub struct ListOptions {
    pub view: ViewArgs,
    pub page: usize,
    pub global: GlobalOptions,
}

pub struct ShowOptions {
    pub id: String,
    pub global: GlobalOptions,
}

pub struct NewOptions {
    pub args: NewArgs,
    pub global: GlobalOptions,
}

pub struct ToggleOptions {
    pub id: String,
    pub global: GlobalOptions,
}

pub struct DeleteOptions {
    pub id: String,
    pub global: GlobalOptions,
}

pub struct StatsOptions {
    pub view: ViewArgs,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
pub(super) struct CheckListOutput {
    pub role: Role,
    pub filter: FilterKey,
    pub sort: SortKey,
    pub search: String,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<CheckView>,
    pub filters: Vec<FilterKey>,
}

/// A check plus its derived reminder text.
#[derive(Serialize)]
pub(super) struct CheckView {
    #[serde(flatten)]
    pub task: Task,
    pub reminder: &'static str,
}

impl From<Task> for CheckView {
    fn from(task: Task) -> Self {
        let reminder = task.reminder();
        Self { task, reminder }
    }
}

#[derive(Serialize)]
pub(super) struct DeleteOutput {
    pub id: String,
    pub remaining: usize,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let mut app = options.global.open_app()?;
    apply_view(&mut app, &options.view)?;
    app.set_page(options.page)?;
    let output = list_output(&app)?;
    let human = list_human(&output);
    emit_success(options.global.output(), "check list", &output, Some(&human))
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let app = options.global.open_app()?;
    let view = CheckView::from(app.task(&options.id)?);
    let human = check_human(&view.task);
    emit_success(options.global.output(), "check show", &view, Some(&human))
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut app = options.global.open_app()?;
    let task = app.create_task(draft_from_args(&options.args)?)?;
    emit_task(options.global.output(), "check new", "Created", task)
}

pub fn run_complete(options: ToggleOptions) -> Result<()> {
    let mut app = options.global.open_app()?;
    let task = app.toggle_completed(&options.id)?;
    let verb = if task.completed { "Completed" } else { "Reopened" };
    emit_task(options.global.output(), "check complete", verb, task)
}

pub fn run_approve(options: ToggleOptions) -> Result<()> {
    let mut app = options.global.open_app()?;
    let task = app.toggle_approved(&options.id)?;
    let verb = if task.approved { "Approved" } else { "Unapproved" };
    emit_task(options.global.output(), "check approve", verb, task)
}

pub fn run_delete(options: DeleteOptions) -> Result<()> {
    let mut app = options.global.open_app()?;
    app.delete_task(&options.id)?;
    let output = DeleteOutput {
        id: options.id,
        remaining: app.store().len(),
    };
    let human = delete_human(&output);
    emit_success(options.global.output(), "check delete", &output, Some(&human))
}

pub fn run_stats(options: StatsOptions) -> Result<()> {
    let mut app = options.global.open_app()?;
    apply_view(&mut app, &options.view)?;
    let stats = app.stats()?;
    let human = stats_human(&stats);
    emit_success(options.global.output(), "stats", &stats, Some(&human))
}

fn apply_view(app: &mut App, view: &ViewArgs) -> Result<()> {
    if let Some(filter) = view.filter.as_deref() {
        app.set_filter(filter.parse()?);
    }
    if let Some(sort) = view.sort.as_deref() {
        app.set_sort(sort.parse()?);
    }
    if let Some(search) = view.search.as_deref() {
        app.set_search(search);
    }
    Ok(())
}

pub(super) fn draft_from_args(args: &NewArgs) -> Result<TaskDraft> {
    let due_date = match args.due.as_deref() {
        Some(raw) => parse_due(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let mut draft = TaskDraft::new(args.name.clone(), args.description.clone(), due_date);
    draft.owner_role = args.owner.parse()?;
    draft.frequency = args.frequency.parse()?;
    draft.priority = args.priority.parse()?;
    draft.category = args.category.parse()?;
    draft.image = args.image.clone();
    Ok(draft)
}

fn parse_due(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidArgument(format!("invalid due date '{raw}': expected YYYY-MM-DD"))
    })
}

pub(super) fn list_output(app: &App) -> Result<CheckListOutput> {
    let role = app.role()?;
    let page = app.current_page()?;
    let session = app.session();
    Ok(CheckListOutput {
        role,
        filter: session.filter(),
        sort: session.sort(),
        search: session.search().to_string(),
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
        items: page.items.into_iter().map(CheckView::from).collect(),
        filters: FilterKey::available_for(role),
    })
}

pub(super) fn list_human(output: &CheckListOutput) -> HumanOutput {
    let mut human = HumanOutput::new("Checks");
    human.push_summary("Role", output.role.label());
    human.push_summary("Filter", output.filter.label());
    human.push_summary("Sort", output.sort.as_str());
    if !output.search.is_empty() {
        human.push_summary("Search", output.search.clone());
    }
    human.push_summary(
        "Page",
        format!("{}/{}", output.page, output.total_pages.max(1)),
    );
    human.push_summary("Total", output.total_items.to_string());
    for view in &output.items {
        human.push_detail(check_line(&view.task));
    }
    if output.items.is_empty() {
        human.push_detail("No checks found.");
    }
    if output.page < output.total_pages {
        human.push_next_step(format!("tt check list --page {}", output.page + 1));
    }
    human
}

/// One-line summary: `[state][priority] id name (owner, frequency, category, due) reminder`.
pub(super) fn check_line(task: &Task) -> String {
    let mut line = format!(
        "[{}][{}] {} {} ({}, {}, {}, due {})",
        state_label(task),
        task.priority,
        task.id,
        task.name,
        task.owner_role,
        task.frequency,
        task.category,
        task.due_date
    );
    let reminder = task.reminder();
    if !reminder.is_empty() {
        line.push(' ');
        line.push_str(reminder);
    }
    line
}

fn state_label(task: &Task) -> &'static str {
    match (task.completed, task.approved) {
        (true, true) => "done+approved",
        (true, false) => "done",
        (false, true) => "open+approved",
        (false, false) => "open",
    }
}

pub(super) fn check_human(task: &Task) -> HumanOutput {
    let mut human = HumanOutput::new(format!("Check {}", task.id));
    human.push_summary("Name", task.name.clone());
    human.push_summary("Owner", task.owner_role.label());
    human.push_summary("Frequency", task.frequency.as_str());
    human.push_summary("Priority", task.priority.as_str());
    human.push_summary("Category", task.category.as_str());
    human.push_summary("Due", task.due_date.to_string());
    human.push_summary("Completed", yes_no(task.completed));
    human.push_summary("Approved", yes_no(task.approved));
    if let Some(image) = task.image.as_deref() {
        human.push_summary("Image", image);
    }
    human.push_detail(task.description.clone());
    let reminder = task.reminder();
    if !reminder.is_empty() {
        human.push_warning(reminder);
    }
    human
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub(super) fn emit_task(
    options: OutputOptions,
    command: &str,
    verb: &str,
    task: Task,
) -> Result<()> {
    let mut human = HumanOutput::new(format!("{verb} check {}", task.id));
    human.push_detail(check_line(&task));
    let view = CheckView::from(task);
    emit_success(options, command, &view, Some(&human))
}

pub(super) fn delete_human(output: &DeleteOutput) -> HumanOutput {
    let mut human = HumanOutput::new(format!("Deleted check {}", output.id));
    human.push_summary("Remaining", output.remaining.to_string());
    human
}

pub(super) fn stats_human(stats: &TaskStats) -> HumanOutput {
    let mut human = HumanOutput::new("Stats");
    human.push_summary("Total", stats.total.to_string());
    human.push_summary(
        "Completed",
        format!("{} ({:.1}%)", stats.completed_count, stats.completed_percent),
    );
    human.push_summary(
        "Approved",
        format!("{} ({:.1}%)", stats.approved_count, stats.approved_percent),
    );
    for entry in &stats.by_role {
        human.push_detail(format!("role {}: {}", entry.role, entry.count));
    }
    for entry in &stats.by_frequency {
        human.push_detail(format!("frequency {}: {}", entry.frequency, entry.count));
    }
    for entry in &stats.by_category {
        human.push_detail(format!("category {}: {}", entry.category, entry.count));
    }
    human
}
