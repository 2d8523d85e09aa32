//! tt shell: one live session driven line by line from stdin.
//!
//! Each line is a command. Errors are reported for that line and the loop
//! carries on; `quit` or end of input stops it.

use std::io::BufRead;

use clap::Parser;
use serde::Serialize;

use crate::app::App;
use crate::cli::account::{whoami_human, WhoamiOutput};
use crate::cli::check::{
    delete_human, draft_from_args, emit_task, list_human, list_output, stats_human, DeleteOutput,
};
use crate::cli::{GlobalOptions, NewArgs};
use crate::error::{Error, Result};
use crate::output::{emit_error, emit_success, HumanOutput};
use crate::session::Tab;
use crate::task::Task;

pub struct ShellOptions {
    pub global: GlobalOptions,
}

const HELP: &[&str] = &[
    "login <user> <password>",
    "logout",
    "whoami",
    "users",
    "tab <tasks|create|stats>",
    "filter <key>",
    "sort <key>",
    "search [text]",
    "page <n>",
    "next",
    "prev",
    "list",
    "show <id>",
    "new <name> --description <text> [--owner R] [--frequency F] [--priority P] [--category C] [--due YYYY-MM-DD] [--image URI]",
    "complete <id>",
    "approve <id>",
    "delete <id>",
    "stats",
    "help",
    "quit",
];

/// `new` reuses the flags of `tt check new`.
#[derive(Parser, Debug)]
#[command(name = "new")]
struct ShellNew {
    #[command(flatten)]
    args: NewArgs,
}

/// What a line produced.
enum Reply {
    Quit,
    Render {
        data: serde_json::Value,
        human: HumanOutput,
    },
    Task {
        verb: &'static str,
        task: Task,
    },
}

pub fn run(options: ShellOptions) -> Result<()> {
    let mut app = options.global.open_app()?;
    let output = options.global.output();
    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        let tokens = match tokenize(&line) {
            Ok(tokens) => tokens,
            Err(err) => {
                emit_error("shell", &err, output.json)?;
                continue;
            }
        };
        let Some(word) = tokens.first() else {
            continue;
        };
        if word.starts_with('#') {
            continue;
        }
        let command = format!("shell {word}");
        match execute(&mut app, &tokens) {
            Ok(Reply::Quit) => break,
            Ok(Reply::Render { data, human }) => {
                emit_success(output, &command, &data, Some(&human))?;
            }
            Ok(Reply::Task { verb, task }) => emit_task(output, &command, verb, task)?,
            Err(err) => {
                tracing::debug!(command = %command, error = %err, "shell command failed");
                emit_error(&command, &err, output.json)?;
            }
        }
    }
    Ok(())
}

fn execute(app: &mut App, tokens: &[String]) -> Result<Reply> {
    let (word, rest) = match tokens.split_first() {
        Some((word, rest)) => (word.as_str(), rest),
        None => return Err(Error::InvalidArgument("empty command".to_string())),
    };

    match word {
        "quit" | "exit" => {
            expect_args(word, rest, 0)?;
            Ok(Reply::Quit)
        }
        "help" => {
            let mut human = HumanOutput::new("Commands");
            for line in HELP {
                human.push_detail(*line);
            }
            render(&HELP, human)
        }
        "login" => {
            expect_args(word, rest, 2)?;
            app.login(&rest[0], &rest[1])?;
            whoami(app)
        }
        "logout" => {
            expect_args(word, rest, 0)?;
            app.logout();
            render(&serde_json::json!({ "logged_in": false }), HumanOutput::new("Logged out"))
        }
        "whoami" => {
            expect_args(word, rest, 0)?;
            whoami(app)
        }
        "users" => {
            expect_args(word, rest, 0)?;
            let users = app.users();
            let mut human = HumanOutput::new("Users");
            for user in &users {
                human.push_summary(user.username.clone(), user.role.label());
            }
            render(&users, human)
        }
        "tab" => {
            expect_args(word, rest, 1)?;
            let tab: Tab = rest[0].parse()?;
            app.set_tab(tab)?;
            let role = app.role()?;
            let mut human = HumanOutput::new(format!("Tab: {tab}"));
            let tabs: Vec<&str> = Tab::available_for(role).iter().map(|t| t.as_str()).collect();
            human.push_summary("Available", tabs.join(", "));
            render(&serde_json::json!({ "tab": tab, "available": Tab::available_for(role) }), human)
        }
        "filter" => {
            expect_args(word, rest, 1)?;
            app.set_filter(rest[0].parse()?);
            list(app)
        }
        "sort" => {
            expect_args(word, rest, 1)?;
            app.set_sort(rest[0].parse()?);
            list(app)
        }
        "search" => {
            app.set_search(rest.join(" "));
            list(app)
        }
        "page" => {
            expect_args(word, rest, 1)?;
            let page = rest[0].parse::<usize>().map_err(|_| {
                Error::InvalidArgument(format!("invalid page '{}': expected a number", rest[0]))
            })?;
            app.set_page(page)?;
            list(app)
        }
        "next" => {
            expect_args(word, rest, 0)?;
            app.next_page()?;
            list(app)
        }
        "prev" => {
            expect_args(word, rest, 0)?;
            app.prev_page()?;
            list(app)
        }
        "list" => {
            expect_args(word, rest, 0)?;
            list(app)
        }
        "show" => {
            expect_args(word, rest, 1)?;
            let task = app.task(&rest[0])?;
            Ok(Reply::Task { verb: "Showing", task })
        }
        "new" => {
            let parsed = ShellNew::try_parse_from(tokens)
                .map_err(|err| Error::InvalidArgument(err.to_string().trim().to_string()))?;
            let task = app.create_task(draft_from_args(&parsed.args)?)?;
            Ok(Reply::Task { verb: "Created", task })
        }
        "complete" => {
            expect_args(word, rest, 1)?;
            let task = app.toggle_completed(&rest[0])?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            Ok(Reply::Task { verb, task })
        }
        "approve" => {
            expect_args(word, rest, 1)?;
            let task = app.toggle_approved(&rest[0])?;
            let verb = if task.approved { "Approved" } else { "Unapproved" };
            Ok(Reply::Task { verb, task })
        }
        "delete" => {
            expect_args(word, rest, 1)?;
            app.delete_task(&rest[0])?;
            let output = DeleteOutput {
                id: rest[0].clone(),
                remaining: app.store().len(),
            };
            let human = delete_human(&output);
            render(&output, human)
        }
        "stats" => {
            expect_args(word, rest, 0)?;
            let stats = app.stats()?;
            let human = stats_human(&stats);
            render(&stats, human)
        }
        other => Err(Error::InvalidArgument(format!(
            "unknown command '{other}' (try 'help')"
        ))),
    }
}

fn whoami(app: &App) -> Result<Reply> {
    let role = app.role()?;
    let output = WhoamiOutput {
        username: app.session().username().unwrap_or_default().to_string(),
        role,
        tabs: Tab::available_for(role),
    };
    let human = whoami_human(&output);
    render(&output, human)
}

fn list(app: &App) -> Result<Reply> {
    let output = list_output(app)?;
    let human = list_human(&output);
    render(&output, human)
}

fn render<T: Serialize + ?Sized>(data: &T, human: HumanOutput) -> Result<Reply> {
    Ok(Reply::Render {
        data: serde_json::to_value(data)?,
        human,
    })
}

fn expect_args(word: &str, rest: &[String], count: usize) -> Result<()> {
    if rest.len() != count {
        return Err(Error::InvalidArgument(format!(
            "'{word}' takes {count} argument(s), got {}",
            rest.len()
        )));
    }
    Ok(())
}

/// Split a line on whitespace. Single or double quotes group words;
/// a backslash escapes the next character outside single quotes.
fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_token = true;
                }
                None => {
                    return Err(Error::InvalidArgument(
                        "trailing backslash".to_string(),
                    ))
                }
            },
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Error::InvalidArgument("unterminated quote".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::query::FilterKey;

    fn run_line(app: &mut App, line: &str) -> Result<Reply> {
        execute(app, &tokenize(line).expect("tokenize"))
    }

    fn rendered(reply: Reply) -> serde_json::Value {
        match reply {
            Reply::Render { data, .. } => data,
            Reply::Task { task, .. } => serde_json::to_value(task).expect("task json"),
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn tokenize_handles_quotes_and_escapes() {
        assert_eq!(
            tokenize(r#"new "Stock count" -d 'Count it all' --image a\ b"#).expect("tokens"),
            vec!["new", "Stock count", "-d", "Count it all", "--image", "a b"]
        );
        assert_eq!(tokenize("   ").expect("tokens"), Vec::<String>::new());
        assert_eq!(tokenize(r#"search """#).expect("tokens"), vec!["search", ""]);
        assert!(matches!(tokenize("show \"1"), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn session_flow_through_commands() {
        let mut app = App::default();
        assert!(matches!(run_line(&mut app, "list"), Err(Error::NotAuthenticated)));

        let data = rendered(run_line(&mut app, "login supervisor sup123").expect("login"));
        assert_eq!(data["role"], "supervisor");

        let data = rendered(run_line(&mut app, "filter uncompleted").expect("filter"));
        assert_eq!(data["total_items"], 4);
        assert_eq!(app.session().filter(), FilterKey::Uncompleted);

        let data = rendered(run_line(&mut app, "search inspection").expect("search"));
        assert_eq!(data["total_items"], 1);
        assert_eq!(data["items"][0]["id"], "6");

        let data = rendered(run_line(&mut app, "complete 6").expect("complete"));
        assert_eq!(data["completed"], true);

        run_line(&mut app, "logout").expect("logout");
        assert_eq!(app.session().role(), None);
        assert_eq!(app.session().filter(), FilterKey::All);
    }

    #[test]
    fn new_uses_check_flags() {
        let mut app = App::default();
        run_line(&mut app, "login manager man123").expect("login");
        let data = rendered(
            run_line(
                &mut app,
                r#"new "Fire drill" --description "Run the drill" --owner supervisor --priority high --due 2025-06-01"#,
            )
            .expect("new"),
        );
        assert_eq!(data["name"], "Fire drill");
        assert_eq!(data["owner_role"], "supervisor");
        assert_eq!(data["completed"], false);
        assert_eq!(app.store().len(), 8);

        assert!(matches!(
            run_line(&mut app, "new Nameless"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn errors_leave_the_session_usable() {
        let mut app = App::default();
        run_line(&mut app, "login employee emp123").expect("login");
        assert!(matches!(
            run_line(&mut app, "approve 1"),
            Err(Error::PermissionDenied { role: Role::Employee, .. })
        ));
        assert!(matches!(
            run_line(&mut app, "tab stats"),
            Err(Error::TabUnavailable { .. })
        ));
        assert!(matches!(run_line(&mut app, "frobnicate"), Err(Error::InvalidArgument(_))));
        assert!(matches!(run_line(&mut app, "page x"), Err(Error::InvalidArgument(_))));
        assert!(run_line(&mut app, "list").is_ok());
    }

    #[test]
    fn paging_commands_clamp() {
        let mut app = App::default();
        run_line(&mut app, "login manager man123").expect("login");
        let data = rendered(run_line(&mut app, "next").expect("next"));
        assert_eq!(data["page"], 2);
        let data = rendered(run_line(&mut app, "next").expect("next"));
        assert_eq!(data["page"], 2);
        let data = rendered(run_line(&mut app, "prev").expect("prev"));
        assert_eq!(data["page"], 1);
        assert!(matches!(run_line(&mut app, "quit"), Ok(Reply::Quit)));
    }
}
