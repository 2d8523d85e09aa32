mod support;

use predicates::str::contains;
use support::{json_stdout, TestDir};

fn ids(json: &serde_json::Value) -> Vec<String> {
    json["data"]["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

#[test]
fn employee_list_shows_own_checks_by_name() {
    let dir = TestDir::new();
    let output = dir
        .tt_as("employee", "emp123")
        .args(["--json", "check", "list"])
        .output()
        .expect("run tt");
    assert!(output.status.success());

    let json = json_stdout(&output);
    assert_eq!(json["command"], "check list");
    assert_eq!(json["data"]["total_items"], 3);
    assert_eq!(json["data"]["total_pages"], 1);
    assert_eq!(ids(&json), vec!["1", "7", "4"]);
    assert_eq!(json["data"]["items"][0]["reminder"], "Due soon!");
}

#[test]
fn manager_pages_through_seven_checks() {
    let dir = TestDir::new();
    for (page, expected) in [("1", 4), ("2", 3), ("3", 0)] {
        let output = dir
            .tt_as("manager", "man123")
            .args(["--json", "check", "list", "--page", page])
            .output()
            .expect("run tt");
        assert!(output.status.success());
        let json = json_stdout(&output);
        assert_eq!(json["data"]["total_pages"], 2);
        assert_eq!(ids(&json).len(), expected, "page {page}");
    }
}

#[test]
fn list_filter_sort_and_search() {
    let dir = TestDir::new();
    let output = dir
        .tt_as("manager", "man123")
        .args(["--json", "check", "list", "--filter", "weekly", "--sort", "priority"])
        .output()
        .expect("run tt");
    let json = json_stdout(&output);
    assert_eq!(ids(&json), vec!["3", "6", "7"]);

    let output = dir
        .tt_as("manager", "man123")
        .args(["--json", "check", "list", "--search", "REPORT"])
        .output()
        .expect("run tt");
    assert_eq!(ids(&json_stdout(&output)), vec!["3"]);
}

#[test]
fn unknown_filter_is_user_error() {
    let dir = TestDir::new();
    dir.tt_as("manager", "man123")
        .args(["check", "list", "--filter", "overdue"])
        .assert()
        .code(2)
        .stderr(contains("invalid filter"));
}

#[test]
fn list_requires_login() {
    let dir = TestDir::new();
    dir.tt().args(["check", "list"]).assert().code(3);
}

#[test]
fn employee_cannot_complete_supervisor_check() {
    let dir = TestDir::new();
    let output = dir
        .tt_as("employee", "emp123")
        .args(["--json", "check", "complete", "3"])
        .output()
        .expect("run tt");
    assert_eq!(output.status.code(), Some(3));

    let json = json_stdout(&output);
    assert_eq!(json["command"], "check complete");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 3);
    assert_eq!(
        json["error"]["message"],
        "Permission denied: employee cannot complete this check"
    );
    assert_eq!(json["error"]["kind"], "permission_denied");
    assert_eq!(json["error"]["details"]["role"], "employee");
    assert_eq!(json["error"]["details"]["action"], "complete");
}

#[test]
fn employee_completes_own_check() {
    let dir = TestDir::new();
    dir.tt_as("employee", "emp123")
        .args(["check", "complete", "1"])
        .assert()
        .success()
        .stdout(contains("Completed check 1"))
        .stdout(contains("[done][medium] 1 Complete onboarding paperwork"));
}

#[test]
fn supervisor_approves_employee_check() {
    let dir = TestDir::new();
    let output = dir
        .tt_as("supervisor", "sup123")
        .args(["--json", "check", "approve", "7"])
        .output()
        .expect("run tt");
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["data"]["approved"], true);
    assert_eq!(json["data"]["completed"], true);
}

#[test]
fn show_hides_checks_outside_visibility() {
    let dir = TestDir::new();
    dir.tt_as("supervisor", "sup123")
        .args(["check", "show", "5"])
        .assert()
        .code(2)
        .stderr(contains("Check not found: 5"));

    dir.tt_as("manager", "man123")
        .args(["check", "show", "5"])
        .assert()
        .success()
        .stdout(contains("Approve budget"))
        .stdout(contains("- Category: Finance"));
}

#[test]
fn manager_creates_check_with_form_defaults() {
    let dir = TestDir::new();
    let output = dir
        .tt_as("manager", "man123")
        .args([
            "--json",
            "check",
            "new",
            "Quarterly review",
            "--description",
            "Review KPIs",
            "--due",
            "2025-07-01",
        ])
        .output()
        .expect("run tt");
    assert!(output.status.success());

    let json = json_stdout(&output);
    let data = &json["data"];
    assert!(data["id"].as_str().expect("id").starts_with("chk-"));
    assert_eq!(data["name"], "Quarterly review");
    assert_eq!(data["owner_role"], "employee");
    assert_eq!(data["frequency"], "daily");
    assert_eq!(data["priority"], "medium");
    assert_eq!(data["category"], "General");
    assert_eq!(data["due_date"], "2025-07-01");
    assert_eq!(data["completed"], false);
    assert_eq!(data["approved"], false);
}

#[test]
fn blank_name_fails_validation() {
    let dir = TestDir::new();
    dir.tt_as("manager", "man123")
        .args(["check", "new", "  ", "--description", "Review KPIs"])
        .assert()
        .code(2)
        .stderr(contains("Validation failed"));
}

#[test]
fn supervisor_cannot_create_or_delete() {
    let dir = TestDir::new();
    dir.tt_as("supervisor", "sup123")
        .args(["check", "new", "Drill", "--description", "Fire drill"])
        .assert()
        .code(3);
    dir.tt_as("supervisor", "sup123")
        .args(["check", "delete", "1"])
        .assert()
        .code(3);
}

#[test]
fn manager_deletes_check() {
    let dir = TestDir::new();
    let output = dir
        .tt_as("manager", "man123")
        .args(["--json", "check", "delete", "2"])
        .output()
        .expect("run tt");
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["data"]["id"], "2");
    assert_eq!(json["data"]["remaining"], 6);

    dir.tt_as("manager", "man123")
        .args(["check", "delete", "missing"])
        .assert()
        .code(2);
}

#[test]
fn stats_for_supervisor_view() {
    let dir = TestDir::new();
    let output = dir
        .tt_as("supervisor", "sup123")
        .args(["--json", "stats"])
        .output()
        .expect("run tt");
    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["data"]["total"], 6);
    assert_eq!(json["data"]["completed_count"], 2);

    dir.tt_as("employee", "emp123")
        .arg("stats")
        .assert()
        .code(3)
        .stderr(contains("stats tab is not available"));
}

#[test]
fn quiet_suppresses_human_output() {
    let dir = TestDir::new();
    dir.tt_as("employee", "emp123")
        .args(["--quiet", "check", "complete", "4"])
        .assert()
        .success()
        .stdout("");
}
