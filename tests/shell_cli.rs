mod support;

use predicates::str::contains;
use support::TestDir;

#[test]
fn shell_keeps_one_session_across_lines() {
    let dir = TestDir::new();
    let script = "\
login manager man123
new \"Fire drill\" --description \"Run the drill\" --owner supervisor --priority high
filter high
list
logout
list
";
    dir.tt()
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Logged in as manager"))
        .stdout(contains("Created check chk-"))
        .stdout(contains("Fire drill (supervisor, daily, General"))
        .stdout(contains("- Filter: High"))
        .stdout(contains("Logged out"))
        .stderr(contains("error: Not logged in"));
}

#[test]
fn shell_reports_errors_and_continues() {
    let dir = TestDir::new();
    let script = "\
login employee emp123
complete 3
tab stats
bogus
complete 1
";
    dir.tt()
        .arg("shell")
        .write_stdin(script)
        .assert()
        .success()
        .stderr(contains("Permission denied: employee cannot complete this check"))
        .stderr(contains("The stats tab is not available to employee"))
        .stderr(contains("unknown command 'bogus'"))
        .stdout(contains("Completed check 1"));
}

#[test]
fn shell_quit_stops_reading() {
    let dir = TestDir::new();
    dir.tt_as("supervisor", "sup123")
        .arg("shell")
        .write_stdin("# comment\n\nwhoami\nquit\nwhoami\n")
        .assert()
        .success()
        .stdout(contains("Logged in as supervisor").count(1));
}

#[test]
fn shell_json_emits_one_envelope_per_command() {
    let dir = TestDir::new();
    let output = dir
        .tt()
        .args(["--json", "shell"])
        .write_stdin("login supervisor sup123\nstats\n")
        .output()
        .expect("run tt");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let envelopes: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .expect("json stream");
    assert_eq!(envelopes.len(), 2);
    assert_eq!(envelopes[0]["command"], "shell login");
    assert_eq!(envelopes[1]["command"], "shell stats");
    assert_eq!(envelopes[1]["data"]["total"], 6);
}
