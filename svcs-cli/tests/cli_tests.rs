use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn svcs(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svcs"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("CLICOLOR_FORCE")
        .env_remove("SVCS_STORE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run svcs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_commit_and_log() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "hello").unwrap();

    let output = svcs(tmp.path(), &["config", "alice"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("The username is alice."));

    let output = svcs(tmp.path(), &["add", "a.txt"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("The file 'a.txt' is tracked."));

    let output = svcs(tmp.path(), &["commit", "first commit"]);
    assert!(output.status.success(), "commit failed: {:?}", output);
    assert!(stdout(&output).contains("Changes are committed."));

    let output = svcs(tmp.path(), &["commit", "again"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Nothing to commit."));

    fs::write(tmp.path().join("a.txt"), "world").unwrap();
    let output = svcs(tmp.path(), &["commit", "second commit"]);
    assert!(output.status.success());

    let output = svcs(tmp.path(), &["log"]);
    assert!(output.status.success());
    let log = stdout(&output);
    let second = log.find("second commit").expect("second commit listed");
    let first = log.find("first commit").expect("first commit listed");
    assert!(second < first, "log is not most-recent-first:\n{}", log);
    assert_eq!(log.matches("Author: alice").count(), 2);
}

#[test]
fn test_cli_log_output_format() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "hello").unwrap();
    svcs(tmp.path(), &["config", "alice"]);
    svcs(tmp.path(), &["add", "a.txt"]);
    svcs(tmp.path(), &["commit", "first commit"]);
    fs::write(tmp.path().join("a.txt"), "world").unwrap();
    svcs(tmp.path(), &["commit", "second commit"]);

    let raw = fs::read_to_string(tmp.path().join("vcs").join("log.txt")).unwrap();
    let ids: Vec<&str> = raw
        .lines()
        .map(|line| line.split(' ').next().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);

    let output = svcs(tmp.path(), &["log"]);
    let expected = format!(
        "commit {}\nAuthor: alice\nsecond commit\n\ncommit {}\nAuthor: alice\nfirst commit\n\n",
        ids[1], ids[0]
    );
    similar_asserts::assert_eq!(stdout(&output), expected);
}

#[test]
fn test_cli_add_nested_path_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    fs::write(tmp.path().join("sub").join("a.txt"), "nested").unwrap();

    let output = svcs(tmp.path(), &["add", "sub/a.txt"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid path 'sub/a.txt'"));
    assert!(!tmp.path().join("vcs").join("index.txt").exists());
}

#[test]
fn test_cli_missing_message_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "hello").unwrap();
    svcs(tmp.path(), &["add", "a.txt"]);

    let output = svcs(tmp.path(), &["commit"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Message was not passed."));
    assert_eq!(
        fs::read_dir(tmp.path().join("vcs").join("commits"))
            .unwrap()
            .count(),
        0
    );
}

#[test]
fn test_cli_no_tracked_files_fails() {
    let tmp = TempDir::new().unwrap();

    let output = svcs(tmp.path(), &["commit", "nothing tracked"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!tmp.path().join("vcs").join("log.txt").exists());
}

#[test]
fn test_cli_add_missing_file() {
    let tmp = TempDir::new().unwrap();

    let output = svcs(tmp.path(), &["add", "ghost.txt"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Can't find 'ghost.txt'."));
}

#[test]
fn test_cli_empty_state_messages() {
    let tmp = TempDir::new().unwrap();

    let output = svcs(tmp.path(), &["log"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "No commits yet.");

    let output = svcs(tmp.path(), &["config"]);
    assert_eq!(stdout(&output).trim(), "Please, tell me who you are.");

    let output = svcs(tmp.path(), &["add"]);
    assert_eq!(stdout(&output).trim(), "Add a file to the index.");
}

#[test]
fn test_cli_log_json() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.txt"), "hello").unwrap();
    svcs(tmp.path(), &["add", "a.txt"]);
    svcs(tmp.path(), &["commit", "json please"]);

    let output = svcs(tmp.path(), &["log", "--json"]);
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["message"], "json please");
    assert_eq!(entries[0]["author"], "");
    assert_eq!(entries[0]["commit_id"].as_str().unwrap().len(), 64);
}

#[test]
fn test_cli_custom_store() {
    let work = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    let store_arg = store.path().to_str().unwrap();
    fs::write(work.path().join("a.txt"), "hello").unwrap();

    svcs(work.path(), &["--store", store_arg, "add", "a.txt"]);
    let output = svcs(work.path(), &["--store", store_arg, "commit", "stored elsewhere"]);

    assert!(output.status.success());
    assert!(store.path().join("log.txt").is_file());
    assert!(!work.path().join("vcs").exists());
}
