use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn taskdeck_help_works() {
    Command::cargo_bin("taskdeck")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("task and project tracking"));
}

#[test]
fn subcommand_help_works() {
    for cmd in ["project", "task", "search"] {
        Command::cargo_bin("taskdeck")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}
