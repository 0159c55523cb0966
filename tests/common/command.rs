use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

use crate::common::file::{FileSpec, write_file};

pub const FIXED_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with one root commit holding `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_minigit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one\n"));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n",
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three\n",
    ));

    run_minigit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    minigit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_minigit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("minigit").expect("Failed to find minigit binary");
    cmd.envs(vec![("NO_COLOR", "1"), ("MINIGIT_DATE", FIXED_DATE)]);
    cmd.env_remove("MINIGIT_LOG");
    cmd.current_dir(dir);
    cmd.args(args);
    cmd
}

pub fn minigit_commit(dir: &Path, message: &str) -> Command {
    run_minigit_command(dir, &["commit", "-m", message])
}

/// Stage everything and commit it
pub fn commit_all(dir: &Path, message: &str) {
    run_minigit_command(dir, &["add", "."]).assert().success();
    minigit_commit(dir, message).assert().success();
}

/// Object id stored in `.minigit/refs/heads/<branch>`
pub fn branch_tip(dir: &Path, branch: &str) -> String {
    std::fs::read_to_string(dir.join(".minigit").join("refs").join("heads").join(branch))
        .expect("Failed to read branch ref")
        .trim()
        .to_string()
}

pub fn read_head(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".minigit").join("HEAD"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}
