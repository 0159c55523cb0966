use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{
    branch_tip, commit_all, init_repository_dir, repository_dir, run_minigit_command,
};
use common::file::{FileSpec, write_file};

#[rstest]
fn diff_without_commits(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();

    run_minigit_command(dir, &["diff"])
        .assert()
        .success()
        .stdout(predicate::eq("No commits to compare\n"));
}

#[rstest]
fn diff_head_against_working_tree(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let head = branch_tip(dir, "master");
    write_file(FileSpec::new(dir.join("1.txt"), "uno\n"));
    write_file(FileSpec::new(dir.join("new.txt"), "fresh\nlines\n"));

    run_minigit_command(dir, &["diff"])
        .assert()
        .success()
        .stdout(predicate::eq(format!(
            "Comparing working directory against commit {}:\n\
             *** Modified: 1.txt\n\
             --- a/1.txt\n\
             +++ b/1.txt\n\
             - one\n\
             + uno\n\
             \n\
             +++ Added: new.txt\n\
             --- a/new.txt\n\
             +++ b/new.txt\n\
             + fresh\n\
             + lines\n\
             \n",
            &head[..7]
        )));
}

#[rstest]
fn diff_reports_deleted_working_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    std::fs::remove_file(dir.join("a").join("b").join("3.txt")).unwrap();

    run_minigit_command(dir, &["diff", "master"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with(
            "--- Removed: a/b/3.txt\n--- a/a/b/3.txt\n+++ b/a/b/3.txt\n- three\n\n",
        ));
}

#[rstest]
fn diff_between_two_commits(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = branch_tip(dir, "master");
    write_file(FileSpec::new(dir.join("a").join("2.txt"), "two\nand more\n"));
    commit_all(dir, "Extend two");
    let second = branch_tip(dir, "master");

    // unrelated working tree edits do not leak into a commit-to-commit diff
    write_file(FileSpec::new(dir.join("1.txt"), "dirty\n"));

    run_minigit_command(dir, &["diff", &first, &second])
        .assert()
        .success()
        .stdout(predicate::eq(format!(
            "Comparing commit {} with {}:\n\
             *** Modified: a/2.txt\n\
             --- a/a/2.txt\n\
             +++ b/a/2.txt\n\
             \x20 two\n\
             + and more\n\
             \n",
            &first[..7],
            &second[..7]
        )));
}

#[rstest]
fn diff_accepts_branch_names(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_minigit_command(dir, &["branch", "feature"])
        .assert()
        .success();

    run_minigit_command(dir, &["diff", "feature", "master"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Comparing commit "))
        .stdout(predicate::function(|out: &str| out.lines().count() == 1));
}

#[rstest]
fn diff_unknown_revision_fails(init_repository_dir: TempDir) {
    run_minigit_command(init_repository_dir.path(), &["diff", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("revision not found: nope"));
}
