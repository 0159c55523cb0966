use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

use common::command::{
    init_repository_dir, minigit_commit, repository_dir, run_minigit_command,
};
use common::file::{FileSpec, write_file, write_generated_files};

#[rstest]
fn add_reports_each_expanded_file_in_order(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("b.txt"), "b\n"));
    write_file(FileSpec::new(dir.join("a").join("nested.txt"), "nested\n"));

    run_minigit_command(dir, &["add", "."])
        .assert()
        .success()
        .stdout(predicate::eq(
            "Added a/nested.txt to staging area\nAdded b.txt to staging area\n",
        ));
}

#[rstest]
fn adding_a_missing_path_fails_without_staging_anything(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("present.txt"), "here\n"));

    run_minigit_command(dir, &["add", "present.txt", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found: missing.txt"));

    minigit_commit(dir, "nothing staged")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn adding_a_file_named_with_a_newline_fails(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("good.txt"), "good\n"));
    write_file(FileSpec::new(dir.join("bad\nname.txt"), "bad\n"));

    run_minigit_command(dir, &["add", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("paths cannot contain a newline"));

    minigit_commit(dir, "nothing staged")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn first_commit_is_reported_as_root_commit(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), "one\n"));
    run_minigit_command(dir, &["add", "1.txt"]).assert().success();

    minigit_commit(dir, "Initial commit")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^\[master \(root-commit\) [0-9a-f]{7}\] Initial commit\n$")
                .unwrap(),
        );
}

#[rstest]
fn commit_keeps_unstaged_files_of_the_parent(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "uno\n"));
    run_minigit_command(dir, &["add", "1.txt"]).assert().success();

    minigit_commit(dir, "Change one")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^\[master [0-9a-f]{7}\] Change one\n$").unwrap(),
        );

    // a/2.txt and a/b/3.txt were not staged again but are still tracked
    run_minigit_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::eq(
            "On branch master\nnothing to commit, working tree clean\n",
        ));
}

#[rstest]
fn commit_clears_the_staging_area(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    let index = std::fs::read_to_string(dir.join(".minigit").join("index")).unwrap();
    assert_eq!(index, "");

    minigit_commit(dir, "again")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn generated_files_are_all_committed(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_minigit_command(dir, &["init"]).assert().success();
    let files = write_generated_files(dir, 5);

    run_minigit_command(dir, &["add", "."]).assert().success();
    minigit_commit(dir, "generated").assert().success();

    let output = run_minigit_command(dir, &["diff"]).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Comparing working directory against commit"));
    assert_eq!(stdout.lines().count(), 1);
    assert_eq!(files.len(), 5);
}

#[rstest]
fn concurrent_adds_keep_every_entry(repository_dir: TempDir) {
    let dir = repository_dir.path().to_path_buf();
    run_minigit_command(&dir, &["init"]).assert().success();

    let names = (0..4).map(|i| format!("file-{i}.txt")).collect::<Vec<_>>();
    for name in &names {
        write_file(FileSpec::new(dir.join(name), format!("{name}\n")));
    }

    let handles = names
        .iter()
        .cloned()
        .map(|name| {
            let dir = dir.clone();
            std::thread::spawn(move || {
                run_minigit_command(&dir, &["add", &name]).assert().success();
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let expected = names
        .iter()
        .map(|name| format!("\tnew file:   {name}\n"))
        .collect::<String>();
    run_minigit_command(&dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::eq(format!(
            "On branch master\nChanges to be committed:\n{expected}\n"
        )));
}
