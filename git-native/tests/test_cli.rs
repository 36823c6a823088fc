use assert_cmd::Command;
use lib::core::config::env_vars::{
    GIT_NATIVE_COMMITTER_EMAIL, GIT_NATIVE_COMMITTER_NAME, GIT_NATIVE_GIT, GIT_NATIVE_PASSWORD,
    GIT_NATIVE_USERNAME,
};
use lib::testing::{make_git, Git};

/// Run the `git-native` binary in `git`'s repository with the same
/// deterministic environment the test helpers give `git`.
fn git_native(git: &Git) -> eyre::Result<Command> {
    let mut command = Command::cargo_bin("git-native")?;
    command
        .env_clear()
        .envs(git.get_base_env(0))
        .env(GIT_NATIVE_GIT, &git.path_to_git)
        .current_dir(&git.repo_path);
    Ok(command)
}

fn stdout_of(command: &mut Command) -> String {
    let output = command.assert().success().get_output().stdout.clone();
    String::from_utf8_lossy(&output).into_owned()
}

/// Run `command`, expecting it to exit with `code`, and return its stderr.
fn stderr_of_failure(command: &mut Command, code: i32) -> String {
    let output = command.assert().code(code).get_output().stderr.clone();
    String::from_utf8_lossy(&output).into_owned()
}

#[test]
fn test_status() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let stdout = stdout_of(git_native(&git)?.arg("status"));
    insta::assert_snapshot!(stdout, @r###"
    On branch master
    nothing to commit, working tree clean
    "###);

    git.write_file("new.txt", "new\n")?;
    git.write_file("initial.txt", "changed\n")?;
    let stdout = stdout_of(git_native(&git)?.arg("status"));
    insta::assert_snapshot!(stdout, @r###"
    On branch master
    modified: initial.txt
    untracked: new.txt
    "###);
    Ok(())
}

#[test]
fn test_working_directory_option() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    let subdir = git.repo_path.join("subdir");
    std::fs::create_dir_all(&subdir)?;

    // Operations need the repository root as their working directory.
    let stderr = stderr_of_failure(git_native(&git)?.current_dir(&subdir).arg("status"), 1);
    assert!(stderr.contains("not a git repository"), "{stderr}");

    let stdout = stdout_of(
        git_native(&git)?
            .current_dir(&subdir)
            .args(["-C", ".."])
            .arg("branch"),
    );
    insta::assert_snapshot!(stdout, @"* master");
    Ok(())
}

#[test]
fn test_log() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    git.commit_file("test1", 1)?;

    let stdout = stdout_of(git_native(&git)?.args(["log", "-n", "1"]));
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "{stdout}");
    assert!(
        lines[0].ends_with(" create test1.txt (Testy McTestface <test@example.com>)"),
        "{stdout}"
    );
    Ok(())
}

#[test]
fn test_committer() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let stdout = stdout_of(git_native(&git)?.arg("committer"));
    insta::assert_snapshot!(stdout, @"Anonymous <anonymous@noemail.com>");

    let stdout = stdout_of(
        git_native(&git)?
            .env(GIT_NATIVE_COMMITTER_NAME, "Jane Doe")
            .env(GIT_NATIVE_COMMITTER_EMAIL, "jane@example.com")
            .arg("committer"),
    );
    insta::assert_snapshot!(stdout, @"Jane Doe <jane@example.com>");
    Ok(())
}

#[test]
fn test_commit() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let stdout = stdout_of(git_native(&git)?.args(["commit", "-m", "empty"]));
    assert!(stdout.contains("nothing to commit"), "{stdout}");

    git.write_file("initial.txt", "changed\n")?;
    let stdout = stdout_of(
        git_native(&git)?
            .env(GIT_NATIVE_COMMITTER_NAME, "Jane Doe")
            .env(GIT_NATIVE_COMMITTER_EMAIL, "jane@example.com")
            .args(["commit", "--all", "-m", "update initial"]),
    );
    assert!(stdout.starts_with("[master "), "{stdout}");
    assert!(stdout.trim_end().ends_with("] update initial"), "{stdout}");

    let (identities, _stderr) = git.run(&["log", "-1", "--format=%an <%ae>%n%cn <%ce>"])?;
    insta::assert_snapshot!(identities, @r###"
    Jane Doe <jane@example.com>
    Jane Doe <jane@example.com>
    "###);
    Ok(())
}

#[test]
fn test_fetch_without_remote() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;

    let stderr = stderr_of_failure(git_native(&git)?.arg("fetch"), 2);
    assert!(
        stderr.starts_with("error: not authorized to access origin: "),
        "{stderr}"
    );
    assert!(
        stderr.contains("'origin' does not appear to be a git repository"),
        "{stderr}"
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_fetch_unauthorized_exit_code() -> eyre::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let git = make_git()?;
    git.init_repo()?;
    git.run(&["remote", "add", "origin", "https://example.invalid/repo.git"])?;

    let stub_dir = tempfile::tempdir()?;
    let stub = stub_dir.path().join("stub-git");
    std::fs::write(
        &stub,
        format!(
            r#"#!/bin/sh
if [ "$1" = "fetch" ]; then
    echo "fatal: Authentication failed for 'https://example.invalid/repo.git/'" >&2
    exit 128
fi
exec "{}" "$@"
"#,
            git.path_to_git.display()
        ),
    )?;
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755))?;

    let stderr = stderr_of_failure(
        git_native(&git)?
            .env(GIT_NATIVE_GIT, &stub)
            .env(GIT_NATIVE_USERNAME, "alice")
            .env(GIT_NATIVE_PASSWORD, "wrong")
            .arg("fetch"),
        2,
    );
    assert!(
        stderr.contains("not authorized to access https://example.invalid/repo.git"),
        "{stderr}"
    );
    Ok(())
}

#[test]
fn test_clone_and_push() -> eyre::Result<()> {
    let git = make_git()?;
    git.init_repo()?;
    let target_parent = tempfile::tempdir()?;
    let url = git.repo_path.to_string_lossy().into_owned();

    git_native(&git)?
        .current_dir(target_parent.path())
        .args(["clone", &url, "copy"])
        .assert()
        .success();
    let copy = Git {
        repo_path: target_parent.path().join("copy"),
        ..git.clone()
    };
    assert!(copy.repo_path.join("initial.txt").exists());

    copy.run(&["config", "user.name", "Testy McTestface"])?;
    copy.run(&["config", "user.email", "test@example.com"])?;
    copy.commit_file("test2", 2)?;
    let stdout = stdout_of(git_native(&copy)?.args(["push", "origin", "HEAD:refs/heads/pushed"]));
    let update = stdout.trim_end();
    assert!(update.starts_with("*\t"), "{stdout}");
    assert!(update.ends_with(":refs/heads/pushed\t[new branch]"), "{stdout}");

    let (pushed, _stderr) = git.run(&["rev-parse", "pushed"])?;
    let (head, _stderr) = copy.run(&["rev-parse", "HEAD"])?;
    assert_eq!(pushed, head);
    Ok(())
}
